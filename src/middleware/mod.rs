//! # 미들웨어 모듈
//!
//! - `auth`: JWT 발급/검증과 `AuthUser`, `MaybeAuthUser` 추출기
//! - `json`: 에러 응답 형식을 맞춘 JSON 본문 추출기 `AppJson`

pub mod auth;
pub mod json;
