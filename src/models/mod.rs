//! # 데이터 모델 모듈
//!
//! 애플리케이션에서 사용하는 데이터 구조체(struct)들을 정의합니다.
//! 각 하위 모듈은 특정 도메인의 데이터 타입을 담당합니다:
//! - `ingredient`: 재료
//! - `recipe`: 레시피, 재료 수량, 목록 필터, 쇼핑 목록 줄, 구독 응답
//! - `tag`: 태그
//! - `user`: 사용자와 인증 요청/응답
//!
//! `pub use X::*;`로 하위 모듈의 공개 항목을 재공개(re-export)하므로
//! `crate::models::Recipe`처럼 짧게 접근할 수 있습니다.

pub mod ingredient;
pub mod recipe;
pub mod tag;
pub mod user;

pub use ingredient::*;
pub use recipe::*;
pub use tag::*;
pub use user::*;
