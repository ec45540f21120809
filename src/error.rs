//! # 에러 처리 모듈
//!
//! 애플리케이션에서 발생할 수 있는 모든 에러 타입을 정의합니다.
//! Rust에서는 예외(exception) 대신 `Result<T, E>` 타입으로 에러를 처리합니다.
//!
//! 이 모듈의 핵심:
//! - `AppError` 열거형(enum): 모든 에러 종류를 하나의 타입으로 통합
//! - `FieldErrors`: 필드 이름 → 메시지 맵. 검증 실패 응답에 그대로 실립니다
//! - `IntoResponse` 구현: 에러를 HTTP 응답으로 자동 변환
//!
//! ## 응답 형태
//! ```json
//! { "error": { "code": "validation_error", "message": "...", "fields": { "tags": "..." } } }
//! ```
//! `fields`는 `Validation` 에러일 때만 포함됩니다.

use std::collections::BTreeMap;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

/// 필드별 검증 에러 메시지
///
/// BTreeMap을 사용하므로 키가 항상 알파벳순으로 직렬화됩니다.
/// (응답 본문이 결정적(deterministic)이 되어 테스트하기 쉽습니다)
pub type FieldErrors = BTreeMap<String, String>;

/// 애플리케이션에서 발생할 수 있는 모든 에러 종류
///
/// 각 에러 variant는 적절한 HTTP 상태 코드와 메시지로 변환됩니다.
/// 핸들러에서 `Result<T, AppError>`를 반환하면,
/// Axum이 자동으로 `IntoResponse`를 호출하여 HTTP 응답으로 변환합니다.
#[derive(Debug, Error)]
pub enum AppError {
    /// 요청한 리소스를 찾을 수 없음 (HTTP 404)
    #[error("Resource not found")]
    NotFound,

    /// 잘못된 요청 (HTTP 400)
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// 필드 단위 검증 실패 (HTTP 400)
    /// 예: 태그/재료 누락, 음수 수량, 중복 재료
    #[error("Validation failed: {0:?}")]
    Validation(FieldErrors),

    /// 이미 존재하는 관계를 다시 만들려는 요청 (HTTP 400)
    /// 예: 중복 즐겨찾기, 중복 장바구니, 중복 구독, 자기 자신 구독
    #[error("Conflict: {0}")]
    Conflict(String),

    /// 인증 실패 (HTTP 401)
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// 권한 없음 (HTTP 403). 작성자가 아닌 사용자가 레시피를 수정/삭제하려는 경우
    #[error("Forbidden: {0}")]
    Forbidden(String),

    /// 서버 내부 오류 (HTTP 500)
    #[error("Internal error: {0}")]
    Internal(String),

    /// 데이터베이스 오류 (HTTP 500)
    /// #[from]: sqlx 함수의 에러에 `?`를 쓰면 자동으로 AppError::Database로 변환됩니다.
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// 파일 입출력 오류 (HTTP 500)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl AppError {
    /// 필드 하나짜리 검증 에러를 만듭니다.
    ///
    /// `impl Into<String>`: &str과 String을 모두 받을 수 있게 하는 제네릭 매개변수입니다.
    pub fn field(field: impl Into<String>, message: impl Into<String>) -> Self {
        let mut fields = FieldErrors::new();
        fields.insert(field.into(), message.into());
        AppError::Validation(fields)
    }

    /// UNIQUE 제약조건 위반이면 `Conflict`로, 나머지는 그대로 `Database`로 변환합니다.
    ///
    /// 관계 테이블(즐겨찾기, 장바구니, 구독)은 사전 SELECT 없이 INSERT 한 번으로 추가하고,
    /// 중복 여부는 UNIQUE 제약조건이 판단합니다. 동시에 들어온 같은 요청도 이 경로로
    /// "이미 존재함" 응답을 받습니다.
    pub fn from_unique_violation(err: sqlx::Error, message: &str) -> Self {
        match err {
            sqlx::Error::Database(ref db_err) if db_err.is_unique_violation() => {
                AppError::Conflict(message.to_string())
            }
            other => AppError::Database(other),
        }
    }
}

impl IntoResponse for AppError {
    /// AppError를 HTTP 응답으로 변환합니다.
    ///
    /// 내부 에러(Database, IO, Internal)는 실제 에러 내용을 로그에만 기록하고,
    /// 클라이언트에는 일반적인 메시지만 반환합니다.
    fn into_response(self) -> Response {
        let mut fields = None;

        let (status, code, message) = match self {
            AppError::NotFound => (StatusCode::NOT_FOUND, "not_found", self.to_string()),
            AppError::BadRequest(ref msg) => {
                (StatusCode::BAD_REQUEST, "bad_request", msg.clone())
            }
            AppError::Validation(ref errors) => {
                fields = Some(errors.clone());
                (
                    StatusCode::BAD_REQUEST,
                    "validation_error",
                    "Request validation failed".to_string(),
                )
            }
            AppError::Conflict(ref msg) => (StatusCode::BAD_REQUEST, "conflict", msg.clone()),
            AppError::Unauthorized(ref msg) => {
                (StatusCode::UNAUTHORIZED, "unauthorized", msg.clone())
            }
            AppError::Forbidden(ref msg) => (StatusCode::FORBIDDEN, "forbidden", msg.clone()),
            AppError::Internal(ref msg) => {
                tracing::error!("Internal error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "internal_error",
                    "An internal error occurred".to_string(),
                )
            }
            AppError::Database(ref e) => {
                tracing::error!("Database error: {}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "database_error",
                    "A database error occurred".to_string(),
                )
            }
            AppError::Io(ref e) => {
                tracing::error!("IO error: {}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "io_error",
                    "An IO error occurred".to_string(),
                )
            }
        };

        let mut error = json!({
            "code": code,
            "message": message
        });
        if let Some(fields) = fields {
            error["fields"] = json!(fields);
        }

        (status, Json(json!({ "error": error }))).into_response()
    }
}
