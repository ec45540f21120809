//! JSON body extractor whose rejections use the `AppError` response shape.
//!
//! Plain `axum::Json` answers a malformed or mistyped body with 400/415/422 and a text body.
//! `AppJson` turns every such rejection into `AppError::BadRequest`.

use axum::extract::{rejection::JsonRejection, FromRequest};

use crate::error::AppError;

#[derive(Debug, FromRequest)]
#[from_request(via(axum::Json), rejection(AppError))]
pub struct AppJson<T>(pub T);

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::BadRequest(rejection.body_text())
    }
}
