use axum::extract::FromRequest;

use crate::error::AppError;

/// `Json<T>` whose rejections (bad JSON, missing or mistyped fields, wrong
/// content type) come back as `AppError::Validation`.
#[derive(Debug, FromRequest)]
#[from_request(via(axum::Json), rejection(AppError))]
pub struct AppJson<T>(pub T);
