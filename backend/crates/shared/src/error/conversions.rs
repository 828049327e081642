//! Error conversions - From implementations for common error types
//!
//! Provides automatic conversion from common error types to [`AppError`],
//! and the HTTP rendering of [`AppError`] when the `axum` feature is on.

use super::app_error::AppError;
use super::kind::ErrorKind;

// ============================================================================
// Standard library conversions
// ============================================================================

impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        match err.kind() {
            std::io::ErrorKind::NotFound => AppError::not_found("文件不存在").with_source(err),
            _ => AppError::new(ErrorKind::InternalServerError, "服务器内部错误").with_source(err),
        }
    }
}

// ============================================================================
// Axum conversions (feature-gated)
// ============================================================================

#[cfg(feature = "axum")]
impl axum::response::IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        use axum::Json;
        use axum::http::StatusCode;

        let status =
            StatusCode::from_u16(self.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

        // The front end reads `error` and shows it verbatim
        let mut body = serde_json::json!({
            "error": self.message(),
            "status": self.status_code(),
            "title": self.kind().as_str(),
        });
        if let Some(action) = self.action() {
            body["action"] = serde_json::Value::from(action);
        }

        (status, Json(body)).into_response()
    }
}
