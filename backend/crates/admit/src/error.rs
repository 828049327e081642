//! Admit Card Error Types
//!
//! This module provides admit-card specific error variants that integrate
//! with the unified `kernel::error::AppError` system. The user-facing
//! messages are shown verbatim by the query page.

use crate::domain::value_objects::InputError;
use axum::http::{HeaderValue, header};
use axum::response::{IntoResponse, Response};
use kernel::error::{app_error::AppError, kind::ErrorKind};
use std::time::Duration;
use thiserror::Error;

/// Admit-card result type alias
pub type AdmitResult<T> = Result<T, AdmitError>;

/// Admit-card error variants
///
/// A lookup that finds nothing is not an error; see
/// [`crate::domain::entities::LookupOutcome`].
#[derive(Debug, Error)]
pub enum AdmitError {
    /// Missing or malformed `name` / `id`
    #[error("Invalid request: {0}")]
    InvalidInput(#[from] InputError),

    /// Client exceeded one of its quotas
    #[error("Rate limit exceeded, retry after {retry_after:?}")]
    RateLimited { retry_after: Duration },

    /// Download requested without a `path` parameter
    #[error("Missing download path")]
    MissingPath,

    /// Download path is not strictly below the storage root
    #[error("Download path outside storage root")]
    Forbidden,

    /// Authorized path names no file
    #[error("Admit card file not found")]
    FileNotFound,

    /// Storage I/O failure
    #[error("Storage error: {0}")]
    Storage(#[from] std::io::Error),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl AdmitError {
    /// Get the ErrorKind for this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            AdmitError::InvalidInput(_) | AdmitError::MissingPath => ErrorKind::BadRequest,
            AdmitError::RateLimited { .. } => ErrorKind::TooManyRequests,
            AdmitError::Forbidden => ErrorKind::Forbidden,
            AdmitError::FileNotFound => ErrorKind::NotFound,
            AdmitError::Storage(_) | AdmitError::Internal(_) => ErrorKind::InternalServerError,
        }
    }

    /// Message shown to the user
    pub fn user_message(&self) -> String {
        match self {
            AdmitError::InvalidInput(_) => "无效的请求参数".to_string(),
            AdmitError::RateLimited { retry_after } => {
                format!("操作频繁，请{}后重试", format_wait(*retry_after))
            }
            AdmitError::MissingPath => "缺少文件路径参数".to_string(),
            AdmitError::Forbidden => "非法文件路径".to_string(),
            AdmitError::FileNotFound => "文件不存在".to_string(),
            AdmitError::Storage(_) | AdmitError::Internal(_) => "服务器内部错误".to_string(),
        }
    }

    /// Log the error with appropriate level
    fn log(&self) {
        let kind = self.kind();
        if kind.is_server_error() {
            tracing::error!(kind = %kind, error = %self, "Admit card request failed");
        } else {
            tracing::debug!(kind = %kind, error = %self, "Admit card request rejected");
        }
    }
}

/// Render a wait like `42s`, `2m5s` or `13h59m30s`, rounded to whole seconds
pub fn format_wait(wait: Duration) -> String {
    let mut secs = wait.as_secs();
    if wait.subsec_millis() >= 500 {
        secs += 1;
    }

    let (hours, minutes, seconds) = (secs / 3600, secs % 3600 / 60, secs % 60);
    if hours > 0 {
        format!("{hours}h{minutes}m{seconds}s")
    } else if minutes > 0 {
        format!("{minutes}m{seconds}s")
    } else {
        format!("{seconds}s")
    }
}

/// `Retry-After` value in whole seconds, rounded up, at least 1
fn retry_after_secs(wait: Duration) -> u64 {
    let secs = wait.as_secs() + u64::from(wait.subsec_nanos() > 0);
    secs.max(1)
}

impl From<AdmitError> for AppError {
    fn from(err: AdmitError) -> Self {
        let message = err.user_message();
        match err {
            AdmitError::Storage(e) => AppError::from(e),
            AdmitError::InvalidInput(input) => {
                let action = match input {
                    InputError::Malformed => "请填写姓名和身份证号",
                    _ => "请检查姓名和身份证号的格式",
                };
                AppError::bad_request(message).with_action(action)
            }
            AdmitError::MissingPath => AppError::bad_request(message),
            AdmitError::RateLimited { .. } => AppError::too_many_requests(message),
            AdmitError::Forbidden => AppError::forbidden(message),
            AdmitError::FileNotFound => AppError::not_found(message),
            AdmitError::Internal(_) => AppError::internal(message),
        }
    }
}

impl IntoResponse for AdmitError {
    fn into_response(self) -> Response {
        self.log();
        let retry_after = match &self {
            AdmitError::RateLimited { retry_after } => Some(retry_after_secs(*retry_after)),
            _ => None,
        };

        let mut response = AppError::from(self).into_response();
        if let Some(secs) = retry_after {
            response
                .headers_mut()
                .insert(header::RETRY_AFTER, HeaderValue::from(secs));
        }
        response
    }
}
