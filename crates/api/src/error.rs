use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use payroll_completion::CompletionError;
use payroll_core::error::CoreError;
use payroll_opendata::PayrollApiError;
use serde_json::json;

/// Application-level error type for HTTP handlers.
///
/// Wraps [`CoreError`] for domain errors and adds HTTP-specific variants.
/// Implements [`IntoResponse`] to produce consistent JSON error responses.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// A domain-level error from `payroll_core`.
    #[error(transparent)]
    Core(#[from] CoreError),

    /// The server is missing configuration required for this request.
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// An upstream service failed or returned something unusable.
    #[error("Upstream error: {0}")]
    Upstream(String),
}

/// Convenience type alias for handler return values.
pub type AppResult<T> = Result<T, AppError>;

impl From<PayrollApiError> for AppError {
    fn from(err: PayrollApiError) -> Self {
        tracing::warn!(error = %err, "Payroll fetch failed");
        AppError::Upstream(err.user_message().to_string())
    }
}

impl From<CompletionError> for AppError {
    fn from(err: CompletionError) -> Self {
        tracing::warn!(error = %err, "Completion request failed");
        AppError::Upstream(err.user_message())
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            // --- CoreError variants ---
            AppError::Core(core) => match core {
                CoreError::Validation(msg) => {
                    (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone())
                }
            },

            // --- HTTP-specific errors ---
            AppError::Configuration(msg) => {
                tracing::error!(error = %msg, "Server misconfigured");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "CONFIGURATION_ERROR",
                    msg.clone(),
                )
            }
            AppError::Upstream(msg) => (StatusCode::BAD_GATEWAY, "UPSTREAM_ERROR", msg.clone()),
        };

        let body = json!({
            "error": message,
            "code": code,
        });

        (status, axum::Json(body)).into_response()
    }
}
