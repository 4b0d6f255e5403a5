use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use photoai_core::error::CoreError;
use photoai_falai::FalAiError;
use photoai_pipeline::PipelineError;
use photoai_storage::StorageError;
use serde_json::json;

/// Application-level error type for HTTP handlers.
///
/// Wraps the error enums of the lower layers and implements
/// [`IntoResponse`] to produce consistent `{"message", "code"}` bodies.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// A domain-level error from `photoai_core`.
    #[error(transparent)]
    Core(#[from] CoreError),

    /// A database error from sqlx.
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// The AI provider failed or refused.
    #[error(transparent)]
    Provider(#[from] FalAiError),

    /// Presigning an upload failed.
    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// Convenience type alias for handler return values.
pub type AppResult<T> = Result<T, AppError>;

impl From<PipelineError> for AppError {
    fn from(err: PipelineError) -> Self {
        match err {
            PipelineError::Core(e) => Self::Core(e),
            PipelineError::Provider(e) => Self::Provider(e),
            PipelineError::Database(e) => Self::Database(e),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            // --- CoreError variants ---
            AppError::Core(core) => match core {
                CoreError::NotFound { entity, id } => (
                    StatusCode::NOT_FOUND,
                    "NOT_FOUND",
                    format!("{entity} with id {id} not found"),
                ),
                CoreError::Validation(msg) => {
                    (StatusCode::LENGTH_REQUIRED, "VALIDATION_ERROR", msg.clone())
                }
                CoreError::ModelNotReady(_) => (
                    StatusCode::LENGTH_REQUIRED,
                    "MODEL_NOT_READY",
                    core.to_string(),
                ),
                CoreError::Unauthorized(msg) => {
                    (StatusCode::UNAUTHORIZED, "UNAUTHORIZED", msg.clone())
                }
                CoreError::Internal(msg) => {
                    tracing::error!(error = %msg, "Internal core error");
                    internal_error()
                }
            },

            // --- Database errors ---
            AppError::Database(err) => classify_sqlx_error(err),

            // --- Provider errors ---
            AppError::Provider(err) => match err {
                FalAiError::Unavailable(detail) => {
                    tracing::error!(error = %detail, "AI provider unavailable");
                    (
                        StatusCode::SERVICE_UNAVAILABLE,
                        "PROVIDER_UNAVAILABLE",
                        "The image provider is unavailable, try again later".to_string(),
                    )
                }
                FalAiError::Rejected { status, body } => {
                    tracing::warn!(status, body = %body, "AI provider rejected request");
                    (
                        StatusCode::BAD_GATEWAY,
                        "PROVIDER_REJECTED",
                        format!("The image provider rejected the request ({status})"),
                    )
                }
                FalAiError::MissingOutput(detail) => {
                    tracing::warn!(error = %detail, "AI provider returned no output");
                    (
                        StatusCode::BAD_GATEWAY,
                        "PROVIDER_REJECTED",
                        "The image provider returned no output".to_string(),
                    )
                }
            },

            AppError::Storage(err) => {
                tracing::error!(error = %err, "Object storage error");
                internal_error()
            }
        };

        let body = json!({
            "message": message,
            "code": code,
        });

        (status, axum::Json(body)).into_response()
    }
}

fn internal_error() -> (StatusCode, &'static str, String) {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        "INTERNAL_ERROR",
        "An internal error occurred".to_string(),
    )
}

/// Classify a sqlx error into an HTTP status, error code, and message.
///
/// - `RowNotFound` maps to 404.
/// - Unique constraint violations (constraint name starting with `uq_`) map to 409.
/// - Everything else maps to 500 with a sanitized message.
fn classify_sqlx_error(err: &sqlx::Error) -> (StatusCode, &'static str, String) {
    match err {
        sqlx::Error::RowNotFound => (
            StatusCode::NOT_FOUND,
            "NOT_FOUND",
            "Resource not found".to_string(),
        ),
        sqlx::Error::Database(db_err) => {
            // PostgreSQL unique constraint violation: error code 23505
            if db_err.code().as_deref() == Some("23505") {
                let constraint = db_err.constraint().unwrap_or("unknown");
                if constraint.starts_with("uq_") {
                    return (
                        StatusCode::CONFLICT,
                        "CONFLICT",
                        format!("Duplicate value violates unique constraint: {constraint}"),
                    );
                }
            }
            tracing::error!(error = %db_err, "Database error");
            internal_error()
        }
        other => {
            tracing::error!(error = %other, "Database error");
            internal_error()
        }
    }
}
