use adforge_compositor::CompositeError;
use adforge_core::error::CoreError;
use adforge_pipeline::PipelineError;
use adforge_providers::ProviderError;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;

/// Application-level error type for HTTP handlers.
///
/// Wraps the domain, pipeline and provider errors and adds HTTP-specific
/// variants. Implements [`IntoResponse`] to produce consistent JSON error
/// responses.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error(transparent)]
    Core(#[from] CoreError),

    #[error(transparent)]
    Pipeline(#[from] PipelineError),

    #[error(transparent)]
    Provider(#[from] ProviderError),

    /// A database error from sqlx.
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// A bad request with a human-readable message.
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// An internal error with a human-readable message.
    #[error("Internal error: {0}")]
    InternalError(String),
}

/// Convenience type alias for handler return values.
pub type AppResult<T> = Result<T, AppError>;

type Classified = (StatusCode, &'static str, String);

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            AppError::Core(core) => classify_core_error(core),
            AppError::Pipeline(err) => classify_pipeline_error(err),
            AppError::Provider(err) => classify_provider_error(err),
            AppError::Database(err) => classify_sqlx_error(err),
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, "BAD_REQUEST", msg.clone()),
            AppError::InternalError(msg) => internal(msg),
        };

        let body = json!({
            "error": message,
            "code": code,
        });

        (status, axum::Json(body)).into_response()
    }
}

fn internal(detail: &dyn std::fmt::Display) -> Classified {
    tracing::error!(error = %detail, "Internal error");
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        "INTERNAL_ERROR",
        "An internal error occurred".to_string(),
    )
}

fn classify_core_error(err: &CoreError) -> Classified {
    match err {
        CoreError::NotFound { entity, id } => (
            StatusCode::NOT_FOUND,
            "NOT_FOUND",
            format!("{entity} with id {id} not found"),
        ),
        CoreError::Validation(msg) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone()),
        CoreError::Internal(msg) => internal(msg),
    }
}

fn classify_pipeline_error(err: &PipelineError) -> Classified {
    match err {
        PipelineError::Core(core) => classify_core_error(core),
        PipelineError::Product(_) => (StatusCode::BAD_REQUEST, "IMAGE_UNAVAILABLE", err.to_string()),
        PipelineError::Composite(composite) => classify_composite_error(composite),
        PipelineError::Provider(provider) => classify_provider_error(provider),
        PipelineError::NotConfigured(_) => {
            (StatusCode::SERVICE_UNAVAILABLE, "NOT_CONFIGURED", err.to_string())
        }
        PipelineError::Task(e) => internal(e),
    }
}

/// Caller-supplied images that cannot be loaded are the caller's problem;
/// everything else is ours.
fn classify_composite_error(err: &CompositeError) -> Classified {
    match err {
        CompositeError::Fetch { .. }
        | CompositeError::FetchStatus { .. }
        | CompositeError::TooLarge { .. }
        | CompositeError::DataUrl(_)
        | CompositeError::Base64(_)
        | CompositeError::Image(_) => (StatusCode::BAD_REQUEST, "IMAGE_UNAVAILABLE", err.to_string()),
        other => internal(other),
    }
}

fn classify_provider_error(err: &ProviderError) -> Classified {
    match err {
        ProviderError::Core(core) => classify_core_error(core),
        ProviderError::Database(db) => classify_sqlx_error(db),
        ProviderError::QuotaExhausted { .. } => {
            (StatusCode::TOO_MANY_REQUESTS, "QUOTA_EXHAUSTED", err.to_string())
        }
        ProviderError::NotConfigured(_) => {
            (StatusCode::SERVICE_UNAVAILABLE, "NOT_CONFIGURED", err.to_string())
        }
        other => {
            tracing::warn!(error = %other, "Upstream provider failed");
            (StatusCode::BAD_GATEWAY, "UPSTREAM_ERROR", other.to_string())
        }
    }
}

/// Classify a sqlx error into an HTTP status, error code, and message.
///
/// - `RowNotFound` maps to 404.
/// - Everything else maps to 500 with a sanitized message.
fn classify_sqlx_error(err: &sqlx::Error) -> Classified {
    match err {
        sqlx::Error::RowNotFound => (
            StatusCode::NOT_FOUND,
            "NOT_FOUND",
            "Resource not found".to_string(),
        ),
        other => {
            tracing::error!(error = %other, "Database error");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                "INTERNAL_ERROR",
                "An internal error occurred".to_string(),
            )
        }
    }
}
