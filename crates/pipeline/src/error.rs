use adforge_compositor::CompositeError;
use adforge_core::error::CoreError;
use adforge_providers::ProviderError;

/// Errors that end an ad generation request.
///
/// Provider failures inside the fallback chain never surface here; only
/// the last step's failure, or a failure outside the chain, does.
#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    #[error(transparent)]
    Core(#[from] CoreError),

    /// The product image could not be downloaded or decoded.
    #[error("Product image unavailable: {0}")]
    Product(#[source] CompositeError),

    #[error(transparent)]
    Composite(#[from] CompositeError),

    #[error(transparent)]
    Provider(#[from] ProviderError),

    /// The requested mode needs a provider that is not configured.
    #[error("{0} is not configured")]
    NotConfigured(&'static str),

    #[error("Background task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}
