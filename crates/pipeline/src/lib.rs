//! Ad generation orchestration.
//!
//! [`AdPipeline`] turns an [`AdRequest`] into a finished PNG: brief and
//! copy, layout and color selection, then the provider fallback chain or
//! one of the explicit modes. Providers are injected as trait objects, so
//! any of them may be missing.

pub mod compose;
pub mod error;
pub mod pipeline;
pub mod request;

pub use error::PipelineError;
pub use pipeline::AdPipeline;
pub use request::{AdRequest, AdResult, AdSource, CompositeRequest, CompositeResult, GenerationMode};
