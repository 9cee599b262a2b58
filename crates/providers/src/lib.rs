//! Clients for the external image and language model services, and the
//! Gemini quota tracker that guards them.
//!
//! Each client wraps a shared [`reqwest::Client`] and a base URL so tests
//! can point it at a local server. The pipeline talks to them through the
//! traits in [`traits`].

pub mod error;
pub mod gemini;
mod http;
pub mod openai;
pub mod poll;
pub mod quota;
pub mod railway;
pub mod traits;

pub use error::ProviderError;
