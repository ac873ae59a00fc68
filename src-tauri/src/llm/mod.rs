//! Vision analysis: turns a screenshot plus a mode into text.
//!
//! The orchestrator talks to the `Analyzer` trait; `OpenAiClient` is the
//! production implementation.

pub mod openai;
pub mod prompts;

pub use openai::OpenAiClient;

use crate::capture::EncodeError;
use crate::session::AnalysisMode;
use image::DynamicImage;
use std::future::Future;

/// A remote (or fake) vision model.
pub trait Analyzer: Send + Sync + 'static {
    /// Analyze one frame under `mode`. Exactly one attempt, no retries.
    fn analyze(
        &self,
        image: &DynamicImage,
        mode: &AnalysisMode,
    ) -> impl Future<Output = Result<String, AnalysisError>> + Send;

    /// Check that the service is reachable with the configured credentials.
    /// Returns a short model label for the status indicator.
    fn check_access(&self) -> impl Future<Output = Result<String, AnalysisError>> + Send;
}

/// Per-cycle analysis failures. The `Display` text is shown to the user.
#[derive(Debug, thiserror::Error)]
pub enum AnalysisError {
    #[error("OpenAI rejected the API key ({0}). Check OPENAI_API_KEY.")]
    Auth(String),

    #[error("OpenAI quota exhausted. Check your plan and billing details; this is not a bug.")]
    Quota,

    #[error("OpenAI rate limit hit: {0}")]
    RateLimited(String),

    #[error("Network error: {0}")]
    Network(String),

    #[error("No response from OpenAI within {0}s")]
    Timeout(u64),

    #[error("OpenAI API error {status}: {message}")]
    Api { status: u16, message: String },

    #[error("OpenAI returned an empty response")]
    EmptyResponse,

    #[error("Failed to prepare screenshot: {0}")]
    Encoding(#[from] EncodeError),
}
