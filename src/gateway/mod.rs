//! AI Gateway — the single seam to the hosted generation service.
//!
//! Everything the pipeline asks of the model goes through `AiGateway`:
//! tier→model resolution, rate-limit backoff, and the best-effort JSON
//! decode that makes every downstream stage tolerant of malformed model
//! output by construction.

pub mod client;
pub mod decode;
#[allow(clippy::module_inception)]
pub mod gateway;
pub mod retry;

pub use client::{GeminiClient, GenerativeClient, MockClient, Part, RecordedCall};
pub use decode::{best_effort_decode, lenient_array};
pub use gateway::{AiGateway, GenerateOptions, ModelTier};
pub use retry::RetryPolicy;

use thiserror::Error;

/// Errors from the generation service boundary.
#[derive(Debug, Clone, Error)]
pub enum GatewayError {
    /// 429 / RESOURCE_EXHAUSTED class failure. The only retryable kind.
    #[error("generation service rate limited")]
    RateLimited,

    #[error("cannot reach generation service at {0}")]
    Connection(String),

    #[error("generation service rejected credentials: {0}")]
    Auth(String),

    #[error("generation service returned error (status {status}): {body}")]
    Api { status: u16, body: String },

    #[error("HTTP client error: {0}")]
    Http(String),

    #[error("generation service returned no candidates")]
    EmptyResponse,
}

impl GatewayError {
    /// Only rate-limit-class failures are retried; everything else
    /// propagates immediately.
    pub fn is_rate_limited(&self) -> bool {
        matches!(self, Self::RateLimited)
    }
}
