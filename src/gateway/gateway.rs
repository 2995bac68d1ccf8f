use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use super::client::{GenerativeClient, Part};
use super::decode::best_effort_decode;
use super::GatewayError;
use crate::config::GatewayConfig;

/// Which model class to use for a call.
///
/// `Deep` is reserved for generation steps the user explicitly flagged
/// thorough; everything else runs on `Fast`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ModelTier {
    Fast,
    Deep,
}

/// Per-call options for `AiGateway::generate`.
#[derive(Debug, Clone, Copy)]
pub struct GenerateOptions {
    pub json_mode: bool,
    pub tier: ModelTier,
}

impl GenerateOptions {
    pub fn json(tier: ModelTier) -> Self {
        Self {
            json_mode: true,
            tier,
        }
    }

    pub fn prose(tier: ModelTier) -> Self {
        Self {
            json_mode: false,
            tier,
        }
    }
}

/// The pipeline's single point of access to the generation service.
///
/// Explicitly constructed and explicitly passed — there is no process-wide
/// client state. Applies the rate-limit backoff policy and resolves model
/// tiers to configured model names.
pub struct AiGateway {
    client: Arc<dyn GenerativeClient>,
    config: GatewayConfig,
}

impl AiGateway {
    pub fn new(client: Arc<dyn GenerativeClient>, config: GatewayConfig) -> Self {
        Self { client, config }
    }

    fn model_for(&self, tier: ModelTier) -> &str {
        match tier {
            ModelTier::Fast => &self.config.fast_model,
            ModelTier::Deep => &self.config.deep_model,
        }
    }

    /// Call the generation service, retrying only rate-limit-class failures
    /// with exponential backoff. Non-JSON-mode calls return the prose
    /// unchanged.
    pub async fn generate(
        &self,
        system: &str,
        parts: &[Part],
        opts: GenerateOptions,
    ) -> Result<String, GatewayError> {
        let model = self.model_for(opts.tier);
        let retry = &self.config.retry;

        let mut attempt = 1u32;
        loop {
            match self
                .client
                .generate(model, system, parts, opts.json_mode)
                .await
            {
                Ok(text) => return Ok(text),
                Err(e) if e.is_rate_limited() && attempt < retry.max_attempts => {
                    let delay = retry.delay_for(attempt);
                    tracing::warn!(
                        attempt,
                        max_attempts = retry.max_attempts,
                        delay_ms = delay.as_millis() as u64,
                        model,
                        "rate limited, backing off"
                    );
                    tokio::time::sleep(delay).await;
                    attempt += 1;
                }
                Err(e) => return Err(e),
            }
        }
    }

    /// JSON-mode call with best-effort decode: `Ok(parsed)` on success,
    /// `Ok(fallback)` when the model output cannot be repaired into valid
    /// JSON, `Err` only when the gateway call itself failed.
    pub async fn generate_json<T: DeserializeOwned>(
        &self,
        system: &str,
        parts: &[Part],
        tier: ModelTier,
        fallback: T,
    ) -> Result<T, GatewayError> {
        let raw = self
            .generate(system, parts, GenerateOptions::json(tier))
            .await?;
        Ok(best_effort_decode(&raw, fallback))
    }
}
