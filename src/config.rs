use serde::{Deserialize, Serialize};

use crate::gateway::RetryPolicy;

/// Application-level constants
pub const APP_NAME: &str = "MedZápis";
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Default `tracing` filter when `RUST_LOG` is unset.
pub fn default_log_filter() -> String {
    "medzapis=info,reqwest=warn".to_string()
}

/// Configuration for the hosted generation service.
#[derive(Clone)]
pub struct GatewayConfig {
    /// Base URL of the generateContent endpoint.
    pub base_url: String,
    /// API key appended to each request. Never logged.
    pub api_key: String,
    /// Model used for routine pipeline calls (transcription, extraction, classification).
    pub fast_model: String,
    /// Model used when the user requests a thorough generation pass.
    pub deep_model: String,
    /// Backoff policy for rate-limit-class failures.
    pub retry: RetryPolicy,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            base_url: "https://generativelanguage.googleapis.com".to_string(),
            api_key: String::new(),
            fast_model: "gemini-2.5-flash".to_string(),
            deep_model: "gemini-2.5-pro".to_string(),
            retry: RetryPolicy::default(),
        }
    }
}

impl GatewayConfig {
    /// Build a config from environment variables, falling back to defaults.
    ///
    /// Recognized: `MEDZAPIS_API_KEY` (or `GEMINI_API_KEY`), `MEDZAPIS_BASE_URL`,
    /// `MEDZAPIS_FAST_MODEL`, `MEDZAPIS_DEEP_MODEL`.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            base_url: std::env::var("MEDZAPIS_BASE_URL").unwrap_or(defaults.base_url),
            api_key: std::env::var("MEDZAPIS_API_KEY")
                .or_else(|_| std::env::var("GEMINI_API_KEY"))
                .unwrap_or_default(),
            fast_model: std::env::var("MEDZAPIS_FAST_MODEL").unwrap_or(defaults.fast_model),
            deep_model: std::env::var("MEDZAPIS_DEEP_MODEL").unwrap_or(defaults.deep_model),
            retry: RetryPolicy::default(),
        }
    }
}

/// Provider (clinician/practice) record supplied by the hosting application.
///
/// Merged into a generated report after the AI call — the pipeline never asks
/// the model to produce these fields.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProviderProfile {
    /// Clinician or practice name as printed on documents.
    pub name: String,
    /// Practice address.
    pub address: String,
    /// Facility registration identifier (IČZ).
    pub registration_id: String,
    /// Site registration identifier (IČP).
    pub site_id: String,
    /// Specialization code (odbornost).
    pub specialty_code: String,
    /// Phone or e-mail contact.
    pub contact: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_points_at_hosted_endpoint() {
        let config = GatewayConfig::default();
        assert!(config.base_url.starts_with("https://"));
        assert!(config.api_key.is_empty());
        assert_ne!(config.fast_model, config.deep_model);
    }

    #[test]
    fn default_retry_policy_is_three_attempts() {
        let config = GatewayConfig::default();
        assert_eq!(config.retry.max_attempts, 3);
    }

    #[test]
    fn app_version_matches_cargo() {
        assert_eq!(APP_VERSION, env!("CARGO_PKG_VERSION"));
    }

    #[test]
    fn provider_profile_serializes_roundtrip() {
        let provider = ProviderProfile {
            name: "MUDr. Jana Nováková".into(),
            address: "Dlouhá 12, Praha 1".into(),
            registration_id: "12345678".into(),
            site_id: "87654321".into(),
            specialty_code: "001".into(),
            contact: "ordinace@example.cz".into(),
        };
        let json = serde_json::to_string(&provider).unwrap();
        let back: ProviderProfile = serde_json::from_str(&json).unwrap();
        assert_eq!(provider, back);
    }
}
