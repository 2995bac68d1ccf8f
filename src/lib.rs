//! MedZápis — voice-to-document pipeline for Czech outpatient practices.
//!
//! Takes a recorded consultation and turns it into a structured, validated
//! clinical document: diarized transcription, concurrent entity extraction
//! and document-type classification, schema-per-type report generation,
//! rule-based validation, and a clinician review loop over the extracted
//! entities.
//!
//! The crate is a library; the hosting application owns persistence, UI and
//! key management. Entry points:
//!
//! - [`pipeline::ConsultationPipeline`] — drives a session end to end,
//! - [`models::ConsultationSession`] — the state the review UI binds to,
//! - [`gateway::AiGateway`] over a [`gateway::GenerativeClient`] — the only
//!   path to the generation service (swap in [`gateway::MockClient`] for
//!   tests).

pub mod config;
pub mod gateway;
pub mod models;
pub mod pipeline;
pub mod reconcile;
pub mod validation;

pub use config::{GatewayConfig, ProviderProfile};
pub use gateway::{AiGateway, GatewayError, GeminiClient};
pub use models::{ConsultationSession, MedicalEntity, ReportData, ReportType, StructuredReport};
pub use pipeline::{ConsultationPipeline, PipelineError, ProcessOptions};
pub use reconcile::{apply_edits, review_entities, EntityEdit};
pub use validation::{validate, ValidationResult};

/// Install the default `tracing` subscriber. `RUST_LOG` overrides the
/// built-in filter. Safe to call more than once; later calls are no-ops.
pub fn init_tracing() {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(config::default_log_filter()));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .try_init();
}
