//! Consultation pipeline — audio to structured, validated report.
//!
//! Stage order: transcription → {entity extraction ∥ document
//! classification} → structured generation → validation. The fan-out pair
//! is issued concurrently (both depend only on the transcript); everything
//! else is sequential.

pub mod classify;
pub mod extract;
pub mod generate;
pub mod orchestrator;
pub mod prompt;
pub mod transcribe;

pub use classify::{classify_documents, DEFAULT_REPORT_TYPE};
pub use extract::extract_entities;
pub use generate::{generate_report, merge_provider, schema_template};
pub use orchestrator::{ConsultationPipeline, ProcessOptions};
pub use transcribe::{transcribe, Transcription};

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::gateway::GatewayError;

/// Pipeline stage, for failure reporting and session state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    Transcription,
    EntityExtraction,
    Classification,
    Generation,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Transcription => "transcription",
            Self::EntityExtraction => "entity extraction",
            Self::Classification => "classification",
            Self::Generation => "generation",
        };
        write!(f, "{name}")
    }
}

/// Errors from the consultation pipeline.
///
/// Malformed model output is never an error here — it is absorbed at the
/// gateway's decode boundary. A `Stage` error means the gateway call itself
/// failed (after its own rate-limit retries) and the session is terminal.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("{stage} stage failed: {source}")]
    Stage {
        stage: Stage,
        #[source]
        source: GatewayError,
    },

    #[error("empty audio payload")]
    EmptyAudio,
}

impl PipelineError {
    pub fn stage(&self) -> Option<Stage> {
        match self {
            Self::Stage { stage, .. } => Some(*stage),
            Self::EmptyAudio => None,
        }
    }
}
