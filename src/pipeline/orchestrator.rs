//! Pipeline orchestrator — drives a session through all stages.
//!
//! Entity extraction and document classification are fanned out with
//! `tokio::join!` since both read only the transcript. Stage results land in
//! the session as soon as they exist, so a later failure never discards
//! earlier output.

use crate::config::ProviderProfile;
use crate::gateway::AiGateway;
use crate::models::{ConsultationSession, MedicalEntity, ReportType, StructuredReport};

use super::classify::{classify_documents, DEFAULT_REPORT_TYPE};
use super::extract::extract_entities;
use super::generate::{generate_report, merge_provider};
use super::transcribe::transcribe;
use super::{PipelineError, Stage};

/// Per-run options.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessOptions {
    /// Use the deep model tier for report generation.
    pub deep: bool,
    /// Pin the document type instead of taking the classifier's top pick.
    pub report_type: Option<ReportType>,
}

/// Drives consultations from raw audio to a validated structured report.
pub struct ConsultationPipeline {
    gateway: AiGateway,
    provider: Option<ProviderProfile>,
}

impl ConsultationPipeline {
    pub fn new(gateway: AiGateway, provider: Option<ProviderProfile>) -> Self {
        Self { gateway, provider }
    }

    pub fn gateway(&self) -> &AiGateway {
        &self.gateway
    }

    /// Run the full pipeline on a recording, filling `session` stage by
    /// stage. On failure the session keeps everything produced before the
    /// failing stage and records which stage died.
    pub async fn process_audio(
        &self,
        session: &mut ConsultationSession,
        audio: &[u8],
        mime_type: &str,
        opts: &ProcessOptions,
    ) -> Result<(), PipelineError> {
        session.reset();

        if audio.is_empty() {
            session.mark_failed(Stage::Transcription);
            return Err(PipelineError::EmptyAudio);
        }

        let transcription = match transcribe(&self.gateway, audio, mime_type).await {
            Ok(t) => t,
            Err(source) => {
                session.mark_failed(Stage::Transcription);
                return Err(PipelineError::Stage {
                    stage: Stage::Transcription,
                    source,
                });
            }
        };
        session.result.transcript = transcription.text;
        session.result.segments = transcription.segments;

        let (entities_res, classify_res) = tokio::join!(
            extract_entities(&self.gateway, &session.result.transcript),
            classify_documents(&self.gateway, &session.result.transcript),
        );
        // Whichever side succeeded lands in the session even when the other
        // failed; extraction is checked first so a double failure reports a
        // single deterministic stage.
        if let Ok(candidates) = &classify_res {
            session.result.candidate_types = candidates.clone();
        }
        let entities = match entities_res {
            Ok(entities) => entities,
            Err(source) => {
                session.mark_failed(Stage::EntityExtraction);
                return Err(PipelineError::Stage {
                    stage: Stage::EntityExtraction,
                    source,
                });
            }
        };
        session.result.entities = entities;
        if let Err(source) = classify_res {
            session.mark_failed(Stage::Classification);
            return Err(PipelineError::Stage {
                stage: Stage::Classification,
                source,
            });
        }

        let ty = opts
            .report_type
            .or_else(|| session.result.candidate_types.first().copied())
            .unwrap_or(DEFAULT_REPORT_TYPE);

        let report = match self
            .regenerate(
                &session.result.transcript,
                ty,
                &session.result.entities,
                opts.deep,
            )
            .await
        {
            Ok(report) => report,
            Err(e) => {
                session.mark_failed(Stage::Generation);
                return Err(e);
            }
        };
        session.apply_report(report);

        tracing::info!(
            report_type = %ty,
            entities = session.result.entities.len(),
            candidates = session.result.candidate_types.len(),
            "pipeline complete"
        );
        Ok(())
    }

    /// Generate a fresh report from already-processed material. The provider
    /// record from configuration is merged in after generation.
    pub async fn regenerate(
        &self,
        source_text: &str,
        ty: ReportType,
        entities: &[MedicalEntity],
        deep: bool,
    ) -> Result<StructuredReport, PipelineError> {
        let mut report = generate_report(&self.gateway, source_text, ty, entities, deep)
            .await
            .map_err(|source| PipelineError::Stage {
                stage: Stage::Generation,
                source,
            })?;
        if let Some(provider) = &self.provider {
            merge_provider(&mut report, provider);
        }
        Ok(report)
    }

    /// Regenerate the session's report in place, atomically: on failure the
    /// previous report and its validation stay untouched.
    pub async fn regenerate_session(
        &self,
        session: &mut ConsultationSession,
        ty: ReportType,
        deep: bool,
    ) -> Result<(), PipelineError> {
        let report = self
            .regenerate(
                &session.result.transcript,
                ty,
                &session.result.entities,
                deep,
            )
            .await?;
        session.apply_report(report);
        Ok(())
    }
}
