//! In-memory consultation session — the unit of work the review UI binds to.
//!
//! A session accumulates pipeline output stage by stage. On a stage failure
//! everything produced so far stays in place (a transcript is worth keeping
//! even when generation died), the state records which stage failed, and the
//! next successful run starts from a clean reset.

use serde::{Deserialize, Serialize};

use crate::models::{MedicalEntity, ReportType, StructuredReport, TranscriptSegment};
use crate::pipeline::Stage;
use crate::reconcile::{apply_edits, EntityEdit};
use crate::validation::{validate, ValidationResult};

/// Everything the pipeline has produced for one recording so far.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProcessingResult {
    /// Joined plain-text transcript. Editable in the UI; edits do not
    /// propagate back into `segments`, so segment timings describe the
    /// original recording, not the edited text.
    pub transcript: String,
    pub segments: Vec<TranscriptSegment>,
    pub entities: Vec<MedicalEntity>,
    /// Classifier suggestions, best first. Advisory.
    pub candidate_types: Vec<ReportType>,
    pub report: Option<StructuredReport>,
}

impl ProcessingResult {
    /// Replace the editable transcript text with a manual correction.
    ///
    /// Known limitation: segment timings and speaker boundaries are not
    /// recomputed, so playback highlighting refers to the original
    /// recording, not the edited text.
    pub fn set_transcript(&mut self, text: impl Into<String>) {
        self.transcript = text.into();
    }
}

/// Lifecycle of a session.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", content = "stage", rename_all = "snake_case")]
pub enum SessionState {
    #[default]
    Empty,
    /// A report exists and has been validated.
    Ready,
    /// The named stage failed; earlier stages' output is retained.
    Failed(Stage),
}

/// One consultation under review.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ConsultationSession {
    pub result: ProcessingResult,
    pub state: SessionState,
    /// Verdict for the current report; recomputed on every report write.
    pub validation: Option<ValidationResult>,
}

impl ConsultationSession {
    pub fn new() -> Self {
        Self::default()
    }

    /// Drop all accumulated output. Called at the start of each pipeline run
    /// so a rerun never mixes stages from two recordings.
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Install a report, validate it, and mark the session ready. The single
    /// write path for reports — validation can never go stale.
    pub fn apply_report(&mut self, report: StructuredReport) {
        self.validation = Some(validate(&report));
        self.result.report = Some(report);
        self.state = SessionState::Ready;
    }

    pub fn mark_failed(&mut self, stage: Stage) {
        tracing::warn!(%stage, "session marked failed");
        self.state = SessionState::Failed(stage);
    }

    /// Apply a clinician edit batch to the entity list and return the list
    /// as it stands afterwards. The current report is untouched — it
    /// reflects the entities only after an explicit regeneration.
    pub fn update_entities(&mut self, edits: &[EntityEdit]) -> &[MedicalEntity] {
        apply_edits(&mut self.result.entities, edits);
        &self.result.entities
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{EntityCategory, Provenance, ReportData};

    #[test]
    fn new_session_is_empty() {
        let session = ConsultationSession::new();
        assert_eq!(session.state, SessionState::Empty);
        assert!(session.result.report.is_none());
        assert!(session.validation.is_none());
    }

    #[test]
    fn apply_report_validates_and_marks_ready() {
        let mut session = ConsultationSession::new();
        session.apply_report(StructuredReport::new(ReportData::empty(
            ReportType::AmbulatoryRecord,
        )));

        assert_eq!(session.state, SessionState::Ready);
        let validation = session.validation.as_ref().unwrap();
        assert!(!validation.is_valid, "empty data must not validate");
        assert!(session.result.report.is_some());
    }

    #[test]
    fn failure_keeps_earlier_output() {
        let mut session = ConsultationSession::new();
        session.result.transcript = "Lékař: Dobrý den.".to_string();
        session.result.entities = vec![MedicalEntity::ai(EntityCategory::Symptom, "kašel")];

        session.mark_failed(Stage::Generation);

        assert_eq!(session.state, SessionState::Failed(Stage::Generation));
        assert_eq!(session.result.transcript, "Lékař: Dobrý den.");
        assert_eq!(session.result.entities.len(), 1);
    }

    #[test]
    fn reset_clears_everything() {
        let mut session = ConsultationSession::new();
        session.result.transcript = "text".to_string();
        session.mark_failed(Stage::Transcription);

        session.reset();

        assert_eq!(session, ConsultationSession::default());
    }

    #[test]
    fn transcript_edit_leaves_segments_alone() {
        let mut session = ConsultationSession::new();
        session.result.segments = vec![crate::models::TranscriptSegment {
            speaker: crate::models::Speaker::Doctor,
            text: "Jak se máte?".into(),
            start: 0.0,
            end: 2.0,
        }];
        session.result.set_transcript("Lékař: Jak se vede?");

        assert_eq!(session.result.transcript, "Lékař: Jak se vede?");
        assert_eq!(session.result.segments[0].text, "Jak se máte?");
    }

    #[test]
    fn entity_edits_do_not_touch_the_report() {
        let mut session = ConsultationSession::new();
        session.apply_report(StructuredReport::new(ReportData::empty(
            ReportType::Referral,
        )));
        let report_before = session.result.report.clone();

        let entities = session.update_entities(&[EntityEdit::Add {
            category: EntityCategory::Medication,
            text: "Paralen 500 mg".into(),
        }]);

        assert_eq!(entities.len(), 1);
        assert_eq!(entities[0].provenance, Provenance::Manual);
        assert_eq!(session.result.report, report_before);
    }
}
