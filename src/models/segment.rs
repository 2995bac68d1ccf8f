use std::fmt;

use serde::{Deserialize, Serialize};

/// Speaker role in a diarized consultation.
///
/// The diarization prompt asks for the Czech labels the review UI renders
/// (`Lékař`, `Pacient`, `Sestra`); aliases cover the spellings smaller models
/// tend to emit instead.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Speaker {
    #[serde(
        rename = "Lékař",
        alias = "lékař",
        alias = "Lekar",
        alias = "lekar",
        alias = "Doktor",
        alias = "doktor",
        alias = "Doctor",
        alias = "DOCTOR"
    )]
    Doctor,
    #[serde(
        rename = "Pacient",
        alias = "pacient",
        alias = "Pacientka",
        alias = "pacientka",
        alias = "Patient",
        alias = "PATIENT"
    )]
    Patient,
    #[serde(
        rename = "Sestra",
        alias = "sestra",
        alias = "Zdravotní sestra",
        alias = "Nurse",
        alias = "NURSE"
    )]
    Nurse,
}

impl Speaker {
    /// Czech label used in the joined transcript and the review UI.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Doctor => "Lékař",
            Self::Patient => "Pacient",
            Self::Nurse => "Sestra",
        }
    }
}

impl fmt::Display for Speaker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// One diarized utterance with coarse timing in seconds.
///
/// Produced once by the transcription stage and immutable afterwards. Manual
/// corrections edit the derived plain-text transcript only; segment timings
/// are not recomputed (see `ProcessingResult::set_transcript`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TranscriptSegment {
    pub speaker: Speaker,
    pub text: String,
    /// Utterance start, seconds from the beginning of the recording.
    pub start: f64,
    /// Utterance end, seconds from the beginning of the recording.
    pub end: f64,
}

impl TranscriptSegment {
    /// Timing invariant: non-negative, `start <= end`.
    pub fn has_valid_timing(&self) -> bool {
        self.start >= 0.0 && self.end >= 0.0 && self.start <= self.end
    }

    pub fn duration(&self) -> f64 {
        (self.end - self.start).max(0.0)
    }
}

/// Join diarized segments into the plain-text transcript shown for review:
/// `"{speaker}: {text}"` lines separated by blank lines.
pub fn join_transcript(segments: &[TranscriptSegment]) -> String {
    segments
        .iter()
        .map(|s| format!("{}: {}", s.speaker, s.text))
        .collect::<Vec<_>>()
        .join("\n\n")
}
