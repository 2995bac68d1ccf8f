//! Entity review workflow — clinician edits and plausibility checks.
//!
//! Edits are applied as an ordered batch against the session's entity list;
//! anything touched by hand is stamped `Provenance::Manual` so the generator
//! treats it as confirmed fact. The review pass is heuristic and advisory —
//! it never blocks, it only surfaces suspicious entries (a symptom filed as
//! medication, duplicates, stub texts) for the clinician to resolve.

use std::collections::HashSet;
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::models::{EntityCategory, MedicalEntity, Provenance};
use crate::validation::Severity;

/// One clinician edit against the entity list. Indices refer to the list as
/// it stands when the batch is applied; batches apply in order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum EntityEdit {
    Add {
        category: EntityCategory,
        text: String,
    },
    Update {
        index: usize,
        #[serde(default)]
        category: Option<EntityCategory>,
        #[serde(default)]
        text: Option<String>,
    },
    Remove {
        index: usize,
    },
}

/// Apply an edit batch to an entity list.
///
/// Out-of-range indices are logged and skipped rather than failing the whole
/// batch — concurrent UI state can be slightly stale. Untouched entities keep
/// their provenance and relative order.
pub fn apply_edits(entities: &mut Vec<MedicalEntity>, edits: &[EntityEdit]) {
    for edit in edits {
        match edit {
            EntityEdit::Add { category, text } => {
                entities.push(MedicalEntity::manual(*category, text));
            }
            EntityEdit::Update {
                index,
                category,
                text,
            } => match entities.get_mut(*index) {
                Some(entity) => {
                    if let Some(category) = category {
                        entity.category = *category;
                    }
                    if let Some(text) = text {
                        entity.text = text.clone();
                    }
                    entity.provenance = Provenance::Manual;
                }
                None => tracing::warn!(index, "update skipped, entity index out of range"),
            },
            EntityEdit::Remove { index } => {
                if *index < entities.len() {
                    entities.remove(*index);
                } else {
                    tracing::warn!(index, "remove skipped, entity index out of range");
                }
            }
        }
    }
}

/// One review finding, addressed to an entity by its current index.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntityIssue {
    pub index: usize,
    pub message: String,
    pub severity: Severity,
}

/// Common clinical abbreviations that are legitimately short.
const ABBREVIATIONS: &[&str] = &[
    "DM", "IM", "TK", "TF", "CT", "MR", "RTG", "EKG", "CRP", "ICHS", "CMP",
];

static SYMPTOM_TERMS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)\b(bolest|bolí|únava|kašel|teplota|horečka|závrať|nevolnost|dušnost|zvracení|průjem|svědění|pálení)\b",
    )
    .expect("symptom term pattern")
});

static DOSE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\d+\s*(mg|ml|µg|ug|g|iu|tbl|tablet)").expect("dose pattern")
});

fn is_abbreviation(text: &str) -> bool {
    ABBREVIATIONS.iter().any(|a| a.eq_ignore_ascii_case(text))
}

/// Heuristic plausibility pass over the entity list.
///
/// Flags miscategorized entries (symptom vocabulary filed under
/// `MEDICATION`, dosage patterns filed under `SYMPTOM`), case-insensitive
/// duplicates, and degenerate texts. Findings never remove or change
/// anything.
pub fn review_entities(entities: &[MedicalEntity]) -> Vec<EntityIssue> {
    let mut issues = Vec::new();
    let mut seen: HashSet<String> = HashSet::new();

    for (index, entity) in entities.iter().enumerate() {
        let text = entity.text.trim();

        if text.is_empty() {
            issues.push(EntityIssue {
                index,
                message: "Entita má prázdný text.".to_string(),
                severity: Severity::Warning,
            });
            continue;
        }
        if text.chars().count() < 3 && !is_abbreviation(text) {
            issues.push(EntityIssue {
                index,
                message: format!("Text „{text}“ je podezřele krátký."),
                severity: Severity::Info,
            });
        }

        let key = text.to_lowercase();
        if !seen.insert(key) {
            issues.push(EntityIssue {
                index,
                message: format!("Duplicitní entita „{text}“."),
                severity: Severity::Warning,
            });
        }

        match entity.category {
            EntityCategory::Medication => {
                if SYMPTOM_TERMS.is_match(text) && !DOSE_RE.is_match(text) {
                    issues.push(EntityIssue {
                        index,
                        message: format!(
                            "„{text}“ vypadá jako symptom, ne jako lék."
                        ),
                        severity: Severity::Warning,
                    });
                }
            }
            EntityCategory::Symptom => {
                if DOSE_RE.is_match(text) {
                    issues.push(EntityIssue {
                        index,
                        message: format!(
                            "„{text}“ obsahuje dávkování, patří spíše mezi léky."
                        ),
                        severity: Severity::Warning,
                    });
                }
            }
            _ => {}
        }
    }

    if !issues.is_empty() {
        tracing::info!(count = issues.len(), "entity review flagged issues");
    }
    issues
}
