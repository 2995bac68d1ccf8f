use std::fmt;

use serde::{Deserialize, Serialize};

/// Fixed category set for clinical entities mined from the transcript.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EntityCategory {
    #[serde(alias = "diagnosis", alias = "diagnóza", alias = "diagnoza")]
    Diagnosis,
    #[serde(alias = "medication", alias = "medikace", alias = "lék")]
    Medication,
    #[serde(alias = "symptom", alias = "příznak", alias = "priznak")]
    Symptom,
    #[serde(alias = "pii", alias = "osobní údaj")]
    Pii,
    #[serde(alias = "other", alias = "ostatní", alias = "ostatni")]
    Other,
}

impl EntityCategory {
    /// All categories, in the order the extraction prompt lists them.
    pub fn all() -> &'static [EntityCategory] {
        &[
            Self::Diagnosis,
            Self::Medication,
            Self::Symptom,
            Self::Pii,
            Self::Other,
        ]
    }

    /// Wire tag as sent to and expected from the model.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Diagnosis => "DIAGNOSIS",
            Self::Medication => "MEDICATION",
            Self::Symptom => "SYMPTOM",
            Self::Pii => "PII",
            Self::Other => "OTHER",
        }
    }

    /// Czech label for the review UI.
    pub fn label_cs(&self) -> &'static str {
        match self {
            Self::Diagnosis => "Diagnóza",
            Self::Medication => "Medikace",
            Self::Symptom => "Symptom",
            Self::Pii => "Osobní údaj",
            Self::Other => "Ostatní",
        }
    }
}

impl fmt::Display for EntityCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Origin of an entity: proposed by the model or entered/edited by the user.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Provenance {
    /// Proposed by the extraction stage. Default when the model output
    /// carries no provenance field, which it never should.
    #[default]
    Ai,
    /// Entered or edited by the reviewing clinician.
    Manual,
}

/// A clinical entity span. Mutable after extraction through the
/// reconciliation operations; duplicates are allowed structurally and only
/// flagged by the advisory quality pass.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MedicalEntity {
    pub category: EntityCategory,
    pub text: String,
    #[serde(default)]
    pub provenance: Provenance,
}

impl MedicalEntity {
    pub fn ai(category: EntityCategory, text: impl Into<String>) -> Self {
        Self {
            category,
            text: text.into(),
            provenance: Provenance::Ai,
        }
    }

    pub fn manual(category: EntityCategory, text: impl Into<String>) -> Self {
        Self {
            category,
            text: text.into(),
            provenance: Provenance::Manual,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn category_wire_tags_are_screaming_snake() {
        assert_eq!(
            serde_json::to_string(&EntityCategory::Symptom).unwrap(),
            "\"SYMPTOM\""
        );
        assert_eq!(serde_json::to_string(&EntityCategory::Pii).unwrap(), "\"PII\"");
    }

    #[test]
    fn category_parses_model_output() {
        let c: EntityCategory = serde_json::from_str("\"SYMPTOM\"").unwrap();
        assert_eq!(c, EntityCategory::Symptom);
        let c: EntityCategory = serde_json::from_str("\"medikace\"").unwrap();
        assert_eq!(c, EntityCategory::Medication);
    }

    #[test]
    fn provenance_defaults_to_ai_when_absent() {
        let entity: MedicalEntity =
            serde_json::from_str(r#"{"category":"SYMPTOM","text":"bolí hlava"}"#).unwrap();
        assert_eq!(entity.provenance, Provenance::Ai);
        assert_eq!(entity.text, "bolí hlava");
    }

    #[test]
    fn manual_constructor_stamps_provenance() {
        let entity = MedicalEntity::manual(EntityCategory::Medication, "Paralen 500 mg");
        assert_eq!(entity.provenance, Provenance::Manual);
    }

    #[test]
    fn all_categories_have_distinct_tags() {
        let tags: Vec<&str> = EntityCategory::all().iter().map(|c| c.as_str()).collect();
        let mut unique = tags.clone();
        unique.sort();
        unique.dedup();
        assert_eq!(unique.len(), tags.len());
    }
}
