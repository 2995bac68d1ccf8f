//! Structured report model — the closed document-type set and its
//! schema-per-type data shapes.
//!
//! The canonical set is the Czech five-type set used by outpatient
//! practices: ambulantní zpráva, ošetřovatelský zápis, žádanka, potvrzení o
//! návštěvě, doporučení léčby. `ReportData` is a tagged union with one
//! variant struct per type; every consumer (generation, validation, export)
//! matches on it exhaustively instead of branching on a string tag.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::config::ProviderProfile;

/// Closed enumeration of supported document kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ReportType {
    #[serde(rename = "ambulantni_zprava")]
    AmbulatoryRecord,
    #[serde(rename = "osetrovatelsky_zapis")]
    NursingRecord,
    #[serde(rename = "zadanka")]
    Referral,
    #[serde(rename = "potvrzeni_navstevy")]
    VisitConfirmation,
    #[serde(rename = "doporuceni_lecby")]
    TreatmentRecommendation,
}

impl ReportType {
    /// All supported types, in the order the classification prompt lists them.
    pub const ALL: &'static [ReportType] = &[
        Self::AmbulatoryRecord,
        Self::NursingRecord,
        Self::Referral,
        Self::VisitConfirmation,
        Self::TreatmentRecommendation,
    ];

    /// Wire tag used in prompts and classification output.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::AmbulatoryRecord => "ambulantni_zprava",
            Self::NursingRecord => "osetrovatelsky_zapis",
            Self::Referral => "zadanka",
            Self::VisitConfirmation => "potvrzeni_navstevy",
            Self::TreatmentRecommendation => "doporuceni_lecby",
        }
    }

    /// Czech display name for the review UI and export headers.
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::AmbulatoryRecord => "Ambulantní zpráva",
            Self::NursingRecord => "Ošetřovatelský zápis",
            Self::Referral => "Žádanka o vyšetření",
            Self::VisitConfirmation => "Potvrzení o návštěvě",
            Self::TreatmentRecommendation => "Doporučení léčby",
        }
    }

    /// Tolerant parse of a classifier-emitted label. Accepts the wire tag
    /// plus the human spellings models tend to produce.
    pub fn from_label(label: &str) -> Option<ReportType> {
        match label.to_lowercase().trim() {
            "ambulantni_zprava" | "ambulantní zpráva" | "ambulantni zprava"
            | "ambulatory_record" | "ambulatory record" => Some(Self::AmbulatoryRecord),
            "osetrovatelsky_zapis" | "ošetřovatelský zápis" | "osetrovatelsky zapis"
            | "nursing_record" | "nursing record" => Some(Self::NursingRecord),
            "zadanka" | "žádanka" | "žádanka o vyšetření" | "referral" | "consult_request" => {
                Some(Self::Referral)
            }
            "potvrzeni_navstevy" | "potvrzení o návštěvě" | "potvrzeni navstevy"
            | "visit_confirmation" => Some(Self::VisitConfirmation),
            "doporuceni_lecby" | "doporučení léčby" | "doporuceni lecby"
            | "treatment_recommendation" => Some(Self::TreatmentRecommendation),
            _ => None,
        }
    }
}

impl fmt::Display for ReportType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Diagnosis reference inside an ambulatory record.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Diagnoza {
    /// MKN-10 (ICD-10) code, e.g. `"R51"`.
    pub kod: Option<String>,
    pub nazev: Option<String>,
}

impl Diagnoza {
    pub fn is_empty(&self) -> bool {
        fn blank(v: &Option<String>) -> bool {
            v.as_deref().map(str::trim).unwrap_or("").is_empty()
        }
        blank(&self.kod) && blank(&self.nazev)
    }
}

/// One medication line in a report.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MedikaceItem {
    pub nazev: String,
    pub davkovani: Option<String>,
    pub poznamka: Option<String>,
}

/// Ambulantní zpráva — SOAP-shaped outpatient record.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AmbulatoryData {
    /// Subjective narrative (anamnéza, complaints as reported).
    pub subjektivni: Option<String>,
    /// Objective findings.
    pub objektivni: Option<String>,
    pub diagnoza: Diagnoza,
    /// Plan items (examinations, therapy steps).
    pub plan: Vec<String>,
    pub medikace: Vec<MedikaceItem>,
    /// Free-text recommendation for the patient.
    pub doporuceni: Option<String>,
}

/// Ošetřovatelský zápis — nursing care record.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NursingData {
    /// Course of care narrative.
    pub prubeh_pece: Option<String>,
    /// Performed interventions.
    pub intervence: Vec<String>,
    /// Nursing assessment.
    pub hodnoceni: Option<String>,
    pub doporuceni: Option<String>,
}

/// Žádanka — referral / consult request.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReferralData {
    /// Reason for the referral.
    pub duvod: Option<String>,
    /// Requested examination.
    pub pozadovane_vysetreni: Option<String>,
    /// Target specialty (odbornost) of the receiving provider.
    pub cilova_odbornost: Option<String>,
    /// Relevant history summary for the receiving provider.
    pub souhrn_anamnezy: Option<String>,
    /// Urgency note (statim / plánované).
    pub nalehavost: Option<String>,
}

/// Potvrzení o návštěvě — visit confirmation.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VisitConfirmationData {
    /// Visit date, ISO `YYYY-MM-DD`.
    pub datum: Option<String>,
    /// Visit start, `HH:MM`.
    pub cas_od: Option<String>,
    /// Visit end, `HH:MM`.
    pub cas_do: Option<String>,
    /// Purpose of the visit.
    pub ucel: Option<String>,
}

/// Doporučení léčby — treatment recommendation / prescription draft.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TreatmentRecommendationData {
    pub doporuceni: Vec<String>,
    pub medikace: Vec<MedikaceItem>,
    /// Lifestyle / regimen measures.
    pub rezimova_opatreni: Vec<String>,
    /// Follow-up instruction.
    pub kontrola: Option<String>,
}

/// Type-tagged report data. Exactly one variant per `ReportType`; the
/// `typ` tag makes the serialized form self-describing so the export layer
/// can enumerate fields without core logic.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "typ")]
pub enum ReportData {
    #[serde(rename = "ambulantni_zprava")]
    AmbulatoryRecord(AmbulatoryData),
    #[serde(rename = "osetrovatelsky_zapis")]
    NursingRecord(NursingData),
    #[serde(rename = "zadanka")]
    Referral(ReferralData),
    #[serde(rename = "potvrzeni_navstevy")]
    VisitConfirmation(VisitConfirmationData),
    #[serde(rename = "doporuceni_lecby")]
    TreatmentRecommendation(TreatmentRecommendationData),
}

impl ReportData {
    /// The report type this data conforms to. Exhaustive by construction —
    /// the type↔schema mapping cannot fall through to a wrong shape.
    pub fn report_type(&self) -> ReportType {
        match self {
            Self::AmbulatoryRecord(_) => ReportType::AmbulatoryRecord,
            Self::NursingRecord(_) => ReportType::NursingRecord,
            Self::Referral(_) => ReportType::Referral,
            Self::VisitConfirmation(_) => ReportType::VisitConfirmation,
            Self::TreatmentRecommendation(_) => ReportType::TreatmentRecommendation,
        }
    }

    /// An all-empty data record of the given type. This is the parse
    /// fallback for malformed generation output.
    pub fn empty(ty: ReportType) -> ReportData {
        match ty {
            ReportType::AmbulatoryRecord => Self::AmbulatoryRecord(AmbulatoryData::default()),
            ReportType::NursingRecord => Self::NursingRecord(NursingData::default()),
            ReportType::Referral => Self::Referral(ReferralData::default()),
            ReportType::VisitConfirmation => {
                Self::VisitConfirmation(VisitConfirmationData::default())
            }
            ReportType::TreatmentRecommendation => {
                Self::TreatmentRecommendation(TreatmentRecommendationData::default())
            }
        }
    }

    /// True when every field is at its default — the generation fallback
    /// produced nothing usable.
    pub fn is_empty(&self) -> bool {
        *self == Self::empty(self.report_type())
    }
}

/// One live structured report in the review workflow.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StructuredReport {
    pub id: Uuid,
    pub created_at: DateTime<Utc>,
    pub data: ReportData,
    /// Provider record merged post-generation from the hosting application's
    /// configuration; `None` until merged.
    pub provider: Option<ProviderProfile>,
}

impl StructuredReport {
    pub fn new(data: ReportData) -> Self {
        Self {
            id: Uuid::new_v4(),
            created_at: Utc::now(),
            data,
            provider: None,
        }
    }

    pub fn report_type(&self) -> ReportType {
        self.data.report_type()
    }
}
