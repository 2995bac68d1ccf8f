//! Rule-based completeness checks for generated reports.
//!
//! Pure and deterministic — no model calls, no I/O. Validation runs on every
//! report write and is advisory except for `Severity::Error`, which gates
//! `is_valid`. Rules live per document type; adding a type without rules is a
//! compile error because the dispatch match is exhaustive.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::models::{
    AmbulatoryData, NursingData, ReferralData, ReportData, StructuredReport,
    TreatmentRecommendationData, VisitConfirmationData,
};

/// How strongly an issue should block the review workflow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Info,
    Warning,
    Error,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Info => "info",
            Self::Warning => "warning",
            Self::Error => "error",
        };
        write!(f, "{name}")
    }
}

/// One finding, addressed to a field of the report data.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationIssue {
    /// Field path within the data record, e.g. `"diagnoza.kod"`.
    pub field: String,
    /// Czech message shown in the review UI.
    pub message: String,
    pub severity: Severity,
}

impl ValidationIssue {
    pub fn error(field: &str, message: &str) -> Self {
        Self {
            field: field.to_string(),
            message: message.to_string(),
            severity: Severity::Error,
        }
    }

    pub fn warning(field: &str, message: &str) -> Self {
        Self {
            field: field.to_string(),
            message: message.to_string(),
            severity: Severity::Warning,
        }
    }

    pub fn info(field: &str, message: &str) -> Self {
        Self {
            field: field.to_string(),
            message: message.to_string(),
            severity: Severity::Info,
        }
    }
}

/// Validation verdict for one report.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ValidationResult {
    /// True when no issue reaches `Severity::Error`.
    pub is_valid: bool,
    pub issues: Vec<ValidationIssue>,
}

impl ValidationResult {
    pub fn from_issues(issues: Vec<ValidationIssue>) -> Self {
        let is_valid = issues.iter().all(|i| i.severity != Severity::Error);
        Self { is_valid, issues }
    }
}

fn blank(value: &Option<String>) -> bool {
    value.as_deref().map(str::trim).unwrap_or("").is_empty()
}

/// Validate a report against the rule set of its type.
///
/// An all-empty data record short-circuits to a single error — per-field
/// findings on a document the model produced nothing for are noise.
pub fn validate(report: &StructuredReport) -> ValidationResult {
    if report.data.is_empty() {
        return ValidationResult::from_issues(vec![ValidationIssue::error(
            "data",
            "Dokument neobsahuje žádná data.",
        )]);
    }

    let issues = match &report.data {
        ReportData::AmbulatoryRecord(data) => validate_ambulatory(data),
        ReportData::NursingRecord(data) => validate_nursing(data),
        ReportData::Referral(data) => validate_referral(data),
        ReportData::VisitConfirmation(data) => validate_visit_confirmation(data),
        ReportData::TreatmentRecommendation(data) => validate_treatment(data),
    };

    let result = ValidationResult::from_issues(issues);
    tracing::debug!(
        report_id = %report.id,
        report_type = %report.report_type(),
        is_valid = result.is_valid,
        issues = result.issues.len(),
        "report validated"
    );
    result
}

fn validate_ambulatory(data: &AmbulatoryData) -> Vec<ValidationIssue> {
    let mut issues = Vec::new();
    if blank(&data.subjektivni) {
        issues.push(ValidationIssue::error(
            "subjektivni",
            "Chybí subjektivní nález.",
        ));
    }
    if blank(&data.objektivni) {
        issues.push(ValidationIssue::error(
            "objektivni",
            "Chybí objektivní nález.",
        ));
    }
    if data.diagnoza.is_empty() {
        issues.push(ValidationIssue::error("diagnoza", "Chybí diagnóza."));
    } else if blank(&data.diagnoza.kod) {
        issues.push(ValidationIssue::warning(
            "diagnoza.kod",
            "Diagnóza nemá kód MKN-10.",
        ));
    }
    if data.plan.is_empty() {
        issues.push(ValidationIssue::warning("plan", "Plán vyšetření je prázdný."));
    }
    if blank(&data.doporuceni) {
        issues.push(ValidationIssue::warning(
            "doporuceni",
            "Chybí doporučení pro pacienta.",
        ));
    }
    issues
}

fn validate_nursing(data: &NursingData) -> Vec<ValidationIssue> {
    let mut issues = Vec::new();
    if blank(&data.prubeh_pece) {
        issues.push(ValidationIssue::error(
            "prubeh_pece",
            "Chybí průběh péče.",
        ));
    }
    if data.intervence.is_empty() {
        issues.push(ValidationIssue::warning(
            "intervence",
            "Nejsou uvedeny žádné intervence.",
        ));
    }
    if blank(&data.hodnoceni) {
        issues.push(ValidationIssue::warning(
            "hodnoceni",
            "Chybí ošetřovatelské hodnocení.",
        ));
    }
    issues
}

fn validate_referral(data: &ReferralData) -> Vec<ValidationIssue> {
    let mut issues = Vec::new();
    if blank(&data.duvod) {
        issues.push(ValidationIssue::error("duvod", "Chybí důvod odeslání."));
    }
    if blank(&data.pozadovane_vysetreni) {
        issues.push(ValidationIssue::error(
            "pozadovane_vysetreni",
            "Chybí požadované vyšetření.",
        ));
    }
    if blank(&data.cilova_odbornost) {
        issues.push(ValidationIssue::warning(
            "cilova_odbornost",
            "Chybí cílová odbornost.",
        ));
    }
    if blank(&data.souhrn_anamnezy) {
        issues.push(ValidationIssue::warning(
            "souhrn_anamnezy",
            "Chybí souhrn anamnézy.",
        ));
    }
    if blank(&data.nalehavost) {
        issues.push(ValidationIssue::info(
            "nalehavost",
            "Naléhavost není uvedena, předpokládá se plánované vyšetření.",
        ));
    }
    issues
}

fn validate_visit_confirmation(data: &VisitConfirmationData) -> Vec<ValidationIssue> {
    let mut issues = Vec::new();
    if blank(&data.datum) {
        issues.push(ValidationIssue::error("datum", "Chybí datum návštěvy."));
    }
    if blank(&data.ucel) {
        issues.push(ValidationIssue::warning("ucel", "Chybí účel návštěvy."));
    }
    match (data.cas_od.as_deref(), data.cas_do.as_deref()) {
        (Some(from), Some(to)) if !from.trim().is_empty() && !to.trim().is_empty() => {
            // HH:MM strings order lexicographically.
            if from.trim() > to.trim() {
                issues.push(ValidationIssue::warning(
                    "cas_do",
                    "Čas konce návštěvy předchází začátku.",
                ));
            }
        }
        _ => {
            issues.push(ValidationIssue::info(
                "cas_od",
                "Časové rozmezí návštěvy není úplné.",
            ));
        }
    }
    issues
}

fn validate_treatment(data: &TreatmentRecommendationData) -> Vec<ValidationIssue> {
    let mut issues = Vec::new();
    if data.doporuceni.is_empty() {
        issues.push(ValidationIssue::error(
            "doporuceni",
            "Chybí doporučené léčebné kroky.",
        ));
    }
    if data.medikace.is_empty() {
        issues.push(ValidationIssue::error(
            "medikace",
            "Doporučení léčby neuvádí žádnou medikaci.",
        ));
    }
    if data.rezimova_opatreni.is_empty() {
        issues.push(ValidationIssue::info(
            "rezimova_opatreni",
            "Režimová opatření nejsou uvedena.",
        ));
    }
    if blank(&data.kontrola) {
        issues.push(ValidationIssue::warning(
            "kontrola",
            "Chybí termín kontroly.",
        ));
    }
    issues
}
