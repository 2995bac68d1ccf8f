//! Structured document generator — the core of the pipeline.
//!
//! Each `ReportType` maps to exactly one schema template; the mapping is an
//! exhaustive match, so a new type cannot silently fall through to a wrong
//! shape. Generation is never incremental: every call re-runs the whole
//! prompt→decode cycle against the current transcript and entities.

use super::prompt::{build_report_prompt, REPORT_SYSTEM_PROMPT};
use crate::config::ProviderProfile;
use crate::gateway::{AiGateway, GatewayError, ModelTier, Part};
use crate::models::{
    AmbulatoryData, MedicalEntity, NursingData, ReferralData, ReportData, ReportType,
    StructuredReport, TreatmentRecommendationData, VisitConfirmationData,
};

const AMBULATORY_SCHEMA: &str = r#"{
  "subjektivni": "subjektivní nález (anamnéza) nebo null",
  "objektivni": "objektivní nález nebo null",
  "diagnoza": {"kod": "kód MKN-10 nebo null", "nazev": "název diagnózy nebo null"},
  "plan": ["kroky plánu vyšetření a terapie"],
  "medikace": [{"nazev": "název léku", "davkovani": "dávkování nebo null", "poznamka": "poznámka nebo null"}],
  "doporuceni": "doporučení pro pacienta nebo null"
}"#;

const NURSING_SCHEMA: &str = r#"{
  "prubeh_pece": "průběh ošetřovatelské péče nebo null",
  "intervence": ["provedené intervence"],
  "hodnoceni": "ošetřovatelské hodnocení nebo null",
  "doporuceni": "doporučení nebo null"
}"#;

const REFERRAL_SCHEMA: &str = r#"{
  "duvod": "důvod odeslání nebo null",
  "pozadovane_vysetreni": "požadované vyšetření nebo null",
  "cilova_odbornost": "cílová odbornost nebo null",
  "souhrn_anamnezy": "souhrn anamnézy pro přijímajícího lékaře nebo null",
  "nalehavost": "statim | planovane | null"
}"#;

const VISIT_CONFIRMATION_SCHEMA: &str = r#"{
  "datum": "datum návštěvy YYYY-MM-DD nebo null",
  "cas_od": "čas začátku HH:MM nebo null",
  "cas_do": "čas konce HH:MM nebo null",
  "ucel": "účel návštěvy nebo null"
}"#;

const TREATMENT_RECOMMENDATION_SCHEMA: &str = r#"{
  "doporuceni": ["doporučené léčebné kroky"],
  "medikace": [{"nazev": "název léku", "davkovani": "dávkování nebo null", "poznamka": "poznámka nebo null"}],
  "rezimova_opatreni": ["režimová opatření"],
  "kontrola": "termín nebo podmínka kontroly nebo null"
}"#;

/// The fixed schema template for a document type. Total over the
/// enumeration.
pub fn schema_template(ty: ReportType) -> &'static str {
    match ty {
        ReportType::AmbulatoryRecord => AMBULATORY_SCHEMA,
        ReportType::NursingRecord => NURSING_SCHEMA,
        ReportType::Referral => REFERRAL_SCHEMA,
        ReportType::VisitConfirmation => VISIT_CONFIRMATION_SCHEMA,
        ReportType::TreatmentRecommendation => TREATMENT_RECOMMENDATION_SCHEMA,
    }
}

/// Generate a populated report of the given type from the source text and
/// the current (possibly user-edited) entity list.
///
/// Entities are serialized into the prompt verbatim, provenance included,
/// so manually confirmed facts anchor the generation instead of being
/// re-invented. Malformed model output degrades to an all-empty data record
/// of the right type; only gateway failures propagate.
pub async fn generate_report(
    gateway: &AiGateway,
    source_text: &str,
    ty: ReportType,
    entities: &[MedicalEntity],
    deep: bool,
) -> Result<StructuredReport, GatewayError> {
    let tier = if deep { ModelTier::Deep } else { ModelTier::Fast };
    let entities_json =
        serde_json::to_string_pretty(entities).unwrap_or_else(|_| "[]".to_string());
    let prompt = build_report_prompt(schema_template(ty), &entities_json, source_text);
    let parts = [Part::text(prompt)];

    let data = match ty {
        ReportType::AmbulatoryRecord => ReportData::AmbulatoryRecord(
            gateway
                .generate_json(REPORT_SYSTEM_PROMPT, &parts, tier, AmbulatoryData::default())
                .await?,
        ),
        ReportType::NursingRecord => ReportData::NursingRecord(
            gateway
                .generate_json(REPORT_SYSTEM_PROMPT, &parts, tier, NursingData::default())
                .await?,
        ),
        ReportType::Referral => ReportData::Referral(
            gateway
                .generate_json(REPORT_SYSTEM_PROMPT, &parts, tier, ReferralData::default())
                .await?,
        ),
        ReportType::VisitConfirmation => ReportData::VisitConfirmation(
            gateway
                .generate_json(
                    REPORT_SYSTEM_PROMPT,
                    &parts,
                    tier,
                    VisitConfirmationData::default(),
                )
                .await?,
        ),
        ReportType::TreatmentRecommendation => ReportData::TreatmentRecommendation(
            gateway
                .generate_json(
                    REPORT_SYSTEM_PROMPT,
                    &parts,
                    tier,
                    TreatmentRecommendationData::default(),
                )
                .await?,
        ),
    };

    let report = StructuredReport::new(data);
    tracing::info!(report_id = %report.id, report_type = %ty, deep, "report generated");
    Ok(report)
}

/// Merge the hosting application's provider record into a generated report.
/// Provider metadata is configuration, never requested from the model.
pub fn merge_provider(report: &mut StructuredReport, provider: &ProviderProfile) {
    report.provider = Some(provider.clone());
}
