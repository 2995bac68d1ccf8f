use serde::Deserialize;

use super::prompt::{build_classification_prompt, CLASSIFY_SYSTEM_PROMPT};
use crate::gateway::{AiGateway, GatewayError, ModelTier, Part};
use crate::models::ReportType;

/// Baseline document type — the candidate set never ends up empty, and the
/// generator falls back to this when classification suggests nothing.
pub const DEFAULT_REPORT_TYPE: ReportType = ReportType::AmbulatoryRecord;

#[derive(Debug, Default, Deserialize)]
struct ClassificationPayload {
    #[serde(default)]
    documents: Vec<String>,
}

/// Infer which structured document types fit the consultation.
///
/// Advisory only — the result feeds the generator's default selection and
/// stays overridable by the user. The returned list is ordered (model
/// preference first), deduplicated, and always contains
/// `DEFAULT_REPORT_TYPE`.
pub async fn classify_documents(
    gateway: &AiGateway,
    transcript: &str,
) -> Result<Vec<ReportType>, GatewayError> {
    if transcript.trim().is_empty() {
        return Ok(vec![DEFAULT_REPORT_TYPE]);
    }

    let parts = [Part::text(build_classification_prompt(transcript))];
    let payload: ClassificationPayload = gateway
        .generate_json(
            CLASSIFY_SYSTEM_PROMPT,
            &parts,
            ModelTier::Fast,
            ClassificationPayload::default(),
        )
        .await?;

    let mut candidates = Vec::new();
    for label in &payload.documents {
        match ReportType::from_label(label) {
            Some(ty) if !candidates.contains(&ty) => candidates.push(ty),
            Some(_) => {}
            None => tracing::warn!(label, "classifier suggested unknown document type"),
        }
    }
    if !candidates.contains(&DEFAULT_REPORT_TYPE) {
        candidates.push(DEFAULT_REPORT_TYPE);
    }

    tracing::info!(candidates = candidates.len(), "document classification complete");
    Ok(candidates)
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::config::GatewayConfig;
    use crate::gateway::{MockClient, RetryPolicy};

    fn gateway(client: MockClient) -> AiGateway {
        let config = GatewayConfig {
            retry: RetryPolicy::no_wait(),
            ..GatewayConfig::default()
        };
        AiGateway::new(Arc::new(client), config)
    }

    #[tokio::test]
    async fn parses_ordered_tags() {
        let gw = gateway(MockClient::new(
            r#"{"documents":["zadanka","doporuceni_lecby"]}"#,
        ));
        let out = classify_documents(&gw, "Lékař: Pošlu vás na vyšetření.").await.unwrap();
        assert_eq!(
            out,
            vec![
                ReportType::Referral,
                ReportType::TreatmentRecommendation,
                ReportType::AmbulatoryRecord,
            ]
        );
    }

    #[tokio::test]
    async fn default_type_always_present() {
        let gw = gateway(MockClient::new(r#"{"documents":[]}"#));
        let out = classify_documents(&gw, "Lékař: Dobrý den.").await.unwrap();
        assert_eq!(out, vec![DEFAULT_REPORT_TYPE]);
    }

    #[tokio::test]
    async fn malformed_output_degrades_to_default() {
        let gw = gateway(MockClient::new("nevím"));
        let out = classify_documents(&gw, "Lékař: Dobrý den.").await.unwrap();
        assert_eq!(out, vec![DEFAULT_REPORT_TYPE]);
    }

    #[tokio::test]
    async fn unknown_labels_ignored_duplicates_collapsed() {
        let gw = gateway(MockClient::new(
            r#"{"documents":["zadanka","faktura","zadanka","ambulantni_zprava"]}"#,
        ));
        let out = classify_documents(&gw, "Lékař: Dobrý den.").await.unwrap();
        assert_eq!(
            out,
            vec![ReportType::Referral, ReportType::AmbulatoryRecord]
        );
    }

    #[tokio::test]
    async fn human_spellings_accepted() {
        let gw = gateway(MockClient::new(
            r#"{"documents":["Ambulantní zpráva","Žádanka"]}"#,
        ));
        let out = classify_documents(&gw, "Lékař: Dobrý den.").await.unwrap();
        assert_eq!(
            out,
            vec![ReportType::AmbulatoryRecord, ReportType::Referral]
        );
    }

    #[tokio::test]
    async fn empty_transcript_returns_default_without_call() {
        let client = Arc::new(MockClient::new("{}"));
        let config = GatewayConfig {
            retry: RetryPolicy::no_wait(),
            ..GatewayConfig::default()
        };
        let gw = AiGateway::new(client.clone(), config);
        let out = classify_documents(&gw, "").await.unwrap();
        assert_eq!(out, vec![DEFAULT_REPORT_TYPE]);
        assert_eq!(client.call_count(), 0);
    }

    #[tokio::test]
    async fn gateway_failure_propagates() {
        let gw = gateway(MockClient::with_sequence(vec![Err(
            GatewayError::EmptyResponse,
        )]));
        let out = classify_documents(&gw, "Lékař: Dobrý den.").await;
        assert!(matches!(out, Err(GatewayError::EmptyResponse)));
    }
}
