use serde::Deserialize;

use super::prompt::{build_entity_prompt, ENTITY_SYSTEM_PROMPT};
use crate::gateway::{lenient_array, AiGateway, GatewayError, ModelTier, Part};
use crate::models::{MedicalEntity, Provenance};

#[derive(Debug, Default, Deserialize)]
struct EntityPayload {
    #[serde(default)]
    entities: Vec<serde_json::Value>,
}

/// Mine categorized clinical entities from the transcript.
///
/// Runs concurrently with document classification — both depend only on the
/// transcript. Malformed output degrades to an empty list; every returned
/// entity is stamped `provenance = Ai`.
pub async fn extract_entities(
    gateway: &AiGateway,
    transcript: &str,
) -> Result<Vec<MedicalEntity>, GatewayError> {
    if transcript.trim().is_empty() {
        return Ok(Vec::new());
    }

    let parts = [Part::text(build_entity_prompt(transcript))];
    let payload: EntityPayload = gateway
        .generate_json(
            ENTITY_SYSTEM_PROMPT,
            &parts,
            ModelTier::Fast,
            EntityPayload::default(),
        )
        .await?;

    let mut entities: Vec<MedicalEntity> = lenient_array(payload.entities);
    for entity in &mut entities {
        entity.provenance = Provenance::Ai;
    }
    tracing::info!(count = entities.len(), "entity extraction complete");
    Ok(entities)
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::config::GatewayConfig;
    use crate::gateway::{MockClient, RetryPolicy};
    use crate::models::EntityCategory;

    fn gateway(client: MockClient) -> (AiGateway, Arc<MockClient>) {
        let client = Arc::new(client);
        let config = GatewayConfig {
            retry: RetryPolicy::no_wait(),
            ..GatewayConfig::default()
        };
        (AiGateway::new(client.clone(), config), client)
    }

    #[tokio::test]
    async fn parses_categorized_entities() {
        let response = r#"{"entities":[
            {"category":"SYMPTOM","text":"bolí hlava"},
            {"category":"MEDICATION","text":"Ibuprofen 400 mg"}
        ]}"#;
        let (gw, client) = gateway(MockClient::new(response));

        let entities = extract_entities(&gw, "Pacient: Bolí mě hlava.").await.unwrap();

        assert_eq!(entities.len(), 2);
        assert_eq!(entities[0].category, EntityCategory::Symptom);
        assert_eq!(entities[0].text, "bolí hlava");
        assert_eq!(entities[0].provenance, Provenance::Ai);
        assert_eq!(entities[1].category, EntityCategory::Medication);

        assert!(client.calls()[0].text.contains("Bolí mě hlava."));
    }

    #[tokio::test]
    async fn malformed_output_degrades_to_empty_list() {
        let (gw, _) = gateway(MockClient::new("žádný JSON tady není"));
        let entities = extract_entities(&gw, "Lékař: Dobrý den.").await.unwrap();
        assert!(entities.is_empty());
    }

    #[tokio::test]
    async fn bad_items_skipped_good_kept() {
        let response = r#"{"entities":[
            {"category":"SYMPTOM","text":"kašel"},
            {"category":"NONSENSE_CATEGORY","text":"x"},
            {"text_only":"missing fields"}
        ]}"#;
        let (gw, _) = gateway(MockClient::new(response));
        let entities = extract_entities(&gw, "Pacient: Kašlu.").await.unwrap();
        assert_eq!(entities.len(), 1);
        assert_eq!(entities[0].text, "kašel");
    }

    #[tokio::test]
    async fn empty_transcript_skips_the_call() {
        let (gw, client) = gateway(MockClient::new("{}"));
        let entities = extract_entities(&gw, "   ").await.unwrap();
        assert!(entities.is_empty());
        assert_eq!(client.call_count(), 0);
    }

    #[tokio::test]
    async fn model_claimed_provenance_is_overwritten() {
        // The model must not be able to mark its own output as reviewed.
        let response = r#"{"entities":[
            {"category":"MEDICATION","text":"Paralen","provenance":"manual"}
        ]}"#;
        let (gw, _) = gateway(MockClient::new(response));
        let entities = extract_entities(&gw, "Lékař: Paralen.").await.unwrap();
        assert_eq!(entities[0].provenance, Provenance::Ai);
    }

    #[tokio::test]
    async fn gateway_failure_propagates() {
        let (gw, _) = gateway(MockClient::with_sequence(vec![Err(
            GatewayError::Connection("host".into()),
        )]));
        let out = extract_entities(&gw, "Lékař: Dobrý den.").await;
        assert!(matches!(out, Err(GatewayError::Connection(_))));
    }
}
