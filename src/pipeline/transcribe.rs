use serde::{Deserialize, Serialize};

use super::prompt::{DIARIZATION_SYSTEM_PROMPT, DIARIZATION_USER_PROMPT};
use crate::gateway::{lenient_array, AiGateway, GatewayError, ModelTier, Part};
use crate::models::{join_transcript, TranscriptSegment};

/// Result of the transcription stage: diarized segments plus the joined
/// plain-text transcript derived from them.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Transcription {
    pub text: String,
    pub segments: Vec<TranscriptSegment>,
}

#[derive(Debug, Default, Deserialize)]
struct DiarizationPayload {
    #[serde(default)]
    segments: Vec<serde_json::Value>,
}

/// Transcribe and diarize a consultation recording.
///
/// Malformed model output degrades to an empty transcription rather than
/// failing the session; only gateway failures propagate (and those are
/// terminal — no later stage can run without a transcript). Segments with
/// invalid timing are dropped with a warning.
pub async fn transcribe(
    gateway: &AiGateway,
    audio: &[u8],
    mime_type: &str,
) -> Result<Transcription, GatewayError> {
    tracing::info!(mime_type, bytes = audio.len(), "transcribing consultation audio");

    let parts = [
        Part::inline(mime_type, audio.to_vec()),
        Part::text(DIARIZATION_USER_PROMPT),
    ];
    let payload: DiarizationPayload = gateway
        .generate_json(
            DIARIZATION_SYSTEM_PROMPT,
            &parts,
            ModelTier::Fast,
            DiarizationPayload::default(),
        )
        .await?;

    let parsed: Vec<TranscriptSegment> = lenient_array(payload.segments);
    let total = parsed.len();
    let segments: Vec<TranscriptSegment> = parsed
        .into_iter()
        .filter(|s| s.has_valid_timing())
        .collect();
    if segments.len() < total {
        tracing::warn!(
            dropped = total - segments.len(),
            "dropped segments with invalid timing"
        );
    }

    let text = join_transcript(&segments);
    tracing::info!(segments = segments.len(), chars = text.len(), "transcription complete");
    Ok(Transcription { text, segments })
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::config::GatewayConfig;
    use crate::gateway::{MockClient, RetryPolicy};
    use crate::models::Speaker;

    fn gateway(client: MockClient) -> (AiGateway, Arc<MockClient>) {
        let client = Arc::new(client);
        let config = GatewayConfig {
            retry: RetryPolicy::no_wait(),
            ..GatewayConfig::default()
        };
        (AiGateway::new(client.clone(), config), client)
    }

    #[tokio::test]
    async fn diarized_response_yields_joined_transcript() {
        let response = r#"{"segments":[
            {"speaker":"Lékař","text":"Jak se máte?","start":0,"end":2},
            {"speaker":"Pacient","text":"Bolí mě hlava.","start":2.5,"end":4}
        ]}"#;
        let (gw, client) = gateway(MockClient::new(response));

        let out = transcribe(&gw, &[0u8; 16], "audio/wav").await.unwrap();

        assert_eq!(out.text, "Lékař: Jak se máte?\n\nPacient: Bolí mě hlava.");
        assert_eq!(out.segments.len(), 2);
        assert_eq!(out.segments[0].speaker, Speaker::Doctor);
        assert_eq!(out.segments[1].speaker, Speaker::Patient);
        assert!((out.segments[1].start - 2.5).abs() < f64::EPSILON);

        // The audio travels inline, in JSON mode.
        let calls = client.calls();
        assert!(calls[0].has_inline_data);
        assert!(calls[0].json_mode);
    }

    #[tokio::test]
    async fn malformed_output_degrades_to_empty_transcription() {
        let (gw, _) = gateway(MockClient::new("Bohužel nerozumím nahrávce."));
        let out = transcribe(&gw, &[0u8; 16], "audio/wav").await.unwrap();
        assert!(out.segments.is_empty());
        assert!(out.text.is_empty());
    }

    #[tokio::test]
    async fn invalid_timing_segments_dropped() {
        let response = r#"{"segments":[
            {"speaker":"Lékař","text":"platný","start":0,"end":2},
            {"speaker":"Pacient","text":"konec před začátkem","start":5,"end":3},
            {"speaker":"Pacient","text":"záporný čas","start":-1,"end":3}
        ]}"#;
        let (gw, _) = gateway(MockClient::new(response));
        let out = transcribe(&gw, &[0u8; 16], "audio/wav").await.unwrap();
        assert_eq!(out.segments.len(), 1);
        assert_eq!(out.segments[0].text, "platný");
    }

    #[tokio::test]
    async fn unknown_speaker_segment_dropped_not_fatal() {
        let response = r#"{"segments":[
            {"speaker":"Recepční","text":"dobrý den","start":0,"end":1},
            {"speaker":"Lékař","text":"pojďte dál","start":1,"end":2}
        ]}"#;
        let (gw, _) = gateway(MockClient::new(response));
        let out = transcribe(&gw, &[0u8; 16], "audio/wav").await.unwrap();
        assert_eq!(out.segments.len(), 1);
        assert_eq!(out.segments[0].speaker, Speaker::Doctor);
    }

    #[tokio::test]
    async fn gateway_failure_propagates() {
        let (gw, _) = gateway(MockClient::with_sequence(vec![Err(
            GatewayError::Auth("expired".into()),
        )]));
        let out = transcribe(&gw, &[0u8; 16], "audio/wav").await;
        assert!(matches!(out, Err(GatewayError::Auth(_))));
    }
}
