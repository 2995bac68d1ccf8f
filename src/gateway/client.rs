use std::collections::VecDeque;
use std::sync::Mutex;

use async_trait::async_trait;
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use serde::{Deserialize, Serialize};

use super::GatewayError;
use crate::config::GatewayConfig;

/// One piece of multipart content sent to the generation service.
#[derive(Debug, Clone)]
pub enum Part {
    Text(String),
    /// Binary payload sent inline (audio recordings).
    InlineData { mime_type: String, data: Vec<u8> },
}

impl Part {
    pub fn text(text: impl Into<String>) -> Self {
        Self::Text(text.into())
    }

    pub fn inline(mime_type: impl Into<String>, data: Vec<u8>) -> Self {
        Self::InlineData {
            mime_type: mime_type.into(),
            data,
        }
    }
}

/// Generation service abstraction (allows mocking).
///
/// One logical operation: send system prompt + content parts to a named
/// model, get the raw text result back. The gateway layers retry and JSON
/// handling on top.
#[async_trait]
pub trait GenerativeClient: Send + Sync {
    async fn generate(
        &self,
        model: &str,
        system: &str,
        parts: &[Part],
        json_mode: bool,
    ) -> Result<String, GatewayError>;
}

// ═══════════════════════════════════════════════════════════
// Hosted REST client (generateContent contract)
// ═══════════════════════════════════════════════════════════

/// REST client for the hosted `models/{model}:generateContent` endpoint.
pub struct GeminiClient {
    base_url: String,
    api_key: String,
    http: reqwest::Client,
}

impl GeminiClient {
    pub fn new(base_url: &str, api_key: &str) -> Result<Self, GatewayError> {
        let http = reqwest::Client::builder()
            .connect_timeout(std::time::Duration::from_secs(10))
            .build()
            .map_err(|e| GatewayError::Http(e.to_string()))?;
        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
            http,
        })
    }

    pub fn from_config(config: &GatewayConfig) -> Result<Self, GatewayError> {
        Self::new(&config.base_url, &config.api_key)
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    system_instruction: Option<ContentBody>,
    contents: Vec<ContentBody>,
    #[serde(skip_serializing_if = "Option::is_none")]
    generation_config: Option<GenerationConfig>,
}

#[derive(Serialize)]
struct ContentBody {
    parts: Vec<PartBody>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
enum PartBody {
    Text(String),
    #[serde(rename_all = "camelCase")]
    InlineData { mime_type: String, data: String },
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    response_mime_type: &'static str,
}

#[derive(Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<CandidatePart>,
}

#[derive(Deserialize)]
struct CandidatePart {
    #[serde(default)]
    text: String,
}

fn build_request_body(system: &str, parts: &[Part], json_mode: bool) -> GenerateContentRequest {
    let parts = parts
        .iter()
        .map(|p| match p {
            Part::Text(text) => PartBody::Text(text.clone()),
            Part::InlineData { mime_type, data } => PartBody::InlineData {
                mime_type: mime_type.clone(),
                data: BASE64.encode(data),
            },
        })
        .collect();

    GenerateContentRequest {
        system_instruction: (!system.is_empty()).then(|| ContentBody {
            parts: vec![PartBody::Text(system.to_string())],
        }),
        contents: vec![ContentBody { parts }],
        generation_config: json_mode.then_some(GenerationConfig {
            response_mime_type: "application/json",
        }),
    }
}

#[async_trait]
impl GenerativeClient for GeminiClient {
    async fn generate(
        &self,
        model: &str,
        system: &str,
        parts: &[Part],
        json_mode: bool,
    ) -> Result<String, GatewayError> {
        let url = format!(
            "{}/v1beta/models/{}:generateContent?key={}",
            self.base_url, model, self.api_key
        );
        let body = build_request_body(system, parts, json_mode);

        let response = self.http.post(&url).json(&body).send().await.map_err(|e| {
            if e.is_connect() {
                GatewayError::Connection(self.base_url.clone())
            } else {
                GatewayError::Http(e.to_string())
            }
        })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(match status.as_u16() {
                429 => GatewayError::RateLimited,
                401 | 403 => GatewayError::Auth(body),
                _ if body.contains("RESOURCE_EXHAUSTED") => GatewayError::RateLimited,
                code => GatewayError::Api { status: code, body },
            });
        }

        let parsed: GenerateContentResponse = response
            .json()
            .await
            .map_err(|e| GatewayError::Http(e.to_string()))?;

        let text: String = parsed
            .candidates
            .first()
            .and_then(|c| c.content.as_ref())
            .map(|c| {
                c.parts
                    .iter()
                    .map(|p| p.text.as_str())
                    .collect::<Vec<_>>()
                    .join("")
            })
            .unwrap_or_default();

        if text.is_empty() {
            return Err(GatewayError::EmptyResponse);
        }
        Ok(text)
    }
}

// ═══════════════════════════════════════════════════════════
// Mock client for tests
// ═══════════════════════════════════════════════════════════

/// Snapshot of one call made through a `MockClient`.
#[derive(Debug, Clone)]
pub struct RecordedCall {
    pub model: String,
    pub system: String,
    pub json_mode: bool,
    /// All text parts joined.
    pub text: String,
    pub has_inline_data: bool,
}

/// Mock generation client — scripted responses plus call recording.
pub struct MockClient {
    script: Mutex<VecDeque<Result<String, GatewayError>>>,
    default_response: Option<String>,
    calls: Mutex<Vec<RecordedCall>>,
}

impl MockClient {
    /// A client that returns `response` for every call.
    pub fn new(response: &str) -> Self {
        Self {
            script: Mutex::new(VecDeque::new()),
            default_response: Some(response.to_string()),
            calls: Mutex::new(Vec::new()),
        }
    }

    /// A client that plays back `responses` in order, then errors.
    pub fn with_sequence(responses: Vec<Result<String, GatewayError>>) -> Self {
        Self {
            script: Mutex::new(responses.into()),
            default_response: None,
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn calls(&self) -> Vec<RecordedCall> {
        self.calls.lock().map(|c| c.clone()).unwrap_or_default()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().map(|c| c.len()).unwrap_or(0)
    }
}

#[async_trait]
impl GenerativeClient for MockClient {
    async fn generate(
        &self,
        model: &str,
        system: &str,
        parts: &[Part],
        json_mode: bool,
    ) -> Result<String, GatewayError> {
        let text = parts
            .iter()
            .filter_map(|p| match p {
                Part::Text(t) => Some(t.as_str()),
                Part::InlineData { .. } => None,
            })
            .collect::<Vec<_>>()
            .join("\n");
        let has_inline_data = parts
            .iter()
            .any(|p| matches!(p, Part::InlineData { .. }));

        if let Ok(mut calls) = self.calls.lock() {
            calls.push(RecordedCall {
                model: model.to_string(),
                system: system.to_string(),
                json_mode,
                text,
                has_inline_data,
            });
        }

        let scripted = self.script.lock().ok().and_then(|mut s| s.pop_front());
        match scripted {
            Some(result) => result,
            None => match &self.default_response {
                Some(response) => Ok(response.clone()),
                None => Err(GatewayError::Http("mock script exhausted".into())),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn mock_returns_default_response_repeatedly() {
        let client = MockClient::new("odpověď");
        for _ in 0..3 {
            let out = client.generate("m", "s", &[Part::text("p")], false).await;
            assert_eq!(out.unwrap(), "odpověď");
        }
        assert_eq!(client.call_count(), 3);
    }

    #[tokio::test]
    async fn mock_plays_sequence_then_exhausts() {
        let client = MockClient::with_sequence(vec![
            Ok("first".into()),
            Err(GatewayError::RateLimited),
        ]);
        assert_eq!(
            client
                .generate("m", "s", &[], false)
                .await
                .unwrap(),
            "first"
        );
        assert!(matches!(
            client.generate("m", "s", &[], false).await,
            Err(GatewayError::RateLimited)
        ));
        assert!(matches!(
            client.generate("m", "s", &[], false).await,
            Err(GatewayError::Http(_))
        ));
    }

    #[tokio::test]
    async fn mock_records_call_details() {
        let client = MockClient::new("{}");
        client
            .generate(
                "fast-model",
                "system prompt",
                &[Part::text("hello"), Part::inline("audio/wav", vec![1, 2])],
                true,
            )
            .await
            .unwrap();

        let calls = client.calls();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].model, "fast-model");
        assert_eq!(calls[0].system, "system prompt");
        assert!(calls[0].json_mode);
        assert_eq!(calls[0].text, "hello");
        assert!(calls[0].has_inline_data);
    }

    #[test]
    fn request_body_uses_camel_case_wire_names() {
        let body = build_request_body(
            "system",
            &[Part::text("otázka"), Part::inline("audio/ogg", vec![0xFF])],
            true,
        );
        let json = serde_json::to_value(&body).unwrap();

        assert_eq!(json["systemInstruction"]["parts"][0]["text"], "system");
        assert_eq!(json["contents"][0]["parts"][0]["text"], "otázka");
        assert_eq!(
            json["contents"][0]["parts"][1]["inlineData"]["mimeType"],
            "audio/ogg"
        );
        // 0xFF base64-encodes to "/w=="
        assert_eq!(json["contents"][0]["parts"][1]["inlineData"]["data"], "/w==");
        assert_eq!(
            json["generationConfig"]["responseMimeType"],
            "application/json"
        );
    }

    #[test]
    fn prose_request_omits_generation_config() {
        let body = build_request_body("", &[Part::text("x")], false);
        let json = serde_json::to_value(&body).unwrap();
        assert!(json.get("generationConfig").is_none());
        assert!(json.get("systemInstruction").is_none());
    }

    #[test]
    fn client_construction_succeeds_and_trims_trailing_slash() {
        let client = GeminiClient::new("https://example.test/", "key").unwrap();
        assert_eq!(client.base_url(), "https://example.test");
    }

    #[test]
    fn client_builds_from_config() {
        let client = GeminiClient::from_config(&GatewayConfig::default()).unwrap();
        assert!(client.base_url().starts_with("https://"));
    }

    #[test]
    fn response_parsing_joins_candidate_parts() {
        let raw = r#"{"candidates":[{"content":{"parts":[{"text":"Ahoj"},{"text":" světe"}]}}]}"#;
        let parsed: GenerateContentResponse = serde_json::from_str(raw).unwrap();
        let text: String = parsed.candidates[0]
            .content
            .as_ref()
            .unwrap()
            .parts
            .iter()
            .map(|p| p.text.as_str())
            .collect();
        assert_eq!(text, "Ahoj světe");
    }
}
