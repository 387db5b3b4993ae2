use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use shared::agent_api::ChatTurn;
use shared::settings::{ModelSettings, ProviderAuth};
use std::time::Duration;
use zeroize::Zeroizing;

use crate::{GenerationRequest, ProviderError, TextGenerator};

#[derive(Debug, Serialize, Deserialize)]
struct GeminiContent {
    #[serde(skip_serializing_if = "Option::is_none")]
    role: Option<String>,
    parts: Vec<GeminiPart>,
}

#[derive(Debug, Serialize, Deserialize)]
struct GeminiPart {
    text: String,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    temperature: f32,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GeminiRequest {
    contents: Vec<GeminiContent>,
    #[serde(skip_serializing_if = "Option::is_none")]
    system_instruction: Option<GeminiContent>,
    generation_config: GenerationConfig,
}

#[derive(Debug, Deserialize)]
struct GeminiCandidatePart {
    #[serde(default)]
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
struct GeminiCandidateContent {
    #[serde(default)]
    parts: Vec<GeminiCandidatePart>,
}

#[derive(Debug, Deserialize)]
struct GeminiCandidate {
    content: Option<GeminiCandidateContent>,
}

#[derive(Debug, Deserialize)]
struct GeminiResponse {
    #[serde(default)]
    candidates: Vec<GeminiCandidate>,
}

impl GeminiRequest {
    fn from_request(req: GenerationRequest) -> Self {
        let system_instruction = if req.system_instruction.trim().is_empty() {
            None
        } else {
            Some(GeminiContent {
                role: None,
                parts: vec![GeminiPart {
                    text: req.system_instruction,
                }],
            })
        };
        let contents = req
            .turns
            .into_iter()
            .map(|ChatTurn { role, text }| GeminiContent {
                role: Some(role.as_str().to_string()),
                parts: vec![GeminiPart { text }],
            })
            .collect();
        Self {
            contents,
            system_instruction,
            generation_config: GenerationConfig {
                temperature: req.temperature,
            },
        }
    }
}

impl GeminiResponse {
    /// Text of the first candidate, all parts joined. Missing pieces yield "".
    fn text(&self) -> String {
        self.candidates
            .first()
            .and_then(|c| c.content.as_ref())
            .map(|c| {
                c.parts
                    .iter()
                    .filter_map(|p| p.text.as_deref())
                    .collect::<String>()
            })
            .unwrap_or_default()
    }
}

/// Map a non-success reply to an error, keeping at most 800 chars of body
fn status_error(status: StatusCode, body: &str) -> ProviderError {
    let detail: String = body.trim().chars().take(800).collect();
    let detail = if detail.is_empty() {
        status.canonical_reason().unwrap_or("no body").to_string()
    } else {
        detail
    };
    match status {
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => ProviderError::Unauthorized {
            status: status.as_u16(),
            detail,
        },
        _ => ProviderError::Status {
            status: status.as_u16(),
            detail,
        },
    }
}

pub struct GeminiClient {
    http: Client,
    auth_token: Option<Zeroizing<String>>,
    base_url: String,
}

impl GeminiClient {
    /// Build a client. A missing key is not an error until a request is made.
    pub fn from_settings(model: &ModelSettings, auth: &ProviderAuth) -> Result<Self, ProviderError> {
        Ok(Self {
            http: Client::builder()
                .timeout(Duration::from_secs(model.request_timeout_secs))
                .build()?,
            auth_token: auth.resolve(),
            base_url: model.base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn has_credential(&self) -> bool {
        self.auth_token.is_some()
    }

    fn endpoint(&self, model: &str) -> String {
        format!("{}/v1beta/models/{}:generateContent", self.base_url, model)
    }
}

#[async_trait]
impl TextGenerator for GeminiClient {
    fn id(&self) -> &'static str {
        "gemini"
    }

    async fn generate(&self, request: GenerationRequest) -> Result<String, ProviderError> {
        let key = self
            .auth_token
            .as_ref()
            .ok_or(ProviderError::MissingCredential)?;
        let url = self.endpoint(&request.model);
        tracing::debug!(model = %request.model, turns = request.turns.len(), "gemini generateContent");

        let req = GeminiRequest::from_request(request);
        // Key goes in a header so it never shows up in URL-bearing errors
        let resp = self
            .http
            .post(url)
            .header("x-goog-api-key", key.as_str())
            .json(&req)
            .send()
            .await?;

        if !resp.status().is_success() {
            let status = resp.status();
            let body = resp.text().await.unwrap_or_default();
            return Err(status_error(status, &body));
        }

        let body: GeminiResponse = resp.json().await?;
        Ok(body.text())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request() -> GenerationRequest {
        GenerationRequest {
            model: "gemini-3-flash-preview".into(),
            system_instruction: "Be a consultant.".into(),
            temperature: 0.7,
            turns: vec![
                ChatTurn::user("Hello"),
                ChatTurn::model("Hi, how can I help?"),
                ChatTurn::user("Plan my launch"),
            ],
        }
    }

    #[test]
    fn test_request_wire_shape() {
        let body = serde_json::to_value(GeminiRequest::from_request(request())).unwrap();

        assert_eq!(body["contents"].as_array().unwrap().len(), 3);
        assert_eq!(body["contents"][1]["role"], "model");
        assert_eq!(body["contents"][2]["parts"][0]["text"], "Plan my launch");
        assert_eq!(body["systemInstruction"]["parts"][0]["text"], "Be a consultant.");
        assert!(body["systemInstruction"].get("role").is_none());
        let temperature = body["generationConfig"]["temperature"].as_f64().unwrap();
        assert!((temperature - 0.7).abs() < 1e-6);
    }

    #[test]
    fn test_response_text_joins_first_candidate_parts() {
        let json = r#"{"candidates":[{"content":{"role":"model","parts":[{"text":"Step 1. "},{"text":"Step 2."}]}},{"content":{"parts":[{"text":"ignored"}]}}]}"#;
        let resp: GeminiResponse = serde_json::from_str(json).unwrap();
        assert_eq!(resp.text(), "Step 1. Step 2.");
    }

    #[test]
    fn test_response_without_text_is_empty() {
        for json in [
            r#"{}"#,
            r#"{"candidates":[]}"#,
            r#"{"candidates":[{"finishReason":"SAFETY"}]}"#,
            r#"{"candidates":[{"content":{"parts":[{"inlineData":{}}]}}]}"#,
        ] {
            let resp: GeminiResponse = serde_json::from_str(json).unwrap();
            assert_eq!(resp.text(), "", "body: {}", json);
        }
    }

    #[test]
    fn test_status_error_classification() {
        let err = status_error(
            StatusCode::BAD_REQUEST,
            r#"{"error":{"message":"API key not valid. Please pass a valid API key."}}"#,
        );
        assert!(matches!(err, ProviderError::Status { status: 400, .. }));
        assert!(err.is_credential_error());

        let err = status_error(StatusCode::FORBIDDEN, "");
        assert!(matches!(err, ProviderError::Unauthorized { status: 403, .. }));

        let err = status_error(StatusCode::SERVICE_UNAVAILABLE, "overloaded");
        assert!(!err.is_credential_error());
    }

    #[tokio::test]
    async fn test_missing_key_fails_without_request() {
        let model = ModelSettings {
            // Unroutable; reaching the network would fail differently
            base_url: "http://127.0.0.1:9".into(),
            ..ModelSettings::default()
        };
        let client = GeminiClient {
            http: Client::new(),
            auth_token: None,
            base_url: model.base_url.clone(),
        };

        assert!(!client.has_credential());
        let err = client.generate(request()).await.unwrap_err();
        assert!(matches!(err, ProviderError::MissingCredential));
    }

    #[test]
    fn test_endpoint() {
        let client = GeminiClient::from_settings(
            &ModelSettings {
                base_url: "https://example.test/".into(),
                ..ModelSettings::default()
            },
            &ProviderAuth::with_key("k"),
        )
        .unwrap();
        assert!(client.has_credential());
        assert_eq!(
            client.endpoint("gemini-3-pro-preview"),
            "https://example.test/v1beta/models/gemini-3-pro-preview:generateContent"
        );
    }
}
