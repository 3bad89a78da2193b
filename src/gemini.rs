//! Gemini API client
//!
//! One `generateContent` call, used in two configurations:
//! - free text with the Google Search grounding tool (budget path), which
//!   returns prose plus a side-channel of web citations;
//! - schema-constrained JSON output (suggestion path), which returns an
//!   array of strings directly so no free-text extraction is needed.
//!
//! No retries: a failed call surfaces immediately as a classified error and
//! retrying is the caller's explicit action.

use crate::error::{ErrorKind, ServiceError};
use serde::{Deserialize, Serialize};

const GEMINI_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta/models";

/// Default model for both paths.
pub const DEFAULT_MODEL: &str = "gemini-2.5-flash";

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateRequest {
    contents: Vec<Content>,
    #[serde(skip_serializing_if = "Option::is_none")]
    tools: Option<Vec<Tool>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    generation_config: Option<GenerationConfig>,
}

#[derive(Serialize, Deserialize)]
struct Content {
    parts: Vec<Part>,
}

#[derive(Serialize, Deserialize)]
struct Part {
    text: String,
}

#[derive(Serialize)]
struct Tool {
    google_search: GoogleSearch,
}

#[derive(Serialize)]
struct GoogleSearch {}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    response_mime_type: String,
    response_schema: serde_json::Value,
}

#[derive(Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct Candidate {
    content: Option<Content>,
    grounding_metadata: Option<GroundingMetadata>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct GroundingMetadata {
    #[serde(default)]
    grounding_chunks: Vec<GroundingChunk>,
}

#[derive(Deserialize)]
struct GroundingChunk {
    web: Option<WebSource>,
}

/// A web citation attached to a grounded response.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct WebSource {
    pub title: Option<String>,
    pub uri: Option<String>,
}

/// Text plus the citation side-channel from a grounded call.
#[derive(Debug)]
pub struct GroundedReply {
    pub text: String,
    pub citations: Vec<WebSource>,
}

pub struct GeminiClient {
    http: reqwest::Client,
    api_key: String,
    model: String,
}

impl GeminiClient {
    pub fn new(api_key: String) -> Self {
        Self::with_model(api_key, DEFAULT_MODEL)
    }

    pub fn with_model(api_key: String, model: &str) -> Self {
        Self {
            http: reqwest::Client::new(),
            api_key,
            model: model.to_string(),
        }
    }

    fn endpoint(&self) -> String {
        format!("{}/{}:generateContent", GEMINI_BASE_URL, self.model)
    }

    async fn generate(&self, request: &GenerateRequest) -> Result<GenerateResponse, ServiceError> {
        let response = self
            .http
            .post(self.endpoint())
            .query(&[("key", self.api_key.as_str())])
            .json(request)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(ServiceError::classify(
                format!("API error {}: {}", status, body),
                false,
            ));
        }

        response.json().await.map_err(ServiceError::from)
    }

    /// First candidate's concatenated text, or an `empty` error.
    fn first_text(response: &GenerateResponse) -> Result<String, ServiceError> {
        let text = response
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
            return Err(ServiceError::new(
                ErrorKind::Empty,
                "The model returned no text",
            ));
        }
        Ok(text)
    }

    /// Free-text generation with search grounding enabled.
    pub async fn generate_grounded(&self, prompt: &str) -> Result<GroundedReply, ServiceError> {
        let request = GenerateRequest {
            contents: vec![Content { parts: vec![Part { text: prompt.to_string() }] }],
            tools: Some(vec![Tool { google_search: GoogleSearch {} }]),
            generation_config: None,
        };

        let response = self.generate(&request).await?;
        let text = Self::first_text(&response)?;
        let citations = response
            .candidates
            .into_iter()
            .next()
            .and_then(|c| c.grounding_metadata)
            .map(|m| m.grounding_chunks.into_iter().filter_map(|c| c.web).collect())
            .unwrap_or_default();

        Ok(GroundedReply { text, citations })
    }

    /// Schema-constrained generation of a plain string array.
    pub async fn generate_string_array(&self, prompt: &str) -> Result<Vec<String>, ServiceError> {
        let request = GenerateRequest {
            contents: vec![Content { parts: vec![Part { text: prompt.to_string() }] }],
            tools: None,
            generation_config: Some(GenerationConfig {
                response_mime_type: "application/json".to_string(),
                response_schema: serde_json::json!({
                    "type": "ARRAY",
                    "items": { "type": "STRING" }
                }),
            }),
        };

        let response = self.generate(&request).await?;
        let text = Self::first_text(&response)?;
        serde_json::from_str(&text).map_err(|err| {
            ServiceError::with_cause(
                ErrorKind::Parsing,
                "The model's string array did not parse",
                err,
            )
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_grounded_request_shape() {
        let request = GenerateRequest {
            contents: vec![Content { parts: vec![Part { text: "hi".to_string() }] }],
            tools: Some(vec![Tool { google_search: GoogleSearch {} }]),
            generation_config: None,
        };
        let json = serde_json::to_value(&request).unwrap();
        assert!(json.get("tools").unwrap()[0].get("google_search").is_some());
        assert!(json.get("generationConfig").is_none());
    }

    #[test]
    fn test_schema_request_shape() {
        let request = GenerateRequest {
            contents: vec![Content { parts: vec![Part { text: "hi".to_string() }] }],
            tools: None,
            generation_config: Some(GenerationConfig {
                response_mime_type: "application/json".to_string(),
                response_schema: serde_json::json!({"type": "ARRAY", "items": {"type": "STRING"}}),
            }),
        };
        let json = serde_json::to_value(&request).unwrap();
        let config = json.get("generationConfig").unwrap();
        assert_eq!(config["responseMimeType"], "application/json");
        assert_eq!(config["responseSchema"]["type"], "ARRAY");
    }

    #[test]
    fn test_response_parsing_with_grounding() {
        let raw = r#"{
            "candidates": [{
                "content": {"parts": [{"text": "hello "}, {"text": "world"}]},
                "groundingMetadata": {
                    "groundingChunks": [
                        {"web": {"uri": "https://example.com", "title": "Example"}},
                        {"web": null}
                    ]
                }
            }]
        }"#;
        let response: GenerateResponse = serde_json::from_str(raw).unwrap();
        assert_eq!(GeminiClient::first_text(&response).unwrap(), "hello world");
        let meta = response.candidates.into_iter().next().unwrap().grounding_metadata.unwrap();
        let webs: Vec<_> = meta.grounding_chunks.into_iter().filter_map(|c| c.web).collect();
        assert_eq!(webs.len(), 1);
        assert_eq!(webs[0].title.as_deref(), Some("Example"));
    }

    #[test]
    fn test_empty_candidates_is_empty_kind() {
        let response: GenerateResponse = serde_json::from_str(r#"{"candidates": []}"#).unwrap();
        let err = GeminiClient::first_text(&response).unwrap_err();
        assert_eq!(err.kind, ErrorKind::Empty);
    }
}
