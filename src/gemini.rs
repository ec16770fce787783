use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Environment variable holding the API credential.
pub const API_KEY_ENV: &str = "GEMINI_API_KEY";

const BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta/models";

#[derive(Error, Debug)]
pub enum ClientError {
  #[error("GEMINI_API_KEY is not set")]
  MissingApiKey,

  #[error("Network error")]
  Http(#[from] reqwest::Error),

  #[error("Service returned status {0}")]
  Status(StatusCode),
}

/// Client for the generative-language `generateContent` endpoint.
/// Constructed once at startup; a construction failure degrades the
/// news feature instead of crashing the app.
#[derive(Debug, Clone)]
pub struct Gemini {
  http: Client,
  api_key: String,
  model: String,
}

impl Gemini {
  pub fn from_env(model: &str) -> Result<Self, ClientError> {
    let api_key = std::env::var(API_KEY_ENV).map_err(|_| ClientError::MissingApiKey)?;
    if api_key.trim().is_empty() {
      return Err(ClientError::MissingApiKey);
    }
    Ok(Self { http: Client::new(), api_key, model: model.to_string() })
  }

  /// One request, one response, no retries. Returns the text of the
  /// first candidate, which may be empty or arbitrary prose; callers
  /// treat it as untrusted.
  pub async fn generate(&self, prompt: &str) -> Result<String, ClientError> {
    let url = format!("{BASE_URL}/{}:generateContent", self.model);
    let request = GenerateRequest {
      contents: vec![RequestContent { parts: vec![RequestPart { text: prompt }] }],
      tools: vec![Tool { google_search: GoogleSearch {} }],
    };

    let response = self
      .http
      .post(&url)
      .header("x-goog-api-key", &self.api_key)
      .json(&request)
      .send()
      .await?;

    let status = response.status();
    if !status.is_success() {
      return Err(ClientError::Status(status));
    }

    let body: GenerateResponse = response.json().await?;
    Ok(body.text())
  }
}

#[derive(Debug, Serialize)]
struct GenerateRequest<'a> {
  contents: Vec<RequestContent<'a>>,
  tools: Vec<Tool>,
}

#[derive(Debug, Serialize)]
struct RequestContent<'a> {
  parts: Vec<RequestPart<'a>>,
}

#[derive(Debug, Serialize)]
struct RequestPart<'a> {
  text: &'a str,
}

/// Enables the service's built-in web-search augmentation.
#[derive(Debug, Serialize)]
struct Tool {
  google_search: GoogleSearch,
}

#[derive(Debug, Serialize)]
struct GoogleSearch {}

#[derive(Debug, Default, Deserialize)]
struct GenerateResponse {
  #[serde(default)]
  candidates: Vec<Candidate>,
}

impl GenerateResponse {
  fn text(&self) -> String {
    self
      .candidates
      .first()
      .map(|candidate| candidate.content.parts.iter().map(|part| part.text.as_str()).collect())
      .unwrap_or_default()
  }
}

#[derive(Debug, Default, Deserialize)]
struct Candidate {
  #[serde(default)]
  content: CandidateContent,
}

#[derive(Debug, Default, Deserialize)]
struct CandidateContent {
  #[serde(default)]
  parts: Vec<CandidatePart>,
}

#[derive(Debug, Default, Deserialize)]
struct CandidatePart {
  #[serde(default)]
  text: String,
}

#[cfg(test)]
mod tests {
  use pretty_assertions::assert_eq;

  use super::*;

  #[test]
  fn request_serializes_with_search_tool() {
    let request = GenerateRequest {
      contents: vec![RequestContent { parts: vec![RequestPart { text: "hello" }] }],
      tools: vec![Tool { google_search: GoogleSearch {} }],
    };
    let json = serde_json::to_value(&request).unwrap();
    assert_eq!(json["contents"][0]["parts"][0]["text"], "hello");
    assert_eq!(json["tools"][0]["google_search"], serde_json::json!({}));
  }

  #[test]
  fn response_text_joins_first_candidate_parts() {
    let body: GenerateResponse = serde_json::from_str(
      r#"{
        "candidates": [
          {"content": {"parts": [{"text": "part one "}, {"text": "part two"}], "role": "model"}}
        ],
        "modelVersion": "test"
      }"#,
    )
    .unwrap();
    assert_eq!(body.text(), "part one part two");
  }

  #[test]
  fn response_without_candidates_yields_empty_text() {
    let body: GenerateResponse = serde_json::from_str("{}").unwrap();
    assert_eq!(body.text(), "");
  }

  #[test]
  fn candidate_without_parts_yields_empty_text() {
    let body: GenerateResponse = serde_json::from_str(r#"{"candidates": [{}]}"#).unwrap();
    assert_eq!(body.text(), "");
  }
}
