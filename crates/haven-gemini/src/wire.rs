//! Request and response bodies for the `generateContent` endpoint.
//!
//! Only the fields Haven sends or reads are modelled.

use haven_core::analysis::{SYSTEM_INSTRUCTION, user_prompt};
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

use crate::{Error, Result};

// ─── Request ─────────────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateRequest {
  pub system_instruction: Content,
  pub contents:           Vec<Content>,
  pub generation_config:  GenerationConfig,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct Content {
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub role:  Option<String>,
  #[serde(default)]
  pub parts: Vec<Part>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct Part {
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub text: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationConfig {
  pub response_mime_type: &'static str,
  pub response_schema:    Value,
}

/// The schema the model's JSON must follow.
fn response_schema() -> Value {
  json!({
    "type": "OBJECT",
    "properties": {
      "stressLevel":       { "type": "STRING" },
      "emotion":           { "type": "STRING" },
      "possibleCause":     { "type": "STRING" },
      "tips":              { "type": "ARRAY", "items": { "type": "STRING" } },
      "empatheticSummary": { "type": "STRING" }
    },
    "required": ["stressLevel", "emotion", "possibleCause", "tips", "empatheticSummary"]
  })
}

fn text_content(role: Option<&str>, text: String) -> Content {
  Content {
    role:  role.map(str::to_owned),
    parts: vec![Part { text: Some(text) }],
  }
}

/// Build the request body for analysing `text`.
pub fn analysis_request(text: &str) -> GenerateRequest {
  GenerateRequest {
    system_instruction: text_content(None, SYSTEM_INSTRUCTION.to_owned()),
    contents:           vec![text_content(Some("user"), user_prompt(text))],
    generation_config:  GenerationConfig {
      response_mime_type: "application/json",
      response_schema:    response_schema(),
    },
  }
}

// ─── Response ────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct GenerateResponse {
  #[serde(default)]
  pub candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
pub struct Candidate {
  pub content: Option<Content>,
}

impl GenerateResponse {
  /// Concatenated text parts of the first candidate.
  pub fn into_text(self) -> Result<String> {
    let text: String = self
      .candidates
      .into_iter()
      .next()
      .and_then(|c| c.content)
      .map(|c| c.parts.into_iter().filter_map(|p| p.text).collect())
      .unwrap_or_default();

    if text.trim().is_empty() {
      Err(Error::EmptyResponse)
    } else {
      Ok(text)
    }
  }
}
