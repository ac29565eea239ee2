//! Async HTTP client for the Gemini `generateContent` endpoint.

use std::time::Duration;

use haven_core::analysis::{Analyzer, Assessment, parse_assessment};
use reqwest::Client;

use crate::{
  Error, Result,
  wire::{GenerateResponse, analysis_request},
};

pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";
pub const DEFAULT_MODEL: &str = "gemini-3-flash-preview";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Connection settings for the Gemini API.
#[derive(Debug, Clone)]
pub struct GeminiConfig {
  pub api_key:  String,
  pub model:    String,
  pub base_url: String,
  /// Upper bound on a whole request, connect to last byte.
  pub timeout:  Duration,
}

impl GeminiConfig {
  pub fn new(api_key: impl Into<String>) -> Self {
    Self {
      api_key:  api_key.into(),
      model:    DEFAULT_MODEL.to_string(),
      base_url: DEFAULT_BASE_URL.to_string(),
      timeout:  DEFAULT_TIMEOUT,
    }
  }
}

/// An [`Analyzer`] backed by Gemini.
///
/// Cheap to clone; the inner [`reqwest::Client`] is `Arc`-based.
#[derive(Debug, Clone)]
pub struct GeminiAnalyzer {
  client: Client,
  config: GeminiConfig,
}

impl GeminiAnalyzer {
  pub fn new(config: GeminiConfig) -> Result<Self> {
    let client = Client::builder().timeout(config.timeout).build()?;
    Ok(Self { client, config })
  }

  fn url(&self) -> String {
    format!(
      "{}/models/{}:generateContent",
      self.config.base_url.trim_end_matches('/'),
      self.config.model
    )
  }

  /// Send one analysis request and return the model's raw JSON text.
  async fn generate(&self, text: &str) -> Result<String> {
    if self.config.api_key.is_empty() {
      return Err(Error::MissingApiKey);
    }

    tracing::debug!(model = %self.config.model, "requesting analysis");
    let resp = self
      .client
      .post(self.url())
      .header("x-goog-api-key", &self.config.api_key)
      .json(&analysis_request(text))
      .send()
      .await?;

    let status = resp.status();
    if !status.is_success() {
      let body = resp.text().await.unwrap_or_default();
      tracing::warn!(%status, "Gemini request rejected");
      return Err(Error::Status { status: status.as_u16(), body });
    }

    let body = resp.text().await?;
    let parsed: GenerateResponse = serde_json::from_str(&body)?;
    parsed.into_text()
  }
}

impl Analyzer for GeminiAnalyzer {
  type Error = Error;

  async fn assess(&self, text: &str) -> Result<Assessment> {
    let raw = self.generate(text).await?;
    Ok(parse_assessment(&raw)?)
  }
}
