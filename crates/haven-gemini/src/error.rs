//! Error type for `haven-gemini`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("no Gemini API key configured")]
  MissingApiKey,

  #[error("request failed: {0}")]
  Http(#[from] reqwest::Error),

  #[error("Gemini returned {status}: {body}")]
  Status { status: u16, body: String },

  #[error("Gemini response contained no text")]
  EmptyResponse,

  #[error("malformed Gemini response: {0}")]
  Decode(#[from] serde_json::Error),

  #[error(transparent)]
  Assessment(#[from] haven_core::Error),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
