//! Error types for `haven-core`.

use thiserror::Error;
use uuid::Uuid;

#[derive(Debug, Error)]
pub enum Error {
  #[error("user not found: {0}")]
  UnknownUser(Uuid),

  #[error("answer {index} is out of range: {value} (expected 0..=3)")]
  AnswerOutOfRange { index: usize, value: u8 },

  #[error("analysis input is empty")]
  EmptyInput,

  #[error("invalid assessment: {0}")]
  InvalidAssessment(String),

  #[error("unrecognised stress level label: {0:?}")]
  UnknownStressLevel(String),

  #[error("analysis failed: {0}")]
  Analysis(#[source] Box<dyn std::error::Error + Send + Sync>),

  #[error("stored collection {key:?} does not decode: {source}")]
  CorruptCollection {
    key:    &'static str,
    source: serde_json::Error,
  },

  #[error("store error: {0}")]
  Store(#[source] Box<dyn std::error::Error + Send + Sync>),

  #[error("serialization error: {0}")]
  Serialization(#[from] serde_json::Error),
}

impl Error {
  /// Box a backend error into [`Error::Store`].
  pub fn store(e: impl std::error::Error + Send + Sync + 'static) -> Self {
    Self::Store(Box::new(e))
  }

  /// Box a model-client error into [`Error::Analysis`].
  pub fn analysis(e: impl std::error::Error + Send + Sync + 'static) -> Self {
    Self::Analysis(Box::new(e))
  }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
