//! Error type for `haven-store-sqlite`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("database error: {0}")]
  Database(#[from] tokio_rusqlite::Error),

  /// The value exceeds the configured per-key size limit.
  #[error("value for {key:?} is {size} bytes, over the {limit} byte limit")]
  ValueTooLarge { key: String, size: usize, limit: usize },
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
