//! In-process test doubles for the core's two ports.

use std::{
  collections::HashMap,
  sync::{Arc, Mutex},
};

use crate::{
  Error,
  analysis::{Analyzer, Assessment, parse_assessment},
  store::KeyValueStore,
};

/// A `HashMap`-backed store.
#[derive(Clone, Default)]
pub struct MemoryStore {
  entries: Arc<Mutex<HashMap<String, String>>>,
}

impl KeyValueStore for MemoryStore {
  type Error = std::convert::Infallible;

  async fn get(&self, key: &str) -> Result<Option<String>, Self::Error> {
    let value = self.entries.lock().unwrap().get(key).cloned();
    // Give other tasks a chance to run between a read and the write after it.
    tokio::task::yield_now().await;
    Ok(value)
  }

  async fn put(&self, key: &str, value: String) -> Result<(), Self::Error> {
    self.entries.lock().unwrap().insert(key.to_owned(), value);
    Ok(())
  }

  async fn remove(&self, key: &str) -> Result<(), Self::Error> {
    self.entries.lock().unwrap().remove(key);
    Ok(())
  }
}

/// A store that reads as empty and rejects every write.
#[derive(Clone, Default)]
pub struct FailingStore;

#[derive(Debug, thiserror::Error)]
#[error("quota exceeded")]
pub struct QuotaExceeded;

impl KeyValueStore for FailingStore {
  type Error = QuotaExceeded;

  async fn get(&self, _: &str) -> Result<Option<String>, Self::Error> { Ok(None) }

  async fn put(&self, _: &str, _: String) -> Result<(), Self::Error> {
    Err(QuotaExceeded)
  }

  async fn remove(&self, _: &str) -> Result<(), Self::Error> { Err(QuotaExceeded) }
}

/// A [`MemoryStore`] that refuses writes to one key.
#[derive(Clone)]
pub struct ReadOnlyKey {
  pub inner: MemoryStore,
  pub key:   &'static str,
}

impl KeyValueStore for ReadOnlyKey {
  type Error = QuotaExceeded;

  async fn get(&self, key: &str) -> Result<Option<String>, Self::Error> {
    Ok(self.inner.entries.lock().unwrap().get(key).cloned())
  }

  async fn put(&self, key: &str, value: String) -> Result<(), Self::Error> {
    if key == self.key {
      return Err(QuotaExceeded);
    }
    self.inner.entries.lock().unwrap().insert(key.to_owned(), value);
    Ok(())
  }

  async fn remove(&self, key: &str) -> Result<(), Self::Error> {
    self.inner.entries.lock().unwrap().remove(key);
    Ok(())
  }
}

/// An analyzer that replies with a canned JSON body.
pub struct CannedAnalyzer(pub String);

impl Analyzer for CannedAnalyzer {
  type Error = Error;

  async fn assess(&self, _: &str) -> Result<Assessment, Self::Error> {
    parse_assessment(&self.0)
  }
}
