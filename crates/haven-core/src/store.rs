//! The `KeyValueStore` trait and the typed collection layer built on it.
//!
//! A backend only has to persist opaque strings under string keys
//! (`haven-store-sqlite` does this with a single table). [`Records`] turns
//! that into the collection contract the domain relies on: each
//! [`Collection`] is one JSON-encoded, ordered list of records, and the
//! session pointer is a single optional [`User`] under its own key.

use std::{future::Future, sync::Arc};

use serde::{Serialize, de::DeserializeOwned};
use tokio::sync::Mutex;

use crate::{Error, Result, user::User};

/// Key under which the current session's user is stored.
pub const SESSION_KEY: &str = "current_user";

// ─── Collections ─────────────────────────────────────────────────────────────

/// The append-only record collections.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Collection {
  Users,
  StressResults,
  Moods,
  AiHistory,
}

impl Collection {
  pub const ALL: [Collection; 4] =
    [Self::Users, Self::StressResults, Self::Moods, Self::AiHistory];

  fn index(self) -> usize {
    match self {
      Self::Users => 0,
      Self::StressResults => 1,
      Self::Moods => 2,
      Self::AiHistory => 3,
    }
  }

  /// The storage key holding this collection.
  pub fn key(self) -> &'static str {
    match self {
      Self::Users => "users",
      Self::StressResults => "stress_results",
      Self::Moods => "moods",
      Self::AiHistory => "ai_history",
    }
  }
}

// ─── Trait ───────────────────────────────────────────────────────────────────

/// Abstraction over a durable string key-value medium.
///
/// All methods return `Send` futures so the trait can be used in
/// multi-threaded async runtimes (e.g. tokio with `axum`).
pub trait KeyValueStore: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  /// The value stored under `key`, or `None` if nothing is.
  fn get<'a>(
    &'a self,
    key: &'a str,
  ) -> impl Future<Output = Result<Option<String>, Self::Error>> + Send + 'a;

  /// Store `value` under `key`, replacing any previous value.
  fn put<'a>(
    &'a self,
    key: &'a str,
    value: String,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + 'a;

  /// Delete `key`. Removing an absent key is not an error.
  fn remove<'a>(
    &'a self,
    key: &'a str,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + 'a;
}

// ─── Typed collections ───────────────────────────────────────────────────────

/// Typed, JSON-encoded collections over a [`KeyValueStore`].
///
/// Writes to one collection are serialized across every clone of the same
/// `Records`, so concurrent appends through a shared instance never lose
/// each other's records. Separate instances over the same medium do not
/// coordinate.
#[derive(Debug, Clone)]
pub struct Records<S> {
  store: S,
  locks: Arc<[Mutex<()>; 4]>,
}

impl<S: KeyValueStore> Records<S> {
  pub fn new(store: S) -> Self {
    Self { store, locks: Arc::new(Default::default()) }
  }

  pub fn store(&self) -> &S { &self.store }

  /// Read a whole collection in stored order.
  ///
  /// An absent key or undecodable contents yield an empty list; only a
  /// failure of the medium itself is returned as an error.
  pub async fn read<T: DeserializeOwned>(&self, collection: Collection) -> Result<Vec<T>> {
    let key = collection.key();
    let raw = self.store.get(key).await.map_err(Error::store)?;
    let Some(raw) = raw else {
      return Ok(Vec::new());
    };
    match serde_json::from_str(&raw) {
      Ok(records) => Ok(records),
      Err(e) => {
        tracing::warn!(key, error = %e, "discarding undecodable collection");
        Ok(Vec::new())
      }
    }
  }

  /// Like [`Records::read`], but contents that exist and fail to decode are
  /// an error rather than an empty list.
  async fn read_strict<T: DeserializeOwned>(&self, collection: Collection) -> Result<Vec<T>> {
    let key = collection.key();
    match self.store.get(key).await.map_err(Error::store)? {
      None => Ok(Vec::new()),
      Some(raw) => {
        serde_json::from_str(&raw).map_err(|source| Error::CorruptCollection { key, source })
      }
    }
  }

  async fn put_encoded<T: Serialize + Sync>(
    &self,
    collection: Collection,
    records: &[T],
  ) -> Result<()> {
    let encoded = serde_json::to_string(records)?;
    self
      .store
      .put(collection.key(), encoded)
      .await
      .map_err(Error::store)
  }

  /// Replace a whole collection. Encoding and write failures are returned.
  pub async fn write<T: Serialize + Sync>(
    &self,
    collection: Collection,
    records: &[T],
  ) -> Result<()> {
    let _guard = self.locks[collection.index()].lock().await;
    self.put_encoded(collection, records).await
  }

  /// Append one record to the end of a collection.
  ///
  /// Stored contents that no longer decode are left untouched and reported
  /// as [`Error::CorruptCollection`].
  pub async fn append<T>(&self, collection: Collection, record: T) -> Result<()>
  where
    T: Serialize + DeserializeOwned + Send + Sync,
  {
    let _guard = self.locks[collection.index()].lock().await;
    let mut records: Vec<T> = self.read_strict(collection).await.inspect_err(|e| {
      tracing::error!(key = collection.key(), error = %e, "refusing to append to collection");
    })?;
    records.push(record);
    self.put_encoded(collection, &records).await
  }

  // ── Session pointer ───────────────────────────────────────────────────────

  /// The user of the current session, if any.
  pub async fn session(&self) -> Result<Option<User>> {
    let raw = self.store.get(SESSION_KEY).await.map_err(Error::store)?;
    Ok(raw.and_then(|raw| match serde_json::from_str(&raw) {
      Ok(user) => Some(user),
      Err(e) => {
        tracing::warn!(error = %e, "discarding undecodable session pointer");
        None
      }
    }))
  }

  pub async fn set_session(&self, user: &User) -> Result<()> {
    let encoded = serde_json::to_string(user)?;
    self
      .store
      .put(SESSION_KEY, encoded)
      .await
      .map_err(Error::store)
  }

  pub async fn clear_session(&self) -> Result<()> {
    self.store.remove(SESSION_KEY).await.map_err(Error::store)
  }
}
