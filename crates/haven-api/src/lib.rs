//! JSON REST API for Haven.
//!
//! Exposes an axum [`Router`] backed by any [`KeyValueStore`] and any
//! [`Analyzer`]. Auth, TLS, and transport concerns are the caller's
//! responsibility; there is no authentication, and every per-user endpoint
//! names its user explicitly with `userId`.
//!
//! # Mounting
//!
//! ```rust,ignore
//! .nest("/api", haven_api::api_router(state))
//! ```

pub mod ai;
pub mod auth;
pub mod catalog;
pub mod dashboard;
pub mod error;
pub mod mood;
pub mod stress;

use std::sync::Arc;

use axum::{
  Router,
  routing::{get, post},
};
use haven_core::{Haven, analysis::Analyzer, store::KeyValueStore};
use serde::Deserialize;
use tower_http::trace::TraceLayer;
use uuid::Uuid;

pub use error::ApiError;

// ─── Application state ────────────────────────────────────────────────────────

/// Shared state threaded through all handlers.
pub struct AppState<S, A> {
  pub haven:    Arc<Haven<S>>,
  pub analyzer: Arc<A>,
}

impl<S, A> AppState<S, A> {
  pub fn new(haven: Haven<S>, analyzer: A) -> Self {
    Self { haven: Arc::new(haven), analyzer: Arc::new(analyzer) }
  }
}

impl<S, A> Clone for AppState<S, A> {
  fn clone(&self) -> Self {
    Self { haven: self.haven.clone(), analyzer: self.analyzer.clone() }
  }
}

/// `?userId=<uuid>`, shared by every per-user listing endpoint.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserQuery {
  pub user_id: Uuid,
}

// ─── Router ───────────────────────────────────────────────────────────────────

/// Build the API router for `state`.
///
/// The returned `Router<()>` can be nested into any parent router regardless
/// of its own state type.
pub fn api_router<S, A>(state: AppState<S, A>) -> Router<()>
where
  S: KeyValueStore + 'static,
  A: Analyzer + 'static,
{
  Router::new()
    // Auth
    .route("/auth/register", post(auth::register::<S, A>))
    .route("/auth/login", post(auth::login::<S, A>))
    .route("/auth/logout", post(auth::logout::<S, A>))
    .route("/auth/me", get(auth::me::<S, A>))
    // Stress
    .route("/questions", get(catalog::questions))
    .route("/stress/submit", post(stress::submit::<S, A>))
    .route("/stress/history", get(stress::history::<S, A>))
    // Mood
    .route("/mood/add", post(mood::add::<S, A>))
    .route("/mood/weekly", get(mood::weekly::<S, A>))
    .route("/mood/history", get(mood::history::<S, A>))
    // AI
    .route("/ai/analyze", post(ai::analyze::<S, A>))
    .route("/ai/history", get(ai::history::<S, A>))
    // Summary and static content
    .route("/dashboard", get(dashboard::handler::<S, A>))
    .route("/exercises", get(catalog::exercises))
    .route("/emergency", get(catalog::emergency))
    .layer(TraceLayer::new_for_http())
    .with_state(state)
}

#[cfg(test)]
mod tests;
