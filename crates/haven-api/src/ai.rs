//! Handlers for `/ai` endpoints.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `POST` | `/ai/analyze` | Body: `{"userId":"..","text":".."}`; 201, or 502 if the model fails |
//! | `GET`  | `/ai/history` | `?userId=` required |

use axum::{
  Json,
  extract::{Query, State},
  http::StatusCode,
  response::IntoResponse,
};
use haven_core::{
  analysis::{AiAnalysis, Analyzer},
  store::KeyValueStore,
};
use serde::Deserialize;
use uuid::Uuid;

use crate::{AppState, UserQuery, error::ApiError};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyzeBody {
  pub user_id: Uuid,
  pub text:    String,
}

/// `POST /ai/analyze`
pub async fn analyze<S, A>(
  State(state): State<AppState<S, A>>,
  Json(body): Json<AnalyzeBody>,
) -> Result<impl IntoResponse, ApiError>
where
  S: KeyValueStore,
  A: Analyzer,
{
  let analysis = state
    .haven
    .analyze(body.user_id, &body.text, state.analyzer.as_ref())
    .await?;
  Ok((StatusCode::CREATED, Json(analysis)))
}

/// `GET /ai/history?userId=<id>`
pub async fn history<S, A>(
  State(state): State<AppState<S, A>>,
  Query(params): Query<UserQuery>,
) -> Result<Json<Vec<AiAnalysis>>, ApiError>
where
  S: KeyValueStore,
  A: Analyzer,
{
  Ok(Json(state.haven.analysis_history(params.user_id).await?))
}
