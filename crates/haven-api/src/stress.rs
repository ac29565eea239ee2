//! Handlers for `/stress` endpoints.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `POST` | `/stress/submit` | Body: `{"userId":"..","answers":[0,3,..]}`; 201 |
//! | `GET`  | `/stress/history` | `?userId=` required |

use axum::{
  Json,
  extract::{Query, State},
  http::StatusCode,
  response::IntoResponse,
};
use haven_core::{analysis::Analyzer, scoring::StressResult, store::KeyValueStore};
use serde::Deserialize;
use uuid::Uuid;

use crate::{AppState, UserQuery, error::ApiError};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmitBody {
  pub user_id: Uuid,
  /// Points per question, each `0..=3`.
  pub answers: Vec<u8>,
}

/// `POST /stress/submit`
pub async fn submit<S, A>(
  State(state): State<AppState<S, A>>,
  Json(body): Json<SubmitBody>,
) -> Result<impl IntoResponse, ApiError>
where
  S: KeyValueStore,
  A: Analyzer,
{
  let result = state.haven.submit_stress(body.user_id, &body.answers).await?;
  Ok((StatusCode::CREATED, Json(result)))
}

/// `GET /stress/history?userId=<id>`
pub async fn history<S, A>(
  State(state): State<AppState<S, A>>,
  Query(params): Query<UserQuery>,
) -> Result<Json<Vec<StressResult>>, ApiError>
where
  S: KeyValueStore,
  A: Analyzer,
{
  Ok(Json(state.haven.stress_history(params.user_id).await?))
}
