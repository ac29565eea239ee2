//! Handlers for `/mood` endpoints.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `POST` | `/mood/add` | Body: `{"userId":"..","mood":"Calm","note":".."}`; 201 |
//! | `GET`  | `/mood/weekly` | Last seven days; `?userId=` required |
//! | `GET`  | `/mood/history` | Everything; `?userId=` required |

use axum::{
  Json,
  extract::{Query, State},
  http::StatusCode,
  response::IntoResponse,
};
use haven_core::{
  analysis::Analyzer,
  mood::{Mood, MoodEntry},
  store::KeyValueStore,
};
use serde::Deserialize;
use uuid::Uuid;

use crate::{AppState, UserQuery, error::ApiError};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddBody {
  pub user_id: Uuid,
  pub mood:    Mood,
  pub note:    Option<String>,
}

/// `POST /mood/add`
pub async fn add<S, A>(
  State(state): State<AppState<S, A>>,
  Json(body): Json<AddBody>,
) -> Result<impl IntoResponse, ApiError>
where
  S: KeyValueStore,
  A: Analyzer,
{
  let entry = state
    .haven
    .add_mood(body.user_id, body.mood, body.note)
    .await?;
  Ok((StatusCode::CREATED, Json(entry)))
}

/// `GET /mood/weekly?userId=<id>`
pub async fn weekly<S, A>(
  State(state): State<AppState<S, A>>,
  Query(params): Query<UserQuery>,
) -> Result<Json<Vec<MoodEntry>>, ApiError>
where
  S: KeyValueStore,
  A: Analyzer,
{
  Ok(Json(state.haven.weekly_moods(params.user_id).await?))
}

/// `GET /mood/history?userId=<id>`
pub async fn history<S, A>(
  State(state): State<AppState<S, A>>,
  Query(params): Query<UserQuery>,
) -> Result<Json<Vec<MoodEntry>>, ApiError>
where
  S: KeyValueStore,
  A: Analyzer,
{
  Ok(Json(state.haven.mood_history(params.user_id).await?))
}
