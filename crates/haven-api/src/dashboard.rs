//! Handler for `GET /dashboard?userId=<id>`.

use axum::{
  Json,
  extract::{Query, State},
};
use haven_core::{analysis::Analyzer, service::Dashboard, store::KeyValueStore};

use crate::{AppState, UserQuery, error::ApiError};

pub async fn handler<S, A>(
  State(state): State<AppState<S, A>>,
  Query(params): Query<UserQuery>,
) -> Result<Json<Dashboard>, ApiError>
where
  S: KeyValueStore,
  A: Analyzer,
{
  Ok(Json(state.haven.dashboard(params.user_id).await?))
}
