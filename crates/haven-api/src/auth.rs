//! Handlers for `/auth` endpoints.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `POST` | `/auth/register` | Body: `{"name":"..","email":".."}`; 201 |
//! | `POST` | `/auth/login` | Body: `{"email":".."}`; 404 if no user matches |
//! | `POST` | `/auth/logout` | 204 |
//! | `GET`  | `/auth/me` | 404 if nobody is logged in |

use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};
use haven_core::{analysis::Analyzer, store::KeyValueStore, user::User};
use serde::Deserialize;

use crate::{AppState, error::ApiError};

#[derive(Debug, Deserialize)]
pub struct RegisterBody {
  pub name:  String,
  pub email: String,
}

/// `POST /auth/register`
pub async fn register<S, A>(
  State(state): State<AppState<S, A>>,
  Json(body): Json<RegisterBody>,
) -> Result<impl IntoResponse, ApiError>
where
  S: KeyValueStore,
  A: Analyzer,
{
  let user = state.haven.register(&body.name, &body.email).await?;
  Ok((StatusCode::CREATED, Json(user)))
}

#[derive(Debug, Deserialize)]
pub struct LoginBody {
  pub email: String,
}

/// `POST /auth/login`
pub async fn login<S, A>(
  State(state): State<AppState<S, A>>,
  Json(body): Json<LoginBody>,
) -> Result<Json<User>, ApiError>
where
  S: KeyValueStore,
  A: Analyzer,
{
  let user = state
    .haven
    .login(&body.email)
    .await?
    .ok_or_else(|| ApiError::NotFound(format!("no account for {}", body.email)))?;
  Ok(Json(user))
}

/// `POST /auth/logout`
pub async fn logout<S, A>(
  State(state): State<AppState<S, A>>,
) -> Result<StatusCode, ApiError>
where
  S: KeyValueStore,
  A: Analyzer,
{
  state.haven.logout().await?;
  Ok(StatusCode::NO_CONTENT)
}

/// `GET /auth/me`
pub async fn me<S, A>(State(state): State<AppState<S, A>>) -> Result<Json<User>, ApiError>
where
  S: KeyValueStore,
  A: Analyzer,
{
  let user = state
    .haven
    .current_user()
    .await?
    .ok_or_else(|| ApiError::NotFound("no active session".into()))?;
  Ok(Json(user))
}
