use axum::{
  body::{Body, to_bytes},
  http::{Request, StatusCode, header},
};
use haven_core::{
  Haven,
  analysis::{Analyzer, Assessment, parse_assessment},
};
use haven_store_sqlite::SqliteStore;
use serde_json::{Value, json};
use tower::ServiceExt as _;
use uuid::Uuid;

use super::*;

const REPLY: &str = r#"{
  "stressLevel": "High Stress",
  "emotion": "Overwhelmed",
  "possibleCause": "Upcoming exams",
  "tips": ["Take a short walk", "Break study into blocks", "Sleep eight hours"],
  "empatheticSummary": "That sounds like a lot to carry right now."
}"#;

/// Parses a fixed reply, as a model would have returned it.
struct Scripted(&'static str);

impl Analyzer for Scripted {
  type Error = haven_core::Error;

  async fn assess(&self, _: &str) -> Result<Assessment, Self::Error> {
    parse_assessment(self.0)
  }
}

async fn make_state(reply: &'static str) -> AppState<SqliteStore, Scripted> {
  let store = SqliteStore::open_in_memory().await.unwrap();
  AppState::new(Haven::new(store), Scripted(reply))
}

async fn send(
  state: AppState<SqliteStore, Scripted>,
  method: &str,
  uri: &str,
  body: Option<Value>,
) -> (StatusCode, Value) {
  let mut builder = Request::builder().method(method).uri(uri);
  let body = match body {
    Some(v) => {
      builder = builder.header(header::CONTENT_TYPE, "application/json");
      Body::from(v.to_string())
    }
    None => Body::empty(),
  };
  let resp = api_router(state)
    .oneshot(builder.body(body).unwrap())
    .await
    .unwrap();
  let status = resp.status();
  let bytes = to_bytes(resp.into_body(), usize::MAX).await.unwrap();
  let value = if bytes.is_empty() {
    Value::Null
  } else {
    serde_json::from_slice(&bytes).unwrap()
  };
  (status, value)
}

async fn register(state: &AppState<SqliteStore, Scripted>, email: &str) -> Uuid {
  let (status, body) = send(
    state.clone(),
    "POST",
    "/auth/register",
    Some(json!({ "name": "Asha", "email": email })),
  )
  .await;
  assert_eq!(status, StatusCode::CREATED);
  body["id"].as_str().unwrap().parse().unwrap()
}

// ── Auth ──────────────────────────────────────────────────────────────────────

#[tokio::test]
async fn register_then_me_returns_user() {
  let state = make_state(REPLY).await;
  let id = register(&state, "asha@example.com").await;

  let (status, body) = send(state, "GET", "/auth/me", None).await;
  assert_eq!(status, StatusCode::OK);
  assert_eq!(body["id"], id.to_string());
  assert_eq!(body["email"], "asha@example.com");
}

#[tokio::test]
async fn login_unknown_email_is_404() {
  let state = make_state(REPLY).await;
  let (status, body) = send(
    state,
    "POST",
    "/auth/login",
    Some(json!({ "email": "nobody@example.com" })),
  )
  .await;
  assert_eq!(status, StatusCode::NOT_FOUND);
  assert!(body["error"].as_str().unwrap().contains("nobody@example.com"));
}

#[tokio::test]
async fn logout_clears_session() {
  let state = make_state(REPLY).await;
  register(&state, "asha@example.com").await;

  let (status, _) = send(state.clone(), "POST", "/auth/logout", None).await;
  assert_eq!(status, StatusCode::NO_CONTENT);

  let (status, _) = send(state.clone(), "GET", "/auth/me", None).await;
  assert_eq!(status, StatusCode::NOT_FOUND);

  let (status, body) = send(
    state,
    "POST",
    "/auth/login",
    Some(json!({ "email": "asha@example.com" })),
  )
  .await;
  assert_eq!(status, StatusCode::OK);
  assert_eq!(body["name"], "Asha");
}

// ── Stress ────────────────────────────────────────────────────────────────────

#[tokio::test]
async fn questions_list_ten_items_with_four_options() {
  let state = make_state(REPLY).await;
  let (status, body) = send(state, "GET", "/questions", None).await;
  assert_eq!(status, StatusCode::OK);
  let questions = body.as_array().unwrap();
  assert_eq!(questions.len(), 10);
  assert!(questions.iter().all(|q| q["options"].as_array().unwrap().len() == 4));
}

#[tokio::test]
async fn submit_scores_and_records_result() {
  let state = make_state(REPLY).await;
  let id = register(&state, "asha@example.com").await;

  let (status, body) = send(
    state.clone(),
    "POST",
    "/stress/submit",
    Some(json!({ "userId": id, "answers": [3, 3, 3, 3, 3, 3, 3, 0, 0, 0] })),
  )
  .await;
  assert_eq!(status, StatusCode::CREATED);
  assert_eq!(body["score"], 21);
  assert_eq!(body["level"], "High Stress");

  let uri = format!("/stress/history?userId={id}");
  let (status, body) = send(state, "GET", &uri, None).await;
  assert_eq!(status, StatusCode::OK);
  assert_eq!(body.as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn submit_out_of_range_answer_is_400() {
  let state = make_state(REPLY).await;
  let id = register(&state, "asha@example.com").await;

  let (status, _) = send(
    state,
    "POST",
    "/stress/submit",
    Some(json!({ "userId": id, "answers": [0, 4, 0, 0, 0, 0, 0, 0, 0, 0] })),
  )
  .await;
  assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn submit_for_unknown_user_is_404() {
  let state = make_state(REPLY).await;
  let answers = [0u8; 10];
  let (status, _) = send(
    state,
    "POST",
    "/stress/submit",
    Some(json!({ "userId": Uuid::new_v4(), "answers": answers })),
  )
  .await;
  assert_eq!(status, StatusCode::NOT_FOUND);
}

// ── Mood ──────────────────────────────────────────────────────────────────────

#[tokio::test]
async fn added_mood_appears_in_weekly_view() {
  let state = make_state(REPLY).await;
  let id = register(&state, "asha@example.com").await;

  let (status, body) = send(
    state.clone(),
    "POST",
    "/mood/add",
    Some(json!({ "userId": id, "mood": "Calm", "note": "  " })),
  )
  .await;
  assert_eq!(status, StatusCode::CREATED);
  assert!(body.get("note").is_none());

  let uri = format!("/mood/weekly?userId={id}");
  let (status, body) = send(state, "GET", &uri, None).await;
  assert_eq!(status, StatusCode::OK);
  assert_eq!(body[0]["mood"], "Calm");
}

#[tokio::test]
async fn weekly_requires_user_id() {
  let state = make_state(REPLY).await;
  let (status, _) = send(state, "GET", "/mood/weekly", None).await;
  assert_eq!(status, StatusCode::BAD_REQUEST);
}

// ── AI ────────────────────────────────────────────────────────────────────────

#[tokio::test]
async fn analyze_records_normalized_assessment() {
  let state = make_state(REPLY).await;
  let id = register(&state, "asha@example.com").await;

  let (status, body) = send(
    state.clone(),
    "POST",
    "/ai/analyze",
    Some(json!({ "userId": id, "text": "I can't sleep before exams" })),
  )
  .await;
  assert_eq!(status, StatusCode::CREATED);
  assert_eq!(body["stressLevel"], "High Stress");
  assert_eq!(body["tips"].as_array().unwrap().len(), 3);

  let uri = format!("/ai/history?userId={id}");
  let (_, body) = send(state, "GET", &uri, None).await;
  assert_eq!(body.as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn analyze_with_malformed_reply_is_502_and_not_recorded() {
  let state = make_state(r#"{"stressLevel":"High","tips":[]}"#).await;
  let id = register(&state, "asha@example.com").await;

  let (status, _) = send(
    state.clone(),
    "POST",
    "/ai/analyze",
    Some(json!({ "userId": id, "text": "rough week" })),
  )
  .await;
  assert_eq!(status, StatusCode::BAD_GATEWAY);

  let uri = format!("/ai/history?userId={id}");
  let (_, body) = send(state, "GET", &uri, None).await;
  assert!(body.as_array().unwrap().is_empty());
}

#[tokio::test]
async fn analyze_blank_text_is_400() {
  let state = make_state(REPLY).await;
  let id = register(&state, "asha@example.com").await;

  let (status, _) = send(
    state,
    "POST",
    "/ai/analyze",
    Some(json!({ "userId": id, "text": "   " })),
  )
  .await;
  assert_eq!(status, StatusCode::BAD_REQUEST);
}

// ── Dashboard and static content ──────────────────────────────────────────────

#[tokio::test]
async fn dashboard_collects_latest_records() {
  let state = make_state(REPLY).await;
  let id = register(&state, "asha@example.com").await;

  let answers = [1u8; 10];
  send(
    state.clone(),
    "POST",
    "/stress/submit",
    Some(json!({ "userId": id, "answers": answers })),
  )
  .await;
  send(
    state.clone(),
    "POST",
    "/mood/add",
    Some(json!({ "userId": id, "mood": "Happy" })),
  )
  .await;

  let uri = format!("/dashboard?userId={id}");
  let (status, body) = send(state, "GET", &uri, None).await;
  assert_eq!(status, StatusCode::OK);
  assert_eq!(body["latestStress"]["score"], 10);
  assert_eq!(body["latestMood"]["mood"], "Happy");
  assert_eq!(body["moodTrend"][0]["value"], 5);
  assert!(body["latestAnalysis"].is_null());
}

#[tokio::test]
async fn static_content_is_served() {
  let state = make_state(REPLY).await;

  let (status, body) = send(state.clone(), "GET", "/exercises", None).await;
  assert_eq!(status, StatusCode::OK);
  assert_eq!(body.as_array().unwrap().len(), 3);

  let (status, body) = send(state, "GET", "/emergency", None).await;
  assert_eq!(status, StatusCode::OK);
  assert!(body.as_array().unwrap().iter().any(|c| c["name"] == "AASRA"));
}
