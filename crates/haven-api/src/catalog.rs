//! Static content: the questionnaire, exercises, and emergency contacts.

use axum::Json;
use haven_core::{
  catalog::{EMERGENCY_CONTACTS, EXERCISES, EmergencyContact, Exercise},
  scoring::{Frequency, QUESTIONS},
};
use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct AnswerOption {
  pub label:  &'static str,
  pub points: u8,
}

#[derive(Debug, Serialize)]
pub struct QuestionBody {
  pub id:      u8,
  pub text:    &'static str,
  pub options: Vec<AnswerOption>,
}

/// `GET /questions`: each question with its options and their points.
pub async fn questions() -> Json<Vec<QuestionBody>> {
  let body = QUESTIONS
    .iter()
    .map(|q| QuestionBody {
      id:      q.id,
      text:    q.text,
      options: Frequency::ALL
        .iter()
        .map(|&f| AnswerOption { label: f.label(), points: q.points(f) })
        .collect(),
    })
    .collect();
  Json(body)
}

/// `GET /exercises`
pub async fn exercises() -> Json<&'static [Exercise]> { Json(EXERCISES) }

/// `GET /emergency`
pub async fn emergency() -> Json<&'static [EmergencyContact]> { Json(EMERGENCY_CONTACTS) }
