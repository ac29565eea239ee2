//! The ten-item stress questionnaire and its scoring.
//!
//! Every item is answered on the same four-step frequency scale. Most items
//! award more points the more often something happened; the positively
//! phrased ones are reverse-scored so that a higher total always means more
//! stress. The total lands in `0..=30` and is bucketed into a
//! [`StressLevel`].

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{Error, Result};

/// Highest number of points a single answer can carry.
pub const MAX_ANSWER: u8 = 3;

// ─── Level ───────────────────────────────────────────────────────────────────

/// Three non-overlapping buckets over the questionnaire total.
#[derive(
  Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, strum::Display,
)]
pub enum StressLevel {
  #[serde(rename = "Low Stress", alias = "Low")]
  #[strum(to_string = "Low Stress")]
  Low,
  #[serde(rename = "Moderate Stress", alias = "Moderate")]
  #[strum(to_string = "Moderate Stress")]
  Moderate,
  #[serde(rename = "High Stress", alias = "High")]
  #[strum(to_string = "High Stress")]
  High,
}

impl StressLevel {
  /// `≤ 10` is low, `11..=20` moderate, `≥ 21` high.
  pub fn from_score(score: u32) -> Self {
    match score {
      0..=10 => Self::Low,
      11..=20 => Self::Moderate,
      _ => Self::High,
    }
  }

  /// A one-line suggestion shown alongside a questionnaire result.
  pub fn advice(self) -> &'static str {
    match self {
      Self::Low => "You are managing current stressors well. Maintain your healthy habits!",
      Self::Moderate => {
        "You're experiencing some pressure. Consider incorporating regular relaxation \
         breaks into your schedule."
      }
      Self::High => {
        "Your stress levels are quite elevated. We highly recommend focused mindfulness \
         exercises or talking to a trusted friend or counselor."
      }
    }
  }
}

// ─── Questions ───────────────────────────────────────────────────────────────

/// The answer scale shared by every question.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Frequency {
  Never,
  AlmostNever,
  Sometimes,
  FairlyOften,
}

impl Frequency {
  pub const ALL: [Frequency; 4] = [
    Frequency::Never,
    Frequency::AlmostNever,
    Frequency::Sometimes,
    Frequency::FairlyOften,
  ];

  /// Position on the scale, `0` for never through `3` for fairly often.
  pub fn index(self) -> u8 {
    match self {
      Self::Never => 0,
      Self::AlmostNever => 1,
      Self::Sometimes => 2,
      Self::FairlyOften => 3,
    }
  }

  pub fn from_index(index: u8) -> Option<Self> {
    Self::ALL.get(usize::from(index)).copied()
  }

  pub fn label(self) -> &'static str {
    match self {
      Self::Never => "Never",
      Self::AlmostNever => "Almost Never",
      Self::Sometimes => "Sometimes",
      Self::FairlyOften => "Fairly Often",
    }
  }
}

/// One questionnaire item.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct Question {
  pub id:       u8,
  pub text:     &'static str,
  /// Reverse-scored: "never" is worth the most points.
  pub reversed: bool,
}

impl Question {
  const fn new(id: u8, text: &'static str, reversed: bool) -> Self {
    Self { id, text, reversed }
  }

  /// Points awarded for answering this question with `answer`.
  pub fn points(&self, answer: Frequency) -> u8 {
    if self.reversed {
      MAX_ANSWER - answer.index()
    } else {
      answer.index()
    }
  }
}

pub const QUESTIONS: [Question; 10] = [
  Question::new(
    1,
    "How often have you been upset because of something that happened unexpectedly?",
    false,
  ),
  Question::new(
    2,
    "How often have you felt that you were unable to control the important things in your life?",
    false,
  ),
  Question::new(3, "How often have you felt nervous and 'stressed'?", false),
  Question::new(
    4,
    "How often have you felt confident about your ability to handle your personal problems?",
    true,
  ),
  Question::new(5, "How often have you felt that things were going your way?", true),
  Question::new(
    6,
    "How often have you found that you could not cope with all the things that you had to do?",
    false,
  ),
  Question::new(7, "How often have you been able to control irritations in your life?", true),
  Question::new(8, "How often have you felt that you were on top of things?", true),
  Question::new(
    9,
    "How often have you been angered because of things that were outside of your control?",
    false,
  ),
  Question::new(
    10,
    "How often have you felt difficulties were piling up so high that you could not overcome them?",
    false,
  ),
];

/// Convert one frequency answer per question into points, in question order.
///
/// Extra answers beyond the question bank are ignored.
pub fn points_for(answers: &[Frequency]) -> Vec<u8> {
  QUESTIONS
    .iter()
    .zip(answers)
    .map(|(q, a)| q.points(*a))
    .collect()
}

// ─── Scoring ─────────────────────────────────────────────────────────────────

/// Sum the per-question points.
///
/// Each element must be in `0..=3`. The number of answers is not checked;
/// supplying all ten is the caller's job.
pub fn total(answers: &[u8]) -> Result<u32> {
  answers.iter().enumerate().try_fold(0u32, |acc, (index, &value)| {
    if value > MAX_ANSWER {
      return Err(Error::AnswerOutOfRange { index, value });
    }
    Ok(acc + u32::from(value))
  })
}

// ─── Result record ───────────────────────────────────────────────────────────

/// A persisted questionnaire outcome. `level` is fixed at write time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StressResult {
  pub id:      Uuid,
  pub user_id: Uuid,
  pub score:   u32,
  pub level:   StressLevel,
  pub date:    DateTime<Utc>,
}

impl StressResult {
  pub fn new(user_id: Uuid, score: u32, date: DateTime<Utc>) -> Self {
    Self {
      id: Uuid::new_v4(),
      user_id,
      score,
      level: StressLevel::from_score(score),
      date,
    }
  }
}
