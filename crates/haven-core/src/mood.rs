//! Mood entries.

use chrono::{DateTime, Local, NaiveDate, TimeDelta, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Length of the sliding lookback used by the weekly view, in days.
pub const WEEKLY_WINDOW_DAYS: i64 = 7;

#[derive(
  Debug,
  Clone,
  Copy,
  PartialEq,
  Eq,
  Hash,
  Serialize,
  Deserialize,
  strum::Display,
  strum::EnumString,
  strum::EnumIter,
)]
#[strum(ascii_case_insensitive)]
pub enum Mood {
  Happy,
  Sad,
  Anxious,
  Angry,
  Calm,
}

impl Mood {
  pub fn emoji(self) -> &'static str {
    match self {
      Self::Happy => "😊",
      Self::Sad => "😔",
      Self::Anxious => "😰",
      Self::Angry => "😠",
      Self::Calm => "🧘",
    }
  }

  /// Position on a rough 0–5 wellbeing axis, used for trend summaries.
  pub fn trend_value(self) -> u8 {
    match self {
      Self::Happy => 5,
      Self::Calm => 4,
      Self::Sad => 2,
      Self::Anxious => 1,
      Self::Angry => 0,
    }
  }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MoodEntry {
  pub id:      Uuid,
  pub user_id: Uuid,
  pub mood:    Mood,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub note:    Option<String>,
  pub date:    DateTime<Utc>,
}

impl MoodEntry {
  pub fn new(
    user_id: Uuid,
    mood: Mood,
    note: Option<String>,
    date: DateTime<Utc>,
  ) -> Self {
    Self { id: Uuid::new_v4(), user_id, mood, note, date }
  }

  /// Whether the entry falls inside the week ending at `now` (inclusive).
  pub fn within_week_of(&self, now: DateTime<Utc>) -> bool {
    self.date >= now - TimeDelta::days(WEEKLY_WINDOW_DAYS)
  }

  /// The local calendar day the entry was logged on.
  pub fn local_day(&self) -> NaiveDate {
    self.date.with_timezone(&Local).date_naive()
  }
}
