//! [`Haven`]: the domain operations.
//!
//! Every operation that acts on behalf of a user takes that user's id as an
//! explicit argument; the session pointer is only a convenience for front
//! ends that need to remember who logged in. Writes that reference a user
//! check that the user exists first.

use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;
use uuid::Uuid;

use crate::{
  Error, Result,
  analysis::{AiAnalysis, Analyzer},
  mood::{Mood, MoodEntry},
  scoring::{StressResult, total},
  store::{Collection, KeyValueStore, Records},
  user::User,
};

/// The domain operations over a [`KeyValueStore`].
///
/// Cloning is as cheap as cloning the store.
#[derive(Debug, Clone)]
pub struct Haven<S> {
  records: Records<S>,
}

impl<S: KeyValueStore> Haven<S> {
  pub fn new(store: S) -> Self { Self { records: Records::new(store) } }

  pub fn records(&self) -> &Records<S> { &self.records }

  // ── Auth ──────────────────────────────────────────────────────────────────

  /// Create a user and make it the current session.
  ///
  /// Emails are not required to be unique: a second registration with the
  /// same address creates a second, distinct user.
  ///
  /// The user is stored before the session is set. If the session write
  /// fails the error is returned but the user stays registered, and a later
  /// [`Haven::login`] with the same email picks it up.
  pub async fn register(&self, name: &str, email: &str) -> Result<User> {
    let user = User::new(name, email);
    self.records.append(Collection::Users, user.clone()).await?;
    self.records.set_session(&user).await?;
    tracing::info!(user_id = %user.id, "registered user");
    Ok(user)
  }

  /// Find the first user with exactly this email and make it the current
  /// session. Returns `None` (and leaves the session alone) if none match.
  pub async fn login(&self, email: &str) -> Result<Option<User>> {
    let users: Vec<User> = self.records.read(Collection::Users).await?;
    let Some(user) = users.into_iter().find(|u| u.email == email) else {
      return Ok(None);
    };
    self.records.set_session(&user).await?;
    tracing::info!(user_id = %user.id, "logged in");
    Ok(Some(user))
  }

  pub async fn logout(&self) -> Result<()> { self.records.clear_session().await }

  pub async fn current_user(&self) -> Result<Option<User>> { self.records.session().await }

  pub async fn users(&self) -> Result<Vec<User>> { self.records.read(Collection::Users).await }

  async fn ensure_user(&self, user_id: Uuid) -> Result<()> {
    let users: Vec<User> = self.records.read(Collection::Users).await?;
    if users.iter().any(|u| u.id == user_id) {
      Ok(())
    } else {
      Err(Error::UnknownUser(user_id))
    }
  }

  async fn read_for<T, F>(&self, collection: Collection, user_id: Uuid, owner: F) -> Result<Vec<T>>
  where
    T: serde::de::DeserializeOwned + Send,
    F: Fn(&T) -> Uuid,
  {
    let mut records: Vec<T> = self.records.read(collection).await?;
    records.retain(|r| owner(r) == user_id);
    Ok(records)
  }

  // ── Stress ────────────────────────────────────────────────────────────────

  /// Score a questionnaire and record the result.
  ///
  /// `answers` holds the points awarded per question (each `0..=3`); see
  /// [`crate::scoring::points_for`] to derive them from frequency answers.
  pub async fn submit_stress(&self, user_id: Uuid, answers: &[u8]) -> Result<StressResult> {
    let score = total(answers)?;
    self.ensure_user(user_id).await?;
    let result = StressResult::new(user_id, score, Utc::now());
    self
      .records
      .append(Collection::StressResults, result.clone())
      .await?;
    tracing::debug!(%user_id, score, level = %result.level, "recorded stress result");
    Ok(result)
  }

  pub async fn stress_history(&self, user_id: Uuid) -> Result<Vec<StressResult>> {
    self
      .read_for(Collection::StressResults, user_id, |r: &StressResult| r.user_id)
      .await
  }

  // ── Mood ──────────────────────────────────────────────────────────────────

  /// Log a mood now. A blank note is stored as no note.
  pub async fn add_mood(
    &self,
    user_id: Uuid,
    mood: Mood,
    note: Option<String>,
  ) -> Result<MoodEntry> {
    self.ensure_user(user_id).await?;
    let note = note.filter(|n| !n.trim().is_empty());
    let entry = MoodEntry::new(user_id, mood, note, Utc::now());
    self.records.append(Collection::Moods, entry.clone()).await?;
    tracing::debug!(%user_id, %mood, "logged mood");
    Ok(entry)
  }

  pub async fn mood_history(&self, user_id: Uuid) -> Result<Vec<MoodEntry>> {
    self
      .read_for(Collection::Moods, user_id, |e: &MoodEntry| e.user_id)
      .await
  }

  /// Entries from the last seven days (sliding, not calendar-aligned).
  pub async fn weekly_moods(&self, user_id: Uuid) -> Result<Vec<MoodEntry>> {
    self.weekly_moods_as_of(user_id, Utc::now()).await
  }

  /// Entries dated on or after `now - 7 days`.
  pub async fn weekly_moods_as_of(
    &self,
    user_id: Uuid,
    now: DateTime<Utc>,
  ) -> Result<Vec<MoodEntry>> {
    let mut entries = self.mood_history(user_id).await?;
    entries.retain(|e| e.within_week_of(now));
    Ok(entries)
  }

  /// Whether the user already logged a mood on the given local day.
  pub async fn mood_logged_on(&self, user_id: Uuid, day: NaiveDate) -> Result<bool> {
    let entries = self.mood_history(user_id).await?;
    Ok(entries.iter().any(|e| e.local_day() == day))
  }

  // ── AI analysis ───────────────────────────────────────────────────────────

  /// Ask `analyzer` to assess `text` and record the outcome.
  ///
  /// Nothing is persisted unless the analyzer returns a complete, valid
  /// assessment.
  pub async fn analyze<A: Analyzer>(
    &self,
    user_id: Uuid,
    text: &str,
    analyzer: &A,
  ) -> Result<AiAnalysis> {
    let text = text.trim();
    if text.is_empty() {
      return Err(Error::EmptyInput);
    }
    self.ensure_user(user_id).await?;

    let assessment = analyzer.assess(text).await.map_err(|e| {
      tracing::warn!(%user_id, error = %e, "analysis failed");
      Error::analysis(e)
    })?;

    let analysis = AiAnalysis::new(user_id, text, assessment, Utc::now());
    self
      .records
      .append(Collection::AiHistory, analysis.clone())
      .await?;
    tracing::info!(%user_id, level = %analysis.stress_level, "recorded analysis");
    Ok(analysis)
  }

  pub async fn analysis_history(&self, user_id: Uuid) -> Result<Vec<AiAnalysis>> {
    self
      .read_for(Collection::AiHistory, user_id, |a: &AiAnalysis| a.user_id)
      .await
  }

  // ── Dashboard ─────────────────────────────────────────────────────────────

  /// Latest results across every record type, plus the weekly mood trend.
  pub async fn dashboard(&self, user_id: Uuid) -> Result<Dashboard> {
    let latest_stress = self.stress_history(user_id).await?.pop();
    let latest_analysis = self.analysis_history(user_id).await?.pop();
    let weekly_moods = self.weekly_moods(user_id).await?;

    let mood_trend = weekly_moods
      .iter()
      .map(|e| TrendPoint { date: e.date, value: e.mood.trend_value() })
      .collect();

    Ok(Dashboard {
      user_id,
      latest_stress,
      latest_mood: weekly_moods.last().cloned(),
      weekly_moods,
      mood_trend,
      latest_analysis,
    })
  }
}

// ─── Dashboard ───────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TrendPoint {
  pub date:  DateTime<Utc>,
  pub value: u8,
}

/// Summary of one user's records.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Dashboard {
  pub user_id:         Uuid,
  pub latest_stress:   Option<StressResult>,
  /// Most recent entry inside the weekly window.
  pub latest_mood:     Option<MoodEntry>,
  pub weekly_moods:    Vec<MoodEntry>,
  pub mood_trend:      Vec<TrendPoint>,
  pub latest_analysis: Option<AiAnalysis>,
}

#[cfg(test)]
mod tests {
  use chrono::TimeDelta;

  use super::*;
  use crate::{
    scoring::StressLevel,
    store::SESSION_KEY,
    testing::{CannedAnalyzer, FailingStore, MemoryStore, ReadOnlyKey},
  };

  fn haven() -> Haven<MemoryStore> { Haven::new(MemoryStore::default()) }

  const GOOD_REPLY: &str = r#"{
    "stressLevel": "High",
    "emotion": "Anxious",
    "possibleCause": "Deadlines",
    "tips": ["Breathe", "Stretch", "Rest"],
    "empatheticSummary": "That sounds hard. You're doing your best."
  }"#;

  #[tokio::test]
  async fn register_sets_session_and_logout_clears_it() {
    let h = haven();
    let user = h.register("Ada", "ada@example.com").await.unwrap();
    assert_eq!(h.current_user().await.unwrap(), Some(user));

    h.logout().await.unwrap();
    assert!(h.current_user().await.unwrap().is_none());
  }

  #[tokio::test]
  async fn duplicate_emails_create_distinct_users() {
    let h = haven();
    let a = h.register("Ada", "same@example.com").await.unwrap();
    let b = h.register("Ada again", "same@example.com").await.unwrap();
    assert_ne!(a.id, b.id);
    assert_eq!(h.users().await.unwrap().len(), 2);

    // Login resolves to the first match.
    let logged_in = h.login("same@example.com").await.unwrap().unwrap();
    assert_eq!(logged_in.id, a.id);
  }

  #[tokio::test]
  async fn login_unknown_email_leaves_session_untouched() {
    let h = haven();
    let user = h.register("Ada", "ada@example.com").await.unwrap();
    assert!(h.login("nobody@example.com").await.unwrap().is_none());
    assert_eq!(h.current_user().await.unwrap(), Some(user));
  }

  #[tokio::test]
  async fn stress_submission_records_level() {
    let h = haven();
    let user = h.register("Ada", "ada@example.com").await.unwrap();
    let result = h.submit_stress(user.id, &[2; 10]).await.unwrap();
    assert_eq!(result.score, 20);
    assert_eq!(result.level, StressLevel::Moderate);
    assert_eq!(h.stress_history(user.id).await.unwrap(), vec![result]);
  }

  #[tokio::test]
  async fn writes_for_unknown_users_are_rejected() {
    let h = haven();
    let ghost = Uuid::new_v4();
    assert!(matches!(
      h.submit_stress(ghost, &[0; 10]).await,
      Err(Error::UnknownUser(id)) if id == ghost
    ));
    assert!(matches!(
      h.add_mood(ghost, Mood::Happy, None).await,
      Err(Error::UnknownUser(_))
    ));
  }

  #[tokio::test]
  async fn histories_are_scoped_to_the_user() {
    let h = haven();
    let ada = h.register("Ada", "ada@example.com").await.unwrap();
    let bob = h.register("Bob", "bob@example.com").await.unwrap();
    h.add_mood(ada.id, Mood::Happy, None).await.unwrap();
    h.add_mood(bob.id, Mood::Sad, Some("rain".into())).await.unwrap();
    h.add_mood(ada.id, Mood::Calm, Some("  ".into())).await.unwrap();

    let moods = h.mood_history(ada.id).await.unwrap();
    assert_eq!(moods.len(), 2);
    assert_eq!(moods[0].mood, Mood::Happy);
    assert_eq!(moods[1].mood, Mood::Calm);
    assert!(moods[1].note.is_none());
  }

  #[tokio::test]
  async fn weekly_window_is_a_sliding_lookback() {
    let h = haven();
    let user = h.register("Ada", "ada@example.com").await.unwrap();
    let now = Utc::now();

    let old = MoodEntry::new(user.id, Mood::Sad, None, now - TimeDelta::days(8));
    let recent = MoodEntry::new(
      user.id,
      Mood::Calm,
      None,
      now - TimeDelta::days(6) - TimeDelta::hours(23),
    );
    h.records()
      .write(Collection::Moods, &[old, recent.clone()])
      .await
      .unwrap();

    let weekly = h.weekly_moods_as_of(user.id, now).await.unwrap();
    assert_eq!(weekly, vec![recent]);
  }

  #[tokio::test]
  async fn mood_logged_today_is_detected() {
    let h = haven();
    let user = h.register("Ada", "ada@example.com").await.unwrap();
    let entry = h.add_mood(user.id, Mood::Happy, None).await.unwrap();
    assert!(h.mood_logged_on(user.id, entry.local_day()).await.unwrap());
    let yesterday = entry.local_day().pred_opt().unwrap();
    assert!(!h.mood_logged_on(user.id, yesterday).await.unwrap());
  }

  #[tokio::test]
  async fn analysis_is_stamped_and_persisted() {
    let h = haven();
    let user = h.register("Ada", "ada@example.com").await.unwrap();
    let analyzer = CannedAnalyzer(GOOD_REPLY.into());

    let analysis = h
      .analyze(user.id, "  exams tomorrow  ", &analyzer)
      .await
      .unwrap();
    assert_eq!(analysis.user_id, user.id);
    assert_eq!(analysis.input_text, "exams tomorrow");
    assert_eq!(analysis.stress_level, StressLevel::High);
    assert_eq!(h.analysis_history(user.id).await.unwrap(), vec![analysis]);
  }

  #[tokio::test]
  async fn failed_analysis_persists_nothing() {
    let h = haven();
    let user = h.register("Ada", "ada@example.com").await.unwrap();
    let analyzer = CannedAnalyzer(
      r#"{"stressLevel":"Low","emotion":"Calm","possibleCause":"x",
          "tips":["one","two"],"empatheticSummary":"ok"}"#
        .into(),
    );

    let err = h.analyze(user.id, "fine", &analyzer).await.unwrap_err();
    assert!(matches!(err, Error::Analysis(_)));
    assert!(h.analysis_history(user.id).await.unwrap().is_empty());
  }

  #[tokio::test]
  async fn blank_analysis_input_is_rejected() {
    let h = haven();
    let user = h.register("Ada", "ada@example.com").await.unwrap();
    let analyzer = CannedAnalyzer(GOOD_REPLY.into());
    assert!(matches!(
      h.analyze(user.id, " \n ", &analyzer).await,
      Err(Error::EmptyInput)
    ));
  }

  #[tokio::test]
  async fn register_surfaces_rejected_writes() {
    let h = Haven::new(FailingStore);
    assert!(matches!(
      h.register("Ada", "ada@example.com").await,
      Err(Error::Store(_))
    ));
  }

  #[tokio::test]
  async fn failed_session_write_leaves_user_registered() {
    let h = Haven::new(ReadOnlyKey { inner: MemoryStore::default(), key: SESSION_KEY });
    assert!(matches!(
      h.register("Ada", "ada@example.com").await,
      Err(Error::Store(_))
    ));
    assert!(h.current_user().await.unwrap().is_none());

    let users = h.users().await.unwrap();
    assert_eq!(users.len(), 1);
    assert_eq!(users[0].email, "ada@example.com");
  }

  #[tokio::test]
  async fn dashboard_collects_latest_records() {
    let h = haven();
    let user = h.register("Ada", "ada@example.com").await.unwrap();
    h.submit_stress(user.id, &[0; 10]).await.unwrap();
    let latest = h.submit_stress(user.id, &[3; 10]).await.unwrap();
    h.add_mood(user.id, Mood::Anxious, None).await.unwrap();
    let mood = h.add_mood(user.id, Mood::Happy, None).await.unwrap();

    let dash = h.dashboard(user.id).await.unwrap();
    assert_eq!(dash.latest_stress, Some(latest));
    assert_eq!(dash.latest_mood, Some(mood));
    assert_eq!(
      dash.mood_trend.iter().map(|p| p.value).collect::<Vec<_>>(),
      [1, 5]
    );
    assert!(dash.latest_analysis.is_none());
  }
}
