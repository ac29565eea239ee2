//! Subcommand implementations.
//!
//! Each command writes its human-readable output to `out` so the same code
//! serves the terminal and the tests.

use std::io::{BufRead, Write};

use anyhow::{Context as _, Result, anyhow, bail};
use chrono::{DateTime, Local, Utc};
use haven_core::{
  Haven,
  analysis::{AiAnalysis, Analyzer},
  catalog::{self, EMERGENCY_CONTACTS, EXERCISES},
  mood::{Mood, MoodEntry},
  scoring::{Frequency, QUESTIONS, StressResult, points_for},
  store::KeyValueStore,
  user::User,
};

fn when(date: DateTime<Utc>) -> String {
  date.with_timezone(&Local).format("%Y-%m-%d %H:%M").to_string()
}

/// The logged-in user, or an error telling the caller how to get one.
pub async fn require_user<S: KeyValueStore>(haven: &Haven<S>) -> Result<User> {
  haven
    .current_user()
    .await?
    .ok_or_else(|| anyhow!("not logged in; run `haven login <email>` first"))
}

// ─── Session ─────────────────────────────────────────────────────────────────

pub async fn register<S: KeyValueStore>(
  haven: &Haven<S>,
  name: &str,
  email: &str,
  out: &mut impl Write,
) -> Result<()> {
  let user = haven.register(name, email).await?;
  writeln!(out, "Welcome, {}! You are now logged in as {}.", user.name, user.email)?;
  Ok(())
}

pub async fn login<S: KeyValueStore>(
  haven: &Haven<S>,
  email: &str,
  out: &mut impl Write,
) -> Result<()> {
  let Some(user) = haven.login(email).await? else {
    bail!("no account for {email}; run `haven register` first");
  };
  writeln!(out, "Logged in as {} <{}>.", user.name, user.email)?;
  Ok(())
}

pub async fn logout<S: KeyValueStore>(haven: &Haven<S>, out: &mut impl Write) -> Result<()> {
  haven.logout().await?;
  writeln!(out, "Logged out.")?;
  Ok(())
}

pub async fn whoami<S: KeyValueStore>(haven: &Haven<S>, out: &mut impl Write) -> Result<()> {
  match haven.current_user().await? {
    Some(user) => writeln!(out, "{} <{}> ({})", user.name, user.email, user.id)?,
    None => writeln!(out, "Not logged in.")?,
  }
  Ok(())
}

// ─── Stress ──────────────────────────────────────────────────────────────────

/// Turn `--answers` indices into frequencies, or ask each question on `input`.
pub fn collect_answers(
  preset: Option<Vec<u8>>,
  input: &mut impl BufRead,
  out: &mut impl Write,
) -> Result<Vec<Frequency>> {
  if let Some(indices) = preset {
    if indices.len() != QUESTIONS.len() {
      bail!("expected {} answers, got {}", QUESTIONS.len(), indices.len());
    }
    return indices
      .into_iter()
      .map(|i| Frequency::from_index(i).ok_or_else(|| anyhow!("answer {i} is not in 0..=3")))
      .collect();
  }

  let mut answers = Vec::with_capacity(QUESTIONS.len());
  for question in &QUESTIONS {
    writeln!(out, "\nQuestion {} of {}", question.id, QUESTIONS.len())?;
    writeln!(out, "{}", question.text)?;
    for f in Frequency::ALL {
      writeln!(out, "  [{}] {}", f.index(), f.label())?;
    }
    answers.push(prompt_frequency(input, out)?);
  }
  Ok(answers)
}

fn prompt_frequency(input: &mut impl BufRead, out: &mut impl Write) -> Result<Frequency> {
  loop {
    write!(out, "> ")?;
    out.flush()?;
    let mut line = String::new();
    if input.read_line(&mut line).context("reading answer")? == 0 {
      bail!("questionnaire aborted");
    }
    if let Ok(i) = line.trim().parse::<u8>()
      && let Some(f) = Frequency::from_index(i)
    {
      return Ok(f);
    }
    writeln!(out, "Please enter a number from 0 to 3.")?;
  }
}

pub async fn quiz<S: KeyValueStore>(
  haven: &Haven<S>,
  answers: &[Frequency],
  out: &mut impl Write,
) -> Result<StressResult> {
  let user = require_user(haven).await?;
  let result = haven.submit_stress(user.id, &points_for(answers)).await?;
  writeln!(out, "\nYour score: {}/30 ({})", result.score, result.level)?;
  writeln!(out, "{}", result.level.advice())?;
  Ok(result)
}

pub async fn stress_history<S: KeyValueStore>(
  haven: &Haven<S>,
  out: &mut impl Write,
) -> Result<()> {
  let user = require_user(haven).await?;
  let results = haven.stress_history(user.id).await?;
  if results.is_empty() {
    writeln!(out, "No questionnaire results yet. Run `haven quiz`.")?;
  }
  for r in results {
    writeln!(out, "{}  {:>2}/30  {}", when(r.date), r.score, r.level)?;
  }
  Ok(())
}

// ─── Mood ────────────────────────────────────────────────────────────────────

fn print_mood(entry: &MoodEntry, out: &mut impl Write) -> Result<()> {
  write!(out, "{}  {} {}", when(entry.date), entry.mood.emoji(), entry.mood)?;
  if let Some(note) = &entry.note {
    write!(out, "  {note}")?;
  }
  writeln!(out)?;
  Ok(())
}

/// Log a mood. A second entry on the same local day needs `force`.
pub async fn mood_add<S: KeyValueStore>(
  haven: &Haven<S>,
  mood: Mood,
  note: Option<String>,
  force: bool,
  out: &mut impl Write,
) -> Result<()> {
  let user = require_user(haven).await?;
  let today = Local::now().date_naive();
  if !force && haven.mood_logged_on(user.id, today).await? {
    bail!("you already logged a mood today; pass --force to add another");
  }
  let entry = haven.add_mood(user.id, mood, note).await?;
  write!(out, "Logged: ")?;
  print_mood(&entry, out)
}

pub async fn mood_week<S: KeyValueStore>(haven: &Haven<S>, out: &mut impl Write) -> Result<()> {
  let user = require_user(haven).await?;
  let entries = haven.weekly_moods(user.id).await?;
  if entries.is_empty() {
    writeln!(out, "No moods logged in the last 7 days.")?;
    return Ok(());
  }
  for entry in &entries {
    print_mood(entry, out)?;
  }
  let trend: String = entries
    .iter()
    .map(|e| char::from(b'0' + e.mood.trend_value()))
    .collect();
  writeln!(out, "Trend (0 low, 5 high): {trend}")?;
  Ok(())
}

pub async fn mood_history<S: KeyValueStore>(
  haven: &Haven<S>,
  out: &mut impl Write,
) -> Result<()> {
  let user = require_user(haven).await?;
  for entry in haven.mood_history(user.id).await? {
    print_mood(&entry, out)?;
  }
  Ok(())
}

// ─── AI analysis ─────────────────────────────────────────────────────────────

fn print_analysis(a: &AiAnalysis, out: &mut impl Write) -> Result<()> {
  writeln!(out, "{}  {}", when(a.date), a.stress_level)?;
  writeln!(out, "  Emotion:        {}", a.emotion)?;
  writeln!(out, "  Possible cause: {}", a.possible_cause)?;
  for (i, tip) in a.tips.iter().enumerate() {
    writeln!(out, "  {}. {tip}", i + 1)?;
  }
  writeln!(out, "  {}", a.empathetic_summary)?;
  Ok(())
}

pub async fn analyze<S: KeyValueStore, A: Analyzer>(
  haven: &Haven<S>,
  analyzer: &A,
  text: &str,
  out: &mut impl Write,
) -> Result<()> {
  let user = require_user(haven).await?;
  let analysis = haven.analyze(user.id, text, analyzer).await?;
  print_analysis(&analysis, out)
}

pub async fn analyses<S: KeyValueStore>(haven: &Haven<S>, out: &mut impl Write) -> Result<()> {
  let user = require_user(haven).await?;
  for a in haven.analysis_history(user.id).await? {
    writeln!(out, "\"{}\"", a.input_text)?;
    print_analysis(&a, out)?;
  }
  Ok(())
}

// ─── Dashboard & catalog ─────────────────────────────────────────────────────

pub async fn dashboard<S: KeyValueStore>(haven: &Haven<S>, out: &mut impl Write) -> Result<()> {
  let user = require_user(haven).await?;
  let d = haven.dashboard(user.id).await?;

  writeln!(out, "Hello, {}.", user.name)?;
  match &d.latest_stress {
    Some(r) => writeln!(out, "Latest stress check: {}/30 ({}) on {}", r.score, r.level, when(r.date))?,
    None => writeln!(out, "Latest stress check: none yet")?,
  }
  match &d.latest_mood {
    Some(m) => writeln!(out, "Latest mood: {} {}", m.mood.emoji(), m.mood)?,
    None => writeln!(out, "Latest mood: none this week")?,
  }
  writeln!(out, "Moods this week: {}", d.weekly_moods.len())?;
  if let Some(a) = &d.latest_analysis {
    writeln!(out, "Latest analysis: {} ({})", a.stress_level, a.emotion)?;
  }
  Ok(())
}

pub fn exercises(id: Option<&str>, out: &mut impl Write) -> Result<()> {
  if let Some(id) = id {
    let e = catalog::exercise(id).ok_or_else(|| anyhow!("no exercise with id {id}"))?;
    writeln!(out, "{} ({} min, {})", e.title, e.duration_minutes, e.category)?;
    writeln!(out, "{}", e.description)?;
    return Ok(());
  }
  for e in EXERCISES {
    writeln!(out, "{:<10} {:<24} {} min  {}", e.id, e.title, e.duration_minutes, e.category)?;
  }
  Ok(())
}

pub fn emergency(out: &mut impl Write) -> Result<()> {
  for c in EMERGENCY_CONTACTS {
    writeln!(out, "{:<22} {:<12} {}", c.name, c.contact, c.info)?;
  }
  Ok(())
}
