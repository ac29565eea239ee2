//! AI analysis: the [`Analyzer`] port and the validation applied to whatever
//! the external model sends back.
//!
//! The model is asked for a JSON object with five required fields. Nothing it
//! returns is trusted verbatim: [`parse_assessment`] rejects missing or blank
//! fields, insists on exactly [`TIP_COUNT`] tips, and maps the free-form
//! stress label onto [`StressLevel`].

use std::future::Future;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{Error, Result, scoring::StressLevel};

/// Number of coping tips the model must return.
pub const TIP_COUNT: usize = 3;

/// System instruction sent with every analysis request.
pub const SYSTEM_INSTRUCTION: &str = "You are a mental wellness assistant. \
Analyze the user's message and return a JSON object with:
  - stressLevel (Low / Moderate / High)
  - emotion (Primary emotion detected)
  - possibleCause (A gentle guess at why they feel this way)
  - tips (Array of exactly three gentle coping suggestions)
  - empatheticSummary (A short, supportive 2-sentence summary)
Use empathetic and supportive language. Do NOT provide medical or clinical advice.";

/// Wrap user text into the prompt content.
pub fn user_prompt(text: &str) -> String { format!("User says: \"{text}\"") }

// ─── Assessment ──────────────────────────────────────────────────────────────

/// A validated model response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Assessment {
  pub stress_level:       StressLevel,
  pub emotion:            String,
  pub possible_cause:     String,
  pub tips:               Vec<String>,
  pub empathetic_summary: String,
}

/// The model response exactly as received, before validation.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawAssessment {
  stress_level:       Option<String>,
  emotion:            Option<String>,
  possible_cause:     Option<String>,
  tips:               Option<Vec<String>>,
  empathetic_summary: Option<String>,
}

fn required(field: &'static str, value: Option<String>) -> Result<String> {
  match value {
    Some(v) if !v.trim().is_empty() => Ok(v.trim().to_owned()),
    Some(_) => Err(Error::InvalidAssessment(format!("field {field} is blank"))),
    None => Err(Error::InvalidAssessment(format!("field {field} is missing"))),
  }
}

/// Map a model-supplied label such as `"moderate"` or `"High Stress"` onto
/// [`StressLevel`]. Anything unrecognised is an error.
pub fn normalize_stress_level(label: &str) -> Result<StressLevel> {
  let lowered = label.trim().to_ascii_lowercase();
  let word = lowered
    .strip_suffix("stress")
    .map(str::trim_end)
    .unwrap_or(&lowered);
  match word {
    "low" => Ok(StressLevel::Low),
    "moderate" | "medium" => Ok(StressLevel::Moderate),
    "high" => Ok(StressLevel::High),
    _ => Err(Error::UnknownStressLevel(label.to_owned())),
  }
}

/// Validate the model's JSON text into an [`Assessment`].
pub fn parse_assessment(json: &str) -> Result<Assessment> {
  let raw: RawAssessment = serde_json::from_str(json.trim())
    .map_err(|e| Error::InvalidAssessment(e.to_string()))?;

  let stress_level = normalize_stress_level(&required("stressLevel", raw.stress_level)?)?;
  let emotion = required("emotion", raw.emotion)?;
  let possible_cause = required("possibleCause", raw.possible_cause)?;
  let empathetic_summary = required("empatheticSummary", raw.empathetic_summary)?;

  let tips = raw
    .tips
    .ok_or_else(|| Error::InvalidAssessment("field tips is missing".into()))?;
  if tips.len() != TIP_COUNT {
    return Err(Error::InvalidAssessment(format!(
      "expected {TIP_COUNT} tips, got {}",
      tips.len()
    )));
  }
  let tips = tips
    .into_iter()
    .map(|t| required("tips[]", Some(t)))
    .collect::<Result<Vec<_>>>()?;

  Ok(Assessment {
    stress_level,
    emotion,
    possible_cause,
    tips,
    empathetic_summary,
  })
}

// ─── Persisted record ────────────────────────────────────────────────────────

/// An assessment stamped with who asked, what they wrote, and when.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AiAnalysis {
  pub id:                 Uuid,
  pub user_id:            Uuid,
  pub input_text:         String,
  pub stress_level:       StressLevel,
  pub emotion:            String,
  pub possible_cause:     String,
  pub tips:               Vec<String>,
  pub empathetic_summary: String,
  pub date:               DateTime<Utc>,
}

impl AiAnalysis {
  pub fn new(
    user_id: Uuid,
    input_text: impl Into<String>,
    assessment: Assessment,
    date: DateTime<Utc>,
  ) -> Self {
    Self {
      id: Uuid::new_v4(),
      user_id,
      input_text: input_text.into(),
      stress_level: assessment.stress_level,
      emotion: assessment.emotion,
      possible_cause: assessment.possible_cause,
      tips: assessment.tips,
      empathetic_summary: assessment.empathetic_summary,
      date,
    }
  }
}

// ─── Port ────────────────────────────────────────────────────────────────────

/// Something that turns free text into an [`Assessment`], typically by
/// calling an external language model.
pub trait Analyzer: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  fn assess<'a>(
    &'a self,
    text: &'a str,
  ) -> impl Future<Output = Result<Assessment, Self::Error>> + Send + 'a;
}
