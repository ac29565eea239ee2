//! Static content: guided exercises and emergency contacts.

use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, strum::Display)]
pub enum ExerciseCategory {
  Breathing,
  Grounding,
  Focus,
}

#[derive(Debug, Clone, Copy, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Exercise {
  pub id:               &'static str,
  pub title:            &'static str,
  pub description:      &'static str,
  pub duration_minutes: u32,
  pub category:         ExerciseCategory,
}

pub const EXERCISES: &[Exercise] = &[
  Exercise {
    id:               "breathe-1",
    title:            "Box Breathing",
    description:      "Inhale, hold, exhale, hold. Repeat for mental clarity.",
    duration_minutes: 2,
    category:         ExerciseCategory::Breathing,
  },
  Exercise {
    id:               "ground-1",
    title:            "5-4-3-2-1 Grounding",
    description:      "A sensory awareness exercise to bring you back to the present moment.",
    duration_minutes: 5,
    category:         ExerciseCategory::Grounding,
  },
  Exercise {
    id:               "focus-1",
    title:            "Pomodoro Focus Reset",
    description:      "A quick mental reset specifically designed for students between study sessions.",
    duration_minutes: 3,
    category:         ExerciseCategory::Focus,
  },
];

/// Look an exercise up by its id.
pub fn exercise(id: &str) -> Option<&'static Exercise> {
  EXERCISES.iter().find(|e| e.id == id)
}

#[derive(Debug, Clone, Copy, Serialize)]
pub struct EmergencyContact {
  pub name:    &'static str,
  pub contact: &'static str,
  pub info:    &'static str,
}

pub const EMERGENCY_CONTACTS: &[EmergencyContact] = &[
  EmergencyContact {
    name:    "Vandrevala Foundation",
    contact: "9999666555",
    info:    "24/7 Helpline (India)",
  },
  EmergencyContact {
    name:    "AASRA",
    contact: "9820466726",
    info:    "24/7 Suicide Prevention (India)",
  },
  EmergencyContact {
    name:    "iCall (TISS)",
    contact: "9152987821",
    info:    "Mon-Sat, 10am-8pm",
  },
];
