//! Google Gemini client implementing [`haven_core::analysis::Analyzer`].
//!
//! Sends one `generateContent` request per analysis with a JSON response
//! schema, then hands the returned text to
//! [`haven_core::analysis::parse_assessment`] for validation.

mod client;
mod wire;

pub mod error;

pub use client::{DEFAULT_BASE_URL, DEFAULT_MODEL, DEFAULT_TIMEOUT, GeminiAnalyzer, GeminiConfig};
pub use error::{Error, Result};
