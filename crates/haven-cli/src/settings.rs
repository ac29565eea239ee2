//! Layered settings: built-in defaults, then the TOML file, then `HAVEN_*`
//! environment variables.

use std::{
  path::{Path, PathBuf},
  time::Duration,
};

use anyhow::Context as _;
use haven_gemini::{DEFAULT_BASE_URL, DEFAULT_MODEL, GeminiConfig};
use serde::Deserialize;

pub const DEFAULT_STORE_PATH: &str = "~/.local/share/haven/haven.db";

#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
  pub store_path:      PathBuf,
  pub host:            String,
  pub port:            u16,
  #[serde(default)]
  pub gemini_api_key:  String,
  pub gemini_model:    String,
  pub gemini_base_url: String,
  pub ai_timeout_secs: u64,
}

impl Settings {
  /// Read `path` if it exists and overlay the environment.
  pub fn load(path: &Path) -> anyhow::Result<Self> {
    let settings = config::Config::builder()
      .set_default("store_path", DEFAULT_STORE_PATH)?
      .set_default("host", "127.0.0.1")?
      .set_default("port", 8080)?
      .set_default("gemini_model", DEFAULT_MODEL)?
      .set_default("gemini_base_url", DEFAULT_BASE_URL)?
      .set_default("ai_timeout_secs", 30)?
      .add_source(config::File::from(path.to_path_buf()).required(false))
      .add_source(config::Environment::with_prefix("HAVEN"))
      .build()
      .with_context(|| format!("failed to read config file {}", path.display()))?;

    let mut cfg: Self = settings
      .try_deserialize()
      .context("failed to deserialise settings")?;
    if cfg.ai_timeout_secs == 0 {
      anyhow::bail!("ai_timeout_secs must be at least 1");
    }
    cfg.store_path = expand_tilde(&cfg.store_path);
    Ok(cfg)
  }

  pub fn gemini(&self) -> GeminiConfig {
    GeminiConfig {
      api_key:  self.gemini_api_key.clone(),
      model:    self.gemini_model.clone(),
      base_url: self.gemini_base_url.clone(),
      timeout:  Duration::from_secs(self.ai_timeout_secs),
    }
  }
}

/// Expand a leading `~` to the user's home directory.
pub fn expand_tilde(path: &Path) -> PathBuf {
  let s = path.to_string_lossy();
  if let Some(rest) = s.strip_prefix("~/")
    && let Ok(home) = std::env::var("HOME")
  {
    return PathBuf::from(home).join(rest);
  }
  path.to_path_buf()
}
