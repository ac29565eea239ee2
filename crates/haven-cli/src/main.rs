//! `haven`: stress check-ins, mood logging, and AI reflections from the
//! terminal.
//!
//! # Usage
//!
//! ```text
//! haven register "Asha" asha@example.com
//! haven quiz
//! haven mood add calm --note "slept well"
//! haven analyze "exams next week and I can't focus"
//! haven serve --port 8080
//! ```
//!
//! Settings come from `haven.toml` (or `--config`), then `HAVEN_*`
//! environment variables, then flags.

mod commands;
mod settings;

use std::{
  io::{self, Write as _},
  path::PathBuf,
};

use anyhow::Context as _;
use clap::{Parser, Subcommand};
use haven_core::{Haven, mood::Mood};
use haven_gemini::GeminiAnalyzer;
use haven_store_sqlite::SqliteStore;
use tokio::net::TcpListener;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

use crate::settings::Settings;

// ─── CLI args ─────────────────────────────────────────────────────────────────

#[derive(Parser, Debug)]
#[command(name = "haven", version, about = "A small companion for tracking stress and mood")]
struct Cli {
  /// Path to the TOML configuration file.
  #[arg(short, long, value_name = "FILE", default_value = "haven.toml")]
  config: PathBuf,

  /// SQLite database to use instead of the configured `store_path`.
  #[arg(long, value_name = "FILE")]
  store: Option<PathBuf>,

  #[command(subcommand)]
  command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
  /// Create an account and log in as it.
  Register { name: String, email: String },
  /// Log in as the first account registered with this email.
  Login { email: String },
  Logout,
  /// Show the logged-in account.
  Whoami,
  /// Take the ten-question stress check.
  Quiz {
    /// Answers as comma-separated indices, 0 = never .. 3 = fairly often.
    #[arg(long, value_delimiter = ',')]
    answers: Option<Vec<u8>>,
  },
  /// Past questionnaire results.
  Stress {
    #[command(subcommand)]
    command: StressCommand,
  },
  Mood {
    #[command(subcommand)]
    command: MoodCommand,
  },
  /// Describe how you feel and get an AI assessment.
  Analyze {
    #[arg(required = true, num_args = 1..)]
    text: Vec<String>,
  },
  /// Past AI assessments.
  Analyses,
  Dashboard,
  /// List guided exercises, or show one by id.
  Exercises { id: Option<String> },
  /// Crisis helplines.
  Emergency,
  /// Serve the JSON API.
  Serve {
    #[arg(long)]
    host: Option<String>,
    #[arg(long)]
    port: Option<u16>,
  },
}

#[derive(Subcommand, Debug)]
enum StressCommand {
  History,
}

#[derive(Subcommand, Debug)]
enum MoodCommand {
  /// Log how you feel: happy, sad, anxious, angry, or calm.
  Add {
    mood: Mood,
    #[arg(short, long)]
    note: Option<String>,
    /// Log even if a mood was already recorded today.
    #[arg(long)]
    force: bool,
  },
  /// Moods from the last seven days.
  Week,
  History,
}

// ─── Entry point ──────────────────────────────────────────────────────────────

#[tokio::main]
async fn main() -> anyhow::Result<()> {
  let cli = Cli::parse();

  // Keep interactive output clean unless we're running as a server.
  let default_level = if matches!(cli.command, Command::Serve { .. }) {
    LevelFilter::INFO
  } else {
    LevelFilter::WARN
  };
  tracing_subscriber::fmt()
    .with_writer(io::stderr)
    .with_env_filter(
      EnvFilter::builder()
        .with_default_directive(default_level.into())
        .from_env_lossy(),
    )
    .init();

  let mut settings = Settings::load(&cli.config)?;
  if let Some(store) = cli.store {
    settings.store_path = crate::settings::expand_tilde(&store);
  }

  let store = open_store(&settings).await?;
  let haven = Haven::new(store);

  let stdout = io::stdout();
  let mut out = stdout.lock();

  match cli.command {
    Command::Register { name, email } => commands::register(&haven, &name, &email, &mut out).await?,
    Command::Login { email } => commands::login(&haven, &email, &mut out).await?,
    Command::Logout => commands::logout(&haven, &mut out).await?,
    Command::Whoami => commands::whoami(&haven, &mut out).await?,
    Command::Quiz { answers } => {
      let answers = commands::collect_answers(answers, &mut io::stdin().lock(), &mut out)?;
      commands::quiz(&haven, &answers, &mut out).await?;
    }
    Command::Stress { command: StressCommand::History } => {
      commands::stress_history(&haven, &mut out).await?
    }
    Command::Mood { command } => match command {
      MoodCommand::Add { mood, note, force } => {
        commands::mood_add(&haven, mood, note, force, &mut out).await?
      }
      MoodCommand::Week => commands::mood_week(&haven, &mut out).await?,
      MoodCommand::History => commands::mood_history(&haven, &mut out).await?,
    },
    Command::Analyze { text } => {
      let analyzer = GeminiAnalyzer::new(settings.gemini())?;
      commands::analyze(&haven, &analyzer, &text.join(" "), &mut out).await?;
    }
    Command::Analyses => commands::analyses(&haven, &mut out).await?,
    Command::Dashboard => commands::dashboard(&haven, &mut out).await?,
    Command::Exercises { id } => commands::exercises(id.as_deref(), &mut out)?,
    Command::Emergency => commands::emergency(&mut out)?,
    Command::Serve { host, port } => {
      drop(out);
      let host = host.unwrap_or_else(|| settings.host.clone());
      let port = port.unwrap_or(settings.port);
      serve(haven, &settings, &host, port).await?;
      return Ok(());
    }
  }

  out.flush()?;
  Ok(())
}

async fn open_store(settings: &Settings) -> anyhow::Result<SqliteStore> {
  let path = &settings.store_path;
  if let Some(parent) = path.parent()
    && !parent.as_os_str().is_empty()
  {
    std::fs::create_dir_all(parent)
      .with_context(|| format!("failed to create {}", parent.display()))?;
  }
  SqliteStore::open(path)
    .await
    .with_context(|| format!("failed to open store at {path:?}"))
}

async fn serve(
  haven: Haven<SqliteStore>,
  settings: &Settings,
  host: &str,
  port: u16,
) -> anyhow::Result<()> {
  if settings.gemini_api_key.is_empty() {
    tracing::warn!("no Gemini API key configured; /api/ai/analyze will fail");
  }
  let analyzer = GeminiAnalyzer::new(settings.gemini())?;
  let state = haven_api::AppState::new(haven, analyzer);
  let app = axum::Router::new().nest("/api", haven_api::api_router(state));

  let address = format!("{host}:{port}");
  tracing::info!("Listening on http://{address}/api");
  let listener = TcpListener::bind(&address)
    .await
    .with_context(|| format!("failed to bind {address}"))?;

  axum::serve(listener, app).await.context("server error")?;
  Ok(())
}
