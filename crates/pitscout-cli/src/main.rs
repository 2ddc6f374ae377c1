//! `pitscout` — match-scouting data entry and reporting from the terminal.
//!
//! # Usage
//!
//! ```
//! pitscout team add --name "Robo Raiders" --number 254
//! pitscout scout
//! pitscout data export
//! pitscout --store event.db data summary --team 254
//! ```

mod commands;
mod entry;

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use pitscout_core::session::Session;
use pitscout_store_sqlite::SqliteStore;
use serde::Deserialize;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

// ─── CLI args ─────────────────────────────────────────────────────────────────

#[derive(Parser, Debug)]
#[command(name = "pitscout", about = "Match scouting data entry and reports")]
struct Args {
  /// Path to a TOML config file (store_path).
  #[arg(short, long, value_name = "FILE")]
  config: Option<PathBuf>,

  /// Path to the scouting database (default: scouting.db).
  #[arg(long, env = "PITSCOUT_STORE")]
  store: Option<PathBuf>,

  #[command(subcommand)]
  command: commands::Command,
}

// ─── Config file ──────────────────────────────────────────────────────────────

/// Shape of the optional TOML config file.
#[derive(Deserialize, Default)]
struct ConfigFile {
  #[serde(default)]
  store_path: String,
}

// ─── Entry point ──────────────────────────────────────────────────────────────

#[tokio::main]
async fn main() -> Result<()> {
  // Default to warnings only so command output stays clean; RUST_LOG
  // overrides for debugging.
  tracing_subscriber::fmt()
    .with_env_filter(
      EnvFilter::builder()
        .with_default_directive(LevelFilter::WARN.into())
        .from_env_lossy(),
    )
    .init();

  let args = Args::parse();

  // Load config file if provided.
  let file_cfg: ConfigFile = if let Some(path) = &args.config {
    let raw = std::fs::read_to_string(path)
      .with_context(|| format!("reading config file {}", path.display()))?;
    toml::from_str(&raw).context("parsing config file")?
  } else {
    ConfigFile::default()
  };

  // CLI flags override config file, which overrides defaults.
  let store_path = args
    .store
    .or_else(|| {
      (!file_cfg.store_path.is_empty())
        .then(|| PathBuf::from(&file_cfg.store_path))
    })
    .unwrap_or_else(|| PathBuf::from("scouting.db"));

  let store = SqliteStore::open(&store_path)
    .await
    .with_context(|| format!("opening store {}", store_path.display()))?;
  let mut session = Session::load(store)
    .await
    .context("loading persisted state")?;

  commands::run(&mut session, args.command).await
}
