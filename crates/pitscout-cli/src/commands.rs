//! Subcommand handlers.
//!
//! Each handler applies one mutation (or read) to the session; persistence
//! is the session's mirror step, not the handler's concern. Validation and
//! auth failures are messages to the operator, not process failures.

use std::path::PathBuf;

use anyhow::{Context, Result};
use chrono::Utc;
use clap::Subcommand;
use pitscout_core::{
  prefs::BgTheme, session::Session, store::StateStore, Error,
};
use pitscout_exchange::{csv, teams};

use crate::entry;

// ─── Command tree ─────────────────────────────────────────────────────────────

#[derive(Subcommand, Debug)]
pub enum Command {
  /// Manage the team list.
  #[command(subcommand)]
  Team(TeamCommand),
  /// Interactive match entry.
  Scout,
  /// Saved records: listing, summaries, export, deletion.
  #[command(subcommand)]
  Data(DataCommand),
  /// Display preferences.
  #[command(subcommand)]
  Prefs(PrefsCommand),
}

#[derive(Subcommand, Debug)]
pub enum TeamCommand {
  /// Add a team. The number must not already be registered.
  Add {
    #[arg(long)]
    name:   String,
    #[arg(long)]
    number: String,
  },
  /// Remove the team at a position (as shown by `team list`).
  Rm { index: usize },
  /// List registered teams.
  List,
  /// Replace the team list from a JSON file.
  Import { file: PathBuf },
  /// Write the team list to a JSON file in the import shape.
  Export { file: PathBuf },
}

#[derive(Subcommand, Debug)]
pub enum DataCommand {
  /// List saved records, most recent first.
  List {
    /// Only records for this team number.
    #[arg(long)]
    team: Option<String>,
  },
  /// Per-team averages and recent matches.
  Summary {
    #[arg(long)]
    team: String,
  },
  /// Write the CSV report.
  Export {
    /// Output path; defaults to scouting_data_<date>.csv.
    #[arg(long)]
    out: Option<PathBuf>,
  },
  /// Delete every saved record. Requires the delete code.
  Clear {
    #[arg(long)]
    code: String,
  },
  /// Change the delete code.
  SetCode {
    #[arg(long)]
    old: String,
    #[arg(long)]
    new: String,
  },
}

#[derive(Subcommand, Debug)]
pub enum PrefsCommand {
  /// Show current preferences.
  Show,
  /// Turn dark mode on or off.
  Dark {
    #[arg(value_parser = ["on", "off"])]
    state: String,
  },
  /// Set the background theme (red, blue, gray).
  Theme { theme: String },
}

// ─── Dispatch ─────────────────────────────────────────────────────────────────

pub async fn run<S: StateStore>(
  session: &mut Session<S>,
  command: Command,
) -> Result<()> {
  match command {
    Command::Team(cmd) => team(session, cmd).await,
    Command::Scout => entry::run(session).await,
    Command::Data(cmd) => data(session, cmd).await,
    Command::Prefs(cmd) => prefs(session, cmd).await,
  }
}

/// Input mistakes get a message and a clean exit; anything else bubbles up.
fn report(result: Result<(), Error>) -> Result<()> {
  match result {
    Ok(()) => Ok(()),
    Err(
      err @ (Error::EmptyTeamField
      | Error::DuplicateTeam(_)
      | Error::MissingTeam
      | Error::MissingMatch
      | Error::CodeMismatch
      | Error::CodeTooShort { .. }
      | Error::UnknownSlot(_)),
    ) => {
      println!("{err}");
      Ok(())
    }
    Err(err) => Err(err.into()),
  }
}

// ─── Teams ────────────────────────────────────────────────────────────────────

async fn team<S: StateStore>(
  session: &mut Session<S>,
  cmd: TeamCommand,
) -> Result<()> {
  match cmd {
    TeamCommand::Add { name, number } => {
      report(session.add_team(&name, &number).await)?;
    }
    TeamCommand::Rm { index } => {
      report(session.delete_team(index).await)?;
    }
    TeamCommand::List => {
      if session.teams().is_empty() {
        println!("no teams registered");
      }
      for (i, team) in session.teams().iter().enumerate() {
        println!("{i:>3}  #{:<6} {}", team.number, team.name);
      }
    }
    TeamCommand::Import { file } => {
      let raw = std::fs::read_to_string(&file)
        .with_context(|| format!("reading {}", file.display()))?;
      match teams::parse(&raw) {
        Ok(parsed) => {
          let count = parsed.len();
          report(session.replace_teams(parsed).await)?;
          println!("imported {count} teams");
        }
        // Bad file: say so and leave the registry as it was.
        Err(err) => println!("{err}"),
      }
    }
    TeamCommand::Export { file } => {
      let json = teams::serialize(session.teams())
        .context("serializing team list")?;
      std::fs::write(&file, json)
        .with_context(|| format!("writing {}", file.display()))?;
      println!("wrote {}", file.display());
    }
  }
  Ok(())
}

// ─── Data ─────────────────────────────────────────────────────────────────────

async fn data<S: StateStore>(
  session: &mut Session<S>,
  cmd: DataCommand,
) -> Result<()> {
  match cmd {
    DataCommand::List { team } => {
      let records: Vec<_> = match &team {
        Some(number) => session.ledger().filter_by_team(number),
        None => session.records().iter().collect(),
      };
      if records.is_empty() {
        println!("no scouting data");
        return Ok(());
      }
      // Most recent first for reading; the ledger itself stays in save order.
      for record in records.iter().rev() {
        let action = record
          .action
          .map(|a| a.to_string())
          .unwrap_or_else(|| "-".to_owned());
        println!(
          "match {:>4}  team {:<6} {:<4} action {:<8} {}",
          record.match_number, record.team, record.color, action, record.notes
        );
      }
    }
    DataCommand::Summary { team } => match session.team_summary(&team) {
      None => println!("no data found for team {team}"),
      Some(summary) => {
        println!("team {}: {} matches scouted", summary.team, summary.matches);
        println!("average scores:");
        for (slot, avg) in &summary.averages {
          println!("  {slot}: {avg:.1}");
        }
        println!("recent matches:");
        for record in &summary.recent {
          let action = record
            .action
            .map(|a| a.to_string())
            .unwrap_or_else(|| "-".to_owned());
          println!(
            "  match {} ({}) - action: {action}",
            record.match_number, record.color
          );
        }
      }
    },
    DataCommand::Export { out } => match csv::export(session.records()) {
      None => println!("no scouting data to export"),
      Some(contents) => {
        let path = out.unwrap_or_else(|| {
          PathBuf::from(csv::export_filename(Utc::now().date_naive()))
        });
        std::fs::write(&path, contents)
          .with_context(|| format!("writing {}", path.display()))?;
        println!("wrote {}", path.display());
      }
    },
    DataCommand::Clear { code } => match session.clear_records(&code).await {
      Ok(()) => println!("all scouting data deleted"),
      Err(err) => report(Err(err))?,
    },
    DataCommand::SetCode { old, new } => {
      match session.rotate_code(&old, &new).await {
        Ok(()) => println!("delete code updated"),
        Err(err) => report(Err(err))?,
      }
    }
  }
  Ok(())
}

// ─── Preferences ──────────────────────────────────────────────────────────────

async fn prefs<S: StateStore>(
  session: &mut Session<S>,
  cmd: PrefsCommand,
) -> Result<()> {
  match cmd {
    PrefsCommand::Show => {
      let prefs = session.prefs();
      println!(
        "dark mode: {}",
        if prefs.dark_mode { "on" } else { "off" }
      );
      println!("theme: {}", prefs.theme);
    }
    PrefsCommand::Dark { state } => {
      session.set_dark_mode(state == "on").await;
    }
    PrefsCommand::Theme { theme } => match theme.parse::<BgTheme>() {
      Ok(theme) => session.set_theme(theme).await,
      Err(_) => println!("unknown theme {theme:?} (red, blue, gray)"),
    },
  }
  Ok(())
}
