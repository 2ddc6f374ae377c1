//! Interactive match-entry loop.
//!
//! Line-driven: each line is one command against the in-progress draft and
//! counter panel. `save` commits the entry and resets both for the next
//! match; `quit` (or end of input) leaves the loop. Saved records are
//! already persisted by the time the loop exits.

use std::io::{self, BufRead, Write};

use anyhow::Result;
use pitscout_core::{
  counters::SlotId,
  record::{Alliance, EndgameAction},
  session::Session,
  store::StateStore,
  Error,
};

// ─── Command grammar ──────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq)]
enum EntryCommand {
  Team(String),
  Match(String),
  Color(Alliance),
  Increment(SlotId),
  Decrement(SlotId),
  ToggleMoved,
  ToggleDefense,
  Action(Option<EndgameAction>),
  Notes(String),
  Show,
  Save,
  Help,
  Quit,
}

/// Parse one input line. `+<slot>` / `-<slot>` adjust a counter; everything
/// else is `word [rest]`.
fn parse_command(line: &str) -> Result<EntryCommand, String> {
  let line = line.trim();

  if let Some(rest) = line.strip_prefix('+') {
    return rest
      .trim()
      .parse()
      .map(EntryCommand::Increment)
      .map_err(|err: Error| err.to_string());
  }
  if let Some(rest) = line.strip_prefix('-') {
    return rest
      .trim()
      .parse()
      .map(EntryCommand::Decrement)
      .map_err(|err: Error| err.to_string());
  }

  let (word, rest) = line
    .split_once(char::is_whitespace)
    .map(|(w, r)| (w, r.trim()))
    .unwrap_or((line, ""));

  match word {
    "team" => Ok(EntryCommand::Team(rest.to_owned())),
    "match" => Ok(EntryCommand::Match(rest.to_owned())),
    "color" => rest
      .parse()
      .map(EntryCommand::Color)
      .map_err(|_| format!("unknown color {rest:?} (blue, red)")),
    "moved" => Ok(EntryCommand::ToggleMoved),
    "defense" => Ok(EntryCommand::ToggleDefense),
    "action" => {
      if rest.is_empty() {
        Ok(EntryCommand::Action(None))
      } else {
        rest.parse().map(|a| EntryCommand::Action(Some(a))).map_err(
          |_| format!("unknown action {rest:?} (Parked, Deep, Shallow, None)"),
        )
      }
    }
    "notes" => Ok(EntryCommand::Notes(rest.to_owned())),
    "show" => Ok(EntryCommand::Show),
    "save" => Ok(EntryCommand::Save),
    "help" | "?" => Ok(EntryCommand::Help),
    "quit" | "exit" => Ok(EntryCommand::Quit),
    other => Err(format!("unknown command {other:?}; try `help`")),
  }
}

// ─── Loop ─────────────────────────────────────────────────────────────────────

pub async fn run<S: StateStore>(session: &mut Session<S>) -> Result<()> {
  println!("interactive entry; `help` for commands, `quit` to leave");

  let stdin = io::stdin();
  let mut line = String::new();
  loop {
    print!("> ");
    io::stdout().flush()?;

    line.clear();
    if stdin.lock().read_line(&mut line)? == 0 {
      break; // end of input
    }
    if line.trim().is_empty() {
      continue;
    }

    match parse_command(&line) {
      Err(message) => println!("{message}"),
      Ok(EntryCommand::Quit) => break,
      Ok(cmd) => apply(session, cmd).await?,
    }
  }

  Ok(())
}

async fn apply<S: StateStore>(
  session: &mut Session<S>,
  cmd: EntryCommand,
) -> Result<()> {
  match cmd {
    EntryCommand::Team(number) => {
      // Records keep a copy of the number, so an unregistered team is
      // allowed; flag it in case of a typo.
      if !session.teams().iter().any(|t| t.number == number) {
        println!("note: team {number} is not in the team list");
      }
      session.draft_mut().team = number;
    }
    EntryCommand::Match(raw) => {
      session.draft_mut().set_match_number(&raw);
      let current = session.draft().match_number.clone();
      if current.is_empty() {
        println!("match number needs digits");
      } else {
        println!("match = {current}");
      }
    }
    EntryCommand::Color(color) => session.draft_mut().color = color,
    EntryCommand::Increment(slot) => {
      session.counters_mut().increment(slot);
      println!("{slot} = {}", session.counters().get(slot));
    }
    EntryCommand::Decrement(slot) => {
      session.counters_mut().decrement(slot);
      println!("{slot} = {}", session.counters().get(slot));
    }
    EntryCommand::ToggleMoved => {
      let draft = session.draft_mut();
      draft.moved_from_start = !draft.moved_from_start;
      println!("moved from start: {}", draft.moved_from_start);
    }
    EntryCommand::ToggleDefense => {
      let draft = session.draft_mut();
      draft.defense = !draft.defense;
      println!("defense: {}", draft.defense);
    }
    EntryCommand::Action(action) => session.draft_mut().action = action,
    EntryCommand::Notes(notes) => session.draft_mut().notes = notes,
    EntryCommand::Show => show(session),
    EntryCommand::Save => match session.save_record().await {
      Ok(record) => {
        println!("saved match {} for team {}", record.match_number, record.team);
      }
      // Keep the half-entered draft so it can be completed.
      Err(err @ (Error::MissingTeam | Error::MissingMatch)) => {
        println!("{err}");
      }
      Err(err) => return Err(err.into()),
    },
    EntryCommand::Help => help(),
    EntryCommand::Quit => unreachable!("handled by the loop"),
  }
  Ok(())
}

fn show<S: StateStore>(session: &Session<S>) {
  let draft = session.draft();
  println!(
    "team {}  match {}  color {}",
    if draft.team.is_empty() { "-" } else { draft.team.as_str() },
    if draft.match_number.is_empty() { "-" } else { draft.match_number.as_str() },
    draft.color,
  );
  println!(
    "moved from start: {}  defense: {}  action: {}",
    draft.moved_from_start,
    draft.defense,
    draft
      .action
      .map(|a| a.to_string())
      .unwrap_or_else(|| "-".to_owned()),
  );
  if !draft.notes.is_empty() {
    println!("notes: {}", draft.notes);
  }
  for (slot, value) in session.counters().iter() {
    println!("  {slot:<18} {value}");
  }
}

fn help() {
  println!("  team <number>      select the team being scouted");
  println!("  match <number>     set the match number (digits only)");
  println!("  color <blue|red>   alliance color");
  println!("  +<slot> / -<slot>  adjust a counter, e.g. +auto-l1, -teleop-net");
  println!("  moved              toggle moved-from-start");
  println!("  defense            toggle defense");
  println!("  action <name>      Parked, Deep, Shallow or None; blank clears");
  println!("  notes <text>       free-form notes");
  println!("  show               current draft and counters");
  println!("  save               commit this entry and reset");
  println!("  quit               leave (saved entries are already stored)");
}

// ─── Tests ───────────────────────────────────────────────────────────────────
