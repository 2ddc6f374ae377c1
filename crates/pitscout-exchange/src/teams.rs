//! Team-list JSON import and export.
//!
//! Two shapes are accepted on import: a bare array of team-like entries, or
//! an object with a `teams` array. Entries missing a usable name or number
//! are dropped silently; any other top-level shape is an error and must
//! leave the caller's registry untouched. Export writes the bare-array
//! shape, so an exported list re-imports to an equal registry.

use pitscout_core::team::Team;
use serde_json::Value;

use crate::{Error, Result};

/// Parse an import file's contents into candidate teams.
pub fn parse(input: &str) -> Result<Vec<Team>> {
  let value: Value = serde_json::from_str(input)?;
  let entries = match value {
    Value::Array(entries) => entries,
    Value::Object(mut object) => match object.remove("teams") {
      Some(Value::Array(entries)) => entries,
      _ => return Err(Error::UnrecognizedShape),
    },
    _ => return Err(Error::UnrecognizedShape),
  };

  Ok(entries.iter().filter_map(team_entry).collect())
}

/// Serialize teams in the import shape.
pub fn serialize(teams: &[Team]) -> Result<String> {
  Ok(serde_json::to_string_pretty(teams)?)
}

/// One candidate entry; `None` when name or number is missing or empty.
fn team_entry(entry: &Value) -> Option<Team> {
  let name = field_string(entry.get("name")?)?;
  let number = field_string(entry.get("number")?)?;
  Some(Team { name, number })
}

/// Strings pass through; JSON numbers are coerced to their decimal form so
/// a file written with bare numeric team numbers still imports.
fn field_string(value: &Value) -> Option<String> {
  match value {
    Value::String(s) if !s.trim().is_empty() => Some(s.clone()),
    Value::Number(n) => Some(n.to_string()),
    _ => None,
  }
}
