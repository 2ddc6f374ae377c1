//! Scouting records and the append-only ledger.
//!
//! A record is an immutable observation of one team in one match. Records
//! are never edited; the only destructive operation is the bulk clear, and
//! that is gated elsewhere (see [`crate::gate`]). Everything derived from
//! the ledger (per-team filters, averages, recent slices) is a pure read.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

use crate::{
  counters::{CounterPanel, SlotId},
  Error, Result,
};

// ─── Enumerations ────────────────────────────────────────────────────────────

/// Which alliance the scouted team played on.
#[derive(
  Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, Display,
  EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Alliance {
  #[default]
  Blue,
  Red,
}

/// The endgame action observed, if any was recorded.
///
/// `None` here is a deliberate observation ("the robot did nothing"), as
/// opposed to an unset field, which is `Option::None` on the record.
#[derive(
  Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display,
  EnumString,
)]
#[strum(ascii_case_insensitive)]
pub enum EndgameAction {
  Parked,
  Deep,
  Shallow,
  None,
}

// An unset action is encoded as the empty string so saved data keeps its
// historical shape.
mod action_repr {
  use serde::{Deserialize, Deserializer, Serializer};

  use super::EndgameAction;

  pub fn serialize<S>(
    action: &Option<EndgameAction>,
    serializer: S,
  ) -> Result<S::Ok, S::Error>
  where
    S: Serializer,
  {
    match action {
      Some(a) => serializer.collect_str(a),
      None => serializer.serialize_str(""),
    }
  }

  pub fn deserialize<'de, D>(
    deserializer: D,
  ) -> Result<Option<EndgameAction>, D::Error>
  where
    D: Deserializer<'de>,
  {
    let raw = String::deserialize(deserializer)?;
    if raw.is_empty() {
      Ok(None)
    } else {
      raw.parse().map(Some).map_err(serde::de::Error::custom)
    }
  }
}

// ─── Record ──────────────────────────────────────────────────────────────────

/// One saved observation. Immutable once created.
///
/// `team` is a copy of the team number at save time, not a live reference;
/// a record may outlive its team's registry entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoutingRecord {
  pub team:             String,
  /// Digits only; kept as a string because it is an identifier, not a
  /// quantity.
  #[serde(rename = "match")]
  pub match_number:     String,
  pub color:            Alliance,
  pub counters:         CounterPanel,
  pub moved_from_start: bool,
  pub defense:          bool,
  #[serde(with = "action_repr")]
  pub action:           Option<EndgameAction>,
  pub notes:            String,
  /// Assigned at save time; monotonically non-decreasing with save order in
  /// practice, though not enforced.
  pub timestamp:        DateTime<Utc>,
}

// ─── Draft ───────────────────────────────────────────────────────────────────

/// The in-progress, not-yet-saved form state for one entry.
///
/// Validation happens at save time, not on field writes, so a rejected save
/// leaves every field in place for correction.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Draft {
  pub team:             String,
  pub match_number:     String,
  pub color:            Alliance,
  pub moved_from_start: bool,
  pub defense:          bool,
  pub action:           Option<EndgameAction>,
  pub notes:            String,
}

impl Draft {
  /// Set the match number from raw input, keeping digits only.
  pub fn set_match_number(&mut self, raw: &str) {
    self.match_number = raw.chars().filter(|c| c.is_ascii_digit()).collect();
  }

  /// Back to defaults for the next entry (color returns to Blue).
  pub fn reset(&mut self) {
    *self = Self::default();
  }
}

// ─── Ledger ──────────────────────────────────────────────────────────────────

/// The append-only ordered sequence of saved records.
///
/// Insertion order is chronological save order. The only mutations are
/// [`Ledger::save`] and [`Ledger::clear_all`]; there is no partial delete.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Ledger {
  records: Vec<ScoutingRecord>,
}

impl Ledger {
  /// Commit `draft` plus the current counter snapshot as a new record.
  ///
  /// Fails without appending when the draft has no team or no match number;
  /// the draft is untouched either way. Resetting the draft and panel after
  /// a successful save is the caller's job, not the ledger's.
  pub fn save(
    &mut self,
    draft: &Draft,
    counters: &CounterPanel,
  ) -> Result<ScoutingRecord> {
    if draft.team.trim().is_empty() {
      return Err(Error::MissingTeam);
    }
    if draft.match_number.trim().is_empty() {
      return Err(Error::MissingMatch);
    }

    let record = ScoutingRecord {
      team:             draft.team.clone(),
      match_number:     draft.match_number.clone(),
      color:            draft.color,
      counters:         counters.clone(),
      moved_from_start: draft.moved_from_start,
      defense:          draft.defense,
      action:           draft.action,
      notes:            draft.notes.clone(),
      timestamp:        Utc::now(),
    };
    self.records.push(record.clone());
    Ok(record)
  }

  /// Empty the ledger. No authorization is checked here; callers gate this
  /// behind [`crate::gate::AccessGate::verify`].
  pub fn clear_all(&mut self) {
    self.records.clear();
  }

  pub fn records(&self) -> &[ScoutingRecord] {
    &self.records
  }

  pub fn len(&self) -> usize {
    self.records.len()
  }

  pub fn is_empty(&self) -> bool {
    self.records.is_empty()
  }

  /// All records for `team`, in original insertion order.
  pub fn filter_by_team(&self, team: &str) -> Vec<&ScoutingRecord> {
    self.records.iter().filter(|r| r.team == team).collect()
  }

  /// The last `n` records, in insertion order (not reversed). Callers that
  /// want most-recent-first reverse at the display layer.
  pub fn recent(&self, n: usize) -> &[ScoutingRecord] {
    let start = self.records.len().saturating_sub(n);
    &self.records[start..]
  }

  /// Team numbers present in the ledger, in first-seen order.
  pub fn distinct_teams(&self) -> Vec<&str> {
    let mut seen = Vec::new();
    for record in &self.records {
      if !seen.contains(&record.team.as_str()) {
        seen.push(record.team.as_str());
      }
    }
    seen
  }
}

/// Arithmetic mean of one counter slot across `records`.
///
/// `None` when the set is empty; callers must guard before formatting.
pub fn average<'a, I>(records: I, slot: SlotId) -> Option<f64>
where
  I: IntoIterator<Item = &'a ScoutingRecord>,
{
  let mut sum = 0u64;
  let mut count = 0u64;
  for record in records {
    sum += u64::from(record.counters.get(slot));
    count += 1;
  }
  (count > 0).then(|| sum as f64 / count as f64)
}

// ─── Tests ───────────────────────────────────────────────────────────────────
