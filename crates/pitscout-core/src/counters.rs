//! The counter panel — twelve named non-negative tallies for one match entry.
//!
//! Slots are the cross of two match phases and six scoring categories. The
//! panel is transient: it backs the in-progress entry, is copied into a
//! [`crate::record::ScoutingRecord`] at save time, and is then reset.

use std::{collections::BTreeMap, fmt, str::FromStr};

use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString, IntoEnumIterator};

use crate::{Error, Result};

// ─── Slot identity ───────────────────────────────────────────────────────────

/// The match phase a tally belongs to.
#[derive(
  Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Display, EnumIter,
  EnumString,
)]
#[strum(serialize_all = "lowercase")]
pub enum Phase {
  Auto,
  Teleop,
}

/// The scoring category being tallied.
#[derive(
  Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Display, EnumIter,
  EnumString,
)]
#[strum(serialize_all = "lowercase")]
pub enum Category {
  L1,
  L2,
  L3,
  L4,
  Net,
  Processor,
}

/// One of the twelve counter slots, e.g. `auto-l1` or `teleop-processor`.
///
/// The `Ord` derive gives the canonical slot order: all `auto` slots before
/// all `teleop` slots, categories in level order. Column layouts and the
/// JSON encoding both follow it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct SlotId {
  pub phase:    Phase,
  pub category: Category,
}

impl SlotId {
  /// All twelve slots in canonical order.
  pub fn all() -> impl Iterator<Item = SlotId> {
    Phase::iter().flat_map(|phase| {
      Category::iter().map(move |category| SlotId { phase, category })
    })
  }
}

impl fmt::Display for SlotId {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}-{}", self.phase, self.category)
  }
}

impl FromStr for SlotId {
  type Err = Error;

  fn from_str(s: &str) -> Result<Self> {
    let (phase, category) = s
      .split_once('-')
      .ok_or_else(|| Error::UnknownSlot(s.to_owned()))?;
    let phase = phase
      .parse()
      .map_err(|_| Error::UnknownSlot(s.to_owned()))?;
    let category = category
      .parse()
      .map_err(|_| Error::UnknownSlot(s.to_owned()))?;
    Ok(SlotId { phase, category })
  }
}

// Slots are encoded as their `phase-category` name so the panel serializes
// as a flat JSON object keyed by slot name.
impl Serialize for SlotId {
  fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
  where
    S: serde::Serializer,
  {
    serializer.collect_str(self)
  }
}

impl<'de> Deserialize<'de> for SlotId {
  fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
  where
    D: serde::Deserializer<'de>,
  {
    let raw = String::deserialize(deserializer)?;
    raw.parse().map_err(serde::de::Error::custom)
  }
}

// ─── Panel ───────────────────────────────────────────────────────────────────

/// The mapping of counter slots to non-negative tallies.
///
/// Invariant: values never go below zero — decrementing clamps at the floor.
/// The canonical zero state (all twelve slots at 0) is the `Default`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CounterPanel {
  slots: BTreeMap<SlotId, u32>,
}

impl Default for CounterPanel {
  fn default() -> Self {
    Self {
      slots: SlotId::all().map(|slot| (slot, 0)).collect(),
    }
  }
}

impl CounterPanel {
  /// Add one to `slot`. A slot absent from the map starts from zero.
  pub fn increment(&mut self, slot: SlotId) {
    *self.slots.entry(slot).or_insert(0) += 1;
  }

  /// Subtract one from `slot`, clamping at zero.
  pub fn decrement(&mut self, slot: SlotId) {
    let value = self.slots.entry(slot).or_insert(0);
    *value = value.saturating_sub(1);
  }

  /// Return every slot to exactly zero.
  pub fn reset(&mut self) {
    for slot in SlotId::all() {
      self.slots.insert(slot, 0);
    }
  }

  pub fn get(&self, slot: SlotId) -> u32 {
    self.slots.get(&slot).copied().unwrap_or(0)
  }

  /// Slots and values in canonical order.
  pub fn iter(&self) -> impl Iterator<Item = (SlotId, u32)> + '_ {
    self.slots.iter().map(|(slot, value)| (*slot, *value))
  }

  pub fn is_zeroed(&self) -> bool {
    self.slots.values().all(|value| *value == 0)
  }
}

// ─── Tests ───────────────────────────────────────────────────────────────────
