//! The `StateStore` trait and the persisted slot keys.
//!
//! The trait is implemented by storage backends (e.g.
//! `pitscout-store-sqlite`). The session layer depends on this abstraction,
//! not on any concrete backend.

use std::future::Future;

// ─── Slots ───────────────────────────────────────────────────────────────────

/// The six logical string-keyed slots of the durable store.
///
/// Key names are stable; existing databases depend on them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Slot {
  /// Team registry snapshot, JSON array of `{name, number}`.
  Teams,
  /// Ledger snapshot, JSON array of records.
  Records,
  /// `"true"` / `"false"`.
  DarkMode,
  /// `"red"` / `"blue"` / `"gray"`.
  BgTheme,
  /// The access-gate secret, plain string.
  DeleteCode,
  /// Epoch-millis string. Owned by the reload heuristic outside this crate;
  /// the session never reads or writes it.
  LastReload,
}

impl Slot {
  pub fn key(self) -> &'static str {
    match self {
      Self::Teams      => "scouting-teams",
      Self::Records    => "scouting-data",
      Self::DarkMode   => "scouting-darkmode",
      Self::BgTheme    => "scouting-bgcolor",
      Self::DeleteCode => "scouting-delete-code",
      Self::LastReload => "scouting-last-reload",
    }
  }
}

// ─── Trait ───────────────────────────────────────────────────────────────────

/// Abstraction over the durable key-value store.
///
/// Writes are last-write-wins with no locking; there is exactly one writing
/// session per store by assumption. All methods return `Send` futures so the
/// trait can be used from multi-threaded async runtimes.
pub trait StateStore: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  /// Read the string stored in `slot`. `None` when the slot has never been
  /// written.
  fn read(
    &self,
    slot: Slot,
  ) -> impl Future<Output = Result<Option<String>, Self::Error>> + Send + '_;

  /// Durably store `value` in `slot`, replacing any previous contents.
  fn write(
    &self,
    slot: Slot,
    value: &str,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send;
}
