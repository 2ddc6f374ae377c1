//! Error types for `pitscout-core`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("team name and number must both be non-empty")]
  EmptyTeamField,

  #[error("team number already registered: {0:?}")]
  DuplicateTeam(String),

  #[error("no team selected")]
  MissingTeam,

  #[error("no match number entered")]
  MissingMatch,

  #[error("delete code does not match")]
  CodeMismatch,

  #[error("new delete code must be at least {min} characters")]
  CodeTooShort { min: usize },

  #[error("unknown counter slot: {0:?}")]
  UnknownSlot(String),

  #[error("serialization error: {0}")]
  Serialization(#[from] serde_json::Error),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
