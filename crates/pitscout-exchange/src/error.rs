//! Error type for `pitscout-exchange`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("invalid team file: {0}")]
  Json(#[from] serde_json::Error),

  /// Valid JSON, but neither an array of teams nor `{"teams": [...]}`.
  #[error("unrecognized team file shape")]
  UnrecognizedShape,
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
