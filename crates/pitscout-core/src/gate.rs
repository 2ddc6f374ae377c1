//! Access gate — the shared secret protecting bulk deletion of the ledger.
//!
//! A single plain code string, exact-match verified. This is an operational
//! speed bump against accidental deletion on a shared device, not a security
//! boundary; the code is stored and compared in the clear.

use crate::{Error, Result};

/// The code a fresh store starts with, until rotated.
pub const DEFAULT_CODE: &str = "1234";

/// Minimum length for a replacement code.
pub const MIN_CODE_LEN: usize = 3;

#[derive(Debug, Clone)]
pub struct AccessGate {
  code: String,
}

impl Default for AccessGate {
  fn default() -> Self {
    Self { code: DEFAULT_CODE.to_owned() }
  }
}

impl AccessGate {
  /// Rebuild the gate from a previously persisted code.
  pub fn from_stored(code: String) -> Self {
    Self { code }
  }

  /// Exact string match against the current code.
  pub fn verify(&self, candidate: &str) -> bool {
    candidate == self.code
  }

  /// Replace the code. The old code must verify and the new one must meet
  /// the minimum length; on failure the stored code is unchanged.
  pub fn rotate(&mut self, old: &str, new: &str) -> Result<()> {
    if !self.verify(old) {
      return Err(Error::CodeMismatch);
    }
    if new.chars().count() < MIN_CODE_LEN {
      return Err(Error::CodeTooShort { min: MIN_CODE_LEN });
    }
    self.code = new.to_owned();
    Ok(())
  }

  /// The current code, for the persistence mirror.
  pub fn code(&self) -> &str {
    &self.code
  }
}
