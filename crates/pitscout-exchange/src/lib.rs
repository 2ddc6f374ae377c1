//! Import/export codecs for pitscout.
//!
//! Converts between the domain types and their interchange forms: the CSV
//! report generated from the ledger, and the team-list JSON file accepted
//! for bulk import. Pure synchronous; no I/O or database dependencies —
//! reading and writing actual files is the caller's job.

pub mod csv;
pub mod error;
pub mod teams;

pub use error::{Error, Result};
