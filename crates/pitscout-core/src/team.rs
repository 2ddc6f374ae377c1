//! Team registry — the ordered list of teams available for scouting.

use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// A competing team. `number` is the identity; uniqueness is enforced by
/// [`TeamRegistry::add`], not by this type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Team {
  pub name:   String,
  pub number: String,
}

/// Ordered collection of teams, unique by number.
///
/// Deletion is by position and bulk import is a wholesale replace; both
/// mirror how the list is presented and edited.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TeamRegistry {
  teams: Vec<Team>,
}

impl TeamRegistry {
  /// Append a team. Both fields are trimmed; empty input or an already
  /// registered number leaves the registry unchanged.
  pub fn add(&mut self, name: &str, number: &str) -> Result<()> {
    let name = name.trim();
    let number = number.trim();
    if name.is_empty() || number.is_empty() {
      return Err(Error::EmptyTeamField);
    }
    if self.teams.iter().any(|t| t.number == number) {
      return Err(Error::DuplicateTeam(number.to_owned()));
    }
    self.teams.push(Team {
      name:   name.to_owned(),
      number: number.to_owned(),
    });
    Ok(())
  }

  /// Remove the team at `index`; out-of-bounds is a no-op.
  pub fn delete_at(&mut self, index: usize) {
    if index < self.teams.len() {
      self.teams.remove(index);
    }
  }

  /// Replace the whole registry. No merge, no deduplication against the
  /// previous contents; callers validate candidates first.
  pub fn replace_all(&mut self, teams: Vec<Team>) {
    self.teams = teams;
  }

  pub fn teams(&self) -> &[Team] {
    &self.teams
  }

  pub fn get(&self, index: usize) -> Option<&Team> {
    self.teams.get(index)
  }

  pub fn len(&self) -> usize {
    self.teams.len()
  }

  pub fn is_empty(&self) -> bool {
    self.teams.is_empty()
  }
}
