//! Session state and the mutate-then-mirror persistence discipline.
//!
//! A [`Session`] owns every model plus the store backend. Each mutation is a
//! synchronous in-memory transition followed by a best-effort mirror of the
//! owning slot; mirror failures are logged and swallowed, so the in-memory
//! state stays authoritative for the rest of the session. On load, each
//! model is rehydrated from its slot, with absent slots (or an unreadable
//! store) degrading to defaults.

use tracing::warn;

use crate::{
  counters::{CounterPanel, SlotId},
  gate::AccessGate,
  prefs::{BgTheme, Preferences},
  record::{average, Draft, Ledger, ScoutingRecord},
  store::{Slot, StateStore},
  team::{Team, TeamRegistry},
  Error, Result,
};

// ─── Summary view ────────────────────────────────────────────────────────────

/// Per-team roll-up for the reporting view — never stored, always derived.
#[derive(Debug, Clone)]
pub struct TeamSummary {
  pub team:     String,
  /// Number of records for this team.
  pub matches:  usize,
  /// Mean tally per slot, in canonical slot order.
  pub averages: Vec<(SlotId, f64)>,
  /// The last three records, in insertion order.
  pub recent:   Vec<ScoutingRecord>,
}

// ─── Session ─────────────────────────────────────────────────────────────────

/// One interactive session over the scouting state.
pub struct Session<S> {
  store:    S,
  registry: TeamRegistry,
  ledger:   Ledger,
  gate:     AccessGate,
  prefs:    Preferences,
  draft:    Draft,
  counters: CounterPanel,
}

impl<S: StateStore> Session<S> {
  /// Rehydrate every model from the store.
  ///
  /// A slot that was never written yields the model's default. A slot that
  /// is present but undecodable is an error; silently discarding saved data
  /// would be worse than refusing to start.
  pub async fn load(store: S) -> Result<Self> {
    let registry = match read_slot(&store, Slot::Teams).await {
      Some(raw) => serde_json::from_str(&raw)?,
      None => TeamRegistry::default(),
    };
    let ledger = match read_slot(&store, Slot::Records).await {
      Some(raw) => serde_json::from_str(&raw)?,
      None => Ledger::default(),
    };
    let gate = match read_slot(&store, Slot::DeleteCode).await {
      Some(code) => AccessGate::from_stored(code),
      None => AccessGate::default(),
    };
    let prefs = Preferences {
      dark_mode: read_slot(&store, Slot::DarkMode)
        .await
        .is_some_and(|raw| Preferences::decode_dark_mode(&raw)),
      theme:     read_slot(&store, Slot::BgTheme)
        .await
        .map(|raw| Preferences::decode_theme(&raw))
        .unwrap_or_default(),
    };

    Ok(Self {
      store,
      registry,
      ledger,
      gate,
      prefs,
      draft: Draft::default(),
      counters: CounterPanel::default(),
    })
  }

  /// Mirror one slot to the store, fire-and-forget. Failure keeps the
  /// in-memory state authoritative and costs only a log line.
  async fn mirror(&self, slot: Slot, value: &str) {
    if let Err(err) = self.store.write(slot, value).await {
      warn!(slot = slot.key(), %err, "store write failed; keeping in-memory state");
    }
  }

  // ── Teams ─────────────────────────────────────────────────────────────

  pub async fn add_team(&mut self, name: &str, number: &str) -> Result<()> {
    self.registry.add(name, number)?;
    self
      .mirror(Slot::Teams, &serde_json::to_string(&self.registry)?)
      .await;
    Ok(())
  }

  pub async fn delete_team(&mut self, index: usize) -> Result<()> {
    self.registry.delete_at(index);
    self
      .mirror(Slot::Teams, &serde_json::to_string(&self.registry)?)
      .await;
    Ok(())
  }

  /// Wholesale replacement from an already-parsed import.
  pub async fn replace_teams(&mut self, teams: Vec<Team>) -> Result<()> {
    self.registry.replace_all(teams);
    self
      .mirror(Slot::Teams, &serde_json::to_string(&self.registry)?)
      .await;
    Ok(())
  }

  pub fn teams(&self) -> &[Team] {
    self.registry.teams()
  }

  // ── Entry ─────────────────────────────────────────────────────────────

  pub fn draft(&self) -> &Draft {
    &self.draft
  }

  pub fn draft_mut(&mut self) -> &mut Draft {
    &mut self.draft
  }

  pub fn counters(&self) -> &CounterPanel {
    &self.counters
  }

  pub fn counters_mut(&mut self) -> &mut CounterPanel {
    &mut self.counters
  }

  /// Commit the current draft and counter snapshot as a new record, then
  /// reset both for the next entry. A rejected save leaves the draft and
  /// panel untouched for correction.
  pub async fn save_record(&mut self) -> Result<ScoutingRecord> {
    let record = self.ledger.save(&self.draft, &self.counters)?;
    self
      .mirror(Slot::Records, &serde_json::to_string(&self.ledger)?)
      .await;
    self.draft.reset();
    self.counters.reset();
    Ok(record)
  }

  // ── Records ───────────────────────────────────────────────────────────

  pub fn records(&self) -> &[ScoutingRecord] {
    self.ledger.records()
  }

  pub fn ledger(&self) -> &Ledger {
    &self.ledger
  }

  /// Delete every saved record, gated by the access code.
  pub async fn clear_records(&mut self, code: &str) -> Result<()> {
    if !self.gate.verify(code) {
      return Err(Error::CodeMismatch);
    }
    self.ledger.clear_all();
    self
      .mirror(Slot::Records, &serde_json::to_string(&self.ledger)?)
      .await;
    Ok(())
  }

  pub fn verify_code(&self, candidate: &str) -> bool {
    self.gate.verify(candidate)
  }

  pub async fn rotate_code(&mut self, old: &str, new: &str) -> Result<()> {
    self.gate.rotate(old, new)?;
    self.mirror(Slot::DeleteCode, self.gate.code()).await;
    Ok(())
  }

  /// Roll-up for one team; `None` when the ledger holds nothing for it.
  pub fn team_summary(&self, team: &str) -> Option<TeamSummary> {
    let records = self.ledger.filter_by_team(team);
    if records.is_empty() {
      return None;
    }

    let averages = SlotId::all()
      .filter_map(|slot| {
        average(records.iter().copied(), slot).map(|avg| (slot, avg))
      })
      .collect();
    let recent = records[records.len().saturating_sub(3)..]
      .iter()
      .map(|r| (*r).clone())
      .collect();

    Some(TeamSummary {
      team: team.to_owned(),
      matches: records.len(),
      averages,
      recent,
    })
  }

  // ── Preferences ───────────────────────────────────────────────────────

  pub fn prefs(&self) -> Preferences {
    self.prefs
  }

  pub async fn set_dark_mode(&mut self, on: bool) {
    self.prefs.dark_mode = on;
    self
      .mirror(Slot::DarkMode, self.prefs.encode_dark_mode())
      .await;
  }

  pub async fn set_theme(&mut self, theme: BgTheme) {
    self.prefs.theme = theme;
    self.mirror(Slot::BgTheme, &theme.to_string()).await;
  }
}

/// Read one slot, degrading to "absent" when the store is unavailable.
async fn read_slot<S: StateStore>(store: &S, slot: Slot) -> Option<String> {
  match store.read(slot).await {
    Ok(value) => value,
    Err(err) => {
      warn!(slot = slot.key(), %err, "store read failed; starting from defaults");
      None
    }
  }
}

// ─── Tests ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
  use std::{
    collections::HashMap,
    sync::{Arc, Mutex},
  };

  use super::*;

  /// In-memory store double.
  #[derive(Clone, Default)]
  struct MemoryStore {
    slots: Arc<Mutex<HashMap<&'static str, String>>>,
  }

  impl MemoryStore {
    fn snapshot(&self, slot: Slot) -> Option<String> {
      self.slots.lock().unwrap().get(slot.key()).cloned()
    }

    fn put(&self, slot: Slot, value: &str) {
      self
        .slots
        .lock()
        .unwrap()
        .insert(slot.key(), value.to_owned());
    }
  }

  impl StateStore for MemoryStore {
    type Error = std::convert::Infallible;

    async fn read(&self, slot: Slot) -> Result<Option<String>, Self::Error> {
      Ok(self.slots.lock().unwrap().get(slot.key()).cloned())
    }

    async fn write(&self, slot: Slot, value: &str) -> Result<(), Self::Error> {
      self
        .slots
        .lock()
        .unwrap()
        .insert(slot.key(), value.to_owned());
      Ok(())
    }
  }

  /// A store whose backing is gone entirely.
  #[derive(Clone)]
  struct OfflineStore;

  impl StateStore for OfflineStore {
    type Error = std::io::Error;

    async fn read(&self, _slot: Slot) -> Result<Option<String>, Self::Error> {
      Err(std::io::Error::other("store offline"))
    }

    async fn write(
      &self,
      _slot: Slot,
      _value: &str,
    ) -> Result<(), Self::Error> {
      Err(std::io::Error::other("store offline"))
    }
  }

  async fn fresh() -> (MemoryStore, Session<MemoryStore>) {
    let store = MemoryStore::default();
    let session = Session::load(store.clone()).await.unwrap();
    (store, session)
  }

  // ── Rehydration ───────────────────────────────────────────────────────

  #[tokio::test]
  async fn load_from_empty_store_yields_defaults() {
    let (_, session) = fresh().await;
    assert!(session.teams().is_empty());
    assert!(session.records().is_empty());
    assert!(session.verify_code("1234"));
    assert_eq!(session.prefs(), Preferences::default());
  }

  #[tokio::test]
  async fn load_rehydrates_persisted_state() {
    let store = MemoryStore::default();
    {
      let mut session = Session::load(store.clone()).await.unwrap();
      session.add_team("Foo", "254").await.unwrap();
      session.draft_mut().team = "254".to_owned();
      session.draft_mut().set_match_number("3");
      session.save_record().await.unwrap();
      session.rotate_code("1234", "9999").await.unwrap();
      session.set_dark_mode(true).await;
      session.set_theme(BgTheme::Red).await;
    }

    let session = Session::load(store).await.unwrap();
    assert_eq!(session.teams().len(), 1);
    assert_eq!(session.records().len(), 1);
    assert_eq!(session.records()[0].match_number, "3");
    assert!(session.verify_code("9999"));
    assert!(session.prefs().dark_mode);
    assert_eq!(session.prefs().theme, BgTheme::Red);
  }

  #[tokio::test]
  async fn corrupt_slot_fails_load() {
    let store = MemoryStore::default();
    store.put(Slot::Records, "not json");
    assert!(matches!(
      Session::load(store).await,
      Err(Error::Serialization(_))
    ));
  }

  #[tokio::test]
  async fn offline_store_degrades_to_defaults() {
    let mut session = Session::load(OfflineStore).await.unwrap();
    assert!(session.teams().is_empty());

    // Mutations keep working against in-memory state.
    session.add_team("Foo", "254").await.unwrap();
    assert_eq!(session.teams().len(), 1);

    session.draft_mut().team = "254".to_owned();
    session.draft_mut().set_match_number("1");
    session.save_record().await.unwrap();
    assert_eq!(session.records().len(), 1);
  }

  // ── Teams ─────────────────────────────────────────────────────────────

  #[tokio::test]
  async fn add_team_mirrors_registry_slot() {
    let (store, mut session) = fresh().await;
    session.add_team("Foo", "254").await.unwrap();

    let raw = store.snapshot(Slot::Teams).unwrap();
    let mirrored: TeamRegistry = serde_json::from_str(&raw).unwrap();
    assert_eq!(mirrored.teams(), session.teams());
  }

  #[tokio::test]
  async fn duplicate_team_does_not_touch_store() {
    let (store, mut session) = fresh().await;
    session.add_team("Foo", "254").await.unwrap();
    let before = store.snapshot(Slot::Teams).unwrap();

    let err = session.add_team("Bar", "254").await.unwrap_err();
    assert!(matches!(err, Error::DuplicateTeam(_)));
    assert_eq!(session.teams().len(), 1);
    assert_eq!(store.snapshot(Slot::Teams).unwrap(), before);
  }

  #[tokio::test]
  async fn replace_teams_mirrors_wholesale() {
    let (store, mut session) = fresh().await;
    session.add_team("Foo", "254").await.unwrap();

    session
      .replace_teams(vec![Team {
        name:   "Bar".into(),
        number: "1678".into(),
      }])
      .await
      .unwrap();
    assert_eq!(session.teams().len(), 1);
    assert_eq!(session.teams()[0].number, "1678");

    let raw = store.snapshot(Slot::Teams).unwrap();
    assert!(raw.contains("1678"));
    assert!(!raw.contains("254"));
  }

  // ── Saving ────────────────────────────────────────────────────────────

  #[tokio::test]
  async fn rejected_save_preserves_draft_and_panel() {
    let (store, mut session) = fresh().await;
    session.draft_mut().team = "254".to_owned();
    session.draft_mut().notes = "half-entered".to_owned();
    let slot: SlotId = "auto-l1".parse().unwrap();
    session.counters_mut().increment(slot);

    let err = session.save_record().await.unwrap_err();
    assert!(matches!(err, Error::MissingMatch));
    assert!(session.records().is_empty());
    assert_eq!(session.draft().notes, "half-entered");
    assert_eq!(session.counters().get(slot), 1);
    assert!(store.snapshot(Slot::Records).is_none());
  }

  #[tokio::test]
  async fn successful_save_resets_entry_state_and_mirrors() {
    let (store, mut session) = fresh().await;
    session.draft_mut().team = "254".to_owned();
    session.draft_mut().set_match_number("3");
    session.draft_mut().defense = true;
    let slot: SlotId = "teleop-net".parse().unwrap();
    session.counters_mut().increment(slot);

    let record = session.save_record().await.unwrap();
    assert_eq!(record.team, "254");
    assert_eq!(record.counters.get(slot), 1);

    // Draft and panel are back to their canonical empty state.
    assert_eq!(session.draft(), &Draft::default());
    assert!(session.counters().is_zeroed());

    let raw = store.snapshot(Slot::Records).unwrap();
    let mirrored: Ledger = serde_json::from_str(&raw).unwrap();
    assert_eq!(mirrored.records(), session.records());
  }

  #[tokio::test]
  async fn saved_record_may_reference_unregistered_team() {
    // Soft reference by design: deleting a team strands no records, and a
    // record may name a team that was never registered.
    let (_, mut session) = fresh().await;
    session.draft_mut().team = "9999".to_owned();
    session.draft_mut().set_match_number("1");
    session.save_record().await.unwrap();
    assert_eq!(session.records()[0].team, "9999");
    assert!(session.teams().is_empty());
  }

  // ── Clearing & gate ───────────────────────────────────────────────────

  #[tokio::test]
  async fn clear_records_requires_code() {
    let (store, mut session) = fresh().await;
    session.draft_mut().team = "254".to_owned();
    session.draft_mut().set_match_number("1");
    session.save_record().await.unwrap();

    let err = session.clear_records("0000").await.unwrap_err();
    assert!(matches!(err, Error::CodeMismatch));
    assert_eq!(session.records().len(), 1);

    session.clear_records("1234").await.unwrap();
    assert!(session.records().is_empty());

    let raw = store.snapshot(Slot::Records).unwrap();
    assert_eq!(raw, "[]");
  }

  #[tokio::test]
  async fn rotate_code_mirrors_new_code() {
    let (store, mut session) = fresh().await;
    session.rotate_code("1234", "9999").await.unwrap();
    assert!(session.verify_code("9999"));
    assert!(!session.verify_code("1234"));
    assert_eq!(store.snapshot(Slot::DeleteCode).unwrap(), "9999");
  }

  #[tokio::test]
  async fn failed_rotation_leaves_code_alone() {
    let (store, mut session) = fresh().await;
    let err = session.rotate_code("1234", "ab").await.unwrap_err();
    assert!(matches!(err, Error::CodeTooShort { .. }));
    assert!(session.verify_code("1234"));
    assert!(store.snapshot(Slot::DeleteCode).is_none());
  }

  // ── Summary ───────────────────────────────────────────────────────────

  #[tokio::test]
  async fn team_summary_aggregates() {
    let (_, mut session) = fresh().await;
    let slot: SlotId = "auto-l1".parse().unwrap();

    for (m, tallies) in [("1", 2u32), ("2", 4)] {
      session.draft_mut().team = "254".to_owned();
      session.draft_mut().set_match_number(m);
      for _ in 0..tallies {
        session.counters_mut().increment(slot);
      }
      session.save_record().await.unwrap();
    }

    let summary = session.team_summary("254").unwrap();
    assert_eq!(summary.matches, 2);
    assert_eq!(summary.recent.len(), 2);
    let avg = summary
      .averages
      .iter()
      .find(|(s, _)| *s == slot)
      .map(|(_, avg)| *avg)
      .unwrap();
    assert!((avg - 3.0).abs() < f64::EPSILON);

    assert!(session.team_summary("1678").is_none());
  }

  // ── Preferences ───────────────────────────────────────────────────────

  #[tokio::test]
  async fn preference_changes_mirror_their_slots() {
    let (store, mut session) = fresh().await;
    session.set_dark_mode(true).await;
    session.set_theme(BgTheme::Blue).await;
    assert_eq!(store.snapshot(Slot::DarkMode).unwrap(), "true");
    assert_eq!(store.snapshot(Slot::BgTheme).unwrap(), "blue");

    session.set_dark_mode(false).await;
    assert_eq!(store.snapshot(Slot::DarkMode).unwrap(), "false");
  }
}
