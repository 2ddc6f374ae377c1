//! Integration tests for `SqliteStore` against an in-memory database.

use pitscout_core::{
  session::Session,
  store::{Slot, StateStore},
};

use crate::SqliteStore;

async fn store() -> SqliteStore {
  SqliteStore::open_in_memory()
    .await
    .expect("in-memory store")
}

// ─── Slot semantics ──────────────────────────────────────────────────────────

#[tokio::test]
async fn unwritten_slot_reads_absent() {
  let s = store().await;
  for slot in [
    Slot::Teams,
    Slot::Records,
    Slot::DarkMode,
    Slot::BgTheme,
    Slot::DeleteCode,
    Slot::LastReload,
  ] {
    assert_eq!(s.read(slot).await.unwrap(), None);
  }
}

#[tokio::test]
async fn write_then_read_round_trips() {
  let s = store().await;
  s.write(Slot::DeleteCode, "9999").await.unwrap();
  assert_eq!(s.read(Slot::DeleteCode).await.unwrap().as_deref(), Some("9999"));
}

#[tokio::test]
async fn rewrite_is_last_write_wins() {
  let s = store().await;
  s.write(Slot::BgTheme, "red").await.unwrap();
  s.write(Slot::BgTheme, "blue").await.unwrap();
  assert_eq!(s.read(Slot::BgTheme).await.unwrap().as_deref(), Some("blue"));
}

#[tokio::test]
async fn slots_are_independent() {
  let s = store().await;
  s.write(Slot::Teams, "[]").await.unwrap();
  s.write(Slot::DarkMode, "true").await.unwrap();

  assert_eq!(s.read(Slot::Teams).await.unwrap().as_deref(), Some("[]"));
  assert_eq!(s.read(Slot::DarkMode).await.unwrap().as_deref(), Some("true"));
  assert_eq!(s.read(Slot::Records).await.unwrap(), None);
}

#[tokio::test]
async fn stores_arbitrary_json_payloads() {
  let s = store().await;
  let payload =
    r#"[{"name":"Quoted \"Team\"","number":"254"},{"name":"B","number":"1"}]"#;
  s.write(Slot::Teams, payload).await.unwrap();

  let raw = s.read(Slot::Teams).await.unwrap().unwrap();
  assert_eq!(raw, payload);
  let value: serde_json::Value = serde_json::from_str(&raw).unwrap();
  assert_eq!(value[0]["number"], "254");
}

// ─── Session over SQLite ─────────────────────────────────────────────────────

#[tokio::test]
async fn session_state_survives_reload() {
  let s = store().await;

  {
    let mut session = Session::load(s.clone()).await.unwrap();
    session.add_team("Foo", "254").await.unwrap();
    session.draft_mut().team = "254".to_owned();
    session.draft_mut().set_match_number("7");
    session.counters_mut().increment("auto-l4".parse().unwrap());
    session.save_record().await.unwrap();
    session.rotate_code("1234", "31415").await.unwrap();
  }

  // A fresh session over the same database sees everything.
  let mut session = Session::load(s).await.unwrap();
  assert_eq!(session.teams().len(), 1);
  assert_eq!(session.records().len(), 1);
  assert_eq!(
    session.records()[0].counters.get("auto-l4".parse().unwrap()),
    1
  );
  assert!(session.verify_code("31415"));

  // And the gate still guards the clear.
  assert!(session.clear_records("1234").await.is_err());
  session.clear_records("31415").await.unwrap();
  assert!(session.records().is_empty());
}
