//! CSV report serializer.
//!
//! One fixed header row, then one row per record in ledger order. Only the
//! notes column is quoted (double-quoted, internal quotes doubled); every
//! other field is rendered literally. That narrow escaping is the report's
//! historical format — downstream spreadsheets already parse it — so it is
//! kept as-is rather than upgraded to fully quoted CSV. Team numbers and
//! actions come from closed value sets in practice, while notes are the one
//! free-text column.

use chrono::{NaiveDate, SecondsFormat};

use pitscout_core::{counters::SlotId, record::ScoutingRecord};

/// The fixed header row; its comma count is the field count of every row.
pub const HEADER: &str = "Team,Match,Color,Auto L1,Auto L2,Auto L3,Auto L4,\
Auto Net,Auto Processor,Teleop L1,Teleop L2,Teleop L3,Teleop L4,Teleop Net,\
Teleop Processor,Moved from Start,Defense,Action,Notes,Timestamp";

/// Serialize the full ledger contents.
///
/// `None` when `records` is empty — an empty report is not produced at all.
/// Otherwise the output has exactly `records.len() + 1` lines.
pub fn export(records: &[ScoutingRecord]) -> Option<String> {
  if records.is_empty() {
    return None;
  }

  let mut out = String::with_capacity(records.len() * 96);
  out.push_str(HEADER);
  out.push('\n');
  for record in records {
    row(&mut out, record);
    out.push('\n');
  }
  Some(out)
}

/// File name for a report generated on `date`.
pub fn export_filename(date: NaiveDate) -> String {
  format!("scouting_data_{}.csv", date.format("%Y-%m-%d"))
}

fn row(out: &mut String, record: &ScoutingRecord) {
  out.push_str(&record.team);
  out.push(',');
  out.push_str(&record.match_number);
  out.push(',');
  out.push_str(&record.color.to_string());
  // The twelve counters, in canonical slot order matching the header.
  for slot in SlotId::all() {
    out.push(',');
    out.push_str(&record.counters.get(slot).to_string());
  }
  out.push(',');
  out.push_str(if record.moved_from_start { "true" } else { "false" });
  out.push(',');
  out.push_str(if record.defense { "true" } else { "false" });
  out.push(',');
  if let Some(action) = record.action {
    out.push_str(&action.to_string());
  }
  out.push(',');
  out.push_str(&quote_notes(&record.notes));
  out.push(',');
  out.push_str(&record.timestamp.to_rfc3339_opts(SecondsFormat::Millis, true));
}

/// Standard CSV quoting, applied to this one column only.
fn quote_notes(notes: &str) -> String {
  format!("\"{}\"", notes.replace('"', "\"\""))
}
