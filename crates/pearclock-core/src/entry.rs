//! Recorded entries.
//!
//! An [`Entry`] is produced once per recorded session and never changes. Its
//! `id` is a short deterministic digest of the three visible columns, so the
//! same totals and reference always yield the same id, on any platform.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::sinks::Confirm;

pub const EXPORT_HEADER: &str = "ID\tTotal Task Time\tReference\tMax Focus Time\n";

pub(crate) const CLEAR_TITLE: &str = "Clear Entries";
pub(crate) const CLEAR_MESSAGE: &str =
    "Are you sure you want to clear all recorded entries? This cannot be undone.";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entry {
    pub id: String,
    /// `HH:MM:SS`
    pub total_task_time: String,
    pub reference: String,
    /// `HH:MM:SS`
    pub max_focus_time: String,
    pub recorded_at: DateTime<Utc>,
}

/// Build an entry from already formatted durations. `reference` is trimmed.
pub fn make_entry(total_task_time: &str, reference: &str, max_focus_time: &str) -> Entry {
    let reference = reference.trim();
    let id = digest(&format!("{total_task_time}{reference}{max_focus_time}"));
    Entry {
        id,
        total_task_time: total_task_time.to_string(),
        reference: reference.to_string(),
        max_focus_time: max_focus_time.to_string(),
        recorded_at: Utc::now(),
    }
}

/// 32-bit rolling hash over UTF-16 code units (`h = h * 31 + unit`, wrapping
/// as i32), rendered as the absolute value in 8 lowercase hex digits.
pub fn digest(input: &str) -> String {
    let hash = input
        .encode_utf16()
        .fold(0i32, |h, unit| h.wrapping_mul(31).wrapping_add(i32::from(unit)));
    format!("{:08x}", i64::from(hash).abs())
}

/// Ordered store of recorded entries, newest first.
pub trait EntryLog: Send {
    fn append(&mut self, entry: &Entry) -> Result<()>;
    fn clear(&mut self) -> Result<()>;
    fn all(&self) -> Result<Vec<Entry>>;

    fn is_empty(&self) -> Result<bool> {
        Ok(self.all()?.is_empty())
    }
}

/// In-process entry log. Used for ephemeral sessions and tests.
#[derive(Debug, Clone, Default)]
pub struct MemoryEntryLog {
    entries: Vec<Entry>,
}

impl MemoryEntryLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }
}

impl EntryLog for MemoryEntryLog {
    fn append(&mut self, entry: &Entry) -> Result<()> {
        self.entries.insert(0, entry.clone());
        Ok(())
    }

    fn clear(&mut self) -> Result<()> {
        self.entries.clear();
        Ok(())
    }

    fn all(&self) -> Result<Vec<Entry>> {
        Ok(self.entries.clone())
    }
}

/// Tab-separated table of `entries` with a header row, for pasting elsewhere.
pub fn export_tsv(entries: &[Entry]) -> String {
    let mut out = String::from(EXPORT_HEADER);
    for entry in entries {
        out.push_str(&format!(
            "{}\t{}\t{}\t{}\n",
            entry.id, entry.total_task_time, entry.reference, entry.max_focus_time
        ));
    }
    out
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClearOutcome {
    /// Nothing to clear; the user was not asked.
    AlreadyEmpty,
    Cleared,
    Declined,
}

/// Clear `log` after the user confirms.
pub async fn clear_entries<L, C>(log: &mut L, confirm: &C) -> Result<ClearOutcome>
where
    L: EntryLog + ?Sized,
    C: Confirm + ?Sized,
{
    if log.is_empty()? {
        return Ok(ClearOutcome::AlreadyEmpty);
    }
    if !confirm.confirm(CLEAR_TITLE, CLEAR_MESSAGE).await {
        return Ok(ClearOutcome::Declined);
    }
    log.clear()?;
    tracing::info!("entry log cleared");
    Ok(ClearOutcome::Cleared)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::future::Future;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct Answer {
        yes: bool,
        asked: AtomicUsize,
    }

    impl Answer {
        fn new(yes: bool) -> Self {
            Self {
                yes,
                asked: AtomicUsize::new(0),
            }
        }
    }

    impl Confirm for Answer {
        fn confirm(&self, _title: &str, _message: &str) -> impl Future<Output = bool> + Send {
            self.asked.fetch_add(1, Ordering::SeqCst);
            std::future::ready(self.yes)
        }
    }

    #[test]
    fn digest_golden_values() {
        assert_eq!(digest(""), "00000000");
        assert_eq!(digest("a"), "00000061");
        assert_eq!(digest("00:00:05ref00:00:05"), "1ff4278d");
        assert_eq!(digest("01:02:03Write report00:45:10"), "2a1f2635");
    }

    #[test]
    fn digest_hashes_utf16_units() {
        assert_eq!(digest("00:00:05été00:00:05"), "45ad5e7e");
        // Astral characters count as two surrogate units.
        assert_eq!(digest("00:00:01\u{1F345}00:00:01"), "255d2035");
    }

    #[test]
    fn make_entry_is_deterministic() {
        let a = make_entry("00:00:05", "ref", "00:00:05");
        let b = make_entry("00:00:05", "ref", "00:00:05");
        assert_eq!(a.id, "1ff4278d");
        assert_eq!(a.id, b.id);
    }

    #[test]
    fn make_entry_trims_reference() {
        let entry = make_entry("00:00:05", "  ref \n", "00:00:05");
        assert_eq!(entry.reference, "ref");
        assert_eq!(entry.id, "1ff4278d");

        let empty = make_entry("00:10:00", "   ", "00:10:00");
        assert_eq!(empty.reference, "");
    }

    #[test]
    fn memory_log_is_newest_first() {
        let mut log = MemoryEntryLog::new();
        log.append(&make_entry("00:00:01", "first", "00:00:01")).unwrap();
        log.append(&make_entry("00:00:02", "second", "00:00:02")).unwrap();
        let all = log.all().unwrap();
        assert_eq!(all[0].reference, "second");
        assert_eq!(all[1].reference, "first");
        assert_eq!(log.len(), 2);
    }

    #[test]
    fn export_has_header_and_rows() {
        let entries = vec![make_entry("00:00:05", "ref", "00:00:05")];
        assert_eq!(
            export_tsv(&entries),
            "ID\tTotal Task Time\tReference\tMax Focus Time\n1ff4278d\t00:00:05\tref\t00:00:05\n"
        );
        assert_eq!(export_tsv(&[]), EXPORT_HEADER);
    }

    #[tokio::test]
    async fn clear_on_empty_log_does_not_ask() {
        let mut log = MemoryEntryLog::new();
        let confirm = Answer::new(true);
        let outcome = clear_entries(&mut log, &confirm).await.unwrap();
        assert_eq!(outcome, ClearOutcome::AlreadyEmpty);
        assert_eq!(confirm.asked.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn clear_respects_the_answer() {
        let mut log = MemoryEntryLog::new();
        log.append(&make_entry("00:00:05", "ref", "00:00:05")).unwrap();

        let outcome = clear_entries(&mut log, &Answer::new(false)).await.unwrap();
        assert_eq!(outcome, ClearOutcome::Declined);
        assert_eq!(log.len(), 1);

        let outcome = clear_entries(&mut log, &Answer::new(true)).await.unwrap();
        assert_eq!(outcome, ClearOutcome::Cleared);
        assert!(log.is_empty().unwrap());
    }
}
