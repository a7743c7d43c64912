//! SQLite-based entry storage.
//!
//! Recorded entries are kept in insertion order and listed newest first.
//! Two entries may share an id (same totals, same reference), so rows are
//! keyed by an autoincrement sequence instead.

use chrono::{DateTime, Utc};
use rusqlite::{params, Connection};
use std::path::Path;

use super::data_dir;
use crate::entry::{Entry, EntryLog};
use crate::error::{DatabaseError, Result};

/// SQLite database for recorded entries.
pub struct Database {
    conn: Connection,
}

impl Database {
    /// Open the database at `~/.config/pearclock/pearclock.db`.
    ///
    /// Creates the database file and schema if they don't exist.
    ///
    /// # Errors
    /// Returns an error if the database cannot be opened or migrated.
    pub fn open() -> Result<Self> {
        Self::open_at(&data_dir()?.join("pearclock.db"))
    }

    pub fn open_at(path: &Path) -> Result<Self> {
        let conn = Connection::open(path).map_err(|source| DatabaseError::OpenFailed {
            path: path.to_path_buf(),
            source,
        })?;
        let db = Self { conn };
        db.migrate()?;
        Ok(db)
    }

    /// Open an in-memory database.
    pub fn open_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        let db = Self { conn };
        db.migrate()?;
        Ok(db)
    }

    fn migrate(&self) -> Result<(), rusqlite::Error> {
        self.conn.execute_batch(
            "CREATE TABLE IF NOT EXISTS entries (
                seq             INTEGER PRIMARY KEY AUTOINCREMENT,
                id              TEXT NOT NULL,
                total_task_time TEXT NOT NULL,
                reference       TEXT NOT NULL DEFAULT '',
                max_focus_time  TEXT NOT NULL,
                recorded_at     TEXT NOT NULL
            );

            CREATE INDEX IF NOT EXISTS idx_entries_id ON entries(id);",
        )?;
        Ok(())
    }

    pub fn count(&self) -> Result<u64> {
        let n = self
            .conn
            .query_row("SELECT COUNT(*) FROM entries", [], |row| row.get::<_, u64>(0))?;
        Ok(n)
    }
}

impl EntryLog for Database {
    fn append(&mut self, entry: &Entry) -> Result<()> {
        self.conn.execute(
            "INSERT INTO entries (id, total_task_time, reference, max_focus_time, recorded_at)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![
                entry.id,
                entry.total_task_time,
                entry.reference,
                entry.max_focus_time,
                entry.recorded_at.to_rfc3339(),
            ],
        )?;
        Ok(())
    }

    fn clear(&mut self) -> Result<()> {
        self.conn.execute("DELETE FROM entries", [])?;
        Ok(())
    }

    fn all(&self) -> Result<Vec<Entry>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, total_task_time, reference, max_focus_time, recorded_at
             FROM entries
             ORDER BY seq DESC",
        )?;
        let rows = stmt.query_map([], |row| {
            Ok((
                row.get::<_, String>(0)?,
                row.get::<_, String>(1)?,
                row.get::<_, String>(2)?,
                row.get::<_, String>(3)?,
                row.get::<_, String>(4)?,
            ))
        })?;

        let mut entries = Vec::new();
        for row in rows {
            let (id, total_task_time, reference, max_focus_time, recorded_at) = row?;
            let recorded_at = DateTime::parse_from_rfc3339(&recorded_at)
                .map(|t| t.with_timezone(&Utc))
                .map_err(|e| DatabaseError::QueryFailed(format!("bad recorded_at: {e}")))?;
            entries.push(Entry {
                id,
                total_task_time,
                reference,
                max_focus_time,
                recorded_at,
            });
        }
        Ok(entries)
    }

    fn is_empty(&self) -> Result<bool> {
        Ok(self.count()? == 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entry::make_entry;

    #[test]
    fn append_and_list_newest_first() {
        let mut db = Database::open_memory().unwrap();
        db.append(&make_entry("00:10:00", "first", "00:10:00")).unwrap();
        db.append(&make_entry("00:20:00", "second", "00:15:00")).unwrap();

        let entries = db.all().unwrap();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].reference, "second");
        assert_eq!(entries[1].reference, "first");
        assert_eq!(entries[0].id, make_entry("00:20:00", "second", "00:15:00").id);
    }

    #[test]
    fn duplicate_ids_are_kept() {
        let mut db = Database::open_memory().unwrap();
        let entry = make_entry("00:00:05", "ref", "00:00:05");
        db.append(&entry).unwrap();
        db.append(&entry).unwrap();
        assert_eq!(db.count().unwrap(), 2);
    }

    #[test]
    fn clear_removes_everything() {
        let mut db = Database::open_memory().unwrap();
        assert!(db.is_empty().unwrap());
        db.append(&make_entry("00:00:05", "ref", "00:00:05")).unwrap();
        assert!(!db.is_empty().unwrap());
        db.clear().unwrap();
        assert!(db.all().unwrap().is_empty());
    }

    #[test]
    fn entries_survive_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("pearclock.db");
        {
            let mut db = Database::open_at(&path).unwrap();
            db.append(&make_entry("01:00:00", "kept", "00:40:00")).unwrap();
        }
        let db = Database::open_at(&path).unwrap();
        let entries = db.all().unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].reference, "kept");
        assert_eq!(entries[0].max_focus_time, "00:40:00");
    }
}
