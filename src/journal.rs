//! Trade journal persistence
//!
//! The journal is a flat mapping from calendar date ("DD-MM-YYYY") to an
//! ordered list of trade records, rewritten in full on every append. The
//! persistence backend is injected: a JSON file in production, an in-memory
//! map in tests. Single-writer by assumption; there is no locking.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::types::JournalEntry;

/// Journal persistence errors
#[derive(Debug, Error)]
pub enum JournalError {
    #[error("failed to read journal file: {0}")]
    Read(#[source] std::io::Error),
    #[error("failed to write journal file: {0}")]
    Write(#[source] std::io::Error),
    #[error("journal file is not valid JSON: {0}")]
    Format(#[from] serde_json::Error),
}

/// The full journal mapping
///
/// Dates are unique keys; entries under a date keep insertion order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Journal {
    entries: BTreeMap<String, Vec<JournalEntry>>,
}

impl Journal {
    pub fn new() -> Self {
        Journal::default()
    }

    /// Append an entry under the given date key, creating the date's list
    /// if unseen
    pub fn push(&mut self, date_key: &str, entry: JournalEntry) {
        self.entries.entry(date_key.to_string()).or_default().push(entry);
    }

    pub fn get(&self, date_key: &str) -> Option<&[JournalEntry]> {
        self.entries.get(date_key).map(|v| v.as_slice())
    }

    pub fn dates(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(|k| k.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[JournalEntry])> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_slice()))
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn entry_count(&self) -> usize {
        self.entries.values().map(|v| v.len()).sum()
    }
}

/// Format a date as a journal key, "DD-MM-YYYY"
pub fn date_key(date: NaiveDate) -> String {
    date.format("%d-%m-%Y").to_string()
}

// =============================================================================
// Backends
// =============================================================================

/// Persistence seam for the journal
pub trait JournalBackend {
    /// Load the persisted mapping. Absence of prior state is an empty
    /// journal, not an error.
    fn load(&self) -> Result<Journal, JournalError>;

    /// Persist the full mapping, replacing prior state
    fn store(&mut self, journal: &Journal) -> Result<(), JournalError>;
}

/// JSON-file backend. The path is explicit configuration; nothing is
/// derived from the working directory.
pub struct FileBackend {
    path: PathBuf,
}

impl FileBackend {
    pub fn new(path: impl AsRef<Path>) -> Self {
        FileBackend {
            path: path.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl JournalBackend for FileBackend {
    fn load(&self) -> Result<Journal, JournalError> {
        match std::fs::read_to_string(&self.path) {
            Ok(contents) => Ok(serde_json::from_str(&contents)?),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(Journal::new()),
            Err(e) => Err(JournalError::Read(e)),
        }
    }

    fn store(&mut self, journal: &Journal) -> Result<(), JournalError> {
        let contents = serde_json::to_string_pretty(journal)?;
        std::fs::write(&self.path, contents).map_err(JournalError::Write)
    }
}

/// In-memory backend for tests
#[derive(Default)]
pub struct MemoryBackend {
    journal: Journal,
}

impl MemoryBackend {
    pub fn new() -> Self {
        MemoryBackend::default()
    }
}

impl JournalBackend for MemoryBackend {
    fn load(&self) -> Result<Journal, JournalError> {
        Ok(self.journal.clone())
    }

    fn store(&mut self, journal: &Journal) -> Result<(), JournalError> {
        self.journal = journal.clone();
        Ok(())
    }
}

// =============================================================================
// Store
// =============================================================================

/// Append-only journal store over an injected backend
///
/// Each append is read-modify-write of the whole mapping. Not safe for
/// concurrent writers; a multi-writer deployment would need a
/// write-to-temp-then-rename step and file locking.
pub struct JournalStore<B: JournalBackend> {
    backend: B,
}

impl<B: JournalBackend> JournalStore<B> {
    pub fn new(backend: B) -> Self {
        JournalStore { backend }
    }

    /// Append one entry under the given date
    pub fn append(&mut self, date: NaiveDate, entry: JournalEntry) -> Result<(), JournalError> {
        let mut journal = self.backend.load()?;
        journal.push(&date_key(date), entry);
        self.backend.store(&journal)
    }

    /// Load the full journal for display
    pub fn load(&self) -> Result<Journal, JournalError> {
        self.backend.load()
    }
}

impl JournalStore<FileBackend> {
    /// Open a file-backed store at an explicit path
    pub fn open(path: impl AsRef<Path>) -> Self {
        JournalStore::new(FileBackend::new(path))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Outcome, Side};

    fn entry(net_pl: f64) -> JournalEntry {
        JournalEntry {
            order_type: "Intraday".to_string(),
            position: Side::Buy,
            ratio: 2.5,
            time: "10:15:00".to_string(),
            result: Outcome::from_net_profit(net_pl),
            net_pl,
            quantity: 100,
        }
    }

    fn date(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, d).unwrap()
    }

    #[test]
    fn test_date_key_format() {
        assert_eq!(date_key(date(7)), "07-03-2024");
    }

    #[test]
    fn test_same_date_preserves_insertion_order() {
        let mut store = JournalStore::new(MemoryBackend::new());
        store.append(date(7), entry(490.94)).unwrap();
        store.append(date(7), entry(-120.0)).unwrap();

        let journal = store.load().unwrap();
        let day = journal.get("07-03-2024").unwrap();
        assert_eq!(day.len(), 2);
        assert_eq!(day[0].result, Outcome::Profit);
        assert_eq!(day[1].result, Outcome::Loss);
    }

    #[test]
    fn test_new_date_does_not_disturb_existing_keys() {
        let mut store = JournalStore::new(MemoryBackend::new());
        store.append(date(7), entry(10.0)).unwrap();
        store.append(date(8), entry(20.0)).unwrap();

        let journal = store.load().unwrap();
        assert_eq!(journal.dates().collect::<Vec<_>>(), vec!["07-03-2024", "08-03-2024"]);
        assert_eq!(journal.get("07-03-2024").unwrap().len(), 1);
        assert_eq!(journal.get("08-03-2024").unwrap().len(), 1);
    }

    #[test]
    fn test_missing_file_loads_as_empty() {
        let dir = tempfile::tempdir().unwrap();
        let store = JournalStore::open(dir.path().join("journal.json"));
        let journal = store.load().unwrap();
        assert!(journal.is_empty());
    }

    #[test]
    fn test_file_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("journal.json");

        let mut store = JournalStore::open(&path);
        store.append(date(7), entry(490.94)).unwrap();
        store.append(date(7), entry(-120.0)).unwrap();
        store.append(date(8), entry(35.5)).unwrap();
        let written = store.load().unwrap();

        // A fresh store over the same file sees an identical mapping
        let reread = JournalStore::open(&path).load().unwrap();
        assert_eq!(written, reread);
        assert_eq!(reread.entry_count(), 3);
    }

    #[test]
    fn test_wire_field_names() {
        let json = serde_json::to_value(entry(490.94)).unwrap();
        assert_eq!(json["orderType"], "Intraday");
        assert_eq!(json["position"], "b");
        assert_eq!(json["result"], "P");
        assert_eq!(json["netPL"], 490.94);
        assert_eq!(json["quantity"], 100);
        assert_eq!(json["time"], "10:15:00");
    }
}
