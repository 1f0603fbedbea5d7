//! Study log and per-subject summary
//!
//! An append-only record of finished study sessions plus a running total of
//! hours per subject. Entries are only ever removed by undo.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::id::EntryId;

/// A finished study session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LogEntry {
    pub id: EntryId,
    pub subject: String,
    pub duration_hours: f64,
    pub notes: String,
    pub timestamp: DateTime<Utc>,
}

/// Append-only session store with per-subject aggregation
#[derive(Debug, Default)]
pub struct TimeLog {
    entries: Vec<LogEntry>,
    totals: BTreeMap<String, f64>,
}

impl TimeLog {
    /// Creates an empty log
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends an entry and adds its duration to the subject total.
    /// The caller is responsible for validating the entry.
    pub fn append(&mut self, entry: LogEntry) {
        *self.totals.entry(entry.subject.clone()).or_insert(0.0) += entry.duration_hours;
        self.entries.push(entry);
    }

    /// Removes an entry by id, subtracting its duration from the subject
    /// total. A subject with no remaining entries disappears from the summary.
    pub fn remove(&mut self, id: EntryId) -> Option<LogEntry> {
        let pos = self.entries.iter().position(|e| e.id == id)?;
        let entry = self.entries.remove(pos);

        let orphaned = !self.entries.iter().any(|e| e.subject == entry.subject);
        if orphaned {
            self.totals.remove(&entry.subject);
        } else if let Some(total) = self.totals.get_mut(&entry.subject) {
            *total -= entry.duration_hours;
        }

        Some(entry)
    }

    /// Returns the subject -> total hours mapping
    pub fn summary(&self) -> &BTreeMap<String, f64> {
        &self.totals
    }

    /// Iterates over entries in insertion order
    pub fn iter(&self) -> impl Iterator<Item = &LogEntry> {
        self.entries.iter()
    }

    /// Returns the number of entries
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if no sessions are recorded
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
