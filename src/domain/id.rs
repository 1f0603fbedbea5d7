//! Identifiers for engine-owned records
//!
//! Ids are plain integers handed out from monotonic per-engine counters and
//! are never reused. Undo restores a record under its original id, so a
//! client-held reference stays valid across an undo/redo round trip.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifier of a task
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TaskId(pub u64);

impl fmt::Display for TaskId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Identifier of an unavailable time block
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BlockId(pub u64);

impl fmt::Display for BlockId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Identifier of a study log entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EntryId(pub u64);

impl fmt::Display for EntryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_serialize_as_bare_numbers() {
        assert_eq!(serde_json::to_string(&TaskId(42)).unwrap(), "42");
        assert_eq!(serde_json::to_string(&BlockId(7)).unwrap(), "7");
        assert_eq!(serde_json::to_string(&EntryId(0)).unwrap(), "0");
    }

    #[test]
    fn ids_deserialize_from_numbers() {
        let id: TaskId = serde_json::from_str("42").unwrap();
        assert_eq!(id, TaskId(42));
    }

    #[test]
    fn display_matches_inner_value() {
        assert_eq!(TaskId(15).to_string(), "15");
        assert_eq!(EntryId(3).to_string(), "3");
    }
}
