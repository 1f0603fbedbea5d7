//! Unavailable time blocks
//!
//! A block marks a recurring daily interval as unavailable for scheduling.
//! Accepted blocks never overlap; comparisons use half-open `[start, end)`
//! semantics, so adjacent blocks are allowed.

use std::collections::{BTreeMap, HashMap};

use chrono::NaiveTime;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::id::BlockId;

#[derive(Debug, Error, PartialEq)]
pub enum BlockError {
    #[error("End time must be after start time: {start} >= {end}")]
    InvalidRange { start: NaiveTime, end: NaiveTime },

    #[error("Time block {start}-{end} overlaps existing block {existing_start}-{existing_end}")]
    Overlap {
        start: NaiveTime,
        end: NaiveTime,
        existing_start: NaiveTime,
        existing_end: NaiveTime,
    },
}

/// One recurring daily unavailable interval
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeBlock {
    pub id: BlockId,
    pub start: NaiveTime,
    pub end: NaiveTime,
}

impl TimeBlock {
    /// Returns a short `HH:MM-HH:MM` label for messages and plan slots
    pub fn label(&self) -> String {
        format!(
            "{}-{}",
            self.start.format("%H:%M"),
            self.end.format("%H:%M")
        )
    }
}

/// Non-overlapping set of time blocks, ordered by start time.
///
/// Kept in a `BTreeMap` keyed by start time. Stored blocks never overlap, so
/// a conflict check only needs the nearest neighbor on each side of the
/// candidate start: O(log n), the balanced-tree equivalent of an augmented
/// interval tree for this invariant.
#[derive(Debug, Default)]
pub struct BlockSet {
    by_start: BTreeMap<NaiveTime, TimeBlock>,
    by_id: HashMap<BlockId, NaiveTime>,
}

impl BlockSet {
    /// Creates an empty block set
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the stored block overlapping `[start, end)`, if any
    pub fn find_overlap(&self, start: NaiveTime, end: NaiveTime) -> Option<&TimeBlock> {
        if let Some((_, prev)) = self.by_start.range(..=start).next_back() {
            if prev.end > start {
                return Some(prev);
            }
        }
        if let Some((_, next)) = self.by_start.range(start..).next() {
            if next.start < end {
                return Some(next);
            }
        }
        None
    }

    /// Validates and inserts a new block, returning the stored value
    pub fn insert(&mut self, id: BlockId, start: NaiveTime, end: NaiveTime) -> Result<TimeBlock, BlockError> {
        if start >= end {
            return Err(BlockError::InvalidRange { start, end });
        }
        if let Some(existing) = self.find_overlap(start, end) {
            return Err(BlockError::Overlap {
                start,
                end,
                existing_start: existing.start,
                existing_end: existing.end,
            });
        }

        let block = TimeBlock { id, start, end };
        self.by_id.insert(id, start);
        self.by_start.insert(start, block.clone());
        Ok(block)
    }

    /// Removes a block by id, returning it if present
    pub fn remove(&mut self, id: BlockId) -> Option<TimeBlock> {
        let start = self.by_id.remove(&id)?;
        self.by_start.remove(&start)
    }

    /// Re-inserts a block removed by undo.
    ///
    /// Skips conflict checks: the set held this exact block before the
    /// matching undo and has not been mutated since.
    pub(crate) fn restore(&mut self, block: TimeBlock) {
        self.by_id.insert(block.id, block.start);
        self.by_start.insert(block.start, block);
    }

    /// Returns the number of blocks
    pub fn len(&self) -> usize {
        self.by_start.len()
    }

    /// Returns true if no blocks are stored
    pub fn is_empty(&self) -> bool {
        self.by_start.is_empty()
    }

    /// Iterates over blocks ordered by start time
    pub fn iter(&self) -> impl Iterator<Item = &TimeBlock> {
        self.by_start.values()
    }

    /// Returns the open sub-intervals of `[window_start, window_end)` left
    /// after subtracting every block, in ascending order.
    pub fn free_slots_within(
        &self,
        window_start: NaiveTime,
        window_end: NaiveTime,
    ) -> Vec<(NaiveTime, NaiveTime)> {
        let mut free = Vec::new();
        let mut cursor = window_start;

        for block in self.by_start.values() {
            if block.end <= cursor {
                continue;
            }
            if block.start >= window_end {
                break;
            }
            if block.start > cursor {
                free.push((cursor, block.start.min(window_end)));
            }
            cursor = cursor.max(block.end);
            if cursor >= window_end {
                return free;
            }
        }

        if cursor < window_end {
            free.push((cursor, window_end));
        }
        free
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn time(h: u32, m: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(h, m, 0).unwrap()
    }

    #[test]
    fn insert_rejects_empty_range() {
        let mut blocks = BlockSet::new();
        let result = blocks.insert(BlockId(1), time(10, 0), time(10, 0));
        assert!(matches!(result, Err(BlockError::InvalidRange { .. })));

        let result = blocks.insert(BlockId(1), time(11, 0), time(10, 0));
        assert!(matches!(result, Err(BlockError::InvalidRange { .. })));
        assert!(blocks.is_empty());
    }

    #[test]
    fn overlapping_insert_is_rejected() {
        let mut blocks = BlockSet::new();
        blocks.insert(BlockId(1), time(9, 0), time(10, 0)).unwrap();

        let result = blocks.insert(BlockId(2), time(9, 30), time(10, 30));
        assert!(matches!(result, Err(BlockError::Overlap { .. })));
        assert_eq!(blocks.len(), 1);
    }

    #[test]
    fn containing_and_contained_intervals_conflict() {
        let mut blocks = BlockSet::new();
        blocks.insert(BlockId(1), time(9, 0), time(12, 0)).unwrap();

        assert!(blocks.insert(BlockId(2), time(10, 0), time(11, 0)).is_err());
        assert!(blocks.insert(BlockId(3), time(8, 0), time(13, 0)).is_err());
        assert!(blocks.insert(BlockId(4), time(8, 0), time(9, 30)).is_err());
    }

    #[test]
    fn adjacent_blocks_do_not_conflict() {
        let mut blocks = BlockSet::new();
        blocks.insert(BlockId(1), time(9, 0), time(10, 0)).unwrap();
        blocks.insert(BlockId(2), time(10, 0), time(11, 0)).unwrap();
        blocks.insert(BlockId(3), time(8, 0), time(9, 0)).unwrap();

        assert_eq!(blocks.len(), 3);
    }

    #[test]
    fn iter_is_ordered_by_start() {
        let mut blocks = BlockSet::new();
        blocks.insert(BlockId(1), time(14, 0), time(15, 0)).unwrap();
        blocks.insert(BlockId(2), time(8, 0), time(9, 0)).unwrap();

        let starts: Vec<NaiveTime> = blocks.iter().map(|b| b.start).collect();
        assert_eq!(starts, vec![time(8, 0), time(14, 0)]);
    }

    #[test]
    fn remove_then_reinsert_succeeds() {
        let mut blocks = BlockSet::new();
        let block = blocks.insert(BlockId(1), time(9, 0), time(10, 0)).unwrap();

        assert_eq!(blocks.remove(BlockId(1)), Some(block.clone()));
        assert!(blocks.remove(BlockId(1)).is_none());

        blocks.restore(block);
        assert!(blocks.insert(BlockId(2), time(9, 30), time(10, 30)).is_err());
    }

    #[test]
    fn free_slots_of_empty_set_is_whole_window() {
        let blocks = BlockSet::new();
        assert_eq!(
            blocks.free_slots_within(time(8, 0), time(20, 0)),
            vec![(time(8, 0), time(20, 0))]
        );
    }

    #[test]
    fn free_slots_subtract_blocks() {
        let mut blocks = BlockSet::new();
        blocks.insert(BlockId(1), time(9, 0), time(10, 0)).unwrap();
        blocks.insert(BlockId(2), time(12, 0), time(13, 30)).unwrap();

        assert_eq!(
            blocks.free_slots_within(time(8, 0), time(20, 0)),
            vec![
                (time(8, 0), time(9, 0)),
                (time(10, 0), time(12, 0)),
                (time(13, 30), time(20, 0)),
            ]
        );
    }

    #[test]
    fn free_slots_clip_blocks_straddling_the_window() {
        let mut blocks = BlockSet::new();
        blocks.insert(BlockId(1), time(7, 0), time(9, 0)).unwrap();
        blocks.insert(BlockId(2), time(19, 0), time(21, 0)).unwrap();

        assert_eq!(
            blocks.free_slots_within(time(8, 0), time(20, 0)),
            vec![(time(9, 0), time(19, 0))]
        );
    }

    #[test]
    fn fully_blocked_window_has_no_free_slots() {
        let mut blocks = BlockSet::new();
        blocks.insert(BlockId(1), time(7, 0), time(21, 0)).unwrap();

        assert!(blocks.free_slots_within(time(8, 0), time(20, 0)).is_empty());
    }

    #[test]
    fn block_label_formats_hours_and_minutes() {
        let block = TimeBlock {
            id: BlockId(1),
            start: time(9, 5),
            end: time(10, 30),
        };
        assert_eq!(block.label(), "09:05-10:30");
    }
}
