//! Priority queue over open tasks
//!
//! Tasks are ordered by priority score descending, then earliest deadline,
//! then creation sequence (stable FIFO). The queue is a `BTreeMap` keyed by
//! that total order rather than a binary heap: undo needs O(log n) removal of
//! an arbitrary task by id, and the first map entry is the top task.

use std::cmp::Reverse;
use std::collections::{BTreeMap, HashMap};

use chrono::NaiveDate;

use super::id::TaskId;
use super::task::Task;

/// Total ordering key for queued tasks.
///
/// `BTreeMap` iterates ascending, so the highest score sorts first via
/// `Reverse`. Every component is immutable on the task, which keeps the key
/// derivable from the task itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
struct QueueKey {
    score: Reverse<u8>,
    deadline: NaiveDate,
    seq: u64,
}

impl QueueKey {
    fn of(task: &Task) -> Self {
        Self {
            score: Reverse(task.priority_score),
            deadline: task.deadline,
            seq: task.created_seq,
        }
    }
}

/// Priority-ordered store of open tasks
#[derive(Debug, Default)]
pub struct TaskQueue {
    by_key: BTreeMap<QueueKey, Task>,
    by_id: HashMap<TaskId, QueueKey>,
}

impl TaskQueue {
    /// Creates an empty queue
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a task. The caller is responsible for field validation;
    /// ids are unique so re-insertion of a queued id is a logic error.
    pub fn insert(&mut self, task: Task) {
        let key = QueueKey::of(&task);
        self.by_id.insert(task.id, key);
        self.by_key.insert(key, task);
    }

    /// Returns the highest-priority task without removing it
    pub fn peek_top(&self) -> Option<&Task> {
        self.by_key.values().next()
    }

    /// Removes and returns the highest-priority task
    pub fn pop_top(&mut self) -> Option<Task> {
        let key = *self.by_key.keys().next()?;
        let task = self.by_key.remove(&key)?;
        self.by_id.remove(&task.id);
        Some(task)
    }

    /// Removes a task by id, returning it if it was queued
    pub fn remove(&mut self, id: TaskId) -> Option<Task> {
        let key = self.by_id.remove(&id)?;
        self.by_key.remove(&key)
    }

    /// Returns true if a task with this id is queued
    pub fn contains(&self, id: TaskId) -> bool {
        self.by_id.contains_key(&id)
    }

    /// Returns the number of queued tasks
    pub fn len(&self) -> usize {
        self.by_key.len()
    }

    /// Returns true if no tasks are queued
    pub fn is_empty(&self) -> bool {
        self.by_key.is_empty()
    }

    /// Iterates over queued tasks in priority order
    pub fn iter(&self) -> impl Iterator<Item = &Task> {
        self.by_key.values()
    }

    /// Returns an owned, priority-ordered copy of the open tasks
    pub fn snapshot(&self) -> Vec<Task> {
        self.by_key.values().cloned().collect()
    }
}
