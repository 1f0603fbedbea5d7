//! The study-planning engine
//!
//! Owns the five stateful components (task queue, dependency graph, block
//! set, time log, command history) and dispatches every operation against
//! them. Each mutating operation validates its input before touching any
//! state, applies the full effect, and records one reversible command; a
//! rejected operation leaves every structure unchanged.
//!
//! The engine itself is synchronous and single-threaded; the API layer wraps
//! it in a reader-writer lock so each request observes a consistent snapshot.

use std::collections::BTreeSet;

use chrono::{Duration, NaiveDate, NaiveTime, Utc};
use thiserror::Error;
use tracing::debug;

use crate::config::{Config, PlannerConfig, ReviewConfig};
use crate::domain::{
    generate_weekly_plan, BlockError, BlockId, BlockSet, Command, CommandHistory, EntryId,
    GraphError, LogEntry, SubjectGraph, Task, TaskId, TaskQueue, TimeBlock, TimeLog, WeeklyPlan,
    PRIORITY_RANGE,
};

/// Engine-level error taxonomy, mapped to the wire by the API layer
#[derive(Debug, Error, PartialEq)]
pub enum EngineError {
    /// Malformed or out-of-range input; nothing was mutated
    #[error("{0}")]
    Validation(String),

    /// The operation collides with existing state (time block overlap)
    #[error("{0}")]
    Conflict(String),

    /// A dependency edge would create a cycle
    #[error(transparent)]
    Cycle(#[from] GraphError),

    /// The operation targets a resource that does not exist
    #[error("{0}")]
    NotFound(String),

    /// Undo or redo with nothing to act on; benign
    #[error("{0}")]
    EmptyHistory(&'static str),
}

impl From<BlockError> for EngineError {
    fn from(err: BlockError) -> Self {
        match err {
            BlockError::InvalidRange { .. } => EngineError::Validation(err.to_string()),
            BlockError::Overlap { .. } => EngineError::Conflict(err.to_string()),
        }
    }
}

/// The service-side engine behind the REST contract
#[derive(Debug)]
pub struct Engine {
    planner: PlannerConfig,
    review: ReviewConfig,

    queue: TaskQueue,
    graph: SubjectGraph,
    blocks: BlockSet,
    timelog: TimeLog,
    history: CommandHistory,

    /// Every subject ever referenced by a task, edge, or log entry
    subjects: BTreeSet<String>,

    next_task_id: u64,
    next_block_id: u64,
    next_entry_id: u64,
    next_seq: u64,
}

impl Engine {
    /// Creates an empty engine with the given configuration
    pub fn new(config: Config) -> Self {
        Self {
            planner: config.planner,
            review: config.review,
            queue: TaskQueue::new(),
            graph: SubjectGraph::new(),
            blocks: BlockSet::new(),
            timelog: TimeLog::new(),
            history: CommandHistory::new(),
            subjects: BTreeSet::new(),
            next_task_id: 1,
            next_block_id: 1,
            next_entry_id: 1,
            next_seq: 1,
        }
    }

    fn next_task_id(&mut self) -> TaskId {
        let id = TaskId(self.next_task_id);
        self.next_task_id += 1;
        id
    }

    fn next_seq(&mut self) -> u64 {
        let seq = self.next_seq;
        self.next_seq += 1;
        seq
    }

    fn next_entry_id(&mut self) -> EntryId {
        let id = EntryId(self.next_entry_id);
        self.next_entry_id += 1;
        id
    }

    // --- Task queue ---

    /// Validates and queues a new task, returning the stored value
    pub fn add_task(
        &mut self,
        title: &str,
        subject: &str,
        priority_score: i64,
        deadline: NaiveDate,
    ) -> Result<Task, EngineError> {
        if !PRIORITY_RANGE.contains(&priority_score) {
            return Err(EngineError::Validation(format!(
                "priorityScore must be in [1, 100], got {}",
                priority_score
            )));
        }

        let task = Task {
            id: self.next_task_id(),
            title: title.to_string(),
            subject: subject.to_string(),
            priority_score: priority_score as u8,
            deadline,
            completed: false,
            review: false,
            created_seq: self.next_seq(),
        };

        self.queue.insert(task.clone());
        self.subjects.insert(task.subject.clone());
        self.history.record(Command::AddTask { task: task.clone() });
        debug!(id = %task.id, title = %task.title, "task queued");
        Ok(task)
    }

    /// Returns the highest-priority open task, if any
    pub fn top_task(&self) -> Option<Task> {
        self.queue.peek_top().cloned()
    }

    /// Returns every open task in queue order
    pub fn tasks(&self) -> Vec<Task> {
        self.queue.snapshot()
    }

    /// Completes the top task: removes it from the queue, logs the session,
    /// schedules a review follow-up, and returns the completed snapshot.
    pub fn complete_top(&mut self, duration_hours: f64, notes: &str) -> Result<Task, EngineError> {
        if !(duration_hours > 0.0) {
            return Err(EngineError::Validation(format!(
                "durationHours must be positive, got {}",
                duration_hours
            )));
        }
        let Some(task) = self.queue.pop_top() else {
            return Err(EngineError::NotFound("The task queue is empty".to_string()));
        };

        let entry = LogEntry {
            id: self.next_entry_id(),
            subject: task.subject.clone(),
            duration_hours,
            notes: if notes.trim().is_empty() {
                task.title.clone()
            } else {
                format!("{}: {}", task.title, notes)
            },
            timestamp: Utc::now(),
        };
        self.timelog.append(entry.clone());

        let review = Task {
            id: self.next_task_id(),
            title: task.review_title(),
            subject: task.subject.clone(),
            priority_score: self.review.priority,
            deadline: Utc::now().date_naive() + Duration::days(self.review.interval_days),
            completed: false,
            review: true,
            created_seq: self.next_seq(),
        };
        self.queue.insert(review.clone());

        let snapshot = task.completed_snapshot();
        self.history.record(Command::CompleteTask {
            task,
            entry,
            review,
        });
        debug!(id = %snapshot.id, "task completed");
        Ok(snapshot)
    }

    // --- Dependency graph ---

    /// Adds a prerequisite edge between two subjects.
    ///
    /// Returns whether the edge was newly inserted; re-adding an existing
    /// edge is a no-op that records no command.
    pub fn add_dependency(
        &mut self,
        prerequisite: &str,
        dependent: &str,
    ) -> Result<bool, EngineError> {
        let prerequisite = prerequisite.trim();
        let dependent = dependent.trim();
        if prerequisite.is_empty() || dependent.is_empty() {
            return Err(EngineError::Validation(
                "prerequisite and dependent must not be empty".to_string(),
            ));
        }

        let added = self.graph.add_dependency(prerequisite, dependent)?;
        if added {
            self.subjects.insert(prerequisite.to_string());
            self.subjects.insert(dependent.to_string());
            self.history.record(Command::AddDependency {
                prerequisite: prerequisite.to_string(),
                dependent: dependent.to_string(),
            });
            debug!(prerequisite, dependent, "dependency added");
        }
        Ok(added)
    }

    /// Topological study path over all subjects that participate in an edge
    pub fn study_path(&self) -> Result<Vec<String>, EngineError> {
        Ok(self.graph.study_path()?)
    }

    /// Every subject ever referenced, sorted by name
    pub fn subjects(&self) -> Vec<String> {
        self.subjects.iter().cloned().collect()
    }

    // --- Time log ---

    /// Validates and appends a manual study session
    pub fn log_session(
        &mut self,
        subject: &str,
        duration_hours: f64,
        notes: &str,
    ) -> Result<LogEntry, EngineError> {
        let subject = subject.trim();
        if subject.is_empty() {
            return Err(EngineError::Validation(
                "subject must not be empty".to_string(),
            ));
        }
        if !(duration_hours > 0.0) {
            return Err(EngineError::Validation(format!(
                "durationHours must be positive, got {}",
                duration_hours
            )));
        }

        let entry = LogEntry {
            id: self.next_entry_id(),
            subject: subject.to_string(),
            duration_hours,
            notes: notes.to_string(),
            timestamp: Utc::now(),
        };
        self.timelog.append(entry.clone());
        self.subjects.insert(subject.to_string());
        self.history.record(Command::LogSession {
            entry: entry.clone(),
        });
        debug!(subject, duration_hours, "session logged");
        Ok(entry)
    }

    /// Subject -> total hours, across manual logs and completions
    pub fn summary(&self) -> std::collections::BTreeMap<String, f64> {
        self.timelog.summary().clone()
    }

    /// Every log entry in insertion order
    pub fn log_entries(&self) -> Vec<LogEntry> {
        self.timelog.iter().cloned().collect()
    }

    // --- Time blocks ---

    /// Validates and stores an unavailable daily time block
    pub fn add_block(&mut self, start: NaiveTime, end: NaiveTime) -> Result<TimeBlock, EngineError> {
        let id = BlockId(self.next_block_id);
        let block = self.blocks.insert(id, start, end)?;
        self.next_block_id += 1;
        self.history.record(Command::AddBlock {
            block: block.clone(),
        });
        debug!(block = %block.label(), "time block added");
        Ok(block)
    }

    /// Every accepted block, ordered by start time
    pub fn blocks(&self) -> Vec<TimeBlock> {
        self.blocks.iter().cloned().collect()
    }

    // --- Weekly plan ---

    /// Projects the current queue and blocks into a 7-day plan.
    ///
    /// Works on a snapshot and mutates nothing; the plan is not undoable.
    pub fn weekly_plan(&self, slots_per_day: Option<u32>) -> Result<WeeklyPlan, EngineError> {
        if slots_per_day == Some(0) {
            return Err(EngineError::Validation(
                "slotsPerDay must be positive".to_string(),
            ));
        }
        let snapshot = self.queue.snapshot();
        let params = self.planner.params(slots_per_day);
        Ok(generate_weekly_plan(&snapshot, &self.blocks, &params))
    }

    // --- Undo / redo ---

    /// Reverts the most recent mutating operation
    pub fn undo(&mut self) -> Result<String, EngineError> {
        let command = self
            .history
            .pop_for_undo()
            .ok_or(EngineError::EmptyHistory("Nothing to undo."))?;

        match &command {
            Command::AddTask { task } => {
                self.queue.remove(task.id);
            }
            Command::CompleteTask {
                task,
                entry,
                review,
            } => {
                self.timelog.remove(entry.id);
                self.queue.remove(review.id);
                self.queue.insert(task.clone());
            }
            Command::AddDependency {
                prerequisite,
                dependent,
            } => {
                self.graph.remove_dependency(prerequisite, dependent);
            }
            Command::AddBlock { block } => {
                self.blocks.remove(block.id);
            }
            Command::LogSession { entry } => {
                self.timelog.remove(entry.id);
            }
        }

        let message = format!("Undid: {}", command.describe());
        debug!(%message, "undo applied");
        self.history.finish_undo(command);
        Ok(message)
    }

    /// Re-applies the most recently undone operation
    pub fn redo(&mut self) -> Result<String, EngineError> {
        let command = self
            .history
            .pop_for_redo()
            .ok_or(EngineError::EmptyHistory("Nothing to redo."))?;

        match &command {
            Command::AddTask { task } => {
                self.queue.insert(task.clone());
            }
            Command::CompleteTask {
                task,
                entry,
                review,
            } => {
                self.queue.remove(task.id);
                self.timelog.append(entry.clone());
                self.queue.insert(review.clone());
            }
            Command::AddDependency {
                prerequisite,
                dependent,
            } => {
                self.graph.restore_dependency(prerequisite, dependent);
            }
            Command::AddBlock { block } => {
                self.blocks.restore(block.clone());
            }
            Command::LogSession { entry } => {
                self.timelog.append(entry.clone());
            }
        }

        let message = format!("Redid: {}", command.describe());
        debug!(%message, "redo applied");
        self.history.finish_redo(command);
        Ok(message)
    }

    /// Number of operations available to undo
    pub fn undo_depth(&self) -> usize {
        self.history.undo_depth()
    }

    /// Number of operations available to redo
    pub fn redo_depth(&self) -> usize {
        self.history.redo_depth()
    }
}
