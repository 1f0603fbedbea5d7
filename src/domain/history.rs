//! Undo/redo command history
//!
//! Every mutating engine operation is captured as a [`Command`] carrying the
//! exact state its inverse needs: completing a task, for example, must restore
//! the original priority and deadline and delete the generated log entry, not
//! merely re-insert a blank task. The history itself is two stacks; applying
//! inverses against the live components is the engine's job.

use super::blocks::TimeBlock;
use super::task::Task;
use super::timelog::LogEntry;

/// One reversible mutating operation
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    /// A task was created and queued
    AddTask { task: Task },

    /// The top task was completed: removed from the queue, logged, and a
    /// review follow-up was scheduled
    CompleteTask {
        task: Task,
        entry: LogEntry,
        review: Task,
    },

    /// An edge was inserted into the dependency graph
    AddDependency {
        prerequisite: String,
        dependent: String,
    },

    /// An unavailable time block was accepted
    AddBlock { block: TimeBlock },

    /// A study session was logged manually
    LogSession { entry: LogEntry },
}

impl Command {
    /// Short human-readable description, used in undo/redo responses
    pub fn describe(&self) -> String {
        match self {
            Command::AddTask { task } => format!("added task \"{}\"", task.title),
            Command::CompleteTask { task, .. } => {
                format!("completed task \"{}\"", task.title)
            }
            Command::AddDependency {
                prerequisite,
                dependent,
            } => format!("added dependency {} -> {}", prerequisite, dependent),
            Command::AddBlock { block } => format!("added time block {}", block.label()),
            Command::LogSession { entry } => {
                format!("logged {:.2}h for {}", entry.duration_hours, entry.subject)
            }
        }
    }
}

/// Two-stack undo/redo history.
///
/// The top of `undo` is the most recent command. Recording a new command
/// clears `redo`: a fresh mutation invalidates any previously undone future.
#[derive(Debug, Default)]
pub struct CommandHistory {
    undo: Vec<Command>,
    redo: Vec<Command>,
}

impl CommandHistory {
    /// Creates an empty history
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a freshly applied command
    pub fn record(&mut self, command: Command) {
        self.undo.push(command);
        self.redo.clear();
    }

    /// Pops the most recent command for undoing
    pub fn pop_for_undo(&mut self) -> Option<Command> {
        self.undo.pop()
    }

    /// Parks an undone command so it can be redone
    pub fn finish_undo(&mut self, command: Command) {
        self.redo.push(command);
    }

    /// Pops the most recently undone command for redoing
    pub fn pop_for_redo(&mut self) -> Option<Command> {
        self.redo.pop()
    }

    /// Returns a redone command to the undo stack
    pub fn finish_redo(&mut self, command: Command) {
        self.undo.push(command);
    }

    /// Number of commands available to undo
    pub fn undo_depth(&self) -> usize {
        self.undo.len()
    }

    /// Number of commands available to redo
    pub fn redo_depth(&self) -> usize {
        self.redo.len()
    }
}
