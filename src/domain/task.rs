//! Task domain model
//!
//! A task is an open unit of study work. It lives in the priority queue from
//! creation until completion; completing it produces a log entry and removes
//! it from the queue. All fields that participate in queue ordering are
//! immutable after creation.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::id::TaskId;

/// Valid range for a task's priority score (higher = more urgent)
pub const PRIORITY_RANGE: std::ops::RangeInclusive<i64> = 1..=100;

/// A study task
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    /// Unique identifier, assigned at creation
    pub id: TaskId,

    /// Human-readable title
    pub title: String,

    /// Subject this task belongs to
    pub subject: String,

    /// Priority score in [1, 100]
    pub priority_score: u8,

    /// Date the task is due
    pub deadline: NaiveDate,

    /// Whether the task has been completed (always false while queued)
    pub completed: bool,

    /// True for auto-scheduled review follow-ups
    pub review: bool,

    /// Monotonic creation sequence, the final ordering tie-break
    #[serde(rename = "createdAt")]
    pub created_seq: u64,
}

impl Task {
    /// Returns the title a review follow-up of this task should carry.
    ///
    /// Completing a review task schedules another review with the same
    /// title rather than stacking `Review:` prefixes.
    pub fn review_title(&self) -> String {
        if self.review {
            self.title.clone()
        } else {
            format!("Review: {}", self.title)
        }
    }

    /// Returns a snapshot of this task marked completed
    pub fn completed_snapshot(&self) -> Task {
        Task {
            completed: true,
            ..self.clone()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_task(title: &str, review: bool) -> Task {
        Task {
            id: TaskId(1),
            title: title.to_string(),
            subject: "Math".to_string(),
            priority_score: 50,
            deadline: NaiveDate::from_ymd_opt(2026, 9, 1).unwrap(),
            completed: false,
            review,
            created_seq: 1,
        }
    }

    #[test]
    fn review_title_prefixes_once() {
        let task = make_task("Integrals", false);
        assert_eq!(task.review_title(), "Review: Integrals");

        let review = make_task("Review: Integrals", true);
        assert_eq!(review.review_title(), "Review: Integrals");
    }

    #[test]
    fn completed_snapshot_preserves_fields() {
        let task = make_task("Integrals", false);
        let snapshot = task.completed_snapshot();

        assert!(snapshot.completed);
        assert_eq!(snapshot.id, task.id);
        assert_eq!(snapshot.title, task.title);
        assert_eq!(snapshot.priority_score, task.priority_score);
        assert_eq!(snapshot.deadline, task.deadline);
    }

    #[test]
    fn serializes_with_camel_case_wire_names() {
        let task = make_task("Integrals", false);
        let json = serde_json::to_value(&task).unwrap();

        assert_eq!(json["id"], 1);
        assert_eq!(json["priorityScore"], 50);
        assert_eq!(json["deadline"], "2026-09-01");
        assert_eq!(json["createdAt"], 1);
        assert_eq!(json["completed"], false);
    }

    #[test]
    fn serde_roundtrip() {
        let task = make_task("Integrals", false);
        let json = serde_json::to_string(&task).unwrap();
        let parsed: Task = serde_json::from_str(&json).unwrap();
        assert_eq!(task, parsed);
    }
}
