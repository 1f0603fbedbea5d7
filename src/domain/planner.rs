//! Weekly plan projection
//!
//! Composes a snapshot of the open task queue with the free slots left by the
//! unavailable blocks into a 7-day assignment. The plan is derived output for
//! display: it mutates nothing, is never stored, and is therefore not
//! undoable. A plan generated after a task completes can never contain that
//! task, because it only ever sees the snapshot taken at call time.

use chrono::{Duration, NaiveTime};
use serde::Serialize;

use super::blocks::BlockSet;
use super::id::TaskId;
use super::task::Task;

/// Scheduling parameters for the weekly planner
#[derive(Debug, Clone)]
pub struct PlannerParams {
    /// Start of the schedulable day window
    pub day_start: NaiveTime,
    /// End of the schedulable day window
    pub day_end: NaiveTime,
    /// Length of one study session in minutes
    pub session_minutes: u32,
    /// Maximum sessions assigned per day
    pub slots_per_day: u32,
}

/// One task placed into a concrete slot
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SlotAssignment {
    /// Slot label, `HH:MM-HH:MM`
    pub slot: String,
    pub task_id: TaskId,
    pub title: String,
    pub subject: String,
}

/// Seven ordered day assignments, Monday first
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct WeeklyPlan {
    pub monday: Vec<SlotAssignment>,
    pub tuesday: Vec<SlotAssignment>,
    pub wednesday: Vec<SlotAssignment>,
    pub thursday: Vec<SlotAssignment>,
    pub friday: Vec<SlotAssignment>,
    pub saturday: Vec<SlotAssignment>,
    pub sunday: Vec<SlotAssignment>,
}

impl WeeklyPlan {
    /// Day assignments in week order, for iteration in tests and reports
    pub fn days(&self) -> [(&'static str, &Vec<SlotAssignment>); 7] {
        [
            ("Monday", &self.monday),
            ("Tuesday", &self.tuesday),
            ("Wednesday", &self.wednesday),
            ("Thursday", &self.thursday),
            ("Friday", &self.friday),
            ("Saturday", &self.saturday),
            ("Sunday", &self.sunday),
        ]
    }

    /// Total number of assignments across the week
    pub fn assignment_count(&self) -> usize {
        self.days().iter().map(|(_, slots)| slots.len()).sum()
    }
}

/// Carves a day's free intervals into fixed-length sessions, earliest first
fn daily_slots(blocks: &BlockSet, params: &PlannerParams) -> Vec<(NaiveTime, NaiveTime)> {
    let session = Duration::minutes(i64::from(params.session_minutes));
    let mut slots = Vec::new();

    for (free_start, free_end) in blocks.free_slots_within(params.day_start, params.day_end) {
        let mut cursor = free_start;
        loop {
            let (slot_end, wrapped) = cursor.overflowing_add_signed(session);
            if wrapped != 0 || slot_end > free_end {
                break;
            }
            slots.push((cursor, slot_end));
            cursor = slot_end;
        }
    }

    slots
}

/// Generates the weekly plan from a priority-ordered snapshot of open tasks.
///
/// Blocks recur daily, so every day offers the same slots; tasks are consumed
/// in queue order and each is assigned at most once per pass. Days after the
/// snapshot runs out stay empty.
pub fn generate_weekly_plan(snapshot: &[Task], blocks: &BlockSet, params: &PlannerParams) -> WeeklyPlan {
    let slots = daily_slots(blocks, params);
    let per_day = slots.len().min(params.slots_per_day as usize);

    let mut tasks = snapshot.iter();
    let mut days: [Vec<SlotAssignment>; 7] = Default::default();

    'week: for day in days.iter_mut() {
        for (slot_start, slot_end) in slots.iter().take(per_day) {
            let Some(task) = tasks.next() else {
                break 'week;
            };
            day.push(SlotAssignment {
                slot: format!(
                    "{}-{}",
                    slot_start.format("%H:%M"),
                    slot_end.format("%H:%M")
                ),
                task_id: task.id,
                title: task.title.clone(),
                subject: task.subject.clone(),
            });
        }
    }

    let [monday, tuesday, wednesday, thursday, friday, saturday, sunday] = days;
    WeeklyPlan {
        monday,
        tuesday,
        wednesday,
        thursday,
        friday,
        saturday,
        sunday,
    }
}
