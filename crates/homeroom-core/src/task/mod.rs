//! Task types for the assignment tracker.
//!
//! A [`Task`] is the canonical, validated model the categorization engine
//! operates on. Foreign records in looser shapes come in through
//! [`record::TaskRecord`] and are repaired or skipped before they get here.

pub mod record;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::schedule::normalize_subject;

/// What kind of item a task is.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum TaskKind {
    /// Homework for a scheduled subject.
    Homework,
    /// Household or personal chore.
    Chore,
    /// Exam or test entry, kept on its own list until its date passes.
    Exam,
    /// Generic to-do item.
    Task,
}

impl TaskKind {
    /// Lowercase name, matching the serialized form.
    pub fn name(&self) -> &'static str {
        match self {
            TaskKind::Homework => "homework",
            TaskKind::Chore => "chore",
            TaskKind::Exam => "exam",
            TaskKind::Task => "task",
        }
    }
}

impl Default for TaskKind {
    fn default() -> Self {
        TaskKind::Task
    }
}

impl fmt::Display for TaskKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Display bucket a task is assigned to by one categorization pass.
///
/// The label is recomputed on every pass and never stored on the task.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Container {
    Today,
    Tomorrow,
    Future,
    Archive,
    Exam,
}

impl Container {
    /// All buckets, in display order.
    pub const ALL: [Container; 5] = [
        Container::Today,
        Container::Tomorrow,
        Container::Future,
        Container::Archive,
        Container::Exam,
    ];

    /// Lowercase name, matching the partition keys.
    pub fn name(&self) -> &'static str {
        match self {
            Container::Today => "today",
            Container::Tomorrow => "tomorrow",
            Container::Future => "future",
            Container::Archive => "archive",
            Container::Exam => "exam",
        }
    }
}

impl fmt::Display for Container {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A tracked assignment.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Task {
    /// Unique identifier
    pub id: String,
    /// What needs doing
    pub description: String,
    /// Subject the task belongs to, lowercase; None for chores and ad-hoc items
    pub subject: Option<String>,
    /// Kind of item
    #[serde(rename = "type")]
    pub kind: TaskKind,
    /// Day the task entered the tracker
    pub date_added: NaiveDate,
    /// Day the work is due, if known
    pub due_date: Option<NaiveDate>,
    /// Whether the task is done
    pub completed: bool,
    /// Day the task was completed; set exactly when `completed` is true
    pub completed_date: Option<NaiveDate>,
}

impl Task {
    /// Create a new incomplete task with a generated id.
    pub fn new(description: impl Into<String>, date_added: NaiveDate) -> Self {
        Task {
            id: format!("task-{}", uuid::Uuid::new_v4()),
            description: description.into(),
            subject: None,
            kind: TaskKind::Task,
            date_added,
            due_date: None,
            completed: false,
            completed_date: None,
        }
    }

    /// Attach a subject, normalized to lowercase.
    pub fn with_subject(mut self, subject: &str) -> Self {
        let subject = normalize_subject(subject);
        self.subject = (!subject.is_empty()).then_some(subject);
        self
    }

    /// Set the due date.
    pub fn with_due_date(mut self, due: NaiveDate) -> Self {
        self.due_date = Some(due);
        self
    }

    /// Set the kind.
    pub fn with_kind(mut self, kind: TaskKind) -> Self {
        self.kind = kind;
        self
    }

    /// Mark the task completed as of the given day.
    pub fn mark_completed(&mut self, on: NaiveDate) {
        self.completed = true;
        self.completed_date = Some(on);
    }

    /// Reopen a completed task, clearing the completion date.
    pub fn reopen(&mut self) {
        self.completed = false;
        self.completed_date = None;
    }

    /// Whole days since the task was added. Negative if `date_added` is in
    /// the future relative to `today`.
    pub fn age_days(&self, today: NaiveDate) -> i64 {
        (today - self.date_added).num_days()
    }
}
