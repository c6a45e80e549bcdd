//! Per-bucket ordering, applied after partitioning.

use std::cmp::Ordering;

use chrono::NaiveDate;

use crate::task::{Container, Task};

/// Compare two tasks under a bucket's sort policy.
///
/// Archive reads newest first by completion date, falling back to the due
/// date and then to the earliest representable date. Future and Exam read
/// soonest due first, with undated tasks pushed to the end by a far-future
/// sentinel. Today and Tomorrow read oldest created first.
pub fn compare_in(container: Container, a: &Task, b: &Task) -> Ordering {
    match container {
        Container::Archive => done_date(b).cmp(&done_date(a)),
        Container::Future | Container::Exam => due_or_max(a).cmp(&due_or_max(b)),
        Container::Today | Container::Tomorrow => a.date_added.cmp(&b.date_added),
    }
}

/// Order a bucket's tasks in place. The sort is stable, so tasks with
/// equal keys keep their input order.
pub fn sort_container(container: Container, tasks: &mut [Task]) {
    tasks.sort_by(|a, b| compare_in(container, a, b));
}

fn done_date(task: &Task) -> NaiveDate {
    task.completed_date
        .or(task.due_date)
        .unwrap_or(NaiveDate::MIN)
}

fn due_or_max(task: &Task) -> NaiveDate {
    task.due_date.unwrap_or(NaiveDate::MAX)
}
