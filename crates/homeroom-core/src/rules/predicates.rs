//! Predicate library for bucket rules.
//!
//! A predicate is a pure boolean function of one task plus the evaluation
//! context. Primitives never mutate their inputs and tolerate missing
//! fields by returning false (or the documented fallback, as with
//! [`has_no_due_date`]) rather than failing. Three combinators compose
//! primitives into the per-bucket rules.

use std::collections::HashSet;

use chrono::Duration;

use crate::context::EvaluationContext;
use crate::task::{Task, TaskKind};

/// A composed, reusable predicate over (task, context).
pub type Predicate = Box<dyn Fn(&Task, &EvaluationContext) -> bool + Send + Sync>;

/// Lift a plain predicate function into a boxed [`Predicate`].
pub fn pred(f: fn(&Task, &EvaluationContext) -> bool) -> Predicate {
    Box::new(f)
}

/// Due exactly on the snapshot day.
pub fn is_due_today(task: &Task, ctx: &EvaluationContext) -> bool {
    task.due_date == Some(ctx.today())
}

/// Due exactly on the day after the snapshot day.
pub fn is_due_tomorrow(task: &Task, ctx: &EvaluationContext) -> bool {
    task.due_date == Some(ctx.tomorrow())
}

/// Due strictly before the snapshot day.
pub fn is_overdue(task: &Task, ctx: &EvaluationContext) -> bool {
    match task.due_date {
        Some(due) => due < ctx.today(),
        None => false,
    }
}

/// Due on the day after tomorrow or later.
pub fn is_due_future(task: &Task, ctx: &EvaluationContext) -> bool {
    match task.due_date {
        Some(due) => due >= ctx.today() + Duration::days(2),
        None => false,
    }
}

/// Has no due date at all.
pub fn has_no_due_date(task: &Task, _ctx: &EvaluationContext) -> bool {
    task.due_date.is_none()
}

/// Marked completed.
pub fn is_completed(task: &Task, _ctx: &EvaluationContext) -> bool {
    task.completed
}

/// Not marked completed.
pub fn is_not_completed(task: &Task, _ctx: &EvaluationContext) -> bool {
    !task.completed
}

/// Is an exam entry.
pub fn is_exam(task: &Task, _ctx: &EvaluationContext) -> bool {
    task.kind == TaskKind::Exam
}

/// Added more than the archive threshold ago. A task exactly at the
/// threshold is not yet stale.
pub fn is_stale(task: &Task, ctx: &EvaluationContext) -> bool {
    task.age_days(ctx.today()) > ctx.archive_threshold_days
}

/// Subject has class on the snapshot day or the day after.
pub fn occurs_today_or_tomorrow(task: &Task, ctx: &EvaluationContext) -> bool {
    subject_matches(task, &ctx.today_subjects) || subject_matches(task, &ctx.tomorrow_subjects)
}

/// Predicate matching tasks whose subject is in the given set.
///
/// Matching is case-insensitive; tasks without a subject never match.
pub fn has_subject_in(subjects: HashSet<String>) -> Predicate {
    Box::new(move |task, _ctx| subject_matches(task, &subjects))
}

/// Logical AND over predicates. Vacuously true for an empty list.
pub fn all_of(predicates: Vec<Predicate>) -> Predicate {
    Box::new(move |task, ctx| predicates.iter().all(|p| p(task, ctx)))
}

/// Logical OR over predicates. Vacuously false for an empty list.
pub fn any_of(predicates: Vec<Predicate>) -> Predicate {
    Box::new(move |task, ctx| predicates.iter().any(|p| p(task, ctx)))
}

/// Logical NOT of a predicate.
pub fn negate(predicate: Predicate) -> Predicate {
    Box::new(move |task, ctx| !predicate(task, ctx))
}

fn subject_matches(task: &Task, subjects: &HashSet<String>) -> bool {
    match task.subject.as_deref() {
        Some(name) => subjects.iter().any(|s| s.eq_ignore_ascii_case(name)),
        None => false,
    }
}
