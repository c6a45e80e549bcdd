//! Per-bucket rules, compiled once per context.
//!
//! This table is the single source of truth for "which bucket does this
//! task belong to". Each rule is a predicate composed from the primitives
//! in [`super::predicates`] and closed over one context snapshot; rules
//! must be recompiled whenever the context changes (a minute tick crossing
//! noon, a day rollover, a schedule edit) and are otherwise reusable across
//! any number of tasks.

use crate::context::EvaluationContext;
use crate::task::{Container, Task};

use super::predicates::{
    all_of, any_of, has_no_due_date, has_subject_in, is_completed, is_due_future, is_due_today,
    is_due_tomorrow, is_exam, is_not_completed, is_overdue, is_stale, negate, pred, Predicate,
};

/// The five bucket rules for one evaluation context.
pub struct ContainerRules {
    archive: Predicate,
    exam: Predicate,
    current: Predicate,
    tomorrow: Predicate,
    future: Predicate,
}

impl ContainerRules {
    /// Compile the bucket rules against a context snapshot.
    ///
    /// The compiled rules read parts of the context at evaluation time, so
    /// they must be applied with the same context they were compiled from.
    /// [`crate::board::Categorizer`] owns both and keeps them paired.
    pub fn compile(ctx: &EvaluationContext) -> Self {
        Self {
            archive: archive_rule(),
            exam: exam_rule(),
            current: current_rule(ctx),
            tomorrow: tomorrow_rule(ctx),
            future: future_rule(ctx),
        }
    }

    /// Assign a task to exactly one bucket.
    ///
    /// Rules are checked in a fixed priority order: Archive short-circuits
    /// everything, then Exam, then Today, then Tomorrow. Future takes
    /// whatever is left, so every task lands in exactly one bucket.
    pub fn classify(&self, task: &Task, ctx: &EvaluationContext) -> Container {
        if (self.archive)(task, ctx) {
            Container::Archive
        } else if (self.exam)(task, ctx) {
            Container::Exam
        } else if (self.current)(task, ctx) {
            Container::Today
        } else if (self.tomorrow)(task, ctx) {
            Container::Tomorrow
        } else {
            Container::Future
        }
    }

    /// Evaluate one bucket's rule in isolation, ignoring priority order.
    ///
    /// A task can match several rules here; [`classify`](Self::classify)
    /// is what resolves the overlap.
    pub fn matches(&self, container: Container, task: &Task, ctx: &EvaluationContext) -> bool {
        let rule = match container {
            Container::Archive => &self.archive,
            Container::Exam => &self.exam,
            Container::Today => &self.current,
            Container::Tomorrow => &self.tomorrow,
            Container::Future => &self.future,
        };
        rule(task, ctx)
    }
}

/// Completion always archives. Overdue and stale tasks archive too, even
/// when incomplete.
fn archive_rule() -> Predicate {
    any_of(vec![
        pred(is_completed),
        all_of(vec![pred(is_overdue), pred(is_not_completed)]),
        all_of(vec![pred(is_stale), pred(is_not_completed)]),
    ])
}

/// Upcoming exams stay on their own list until their date passes.
fn exam_rule() -> Predicate {
    all_of(vec![
        pred(is_exam),
        pred(is_not_completed),
        negate(pred(is_overdue)),
    ])
}

/// In the morning: today's deadlines and today's class work. From noon the
/// same shape shifts one day out and reads "prepare for tomorrow".
fn current_rule(ctx: &EvaluationContext) -> Predicate {
    if ctx.time_of_day.is_morning() {
        any_of(vec![
            all_of(vec![pred(is_due_today), pred(is_not_completed)]),
            all_of(vec![
                has_subject_in(ctx.today_subjects.clone()),
                pred(is_not_completed),
                negate(pred(is_overdue)),
                negate(pred(is_exam)),
            ]),
        ])
    } else {
        any_of(vec![
            all_of(vec![pred(is_due_tomorrow), pred(is_not_completed)]),
            all_of(vec![
                has_subject_in(ctx.tomorrow_subjects.clone()),
                pred(is_not_completed),
                negate(pred(is_overdue)),
                negate(pred(is_exam)),
            ]),
        ])
    }
}

/// Morning preview of tomorrow's deadlines and class work. After noon the
/// Today rule claims the same tasks first, so this bucket drains.
fn tomorrow_rule(ctx: &EvaluationContext) -> Predicate {
    any_of(vec![
        all_of(vec![pred(is_due_tomorrow), pred(is_not_completed)]),
        all_of(vec![
            has_subject_in(ctx.tomorrow_subjects.clone()),
            pred(is_not_completed),
            negate(pred(is_overdue)),
            negate(pred(is_exam)),
        ]),
    ])
}

/// Work that is not current yet: due the day after tomorrow or later, or
/// undated non-exam backlog.
fn future_rule(ctx: &EvaluationContext) -> Predicate {
    all_of(vec![
        pred(is_not_completed),
        negate(current_rule(ctx)),
        any_of(vec![
            pred(is_due_future),
            all_of(vec![pred(has_no_due_date), negate(pred(is_exam))]),
        ]),
    ])
}
