//! Integration tests for the categorization pipeline.
//!
//! These tests drive the public API end to end: raw JSON records in,
//! bucket partitions and annotations out, plus invariants that must hold
//! for any task list.

use std::collections::{BTreeSet, HashSet};

use chrono::{Duration, NaiveDate};
use proptest::prelude::*;

use homeroom_core::{
    Categorizer, Container, FixedClock, SubjectSchedule, Task, TaskKind, TaskRecord, Weekday,
};

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn days(list: &[Weekday]) -> BTreeSet<Weekday> {
    list.iter().copied().collect()
}

fn school_schedule() -> SubjectSchedule {
    let mut schedule = SubjectSchedule::new();
    schedule.set("math", days(&[Weekday::Monday, Weekday::Wednesday]));
    schedule.set("english", days(&[Weekday::Thursday]));
    schedule.set("art", days(&[Weekday::Friday]));
    schedule
}

/// Session on Wednesday 2024-03-13 at the given hour.
fn session_at(hour: u32) -> Categorizer {
    let clock = FixedClock(date(2024, 3, 13).and_hms_opt(hour, 0, 0).unwrap());
    Categorizer::snapshot(&clock, school_schedule(), 30)
}

fn named(id: &str, task: Task) -> Task {
    Task {
        id: id.to_string(),
        ..task
    }
}

#[test]
fn test_morning_session_buckets_a_school_day() {
    let mut finished = named(
        "finished",
        Task::new("lab writeup", date(2024, 3, 8)).with_subject("math"),
    );
    finished.mark_completed(date(2024, 3, 11));

    let roster = vec![
        named(
            "math-drill",
            Task::new("drill sheet", date(2024, 3, 11)).with_subject("MATH"),
        ),
        named(
            "essay-due",
            Task::new("history essay", date(2024, 3, 5)).with_due_date(date(2024, 3, 13)),
        ),
        named(
            "english-reading",
            Task::new("chapters 3-4", date(2024, 3, 11)).with_subject("english"),
        ),
        named(
            "quiz-prep",
            Task::new("study guide", date(2024, 3, 10)).with_due_date(date(2024, 3, 12)),
        ),
        finished,
        named(
            "final-exam",
            Task::new("unit test", date(2024, 3, 11))
                .with_kind(TaskKind::Exam)
                .with_due_date(date(2024, 3, 22)),
        ),
        named("backlog-chore", Task::new("clean desk", date(2024, 3, 11)).with_kind(TaskKind::Chore)),
        named("stale-task", Task::new("forgotten", date(2024, 1, 1))),
    ];

    let eval = session_at(10).evaluate(&roster);

    // Wednesday morning: math meets today, english meets tomorrow
    assert_eq!(eval.partition.today, ["essay-due", "math-drill"]);
    assert_eq!(eval.partition.tomorrow, ["english-reading"]);
    assert_eq!(eval.partition.future, ["backlog-chore"]);
    // archive ordered by resolution date, newest first; the dateless
    // stale task sinks to the bottom
    assert_eq!(eval.partition.archive, ["quiz-prep", "finished", "stale-task"]);
    assert_eq!(eval.partition.exam, ["final-exam"]);
    assert_eq!(eval.partition.len(), roster.len());

    let by_id = |id: &str| eval.tasks.iter().find(|t| t.task.id == id).unwrap();
    let math = by_id("math-drill").next_class.unwrap();
    assert_eq!(math.days_until, 0);
    assert_eq!(math.weekday, Weekday::Wednesday);
    let english = by_id("english-reading").next_class.unwrap();
    assert_eq!(english.days_until, 1);
    assert!(by_id("backlog-chore").next_class.is_none());
}

#[test]
fn test_afternoon_shifts_the_subject_window() {
    let tasks = vec![
        named(
            "math-hw",
            Task::new("problem set", date(2024, 3, 12)).with_subject("math"),
        ),
        named(
            "english-hw",
            Task::new("book report", date(2024, 3, 12)).with_subject("english"),
        ),
    ];

    // Morning: today's class work is current, tomorrow's waits
    let morning = session_at(9).evaluate(&tasks);
    assert_eq!(morning.partition.today, ["math-hw"]);
    assert_eq!(morning.partition.tomorrow, ["english-hw"]);

    // Afternoon: math class is over, tomorrow's english moves up
    let afternoon = session_at(15).evaluate(&tasks);
    assert_eq!(afternoon.partition.today, ["english-hw"]);
    assert!(afternoon.partition.tomorrow.is_empty());
    assert_eq!(afternoon.partition.future, ["math-hw"]);
}

#[test]
fn test_week_wraparound_annotation() {
    // Friday 2024-03-15; math next meets Monday
    let clock = FixedClock(date(2024, 3, 15).and_hms_opt(10, 0, 0).unwrap());
    let categorizer = Categorizer::snapshot(&clock, school_schedule(), 30);

    let tasks = vec![
        named(
            "math-hw",
            Task::new("problems", date(2024, 3, 14)).with_subject("math"),
        ),
        named(
            "art-hw",
            Task::new("sketch", date(2024, 3, 14)).with_subject("art"),
        ),
    ];
    let eval = categorizer.evaluate(&tasks);

    let by_id = |id: &str| eval.tasks.iter().find(|t| t.task.id == id).unwrap();

    let art = by_id("art-hw");
    assert_eq!(art.container, Container::Today);
    assert_eq!(art.next_class.unwrap().days_until, 0);

    let math = by_id("math-hw");
    assert_eq!(math.container, Container::Future);
    let next = math.next_class.unwrap();
    assert_eq!(next.weekday, Weekday::Monday);
    assert_eq!(next.days_until, 3);
}

#[test]
fn test_archive_age_boundary() {
    // Evaluated 2024-03-13 with a 30-day threshold: a task added
    // 2024-02-12 is exactly 30 days old and stays; one day older ages out
    let at_threshold = named("at-threshold", Task::new("t", date(2024, 2, 12)));
    let over = named("over", Task::new("t", date(2024, 2, 11)));

    let eval = session_at(10).evaluate(&[at_threshold, over]);
    assert_eq!(eval.partition.future, ["at-threshold"]);
    assert_eq!(eval.partition.archive, ["over"]);
}

#[test]
fn test_json_import_workflow() {
    let records: Vec<TaskRecord> = serde_json::from_str(
        r#"[
            {"id": "hw-1", "type": "homework", "subject": "Math", "description": "odd problems"},
            {"id": 42, "type": "chore", "description": "feed the fish"},
            {"type": "homework", "description": "lost id"},
            {"id": "hw-2", "type": "unknown-kind"},
            {"id": "exam-1", "type": "exam", "subject": "english", "due_date": "2024-03-21"},
            {"id": "done-1", "type": "task", "completed": true},
            {"id": "hw-3", "type": "homework", "due_date": " 2024-03-14 "}
        ]"#,
    )
    .unwrap();

    let eval = session_at(10).evaluate_records(records);

    assert_eq!(eval.partition.today, ["hw-1"]);
    assert_eq!(eval.partition.tomorrow, ["hw-3"]);
    assert_eq!(eval.partition.future, ["42"]);
    assert_eq!(eval.partition.archive, ["done-1"]);
    assert_eq!(eval.partition.exam, ["exam-1"]);

    let skipped: Vec<usize> = eval.skipped.iter().map(|s| s.index).collect();
    assert_eq!(skipped, [2, 3]);
}

// === Properties ===

fn arb_kind() -> impl Strategy<Value = TaskKind> {
    prop_oneof![
        Just(TaskKind::Homework),
        Just(TaskKind::Chore),
        Just(TaskKind::Exam),
        Just(TaskKind::Task),
    ]
}

fn arb_subject() -> impl Strategy<Value = Option<String>> {
    prop_oneof![
        Just(None),
        Just(Some("math".to_string())),
        Just(Some("english".to_string())),
        Just(Some("chess club".to_string())),
    ]
}

prop_compose! {
    fn arb_task()(
        kind in arb_kind(),
        subject in arb_subject(),
        added_offset in -90i64..=0,
        due_offset in proptest::option::of(-45i64..=45),
        completed in any::<bool>(),
    ) -> Task {
        let today = date(2024, 3, 13);
        let mut task = Task::new("generated", today + Duration::days(added_offset));
        task.kind = kind;
        task.subject = subject;
        task.due_date = due_offset.map(|d| today + Duration::days(d));
        if completed {
            task.mark_completed(today);
        }
        task
    }
}

fn reid(drafts: Vec<Task>) -> Vec<Task> {
    drafts
        .into_iter()
        .enumerate()
        .map(|(i, mut task)| {
            task.id = format!("task-{i}");
            task
        })
        .collect()
}

proptest! {
    #[test]
    fn property_every_task_lands_in_exactly_one_bucket(
        drafts in prop::collection::vec(arb_task(), 0..40)
    ) {
        let tasks = reid(drafts);

        for session in [session_at(10), session_at(15)] {
            let eval = session.evaluate(&tasks);
            prop_assert_eq!(eval.partition.len(), tasks.len());

            let mut seen = HashSet::new();
            for container in Container::ALL {
                for id in eval.partition.bucket(container) {
                    prop_assert!(seen.insert(id.clone()), "{} assigned twice", id);
                }
            }
            for task in &tasks {
                prop_assert!(seen.contains(&task.id), "{} missing from partition", task.id);
            }
        }
    }

    #[test]
    fn property_reevaluation_is_stable(
        drafts in prop::collection::vec(arb_task(), 0..25)
    ) {
        let tasks = reid(drafts);
        let session = session_at(15);
        let first = session.evaluate(&tasks);
        let second = session.evaluate(&tasks);
        prop_assert_eq!(first, second);
    }

    #[test]
    fn property_completed_tasks_always_archive(
        drafts in prop::collection::vec(arb_task(), 1..25)
    ) {
        let tasks = reid(drafts);
        let eval = session_at(10).evaluate(&tasks);
        for annotated in &eval.tasks {
            if annotated.task.completed {
                prop_assert_eq!(annotated.container, Container::Archive);
            }
        }
    }
}
