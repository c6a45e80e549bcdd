//! Categorized board views.

use chrono::NaiveDateTime;
use clap::Subcommand;
use homeroom_core::{
    Categorizer, Config, Container, Evaluation, FixedClock, SubjectSchedule, SystemClock, TaskDb,
    TaskRecord,
};

#[derive(Subcommand)]
pub enum BoardAction {
    /// Show the categorized board for the stored tasks
    Show {
        /// Emit the full evaluation as JSON
        #[arg(long)]
        json: bool,
        /// Evaluate at this instant instead of now (YYYY-MM-DDTHH:MM:SS)
        #[arg(long)]
        at: Option<String>,
    },
    /// Evaluate a JSON file of raw task records without importing them
    Check {
        /// Path to a JSON array of task records
        file: String,
        /// Emit the full evaluation as JSON
        #[arg(long)]
        json: bool,
        /// Evaluate at this instant instead of now (YYYY-MM-DDTHH:MM:SS)
        #[arg(long)]
        at: Option<String>,
    },
    /// Re-evaluate and print the board periodically
    Watch {
        /// Minutes between refreshes (default: board.refresh_minutes)
        #[arg(long)]
        every: Option<u64>,
    },
}

fn parse_instant(input: &str) -> Result<NaiveDateTime, Box<dyn std::error::Error>> {
    NaiveDateTime::parse_from_str(input.trim(), "%Y-%m-%dT%H:%M:%S")
        .map_err(|_| format!("invalid instant '{input}', expected YYYY-MM-DDTHH:MM:SS").into())
}

fn build_session(
    at: Option<&str>,
    schedule: SubjectSchedule,
    archive_threshold_days: i64,
) -> Result<Categorizer, Box<dyn std::error::Error>> {
    let session = match at {
        Some(instant) => Categorizer::snapshot(
            &FixedClock(parse_instant(instant)?),
            schedule,
            archive_threshold_days,
        ),
        None => Categorizer::snapshot(&SystemClock, schedule, archive_threshold_days),
    };
    Ok(session)
}

pub fn run(action: BoardAction) -> Result<(), Box<dyn std::error::Error>> {
    let db = TaskDb::open()?;
    let config = Config::load_or_default();

    match action {
        BoardAction::Show { json, at } => {
            let schedule = db.load_schedule()?;
            let session = build_session(at.as_deref(), schedule, config.board.archive_threshold_days)?;
            let tasks = db.list_tasks()?;
            let eval = session.evaluate(&tasks);
            report(&eval, json, config.display.show_empty_buckets)?;
        }
        BoardAction::Check { file, json, at } => {
            let schedule = db.load_schedule()?;
            let session = build_session(at.as_deref(), schedule, config.board.archive_threshold_days)?;
            let content = std::fs::read_to_string(&file)?;
            let records: Vec<TaskRecord> = serde_json::from_str(&content)?;
            let eval = session.evaluate_records(records);
            report(&eval, json, config.display.show_empty_buckets)?;
        }
        BoardAction::Watch { every } => {
            let minutes = every.unwrap_or(config.board.refresh_minutes).max(1);
            loop {
                // reload everything each tick so edits from other
                // invocations and noon/day rollovers show up
                let schedule = db.load_schedule()?;
                let tasks = db.list_tasks()?;
                let session =
                    build_session(None, schedule, config.board.archive_threshold_days)?;
                let eval = session.evaluate(&tasks);
                println!("-- {} --", session.context().now.format("%Y-%m-%d %H:%M"));
                print_board(&eval, config.display.show_empty_buckets);
                std::thread::sleep(std::time::Duration::from_secs(minutes * 60));
            }
        }
    }
    Ok(())
}

fn report(eval: &Evaluation, json: bool, show_empty: bool) -> Result<(), Box<dyn std::error::Error>> {
    if json {
        println!("{}", serde_json::to_string_pretty(eval)?);
    } else {
        print_board(eval, show_empty);
    }
    Ok(())
}

fn print_board(eval: &Evaluation, show_empty: bool) {
    for container in Container::ALL {
        let bucket: Vec<_> = eval.tasks_in(container).collect();
        if bucket.is_empty() && !show_empty {
            continue;
        }
        println!("== {container} ({}) ==", bucket.len());
        for annotated in bucket {
            let task = &annotated.task;
            let mut line = format!("  [{}] {}", task.kind, task.description);
            if let Some(subject) = &task.subject {
                line.push_str(&format!(" ({subject})"));
            }
            if let Some(due) = task.due_date {
                line.push_str(&format!(" due {due}"));
            }
            if let Some(next) = annotated.next_class {
                match next.days_until {
                    0 => line.push_str(" [class today]"),
                    1 => line.push_str(" [class tomorrow]"),
                    n => line.push_str(&format!(" [class in {n} days]")),
                }
            }
            println!("{line}");
        }
    }

    if !eval.skipped.is_empty() {
        println!("== skipped ({}) ==", eval.skipped.len());
        for skipped in &eval.skipped {
            match &skipped.id {
                Some(id) => println!("  record {} ({id}): {}", skipped.index, skipped.reason.message()),
                None => println!("  record {}: {}", skipped.index, skipped.reason.message()),
            }
        }
    }
}
