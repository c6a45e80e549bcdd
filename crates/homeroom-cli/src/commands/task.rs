//! Task management commands for CLI.

use chrono::{Local, NaiveDate};
use clap::Subcommand;
use homeroom_core::{Task, TaskDb, TaskKind, TaskRecord};

#[derive(Subcommand)]
pub enum TaskAction {
    /// Add a new task
    Add {
        /// What needs doing
        description: String,
        /// Subject the task belongs to
        #[arg(long)]
        subject: Option<String>,
        /// Task kind: homework, chore, exam or task (default: task)
        #[arg(long, default_value = "task")]
        kind: String,
        /// Due date (YYYY-MM-DD)
        #[arg(long)]
        due: Option<String>,
    },
    /// List all tasks
    List,
    /// Get task details
    Get {
        /// Task ID
        id: String,
    },
    /// Mark a task completed
    Complete {
        /// Task ID
        id: String,
        /// Completion date (YYYY-MM-DD, default: today)
        #[arg(long)]
        on: Option<String>,
    },
    /// Reopen a completed task
    Reopen {
        /// Task ID
        id: String,
    },
    /// Delete a task
    Delete {
        /// Task ID
        id: String,
    },
    /// Import tasks from a JSON file of raw records
    Import {
        /// Path to a JSON array of task records
        file: String,
    },
}

fn parse_date(input: &str) -> Result<NaiveDate, Box<dyn std::error::Error>> {
    NaiveDate::parse_from_str(input.trim(), "%Y-%m-%d")
        .map_err(|_| format!("invalid date '{input}', expected YYYY-MM-DD").into())
}

fn parse_kind(input: &str) -> Result<TaskKind, Box<dyn std::error::Error>> {
    match input {
        "homework" => Ok(TaskKind::Homework),
        "chore" => Ok(TaskKind::Chore),
        "exam" => Ok(TaskKind::Exam),
        "task" | "generic-task" => Ok(TaskKind::Task),
        other => Err(format!("unknown task kind: {other}").into()),
    }
}

pub fn run(action: TaskAction) -> Result<(), Box<dyn std::error::Error>> {
    let db = TaskDb::open()?;

    match action {
        TaskAction::Add {
            description,
            subject,
            kind,
            due,
        } => {
            let mut task =
                Task::new(description, Local::now().date_naive()).with_kind(parse_kind(&kind)?);
            if let Some(s) = subject {
                task = task.with_subject(&s);
            }
            if let Some(d) = due {
                task = task.with_due_date(parse_date(&d)?);
            }
            db.create_task(&task)?;
            println!("Task created: {}", task.id);
            println!("{}", serde_json::to_string_pretty(&task)?);
        }
        TaskAction::List => {
            let tasks = db.list_tasks()?;
            println!("{}", serde_json::to_string_pretty(&tasks)?);
        }
        TaskAction::Get { id } => match db.get_task(&id)? {
            Some(task) => println!("{}", serde_json::to_string_pretty(&task)?),
            None => println!("Task not found: {id}"),
        },
        TaskAction::Complete { id, on } => {
            let mut task = db.get_task(&id)?.ok_or(format!("Task not found: {id}"))?;
            let on = match on {
                Some(d) => parse_date(&d)?,
                None => Local::now().date_naive(),
            };
            task.mark_completed(on);
            db.update_task(&task)?;
            println!("Task completed: {id}");
        }
        TaskAction::Reopen { id } => {
            let mut task = db.get_task(&id)?.ok_or(format!("Task not found: {id}"))?;
            task.reopen();
            db.update_task(&task)?;
            println!("Task reopened: {id}");
        }
        TaskAction::Delete { id } => {
            if db.delete_task(&id)? {
                println!("Task deleted: {id}");
            } else {
                println!("Task not found: {id}");
            }
        }
        TaskAction::Import { file } => {
            let content = std::fs::read_to_string(&file)?;
            let records: Vec<TaskRecord> = serde_json::from_str(&content)?;
            let today = Local::now().date_naive();

            let mut imported = 0usize;
            let mut skipped = Vec::new();
            for (index, record) in records.into_iter().enumerate() {
                let id = record.id.clone();
                match record.validate(today) {
                    Ok(task) => {
                        db.create_task(&task)?;
                        imported += 1;
                    }
                    Err(reason) => skipped.push((index, id, reason)),
                }
            }

            println!("Imported {imported} task(s)");
            if !skipped.is_empty() {
                println!("Skipped {} record(s):", skipped.len());
                for (index, id, reason) in skipped {
                    match id {
                        Some(id) => println!("  record {index} ({id}): {}", reason.message()),
                        None => println!("  record {index}: {}", reason.message()),
                    }
                }
            }
        }
    }
    Ok(())
}
