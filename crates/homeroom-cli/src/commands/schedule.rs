//! Weekly class schedule commands for CLI.

use std::collections::BTreeSet;

use clap::Subcommand;
use homeroom_core::{TaskDb, Weekday};

#[derive(Subcommand)]
pub enum ScheduleAction {
    /// Set the class days for a subject
    Set {
        /// Subject name
        subject: String,
        /// Class days: names, abbreviations or 1-7 numbers, comma-separated
        days: String,
    },
    /// Remove a subject from the schedule
    Remove {
        /// Subject name
        subject: String,
    },
    /// Show the full schedule
    List,
    /// Show the next class day for a subject
    Next {
        /// Subject name
        subject: String,
    },
}

pub fn run(action: ScheduleAction) -> Result<(), Box<dyn std::error::Error>> {
    let db = TaskDb::open()?;

    match action {
        ScheduleAction::Set { subject, days } => {
            let mut parsed = BTreeSet::new();
            for part in days.split(',') {
                parsed.insert(Weekday::parse(part)?);
            }
            db.set_subject_days(&subject, &parsed)?;
            println!("Schedule updated: {subject}");
        }
        ScheduleAction::Remove { subject } => {
            if db.remove_subject(&subject)? {
                println!("Subject removed: {subject}");
            } else {
                println!("Subject not found: {subject}");
            }
        }
        ScheduleAction::List => {
            let schedule = db.load_schedule()?;
            let mut entries: Vec<(String, Vec<String>)> = schedule
                .iter()
                .map(|(subject, days)| {
                    let names = days.iter().map(|d| d.name().to_string()).collect();
                    (subject.clone(), names)
                })
                .collect();
            entries.sort();
            for (subject, names) in entries {
                println!("{subject}: {}", names.join(", "));
            }
        }
        ScheduleAction::Next { subject } => {
            let schedule = db.load_schedule()?;
            let today = Weekday::from_date(chrono::Local::now().date_naive());
            match schedule.next_occurrence(&subject, today) {
                Some(next) if next.days_until == 0 => {
                    println!("{subject} meets today ({})", next.weekday);
                }
                Some(next) => {
                    println!(
                        "{subject} next meets on {} ({} day(s) from now)",
                        next.weekday, next.days_until
                    );
                }
                None => println!("Subject not scheduled: {subject}"),
            }
        }
    }
    Ok(())
}
