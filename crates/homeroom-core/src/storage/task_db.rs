//! SQLite-based storage for tasks and the weekly subject schedule.

use std::collections::{BTreeSet, HashMap};
use std::path::Path;

use chrono::NaiveDate;
use rusqlite::{params, Connection, OptionalExtension};

use super::data_dir;
use super::migrations;
use crate::error::{DatabaseError, Result};
use crate::schedule::{normalize_subject, SubjectSchedule, Weekday};
use crate::task::{Task, TaskKind};

// === Helper Functions ===

/// Parse task kind from database string
fn parse_task_kind(kind_str: Option<&str>) -> TaskKind {
    match kind_str {
        Some("homework") => TaskKind::Homework,
        Some("chore") => TaskKind::Chore,
        Some("exam") => TaskKind::Exam,
        _ => TaskKind::Task,
    }
}

/// Format task kind for database storage
fn format_task_kind(kind: TaskKind) -> &'static str {
    kind.name()
}

/// Format a date for database storage
fn format_date(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

/// Parse a required date column with fallback to the current day
fn parse_date_fallback(date_str: &str) -> NaiveDate {
    NaiveDate::parse_from_str(date_str, "%Y-%m-%d")
        .unwrap_or_else(|_| chrono::Local::now().date_naive())
}

/// Parse an optional date column; damaged values read as no date
fn parse_date_opt(date_str: Option<String>) -> Option<NaiveDate> {
    date_str.and_then(|s| NaiveDate::parse_from_str(&s, "%Y-%m-%d").ok())
}

/// Build a Task from a database row
fn row_to_task(row: &rusqlite::Row) -> Result<Task, rusqlite::Error> {
    let kind_str: Option<String> = row.get(3)?;
    let date_added_str: String = row.get(4)?;
    let completed: bool = row.get(6)?;
    let completed_date: Option<String> = row.get(7)?;

    Ok(Task {
        id: row.get(0)?,
        description: row.get(1)?,
        subject: row.get(2)?,
        kind: parse_task_kind(kind_str.as_deref()),
        date_added: parse_date_fallback(&date_added_str),
        due_date: parse_date_opt(row.get(5)?),
        completed,
        // keep the completed/completed_date pairing even for hand-edited rows
        completed_date: if completed {
            parse_date_opt(completed_date)
        } else {
            None
        },
    })
}

const TASK_COLUMNS: &str =
    "id, description, subject, kind, date_added, due_date, completed, completed_date";

/// SQLite database for homeroom.
///
/// Stores tasks and the weekly subject schedule.
pub struct TaskDb {
    conn: Connection,
}

impl TaskDb {
    /// Open the database at `~/.config/homeroom/homeroom.db`.
    ///
    /// Creates tables if they don't exist.
    ///
    /// # Errors
    /// Returns an error if the database cannot be opened or migrated.
    pub fn open() -> Result<Self> {
        let path = data_dir()?.join("homeroom.db");
        Self::open_at(&path)
    }

    /// Open (or create) the database at the specified path.
    pub fn open_at(path: &Path) -> Result<Self> {
        let conn = Connection::open(path).map_err(|source| DatabaseError::OpenFailed {
            path: path.to_path_buf(),
            source,
        })?;
        let db = Self { conn };
        db.migrate()?;
        Ok(db)
    }

    /// Open an in-memory database (for tests).
    #[cfg(test)]
    pub fn open_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        let db = Self { conn };
        db.migrate()?;
        Ok(db)
    }

    fn migrate(&self) -> Result<(), rusqlite::Error> {
        // Create the baseline (v1) table first
        self.conn.execute_batch(
            "CREATE TABLE IF NOT EXISTS tasks (
                id          TEXT PRIMARY KEY,
                description TEXT NOT NULL,
                subject     TEXT,
                kind        TEXT NOT NULL DEFAULT 'task',
                date_added  TEXT NOT NULL,
                due_date    TEXT,
                completed   INTEGER NOT NULL DEFAULT 0
            );",
        )?;

        // Run incremental migrations (v1 -> v2 -> v3, etc.)
        migrations::migrate(&self.conn)?;

        // Lookup index for due-date scans (idempotent, runs after
        // migrations settle the schema)
        self.conn.execute(
            "CREATE INDEX IF NOT EXISTS idx_tasks_due_date ON tasks(due_date)",
            [],
        )?;

        Ok(())
    }

    // === Tasks ===

    /// Insert a new task.
    pub fn create_task(&self, task: &Task) -> Result<()> {
        self.conn.execute(
            "INSERT INTO tasks (id, description, subject, kind, date_added, due_date, completed, completed_date)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
            params![
                task.id,
                task.description,
                task.subject,
                format_task_kind(task.kind),
                format_date(task.date_added),
                task.due_date.map(format_date),
                task.completed,
                task.completed_date.map(format_date),
            ],
        )?;
        Ok(())
    }

    /// Update an existing task. Returns false when the id is unknown.
    pub fn update_task(&self, task: &Task) -> Result<bool> {
        let changed = self.conn.execute(
            "UPDATE tasks
             SET description = ?2, subject = ?3, kind = ?4, date_added = ?5,
                 due_date = ?6, completed = ?7, completed_date = ?8
             WHERE id = ?1",
            params![
                task.id,
                task.description,
                task.subject,
                format_task_kind(task.kind),
                format_date(task.date_added),
                task.due_date.map(format_date),
                task.completed,
                task.completed_date.map(format_date),
            ],
        )?;
        Ok(changed > 0)
    }

    /// Fetch one task by id.
    pub fn get_task(&self, id: &str) -> Result<Option<Task>> {
        let task = self
            .conn
            .query_row(
                &format!("SELECT {TASK_COLUMNS} FROM tasks WHERE id = ?1"),
                params![id],
                row_to_task,
            )
            .optional()?;
        Ok(task)
    }

    /// All tasks, oldest first.
    pub fn list_tasks(&self) -> Result<Vec<Task>> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {TASK_COLUMNS} FROM tasks ORDER BY date_added ASC, id ASC"
        ))?;
        let rows = stmt.query_map([], row_to_task)?;
        let mut tasks = Vec::new();
        for task in rows {
            tasks.push(task?);
        }
        Ok(tasks)
    }

    /// Delete a task. Returns false when the id is unknown.
    pub fn delete_task(&self, id: &str) -> Result<bool> {
        let changed = self
            .conn
            .execute("DELETE FROM tasks WHERE id = ?1", params![id])?;
        Ok(changed > 0)
    }

    // === Subject schedule ===

    /// Replace the class days for one subject.
    pub fn set_subject_days(&self, subject: &str, days: &BTreeSet<Weekday>) -> Result<()> {
        let subject = normalize_subject(subject);
        self.conn.execute(
            "DELETE FROM subject_days WHERE subject = ?1",
            params![subject],
        )?;
        for day in days {
            self.conn.execute(
                "INSERT INTO subject_days (subject, weekday) VALUES (?1, ?2)",
                params![subject, day.number()],
            )?;
        }
        Ok(())
    }

    /// Drop a subject from the schedule. Returns false when absent.
    pub fn remove_subject(&self, subject: &str) -> Result<bool> {
        let changed = self.conn.execute(
            "DELETE FROM subject_days WHERE subject = ?1",
            params![normalize_subject(subject)],
        )?;
        Ok(changed > 0)
    }

    /// Load the full weekly schedule. Rows with out-of-range weekday
    /// numbers are ignored.
    pub fn load_schedule(&self) -> Result<SubjectSchedule> {
        let mut stmt = self
            .conn
            .prepare("SELECT subject, weekday FROM subject_days")?;
        let mut rows = stmt.query([])?;
        let mut map: HashMap<String, BTreeSet<Weekday>> = HashMap::new();
        while let Some(row) = rows.next()? {
            let subject: String = row.get(0)?;
            let number: i64 = row.get(1)?;
            let day = u8::try_from(number)
                .ok()
                .and_then(|n| Weekday::try_from(n).ok());
            if let Some(day) = day {
                map.entry(subject).or_default().insert(day);
            }
        }
        Ok(SubjectSchedule::from(map))
    }

    /// Replace the entire schedule.
    pub fn save_schedule(&self, schedule: &SubjectSchedule) -> Result<()> {
        self.conn.execute("DELETE FROM subject_days", [])?;
        for (subject, days) in schedule.iter() {
            for day in days {
                self.conn.execute(
                    "INSERT INTO subject_days (subject, weekday) VALUES (?1, ?2)",
                    params![subject, day.number()],
                )?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn days(list: &[Weekday]) -> BTreeSet<Weekday> {
        list.iter().copied().collect()
    }

    #[test]
    fn test_create_and_get_roundtrip() {
        let db = TaskDb::open_memory().unwrap();
        let task = Task::new("read chapter 4", date(2024, 3, 10))
            .with_subject("History")
            .with_kind(TaskKind::Homework)
            .with_due_date(date(2024, 3, 15));
        db.create_task(&task).unwrap();

        let loaded = db.get_task(&task.id).unwrap().unwrap();
        assert_eq!(loaded, task);
        assert!(db.get_task("missing").unwrap().is_none());
    }

    #[test]
    fn test_list_tasks_oldest_first() {
        let db = TaskDb::open_memory().unwrap();
        let newer = Task::new("newer", date(2024, 3, 12));
        let older = Task::new("older", date(2024, 3, 1));
        db.create_task(&newer).unwrap();
        db.create_task(&older).unwrap();

        let tasks = db.list_tasks().unwrap();
        assert_eq!(tasks.len(), 2);
        assert_eq!(tasks[0].id, older.id);
        assert_eq!(tasks[1].id, newer.id);
    }

    #[test]
    fn test_update_task() {
        let db = TaskDb::open_memory().unwrap();
        let mut task = Task::new("essay", date(2024, 3, 10));
        db.create_task(&task).unwrap();

        task.mark_completed(date(2024, 3, 12));
        assert!(db.update_task(&task).unwrap());

        let loaded = db.get_task(&task.id).unwrap().unwrap();
        assert!(loaded.completed);
        assert_eq!(loaded.completed_date, Some(date(2024, 3, 12)));

        let ghost = Task::new("ghost", date(2024, 3, 10));
        assert!(!db.update_task(&ghost).unwrap());
    }

    #[test]
    fn test_delete_task() {
        let db = TaskDb::open_memory().unwrap();
        let task = Task::new("gone soon", date(2024, 3, 10));
        db.create_task(&task).unwrap();

        assert!(db.delete_task(&task.id).unwrap());
        assert!(!db.delete_task(&task.id).unwrap());
        assert!(db.get_task(&task.id).unwrap().is_none());
    }

    #[test]
    fn test_unknown_kind_reads_as_task() {
        let db = TaskDb::open_memory().unwrap();
        db.conn
            .execute(
                "INSERT INTO tasks (id, description, kind, date_added, completed)
                 VALUES ('x', 'mystery', 'banana', '2024-03-01', 0)",
                [],
            )
            .unwrap();
        let task = db.get_task("x").unwrap().unwrap();
        assert_eq!(task.kind, TaskKind::Task);
    }

    #[test]
    fn test_stray_completed_date_is_dropped_on_read() {
        let db = TaskDb::open_memory().unwrap();
        db.conn
            .execute(
                "INSERT INTO tasks (id, description, date_added, completed, completed_date)
                 VALUES ('x', 'edited by hand', '2024-03-01', 0, '2024-03-05')",
                [],
            )
            .unwrap();
        let task = db.get_task("x").unwrap().unwrap();
        assert!(!task.completed);
        assert_eq!(task.completed_date, None);
    }

    #[test]
    fn test_schedule_roundtrip() {
        let db = TaskDb::open_memory().unwrap();
        db.set_subject_days("Math", &days(&[Weekday::Monday, Weekday::Wednesday]))
            .unwrap();
        db.set_subject_days("english", &days(&[Weekday::Thursday]))
            .unwrap();

        let schedule = db.load_schedule().unwrap();
        assert_eq!(schedule.len(), 2);
        assert_eq!(
            schedule.days_for("math"),
            Some(&days(&[Weekday::Monday, Weekday::Wednesday]))
        );
        assert_eq!(schedule.days_for("english"), Some(&days(&[Weekday::Thursday])));
    }

    #[test]
    fn test_set_subject_days_replaces() {
        let db = TaskDb::open_memory().unwrap();
        db.set_subject_days("math", &days(&[Weekday::Monday])).unwrap();
        db.set_subject_days("math", &days(&[Weekday::Friday])).unwrap();

        let schedule = db.load_schedule().unwrap();
        assert_eq!(schedule.days_for("math"), Some(&days(&[Weekday::Friday])));
    }

    #[test]
    fn test_remove_subject() {
        let db = TaskDb::open_memory().unwrap();
        db.set_subject_days("math", &days(&[Weekday::Monday])).unwrap();

        assert!(db.remove_subject("MATH").unwrap());
        assert!(!db.remove_subject("math").unwrap());
        assert!(db.load_schedule().unwrap().is_empty());
    }

    #[test]
    fn test_save_schedule_replaces_everything() {
        let db = TaskDb::open_memory().unwrap();
        db.set_subject_days("old", &days(&[Weekday::Monday])).unwrap();

        let mut schedule = SubjectSchedule::new();
        schedule.set("math", days(&[Weekday::Tuesday]));
        db.save_schedule(&schedule).unwrap();

        let loaded = db.load_schedule().unwrap();
        assert_eq!(loaded.len(), 1);
        assert!(loaded.days_for("old").is_none());
        assert_eq!(loaded.days_for("math"), Some(&days(&[Weekday::Tuesday])));
    }

    #[test]
    fn test_reopen_on_disk_keeps_data() {
        use tempfile::TempDir;

        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("homeroom.db");

        let task = Task::new("survives a restart", date(2024, 3, 10));
        {
            let db = TaskDb::open_at(&path).unwrap();
            db.create_task(&task).unwrap();
            db.set_subject_days("math", &days(&[Weekday::Monday])).unwrap();
        }

        // Second open re-runs migrations against the existing file
        let db = TaskDb::open_at(&path).unwrap();
        assert_eq!(db.get_task(&task.id).unwrap().unwrap(), task);
        assert_eq!(
            db.load_schedule().unwrap().days_for("math"),
            Some(&days(&[Weekday::Monday]))
        );
    }

    #[test]
    fn test_bad_weekday_rows_are_ignored() {
        let db = TaskDb::open_memory().unwrap();
        db.conn
            .execute(
                "INSERT INTO subject_days (subject, weekday) VALUES ('math', 9), ('math', 2)",
                [],
            )
            .unwrap();
        let schedule = db.load_schedule().unwrap();
        assert_eq!(schedule.days_for("math"), Some(&days(&[Weekday::Tuesday])));
    }
}
