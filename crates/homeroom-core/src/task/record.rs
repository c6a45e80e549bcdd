//! Lenient ingestion of foreign task records.
//!
//! External sources (homework importers, hand-edited JSON) produce records
//! in looser shapes than [`Task`]. A [`TaskRecord`] deserializes from
//! anything object-shaped, turning unusable field values into `None`
//! instead of failing the whole batch; [`TaskRecord::validate`] then either
//! repairs the record into a `Task` or reports why it was skipped. One bad
//! record never aborts an import.

use chrono::NaiveDate;
use serde::de::IgnoredAny;
use serde::{Deserialize, Deserializer, Serialize};

use super::{Task, TaskKind};
use crate::schedule::normalize_subject;

/// Fallback description for records that arrive without one.
pub const UNTITLED: &str = "(untitled)";

/// Raw inbound task record. Only `id` and `type` are required to be
/// usable; every other field is repaired with a default when absent or
/// malformed.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TaskRecord {
    #[serde(default, deserialize_with = "lenient_id")]
    pub id: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub description: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub subject: Option<String>,
    #[serde(rename = "type", default, deserialize_with = "lenient_kind")]
    pub kind: Option<TaskKind>,
    #[serde(default, deserialize_with = "lenient_date")]
    pub date_added: Option<NaiveDate>,
    #[serde(default, deserialize_with = "lenient_date")]
    pub due_date: Option<NaiveDate>,
    #[serde(default, deserialize_with = "lenient_bool")]
    pub completed: Option<bool>,
    #[serde(default, deserialize_with = "lenient_date")]
    pub completed_date: Option<NaiveDate>,
}

impl TaskRecord {
    /// Repair the record into a [`Task`], or explain why it cannot be used.
    ///
    /// `id` and `type` are required. Everything else is repaired: a blank
    /// description becomes [`UNTITLED`], a missing creation date becomes
    /// `today`, and a completion date on an incomplete record is dropped to
    /// restore the completed/completed_date pairing.
    pub fn validate(self, today: NaiveDate) -> Result<Task, SkipReason> {
        let id = match trimmed(self.id) {
            Some(id) => id,
            None => return Err(SkipReason::MissingId),
        };
        let kind = self.kind.ok_or(SkipReason::MissingKind)?;

        let description = trimmed(self.description).unwrap_or_else(|| UNTITLED.to_string());
        let subject = self
            .subject
            .map(|s| normalize_subject(&s))
            .filter(|s| !s.is_empty());
        let completed = self.completed.unwrap_or(false);

        Ok(Task {
            id,
            description,
            subject,
            kind,
            date_added: self.date_added.unwrap_or(today),
            due_date: self.due_date,
            completed,
            completed_date: if completed { self.completed_date } else { None },
        })
    }
}

/// Why a record was left out of an evaluation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SkipReason {
    /// The record has no usable id.
    MissingId,
    /// The record has no usable type.
    MissingKind,
}

impl SkipReason {
    /// Human-readable explanation for diagnostics output.
    pub fn message(&self) -> &'static str {
        match self {
            SkipReason::MissingId => "missing or unusable id",
            SkipReason::MissingKind => "missing or unusable type",
        }
    }
}

/// Diagnostic for a record excluded from an evaluation pass.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkippedRecord {
    /// Position of the record in the input batch.
    pub index: usize,
    /// The record's id, when it had one.
    pub id: Option<String>,
    /// Why the record was excluded.
    pub reason: SkipReason,
}

fn trimmed(value: Option<String>) -> Option<String> {
    value
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}

/// Parse a kind name. Unknown names are unusable, not defaulted; a record
/// whose type cannot be read is skipped rather than misfiled.
fn parse_kind(text: &str) -> Option<TaskKind> {
    match text.trim().to_lowercase().as_str() {
        "homework" => Some(TaskKind::Homework),
        "chore" => Some(TaskKind::Chore),
        "exam" => Some(TaskKind::Exam),
        "task" | "generic-task" => Some(TaskKind::Task),
        _ => None,
    }
}

fn lenient_id<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Text(String),
        Number(i64),
        Other(IgnoredAny),
    }

    Ok(match Raw::deserialize(deserializer)? {
        Raw::Text(text) => Some(text),
        Raw::Number(n) => Some(n.to_string()),
        Raw::Other(_) => None,
    })
}

fn lenient_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Text(String),
        Other(IgnoredAny),
    }

    Ok(match Raw::deserialize(deserializer)? {
        Raw::Text(text) => Some(text),
        Raw::Other(_) => None,
    })
}

fn lenient_kind<'de, D>(deserializer: D) -> Result<Option<TaskKind>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Text(String),
        Other(IgnoredAny),
    }

    Ok(match Raw::deserialize(deserializer)? {
        Raw::Text(text) => parse_kind(&text),
        Raw::Other(_) => None,
    })
}

fn lenient_date<'de, D>(deserializer: D) -> Result<Option<NaiveDate>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Date(NaiveDate),
        Text(String),
        Other(IgnoredAny),
    }

    Ok(match Raw::deserialize(deserializer)? {
        Raw::Date(date) => Some(date),
        Raw::Text(text) => NaiveDate::parse_from_str(text.trim(), "%Y-%m-%d").ok(),
        Raw::Other(_) => None,
    })
}

fn lenient_bool<'de, D>(deserializer: D) -> Result<Option<bool>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Flag(bool),
        Other(IgnoredAny),
    }

    Ok(match Raw::deserialize(deserializer)? {
        Raw::Flag(flag) => Some(flag),
        Raw::Other(_) => None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn today() -> NaiveDate {
        date(2024, 3, 13)
    }

    #[test]
    fn test_clean_record_validates() {
        let record: TaskRecord = serde_json::from_str(
            r#"{
                "id": "hw-1",
                "description": "read chapter 4",
                "subject": "History",
                "type": "homework",
                "date_added": "2024-03-10",
                "due_date": "2024-03-15",
                "completed": false
            }"#,
        )
        .unwrap();

        let task = record.validate(today()).unwrap();
        assert_eq!(task.id, "hw-1");
        assert_eq!(task.subject.as_deref(), Some("history"));
        assert_eq!(task.kind, TaskKind::Homework);
        assert_eq!(task.date_added, date(2024, 3, 10));
        assert_eq!(task.due_date, Some(date(2024, 3, 15)));
    }

    #[test]
    fn test_malformed_dates_become_none() {
        let record: TaskRecord = serde_json::from_str(
            r#"{"id": "t1", "type": "task", "due_date": "soon", "date_added": 1710000000}"#,
        )
        .unwrap();
        assert_eq!(record.due_date, None);
        assert_eq!(record.date_added, None);

        // repaired rather than rejected
        let task = record.validate(today()).unwrap();
        assert_eq!(task.date_added, today());
        assert_eq!(task.due_date, None);
    }

    #[test]
    fn test_padded_date_string_is_trimmed() {
        let record: TaskRecord =
            serde_json::from_str(r#"{"id": "t1", "type": "task", "due_date": " 2024-03-15 "}"#)
                .unwrap();
        assert_eq!(record.due_date, Some(date(2024, 3, 15)));
    }

    #[test]
    fn test_missing_id_is_skipped() {
        let record: TaskRecord =
            serde_json::from_str(r#"{"description": "orphan", "type": "task"}"#).unwrap();
        assert_eq!(record.validate(today()), Err(SkipReason::MissingId));

        let blank: TaskRecord =
            serde_json::from_str(r#"{"id": "   ", "type": "task"}"#).unwrap();
        assert_eq!(blank.validate(today()), Err(SkipReason::MissingId));
    }

    #[test]
    fn test_unknown_kind_is_skipped() {
        let record: TaskRecord =
            serde_json::from_str(r#"{"id": "t1", "type": "party"}"#).unwrap();
        assert_eq!(record.validate(today()), Err(SkipReason::MissingKind));

        let absent: TaskRecord = serde_json::from_str(r#"{"id": "t1"}"#).unwrap();
        assert_eq!(absent.validate(today()), Err(SkipReason::MissingKind));
    }

    #[test]
    fn test_numeric_id_is_accepted() {
        let record: TaskRecord =
            serde_json::from_str(r#"{"id": 1710000000123, "type": "chore"}"#).unwrap();
        let task = record.validate(today()).unwrap();
        assert_eq!(task.id, "1710000000123");
        assert_eq!(task.kind, TaskKind::Chore);
    }

    #[test]
    fn test_blank_description_is_repaired() {
        let record: TaskRecord =
            serde_json::from_str(r#"{"id": "t1", "type": "task", "description": "  "}"#).unwrap();
        let task = record.validate(today()).unwrap();
        assert_eq!(task.description, UNTITLED);
    }

    #[test]
    fn test_completed_date_dropped_when_incomplete() {
        let record: TaskRecord = serde_json::from_str(
            r#"{"id": "t1", "type": "task", "completed": false, "completed_date": "2024-03-01"}"#,
        )
        .unwrap();
        let task = record.validate(today()).unwrap();
        assert!(!task.completed);
        assert_eq!(task.completed_date, None);
    }

    #[test]
    fn test_completed_without_date_is_kept() {
        let record: TaskRecord =
            serde_json::from_str(r#"{"id": "t1", "type": "task", "completed": true}"#).unwrap();
        let task = record.validate(today()).unwrap();
        assert!(task.completed);
        assert_eq!(task.completed_date, None);
    }

    #[test]
    fn test_non_bool_completed_defaults_to_false() {
        let record: TaskRecord =
            serde_json::from_str(r#"{"id": "t1", "type": "task", "completed": "yes"}"#).unwrap();
        let task = record.validate(today()).unwrap();
        assert!(!task.completed);
    }

    #[test]
    fn test_generic_task_alias() {
        let record: TaskRecord =
            serde_json::from_str(r#"{"id": "t1", "type": "generic-task"}"#).unwrap();
        assert_eq!(record.kind, Some(TaskKind::Task));
    }

    #[test]
    fn test_skip_reason_messages() {
        assert_eq!(SkipReason::MissingId.message(), "missing or unusable id");
        assert_eq!(SkipReason::MissingKind.message(), "missing or unusable type");
    }
}
