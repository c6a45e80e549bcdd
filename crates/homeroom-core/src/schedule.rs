//! Weekly class schedule.
//!
//! Maps subject names to the weekdays on which the subject meets, and
//! answers "when is the next class?" for any reference day. Subject names
//! are normalized to lowercase on entry so lookups are case-insensitive.

use std::collections::{BTreeSet, HashMap, HashSet};
use std::fmt;

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// Day of the week, numbered 1 (Monday) through 7 (Sunday).
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(try_from = "u8", into = "u8")]
pub enum Weekday {
    Monday = 1,
    Tuesday = 2,
    Wednesday = 3,
    Thursday = 4,
    Friday = 5,
    Saturday = 6,
    Sunday = 7,
}

impl Weekday {
    /// All seven days, Monday first.
    pub const ALL: [Weekday; 7] = [
        Weekday::Monday,
        Weekday::Tuesday,
        Weekday::Wednesday,
        Weekday::Thursday,
        Weekday::Friday,
        Weekday::Saturday,
        Weekday::Sunday,
    ];

    /// Weekday of a calendar date.
    pub fn from_date(date: NaiveDate) -> Self {
        date.weekday().into()
    }

    /// Day number, 1 (Monday) through 7 (Sunday).
    pub fn number(self) -> u8 {
        self as u8
    }

    /// Lowercase English name.
    pub fn name(self) -> &'static str {
        match self {
            Weekday::Monday => "monday",
            Weekday::Tuesday => "tuesday",
            Weekday::Wednesday => "wednesday",
            Weekday::Thursday => "thursday",
            Weekday::Friday => "friday",
            Weekday::Saturday => "saturday",
            Weekday::Sunday => "sunday",
        }
    }

    /// Parse a day from its English name, a common abbreviation, or the
    /// 1-7 day number.
    pub fn parse(input: &str) -> Result<Self, ValidationError> {
        let lower = input.trim().to_lowercase();
        let day = match lower.as_str() {
            "mon" | "monday" => Weekday::Monday,
            "tue" | "tues" | "tuesday" => Weekday::Tuesday,
            "wed" | "wednesday" => Weekday::Wednesday,
            "thu" | "thur" | "thurs" | "thursday" => Weekday::Thursday,
            "fri" | "friday" => Weekday::Friday,
            "sat" | "saturday" => Weekday::Saturday,
            "sun" | "sunday" => Weekday::Sunday,
            _ => {
                if let Ok(n) = lower.parse::<u8>() {
                    return Weekday::try_from(n);
                }
                return Err(ValidationError::UnknownWeekdayName(input.to_string()));
            }
        };
        Ok(day)
    }
}

impl TryFrom<u8> for Weekday {
    type Error = ValidationError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(Weekday::Monday),
            2 => Ok(Weekday::Tuesday),
            3 => Ok(Weekday::Wednesday),
            4 => Ok(Weekday::Thursday),
            5 => Ok(Weekday::Friday),
            6 => Ok(Weekday::Saturday),
            7 => Ok(Weekday::Sunday),
            other => Err(ValidationError::InvalidWeekday(other)),
        }
    }
}

impl From<Weekday> for u8 {
    fn from(day: Weekday) -> Self {
        day as u8
    }
}

impl From<chrono::Weekday> for Weekday {
    fn from(day: chrono::Weekday) -> Self {
        match day {
            chrono::Weekday::Mon => Weekday::Monday,
            chrono::Weekday::Tue => Weekday::Tuesday,
            chrono::Weekday::Wed => Weekday::Wednesday,
            chrono::Weekday::Thu => Weekday::Thursday,
            chrono::Weekday::Fri => Weekday::Friday,
            chrono::Weekday::Sat => Weekday::Saturday,
            chrono::Weekday::Sun => Weekday::Sunday,
        }
    }
}

impl fmt::Display for Weekday {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// The next class day for a subject relative to some reference day.
///
/// `days_until` is 0 when the subject meets on the reference day itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct NextOccurrence {
    pub weekday: Weekday,
    pub days_until: u32,
}

/// Weekly subject schedule.
///
/// Every stored subject has at least one class day; assigning an empty day
/// set removes the subject. Keys are kept lowercase, and deserialization
/// merges entries that differ only in case.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "ScheduleMap", into = "ScheduleMap")]
pub struct SubjectSchedule {
    subjects: HashMap<String, BTreeSet<Weekday>>,
}

type ScheduleMap = HashMap<String, BTreeSet<Weekday>>;

impl SubjectSchedule {
    /// Create an empty schedule.
    pub fn new() -> Self {
        Self::default()
    }

    /// Assign the full set of class days for a subject, replacing any
    /// previous assignment. An empty set removes the subject.
    pub fn set(&mut self, subject: &str, days: BTreeSet<Weekday>) {
        let key = normalize_subject(subject);
        if days.is_empty() {
            self.subjects.remove(&key);
        } else {
            self.subjects.insert(key, days);
        }
    }

    /// Remove a subject. Returns true if it was present.
    pub fn remove(&mut self, subject: &str) -> bool {
        self.subjects.remove(&normalize_subject(subject)).is_some()
    }

    /// Class days for a subject, if it is scheduled at all.
    pub fn days_for(&self, subject: &str) -> Option<&BTreeSet<Weekday>> {
        self.subjects.get(&normalize_subject(subject))
    }

    /// Whether a subject meets on the given day.
    pub fn is_scheduled_on(&self, subject: &str, day: Weekday) -> bool {
        self.days_for(subject)
            .is_some_and(|days| days.contains(&day))
    }

    /// All subjects that meet on the given day, as lowercase names.
    pub fn subjects_on(&self, day: Weekday) -> HashSet<String> {
        self.subjects
            .iter()
            .filter(|(_, days)| days.contains(&day))
            .map(|(name, _)| name.clone())
            .collect()
    }

    /// Iterate over `(subject, days)` entries in no particular order.
    pub fn iter(&self) -> impl Iterator<Item = (&String, &BTreeSet<Weekday>)> {
        self.subjects.iter()
    }

    /// Number of scheduled subjects.
    pub fn len(&self) -> usize {
        self.subjects.len()
    }

    /// Whether no subjects are scheduled.
    pub fn is_empty(&self) -> bool {
        self.subjects.is_empty()
    }

    /// Find the next class day for a subject, counting from `today`.
    ///
    /// A class on `today` itself resolves to `days_until == 0`; otherwise
    /// this is [`next_occurrence_after`](Self::next_occurrence_after).
    /// Returns `None` for subjects with no schedule entry.
    pub fn next_occurrence(&self, subject: &str, today: Weekday) -> Option<NextOccurrence> {
        if self.is_scheduled_on(subject, today) {
            return Some(NextOccurrence {
                weekday: today,
                days_until: 0,
            });
        }
        self.next_occurrence_after(subject, today)
    }

    /// Find the next class day strictly after `today`.
    ///
    /// This deliberately ignores a class on `today` itself: a once-a-week
    /// subject queried on its own day answers 7, not 0. The scan takes the
    /// first scheduled day after `today`, wrapping into next week when the
    /// rest of this week has no class.
    pub fn next_occurrence_after(&self, subject: &str, today: Weekday) -> Option<NextOccurrence> {
        let days = self.days_for(subject)?;
        match days.iter().find(|d| **d > today) {
            Some(day) => Some(NextOccurrence {
                weekday: *day,
                days_until: u32::from(day.number() - today.number()),
            }),
            None => {
                let first = days.iter().next()?;
                Some(NextOccurrence {
                    weekday: *first,
                    days_until: u32::from(7 - today.number() + first.number()),
                })
            }
        }
    }
}

impl From<ScheduleMap> for SubjectSchedule {
    fn from(map: ScheduleMap) -> Self {
        let mut subjects: ScheduleMap = HashMap::new();
        for (name, days) in map {
            subjects
                .entry(normalize_subject(&name))
                .or_default()
                .extend(days);
        }
        subjects.retain(|_, days| !days.is_empty());
        Self { subjects }
    }
}

impl From<SubjectSchedule> for ScheduleMap {
    fn from(schedule: SubjectSchedule) -> Self {
        schedule.subjects
    }
}

/// Canonical form of a subject name: trimmed and lowercased.
pub fn normalize_subject(name: &str) -> String {
    name.trim().to_lowercase()
}
