//! Evaluation context.
//!
//! A context is an immutable snapshot of everything categorization needs
//! to know about "now": the instant itself, which half of the day it falls
//! in, which subjects have class today and tomorrow, and the archive age
//! threshold. One snapshot is taken per categorization pass, so every task
//! in the pass sees the same instant.

use std::collections::HashSet;

use chrono::{Duration, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

use crate::clock::{Clock, TimeOfDay};
use crate::schedule::{SubjectSchedule, Weekday};

/// Default number of days after which an untouched task is archived.
pub const DEFAULT_ARCHIVE_THRESHOLD_DAYS: i64 = 30;

/// Snapshot of the conditions a categorization pass runs under.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EvaluationContext {
    /// The instant the pass is evaluated at, in local wall-clock time.
    pub now: NaiveDateTime,
    /// Which half of the day `now` falls in.
    pub time_of_day: TimeOfDay,
    /// Lowercase names of subjects with class on `now`'s weekday.
    pub today_subjects: HashSet<String>,
    /// Lowercase names of subjects with class on the following weekday.
    pub tomorrow_subjects: HashSet<String>,
    /// Tasks older than this many days are eligible for archiving.
    pub archive_threshold_days: i64,
}

impl EvaluationContext {
    /// Build a context for a given instant.
    pub fn new(now: NaiveDateTime, schedule: &SubjectSchedule, archive_threshold_days: i64) -> Self {
        let today = Weekday::from_date(now.date());
        let tomorrow = Weekday::from_date(now.date() + Duration::days(1));
        Self {
            now,
            time_of_day: TimeOfDay::from_datetime(now),
            today_subjects: schedule.subjects_on(today),
            tomorrow_subjects: schedule.subjects_on(tomorrow),
            archive_threshold_days,
        }
    }

    /// Build a context for the clock's current instant.
    pub fn snapshot(
        clock: &dyn Clock,
        schedule: &SubjectSchedule,
        archive_threshold_days: i64,
    ) -> Self {
        Self::new(clock.now(), schedule, archive_threshold_days)
    }

    /// Calendar date of the snapshot instant.
    pub fn today(&self) -> NaiveDate {
        self.now.date()
    }

    /// Calendar date of the day after the snapshot instant.
    pub fn tomorrow(&self) -> NaiveDate {
        self.now.date() + Duration::days(1)
    }

    /// Weekday of the snapshot instant.
    pub fn today_weekday(&self) -> Weekday {
        Weekday::from_date(self.now.date())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::FixedClock;
    use std::collections::BTreeSet;

    fn schedule() -> SubjectSchedule {
        let mut s = SubjectSchedule::new();
        s.set("Math", [Weekday::Monday, Weekday::Wednesday].into_iter().collect::<BTreeSet<_>>());
        s.set("History", [Weekday::Tuesday].into_iter().collect::<BTreeSet<_>>());
        s
    }

    fn monday_at(h: u32) -> NaiveDateTime {
        // 2024-03-11 is a Monday
        NaiveDate::from_ymd_opt(2024, 3, 11)
            .unwrap()
            .and_hms_opt(h, 0, 0)
            .unwrap()
    }

    #[test]
    fn test_snapshot_splits_day_at_noon() {
        let schedule = schedule();
        let morning = EvaluationContext::new(monday_at(9), &schedule, 30);
        let afternoon = EvaluationContext::new(monday_at(14), &schedule, 30);
        assert_eq!(morning.time_of_day, TimeOfDay::Morning);
        assert_eq!(afternoon.time_of_day, TimeOfDay::Afternoon);
    }

    #[test]
    fn test_snapshot_collects_today_and_tomorrow_subjects() {
        let ctx = EvaluationContext::new(monday_at(9), &schedule(), 30);
        assert!(ctx.today_subjects.contains("math"));
        assert!(!ctx.today_subjects.contains("history"));
        assert!(ctx.tomorrow_subjects.contains("history"));
        assert!(!ctx.tomorrow_subjects.contains("math"));
    }

    #[test]
    fn test_tomorrow_rolls_over_the_week() {
        // 2024-03-17 is a Sunday
        let sunday = NaiveDate::from_ymd_opt(2024, 3, 17)
            .unwrap()
            .and_hms_opt(10, 0, 0)
            .unwrap();
        let ctx = EvaluationContext::new(sunday, &schedule(), 30);
        assert_eq!(ctx.today_weekday(), Weekday::Sunday);
        // Monday's subjects show up as tomorrow's
        assert!(ctx.tomorrow_subjects.contains("math"));
    }

    #[test]
    fn test_snapshot_uses_injected_clock() {
        let clock = FixedClock(monday_at(13));
        let ctx = EvaluationContext::snapshot(&clock, &schedule(), 14);
        assert_eq!(ctx.now, monday_at(13));
        assert_eq!(ctx.archive_threshold_days, 14);
        assert_eq!(ctx.today(), NaiveDate::from_ymd_opt(2024, 3, 11).unwrap());
        assert_eq!(ctx.tomorrow(), NaiveDate::from_ymd_opt(2024, 3, 12).unwrap());
    }
}
