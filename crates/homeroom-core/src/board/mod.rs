//! Categorization evaluator.
//!
//! One [`Categorizer`] is one evaluation session: it owns the weekly
//! schedule, a context snapshot, and the bucket rules compiled from that
//! snapshot, and it partitions any task list into the five display
//! buckets. It never mutates its inputs and holds no process-wide state,
//! so independent sessions with different snapshots can evaluate the same
//! data concurrently (a test harness comparing morning and afternoon
//! results, for instance).

pub mod sort;

use serde::{Deserialize, Serialize};

use crate::clock::Clock;
use crate::context::EvaluationContext;
use crate::rules::ContainerRules;
use crate::schedule::{NextOccurrence, SubjectSchedule};
use crate::task::record::{SkippedRecord, TaskRecord};
use crate::task::{Container, Task};

/// Bucket membership for one pass, as ordered id lists.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Partition {
    pub today: Vec<String>,
    pub tomorrow: Vec<String>,
    pub future: Vec<String>,
    pub archive: Vec<String>,
    pub exam: Vec<String>,
}

impl Partition {
    /// Ids assigned to one bucket.
    pub fn bucket(&self, container: Container) -> &[String] {
        match container {
            Container::Today => &self.today,
            Container::Tomorrow => &self.tomorrow,
            Container::Future => &self.future,
            Container::Archive => &self.archive,
            Container::Exam => &self.exam,
        }
    }

    /// Total number of ids across all buckets.
    pub fn len(&self) -> usize {
        Container::ALL
            .iter()
            .map(|c| self.bucket(*c).len())
            .sum()
    }

    /// Whether every bucket is empty.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// A task plus its resolved bucket and, when the task's subject is
/// scheduled, the subject's next class occurrence.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnnotatedTask {
    pub task: Task,
    pub container: Container,
    pub next_class: Option<NextOccurrence>,
}

/// Result of one categorization pass.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Evaluation {
    /// Ordered ids per bucket.
    pub partition: Partition,
    /// The categorized tasks, annotated, in bucket display order.
    pub tasks: Vec<AnnotatedTask>,
    /// Records excluded from the pass, in input order.
    pub skipped: Vec<SkippedRecord>,
}

impl Evaluation {
    /// Annotated tasks in one bucket, in that bucket's order.
    pub fn tasks_in(&self, container: Container) -> impl Iterator<Item = &AnnotatedTask> {
        self.tasks.iter().filter(move |t| t.container == container)
    }
}

/// Caller-owned categorization session.
pub struct Categorizer {
    schedule: SubjectSchedule,
    ctx: EvaluationContext,
    rules: ContainerRules,
}

impl Categorizer {
    /// Build a session from an explicit context snapshot.
    pub fn new(schedule: SubjectSchedule, ctx: EvaluationContext) -> Self {
        let rules = ContainerRules::compile(&ctx);
        Self {
            schedule,
            ctx,
            rules,
        }
    }

    /// Build a session for the clock's current instant.
    pub fn snapshot(
        clock: &dyn Clock,
        schedule: SubjectSchedule,
        archive_threshold_days: i64,
    ) -> Self {
        let ctx = EvaluationContext::snapshot(clock, &schedule, archive_threshold_days);
        Self::new(schedule, ctx)
    }

    /// The context this session evaluates under.
    pub fn context(&self) -> &EvaluationContext {
        &self.ctx
    }

    /// Partition tasks into buckets, order each bucket, and annotate
    /// every task with its bucket and next class occurrence.
    pub fn evaluate(&self, tasks: &[Task]) -> Evaluation {
        self.run(tasks.to_vec(), Vec::new())
    }

    /// Validate raw records, then partition the usable ones.
    ///
    /// Records without a usable id or type are reported in
    /// [`Evaluation::skipped`], never silently dropped; one bad record
    /// does not abort the pass.
    pub fn evaluate_records(&self, records: Vec<TaskRecord>) -> Evaluation {
        let mut tasks = Vec::with_capacity(records.len());
        let mut skipped = Vec::new();
        for (index, record) in records.into_iter().enumerate() {
            let id = record.id.clone();
            match record.validate(self.ctx.today()) {
                Ok(task) => tasks.push(task),
                Err(reason) => skipped.push(SkippedRecord { index, id, reason }),
            }
        }
        self.run(tasks, skipped)
    }

    fn run(&self, tasks: Vec<Task>, skipped: Vec<SkippedRecord>) -> Evaluation {
        let mut today = Vec::new();
        let mut tomorrow = Vec::new();
        let mut future = Vec::new();
        let mut archive = Vec::new();
        let mut exam = Vec::new();

        for task in tasks {
            match self.rules.classify(&task, &self.ctx) {
                Container::Today => today.push(task),
                Container::Tomorrow => tomorrow.push(task),
                Container::Future => future.push(task),
                Container::Archive => archive.push(task),
                Container::Exam => exam.push(task),
            }
        }

        sort::sort_container(Container::Today, &mut today);
        sort::sort_container(Container::Tomorrow, &mut tomorrow);
        sort::sort_container(Container::Future, &mut future);
        sort::sort_container(Container::Archive, &mut archive);
        sort::sort_container(Container::Exam, &mut exam);

        let partition = Partition {
            today: ids(&today),
            tomorrow: ids(&tomorrow),
            future: ids(&future),
            archive: ids(&archive),
            exam: ids(&exam),
        };

        let mut annotated = Vec::with_capacity(partition.len());
        let buckets = [
            (Container::Today, today),
            (Container::Tomorrow, tomorrow),
            (Container::Future, future),
            (Container::Archive, archive),
            (Container::Exam, exam),
        ];
        for (container, bucket) in buckets {
            for task in bucket {
                annotated.push(self.annotate(task, container));
            }
        }

        Evaluation {
            partition,
            tasks: annotated,
            skipped,
        }
    }

    fn annotate(&self, task: Task, container: Container) -> AnnotatedTask {
        let next_class = task
            .subject
            .as_deref()
            .and_then(|s| self.schedule.next_occurrence(s, self.ctx.today_weekday()));
        AnnotatedTask {
            task,
            container,
            next_class,
        }
    }
}

fn ids(tasks: &[Task]) -> Vec<String> {
    tasks.iter().map(|t| t.id.clone()).collect()
}
