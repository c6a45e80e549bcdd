//! # Homeroom Core Library
//!
//! This library provides the core business logic for the Homeroom school
//! task tracker. It implements a CLI-first philosophy where all operations
//! are available via a standalone CLI binary, with any future GUI being a
//! thin layer over the same core library.
//!
//! ## Architecture
//!
//! - **Categorization Engine**: Composable predicate rules that sort tasks
//!   into display buckets (today, tomorrow, future, archive, exam) from an
//!   evaluation snapshot taken at a wall-clock instant
//! - **Class Schedule**: Weekly subject-to-weekday mapping with
//!   next-occurrence lookup
//! - **Storage**: SQLite-based task and schedule persistence plus
//!   TOML-based configuration
//!
//! ## Key Components
//!
//! - [`Categorizer`]: Compiles container rules and evaluates task lists
//! - [`SubjectSchedule`]: Weekly class timetable
//! - [`TaskDb`]: Task and schedule persistence
//! - [`Config`]: Application configuration management

pub mod board;
pub mod clock;
pub mod context;
pub mod error;
pub mod rules;
pub mod schedule;
pub mod storage;
pub mod task;

pub use board::{AnnotatedTask, Categorizer, Evaluation, Partition};
pub use clock::{Clock, FixedClock, SystemClock, TimeOfDay};
pub use context::{EvaluationContext, DEFAULT_ARCHIVE_THRESHOLD_DAYS};
pub use error::{ConfigError, CoreError, DatabaseError, Result, ValidationError};
pub use rules::{ContainerRules, Predicate};
pub use schedule::{NextOccurrence, SubjectSchedule, Weekday};
pub use storage::{Config, TaskDb};
pub use task::record::{SkipReason, SkippedRecord, TaskRecord};
pub use task::{Container, Task, TaskKind};
