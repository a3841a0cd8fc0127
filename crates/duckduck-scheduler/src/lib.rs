//! # DuckDuck Scheduler
//!
//! A recurring-job table keyed by stable job id. Each job fires on a set of
//! weekdays at a wall-clock hour and minute (local time), at most once per
//! matching minute.
//!
//! ## Key Components
//!
//! - [`JobScheduler`]: The job table and its background tick loop
//! - [`JobCallback`]: What a job does when it fires
//! - [`JobInfo`]: Diagnostic snapshot of a registered job
//! - [`TimeSource`]: Clock abstraction, real or manual
//!
//! ## Example
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use std::time::Duration;
//!
//! use duckduck_protocols::{TimeOfDay, WeekdaySet};
//! use duckduck_scheduler::JobScheduler;
//!
//! #[tokio::main]
//! async fn main() {
//!     let scheduler = Arc::new(JobScheduler::new());
//!     scheduler
//!         .upsert(
//!             "w1",
//!             WeekdaySet::full_week(),
//!             TimeOfDay::new(7, 0).unwrap(),
//!             Arc::new(|id: &str| println!("{id} fired")),
//!         )
//!         .unwrap();
//!     scheduler.start(Duration::from_secs(1));
//! }
//! ```

pub mod clock;
pub mod error;
pub mod job;
pub mod scheduler;

pub use clock::{ManualTimeSource, SystemTimeSource, TimeSource};
pub use error::{SchedulerError, SchedulerResult};
pub use job::{FiredJob, JobCallback, JobInfo, cron_expression};
pub use scheduler::JobScheduler;
