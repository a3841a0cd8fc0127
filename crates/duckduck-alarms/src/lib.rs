//! # DuckDuck Alarms
//!
//! Turns user-facing alarm records into recurring scheduler jobs.
//!
//! Each active alarm derives up to four jobs, keyed by a role prefix plus
//! the alarm id:
//!
//! | Role | Id | Fires at | Action |
//! |---|---|---|---|
//! | wake | `w<id>` | wake time | publish `alarm-triggered` |
//! | dim | `d<id>` | bed time minus dim minutes | dim, publish `sweet-dreams` |
//! | power-off | `o<id>` | bed time | power off, publish `sweet-dreams` |
//! | sunrise | `s<id>` | sunrise start | start the sunrise ramp |
//!
//! [`AlarmManager`] owns the alarm id to job id mapping and keeps it in
//! step with the [`JobScheduler`](duckduck_scheduler::JobScheduler) table.

pub mod actions;
pub mod derived;
pub mod error;
pub mod manager;
pub mod sunrise;
pub mod sweet_dreams;

#[cfg(test)]
mod test_support;

pub use actions::{AlarmJob, JobContext};
pub use derived::{DerivedJob, DerivedJobSet, JobAction, JobRole, derive_jobs, derived_job_id};
pub use error::{ManagerError, ManagerResult};
pub use manager::{AlarmManager, ResyncSummary};
pub use sunrise::SunriseProfile;
pub use sweet_dreams::{
    DEFAULT_DIM_MINUTES, DimLight, SweetDreams, SweetDreamsConfig, SweetDreamsUpdate,
};
