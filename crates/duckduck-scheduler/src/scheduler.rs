//! The recurring job table and its tick loop.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Local, Timelike};
use parking_lot::{Mutex, RwLock};
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use duckduck_protocols::{TimeOfDay, WeekdaySet};

use crate::clock::{SystemTimeSource, TimeSource};
use crate::error::SchedulerResult;
use crate::job::{FiredJob, JobCallback, JobInfo, ScheduledJob};

/// Recurring job table keyed by job id.
///
/// All table mutations happen under a single write lock, so a concurrent
/// reader (the tick loop or [`JobScheduler::list_jobs`]) never observes a
/// half-applied upsert. A job only fires for occurrences after it was
/// registered, and at most once per matching minute.
pub struct JobScheduler {
    jobs: RwLock<HashMap<String, ScheduledJob>>,
    time_source: Arc<dyn TimeSource>,
    cancel: Mutex<Option<CancellationToken>>,
}

impl JobScheduler {
    /// Create a scheduler on the system clock.
    pub fn new() -> Self {
        Self::with_time_source(Arc::new(SystemTimeSource))
    }

    /// Create a scheduler on a custom clock.
    pub fn with_time_source(time_source: Arc<dyn TimeSource>) -> Self {
        Self {
            jobs: RwLock::new(HashMap::new()),
            time_source,
            cancel: Mutex::new(None),
        }
    }

    /// Add a job, or replace the job with the same id.
    ///
    /// The replacement is a single map insert under the write lock; the old
    /// entry cannot fire after this returns.
    pub fn upsert(
        &self,
        id: impl Into<String>,
        weekdays: WeekdaySet,
        time: TimeOfDay,
        callback: Arc<dyn JobCallback>,
    ) -> SchedulerResult<()> {
        let id = id.into();
        let job = ScheduledJob::new(id.clone(), weekdays, time, callback, self.time_source.now())?;
        let cron_expr = job.cron_expr.clone();

        let replaced = self.jobs.write().insert(id.clone(), job).is_some();
        if replaced {
            debug!("Job {} replaced ({})", id, cron_expr);
        } else {
            debug!("Job {} added ({})", id, cron_expr);
        }
        Ok(())
    }

    /// Remove a job. Removing an unknown id is a no-op.
    ///
    /// Returns `true` if a job was removed.
    pub fn remove(&self, id: &str) -> bool {
        let removed = self.jobs.write().remove(id).is_some();
        if removed {
            debug!("Job {} removed", id);
        }
        removed
    }

    pub fn contains(&self, id: &str) -> bool {
        self.jobs.read().contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.jobs.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.jobs.read().is_empty()
    }

    /// Registered job ids, sorted.
    pub fn job_ids(&self) -> Vec<String> {
        let mut ids: Vec<String> = self.jobs.read().keys().cloned().collect();
        ids.sort();
        ids
    }

    /// Snapshot of every registered job, sorted by id.
    pub fn list_jobs(&self) -> Vec<JobInfo> {
        let now = self.time_source.now();
        let mut infos: Vec<JobInfo> = self.jobs.read().values().map(|j| j.info(now)).collect();
        infos.sort_by(|a, b| a.id.cmp(&b.id));
        infos
    }

    /// Fire every job due at the current time.
    pub fn tick(&self) -> Vec<FiredJob> {
        self.tick_at(self.time_source.now())
    }

    /// Fire every job due in the minute containing `now`.
    ///
    /// Each callback runs on its own task. Must be called within a tokio
    /// runtime.
    pub fn tick_at(&self, now: DateTime<Local>) -> Vec<FiredJob> {
        let minute = truncate_to_minute(now);

        let due: Vec<(String, Arc<dyn JobCallback>)> = {
            let mut jobs = self.jobs.write();
            jobs.values_mut()
                .filter(|job| job.is_due(minute))
                .map(|job| {
                    job.mark_fired(minute);
                    (job.id.clone(), job.callback.clone())
                })
                .collect()
        };

        due.into_iter()
            .map(|(job_id, callback)| {
                debug!("Job {} firing at {}", job_id, minute.format("%a %H:%M"));
                let id = job_id.clone();
                let handle = tokio::spawn(async move {
                    callback.run(&id).await;
                });
                FiredJob { job_id, handle }
            })
            .collect()
    }

    /// Start the background tick loop.
    ///
    /// Returns `false` if the loop is already running.
    pub fn start(self: &Arc<Self>, interval: Duration) -> bool {
        let token = {
            let mut guard = self.cancel.lock();
            if guard.is_some() {
                return false;
            }
            let token = CancellationToken::new();
            *guard = Some(token.clone());
            token
        };

        let this = Arc::clone(self);
        tokio::spawn(async move {
            info!("JobScheduler started (interval={}ms)", interval.as_millis());

            let mut ticker = tokio::time::interval(interval);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

            loop {
                tokio::select! {
                    _ = token.cancelled() => break,
                    _ = ticker.tick() => {
                        let fired = this.tick();
                        if !fired.is_empty() {
                            debug!("Scheduler tick: {} jobs fired", fired.len());
                        }
                    }
                }
            }

            info!("JobScheduler stopped");
        });

        true
    }

    /// Stop the background tick loop. Jobs stay registered.
    pub fn stop(&self) {
        if let Some(token) = self.cancel.lock().take() {
            token.cancel();
        }
    }

    pub fn is_running(&self) -> bool {
        self.cancel.lock().is_some()
    }
}

impl Default for JobScheduler {
    fn default() -> Self {
        Self::new()
    }
}

fn truncate_to_minute(now: DateTime<Local>) -> DateTime<Local> {
    now - chrono::Duration::seconds(i64::from(now.second()))
        - chrono::Duration::nanoseconds(i64::from(now.nanosecond()))
}

#[cfg(test)]
#[path = "scheduler_tests.rs"]
mod tests;
