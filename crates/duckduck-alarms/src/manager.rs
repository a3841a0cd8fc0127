//! Alarm lifecycle on top of the job scheduler.

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::Mutex;
use tracing::{debug, info, warn};

use duckduck_protocols::{Alarm, AlarmId, AlarmSource};
use duckduck_scheduler::JobScheduler;

use crate::actions::{AlarmJob, JobContext};
use crate::derived::{JobRole, derive_jobs, derived_job_id};
use crate::error::ManagerResult;
use crate::sweet_dreams::SweetDreams;

/// Outcome of a resync.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ResyncSummary {
    /// Alarms with jobs registered.
    pub scheduled: usize,
    /// Inactive alarms, which schedule nothing.
    pub inactive: usize,
    /// Alarms rejected as invalid.
    pub rejected: usize,
}

/// Owns the alarm id to derived job id mapping.
///
/// Every operation runs under one lock, so create, update, delete and
/// resync are serialized with each other. The scheduler table is only
/// changed while that lock is held.
pub struct AlarmManager {
    scheduler: Arc<JobScheduler>,
    context: Arc<JobContext>,
    tracked: Mutex<HashMap<AlarmId, Vec<String>>>,
}

impl AlarmManager {
    pub fn new(scheduler: Arc<JobScheduler>, context: Arc<JobContext>) -> Self {
        Self {
            scheduler,
            context,
            tracked: Mutex::new(HashMap::new()),
        }
    }

    pub fn scheduler(&self) -> &Arc<JobScheduler> {
        &self.scheduler
    }

    pub fn sweet_dreams(&self) -> &SweetDreams {
        &self.context.sweet_dreams
    }

    /// Schedule the jobs of `alarm`. Inactive alarms are ignored.
    ///
    /// Returns the number of jobs registered.
    pub fn create(&self, alarm: &Alarm) -> ManagerResult<usize> {
        alarm.validate()?;
        let mut tracked = self.tracked.lock();
        self.create_locked(&mut tracked, alarm)
    }

    /// Replace every job of `alarm`.
    ///
    /// An invalid alarm is rejected before anything is removed.
    pub fn update(&self, alarm: &Alarm) -> ManagerResult<usize> {
        alarm.validate()?;
        let mut tracked = self.tracked.lock();
        self.delete_locked(&mut tracked, &alarm.id);
        self.create_locked(&mut tracked, alarm)
    }

    /// Remove every job of `alarm_id`. Unknown ids are not an error.
    ///
    /// Returns the number of jobs removed.
    pub fn delete(&self, alarm_id: &str) -> usize {
        let mut tracked = self.tracked.lock();
        self.delete_locked(&mut tracked, alarm_id)
    }

    /// Replace all tracked alarms with `alarms`, scheduled in list order.
    ///
    /// Invalid entries are logged and skipped; they do not stop the rest
    /// of the list from being scheduled.
    pub fn resync(&self, alarms: &[Alarm]) -> ResyncSummary {
        let mut tracked = self.tracked.lock();

        let previous: Vec<AlarmId> = tracked.keys().cloned().collect();
        for alarm_id in &previous {
            self.delete_locked(&mut tracked, alarm_id);
        }

        let mut summary = ResyncSummary::default();
        for alarm in alarms {
            let result = alarm
                .validate()
                .map_err(Into::into)
                .and_then(|()| self.create_locked(&mut tracked, alarm));
            match result {
                Ok(0) => summary.inactive += 1,
                Ok(_) => summary.scheduled += 1,
                Err(e) => {
                    warn!("Resync skipped alarm {}: {}", alarm.id, e);
                    summary.rejected += 1;
                }
            }
        }

        info!(
            "Resync complete: {} scheduled, {} inactive, {} rejected (previously {})",
            summary.scheduled,
            summary.inactive,
            summary.rejected,
            previous.len()
        );
        summary
    }

    /// Fetch the alarm list from `source`, then resync.
    ///
    /// A failed fetch leaves the current jobs untouched.
    pub async fn resync_from(&self, source: &dyn AlarmSource) -> ManagerResult<ResyncSummary> {
        let alarms = source.fetch_alarms().await?;
        debug!("Fetched {} alarms", alarms.len());
        Ok(self.resync(&alarms))
    }

    /// Ids of alarms with registered jobs, sorted.
    pub fn tracked_alarms(&self) -> Vec<AlarmId> {
        let mut ids: Vec<AlarmId> = self.tracked.lock().keys().cloned().collect();
        ids.sort();
        ids
    }

    /// Job ids registered for `alarm_id`.
    pub fn jobs_for(&self, alarm_id: &str) -> Vec<String> {
        self.tracked
            .lock()
            .get(alarm_id)
            .cloned()
            .unwrap_or_default()
    }

    fn create_locked(
        &self,
        tracked: &mut HashMap<AlarmId, Vec<String>>,
        alarm: &Alarm,
    ) -> ManagerResult<usize> {
        if !alarm.active {
            debug!("Alarm {} is inactive, nothing scheduled", alarm.id);
            return Ok(0);
        }

        // A repeated create must not leave jobs of the previous version.
        if tracked.contains_key(&alarm.id) {
            self.delete_locked(tracked, &alarm.id);
        }

        let jobs = derive_jobs(alarm, self.context.sweet_dreams.dim_minutes());
        let mut registered: Vec<String> = Vec::with_capacity(jobs.len());

        for job in jobs {
            let callback = Arc::new(AlarmJob::new(job.action, Arc::clone(&self.context)));
            if let Err(e) = self
                .scheduler
                .upsert(job.id.clone(), job.weekdays, job.time, callback)
            {
                for id in &registered {
                    self.scheduler.remove(id);
                }
                return Err(e.into());
            }
            debug!("Alarm {}: {} job {} at {}", alarm.id, job.role, job.id, job.time);
            registered.push(job.id);
        }

        info!("Alarm {} scheduled ({} jobs)", alarm.id, registered.len());
        let count = registered.len();
        tracked.insert(alarm.id.clone(), registered);
        Ok(count)
    }

    fn delete_locked(&self, tracked: &mut HashMap<AlarmId, Vec<String>>, alarm_id: &str) -> usize {
        tracked.remove(alarm_id);

        let removed = JobRole::ALL
            .iter()
            .filter(|role| {
                let id = derived_job_id(**role, alarm_id);
                self.scheduler.contains(&id) && self.scheduler.remove(&id)
            })
            .count();

        if removed > 0 {
            info!("Alarm {} unscheduled ({} jobs)", alarm_id, removed);
        }
        removed
    }
}

#[cfg(test)]
#[path = "manager_tests.rs"]
mod tests;
