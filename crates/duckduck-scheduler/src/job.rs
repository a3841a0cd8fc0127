//! Scheduled job entries.

use std::str::FromStr;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Local};
use cron::Schedule;
use tokio::task::JoinHandle;

use duckduck_protocols::{TimeOfDay, WeekdaySet};

use crate::error::{SchedulerError, SchedulerResult};

/// Work performed when a job fires.
///
/// Runs on its own task; a slow or panicking callback does not hold up
/// other jobs or the tick loop.
#[async_trait]
pub trait JobCallback: Send + Sync {
    async fn run(&self, job_id: &str);
}

#[async_trait]
impl<F> JobCallback for F
where
    F: Fn(&str) + Send + Sync,
{
    async fn run(&self, job_id: &str) {
        self(job_id)
    }
}

/// Build the 6-field cron expression (`sec min hour dom month dow`) for a
/// job firing at `time` on `weekdays`.
pub fn cron_expression(weekdays: &WeekdaySet, time: TimeOfDay) -> String {
    format!(
        "0 {} {} * * {}",
        time.minute(),
        time.hour(),
        weekdays.to_cron_expression()
    )
}

/// Diagnostic snapshot of a registered job.
#[derive(Debug, Clone, PartialEq)]
pub struct JobInfo {
    pub id: String,
    pub cron_expr: String,
    pub weekdays: WeekdaySet,
    pub time: TimeOfDay,
    pub next_fire: Option<DateTime<Local>>,
    pub fire_count: u64,
}

/// A job spawned by a tick.
#[derive(Debug)]
pub struct FiredJob {
    pub job_id: String,
    pub handle: JoinHandle<()>,
}

/// A job entry in the scheduler table.
pub(crate) struct ScheduledJob {
    pub(crate) id: String,
    pub(crate) weekdays: WeekdaySet,
    pub(crate) time: TimeOfDay,
    pub(crate) cron_expr: String,
    pub(crate) schedule: Schedule,
    pub(crate) callback: Arc<dyn JobCallback>,
    /// Occurrences at or before this instant never fire.
    pub(crate) armed_at: DateTime<Local>,
    /// Minute of the most recent fire.
    pub(crate) last_fired: Option<DateTime<Local>>,
    pub(crate) fire_count: u64,
}

impl ScheduledJob {
    pub(crate) fn new(
        id: String,
        weekdays: WeekdaySet,
        time: TimeOfDay,
        callback: Arc<dyn JobCallback>,
        armed_at: DateTime<Local>,
    ) -> SchedulerResult<Self> {
        if weekdays.is_empty() {
            return Err(SchedulerError::EmptyWeekdays(id));
        }

        let cron_expr = cron_expression(&weekdays, time);
        let schedule =
            Schedule::from_str(&cron_expr).map_err(|e| SchedulerError::InvalidSchedule {
                job_id: id.clone(),
                expr: cron_expr.clone(),
                message: e.to_string(),
            })?;

        Ok(Self {
            id,
            weekdays,
            time,
            cron_expr,
            schedule,
            callback,
            armed_at,
            last_fired: None,
            fire_count: 0,
        })
    }

    /// Whether the job is due in the minute starting at `minute`.
    ///
    /// `minute` must already be truncated to a whole minute.
    pub(crate) fn is_due(&self, minute: DateTime<Local>) -> bool {
        if minute < self.armed_at {
            return false;
        }
        if self.last_fired == Some(minute) {
            return false;
        }
        self.schedule.includes(minute)
    }

    pub(crate) fn mark_fired(&mut self, minute: DateTime<Local>) {
        self.last_fired = Some(minute);
        self.fire_count += 1;
    }

    pub(crate) fn info(&self, now: DateTime<Local>) -> JobInfo {
        JobInfo {
            id: self.id.clone(),
            cron_expr: self.cron_expr.clone(),
            weekdays: self.weekdays.clone(),
            time: self.time,
            next_fire: self.schedule.after(&now).next(),
            fire_count: self.fire_count,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Datelike, Duration, TimeZone, Timelike};
    use duckduck_protocols::Weekday;

    fn local(y: i32, mo: u32, d: u32, h: u32, mi: u32) -> DateTime<Local> {
        Local.with_ymd_and_hms(y, mo, d, h, mi, 0).single().unwrap()
    }

    fn noop() -> Arc<dyn JobCallback> {
        Arc::new(|_: &str| {})
    }

    #[test]
    fn test_cron_expression_full_week() {
        let expr = cron_expression(&WeekdaySet::full_week(), TimeOfDay::new(7, 0).unwrap());
        assert_eq!(expr, "0 0 7 * * *");
    }

    #[test]
    fn test_cron_expression_partial_week() {
        let days = WeekdaySet::from_days([Weekday::Sat, Weekday::Sun]);
        let expr = cron_expression(&days, TimeOfDay::new(21, 59).unwrap());
        assert_eq!(expr, "0 59 21 * * sat,sun");
    }

    #[test]
    fn test_empty_weekdays_rejected() {
        let result = ScheduledJob::new(
            "w1".to_string(),
            WeekdaySet::new(),
            TimeOfDay::new(7, 0).unwrap(),
            noop(),
            Local::now(),
        );
        assert!(matches!(result, Err(SchedulerError::EmptyWeekdays(_))));
    }

    #[test]
    fn test_is_due_matches_weekday_and_time() {
        // 2024-01-01 was a Monday.
        let armed = local(2023, 12, 31, 0, 0);
        let job = ScheduledJob::new(
            "w1".to_string(),
            WeekdaySet::from_days([Weekday::Mon]),
            TimeOfDay::new(7, 0).unwrap(),
            noop(),
            armed,
        )
        .unwrap();

        let monday = local(2024, 1, 1, 7, 0);
        assert_eq!(monday.weekday(), chrono::Weekday::Mon);
        assert!(job.is_due(monday));
        assert!(!job.is_due(local(2024, 1, 1, 7, 1)));
        assert!(!job.is_due(local(2024, 1, 2, 7, 0)));
    }

    #[test]
    fn test_not_due_before_armed() {
        let job = ScheduledJob::new(
            "w1".to_string(),
            WeekdaySet::full_week(),
            TimeOfDay::new(7, 0).unwrap(),
            noop(),
            local(2024, 1, 1, 7, 0) + Duration::seconds(10),
        )
        .unwrap();

        assert!(!job.is_due(local(2024, 1, 1, 7, 0)));
        assert!(job.is_due(local(2024, 1, 2, 7, 0)));
    }

    #[test]
    fn test_fires_once_per_minute() {
        let mut job = ScheduledJob::new(
            "w1".to_string(),
            WeekdaySet::full_week(),
            TimeOfDay::new(7, 0).unwrap(),
            noop(),
            local(2024, 1, 1, 0, 0),
        )
        .unwrap();

        let minute = local(2024, 1, 1, 7, 0);
        assert!(job.is_due(minute));
        job.mark_fired(minute);
        assert!(!job.is_due(minute));
        assert_eq!(job.fire_count, 1);

        let next_day = local(2024, 1, 2, 7, 0);
        assert!(job.is_due(next_day));
    }

    #[test]
    fn test_info_next_fire() {
        let job = ScheduledJob::new(
            "o1".to_string(),
            WeekdaySet::full_week(),
            TimeOfDay::new(22, 0).unwrap(),
            noop(),
            local(2024, 1, 1, 0, 0),
        )
        .unwrap();

        let info = job.info(local(2024, 1, 1, 12, 0));
        assert_eq!(info.id, "o1");
        assert_eq!(info.cron_expr, "0 0 22 * * *");
        let next = info.next_fire.unwrap();
        assert_eq!((next.hour(), next.minute()), (22, 0));
        assert_eq!(next.day(), 1);
    }
}
