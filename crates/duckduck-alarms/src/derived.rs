//! Alarm to derived job projection.

use std::fmt;

use duckduck_protocols::{Alarm, AlarmId, TimeOfDay, WeekdaySet};

use crate::sunrise::SunriseProfile;

/// Role of a derived job within its alarm.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum JobRole {
    Wake,
    Dim,
    PowerOff,
    Sunrise,
}

impl JobRole {
    pub const ALL: [JobRole; 4] = [
        JobRole::Wake,
        JobRole::Dim,
        JobRole::PowerOff,
        JobRole::Sunrise,
    ];

    /// One-letter prefix of the job id.
    pub fn prefix(self) -> char {
        match self {
            JobRole::Wake => 'w',
            JobRole::Dim => 'd',
            JobRole::PowerOff => 'o',
            JobRole::Sunrise => 's',
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            JobRole::Wake => "wake",
            JobRole::Dim => "dim",
            JobRole::PowerOff => "power-off",
            JobRole::Sunrise => "sunrise",
        }
    }
}

impl fmt::Display for JobRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Scheduler id of the `role` job of `alarm_id`.
///
/// Used by both the create and delete paths.
pub fn derived_job_id(role: JobRole, alarm_id: &str) -> String {
    format!("{}{}", role.prefix(), alarm_id)
}

/// What a derived job does when it fires.
#[derive(Debug, Clone, PartialEq)]
pub enum JobAction {
    /// Publish `alarm-triggered` for the alarm.
    WakeTrigger { alarm_id: AlarmId },
    /// Dim the lamp and publish `sweet-dreams` with the current lullaby.
    Dim,
    /// Power the lamp off and publish an empty `sweet-dreams`.
    PowerOff,
    /// Start the sunrise ramp.
    Sunrise { time_unit: f64 },
}

/// One recurring job computed from an alarm.
#[derive(Debug, Clone, PartialEq)]
pub struct DerivedJob {
    pub id: String,
    pub role: JobRole,
    pub weekdays: WeekdaySet,
    pub time: TimeOfDay,
    pub action: JobAction,
}

/// All jobs derived from one alarm, in role order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DerivedJobSet {
    jobs: Vec<DerivedJob>,
}

impl DerivedJobSet {
    pub fn jobs(&self) -> &[DerivedJob] {
        &self.jobs
    }

    pub fn get(&self, role: JobRole) -> Option<&DerivedJob> {
        self.jobs.iter().find(|job| job.role == role)
    }

    pub fn ids(&self) -> Vec<String> {
        self.jobs.iter().map(|job| job.id.clone()).collect()
    }

    pub fn len(&self) -> usize {
        self.jobs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.jobs.is_empty()
    }
}

impl IntoIterator for DerivedJobSet {
    type Item = DerivedJob;
    type IntoIter = std::vec::IntoIter<DerivedJob>;

    fn into_iter(self) -> Self::IntoIter {
        self.jobs.into_iter()
    }
}

/// Compute the jobs for `alarm`.
///
/// Inactive alarms derive nothing. The dim job fires `dim_minutes` before
/// bed time; every repeat day is shifted back once per calendar day that
/// subtraction crosses. The sunrise job keeps the unshifted repeat days,
/// so a ramp starting before midnight runs on the evening of the alarm day.
pub fn derive_jobs(alarm: &Alarm, dim_minutes: u32) -> DerivedJobSet {
    if !alarm.active {
        return DerivedJobSet::default();
    }

    let mut jobs = Vec::with_capacity(4);

    jobs.push(DerivedJob {
        id: derived_job_id(JobRole::Wake, &alarm.id),
        role: JobRole::Wake,
        weekdays: alarm.repeat_days.clone(),
        time: alarm.wake_time,
        action: JobAction::WakeTrigger {
            alarm_id: alarm.id.clone(),
        },
    });

    let (dim_time, days_back) = alarm.bed_time.subtract_minutes_days(dim_minutes);
    let dim_days = alarm.repeat_days.shift_back_by(days_back);
    jobs.push(DerivedJob {
        id: derived_job_id(JobRole::Dim, &alarm.id),
        role: JobRole::Dim,
        weekdays: dim_days,
        time: dim_time,
        action: JobAction::Dim,
    });

    jobs.push(DerivedJob {
        id: derived_job_id(JobRole::PowerOff, &alarm.id),
        role: JobRole::PowerOff,
        weekdays: alarm.repeat_days.clone(),
        time: alarm.bed_time,
        action: JobAction::PowerOff,
    });

    if let Some(window) = &alarm.sunrise {
        let profile = SunriseProfile::from(window);
        jobs.push(DerivedJob {
            id: derived_job_id(JobRole::Sunrise, &alarm.id),
            role: JobRole::Sunrise,
            weekdays: alarm.repeat_days.clone(),
            time: profile.start(),
            action: JobAction::Sunrise {
                time_unit: profile.time_unit(),
            },
        });
    }

    DerivedJobSet { jobs }
}

#[cfg(test)]
#[path = "derived_tests.rs"]
mod tests;
