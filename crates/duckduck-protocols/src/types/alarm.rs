//! Alarm records as delivered by the backend and the command channel.

use serde::{Deserialize, Deserializer, Serialize};

use super::{TimeOfDay, WeekdaySet};
use crate::error::AlarmError;

/// Unique alarm identifier, stable across updates.
pub type AlarmId = String;

/// A recurring sleep/wake alarm.
///
/// Wire keys are camelCase (`wakeTime`, `bedTime`, `repeatDays`); the id may
/// arrive as a string or a number.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Alarm {
    #[serde(deserialize_with = "deserialize_id")]
    pub id: AlarmId,
    pub wake_time: TimeOfDay,
    pub bed_time: TimeOfDay,
    pub repeat_days: WeekdaySet,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sunrise: Option<SunriseWindow>,
    pub active: bool,
}

/// Start and peak of a sunrise light ramp.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SunriseWindow {
    pub start_time: TimeOfDay,
    pub peak_time: TimeOfDay,
}

/// Reference to an alarm by id, as carried by delete commands.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AlarmRef {
    #[serde(deserialize_with = "deserialize_id")]
    pub id: AlarmId,
}

impl Alarm {
    /// Parse an alarm record from a JSON payload and validate it.
    pub fn from_json(payload: &[u8]) -> Result<Self, AlarmError> {
        let alarm: Alarm = serde_json::from_slice(payload)?;
        alarm.validate()?;
        Ok(alarm)
    }

    /// Check invariants that serde cannot express.
    ///
    /// Active alarms need at least one repeat day; inactive ones schedule
    /// nothing, so their day set is not checked.
    pub fn validate(&self) -> Result<(), AlarmError> {
        if self.id.is_empty() {
            return Err(AlarmError::Malformed("alarm id is empty".to_string()));
        }
        if self.active && self.repeat_days.is_empty() {
            return Err(AlarmError::EmptyRepeatDays {
                alarm_id: self.id.clone(),
            });
        }
        Ok(())
    }
}

fn deserialize_id<'de, D>(deserializer: D) -> Result<AlarmId, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawId {
        Text(String),
        Number(i64),
    }

    Ok(match RawId::deserialize(deserializer)? {
        RawId::Text(s) => s,
        RawId::Number(n) => n.to_string(),
    })
}

#[cfg(test)]
#[path = "alarm_tests.rs"]
mod tests;
