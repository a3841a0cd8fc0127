//! Typed inbound commands.

use std::fmt;

use serde::Deserialize;
use serde_json::Value;

use duckduck_alarms::SweetDreamsUpdate;
use duckduck_protocols::{Alarm, AlarmId, AlarmRef};

use crate::error::EventError;

/// Name of an inbound command, as carried in the topic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CommandKind {
    Hsl,
    Cct,
    Power,
    CreateAlarm,
    UpdateAlarm,
    DeleteAlarm,
    UpdateSweetDreams,
    Register,
}

impl CommandKind {
    pub const ALL: [CommandKind; 8] = [
        CommandKind::Hsl,
        CommandKind::Cct,
        CommandKind::Power,
        CommandKind::CreateAlarm,
        CommandKind::UpdateAlarm,
        CommandKind::DeleteAlarm,
        CommandKind::UpdateSweetDreams,
        CommandKind::Register,
    ];

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.name() == name)
    }

    pub fn name(self) -> &'static str {
        match self {
            CommandKind::Hsl => "hsl",
            CommandKind::Cct => "cct",
            CommandKind::Power => "power",
            CommandKind::CreateAlarm => "create-alarm",
            CommandKind::UpdateAlarm => "update-alarm",
            CommandKind::DeleteAlarm => "delete-alarm",
            CommandKind::UpdateSweetDreams => "update-sweet-dreams",
            CommandKind::Register => "register",
        }
    }
}

impl fmt::Display for CommandKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A parsed inbound command.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Hsl(Value),
    /// Instruction with `temperature` already rescaled.
    Cct(Value),
    Power(bool),
    CreateAlarm(Alarm),
    UpdateAlarm(Alarm),
    DeleteAlarm(AlarmId),
    UpdateSweetDreams(SweetDreamsUpdate),
    Register,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum PowerPayload {
    Flag(bool),
    Object {
        #[serde(alias = "power")]
        on: bool,
    },
}

impl Command {
    /// Parse the JSON `payload` of a `kind` command.
    pub fn parse(kind: CommandKind, payload: &[u8]) -> Result<Self, EventError> {
        let name = kind.name();
        let command = match kind {
            CommandKind::Hsl => Command::Hsl(parse_json(name, payload)?),
            CommandKind::Cct => Command::Cct(rescale_temperature(parse_json(name, payload)?)?),
            CommandKind::Power => match parse_json(name, payload)? {
                PowerPayload::Flag(on) | PowerPayload::Object { on } => Command::Power(on),
            },
            CommandKind::CreateAlarm => {
                Command::CreateAlarm(Alarm::from_json(payload).map_err(|e| EventError::malformed(name, e))?)
            }
            CommandKind::UpdateAlarm => {
                Command::UpdateAlarm(Alarm::from_json(payload).map_err(|e| EventError::malformed(name, e))?)
            }
            CommandKind::DeleteAlarm => {
                let alarm: AlarmRef = parse_json(name, payload)?;
                Command::DeleteAlarm(alarm.id)
            }
            CommandKind::UpdateSweetDreams => Command::UpdateSweetDreams(parse_json(name, payload)?),
            CommandKind::Register => Command::Register,
        };
        Ok(command)
    }

    pub fn kind(&self) -> CommandKind {
        match self {
            Command::Hsl(_) => CommandKind::Hsl,
            Command::Cct(_) => CommandKind::Cct,
            Command::Power(_) => CommandKind::Power,
            Command::CreateAlarm(_) => CommandKind::CreateAlarm,
            Command::UpdateAlarm(_) => CommandKind::UpdateAlarm,
            Command::DeleteAlarm(_) => CommandKind::DeleteAlarm,
            Command::UpdateSweetDreams(_) => CommandKind::UpdateSweetDreams,
            Command::Register => CommandKind::Register,
        }
    }
}

fn parse_json<T: for<'de> Deserialize<'de>>(command: &str, payload: &[u8]) -> Result<T, EventError> {
    serde_json::from_slice(payload).map_err(|e| EventError::malformed(command, e))
}

/// Map the user-facing `temperature` of a cct instruction onto the
/// illumination service's scale (`temperature / 50 - 60`). Other fields
/// pass through unchanged.
pub fn rescale_temperature(mut data: Value) -> Result<Value, EventError> {
    let object = data
        .as_object_mut()
        .ok_or_else(|| EventError::malformed("cct", "expected a JSON object"))?;
    let temperature = object
        .get("temperature")
        .and_then(Value::as_f64)
        .ok_or_else(|| EventError::malformed("cct", "missing numeric `temperature`"))?;
    object.insert("temperature".to_string(), Value::from(temperature / 50.0 - 60.0));
    Ok(data)
}
