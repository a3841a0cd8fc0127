//! # DuckDuck Events
//!
//! Maps inbound command names to typed [`Command`]s and dispatches them.
//!
//! | Command | Payload |
//! |---|---|
//! | `hsl` | lighting instruction, forwarded verbatim |
//! | `cct` | lighting instruction with `temperature` rescaled |
//! | `power` | `{"on": bool}` |
//! | `create-alarm`, `update-alarm` | alarm record |
//! | `delete-alarm` | `{"id": ...}` |
//! | `update-sweet-dreams` | `{"dim_light": {"active", "duration"}, "current_lullaby_song_path"}` |
//! | `register` | ignored; resyncs alarms from the backend |

mod command;
mod error;
mod router;

pub use command::{Command, CommandKind, rescale_temperature};
pub use error::EventError;
pub use router::{EventRouter, Handled};
