//! # DuckDuck Protocols
//!
//! Shared value types and collaborator traits for the DuckDuck lighting agent.
//! Contains only definitions - no transport or HTTP implementations.
//!
//! ## Core Types
//!
//! - [`WeekdaySet`] - Ordered set of weekdays with cron serialization
//! - [`TimeOfDay`] - Hour/minute pair with wrapping arithmetic
//! - [`Alarm`] - User-facing sleep/wake alarm record
//!
//! ## Collaborator Traits
//!
//! - [`IlluminationClient`] - Local lighting service
//! - [`NotificationPublisher`] - Outbound pub/sub notifications
//! - [`AlarmSource`] - Backend list of alarms used for resync

pub mod alarm_source;
pub mod error;
pub mod illumination;
pub mod publisher;
pub mod types;

pub use alarm_source::AlarmSource;
pub use error::{AlarmError, IlluminationError, PublishError, SourceError};
pub use illumination::{IlluminationClient, SUNRISE_RAMP_STEPS};
pub use publisher::{NotificationPublisher, topics};
pub use types::*;
