//! # DuckDuck Config
//!
//! Device configuration for the DuckDuck lighting agent: broker credentials,
//! illumination service and backend endpoints, scheduler tuning.

mod error;
mod loader;
mod schema;
mod validator;

pub use error::ConfigError;
pub use loader::{ConfigFormat, ConfigLoader};
pub use schema::*;
pub use validator::{ConfigValidator, ValidationError, ValidationResult, ValidationWarning};
