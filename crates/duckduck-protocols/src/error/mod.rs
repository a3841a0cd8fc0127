//! Error types for the DuckDuck protocol layer.

mod alarm;
mod illumination;
mod publish;
mod source;

pub use alarm::*;
pub use illumination::*;
pub use publish::*;
pub use source::*;
