//! Value types shared across the agent.

mod alarm;
mod time_of_day;
mod weekday;

pub use alarm::*;
pub use time_of_day::*;
pub use weekday::*;
