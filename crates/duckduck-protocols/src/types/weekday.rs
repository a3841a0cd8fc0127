//! Weekday tokens and ordered weekday sets.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::AlarmError;

/// A symbolic day of the week.
///
/// Serialized as the lowercase three-letter token used in cron day-of-week
/// fields (`"sun"`, `"mon"`, ...).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Weekday {
    #[serde(alias = "sunday")]
    Sun,
    #[serde(alias = "monday")]
    Mon,
    #[serde(alias = "tuesday")]
    Tue,
    #[serde(alias = "wednesday")]
    Wed,
    #[serde(alias = "thursday")]
    Thu,
    #[serde(alias = "friday")]
    Fri,
    #[serde(alias = "saturday")]
    Sat,
}

impl Weekday {
    /// All seven days, Sunday first.
    pub const ALL: [Weekday; 7] = [
        Weekday::Sun,
        Weekday::Mon,
        Weekday::Tue,
        Weekday::Wed,
        Weekday::Thu,
        Weekday::Fri,
        Weekday::Sat,
    ];

    /// The cron day token for this day.
    pub fn token(self) -> &'static str {
        match self {
            Weekday::Sun => "sun",
            Weekday::Mon => "mon",
            Weekday::Tue => "tue",
            Weekday::Wed => "wed",
            Weekday::Thu => "thu",
            Weekday::Fri => "fri",
            Weekday::Sat => "sat",
        }
    }

    /// The calendar day before this one.
    pub fn predecessor(self) -> Weekday {
        match self {
            Weekday::Sun => Weekday::Sat,
            Weekday::Mon => Weekday::Sun,
            Weekday::Tue => Weekday::Mon,
            Weekday::Wed => Weekday::Tue,
            Weekday::Thu => Weekday::Wed,
            Weekday::Fri => Weekday::Thu,
            Weekday::Sat => Weekday::Fri,
        }
    }
}

impl fmt::Display for Weekday {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.token())
    }
}

impl FromStr for Weekday {
    type Err = AlarmError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "sun" | "sunday" => Ok(Weekday::Sun),
            "mon" | "monday" => Ok(Weekday::Mon),
            "tue" | "tuesday" => Ok(Weekday::Tue),
            "wed" | "wednesday" => Ok(Weekday::Wed),
            "thu" | "thursday" => Ok(Weekday::Thu),
            "fri" | "friday" => Ok(Weekday::Fri),
            "sat" | "saturday" => Ok(Weekday::Sat),
            _ => Err(AlarmError::UnknownWeekday(s.to_string())),
        }
    }
}

/// An insertion-ordered set of weekdays.
///
/// Order is kept exactly as given because the cron day field is emitted as
/// a token list, not as a canonical set.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "WeekdaySetRepr", into = "Vec<Weekday>")]
pub struct WeekdaySet {
    days: Vec<Weekday>,
}

impl WeekdaySet {
    /// Create an empty set.
    pub fn new() -> Self {
        Self::default()
    }

    /// All seven days, Sunday first.
    pub fn full_week() -> Self {
        Self::from_days(Weekday::ALL)
    }

    /// Build a set from days in order, dropping repeats.
    pub fn from_days(days: impl IntoIterator<Item = Weekday>) -> Self {
        let mut set = Self::new();
        for day in days {
            set.insert(day);
        }
        set
    }

    /// Append a day if it is not already present.
    ///
    /// Returns `true` if the day was added.
    pub fn insert(&mut self, day: Weekday) -> bool {
        if self.days.contains(&day) {
            return false;
        }
        self.days.push(day);
        true
    }

    pub fn contains(&self, day: Weekday) -> bool {
        self.days.contains(&day)
    }

    pub fn len(&self) -> usize {
        self.days.len()
    }

    pub fn is_empty(&self) -> bool {
        self.days.is_empty()
    }

    pub fn is_full_week(&self) -> bool {
        self.days.len() == Weekday::ALL.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = Weekday> + '_ {
        self.days.iter().copied()
    }

    pub fn days(&self) -> &[Weekday] {
        &self.days
    }

    /// Cron day-of-week field: `"*"` for the full week, otherwise the
    /// comma-joined tokens in insertion order.
    pub fn to_cron_expression(&self) -> String {
        if self.is_full_week() {
            return "*".to_string();
        }
        self.days
            .iter()
            .map(|d| d.token())
            .collect::<Vec<_>>()
            .join(",")
    }

    /// Map every day to its calendar predecessor, keeping order.
    pub fn shift_back(&self) -> Self {
        Self {
            days: self.days.iter().map(|d| d.predecessor()).collect(),
        }
    }

    /// Shift every day back by `days` calendar days, keeping order.
    pub fn shift_back_by(&self, days: u32) -> Self {
        (0..days % 7).fold(self.clone(), |set, _| set.shift_back())
    }
}

impl fmt::Display for WeekdaySet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_cron_expression())
    }
}

impl FromStr for WeekdaySet {
    type Err = AlarmError;

    /// Parse a cron day field produced by [`WeekdaySet::to_cron_expression`].
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s == "*" {
            return Ok(Self::full_week());
        }
        if s.is_empty() {
            return Ok(Self::new());
        }
        let days = s
            .split(',')
            .map(Weekday::from_str)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self::from_days(days))
    }
}

impl FromIterator<Weekday> for WeekdaySet {
    fn from_iter<I: IntoIterator<Item = Weekday>>(iter: I) -> Self {
        Self::from_days(iter)
    }
}

impl From<WeekdaySet> for Vec<Weekday> {
    fn from(set: WeekdaySet) -> Self {
        set.days
    }
}

/// Accepted wire shapes for a weekday set: a token list or a cron field.
#[derive(Deserialize)]
#[serde(untagged)]
enum WeekdaySetRepr {
    Days(Vec<Weekday>),
    Field(String),
}

impl TryFrom<WeekdaySetRepr> for WeekdaySet {
    type Error = AlarmError;

    fn try_from(repr: WeekdaySetRepr) -> Result<Self, Self::Error> {
        match repr {
            WeekdaySetRepr::Days(days) => Ok(Self::from_days(days)),
            WeekdaySetRepr::Field(field) => field.parse(),
        }
    }
}

#[cfg(test)]
#[path = "weekday_tests.rs"]
mod tests;
