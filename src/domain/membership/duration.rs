//! Length of a membership period.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::domain::foundation::{Timestamp, ValidationError};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DurationUnit {
    Day,
    Week,
    Month,
    Year,
}

impl DurationUnit {
    fn code(&self) -> char {
        match self {
            DurationUnit::Day => 'd',
            DurationUnit::Week => 'w',
            DurationUnit::Month => 'm',
            DurationUnit::Year => 'y',
        }
    }

    fn label(&self, plural: bool) -> &'static str {
        match (self, plural) {
            (DurationUnit::Day, false) => "day",
            (DurationUnit::Day, true) => "days",
            (DurationUnit::Week, false) => "week",
            (DurationUnit::Week, true) => "weeks",
            (DurationUnit::Month, false) => "month",
            (DurationUnit::Month, true) => "months",
            (DurationUnit::Year, false) => "year",
            (DurationUnit::Year, true) => "years",
        }
    }
}

/// Longest period a membership type may declare, in units.
pub const MAX_DURATION_COUNT: u32 = 1000;

/// A count of calendar units, written `1y`, `6m`, `2w` or `30d`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MembershipDuration {
    count: u32,
    unit: DurationUnit,
}

impl MembershipDuration {
    /// Creates a duration. The count is clamped to `1..=MAX_DURATION_COUNT`.
    pub fn new(count: u32, unit: DurationUnit) -> Self {
        Self {
            count: count.clamp(1, MAX_DURATION_COUNT),
            unit,
        }
    }

    pub fn one_year() -> Self {
        Self::new(1, DurationUnit::Year)
    }

    pub fn count(&self) -> u32 {
        self.count
    }

    pub fn unit(&self) -> DurationUnit {
        self.unit
    }

    /// Last day covered by a period starting at `start`.
    ///
    /// A one-year period starting 2024-03-10 ends 2025-03-09.
    /// Periods past the representable range end on `start`.
    pub fn end_of_period(&self, start: Timestamp) -> Timestamp {
        // Deserialized values skip `new`.
        let count = self.count.min(MAX_DURATION_COUNT);
        let next_start = match self.unit {
            DurationUnit::Day => start.checked_add_days(i64::from(count)),
            DurationUnit::Week => start.checked_add_days(7 * i64::from(count)),
            DurationUnit::Month => start.checked_add_months(count),
            DurationUnit::Year => count
                .checked_mul(12)
                .and_then(|months| start.checked_add_months(months)),
        };
        next_start
            .and_then(|next| next.checked_add_days(-1))
            .unwrap_or(start)
    }

    /// Human readable form, e.g. `1 year` or `6 months`.
    pub fn label(&self) -> String {
        format!("{} {}", self.count, self.unit.label(self.count > 1))
    }
}

impl fmt::Display for MembershipDuration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.count, self.unit.code())
    }
}

impl FromStr for MembershipDuration {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let invalid = || {
            ValidationError::invalid_format("duration", format!("'{}' is not a duration", trimmed))
        };

        let unit_char = trimmed.chars().last().ok_or_else(invalid)?;
        let unit = match unit_char.to_ascii_lowercase() {
            'd' => DurationUnit::Day,
            'w' => DurationUnit::Week,
            'm' => DurationUnit::Month,
            'y' => DurationUnit::Year,
            _ => return Err(invalid()),
        };
        let digits = &trimmed[..trimmed.len() - unit_char.len_utf8()];
        let count = if digits.is_empty() {
            1
        } else {
            digits.parse::<u32>().map_err(|_| invalid())?
        };
        if count > MAX_DURATION_COUNT {
            return Err(ValidationError::out_of_range(
                "duration",
                0,
                MAX_DURATION_COUNT as i64,
                count as i64,
            ));
        }

        Ok(Self::new(count, unit))
    }
}

/// End of the first period for an optional duration; no duration means one year.
pub fn end_of_first_period(duration: Option<MembershipDuration>, start: Timestamp) -> Timestamp {
    duration
        .unwrap_or_else(MembershipDuration::one_year)
        .end_of_period(start)
}
