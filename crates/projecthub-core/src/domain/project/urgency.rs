//! Urgency classification derived from a project's declared duration

use serde::{Deserialize, Serialize};
use std::fmt;

/// Longest duration (in months) still classified as [`Urgency::High`]
pub const HIGH_URGENCY_MAX_MONTHS: u32 = 3;

/// Longest duration (in months) still classified as [`Urgency::Medium`]
pub const MEDIUM_URGENCY_MAX_MONTHS: u32 = 6;

/// Coarse time-pressure tier of a project
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Urgency {
    High,
    Medium,
    Low,
}

impl Urgency {
    /// Convert to string representation
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::High => "High",
            Self::Medium => "Medium",
            Self::Low => "Low",
        }
    }

    /// Classify an optional duration.
    ///
    /// A missing duration (absent, unparsable or negative in the raw
    /// record) falls into the lowest tier.
    pub fn for_duration(duration_months: Option<u32>) -> Self {
        duration_months.map(classify_urgency).unwrap_or(Self::Low)
    }
}

impl fmt::Display for Urgency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Classify a duration in months. Boundaries are inclusive:
/// `<= 3` is High, `<= 6` is Medium, anything longer is Low.
pub fn classify_urgency(duration_months: u32) -> Urgency {
    if duration_months <= HIGH_URGENCY_MAX_MONTHS {
        Urgency::High
    } else if duration_months <= MEDIUM_URGENCY_MAX_MONTHS {
        Urgency::Medium
    } else {
        Urgency::Low
    }
}

/// Parse a string-typed duration field.
///
/// Leading whitespace is skipped and the leading run of digits is taken, so
/// `"12 months"` reads as 12 and `"0"` as 0 (High). Returns `None` when no
/// digits lead the value, which covers negative values.
pub fn parse_duration(raw: &str) -> Option<u32> {
    let digits: String = raw
        .trim_start()
        .trim_start_matches('+')
        .chars()
        .take_while(|c| c.is_ascii_digit())
        .collect();

    digits.parse::<u32>().ok()
}
