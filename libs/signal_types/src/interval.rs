//! Bar intervals and history lookback windows

use crate::error::ConfigurationError;
use chrono::{DateTime, Duration, Months, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Resolution of the bars requested from a provider
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Interval {
    Min5,
    Min15,
    Hour1,
    Day1,
}

impl Interval {
    pub fn as_str(&self) -> &'static str {
        match self {
            Interval::Min5 => "5m",
            Interval::Min15 => "15m",
            Interval::Hour1 => "60m",
            Interval::Day1 => "1d",
        }
    }

    /// Nominal length of one bar
    pub fn duration(&self) -> Duration {
        match self {
            Interval::Min5 => Duration::minutes(5),
            Interval::Min15 => Duration::minutes(15),
            Interval::Hour1 => Duration::hours(1),
            Interval::Day1 => Duration::days(1),
        }
    }
}

impl fmt::Display for Interval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Interval {
    type Err = ConfigurationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "5m" => Ok(Interval::Min5),
            "15m" => Ok(Interval::Min15),
            "60m" | "1h" => Ok(Interval::Hour1),
            "1d" => Ok(Interval::Day1),
            other => Err(ConfigurationError::UnsupportedInterval(other.to_string())),
        }
    }
}

impl TryFrom<String> for Interval {
    type Error = ConfigurationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Interval> for String {
    fn from(interval: Interval) -> Self {
        interval.as_str().to_string()
    }
}

/// How far back from "now" a strategy looks, written `10d` or `1mo`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Lookback {
    Days(u32),
    Months(u32),
}

impl Lookback {
    /// Start of the window ending at `now`.
    ///
    /// Month arithmetic is calendar-aware and clamps to the last valid day
    /// (March 31st minus one month is the end of February).
    pub fn start_from(&self, now: DateTime<Utc>) -> DateTime<Utc> {
        match *self {
            Lookback::Days(days) => now - Duration::days(i64::from(days)),
            Lookback::Months(months) => now
                .checked_sub_months(Months::new(months))
                .unwrap_or(DateTime::<Utc>::MIN_UTC),
        }
    }
}

impl fmt::Display for Lookback {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Lookback::Days(n) => write!(f, "{}d", n),
            Lookback::Months(n) => write!(f, "{}mo", n),
        }
    }
}

impl FromStr for Lookback {
    type Err = ConfigurationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let unsupported = || ConfigurationError::UnsupportedDuration(s.to_string());
        let trimmed = s.trim();

        let (digits, build): (&str, fn(u32) -> Lookback) =
            if let Some(digits) = trimmed.strip_suffix("mo") {
                (digits, Lookback::Months)
            } else if let Some(digits) = trimmed.strip_suffix('d') {
                (digits, Lookback::Days)
            } else {
                return Err(unsupported());
            };

        digits.parse::<u32>().map(build).map_err(|_| unsupported())
    }
}

impl TryFrom<String> for Lookback {
    type Error = ConfigurationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Lookback> for String {
    fn from(lookback: Lookback) -> Self {
        lookback.to_string()
    }
}
