use std::{fmt, str::FromStr};

use chrono::Local;
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const DEFAULT_RELATIVE_VALUE: i64 = 15;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum TimeTab {
    #[default]
    Relative,
    Absolute,
}

#[derive(Debug, Error)]
#[error("unknown time tab '{0}'")]
pub struct ParseTimeTabError(String);

impl FromStr for TimeTab {
    type Err = ParseTimeTabError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "relative" => Ok(Self::Relative),
            "absolute" => Ok(Self::Absolute),
            other => Err(ParseTimeTabError(other.to_string())),
        }
    }
}

impl fmt::Display for TimeTab {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Relative => f.write_str("relative"),
            Self::Absolute => f.write_str("absolute"),
        }
    }
}

// Serialized variant names ("Minutes", ...) are the wire form the console
// stores and sends back verbatim.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum RelativePeriod {
    #[default]
    Minutes,
    Hours,
    Days,
    Weeks,
    Months,
}

#[derive(Debug, Error)]
#[error("unknown relative period '{0}'")]
pub struct ParseRelativePeriodError(String);

impl FromStr for RelativePeriod {
    type Err = ParseRelativePeriodError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Minutes" => Ok(Self::Minutes),
            "Hours" => Ok(Self::Hours),
            "Days" => Ok(Self::Days),
            "Weeks" => Ok(Self::Weeks),
            "Months" => Ok(Self::Months),
            other => Err(ParseRelativePeriodError(other.to_string())),
        }
    }
}

impl fmt::Display for RelativePeriod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Minutes => f.write_str("Minutes"),
            Self::Hours => f.write_str("Hours"),
            Self::Days => f.write_str("Days"),
            Self::Weeks => f.write_str("Weeks"),
            Self::Months => f.write_str("Months"),
        }
    }
}

/// Time window of a search: either "now minus a period" (relative) or
/// explicit start/end date-time strings (absolute).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimeRange {
    pub tab: TimeTab,
    pub start_date: String,
    pub start_time: String,
    pub end_date: String,
    pub end_time: String,
    pub selected_relative_period: RelativePeriod,
    pub selected_relative_value: i64,
    pub selected_full_time: bool,
}

impl Default for TimeRange {
    fn default() -> Self {
        // Dates are kept in the display form the pickers edit (YYYY/MM/DD).
        let today = Local::now().format("%Y/%m/%d").to_string();
        Self {
            tab: TimeTab::Relative,
            start_date: today.clone(),
            start_time: "00:00".to_string(),
            end_date: today,
            end_time: "23:59".to_string(),
            selected_relative_period: RelativePeriod::Minutes,
            selected_relative_value: DEFAULT_RELATIVE_VALUE,
            selected_full_time: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct SearchQuery {
    pub date_range: TimeRange,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct SearchState {
    pub query: SearchQuery,
}
