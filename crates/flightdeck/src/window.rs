//! Time-window resolution for statistics queries.
//!
//! This module maps the dashboard's named window selectors to concrete
//! inclusive calendar-date ranges. Resolution is pure: the current date
//! is always passed in explicitly, never read from an ambient clock.

use chrono::{Duration, NaiveDate};
use serde::{Deserialize, Serialize};

/// Named selector for the date range scoping a statistics query.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WindowMode {
    /// The current calendar day only.
    Today,
    /// The 30 calendar days ending today, inclusive.
    Last30d,
}

impl WindowMode {
    /// Parse a dashboard selector string (`today`, `last30d`).
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "today" => Some(Self::Today),
            "last30d" => Some(Self::Last30d),
            _ => None,
        }
    }

    /// Resolve this window to an inclusive date range anchored at `today`.
    ///
    /// `Last30d` spans 30 calendar days ending at `today`, so the start
    /// is 29 days earlier. The range is anchored to the end date, not a
    /// rolling wall-clock window.
    #[must_use]
    pub fn resolve(self, today: NaiveDate) -> DateRange {
        match self {
            Self::Today => DateRange {
                start: today,
                end: today,
            },
            Self::Last30d => DateRange {
                start: today - Duration::days(29),
                end: today,
            },
        }
    }
}

impl std::fmt::Display for WindowMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Today => write!(f, "today"),
            Self::Last30d => write!(f, "last30d"),
        }
    }
}

/// An inclusive calendar-date range with `start <= end`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
    /// First day of the range.
    pub start: NaiveDate,
    /// Last day of the range.
    pub end: NaiveDate,
}

impl DateRange {
    /// Whether the given date falls inside the range, bounds included.
    #[must_use]
    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }

    /// The start date as an ISO `YYYY-MM-DD` string.
    #[must_use]
    pub fn start_iso(&self) -> String {
        self.start.format("%Y-%m-%d").to_string()
    }

    /// The end date as an ISO `YYYY-MM-DD` string.
    #[must_use]
    pub fn end_iso(&self) -> String {
        self.end.format("%Y-%m-%d").to_string()
    }
}

impl std::fmt::Display for DateRange {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}..{}", self.start_iso(), self.end_iso())
    }
}
