//! Rate-limit status classification.
//!
//! Turns a [`UsageSnapshot`] into a [`StatusLevel`] using fixed percentage
//! thresholds, and estimates how long until the per-minute window resets.
//! Everything here is a pure function of its inputs; the caller supplies
//! the current time.

use std::fmt;

use chrono::{DateTime, Timelike, Utc};

use crate::models::usage::UsageSnapshot;

/// Usage percentage at or above which a window is critical.
pub const CRITICAL_THRESHOLD: f64 = 90.0;

/// Usage percentage at or above which a window is a warning.
pub const WARNING_THRESHOLD: f64 = 75.0;

const SECS_PER_MINUTE: u32 = 60;

/// Severity of an API's rate-limit usage, ordered from least to most severe.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum StatusLevel {
    #[default]
    Normal,
    Warning,
    Critical,
}

impl StatusLevel {
    /// Classifies a single window's usage percentage.
    pub fn from_percent(percent: f64) -> Self {
        if percent >= CRITICAL_THRESHOLD {
            StatusLevel::Critical
        } else if percent >= WARNING_THRESHOLD {
            StatusLevel::Warning
        } else {
            StatusLevel::Normal
        }
    }

    /// Lowercase label shown in the status badge.
    pub fn label(&self) -> &'static str {
        match self {
            StatusLevel::Normal => "normal",
            StatusLevel::Warning => "warning",
            StatusLevel::Critical => "critical",
        }
    }

    /// Alert banner text, if this level warrants one.
    pub fn alert(&self) -> Option<&'static str> {
        match self {
            StatusLevel::Normal => None,
            StatusLevel::Warning => {
                Some("Approaching rate limit threshold. Consider reducing request frequency.")
            }
            StatusLevel::Critical => {
                Some("Critical rate limit threshold reached. Requests may be rejected.")
            }
        }
    }
}

impl fmt::Display for StatusLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Outcome of [`classify`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct UsageClassification {
    pub status: StatusLevel,
    /// Seconds until the next wall-clock minute boundary, in `1..=60`.
    pub seconds_to_minute_reset: u32,
    pub minute_percent: f64,
    pub daily_percent: f64,
}

/// Classifies a usage snapshot at time `now`.
///
/// The status is the more severe of the two windows' levels. The reset
/// countdown assumes the backend's minute window is aligned to the wall
/// clock; it is an approximation, not the server's actual reset time.
pub fn classify(snapshot: &UsageSnapshot, now: DateTime<Utc>) -> UsageClassification {
    let minute_percent = snapshot.minute.percent();
    let daily_percent = snapshot.daily.percent();

    let status = StatusLevel::from_percent(minute_percent).max(StatusLevel::from_percent(daily_percent));

    UsageClassification {
        status,
        seconds_to_minute_reset: seconds_to_minute_reset(now),
        minute_percent,
        daily_percent,
    }
}

fn seconds_to_minute_reset(now: DateTime<Utc>) -> u32 {
    SECS_PER_MINUTE - (now.second() % SECS_PER_MINUTE)
}
