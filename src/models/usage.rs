//! Rate-limit usage payloads served by the `/metrics/{api_name}` endpoint.

use serde::{Deserialize, Serialize};

/// Call counter for one rolling window (per-minute or per-day).
///
/// `remaining` is reported by the backend and is expected to equal
/// `limit - current` floored at zero, but nothing here enforces that.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct UsageWindow {
    pub current: u64,
    pub limit: u64,
    pub remaining: u64,
}

impl UsageWindow {
    /// Creates a window with `remaining` derived from `current` and `limit`.
    #[must_use]
    pub fn new(current: u64, limit: u64) -> Self {
        Self {
            current,
            limit,
            remaining: limit.saturating_sub(current),
        }
    }

    /// Percentage of the limit consumed.
    ///
    /// A zero limit is treated as never exceeded and yields `0.0`. The value
    /// is not capped, so an over-limit window reports more than 100.
    pub fn percent(&self) -> f64 {
        if self.limit == 0 {
            return 0.0;
        }
        self.current as f64 / self.limit as f64 * 100.0
    }
}

/// Usage of a single upstream API across both windows.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UsageSnapshot {
    #[serde(rename = "minute_usage")]
    pub minute: UsageWindow,
    #[serde(rename = "daily_usage")]
    pub daily: UsageWindow,
    /// ISO-8601 time the backend produced the counters.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_updated: Option<String>,
}

impl UsageSnapshot {
    pub fn new(minute: UsageWindow, daily: UsageWindow) -> Self {
        Self {
            minute,
            daily,
            last_updated: None,
        }
    }
}
