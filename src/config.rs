//! Application configuration loaded from environment variables.
//!
//! Every variable is optional:
//! - `STOCKMETER_API_URL`: backend base URL (default `http://localhost:8000/api`)
//! - `STOCKMETER_SYMBOL`: symbol fetched on startup (default `AAPL`)
//! - `STOCKMETER_PERIOD`: one of `1d`, `5d`, `1mo`, `3mo`, `6mo`, `1y` (default `1mo`)
//! - `STOCKMETER_POLL_INTERVAL_SECS`: usage polling cadence (default 5)
//! - `STOCKMETER_REQUEST_TIMEOUT_SECS`: per-request HTTP timeout (default 10)
//! - `STOCKMETER_USAGE_POLLS`: usage ticks the binary runs before exiting (default 3)
//!
//! Empty values are treated as absent.

use std::str::FromStr;
use std::time::Duration;

use crate::models::Period;

/// Default backend endpoint, matching the development server layout.
const DEFAULT_API_URL: &str = "http://localhost:8000/api";

const DEFAULT_SYMBOL: &str = "AAPL";
const DEFAULT_POLL_INTERVAL_SECS: u64 = 5;
const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 10;
const DEFAULT_USAGE_POLLS: u32 = 3;

/// Top-level application configuration.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub backend: BackendConfig,
    pub dashboard: DashboardConfig,
}

/// Where and how to reach the backend.
#[derive(Debug, Clone)]
pub struct BackendConfig {
    pub api_url: String,
    pub request_timeout: Duration,
}

/// What the headless dashboard shows and how often it refreshes.
#[derive(Debug, Clone)]
pub struct DashboardConfig {
    pub symbol: String,
    pub period: Period,
    pub poll_interval: Duration,
    pub usage_polls: u32,
}

/// Loads the application configuration from the process environment.
///
/// # Errors
///
/// Returns [`StockmeterError::Config`](crate::StockmeterError::Config) if a
/// numeric variable or `STOCKMETER_PERIOD` cannot be parsed, or if a
/// duration is zero.
pub fn fetch_config() -> crate::Result<AppConfig> {
    config_from(|name| std::env::var(name).ok())
}

/// Builds the configuration from an arbitrary variable lookup.
///
/// [`fetch_config`] passes the process environment; tests pass a map.
pub fn config_from<F>(lookup: F) -> crate::Result<AppConfig>
where
    F: Fn(&str) -> Option<String>,
{
    let var = |name: &str| lookup(name).filter(|s| !s.trim().is_empty());

    let api_url = var("STOCKMETER_API_URL")
        .map(|url| url.trim_end_matches('/').to_string())
        .unwrap_or_else(|| DEFAULT_API_URL.to_string());

    let symbol = var("STOCKMETER_SYMBOL")
        .map(|s| s.trim().to_uppercase())
        .unwrap_or_else(|| DEFAULT_SYMBOL.to_string());

    let period = match var("STOCKMETER_PERIOD") {
        Some(raw) => raw.trim().parse::<Period>().map_err(|e| {
            crate::StockmeterError::Config(format!("STOCKMETER_PERIOD: {e}"))
        })?,
        None => Period::default(),
    };

    let poll_secs = parse_var(
        "STOCKMETER_POLL_INTERVAL_SECS",
        var("STOCKMETER_POLL_INTERVAL_SECS"),
        DEFAULT_POLL_INTERVAL_SECS,
    )?;
    let timeout_secs = parse_var(
        "STOCKMETER_REQUEST_TIMEOUT_SECS",
        var("STOCKMETER_REQUEST_TIMEOUT_SECS"),
        DEFAULT_REQUEST_TIMEOUT_SECS,
    )?;
    let usage_polls = parse_var(
        "STOCKMETER_USAGE_POLLS",
        var("STOCKMETER_USAGE_POLLS"),
        DEFAULT_USAGE_POLLS,
    )?;

    for (name, secs) in [
        ("STOCKMETER_POLL_INTERVAL_SECS", poll_secs),
        ("STOCKMETER_REQUEST_TIMEOUT_SECS", timeout_secs),
    ] {
        if secs == 0 {
            return Err(crate::StockmeterError::Config(format!(
                "{name} must be greater than zero"
            )));
        }
    }

    Ok(AppConfig {
        backend: BackendConfig {
            api_url,
            request_timeout: Duration::from_secs(timeout_secs),
        },
        dashboard: DashboardConfig {
            symbol,
            period,
            poll_interval: Duration::from_secs(poll_secs),
            usage_polls,
        },
    })
}

/// Parses an optional variable, falling back to `default` when absent.
fn parse_var<T>(name: &str, raw: Option<String>, default: T) -> crate::Result<T>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match raw {
        Some(raw) => raw.trim().parse::<T>().map_err(|e| {
            crate::StockmeterError::Config(format!("{name}: invalid value {raw:?}: {e}"))
        }),
        None => Ok(default),
    }
}
