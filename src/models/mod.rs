//! Shared models for the stock dashboard backend.
//!
//! Contains the chart periods and API names used to address backend
//! endpoints, plus the usage and stock payload types in submodules.

pub mod stock;
pub mod usage;

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Chart history ranges the backend accepts as its `period` query parameter.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Period {
    #[serde(rename = "1d")]
    OneDay,
    #[serde(rename = "5d")]
    FiveDays,
    #[default]
    #[serde(rename = "1mo")]
    OneMonth,
    #[serde(rename = "3mo")]
    ThreeMonths,
    #[serde(rename = "6mo")]
    SixMonths,
    #[serde(rename = "1y")]
    OneYear,
}

impl Period {
    /// Every selectable period, in the order the period picker lists them.
    pub const ALL: [Period; 6] = [
        Period::OneDay,
        Period::FiveDays,
        Period::OneMonth,
        Period::ThreeMonths,
        Period::SixMonths,
        Period::OneYear,
    ];

    /// Returns the wire-format period string expected by the backend.
    pub fn as_str(&self) -> &'static str {
        match self {
            Period::OneDay => "1d",
            Period::FiveDays => "5d",
            Period::OneMonth => "1mo",
            Period::ThreeMonths => "3mo",
            Period::SixMonths => "6mo",
            Period::OneYear => "1y",
        }
    }
}

impl fmt::Display for Period {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A period string outside the fixed set.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown period {0:?}, expected one of 1d, 5d, 1mo, 3mo, 6mo, 1y")]
pub struct UnknownPeriod(pub String);

impl FromStr for Period {
    type Err = UnknownPeriod;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Period::ALL
            .into_iter()
            .find(|p| p.as_str() == s)
            .ok_or_else(|| UnknownPeriod(s.to_string()))
    }
}

/// Upstream market-data APIs whose call usage the backend meters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ApiName {
    AlphaVantage,
    Finnhub,
    YahooFinance,
}

impl ApiName {
    pub const ALL: [ApiName; 3] = [ApiName::AlphaVantage, ApiName::Finnhub, ApiName::YahooFinance];

    /// Returns the name used in the `/metrics/{api_name}` path.
    pub fn as_str(&self) -> &'static str {
        match self {
            ApiName::AlphaVantage => "ALPHA_VANTAGE",
            ApiName::Finnhub => "FINNHUB",
            ApiName::YahooFinance => "YAHOO_FINANCE",
        }
    }

    /// Card title: the wire name with its first underscore turned into a space.
    pub fn display_name(&self) -> String {
        self.as_str().replacen('_', " ", 1)
    }
}

impl fmt::Display for ApiName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn period_round_trips_through_wire_string() {
        for period in Period::ALL {
            assert_eq!(period.as_str().parse::<Period>(), Ok(period));
        }
    }

    #[test]
    fn period_rejects_unknown_string() {
        assert_eq!("2y".parse::<Period>(), Err(UnknownPeriod("2y".into())));
        assert!("1MO".parse::<Period>().is_err());
    }

    #[test]
    fn period_defaults_to_one_month() {
        assert_eq!(Period::default(), Period::OneMonth);
        assert_eq!(serde_json::to_string(&Period::OneMonth).unwrap(), r#""1mo""#);
    }

    #[test]
    fn api_name_display() {
        assert_eq!(ApiName::YahooFinance.display_name(), "YAHOO FINANCE");
        assert_eq!(ApiName::Finnhub.display_name(), "FINNHUB");
        assert_eq!(
            serde_json::to_string(&ApiName::AlphaVantage).unwrap(),
            r#""ALPHA_VANTAGE""#
        );
    }
}
