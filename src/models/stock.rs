//! Stock history payloads served by the `/stock/{symbol}` endpoint.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};

/// Epoch values at or above this magnitude are read as milliseconds.
const EPOCH_MILLIS_CUTOFF: i64 = 100_000_000_000;

/// One OHLCV bar, optionally carrying indicator values computed upstream.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PricePoint {
    /// ISO-8601 or epoch timestamp, kept verbatim for chart axis labels.
    pub timestamp: String,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: u64,
    /// 20-period simple moving average.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sma_20: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub upper_band: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lower_band: Option<f64>,
}

impl PricePoint {
    /// Parses [`timestamp`](Self::timestamp) into UTC.
    ///
    /// Accepts RFC 3339, `YYYY-MM-DD HH:MM:SS`, `YYYY-MM-DDTHH:MM:SS`,
    /// `YYYY-MM-DD`, and integer epoch seconds or milliseconds. Naive
    /// date-times are read as UTC. Returns `None` for anything else.
    pub fn parsed_timestamp(&self) -> Option<DateTime<Utc>> {
        let raw = self.timestamp.trim();

        if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
            return Some(dt.with_timezone(&Utc));
        }
        for format in ["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S%.f"] {
            if let Ok(naive) = NaiveDateTime::parse_from_str(raw, format) {
                return Some(naive.and_utc());
            }
        }
        if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
            return date.and_hms_opt(0, 0, 0).map(|naive| naive.and_utc());
        }

        let epoch: i64 = raw.parse().ok()?;
        if epoch.abs() >= EPOCH_MILLIS_CUTOFF {
            DateTime::from_timestamp_millis(epoch)
        } else {
            DateTime::from_timestamp(epoch, 0)
        }
    }
}

/// Price history plus headline quote figures for one symbol.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StockSnapshot {
    /// Bars in chronological order; may be empty.
    pub prices: Vec<PricePoint>,
    pub current_price: f64,
    /// Signed change versus the previous close, in percent.
    pub change_percent: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub market_cap: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pe_ratio: Option<f64>,
}

/// Which pre-computed indicator series a chart should draw.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ChartOverlays {
    pub sma_20: bool,
    /// Upper and lower Bollinger bands, drawn together.
    pub bands: bool,
}

impl StockSnapshot {
    /// Reports the overlays present, judged from the first bar only.
    pub fn overlays(&self) -> ChartOverlays {
        self.prices
            .first()
            .map(|first| ChartOverlays {
                sma_20: first.sma_20.is_some(),
                bands: first.upper_band.is_some(),
            })
            .unwrap_or_default()
    }

    /// Most recent bar, if any.
    pub fn latest(&self) -> Option<&PricePoint> {
        self.prices.last()
    }
}

#[cfg(test)]
mod tests {
    use chrono::{Datelike, Timelike};

    use super::*;

    fn bar(timestamp: &str) -> PricePoint {
        PricePoint {
            timestamp: timestamp.to_string(),
            open: 1.0,
            high: 2.0,
            low: 0.5,
            close: 1.5,
            volume: 100,
            sma_20: None,
            upper_band: None,
            lower_band: None,
        }
    }

    #[test]
    fn parses_backend_timestamp_format() {
        let ts = bar("2024-03-15 14:30:00").parsed_timestamp().unwrap();
        assert_eq!((ts.year(), ts.month(), ts.day()), (2024, 3, 15));
        assert_eq!((ts.hour(), ts.minute()), (14, 30));
    }

    #[test]
    fn parses_rfc3339_with_offset() {
        let ts = bar("2024-03-15T14:30:00-04:00").parsed_timestamp().unwrap();
        assert_eq!(ts.hour(), 18);
    }

    #[test]
    fn parses_plain_date_and_epochs() {
        let date = bar("2024-03-15").parsed_timestamp().unwrap();
        assert_eq!(date.hour(), 0);

        let secs = bar("1710513000").parsed_timestamp().unwrap();
        let millis = bar("1710513000000").parsed_timestamp().unwrap();
        assert_eq!(secs, millis);
    }

    #[test]
    fn unparsable_timestamp_is_none() {
        assert!(bar("yesterday").parsed_timestamp().is_none());
    }

    #[test]
    fn overlays_follow_first_bar() {
        let mut first = bar("2024-01-01");
        first.sma_20 = Some(10.0);
        let mut second = bar("2024-01-02");
        second.upper_band = Some(12.0);
        second.lower_band = Some(8.0);

        let snapshot = StockSnapshot {
            prices: vec![first, second],
            current_price: 1.5,
            change_percent: 0.0,
            market_cap: None,
            pe_ratio: None,
        };
        assert_eq!(
            snapshot.overlays(),
            ChartOverlays {
                sma_20: true,
                bands: false
            }
        );
        assert_eq!(snapshot.latest().unwrap().timestamp, "2024-01-02");
    }

    #[test]
    fn empty_history_has_no_overlays() {
        let snapshot = StockSnapshot {
            prices: Vec::new(),
            current_price: 0.0,
            change_percent: 0.0,
            market_cap: None,
            pe_ratio: None,
        };
        assert_eq!(snapshot.overlays(), ChartOverlays::default());
        assert!(snapshot.latest().is_none());
    }
}
