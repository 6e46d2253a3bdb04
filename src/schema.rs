//! Shape validation for stock payloads.
//!
//! [`StockSchema`] sits between the network boundary and the data model:
//! it inspects a raw [`serde_json::Value`] and either produces a typed
//! [`StockSnapshot`] or reports the first field that does not fit.
//!
//! Required shape:
//! - `prices` is an array (possibly empty),
//! - `current_price` and `change_percent` are numbers,
//! - every price point has a string `timestamp` and numeric
//!   `open`, `high`, `low`, `close` and `volume`.
//!
//! Optional numeric fields (`market_cap`, `pe_ratio`, `sma_20`,
//! `upper_band`, `lower_band`) never cause rejection; anything other
//! than a number reads as absent.

use serde_json::{Map, Value};

use crate::models::stock::{PricePoint, StockSnapshot};

/// Why a payload was rejected.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SchemaViolation {
    #[error("payload is not a JSON object")]
    NotAnObject,

    #[error("missing field `{0}`")]
    MissingField(&'static str),

    #[error("field `{field}` must be {expected}")]
    WrongType {
        field: &'static str,
        expected: &'static str,
    },

    #[error("prices[{index}] is not an object")]
    PricePointNotAnObject { index: usize },

    #[error("prices[{index}].{field} must be {expected}")]
    PricePointField {
        index: usize,
        field: &'static str,
        expected: &'static str,
    },
}

/// Validator for the `/stock/{symbol}` response body.
#[derive(Debug, Clone, Copy, Default)]
pub struct StockSchema;

impl StockSchema {
    /// Checks `raw` against the expected shape and converts it.
    ///
    /// # Errors
    ///
    /// Returns the first [`SchemaViolation`] encountered, checking
    /// top-level fields before individual price points.
    pub fn validate(&self, raw: &Value) -> Result<StockSnapshot, SchemaViolation> {
        let root = raw.as_object().ok_or(SchemaViolation::NotAnObject)?;

        let prices = root
            .get("prices")
            .ok_or(SchemaViolation::MissingField("prices"))?
            .as_array()
            .ok_or(SchemaViolation::WrongType {
                field: "prices",
                expected: "an array",
            })?;

        let change_percent = required_number(root, "change_percent")?;
        let current_price = required_number(root, "current_price")?;

        let prices = prices
            .iter()
            .enumerate()
            .map(|(index, point)| price_point(index, point))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(StockSnapshot {
            prices,
            current_price,
            change_percent,
            market_cap: optional_number(root, "market_cap"),
            pe_ratio: optional_number(root, "pe_ratio"),
        })
    }

    /// Returns `true` if [`validate`](Self::validate) would succeed.
    pub fn is_valid(&self, raw: &Value) -> bool {
        self.validate(raw).is_ok()
    }
}

/// Returns `true` if `raw` has the shape of a stock snapshot.
pub fn is_valid_stock_snapshot(raw: &Value) -> bool {
    StockSchema.is_valid(raw)
}

fn required_number(
    object: &Map<String, Value>,
    field: &'static str,
) -> Result<f64, SchemaViolation> {
    object
        .get(field)
        .ok_or(SchemaViolation::MissingField(field))?
        .as_f64()
        .ok_or(SchemaViolation::WrongType {
            field,
            expected: "a number",
        })
}

fn optional_number(object: &Map<String, Value>, field: &str) -> Option<f64> {
    object.get(field).and_then(Value::as_f64)
}

fn price_point(index: usize, raw: &Value) -> Result<PricePoint, SchemaViolation> {
    let point = raw
        .as_object()
        .ok_or(SchemaViolation::PricePointNotAnObject { index })?;

    let timestamp = point
        .get("timestamp")
        .and_then(Value::as_str)
        .ok_or(SchemaViolation::PricePointField {
            index,
            field: "timestamp",
            expected: "a string",
        })?
        .to_string();

    let number = |field: &'static str| {
        point
            .get(field)
            .and_then(Value::as_f64)
            .ok_or(SchemaViolation::PricePointField {
                index,
                field,
                expected: "a number",
            })
    };

    let open = number("open")?;
    let high = number("high")?;
    let low = number("low")?;
    let close = number("close")?;
    let volume = volume(index, point.get("volume"))?;

    Ok(PricePoint {
        timestamp,
        open,
        high,
        low,
        close,
        volume,
        sma_20: optional_number(point, "sma_20"),
        upper_band: optional_number(point, "upper_band"),
        lower_band: optional_number(point, "lower_band"),
    })
}

/// Volume must be a non-negative number; fractional values truncate.
fn volume(index: usize, raw: Option<&Value>) -> Result<u64, SchemaViolation> {
    let violation = |expected| SchemaViolation::PricePointField {
        index,
        field: "volume",
        expected,
    };
    let raw = raw.ok_or(violation("a number"))?;

    if let Some(volume) = raw.as_u64() {
        return Ok(volume);
    }
    match raw.as_f64() {
        Some(volume) if volume >= 0.0 => Ok(volume.trunc() as u64),
        Some(_) => Err(violation("non-negative")),
        None => Err(violation("a number")),
    }
}
