//! Display helpers for quote cards and chart labels.
//!
//! Fixed-point output rounds half away from zero on the exact value of the
//! `f64`, so `1.005` (stored as `1.00499...`) shows as `1.00` while an
//! exact tie such as `0.125` shows as `0.13`.

use rust_decimal::{Decimal, RoundingStrategy};

const NOT_AVAILABLE: &str = "N/A";
const MILLION: f64 = 1e6;
const BILLION: f64 = 1e9;

/// Direction of a price move; zero counts as up.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChangeDirection {
    Up,
    Down,
}

/// Formats a price as `$X.XX`.
pub fn format_price(value: f64) -> String {
    format!("${}", fixed_2(value))
}

/// Classifies a signed percentage change.
pub fn change_direction(change_percent: f64) -> ChangeDirection {
    if change_percent >= 0.0 {
        ChangeDirection::Up
    } else {
        ChangeDirection::Down
    }
}

/// Formats a market cap in billions as `$X.XXB`.
///
/// Absent, zero and non-finite values show as `N/A`.
pub fn format_market_cap(market_cap: Option<f64>) -> String {
    match market_cap {
        Some(cap) if cap != 0.0 && cap.is_finite() => format!("${}B", fixed_2(cap / BILLION)),
        _ => NOT_AVAILABLE.to_string(),
    }
}

/// Formats a price/earnings ratio as `X.XX`, or `N/A` when absent, zero or
/// non-finite.
pub fn format_pe_ratio(pe_ratio: Option<f64>) -> String {
    match pe_ratio {
        Some(ratio) if ratio != 0.0 && ratio.is_finite() => fixed_2(ratio),
        _ => NOT_AVAILABLE.to_string(),
    }
}

/// Formats a signed percentage change as `X.XX%`.
pub fn format_change_percent(change_percent: f64) -> String {
    format!("{}%", fixed_2(change_percent))
}

/// Formats a share volume with comma thousands separators.
pub fn format_volume(volume: u64) -> String {
    let digits = volume.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

/// Formats a share volume as whole millions, e.g. `52M`, for chart axes.
pub fn format_volume_millions(volume: u64) -> String {
    format!("{}M", fixed(volume as f64 / MILLION, 0))
}

fn fixed_2(value: f64) -> String {
    fixed(value, 2)
}

/// Rounds to `dp` places. `-0.0` prints unsigned; a negative value that
/// rounds to zero keeps its minus sign.
fn fixed(value: f64, dp: u32) -> String {
    let width = dp as usize;
    if value == 0.0 {
        return format!("{:.width$}", 0.0);
    }
    match Decimal::from_f64_retain(value) {
        Some(exact) => {
            let rounded = exact.round_dp_with_strategy(dp, RoundingStrategy::MidpointAwayFromZero);
            if rounded.is_zero() {
                let sign = if value < 0.0 { "-" } else { "" };
                format!("{sign}{:.width$}", 0.0)
            } else {
                format!("{rounded:.width$}")
            }
        }
        // Out of Decimal range or not finite.
        None => format!("{value:.width$}"),
    }
}

#[cfg(test)]
mod tests {
    use rust_decimal_macros::dec;

    use super::*;

    #[test]
    fn price_has_two_decimals() {
        assert_eq!(format_price(1234.5), "$1234.50");
        assert_eq!(format_price(0.0), "$0.00");
        assert_eq!(format_price(172.615), "$172.62");
        assert_eq!(format_price(0.125), "$0.13");
    }

    #[test]
    fn market_cap_in_billions() {
        assert_eq!(format_market_cap(Some(2_500_000_000.0)), "$2.50B");
        assert_eq!(format_market_cap(Some(2_670_000_000_000.0)), "$2670.00B");
        assert_eq!(format_market_cap(None), "N/A");
        assert_eq!(format_market_cap(Some(0.0)), "N/A");
    }

    #[test]
    fn zero_change_is_up() {
        assert_eq!(change_direction(0.0), ChangeDirection::Up);
        assert_eq!(change_direction(1.57), ChangeDirection::Up);
        assert_eq!(change_direction(-0.01), ChangeDirection::Down);
    }

    #[test]
    fn pe_ratio_and_change_percent() {
        assert_eq!(format_pe_ratio(Some(26.8)), "26.80");
        assert_eq!(format_pe_ratio(None), "N/A");
        assert_eq!(format_change_percent(-0.23), "-0.23%");
        assert_eq!(format_change_percent(1.5), "1.50%");
    }

    #[test]
    fn volume_groups_thousands() {
        assert_eq!(format_volume(0), "0");
        assert_eq!(format_volume(999), "999");
        assert_eq!(format_volume(1_000), "1,000");
        assert_eq!(format_volume(52_000_000), "52,000,000");
    }

    #[test]
    fn exact_binary_value_decides_rounding() {
        let tie = Decimal::from_f64_retain(0.125).unwrap();
        assert_eq!(tie, dec!(0.125));
        assert_eq!(fixed_2(0.125), "0.13");

        let below = Decimal::from_f64_retain(1.005).unwrap();
        assert!(below < dec!(1.005));
        assert_eq!(fixed_2(1.005), "1.00");
        assert_eq!(fixed_2(-2.675), "-2.67");
    }

    #[test]
    fn non_finite_values_fall_back() {
        assert_eq!(format_price(f64::INFINITY), "$inf");
        assert_eq!(format_market_cap(Some(f64::NAN)), "N/A");
        assert_eq!(format_market_cap(Some(f64::INFINITY)), "N/A");
        assert_eq!(format_pe_ratio(Some(f64::NAN)), "N/A");
    }

    #[test]
    fn negative_zero_prints_unsigned() {
        assert_eq!(format_price(-0.0), "$0.00");
        assert_eq!(format_change_percent(-0.0), "0.00%");
        assert_eq!(change_direction(-0.0), ChangeDirection::Up);
    }

    #[test]
    fn negative_values_rounding_to_zero_keep_sign() {
        assert_eq!(format_price(-0.004), "$-0.00");
        assert_eq!(format_change_percent(-0.001), "-0.00%");
        assert_eq!(change_direction(-0.001), ChangeDirection::Down);
        assert_eq!(format_price(0.004), "$0.00");
    }

    #[test]
    fn volume_in_millions() {
        assert_eq!(format_volume_millions(0), "0M");
        assert_eq!(format_volume_millions(48_500_000), "49M");
        assert_eq!(format_volume_millions(52_000_000), "52M");
        assert_eq!(format_volume_millions(1_499_999), "1M");
        assert_eq!(format_volume_millions(250_000), "0M");
    }
}
