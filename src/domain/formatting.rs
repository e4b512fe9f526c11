//! Display formatting for prices, market caps and converter output.
//!
//! Thresholds are fixed business rules. Units: `L` = lakh (1e5), `K` = 1e3,
//! `M`/`B`/`T` = 1e6/1e9/1e12.

use crate::domain::market_data::FiatCurrency;

const LAKH: f64 = 100_000.0;
const THOUSAND: f64 = 1_000.0;
const MILLION: f64 = 1_000_000.0;
const BILLION: f64 = 1_000_000_000.0;
const TRILLION: f64 = 1_000_000_000_000.0;

/// Shown instead of NaN/Infinity.
pub const PLACEHOLDER: &str = "—";

fn glyph(is_usd: bool) -> char {
    FiatCurrency::from_usd_flag(is_usd).glyph()
}

/// `₹1.23L`, `$4.56K`, `$7.89`, `₹0.000123`
pub fn format_price(value: f64, is_usd: bool) -> String {
    let currency = glyph(is_usd);
    if value >= LAKH {
        format!("{currency}{:.2}L", value / LAKH)
    } else if value >= THOUSAND {
        format!("{currency}{:.2}K", value / THOUSAND)
    } else if value >= 1.0 {
        format!("{currency}{value:.2}")
    } else {
        format!("{currency}{value:.6}")
    }
}

/// Below one million the cap still renders in lakhs, unlike [`format_price`].
pub fn format_market_cap(value: f64, is_usd: bool) -> String {
    let currency = glyph(is_usd);
    if value >= TRILLION {
        format!("{currency}{:.2}T", value / TRILLION)
    } else if value >= BILLION {
        format!("{currency}{:.2}B", value / BILLION)
    } else if value >= MILLION {
        format!("{currency}{:.2}M", value / MILLION)
    } else {
        format!("{currency}{:.2}L", value / LAKH)
    }
}

/// Signed 24h change, e.g. `+2.35%` or `-0.10%`.
pub fn format_change_percent(value: f64) -> String {
    if value >= 0.0 { format!("+{value:.2}%") } else { format!("{value:.2}%") }
}

/// Secondary USD line under a local price; hidden when the USD price is unknown.
pub fn format_usd_hint(usd_price: f64) -> Option<String> {
    (usd_price > 0.0).then(|| format!("${usd_price:.2}"))
}

/// Converter output with 8 decimals.
pub fn format_conversion(value: f64) -> String {
    if value.is_finite() { format!("{value:.8}") } else { PLACEHOLDER.to_string() }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn price_units() {
        assert_eq!(format_price(8_000_000.0, false), "₹80.00L");
        assert_eq!(format_price(95_000.0, true), "$95.00K");
        assert_eq!(format_price(1.5, true), "$1.50");
        assert_eq!(format_price(0.000123, false), "₹0.000123");
    }

    #[test]
    fn market_cap_units() {
        assert_eq!(format_market_cap(1.5e12, true), "$1.50T");
        assert_eq!(format_market_cap(2.25e9, false), "₹2.25B");
        assert_eq!(format_market_cap(3.0e6, false), "₹3.00M");
        assert_eq!(format_market_cap(50_000.0, false), "₹0.50L");
    }

    #[test]
    fn change_percent_is_signed() {
        assert_eq!(format_change_percent(2.5), "+2.50%");
        assert_eq!(format_change_percent(0.0), "+0.00%");
        assert_eq!(format_change_percent(-0.1), "-0.10%");
    }

    #[test]
    fn usd_hint_hidden_for_unknown_price() {
        assert_eq!(format_usd_hint(0.0), None);
        assert_eq!(format_usd_hint(1.2), Some("$1.20".to_string()));
    }

    #[test]
    fn conversion_guards_non_finite() {
        assert_eq!(format_conversion(f64::INFINITY), PLACEHOLDER);
        assert_eq!(format_conversion(f64::NAN), PLACEHOLDER);
        assert_eq!(format_conversion(0.5), "0.50000000");
    }
}
