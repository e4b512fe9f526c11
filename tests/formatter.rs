use crypto_tracker_wasm::domain::formatting::{
    format_change_percent, format_conversion, format_market_cap, format_price, format_usd_hint,
};
use crypto_tracker_wasm::domain::market_data::{ListingDetection, MarketMergeService, MarketQuote};
use crypto_tracker_wasm::view_state::ViewState;
use quickcheck::TestResult;
use quickcheck_macros::quickcheck;

/// Undo `format_price`: strip the glyph, scale the unit suffix back.
fn parse_formatted(text: &str) -> (f64, f64) {
    let digits = text.trim_start_matches(['₹', '$']);
    let (number, scale) = match digits.chars().last() {
        Some('L') => (&digits[..digits.len() - 1], 100_000.0),
        Some('K') => (&digits[..digits.len() - 1], 1_000.0),
        _ => (digits, 1.0),
    };
    (number.parse::<f64>().expect("numeric body") * scale, scale)
}

#[quickcheck]
fn price_parses_back_within_a_hundredth_of_the_unit(raw: f64, is_usd: bool) -> TestResult {
    if !raw.is_finite() {
        return TestResult::discard();
    }
    let price = raw.abs() % 1e12;
    let formatted = format_price(price, is_usd);
    let (parsed, scale) = parse_formatted(&formatted);
    let tolerance = if price < 1.0 { 1e-6 } else { scale * 0.01 };
    TestResult::from_bool((parsed - price).abs() <= tolerance)
}

#[quickcheck]
fn glyph_follows_currency_flag(raw: u32, is_usd: bool) -> bool {
    let expected = if is_usd { '$' } else { '₹' };
    format_price(raw as f64, is_usd).starts_with(expected)
        && format_market_cap(raw as f64, is_usd).starts_with(expected)
}

#[test]
fn market_cap_below_a_million_stays_in_lakhs() {
    assert_eq!(format_market_cap(999_999.0, false), "₹10.00L");
    assert_eq!(format_market_cap(999_999.0, true), "$10.00L");
    // the price formatter uses the same unit here, but from 1e5 upwards only
    assert_eq!(format_price(999_999.0, false), "₹10.00L");
    assert_eq!(format_price(99_999.0, false), "₹100.00K");
}

#[test]
fn market_cap_units() {
    assert_eq!(format_market_cap(2.5e12, true), "$2.50T");
    assert_eq!(format_market_cap(7.1e9, true), "$7.10B");
    assert_eq!(format_market_cap(3.0e6, false), "₹3.00M");
    assert_eq!(format_market_cap(0.0, false), "₹0.00L");
}

#[test]
fn converter_output_hides_non_finite_values() {
    assert_eq!(format_conversion(f64::INFINITY), "—");
    assert_eq!(format_conversion(f64::NAN), "—");
    assert_eq!(format_conversion(0.5), "0.50000000");
}

fn quote(id: &str, symbol: &str, price: f64, cap: f64, change: f64) -> MarketQuote {
    let mut quote = MarketQuote::new(id, price, cap);
    quote.symbol = symbol.to_string();
    quote.price_change_percentage_24h = change;
    quote
}

#[test]
fn rendered_table() {
    let local = vec![
        quote("dogecoin", "doge", 12.3456, 1.7e12, 0.0),
        quote("bitcoin", "btc", 8_000_000.0, 1.58e14, -1.25),
        quote("shiba-inu", "shib", 0.00184, 950_000.0, -0.1),
        quote("ethereum", "eth", 250_000.0, 3.0e13, 2.5),
    ];
    let usd = vec![
        quote("bitcoin", "btc", 95_000.0, 1.9e12, -1.25),
        quote("ethereum", "eth", 3_000.0, 3.6e11, 2.5),
        quote("dogecoin", "doge", 0.148, 2.0e10, 0.0),
    ];
    let assets = MarketMergeService::new(ListingDetection::default()).merge_dual(&local, &usd, 0);

    let table = ViewState::default()
        .filtered(&assets)
        .into_iter()
        .map(|(rank, asset)| {
            format!(
                "{} | {} | {} | {} | {} | {}",
                rank,
                asset.symbol.to_uppercase(),
                format_price(asset.current_price, false),
                format_usd_hint(asset.current_price_usd).unwrap_or_else(|| "-".to_string()),
                format_market_cap(asset.market_cap, false),
                format_change_percent(asset.price_change_percentage_24h),
            )
        })
        .collect::<Vec<_>>()
        .join("\n");

    insta::assert_snapshot!(table, @r"
    1 | BTC | ₹80.00L | $95000.00 | ₹158.00T | -1.25%
    2 | ETH | ₹2.50L | $3000.00 | ₹30.00T | +2.50%
    3 | DOGE | ₹12.35 | $0.15 | ₹1.70T | +0.00%
    4 | SHIB | ₹0.001840 | - | ₹9.50L | -0.10%
    ");
}
