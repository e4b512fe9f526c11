use crypto_tracker_wasm::domain::conversion::{ConversionRequest, convert, implied_usd_rate};
use crypto_tracker_wasm::domain::formatting::format_conversion;
use crypto_tracker_wasm::domain::market_data::{Asset, FiatCurrency, MarketQuote, Selector};

fn asset(id: &str, local: f64, usd: f64, cap: f64) -> Asset {
    Asset::from_quotes(&MarketQuote::new(id, local, cap), Some(&MarketQuote::new(id, usd, cap / 80.0)))
}

fn assets() -> Vec<Asset> {
    vec![asset("btc", 8_000_000.0, 95_000.0, 1e14), asset("eth", 250_000.0, 3_000.0, 1e13)]
}

fn sel(raw: &str) -> Selector {
    Selector::parse(raw)
}

#[test]
fn asset_to_local() {
    assert_eq!(convert(&assets(), &sel("btc"), &sel("inr"), "2"), 16_000_000.0);
}

#[test]
fn local_to_asset() {
    assert_eq!(convert(&assets(), &sel("local"), &sel("btc"), "8000000"), 1.0);
}

#[test]
fn usd_endpoints_use_usd_prices() {
    assert_eq!(convert(&assets(), &sel("btc"), &sel("usd"), "0.5"), 47_500.0);
    assert_eq!(convert(&assets(), &sel("usd"), &sel("eth"), "6000"), 2.0);
}

#[test]
fn asset_to_asset_routes_through_local_prices() {
    assert_eq!(convert(&assets(), &sel("btc"), &sel("eth"), "1"), 32.0);
}

#[test]
fn same_fiat_is_identity() {
    assert_eq!(convert(&assets(), &sel("inr"), &sel("inr"), "5"), 5.0);
    assert_eq!(convert(&[], &sel("usd"), &sel("usd"), "5"), 5.0);
}

#[test]
fn fiat_pair_uses_rate_implied_by_largest_asset() {
    let rate = implied_usd_rate(&assets()).expect("btc quoted in both");
    assert_eq!(rate, 8_000_000.0 / 95_000.0);
    let local = convert(&assets(), &sel("usd"), &sel("inr"), "95000");
    assert!((local - 8_000_000.0).abs() < 1e-6);
    assert_eq!(convert(&[], &sel("usd"), &sel("inr"), "1"), 0.0);
}

#[test]
fn unknown_asset_yields_zero() {
    assert_eq!(convert(&assets(), &sel("dogecoin"), &sel("inr"), "3"), 0.0);
    assert_eq!(convert(&assets(), &sel("btc"), &sel("dogecoin"), "3"), 0.0);
}

#[test]
fn unparseable_amount_yields_zero() {
    assert_eq!(convert(&assets(), &sel("btc"), &sel("inr"), ""), 0.0);
    assert_eq!(convert(&assets(), &sel("btc"), &sel("inr"), "two"), 0.0);
}

#[test]
fn zero_price_target_renders_placeholder() {
    let list = vec![asset("btc", 8_000_000.0, 95_000.0, 1e14), asset("dead", 0.0, 0.0, 0.0)];
    let result = convert(&list, &sel("inr"), &sel("dead"), "10");
    assert!(!result.is_finite());
    assert_eq!(format_conversion(result), "—");
}

#[test]
fn request_swap_reverses_the_conversion() {
    let request = ConversionRequest::new(sel("btc"), Selector::Fiat(FiatCurrency::Local), "8000000");
    assert_eq!(request.evaluate(&assets()), 64e12);
    assert_eq!(request.swapped().evaluate(&assets()), 1.0);
}
