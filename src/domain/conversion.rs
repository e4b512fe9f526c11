//! Currency converter over the current asset list.
//!
//! Conversions between two assets are routed through the local currency.

use crate::domain::errors::{LookupMiss, ValidationError};
use crate::domain::logging::{LogComponent, get_logger};
use crate::domain::market_data::{Asset, AssetId, FiatCurrency, Selector};

/// Parse the amount field. Empty or non-numeric input is a [`ValidationError`].
pub fn parse_amount(amount_text: &str) -> Result<f64, ValidationError> {
    let trimmed = amount_text.trim();
    trimmed
        .parse::<f64>()
        .ok()
        .filter(|value| !value.is_nan())
        .ok_or_else(|| ValidationError::UnparseableAmount(trimmed.to_string()))
}

fn find_asset<'a>(assets: &'a [Asset], id: &AssetId) -> Result<&'a Asset, LookupMiss> {
    assets
        .iter()
        .find(|asset| asset.id == *id)
        .ok_or_else(|| LookupMiss { id: id.value().to_string() })
}

/// Local currency units per US dollar, implied by the largest asset quoted in both.
pub fn implied_usd_rate(assets: &[Asset]) -> Option<f64> {
    assets
        .iter()
        .filter(|asset| asset.current_price > 0.0 && asset.current_price_usd > 0.0)
        .max_by(|a, b| a.market_cap.total_cmp(&b.market_cap))
        .map(|asset| asset.current_price / asset.current_price_usd)
}

fn convert_between_fiat(assets: &[Asset], from: FiatCurrency, to: FiatCurrency, amount: f64) -> f64 {
    if from == to {
        return amount;
    }
    match (implied_usd_rate(assets), to) {
        (Some(rate), FiatCurrency::Local) => amount * rate,
        (Some(rate), FiatCurrency::Usd) => amount / rate,
        (None, _) => 0.0,
    }
}

/// Convert `amount_text` of `from` into `to`.
///
/// Invalid amounts and unknown asset ids yield `0.0`. Division by a zero price
/// yields a non-finite value; render it with
/// [`format_conversion`](crate::domain::formatting::format_conversion).
pub fn convert(assets: &[Asset], from: &Selector, to: &Selector, amount_text: &str) -> f64 {
    let amount = match parse_amount(amount_text) {
        Ok(amount) => amount,
        Err(e) => {
            get_logger().debug(LogComponent::Domain("Converter"), &format!("{e}, using 0"));
            return 0.0;
        }
    };

    match try_convert(assets, from, to, amount) {
        Ok(value) => value,
        Err(miss) => {
            get_logger().debug(LogComponent::Domain("Converter"), &format!("{miss}, using 0"));
            0.0
        }
    }
}

fn try_convert(assets: &[Asset], from: &Selector, to: &Selector, amount: f64) -> Result<f64, LookupMiss> {
    let value = match (from, to) {
        (Selector::Fiat(from_fiat), Selector::Fiat(to_fiat)) => {
            convert_between_fiat(assets, *from_fiat, *to_fiat, amount)
        }
        (Selector::Asset(source), Selector::Fiat(currency)) => {
            amount * find_asset(assets, source)?.price_in(*currency)
        }
        (Selector::Fiat(currency), Selector::Asset(target)) => {
            amount / find_asset(assets, target)?.price_in(*currency)
        }
        (Selector::Asset(source), Selector::Asset(target)) => {
            let source = find_asset(assets, source)?;
            let target = find_asset(assets, target)?;
            amount * source.current_price / target.current_price
        }
    };
    Ok(value)
}

/// Ephemeral converter input.
#[derive(Debug, Clone, PartialEq)]
pub struct ConversionRequest {
    pub from: Selector,
    pub to: Selector,
    pub amount_text: String,
}

impl ConversionRequest {
    pub fn new(from: Selector, to: Selector, amount_text: impl Into<String>) -> Self {
        Self { from, to, amount_text: amount_text.into() }
    }

    pub fn evaluate(&self, assets: &[Asset]) -> f64 {
        convert(assets, &self.from, &self.to, &self.amount_text)
    }

    /// Exchange the endpoints; the amount text is left as is.
    pub fn swapped(&self) -> Self {
        Self { from: self.to.clone(), to: self.from.clone(), amount_text: self.amount_text.clone() }
    }
}
