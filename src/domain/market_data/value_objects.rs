use derive_more::{Deref, Display, From};
use serde::{Deserialize, Serialize};
use strum::{Display as StrumDisplay, EnumIter, EnumString};

/// Value Object - stable asset identifier (CoinGecko slug, e.g. `bitcoin`)
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Deref, Display, From, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AssetId(String);

impl AssetId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn value(&self) -> &str {
        &self.0
    }
}

impl From<&str> for AssetId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

/// Fiat currencies the dashboard prices in. `Local` is the Indian rupee.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, StrumDisplay, EnumIter, EnumString, Serialize, Deserialize)]
pub enum FiatCurrency {
    #[strum(to_string = "inr", serialize = "local")]
    #[serde(rename = "inr")]
    Local,
    #[strum(to_string = "usd")]
    #[serde(rename = "usd")]
    Usd,
}

impl FiatCurrency {
    /// `vs_currency` value understood by the market-data API.
    pub fn api_code(&self) -> &'static str {
        match self {
            Self::Local => "inr",
            Self::Usd => "usd",
        }
    }

    pub fn glyph(&self) -> char {
        match self {
            Self::Local => '₹',
            Self::Usd => '$',
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Local => "Indian Rupee (INR)",
            Self::Usd => "US Dollar (USD)",
        }
    }

    pub fn from_usd_flag(is_usd: bool) -> Self {
        if is_usd { Self::Usd } else { Self::Local }
    }
}

/// Converter endpoint: either a fiat sentinel or a real asset.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Selector {
    Fiat(FiatCurrency),
    Asset(AssetId),
}

impl Selector {
    /// `inr`/`local`/`usd` select a fiat sentinel, anything else is an asset id.
    pub fn parse(raw: &str) -> Self {
        let trimmed = raw.trim();
        match trimmed.to_ascii_lowercase().parse::<FiatCurrency>() {
            Ok(fiat) => Self::Fiat(fiat),
            Err(_) => Self::Asset(AssetId::from(trimmed)),
        }
    }

    /// Inverse of [`Selector::parse`], used as `<select>` option value.
    pub fn key(&self) -> String {
        match self {
            Self::Fiat(fiat) => fiat.api_code().to_string(),
            Self::Asset(id) => id.value().to_string(),
        }
    }

    pub fn is_fiat(&self, currency: FiatCurrency) -> bool {
        matches!(self, Self::Fiat(f) if *f == currency)
    }
}

impl From<FiatCurrency> for Selector {
    fn from(value: FiatCurrency) -> Self {
        Self::Fiat(value)
    }
}

/// How a refresh cycle obtains prices in both currencies.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum FetchMode {
    /// Two concurrent requests, one per currency, joined by id.
    #[default]
    DualEndpoint,
    /// One USD request; local prices are `usd * usd_to_local_rate`.
    /// Does not reflect live FX.
    SingleEndpoint { usd_to_local_rate: f64 },
}

/// Clamp upstream numbers to the non-negative finite range; anything else is "unknown".
pub fn sanitize_amount(value: f64) -> f64 {
    if value.is_finite() && value > 0.0 { value } else { 0.0 }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn selector_parses_fiat_sentinels() {
        assert_eq!(Selector::parse("inr"), Selector::Fiat(FiatCurrency::Local));
        assert_eq!(Selector::parse("USD"), Selector::Fiat(FiatCurrency::Usd));
        assert_eq!(Selector::parse("local"), Selector::Fiat(FiatCurrency::Local));
        assert_eq!(Selector::parse("bitcoin"), Selector::Asset(AssetId::from("bitcoin")));
    }

    #[test]
    fn selector_key_round_trips() {
        for raw in ["inr", "usd", "ethereum"] {
            assert_eq!(Selector::parse(raw).key(), raw);
        }
    }

    #[test]
    fn sanitize_rejects_negative_and_non_finite() {
        assert_eq!(sanitize_amount(-1.0), 0.0);
        assert_eq!(sanitize_amount(f64::NAN), 0.0);
        assert_eq!(sanitize_amount(f64::INFINITY), 0.0);
        assert_eq!(sanitize_amount(12.5), 12.5);
    }
}
