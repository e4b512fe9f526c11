pub use super::value_objects::{AssetId, FiatCurrency, sanitize_amount};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One record of a market listing, priced in a single currency.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarketQuote {
    pub id: AssetId,
    pub symbol: String,
    pub name: String,
    pub current_price: f64,
    pub price_change_percentage_24h: f64,
    pub market_cap: f64,
    pub total_volume: f64,
    pub market_cap_change_percentage_24h: Option<f64>,
    pub image: String,
    pub ath_date: Option<DateTime<Utc>>,
    pub genesis_date: Option<String>,
}

impl MarketQuote {
    /// Minimal quote used by tests and benches.
    pub fn new(id: &str, current_price: f64, market_cap: f64) -> Self {
        Self {
            id: AssetId::from(id),
            symbol: id.chars().take(3).collect(),
            name: id.to_string(),
            current_price,
            price_change_percentage_24h: 0.0,
            market_cap,
            total_volume: 0.0,
            market_cap_change_percentage_24h: None,
            image: String::new(),
            ath_date: None,
            genesis_date: None,
        }
    }

    /// Reprice a USD quote into another currency at a fixed rate.
    pub fn scaled(&self, rate: f64) -> Self {
        Self {
            current_price: self.current_price * rate,
            market_cap: self.market_cap * rate,
            total_volume: self.total_volume * rate,
            ..self.clone()
        }
    }
}

/// Domain entity - Asset with prices in both the local currency and USD.
///
/// USD fields are `0.0` when the USD counterpart could not be resolved; treat
/// zero as unknown.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Asset {
    pub id: AssetId,
    pub symbol: String,
    pub name: String,
    pub current_price: f64,
    pub current_price_usd: f64,
    pub price_change_percentage_24h: f64,
    pub market_cap: f64,
    pub market_cap_usd: f64,
    pub market_cap_change_percentage_24h: f64,
    pub total_volume: f64,
    pub image: String,
    pub genesis_date: Option<String>,
    pub is_new: bool,
}

impl Asset {
    /// Combine a local-currency quote with its USD counterpart, if any.
    pub fn from_quotes(local: &MarketQuote, usd: Option<&MarketQuote>) -> Self {
        Self {
            id: local.id.clone(),
            symbol: local.symbol.clone(),
            name: local.name.clone(),
            current_price: sanitize_amount(local.current_price),
            current_price_usd: usd.map(|q| sanitize_amount(q.current_price)).unwrap_or(0.0),
            price_change_percentage_24h: finite_or_zero(local.price_change_percentage_24h),
            market_cap: sanitize_amount(local.market_cap),
            market_cap_usd: usd.map(|q| sanitize_amount(q.market_cap)).unwrap_or(0.0),
            market_cap_change_percentage_24h: local
                .market_cap_change_percentage_24h
                .map(finite_or_zero)
                .unwrap_or(0.0),
            total_volume: sanitize_amount(local.total_volume),
            image: local.image.clone(),
            genesis_date: local.genesis_date.clone(),
            is_new: false,
        }
    }

    pub fn price_in(&self, currency: FiatCurrency) -> f64 {
        match currency {
            FiatCurrency::Local => self.current_price,
            FiatCurrency::Usd => self.current_price_usd,
        }
    }

    pub fn market_cap_in(&self, currency: FiatCurrency) -> f64 {
        match currency {
            FiatCurrency::Local => self.market_cap,
            FiatCurrency::Usd => self.market_cap_usd,
        }
    }

    /// Case-insensitive match on name or ticker.
    pub fn matches_search(&self, needle: &str) -> bool {
        let needle = needle.trim().to_lowercase();
        needle.is_empty()
            || self.name.to_lowercase().contains(&needle)
            || self.symbol.to_lowercase().contains(&needle)
    }
}

fn finite_or_zero(value: f64) -> f64 {
    if value.is_finite() { value } else { 0.0 }
}
