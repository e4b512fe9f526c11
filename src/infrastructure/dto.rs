use chrono::{DateTime, Utc};
use serde::Deserialize;

use crate::domain::market_data::{AssetId, MarketQuote};

/// DTO for one row of CoinGecko `/coins/markets`.
///
/// The API sends `null` for numbers it does not know, so everything except the
/// identifiers is optional.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct CoinGeckoMarketDto {
    pub id: String,
    pub symbol: String,
    pub name: String,
    pub image: Option<String>,
    pub current_price: Option<f64>,
    pub market_cap: Option<f64>,
    pub total_volume: Option<f64>,
    pub price_change_percentage_24h: Option<f64>,
    pub market_cap_change_percentage_24h: Option<f64>,
    pub ath_date: Option<String>,
    pub genesis_date: Option<String>,
}

impl CoinGeckoMarketDto {
    /// Converts the DTO into a domain quote. Unknown numbers become `0.0`, an
    /// unparseable `ath_date` is dropped.
    pub fn into_quote(self) -> MarketQuote {
        let ath_date = self.ath_date.as_deref().and_then(parse_rfc3339);

        MarketQuote {
            id: AssetId::new(self.id),
            symbol: self.symbol,
            name: self.name,
            current_price: self.current_price.unwrap_or(0.0),
            price_change_percentage_24h: self.price_change_percentage_24h.unwrap_or(0.0),
            market_cap: self.market_cap.unwrap_or(0.0),
            total_volume: self.total_volume.unwrap_or(0.0),
            market_cap_change_percentage_24h: self.market_cap_change_percentage_24h,
            image: self.image.unwrap_or_default(),
            ath_date,
            genesis_date: self.genesis_date,
        }
    }
}

fn parse_rfc3339(raw: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(raw).ok().map(|date| date.with_timezone(&Utc))
}

/// Parse a full `/coins/markets` body. Rows without an id are skipped.
pub fn parse_markets_payload(body: &str) -> Result<Vec<MarketQuote>, serde_json::Error> {
    let rows: Vec<CoinGeckoMarketDto> = serde_json::from_str(body)?;
    Ok(rows.into_iter().filter(|row| !row.id.is_empty()).map(CoinGeckoMarketDto::into_quote).collect())
}
