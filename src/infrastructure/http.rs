use gloo_net::http::Request;

use crate::config::DEFAULT_API_BASE_URL;
use crate::domain::{
    errors::{FetchError, FetchResult},
    logging::{LogComponent, get_logger},
    market_data::{FiatCurrency, MarketDataRepository, MarketQuote},
};
use crate::infrastructure::dto::parse_markets_payload;

/// HTTP клиент для CoinGecko `/coins/markets`
#[derive(Debug, Clone)]
pub struct CoinGeckoClient {
    base_url: String,
}

impl Default for CoinGeckoClient {
    fn default() -> Self {
        Self::new(DEFAULT_API_BASE_URL)
    }
}

impl CoinGeckoClient {
    pub fn new(base_url: &str) -> Self {
        Self { base_url: base_url.trim_end_matches('/').to_string() }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Топ `per_page` монет по капитализации, только первая страница
    pub fn markets_url(&self, currency: FiatCurrency, per_page: u16) -> String {
        let per_page = per_page.to_string();
        HttpUtils::build_url_with_params(
            &format!("{}/coins/markets", self.base_url),
            &[
                ("vs_currency", currency.api_code()),
                ("order", "market_cap_desc"),
                ("per_page", per_page.as_str()),
                ("page", "1"),
                ("sparkline", "false"),
            ],
        )
    }
}

impl MarketDataRepository for CoinGeckoClient {
    async fn fetch_markets(&self, currency: FiatCurrency, per_page: u16) -> FetchResult<Vec<MarketQuote>> {
        let url = self.markets_url(currency, per_page);
        get_logger().debug(
            LogComponent::Infrastructure("CoinGeckoClient"),
            &format!("📡 GET {url}"),
        );

        let response = Request::get(&url)
            .header("Accept", "application/json")
            .send()
            .await
            .map_err(|e| FetchError::Network(e.to_string()))?;

        if !response.ok() {
            get_logger().warn(
                LogComponent::Infrastructure("CoinGeckoClient"),
                &format!("HTTP {} {} for {}", response.status(), response.status_text(), currency),
            );
            return Err(FetchError::Http { status: response.status(), url });
        }

        let body = response.text().await.map_err(|e| FetchError::Network(e.to_string()))?;
        let quotes = parse_markets_payload(&body).map_err(|e| FetchError::Payload(e.to_string()))?;

        get_logger().debug(
            LogComponent::Infrastructure("CoinGeckoClient"),
            &format!("✅ {} quotes in {}", quotes.len(), currency),
        );
        Ok(quotes)
    }
}

/// Утилиты для query string
pub struct HttpUtils;

impl HttpUtils {
    /// Parameters keep their order; values are percent-encoded.
    pub fn build_url_with_params(base_url: &str, params: &[(&str, &str)]) -> String {
        if params.is_empty() {
            return base_url.to_string();
        }

        let query_string = params
            .iter()
            .map(|(key, value)| format!("{}={}", key, Self::url_encode(value)))
            .collect::<Vec<_>>()
            .join("&");

        format!("{base_url}?{query_string}")
    }

    pub fn url_encode(input: &str) -> String {
        input
            .replace('%', "%25")
            .replace(' ', "%20")
            .replace('&', "%26")
            .replace('=', "%3D")
            .replace('?', "%3F")
            .replace('#', "%23")
    }
}
