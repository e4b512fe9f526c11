use crate::domain::errors::FetchResult;
use crate::domain::market_data::{FiatCurrency, MarketQuote};

/// Source of market listings, one currency per call.
///
/// Futures are not `Send`: everything runs on the browser's single thread.
#[allow(async_fn_in_trait)]
pub trait MarketDataRepository {
    /// Top `per_page` assets by market cap, priced in `currency`.
    async fn fetch_markets(&self, currency: FiatCurrency, per_page: u16) -> FetchResult<Vec<MarketQuote>>;
}

impl<T: MarketDataRepository> MarketDataRepository for std::rc::Rc<T> {
    async fn fetch_markets(&self, currency: FiatCurrency, per_page: u16) -> FetchResult<Vec<MarketQuote>> {
        (**self).fetch_markets(currency, per_page).await
    }
}
