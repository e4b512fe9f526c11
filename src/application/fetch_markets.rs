use crate::domain::{
    errors::FetchResult,
    logging::{LogComponent, get_logger},
    market_data::{
        Asset, FetchMode, FiatCurrency, ListingDetection, MarketDataRepository, MarketMergeService,
    },
};
use futures::future::try_join;

/// Что один цикл обновления запрашивает у репозитория
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FetchSettings {
    pub mode: FetchMode,
    pub per_page: u16,
    pub detection: ListingDetection,
}

impl Default for FetchSettings {
    fn default() -> Self {
        Self { mode: FetchMode::DualEndpoint, per_page: 100, detection: ListingDetection::default() }
    }
}

/// Use Case: загрузить свежий, объединённый и отсортированный список активов
pub struct FetchMarketsUseCase<R: MarketDataRepository> {
    repository: R,
    settings: FetchSettings,
    merge_service: MarketMergeService,
}

impl<R: MarketDataRepository> FetchMarketsUseCase<R> {
    pub fn new(repository: R, settings: FetchSettings) -> Self {
        if let FetchMode::SingleEndpoint { usd_to_local_rate } = settings.mode {
            get_logger().warn(
                LogComponent::Application("FetchMarkets"),
                &format!(
                    "⚠️ Single-endpoint mode: local prices use a fixed rate of {usd_to_local_rate} per USD, not live FX"
                ),
            );
        }

        Self { repository, settings, merge_service: MarketMergeService::new(settings.detection) }
    }

    pub fn settings(&self) -> &FetchSettings {
        &self.settings
    }

    /// Все запросы должны пройти; частичных списков не бывает.
    pub async fn execute(&self, now_ms: u64) -> FetchResult<Vec<Asset>> {
        let per_page = self.settings.per_page;

        let assets = match self.settings.mode {
            FetchMode::DualEndpoint => {
                let (local, usd) = try_join(
                    self.repository.fetch_markets(FiatCurrency::Local, per_page),
                    self.repository.fetch_markets(FiatCurrency::Usd, per_page),
                )
                .await?;
                self.merge_service.merge_dual(&local, &usd, now_ms)
            }
            FetchMode::SingleEndpoint { usd_to_local_rate } => {
                let usd = self.repository.fetch_markets(FiatCurrency::Usd, per_page).await?;
                self.merge_service.merge_fixed_rate(&usd, usd_to_local_rate, now_ms)
            }
        };

        get_logger().info(
            LogComponent::Application("FetchMarkets"),
            &format!(
                "✅ Loaded {} assets ({} flagged new)",
                assets.len(),
                assets.iter().filter(|asset| asset.is_new).count()
            ),
        );

        Ok(assets)
    }
}
