use crate::domain::logging::{LogComponent, get_logger};
use crate::domain::market_data::{Asset, MarketQuote};
use std::cmp::Ordering;
use std::collections::HashMap;

/// Lookback for the all-time-high condition of the new-listing heuristic.
pub const NEW_LISTING_ATH_WINDOW_MS: i64 = 7 * 24 * 60 * 60 * 1000;
/// 24h market-cap growth (percent) above which an asset counts as new.
pub const NEW_LISTING_MARKET_CAP_SURGE_PCT: f64 = 100.0;
pub const DEFAULT_NEW_LISTING_RANK_THRESHOLD: usize = 200;

/// Settings for the "recently listed" heuristic.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ListingDetection {
    pub enabled: bool,
    pub rank_threshold: usize,
}

impl Default for ListingDetection {
    fn default() -> Self {
        Self { enabled: false, rank_threshold: DEFAULT_NEW_LISTING_RANK_THRESHOLD }
    }
}

impl ListingDetection {
    pub fn enabled(rank_threshold: usize) -> Self {
        Self { enabled: true, rank_threshold }
    }

    /// Best-effort guess, not an authoritative listing date. `rank` is the
    /// 1-based position in the returned list.
    pub fn is_recently_listed(&self, rank: usize, quote: &MarketQuote, now_ms: u64) -> bool {
        if rank > self.rank_threshold {
            return true;
        }

        let recent_ath = quote.ath_date.is_some_and(|ath| {
            let age_ms = now_ms as i64 - ath.timestamp_millis();
            age_ms <= NEW_LISTING_ATH_WINDOW_MS
        });
        if recent_ath {
            return true;
        }

        quote
            .market_cap_change_percentage_24h
            .is_some_and(|pct| pct > NEW_LISTING_MARKET_CAP_SURGE_PCT)
    }
}

/// Domain service turning raw per-currency listings into display rows.
pub struct MarketMergeService {
    detection: ListingDetection,
}

impl MarketMergeService {
    pub fn new(detection: ListingDetection) -> Self {
        Self { detection }
    }

    /// Join the USD listing into the local-currency listing by id.
    pub fn merge_dual(&self, local: &[MarketQuote], usd: &[MarketQuote], now_ms: u64) -> Vec<Asset> {
        // First record wins when the USD listing repeats an id.
        let mut usd_by_id: HashMap<&str, &MarketQuote> = HashMap::with_capacity(usd.len());
        for quote in usd {
            usd_by_id.entry(quote.id.value()).or_insert(quote);
        }

        let mut unmatched = 0usize;
        let assets = local
            .iter()
            .enumerate()
            .map(|(index, quote)| {
                let counterpart = usd_by_id.get(quote.id.value()).copied();
                if counterpart.is_none() {
                    unmatched += 1;
                }
                self.build_asset(index + 1, quote, counterpart, now_ms)
            })
            .collect::<Vec<_>>();

        if unmatched > 0 {
            get_logger().debug(
                LogComponent::Domain("MarketMerge"),
                &format!("{unmatched} of {} assets have no USD counterpart", assets.len()),
            );
        }

        self.sort_assets(assets)
    }

    /// Derive local-currency prices from a USD listing at a fixed rate.
    pub fn merge_fixed_rate(&self, usd: &[MarketQuote], usd_to_local_rate: f64, now_ms: u64) -> Vec<Asset> {
        let assets = usd
            .iter()
            .enumerate()
            .map(|(index, quote)| {
                let local = quote.scaled(usd_to_local_rate);
                self.build_asset(index + 1, &local, Some(quote), now_ms)
            })
            .collect();

        self.sort_assets(assets)
    }

    fn build_asset(&self, rank: usize, local: &MarketQuote, usd: Option<&MarketQuote>, now_ms: u64) -> Asset {
        let mut asset = Asset::from_quotes(local, usd);
        asset.is_new = self.detection.enabled && self.detection.is_recently_listed(rank, local, now_ms);
        asset
    }

    /// New listings first (when detection is on), then market cap descending,
    /// then id for a total order.
    pub fn sort_assets(&self, mut assets: Vec<Asset>) -> Vec<Asset> {
        let detection_enabled = self.detection.enabled;
        assets.sort_by(|a, b| {
            let partition = if detection_enabled { b.is_new.cmp(&a.is_new) } else { Ordering::Equal };
            partition
                .then_with(|| b.market_cap.total_cmp(&a.market_cap))
                .then_with(|| a.id.cmp(&b.id))
        });
        assets
    }
}

/// Largest assets by local market cap, for the summary cards.
pub fn top_by_market_cap(assets: &[Asset], count: usize) -> Vec<&Asset> {
    let mut ranked: Vec<&Asset> = assets.iter().collect();
    ranked.sort_by(|a, b| b.market_cap.total_cmp(&a.market_cap).then_with(|| a.id.cmp(&b.id)));
    ranked.truncate(count);
    ranked
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    const NOW_MS: u64 = 1_717_200_000_000;

    #[test]
    fn ath_within_a_week_flags_new() {
        let detection = ListingDetection::enabled(200);
        let mut quote = MarketQuote::new("fresh", 1.0, 1.0);
        quote.ath_date = Utc.timestamp_millis_opt(NOW_MS as i64 - 2 * 24 * 3_600_000).single();
        assert!(detection.is_recently_listed(1, &quote, NOW_MS));

        quote.ath_date = Utc.timestamp_millis_opt(NOW_MS as i64 - 8 * 24 * 3_600_000).single();
        assert!(!detection.is_recently_listed(1, &quote, NOW_MS));
    }

    #[test]
    fn rank_beyond_threshold_flags_new() {
        let detection = ListingDetection::enabled(200);
        let quote = MarketQuote::new("tail", 1.0, 1.0);
        assert!(!detection.is_recently_listed(200, &quote, NOW_MS));
        assert!(detection.is_recently_listed(201, &quote, NOW_MS));
    }

    #[test]
    fn disabled_detection_never_flags() {
        let service = MarketMergeService::new(ListingDetection::default());
        let mut quote = MarketQuote::new("surge", 1.0, 1.0);
        quote.market_cap_change_percentage_24h = Some(500.0);
        let assets = service.merge_dual(&[quote], &[], NOW_MS);
        assert!(!assets[0].is_new);
    }

    #[test]
    fn fixed_rate_derives_local_fields() {
        let service = MarketMergeService::new(ListingDetection::default());
        let assets = service.merge_fixed_rate(&[MarketQuote::new("btc", 2.0, 10.0)], 83.0, NOW_MS);
        assert_eq!(assets[0].current_price, 166.0);
        assert_eq!(assets[0].market_cap, 830.0);
        assert_eq!(assets[0].current_price_usd, 2.0);
        assert_eq!(assets[0].market_cap_usd, 10.0);
    }

    #[test]
    fn top_by_market_cap_takes_largest() {
        let service = MarketMergeService::new(ListingDetection::default());
        let quotes: Vec<_> = [("a", 5.0), ("b", 50.0), ("c", 500.0)]
            .iter()
            .map(|(id, cap)| MarketQuote::new(id, 1.0, *cap))
            .collect();
        let assets = service.merge_dual(&quotes, &[], NOW_MS);
        let top: Vec<&str> = top_by_market_cap(&assets, 2).iter().map(|a| a.id.value()).collect();
        assert_eq!(top, ["c", "b"]);
    }
}
