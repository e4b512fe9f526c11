//! Dashboard configuration.
//!
//! Loaded from an optional `<script id="dashboard-config" type="application/json">`
//! element; every field has a default.

use crate::application::FetchSettings;
use crate::domain::errors::ConfigurationError;
use crate::domain::logging::{LogComponent, get_logger};
use crate::domain::market_data::{FetchMode, ListingDetection};
use crate::domain::polling::{MAX_RETRY_DELAY, PollSettings, RetryPolicy};
use serde::{Deserialize, Serialize};
use std::ops::RangeInclusive;
use std::time::Duration;

pub const CONFIG_ELEMENT_ID: &str = "dashboard-config";
pub const REFRESH_INTERVAL_RANGE_SECS: RangeInclusive<u64> = 15..=60;
pub const PER_PAGE_RANGE: RangeInclusive<u16> = 100..=250;
pub const DEFAULT_API_BASE_URL: &str = "https://api.coingecko.com/api/v3";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DashboardConfig {
    pub refresh_interval_secs: u64,
    pub per_page: u16,
    pub fetch_mode: FetchMode,
    pub new_listing_detection: bool,
    pub new_listing_rank_threshold: usize,
    pub fresh_window_secs: u64,
    pub retry_base_delay_ms: u64,
    pub max_retry_attempts: u32,
    pub api_base_url: String,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            refresh_interval_secs: 30,
            per_page: 100,
            fetch_mode: FetchMode::DualEndpoint,
            new_listing_detection: false,
            new_listing_rank_threshold: 200,
            fresh_window_secs: 10,
            retry_base_delay_ms: 1_000,
            max_retry_attempts: 3,
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
        }
    }
}

impl DashboardConfig {
    /// Parse and validate a JSON document.
    pub fn from_json(raw: &str) -> Result<Self, ConfigurationError> {
        let config: Self =
            serde_json::from_str(raw).map_err(|e| ConfigurationError::Malformed(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Config for a raw document that may be absent. Blank input means defaults.
    pub fn from_optional_json(raw: Option<&str>) -> Result<Self, ConfigurationError> {
        match raw.map(str::trim).filter(|raw| !raw.is_empty()) {
            Some(raw) => Self::from_json(raw),
            None => Ok(Self::default()),
        }
    }

    /// Like [`Self::from_optional_json`], but invalid input logs and falls back
    /// to the defaults.
    pub fn resolve(raw: Option<&str>) -> Self {
        Self::from_optional_json(raw).unwrap_or_else(|e| {
            get_logger().error(LogComponent::Presentation("Config"), &format!("❌ {e}; using defaults"));
            Self::default()
        })
    }

    pub fn validate(&self) -> Result<(), ConfigurationError> {
        let invalid = |msg: String| Err(ConfigurationError::InvalidParameter(msg));

        if !REFRESH_INTERVAL_RANGE_SECS.contains(&self.refresh_interval_secs) {
            return invalid(format!(
                "refresh_interval_secs={} outside {:?}",
                self.refresh_interval_secs, REFRESH_INTERVAL_RANGE_SECS
            ));
        }
        if !PER_PAGE_RANGE.contains(&self.per_page) {
            return invalid(format!("per_page={} outside {:?}", self.per_page, PER_PAGE_RANGE));
        }
        if self.fresh_window_secs >= self.refresh_interval_secs {
            return invalid(format!(
                "fresh_window_secs={} must be shorter than refresh_interval_secs={}",
                self.fresh_window_secs, self.refresh_interval_secs
            ));
        }
        if self.retry_base_delay_ms == 0 {
            return invalid("retry_base_delay_ms must be positive".to_string());
        }
        if let FetchMode::SingleEndpoint { usd_to_local_rate } = self.fetch_mode {
            if !(usd_to_local_rate.is_finite() && usd_to_local_rate > 0.0) {
                return invalid(format!("usd_to_local_rate={usd_to_local_rate} must be positive"));
            }
        }
        Ok(())
    }

    pub fn poll_settings(&self) -> PollSettings {
        PollSettings {
            refresh_interval: Duration::from_secs(self.refresh_interval_secs),
            fresh_window: Duration::from_secs(self.fresh_window_secs),
            retry: RetryPolicy {
                base_delay: Duration::from_millis(self.retry_base_delay_ms),
                max_delay: MAX_RETRY_DELAY,
                max_attempts: self.max_retry_attempts,
            },
        }
    }

    pub fn listing_detection(&self) -> ListingDetection {
        ListingDetection { enabled: self.new_listing_detection, rank_threshold: self.new_listing_rank_threshold }
    }

    pub fn fetch_settings(&self) -> FetchSettings {
        FetchSettings { mode: self.fetch_mode, per_page: self.per_page, detection: self.listing_detection() }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        assert_eq!(DashboardConfig::default().validate(), Ok(()));
    }

    #[test]
    fn fetch_settings_carry_mode_and_detection() {
        let config = DashboardConfig::from_json(
            r#"{"per_page": 150, "new_listing_detection": true, "fetch_mode": {"kind": "single_endpoint", "usd_to_local_rate": 83.0}}"#,
        )
        .expect("valid config");
        let settings = config.fetch_settings();
        assert_eq!(settings.per_page, 150);
        assert!(settings.detection.enabled);
        assert_eq!(settings.mode, FetchMode::SingleEndpoint { usd_to_local_rate: 83.0 });
    }

    #[test]
    fn optional_json_rejects_what_resolve_replaces() {
        assert_eq!(DashboardConfig::from_optional_json(None), Ok(DashboardConfig::default()));
        assert_eq!(DashboardConfig::from_optional_json(Some("  ")), Ok(DashboardConfig::default()));

        let raw = r#"{"refresh_interval_secs": 5}"#;
        assert!(matches!(
            DashboardConfig::from_optional_json(Some(raw)),
            Err(ConfigurationError::InvalidParameter(_))
        ));
        assert_eq!(DashboardConfig::resolve(Some(raw)), DashboardConfig::default());
    }

    #[test]
    fn partial_json_keeps_defaults() {
        let config = DashboardConfig::from_json(r#"{"refresh_interval_secs": 15, "per_page": 250}"#)
            .expect("valid config");
        assert_eq!(config.refresh_interval_secs, 15);
        assert_eq!(config.per_page, 250);
        assert_eq!(config.fetch_mode, FetchMode::DualEndpoint);
        assert_eq!(config.new_listing_rank_threshold, 200);
    }

    #[test]
    fn single_endpoint_mode_is_tagged() {
        let config = DashboardConfig::from_json(
            r#"{"fetch_mode": {"kind": "single_endpoint", "usd_to_local_rate": 83.2}}"#,
        )
        .expect("valid config");
        assert_eq!(config.fetch_mode, FetchMode::SingleEndpoint { usd_to_local_rate: 83.2 });
    }

    #[test]
    fn out_of_range_values_are_rejected() {
        assert!(matches!(
            DashboardConfig::from_json(r#"{"refresh_interval_secs": 5}"#),
            Err(ConfigurationError::InvalidParameter(_))
        ));
        assert!(matches!(
            DashboardConfig::from_json(r#"{"per_page": 500}"#),
            Err(ConfigurationError::InvalidParameter(_))
        ));
        assert!(matches!(
            DashboardConfig::from_json(r#"{"refresh_interval_secs": 15, "fresh_window_secs": 15}"#),
            Err(ConfigurationError::InvalidParameter(_))
        ));
        assert!(matches!(
            DashboardConfig::from_json(r#"{"fetch_mode": {"kind": "single_endpoint", "usd_to_local_rate": 0}}"#),
            Err(ConfigurationError::InvalidParameter(_))
        ));
        assert!(matches!(DashboardConfig::from_json("{"), Err(ConfigurationError::Malformed(_))));
    }

    #[test]
    fn resolve_falls_back_to_defaults() {
        assert_eq!(DashboardConfig::resolve(None), DashboardConfig::default());
        assert_eq!(DashboardConfig::resolve(Some("   ")), DashboardConfig::default());
        assert_eq!(DashboardConfig::resolve(Some(r#"{"per_page": 7}"#)), DashboardConfig::default());
        assert_eq!(DashboardConfig::resolve(Some(r#"{"per_page": 150}"#)).per_page, 150);
    }

    #[test]
    fn poll_settings_mirror_config() {
        let settings = DashboardConfig::default().poll_settings();
        assert_eq!(settings.refresh_interval, Duration::from_secs(30));
        assert_eq!(settings.retry.base_delay, Duration::from_secs(1));
        assert_eq!(settings.retry.max_attempts, 3);
    }
}
