use std::sync::Arc;

use crate::domain::errors::FetchError;
use crate::domain::market_data::entities::Asset;
use crate::domain::polling::PollPhase;

/// Immutable view of the poll state handed to the presentation layer.
#[derive(Clone, Debug)]
pub struct PollSnapshot {
    pub phase: PollPhase,
    pub assets: Arc<Vec<Asset>>,
    pub last_updated_ms: Option<u64>,
    pub last_error: Option<FetchError>,
    pub is_fresh: bool,
}

impl Default for PollSnapshot {
    fn default() -> Self {
        Self {
            phase: PollPhase::Idle,
            assets: Arc::new(Vec::new()),
            last_updated_ms: None,
            last_error: None,
            is_fresh: false,
        }
    }
}

impl PollSnapshot {
    /// Full-page spinner only before the first list arrives.
    pub fn shows_initial_loader(&self) -> bool {
        self.assets.is_empty() && matches!(self.phase, PollPhase::Idle | PollPhase::Loading)
    }

    /// Full-page error only when there is nothing older to show.
    pub fn shows_error_page(&self) -> bool {
        self.assets.is_empty() && self.phase == PollPhase::Failed
    }

    /// Small inline indicator while a background refresh runs over stale data.
    pub fn shows_refresh_indicator(&self) -> bool {
        self.phase == PollPhase::Loading && !self.assets.is_empty() && !self.is_fresh
    }
}
