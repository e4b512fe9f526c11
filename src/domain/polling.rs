//! Refresh state machine: `Idle -> Loading -> {Ready, Failed}`.
//!
//! The controller is driven by explicit events (refresh requests and fetch
//! completions) and never touches timers or the network itself; it answers
//! with a [`PollCommand`] telling the driver what to do next.

use crate::domain::errors::FetchError;
use crate::domain::logging::{LogComponent, get_logger};
use crate::domain::market_data::Asset;
use crate::domain::state::PollSnapshot;
use std::sync::Arc;
use std::time::Duration;
use strum::Display;

pub const MAX_RETRY_DELAY: Duration = Duration::from_secs(30);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum PollPhase {
    Idle,
    Loading,
    Ready,
    Failed,
}

/// Why a refresh was requested.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum RefreshTrigger {
    Initial,
    Interval,
    WindowFocus,
    Manual,
    Retry,
}

/// Instruction for the driver after an event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PollCommand {
    /// Issue a fetch tagged with `sequence`.
    StartFetch { sequence: u64 },
    /// Call back with [`RefreshTrigger::Retry`] after `delay`.
    ScheduleRetry { attempt: u32, delay: Duration },
    Idle,
}

/// Exponential backoff: `base * 2^attempt`, capped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub base_delay: Duration,
    pub max_delay: Duration,
    pub max_attempts: u32,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self { base_delay: Duration::from_secs(1), max_delay: MAX_RETRY_DELAY, max_attempts: 3 }
    }
}

impl RetryPolicy {
    /// Delay before retry number `attempt` (0-based), or `None` once exhausted.
    pub fn delay_for(&self, attempt: u32) -> Option<Duration> {
        if attempt >= self.max_attempts {
            return None;
        }
        let factor = 2u32.saturating_pow(attempt);
        Some(self.base_delay.saturating_mul(factor).min(self.max_delay))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollSettings {
    pub refresh_interval: Duration,
    /// Data younger than this is fresh; shorter than `refresh_interval`.
    pub fresh_window: Duration,
    pub retry: RetryPolicy,
}

impl Default for PollSettings {
    fn default() -> Self {
        Self {
            refresh_interval: Duration::from_secs(30),
            fresh_window: Duration::from_secs(10),
            retry: RetryPolicy::default(),
        }
    }
}

pub struct PollController {
    settings: PollSettings,
    phase: PollPhase,
    assets: Arc<Vec<Asset>>,
    last_updated_ms: Option<u64>,
    last_error: Option<FetchError>,
    /// Highest sequence number handed out.
    sequence: u64,
    in_flight: Option<u64>,
    failed_attempts: u32,
    retry_pending: bool,
}

impl PollController {
    pub fn new(settings: PollSettings) -> Self {
        Self {
            settings,
            phase: PollPhase::Idle,
            assets: Arc::new(Vec::new()),
            last_updated_ms: None,
            last_error: None,
            sequence: 0,
            in_flight: None,
            failed_attempts: 0,
            retry_pending: false,
        }
    }

    pub fn settings(&self) -> &PollSettings {
        &self.settings
    }

    pub fn phase(&self) -> PollPhase {
        self.phase
    }

    pub fn assets(&self) -> Arc<Vec<Asset>> {
        Arc::clone(&self.assets)
    }

    pub fn last_updated(&self) -> Option<u64> {
        self.last_updated_ms
    }

    pub fn last_error(&self) -> Option<&FetchError> {
        self.last_error.as_ref()
    }

    pub fn is_loading(&self) -> bool {
        self.in_flight.is_some()
    }

    pub fn is_fresh(&self, now_ms: u64) -> bool {
        self.last_updated_ms.is_some_and(|updated| {
            now_ms.saturating_sub(updated) < self.settings.fresh_window.as_millis() as u64
        })
    }

    pub fn snapshot(&self, now_ms: u64) -> PollSnapshot {
        PollSnapshot {
            phase: self.phase,
            assets: self.assets(),
            last_updated_ms: self.last_updated_ms,
            last_error: self.last_error.clone(),
            is_fresh: self.is_fresh(now_ms),
        }
    }

    /// Ask for a refresh. Requests while a fetch is in flight are coalesced
    /// into it.
    pub fn request_refresh(&mut self, trigger: RefreshTrigger, now_ms: u64) -> PollCommand {
        if let Some(sequence) = self.in_flight {
            get_logger().debug(
                LogComponent::Domain("PollController"),
                &format!("{trigger} refresh coalesced into in-flight fetch #{sequence}"),
            );
            return PollCommand::Idle;
        }

        match trigger {
            RefreshTrigger::Retry if !self.retry_pending => return PollCommand::Idle,
            RefreshTrigger::WindowFocus if self.is_fresh(now_ms) => {
                get_logger().debug(
                    LogComponent::Domain("PollController"),
                    "focus refresh skipped, data is still fresh",
                );
                return PollCommand::Idle;
            }
            RefreshTrigger::Interval | RefreshTrigger::Manual => self.failed_attempts = 0,
            _ => {}
        }

        self.start_fetch()
    }

    /// Start a fetch even if one is in flight; the older one becomes stale.
    pub fn invalidate(&mut self) -> PollCommand {
        if let Some(sequence) = self.in_flight {
            get_logger().info(
                LogComponent::Domain("PollController"),
                &format!("fetch #{sequence} superseded"),
            );
        }
        self.failed_attempts = 0;
        self.start_fetch()
    }

    fn start_fetch(&mut self) -> PollCommand {
        self.sequence += 1;
        self.in_flight = Some(self.sequence);
        self.retry_pending = false;
        self.phase = PollPhase::Loading;
        PollCommand::StartFetch { sequence: self.sequence }
    }

    fn accept(&mut self, sequence: u64) -> bool {
        if self.in_flight == Some(sequence) {
            self.in_flight = None;
            true
        } else {
            get_logger().debug(
                LogComponent::Domain("PollController"),
                &format!("discarding stale completion #{sequence}"),
            );
            false
        }
    }

    /// Returns `false` when the result was stale and dropped.
    pub fn complete_success(&mut self, sequence: u64, assets: Vec<Asset>, now_ms: u64) -> bool {
        if !self.accept(sequence) {
            return false;
        }
        self.assets = Arc::new(assets);
        self.last_updated_ms = Some(now_ms);
        self.last_error = None;
        self.failed_attempts = 0;
        self.phase = PollPhase::Ready;
        true
    }

    /// Keeps the previous assets and schedules a retry while attempts remain.
    pub fn complete_failure(&mut self, sequence: u64, error: FetchError) -> PollCommand {
        if !self.accept(sequence) {
            return PollCommand::Idle;
        }
        self.phase = PollPhase::Failed;
        self.last_error = Some(error);

        match self.settings.retry.delay_for(self.failed_attempts) {
            Some(delay) => {
                self.failed_attempts += 1;
                self.retry_pending = true;
                PollCommand::ScheduleRetry { attempt: self.failed_attempts, delay }
            }
            None => {
                get_logger().warn(
                    LogComponent::Domain("PollController"),
                    &format!(
                        "giving up after {} retries until the next scheduled refresh",
                        self.failed_attempts
                    ),
                );
                PollCommand::Idle
            }
        }
    }
}
