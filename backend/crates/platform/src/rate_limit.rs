//! Rate Limiting Infrastructure
//!
//! Per-client sliding history enforcing nested minute / hour / day quotas.
//!
//! ## Concurrency
//! - The client map is a sharded [`DashMap`]; first sight of a client is an
//!   atomic insert-if-absent, so concurrent first requests share one history.
//! - Each history has its own mutex, held across prune + evaluate + append
//!   and nothing else. The shard guard is always released before it is taken.
//! - Idle clients are evicted by [`InMemoryRateLimitStore::evict_idle`].
//!   Reaching the client cap sweeps at most once per [`CAP_SWEEP_MIN_GAP_SECS`].

use chrono::{DateTime, TimeDelta, Utc};
use dashmap::DashMap;
use parking_lot::Mutex;
use std::collections::VecDeque;
use std::sync::Arc;
use std::sync::atomic::{AtomicI64, Ordering};
use std::time::Duration;

/// Minimum spacing between sweeps triggered by the client cap
pub const CAP_SWEEP_MIN_GAP_SECS: i64 = 60;

/// Time horizon over which a quota is counted
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RateWindow {
    Minute,
    Hour,
    Day,
}

impl RateWindow {
    #[inline]
    pub const fn as_secs(self) -> i64 {
        match self {
            RateWindow::Minute => 60,
            RateWindow::Hour => 3_600,
            RateWindow::Day => 86_400,
        }
    }

    #[inline]
    pub fn span(self) -> TimeDelta {
        TimeDelta::seconds(self.as_secs())
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            RateWindow::Minute => "minute",
            RateWindow::Hour => "hour",
            RateWindow::Day => "day",
        }
    }

    /// Start of the next window aligned to the Unix epoch (top of the next
    /// minute, hour, or UTC day)
    pub fn next_boundary(self, now: DateTime<Utc>) -> DateTime<Utc> {
        let period = self.as_secs();
        let next = (now.timestamp().div_euclid(period) + 1) * period;
        DateTime::from_timestamp(next, 0).unwrap_or(now)
    }

    /// Time left until [`Self::next_boundary`]
    pub fn until_next_boundary(self, now: DateTime<Utc>) -> Duration {
        (self.next_boundary(now) - now)
            .to_std()
            .unwrap_or(Duration::ZERO)
    }
}

/// A single quota: at most `max_requests` within `window`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WindowQuota {
    pub window: RateWindow,
    pub max_requests: u32,
}

impl WindowQuota {
    pub const fn new(window: RateWindow, max_requests: u32) -> Self {
        Self {
            window,
            max_requests,
        }
    }
}

/// Rate limit configuration
#[derive(Debug, Clone)]
pub struct RateLimitConfig {
    /// Quotas in evaluation order, most restrictive first
    pub quotas: Vec<WindowQuota>,
    /// Soft cap on tracked clients; reaching it triggers an eviction sweep
    pub max_tracked_clients: usize,
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            quotas: vec![
                WindowQuota::new(RateWindow::Minute, 5),
                WindowQuota::new(RateWindow::Hour, 60),
                WindowQuota::new(RateWindow::Day, 300),
            ],
            max_tracked_clients: 100_000,
        }
    }
}

impl RateLimitConfig {
    pub fn new(quotas: Vec<WindowQuota>) -> Self {
        Self {
            quotas,
            ..Self::default()
        }
    }

    pub fn with_max_tracked_clients(mut self, max_tracked_clients: usize) -> Self {
        self.max_tracked_clients = max_tracked_clients;
        self
    }

    /// How long a timestamp stays relevant: the longest configured window
    pub fn retention(&self) -> TimeDelta {
        self.quotas
            .iter()
            .map(|q| q.window.span())
            .max()
            .unwrap_or_else(|| RateWindow::Day.span())
    }
}

/// Rate limit check result
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RateLimitDecision {
    Allowed,
    Rejected {
        window: RateWindow,
        retry_after: Duration,
    },
}

impl RateLimitDecision {
    #[inline]
    pub fn is_allowed(&self) -> bool {
        matches!(self, RateLimitDecision::Allowed)
    }

    pub fn retry_after(&self) -> Option<Duration> {
        match self {
            RateLimitDecision::Allowed => None,
            RateLimitDecision::Rejected { retry_after, .. } => Some(*retry_after),
        }
    }
}

/// Recent request timestamps of one client, oldest first
#[derive(Debug, Default)]
pub struct ClientAccessHistory {
    timestamps: VecDeque<DateTime<Utc>>,
    /// Set when the sweep removed this history from the map
    evicted: bool,
}

impl ClientAccessHistory {
    /// Drop every timestamp whose age is `retention` or more
    pub fn prune(&mut self, now: DateTime<Utc>, retention: TimeDelta) {
        while self
            .timestamps
            .front()
            .is_some_and(|t| now - *t >= retention)
        {
            self.timestamps.pop_front();
        }
    }

    /// Number of timestamps younger than `span`
    pub fn count_within(&self, now: DateTime<Utc>, span: TimeDelta) -> usize {
        let expired = self.timestamps.partition_point(|t| now - *t >= span);
        self.timestamps.len() - expired
    }

    /// Insert keeping chronological order, even if the clock stepped back
    pub fn record(&mut self, now: DateTime<Utc>) {
        let idx = self.timestamps.partition_point(|t| *t <= now);
        self.timestamps.insert(idx, now);
    }

    pub fn len(&self) -> usize {
        self.timestamps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.timestamps.is_empty()
    }

    fn evaluate(&self, now: DateTime<Utc>, quotas: &[WindowQuota]) -> RateLimitDecision {
        for quota in quotas {
            let count = self.count_within(now, quota.window.span());
            if count >= quota.max_requests as usize {
                return RateLimitDecision::Rejected {
                    window: quota.window,
                    retry_after: quota.window.until_next_boundary(now),
                };
            }
        }
        RateLimitDecision::Allowed
    }
}

/// Trait for rate limit storage backends
#[trait_variant::make(RateLimitStore: Send)]
pub trait LocalRateLimitStore {
    /// Check the quotas for `key` and, when allowed, record the request.
    /// Never fails: rejection is a regular outcome.
    async fn check(&self, key: &str, now: DateTime<Utc>) -> RateLimitDecision;
}

/// Process-local rate limit store
///
/// State is lost on restart and not shared between instances.
pub struct InMemoryRateLimitStore {
    config: RateLimitConfig,
    retention: TimeDelta,
    clients: DashMap<String, Arc<Mutex<ClientAccessHistory>>>,
    /// Unix seconds of the last cap-triggered sweep
    last_cap_sweep: AtomicI64,
}

impl InMemoryRateLimitStore {
    pub fn new(config: RateLimitConfig) -> Self {
        let retention = config.retention();
        Self {
            config,
            retention,
            clients: DashMap::new(),
            last_cap_sweep: AtomicI64::new(i64::MIN),
        }
    }

    /// Synchronous core of [`LocalRateLimitStore::check`]
    pub fn check_at(&self, key: &str, now: DateTime<Utc>) -> RateLimitDecision {
        loop {
            let entry = self.history_for(key, now);
            let mut history = entry.lock();
            if history.evicted {
                // Lost a race with the sweep; pick up the mapped history
                continue;
            }

            history.prune(now, self.retention);
            let decision = history.evaluate(now, &self.config.quotas);
            match decision {
                RateLimitDecision::Allowed => history.record(now),
                RateLimitDecision::Rejected {
                    window,
                    retry_after,
                } => {
                    tracing::warn!(
                        client_id = %key,
                        window = window.as_str(),
                        retry_after_secs = retry_after.as_secs(),
                        "Rate limit exceeded"
                    );
                }
            }
            return decision;
        }
    }

    /// Remove clients with no timestamp inside the retention window.
    /// Histories locked by an in-flight check are left alone.
    pub fn evict_idle(&self, now: DateTime<Utc>) -> usize {
        let before = self.clients.len();
        self.clients.retain(|_, history| match history.try_lock() {
            Some(mut history) => {
                history.prune(now, self.retention);
                if history.is_empty() {
                    history.evicted = true;
                    false
                } else {
                    true
                }
            }
            None => true,
        });
        let evicted = before.saturating_sub(self.clients.len());

        if evicted > 0 {
            tracing::info!(
                evicted,
                remaining = self.clients.len(),
                "Evicted idle rate limit clients"
            );
        } else {
            tracing::debug!(remaining = self.clients.len(), "Rate limit sweep found nothing idle");
        }
        evicted
    }

    pub fn tracked_clients(&self) -> usize {
        self.clients.len()
    }

    fn history_for(&self, key: &str, now: DateTime<Utc>) -> Arc<Mutex<ClientAccessHistory>> {
        if let Some(existing) = self.clients.get(key).map(|entry| Arc::clone(entry.value())) {
            return existing;
        }

        if self.clients.len() >= self.config.max_tracked_clients && self.claim_cap_sweep(now) {
            self.evict_idle(now);
        }

        Arc::clone(self.clients.entry(key.to_owned()).or_default().value())
    }

    /// Only one caller per gap wins; the others insert without sweeping
    fn claim_cap_sweep(&self, now: DateTime<Utc>) -> bool {
        let now_secs = now.timestamp();
        let last = self.last_cap_sweep.load(Ordering::Relaxed);
        // A clock step backwards re-arms the sweep
        if (0..CAP_SWEEP_MIN_GAP_SECS).contains(&now_secs.saturating_sub(last)) {
            return false;
        }
        self.last_cap_sweep
            .compare_exchange(last, now_secs, Ordering::Relaxed, Ordering::Relaxed)
            .is_ok()
    }
}

impl Default for InMemoryRateLimitStore {
    fn default() -> Self {
        Self::new(RateLimitConfig::default())
    }
}

impl RateLimitStore for InMemoryRateLimitStore {
    async fn check(&self, key: &str, now: DateTime<Utc>) -> RateLimitDecision {
        self.check_at(key, now)
    }
}
