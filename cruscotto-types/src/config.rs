//! Configuration types shared across the orchestrator, connectors and middleware.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Strategy for consuming units from a quota when handling requests.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[non_exhaustive]
pub enum QuotaConsumptionStrategy {
    /// Each request deducts one unit; requests past the budget are rejected.
    #[default]
    Unit,
    /// Requests are paced `window / limit` apart; callers wait for their slot
    /// instead of being rejected.
    EvenSpread,
}

/// Configuration for a call budget over a fixed window.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuotaConfig {
    /// Maximum number of calls within a single window.
    pub limit: u64,
    /// Duration of the accounting window.
    pub window: Duration,
    /// How calls consume the budget.
    pub strategy: QuotaConsumptionStrategy,
}

impl QuotaConfig {
    /// Alpha Vantage free tier: five calls per minute, spread evenly.
    #[must_use]
    pub const fn alphavantage_free() -> Self {
        Self {
            limit: 5,
            window: Duration::from_secs(60),
            strategy: QuotaConsumptionStrategy::EvenSpread,
        }
    }

    /// Minimum spacing between calls under `EvenSpread`.
    #[must_use]
    pub fn spacing(&self) -> Duration {
        if self.limit == 0 {
            return self.window;
        }
        let per_call_ms = self.window.as_millis() / u128::from(self.limit);
        Duration::from_millis(u64::try_from(per_call_ms).unwrap_or(u64::MAX))
    }
}

impl Default for QuotaConfig {
    fn default() -> Self {
        Self {
            limit: 1000,
            window: Duration::from_secs(24 * 60 * 60),
            strategy: QuotaConsumptionStrategy::Unit,
        }
    }
}

/// Snapshot of a quota budget at a point in time.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct QuotaState {
    /// Configured maximum calls per window.
    pub limit: u64,
    /// Remaining calls available in the current window.
    pub remaining: u64,
    /// Time remaining until the current window resets.
    pub reset_in: Duration,
}

/// Response cache settings for a single connector.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CacheConfig {
    /// Time-to-live for cached payloads. Zero disables caching.
    pub ttl: Duration,
    /// Maximum number of cached payloads.
    pub max_entries: u64,
}

impl CacheConfig {
    /// Alpha Vantage payloads are refreshed hourly.
    #[must_use]
    pub const fn alphavantage() -> Self {
        Self {
            ttl: Duration::from_secs(60 * 60),
            max_entries: 256,
        }
    }

    /// ECOS statistics are published at most daily.
    #[must_use]
    pub const fn ecos() -> Self {
        Self {
            ttl: Duration::from_secs(24 * 60 * 60),
            max_entries: 256,
        }
    }

    /// Whether this configuration actually caches anything.
    #[must_use]
    pub const fn is_enabled(&self) -> bool {
        !self.ttl.is_zero() && self.max_entries > 0
    }
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self::alphavantage()
    }
}

/// Global configuration for the `Cruscotto` orchestrator.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CruscottoConfig {
    /// Timeout for each individual indicator fetch.
    pub provider_timeout: Duration,
    /// Optional deadline for the whole concurrent load.
    pub request_timeout: Option<Duration>,
}

impl Default for CruscottoConfig {
    fn default() -> Self {
        Self {
            provider_timeout: Duration::from_secs(30),
            request_timeout: None,
        }
    }
}
