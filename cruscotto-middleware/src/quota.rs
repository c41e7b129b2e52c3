//! Quota-aware connector wrapper.
//!
//! Two strategies are supported:
//! - `Unit`: a fixed window budget; calls past the budget fail with
//!   `QuotaExceeded` until the window rolls over.
//! - `EvenSpread`: calls are spaced `window / limit` apart and wait for their
//!   slot instead of failing. This matches free API tiers that throttle bursts.

use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use async_trait::async_trait;
use cruscotto_core::{
    CruscottoError, Middleware, PayloadShape, QuotaConfig, QuotaConsumptionStrategy, QuotaState,
    RawPayload, SeriesConnector, SeriesRequest,
};
use tokio::time::Instant;

/// Wrapper that enforces a call budget on an inner connector.
pub struct QuotaAwareConnector {
    inner: Arc<dyn SeriesConnector>,
    config: QuotaConfig,
    runtime: Mutex<QuotaRuntime>,
}

struct QuotaRuntime {
    calls_made_in_window: u64,
    last_reset: Instant,
    // Earliest instant the next paced call may start.
    next_slot: Instant,
}

impl QuotaRuntime {
    fn roll_window(&mut self, now: Instant, window: Duration) {
        let elapsed = now.duration_since(self.last_reset);
        if window.is_zero() || elapsed < window {
            return;
        }
        self.calls_made_in_window = 0;
        // Stay aligned to window boundaries across idle gaps.
        let windows_passed = elapsed.as_nanos() / window.as_nanos();
        let offset = Duration::from_nanos(
            (windows_passed * window.as_nanos())
                .try_into()
                .unwrap_or(u64::MAX),
        );
        self.last_reset += offset;
    }

    fn reset_in(&self, now: Instant, window: Duration) -> Duration {
        window.saturating_sub(now.duration_since(self.last_reset))
    }
}

impl QuotaAwareConnector {
    /// Create a new quota-aware wrapper around an existing connector.
    pub fn new(inner: Arc<dyn SeriesConnector>, config: QuotaConfig) -> Self {
        let now = Instant::now();
        Self {
            inner,
            config,
            runtime: Mutex::new(QuotaRuntime {
                calls_made_in_window: 0,
                last_reset: now,
                next_slot: now,
            }),
        }
    }

    /// Access the inner connector.
    pub fn inner(&self) -> &Arc<dyn SeriesConnector> {
        &self.inner
    }

    /// Current budget snapshot.
    pub fn state(&self) -> QuotaState {
        let mut rt = self.runtime.lock().unwrap_or_else(PoisonError::into_inner);
        let now = Instant::now();
        rt.roll_window(now, self.config.window);
        QuotaState {
            limit: self.config.limit,
            remaining: self.config.limit.saturating_sub(rt.calls_made_in_window),
            reset_in: rt.reset_in(now, self.config.window),
        }
    }

    /// Check whether a call is allowed right now under the `Unit` strategy and
    /// consume one unit if so.
    ///
    /// # Errors
    /// Returns `CruscottoError::QuotaExceeded` when the window budget is spent.
    pub fn should_allow_call(&self) -> Result<(), CruscottoError> {
        let mut rt = self.runtime.lock().unwrap_or_else(PoisonError::into_inner);
        let now = Instant::now();
        rt.roll_window(now, self.config.window);

        if rt.calls_made_in_window < self.config.limit {
            rt.calls_made_in_window += 1;
            return Ok(());
        }

        let reset_in_ms = rt
            .reset_in(now, self.config.window)
            .as_millis()
            .try_into()
            .unwrap_or(u64::MAX);
        drop(rt);
        Err(CruscottoError::QuotaExceeded {
            remaining: 0,
            reset_in_ms,
        })
    }

    /// Reserve the next paced slot and return how long to wait for it.
    fn reserve_slot(&self) -> Duration {
        let mut rt = self.runtime.lock().unwrap_or_else(PoisonError::into_inner);
        let now = Instant::now();
        rt.roll_window(now, self.config.window);

        let start = rt.next_slot.max(now);
        rt.next_slot = start + self.config.spacing();
        rt.calls_made_in_window = rt.calls_made_in_window.saturating_add(1);
        start.duration_since(now)
    }

    async fn acquire(&self) -> Result<(), CruscottoError> {
        match self.config.strategy {
            QuotaConsumptionStrategy::EvenSpread => {
                let wait = self.reserve_slot();
                if !wait.is_zero() {
                    #[cfg(feature = "tracing")]
                    tracing::debug!(
                        connector = self.inner.name(),
                        wait_ms = u64::try_from(wait.as_millis()).unwrap_or(u64::MAX),
                        "pacing provider call"
                    );
                    tokio::time::sleep(wait).await;
                }
                Ok(())
            }
            _ => self.should_allow_call(),
        }
    }
}

#[async_trait]
impl SeriesConnector for QuotaAwareConnector {
    fn name(&self) -> &'static str {
        self.inner.name()
    }

    fn vendor(&self) -> &'static str {
        self.inner.vendor()
    }

    fn shape(&self, req: &SeriesRequest) -> Result<PayloadShape, CruscottoError> {
        self.inner.shape(req)
    }

    async fn fetch_series(&self, req: &SeriesRequest) -> Result<RawPayload, CruscottoError> {
        self.acquire().await?;
        self.inner.fetch_series(req).await
    }

    // Waiting for a paced slot does not count against `timeout`.
    async fn fetch_series_within(
        &self,
        req: &SeriesRequest,
        timeout: Duration,
    ) -> Result<RawPayload, CruscottoError> {
        self.acquire().await?;
        self.inner.fetch_series_within(req, timeout).await
    }
}

/// Middleware config for constructing a [`QuotaAwareConnector`].
pub struct QuotaMiddleware {
    /// Budget applied to the wrapped connector.
    pub config: QuotaConfig,
}

impl QuotaMiddleware {
    /// Wrap connectors with `config`.
    #[must_use]
    pub const fn new(config: QuotaConfig) -> Self {
        Self { config }
    }
}

impl Middleware for QuotaMiddleware {
    fn apply(self: Box<Self>, inner: Arc<dyn SeriesConnector>) -> Arc<dyn SeriesConnector> {
        Arc::new(QuotaAwareConnector::new(inner, self.config))
    }

    fn name(&self) -> &'static str {
        "QuotaAwareConnector"
    }

    fn config_json(&self) -> serde_json::Value {
        let strategy = match self.config.strategy {
            QuotaConsumptionStrategy::EvenSpread => "EvenSpread",
            _ => "Unit",
        };
        serde_json::json!({
            "limit": self.config.limit,
            "window_ms": u64::try_from(self.config.window.as_millis()).unwrap_or(u64::MAX),
            "strategy": strategy,
        })
    }
}
