use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use cruscotto_core::{
    CacheConfig, CruscottoError, Middleware, PayloadShape, RawPayload, SeriesConnector,
    SeriesRequest,
};
use moka::future::Cache;

/// Connector wrapper that memoizes successful payloads per request.
///
/// Errors are never cached, so a failed fetch is retried on the next load.
/// Concurrent misses for the same request share a single upstream call.
pub struct CachingConnector {
    inner: Arc<dyn SeriesConnector>,
    // `None` when caching is disabled (zero TTL or capacity).
    store: Option<Cache<SeriesRequest, Arc<RawPayload>>>,
}

impl CachingConnector {
    /// Wrap `inner`; a disabled `cfg` passes every call through.
    #[must_use]
    pub fn new(inner: Arc<dyn SeriesConnector>, cfg: &CacheConfig) -> Self {
        let store = cfg.is_enabled().then(|| {
            Cache::builder()
                .max_capacity(cfg.max_entries)
                .time_to_live(cfg.ttl)
                .build()
        });
        Self { inner, store }
    }

    /// Access the inner connector.
    pub fn inner(&self) -> &Arc<dyn SeriesConnector> {
        &self.inner
    }

    /// Number of payloads currently held (approximate, per moka semantics).
    #[must_use]
    pub fn entry_count(&self) -> u64 {
        self.store.as_ref().map_or(0, Cache::entry_count)
    }
}

#[async_trait]
impl SeriesConnector for CachingConnector {
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
        self.fetch(req, None).await
    }

    async fn fetch_series_within(
        &self,
        req: &SeriesRequest,
        timeout: Duration,
    ) -> Result<RawPayload, CruscottoError> {
        self.fetch(req, Some(timeout)).await
    }
}

impl CachingConnector {
    // Hits return immediately; only misses reach `inner` with the timeout.
    async fn fetch(
        &self,
        req: &SeriesRequest,
        timeout: Option<Duration>,
    ) -> Result<RawPayload, CruscottoError> {
        let upstream = async {
            match timeout {
                Some(t) => self.inner.fetch_series_within(req, t).await,
                None => self.inner.fetch_series(req).await,
            }
        };
        let Some(store) = &self.store else {
            return upstream.await;
        };

        let payload = store
            .try_get_with(req.clone(), async {
                #[cfg(feature = "tracing")]
                tracing::debug!(
                    connector = self.inner.name(),
                    series = %req.series.code,
                    "cache miss"
                );
                upstream.await.map(Arc::new)
            })
            .await
            .map_err(|e: Arc<CruscottoError>| (*e).clone())?;
        Ok((*payload).clone())
    }
}

/// Middleware wrapper for [`CachingConnector`].
pub struct CacheMiddleware {
    cfg: CacheConfig,
}

impl CacheMiddleware {
    /// Cache wrapped connectors according to `cfg`.
    #[must_use]
    pub const fn new(cfg: CacheConfig) -> Self {
        Self { cfg }
    }
}

impl Middleware for CacheMiddleware {
    fn apply(self: Box<Self>, inner: Arc<dyn SeriesConnector>) -> Arc<dyn SeriesConnector> {
        let Self { cfg } = *self;
        Arc::new(CachingConnector::new(inner, &cfg))
    }

    fn name(&self) -> &'static str {
        "CachingMiddleware"
    }

    fn config_json(&self) -> serde_json::Value {
        serde_json::json!({
            "ttl_ms": u64::try_from(self.cfg.ttl.as_millis()).unwrap_or(u64::MAX),
            "max_entries": self.cfg.max_entries,
        })
    }
}
