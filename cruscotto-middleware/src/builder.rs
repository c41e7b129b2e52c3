//! Builder for composing connectors with middleware layers.
//!
//! Layers form an onion around the raw connector:
//!
//! ```text
//! Caller
//!     ↓
//! CachingMiddleware (hits never spend quota)
//!     ↓
//! QuotaAwareConnector (rejects or paces upstream calls)
//!     ↓
//! Raw connector (HTTP)
//! ```
//!
//! `layers` is stored outermost-first and applied in reverse by `build()`.

use std::sync::Arc;

use cruscotto_core::{CacheConfig, Middleware, QuotaConfig, SeriesConnector};
use serde_json::json;

use crate::cache::CacheMiddleware;
use crate::quota::QuotaMiddleware;

const CACHE: &str = "CachingMiddleware";
const QUOTA: &str = "QuotaAwareConnector";

/// Generic middleware builder for composing a connector with layered wrappers.
pub struct ConnectorBuilder {
    raw: Arc<dyn SeriesConnector>,
    /// Middleware layers in outermost-first order.
    layers: Vec<Box<dyn Middleware>>,
}

impl ConnectorBuilder {
    /// Create a new builder from a raw, unwrapped connector.
    #[must_use]
    pub fn new(raw: Arc<dyn SeriesConnector>) -> Self {
        Self {
            raw,
            layers: Vec::new(),
        }
    }

    /// Add or replace the response cache. The cache is always outermost.
    #[must_use]
    pub fn with_cache(mut self, cfg: &CacheConfig) -> Self {
        self.layers.retain(|m| m.name() != CACHE);
        self.layers.insert(0, Box::new(CacheMiddleware::new(cfg.clone())));
        self
    }

    /// Remove the cache if present.
    #[must_use]
    pub fn without_cache(mut self) -> Self {
        self.layers.retain(|m| m.name() != CACHE);
        self
    }

    /// Add or replace the quota. It sits directly inside the cache, or
    /// outermost when no cache is configured.
    #[must_use]
    pub fn with_quota(mut self, cfg: &QuotaConfig) -> Self {
        self.layers.retain(|m| m.name() != QUOTA);
        let at = usize::from(self.layers.first().is_some_and(|m| m.name() == CACHE));
        self.layers
            .insert(at, Box::new(QuotaMiddleware::new(cfg.clone())));
        self
    }

    /// Remove the quota if present.
    #[must_use]
    pub fn without_quota(mut self) -> Self {
        self.layers.retain(|m| m.name() != QUOTA);
        self
    }

    /// Add an arbitrary middleware layer just inside the cache.
    #[must_use]
    pub fn layer(mut self, layer: Box<dyn Middleware>) -> Self {
        let at = usize::from(self.layers.first().is_some_and(|m| m.name() == CACHE));
        self.layers.insert(at, layer);
        self
    }

    /// Layer names and configuration, outermost first, with the raw connector
    /// appended as the innermost entry.
    #[must_use]
    pub fn describe(&self) -> serde_json::Value {
        let mut out: Vec<serde_json::Value> = self
            .layers
            .iter()
            .map(|l| json!({ "name": l.name(), "config": l.config_json() }))
            .collect();
        out.push(json!({ "name": "RawConnector", "config": { "name": self.raw.name() } }));
        serde_json::Value::Array(out)
    }

    /// Names of the configured layers, outermost first.
    #[must_use]
    pub fn layer_names(&self) -> Vec<&'static str> {
        self.layers.iter().map(|l| l.name()).collect()
    }

    /// Build the wrapped connector.
    ///
    /// With `layers = [Cache, Quota]` the result is `Cache(Quota(Raw))`.
    #[must_use]
    pub fn build(self) -> Arc<dyn SeriesConnector> {
        let mut acc: Arc<dyn SeriesConnector> = Arc::clone(&self.raw);
        for m in self.layers.into_iter().rev() {
            acc = m.apply(acc);
        }
        acc
    }
}
