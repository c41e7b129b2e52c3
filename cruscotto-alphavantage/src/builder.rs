use std::sync::Arc;

use cruscotto_core::{CacheConfig, QuotaConfig, SeriesConnector};
use cruscotto_middleware::ConnectorBuilder as GenericConnectorBuilder;

use crate::AvConnector;

/// Builder type alias specialized for Alpha Vantage connectors.
pub type AvConnectorBuilder = GenericConnectorBuilder;

impl AvConnector {
    /// Wrap in an unconfigured middleware builder.
    #[must_use]
    pub fn into_builder(self) -> AvConnectorBuilder {
        let raw: Arc<dyn SeriesConnector> = Arc::new(self);
        GenericConnectorBuilder::new(raw)
    }

    /// Free-tier stack: one-hour payload cache in front of a 5 calls per
    /// minute budget, paced one call every 12 seconds.
    ///
    /// Users can further customize before calling `.build()`.
    #[must_use]
    pub fn free_tier(self) -> AvConnectorBuilder {
        self.into_builder()
            .with_cache(&CacheConfig::alphavantage())
            .with_quota(&QuotaConfig::alphavantage_free())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn free_tier_layers() {
        let b = AvConnector::new_with_key("k").free_tier();
        assert_eq!(b.layer_names(), ["CachingMiddleware", "QuotaAwareConnector"]);
        assert_eq!(b.build().name(), "cruscotto-alphavantage");
    }
}
