//! Cruscotto loads macroeconomic and market series from several providers and
//! aligns them onto one daily table.
//!
//! Overview
//! - Connectors (`cruscotto-alphavantage`, `cruscotto-ecos`, or your own
//!   `SeriesConnector`) fetch raw payloads, usually behind the cache and quota
//!   middleware from `cruscotto-middleware`.
//! - Indicators are declared as `IndicatorSpec`s naming their connector.
//! - `Cruscotto::load` fetches all indicators concurrently, each under a
//!   provider timeout, ingests them, and merges them with forward-fill.
//!   Failed indicators are excluded and reported as warnings; only a load
//!   with nothing usable fails with `NoData`.
//! - `Dashboard` holds the presentation state: date selection, KPIs, the
//!   yield spread, scatter pairs and table pages.
//!
//! Example
//! ```rust,ignore
//! use std::sync::Arc;
//! use cruscotto::{Cruscotto, presets};
//! use cruscotto_alphavantage::AvConnector;
//!
//! let av = AvConnector::from_env()?.free_tier().build();
//! let cruscotto = Cruscotto::builder()
//!     .with_connector(av)
//!     .indicators(presets::market_indicators())
//!     .build()?;
//! let dashboard = cruscotto.load_dashboard().await?;
//! for kpi in dashboard.kpis() {
//!     println!("{}: {:.2} ({:?})", kpi.label, kpi.value, kpi.change);
//! }
//! ```
//!
//! See `cruscotto/examples/` for runnable demonstrations.
#![warn(missing_docs)]

pub(crate) mod core;
/// Dashboard presentation state.
pub mod dashboard;
mod load;
/// Built-in indicator declarations.
pub mod presets;
mod util;

pub use crate::core::{Cruscotto, CruscottoBuilder, tag_err, with_request_deadline};
pub use crate::dashboard::{Column, DEFAULT_PAGE_SIZE, Dashboard, Kpi};
pub use crate::util::{join_with_deadline, partition_outcomes};

pub use cruscotto_middleware::{
    CacheMiddleware, CachingConnector, ConnectorBuilder, QuotaAwareConnector, QuotaMiddleware,
};

// Re-export core types for convenience
pub use cruscotto_core::{
    CacheConfig, ChangeKind, ConnectorKey, CruscottoConfig, CruscottoError, Cycle, DailyRecord,
    DateRange, FailureBody, IndicatorSeries, IndicatorSpec, LoadReport, MergeResult, PayloadShape,
    QuotaConfig, QuotaConsumptionStrategy, QuotaState, RawPayload, SeriesConnector, SeriesId,
    SeriesPoint, SeriesRequest, Transform, merge_series, merge_with_columns,
};

impl Cruscotto {
    /// Load every declared indicator and wrap the report in a [`Dashboard`].
    ///
    /// # Errors
    /// Same as [`Cruscotto::load`].
    pub async fn load_dashboard(&self) -> Result<Dashboard, CruscottoError> {
        let report = self.load().await?;
        Ok(Dashboard::new(report, &self.indicators))
    }
}
