//! Data model, configuration primitives and error types shared by the
//! cruscotto crates.
#![warn(missing_docs)]

mod config;
mod connector;
mod error;
mod relay;
mod reports;
mod request;
mod series;

pub use config::{CacheConfig, CruscottoConfig, QuotaConfig, QuotaConsumptionStrategy, QuotaState};
pub use connector::ConnectorKey;
pub use error::CruscottoError;
pub use relay::FailureBody;
pub use reports::LoadReport;
pub use request::{ChangeKind, IndicatorSpec, RawPayload, SeriesId, SeriesRequest, Transform};
pub use series::{
    Cycle, DailyRecord, DateRange, IndicatorSeries, MergeResult, SeriesPoint, quarter_of,
};
