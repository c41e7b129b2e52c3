//! cruscotto-core
//!
//! Core traits and the pure computation pipeline shared across the cruscotto
//! ecosystem.
//!
//! - `connector`: the `SeriesConnector` trait implemented by provider clients.
//! - `middleware`: the `Middleware` trait implemented by connector wrappers.
//! - `ingest`: raw payload to `IndicatorSeries` adaptation.
//! - `timeseries`: calendar construction, merge and forward-fill, transforms.
//!
//! Everything outside `connector` is synchronous and free of I/O; the merge
//! engine keeps no state between calls.
#![warn(missing_docs)]

/// Provider connector trait.
pub mod connector;
/// Payload ingestion adapter.
pub mod ingest;
/// Middleware trait implemented by connector wrappers.
pub mod middleware;
/// Calendar, merge and transform utilities.
pub mod timeseries;

pub use connector::SeriesConnector;
pub use ingest::{PayloadShape, ingest, parse_date_token, parse_value, period_token};
pub use middleware::Middleware;
pub use timeseries::calendar::{build_calendar, date_span};
pub use timeseries::merge::{bucket, forward_fill, merge_series, merge_with_columns, try_merge};
pub use timeseries::transform::{apply_transform, year_over_year};

pub use cruscotto_types::*;
