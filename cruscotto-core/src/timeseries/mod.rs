//! Daily alignment of heterogeneous-frequency series.
//!
//! Modules include:
//! - `calendar`: the contiguous daily date axis spanning every ingested point
//! - `merge`: bucket projection and left-to-right forward-fill
//! - `transform`: value transforms applied to a single series (year-over-year)
/// Contiguous daily calendar construction.
pub mod calendar;
/// Projection of series onto the calendar and forward-fill.
pub mod merge;
/// Per-series value transforms.
pub mod transform;
