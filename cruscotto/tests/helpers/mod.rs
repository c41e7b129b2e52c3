#![allow(dead_code)]

// Re-export helpers so tests can `use helpers::*;`
pub mod scripted;

pub use scripted::{DATA_SHAPE, ScriptedBuilder, ScriptedConnector, data};

use chrono::NaiveDate;
use cruscotto::{ConnectorKey, Cycle, DateRange, IndicatorSpec, SeriesId, SeriesRequest};

/// Construct a date from components for readability in tests.
pub fn d(y: i32, m: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, day).expect("valid test date")
}

pub fn range(a: NaiveDate, b: NaiveDate) -> DateRange {
    DateRange::new(a, b).expect("ordered test range")
}

/// Indicator `name` served by `source`, requesting series `code`.
pub fn spec(name: &str, source: ConnectorKey, code: &str, cycle: Cycle) -> IndicatorSpec {
    IndicatorSpec::new(name, source, SeriesRequest::new(SeriesId::new(code), cycle))
}
