//! Deterministic payload generators.
//!
//! Values depend only on the series code and the period index, so repeated
//! requests produce identical payloads.

use chrono::{Datelike, Months, NaiveDate, Weekday};
use cruscotto_core::{Cycle, DateRange, period_token};
use serde_json::{Map, Value, json};

/// Top-level key of the FX daily payload.
pub const FX_SERIES_KEY: &str = "Time Series FX (Daily)";
/// Field holding the closing rate in each FX entry.
pub const CLOSE_FIELD: &str = "4. close";

/// Range served when a request carries none: 2023-01-01 to 2024-06-30.
pub fn default_range() -> Option<DateRange> {
    let start = NaiveDate::from_ymd_opt(2023, 1, 1)?;
    let end = NaiveDate::from_ymd_opt(2024, 6, 30)?;
    DateRange::new(start, end).ok()
}

fn base_level(code: &str) -> f64 {
    let sum: u32 = code.bytes().map(u32::from).sum();
    f64::from(sum % 97 + 3)
}

fn level(code: &str, idx: usize) -> f64 {
    let wiggle = [0.0, 0.25, 0.5, 0.25, 0.0, -0.25, -0.5];
    let drift = (idx / wiggle.len()) as f64 * 0.1;
    base_level(code) + drift + wiggle[idx % wiggle.len()]
}

/// Period starts inside `range`; weekends are skipped for daily data.
pub fn periods(cycle: Cycle, range: &DateRange) -> Vec<NaiveDate> {
    let mut out = Vec::new();
    let mut cur = cycle.period_start(range.start());
    while cur <= range.end() {
        let weekend = matches!(cur.weekday(), Weekday::Sat | Weekday::Sun);
        if cycle != Cycle::Daily || !weekend {
            out.push(cur);
        }
        let next = match cycle {
            Cycle::Daily => cur.succ_opt(),
            Cycle::Monthly => cur.checked_add_months(Months::new(1)),
            Cycle::Quarterly => cur.checked_add_months(Months::new(3)),
        };
        match next {
            Some(n) => cur = n,
            None => break,
        }
    }
    out
}

/// `{"data": [{"date": .., "value": ..}]}`, dates rendered as provider tokens.
pub fn array_payload(code: &str, cycle: Cycle, range: &DateRange) -> Value {
    let rows: Vec<Value> = periods(cycle, range)
        .into_iter()
        .enumerate()
        .map(|(i, date)| {
            let token = match cycle {
                Cycle::Daily => date.format("%Y-%m-%d").to_string(),
                _ => period_token(date, cycle),
            };
            json!({"date": token, "value": format!("{:.2}", level(code, i))})
        })
        .collect();
    json!({"name": code, "interval": cycle.as_str(), "data": rows})
}

/// Daily FX payload keyed by date with OHLC sub-fields.
pub fn keyed_payload(code: &str, range: &DateRange) -> Value {
    let mut series = Map::new();
    for (i, date) in periods(Cycle::Daily, range).into_iter().enumerate() {
        let close = level(code, i) * 13.0;
        series.insert(
            date.format("%Y-%m-%d").to_string(),
            json!({
                "1. open": format!("{:.4}", close - 1.0),
                "2. high": format!("{:.4}", close + 2.0),
                "3. low": format!("{:.4}", close - 2.0),
                CLOSE_FIELD: format!("{close:.4}"),
            }),
        );
    }
    json!({
        "Meta Data": {"1. Information": "Forex Daily Prices (open, high, low, close)"},
        FX_SERIES_KEY: series,
    })
}
