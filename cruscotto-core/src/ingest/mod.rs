//! Series ingestion adapter.
//!
//! Converts a raw provider payload into an [`IndicatorSeries`]. The payload
//! layout is described by a [`PayloadShape`] declared by the connector that
//! produced it, so no key probing happens here.

mod date;
mod value;

pub use date::{parse_date_token, period_token};
pub use value::parse_value;

use chrono::NaiveDate;
use cruscotto_types::{Cycle, DateRange, IndicatorSeries, RawPayload, SeriesPoint, SeriesRequest};
use serde_json::Value;

use crate::CruscottoError;

/// Layout of the series inside a provider response.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PayloadShape {
    /// An array of records, each holding a date field and a value field.
    ///
    /// `{"data": [{"date": "2024-01-02", "value": "4.05"}, ...]}`
    Array {
        /// Object keys leading from the root to the array.
        path: &'static [&'static str],
        /// Field holding the date token.
        date_field: &'static str,
        /// Field holding the value.
        value_field: &'static str,
    },
    /// An object keyed by date whose entries carry several named sub-fields.
    ///
    /// `{"Time Series FX (Daily)": {"2024-01-02": {"4. close": "1300.1", ...}}}`
    KeyedObject {
        /// Object keys leading from the root to the date-keyed object.
        path: &'static [&'static str],
        /// Sub-field holding the closing value.
        close_field: &'static str,
    },
}

impl PayloadShape {
    const fn path(&self) -> &'static [&'static str] {
        match self {
            Self::Array { path, .. } | Self::KeyedObject { path, .. } => path,
        }
    }

    fn locate<'a>(&self, body: &'a Value) -> Option<&'a Value> {
        self.path()
            .iter()
            .try_fold(body, |node, key| node.get(*key))
            .filter(|node| !node.is_null())
    }
}

/// Adapt `payload` into a series named `name`.
///
/// Entries with unparseable dates or values are dropped. Dates of monthly and
/// quarterly series are normalized to the first day of their period; when two
/// entries land on the same date the later one in payload order wins. Points
/// outside `req.range` are discarded.
///
/// # Errors
/// - `DataUnavailable` when the series key is absent or no usable point remains.
/// - `Parse` when the series key holds a value of the wrong JSON type.
#[cfg_attr(
    feature = "tracing",
    tracing::instrument(
        name = "cruscotto_core::ingest",
        skip_all,
        fields(indicator = name, connector = payload.connector.as_str(), cycle = req.cycle.as_str()),
    )
)]
pub fn ingest(
    name: &str,
    req: &SeriesRequest,
    shape: &PayloadShape,
    payload: &RawPayload,
) -> Result<IndicatorSeries, CruscottoError> {
    let node = shape
        .locate(&payload.body)
        .ok_or_else(|| CruscottoError::data_unavailable(name))?;

    let raw: Vec<(Option<NaiveDate>, Option<f64>)> = match shape {
        PayloadShape::Array {
            date_field,
            value_field,
            ..
        } => node
            .as_array()
            .ok_or_else(|| {
                CruscottoError::parse(name, format!("expected an array at {:?}", shape.path()))
            })?
            .iter()
            .map(|item| {
                let date = item
                    .get(*date_field)
                    .and_then(Value::as_str)
                    .and_then(parse_date_token);
                let value = item.get(*value_field).and_then(parse_value);
                (date, value)
            })
            .collect(),
        PayloadShape::KeyedObject { close_field, .. } => node
            .as_object()
            .ok_or_else(|| {
                CruscottoError::parse(name, format!("expected an object at {:?}", shape.path()))
            })?
            .iter()
            .map(|(token, entry)| {
                (
                    parse_date_token(token),
                    entry.get(*close_field).and_then(parse_value),
                )
            })
            .collect(),
    };

    #[cfg(feature = "tracing")]
    let total = raw.len();
    let points: Vec<SeriesPoint> = raw
        .into_iter()
        .filter_map(|(date, value)| {
            let date = req.cycle.period_start(date?);
            Some(SeriesPoint::new(date, value?))
        })
        .filter(|p| in_range(req.cycle, req.range.as_ref(), p.date))
        .collect();

    #[cfg(feature = "tracing")]
    if points.len() < total {
        tracing::debug!(
            indicator = name,
            kept = points.len(),
            dropped = total - points.len(),
            "dropped unusable or out-of-range entries"
        );
    }

    if points.is_empty() {
        return Err(CruscottoError::data_unavailable(name));
    }
    Ok(IndicatorSeries::new(name, req.cycle, points))
}

// A period overlapping the range start is kept whole.
fn in_range(cycle: Cycle, range: Option<&DateRange>, date: NaiveDate) -> bool {
    range.is_none_or(|r| cycle.period_start(r.start()) <= date && date <= r.end())
}

#[cfg(test)]
mod tests {
    use super::*;
    use cruscotto_types::{ConnectorKey, SeriesId};
    use serde_json::json;

    const AV: ConnectorKey = ConnectorKey::new("av");

    const DATA: PayloadShape = PayloadShape::Array {
        path: &["data"],
        date_field: "date",
        value_field: "value",
    };

    const FX: PayloadShape = PayloadShape::KeyedObject {
        path: &["Time Series FX (Daily)"],
        close_field: "4. close",
    };

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    fn req(cycle: Cycle) -> SeriesRequest {
        SeriesRequest::new(SeriesId::new("X"), cycle)
    }

    #[test]
    fn array_shape_is_sorted_and_filtered() {
        let body = json!({"data": [
            {"date": "2024-01-03", "value": "4.10"},
            {"date": "2024-01-02", "value": "."},
            {"date": "2024-01-01", "value": "0"},
            {"date": "bogus", "value": "1"},
        ]});
        let s = ingest("bond10y", &req(Cycle::Daily), &DATA, &RawPayload::new(AV, body)).unwrap();
        let got: Vec<_> = s.points.iter().map(|p| (p.date, p.value)).collect();
        assert_eq!(
            got,
            vec![(d(2024, 1, 1), Some(0.0)), (d(2024, 1, 3), Some(4.10))]
        );
        assert_eq!(s.cycle, Cycle::Daily);
    }

    #[test]
    fn keyed_shape_picks_close_field() {
        let body = json!({
            "Meta Data": {"1. Information": "FX Daily Prices"},
            "Time Series FX (Daily)": {
                "2024-01-03": {"1. open": "1.0", "4. close": "1310.5"},
                "2024-01-02": {"1. open": "2.0", "4. close": "1300.0"},
            }
        });
        let s = ingest("usdkrw", &req(Cycle::Daily), &FX, &RawPayload::new(AV, body)).unwrap();
        assert_eq!(s.points.len(), 2);
        assert_eq!(s.points[0].value, Some(1300.0));
        assert_eq!(s.points[1].value, Some(1310.5));
    }

    #[test]
    fn missing_key_is_data_unavailable() {
        let body = json!({"Information": "rate limited"});
        let err = ingest("oil", &req(Cycle::Daily), &DATA, &RawPayload::new(AV, body)).unwrap_err();
        assert!(matches!(err, CruscottoError::DataUnavailable { ref indicator } if indicator == "oil"));
    }

    #[test]
    fn all_invalid_is_data_unavailable() {
        let body = json!({"data": [{"date": "2024-01-01", "value": "."}]});
        let err = ingest("oil", &req(Cycle::Daily), &DATA, &RawPayload::new(AV, body)).unwrap_err();
        assert!(matches!(err, CruscottoError::DataUnavailable { .. }));
    }

    #[test]
    fn wrong_type_is_parse_failure() {
        let body = json!({"data": {"2024-01-01": "1"}});
        let err = ingest("oil", &req(Cycle::Daily), &DATA, &RawPayload::new(AV, body)).unwrap_err();
        assert!(matches!(err, CruscottoError::Parse { .. }));
        assert!(err.is_parse_failure());
    }

    #[test]
    fn monthly_points_normalize_to_month_start_last_wins() {
        let body = json!({"data": [
            {"date": "2024-01-15", "value": "100"},
            {"date": "2024-01-20", "value": "101"},
            {"date": "202402", "value": "110"},
        ]});
        let s = ingest("m2", &req(Cycle::Monthly), &DATA, &RawPayload::new(AV, body)).unwrap();
        let got: Vec<_> = s.points.iter().map(|p| (p.date, p.value)).collect();
        assert_eq!(
            got,
            vec![(d(2024, 1, 1), Some(101.0)), (d(2024, 2, 1), Some(110.0))]
        );
    }

    #[test]
    fn range_clips_but_keeps_overlapping_period() {
        let body = json!({"data": [
            {"date": "2023Q4", "value": "1"},
            {"date": "2024Q1", "value": "2"},
            {"date": "2024Q2", "value": "3"},
        ]});
        let range = DateRange::new(d(2024, 2, 10), d(2024, 3, 31)).unwrap();
        let r = req(Cycle::Quarterly).with_range(range);
        let s = ingest("gdp", &r, &DATA, &RawPayload::new(AV, body)).unwrap();
        assert_eq!(s.points, vec![SeriesPoint::new(d(2024, 1, 1), 2.0)]);
    }
}
