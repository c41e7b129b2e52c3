use chrono::NaiveDate;
use cruscotto_core::{
    ConnectorKey, Cycle, CruscottoError, IndicatorSeries, PayloadShape, RawPayload, SeriesId,
    SeriesPoint, SeriesRequest, ingest, merge_series, merge_with_columns, try_merge,
};
use serde_json::json;

fn d(y: i32, m: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, day).unwrap()
}

fn daily(name: &str, points: &[(NaiveDate, f64)]) -> IndicatorSeries {
    IndicatorSeries::new(
        name,
        Cycle::Daily,
        points.iter().map(|&(dt, v)| SeriesPoint::new(dt, v)).collect(),
    )
}

#[test]
fn calendar_covers_every_day_between_extremes() {
    let a = daily("a", &[(d(2024, 1, 1), 1.0)]);
    let b = daily("b", &[(d(2024, 1, 5), 2.0)]);
    let merged = merge_series(&[a, b]);
    let dates: Vec<_> = merged.dates().collect();
    assert_eq!(
        dates,
        vec![d(2024, 1, 1), d(2024, 1, 2), d(2024, 1, 3), d(2024, 1, 4), d(2024, 1, 5)]
    );
}

#[test]
fn monthly_buckets_fill_whole_month_then_carry_forward() {
    const SHAPE: PayloadShape = PayloadShape::Array {
        path: &["data"],
        date_field: "date",
        value_field: "value",
    };
    let body = json!({"data": [
        {"date": "2024-02-15", "value": "110"},
        {"date": "2024-01-15", "value": "100"},
    ]});
    let req = SeriesRequest::new(SeriesId::new("M2"), Cycle::Monthly);
    let monthly = ingest(
        "m2",
        &req,
        &SHAPE,
        &RawPayload::new(ConnectorKey::new("test"), body),
    )
    .unwrap();
    let anchor = daily("fx", &[(d(2024, 3, 10), 1.0)]);

    let merged = merge_series(&[monthly, anchor]);
    assert_eq!(merged.first().map(|r| r.date), Some(d(2024, 1, 1)));
    for r in merged.records() {
        let expected = if r.date < d(2024, 2, 1) { 100.0 } else { 110.0 };
        assert_eq!(r.get("m2"), Some(expected), "{}", r.date);
    }
    assert_eq!(merged.record(d(2024, 2, 29)).and_then(|r| r.get("m2")), Some(110.0));
    assert_eq!(merged.record(d(2024, 3, 10)).and_then(|r| r.get("m2")), Some(110.0));
}

#[test]
fn no_backfill_before_first_observation() {
    let fx = daily("usdkrw", &[(d(2024, 1, 2), 1300.0), (d(2024, 3, 5), 1330.0)]);
    let bond = daily("bond10y", &[(d(2024, 3, 1), 4.2)]);
    let merged = merge_series(&[fx, bond]);

    assert_eq!(merged.record(d(2024, 2, 28)).and_then(|r| r.get("bond10y")), None);
    assert_eq!(merged.record(d(2024, 2, 28)).and_then(|r| r.get("usdkrw")), Some(1300.0));
    assert_eq!(merged.record(d(2024, 3, 1)).and_then(|r| r.get("bond10y")), Some(4.2));
    assert_eq!(merged.record(d(2024, 3, 5)).and_then(|r| r.get("bond10y")), Some(4.2));
}

#[test]
fn quarterly_point_covers_its_three_months() {
    let gdp = IndicatorSeries::new("gdp", Cycle::Quarterly, vec![SeriesPoint::new(d(2024, 1, 1), 2.5)]);
    let early = daily("fx", &[(d(2023, 12, 30), 1.0), (d(2024, 4, 2), 1.0)]);
    let merged = merge_series(&[gdp, early]);

    assert_eq!(merged.record(d(2023, 12, 31)).and_then(|r| r.get("gdp")), None);
    for r in merged.records().iter().filter(|r| r.date >= d(2024, 1, 1)) {
        assert_eq!(r.get("gdp"), Some(2.5), "{}", r.date);
    }
}

#[test]
fn monthly_point_stays_inside_its_month() {
    let m = IndicatorSeries::new("cpi", Cycle::Monthly, vec![SeriesPoint::new(d(2024, 2, 1), 3.1)]);
    let fx = daily("fx", &[(d(2024, 1, 20), 1.0), (d(2024, 3, 3), 1.0)]);
    let merged = merge_series(&[m, fx]);
    assert_eq!(merged.record(d(2024, 1, 31)).and_then(|r| r.get("cpi")), None);
    assert_eq!(merged.record(d(2024, 2, 1)).and_then(|r| r.get("cpi")), Some(3.1));
}

#[test]
fn rerun_is_byte_identical() {
    let series = vec![
        daily("b", &[(d(2024, 1, 3), 2.0), (d(2024, 1, 9), 2.5)]),
        IndicatorSeries::new("a", Cycle::Monthly, vec![SeriesPoint::new(d(2024, 1, 1), 9.0)]),
    ];
    let first = serde_json::to_string(&merge_series(&series)).unwrap();
    let second = serde_json::to_string(&merge_series(&series)).unwrap();
    assert_eq!(first, second);
}

#[test]
fn failed_indicator_column_is_unknown_everywhere() {
    let columns = vec!["oil".to_string(), "bond10y".to_string(), "usdkrw".to_string()];
    let oil = daily("oil", &[(d(2024, 1, 1), 75.0), (d(2024, 1, 4), 76.0)]);
    let fx = daily("usdkrw", &[(d(2024, 1, 2), 1300.0)]);
    let merged = try_merge(&columns, &[oil, fx]).unwrap();

    assert_eq!(merged.indicators(), columns.as_slice());
    assert_eq!(merged.len(), 4);
    assert!(merged.records().iter().all(|r| r.values.contains_key("bond10y")));
    assert!(merged.column("bond10y").unwrap().iter().all(Option::is_none));
    assert_eq!(merged.column("oil").unwrap(), vec![Some(75.0), Some(75.0), Some(75.0), Some(76.0)]);
}

#[test]
fn empty_input_is_no_data() {
    assert_eq!(try_merge(&[], &[]), Err(CruscottoError::NoData));
    let merged = merge_with_columns(&["x".to_string()], &[]);
    assert!(merged.is_empty());
    assert_eq!(merged.indicators(), ["x".to_string()]);
}
