use chrono::{Months, NaiveDate};
use cruscotto_types::{Cycle, DailyRecord, IndicatorSeries, MergeResult};

use super::calendar::build_calendar;
use crate::CruscottoError;

/// Merge series onto one contiguous daily table.
///
/// Columns are the series names in input order. The engine is total: empty
/// input produces an empty result. See [`merge_with_columns`] for the exact
/// projection and fill rules.
#[must_use]
pub fn merge_series(series: &[IndicatorSeries]) -> MergeResult {
    merge_with_columns(&[], series)
}

/// Merge series onto one contiguous daily table with declared columns.
///
/// `columns` lists indicators that must appear in every row even if they
/// contributed no series (they stay unknown throughout). Series names not in
/// `columns` are appended in input order.
///
/// - Daily points set the value on their exact date.
/// - Monthly points set every day of their calendar month.
/// - Quarterly points set every day of their calendar quarter.
/// - Points with no value set nothing. Later writes overwrite earlier ones,
///   in series order then point order.
/// - Afterwards each indicator's last known value is carried forward into
///   later unknown days. Days before an indicator's first value stay unknown.
#[must_use]
pub fn merge_with_columns(columns: &[String], series: &[IndicatorSeries]) -> MergeResult {
    let mut cols: Vec<String> = Vec::with_capacity(columns.len() + series.len());
    for name in columns.iter().chain(series.iter().map(|s| &s.name)) {
        if !cols.contains(name) {
            cols.push(name.clone());
        }
    }

    let calendar = build_calendar(series);
    let mut records: Vec<DailyRecord> = calendar
        .into_iter()
        .map(|date| {
            let mut r = DailyRecord::new(date);
            r.values.extend(cols.iter().map(|c| (c.clone(), None)));
            r
        })
        .collect();

    for s in series {
        project(&mut records, s);
    }
    forward_fill(&mut records, &cols);
    MergeResult::new(cols, records)
}

/// Merge and report `NoData` when nothing usable was supplied.
///
/// Fails when no series carries a single known value, or when the calendar
/// is empty. Otherwise identical to [`merge_with_columns`].
///
/// # Errors
/// Returns `CruscottoError::NoData` as described above.
pub fn try_merge(
    columns: &[String],
    series: &[IndicatorSeries],
) -> Result<MergeResult, CruscottoError> {
    let usable = series
        .iter()
        .any(|s| s.points.iter().any(|p| p.value.is_some()));
    if !usable {
        return Err(CruscottoError::NoData);
    }
    let merged = merge_with_columns(columns, series);
    if merged.is_empty() {
        return Err(CruscottoError::NoData);
    }
    Ok(merged)
}

/// Carry each column's last known value into later unknown rows.
///
/// Single pass, past to future. Never fills rows before the first known value.
pub fn forward_fill(records: &mut [DailyRecord], columns: &[String]) {
    let mut carried: Vec<Option<f64>> = vec![None; columns.len()];
    for record in records.iter_mut() {
        for (col, last) in columns.iter().zip(carried.iter_mut()) {
            let Some(slot) = record.values.get_mut(col) else {
                continue;
            };
            match *slot {
                Some(v) => *last = Some(v),
                None => *slot = *last,
            }
        }
    }
}

/// First and last calendar day of the bucket holding `date`.
#[must_use]
pub fn bucket(cycle: Cycle, date: NaiveDate) -> (NaiveDate, NaiveDate) {
    let months = match cycle {
        Cycle::Daily => return (date, date),
        Cycle::Monthly => 1,
        Cycle::Quarterly => 3,
    };
    let first = cycle.period_start(date);
    let last = first
        .checked_add_months(Months::new(months))
        .and_then(|next| next.pred_opt())
        .unwrap_or(NaiveDate::MAX);
    (first, last)
}

fn project(records: &mut [DailyRecord], series: &IndicatorSeries) {
    let (Some(start), Some(end)) = (records.first(), records.last()) else {
        return;
    };
    let (start, end) = (start.date, end.date);

    for point in &series.points {
        let Some(value) = point.value else {
            continue;
        };
        let (first, last) = bucket(series.cycle, point.date);
        if last < start || first > end {
            continue;
        }
        let lo = offset(start, first.max(start));
        let hi = offset(start, last.min(end));
        for record in &mut records[lo..=hi] {
            if let Some(slot) = record.values.get_mut(&series.name) {
                *slot = Some(value);
            }
        }
    }
}

fn offset(start: NaiveDate, date: NaiveDate) -> usize {
    usize::try_from((date - start).num_days()).unwrap_or(0)
}
