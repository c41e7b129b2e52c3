//! Series and table data model.

use std::collections::BTreeMap;

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::error::CruscottoError;

/// Native sampling frequency of an indicator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Cycle {
    /// One observation per business day.
    Daily,
    /// One observation per calendar month.
    Monthly,
    /// One observation per calendar quarter.
    Quarterly,
}

impl Cycle {
    /// Stable lowercase label.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Daily => "daily",
            Self::Monthly => "monthly",
            Self::Quarterly => "quarterly",
        }
    }

    /// Number of periods in one year, `None` for daily data.
    #[must_use]
    pub const fn periods_per_year(self) -> Option<u32> {
        match self {
            Self::Daily => None,
            Self::Monthly => Some(12),
            Self::Quarterly => Some(4),
        }
    }

    /// First calendar day of the period that contains `date`.
    ///
    /// Daily periods are the day itself.
    #[must_use]
    pub fn period_start(self, date: NaiveDate) -> NaiveDate {
        let month = match self {
            Self::Daily => return date,
            Self::Monthly => date.month(),
            Self::Quarterly => quarter_of(date) * 3 + 1,
        };
        NaiveDate::from_ymd_opt(date.year(), month, 1).unwrap_or(date)
    }
}

impl std::fmt::Display for Cycle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Zero-based quarter index (`(month - 1) / 3`).
#[must_use]
pub fn quarter_of(date: NaiveDate) -> u32 {
    date.month0() / 3
}

/// Inclusive calendar date range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DateRange {
    start: NaiveDate,
    end: NaiveDate,
}

impl DateRange {
    /// Build a range, rejecting `start > end`.
    ///
    /// # Errors
    /// Returns `InvalidArg` when the bounds are reversed.
    pub fn new(start: NaiveDate, end: NaiveDate) -> Result<Self, CruscottoError> {
        if start > end {
            return Err(CruscottoError::InvalidArg(format!(
                "date range start {start} is after end {end}"
            )));
        }
        Ok(Self { start, end })
    }

    /// First day of the range.
    #[must_use]
    pub const fn start(&self) -> NaiveDate {
        self.start
    }

    /// Last day of the range.
    #[must_use]
    pub const fn end(&self) -> NaiveDate {
        self.end
    }

    /// Whether `date` falls within the range.
    #[must_use]
    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }
}

/// One observation of an indicator.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SeriesPoint {
    /// Observation date (period start for monthly/quarterly data).
    pub date: NaiveDate,
    /// Observed value, `None` when the provider reported nothing usable.
    pub value: Option<f64>,
}

impl SeriesPoint {
    /// Convenience constructor for a known value.
    #[must_use]
    pub const fn new(date: NaiveDate, value: f64) -> Self {
        Self {
            date,
            value: Some(value),
        }
    }
}

/// A named indicator with its native cycle and ascending points.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndicatorSeries {
    /// Unique indicator key, e.g. `"usdkrw"`.
    pub name: String,
    /// Native sampling frequency.
    pub cycle: Cycle,
    /// Points sorted ascending by date, dates unique.
    pub points: Vec<SeriesPoint>,
}

impl IndicatorSeries {
    /// Build a series, sorting points by date.
    ///
    /// When two points share a date the later one in input order is kept.
    pub fn new(name: impl Into<String>, cycle: Cycle, mut points: Vec<SeriesPoint>) -> Self {
        // stable: equal dates keep input order, so the last of a run is the latest
        points.sort_by_key(|p| p.date);
        let mut out: Vec<SeriesPoint> = Vec::with_capacity(points.len());
        for p in points {
            match out.last_mut() {
                Some(last) if last.date == p.date => *last = p,
                _ => out.push(p),
            }
        }
        Self {
            name: name.into(),
            cycle,
            points: out,
        }
    }

    /// True when no points are present.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Earliest and latest point dates.
    #[must_use]
    pub fn span(&self) -> Option<(NaiveDate, NaiveDate)> {
        Some((self.points.first()?.date, self.points.last()?.date))
    }
}

/// One row of the merged daily table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyRecord {
    /// Row key.
    pub date: NaiveDate,
    /// Indicator name to value; `None` means unknown.
    pub values: BTreeMap<String, Option<f64>>,
}

impl DailyRecord {
    /// An empty row for `date`.
    #[must_use]
    pub const fn new(date: NaiveDate) -> Self {
        Self {
            date,
            values: BTreeMap::new(),
        }
    }

    /// Known value of `indicator` on this row.
    #[must_use]
    pub fn get(&self, indicator: &str) -> Option<f64> {
        self.values.get(indicator).copied().flatten()
    }
}

/// The merged, contiguous, ascending daily table.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct MergeResult {
    indicators: Vec<String>,
    records: Vec<DailyRecord>,
}

impl MergeResult {
    /// Assemble a result from its columns and rows.
    ///
    /// Rows are expected to be ascending and contiguous; the merge engine is
    /// the only producer.
    #[must_use]
    pub const fn new(indicators: Vec<String>, records: Vec<DailyRecord>) -> Self {
        Self {
            indicators,
            records,
        }
    }

    /// Column names in declaration order.
    #[must_use]
    pub fn indicators(&self) -> &[String] {
        &self.indicators
    }

    /// Rows ascending by date.
    #[must_use]
    pub fn records(&self) -> &[DailyRecord] {
        &self.records
    }

    /// Consume into rows.
    #[must_use]
    pub fn into_records(self) -> Vec<DailyRecord> {
        self.records
    }

    /// Number of rows.
    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// True when there are no rows.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Row dates in order.
    pub fn dates(&self) -> impl Iterator<Item = NaiveDate> + '_ {
        self.records.iter().map(|r| r.date)
    }

    /// First row, if any.
    #[must_use]
    pub fn first(&self) -> Option<&DailyRecord> {
        self.records.first()
    }

    /// Last row, if any.
    #[must_use]
    pub fn last(&self) -> Option<&DailyRecord> {
        self.records.last()
    }

    /// Row for `date`, if in range.
    #[must_use]
    pub fn record(&self, date: NaiveDate) -> Option<&DailyRecord> {
        self.records
            .binary_search_by_key(&date, |r| r.date)
            .ok()
            .map(|i| &self.records[i])
    }

    /// All values of one indicator in row order, `None` for unknown names.
    #[must_use]
    pub fn column(&self, indicator: &str) -> Option<Vec<Option<f64>>> {
        if !self.indicators.iter().any(|i| i == indicator) {
            return None;
        }
        Some(self.records.iter().map(|r| r.get(indicator)).collect())
    }

    /// Rows whose date falls inside `range`, keeping the same columns.
    #[must_use]
    pub fn slice(&self, range: &DateRange) -> Self {
        let lo = self.records.partition_point(|r| r.date < range.start());
        let hi = self.records.partition_point(|r| r.date <= range.end());
        Self {
            indicators: self.indicators.clone(),
            records: self.records[lo..hi.max(lo)].to_vec(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    #[test]
    fn period_start_by_cycle() {
        assert_eq!(Cycle::Daily.period_start(d(2024, 5, 17)), d(2024, 5, 17));
        assert_eq!(Cycle::Monthly.period_start(d(2024, 5, 17)), d(2024, 5, 1));
        assert_eq!(Cycle::Quarterly.period_start(d(2024, 5, 17)), d(2024, 4, 1));
        assert_eq!(Cycle::Quarterly.period_start(d(2024, 12, 31)), d(2024, 10, 1));
    }

    #[test]
    fn series_sorts_and_keeps_last_duplicate() {
        let s = IndicatorSeries::new(
            "x",
            Cycle::Daily,
            vec![
                SeriesPoint::new(d(2024, 1, 3), 3.0),
                SeriesPoint::new(d(2024, 1, 1), 1.0),
                SeriesPoint::new(d(2024, 1, 3), 30.0),
            ],
        );
        let values: Vec<_> = s.points.iter().map(|p| (p.date, p.value)).collect();
        assert_eq!(
            values,
            vec![(d(2024, 1, 1), Some(1.0)), (d(2024, 1, 3), Some(30.0))]
        );
        assert_eq!(s.span(), Some((d(2024, 1, 1), d(2024, 1, 3))));
    }

    #[test]
    fn reversed_range_is_rejected() {
        assert!(matches!(
            DateRange::new(d(2024, 2, 1), d(2024, 1, 1)),
            Err(CruscottoError::InvalidArg(_))
        ));
    }

    #[test]
    fn slice_and_lookup() {
        let records: Vec<DailyRecord> = (1..=5)
            .map(|day| {
                let mut r = DailyRecord::new(d(2024, 1, day));
                r.values.insert("a".into(), Some(f64::from(day)));
                r
            })
            .collect();
        let result = MergeResult::new(vec!["a".into()], records);

        let sub = result.slice(&DateRange::new(d(2024, 1, 2), d(2024, 1, 3)).unwrap());
        assert_eq!(sub.len(), 2);
        assert_eq!(sub.first().map(|r| r.date), Some(d(2024, 1, 2)));

        let outside = result.slice(&DateRange::new(d(2025, 1, 1), d(2025, 1, 2)).unwrap());
        assert!(outside.is_empty());

        assert_eq!(result.record(d(2024, 1, 4)).and_then(|r| r.get("a")), Some(4.0));
        assert_eq!(result.column("missing"), None);
        assert_eq!(result.column("a").map(|c| c.len()), Some(5));
    }
}
