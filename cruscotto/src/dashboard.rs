//! Presentation state over a loaded table.
//!
//! A [`Dashboard`] owns the last [`LoadReport`] together with the current date
//! selection and table page. All derived views (KPIs, spread, scatter pairs,
//! table pages) are computed from the visible rows.

use chrono::{Months, NaiveDate};
use cruscotto_core::{ChangeKind, DailyRecord, DateRange, IndicatorSpec, LoadReport, MergeResult};
use serde::Serialize;

/// Rows per table page unless configured otherwise.
pub const DEFAULT_PAGE_SIZE: usize = 10;

/// Headline figure for one indicator.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Kpi {
    /// Indicator key.
    pub name: String,
    /// Display label.
    pub label: String,
    /// Value on the last visible row.
    pub value: f64,
    /// Change versus the previous visible row, in `kind` units.
    pub change: Option<f64>,
    /// Unit of `change`.
    pub kind: ChangeKind,
}

impl Kpi {
    /// `Some(true)` when the indicator rose or stayed flat.
    #[must_use]
    pub fn is_up(&self) -> Option<bool> {
        self.change.map(|c| c >= 0.0)
    }
}

/// Column metadata for the data table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Column {
    /// Indicator key.
    pub name: String,
    /// Display label.
    pub label: String,
    /// How changes are expressed.
    #[serde(skip)]
    pub change: ChangeKind,
}

/// Dashboard state: loaded data, selection and pagination.
#[derive(Debug, Clone)]
pub struct Dashboard {
    report: LoadReport,
    columns: Vec<Column>,
    selection: Option<DateRange>,
    visible: MergeResult,
    page_size: usize,
    page: usize,
}

impl Dashboard {
    /// Build from a report and the indicator declarations that produced it.
    ///
    /// Only available indicators become columns. The initial selection is the
    /// last year of data, clamped to the first loaded date. A year before a
    /// leap day is the last day of February.
    #[must_use]
    pub fn new(report: LoadReport, specs: &[IndicatorSpec]) -> Self {
        let columns = report
            .available
            .iter()
            .map(|name| {
                let spec = specs.iter().find(|s| &s.name == name);
                Column {
                    name: name.clone(),
                    label: spec.map_or_else(|| name.clone(), |s| s.label.clone()),
                    change: spec.map_or(ChangeKind::Percent, |s| s.change),
                }
            })
            .collect();
        let selection = default_selection(&report.result);
        let visible = selection.map_or_else(|| report.result.clone(), |r| report.result.slice(&r));
        Self {
            report,
            columns,
            selection,
            visible,
            page_size: DEFAULT_PAGE_SIZE,
            page: 1,
        }
    }

    /// Use `size` rows per page (at least one). Resets to the first page.
    #[must_use]
    pub fn with_page_size(mut self, size: usize) -> Self {
        self.page_size = size.max(1);
        self.page = 1;
        self
    }

    /// The report this dashboard was built from.
    #[must_use]
    pub const fn report(&self) -> &LoadReport {
        &self.report
    }

    /// Available columns in declaration order.
    #[must_use]
    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    /// Current date selection, `None` when nothing was loaded.
    #[must_use]
    pub const fn selection(&self) -> Option<DateRange> {
        self.selection
    }

    /// Restrict the visible rows to `range` and return to the first page.
    pub fn select_range(&mut self, range: DateRange) {
        self.visible = self.report.result.slice(&range);
        self.selection = Some(range);
        self.page = 1;
    }

    /// Rows inside the current selection.
    #[must_use]
    pub const fn visible(&self) -> &MergeResult {
        &self.visible
    }

    /// Visible values of one available indicator, for charting.
    #[must_use]
    pub fn series(&self, name: &str) -> Option<Vec<(NaiveDate, Option<f64>)>> {
        if !self.is_available(name) {
            return None;
        }
        Some(
            self.visible
                .records()
                .iter()
                .map(|r| (r.date, r.get(name)))
                .collect(),
        )
    }

    fn is_available(&self, name: &str) -> bool {
        self.report.is_available(name)
    }

    /// Current page, starting at 1.
    #[must_use]
    pub const fn page(&self) -> usize {
        self.page
    }

    /// Number of pages for the visible rows.
    #[must_use]
    pub fn page_count(&self) -> usize {
        self.visible.len().div_ceil(self.page_size)
    }

    /// Rows of the current page.
    #[must_use]
    pub fn page_rows(&self) -> &[DailyRecord] {
        let rows = self.visible.records();
        let start = (self.page - 1).saturating_mul(self.page_size).min(rows.len());
        let end = start.saturating_add(self.page_size).min(rows.len());
        &rows[start..end]
    }

    /// Jump to page `n`, clamped to the valid range.
    pub fn go_to(&mut self, n: usize) {
        self.page = n.clamp(1, self.page_count().max(1));
    }

    /// Whether a later page exists.
    #[must_use]
    pub fn has_next(&self) -> bool {
        self.page < self.page_count()
    }

    /// Whether an earlier page exists.
    #[must_use]
    pub const fn has_prev(&self) -> bool {
        self.page > 1
    }

    /// Advance one page; returns whether the page changed.
    pub fn next_page(&mut self) -> bool {
        let moved = self.has_next();
        if moved {
            self.page += 1;
        }
        moved
    }

    /// Go back one page; returns whether the page changed.
    pub fn prev_page(&mut self) -> bool {
        let moved = self.has_prev();
        if moved {
            self.page -= 1;
        }
        moved
    }

    /// Headline figures for available indicators with a known latest value.
    ///
    /// The change compares the last visible row with the one before it (or
    /// with itself when only one row is visible).
    #[must_use]
    pub fn kpis(&self) -> Vec<Kpi> {
        let rows = self.visible.records();
        let Some(latest) = rows.last() else {
            return Vec::new();
        };
        let prev = rows.len().checked_sub(2).map_or(latest, |i| &rows[i]);

        self.columns
            .iter()
            .filter_map(|col| {
                let value = latest.get(&col.name)?;
                let change = prev.get(&col.name).and_then(|p| match col.change {
                    ChangeKind::Points => Some(value - p),
                    ChangeKind::Percent => {
                        let pct = (value / p - 1.0) * 100.0;
                        pct.is_finite().then_some(pct)
                    }
                });
                Some(Kpi {
                    name: col.name.clone(),
                    label: col.label.clone(),
                    value,
                    change,
                    kind: col.change,
                })
            })
            .collect()
    }

    /// `a - b` over the visible rows, unknown where either side is unknown.
    ///
    /// `None` unless both indicators loaded.
    #[must_use]
    pub fn spread(&self, a: &str, b: &str) -> Option<Vec<(NaiveDate, Option<f64>)>> {
        if !(self.is_available(a) && self.is_available(b)) {
            return None;
        }
        Some(
            self.visible
                .records()
                .iter()
                .map(|r| (r.date, r.get(a).zip(r.get(b)).map(|(x, y)| x - y)))
                .collect(),
        )
    }

    /// `(x, y)` pairs of visible rows where both are known.
    ///
    /// `None` unless both indicators loaded.
    #[must_use]
    pub fn pairs(&self, x: &str, y: &str) -> Option<Vec<(f64, f64)>> {
        if !(self.is_available(x) && self.is_available(y)) {
            return None;
        }
        Some(
            self.visible
                .records()
                .iter()
                .filter_map(|r| r.get(x).zip(r.get(y)))
                .collect(),
        )
    }
}

// One calendar year back, clamped to the month end: a last date of
// 2024-02-29 starts the selection on 2023-02-28, not 2023-03-01.
fn default_selection(result: &MergeResult) -> Option<DateRange> {
    let (first, last) = (result.first()?.date, result.last()?.date);
    let start = last
        .checked_sub_months(Months::new(12))
        .map_or(first, |d| d.max(first));
    DateRange::new(start, last).ok()
}
