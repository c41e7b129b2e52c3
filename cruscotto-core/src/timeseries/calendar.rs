use chrono::NaiveDate;
use cruscotto_types::IndicatorSeries;

/// Earliest and latest point date across all series.
///
/// Points with an absent value still count; series without points do not.
pub fn date_span<'a, I>(series: I) -> Option<(NaiveDate, NaiveDate)>
where
    I: IntoIterator<Item = &'a IndicatorSeries>,
{
    series
        .into_iter()
        .filter_map(IndicatorSeries::span)
        .reduce(|(lo, hi), (a, b)| (lo.min(a), hi.max(b)))
}

/// Every calendar day from the global minimum to the global maximum point
/// date, inclusive and ascending. Empty when no series has a point.
#[must_use]
pub fn build_calendar(series: &[IndicatorSeries]) -> Vec<NaiveDate> {
    let Some((start, end)) = date_span(series) else {
        return Vec::new();
    };
    start.iter_days().take_while(|d| *d <= end).collect()
}
