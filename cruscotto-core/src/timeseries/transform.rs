use std::collections::HashMap;

use chrono::{Months, NaiveDate};
use cruscotto_types::{IndicatorSeries, SeriesPoint, Transform};

use crate::CruscottoError;

/// Apply `transform` to an ingested series.
///
/// # Errors
/// Propagates the errors of the selected transform.
pub fn apply_transform(
    series: IndicatorSeries,
    transform: Transform,
) -> Result<IndicatorSeries, CruscottoError> {
    match transform {
        Transform::None => Ok(series),
        Transform::YearOverYear => year_over_year(&series),
    }
}

/// Replace each value by its percent change versus the same period one year
/// earlier: `(v / v_prev - 1) * 100`.
///
/// For monthly data that is the point twelve periods back, for quarterly data
/// four. Points without such a counterpart, or whose counterpart is zero, are
/// dropped rather than zeroed.
///
/// # Errors
/// - `InvalidArg` for daily series, which have no fixed yearly period.
/// - `DataUnavailable` when no point has a counterpart.
pub fn year_over_year(series: &IndicatorSeries) -> Result<IndicatorSeries, CruscottoError> {
    if series.cycle.periods_per_year().is_none() {
        return Err(CruscottoError::InvalidArg(format!(
            "year-over-year needs a monthly or quarterly series, {} is {}",
            series.name, series.cycle
        )));
    }

    let by_period: HashMap<NaiveDate, f64> = series
        .points
        .iter()
        .filter_map(|p| Some((series.cycle.period_start(p.date), p.value?)))
        .collect();

    let points: Vec<SeriesPoint> = series
        .points
        .iter()
        .filter_map(|p| {
            let value = p.value?;
            let period = series.cycle.period_start(p.date);
            let earlier = period.checked_sub_months(Months::new(12))?;
            let base = *by_period.get(&earlier)?;
            if base == 0.0 {
                return None;
            }
            let pct = (value / base - 1.0) * 100.0;
            pct.is_finite().then(|| SeriesPoint::new(p.date, pct))
        })
        .collect();

    if points.is_empty() {
        return Err(CruscottoError::data_unavailable(&series.name));
    }
    Ok(IndicatorSeries::new(&series.name, series.cycle, points))
}
