//! Indicator sets of the macro dashboard.
//!
//! Market indicators come from Alpha Vantage at daily resolution; Korean
//! monetary statistics come from ECOS at monthly resolution and need an
//! explicit range.

use cruscotto_alphavantage::AvConnector;
use cruscotto_core::{Cycle, DateRange, IndicatorSpec, SeriesId, SeriesRequest, Transform};
use cruscotto_ecos::EcosConnector;

/// Spread plotted by the dashboard: 10Y minus 2Y.
pub const YIELD_SPREAD: (&str, &str) = ("bond10y", "bond2y");

/// Scatter plotted by the dashboard: oil (x) against USD/KRW (y).
pub const OIL_VS_FX: (&str, &str) = ("oil", "usdkrw");

/// USD/KRW daily close.
#[must_use]
pub fn usdkrw() -> IndicatorSpec {
    IndicatorSpec::new(
        "usdkrw",
        AvConnector::KEY,
        SeriesRequest::new(SeriesId::new("FX_DAILY").item("USD/KRW"), Cycle::Daily),
    )
    .label("USD/KRW")
}

/// WTI crude spot price.
#[must_use]
pub fn oil() -> IndicatorSpec {
    IndicatorSpec::new(
        "oil",
        AvConnector::KEY,
        SeriesRequest::new(SeriesId::new("WTI"), Cycle::Daily),
    )
    .label("WTI Crude Oil")
}

fn treasury(name: &str, maturity: &str, label: &str) -> IndicatorSpec {
    IndicatorSpec::new(
        name,
        AvConnector::KEY,
        SeriesRequest::new(
            SeriesId::new("TREASURY_YIELD").param("maturity", maturity),
            Cycle::Daily,
        ),
    )
    .label(label)
    .in_points()
}

/// US 10-year treasury yield.
#[must_use]
pub fn bond10y() -> IndicatorSpec {
    treasury("bond10y", "10year", "US 10Y Treasury")
}

/// US 2-year treasury yield.
#[must_use]
pub fn bond2y() -> IndicatorSpec {
    treasury("bond2y", "2year", "US 2Y Treasury")
}

/// The four market indicators of the dashboard, in display order.
#[must_use]
pub fn market_indicators() -> Vec<IndicatorSpec> {
    vec![usdkrw(), oil(), bond10y(), bond2y()]
}

/// Korean M2 (end of period, seasonally adjusted), as year-over-year growth.
///
/// The range should start a year before the first month of interest so the
/// growth rate is defined from the start.
#[must_use]
pub fn korea_m2_yoy(range: DateRange) -> IndicatorSpec {
    IndicatorSpec::new(
        "m2_yoy",
        EcosConnector::KEY,
        SeriesRequest::new(SeriesId::new("101Y003").item("BBHS00"), Cycle::Monthly)
            .with_range(range),
    )
    .label("Korea M2 YoY (%)")
    .transform(Transform::YearOverYear)
    .in_points()
}

/// Bank of Korea base rate.
#[must_use]
pub fn korea_base_rate(range: DateRange) -> IndicatorSpec {
    IndicatorSpec::new(
        "base_rate",
        EcosConnector::KEY,
        SeriesRequest::new(SeriesId::new("722Y001").item("0101000"), Cycle::Monthly)
            .with_range(range),
    )
    .label("BOK Base Rate")
    .in_points()
}
