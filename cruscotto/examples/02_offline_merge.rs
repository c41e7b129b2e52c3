use chrono::NaiveDate;
use cruscotto::{Cycle, IndicatorSeries, SeriesPoint, merge_series};

fn d(y: i32, m: u32, day: u32) -> Result<NaiveDate, Box<dyn std::error::Error>> {
    NaiveDate::from_ymd_opt(y, m, day).ok_or_else(|| "invalid date".into())
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // A daily series with a weekend gap, a monthly one and a quarterly one.
    let fx = IndicatorSeries::new(
        "usdkrw",
        Cycle::Daily,
        vec![
            SeriesPoint::new(d(2024, 1, 5)?, 1310.0),
            SeriesPoint::new(d(2024, 1, 8)?, 1315.5),
        ],
    );
    let m2 = IndicatorSeries::new(
        "m2",
        Cycle::Monthly,
        vec![SeriesPoint::new(d(2024, 1, 1)?, 3800.0)],
    );
    let gdp = IndicatorSeries::new(
        "gdp",
        Cycle::Quarterly,
        vec![SeriesPoint::new(d(2024, 1, 1)?, 2.1)],
    );

    let merged = merge_series(&[fx, m2, gdp]);
    println!("date       | {}", merged.indicators().join(" | "));
    for row in merged.records() {
        let cells: Vec<String> = merged
            .indicators()
            .iter()
            .map(|n| row.get(n).map_or_else(|| "-".into(), |v| v.to_string()))
            .collect();
        println!("{} | {}", row.date, cells.join(" | "));
    }
    Ok(())
}
