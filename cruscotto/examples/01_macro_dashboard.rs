mod common;

use chrono::NaiveDate;
use cruscotto::presets::{self, OIL_VS_FX, YIELD_SPREAD};
use cruscotto::{Cruscotto, DateRange};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    common::init_tracing();

    // M2 growth needs a year of history before the first month shown.
    let ecos_range = DateRange::new(
        NaiveDate::from_ymd_opt(2022, 1, 1).ok_or("bad date")?,
        NaiveDate::from_ymd_opt(2024, 6, 30).ok_or("bad date")?,
    )?;

    let cruscotto = Cruscotto::builder()
        .with_connector(common::alphavantage()?)
        .with_connector(common::ecos()?)
        .indicators(presets::market_indicators())
        .indicator(presets::korea_m2_yoy(ecos_range))
        .indicator(presets::korea_base_rate(ecos_range))
        .build()?;

    let mut dash = cruscotto.load_dashboard().await?;

    for w in &dash.report().warnings {
        println!("warning: {w}");
    }
    if let Some(sel) = dash.selection() {
        println!("Showing {} .. {}", sel.start(), sel.end());
    }

    println!("\n## KPIs");
    for kpi in dash.kpis() {
        let arrow = match kpi.is_up() {
            Some(true) => "▲",
            Some(false) => "▼",
            None => " ",
        };
        let change = kpi.change.map_or_else(|| "n/a".to_string(), |c| format!("{c:+.2}"));
        println!(" {arrow} {:<20} {:>10.2}  ({change} {:?})", kpi.label, kpi.value, kpi.kind);
    }

    if let Some(spread) = dash.spread(YIELD_SPREAD.0, YIELD_SPREAD.1) {
        if let Some((date, Some(s))) = spread.last() {
            println!("\n10Y-2Y spread on {date}: {s:+.2}");
        }
    } else {
        println!("\n10Y-2Y spread unavailable");
    }

    if let Some(pairs) = dash.pairs(OIL_VS_FX.0, OIL_VS_FX.1) {
        println!("oil vs USD/KRW: {} scatter points", pairs.len());
    }

    println!("\n## Table (page {} of {})", dash.page(), dash.page_count());
    let names: Vec<String> = dash.columns().iter().map(|c| c.name.clone()).collect();
    while dash.page() <= 2 {
        for row in dash.page_rows() {
            let cells: Vec<String> = names
                .iter()
                .map(|n| row.get(n).map_or_else(|| "-".into(), |v| format!("{v:.2}")))
                .collect();
            println!(" {} | {}", row.date, cells.join(" | "));
        }
        if !dash.next_page() {
            break;
        }
    }
    Ok(())
}
