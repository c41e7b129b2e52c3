use std::sync::Arc;
use std::time::Duration;

use cruscotto::presets;
use cruscotto::{
    Cruscotto, QuotaAwareConnector, QuotaConfig, QuotaConsumptionStrategy, SeriesConnector,
};
use cruscotto_alphavantage::AvConnector;
use cruscotto_mock::MockConnector;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Two calls per minute, rejected beyond that instead of paced.
    let inner: Arc<dyn SeriesConnector> = Arc::new(MockConnector::named(AvConnector::KEY.as_str()));
    let cfg = QuotaConfig {
        limit: 2,
        window: Duration::from_secs(60),
        strategy: QuotaConsumptionStrategy::Unit,
    };
    let wrapped = Arc::new(QuotaAwareConnector::new(inner, cfg));

    let cruscotto = Cruscotto::builder()
        .with_connector(wrapped.clone())
        .indicators(presets::market_indicators())
        .build()?;

    let report = cruscotto.load().await?;
    println!("loaded: {:?}", report.available);
    for w in &report.warnings {
        println!("excluded: {w}");
    }
    println!("quota state: {:?}", wrapped.state());
    Ok(())
}
