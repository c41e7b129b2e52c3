#![allow(dead_code)]

use std::sync::Arc;

use cruscotto::SeriesConnector;
use cruscotto_alphavantage::AvConnector;
use cruscotto_ecos::EcosConnector;
use cruscotto_mock::MockConnector;

fn use_mock() -> bool {
    std::env::var("CRUSCOTTO_EXAMPLES_USE_MOCK").is_ok()
}

/// Alpha Vantage behind the free-tier cache and quota, or a mock in CI.
pub fn alphavantage() -> Result<Arc<dyn SeriesConnector>, Box<dyn std::error::Error>> {
    if use_mock() {
        println!("--- (Using Mock Connector for Alpha Vantage) ---");
        return Ok(Arc::new(MockConnector::named(AvConnector::KEY.as_str())));
    }
    Ok(AvConnector::from_env()?.free_tier().build())
}

/// ECOS behind its payload cache, or a mock in CI.
pub fn ecos() -> Result<Arc<dyn SeriesConnector>, Box<dyn std::error::Error>> {
    if use_mock() {
        println!("--- (Using Mock Connector for ECOS) ---");
        return Ok(Arc::new(MockConnector::named(EcosConnector::KEY.as_str())));
    }
    Ok(EcosConnector::from_env()?.cached().build())
}

/// Human-friendly subscriber filtered by `RUST_LOG`.
///
/// Suggested: `RUST_LOG=info,cruscotto=debug` with `--features tracing`.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_target(false)
        .try_init();
}
