mod helpers;

use std::sync::Arc;
use std::time::Duration;

use cruscotto::{ConnectorKey, Cruscotto, CruscottoConfig, CruscottoError, Cycle};
use cruscotto_mock::MockConnector;
use helpers::spec;

const MOCK: ConnectorKey = ConnectorKey::new(MockConnector::NAME);

fn mock() -> Arc<MockConnector> {
    Arc::new(MockConnector::new())
}

#[test]
fn build_requires_a_connector() {
    let err = Cruscotto::builder().build().err().unwrap();
    assert!(matches!(err, CruscottoError::InvalidArg(_)));
}

#[test]
fn build_rejects_duplicate_connector_names() {
    let err = Cruscotto::builder()
        .with_connector(mock())
        .with_connector(mock())
        .build()
        .err()
        .unwrap();
    assert!(matches!(err, CruscottoError::InvalidArg(msg) if msg.contains("twice")));
}

#[test]
fn build_rejects_duplicate_indicator_names() {
    let err = Cruscotto::builder()
        .with_connector(mock())
        .indicator(spec("a", MOCK, "A", Cycle::Daily))
        .indicator(spec("a", MOCK, "B", Cycle::Daily))
        .build()
        .err()
        .unwrap();
    assert!(matches!(err, CruscottoError::InvalidArg(msg) if msg.contains("declared twice")));
}

#[test]
fn build_rejects_unregistered_source() {
    let err = Cruscotto::builder()
        .with_connector(mock())
        .indicator(spec("a", ConnectorKey::new("elsewhere"), "A", Cycle::Daily))
        .build()
        .err()
        .unwrap();
    assert!(matches!(err, CruscottoError::InvalidArg(msg) if msg.contains("elsewhere")));
}

#[test]
fn timeouts_and_config_are_applied() {
    let c = Cruscotto::builder()
        .with_connector(mock())
        .provider_timeout(Duration::from_secs(3))
        .request_timeout(Duration::from_secs(9))
        .build()
        .unwrap();
    assert_eq!(c.config().provider_timeout, Duration::from_secs(3));
    assert_eq!(c.config().request_timeout, Some(Duration::from_secs(9)));

    let c = Cruscotto::builder()
        .with_connector(mock())
        .config(CruscottoConfig::default())
        .build()
        .unwrap();
    assert_eq!(c.config().provider_timeout, CruscottoConfig::default().provider_timeout);
    assert_eq!(c.config().request_timeout, None);
    assert!(c.connector(MOCK).is_some());
    assert!(c.connector(ConnectorKey::new("other")).is_none());
}

#[tokio::test]
async fn load_indicators_validates_ad_hoc_sets() {
    let c = Cruscotto::builder()
        .with_connector(mock())
        .indicator(spec("a", MOCK, "A", Cycle::Daily))
        .build()
        .unwrap();

    let err = c
        .load_indicators(&[spec("x", ConnectorKey::new("nope"), "X", Cycle::Daily)])
        .await
        .unwrap_err();
    assert!(matches!(err, CruscottoError::InvalidArg(_)));

    let report = c
        .load_indicators(&[spec("x", MOCK, "X", Cycle::Monthly)])
        .await
        .unwrap();
    assert_eq!(report.available, ["x"]);
    assert_eq!(c.indicators().len(), 1);
}
