use cruscotto_alphavantage::AvConnector;
use cruscotto_core::{CruscottoError, Cycle, SeriesConnector, SeriesId, SeriesRequest, ingest};
use httpmock::prelude::*;
use serde_json::json;

fn connector(server: &MockServer) -> AvConnector {
    AvConnector::new_with_key("test-key").with_base_url(server.base_url())
}

#[tokio::test]
async fn fx_daily_request_and_ingest() {
    let server = MockServer::start_async().await;
    let mock = server
        .mock_async(|when, then| {
            when.method(GET)
                .path("/query")
                .query_param("function", "FX_DAILY")
                .query_param("from_symbol", "USD")
                .query_param("to_symbol", "KRW")
                .query_param("outputsize", "full")
                .query_param("apikey", "test-key");
            then.status(200).json_body(json!({
                "Meta Data": {"1. Information": "Forex Daily Prices (open, high, low, close)"},
                "Time Series FX (Daily)": {
                    "2024-01-03": {"1. open": "1300.0", "4. close": "1310.50"},
                    "2024-01-02": {"1. open": "1290.0", "4. close": "1300.00"}
                }
            }));
        })
        .await;

    let av = connector(&server);
    let req = SeriesRequest::new(SeriesId::new("FX_DAILY").item("USD/KRW"), Cycle::Daily);
    let payload = av.fetch_series(&req).await.unwrap();
    mock.assert_async().await;
    assert_eq!(payload.connector, AvConnector::KEY);

    let shape = av.shape(&req).unwrap();
    let series = ingest("usdkrw", &req, &shape, &payload).unwrap();
    assert_eq!(series.points.len(), 2);
    assert_eq!(series.points[1].value, Some(1310.5));
}

#[tokio::test]
async fn treasury_yield_forwards_params_and_interval() {
    let server = MockServer::start_async().await;
    let mock = server
        .mock_async(|when, then| {
            when.method(GET)
                .path("/query")
                .query_param("function", "TREASURY_YIELD")
                .query_param("maturity", "2year")
                .query_param("interval", "daily");
            then.status(200).json_body(json!({
                "name": "Daily Treasury Yield",
                "data": [
                    {"date": "2024-01-03", "value": "4.33"},
                    {"date": "2024-01-02", "value": "."}
                ]
            }));
        })
        .await;

    let av = connector(&server);
    let req = SeriesRequest::new(
        SeriesId::new("TREASURY_YIELD").param("maturity", "2year"),
        Cycle::Daily,
    );
    let payload = av.fetch_series(&req).await.unwrap();
    mock.assert_async().await;
    let series = ingest("bond2y", &req, &av.shape(&req).unwrap(), &payload).unwrap();
    assert_eq!(series.points.len(), 1);
}

#[tokio::test]
async fn in_payload_errors_become_fetch_failures() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/query").query_param("function", "WTI");
            then.status(200).json_body(json!({
                "Information": "Our standard API rate limit is 25 requests per day."
            }));
        })
        .await;

    let req = SeriesRequest::new(SeriesId::new("WTI"), Cycle::Daily);
    let err = connector(&server).fetch_series(&req).await.unwrap_err();
    match &err {
        CruscottoError::Fetch {
            connector, details, ..
        } => {
            assert_eq!(connector, "cruscotto-alphavantage");
            assert!(details.as_deref().unwrap_or_default().contains("rate limit"));
        }
        other => panic!("unexpected error: {other:?}"),
    }
    assert!(err.is_recoverable());
}

#[tokio::test]
async fn http_status_and_bad_json_are_fetch_failures() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/query").query_param("function", "WTI");
            then.status(503).body("unavailable");
        })
        .await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/query").query_param("function", "BRENT");
            then.status(200).body("<html>not json</html>");
        })
        .await;

    let av = connector(&server);
    for code in ["WTI", "BRENT"] {
        let req = SeriesRequest::new(SeriesId::new(code), Cycle::Daily);
        let err = av.fetch_series(&req).await.unwrap_err();
        assert!(matches!(err, CruscottoError::Fetch { .. }), "{code}: {err:?}");
        assert!(!err.to_string().contains("test-key"));
    }
}

#[tokio::test]
async fn transport_errors_do_not_leak_the_key() {
    // Nothing listens on port 9 of localhost.
    let av = AvConnector::new_with_key("secret-key").with_base_url("http://127.0.0.1:9");
    let req = SeriesRequest::new(SeriesId::new("WTI"), Cycle::Daily);
    let err = av.fetch_series(&req).await.unwrap_err();
    assert!(matches!(err, CruscottoError::Fetch { .. }));
    assert!(!format!("{err:?}").contains("secret-key"));
}
