//! cruscotto-mock
//!
//! Deterministic connector for CI-safe examples and tests. Payloads are
//! generated from the request alone; no network access takes place.
//!
//! Reserved series codes:
//! - `FAIL` returns a fetch error.
//! - `TIMEOUT` sleeps briefly before answering, so short provider timeouts trip.
//! - `EMPTY` returns a payload with no observations.
//! - `FX_DAILY` returns a date-keyed FX payload.
//!
//! Every other code yields an array payload at `data` spanning the request
//! range (or a fixed default range).

use std::time::Duration;

use async_trait::async_trait;
use cruscotto_core::{
    ConnectorKey, CruscottoError, PayloadShape, RawPayload, SeriesConnector, SeriesRequest,
};
use serde_json::json;

pub mod fixtures;

/// Delay applied to the `TIMEOUT` code.
pub const TIMEOUT_DELAY: Duration = Duration::from_millis(200);

const ARRAY_SHAPE: PayloadShape = PayloadShape::Array {
    path: &["data"],
    date_field: "date",
    value_field: "value",
};

const FX_SHAPE: PayloadShape = PayloadShape::KeyedObject {
    path: &[fixtures::FX_SERIES_KEY],
    close_field: fixtures::CLOSE_FIELD,
};

/// Mock connector backed by generated fixtures.
pub struct MockConnector {
    name: &'static str,
}

impl Default for MockConnector {
    fn default() -> Self {
        Self::new()
    }
}

impl MockConnector {
    /// Default connector name.
    pub const NAME: &'static str = "cruscotto-mock";

    /// A mock registered under [`NAME`](Self::NAME).
    #[must_use]
    pub const fn new() -> Self {
        Self { name: Self::NAME }
    }

    /// A mock registered under another name, e.g. to stand in for a real
    /// provider in an indicator set keyed by connector.
    #[must_use]
    pub const fn named(name: &'static str) -> Self {
        Self { name }
    }

    async fn maybe_fail_or_timeout(&self, code: &str) -> Result<(), CruscottoError> {
        match code {
            "FAIL" => Err(CruscottoError::fetch_with_details(
                self.name,
                "forced failure",
                "mock series FAIL always fails",
            )),
            "TIMEOUT" => {
                tokio::time::sleep(TIMEOUT_DELAY).await;
                Ok(())
            }
            _ => Ok(()),
        }
    }
}

#[async_trait]
impl SeriesConnector for MockConnector {
    fn name(&self) -> &'static str {
        self.name
    }

    fn vendor(&self) -> &'static str {
        "Mock"
    }

    fn shape(&self, req: &SeriesRequest) -> Result<PayloadShape, CruscottoError> {
        if req.series.code == "FX_DAILY" {
            Ok(FX_SHAPE)
        } else {
            Ok(ARRAY_SHAPE)
        }
    }

    async fn fetch_series(&self, req: &SeriesRequest) -> Result<RawPayload, CruscottoError> {
        let code = req.series.code.as_str();
        self.maybe_fail_or_timeout(code).await?;

        let key = ConnectorKey::new(self.name);
        if code == "EMPTY" {
            return Ok(RawPayload::new(key, json!({"data": []})));
        }
        let range = req
            .range
            .or_else(fixtures::default_range)
            .ok_or_else(|| CruscottoError::Other("mock default range".into()))?;
        // Item distinguishes e.g. 10y and 2y yields requested with the same code.
        let seed = match &req.series.item {
            Some(item) => format!("{code}:{item}"),
            None => req
                .series
                .params
                .values()
                .fold(code.to_string(), |acc, v| format!("{acc}:{v}")),
        };

        let body = if code == "FX_DAILY" {
            fixtures::keyed_payload(&seed, &range)
        } else {
            fixtures::array_payload(&seed, req.cycle, &range)
        };
        Ok(RawPayload::new(key, body))
    }
}
