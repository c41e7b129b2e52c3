//! cruscotto-ecos
//!
//! Connector for the Bank of Korea Economic Statistics System (ECOS)
//! `StatisticSearch` endpoint.
//!
//! `SeriesId::code` is the statistic table code (e.g. `722Y001`) and
//! `SeriesId::item` the item code (e.g. `0101000`). Additional item codes may
//! be passed as `item2`..`item4` parameters. ECOS requires an explicit date
//! range; period tokens follow the request cycle.
#![warn(missing_docs)]

use std::sync::Arc;

use async_trait::async_trait;
use cruscotto_core::{
    CacheConfig, ConnectorKey, CruscottoError, Cycle, PayloadShape, RawPayload, SeriesConnector,
    SeriesRequest, period_token,
};
use cruscotto_middleware::ConnectorBuilder;
use url::Url;

/// Rows requested per call; ECOS caps a single page at this size.
pub const PAGE_SIZE: u64 = 10_000;

const ROWS: PayloadShape = PayloadShape::Array {
    path: &["StatisticSearch", "row"],
    date_field: "TIME",
    value_field: "DATA_VALUE",
};

const SUCCESS: &str = "INFO-000";

/// Public connector type.
pub struct EcosConnector {
    http: reqwest::Client,
    api_key: String,
    base_url: String,
}

/// ECOS cycle code for `cycle`.
#[must_use]
pub const fn cycle_code(cycle: Cycle) -> &'static str {
    match cycle {
        Cycle::Daily => "D",
        Cycle::Monthly => "M",
        Cycle::Quarterly => "Q",
    }
}

impl EcosConnector {
    /// Static connector key used in indicator declarations.
    pub const KEY: ConnectorKey = ConnectorKey::new("cruscotto-ecos");

    /// Production endpoint.
    pub const DEFAULT_BASE_URL: &'static str = "https://ecos.bok.or.kr/api";

    /// Environment variable read by [`EcosConnector::from_env`].
    pub const API_KEY_ENV: &'static str = "ECOS_API_KEY";

    /// Build with a fresh HTTP client.
    #[must_use]
    pub fn new_with_key(api_key: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            api_key: api_key.into(),
            base_url: Self::DEFAULT_BASE_URL.to_string(),
        }
    }

    /// Build from the `ECOS_API_KEY` environment variable.
    ///
    /// # Errors
    /// Returns `InvalidArg` when the variable is unset or empty.
    pub fn from_env() -> Result<Self, CruscottoError> {
        match std::env::var(Self::API_KEY_ENV) {
            Ok(key) if !key.trim().is_empty() => Ok(Self::new_with_key(key.trim())),
            _ => Err(CruscottoError::InvalidArg(format!(
                "missing {} in environment",
                Self::API_KEY_ENV
            ))),
        }
    }

    /// Point the connector at another host (tests, proxies).
    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Use a preconfigured `reqwest::Client`.
    #[must_use]
    pub fn with_client(mut self, http: reqwest::Client) -> Self {
        self.http = http;
        self
    }

    /// Middleware stack with the daily payload cache.
    #[must_use]
    pub fn cached(self) -> ConnectorBuilder {
        let raw: Arc<dyn SeriesConnector> = Arc::new(self);
        ConnectorBuilder::new(raw).with_cache(&CacheConfig::ecos())
    }

    /// Full request URL for `req` authenticated with `key`.
    fn url(&self, req: &SeriesRequest, key: &str) -> Result<Url, CruscottoError> {
        let range = req.range.ok_or_else(|| {
            CruscottoError::InvalidArg(format!("ECOS {} needs a date range", req.series.code))
        })?;
        let item = req.series.item.as_deref().ok_or_else(|| {
            CruscottoError::InvalidArg(format!("ECOS {} needs an item code", req.series.code))
        })?;

        let mut url = Url::parse(&self.base_url)
            .map_err(|e| CruscottoError::InvalidArg(format!("ECOS base URL: {e}")))?;
        let size = PAGE_SIZE.to_string();
        let start = period_token(range.start(), req.cycle);
        let end = period_token(range.end(), req.cycle);
        {
            let mut segments = url
                .path_segments_mut()
                .map_err(|()| CruscottoError::InvalidArg("ECOS base URL cannot be a base".into()))?;
            segments.pop_if_empty().extend([
                "StatisticSearch",
                key,
                "json",
                "kr",
                "1",
                size.as_str(),
                req.series.code.as_str(),
                cycle_code(req.cycle),
                start.as_str(),
                end.as_str(),
                item,
            ]);
            for extra in ["item2", "item3", "item4"] {
                match req.series.params.get(extra) {
                    Some(code) => {
                        segments.push(code);
                    }
                    None => break,
                }
            }
        }
        Ok(url)
    }

    fn transport(e: reqwest::Error) -> CruscottoError {
        // The URL path carries the API key.
        CruscottoError::fetch(Self::KEY.as_str(), e.without_url().to_string())
    }

    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(
            name = "cruscotto_ecos::request",
            skip(self, req),
            fields(stat = %req.series.code, cycle = cycle_code(req.cycle)),
            err,
        )
    )]
    async fn request(&self, req: &SeriesRequest) -> Result<RawPayload, CruscottoError> {
        let url = self.url(req, &self.api_key)?;
        #[cfg(feature = "tracing")]
        if let Ok(shown) = self.url(req, "REDACTED") {
            tracing::debug!(url = %shown, "requesting ECOS");
        }

        let resp = self
            .http
            .get(url)
            .send()
            .await
            .map_err(Self::transport)?;
        let status = resp.status();
        if !status.is_success() {
            return Err(CruscottoError::fetch(
                Self::KEY.as_str(),
                format!("HTTP status {status}"),
            ));
        }

        let body: serde_json::Value = resp.json().await.map_err(|e| {
            CruscottoError::fetch(
                Self::KEY.as_str(),
                format!("invalid JSON body: {}", e.without_url()),
            )
        })?;
        if let Some(result) = body.get("RESULT") {
            let code = result.get("CODE").and_then(|c| c.as_str()).unwrap_or("");
            if code != SUCCESS {
                let message = result
                    .get("MESSAGE")
                    .and_then(|m| m.as_str())
                    .unwrap_or(code);
                return Err(CruscottoError::fetch_with_details(
                    Self::KEY.as_str(),
                    "ECOS API returned an error",
                    message,
                ));
            }
        }

        #[cfg(feature = "tracing")]
        if let Some(total) = body
            .pointer("/StatisticSearch/list_total_count")
            .and_then(serde_json::Value::as_u64)
            && total > PAGE_SIZE
        {
            tracing::warn!(total, page = PAGE_SIZE, "ECOS result truncated to first page");
        }

        Ok(RawPayload::new(Self::KEY, body))
    }
}

#[async_trait]
impl SeriesConnector for EcosConnector {
    fn name(&self) -> &'static str {
        Self::KEY.as_str()
    }

    fn vendor(&self) -> &'static str {
        "Bank of Korea"
    }

    fn shape(&self, _req: &SeriesRequest) -> Result<PayloadShape, CruscottoError> {
        Ok(ROWS)
    }

    async fn fetch_series(&self, req: &SeriesRequest) -> Result<RawPayload, CruscottoError> {
        self.request(req).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cruscotto_core::{DateRange, SeriesId};

    fn range(a: (i32, u32, u32), b: (i32, u32, u32)) -> DateRange {
        let d = |(y, m, day): (i32, u32, u32)| chrono::NaiveDate::from_ymd_opt(y, m, day).unwrap();
        DateRange::new(d(a), d(b)).unwrap()
    }

    #[test]
    fn url_layout_per_cycle() {
        let ecos = EcosConnector::new_with_key("KEY");
        let req = SeriesRequest::new(SeriesId::new("722Y001").item("0101000"), Cycle::Monthly)
            .with_range(range((2023, 1, 15), (2024, 6, 30)));
        let url = ecos.url(&req, "KEY").unwrap();
        assert_eq!(
            url.as_str(),
            "https://ecos.bok.or.kr/api/StatisticSearch/KEY/json/kr/1/10000/722Y001/M/202301/202406/0101000"
        );

        let req = SeriesRequest::new(SeriesId::new("200Y002").item("10111"), Cycle::Quarterly)
            .with_range(range((2020, 1, 1), (2024, 12, 31)));
        assert!(ecos.url(&req, "KEY").unwrap().as_str().ends_with("/Q/2020Q1/2024Q4/10111"));

        let req = SeriesRequest::new(SeriesId::new("731Y001").item("0000001"), Cycle::Daily)
            .with_range(range((2024, 1, 2), (2024, 1, 31)));
        assert!(ecos.url(&req, "KEY").unwrap().as_str().ends_with("/D/20240102/20240131/0000001"));
    }

    #[test]
    fn extra_items_are_appended_in_order() {
        let ecos = EcosConnector::new_with_key("KEY");
        let req = SeriesRequest::new(
            SeriesId::new("901Y009").item("0").param("item2", "A").param("item3", "B"),
            Cycle::Monthly,
        )
        .with_range(range((2024, 1, 1), (2024, 3, 1)));
        assert!(ecos.url(&req, "KEY").unwrap().as_str().ends_with("/0/A/B"));
    }

    #[test]
    fn range_and_item_are_required() {
        let ecos = EcosConnector::new_with_key("KEY");
        let no_range = SeriesRequest::new(SeriesId::new("722Y001").item("0101000"), Cycle::Monthly);
        assert!(matches!(ecos.url(&no_range, "KEY"), Err(CruscottoError::InvalidArg(_))));

        let no_item = SeriesRequest::new(SeriesId::new("722Y001"), Cycle::Monthly)
            .with_range(range((2024, 1, 1), (2024, 3, 1)));
        assert!(matches!(ecos.url(&no_item, "KEY"), Err(CruscottoError::InvalidArg(_))));
    }

    #[test]
    fn cached_stack() {
        let b = EcosConnector::new_with_key("KEY").cached();
        assert_eq!(b.layer_names(), ["CachingMiddleware"]);
    }
}
