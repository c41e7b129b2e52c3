//! cruscotto-alphavantage
//!
//! Connector for the Alpha Vantage REST API. Covers FX (`FX_DAILY` and
//! friends), equity time series, treasury yields, commodities and the
//! economic indicator endpoints.
//!
//! Requests address endpoints by `SeriesId::code` (the Alpha Vantage
//! `function`). The item is the symbol; for FX functions it is a pair written
//! `FROM/TO`. Extra parameters such as `maturity` are forwarded verbatim.
#![warn(missing_docs)]

/// Preconfigured middleware stacks.
pub mod builder;
mod functions;

use async_trait::async_trait;
use cruscotto_core::{
    ConnectorKey, CruscottoError, PayloadShape, RawPayload, SeriesConnector, SeriesRequest,
};

pub use builder::AvConnectorBuilder;

/// Public connector type.
pub struct AvConnector {
    http: reqwest::Client,
    api_key: String,
    base_url: String,
}

impl AvConnector {
    /// Static connector key used in indicator declarations.
    pub const KEY: ConnectorKey = ConnectorKey::new("cruscotto-alphavantage");

    /// Production endpoint.
    pub const DEFAULT_BASE_URL: &'static str = "https://www.alphavantage.co";

    /// Environment variable read by [`AvConnector::from_env`].
    pub const API_KEY_ENV: &'static str = "ALPHAVANTAGE_API_KEY";

    /// Build with a fresh HTTP client.
    #[must_use]
    pub fn new_with_key(api_key: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            api_key: api_key.into(),
            base_url: Self::DEFAULT_BASE_URL.to_string(),
        }
    }

    /// Build from the `ALPHAVANTAGE_API_KEY` environment variable.
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
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    /// Use a preconfigured `reqwest::Client`.
    #[must_use]
    pub fn with_client(mut self, http: reqwest::Client) -> Self {
        self.http = http;
        self
    }

    fn transport(e: reqwest::Error) -> CruscottoError {
        // The URL carries the API key.
        CruscottoError::fetch(Self::KEY.as_str(), e.without_url().to_string())
    }

    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(
            name = "cruscotto_alphavantage::request",
            skip(self, req),
            fields(function = %req.series.code, cycle = req.cycle.as_str()),
            err,
        )
    )]
    async fn request(&self, req: &SeriesRequest) -> Result<RawPayload, CruscottoError> {
        let mut query = functions::query_pairs(req)?;
        query.push(("apikey".into(), self.api_key.clone()));

        let request = self
            .http
            .get(format!("{}/query", self.base_url))
            .query(&query)
            .build()
            .map_err(Self::transport)?;
        #[cfg(feature = "tracing")]
        tracing::debug!(url = %redacted(request.url()), "requesting Alpha Vantage");

        let resp = self.http.execute(request).await.map_err(Self::transport)?;
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
        if let Some(text) = functions::payload_error(&body) {
            return Err(CruscottoError::fetch_with_details(
                Self::KEY.as_str(),
                "Alpha Vantage API error",
                text,
            ));
        }
        Ok(RawPayload::new(Self::KEY, body))
    }
}

/// The request URL with the `apikey` value masked.
#[cfg_attr(not(feature = "tracing"), allow(dead_code))]
fn redacted(url: &reqwest::Url) -> String {
    let pairs: Vec<(String, String)> = url
        .query_pairs()
        .map(|(k, v)| {
            let v = if k == "apikey" {
                "REDACTED".to_string()
            } else {
                v.into_owned()
            };
            (k.into_owned(), v)
        })
        .collect();
    let mut out = url.clone();
    out.query_pairs_mut().clear().extend_pairs(pairs);
    out.to_string()
}

#[async_trait]
impl SeriesConnector for AvConnector {
    fn name(&self) -> &'static str {
        Self::KEY.as_str()
    }

    fn vendor(&self) -> &'static str {
        "Alpha Vantage"
    }

    fn shape(&self, req: &SeriesRequest) -> Result<PayloadShape, CruscottoError> {
        functions::shape_for(&req.series.code)
    }

    async fn fetch_series(&self, req: &SeriesRequest) -> Result<RawPayload, CruscottoError> {
        self.request(req).await
    }
}
