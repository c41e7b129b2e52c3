use std::time::Duration;

use async_trait::async_trait;

use crate::CruscottoError;
use crate::ingest::PayloadShape;
pub use cruscotto_types::ConnectorKey;
use cruscotto_types::{RawPayload, SeriesRequest};

/// A provider client able to fetch raw series payloads.
///
/// The connector is the "source kind" of an indicator: it owns the transport,
/// the credential and the knowledge of how its responses are shaped. The
/// orchestrator never inspects payload keys itself; it asks the connector for
/// the [`PayloadShape`] of a request and hands both to the ingestion adapter.
#[async_trait]
pub trait SeriesConnector: Send + Sync {
    /// A stable identifier (e.g. "cruscotto-alphavantage", "cruscotto-ecos").
    fn name(&self) -> &'static str;

    /// Canonical connector key constructed from the static name.
    fn key(&self) -> ConnectorKey {
        ConnectorKey::new(self.name())
    }

    /// Human-friendly vendor string.
    fn vendor(&self) -> &'static str {
        "unknown"
    }

    /// Response shape this connector produces for `req`.
    ///
    /// # Errors
    /// Returns `Unsupported` when the request addresses an endpoint whose
    /// shape the connector does not know.
    fn shape(&self, req: &SeriesRequest) -> Result<PayloadShape, CruscottoError>;

    /// Fetch the raw payload for one series.
    ///
    /// Transport errors, non-success statuses and in-payload error fields are
    /// all reported as `CruscottoError::Fetch`.
    async fn fetch_series(&self, req: &SeriesRequest) -> Result<RawPayload, CruscottoError>;

    /// Fetch with `timeout` bounding the upstream call only.
    ///
    /// Wrappers that queue calls before they reach the provider (quota
    /// pacing) override this so the wait happens before the clock starts.
    /// The default bounds [`fetch_series`](Self::fetch_series) as a whole.
    ///
    /// # Errors
    /// As `fetch_series`, plus `ProviderTimeout` (with the series code as the
    /// indicator) when the call does not finish in time.
    async fn fetch_series_within(
        &self,
        req: &SeriesRequest,
        timeout: Duration,
    ) -> Result<RawPayload, CruscottoError> {
        tokio::time::timeout(timeout, self.fetch_series(req))
            .await
            .unwrap_or_else(|_| {
                Err(CruscottoError::provider_timeout(
                    self.name(),
                    req.series.code.as_str(),
                ))
            })
    }
}
