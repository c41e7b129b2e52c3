use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;

use cruscotto_core::{
    ConnectorKey, CruscottoConfig, CruscottoError, IndicatorSpec, RawPayload, SeriesConnector,
    SeriesRequest,
};

/// Orchestrator that loads declared indicators from registered connectors and
/// merges them onto one daily table.
pub struct Cruscotto {
    pub(crate) connectors: Vec<Arc<dyn SeriesConnector>>,
    pub(crate) indicators: Vec<IndicatorSpec>,
    pub(crate) cfg: CruscottoConfig,
}

/// Builder for constructing a `Cruscotto` orchestrator.
pub struct CruscottoBuilder {
    connectors: Vec<Arc<dyn SeriesConnector>>,
    indicators: Vec<IndicatorSpec>,
    cfg: CruscottoConfig,
}

impl Default for CruscottoBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl CruscottoBuilder {
    /// Create a new builder with default timeouts and nothing registered.
    #[must_use]
    pub fn new() -> Self {
        Self {
            connectors: vec![],
            indicators: vec![],
            cfg: CruscottoConfig::default(),
        }
    }

    /// Register a provider connector, usually already wrapped in middleware.
    ///
    /// Indicators refer to connectors by [`SeriesConnector::key`]; registering
    /// two connectors under the same name is rejected by [`build`](Self::build).
    #[must_use]
    pub fn with_connector(mut self, c: Arc<dyn SeriesConnector>) -> Self {
        self.connectors.push(c);
        self
    }

    /// Declare one indicator. Declaration order is column order.
    #[must_use]
    pub fn indicator(mut self, spec: IndicatorSpec) -> Self {
        self.indicators.push(spec);
        self
    }

    /// Declare several indicators.
    #[must_use]
    pub fn indicators(mut self, specs: impl IntoIterator<Item = IndicatorSpec>) -> Self {
        self.indicators.extend(specs);
        self
    }

    /// Per-indicator fetch timeout.
    #[must_use]
    pub const fn provider_timeout(mut self, timeout: Duration) -> Self {
        self.cfg.provider_timeout = timeout;
        self
    }

    /// Deadline for a whole load; exceeding it fails the load with `RequestTimeout`.
    #[must_use]
    pub const fn request_timeout(mut self, timeout: Duration) -> Self {
        self.cfg.request_timeout = Some(timeout);
        self
    }

    /// Replace the whole configuration.
    #[must_use]
    pub fn config(mut self, cfg: CruscottoConfig) -> Self {
        self.cfg = cfg;
        self
    }

    /// Validate and build.
    ///
    /// # Errors
    /// Returns `InvalidArg` when no connector is registered, when two
    /// connectors share a name, when indicator names repeat, or when an
    /// indicator names a connector that is not registered.
    pub fn build(self) -> Result<Cruscotto, CruscottoError> {
        if self.connectors.is_empty() {
            return Err(CruscottoError::InvalidArg(
                "no connectors registered; add at least one via with_connector(...)".to_string(),
            ));
        }

        let mut known: HashSet<&'static str> = HashSet::new();
        for c in &self.connectors {
            if !known.insert(c.name()) {
                return Err(CruscottoError::InvalidArg(format!(
                    "connector {} registered twice",
                    c.name()
                )));
            }
        }
        validate_indicators(&self.indicators, &known)?;

        Ok(Cruscotto {
            connectors: self.connectors,
            indicators: self.indicators,
            cfg: self.cfg,
        })
    }
}

pub(crate) fn validate_indicators(
    specs: &[IndicatorSpec],
    known: &HashSet<&'static str>,
) -> Result<(), CruscottoError> {
    let mut names: HashSet<&str> = HashSet::new();
    for spec in specs {
        if !names.insert(spec.name.as_str()) {
            return Err(CruscottoError::InvalidArg(format!(
                "indicator {} declared twice",
                spec.name
            )));
        }
        if !known.contains(spec.source.as_str()) {
            return Err(CruscottoError::InvalidArg(format!(
                "indicator {} uses unregistered connector {}",
                spec.name, spec.source
            )));
        }
    }
    Ok(())
}

/// Attribute an error to `connector` unless it already says where it came from.
pub fn tag_err(connector: &str, e: CruscottoError) -> CruscottoError {
    match e {
        e @ (CruscottoError::Fetch { .. }
        | CruscottoError::Parse { .. }
        | CruscottoError::DataUnavailable { .. }
        | CruscottoError::ProviderTimeout { .. }
        | CruscottoError::RequestTimeout { .. }
        | CruscottoError::QuotaExceeded { .. }) => e,
        other => CruscottoError::fetch(connector, other.to_string()),
    }
}

/// Await `fut`, failing with `RequestTimeout` once `deadline` passes.
///
/// # Errors
/// Returns `RequestTimeout { what: "request" }` on expiry; callers relabel it.
pub async fn with_request_deadline<T, Fut>(
    deadline: Option<Duration>,
    fut: Fut,
) -> Result<T, CruscottoError>
where
    Fut: core::future::Future<Output = T>,
{
    match deadline {
        Some(d) => tokio::time::timeout(d, fut)
            .await
            .map_err(|_| CruscottoError::request_timeout("request")),
        None => Ok(fut.await),
    }
}

impl Cruscotto {
    /// Start a new builder.
    #[must_use]
    pub fn builder() -> CruscottoBuilder {
        CruscottoBuilder::new()
    }

    /// Declared indicators in column order.
    #[must_use]
    pub fn indicators(&self) -> &[IndicatorSpec] {
        &self.indicators
    }

    /// Active configuration.
    #[must_use]
    pub const fn config(&self) -> &CruscottoConfig {
        &self.cfg
    }

    /// Registered connector for `key`.
    #[must_use]
    pub fn connector(&self, key: ConnectorKey) -> Option<&Arc<dyn SeriesConnector>> {
        self.connectors.iter().find(|c| c.name() == key.as_str())
    }

    pub(crate) fn require_connector(
        &self,
        key: ConnectorKey,
    ) -> Result<&Arc<dyn SeriesConnector>, CruscottoError> {
        self.connector(key).ok_or_else(|| {
            CruscottoError::InvalidArg(format!("connector {key} is not registered"))
        })
    }

    /// Fetch `req` from `c` for `indicator` under the provider timeout.
    ///
    /// The timeout bounds the upstream call; quota pacing inside the
    /// connector stack waits before it starts. Errors are tagged with the
    /// connector name and timeouts name the indicator.
    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(
            name = "cruscotto::core::provider_call_with_timeout",
            skip_all,
            fields(
                connector = c.name(),
                indicator = indicator,
                timeout_ms = u64::try_from(timeout.as_millis()).unwrap_or(u64::MAX),
            ),
        )
    )]
    pub(crate) async fn provider_call_with_timeout(
        c: &Arc<dyn SeriesConnector>,
        indicator: &str,
        timeout: Duration,
        req: &SeriesRequest,
    ) -> Result<RawPayload, CruscottoError> {
        c.fetch_series_within(req, timeout)
            .await
            .map_err(|e| match e {
                CruscottoError::ProviderTimeout { connector, .. } => {
                    CruscottoError::provider_timeout(connector, indicator)
                }
                other => tag_err(c.name(), other),
            })
    }
}
