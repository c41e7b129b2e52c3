use std::collections::HashSet;

use cruscotto_core::{
    ConnectorKey, CruscottoError, IndicatorSeries, IndicatorSpec, LoadReport, RawPayload,
    SeriesRequest, apply_transform, ingest, try_merge,
};

use crate::core::{Cruscotto, tag_err, validate_indicators};
use crate::util::{join_with_deadline, partition_outcomes};

impl Cruscotto {
    /// Fetch one raw payload from the connector registered under `source`,
    /// bounded by the provider timeout. Quota pacing waits before the timeout
    /// starts.
    ///
    /// # Errors
    /// `InvalidArg` for an unregistered source; otherwise the connector's
    /// failure tagged with its name, or `ProviderTimeout`.
    pub async fn fetch_series(
        &self,
        source: ConnectorKey,
        req: &SeriesRequest,
    ) -> Result<RawPayload, CruscottoError> {
        let c = self.require_connector(source)?;
        Self::provider_call_with_timeout(c, &req.series.code, self.cfg.provider_timeout, req).await
    }

    /// Fetch, ingest and transform one declared indicator.
    ///
    /// # Errors
    /// Any per-indicator failure: fetch, parse, data unavailable, provider
    /// timeout, or a transform error.
    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(
            name = "cruscotto::load::fetch_indicator",
            skip(self, spec),
            fields(indicator = %spec.name, connector = spec.source.as_str()),
        )
    )]
    pub async fn fetch_indicator(
        &self,
        spec: &IndicatorSpec,
    ) -> Result<IndicatorSeries, CruscottoError> {
        let c = self.require_connector(spec.source)?;
        let shape = c.shape(&spec.request).map_err(|e| tag_err(c.name(), e))?;
        let payload = Self::provider_call_with_timeout(
            c,
            &spec.name,
            self.cfg.provider_timeout,
            &spec.request,
        )
        .await?;
        let series = ingest(&spec.name, &spec.request, &shape, &payload)?;
        apply_transform(series, spec.transform)
    }

    /// Load every declared indicator and merge them.
    ///
    /// # Errors
    /// See [`load_indicators`](Self::load_indicators).
    pub async fn load(&self) -> Result<LoadReport, CruscottoError> {
        self.load_indicators(&self.indicators).await
    }

    /// Load `specs` concurrently and merge whatever succeeded.
    ///
    /// Each indicator is fetched under the provider timeout; the whole fan-out
    /// under the request deadline when one is configured. Failed indicators
    /// are excluded and reported in [`LoadReport::warnings`]; their columns
    /// remain in the table as unknown.
    ///
    /// # Errors
    /// - `InvalidArg` for duplicate names or unregistered connectors.
    /// - `RequestTimeout { what: "load" }` when the deadline passes.
    /// - `NoData` when no indicator produced a usable value.
    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(
            name = "cruscotto::load::load_indicators",
            skip(self, specs),
            fields(indicators = specs.len()),
        )
    )]
    pub async fn load_indicators(
        &self,
        specs: &[IndicatorSpec],
    ) -> Result<LoadReport, CruscottoError> {
        let known: HashSet<&'static str> = self.connectors.iter().map(|c| c.name()).collect();
        validate_indicators(specs, &known)?;

        let tasks = specs
            .iter()
            .map(|spec| async move { (spec, self.fetch_indicator(spec).await) });
        let outcomes = join_with_deadline(tasks, self.cfg.request_timeout)
            .await
            .map_err(|_| CruscottoError::request_timeout("load"))?;

        let (loaded, failed) = partition_outcomes(outcomes);
        let warnings: Vec<CruscottoError> = failed
            .into_iter()
            .map(|(_spec, e)| {
                #[cfg(feature = "tracing")]
                tracing::warn!(indicator = %_spec.name, error = %e, "indicator excluded");
                e
            })
            .collect();
        let available: Vec<String> = loaded.iter().map(|(spec, _)| spec.name.clone()).collect();
        let series: Vec<IndicatorSeries> = loaded.into_iter().map(|(_, s)| s).collect();

        let columns: Vec<String> = specs.iter().map(|s| s.name.clone()).collect();
        let result = try_merge(&columns, &series)?;
        #[cfg(feature = "tracing")]
        tracing::debug!(
            rows = result.len(),
            available = available.len(),
            excluded = warnings.len(),
            "merged"
        );
        Ok(LoadReport {
            result,
            available,
            warnings,
        })
    }
}
