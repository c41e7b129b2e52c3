//! Request descriptors passed from the orchestrator to connectors.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::connector::ConnectorKey;
use crate::series::{Cycle, DateRange};

/// Provider-side identity of a series.
///
/// - `code`: function or statistic code (`"FX_DAILY"`, `"TREASURY_YIELD"`, `"731Y001"`).
/// - `item`: symbol or item code (`"USD/KRW"`, `"0000001"`), when the endpoint takes one.
/// - `params`: extra query parameters forwarded verbatim (`maturity=10year`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct SeriesId {
    /// Function or statistic code.
    pub code: String,
    /// Symbol or item code.
    pub item: Option<String>,
    /// Extra provider parameters, ordered for stable cache keys.
    pub params: BTreeMap<String, String>,
}

impl SeriesId {
    /// A series addressed by its code alone.
    pub fn new(code: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            ..Self::default()
        }
    }

    /// Set the symbol or item code.
    #[must_use]
    pub fn item(mut self, item: impl Into<String>) -> Self {
        self.item = Some(item.into());
        self
    }

    /// Add an extra provider parameter.
    #[must_use]
    pub fn param(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.params.insert(key.into(), value.into());
        self
    }
}

/// Everything a connector needs to fetch one series.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SeriesRequest {
    /// Provider-side identity.
    pub series: SeriesId,
    /// Declared native cycle.
    pub cycle: Cycle,
    /// Optional inclusive date window.
    pub range: Option<DateRange>,
}

impl SeriesRequest {
    /// Build a request without a date window.
    #[must_use]
    pub const fn new(series: SeriesId, cycle: Cycle) -> Self {
        Self {
            series,
            cycle,
            range: None,
        }
    }

    /// Restrict the request to `range`.
    #[must_use]
    pub const fn with_range(mut self, range: DateRange) -> Self {
        self.range = Some(range);
        self
    }
}

/// Verbatim JSON body returned by a provider.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RawPayload {
    /// Connector that produced the payload.
    pub connector: ConnectorKey,
    /// Parsed response body.
    pub body: serde_json::Value,
}

impl RawPayload {
    /// Wrap a parsed body.
    #[must_use]
    pub const fn new(connector: ConnectorKey, body: serde_json::Value) -> Self {
        Self { connector, body }
    }
}

/// Optional value transform applied after ingestion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Transform {
    /// Keep values as reported.
    #[default]
    None,
    /// Percent change versus the same period one year earlier.
    YearOverYear,
}

/// How the dashboard expresses a period-over-period change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ChangeKind {
    /// Relative change in percent.
    #[default]
    Percent,
    /// Absolute difference in the indicator's own unit (yields, rates).
    Points,
}

/// Declaration of one indicator the orchestrator should load.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IndicatorSpec {
    /// Unique column key in the merged table.
    pub name: String,
    /// Display label.
    pub label: String,
    /// Connector that serves the series.
    pub source: ConnectorKey,
    /// Provider request.
    pub request: SeriesRequest,
    /// Post-ingestion transform.
    pub transform: Transform,
    /// How changes of this indicator are reported.
    pub change: ChangeKind,
}

impl IndicatorSpec {
    /// Declare an indicator; the label defaults to the name.
    pub fn new(name: impl Into<String>, source: ConnectorKey, request: SeriesRequest) -> Self {
        let name = name.into();
        Self {
            label: name.clone(),
            name,
            source,
            request,
            transform: Transform::None,
            change: ChangeKind::Percent,
        }
    }

    /// Set the display label.
    #[must_use]
    pub fn label(mut self, label: impl Into<String>) -> Self {
        self.label = label.into();
        self
    }

    /// Apply a post-ingestion transform.
    #[must_use]
    pub const fn transform(mut self, transform: Transform) -> Self {
        self.transform = transform;
        self
    }

    /// Report changes in absolute points instead of percent.
    #[must_use]
    pub const fn in_points(mut self) -> Self {
        self.change = ChangeKind::Points;
        self
    }
}
