use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Unified error type for the cruscotto workspace.
///
/// Per-indicator failures (`Fetch`, `Parse`, `DataUnavailable`, timeouts) are
/// recoverable: the orchestrator excludes the indicator and records the error
/// as a warning. `NoData` is the aggregate hard stop surfaced to callers.
#[derive(Debug, Error, Serialize, Deserialize, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum CruscottoError {
    /// Transport error, non-success status, or an in-payload error field.
    #[error("{connector} fetch failed: {msg}")]
    Fetch {
        /// Connector name that failed.
        connector: String,
        /// Human-readable error message.
        msg: String,
        /// The provider's own error text, when it supplied one.
        details: Option<String>,
    },

    /// Payload present but not convertible into a series.
    #[error("failed to parse {indicator}: {msg}")]
    Parse {
        /// Indicator whose payload was rejected.
        indicator: String,
        /// Human-readable error message.
        msg: String,
    },

    /// Payload has no recognizable series key or zero usable points.
    #[error("no usable data for {indicator}")]
    DataUnavailable {
        /// Indicator that produced no points.
        indicator: String,
    },

    /// Every indicator failed ingestion, or the merged calendar is empty.
    #[error("no data: nothing to merge")]
    NoData,

    /// Invalid input argument.
    #[error("invalid argument: {0}")]
    InvalidArg(String),

    /// The requested operation is not implemented by the target connector.
    #[error("unsupported: {what}")]
    Unsupported {
        /// Description of what was requested (e.g. "alphavantage function FOO").
        what: String,
    },

    /// An individual provider call exceeded the configured timeout.
    #[error("provider timed out: {indicator} via {connector}")]
    ProviderTimeout {
        /// Connector name that timed out.
        connector: String,
        /// Indicator being fetched.
        indicator: String,
    },

    /// The overall load exceeded the configured deadline.
    #[error("request timed out: {what}")]
    RequestTimeout {
        /// Label of the operation that timed out.
        what: String,
    },

    /// The request exceeds the configured quota budget for the current window.
    #[error("quota exceeded: remaining={remaining} reset_in_ms={reset_in_ms}")]
    QuotaExceeded {
        /// Remaining units at the time of rejection.
        remaining: u64,
        /// Milliseconds until the quota window resets.
        reset_in_ms: u64,
    },

    /// Unknown/opaque error.
    #[error("unknown error: {0}")]
    Other(String),
}

impl CruscottoError {
    /// Helper: build a `Fetch` error without provider details.
    pub fn fetch(connector: impl Into<String>, msg: impl Into<String>) -> Self {
        Self::Fetch {
            connector: connector.into(),
            msg: msg.into(),
            details: None,
        }
    }

    /// Helper: build a `Fetch` error carrying the provider's own error text.
    pub fn fetch_with_details(
        connector: impl Into<String>,
        msg: impl Into<String>,
        details: impl Into<String>,
    ) -> Self {
        Self::Fetch {
            connector: connector.into(),
            msg: msg.into(),
            details: Some(details.into()),
        }
    }

    /// Helper: build a `Parse` error.
    pub fn parse(indicator: impl Into<String>, msg: impl Into<String>) -> Self {
        Self::Parse {
            indicator: indicator.into(),
            msg: msg.into(),
        }
    }

    /// Helper: build a `DataUnavailable` error.
    pub fn data_unavailable(indicator: impl Into<String>) -> Self {
        Self::DataUnavailable {
            indicator: indicator.into(),
        }
    }

    /// Helper: build an `Unsupported` error.
    #[must_use]
    pub fn unsupported(what: impl Into<String>) -> Self {
        Self::Unsupported { what: what.into() }
    }

    /// Helper: build a `ProviderTimeout` error.
    pub fn provider_timeout(connector: impl Into<String>, indicator: impl Into<String>) -> Self {
        Self::ProviderTimeout {
            connector: connector.into(),
            indicator: indicator.into(),
        }
    }

    /// Helper: build a `RequestTimeout` error.
    #[must_use]
    pub fn request_timeout(what: impl Into<String>) -> Self {
        Self::RequestTimeout { what: what.into() }
    }

    /// True for `Parse` and its specialization `DataUnavailable`.
    #[must_use]
    pub const fn is_parse_failure(&self) -> bool {
        matches!(self, Self::Parse { .. } | Self::DataUnavailable { .. })
    }

    /// Returns true when the error only excludes a single indicator.
    ///
    /// `NoData` and argument errors are not recoverable; everything raised
    /// while fetching or adapting one series is.
    #[must_use]
    pub const fn is_recoverable(&self) -> bool {
        !matches!(
            self,
            Self::NoData | Self::InvalidArg(_) | Self::RequestTimeout { .. }
        )
    }

    /// Provider-supplied error text, if any.
    #[must_use]
    pub fn details(&self) -> Option<&str> {
        match self {
            Self::Fetch { details, .. } => details.as_deref(),
            _ => None,
        }
    }
}
