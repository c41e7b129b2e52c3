//! Report envelopes produced by the orchestrator.

use serde::{Deserialize, Serialize};

use crate::error::CruscottoError;
use crate::series::MergeResult;

/// Outcome of a full dashboard load.
///
/// Carries the merged table, the indicators that ingested successfully, and
/// the per-indicator failures that were tolerated along the way.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct LoadReport {
    /// Merged daily table.
    pub result: MergeResult,
    /// Indicators that contributed data, in declaration order.
    pub available: Vec<String>,
    /// Non-fatal issues encountered while loading.
    pub warnings: Vec<CruscottoError>,
}

impl LoadReport {
    /// Whether `indicator` contributed data.
    #[must_use]
    pub fn is_available(&self, indicator: &str) -> bool {
        self.available.iter().any(|a| a == indicator)
    }
}
