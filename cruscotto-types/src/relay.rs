//! Failure body relayed to browser-side callers.

use serde::{Deserialize, Serialize};

use crate::error::CruscottoError;

/// `{error, details}` body sent with a server-error status when an upstream
/// fetch fails.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FailureBody {
    /// Short description of what failed.
    pub error: String,
    /// Provider error text or transport message.
    pub details: String,
}

impl FailureBody {
    /// HTTP status that accompanies the body.
    pub const STATUS: u16 = 500;
}

impl From<&CruscottoError> for FailureBody {
    fn from(err: &CruscottoError) -> Self {
        match err {
            CruscottoError::Fetch {
                connector,
                msg,
                details,
            } => Self {
                error: format!("failed to fetch from {connector}"),
                details: details.clone().unwrap_or_else(|| msg.clone()),
            },
            other => Self {
                error: "request failed".to_string(),
                details: other.to_string(),
            },
        }
    }
}
