//! cruscotto-middleware
//!
//! Connector wrappers composed around a raw provider client:
//! - [`CachingConnector`]: in-memory TTL cache of raw payloads.
//! - [`QuotaAwareConnector`]: per-provider call budget, rejecting or pacing.
//!
//! [`ConnectorBuilder`] stacks them in the supported order.

mod builder;
mod cache;
mod quota;

pub use crate::builder::ConnectorBuilder;
pub use crate::cache::{CacheMiddleware, CachingConnector};
pub use crate::quota::{QuotaAwareConnector, QuotaMiddleware};
