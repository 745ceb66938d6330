//! Operational HTTP surface for the copelk bot: health, sanitized config and
//! Prometheus metrics.

pub mod api;
pub mod metrics;
pub mod state;
