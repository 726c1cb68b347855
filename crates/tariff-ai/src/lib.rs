//! Billing engine and dialogue resolution for a municipal water utility
//! assistant. The `workflows::billing` module carries the tariff tables,
//! intent classification, and the per-session dialogue router; everything
//! HTTP-shaped lives in the companion API service crate.

pub mod config;
pub mod error;
pub mod telemetry;
pub mod workflows;
