//! Metrics and telemetry.
//!
//! Structured logging itself is wired up in `main` via `tracing-subscriber`;
//! this module owns the Prometheus side.

pub mod metrics;

pub use metrics::{init_metrics, record_request};
