//! Observability: hydration metrics and the sink they flow through.
//!
//! Mapper and session code never touch `metrics` state directly; all
//! instrumentation goes through [`MetricsEvent`] and [`MetricsSink`].

pub(crate) mod metrics;
pub(crate) mod sink;

// re-exports
pub use metrics::{EntityCounters, EventOps, EventReport};
pub use sink::{MetricsEvent, MetricsSink, metrics_report, metrics_reset_all};
