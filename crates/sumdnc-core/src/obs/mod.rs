//! Observability: metrics events, the sink boundary, and the process-wide
//! counter state they accumulate into.

pub mod metrics;
pub mod sink;

pub use metrics::{EntityCounters, EventOps, EventReport};
pub use sink::{
    LookupKind, MetricsEvent, MetricsSink, metrics_report, metrics_reset_all, with_metrics_sink,
};
