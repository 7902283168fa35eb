//! Observability: index lifecycle and query telemetry, and the sink
//! abstraction it flows through.

pub(crate) mod metrics;
pub(crate) mod sink;

// re-exports
pub use metrics::{EventOps, EventReport, EventState, SlotCounters};
pub use sink::{
    IndexEvent, LifecycleOp, MetricsSink, metrics_report, metrics_reset_all, with_metrics_sink,
};
