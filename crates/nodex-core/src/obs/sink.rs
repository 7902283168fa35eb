//! Metrics sink boundary.
//!
//! Index logic MUST NOT touch obs::metrics directly.
//! All instrumentation flows through IndexEvent and MetricsSink.
//!
//! This module is the only allowed bridge between index code and the
//! thread-local metrics state.
use crate::{
    index::{IndexId, IndexOrder, Slot},
    obs::metrics,
};
use std::{cell::RefCell, rc::Rc};

thread_local! {
    static SINK_OVERRIDE: RefCell<Vec<Rc<dyn MetricsSink>>> = const { RefCell::new(Vec::new()) };
}

///
/// LifecycleOp
///

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum LifecycleOp {
    Drop,
    Close,
    Force,
    Refresh,
    /// Closing a per-slot reader, updater or full-scan reader.
    Release,
}

///
/// IndexEvent
///

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum IndexEvent {
    LifecycleFanOut {
        op: LifecycleOp,
        slot: Slot,
        failed: bool,
    },
    DropActionInvoked {
        index_id: IndexId,
    },
    QueryStart {
        order: IndexOrder,
        slot: Option<Slot>,
    },
    CandidatesScanned {
        accepted: u64,
        rejected: u64,
    },
    EntriesScanned {
        entries: u64,
    },
}

///
/// MetricsSink
///

pub trait MetricsSink {
    fn record(&self, event: IndexEvent);
}

/// GlobalMetricsSink
/// Default sink that writes into the thread-local counters.
/// Acts as the concrete sink when no scoped override is installed.

pub(crate) struct GlobalMetricsSink;

impl MetricsSink for GlobalMetricsSink {
    fn record(&self, event: IndexEvent) {
        match event {
            IndexEvent::LifecycleFanOut { op, slot, failed } => {
                metrics::with_state_mut(|m| {
                    let calls = match op {
                        LifecycleOp::Drop => &mut m.ops.drop_calls,
                        LifecycleOp::Close => &mut m.ops.close_calls,
                        LifecycleOp::Force => &mut m.ops.force_calls,
                        LifecycleOp::Refresh => &mut m.ops.refresh_calls,
                        LifecycleOp::Release => &mut m.ops.release_calls,
                    };
                    *calls = calls.saturating_add(1);

                    let entry = m.slots.entry(slot).or_default();
                    entry.fan_out_calls = entry.fan_out_calls.saturating_add(1);
                    if failed {
                        entry.fan_out_failures = entry.fan_out_failures.saturating_add(1);
                        m.ops.fan_out_failures = m.ops.fan_out_failures.saturating_add(1);
                    }
                });
            }

            IndexEvent::DropActionInvoked { .. } => {
                metrics::with_state_mut(|m| {
                    m.ops.drop_actions = m.ops.drop_actions.saturating_add(1);
                });
            }

            IndexEvent::QueryStart { order, slot } => {
                metrics::with_state_mut(|m| {
                    let counter = match order {
                        IndexOrder::None => &mut m.ops.queries_unordered,
                        IndexOrder::Ascending => &mut m.ops.queries_ascending,
                        IndexOrder::Descending => &mut m.ops.queries_descending,
                    };
                    *counter = counter.saturating_add(1);

                    match slot {
                        Some(slot) => {
                            let entry = m.slots.entry(slot).or_default();
                            entry.queries = entry.queries.saturating_add(1);
                        }
                        None => {
                            m.ops.queries_all_slots = m.ops.queries_all_slots.saturating_add(1);
                        }
                    }
                });
            }

            IndexEvent::CandidatesScanned { accepted, rejected } => {
                metrics::with_state_mut(|m| {
                    m.ops.candidates_accepted = m.ops.candidates_accepted.saturating_add(accepted);
                    m.ops.candidates_rejected = m.ops.candidates_rejected.saturating_add(rejected);
                });
            }

            IndexEvent::EntriesScanned { entries } => {
                metrics::with_state_mut(|m| {
                    m.ops.entries_scanned = m.ops.entries_scanned.saturating_add(entries);
                });
            }
        }
    }
}

pub(crate) const GLOBAL_METRICS_SINK: GlobalMetricsSink = GlobalMetricsSink;

pub(crate) fn record(event: IndexEvent) {
    let sink = SINK_OVERRIDE.with(|cell| cell.borrow().last().cloned());
    match sink {
        Some(sink) => sink.record(event),
        None => GLOBAL_METRICS_SINK.record(event),
    }
}

/// Snapshot the current metrics state.
#[must_use]
pub fn metrics_report() -> metrics::EventReport {
    metrics::report()
}

/// Reset all metrics state.
pub fn metrics_reset_all() {
    metrics::reset_all();
}

/// Run a closure with a temporary metrics sink override.
///
/// Overrides nest; the previous sink is restored on every exit, including
/// unwinding.
pub fn with_metrics_sink<T>(sink: Rc<dyn MetricsSink>, f: impl FnOnce() -> T) -> T {
    struct Guard;

    impl Drop for Guard {
        fn drop(&mut self) {
            SINK_OVERRIDE.with(|cell| {
                cell.borrow_mut().pop();
            });
        }
    }

    SINK_OVERRIDE.with(|cell| cell.borrow_mut().push(sink));
    let _guard = Guard;

    f()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::{
        cell::Cell,
        panic::{AssertUnwindSafe, catch_unwind},
    };

    #[derive(Default)]
    struct CountingSink {
        calls: Cell<usize>,
    }

    impl MetricsSink for CountingSink {
        fn record(&self, _: IndexEvent) {
            self.calls.set(self.calls.get() + 1);
        }
    }

    fn event() -> IndexEvent {
        IndexEvent::EntriesScanned { entries: 1 }
    }

    #[test]
    fn with_metrics_sink_routes_and_restores_nested_overrides() {
        let outer = Rc::new(CountingSink::default());
        let inner = Rc::new(CountingSink::default());

        with_metrics_sink(outer.clone(), || {
            record(event());
            assert_eq!(outer.calls.get(), 1);

            with_metrics_sink(inner.clone(), || record(event()));

            // Inner override was restored to outer override.
            record(event());
        });

        assert_eq!(outer.calls.get(), 2);
        assert_eq!(inner.calls.get(), 1);
        SINK_OVERRIDE.with(|cell| assert!(cell.borrow().is_empty()));
    }

    #[test]
    fn with_metrics_sink_restores_override_on_panic() {
        let sink = Rc::new(CountingSink::default());

        let panicked = catch_unwind(AssertUnwindSafe(|| {
            with_metrics_sink(sink.clone(), || {
                record(event());
                panic!("intentional panic for guard test");
            });
        }))
        .is_err();

        assert!(panicked);
        assert_eq!(sink.calls.get(), 1);
        SINK_OVERRIDE.with(|cell| assert!(cell.borrow().is_empty()));
    }

    #[test]
    fn lifecycle_events_accumulate_per_slot() {
        metrics_reset_all();

        record(IndexEvent::LifecycleFanOut {
            op: LifecycleOp::Drop,
            slot: Slot::Spatial,
            failed: true,
        });
        record(IndexEvent::LifecycleFanOut {
            op: LifecycleOp::Close,
            slot: Slot::Spatial,
            failed: false,
        });
        record(IndexEvent::DropActionInvoked {
            index_id: IndexId(1),
        });

        let counters = metrics_report()
            .counters
            .expect("metrics report should include counters");
        assert_eq!(counters.ops.drop_calls, 1);
        assert_eq!(counters.ops.close_calls, 1);
        assert_eq!(counters.ops.fan_out_failures, 1);
        assert_eq!(counters.ops.drop_actions, 1);

        let spatial = counters
            .slots
            .get(&Slot::Spatial)
            .expect("spatial counters should be present");
        assert_eq!(spatial.fan_out_calls, 2);
        assert_eq!(spatial.fan_out_failures, 1);
    }

    #[test]
    fn report_is_empty_after_reset() {
        metrics_reset_all();

        assert!(metrics_report().counters.is_none());
    }
}
