use crate::index::Slot;
use serde::{Deserialize, Serialize};
use std::{cell::RefCell, collections::BTreeMap};

///
/// EventState
/// Ephemeral, in-memory counters for index lifecycle and query activity.
///

#[derive(Clone, Debug, Default, Deserialize, Serialize)]
pub struct EventState {
    pub ops: EventOps,
    pub slots: BTreeMap<Slot, SlotCounters>,
}

///
/// EventOps
///

#[derive(Clone, Debug, Default, Deserialize, Serialize)]
pub struct EventOps {
    // Lifecycle fan-out, one count per slot call
    pub drop_calls: u64,
    pub close_calls: u64,
    pub force_calls: u64,
    pub refresh_calls: u64,
    pub release_calls: u64,
    pub fan_out_failures: u64,

    // Drop actions run after a fully successful drop
    pub drop_actions: u64,

    // Queries
    pub queries_unordered: u64,
    pub queries_ascending: u64,
    pub queries_descending: u64,
    pub queries_all_slots: u64,
    pub candidates_accepted: u64,
    pub candidates_rejected: u64,

    // Full scans
    pub entries_scanned: u64,
}

///
/// SlotCounters
///

#[derive(Clone, Debug, Default, Deserialize, Serialize)]
pub struct SlotCounters {
    pub fan_out_calls: u64,
    pub fan_out_failures: u64,
    pub queries: u64,
}

///
/// EventReport
/// Point-in-time snapshot of the counters.
///

#[derive(Clone, Debug, Default, Deserialize, Serialize)]
pub struct EventReport {
    pub counters: Option<EventState>,
}

thread_local! {
    static EVENT_STATE: RefCell<EventState> = RefCell::new(EventState::default());
}

/// Borrow metrics immutably.
pub(crate) fn with_state<R>(f: impl FnOnce(&EventState) -> R) -> R {
    EVENT_STATE.with(|m| f(&m.borrow()))
}

/// Borrow metrics mutably.
pub(crate) fn with_state_mut<R>(f: impl FnOnce(&mut EventState) -> R) -> R {
    EVENT_STATE.with(|m| f(&mut m.borrow_mut()))
}

/// Reset all counters.
pub(crate) fn reset_all() {
    with_state_mut(|m| *m = EventState::default());
}

/// Snapshot counters; `None` when nothing has been recorded yet.
pub(crate) fn report() -> EventReport {
    with_state(|m| {
        let empty = m.slots.is_empty() && m.ops.drop_actions == 0 && m.ops.entries_scanned == 0;
        let untouched = empty
            && m.ops.queries_unordered == 0
            && m.ops.queries_ascending == 0
            && m.ops.queries_descending == 0
            && m.ops.queries_all_slots == 0
            && m.ops.candidates_accepted == 0
            && m.ops.candidates_rejected == 0;

        EventReport {
            counters: (!untouched).then(|| m.clone()),
        }
    })
}
