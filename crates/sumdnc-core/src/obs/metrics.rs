use crate::types::Timestamp;
use candid::CandidType;
use serde::{Deserialize, Serialize};
use std::{
    collections::BTreeMap,
    sync::{Mutex, MutexGuard, PoisonError},
};

///
/// EventState
/// Ephemeral, in-memory counters for list and lookup operations.
///

#[derive(CandidType, Clone, Debug, Default, Deserialize, Serialize)]
pub struct EventState {
    pub ops: EventOps,
    pub entities: BTreeMap<String, EntityCounters>,
    pub since_ms: u64,
}

impl EventState {
    const fn empty() -> Self {
        Self {
            ops: EventOps::empty(),
            entities: BTreeMap::new(),
            since_ms: 0,
        }
    }
}

///
/// EventOps
///

#[derive(CandidType, Clone, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
pub struct EventOps {
    // Lister entrypoints
    pub list_calls: u64,
    pub list_failures: u64,
    pub pages_with_more: u64,

    // Rows
    pub rows_loaded: u64,
    pub rows_scanned: u64,

    // Cursor handling
    pub cursors_rejected: u64,

    // Point lookups
    pub lookup_calls: u64,
    pub lookup_misses: u64,
}

impl EventOps {
    const fn empty() -> Self {
        Self {
            list_calls: 0,
            list_failures: 0,
            pages_with_more: 0,
            rows_loaded: 0,
            rows_scanned: 0,
            cursors_rejected: 0,
            lookup_calls: 0,
            lookup_misses: 0,
        }
    }
}

///
/// EntityCounters
///

#[derive(CandidType, Clone, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
pub struct EntityCounters {
    pub list_calls: u64,
    pub rows_loaded: u64,
    pub rows_scanned: u64,
    pub cursors_rejected: u64,
    pub lookup_calls: u64,
    pub lookup_misses: u64,
}

///
/// EventReport
/// Point-in-time snapshot of the counter state.
///

#[derive(CandidType, Clone, Debug, Default, Deserialize, Serialize)]
pub struct EventReport {
    pub counters: Option<EventState>,
}

static STATE: Mutex<EventState> = Mutex::new(EventState::empty());

fn lock_state() -> MutexGuard<'static, EventState> {
    // Counters stay usable after a panicking writer; they are advisory.
    STATE.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Mutate the shared counter state.
pub(crate) fn with_state_mut<R>(f: impl FnOnce(&mut EventState) -> R) -> R {
    let mut state = lock_state();
    if state.since_ms == 0 {
        state.since_ms = Timestamp::now().as_millis();
    }

    f(&mut state)
}

/// Snapshot counters, returning `None` when the window opened after
/// `window_start_ms`.
pub(crate) fn report_window_start(window_start_ms: Option<u64>) -> EventReport {
    let state = lock_state().clone();

    match window_start_ms {
        Some(start) if start > state.since_ms => EventReport { counters: None },
        _ => EventReport {
            counters: Some(state),
        },
    }
}

pub(crate) fn reset_all() {
    *lock_state() = EventState::empty();
}
