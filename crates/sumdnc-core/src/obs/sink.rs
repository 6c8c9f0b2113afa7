//! Metrics sink boundary.
//!
//! Listing and lookup code never touches `obs::metrics` directly.
//! All instrumentation flows through `MetricsEvent` and `MetricsSink`.
use crate::{obs::metrics, traits::EntityKind};
use std::{cell::RefCell, marker::PhantomData};

thread_local! {
    static SINK_OVERRIDE: RefCell<Option<*const dyn MetricsSink>> = const { RefCell::new(None) };
}

///
/// LookupKind
///

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum LookupKind {
    Id,
    Unique,
}

///
/// MetricsEvent
///

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum MetricsEvent {
    ListStart {
        entity_path: &'static str,
    },
    ListFinish {
        entity_path: &'static str,
        rows_loaded: u64,
        rows_scanned: u64,
        has_more: bool,
        failed: bool,
    },
    CursorRejected {
        entity_path: &'static str,
    },
    Lookup {
        entity_path: &'static str,
        kind: LookupKind,
        found: bool,
    },
}

///
/// MetricsSink
///

pub trait MetricsSink {
    fn record(&self, event: MetricsEvent);
}

/// GlobalMetricsSink
/// Default sink that writes into the process-wide counter state.
/// Acts as the concrete sink when no scoped override is installed.

pub(crate) struct GlobalMetricsSink;

impl MetricsSink for GlobalMetricsSink {
    fn record(&self, event: MetricsEvent) {
        match event {
            MetricsEvent::ListStart { entity_path } => {
                metrics::with_state_mut(|m| {
                    m.ops.list_calls = m.ops.list_calls.saturating_add(1);
                    let entry = m.entities.entry(entity_path.to_string()).or_default();
                    entry.list_calls = entry.list_calls.saturating_add(1);
                });
            }

            MetricsEvent::ListFinish {
                entity_path,
                rows_loaded,
                rows_scanned,
                has_more,
                failed,
            } => {
                metrics::with_state_mut(|m| {
                    m.ops.rows_loaded = m.ops.rows_loaded.saturating_add(rows_loaded);
                    m.ops.rows_scanned = m.ops.rows_scanned.saturating_add(rows_scanned);
                    if has_more {
                        m.ops.pages_with_more = m.ops.pages_with_more.saturating_add(1);
                    }
                    if failed {
                        m.ops.list_failures = m.ops.list_failures.saturating_add(1);
                    }

                    let entry = m.entities.entry(entity_path.to_string()).or_default();
                    entry.rows_loaded = entry.rows_loaded.saturating_add(rows_loaded);
                    entry.rows_scanned = entry.rows_scanned.saturating_add(rows_scanned);
                });
            }

            MetricsEvent::CursorRejected { entity_path } => {
                metrics::with_state_mut(|m| {
                    m.ops.cursors_rejected = m.ops.cursors_rejected.saturating_add(1);
                    let entry = m.entities.entry(entity_path.to_string()).or_default();
                    entry.cursors_rejected = entry.cursors_rejected.saturating_add(1);
                });
            }

            MetricsEvent::Lookup {
                entity_path, found, ..
            } => {
                metrics::with_state_mut(|m| {
                    m.ops.lookup_calls = m.ops.lookup_calls.saturating_add(1);
                    if !found {
                        m.ops.lookup_misses = m.ops.lookup_misses.saturating_add(1);
                    }

                    let entry = m.entities.entry(entity_path.to_string()).or_default();
                    entry.lookup_calls = entry.lookup_calls.saturating_add(1);
                    if !found {
                        entry.lookup_misses = entry.lookup_misses.saturating_add(1);
                    }
                });
            }
        }
    }
}

pub(crate) const GLOBAL_METRICS_SINK: GlobalMetricsSink = GlobalMetricsSink;

/// Route one event to the scoped override, or the global sink.
pub fn record(event: MetricsEvent) {
    let override_ptr = SINK_OVERRIDE.with(|cell| *cell.borrow());
    if let Some(ptr) = override_ptr {
        // SAFETY: `ptr` was installed by `with_metrics_sink` from a live shared
        // borrow, and its guard restores the previous slot on every exit
        // (including unwind) before that borrow ends. `record` is synchronous
        // and never keeps the pointer.
        unsafe { (&*ptr).record(event) };
    } else {
        GLOBAL_METRICS_SINK.record(event);
    }
}

/// Snapshot the current metrics state.
#[must_use]
pub fn metrics_report(window_start_ms: Option<u64>) -> metrics::EventReport {
    metrics::report_window_start(window_start_ms)
}

/// Reset all metrics state.
pub fn metrics_reset_all() {
    metrics::reset_all();
}

/// Run a closure with a temporary, thread-scoped metrics sink override.
pub fn with_metrics_sink<T>(sink: &dyn MetricsSink, f: impl FnOnce() -> T) -> T {
    struct Guard(Option<*const dyn MetricsSink>);

    impl Drop for Guard {
        fn drop(&mut self) {
            SINK_OVERRIDE.with(|cell| {
                *cell.borrow_mut() = self.0;
            });
        }
    }

    // SAFETY: the lifetime is erased only for the dynamic extent of `f`;
    // `Guard` restores the previous slot on all exits, and `record` only
    // dereferences synchronously.
    let sink_ptr = unsafe { std::mem::transmute::<&dyn MetricsSink, *const dyn MetricsSink>(sink) };
    let prev = SINK_OVERRIDE.with(|cell| cell.borrow_mut().replace(sink_ptr));
    let _guard = Guard(prev);

    f()
}

/// ListSpan
/// RAII guard that emits start/finish events for one list call.
/// Finish accounting happens even on early return or unwind.

pub(crate) struct ListSpan<E: EntityKind> {
    rows_loaded: u64,
    rows_scanned: u64,
    has_more: bool,
    succeeded: bool,
    _marker: PhantomData<E>,
}

impl<E: EntityKind> ListSpan<E> {
    #[must_use]
    pub(crate) fn new() -> Self {
        record(MetricsEvent::ListStart {
            entity_path: E::PATH,
        });

        Self {
            rows_loaded: 0,
            rows_scanned: 0,
            has_more: false,
            succeeded: false,
            _marker: PhantomData,
        }
    }

    pub(crate) const fn set_page(&mut self, rows_loaded: u64, rows_scanned: u64, has_more: bool) {
        self.rows_loaded = rows_loaded;
        self.rows_scanned = rows_scanned;
        self.has_more = has_more;
        self.succeeded = true;
    }
}

impl<E: EntityKind> Drop for ListSpan<E> {
    fn drop(&mut self) {
        record(MetricsEvent::ListFinish {
            entity_path: E::PATH,
            rows_loaded: self.rows_loaded,
            rows_scanned: self.rows_scanned,
            has_more: self.has_more,
            failed: !self.succeeded,
        });
    }
}
