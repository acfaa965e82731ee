/// Statistics tracking for an emitter
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicU64, Ordering};

/// Snapshot of an emitter's activity since construction.
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmitterStats {
    /// Listener records currently registered
    pub total_listeners: usize,
    /// Number of emit calls, including ones forwarded by bridges
    pub events_emitted: u64,
    /// Number of listener invocations
    pub listeners_invoked: u64,
    /// Emit calls halted by a listener returning `Propagation::Stop`
    pub propagation_stops: u64,
    /// Emit calls forwarded to bridged emitters
    pub bridge_forwards: u64,
    /// Listener failures, propagated or isolated
    pub handler_failures: u64,
}

#[derive(Debug, Default)]
pub(crate) struct StatsCounters {
    events_emitted: AtomicU64,
    listeners_invoked: AtomicU64,
    propagation_stops: AtomicU64,
    bridge_forwards: AtomicU64,
    handler_failures: AtomicU64,
}

impl StatsCounters {
    pub(crate) fn record_emit(&self) {
        self.events_emitted.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_invocation(&self) {
        self.listeners_invoked.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_stop(&self) {
        self.propagation_stops.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_forward(&self) {
        self.bridge_forwards.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_failure(&self) {
        self.handler_failures.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn snapshot(&self, total_listeners: usize) -> EmitterStats {
        EmitterStats {
            total_listeners,
            events_emitted: self.events_emitted.load(Ordering::Relaxed),
            listeners_invoked: self.listeners_invoked.load(Ordering::Relaxed),
            propagation_stops: self.propagation_stops.load(Ordering::Relaxed),
            bridge_forwards: self.bridge_forwards.load(Ordering::Relaxed),
            handler_failures: self.handler_failures.load(Ordering::Relaxed),
        }
    }
}
