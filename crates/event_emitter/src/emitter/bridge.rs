/// Forwarding emits to downstream emitters
use super::core::{EmitterInner, EventEmitter};
use super::dispatch::EmitReport;
use crate::error::EmitterError;
use crate::registry::EventKey;
use std::borrow::Borrow;
use std::fmt::Display;
use std::hash::Hash;
use std::sync::{Arc, Weak};
use tracing::{debug, error, trace, warn};

impl<P: 'static, K: EventKey> EventEmitter<P, K> {
    /// Forwards every emit that is not stopped on this emitter to `other`.
    ///
    /// Bridges are not de-duplicated: bridging the same emitter twice
    /// delivers each event to it twice. There is no cycle detection either;
    /// bridging two emitters to each other recurses until the stack runs out
    /// unless [`EmitterConfig::max_bridge_depth`](crate::EmitterConfig) is set.
    ///
    /// The bridge holds `other` weakly. Once every handle of `other` is
    /// dropped the bridge is skipped and pruned.
    pub fn bridge_emit(&self, other: &EventEmitter<P, K>) {
        let mut bridges = self.inner.bridges();
        bridges.push(Arc::downgrade(&other.inner));
        debug!(
            emitter = %self.inner.name(),
            target = %other.inner.name(),
            bridges = bridges.len(),
            "🌉 Bridged emitter"
        );
    }

    /// Number of live bridges.
    pub fn bridge_count(&self) -> usize {
        self.inner
            .bridges()
            .iter()
            .filter(|bridge| bridge.strong_count() > 0)
            .count()
    }
}

impl<P: 'static, K: EventKey> EmitterInner<P, K> {
    /// Re-emits on every live bridge in registration order.
    pub(super) fn forward<Q>(
        &self,
        event: &Q,
        payload: &P,
        depth: usize,
        report: &mut EmitReport,
    ) -> Result<(), EmitterError>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + Display + ?Sized,
    {
        let targets = self.live_bridges();
        if targets.is_empty() {
            return Ok(());
        }

        let depth = depth + 1;
        if let Some(limit) = self.config.max_bridge_depth {
            if depth > limit {
                return Err(EmitterError::BridgeDepthExceeded {
                    event: event.to_string(),
                    depth,
                    limit,
                });
            }
        }

        for target in targets {
            self.stats.record_forward();
            trace!(
                emitter = %self.name(),
                target = %target.name(),
                event = %event,
                depth,
                "Forwarding to bridge"
            );

            match target.dispatch(event, payload, depth) {
                Ok(_) => report.bridged += 1,
                Err(err) if self.config.isolate_failures => {
                    error!(
                        emitter = %self.name(),
                        target = %target.name(),
                        "❌ Bridge failed: {}",
                        err
                    );
                    report.failures.push(err);
                }
                Err(err) => return Err(err),
            }
        }
        Ok(())
    }

    /// Upgrades the bridge list, pruning emitters that no longer exist.
    ///
    /// The lock is released before any bridge is dispatched to.
    fn live_bridges(&self) -> Vec<Arc<EmitterInner<P, K>>> {
        let mut bridges = self.bridges();
        let before = bridges.len();
        bridges.retain(|bridge| bridge.strong_count() > 0);
        if bridges.len() < before {
            warn!(
                emitter = %self.name(),
                pruned = before - bridges.len(),
                "⚠️ Dropped emitters removed from bridge list"
            );
        }
        bridges.iter().filter_map(Weak::upgrade).collect()
    }
}
