/// Event dispatch
use super::core::{EmitterInner, EventEmitter};
use crate::error::EmitterError;
use crate::listener::{ListenerId, Priority, Propagation};
use crate::registry::{EventKey, Registry};
use smallvec::SmallVec;
use std::borrow::Borrow;
use std::fmt::Display;
use std::hash::Hash;
use tracing::{debug, error, trace};

/// Outcome of one emit call on the emitter it was made on.
#[derive(Debug, Default)]
pub struct EmitReport {
    /// Listeners invoked on this emitter
    pub invoked: usize,
    /// A listener returned `Propagation::Stop`
    pub stopped: bool,
    /// Bridged emitters the event was forwarded to
    pub bridged: usize,
    /// Listener or bridge failures tolerated because failures are isolated
    pub failures: Vec<EmitterError>,
}

impl EmitReport {
    /// Returns `true` if nothing failed during the emit.
    pub fn is_clean(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Once records claimed by a dispatch pass, removed when the pass ends.
///
/// Removal runs on drop so that a panicking listener cannot leave claimed
/// records behind.
struct ClaimedOnce<'a, K, P, Q>
where
    K: EventKey + Borrow<Q>,
    Q: Hash + Eq + ?Sized,
{
    registry: &'a Registry<K, P>,
    event: &'a Q,
    claimed: SmallVec<[(Priority, ListenerId); 4]>,
}

impl<K, P, Q> Drop for ClaimedOnce<'_, K, P, Q>
where
    K: EventKey + Borrow<Q>,
    Q: Hash + Eq + ?Sized,
{
    fn drop(&mut self) {
        if !self.claimed.is_empty() {
            self.registry.remove_claimed(self.event, &self.claimed);
        }
    }
}

impl<P: 'static, K: EventKey> EventEmitter<P, K> {
    /// Emits `event` with `payload`.
    ///
    /// Listeners run synchronously on the caller's thread, highest priority
    /// first and most recently registered first within a priority. A listener
    /// returning [`Propagation::Stop`] ends the emit: lower listeners are
    /// skipped and bridged emitters are not notified. Otherwise the same
    /// event and payload are forwarded to every bridge in the order they
    /// were added.
    ///
    /// The registry is read live: a listener removed by an earlier listener
    /// of the same emit does not run. Listeners registered while the emit is
    /// running are not invoked until the next emit.
    ///
    /// # Errors
    ///
    /// The first listener error aborts the emit and is returned as
    /// [`EmitterError::Handler`], unless the emitter isolates failures. Bridge
    /// failures propagate the same way.
    pub fn emit<Q>(&self, event: &Q, payload: &P) -> Result<EmitReport, EmitterError>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + Display + ?Sized,
    {
        self.inner.dispatch(event, payload, 0)
    }
}

impl<P: 'static, K: EventKey> EmitterInner<P, K> {
    /// Dispatches locally, then forwards to bridges. `depth` counts bridge hops.
    pub(super) fn dispatch<Q>(
        &self,
        event: &Q,
        payload: &P,
        depth: usize,
    ) -> Result<EmitReport, EmitterError>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + Display + ?Sized,
    {
        self.stats.record_emit();

        let watermark = self.registry.watermark();
        let mut report = EmitReport::default();
        let mut fired_once = ClaimedOnce {
            registry: &self.registry,
            event,
            claimed: SmallVec::new(),
        };
        let mut failure = None;

        'priorities: for priority in self.registry.priorities_desc(event) {
            let mut below = watermark;
            while let Some(claimed) = self.registry.claim_next(event, priority, below) {
                below = claimed.id.0;
                if claimed.once {
                    fired_once.claimed.push((priority, claimed.id));
                }

                report.invoked += 1;
                self.stats.record_invocation();
                trace!(
                    emitter = %self.name(),
                    event = %event,
                    priority,
                    listener = %claimed.id,
                    depth,
                    "Invoking listener"
                );

                match claimed.handler.call(payload) {
                    Ok(propagation) if propagation.is_stop() => {
                        report.stopped = true;
                        self.stats.record_stop();
                        debug!(
                            emitter = %self.name(),
                            event = %event,
                            priority,
                            listener = %claimed.id,
                            "🛑 Propagation stopped"
                        );
                        break 'priorities;
                    }
                    Ok(_) => {}
                    Err(source) => {
                        self.stats.record_failure();
                        let err = EmitterError::handler(event, source);
                        if self.config.isolate_failures {
                            error!(
                                emitter = %self.name(),
                                listener = %claimed.id,
                                "❌ {}",
                                err
                            );
                            report.failures.push(err);
                        } else {
                            failure = Some(err);
                            break 'priorities;
                        }
                    }
                }
            }
        }

        drop(fired_once);

        if let Some(err) = failure {
            return Err(err);
        }
        if !report.stopped {
            self.forward(event, payload, depth, &mut report)?;
        }
        Ok(report)
    }
}
