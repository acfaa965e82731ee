/// Handles returned by listener registration
use super::core::EmitterInner;
use crate::listener::{ListenerId, Priority};
use crate::registry::{EventKey, EventName};
use std::fmt;
use std::sync::Weak;
use tracing::debug;

/// Handle to one registered listener record.
///
/// Dropping a `Subscription` does **not** remove the listener; call
/// [`unsubscribe`](Subscription::unsubscribe). The handle only holds a weak
/// reference, so it never keeps an emitter alive.
///
/// Unlike [`EventEmitter::off`](super::EventEmitter::off), which removes every
/// record sharing a handler, `unsubscribe` removes exactly the record this
/// handle was returned for.
pub struct Subscription<P, K = EventName> {
    emitter: Weak<EmitterInner<P, K>>,
    event: K,
    priority: Priority,
    id: ListenerId,
    once: bool,
}

impl<P, K: EventKey> Subscription<P, K> {
    pub(super) fn new(
        emitter: Weak<EmitterInner<P, K>>,
        event: K,
        priority: Priority,
        id: ListenerId,
        once: bool,
    ) -> Self {
        Self {
            emitter,
            event,
            priority,
            id,
            once,
        }
    }

    /// Removes the listener. Returns `true` only for the call that removed it;
    /// later calls, or calls after the emitter was dropped, do nothing.
    pub fn unsubscribe(&self) -> bool {
        let Some(inner) = self.emitter.upgrade() else {
            return false;
        };

        let removed = inner.registry.remove_id(&self.event, self.priority, self.id);
        if removed {
            debug!(
                emitter = %inner.name(),
                event = %self.event,
                priority = self.priority,
                listener = %self.id,
                "🗑️ Unsubscribed listener"
            );
        }
        removed
    }

    /// Returns `true` while the listener is still registered.
    ///
    /// A once listener stays active until the emit call that invoked it returns.
    pub fn is_active(&self) -> bool {
        self.emitter
            .upgrade()
            .map(|inner| inner.registry.contains(&self.event, self.priority, self.id))
            .unwrap_or(false)
    }

    pub fn event(&self) -> &K {
        &self.event
    }

    pub fn priority(&self) -> Priority {
        self.priority
    }

    pub fn id(&self) -> ListenerId {
        self.id
    }

    pub fn is_once(&self) -> bool {
        self.once
    }
}

impl<P, K: fmt::Debug> fmt::Debug for Subscription<P, K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscription")
            .field("event", &self.event)
            .field("priority", &self.priority)
            .field("id", &self.id)
            .field("once", &self.once)
            .finish()
    }
}
