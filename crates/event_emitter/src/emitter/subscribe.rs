/// Listener registration and removal
use super::core::EventEmitter;
use super::subscription::Subscription;
use crate::listener::{Handler, HandlerOutput, Priority, DEFAULT_PRIORITY};
use crate::registry::EventKey;
use std::borrow::Borrow;
use std::hash::Hash;
use std::sync::Arc;
use tracing::debug;

impl<P: 'static, K: EventKey> EventEmitter<P, K> {
    /// Registers a persistent listener at the default priority.
    ///
    /// The listener is placed in front of the listeners already registered at
    /// the same priority, so it runs before them.
    pub fn on<F, R>(&self, event: impl Into<K>, handler: F) -> Subscription<P, K>
    where
        F: Fn(&P) -> R + Send + Sync + 'static,
        R: HandlerOutput,
    {
        self.register(event.into(), DEFAULT_PRIORITY, Handler::new(handler), false)
    }

    /// Registers a persistent listener at `priority`. Higher priorities run first.
    pub fn on_with_priority<F, R>(
        &self,
        event: impl Into<K>,
        priority: Priority,
        handler: F,
    ) -> Subscription<P, K>
    where
        F: Fn(&P) -> R + Send + Sync + 'static,
        R: HandlerOutput,
    {
        self.register(event.into(), priority, Handler::new(handler), false)
    }

    /// Registers a shared [`Handler`] so it can later be removed with [`off`](Self::off).
    pub fn on_handler(
        &self,
        event: impl Into<K>,
        priority: Priority,
        handler: &Handler<P>,
    ) -> Subscription<P, K> {
        self.register(event.into(), priority, handler.clone(), false)
    }

    /// Registers a one-shot listener at the default priority.
    ///
    /// The listener is removed after the first emit that invokes it, whether
    /// or not it stopped propagation. If an earlier listener stops the emit
    /// before it is reached, it stays registered.
    pub fn once<F, R>(&self, event: impl Into<K>, handler: F) -> Subscription<P, K>
    where
        F: Fn(&P) -> R + Send + Sync + 'static,
        R: HandlerOutput,
    {
        self.register(event.into(), DEFAULT_PRIORITY, Handler::new(handler), true)
    }

    pub fn once_with_priority<F, R>(
        &self,
        event: impl Into<K>,
        priority: Priority,
        handler: F,
    ) -> Subscription<P, K>
    where
        F: Fn(&P) -> R + Send + Sync + 'static,
        R: HandlerOutput,
    {
        self.register(event.into(), priority, Handler::new(handler), true)
    }

    pub fn once_handler(
        &self,
        event: impl Into<K>,
        priority: Priority,
        handler: &Handler<P>,
    ) -> Subscription<P, K> {
        self.register(event.into(), priority, handler.clone(), true)
    }

    /// Removes every listener at the default priority registered from `handler`.
    ///
    /// Returns how many records were removed. Unknown events are a no-op.
    pub fn off<Q>(&self, event: &Q, handler: &Handler<P>) -> usize
    where
        K: Borrow<Q>,
        Q: Hash + Eq + std::fmt::Display + ?Sized,
    {
        self.off_with_priority(event, DEFAULT_PRIORITY, handler)
    }

    /// Removes every listener at `priority` registered from `handler`.
    ///
    /// This matches by handler identity, so a handler registered twice at the
    /// same priority loses both records; a [`Subscription`] removes only its own.
    pub fn off_with_priority<Q>(&self, event: &Q, priority: Priority, handler: &Handler<P>) -> usize
    where
        K: Borrow<Q>,
        Q: Hash + Eq + std::fmt::Display + ?Sized,
    {
        let removed = self.inner.registry.remove_handler(event, priority, handler);
        if removed > 0 {
            debug!(
                emitter = %self.inner.name(),
                event = %event,
                priority,
                removed,
                "🗑️ Removed listeners"
            );
        }
        removed
    }

    fn register(
        &self,
        event: K,
        priority: Priority,
        handler: Handler<P>,
        once: bool,
    ) -> Subscription<P, K> {
        let id = self.inner.registry.insert(event.clone(), priority, handler, once);
        debug!(
            emitter = %self.inner.name(),
            event = %event,
            priority,
            listener = %id,
            once,
            "📝 Registered listener"
        );
        Subscription::new(Arc::downgrade(&self.inner), event, priority, id, once)
    }
}
