/// Core EventEmitter implementation
use crate::config::EmitterConfig;
use crate::registry::{EventKey, EventName, Registry};
use crate::stats::{EmitterStats, StatsCounters};
use std::borrow::Borrow;
use std::fmt;
use std::hash::Hash;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};
use uuid::Uuid;

/// Unique identity of an emitter, used in log output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct EmitterId(Uuid);

impl EmitterId {
    fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl fmt::Display for EmitterId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

/// State shared by every handle of one emitter.
pub(crate) struct EmitterInner<P, K> {
    pub(super) id: EmitterId,
    pub(super) config: EmitterConfig,
    pub(super) registry: Registry<K, P>,
    /// Downstream emitters, held weakly
    pub(super) bridges: Mutex<Vec<Weak<EmitterInner<P, K>>>>,
    pub(super) stats: StatsCounters,
}

impl<P, K> EmitterInner<P, K> {
    pub(super) fn bridges(&self) -> MutexGuard<'_, Vec<Weak<EmitterInner<P, K>>>> {
        // Listeners never run under this lock, so a poisoned guard still holds a valid list
        self.bridges.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Name used in log fields: the configured label, or the id.
    pub(super) fn name(&self) -> String {
        match &self.config.label {
            Some(label) => label.clone(),
            None => self.id.to_string(),
        }
    }
}

/// A priority-ordered publish/subscribe event emitter.
///
/// `P` is the payload type handed to listeners and `K` the event name type.
/// The emitter is a cheap handle: clones share one registry, which is what
/// lets listeners capture the emitter and subscribe, unsubscribe or emit
/// from inside a dispatch.
///
/// # Examples
///
/// ```rust
/// use event_emitter::{EventEmitter, Propagation};
/// use std::sync::{Arc, Mutex};
///
/// let emitter: EventEmitter<String> = EventEmitter::new();
/// let seen = Arc::new(Mutex::new(Vec::new()));
///
/// let log = seen.clone();
/// emitter.on_with_priority("saved", 10, move |path: &String| {
///     log.lock().unwrap().push(format!("audit {}", path));
/// });
/// emitter.on("saved", |_: &String| Propagation::Stop);
///
/// emitter.emit("saved", &"notes.md".to_string()).unwrap();
/// assert_eq!(*seen.lock().unwrap(), vec!["audit notes.md".to_string()]);
/// ```
pub struct EventEmitter<P, K = EventName> {
    pub(super) inner: Arc<EmitterInner<P, K>>,
}

impl<P, K> Clone for EventEmitter<P, K> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<P, K> fmt::Debug for EventEmitter<P, K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventEmitter")
            .field("id", &self.inner.id)
            .field("label", &self.inner.config.label)
            .field("listeners", &"[listeners]")
            .field("bridges", &self.inner.bridges().len())
            .finish()
    }
}

impl<P: 'static, K: EventKey> EventEmitter<P, K> {
    /// Creates an emitter with no listeners and no bridges.
    pub fn new() -> Self {
        Self::with_config(EmitterConfig::default())
    }

    /// Creates an emitter with explicit configuration.
    pub fn with_config(config: EmitterConfig) -> Self {
        Self {
            inner: Arc::new(EmitterInner {
                id: EmitterId::new(),
                config,
                registry: Registry::new(),
                bridges: Mutex::new(Vec::new()),
                stats: StatsCounters::default(),
            }),
        }
    }

    #[inline]
    pub fn id(&self) -> EmitterId {
        self.inner.id
    }

    pub fn label(&self) -> Option<&str> {
        self.inner.config.label.as_deref()
    }

    pub fn config(&self) -> &EmitterConfig {
        &self.inner.config
    }

    /// Returns `true` if both handles refer to the same emitter.
    pub fn same_emitter(&self, other: &EventEmitter<P, K>) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }

    /// Number of listeners registered for `event` across all priorities.
    pub fn listener_count<Q>(&self, event: &Q) -> usize
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.inner.registry.listener_count(event)
    }

    pub fn has_listeners<Q>(&self, event: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.listener_count(event) > 0
    }

    /// Event names that currently have at least one listener, in no particular order.
    pub fn registered_events(&self) -> Vec<K> {
        self.inner.registry.events()
    }

    /// Gets the current emitter statistics
    pub fn stats(&self) -> EmitterStats {
        self.inner
            .stats
            .snapshot(self.inner.registry.total_listeners())
    }
}

impl<P: 'static, K: EventKey> Default for EventEmitter<P, K> {
    fn default() -> Self {
        Self::new()
    }
}
