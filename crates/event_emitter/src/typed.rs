//! Typed facade over [`EventEmitter`].
//!
//! Every event is a Rust type with a static name. A [`TypedEmitter<E, L>`]
//! may only emit events carried by schema `E` and only be listened to for
//! events carried by schema `L`. Splitting the two lets a facade expose a
//! narrower (or different) listen surface than what it emits internally,
//! for instance a store that emits internal events and is bridged into a
//! public emitter.
//!
//! ```rust
//! use event_emitter::{define_event, event_schema, typed::TypedEmitter};
//!
//! #[derive(Debug)]
//! struct Saved(String);
//! define_event!(Saved => "saved");
//!
//! event_schema! {
//!     pub StoreEvents { Saved }
//! }
//!
//! let store: TypedEmitter<StoreEvents, StoreEvents> = TypedEmitter::new();
//! store.on(|saved: &Saved| assert_eq!(saved.0, "notes.md"));
//! store.emit(Saved("notes.md".into())).unwrap();
//! ```

use crate::config::EmitterConfig;
use crate::emitter::{EmitReport, EventEmitter, Subscription};
use crate::error::{EmitterError, HandlerError};
use crate::listener::{Handler, HandlerOutput, Priority, Propagation, DEFAULT_PRIORITY};
use serde::{Deserialize, Serialize};
use std::any::{type_name, Any};
use std::fmt;
use std::marker::PhantomData;
use std::sync::Arc;

/// Type-erased payload carried by typed emitters.
pub type DynPayload = Arc<dyn Any + Send + Sync>;

/// Untyped emitter underneath every [`TypedEmitter`].
pub type ErasedEmitter = EventEmitter<DynPayload, &'static str>;

/// An event payload with a static name.
pub trait Event: Any + Send + Sync {
    const NAME: &'static str;
}

/// Marks event `T` as part of a schema.
pub trait Carries<T: Event> {}

/// Payload for "value changed" notifications.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChangeEvent<T> {
    pub old_value: T,
    pub value: T,
}

impl<T: PartialEq> ChangeEvent<T> {
    pub fn new(old_value: T, value: T) -> Self {
        Self { old_value, value }
    }

    /// Returns `true` if the value actually differs.
    pub fn is_change(&self) -> bool {
        self.old_value != self.value
    }
}

/// Emitter whose emits are checked against schema `E` and whose listeners
/// are checked against schema `L`.
pub struct TypedEmitter<E, L = E> {
    inner: ErasedEmitter,
    _schemas: PhantomData<fn() -> (E, L)>,
}

impl<E, L> Clone for TypedEmitter<E, L> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
            _schemas: PhantomData,
        }
    }
}

impl<E, L> fmt::Debug for TypedEmitter<E, L> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TypedEmitter")
            .field("emits", &type_name::<E>())
            .field("listens", &type_name::<L>())
            .field("inner", &self.inner)
            .finish()
    }
}

impl<E, L> Default for TypedEmitter<E, L> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E, L> TypedEmitter<E, L> {
    pub fn new() -> Self {
        Self::with_config(EmitterConfig::default())
    }

    pub fn with_config(config: EmitterConfig) -> Self {
        Self::from_erased(EventEmitter::with_config(config))
    }

    /// Wraps an existing untyped emitter. Every facade over the same erased
    /// emitter shares its listeners.
    pub fn from_erased(inner: ErasedEmitter) -> Self {
        Self {
            inner,
            _schemas: PhantomData,
        }
    }

    /// The untyped emitter underneath.
    pub fn erased(&self) -> &ErasedEmitter {
        &self.inner
    }

    /// Builds a shareable handler for event `T`, for use with
    /// [`on_handler`](Self::on_handler) and [`off`](Self::off).
    pub fn handler<T, F, R>(handler: F) -> Handler<DynPayload>
    where
        T: Event,
        F: Fn(&T) -> R + Send + Sync + 'static,
        R: HandlerOutput,
    {
        Handler::new(move |payload: &DynPayload| -> Result<Propagation, HandlerError> {
            match (**payload).downcast_ref::<T>() {
                Some(event) => handler(event).into_outcome(),
                None => Err(EmitterError::PayloadType {
                    event: T::NAME,
                    expected: type_name::<T>(),
                }
                .into()),
            }
        })
    }

    /// Emits `event` under `T::NAME`.
    pub fn emit<T>(&self, event: T) -> Result<EmitReport, EmitterError>
    where
        T: Event,
        E: Carries<T>,
    {
        let payload: DynPayload = Arc::new(event);
        self.inner.emit(T::NAME, &payload)
    }

    pub fn on<T, F, R>(&self, handler: F) -> Subscription<DynPayload, &'static str>
    where
        T: Event,
        L: Carries<T>,
        F: Fn(&T) -> R + Send + Sync + 'static,
        R: HandlerOutput,
    {
        self.on_with_priority(DEFAULT_PRIORITY, handler)
    }

    pub fn on_with_priority<T, F, R>(
        &self,
        priority: Priority,
        handler: F,
    ) -> Subscription<DynPayload, &'static str>
    where
        T: Event,
        L: Carries<T>,
        F: Fn(&T) -> R + Send + Sync + 'static,
        R: HandlerOutput,
    {
        self.inner
            .on_handler(T::NAME, priority, &Self::handler::<T, F, R>(handler))
    }

    pub fn once<T, F, R>(&self, handler: F) -> Subscription<DynPayload, &'static str>
    where
        T: Event,
        L: Carries<T>,
        F: Fn(&T) -> R + Send + Sync + 'static,
        R: HandlerOutput,
    {
        self.once_with_priority(DEFAULT_PRIORITY, handler)
    }

    pub fn once_with_priority<T, F, R>(
        &self,
        priority: Priority,
        handler: F,
    ) -> Subscription<DynPayload, &'static str>
    where
        T: Event,
        L: Carries<T>,
        F: Fn(&T) -> R + Send + Sync + 'static,
        R: HandlerOutput,
    {
        self.inner
            .once_handler(T::NAME, priority, &Self::handler::<T, F, R>(handler))
    }

    /// Registers a handler built with [`TypedEmitter::handler`].
    pub fn on_handler<T>(
        &self,
        priority: Priority,
        handler: &Handler<DynPayload>,
    ) -> Subscription<DynPayload, &'static str>
    where
        T: Event,
        L: Carries<T>,
    {
        self.inner.on_handler(T::NAME, priority, handler)
    }

    /// Removes every record of `handler` for `T` at `priority`.
    pub fn off<T>(&self, priority: Priority, handler: &Handler<DynPayload>) -> usize
    where
        T: Event,
        L: Carries<T>,
    {
        self.inner.off_with_priority(T::NAME, priority, handler)
    }

    pub fn listener_count<T>(&self) -> usize
    where
        T: Event,
        L: Carries<T>,
    {
        self.inner.listener_count(T::NAME)
    }

    /// Forwards every unstopped emit to `other`, whatever its schemas.
    pub fn bridge_emit<E2, L2>(&self, other: &TypedEmitter<E2, L2>) {
        self.inner.bridge_emit(&other.inner);
    }
}
