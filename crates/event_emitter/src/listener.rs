//! Listener callbacks and the records the registry keeps for them.

use crate::error::HandlerError;
use std::fmt;
use std::sync::Arc;

/// Dispatch priority. Higher values run first.
pub type Priority = i32;

/// Priority used when none is given.
pub const DEFAULT_PRIORITY: Priority = 0;

/// What a listener asks the dispatcher to do after it ran.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum Propagation {
    /// Keep invoking the remaining listeners
    #[default]
    Continue,
    /// Halt this emit: no further listeners, no bridge forwarding
    Stop,
}

impl Propagation {
    pub fn is_stop(self) -> bool {
        self == Propagation::Stop
    }
}

/// Values a listener callback may return.
///
/// Implemented for `()`, [`Propagation`] and `Result`s of either, so plain
/// closures, stopping closures and fallible closures can all be registered.
pub trait HandlerOutput {
    fn into_outcome(self) -> Result<Propagation, HandlerError>;
}

impl HandlerOutput for () {
    fn into_outcome(self) -> Result<Propagation, HandlerError> {
        Ok(Propagation::Continue)
    }
}

impl HandlerOutput for Propagation {
    fn into_outcome(self) -> Result<Propagation, HandlerError> {
        Ok(self)
    }
}

impl<T, E> HandlerOutput for Result<T, E>
where
    T: HandlerOutput,
    E: Into<HandlerError>,
{
    fn into_outcome(self) -> Result<Propagation, HandlerError> {
        self.map_err(Into::into)?.into_outcome()
    }
}

type Callback<P> = dyn Fn(&P) -> Result<Propagation, HandlerError> + Send + Sync;

/// A shareable listener callback with reference identity.
///
/// Cloning a `Handler` yields the same identity, which is what
/// [`EventEmitter::off`](crate::EventEmitter::off) matches on.
pub struct Handler<P> {
    callback: Arc<Callback<P>>,
}

impl<P: 'static> Handler<P> {
    /// Wraps a callback.
    pub fn new<F, R>(callback: F) -> Self
    where
        F: Fn(&P) -> R + Send + Sync + 'static,
        R: HandlerOutput,
    {
        let callback: Arc<Callback<P>> =
            Arc::new(move |payload: &P| callback(payload).into_outcome());
        Self { callback }
    }
}

impl<P> Handler<P> {
    /// Runs the callback.
    #[inline]
    pub fn call(&self, payload: &P) -> Result<Propagation, HandlerError> {
        (self.callback)(payload)
    }

    /// Returns `true` if both handles point at the same callback.
    pub fn same_as(&self, other: &Handler<P>) -> bool {
        std::ptr::addr_eq(Arc::as_ptr(&self.callback), Arc::as_ptr(&other.callback))
    }
}

impl<P> Clone for Handler<P> {
    fn clone(&self) -> Self {
        Self {
            callback: Arc::clone(&self.callback),
        }
    }
}

impl<P> fmt::Debug for Handler<P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Handler")
            .field(&Arc::as_ptr(&self.callback).cast::<()>())
            .finish()
    }
}

/// Identity of one registered record, unique within its emitter.
///
/// Ids grow monotonically, so a bucket (where records are prepended) is
/// always ordered by descending id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ListenerId(pub(crate) u64);

impl fmt::Display for ListenerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// One listener in a priority bucket.
#[derive(Debug)]
pub(crate) struct ListenerRecord<P> {
    pub(crate) id: ListenerId,
    pub(crate) handler: Handler<P>,
    pub(crate) once: bool,
    /// Set when a once record has been claimed by a dispatch pass
    pub(crate) fired: bool,
}

impl<P> ListenerRecord<P> {
    pub(crate) fn new(id: ListenerId, handler: Handler<P>, once: bool) -> Self {
        Self {
            id,
            handler,
            once,
            fired: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unit_and_propagation_outputs() {
        assert_eq!(().into_outcome().unwrap(), Propagation::Continue);
        assert_eq!(Propagation::Stop.into_outcome().unwrap(), Propagation::Stop);
    }

    #[test]
    fn result_outputs() {
        let ok: Result<Propagation, String> = Ok(Propagation::Stop);
        assert_eq!(ok.into_outcome().unwrap(), Propagation::Stop);

        let failed: Result<(), String> = Err("nope".to_string());
        assert_eq!(failed.into_outcome().unwrap_err().to_string(), "nope");
    }

    #[test]
    fn clones_share_identity() {
        let a: Handler<u32> = Handler::new(|_| ());
        let b: Handler<u32> = Handler::new(|_| ());
        let a2 = a.clone();

        assert!(a.same_as(&a2));
        assert!(!a.same_as(&b));
    }

    #[test]
    fn call_forwards_payload() {
        let handler = Handler::new(|n: &u32| {
            if *n > 10 {
                Propagation::Stop
            } else {
                Propagation::Continue
            }
        });

        assert_eq!(handler.call(&3).unwrap(), Propagation::Continue);
        assert_eq!(handler.call(&42).unwrap(), Propagation::Stop);
    }
}
