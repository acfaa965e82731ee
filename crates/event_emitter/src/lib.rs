//! # Event Emitter
//!
//! A priority-ordered publish/subscribe event emitter for decoupling
//! in-process components such as UI widgets, state stores and modules.
//!
//! ## Key Features
//!
//! - **Priorities**: higher priority listeners run first; within one
//!   priority the most recently registered listener runs first
//! - **One-shot listeners**: removed after the first emit that invokes them
//! - **Stop propagation**: a listener can halt the rest of an emit, bridges included
//! - **Bridging**: forward every unstopped emit to downstream emitters
//! - **Re-entrancy**: listeners may subscribe, unsubscribe and emit while a
//!   dispatch is running; no lock is held across a listener call
//! - **Typed facade**: [`typed::TypedEmitter`] checks emitted and listened
//!   events against separate schemas
//!
//! ## Usage
//!
//! ```rust
//! use event_emitter::{EventEmitter, Handler, Propagation};
//! use std::sync::{Arc, Mutex};
//!
//! let emitter: EventEmitter<String> = EventEmitter::new();
//! let order = Arc::new(Mutex::new(Vec::new()));
//!
//! let log = order.clone();
//! emitter.on("test", move |_: &String| log.lock().unwrap().push("first registered"));
//! let log = order.clone();
//! emitter.on("test", move |_: &String| log.lock().unwrap().push("second registered"));
//!
//! emitter.emit("test", &"msg".to_string()).unwrap();
//! assert_eq!(*order.lock().unwrap(), vec!["second registered", "first registered"]);
//!
//! // Shared handlers can be removed with `off`
//! let stopper = Handler::new(|_: &String| Propagation::Stop);
//! emitter.on_handler("test", 5, &stopper);
//! assert!(emitter.emit("test", &"msg".to_string()).unwrap().stopped);
//! assert_eq!(emitter.off_with_priority("test", 5, &stopper), 1);
//! ```
//!
//! ## Dispatch Semantics
//!
//! Dispatch is synchronous and runs on the caller's thread. The registry is
//! read live, so a listener unsubscribed by an earlier listener in the same
//! emit does not run; listeners registered during an emit wait for the next
//! one. Bridge chains recurse on the caller's stack and are not cycle
//! checked unless [`EmitterConfig::max_bridge_depth`] is set.
//!
//! Listener failures abort the emit and are returned to the caller unless
//! [`EmitterConfig::isolate_failures`] is set.

pub mod config;
pub mod emitter;
pub mod error;
pub mod listener;
pub mod macros;
pub mod registry;
pub mod stats;
pub mod typed;

// Re-exports for convenience
pub use config::EmitterConfig;
pub use emitter::{EmitReport, EmitterId, EventEmitter, Subscription};
pub use error::{EmitterError, HandlerError};
pub use listener::{Handler, HandlerOutput, ListenerId, Priority, Propagation, DEFAULT_PRIORITY};
pub use registry::{EventKey, EventName};
pub use typed::{ChangeEvent, Event, TypedEmitter};

/// Result type used throughout the crate
pub type Result<T> = std::result::Result<T, EmitterError>;
