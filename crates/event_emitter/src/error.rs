//! Error types for the event emitter

/// Boxed error produced by a failing listener.
pub type HandlerError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Errors surfaced by emitter operations.
#[derive(Debug, thiserror::Error)]
pub enum EmitterError {
    /// A listener returned an error while handling an event
    #[error("Listener for event '{event}' failed: {source}")]
    Handler {
        event: String,
        #[source]
        source: HandlerError,
    },

    /// Bridged forwarding went deeper than the configured limit
    #[error("Bridge depth {depth} exceeds limit {limit} while forwarding '{event}'")]
    BridgeDepthExceeded {
        event: String,
        depth: usize,
        limit: usize,
    },

    /// A typed listener received a payload of another type
    #[error("Payload for event '{event}' is not a {expected}")]
    PayloadType {
        event: &'static str,
        expected: &'static str,
    },

    /// Emitter configuration could not be parsed
    #[error("Invalid emitter configuration: {0}")]
    Config(#[from] toml::de::Error),
}

impl EmitterError {
    /// Wraps a listener failure for the given event.
    pub fn handler(event: impl std::fmt::Display, source: HandlerError) -> Self {
        EmitterError::Handler {
            event: event.to_string(),
            source,
        }
    }

    /// Returns `true` if this error came out of a listener.
    pub fn is_handler_failure(&self) -> bool {
        matches!(self, EmitterError::Handler { .. })
    }
}
