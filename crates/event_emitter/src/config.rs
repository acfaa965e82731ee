//! Emitter configuration.
//!
//! The defaults reproduce the plain emitter behaviour: failures propagate to
//! the caller of `emit` and bridge chains are not depth limited. Both can be
//! hardened per emitter, either in code or from a TOML snippet:
//!
//! ```toml
//! label = "store"
//! isolate_failures = true
//! max_bridge_depth = 8
//! ```

use crate::error::EmitterError;
use serde::{Deserialize, Serialize};

/// Per-emitter behaviour switches.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EmitterConfig {
    /// Human readable name used in log output
    pub label: Option<String>,
    /// Log and collect listener failures instead of aborting the emit call
    pub isolate_failures: bool,
    /// Maximum number of bridge hops a single emit may travel
    pub max_bridge_depth: Option<usize>,
}

impl EmitterConfig {
    /// Parses a configuration from TOML text. Missing keys take their defaults.
    pub fn from_toml_str(text: &str) -> Result<Self, EmitterError> {
        Ok(toml::from_str(text)?)
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    pub fn isolating_failures(mut self) -> Self {
        self.isolate_failures = true;
        self
    }

    pub fn with_max_bridge_depth(mut self, depth: usize) -> Self {
        self.max_bridge_depth = Some(depth);
        self
    }
}
