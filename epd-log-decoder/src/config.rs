//! Decoder configuration
//!
//! The decoder is intentionally simple - session state, batch orchestration
//! and report formatting are handled by the application layer.

use crate::types::Mode;
use serde::{Deserialize, Serialize};

/// Configuration for one decoding run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DecoderConfig {
    /// Start-event parsing strategy
    #[serde(default)]
    pub mode: Mode,

    /// Whether to attach each iteration's trimmed raw text to its result
    /// (report exporters want it; pure measurement pipelines can drop it)
    #[serde(default = "default_true")]
    pub keep_original_log: bool,
}

fn default_true() -> bool {
    true
}

impl Default for DecoderConfig {
    fn default() -> Self {
        Self {
            mode: Mode::Default,
            keep_original_log: true,
        }
    }
}

impl DecoderConfig {
    /// Create a new configuration with default settings
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder method: set the parsing mode
    pub fn with_mode(mut self, mode: Mode) -> Self {
        self.mode = mode;
        self
    }

    /// Builder method: enable or disable raw-log retention
    pub fn with_original_log(mut self, keep: bool) -> Self {
        self.keep_original_log = keep;
        self
    }
}
