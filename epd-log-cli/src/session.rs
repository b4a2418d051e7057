//! In-memory result session
//!
//! Holds everything accumulated during one run of the tool: single-run
//! results, batch results keyed by source filename, and the mode they were
//! produced under. The decoder itself is pure; this is the one place state
//! lives, owned by the application and passed by reference where needed.
//! Cleared explicitly or dropped at process exit - nothing is persisted
//! unless the user asks for a snapshot.

use anyhow::{Context, Result};
use epd_log_decoder::{IterationResult, Mode};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Session {
    /// Results of a single-entry run, in document order
    #[serde(default)]
    pub results: Vec<IterationResult>,

    /// Batch-run results keyed by source filename, in processing order
    #[serde(default)]
    pub batch_results: IndexMap<String, Vec<IterationResult>>,

    /// Mode the session's results were decoded under
    #[serde(default)]
    pub mode: Mode,

    /// Optional title shown in report headers
    #[serde(default)]
    pub test_case_title: String,
}

impl Session {
    pub fn new(mode: Mode) -> Self {
        Self {
            mode,
            ..Self::default()
        }
    }

    /// Record a single-entry run
    pub fn set_results(&mut self, results: Vec<IterationResult>) {
        self.results = results;
    }

    /// Record one batch file's results
    pub fn add_batch_file(&mut self, filename: impl Into<String>, results: Vec<IterationResult>) {
        self.batch_results.insert(filename.into(), results);
    }

    /// Every result in the session, batch files flattened in order
    pub fn all_results(&self) -> impl Iterator<Item = &IterationResult> {
        self.results
            .iter()
            .chain(self.batch_results.values().flatten())
    }

    pub fn is_empty(&self) -> bool {
        self.results.is_empty() && self.batch_results.values().all(|r| r.is_empty())
    }

    /// Drop all accumulated results
    pub fn clear_all(&mut self) {
        self.results.clear();
        self.batch_results.clear();
    }

    /// Write a JSON snapshot of the session
    pub fn save(&self, path: &Path) -> Result<()> {
        let json =
            serde_json::to_string_pretty(self).context("Failed to serialize session")?;
        fs::write(path, json).with_context(|| format!("Failed to write session file: {path:?}"))?;
        log::info!("Session snapshot written to {path:?}");
        Ok(())
    }

    /// Restore a session from a JSON snapshot
    pub fn load(path: &Path) -> Result<Self> {
        let json = fs::read_to_string(path)
            .with_context(|| format!("Failed to read session file: {path:?}"))?;
        serde_json::from_str(&json).context("Failed to parse session file")
    }
}
