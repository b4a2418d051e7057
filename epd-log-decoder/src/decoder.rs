//! Main decoder API
//!
//! This module provides the primary interface for the decoder library:
//! split a log blob into iterations, run the correlation engine on each, and
//! collect the measurements that could be extracted.

use crate::config::DecoderConfig;
use crate::correlator;
use crate::splitter;
use crate::types::{IterationResult, Result};
use std::fs;
use std::path::Path;

/// Summary of one decoding run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodeStats {
    /// Iterations found by the splitter
    pub total_iterations: usize,
    /// Iterations that produced a measurement
    pub extracted: usize,
}

/// The main decoder struct - entry point for all decoding operations
#[derive(Debug, Clone, Default)]
pub struct Decoder {
    config: DecoderConfig,
}

impl Decoder {
    /// Create a decoder with default configuration
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a decoder with the given configuration
    pub fn with_config(config: DecoderConfig) -> Self {
        Self { config }
    }

    /// The active configuration
    pub fn config(&self) -> &DecoderConfig {
        &self.config
    }

    /// Decode a log blob into measurement records.
    ///
    /// Iterations that are incomplete (no start event, no heights, or no end
    /// times) are omitted from the output; document order is preserved for
    /// the rest.
    ///
    /// # Example
    /// ```
    /// use epd_log_decoder::{Decoder, DecoderConfig, Mode};
    ///
    /// let log = "ITERATION_01\n\
    ///            button 1 up 12345.678\n\
    ///            mxc_epdc_fb: [1]\n\
    ///            Sending update. height=800, waveform=DU\n\
    ///            update end marker=1 end time=12346000\n";
    /// let decoder = Decoder::with_config(DecoderConfig::new().with_mode(Mode::Default));
    /// let results = decoder.decode_text(log);
    /// assert_eq!(results.len(), 1);
    /// assert_eq!(results[0].max_height, 800);
    /// ```
    pub fn decode_text(&self, text: &str) -> Vec<IterationResult> {
        self.decode_text_with_stats(text).0
    }

    /// Like [`decode_text`](Self::decode_text), also reporting how many
    /// iterations were seen versus extracted.
    pub fn decode_text_with_stats(&self, text: &str) -> (Vec<IterationResult>, DecodeStats) {
        let iterations = splitter::split_iterations(text);
        let total_iterations = iterations.len();

        let mut results = Vec::new();
        for iteration in iterations {
            match correlator::process_iteration(iteration.text.lines(), &iteration.id, self.config.mode)
            {
                Some(mut result) => {
                    if self.config.keep_original_log {
                        result.original_log = iteration.text.trim().to_string();
                    }
                    results.push(result);
                }
                None => {
                    log::debug!("iteration {} yielded no measurement", iteration.id);
                }
            }
        }

        log::info!(
            "decoded {}/{} iterations (mode: {})",
            results.len(),
            total_iterations,
            self.config.mode
        );

        let extracted = results.len();
        (
            results,
            DecodeStats {
                total_iterations,
                extracted,
            },
        )
    }

    /// Read a log file and decode its contents.
    ///
    /// Invalid UTF-8 is replaced rather than rejected; device logs routinely
    /// carry stray bytes.
    pub fn decode_file(&self, path: &Path) -> Result<Vec<IterationResult>> {
        log::info!("Decoding log file: {:?}", path);
        let bytes = fs::read(path)?;
        let text = String::from_utf8_lossy(&bytes);
        Ok(self.decode_text(&text))
    }
}
