//! Core types for the EPD log decoder library
//!
//! This module defines the fundamental types the decoder emits when processing
//! refresh log files. The decoder is stateless and only outputs measurement
//! records - it does not accumulate session state or format reports.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Result type for decoder operations
pub type Result<T> = std::result::Result<T, DecoderError>;

/// Upper bound (exclusive) of the 6-digit timestamp ring.
///
/// Both start and end timestamps are projected into `[0, 999999]`; duration
/// arithmetic wraps at this boundary.
pub const TIMESTAMP_RING: i64 = 1_000_000;

/// Errors that can occur during decoding
///
/// Pattern-match misses are not errors - they surface as absent values and,
/// at worst, an iteration that yields no result. Only the file boundary can
/// actually fail.
#[derive(Debug, thiserror::Error)]
pub enum DecoderError {
    #[error("Failed to read log file: {0}")]
    IoError(#[from] std::io::Error),
}

/// Start-event parsing strategy, selected per run.
///
/// Each mode recognizes a different trigger line in the log; everything else
/// (markers, heights, end times) is mode-independent. Unrecognized mode
/// strings fall back to `Default`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    /// "button 1 up" trigger
    #[default]
    Default,
    /// "Sending button 1 down" trigger
    Swipe,
    /// Power-button-press trigger
    Suspend,
}

impl Mode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Mode::Default => "default",
            Mode::Swipe => "swipe",
            Mode::Suspend => "suspend",
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Mode {
    type Err = std::convert::Infallible;

    /// Unknown mode names map to `Default` rather than failing.
    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Ok(match s {
            "swipe" => Mode::Swipe,
            "suspend" => Mode::Suspend,
            _ => Mode::Default,
        })
    }
}

/// One iteration's raw text segment, as produced by the splitter
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawIteration {
    /// Captured digits of the `ITERATION_<n>` delimiter ("01" when synthesized)
    pub id: String,
    /// Everything between this delimiter and the next one
    pub text: String,
}

/// A "Sending update" observation recorded under the marker active at that line
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HeightRecord {
    /// Update height in pixels
    pub height: u32,
    /// Waveform name, or the literal "unknown" when absent from the line
    pub waveform: String,
    /// The trimmed log line this record came from
    pub source_line: String,
}

/// An "update end" observation for one marker
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EndTimeRecord {
    /// End timestamp projected into the 6-digit ring
    pub time: u32,
    /// The trimmed log line this record came from
    pub source_line: String,
}

/// One entry of [`IterationResult::all_heights`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HeightSummary {
    pub marker: String,
    pub height: u32,
    pub waveform: String,
}

/// The measurement extracted from one iteration - the primary output of the
/// decoder, consumed by reports and exporters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IterationResult {
    /// Iteration number parsed from the delimiter id
    pub iteration: u32,
    /// Start timestamp in the 6-digit ring
    pub start: u32,
    /// End timestamp of the selected update, same ring
    pub stop: u32,
    /// Marker id of the selected update
    pub marker: String,
    /// Elapsed time in seconds, rollover-corrected
    pub duration_secs: f64,
    /// Height of the selected update
    pub max_height: u32,
    /// Waveform name of the selected update
    pub max_height_waveform: String,
    /// Log line the start timestamp was taken from
    pub start_line: String,
    /// Log line the end timestamp was taken from
    pub stop_line: String,
    /// Log line the selected height was taken from
    pub height_line: String,
    /// Every height observed in this iteration, unfiltered, in the order the
    /// markers were first seen
    pub all_heights: Vec<HeightSummary>,
    /// Mode the iteration was processed under
    pub mode: Mode,
    /// Every end time observed in this iteration, keyed by marker
    pub all_end_times: IndexMap<String, EndTimeRecord>,
    /// Trimmed raw text of the iteration, kept for report export
    #[serde(default)]
    pub original_log: String,
}

impl IterationResult {
    /// Duration in milliseconds (the native resolution of the ring)
    pub fn duration_millis(&self) -> f64 {
        self.duration_secs * 1000.0
    }
}
