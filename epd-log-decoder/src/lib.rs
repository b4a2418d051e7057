//! EPD Log Decoder Library
//!
//! A stateless, reusable library for extracting display-refresh timing
//! measurements from e-paper device logs (button/power trigger events paired
//! with framebuffer update-end events).
//!
//! # Architecture
//!
//! This library is intentionally minimal and focused on extraction:
//! - Splits a raw log blob into labeled `ITERATION_<n>` segments
//! - Parses mode-specific start events and the shared marker/height/end-time
//!   events out of each segment
//! - Correlates them into one measurement record per iteration, selecting
//!   the max-height update and computing a wraparound-safe duration
//!
//! The library does NOT:
//! - Accumulate results across runs (no session state)
//! - Format reports or export files
//! - Provide any UI
//!
//! All higher-level functionality is in the application layer (epd-log-cli).
//!
//! # Example Usage
//!
//! ```no_run
//! use epd_log_decoder::{Decoder, DecoderConfig, Mode};
//! use std::path::Path;
//!
//! let config = DecoderConfig::new().with_mode(Mode::Swipe);
//! let decoder = Decoder::with_config(config);
//!
//! let results = decoder.decode_file(Path::new("refresh.log")).unwrap();
//! for result in results {
//!     println!(
//!         "iteration {}: {:.3}s marker={} height={} ({})",
//!         result.iteration,
//!         result.duration_secs,
//!         result.marker,
//!         result.max_height,
//!         result.max_height_waveform,
//!     );
//! }
//! ```

// Public modules
pub mod config;
pub mod correlator;
pub mod decoder;
pub mod splitter;
pub mod types;

// Re-export main types for convenience
pub use config::DecoderConfig;
pub use correlator::process_iteration;
pub use decoder::{DecodeStats, Decoder};
pub use splitter::split_iterations;
pub use types::{
    DecoderError, EndTimeRecord, HeightRecord, HeightSummary, IterationResult, Mode,
    RawIteration, Result,
};

// Internal modules (not exposed in public API)
mod parsers;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
