//! Event correlation engine
//!
//! Turns one iteration's line sequence into a single measurement record.
//! The scan is a single left-to-right pass collecting the start timestamp,
//! per-marker heights, and per-marker end times; a reconciliation step then
//! selects the relevant update and computes the wraparound-safe duration.
//!
//! The engine is pure and never fails hard: every extraction miss degrades to
//! "absent", and an iteration missing any of the three required ingredients
//! (start, heights, end times) yields no result at all.

use crate::parsers;
use crate::types::{
    EndTimeRecord, HeightRecord, HeightSummary, IterationResult, Mode, TIMESTAMP_RING,
};
use indexmap::IndexMap;

/// Process one iteration's lines into a measurement record.
///
/// Returns `None` when the iteration is incomplete: no start event, no
/// height record, or no end-time record. Blank lines are skipped.
pub fn process_iteration<'a, I>(lines: I, iteration_id: &str, mode: Mode) -> Option<IterationResult>
where
    I: IntoIterator<Item = &'a str>,
{
    let mut start_time: Option<u32> = None;
    let mut start_line = String::new();
    let mut current_marker: Option<String> = None;
    let mut heights_by_marker: IndexMap<String, HeightRecord> = IndexMap::new();
    let mut end_times_by_marker: IndexMap<String, EndTimeRecord> = IndexMap::new();

    for line in lines {
        if line.trim().is_empty() {
            continue;
        }

        // First start event wins; later candidates are ignored.
        if start_time.is_none() {
            if let Some(timestamp) = parsers::extract_start_timestamp(mode, line) {
                start_time = Some(timestamp);
                start_line = line.trim().to_string();
            }
        }

        // A marker stays active until the next marker line supersedes it.
        if let Some(marker) = parsers::extract_marker(line) {
            current_marker = Some(marker);
        }

        if line.contains("Sending update") {
            if let Some(marker) = &current_marker {
                if let Some((height, waveform)) = parsers::extract_height_and_waveform(line) {
                    heights_by_marker.insert(
                        marker.clone(),
                        HeightRecord {
                            height,
                            waveform,
                            source_line: line.trim().to_string(),
                        },
                    );
                }
            }
        }

        if line.contains("update end marker=") && line.contains("end time=") {
            if let (Some(end_marker), Some(end_time)) = (
                parsers::extract_end_marker(line),
                parsers::extract_end_timestamp(line),
            ) {
                end_times_by_marker.insert(
                    end_marker,
                    EndTimeRecord {
                        time: end_time,
                        source_line: line.trim().to_string(),
                    },
                );
            }
        }
    }

    let start_time = start_time?;
    if heights_by_marker.is_empty() || end_times_by_marker.is_empty() {
        log::debug!(
            "iteration {iteration_id}: incomplete (heights={}, end_times={})",
            heights_by_marker.len(),
            end_times_by_marker.len()
        );
        return None;
    }

    // Prefer updates whose waveform was actually resolved; if every record is
    // "unknown", fall back to the full set rather than dropping the iteration.
    let valid_heights: IndexMap<String, HeightRecord> = {
        let known: IndexMap<String, HeightRecord> = heights_by_marker
            .iter()
            .filter(|(_, record)| !record.waveform.eq_ignore_ascii_case(parsers::UNKNOWN_WAVEFORM))
            .map(|(marker, record)| (marker.clone(), record.clone()))
            .collect();
        if known.is_empty() {
            heights_by_marker.clone()
        } else {
            known
        }
    };

    let chosen_marker = select_max_height_marker(&valid_heights)?;
    let chosen_record = valid_heights.get(&chosen_marker)?;

    // The chosen marker normally has its own end event. When it does not
    // (logs do lose lines), recover with the latest end time seen anywhere in
    // the iteration instead of failing.
    let (stop_time, stop_line) = match end_times_by_marker.get(&chosen_marker) {
        Some(record) => (record.time, record.source_line.clone()),
        None => {
            log::debug!(
                "iteration {iteration_id}: no end time for marker {chosen_marker}, using max end time"
            );
            let record = end_times_by_marker
                .values()
                .max_by_key(|record| record.time)?;
            (record.time, record.source_line.clone())
        }
    };

    let duration_secs = ring_duration_millis(start_time, stop_time) / 1000.0;

    Some(IterationResult {
        iteration: iteration_id.parse().unwrap_or(0),
        start: start_time,
        stop: stop_time,
        marker: chosen_marker.clone(),
        duration_secs,
        max_height: chosen_record.height,
        max_height_waveform: chosen_record.waveform.clone(),
        start_line,
        stop_line,
        height_line: chosen_record.source_line.clone(),
        all_heights: heights_by_marker
            .iter()
            .map(|(marker, record)| HeightSummary {
                marker: marker.clone(),
                height: record.height,
                waveform: record.waveform.clone(),
            })
            .collect(),
        mode,
        all_end_times: end_times_by_marker,
        original_log: String::new(),
    })
}

/// Pick the marker with the maximum height; ties go to the numerically
/// largest marker id, with non-numeric ids comparing as 0.
fn select_max_height_marker(heights: &IndexMap<String, HeightRecord>) -> Option<String> {
    let max_height = heights.values().map(|record| record.height).max()?;
    let mut candidates: Vec<&String> = heights
        .iter()
        .filter(|(_, record)| record.height == max_height)
        .map(|(marker, _)| marker)
        .collect();
    // Stable sort: equal keys (non-numeric ids all parse as 0) keep their
    // encounter order, so the later one wins the tie.
    candidates.sort_by_key(|marker| marker.parse::<u64>().unwrap_or(0));
    candidates
        .last()
        .copied()
        .or_else(|| heights.keys().next())
        .cloned()
}

/// Elapsed milliseconds between two points on the 6-digit ring, correcting
/// for one wraparound when the end value is numerically behind the start.
fn ring_duration_millis(start: u32, stop: u32) -> f64 {
    let mut duration = stop as i64 - start as i64;
    if duration < 0 {
        duration += TIMESTAMP_RING;
    }
    duration as f64
}
