//! Report generation
//!
//! TXT reports mirror the layout field engineers already read: a summary
//! block (iteration count, duration statistics, one detail line per
//! iteration) followed by each iteration's original log text. JSON export is
//! a plain serialization of the result records.

use anyhow::{Context, Result};
use chrono::Local;
use epd_log_decoder::IterationResult;
use std::fmt::Write as _;
use std::fs;
use std::path::Path;

const SEPARATOR: &str =
    "================================================================================";
const ITERATION_SEPARATOR: &str = "----------------------------------------";

/// Render the TXT report for one result set.
///
/// `title` is the optional test-case title shown under the header.
pub fn render_txt_report(results: &[IterationResult], title: &str) -> String {
    let mut out = String::new();

    writeln!(out, "EPD LOG READER - EXPORTED LOGS").unwrap();
    if !title.is_empty() {
        writeln!(out, "Test case: {title}").unwrap();
    }
    writeln!(
        out,
        "Generated on: {}",
        Local::now().format("%Y-%m-%d %H:%M:%S")
    )
    .unwrap();
    writeln!(out, "{SEPARATOR}\n").unwrap();

    if !results.is_empty() {
        writeln!(out, "SUMMARY").unwrap();
        writeln!(out, "{ITERATION_SEPARATOR}").unwrap();
        writeln!(out, "Total Iterations: {}", results.len()).unwrap();

        let durations: Vec<f64> = results.iter().map(|r| r.duration_secs).collect();
        let average = durations.iter().sum::<f64>() / durations.len() as f64;
        let min = durations.iter().copied().fold(f64::INFINITY, f64::min);
        let max = durations.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        writeln!(out, "Average Duration: {average:.3}").unwrap();
        writeln!(out, "Min Duration: {min:.3}").unwrap();
        writeln!(out, "Max Duration: {max:.3}").unwrap();

        writeln!(out, "\nIteration Details:").unwrap();
        for result in results {
            writeln!(
                out,
                "  ITERATION_{}: Start={}, Stop={}, Duration={:.3}, Waveform={}, Height={}, Marker={}",
                result.iteration,
                result.start,
                result.stop,
                result.duration_secs,
                result.max_height_waveform,
                result.max_height,
                result.marker,
            )
            .unwrap();
        }
        writeln!(out, "\n{SEPARATOR}\n").unwrap();
    }

    for (idx, result) in results.iter().enumerate() {
        writeln!(out, "ITERATION_{}", result.iteration).unwrap();
        writeln!(out, "{ITERATION_SEPARATOR}").unwrap();
        if result.original_log.is_empty() {
            writeln!(out, "No original log content available for this iteration.").unwrap();
        } else {
            writeln!(out, "{}", result.original_log).unwrap();
        }
        if idx < results.len() - 1 {
            writeln!(out, "\n{SEPARATOR}\n").unwrap();
        }
    }

    writeln!(out, "\n{SEPARATOR}").unwrap();
    writeln!(out, "END OF LOG EXPORT").unwrap();
    out
}

/// Write the TXT report to a file
pub fn export_txt(results: &[IterationResult], title: &str, path: &Path) -> Result<()> {
    fs::write(path, render_txt_report(results, title))
        .with_context(|| format!("Failed to write TXT report: {path:?}"))?;
    log::info!("TXT report written to {path:?}");
    Ok(())
}

/// Write the raw result records as pretty-printed JSON
pub fn export_json(results: &[IterationResult], path: &Path) -> Result<()> {
    let json = serde_json::to_string_pretty(results).context("Failed to serialize results")?;
    fs::write(path, json).with_context(|| format!("Failed to write JSON export: {path:?}"))?;
    log::info!("JSON export written to {path:?}");
    Ok(())
}

/// One console line per iteration, for interactive runs
pub fn print_results(results: &[IterationResult]) {
    for result in results {
        println!(
            "  ITERATION_{:02}: {:.3}s  marker={}  height={}  waveform={}",
            result.iteration,
            result.duration_secs,
            result.marker,
            result.max_height,
            result.max_height_waveform,
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use epd_log_decoder::Decoder;

    fn sample_results() -> Vec<IterationResult> {
        let log = "\
ITERATION_01
button 1 up 12345.100
mxc_epdc_fb: [1]
Sending update. height=800, waveform=DU
update end marker=1 end time=12345900
ITERATION_02
button 1 up 12346.100
mxc_epdc_fb: [2]
Sending update. height=1200, waveform=DU
update end marker=2 end time=12346700
";
        Decoder::new().decode_text(log)
    }

    #[test]
    fn test_txt_report_summary() {
        let results = sample_results();
        let report = render_txt_report(&results, "page turn");

        assert!(report.starts_with("EPD LOG READER - EXPORTED LOGS"));
        assert!(report.contains("Test case: page turn"));
        assert!(report.contains("Total Iterations: 2"));
        assert!(report.contains("Min Duration: 0.600"));
        assert!(report.contains("Max Duration: 0.800"));
        assert!(report.contains("Average Duration: 0.700"));
        assert!(report.contains(
            "ITERATION_1: Start=345100, Stop=345900, Duration=0.800, Waveform=unknown, Height=800, Marker=1"
        ));
        assert!(report.ends_with("END OF LOG EXPORT\n"));
    }

    #[test]
    fn test_txt_report_carries_original_log() {
        let results = sample_results();
        let report = render_txt_report(&results, "");

        assert!(report.contains("button 1 up 12345.100"));
        assert!(!report.contains("Test case:"));
    }

    #[test]
    fn test_empty_results_report() {
        let report = render_txt_report(&[], "");
        assert!(!report.contains("SUMMARY"));
        assert!(report.contains("END OF LOG EXPORT"));
    }

    #[test]
    fn test_export_files() {
        let results = sample_results();
        let dir = tempfile::tempdir().unwrap();

        let txt_path = dir.path().join("report.txt");
        export_txt(&results, "", &txt_path).unwrap();
        assert!(fs::read_to_string(&txt_path)
            .unwrap()
            .contains("Total Iterations: 2"));

        let json_path = dir.path().join("results.json");
        export_json(&results, &json_path).unwrap();
        let restored: Vec<IterationResult> =
            serde_json::from_str(&fs::read_to_string(&json_path).unwrap()).unwrap();
        assert_eq!(restored, results);
    }
}
