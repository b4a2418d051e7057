//! EPD Log Reader CLI Application
//!
//! Command-line front end for the epd-log-decoder library. It adds:
//! - Batch processing over many log files (in parallel)
//! - The in-memory result session (single run + per-file batch map)
//! - TXT report and JSON export
//! - TOML configuration for recurring test setups

use anyhow::{Context, Result};
use clap::Parser;
use epd_log_decoder::{Decoder, DecoderConfig, IterationResult, Mode};
use rayon::prelude::*;
use std::path::PathBuf;

mod config;
mod report;
mod session;

use session::Session;

/// EPD Log Reader - extract display refresh timings from device logs
#[derive(Parser, Debug)]
#[command(name = "epd-log")]
#[command(about = "Extract display refresh timings from e-paper device logs", long_about = None)]
#[command(version)]
struct Args {
    /// Log file(s) to process; more than one enables batch mode
    #[arg(value_name = "FILE")]
    logs: Vec<PathBuf>,

    /// Start-event parsing mode: default (button up), swipe (button down),
    /// suspend (power button). Unknown names fall back to default.
    #[arg(short, long, default_value = "default", value_parser = parse_mode)]
    mode: Mode,

    /// Write a TXT report to this file
    #[arg(short, long, value_name = "FILE")]
    output: Option<PathBuf>,

    /// Write raw result records as JSON to this file
    #[arg(long, value_name = "FILE")]
    json: Option<PathBuf>,

    /// Test-case title shown in report headers
    #[arg(short, long, default_value = "")]
    title: String,

    /// Save a JSON session snapshot to this file
    #[arg(long, value_name = "FILE")]
    save_session: Option<PathBuf>,

    /// Path to configuration file (config.toml) - alternative to flags
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Verbosity level (can be repeated: -v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long)]
    quiet: bool,
}

fn parse_mode(s: &str) -> std::result::Result<Mode, std::convert::Infallible> {
    s.parse()
}

fn main() -> Result<()> {
    let args = Args::parse();

    init_logging(args.verbose, args.quiet);

    log::info!("EPD Log Reader CLI v{}", env!("CARGO_PKG_VERSION"));
    log::info!("Using decoder library v{}", epd_log_decoder::VERSION);

    if !args.logs.is_empty() {
        let decode = DecoderConfig::new().with_mode(args.mode);
        run(
            &args.logs,
            decode,
            &args.title,
            args.output.as_deref(),
            args.json.as_deref(),
            args.save_session.as_deref(),
        )
    } else if let Some(config_path) = &args.config {
        let app_config = config::load_config(config_path)?;
        log::debug!("Configuration loaded from {config_path:?}");
        let decode = DecoderConfig::new()
            .with_mode(app_config.decode.mode)
            .with_original_log(app_config.decode.keep_original_log);
        run(
            &app_config.input.files,
            decode,
            &app_config.output.title,
            app_config.output.report.as_deref(),
            app_config.output.json.as_deref(),
            args.save_session.as_deref(),
        )
    } else {
        println!("EPD Log Reader - No input specified");
        println!("\nQuick Start:");
        println!("  epd-log refresh.log");
        println!("  epd-log --mode suspend run1.log run2.log --output report.txt");
        println!("\nFor recurring setups:");
        println!("  epd-log --config config.toml");
        println!("\nUse --help for more options");
        Ok(())
    }
}

/// Decode the given files, accumulate a session, and run the exports
fn run(
    files: &[PathBuf],
    decode: DecoderConfig,
    title: &str,
    report_path: Option<&std::path::Path>,
    json_path: Option<&std::path::Path>,
    session_path: Option<&std::path::Path>,
) -> Result<()> {
    let decoder = Decoder::with_config(decode);
    let mut session = Session::new(decoder.config().mode);
    session.test_case_title = title.to_string();

    if files.len() == 1 {
        let path = &files[0];
        let results = decoder
            .decode_file(path)
            .with_context(|| format!("Failed to process {path:?}"))?;
        println!("{path:?}: {} iteration(s) extracted", results.len());
        report::print_results(&results);
        session.set_results(results);
    } else {
        // Batch mode: files are independent, decode them in parallel. A
        // failing file is reported and skipped; siblings still complete.
        let outcomes: Vec<(String, epd_log_decoder::Result<Vec<IterationResult>>)> = files
            .par_iter()
            .map(|path| {
                let name = path
                    .file_name()
                    .map(|n| n.to_string_lossy().into_owned())
                    .unwrap_or_else(|| path.display().to_string());
                (name, decoder.decode_file(path))
            })
            .collect();

        let mut failed = 0usize;
        for (name, outcome) in outcomes {
            match outcome {
                Ok(results) => {
                    println!("{name}: {} iteration(s) extracted", results.len());
                    report::print_results(&results);
                    session.add_batch_file(name, results);
                }
                Err(e) => {
                    failed += 1;
                    log::error!("{name}: {e}");
                    eprintln!("{name}: FAILED ({e})");
                }
            }
        }
        if failed > 0 {
            eprintln!("{failed} of {} file(s) failed", files.len());
        }
    }

    let combined: Vec<IterationResult> = session.all_results().cloned().collect();
    println!("\nTotal: {} iteration(s)", combined.len());

    if let Some(path) = report_path {
        report::export_txt(&combined, title, path)?;
        println!("TXT report written to {path:?}");
    }
    if let Some(path) = json_path {
        report::export_json(&combined, path)?;
        println!("JSON export written to {path:?}");
    }
    if let Some(path) = session_path {
        session.save(path)?;
        println!("Session snapshot written to {path:?}");
    }

    Ok(())
}

/// Initialize logging based on verbosity level
fn init_logging(verbose: u8, quiet: bool) {
    use env_logger::Builder;
    use log::LevelFilter;
    use std::io::Write;

    let level = if quiet {
        LevelFilter::Error
    } else {
        match verbose {
            0 => LevelFilter::Info,
            1 => LevelFilter::Debug,
            _ => LevelFilter::Trace,
        }
    };

    Builder::new()
        .filter_level(level)
        .format(|buf, record| {
            writeln!(
                buf,
                "[{} {}] {}",
                record.level(),
                record.target(),
                record.args()
            )
        })
        .init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mode_arg_parsing() {
        let args = Args::parse_from(["epd-log", "--mode", "swipe", "a.log"]);
        assert_eq!(args.mode, Mode::Swipe);
        assert_eq!(args.logs.len(), 1);
    }

    #[test]
    fn test_unknown_mode_falls_back_to_default() {
        let args = Args::parse_from(["epd-log", "--mode", "bogus", "a.log"]);
        assert_eq!(args.mode, Mode::Default);
    }

    #[test]
    fn test_batch_run_survives_a_missing_file() {
        use std::io::Write as _;

        let dir = tempfile::tempdir().unwrap();
        let good = dir.path().join("good.log");
        let mut f = std::fs::File::create(&good).unwrap();
        writeln!(f, "button 1 up 12345.100").unwrap();
        writeln!(f, "mxc_epdc_fb: [1]").unwrap();
        writeln!(f, "Sending update. height=800, waveform=DU").unwrap();
        writeln!(f, "update end marker=1 end time=12345900").unwrap();

        let missing = dir.path().join("missing.log");
        let snapshot = dir.path().join("session.json");

        run(
            &[good, missing],
            DecoderConfig::new(),
            "",
            None,
            None,
            Some(&snapshot),
        )
        .unwrap();

        let session = Session::load(&snapshot).unwrap();
        assert_eq!(session.batch_results.len(), 1);
        assert_eq!(session.batch_results["good.log"].len(), 1);
    }
}
