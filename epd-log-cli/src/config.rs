//! Configuration loading and parsing
//!
//! Batch runs are driven by a TOML file describing the input files, decode
//! settings, and export targets, so a recurring test setup doesn't need a
//! long command line.

use anyhow::{Context, Result};
use epd_log_decoder::Mode;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Main application configuration (loaded from config.toml)
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AppConfig {
    pub input: InputConfig,
    #[serde(default)]
    pub decode: DecodeConfig,
    #[serde(default)]
    pub output: OutputConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct InputConfig {
    /// Log files to process; more than one triggers batch mode
    pub files: Vec<PathBuf>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct DecodeConfig {
    /// Start-event parsing mode
    #[serde(default)]
    pub mode: Mode,

    /// Keep each iteration's raw text on the result (needed for TXT export)
    #[serde(default = "default_true")]
    pub keep_original_log: bool,
}

fn default_true() -> bool {
    true
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct OutputConfig {
    /// TXT report path
    pub report: Option<PathBuf>,

    /// JSON export path
    pub json: Option<PathBuf>,

    /// Title shown in report headers
    #[serde(default)]
    pub title: String,
}

/// Load configuration from a TOML file
pub fn load_config(path: &Path) -> Result<AppConfig> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {path:?}"))?;

    let config: AppConfig = toml::from_str(&content)
        .with_context(|| format!("Failed to parse config file: {path:?}"))?;

    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_deserialization() {
        let toml_content = r#"
            [input]
            files = ["run1.log", "run2.log"]

            [decode]
            mode = "suspend"

            [output]
            report = "report.txt"
            title = "suspend regression"
        "#;

        let config: AppConfig = toml::from_str(toml_content).unwrap();
        assert_eq!(config.input.files.len(), 2);
        assert_eq!(config.decode.mode, Mode::Suspend);
        assert!(config.decode.keep_original_log);
        assert_eq!(config.output.report, Some(PathBuf::from("report.txt")));
        assert_eq!(config.output.title, "suspend regression");
        assert_eq!(config.output.json, None);
    }

    #[test]
    fn test_minimal_config() {
        let config: AppConfig = toml::from_str("[input]\nfiles = [\"a.log\"]\n").unwrap();
        assert_eq!(config.decode.mode, Mode::Default);
        assert!(config.output.report.is_none());
    }
}
