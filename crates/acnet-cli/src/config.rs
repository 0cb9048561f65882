//! Configuration for the `acnet` binary.
//! Looked up in <config dir>/acnet/config.toml unless `--config` is given.

use crate::cli::OutputFormat;
use acnet_core::DEFAULT_FREQUENCY;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct AcnetConfig {
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(default)]
    pub analysis: AnalysisConfig,
    #[serde(default)]
    pub display: DisplayConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level: trace, debug, info, warn, error
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

impl LoggingConfig {
    pub fn level(&self) -> Result<tracing::Level> {
        self.level
            .parse()
            .with_context(|| format!("invalid log level '{}' in config", self.level))
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisConfig {
    /// Used when neither the netlist nor `--frequency` sets one
    #[serde(default = "default_frequency_hz")]
    pub frequency_hz: f64,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            frequency_hz: default_frequency_hz(),
        }
    }
}

fn default_frequency_hz() -> f64 {
    DEFAULT_FREQUENCY.value()
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct DisplayConfig {
    #[serde(default)]
    pub format: OutputFormat,
}

/// `<config dir>/acnet/config.toml`, if the platform has a config dir.
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("acnet").join("config.toml"))
}

/// Load the configuration.
///
/// An explicit path must exist; the default location may be missing, in which
/// case defaults are used.
pub fn load_config(explicit: Option<&Path>) -> Result<AcnetConfig> {
    let path = match explicit {
        Some(path) => path.to_path_buf(),
        None => match default_config_path() {
            Some(path) if path.exists() => path,
            _ => return Ok(AcnetConfig::default()),
        },
    };
    let contents = std::fs::read_to_string(&path)
        .with_context(|| format!("reading config {}", path.display()))?;
    parse_config(&contents).with_context(|| format!("parsing config {}", path.display()))
}

pub fn parse_config(contents: &str) -> Result<AcnetConfig> {
    Ok(toml::from_str(contents)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_config_uses_defaults() {
        let config = parse_config("").unwrap();
        assert_eq!(config.logging.level, "info");
        assert_eq!(config.analysis.frequency_hz, 1000.0);
        assert_eq!(config.display.format, OutputFormat::Text);
    }

    #[test]
    fn partial_config_overrides() {
        let config = parse_config(
            r#"
            [analysis]
            frequency_hz = 50.0

            [display]
            format = "json"
            "#,
        )
        .unwrap();
        assert_eq!(config.analysis.frequency_hz, 50.0);
        assert_eq!(config.display.format, OutputFormat::Json);
        assert_eq!(config.logging.level().unwrap(), tracing::Level::INFO);
    }

    #[test]
    fn bad_log_level_is_reported() {
        let config = parse_config("[logging]\nlevel = \"loud\"").unwrap();
        assert!(config.logging.level().is_err());
    }

    #[test]
    fn explicit_missing_file_fails() {
        let dir = tempfile::tempdir().unwrap();
        assert!(load_config(Some(&dir.path().join("nope.toml"))).is_err());
    }
}
