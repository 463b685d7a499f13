use std::fs;
use std::path::Path;

use serde::Deserialize;
use thiserror::Error;
use tracing::info;

pub const DEFAULT_CONFIG_PATH: &str = "mowersim.toml";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("Failed to parse config {path}: {source}")]
    Parse {
        path: String,
        #[source]
        source: toml::de::Error,
    },
}

#[derive(Debug, Clone, PartialEq, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub output: OutputConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(default)]
    pub viewer: ViewerConfig,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct OutputConfig {
    #[serde(default = "default_results_dir")]
    pub results_dir: String,
    #[serde(default = "default_true")]
    pub save: bool,
    #[serde(default = "default_true")]
    pub pretty: bool,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct LoggingConfig {
    /// `tracing` filter directive, overridden by `RUST_LOG`.
    #[serde(default = "default_log_level")]
    pub level: String,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ViewerConfig {
    #[serde(default = "default_cell_size")]
    pub cell_size: f32,
    #[serde(default = "default_replay_interval")]
    pub replay_interval_secs: f32,
}

// Default values
fn default_results_dir() -> String { "results".to_string() }
fn default_true() -> bool { true }
fn default_log_level() -> String { "info".to_string() }
fn default_cell_size() -> f32 { 48.0 }
fn default_replay_interval() -> f32 { 0.4 }

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            results_dir: default_results_dir(),
            save: true,
            pretty: true,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self { level: default_log_level() }
    }
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            cell_size: default_cell_size(),
            replay_interval_secs: default_replay_interval(),
        }
    }
}

impl Config {
    pub fn from_toml(path: &str, contents: &str) -> Result<Self, ConfigError> {
        toml::from_str(contents).map_err(|source| ConfigError::Parse {
            path: path.to_string(),
            source,
        })
    }

    /// Loads an explicitly requested file; every failure is an error.
    pub fn load_from(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let shown = path.display().to_string();
        let contents = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: shown.clone(),
            source,
        })?;
        let config = Self::from_toml(&shown, &contents)?;
        info!(path = %shown, "Loaded configuration");
        Ok(config)
    }

    /// Loads `mowersim.toml` from the working directory. `Ok(None)` when the
    /// file does not exist.
    pub fn load_default() -> Result<Option<Self>, ConfigError> {
        if !Path::new(DEFAULT_CONFIG_PATH).exists() {
            return Ok(None);
        }
        Self::load_from(DEFAULT_CONFIG_PATH).map(Some)
    }

    /// An explicit path must load. The implicit file falls back to defaults
    /// and hands its error back so the caller can warn once logging is up.
    pub fn resolve(explicit: Option<&Path>) -> Result<(Self, Option<ConfigError>), ConfigError> {
        if let Some(path) = explicit {
            return Ok((Self::load_from(path)?, None));
        }
        match Self::load_default() {
            Ok(found) => Ok((found.unwrap_or_default(), None)),
            Err(e) => Ok((Self::default(), Some(e))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_file_gives_defaults() {
        let config = Config::from_toml("empty.toml", "").unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.output.results_dir, "results");
        assert!(config.output.save);
        assert_eq!(config.logging.level, "info");
    }

    #[test]
    fn partial_sections_keep_other_defaults() {
        let config = Config::from_toml(
            "partial.toml",
            "[output]\nresults_dir = \"out\"\nsave = false\n[viewer]\ncell_size = 32.0\n",
        )
        .unwrap();
        assert_eq!(config.output.results_dir, "out");
        assert!(!config.output.save);
        assert!(config.output.pretty);
        assert_eq!(config.viewer.cell_size, 32.0);
        assert_eq!(config.viewer.replay_interval_secs, 0.4);
    }

    #[test]
    fn logging_level_key_and_sample_file() {
        let config = Config::from_toml("log.toml", "[logging]\nlevel = \"debug\"\n").unwrap();
        assert_eq!(config.logging.level, "debug");

        let sample = Config::from_toml("mowersim.toml", include_str!("../mowersim.toml")).unwrap();
        assert_eq!(sample, Config::default());
    }

    #[test]
    fn invalid_toml_is_an_error() {
        let err = Config::from_toml("bad.toml", "[output\nsave = ").unwrap_err();
        assert!(err.to_string().contains("bad.toml"));
    }

    #[test]
    fn missing_explicit_file_is_an_error() {
        let err = Config::load_from("/definitely/not/here/mowersim.toml").unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
    }
}
