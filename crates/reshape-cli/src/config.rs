//! Configuration management for the CLI
//!
//! Configuration comes from the first source that exists:
//! - The file given by `--config` or `RESHAPE_CONFIG`
//! - `.reshape.toml`, `.reshape.yaml` or `.reshape.json` in the current directory
//! - `config.toml`, `config.yaml` or `config.json` in the user config directory
//! - Default values
//!
//! Command-line arguments override what the file says.

use crate::cli::{ConfigFormat, OutputFormat};
use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Project config file stem, looked up in the current directory
pub const PROJECT_CONFIG_STEM: &str = ".reshape";

/// Main configuration structure
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Output settings
    pub output: OutputConfig,

    /// Logging settings
    pub logging: LoggingSettings,

    /// Resource limits
    pub limits: LimitsConfig,
}

/// Output configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Default output format
    pub format: String,

    /// Use colored output by default
    pub color: bool,

    /// Show progress indicators
    pub progress: bool,
}

/// Logging configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingSettings {
    /// Log level (trace, debug, info, warn, error)
    pub level: Option<String>,

    /// Log format (compact, full, json)
    pub format: String,

    /// Log file path
    pub file: Option<PathBuf>,
}

/// Limits applied before running anything
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LimitsConfig {
    /// Deepest accepted step nesting
    pub max_nesting_depth: usize,

    /// Most samples accepted by `infer`
    pub max_samples: usize,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            format: "human".to_string(),
            color: true,
            progress: true,
        }
    }
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: None,
            format: "compact".to_string(),
            file: None,
        }
    }
}

impl Default for LimitsConfig {
    fn default() -> Self {
        Self {
            max_nesting_depth: 32,
            max_samples: 1000,
        }
    }
}

impl Config {
    /// Load configuration from a file, choosing the parser by extension
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| match e.kind() {
            std::io::ErrorKind::NotFound => Error::FileNotFound {
                path: path.to_path_buf(),
            },
            _ => Error::Io(e),
        })?;

        let config = match path.extension().and_then(|s| s.to_str()) {
            Some("toml") => toml::from_str(&content)
                .map_err(|e| Error::config(format!("{}: {}", path.display(), e)))?,
            Some("yaml") | Some("yml") => serde_yaml::from_str(&content)?,
            Some("json") => serde_json::from_str(&content)?,
            _ => {
                return Err(Error::config(format!(
                    "Unsupported config format: {}",
                    path.display()
                )))
            }
        };

        debug!(path = %path.display(), "Loaded configuration");
        Ok(config)
    }

    /// Load configuration from default locations
    pub fn load() -> Result<Self> {
        for path in Self::default_config_paths() {
            if path.exists() {
                match Self::from_file(&path) {
                    Ok(config) => return Ok(config),
                    Err(e) => {
                        warn!(path = %path.display(), error = %e, "Failed to load config, skipping");
                    }
                }
            }
        }

        // Return default config if no config file found
        Ok(Self::default())
    }

    /// Load configuration from a specific file or default locations
    pub fn load_with_file(file: Option<&Path>) -> Result<Self> {
        match file {
            Some(path) => Self::from_file(path),
            None => Self::load(),
        }
    }

    /// Directory holding the user config
    pub fn user_config_dir() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("reshape"))
    }

    /// User config path for a given format
    pub fn user_config_path(format: ConfigFormat) -> Option<PathBuf> {
        Self::user_config_dir().map(|dir| dir.join(format!("config.{}", format.extension())))
    }

    /// Project config path for a given format
    pub fn project_config_path(format: ConfigFormat) -> PathBuf {
        PathBuf::from(format!("{}.{}", PROJECT_CONFIG_STEM, format.extension()))
    }

    /// Configuration file paths checked, in order
    pub fn default_config_paths() -> Vec<PathBuf> {
        let formats = [ConfigFormat::Toml, ConfigFormat::Yaml, ConfigFormat::Json];

        let mut paths: Vec<PathBuf> = formats
            .iter()
            .map(|format| Self::project_config_path(*format))
            .collect();
        paths.extend(formats.iter().filter_map(|format| Self::user_config_path(*format)));
        paths
    }

    /// Serialize the configuration in the given format
    pub fn to_string_as(&self, format: ConfigFormat) -> Result<String> {
        match format {
            ConfigFormat::Toml => toml::to_string_pretty(self)
                .map_err(|e| Error::config(format!("Failed to serialize as TOML: {}", e))),
            ConfigFormat::Json => Ok(serde_json::to_string_pretty(self)?),
            ConfigFormat::Yaml => Ok(serde_yaml::to_string(self)?),
        }
    }

    /// Save configuration to a file
    pub fn save(&self, path: &Path, format: ConfigFormat) -> Result<()> {
        let content = self.to_string_as(format)?;

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }

        std::fs::write(path, content)?;
        Ok(())
    }

    /// The configured default output format
    pub fn output_format(&self) -> Result<OutputFormat> {
        self.output.format.parse().map_err(|_| {
            Error::config(format!("Unknown output format: {}", self.output.format))
        })
    }

    /// Check the values a file cannot express through types alone
    pub fn validate(&self) -> Result<()> {
        self.output_format()?;
        if self.limits.max_nesting_depth == 0 {
            return Err(Error::config("limits.max_nesting_depth must be at least 1"));
        }
        if self.limits.max_samples == 0 {
            return Err(Error::config("limits.max_samples must be at least 1"));
        }
        if !["compact", "full", "json"].contains(&self.logging.format.to_lowercase().as_str()) {
            return Err(Error::config(format!(
                "Unknown log format: {}",
                self.logging.format
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.limits.max_nesting_depth, 32);
        assert_eq!(config.limits.max_samples, 1000);
        assert_eq!(config.output_format().unwrap(), OutputFormat::Human);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[limits]\nmax_nesting_depth = 4\n").unwrap();

        let config = Config::from_file(&path).unwrap();
        assert_eq!(config.limits.max_nesting_depth, 4);
        assert_eq!(config.limits.max_samples, 1000);
        assert_eq!(config.output, OutputConfig::default());
    }

    #[test]
    fn test_round_trip_in_every_format() {
        let dir = TempDir::new().unwrap();
        let mut config = Config::default();
        config.output.format = "json-pretty".to_string();
        config.logging.level = Some("debug".to_string());

        for format in [ConfigFormat::Toml, ConfigFormat::Yaml, ConfigFormat::Json] {
            let path = dir
                .path()
                .join("nested")
                .join(format!("config.{}", format.extension()));
            config.save(&path, format).unwrap();
            assert_eq!(Config::from_file(&path).unwrap(), config);
        }
    }

    #[test]
    fn test_invalid_values_are_rejected() {
        let mut config = Config::default();
        config.output.format = "xml".to_string();
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.limits.max_nesting_depth = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_missing_explicit_file() {
        let err = Config::load_with_file(Some(Path::new("/no/such/config.toml"))).unwrap_err();
        assert!(matches!(err, Error::FileNotFound { .. }));
    }

    #[test]
    fn test_search_order_starts_with_project_files() {
        let paths = Config::default_config_paths();
        assert_eq!(paths[0], PathBuf::from(".reshape.toml"));
        assert_eq!(paths[1], PathBuf::from(".reshape.yaml"));
        assert_eq!(paths[2], PathBuf::from(".reshape.json"));
    }
}
