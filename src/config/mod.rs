//! Configuration loading and validation.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::info;

use crate::models::BandThresholds;
use crate::storage::StorageConfig;
use crate::views::ViewSettings;

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    ReadError(#[from] std::io::Error),

    #[error("Failed to parse config: {0}")]
    ParseError(#[from] toml::de::Error),

    #[error("Invalid configuration: {0}")]
    ValidationError(String),
}

/// Input file names, relative to `data_dir`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InputFiles {
    /// Match-form sheet (player, agent, result per map instance)
    #[serde(default = "default_form")]
    pub form: String,

    /// Round-score sheet (one row per map played)
    #[serde(default = "default_scores")]
    pub scores: String,

    /// Per-round agent/result sheet with combat score
    #[serde(default = "default_acs")]
    pub acs: String,
}

fn default_form() -> String {
    "form.csv".to_string()
}

fn default_scores() -> String {
    "cleaned_score.csv".to_string()
}

fn default_acs() -> String {
    "foracs.csv".to_string()
}

impl Default for InputFiles {
    fn default() -> Self {
        Self {
            form: default_form(),
            scores: default_scores(),
            acs: default_acs(),
        }
    }
}

/// Display configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DisplayConfig {
    /// Win rates at or above this are "high"
    #[serde(default = "default_high_threshold")]
    pub high_threshold: f64,

    /// Win rates below this are "low"
    #[serde(default = "default_low_threshold")]
    pub low_threshold: f64,

    #[serde(default = "default_top_compositions")]
    pub top_compositions: usize,
}

fn default_high_threshold() -> f64 {
    0.60
}

fn default_low_threshold() -> f64 {
    0.40
}

fn default_top_compositions() -> usize {
    15
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            high_threshold: default_high_threshold(),
            low_threshold: default_low_threshold(),
            top_compositions: default_top_compositions(),
        }
    }
}

impl DisplayConfig {
    pub fn thresholds(&self) -> BandThresholds {
        BandThresholds {
            low: self.low_threshold,
            high: self.high_threshold,
        }
    }
}

/// Server configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,

    #[serde(default = "default_cors_origin")]
    pub cors_origin: String,
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    8080
}

fn default_cors_origin() -> String {
    "*".to_string()
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            cors_origin: default_cors_origin(),
        }
    }
}

/// Main application configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,

    #[serde(default = "default_log_level")]
    pub log_level: String,

    #[serde(default)]
    pub inputs: InputFiles,

    #[serde(default)]
    pub display: DisplayConfig,

    #[serde(default)]
    pub server: ServerConfig,
}

fn default_data_dir() -> PathBuf {
    PathBuf::from("./data")
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            log_level: default_log_level(),
            inputs: InputFiles::default(),
            display: DisplayConfig::default(),
            server: ServerConfig::default(),
        }
    }
}

impl AppConfig {
    /// Load configuration from a TOML file.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        let config: AppConfig = toml::from_str(&contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Load `path` if it exists, otherwise fall back to defaults.
    ///
    /// A file that exists but cannot be read or parsed is still an error.
    pub fn load_or_default(path: &Path) -> Result<Self, ConfigError> {
        if path.exists() {
            Self::from_file(path)
        } else {
            info!("No config at {:?}, using defaults", path);
            Ok(Self::default())
        }
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let display = &self.display;
        for (name, value) in [
            ("high_threshold", display.high_threshold),
            ("low_threshold", display.low_threshold),
        ] {
            if !(0.0..=1.0).contains(&value) {
                return Err(ConfigError::ValidationError(format!(
                    "{} must be between 0 and 1, got {}",
                    name, value
                )));
            }
        }

        if display.low_threshold >= display.high_threshold {
            return Err(ConfigError::ValidationError(
                "low_threshold must be below high_threshold".to_string(),
            ));
        }

        if display.top_compositions == 0 {
            return Err(ConfigError::ValidationError(
                "top_compositions must be greater than 0".to_string(),
            ));
        }

        if self.server.port == 0 {
            return Err(ConfigError::ValidationError(
                "Server port must be greater than 0".to_string(),
            ));
        }

        Ok(())
    }

    /// Input locations for the loader.
    pub fn storage(&self) -> StorageConfig {
        StorageConfig {
            data_dir: self.data_dir.clone(),
            form_file: self.inputs.form.clone(),
            scores_file: self.inputs.scores.clone(),
            acs_file: self.inputs.acs.clone(),
        }
    }

    pub fn view_settings(&self) -> ViewSettings {
        ViewSettings {
            thresholds: self.display.thresholds(),
            top_compositions: self.display.top_compositions,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();

        assert_eq!(config.data_dir, PathBuf::from("./data"));
        assert_eq!(config.log_level, "info");
        assert_eq!(config.inputs.form, "form.csv");
        assert_eq!(config.inputs.scores, "cleaned_score.csv");
        assert_eq!(config.inputs.acs, "foracs.csv");
        assert_eq!(config.display.top_compositions, 15);
        assert_eq!(config.server.port, 8080);
    }

    #[test]
    fn test_thresholds_match_band_defaults() {
        assert_eq!(DisplayConfig::default().thresholds(), BandThresholds::default());
    }

    #[test]
    fn test_config_validation_ok() {
        let config = AppConfig::default();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_validation_threshold_range() {
        let mut config = AppConfig::default();
        config.display.high_threshold = 60.0;

        assert!(config.validate().is_err());
    }

    #[test]
    fn test_config_validation_threshold_order() {
        let mut config = AppConfig::default();
        config.display.low_threshold = 0.7;

        assert!(config.validate().is_err());
    }

    #[test]
    fn test_config_validation_zero_top() {
        let mut config = AppConfig::default();
        config.display.top_compositions = 0;

        assert!(config.validate().is_err());
    }

    #[test]
    fn test_config_validation_bad_port() {
        let mut config = AppConfig::default();
        config.server.port = 0;

        assert!(config.validate().is_err());
    }

    #[test]
    fn test_partial_file_uses_defaults() {
        let config: AppConfig = toml::from_str(
            r#"
            data_dir = "/srv/scrims"

            [display]
            high_threshold = 0.55
            "#,
        )
        .unwrap();

        assert_eq!(config.data_dir, PathBuf::from("/srv/scrims"));
        assert_eq!(config.display.high_threshold, 0.55);
        assert_eq!(config.display.low_threshold, 0.40);
        assert_eq!(config.inputs.acs, "foracs.csv");
        assert_eq!(
            config.storage().scores_path(),
            PathBuf::from("/srv/scrims/cleaned_score.csv")
        );
    }

    #[test]
    fn test_load_or_default() {
        let tmp = tempfile::tempdir().unwrap();

        let missing = AppConfig::load_or_default(&tmp.path().join("absent.toml")).unwrap();
        assert_eq!(missing.server.port, 8080);

        let path = tmp.path().join("scrim-stats.toml");
        std::fs::write(&path, "[server]\nport = 9000\n").unwrap();
        let loaded = AppConfig::load_or_default(&path).unwrap();
        assert_eq!(loaded.server.port, 9000);

        std::fs::write(&path, "[display]\ntop_compositions = 0\n").unwrap();
        assert!(AppConfig::load_or_default(&path).is_err());

        std::fs::write(&path, "not = [valid").unwrap();
        assert!(matches!(
            AppConfig::load_or_default(&path),
            Err(ConfigError::ParseError(_))
        ));
    }

    #[test]
    fn test_config_serialization() {
        let config = AppConfig::default();
        let toml_str = toml::to_string(&config).unwrap();

        // Should be parseable
        let parsed: AppConfig = toml::from_str(&toml_str).unwrap();
        assert_eq!(config.data_dir, parsed.data_dir);
        assert_eq!(config.inputs.form, parsed.inputs.form);
    }
}
