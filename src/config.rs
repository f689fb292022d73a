use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::fatigue::FatigueConfig;
use crate::logging::LogConfig;
use crate::progression::ProgressionConfig;

/// Main application configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppConfig {
    /// Configuration metadata
    pub metadata: ConfigMetadata,

    /// Logging settings
    #[serde(default)]
    pub logging: LogConfig,

    /// Progression rule thresholds
    #[serde(default)]
    pub progression: ProgressionConfig,

    /// Overtraining signal thresholds
    #[serde(default)]
    pub fatigue: FatigueConfig,

    /// Defaults for the command line
    #[serde(default)]
    pub defaults: CommandDefaults,
}

/// Configuration metadata
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConfigMetadata {
    /// Configuration format version
    pub version: String,

    /// Creation timestamp
    pub created_at: DateTime<Utc>,

    /// Last modification timestamp
    pub updated_at: DateTime<Utc>,
}

/// Values used when a command line flag is omitted
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CommandDefaults {
    /// Weeks of history in a fatigue window
    pub fatigue_weeks: usize,

    /// Rows in a rep max table
    pub table_max_reps: u32,

    /// Athlete bodyweight for bodyweight exercises, in kilograms
    pub athlete_weight_kg: Option<f64>,
}

impl Default for CommandDefaults {
    fn default() -> Self {
        CommandDefaults {
            fatigue_weeks: 4,
            table_max_reps: 10,
            athlete_weight_kg: None,
        }
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        let now = Utc::now();

        AppConfig {
            metadata: ConfigMetadata {
                version: "1.0".to_string(),
                created_at: now,
                updated_at: now,
            },
            logging: LogConfig::default(),
            progression: ProgressionConfig::default(),
            fatigue: FatigueConfig::default(),
            defaults: CommandDefaults::default(),
        }
    }
}

/// Configuration management implementation
impl AppConfig {
    /// Load configuration from TOML file
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read config file: {}", path.as_ref().display()))?;

        let config: AppConfig =
            toml::from_str(&content).with_context(|| "Failed to parse TOML configuration")?;

        Ok(config)
    }

    /// Save configuration to TOML file
    pub fn save_to_file<P: AsRef<Path>>(&mut self, path: P) -> Result<()> {
        self.metadata.updated_at = Utc::now();

        if let Some(parent) = path.as_ref().parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create config directory: {}", parent.display())
            })?;
        }

        let toml_content = toml::to_string_pretty(self)
            .with_context(|| "Failed to serialize configuration to TOML")?;

        fs::write(&path, toml_content)
            .with_context(|| format!("Failed to write config file: {}", path.as_ref().display()))?;

        Ok(())
    }

    /// Get default configuration file path
    pub fn default_config_path() -> PathBuf {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".liftrs")
            .join("config.toml")
    }

    /// Load configuration with fallback to defaults
    pub fn load_or_default() -> Self {
        let config_path = Self::default_config_path();

        match Self::load_from_file(&config_path) {
            Ok(config) => config,
            Err(err) => {
                tracing::debug!(
                    path = %config_path.display(),
                    error = %err,
                    "Config file not loaded, using defaults"
                );
                Self::default()
            }
        }
    }

    /// Save configuration to default location
    pub fn save_default(&mut self) -> Result<()> {
        let config_path = Self::default_config_path();
        self.save_to_file(config_path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_config_serialization() {
        let config = AppConfig::default();
        let toml_str = toml::to_string(&config).unwrap();
        let deserialized: AppConfig = toml::from_str(&toml_str).unwrap();

        assert_eq!(config.metadata.version, deserialized.metadata.version);
        assert_eq!(config.progression, deserialized.progression);
        assert_eq!(config.fatigue, deserialized.fatigue);
    }

    #[test]
    fn test_partial_config_uses_defaults() {
        let toml_str = r#"
            [metadata]
            version = "1.0"
            created_at = "2024-01-01T00:00:00Z"
            updated_at = "2024-01-01T00:00:00Z"
        "#;
        let config: AppConfig = toml::from_str(toml_str).unwrap();

        assert_eq!(config.progression, ProgressionConfig::default());
        assert_eq!(config.defaults.fatigue_weeks, 4);
    }

    #[test]
    fn test_config_file_io() {
        let temp_dir = tempdir().unwrap();
        let config_path = temp_dir.path().join("nested").join("config.toml");

        let mut original = AppConfig::default();
        original.progression.increase_ratio = 1.1;
        original.defaults.athlete_weight_kg = Some(82.0);

        original.save_to_file(&config_path).unwrap();
        let loaded = AppConfig::load_from_file(&config_path).unwrap();

        assert_eq!(loaded.progression.increase_ratio, 1.1);
        assert_eq!(loaded.defaults.athlete_weight_kg, Some(82.0));
    }

    #[test]
    fn test_missing_file_is_error() {
        let temp_dir = tempdir().unwrap();
        assert!(AppConfig::load_from_file(temp_dir.path().join("absent.toml")).is_err());
    }
}
