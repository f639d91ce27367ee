//! Configuration management with YAML support

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::insights::PeriodUnit;

/// Main configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub database: DatabaseConfig,

    #[serde(default)]
    pub logging: LoggingConfig,

    #[serde(default)]
    pub defaults: DefaultsConfig,
}

/// Database configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    #[serde(default = "default_database_path")]
    pub path: String,
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// EnvFilter directive, e.g. "info" or "insights_store=debug"
    #[serde(default = "default_log_filter")]
    pub filter: String,

    #[serde(default)]
    pub json: bool,
}

/// Fallbacks for CLI arguments
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DefaultsConfig {
    #[serde(default = "default_period_unit")]
    pub period_unit: PeriodUnit,
}

// Default value functions
fn default_database_path() -> String {
    "~/.local/share/insights/insights.db".to_string()
}

fn default_log_filter() -> String {
    "warn".to_string()
}

fn default_period_unit() -> PeriodUnit {
    PeriodUnit::Hour
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            path: default_database_path(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: default_log_filter(),
            json: false,
        }
    }
}

impl Default for DefaultsConfig {
    fn default() -> Self {
        Self {
            period_unit: default_period_unit(),
        }
    }
}

impl Config {
    /// Load configuration from a YAML file
    /// Searches in order:
    /// 1. Provided path
    /// 2. ./insights.yaml (current directory)
    /// 3. ~/.config/insights/insights.yaml
    pub fn load(path: &str) -> Result<Self> {
        let search_paths = vec![
            shellexpand::tilde(path).to_string(),
            "insights.yaml".to_string(),
            shellexpand::tilde("~/.config/insights/insights.yaml").to_string(),
        ];

        for search_path in &search_paths {
            if std::path::Path::new(search_path).exists() {
                let content = std::fs::read_to_string(search_path)?;
                let config: Config = serde_yaml::from_str(&content)?;
                return Ok(config);
            }
        }

        // No config file found, use defaults
        Ok(Config::default())
    }

    /// Get the database path, expanding ~ to home directory
    pub fn database_path(&self) -> PathBuf {
        let expanded = shellexpand::tilde(&self.database.path).to_string();
        PathBuf::from(expanded)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.logging.filter, "warn");
        assert!(!config.logging.json);
        assert_eq!(config.defaults.period_unit, PeriodUnit::Hour);
        assert!(config.database.path.ends_with("insights.db"));
    }

    #[test]
    fn test_yaml_parsing() {
        let yaml = r#"
database:
  path: /tmp/insights-test.db

logging:
  filter: insights_store=debug
  json: true

defaults:
  period_unit: week
"#;
        let config: Config = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(config.database_path(), PathBuf::from("/tmp/insights-test.db"));
        assert_eq!(config.logging.filter, "insights_store=debug");
        assert!(config.logging.json);
        assert_eq!(config.defaults.period_unit, PeriodUnit::Week);
    }

    #[test]
    fn test_partial_yaml_keeps_defaults() {
        let config: Config = serde_yaml::from_str("logging:\n  json: true\n").unwrap();
        assert!(config.logging.json);
        assert_eq!(config.logging.filter, "warn");
        assert_eq!(config.defaults.period_unit, PeriodUnit::Hour);
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("custom.yaml");
        std::fs::write(&path, "database:\n  path: /var/lib/insights.db\n").unwrap();

        let config = Config::load(path.to_str().unwrap()).unwrap();
        assert_eq!(config.database.path, "/var/lib/insights.db");
    }
}
