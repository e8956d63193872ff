//! Configuration management for moneta
//!
//! This module handles loading, validation, and management of
//! moneta configuration from YAML files.

pub mod error;

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

pub use error::ConfigError;

// ==================== Configuration Types ====================

/// Server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Server host address
    #[serde(default = "default_host")]
    pub host: String,
    /// Server port
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8083
}

/// Data directory configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DataConfig {
    /// Path to the data directory
    #[serde(default = "default_data_path")]
    pub path: PathBuf,
    /// Book file name (categories and transactions, JSON)
    #[serde(default = "default_book_file")]
    pub book_file: String,
}

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            path: default_data_path(),
            book_file: default_book_file(),
        }
    }
}

fn default_data_path() -> PathBuf {
    PathBuf::from("./data")
}

fn default_book_file() -> String {
    "book.json".to_string()
}

/// Dashboard settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DashboardConfig {
    /// Filter shown when the URL carries none ("INCOME" or "EXPENSE")
    #[serde(default = "default_filter")]
    pub default_filter: String,
    /// Number of entries in the top-categories panel
    #[serde(default = "default_top_categories")]
    pub top_categories: usize,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            default_filter: default_filter(),
            top_categories: default_top_categories(),
        }
    }
}

fn default_filter() -> String {
    "INCOME".to_string()
}

fn default_top_categories() -> usize {
    5
}

/// Currency and number formatting
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CurrencyConfig {
    /// Currency code shown next to amounts
    #[serde(default = "default_currency")]
    pub code: String,
    /// Thousands separator
    #[serde(default = "default_thousands_sep")]
    pub thousands_separator: String,
}

impl Default for CurrencyConfig {
    fn default() -> Self {
        Self {
            code: default_currency(),
            thousands_separator: default_thousands_sep(),
        }
    }
}

fn default_currency() -> String {
    "UZS".to_string()
}

fn default_thousands_sep() -> String {
    ",".to_string()
}

/// Pagination settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaginationConfig {
    /// Upper bound on rows in a transaction-list fragment
    #[serde(default = "default_records_per_page")]
    pub records_per_page: usize,
}

impl Default for PaginationConfig {
    fn default() -> Self {
        Self {
            records_per_page: default_records_per_page(),
        }
    }
}

fn default_records_per_page() -> usize {
    200
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level: debug, info, warn, error
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

fn default_log_level() -> String {
    "info".to_string()
}

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    /// Server settings
    #[serde(default)]
    pub server: ServerConfig,
    /// Data directory settings
    #[serde(default)]
    pub data: DataConfig,
    /// Dashboard settings
    #[serde(default)]
    pub dashboard: DashboardConfig,
    /// Currency settings
    #[serde(default)]
    pub currency: CurrencyConfig,
    /// Pagination settings
    #[serde(default)]
    pub pagination: PaginationConfig,
    /// Logging settings
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Config {
    /// Load configuration from a YAML file
    pub fn load(path: PathBuf) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Err(ConfigError::FileNotFound {
                path: path.to_string_lossy().to_string(),
            });
        }

        let content = std::fs::read_to_string(&path).map_err(|_| ConfigError::IoError)?;

        let config: Config =
            serde_yaml::from_str(&content).map_err(|_| ConfigError::InvalidYaml)?;

        config.validate()?;

        Ok(config)
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.server.port == 0 {
            return Err(ConfigError::InvalidValue {
                field: "server.port".to_string(),
                reason: "Port must be greater than 0".to_string(),
            });
        }

        match self.dashboard.default_filter.as_str() {
            "INCOME" | "EXPENSE" => {}
            other => {
                return Err(ConfigError::InvalidValue {
                    field: "dashboard.default_filter".to_string(),
                    reason: format!("Expected INCOME or EXPENSE, got {}", other),
                });
            }
        }

        if self.currency.code.trim().is_empty() {
            return Err(ConfigError::InvalidValue {
                field: "currency.code".to_string(),
                reason: "Currency code must not be empty".to_string(),
            });
        }

        if self.pagination.records_per_page == 0 {
            return Err(ConfigError::InvalidValue {
                field: "pagination.records_per_page".to_string(),
                reason: "Must be greater than 0".to_string(),
            });
        }

        Ok(())
    }

    /// Generate a default configuration file
    pub fn generate_default() -> &'static str {
        include_str!("../templates/default_config.yaml")
    }

    /// Get the full path to the book file
    pub fn book_path(&self) -> PathBuf {
        self.data.path.join(&self.data.book_file)
    }
}

// ==================== Tests ====================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = Config::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.dashboard.default_filter, "INCOME");
        assert_eq!(config.data.book_file, "book.json");
    }

    #[test]
    fn test_bundled_template_parses() {
        let config: Config = serde_yaml::from_str(Config::generate_default())
            .expect("bundled template must parse");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_yaml_uses_defaults() {
        let yaml = "server:\n  port: 9000\n";
        let config: Config = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(config.server.port, 9000);
        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.dashboard.default_filter, "INCOME");
    }

    #[test]
    fn test_validate_rejects_zero_port() {
        let mut config = Config::default();
        config.server.port = 0;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidValue { field, .. }) if field == "server.port"
        ));
    }

    #[test]
    fn test_validate_rejects_unknown_filter() {
        let mut config = Config::default();
        config.dashboard.default_filter = "ALL".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_book_path_joins_dir_and_file() {
        let config = Config::default();
        assert_eq!(config.book_path(), PathBuf::from("./data").join("book.json"));
    }
}
