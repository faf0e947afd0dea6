//! KBP Configuration Management
//!
//! Handles configuration from environment variables and config files
//! with sensible defaults for development.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Main application configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct KbpConfig {
    /// Rule loading configuration
    pub extractor: ExtractorConfig,

    /// Logging configuration
    pub logging: LoggingConfig,
}

impl KbpConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        let mut config = Self::default();

        if let Ok(dir) = std::env::var("KBP_SEMGREX_DIR") {
            config.extractor.rules_dir = PathBuf::from(dir);
        }

        // Search roots from environment variable (colon-separated)
        if let Ok(paths) = std::env::var("KBP_SEARCH_PATH") {
            config.extractor.search_paths = paths
                .split(':')
                .map(|s| s.trim())
                .filter(|s| !s.is_empty())
                .map(PathBuf::from)
                .collect();
        }

        if let Ok(level) = std::env::var("LOG_LEVEL") {
            config.logging.level = level;
        }
        if let Ok(json) = std::env::var("LOG_JSON") {
            config.logging.json_format = parse_flag("LOG_JSON", &json)?;
        }

        Ok(config)
    }

    /// Load from a TOML file
    pub fn from_file(path: impl Into<PathBuf>) -> Result<Self, ConfigError> {
        let path = path.into();
        let content = std::fs::read_to_string(&path).map_err(|e| ConfigError::FileReadError {
            path: path.clone(),
            source: e,
        })?;

        toml::from_str(&content).map_err(|e| ConfigError::ParseError {
            path,
            message: e.to_string(),
        })
    }

    /// Merge with environment variables (env takes precedence)
    pub fn with_env_override(mut self) -> Result<Self, ConfigError> {
        let env_config = Self::from_env()?;
        let defaults = Self::default();

        // Only override if env values differ from defaults
        if env_config.extractor.rules_dir != defaults.extractor.rules_dir {
            self.extractor.rules_dir = env_config.extractor.rules_dir;
        }
        if !env_config.extractor.search_paths.is_empty() {
            self.extractor.search_paths = env_config.extractor.search_paths;
        }
        if env_config.logging.level != defaults.logging.level {
            self.logging.level = env_config.logging.level;
        }
        if env_config.logging.json_format {
            self.logging.json_format = true;
        }

        Ok(self)
    }
}

/// `true`/`false` or `1`/`0`, case-insensitive
fn parse_flag(key: &str, value: &str) -> Result<bool, ConfigError> {
    match value.trim().to_ascii_lowercase().as_str() {
        "true" | "1" => Ok(true),
        "false" | "0" => Ok(false),
        _ => Err(ConfigError::InvalidValue {
            key: key.to_string(),
            value: value.to_string(),
        }),
    }
}

/// Rule directory configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractorConfig {
    /// Directory holding one rule file per relation
    pub rules_dir: PathBuf,

    /// Extra roots searched when `rules_dir` is relative and not found as given
    pub search_paths: Vec<PathBuf>,

    /// Rule file extension, without the dot
    pub rule_extension: String,

    /// Replacement for `/` in relation names when forming file names
    pub slash_token: String,
}

impl ExtractorConfig {
    /// Config for a rule directory, other settings at their defaults
    pub fn for_dir(rules_dir: impl Into<PathBuf>) -> Self {
        Self {
            rules_dir: rules_dir.into(),
            ..Self::default()
        }
    }

    /// Rule file name for a relation's canonical name
    ///
    /// `org:top_members/employees` becomes `org:top_membersSLASHemployees.rules`.
    pub fn rule_file_name(&self, canonical_name: &str) -> String {
        format!(
            "{}.{}",
            canonical_name.replace('/', &self.slash_token),
            self.rule_extension
        )
    }
}

impl Default for ExtractorConfig {
    fn default() -> Self {
        Self {
            rules_dir: PathBuf::from("rules/semgrex"),
            search_paths: vec![],
            rule_extension: "rules".to_string(),
            slash_token: "SLASH".to_string(),
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error) or a full filter directive
    pub level: String,

    /// JSON format for logs (`LOG_JSON`: true/false or 1/0)
    pub json_format: bool,

    /// Include file/line in logs
    pub include_location: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json_format: false,
            include_location: false,
        }
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file {}: {source}", path.display())]
    FileReadError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config file {}: {message}", path.display())]
    ParseError { path: PathBuf, message: String },

    #[error("Invalid value for {key}: {value}")]
    InvalidValue { key: String, value: String },
}
