//! Configuration loading and validation.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::PathBuf;
use thiserror::Error;
use tracing::debug;

use crate::bracket::{TemplateError, TemplateRegistry};
use crate::calculate::{QualifyRule, QualifyingTable};

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    ReadError(#[from] std::io::Error),

    #[error("Failed to parse config: {0}")]
    ParseError(#[from] toml::de::Error),

    #[error("Invalid configuration: {0}")]
    ValidationError(String),

    #[error("Failed to load bracket templates: {0}")]
    TemplateLoadError(#[from] TemplateError),
}

/// Engine configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Qualifying rules by format identifier, layered over the built-in table
    #[serde(default)]
    pub qualifying: BTreeMap<String, QualifyRule>,

    /// Optional TOML file of extra `[[templates]]`
    #[serde(default)]
    pub templates_path: Option<PathBuf>,
}

/// Main application configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,

    #[serde(default = "default_log_level")]
    pub log_level: String,

    #[serde(default)]
    pub engine: EngineConfig,
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
            engine: EngineConfig::default(),
        }
    }
}

impl AppConfig {
    /// Load configuration from a TOML file.
    pub fn from_file(path: &PathBuf) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        let config: AppConfig = toml::from_str(&contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (format, rule) in &self.engine.qualifying {
            rule.validate().map_err(|reason| {
                ConfigError::ValidationError(format!("qualifying.{}: {}", format, reason))
            })?;
        }

        if let Some(path) = &self.engine.templates_path {
            if path.as_os_str().is_empty() {
                return Err(ConfigError::ValidationError(
                    "templates_path must not be empty".to_string(),
                ));
            }
        }

        Ok(())
    }

    /// Built-in qualifying table with configured overrides applied.
    pub fn qualifying_table(&self) -> QualifyingTable {
        self.engine
            .qualifying
            .iter()
            .fold(QualifyingTable::default(), |table, (format, rule)| {
                debug!("Qualifying override {} -> {:?}", format, rule);
                table.with_rule(format.clone(), *rule)
            })
    }

    /// Built-in templates plus any loaded from `templates_path`.
    pub fn template_registry(&self) -> Result<TemplateRegistry, ConfigError> {
        let mut registry = TemplateRegistry::builtin();
        if let Some(path) = &self.engine.templates_path {
            registry.load_file(path)?;
        }
        Ok(registry)
    }
}
