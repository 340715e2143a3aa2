mod fleet;
mod schema;

use std::fs;
use std::path::Path;

use thiserror::Error;
use trainsafe_core::CoreError;
use trainsafe_sim::{EngineConfig, EngineError, ScenarioError};

pub use fleet::{load_fleet, parse_fleet};
pub use schema::json_schema;

/// Top-level typed runtime configuration.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct TrainsafeConfig {
    pub simulation: EngineConfig,
    pub logging: LoggingConfig,
}

impl TrainsafeConfig {
    /// Read and parse a YAML config file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_yaml(&text)
    }

    pub fn from_yaml(text: &str) -> Result<Self, ConfigError> {
        let document: schema::TrainsafeConfigDocument =
            serde_yaml::from_str(text).map_err(|source| ConfigError::Yaml { source })?;
        document.try_into()
    }

    pub fn to_yaml(&self) -> Result<String, ConfigError> {
        serde_yaml::to_string(&schema::TrainsafeConfigDocument::from(self))
            .map_err(|source| ConfigError::Yaml { source })
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.simulation.validate()?;
        Ok(())
    }
}

/// Logging contract consumed by binaries when installing a subscriber.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct LoggingConfig {
    pub level: LogLevel,
    pub format: LogFormat,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogLevel {
    Trace,
    Debug,
    #[default]
    Info,
    Warn,
    Error,
}

impl LogLevel {
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Trace => "trace",
            Self::Debug => "debug",
            Self::Info => "info",
            Self::Warn => "warn",
            Self::Error => "error",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    Json,
    #[default]
    Pretty,
    Compact,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read `{path}`: {source}")]
    Read {
        path: String,
        source: std::io::Error,
    },

    #[error("failed to parse YAML config: {source}")]
    Yaml { source: serde_yaml::Error },

    #[error("failed to parse fleet JSON: {source}")]
    Json { source: serde_json::Error },

    #[error("fleet entry `{key}` declares mismatching name `{name}`")]
    FleetKeyNameMismatch { key: String, name: String },

    #[error(transparent)]
    Engine(#[from] EngineError),

    #[error(transparent)]
    Scenario(#[from] ScenarioError),

    #[error(transparent)]
    Core(#[from] CoreError),
}
