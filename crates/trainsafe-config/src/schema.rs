use schemars::{schema_for, JsonSchema};
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use trainsafe_sim::EngineConfig;

use crate::{ConfigError, LogFormat, LogLevel, LoggingConfig, TrainsafeConfig};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(deny_unknown_fields)]
pub(crate) struct TrainsafeConfigDocument {
    #[serde(default = "default_simulation_document")]
    pub simulation: SimulationDocument,
    #[serde(default = "default_logging_document")]
    pub logging: LoggingDocument,
}

impl From<&TrainsafeConfig> for TrainsafeConfigDocument {
    fn from(value: &TrainsafeConfig) -> Self {
        Self {
            simulation: SimulationDocument::from(&value.simulation),
            logging: LoggingDocument::from(&value.logging),
        }
    }
}

impl TryFrom<TrainsafeConfigDocument> for TrainsafeConfig {
    type Error = ConfigError;

    fn try_from(value: TrainsafeConfigDocument) -> Result<Self, Self::Error> {
        Ok(Self {
            simulation: value.simulation.try_into()?,
            logging: value.logging.into(),
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(deny_unknown_fields)]
pub(crate) struct SimulationDocument {
    #[serde(default = "default_step_seconds")]
    pub step_seconds: f64,
    #[serde(default = "default_speed_multiplier")]
    pub speed_multiplier: u32,
    #[serde(default = "default_stop_threshold_km")]
    pub stop_threshold_km: f64,
    #[serde(default = "default_max_ticks")]
    pub max_ticks: Option<u64>,
}

impl From<&EngineConfig> for SimulationDocument {
    fn from(value: &EngineConfig) -> Self {
        Self {
            step_seconds: value.step_seconds,
            speed_multiplier: value.speed_multiplier,
            stop_threshold_km: value.stop_threshold_km,
            max_ticks: value.max_ticks,
        }
    }
}

impl TryFrom<SimulationDocument> for EngineConfig {
    type Error = ConfigError;

    fn try_from(value: SimulationDocument) -> Result<Self, Self::Error> {
        let config = Self {
            step_seconds: value.step_seconds,
            speed_multiplier: value.speed_multiplier,
            stop_threshold_km: value.stop_threshold_km,
            max_ticks: value.max_ticks,
        };
        config.validate()?;
        Ok(config)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(deny_unknown_fields)]
pub(crate) struct LoggingDocument {
    #[serde(default = "default_log_level_document")]
    pub level: LogLevelDocument,
    #[serde(default = "default_log_format_document")]
    pub format: LogFormatDocument,
}

impl From<&LoggingConfig> for LoggingDocument {
    fn from(value: &LoggingConfig) -> Self {
        Self {
            level: LogLevelDocument::from(value.level),
            format: LogFormatDocument::from(value.format),
        }
    }
}

impl From<LoggingDocument> for LoggingConfig {
    fn from(value: LoggingDocument) -> Self {
        Self {
            level: value.level.into(),
            format: value.format.into(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub(crate) enum LogLevelDocument {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
}

impl From<LogLevel> for LogLevelDocument {
    fn from(value: LogLevel) -> Self {
        match value {
            LogLevel::Trace => Self::Trace,
            LogLevel::Debug => Self::Debug,
            LogLevel::Info => Self::Info,
            LogLevel::Warn => Self::Warn,
            LogLevel::Error => Self::Error,
        }
    }
}

impl From<LogLevelDocument> for LogLevel {
    fn from(value: LogLevelDocument) -> Self {
        match value {
            LogLevelDocument::Trace => Self::Trace,
            LogLevelDocument::Debug => Self::Debug,
            LogLevelDocument::Info => Self::Info,
            LogLevelDocument::Warn => Self::Warn,
            LogLevelDocument::Error => Self::Error,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub(crate) enum LogFormatDocument {
    Json,
    Pretty,
    Compact,
}

impl From<LogFormat> for LogFormatDocument {
    fn from(value: LogFormat) -> Self {
        match value {
            LogFormat::Json => Self::Json,
            LogFormat::Pretty => Self::Pretty,
            LogFormat::Compact => Self::Compact,
        }
    }
}

impl From<LogFormatDocument> for LogFormat {
    fn from(value: LogFormatDocument) -> Self {
        match value {
            LogFormatDocument::Json => Self::Json,
            LogFormatDocument::Pretty => Self::Pretty,
            LogFormatDocument::Compact => Self::Compact,
        }
    }
}

pub fn json_schema() -> JsonValue {
    serde_json::to_value(schema_for!(TrainsafeConfigDocument)).unwrap_or(JsonValue::Null)
}

fn default_simulation_document() -> SimulationDocument {
    SimulationDocument::from(&EngineConfig::default())
}

fn default_logging_document() -> LoggingDocument {
    LoggingDocument::from(&LoggingConfig::default())
}

fn default_step_seconds() -> f64 {
    EngineConfig::default().step_seconds
}

fn default_speed_multiplier() -> u32 {
    EngineConfig::default().speed_multiplier
}

fn default_stop_threshold_km() -> f64 {
    EngineConfig::default().stop_threshold_km
}

fn default_max_ticks() -> Option<u64> {
    EngineConfig::default().max_ticks
}

fn default_log_level_document() -> LogLevelDocument {
    LogLevelDocument::from(LogLevel::default())
}

fn default_log_format_document() -> LogFormatDocument {
    LogFormatDocument::from(LogFormat::default())
}

#[cfg(test)]
mod tests {
    use crate::schema::json_schema;

    #[test]
    fn schema_names_the_top_level_sections() {
        let schema = json_schema();
        let properties = schema
            .get("properties")
            .expect("schema should expose properties");
        assert!(properties.get("simulation").is_some());
        assert!(properties.get("logging").is_some());
    }
}
