use std::time::Duration;

use config::{Config, ConfigError, File};
use serde::Deserialize;

#[derive(Deserialize, Debug, Clone)]
pub struct Settings {
    pub environment: Environment,
    #[serde(default)]
    pub log_level: LogLevel,
    pub feed_url: String,
    #[serde(with = "humantime_serde", default = "default_emit_interval")]
    pub emit_interval: Duration,
    /// Vessels that have not reported within this duration are removed, disabled if absent.
    #[serde(with = "humantime_serde", default)]
    pub vessel_ttl: Option<Duration>,
    #[serde(default = "default_snapshot_buffer_size")]
    pub snapshot_buffer_size: usize,
    #[serde(default = "default_max_line_length")]
    pub max_line_length: usize,
    #[serde(default)]
    pub reconnect: ReconnectSettings,
    /// Passed through to the map client untouched.
    #[serde(default)]
    pub map: MapSettings,
}

#[derive(Deserialize, Debug, Clone, Copy)]
pub struct ReconnectSettings {
    #[serde(with = "humantime_serde")]
    pub min_delay: Duration,
    #[serde(with = "humantime_serde")]
    pub max_delay: Duration,
}

#[derive(Deserialize, Debug, Clone, Copy, PartialEq)]
pub struct MapSettings {
    /// `[min_longitude, min_latitude, max_longitude, max_latitude]`
    pub bbox: [f64; 4],
    pub min_zoom: f64,
    pub max_zoom: f64,
    /// `[longitude, latitude]`
    pub center: [f64; 2],
}

#[derive(Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Environment {
    Local,
    Development,
    Production,
    Test,
}

#[derive(Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Trace,
    Debug,
    #[default]
    Info,
    Warn,
    Error,
}

impl Settings {
    pub fn new() -> Result<Settings, ConfigError> {
        let environment: Environment = std::env::var("APP_ENVIRONMENT")
            .unwrap_or_else(|_| "local".to_string())
            .try_into()?;

        let builder = Config::builder()
            .add_source(
                File::with_name(&format!("config/{}", environment.as_str().to_lowercase()))
                    .required(true),
            )
            .add_source(config::Environment::with_prefix("AIS_CONSUMER").separator("__"))
            .set_override("environment", environment.as_str())?;

        builder.build()?.try_deserialize()
    }
}

impl Environment {
    pub fn as_str(&self) -> &'static str {
        match self {
            Environment::Local => "Local",
            Environment::Development => "Development",
            Environment::Production => "Production",
            Environment::Test => "Test",
        }
    }
}

impl TryFrom<String> for Environment {
    type Error = ConfigError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        match value.to_lowercase().as_str() {
            "local" => Ok(Environment::Local),
            "development" => Ok(Environment::Development),
            "production" => Ok(Environment::Production),
            "test" => Ok(Environment::Test),
            _ => Err(ConfigError::Message(format!(
                "'{value}' is not a supported environment"
            ))),
        }
    }
}

impl LogLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            LogLevel::Trace => "trace",
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
            LogLevel::Warn => "warn",
            LogLevel::Error => "error",
        }
    }
}

impl Default for ReconnectSettings {
    fn default() -> Self {
        Self {
            min_delay: Duration::from_millis(100),
            max_delay: Duration::from_secs(30),
        }
    }
}

impl Default for MapSettings {
    fn default() -> Self {
        Self {
            bbox: [18.960943, 34.583369, 34.627447, 40.851118],
            min_zoom: 5.,
            max_zoom: 15.,
            center: [24.761767, 37.636665],
        }
    }
}

fn default_emit_interval() -> Duration {
    Duration::from_secs(1)
}

fn default_snapshot_buffer_size() -> usize {
    4
}

fn default_max_line_length() -> usize {
    64 * 1024
}
