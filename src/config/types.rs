use clap::ValueEnum;
use log::LevelFilter;
use serde::{Deserialize, Serialize};

use crate::device::constants::{DEFAULT_EVENT_BUFFER, DEFAULT_REMOTE_NAME, MAX_EVENT_BUFFER};
use crate::error::ConfigError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Off,
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<LogLevel> for LevelFilter {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Off => LevelFilter::Off,
            LogLevel::Error => LevelFilter::Error,
            LogLevel::Warn => LevelFilter::Warn,
            LogLevel::Info => LevelFilter::Info,
            LogLevel::Debug => LevelFilter::Debug,
            LogLevel::Trace => LevelFilter::Trace,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Config {
    pub remote_name: String,
    /// Connect the simulated remote device before reading commands.
    pub connect_on_launch: bool,
    /// Start the device before reading commands.
    pub start_on_launch: bool,
    pub log_level: LogLevel,
    pub event_buffer: usize,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            remote_name: DEFAULT_REMOTE_NAME.to_string(),
            connect_on_launch: false,
            start_on_launch: true,
            log_level: LogLevel::Info,
            event_buffer: DEFAULT_EVENT_BUFFER,
        }
    }
}

impl Config {
    /// Rejects values that deserialize fine but cannot be used to run a session.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.event_buffer > MAX_EVENT_BUFFER {
            return Err(ConfigError::EventBufferTooLarge { value: self.event_buffer, max: MAX_EVENT_BUFFER });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_keys_use_defaults() {
        let config: Config = serde_json::from_str(r#"{ "remoteName": "rtu-7", "logLevel": "debug" }"#).unwrap();

        assert_eq!(config, Config {
            remote_name: "rtu-7".to_string(),
            log_level: LogLevel::Debug,
            ..Config::default()
        });
    }

    #[test]
    fn serializes_camel_case() {
        let json = serde_json::to_value(Config::default()).unwrap();
        assert_eq!(json["connectOnLaunch"], false);
        assert_eq!(json["startOnLaunch"], true);
        assert_eq!(json["logLevel"], "info");
        assert_eq!(json["eventBuffer"], DEFAULT_EVENT_BUFFER);
    }

    #[test]
    fn event_buffer_limit() {
        let at_limit = Config { event_buffer: MAX_EVENT_BUFFER, ..Config::default() };
        assert!(at_limit.validate().is_ok());

        let over = Config { event_buffer: MAX_EVENT_BUFFER + 1, ..Config::default() };
        assert!(matches!(over.validate(), Err(ConfigError::EventBufferTooLarge { value, .. }) if value == MAX_EVENT_BUFFER + 1));
    }

    #[test]
    fn log_level_maps_to_filter() {
        assert_eq!(LevelFilter::from(LogLevel::Warn), LevelFilter::Warn);
        assert_eq!(LevelFilter::from(LogLevel::Off), LevelFilter::Off);
    }
}
