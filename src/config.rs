use serde::{Deserialize, Serialize};

use crate::{EncoderProfile, Level};

/// Service name used when none is configured.
pub const DEFAULT_SERVICE_NAME: &str = "gath-stack";

/// Configuration for a logger
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// Minimum level name ("DEBUG", "INFO", "WARN", "ERROR"); unknown names mean INFO
    #[serde(default = "default_level")]
    pub level: String,
    /// Deployment environment; exactly "production" selects JSON output
    #[serde(default = "default_environment")]
    pub environment: String,
    /// Attached to every record as `service`
    #[serde(default = "default_service_name")]
    pub service_name: String,
    /// "stdout", "stderr" or a file path
    #[serde(default = "default_output")]
    pub output: String,
}

impl Config {
    /// Create a new Config with defaults
    pub fn new() -> Self {
        Self {
            level: default_level(),
            environment: default_environment(),
            service_name: default_service_name(),
            output: default_output(),
        }
    }

    /// Build a configuration from `LOG_LEVEL`, `APP_ENV`, `APP_NAME` and
    /// `LOG_OUTPUT`. Unset or empty variables keep their defaults.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`Config::from_env`], reading variables through `lookup`.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str, default: String| {
            lookup(key).filter(|v| !v.is_empty()).unwrap_or(default)
        };
        Self {
            level: var("LOG_LEVEL", default_level()),
            environment: var("APP_ENV", default_environment()),
            service_name: var("APP_NAME", default_service_name()),
            output: var("LOG_OUTPUT", default_output()),
        }
    }

    /// Set log level
    pub fn with_level(mut self, level: impl Into<String>) -> Self {
        self.level = level.into();
        self
    }

    /// Set deployment environment
    pub fn with_environment(mut self, environment: impl Into<String>) -> Self {
        self.environment = environment.into();
        self
    }

    /// Set service name
    pub fn with_service_name(mut self, service_name: impl Into<String>) -> Self {
        self.service_name = service_name.into();
        self
    }

    /// Set output destination
    pub fn with_output(mut self, output: impl Into<String>) -> Self {
        self.output = output.into();
        self
    }

    /// The minimum level this configuration admits.
    pub fn threshold(&self) -> Level {
        Level::resolve(&self.level)
    }

    /// The encoder profile selected by the environment.
    pub fn profile(&self) -> EncoderProfile {
        EncoderProfile::for_environment(&self.environment)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new()
    }
}

fn default_level() -> String {
    "INFO".to_string()
}

fn default_environment() -> String {
    "development".to_string()
}

fn default_service_name() -> String {
    DEFAULT_SERVICE_NAME.to_string()
}

fn default_output() -> String {
    "stdout".to_string()
}
