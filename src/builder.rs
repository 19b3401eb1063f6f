//! Builder pattern for constructing loggers.
//!
//! This module provides a convenient builder API for configuring a logger and
//! either using it directly or installing it as the global logger.
//!
//! # Example
//!
//! ```rust
//! use svclog::Sink;
//!
//! let (sink, buffer) = Sink::memory();
//! let logger = svclog::builder()
//!     .with_level("debug")
//!     .with_environment("production")
//!     .with_service_name("api")
//!     .with_sink(sink)
//!     .build()
//!     .expect("Failed to build logger");
//!
//! logger.debug("cache warmed", &[]);
//! assert!(buffer.contents().contains("\"service\":\"api\""));
//! ```

use crate::global::set_global;
use crate::writer::Sink;
use crate::{Config, Logger, Result};

/// A builder for configuring and constructing a [`Logger`].
#[derive(Debug, Clone)]
pub struct LoggerBuilder {
    config: Config,
    sink: Option<Sink>,
}

impl LoggerBuilder {
    /// Create a new LoggerBuilder with default configuration.
    pub fn new() -> Self {
        Self::from_config(Config::new())
    }

    /// Create a LoggerBuilder from an existing configuration.
    pub fn from_config(config: Config) -> Self {
        Self { config, sink: None }
    }

    /// Set the minimum level ("DEBUG", "INFO", "WARN", "ERROR").
    pub fn with_level(mut self, level: impl Into<String>) -> Self {
        self.config = self.config.with_level(level);
        self
    }

    /// Set the environment; "production" selects JSON output.
    pub fn with_environment(mut self, environment: impl Into<String>) -> Self {
        self.config = self.config.with_environment(environment);
        self
    }

    /// Set the service name attached to every record.
    pub fn with_service_name(mut self, service_name: impl Into<String>) -> Self {
        self.config = self.config.with_service_name(service_name);
        self
    }

    /// Write to "stdout", "stderr" or a file path.
    pub fn with_output(mut self, output: impl Into<String>) -> Self {
        self.config = self.config.with_output(output);
        self
    }

    /// Write to an already constructed sink. Takes precedence over the output.
    pub fn with_sink(mut self, sink: Sink) -> Self {
        self.sink = Some(sink);
        self
    }

    /// The configuration built so far.
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Construct the logger.
    ///
    /// # Errors
    ///
    /// Returns an error if the configured output cannot be opened.
    pub fn build(self) -> Result<Logger> {
        match self.sink {
            Some(sink) => Ok(Logger::with_sink(&self.config, sink)),
            None => Logger::new(&self.config),
        }
    }

    /// Construct the logger and install it as the global logger, replacing
    /// any previous one.
    pub fn init(self) -> Result<()> {
        set_global(self.build()?);
        Ok(())
    }
}

impl Default for LoggerBuilder {
    fn default() -> Self {
        Self::new()
    }
}
