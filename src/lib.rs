//! # svclog
//!
//! An environment-aware structured logging facade for backend services.
//!
//! ## Features
//!
//! - Leveled logging (`DEBUG`, `INFO`, `WARN`, `ERROR`, `FATAL`) on top of `tracing`
//! - JSON records in production, colorized console lines everywhere else
//! - `service` and `environment` fields on every record
//! - Typed, ordered context fields and derived loggers
//! - Independent logger instances plus an optional process-wide default
//!
//! ## Example
//!
//! ```rust
//! use svclog::{Config, Field, Logger, Sink};
//!
//! let config = Config::new()
//!     .with_level("DEBUG")
//!     .with_environment("production")
//!     .with_service_name("api-service");
//! let (sink, buffer) = Sink::memory();
//! let logger = Logger::with_sink(&config, sink);
//!
//! let requests = logger.with_fields(&[Field::string("component", "http")]);
//! requests.info("application started", &[Field::string("version", "1.0.0")]);
//! logger.sync()?;
//!
//! assert!(buffer.contents().contains("\"component\":\"http\""));
//! # Ok::<(), svclog::Error>(())
//! ```

pub mod builder;
pub mod config;
pub mod encoder;
pub mod error;
pub mod field;
pub mod global;
pub mod level;
pub mod logger;
pub mod writer;

mod tracing_init;

pub use builder::LoggerBuilder;
pub use config::{Config, DEFAULT_SERVICE_NAME};
pub use encoder::{EncoderKeys, EncoderProfile};
pub use error::{Error, Result};
pub use field::{Field, Value};
pub use global::{
    debug, error, fatal, global, info, init_global, set_global, sync, warn, with_fields,
};
pub use level::Level;
pub use logger::Logger;
pub use writer::{MemoryBuffer, Sink};

/// Start configuring a logger.
pub fn builder() -> LoggerBuilder {
    LoggerBuilder::new()
}
