//! Process-wide default logger.
//!
//! Passing a [`Logger`] explicitly is preferred. For code that cannot, the
//! global slot holds one logger: [`init_global`] (or
//! [`LoggerBuilder::init`](crate::LoggerBuilder::init)) installs it, and
//! [`global`] returns it. If nothing was installed, the first call to
//! [`global`] builds the default logger (INFO, development profile,
//! [`DEFAULT_SERVICE_NAME`](crate::DEFAULT_SERVICE_NAME), standard output).
//! That happens exactly once, even when several threads race on first access.

use std::sync::{PoisonError, RwLock};

use once_cell::sync::OnceCell;

use crate::field::Field;
use crate::{Config, Logger, Result};

static GLOBAL: OnceCell<RwLock<Logger>> = OnceCell::new();

fn slot() -> &'static RwLock<Logger> {
    GLOBAL.get_or_init(|| RwLock::new(Logger::fallback()))
}

/// Build a logger from `config` and install it globally, replacing any
/// previously installed logger.
///
/// # Errors
///
/// Returns [`Error::Construction`](crate::Error::Construction) if the logger
/// cannot be built; the installed logger is then left unchanged.
pub fn init_global(config: &Config) -> Result<()> {
    set_global(Logger::new(config)?);
    Ok(())
}

/// Install `logger` globally, replacing any previously installed logger.
pub fn set_global(logger: Logger) {
    if let Err((slot, rejected)) = GLOBAL.try_insert(RwLock::new(logger)) {
        let logger = rejected.into_inner().unwrap_or_else(PoisonError::into_inner);
        *slot.write().unwrap_or_else(PoisonError::into_inner) = logger;
    }
}

/// The global logger, building the default one on first use.
pub fn global() -> Logger {
    slot()
        .read()
        .unwrap_or_else(PoisonError::into_inner)
        .clone()
}

/// Log at DEBUG through the global logger.
#[track_caller]
pub fn debug(message: &str, fields: &[Field]) {
    global().debug(message, fields);
}

/// Log at INFO through the global logger.
#[track_caller]
pub fn info(message: &str, fields: &[Field]) {
    global().info(message, fields);
}

/// Log at WARN through the global logger.
#[track_caller]
pub fn warn(message: &str, fields: &[Field]) {
    global().warn(message, fields);
}

/// Log at ERROR through the global logger.
#[track_caller]
pub fn error(message: &str, fields: &[Field]) {
    global().error(message, fields);
}

/// Log at FATAL through the global logger, flush, and exit with status 1.
#[track_caller]
pub fn fatal(message: &str, fields: &[Field]) -> ! {
    global().fatal(message, fields)
}

/// A logger derived from the global one with `fields` attached.
pub fn with_fields(fields: &[Field]) -> Logger {
    global().with_fields(fields)
}

/// Flush the global logger.
pub fn sync() -> Result<()> {
    global().sync()
}
