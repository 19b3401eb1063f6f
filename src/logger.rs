//! The [`Logger`] handle.
//!
//! A logger pairs a private `tracing` dispatcher (threshold, encoder profile
//! and sink) with an ordered list of context fields. Handles are cheap to
//! clone and never change after construction: [`Logger::with_fields`] and
//! [`Logger::named`] return new handles sharing the same dispatcher.

use std::backtrace::Backtrace;
use std::panic::Location;
use std::sync::Arc;

use tracing::Dispatch;

use crate::encoder::{EncoderProfile, short_caller};
use crate::field::Field;
use crate::tracing_init::build_dispatch;
use crate::writer::Sink;
use crate::{Config, Error, Level, Result};

/// Emit one event through `tracing` at a level chosen at runtime.
macro_rules! emit_event {
    ($level:expr, $($fields:tt)*) => {
        match $level {
            Level::Debug => tracing::event!(tracing::Level::DEBUG, $($fields)*),
            Level::Info => tracing::event!(tracing::Level::INFO, $($fields)*),
            Level::Warn => tracing::event!(tracing::Level::WARN, $($fields)*),
            Level::Error | Level::Fatal => tracing::event!(tracing::Level::ERROR, $($fields)*),
        }
    };
}

struct Core {
    dispatch: Dispatch,
    sink: Sink,
    threshold: Level,
    profile: EncoderProfile,
    config: Config,
}

/// A structured, leveled logger.
///
/// Every record carries `service` and `environment` fields taken from the
/// [`Config`] the logger was built from, followed by any fields attached with
/// [`Logger::with_fields`], followed by the fields of the call itself.
#[derive(Clone)]
pub struct Logger {
    core: Arc<Core>,
    name: Option<Arc<str>>,
    fields: Arc<[Field]>,
}

impl Logger {
    /// Build a logger writing to the output named in `config`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Construction`] if the output cannot be opened.
    pub fn new(config: &Config) -> Result<Logger> {
        let sink = Sink::open(&config.output)?;
        Ok(Logger::with_sink(config, sink))
    }

    /// Build a logger writing to `sink`, ignoring `config.output`.
    pub fn with_sink(config: &Config, sink: Sink) -> Logger {
        let threshold = config.threshold();
        let profile = config.profile();
        let dispatch = build_dispatch(threshold, profile, sink.clone());
        let fields: Arc<[Field]> = Arc::from(vec![
            Field::string("service", config.service_name.as_str()),
            Field::string("environment", config.environment.as_str()),
        ]);

        Logger {
            core: Arc::new(Core {
                dispatch,
                sink,
                threshold,
                profile,
                config: config.clone(),
            }),
            name: None,
            fields,
        }
    }

    /// The default logger: INFO, development profile, default service name,
    /// standard output. Building it cannot fail.
    pub(crate) fn fallback() -> Logger {
        Logger::with_sink(&Config::default(), Sink::Stdout)
    }

    /// A logger that also attaches `fields` to every record.
    ///
    /// The new fields follow the inherited ones; keys are not deduplicated.
    /// `self` is left untouched.
    pub fn with_fields(&self, fields: &[Field]) -> Logger {
        let mut merged = Vec::with_capacity(self.fields.len() + fields.len());
        merged.extend_from_slice(&self.fields);
        merged.extend_from_slice(fields);
        Logger {
            core: Arc::clone(&self.core),
            name: self.name.clone(),
            fields: merged.into(),
        }
    }

    /// A logger with `name` appended to this logger's name, joined with `.`.
    pub fn named(&self, name: &str) -> Logger {
        let name = match (self.name.as_deref(), name) {
            (parent, "") => parent.map(Arc::from),
            (None, name) => Some(Arc::from(name)),
            (Some(parent), name) => Some(Arc::from(format!("{parent}.{name}"))),
        };
        Logger {
            core: Arc::clone(&self.core),
            name,
            fields: Arc::clone(&self.fields),
        }
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// Context fields attached to every record, in emission order.
    pub fn fields(&self) -> &[Field] {
        &self.fields
    }

    pub fn threshold(&self) -> Level {
        self.core.threshold
    }

    pub fn profile(&self) -> EncoderProfile {
        self.core.profile
    }

    /// The configuration this logger was built from.
    pub fn config(&self) -> &Config {
        &self.core.config
    }

    /// Whether a record at `level` would be written.
    pub fn enabled(&self, level: Level) -> bool {
        level >= self.core.threshold
    }

    /// Write a record at `level`.
    #[track_caller]
    pub fn log(&self, level: Level, message: &str, fields: &[Field]) {
        if !self.enabled(level) {
            return;
        }
        let location = Location::caller();
        let caller = short_caller(location.file(), location.line());
        let stacktrace = level
            .captures_stacktrace()
            .then(|| trim_own_frames(&Backtrace::force_capture().to_string()));

        let context = if fields.is_empty() {
            self.core.profile.encode_fields(&self.fields)
        } else {
            let mut all = Vec::with_capacity(self.fields.len() + fields.len());
            all.extend_from_slice(&self.fields);
            all.extend_from_slice(fields);
            self.core.profile.encode_fields(&all)
        };

        tracing::dispatcher::with_default(&self.core.dispatch, || {
            emit_event!(
                level,
                severity = level.as_str(),
                logger = self.name.as_deref(),
                caller = caller.as_str(),
                context = context.as_str(),
                stacktrace = stacktrace.as_deref(),
                message = message
            )
        });
    }

    #[track_caller]
    pub fn debug(&self, message: &str, fields: &[Field]) {
        self.log(Level::Debug, message, fields);
    }

    #[track_caller]
    pub fn info(&self, message: &str, fields: &[Field]) {
        self.log(Level::Info, message, fields);
    }

    #[track_caller]
    pub fn warn(&self, message: &str, fields: &[Field]) {
        self.log(Level::Warn, message, fields);
    }

    #[track_caller]
    pub fn error(&self, message: &str, fields: &[Field]) {
        self.log(Level::Error, message, fields);
    }

    /// Write a fatal record, flush, and exit the process with status 1.
    ///
    /// Reserved for startup failures and other unrecoverable conditions.
    #[track_caller]
    pub fn fatal(&self, message: &str, fields: &[Field]) -> ! {
        self.log(Level::Fatal, message, fields);
        let _ = self.sync();
        std::process::exit(1)
    }

    /// Flush buffered records to the sink.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Flush`] if the sink fails to flush.
    pub fn sync(&self) -> Result<()> {
        self.core.sink.flush().map_err(Error::Flush)
    }
}

/// Symbol prefixes of the frames between the capture and the caller.
const OWN_FRAME_PREFIXES: [&str; 4] = [
    "std::backtrace",
    "svclog::logger::Logger::",
    "svclog::global::",
    "<svclog::",
];

/// Drop the leading frames of a rendered backtrace that belong to the capture
/// itself or to the emission methods, so the trace starts at the call site.
///
/// The trace is returned whole when no frame outside this crate is found.
fn trim_own_frames(trace: &str) -> String {
    let lines: Vec<&str> = trace.lines().collect();
    let first_caller_frame = lines.iter().position(|line| {
        frame_symbol(line).is_some_and(|symbol| {
            !OWN_FRAME_PREFIXES
                .iter()
                .any(|prefix| symbol.starts_with(prefix))
        })
    });
    match first_caller_frame {
        Some(index) if index > 0 => lines[index..].join("\n"),
        _ => trace.to_string(),
    }
}

/// The symbol of a frame header line such as `  12: app::main`.
fn frame_symbol(line: &str) -> Option<&str> {
    let (number, symbol) = line.trim_start().split_once(": ")?;
    (!number.is_empty() && number.bytes().all(|b| b.is_ascii_digit())).then_some(symbol)
}

impl std::fmt::Debug for Logger {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Logger")
            .field("name", &self.name)
            .field("threshold", &self.core.threshold)
            .field("profile", &self.core.profile)
            .field("sink", &self.core.sink)
            .field("fields", &self.fields)
            .finish()
    }
}
