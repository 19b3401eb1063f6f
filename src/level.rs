use std::fmt;

use tracing_subscriber::filter::LevelFilter;

/// Severity of a record, ordered from least to most severe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Level {
    /// Detailed diagnostics for development.
    Debug,
    /// Normal operational messages (the default threshold).
    Info,
    /// Something unexpected that the service recovered from.
    Warn,
    /// A failed operation. Records carry a stack trace.
    Error,
    /// Unrecoverable condition. Emitting at this level terminates the process.
    Fatal,
}

impl Level {
    /// Resolve a configured threshold name.
    ///
    /// Matching is case-insensitive against `DEBUG`, `INFO`, `WARN` and `ERROR`.
    /// Anything else, `FATAL` and the empty string included, resolves to
    /// [`Level::Info`].
    pub fn resolve(name: &str) -> Level {
        match Level::parse(name) {
            Some(Level::Fatal) | None => Level::Info,
            Some(level) => level,
        }
    }

    /// Parse any level name, case-insensitively.
    pub fn parse(name: &str) -> Option<Level> {
        let level = match name.to_ascii_uppercase().as_str() {
            "DEBUG" => Level::Debug,
            "INFO" => Level::Info,
            "WARN" => Level::Warn,
            "ERROR" => Level::Error,
            "FATAL" => Level::Fatal,
            _ => return None,
        };
        Some(level)
    }

    /// Lowercase name, as rendered by the JSON encoder.
    pub fn as_str(self) -> &'static str {
        match self {
            Level::Debug => "debug",
            Level::Info => "info",
            Level::Warn => "warn",
            Level::Error => "error",
            Level::Fatal => "fatal",
        }
    }

    /// Uppercase name, as rendered by the console encoder.
    pub fn as_capital(self) -> &'static str {
        match self {
            Level::Debug => "DEBUG",
            Level::Info => "INFO",
            Level::Warn => "WARN",
            Level::Error => "ERROR",
            Level::Fatal => "FATAL",
        }
    }

    /// Whether records at this level carry a captured stack trace.
    pub fn captures_stacktrace(self) -> bool {
        self >= Level::Error
    }

    /// The `tracing-subscriber` filter admitting this level and above.
    ///
    /// `tracing` has no fatal level, so fatal records travel as errors.
    pub(crate) fn filter(self) -> LevelFilter {
        match self {
            Level::Debug => LevelFilter::DEBUG,
            Level::Info => LevelFilter::INFO,
            Level::Warn => LevelFilter::WARN,
            Level::Error | Level::Fatal => LevelFilter::ERROR,
        }
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_capital())
    }
}
