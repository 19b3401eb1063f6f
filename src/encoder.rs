//! Encoder profiles and the record formatter.
//!
//! Two profiles exist. [`EncoderProfile::Json`] writes one JSON object per line
//! for log pipelines; [`EncoderProfile::Console`] writes tab-separated,
//! colorized lines for humans. Both are plugged into `tracing-subscriber` as a
//! [`FormatEvent`] implementation, see [`RecordFormat`].

use std::fmt::{self, Write as _};
use std::time::Duration;

use time::OffsetDateTime;
use tracing::field::{Field as TracingField, Visit};
use tracing::{Event, Subscriber};
use tracing_subscriber::fmt::format::{FormatEvent, FormatFields, Writer};
use tracing_subscriber::fmt::FmtContext;
use tracing_subscriber::registry::LookupSpan;

use crate::field::{Field, Value};
use crate::Level;

/// Key names used for the fixed slots of a record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EncoderKeys {
    pub time: &'static str,
    pub level: &'static str,
    pub name: &'static str,
    pub caller: &'static str,
    pub message: &'static str,
    pub stacktrace: &'static str,
}

const JSON_KEYS: EncoderKeys = EncoderKeys {
    time: "timestamp",
    level: "level",
    name: "logger",
    caller: "caller",
    message: "message",
    stacktrace: "stacktrace",
};

const CONSOLE_KEYS: EncoderKeys = EncoderKeys {
    time: "T",
    level: "L",
    name: "N",
    caller: "C",
    message: "M",
    stacktrace: "S",
};

/// Output encoding of a logger.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EncoderProfile {
    /// Colorized, human-readable lines.
    Console,
    /// One JSON object per line.
    Json,
}

impl EncoderProfile {
    /// `"production"` (exact, case-sensitive) selects JSON; anything else the console.
    pub fn for_environment(environment: &str) -> Self {
        if environment == "production" {
            EncoderProfile::Json
        } else {
            EncoderProfile::Console
        }
    }

    pub fn keys(self) -> &'static EncoderKeys {
        match self {
            EncoderProfile::Console => &CONSOLE_KEYS,
            EncoderProfile::Json => &JSON_KEYS,
        }
    }

    /// Render context fields in this profile's encoding.
    ///
    /// JSON yields the members of an object without braces, ready to be spliced
    /// into the record. Console yields a brace-enclosed object, or nothing when
    /// there are no fields.
    pub fn encode_fields(self, fields: &[Field]) -> String {
        let mut out = String::new();
        let (separator, colon) = match self {
            EncoderProfile::Json => (",", ":"),
            EncoderProfile::Console => (", ", ": "),
        };
        for (i, field) in fields.iter().enumerate() {
            if i > 0 {
                out.push_str(separator);
            }
            push_json_str(&mut out, field.key());
            out.push_str(colon);
            self.encode_value(&mut out, field.value());
        }
        if self == EncoderProfile::Console && !out.is_empty() {
            out.insert(0, '{');
            out.push('}');
        }
        out
    }

    fn encode_value(self, out: &mut String, value: &Value) {
        match value {
            Value::Str(s) | Value::Error(s) => push_json_str(out, s),
            Value::I64(v) => {
                let _ = write!(out, "{v}");
            }
            Value::U64(v) => {
                let _ = write!(out, "{v}");
            }
            Value::F64(v) => push_float(out, *v),
            Value::Bool(v) => out.push_str(if *v { "true" } else { "false" }),
            Value::Duration(d) => match self {
                EncoderProfile::Json => push_float(out, d.as_secs_f64()),
                EncoderProfile::Console => push_json_str(out, &human_duration(*d)),
            },
            Value::Json(v) => {
                let _ = write!(out, "{v}");
            }
        }
    }

    fn format_record(self, record: &Record, out: &mut String) {
        match self {
            EncoderProfile::Json => self.format_json(record, out),
            EncoderProfile::Console => format_console(record, out),
        }
    }

    fn format_json(self, record: &Record, out: &mut String) {
        let keys = self.keys();
        out.push('{');
        push_json_member(out, keys.level, record.level.as_str());
        out.push(',');
        push_json_member(out, keys.time, &record.timestamp);
        if let Some(name) = record.name.as_deref() {
            out.push(',');
            push_json_member(out, keys.name, name);
        }
        if let Some(caller) = record.caller.as_deref() {
            out.push(',');
            push_json_member(out, keys.caller, caller);
        }
        out.push(',');
        push_json_member(out, keys.message, &record.message);
        if !record.context.is_empty() {
            out.push(',');
            out.push_str(&record.context);
        }
        if let Some(stack) = record.stacktrace.as_deref() {
            out.push(',');
            push_json_member(out, keys.stacktrace, stack);
        }
        out.push_str("}\n");
    }
}

fn format_console(record: &Record, out: &mut String) {
    out.push_str(&record.timestamp);
    out.push('\t');
    out.push_str(level_color(record.level));
    out.push_str(record.level.as_capital());
    out.push_str(RESET);
    if let Some(name) = record.name.as_deref() {
        out.push('\t');
        out.push_str(name);
    }
    if let Some(caller) = record.caller.as_deref() {
        out.push('\t');
        out.push_str(caller);
    }
    out.push('\t');
    out.push_str(&record.message);
    if !record.context.is_empty() {
        out.push('\t');
        out.push_str(&record.context);
    }
    if let Some(stack) = record.stacktrace.as_deref() {
        out.push('\n');
        out.push_str(stack.trim_end());
    }
    out.push('\n');
}

const RESET: &str = "\x1b[0m";

fn level_color(level: Level) -> &'static str {
    match level {
        Level::Debug => "\x1b[35m",
        Level::Info => "\x1b[34m",
        Level::Warn => "\x1b[33m",
        Level::Error | Level::Fatal => "\x1b[31m",
    }
}

fn push_json_str(out: &mut String, s: &str) {
    let _ = write!(out, "{}", serde_json::Value::from(s));
}

fn push_json_member(out: &mut String, key: &str, value: &str) {
    push_json_str(out, key);
    out.push(':');
    push_json_str(out, value);
}

fn push_float(out: &mut String, v: f64) {
    match serde_json::Number::from_f64(v) {
        Some(n) => {
            let _ = write!(out, "{n}");
        }
        None if v.is_nan() => push_json_str(out, "NaN"),
        None if v > 0.0 => push_json_str(out, "+Inf"),
        None => push_json_str(out, "-Inf"),
    }
}

/// Render a duration the way operators read it: `1.5s`, `150ms`, `2m30s`.
pub fn human_duration(d: Duration) -> String {
    let nanos = d.as_nanos();
    if nanos == 0 {
        return "0s".to_string();
    }
    if nanos < 1_000 {
        return format!("{nanos}ns");
    }
    if nanos < 1_000_000 {
        return format!("{}µs", decimal(nanos / 1_000, nanos % 1_000, 3));
    }
    if nanos < 1_000_000_000 {
        return format!("{}ms", decimal(nanos / 1_000_000, nanos % 1_000_000, 6));
    }

    let secs = d.as_secs();
    let (hours, minutes, seconds) = (secs / 3600, (secs % 3600) / 60, secs % 60);
    let seconds = decimal(seconds.into(), d.subsec_nanos().into(), 9);
    if hours > 0 {
        format!("{hours}h{minutes}m{seconds}s")
    } else if minutes > 0 {
        format!("{minutes}m{seconds}s")
    } else {
        format!("{seconds}s")
    }
}

fn decimal(whole: u128, fraction: u128, digits: usize) -> String {
    if fraction == 0 {
        return whole.to_string();
    }
    let fraction = format!("{fraction:0digits$}");
    format!("{whole}.{}", fraction.trim_end_matches('0'))
}

/// ISO-8601 timestamp with millisecond precision, `Z` for UTC.
pub(crate) fn timestamp() -> Result<String, time::error::Format> {
    let now = now();
    let base = now.format(time::macros::format_description!(
        "[year]-[month]-[day]T[hour]:[minute]:[second].[subsecond digits:3]"
    ))?;
    if now.offset().is_utc() {
        return Ok(format!("{base}Z"));
    }
    let offset = now.format(time::macros::format_description!(
        "[offset_hour sign:mandatory][offset_minute]"
    ))?;
    Ok(format!("{base}{offset}"))
}

#[cfg(feature = "local-time")]
fn now() -> OffsetDateTime {
    OffsetDateTime::now_local().unwrap_or_else(|_| OffsetDateTime::now_utc())
}

#[cfg(not(feature = "local-time"))]
fn now() -> OffsetDateTime {
    OffsetDateTime::now_utc()
}

/// Shorten a source path to its last directory and file name.
pub(crate) fn short_caller(file: &str, line: u32) -> String {
    let mut parts = file.rsplit(['/', '\\']);
    match (parts.next(), parts.next()) {
        (Some(file), Some(dir)) if !dir.is_empty() => format!("{dir}/{file}:{line}"),
        (Some(file), _) => format!("{file}:{line}"),
        (None, _) => format!("{file}:{line}"),
    }
}

/// A record as reassembled from the fields of a `tracing` event.
#[derive(Debug)]
struct Record {
    timestamp: String,
    level: Level,
    name: Option<String>,
    caller: Option<String>,
    message: String,
    context: String,
    stacktrace: Option<String>,
}

#[derive(Debug, Default)]
struct RecordVisitor {
    severity: Option<Level>,
    name: Option<String>,
    caller: Option<String>,
    message: String,
    context: String,
    stacktrace: Option<String>,
}

impl RecordVisitor {
    fn into_record(self, event_level: &tracing::Level, timestamp: String) -> Record {
        Record {
            timestamp,
            level: self
                .severity
                .unwrap_or_else(|| level_from_tracing(event_level)),
            name: self.name,
            caller: self.caller,
            message: self.message,
            context: self.context,
            stacktrace: self.stacktrace,
        }
    }
}

impl Visit for RecordVisitor {
    fn record_str(&mut self, field: &TracingField, value: &str) {
        match field.name() {
            "severity" => self.severity = Level::parse(value),
            "logger" => self.name = Some(value.to_string()),
            "caller" => self.caller = Some(value.to_string()),
            "message" => self.message = value.to_string(),
            "context" => self.context = value.to_string(),
            "stacktrace" => self.stacktrace = Some(value.to_string()),
            _ => {}
        }
    }

    fn record_debug(&mut self, field: &TracingField, value: &dyn fmt::Debug) {
        if field.name() == "message" {
            self.message = format!("{value:?}");
        }
    }
}

fn level_from_tracing(level: &tracing::Level) -> Level {
    match *level {
        tracing::Level::TRACE | tracing::Level::DEBUG => Level::Debug,
        tracing::Level::INFO => Level::Info,
        tracing::Level::WARN => Level::Warn,
        tracing::Level::ERROR => Level::Error,
    }
}

/// `tracing-subscriber` event formatter for one [`EncoderProfile`].
#[derive(Debug, Clone, Copy)]
pub struct RecordFormat {
    profile: EncoderProfile,
}

impl RecordFormat {
    pub fn new(profile: EncoderProfile) -> Self {
        Self { profile }
    }
}

impl<S, N> FormatEvent<S, N> for RecordFormat
where
    S: Subscriber + for<'a> LookupSpan<'a>,
    N: for<'a> FormatFields<'a> + 'static,
{
    fn format_event(
        &self,
        _ctx: &FmtContext<'_, S, N>,
        mut writer: Writer<'_>,
        event: &Event<'_>,
    ) -> fmt::Result {
        let mut visitor = RecordVisitor::default();
        event.record(&mut visitor);
        // A timestamp that cannot be formatted fails the record, which the fmt
        // layer reports on stderr.
        let timestamp = timestamp().map_err(|_| fmt::Error)?;
        let record = visitor.into_record(event.metadata().level(), timestamp);

        let mut line = String::new();
        self.profile.format_record(&record, &mut line);
        writer.write_str(&line)
    }
}
