use tracing::Dispatch;
use tracing_subscriber::layer::SubscriberExt;

use crate::encoder::{EncoderProfile, RecordFormat};
use crate::writer::Sink;
use crate::Level;

/// Build the `tracing` dispatcher backing one logger.
///
/// The dispatcher is private to the logger rather than installed as the
/// global default, so several loggers with different thresholds and profiles
/// coexist with whatever subscriber the application installs itself.
pub(crate) fn build_dispatch(threshold: Level, profile: EncoderProfile, sink: Sink) -> Dispatch {
    let fmt_layer = tracing_subscriber::fmt::layer()
        .event_format(RecordFormat::new(profile))
        .with_writer(sink)
        .log_internal_errors(true);

    let subscriber = tracing_subscriber::registry()
        .with(threshold.filter())
        .with(fmt_layer);

    Dispatch::new(subscriber)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dispatch_filters_below_threshold() {
        let (sink, buffer) = Sink::memory();
        let dispatch = build_dispatch(Level::Warn, EncoderProfile::Json, sink);

        tracing::dispatcher::with_default(&dispatch, || {
            tracing::info!(message = "quiet");
            tracing::warn!(message = "loud");
        });

        let lines = buffer.lines();
        assert_eq!(lines.len(), 1, "{lines:?}");
        assert!(lines[0].contains("\"message\":\"loud\""));
        assert!(lines[0].contains("\"level\":\"warn\""));
    }

    #[test]
    fn plain_tracing_events_are_formatted() {
        let (sink, buffer) = Sink::memory();
        let dispatch = build_dispatch(Level::Debug, EncoderProfile::Console, sink);

        tracing::dispatcher::with_default(&dispatch, || {
            tracing::debug!("formatted {}", 42);
        });

        let contents = buffer.contents();
        assert!(contents.contains("DEBUG"), "{contents}");
        assert!(contents.contains("\tformatted 42\n"), "{contents}");
    }
}
