use std::io::{self, Write};
use std::time::Duration;

use svclog::{Config, EncoderProfile, Error, Field, Logger, MemoryBuffer, Sink};

fn memory_logger(config: &Config) -> (Logger, MemoryBuffer) {
    let (sink, buffer) = Sink::memory();
    (Logger::with_sink(config, sink), buffer)
}

fn json_records(buffer: &MemoryBuffer) -> Vec<serde_json::Value> {
    buffer
        .lines()
        .iter()
        .map(|line| serde_json::from_str(line).expect("valid JSON record"))
        .collect()
}

#[test]
fn test_production_info_record() {
    let config = Config::new()
        .with_level("DEBUG")
        .with_environment("production")
        .with_service_name("svc");
    let (logger, buffer) = memory_logger(&config);

    logger.info("started", &[Field::string("version", "1.0.0")]);

    let records = json_records(&buffer);
    assert_eq!(records.len(), 1);
    let record = &records[0];
    assert_eq!(record["level"], "info");
    assert_eq!(record["message"], "started");
    assert_eq!(record["service"], "svc");
    assert_eq!(record["environment"], "production");
    assert_eq!(record["version"], "1.0.0");
    assert!(record["timestamp"].is_string());
    assert!(
        record["caller"]
            .as_str()
            .unwrap()
            .starts_with("tests/logger_output_tests.rs:")
    );
    assert!(record.get("stacktrace").is_none());
    assert!(record.get("logger").is_none());
}

#[test]
fn test_production_error_has_stacktrace() {
    let config = Config::new().with_environment("production");
    let (logger, buffer) = memory_logger(&config);

    logger.error("write failed", &[]);

    let records = json_records(&buffer);
    assert_eq!(records.len(), 1);
    assert_eq!(records[0]["level"], "error");
    let stacktrace = records[0]["stacktrace"].as_str().expect("stacktrace");
    assert!(!stacktrace.contains("svclog::logger::Logger::error"));
}

#[test]
fn test_development_error_threshold_scenario() {
    let config = Config::new()
        .with_level("ERROR")
        .with_environment("development")
        .with_service_name("x");
    let (logger, buffer) = memory_logger(&config);

    logger.warn("disk almost full", &[]);
    assert!(buffer.is_empty(), "warn must be filtered: {}", buffer.contents());

    logger.error("disk full", &[]);
    let contents = buffer.contents();
    let mut lines = contents.lines();
    let first = lines.next().expect("record line");
    assert!(first.contains("\x1b[31mERROR\x1b[0m"), "{first}");
    assert!(first.contains("\tdisk full\t"), "{first}");
    assert!(first.contains(r#"{"service": "x", "environment": "development"}"#));
    assert!(lines.next().is_some(), "stack trace expected after the record line");
    assert!(serde_json::from_str::<serde_json::Value>(first).is_err());
}

#[test]
fn test_level_filter_warn() {
    let (logger, buffer) = memory_logger(&Config::new().with_level("warn"));

    logger.debug("d", &[]);
    logger.info("i", &[]);
    assert!(buffer.is_empty());

    logger.warn("w", &[]);
    logger.error("e", &[]);
    let contents = buffer.contents();
    assert!(contents.contains("\tw\t"));
    assert!(contents.contains("\te\t"));
}

#[test]
fn test_unknown_level_behaves_as_info() {
    let (logger, buffer) = memory_logger(&Config::new().with_level("chatty"));

    logger.debug("hidden", &[]);
    logger.info("shown", &[]);

    assert_eq!(buffer.lines().len(), 1);
    assert!(buffer.contents().contains("shown"));
}

#[test]
fn test_identity_fields_survive_derivation() {
    let config = Config::new()
        .with_environment("production")
        .with_service_name("billing");
    let (logger, buffer) = memory_logger(&config);

    let derived = logger
        .with_fields(&[Field::string("component", "invoices")])
        .named("worker")
        .with_fields(&[Field::int("shard", 3)]);
    derived.info("tick", &[]);

    let record = &json_records(&buffer)[0];
    assert_eq!(record["service"], "billing");
    assert_eq!(record["environment"], "production");
    assert_eq!(record["component"], "invoices");
    assert_eq!(record["shard"], 3);
    assert_eq!(record["logger"], "worker");
}

#[test]
fn test_derivation_does_not_mutate_parent() {
    let (parent, buffer) = memory_logger(&Config::new().with_environment("production"));

    let child = parent.with_fields(&[Field::string("request_id", "abc123")]);
    child.info("child", &[]);
    parent.info("parent", &[]);

    let records = json_records(&buffer);
    assert_eq!(records[0]["request_id"], "abc123");
    assert!(records[1].get("request_id").is_none());
    assert_eq!(records[1]["message"], "parent");
}

#[test]
fn test_field_order_is_preserved() {
    let (logger, buffer) = memory_logger(&Config::new().with_environment("production"));

    logger
        .with_fields(&[Field::string("a", "1")])
        .with_fields(&[Field::string("b", "2")])
        .info("ordered", &[Field::string("c", "3"), Field::string("a", "4")]);

    let line = buffer.contents();
    let positions: Vec<usize> = [
        r#""service":"#,
        r#""environment":"#,
        r#""a":"1""#,
        r#""b":"2""#,
        r#""c":"3""#,
        r#""a":"4""#,
    ]
    .iter()
    .map(|needle| line.find(needle).unwrap_or_else(|| panic!("{needle} missing in {line}")))
    .collect();
    let mut sorted = positions.clone();
    sorted.sort_unstable();
    assert_eq!(positions, sorted, "{line}");
}

#[test]
fn test_durations_per_profile() {
    let elapsed = [Field::duration("elapsed", Duration::from_millis(1500))];

    let (json, json_buffer) = memory_logger(&Config::new().with_environment("production"));
    json.info("done", &elapsed);
    assert_eq!(json_records(&json_buffer)[0]["elapsed"], 1.5);

    let (console, console_buffer) = memory_logger(&Config::new());
    console.info("done", &elapsed);
    assert!(console_buffer.contents().contains(r#""elapsed": "1.5s""#));
}

#[test]
fn test_profile_selection_is_exact() {
    let (logger, buffer) = memory_logger(&Config::new().with_environment("Production"));
    assert_eq!(logger.profile(), EncoderProfile::Console);
    logger.info("hello", &[]);
    assert!(serde_json::from_str::<serde_json::Value>(buffer.contents().trim()).is_err());
}

#[test]
fn test_file_output_after_sync() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("service.log");
    let config = Config::new()
        .with_environment("production")
        .with_output(path.to_str().unwrap());

    let logger = Logger::new(&config).expect("file logger");
    logger.info("persisted", &[Field::bool("durable", true)]);
    logger.sync().expect("sync");

    let contents = std::fs::read_to_string(&path).expect("read log file");
    let record: serde_json::Value = serde_json::from_str(contents.trim()).unwrap();
    assert_eq!(record["message"], "persisted");
    assert_eq!(record["durable"], true);
    assert!(!contents.contains('\x1b'));
}

#[test]
fn test_unopenable_output_fails_construction() {
    let dir = tempfile::tempdir().expect("tempdir");
    let config = Config::new().with_output(dir.path().to_str().unwrap());
    assert!(matches!(Logger::new(&config), Err(Error::Construction(_))));
}

struct ClosedPipe;

impl Write for ClosedPipe {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Err(io::Error::new(io::ErrorKind::BrokenPipe, "sink closed"))
    }
}

#[test]
fn test_sync_reports_flush_failure() {
    let logger = Logger::with_sink(&Config::new(), Sink::from_writer(ClosedPipe));
    logger.info("lost", &[]);
    match logger.sync() {
        Err(Error::Flush(e)) => assert_eq!(e.kind(), io::ErrorKind::BrokenPipe),
        other => panic!("expected flush error, got {other:?}"),
    }
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_emission_keeps_lines_whole() {
    let (logger, buffer) = memory_logger(&Config::new().with_environment("production"));

    let mut handles = Vec::new();
    for task in 0..8 {
        let logger = logger.with_fields(&[Field::int("task", task)]);
        handles.push(tokio::spawn(async move {
            for i in 0..25 {
                logger.info("tick", &[Field::int("i", i)]);
            }
        }));
    }
    for handle in handles {
        handle.await.expect("task");
    }

    let records = json_records(&buffer);
    assert_eq!(records.len(), 200);
    assert!(records.iter().all(|r| r["service"] == "gath-stack"));
}
