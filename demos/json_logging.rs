//! JSON structured logging example.
//!
//! This example demonstrates the production profile, contextual loggers and
//! typed fields, emitted from several tokio tasks.

use std::time::Duration;

use svclog::{Field, Logger};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let logger = svclog::builder()
        .with_environment("production")
        .with_service_name("api-service")
        .with_level("debug")
        .build()?;

    logger.info(
        "User logged in",
        &[Field::int("user_id", 123), Field::string("action", "login")],
    );
    logger.warn("Resource not found", &[Field::int("error_code", 404)]);

    let mut tasks = Vec::new();
    for worker in 0..3 {
        let log: Logger = logger
            .named("worker")
            .with_fields(&[Field::int("worker", worker)]);
        tasks.push(tokio::spawn(async move {
            let started = std::time::Instant::now();
            tokio::time::sleep(Duration::from_millis(10 * (worker as u64 + 1))).await;
            log.debug("batch done", &[Field::duration("elapsed", started.elapsed())]);
        }));
    }
    for task in tasks {
        task.await?;
    }

    logger.error("Authentication failed", &[Field::string("component", "auth")]);
    logger.sync()?;
    Ok(())
}
