//! Basic console logging example.
//!
//! This example demonstrates the simplest way to get a logger: read the
//! configuration from the environment and install it globally.
//!
//! Run with:
//! ```bash
//! LOG_LEVEL=debug cargo run --example basic
//! ```

use svclog::Field;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    svclog::init_global(&svclog::Config::from_env())?;

    svclog::debug("This is a debug message", &[]);
    svclog::info("This is an info message", &[Field::string("version", "1.0.0")]);
    svclog::warn("This is a warning message", &[]);
    svclog::error("This is an error message", &[]);

    let auth = svclog::with_fields(&[Field::string("component", "auth")]);
    auth.info("Authentication service started", &[]);

    svclog::sync()?;
    Ok(())
}
