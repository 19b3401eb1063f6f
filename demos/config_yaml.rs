//! Example of loading logging configuration from a YAML document.
//!
//! This example demonstrates how to embed the logger configuration in an
//! application config file and build a logger from it.
//!
//! Run with:
//! ```bash
//! cargo run --example config_yaml
//! ```

use std::collections::HashMap;

use svclog::{Field, Logger};

const CONFIG: &str = r#"
server:
  port: 8080
log:
  level: debug
  environment: development
  service_name: config-demo
"#;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Parse the YAML configuration
    let root: HashMap<String, serde_yaml::Value> = serde_yaml::from_str(CONFIG)?;
    let config: svclog::Config = serde_yaml::from_value(root["log"].clone())?;

    let logger = Logger::new(&config)?;

    logger.debug("This is a debug message", &[]);
    logger.info("This is an info message", &[]);
    logger.info(
        "User performed an action",
        &[Field::string("user", "alice"), Field::string("action", "login")],
    );
    logger.warn(
        "Resource not found",
        &[Field::int("error_code", 404), Field::string("path", "/api/users")],
    );

    logger.sync()?;
    Ok(())
}
