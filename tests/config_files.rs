use std::collections::HashMap;

use svclog::{Config, EncoderProfile, Level};

#[test]
fn test_config_from_yaml_section() {
    let yaml = r#"
log:
  level: warn
  environment: production
  service_name: payments
"#;
    let root: HashMap<String, serde_yaml::Value> = serde_yaml::from_str(yaml).unwrap();
    let config: Config = serde_yaml::from_value(root["log"].clone()).unwrap();

    assert_eq!(config.threshold(), Level::Warn);
    assert_eq!(config.profile(), EncoderProfile::Json);
    assert_eq!(config.service_name, "payments");
    assert_eq!(config.output, "stdout");
}

#[test]
fn test_config_from_toml_uses_defaults() {
    let config: Config = toml::from_str(r#"output = "stderr""#).unwrap();

    assert_eq!(config.level, "INFO");
    assert_eq!(config.environment, "development");
    assert_eq!(config.service_name, svclog::DEFAULT_SERVICE_NAME);
    assert_eq!(config.output, "stderr");
}

#[test]
fn test_config_toml_round_trip() {
    let config = Config::new().with_level("debug").with_service_name("jobs");
    let text = toml::to_string(&config).unwrap();
    assert!(text.contains("service_name = \"jobs\""));
    assert_eq!(toml::from_str::<Config>(&text).unwrap(), config);
}
