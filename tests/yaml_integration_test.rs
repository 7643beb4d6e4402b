//! YAML Configuration Integration Tests

#![cfg(feature = "yaml")]

mod common;

use common::*;
use optguard::{Configuration, Error, OptionsRegistry};

const APP_YAML: &str = r#"
MyApp:
  Settings:
    Database:
      Host: yaml.internal
      Port: "5434"
Mail:
  Sender: reports@example.com
  Recipients:
    - a@example.com
    - b@example.com
"#;

#[test]
fn test_yaml_binds_options() {
    let test_env = TestEnv::new();
    test_env.write("app.yaml", APP_YAML);

    let config = Configuration::builder()
        .base_path(test_env.path())
        .add_yaml_file("app.yaml", false)
        .build()
        .unwrap();

    let mut registry = OptionsRegistry::new();
    registry.add_validated_options::<DatabaseOptions, DatabaseValidator>(&config);
    registry.add_validated_options::<MailOptions, MailValidator>(&config);
    let provider = registry.build().unwrap();

    let db = provider.get::<DatabaseOptions>().unwrap();
    assert_eq!(db.host, "yaml.internal");
    assert_eq!(db.port, 5434);

    let mail = provider.get::<MailOptions>().unwrap();
    assert_eq!(mail.recipients, vec!["a@example.com", "b@example.com"]);
}

#[test]
fn test_yaml_sweep_reports_missing_recipients() {
    let test_env = TestEnv::new();
    test_env.write("app.yaml", "Mail:\n  Sender: reports@example.com\n");

    let config = Configuration::builder()
        .base_path(test_env.path())
        .add_yaml_file("app.yaml", false)
        .build()
        .unwrap();

    let mut registry = OptionsRegistry::new();
    registry.add_validated_options::<MailOptions, MailValidator>(&config);
    let provider = registry.build().unwrap();

    let report = provider.validate_options();
    assert_eq!(report.failures.len(), 1);
    assert!(report.failures[0].message.contains("'MailOptions:Recipients' must not be empty."));
}

#[test]
fn test_malformed_yaml() {
    let test_env = TestEnv::new();
    let file = test_env.write("broken.yaml", "Mail: [unclosed");

    let err = Configuration::builder()
        .add_yaml_file(file, false)
        .build()
        .unwrap_err();

    assert!(matches!(err, Error::Parse { format: "yaml", .. }));
}
