//! Registration, key resolution and eager/lazy validation

mod common;

use common::*;
use optguard::{
    Configuration, Error, Options, OptionsRegistry, RuleSet, ValidationContext, ValidationResult,
    Validator,
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::sync::atomic::{AtomicUsize, Ordering};

// =============================================================================
// Key Resolution
// =============================================================================

#[test]
fn test_annotated_key_reads_nested_section() {
    let mut registry = OptionsRegistry::new();
    registry.add_validated_options::<DatabaseOptions, DatabaseValidator>(&valid_config());
    let provider = registry.build().unwrap();

    let db = provider.get::<DatabaseOptions>().unwrap();
    assert_eq!(db.host, "db.internal");
    assert_eq!(db.port, 6432);
    assert_eq!(db.pool_size, 20);
}

#[test]
fn test_unannotated_key_is_type_name() {
    assert_eq!(CacheOptions::configuration_key(), "CacheOptions");

    let mut registry = OptionsRegistry::new();
    registry.add_validated_options::<CacheOptions, CacheValidator>(&valid_config());
    let provider = registry.build().unwrap();

    let cache = provider.get::<CacheOptions>().unwrap();
    assert_eq!(cache.ttl_secs, 300);
    assert_eq!(cache.region, "eu-west-1");
}

#[test]
fn test_type_name_is_not_transformed() {
    // Similar names must not be picked up
    let config = Configuration::from_value(json!({
        "Cache": {"TtlSecs": 1, "Region": "a"},
        "CacheOption": {"TtlSecs": 2, "Region": "b"}
    }));

    let mut registry = OptionsRegistry::new();
    registry
        .add_options::<CacheOptions>()
        .bind(config.section(CacheOptions::configuration_key()));
    let provider = registry.build().unwrap();

    assert_eq!(*provider.get::<CacheOptions>().unwrap(), CacheOptions::default());
}

#[test]
fn test_section_lookup_ignores_case() {
    let config = Configuration::from_value(json!({
        "myapp": {"settings": {"database": {"host": "lower.internal", "port": 2000}}}
    }));

    let mut registry = OptionsRegistry::new();
    registry.add_validated_options::<DatabaseOptions, DatabaseValidator>(&config);
    let provider = registry.build().unwrap();

    let db = provider.get::<DatabaseOptions>().unwrap();
    assert_eq!(db.host, "lower.internal");
    assert_eq!(db.port, 2000);
}

#[test]
fn test_missing_section_binds_defaults() {
    let mut registry = OptionsRegistry::new();
    registry.add_validated_options::<DatabaseOptions, DatabaseValidator>(&Configuration::default());
    let provider = registry.build().unwrap();

    assert_eq!(*provider.get::<DatabaseOptions>().unwrap(), DatabaseOptions::default());
}

#[test]
fn test_configurator_registration() {
    let mut registry = OptionsRegistry::new();
    registry.add_validated_options_with::<MailOptions, MailValidator, _>(|mail| {
        mail.sender = "alerts@example.com".into();
        mail.recipients = vec!["oncall@example.com".into()];
    });
    let provider = registry.build().unwrap();

    let mail = provider.get::<MailOptions>().unwrap();
    assert_eq!(mail.sender, "alerts@example.com");
    assert_eq!(mail.recipients.len(), 1);
}

#[test]
fn test_sources_apply_in_registration_order() {
    let mut registry = OptionsRegistry::new();
    registry
        .add_validated_options::<DatabaseOptions, DatabaseValidator>(&valid_config())
        .configure(|db| db.pool_size *= 2);
    let provider = registry.build().unwrap();

    assert_eq!(provider.get::<DatabaseOptions>().unwrap().pool_size, 40);
}

// =============================================================================
// Validator Binding
// =============================================================================

static COUNTED_CALLS: AtomicUsize = AtomicUsize::new(0);

#[derive(Default, Serialize, Deserialize)]
struct Counted {
    value: u32,
}

impl Options for Counted {}

#[derive(Default)]
struct CountingValidator;

impl Validator<Counted> for CountingValidator {
    fn validate(&self, _instance: &Counted, _ctx: &ValidationContext<'_>) -> ValidationResult {
        COUNTED_CALLS.fetch_add(1, Ordering::SeqCst);
        ValidationResult::default()
    }
}

#[test]
fn test_same_validator_twice_runs_once() {
    let config = Configuration::from_value(json!({"Counted": {"Value": 3}}));

    let mut registry = OptionsRegistry::new();
    registry.add_validated_options::<Counted, CountingValidator>(&config);
    registry.add_validator::<Counted, CountingValidator>();
    registry
        .add_options::<Counted>()
        .validate_with_instance(CountingValidator);
    assert_eq!(registry.validator_count::<Counted>(), 1);

    let provider = registry.build().unwrap();
    assert_eq!(provider.get::<Counted>().unwrap().value, 3);
    assert_eq!(COUNTED_CALLS.load(Ordering::SeqCst), 1);
}

#[test]
fn test_validator_without_source_still_runs() {
    #[derive(Debug, Default, Serialize, Deserialize)]
    struct Bare {
        name: String,
    }
    impl Options for Bare {}

    struct BareValidator(RuleSet<Bare>);
    impl Default for BareValidator {
        fn default() -> Self {
            Self(RuleSet::<Bare>::new().rule_for("Name", |b| &b.name, |r| r.not_empty()))
        }
    }
    impl Validator<Bare> for BareValidator {
        fn validate(&self, b: &Bare, ctx: &ValidationContext<'_>) -> ValidationResult {
            self.0.validate(b, ctx)
        }
    }

    let mut registry = OptionsRegistry::new();
    registry.add_validator::<Bare, BareValidator>();
    let provider = registry.build().unwrap();

    assert!(provider.registered_types().is_empty());
    let err = provider.get::<Bare>().unwrap_err();
    assert_eq!(err.failures(), vec!["'Name' must not be empty."]);
}

// =============================================================================
// Eager and Lazy Validation
// =============================================================================

#[test]
fn test_lazy_failure_surfaces_at_access() {
    let config = Configuration::from_value(json!({"CacheOptions": {"TtlSecs": 0}}));

    let mut registry = OptionsRegistry::new();
    registry.add_validated_options::<CacheOptions, CacheValidator>(&config);
    let provider = registry.build().expect("lazy registrations do not fail build");

    let err = provider.get::<CacheOptions>().unwrap_err();
    assert!(err.is_validation_error());
    assert_eq!(
        err.to_string(),
        "Validation failed for 'CacheOptions': 'TtlSecs' must be greater than '0'.; 'Region' must not be empty."
    );
}

#[test]
fn test_validate_on_start_aborts_build() {
    let config = Configuration::from_value(json!({
        "MyApp": {"Settings": {"Database": {"Host": "", "Port": 80}}},
        "CacheOptions": {"TtlSecs": 10, "Region": "us"}
    }));

    let mut registry = OptionsRegistry::new();
    registry
        .add_validated_options::<DatabaseOptions, DatabaseValidator>(&config)
        .validate_on_start();
    registry
        .add_validated_options::<CacheOptions, CacheValidator>(&config)
        .validate_on_start();
    registry.add_validated_options::<MailOptions, MailValidator>(&config);

    let err = registry.build().unwrap_err();
    match &err {
        Error::StartupValidation { errors } => {
            assert_eq!(errors.len(), 1);
            assert_eq!(
                errors[0].failures(),
                vec![
                    "'Host' must not be empty.",
                    "'Port' must be between 1024 and 65535. You entered 80.",
                ]
            );
        }
        other => panic!("unexpected error: {other}"),
    }
    assert!(err.is_validation_error());
}

#[test]
fn test_validate_on_start_caches_valid_values() {
    let mut registry = OptionsRegistry::new();
    registry
        .add_validated_options::<DatabaseOptions, DatabaseValidator>(&valid_config())
        .validate_on_start();
    let provider = registry.build().unwrap();

    let first = provider.get::<DatabaseOptions>().unwrap();
    let second = provider.get::<DatabaseOptions>().unwrap();
    assert!(std::sync::Arc::ptr_eq(&first, &second));
}

#[test]
fn test_bind_error_is_reported_with_section_key() {
    let config = Configuration::from_value(json!({
        "MyApp": {"Settings": {"Database": {"Port": "not-a-number"}}}
    }));

    let mut registry = OptionsRegistry::new();
    registry
        .add_validated_options::<DatabaseOptions, DatabaseValidator>(&config)
        .validate_on_start();

    match registry.build().unwrap_err() {
        Error::StartupValidation { errors } => match &errors[0] {
            Error::Bind { key, type_name, .. } => {
                assert_eq!(key, "MyApp:Settings:Database");
                assert_eq!(*type_name, "DatabaseOptions");
            }
            other => panic!("unexpected error: {other}"),
        },
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn test_delegate_validation_message() {
    let mut registry = OptionsRegistry::new();
    registry
        .add_validated_options::<DatabaseOptions, DatabaseValidator>(&valid_config())
        .validate(|db| db.pool_size <= 16, "Pool size above 16 is not supported");
    let provider = registry.build().unwrap();

    let err = provider.get::<DatabaseOptions>().unwrap_err();
    assert_eq!(err.failures(), vec!["Pool size above 16 is not supported"]);
}
