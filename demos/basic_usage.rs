// Basic usage example for optguard
//
// Run with: RUST_LOG=debug cargo run --example basic_usage

use optguard::{
    Configuration, Options, OptionsRegistry, RuleSet, ValidationContext, ValidationResult,
    Validator,
};
use regex::Regex;
use serde::{Deserialize, Serialize};

// Define your options types
#[derive(Debug, Clone, Serialize, Deserialize)]
struct DatabaseOptions {
    host: String,
    port: u16,
    pool_size: u32,
}

impl Default for DatabaseOptions {
    fn default() -> Self {
        Self {
            host: "localhost".into(),
            port: 5432,
            pool_size: 10,
        }
    }
}

impl Options for DatabaseOptions {
    const KEY: Option<&'static str> = Some("MyApp:Settings:Database");
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct MailOptions {
    sender: String,
    recipients: Vec<String>,
}

// No key: binds from the "MailOptions" section
impl Options for MailOptions {}

// Validators
struct DatabaseValidator(RuleSet<DatabaseOptions>);

impl Default for DatabaseValidator {
    fn default() -> Self {
        Self(
            RuleSet::<DatabaseOptions>::new()
                .rule_for("Host", |o| &o.host, |r| r.not_empty())
                .rule_for("Port", |o| &o.port, |r| r.inclusive_between(1024, 65535))
                .rule_for("PoolSize", |o| &o.pool_size, |r| {
                    r.greater_than(0).less_than_or_equal(100)
                }),
        )
    }
}

impl Validator<DatabaseOptions> for DatabaseValidator {
    fn validate(&self, o: &DatabaseOptions, ctx: &ValidationContext<'_>) -> ValidationResult {
        self.0.validate(o, ctx)
    }
}

struct MailValidator(RuleSet<MailOptions>);

impl Default for MailValidator {
    fn default() -> Self {
        let email = Regex::new(r"^[^@\s]+@[^@\s]+$").expect("valid email pattern");
        Self(
            RuleSet::<MailOptions>::new()
                .rule_for("Sender", |o| &o.sender, |r| {
                    r.not_empty()
                        .matches(email)
                        .with_message("'{PropertyName}' must be an email address.")
                })
                .rule_for("Recipients", |o| &o.recipients, |r| r.not_empty()),
        )
    }
}

impl Validator<MailOptions> for MailValidator {
    fn validate(&self, o: &MailOptions, ctx: &ValidationContext<'_>) -> ValidationResult {
        self.0.validate(o, ctx)
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    println!("📦 optguard Basic Usage Example\n");

    // Layer configuration: in-memory defaults, then environment overrides
    let config = Configuration::builder()
        .add_in_memory([
            ("MyApp:Settings:Database:Host", "db.internal"),
            ("MyApp:Settings:Database:Port", "6432"),
            ("MailOptions:Sender", "not-an-address"),
        ])
        .add_env_vars("OPTGUARD_")
        .build()?;

    let mut registry = OptionsRegistry::new();
    registry
        .add_validated_options::<DatabaseOptions, DatabaseValidator>(&config)
        .validate_on_start();
    registry.add_validated_options::<MailOptions, MailValidator>(&config);

    // Database is valid, so build succeeds; mail is only checked lazily
    let provider = registry.build()?;

    let db = provider.get::<DatabaseOptions>()?;
    println!("✅ Database options: {db:?}\n");

    // The sweep logs every failing type and keeps going
    println!("🔍 Running startup sweep...");
    let report = provider.validate_options();
    println!("{}\n", serde_json::to_string_pretty(&report)?);

    // Lazy access reports the same failure with bare member names
    match provider.get::<MailOptions>() {
        Ok(mail) => println!("✅ Mail options: {mail:?}"),
        Err(e) => println!("❌ {e}"),
    }

    Ok(())
}
