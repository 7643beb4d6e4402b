//! Common test utilities for optguard integration tests
//!
//! Provides shared options types, validators, configuration helpers and a
//! capturing logger.

#![allow(dead_code)]

use log::{Level, LevelFilter, Log, Metadata, Record};
use optguard::{
    Configuration, Options, RuleSet, ValidationContext, ValidationResult, Validator,
};
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use std::path::PathBuf;
use std::sync::{Mutex, Once};
use tempfile::TempDir;

// =============================================================================
// Test Options Types
// =============================================================================

/// Annotated with a nested key
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DatabaseOptions {
    pub host: String,
    pub port: u16,
    pub pool_size: u32,
}

impl Default for DatabaseOptions {
    fn default() -> Self {
        Self {
            host: "localhost".to_string(),
            port: 5432,
            pool_size: 10,
        }
    }
}

impl Options for DatabaseOptions {
    const KEY: Option<&'static str> = Some("MyApp:Settings:Database");
}

/// Not annotated: binds from the "CacheOptions" section
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct CacheOptions {
    pub ttl_secs: u64,
    pub region: String,
}

impl Options for CacheOptions {}

/// Annotated with a simple key
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct MailOptions {
    pub sender: String,
    pub recipients: Vec<String>,
}

impl Options for MailOptions {
    const KEY: Option<&'static str> = Some("Mail");
}

// =============================================================================
// Validators
// =============================================================================

pub struct DatabaseValidator(RuleSet<DatabaseOptions>);

impl Default for DatabaseValidator {
    fn default() -> Self {
        Self(
            RuleSet::<DatabaseOptions>::new()
                .rule_for("Host", |o| &o.host, |r| r.not_empty())
                .rule_for("Port", |o| &o.port, |r| r.inclusive_between(1024, 65535))
                .rule_for("PoolSize", |o| &o.pool_size, |r| r.greater_than(0)),
        )
    }
}

impl Validator<DatabaseOptions> for DatabaseValidator {
    fn validate(&self, instance: &DatabaseOptions, ctx: &ValidationContext<'_>) -> ValidationResult {
        self.0.validate(instance, ctx)
    }
}

pub struct CacheValidator(RuleSet<CacheOptions>);

impl Default for CacheValidator {
    fn default() -> Self {
        Self(
            RuleSet::<CacheOptions>::new()
                .rule_for("TtlSecs", |o| &o.ttl_secs, |r| r.greater_than(0))
                .rule_for("Region", |o| &o.region, |r| r.not_empty()),
        )
    }
}

impl Validator<CacheOptions> for CacheValidator {
    fn validate(&self, instance: &CacheOptions, ctx: &ValidationContext<'_>) -> ValidationResult {
        self.0.validate(instance, ctx)
    }
}

pub struct MailValidator(RuleSet<MailOptions>);

impl Default for MailValidator {
    fn default() -> Self {
        Self(
            RuleSet::<MailOptions>::new()
                .rule_for("Sender", |o| &o.sender, |r| r.not_empty())
                .rule_for("Recipients", |o| &o.recipients, |r| r.not_empty()),
        )
    }
}

impl Validator<MailOptions> for MailValidator {
    fn validate(&self, instance: &MailOptions, ctx: &ValidationContext<'_>) -> ValidationResult {
        self.0.validate(instance, ctx)
    }
}

// =============================================================================
// Configuration Helpers
// =============================================================================

/// Configuration in which every fixture type is valid
pub fn valid_tree() -> Value {
    json!({
        "MyApp": {
            "Settings": {
                "Database": {"Host": "db.internal", "Port": 6432, "PoolSize": 20}
            }
        },
        "CacheOptions": {"TtlSecs": 300, "Region": "eu-west-1"},
        "Mail": {"Sender": "noreply@example.com", "Recipients": ["ops@example.com"]}
    })
}

pub fn valid_config() -> Configuration {
    Configuration::from_value(valid_tree())
}

/// Temporary directory holding configuration files
pub struct TestEnv {
    pub temp_dir: TempDir,
}

impl TestEnv {
    pub fn new() -> Self {
        Self {
            temp_dir: TempDir::new().expect("Failed to create temp dir"),
        }
    }

    pub fn path(&self) -> PathBuf {
        self.temp_dir.path().to_path_buf()
    }

    /// Write `content` to `name` inside the temp dir and return the full path
    pub fn write(&self, name: &str, content: &str) -> PathBuf {
        let path = self.temp_dir.path().join(name);
        std::fs::write(&path, content).expect("Failed to write config file");
        path
    }
}

// =============================================================================
// Log Capture
// =============================================================================

static CAPTURED: Mutex<Vec<(Level, String)>> = Mutex::new(Vec::new());
static INIT: Once = Once::new();
static LOGGER: CaptureLogger = CaptureLogger;

struct CaptureLogger;

impl Log for CaptureLogger {
    fn enabled(&self, _metadata: &Metadata) -> bool {
        true
    }

    fn log(&self, record: &Record) {
        if let Ok(mut captured) = CAPTURED.lock() {
            captured.push((record.level(), record.args().to_string()));
        }
    }

    fn flush(&self) {}
}

/// Install the capturing logger for this test binary
pub fn init_capture() {
    INIT.call_once(|| {
        log::set_logger(&LOGGER).expect("logger already installed");
        log::set_max_level(LevelFilter::Trace);
    });
}

/// Captured messages at `level` containing `needle`.
///
/// Tests in one binary share the logger, so filter on something unique.
pub fn captured(level: Level, needle: &str) -> Vec<String> {
    CAPTURED
        .lock()
        .map(|captured| {
            captured
                .iter()
                .filter(|(l, msg)| *l == level && msg.contains(needle))
                .map(|(_, msg)| msg.clone())
                .collect()
        })
        .unwrap_or_default()
}
