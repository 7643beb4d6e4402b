//! # optguard - Validated Options
//!
//! Typed options bound from layered configuration, checked by rule-based
//! validators, with a startup sweep that reports every misconfigured type.
//!
//! ## Features
//!
//! - **Layered Configuration**: JSON/TOML/YAML files, environment variables and in-memory values
//! - **Key Resolution**: Options bind from `T::KEY` when declared, otherwise from the type name
//! - **Rule Validation**: Fluent rule sets with ordered, human-readable failure messages
//! - **Eager Checks**: `.validate_on_start()` makes `build()` fail on invalid options
//! - **Startup Sweep**: `validate_options()` materializes every bound type and logs each failure
//!
//! ## Quick Start
//!
//! ```rust
//! use optguard::{Configuration, Options, OptionsRegistry, RuleSet, ValidationContext,
//!     ValidationResult, Validator};
//! use serde::{Deserialize, Serialize};
//!
//! #[derive(Default, Serialize, Deserialize)]
//! struct ServerOptions {
//!     host: String,
//!     port: u16,
//! }
//!
//! impl Options for ServerOptions {
//!     const KEY: Option<&'static str> = Some("MyApp:Server");
//! }
//!
//! struct ServerValidator(RuleSet<ServerOptions>);
//!
//! impl Default for ServerValidator {
//!     fn default() -> Self {
//!         Self(RuleSet::<ServerOptions>::new()
//!             .rule_for("Host", |s| &s.host, |r| r.not_empty())
//!             .rule_for("Port", |s| &s.port, |r| r.inclusive_between(1, 65535)))
//!     }
//! }
//!
//! impl Validator<ServerOptions> for ServerValidator {
//!     fn validate(&self, s: &ServerOptions, ctx: &ValidationContext<'_>) -> ValidationResult {
//!         self.0.validate(s, ctx)
//!     }
//! }
//!
//! let config = Configuration::builder()
//!     .add_in_memory([("MyApp:Server:Host", "0.0.0.0"), ("MyApp:Server:Port", "8080")])
//!     .build()?;
//!
//! let mut registry = OptionsRegistry::new();
//! registry
//!     .add_validated_options::<ServerOptions, ServerValidator>(&config)
//!     .validate_on_start();
//!
//! let provider = registry.build()?;
//! let server = provider.get::<ServerOptions>()?;
//! assert_eq!(server.port, 8080);
//! # Ok::<(), optguard::Error>(())
//! ```
//!
//! ## Startup Sweep
//!
//! ```rust,no_run
//! # fn example(provider: &optguard::OptionsProvider) {
//! // Logs "Failed to validate options for <Type>: <message>" per failing type
//! let report = provider.validate_options();
//! if !report.is_clean() {
//!     eprintln!("{} options type(s) are misconfigured", report.failures.len());
//! }
//! # }
//! ```
//!
//! ## Configuration Keys
//!
//! With the `derive` feature the key can be declared on the type:
//!
//! ```rust,ignore
//! use optguard::Options;
//!
//! #[derive(Options, Default, Serialize, Deserialize)]
//! #[options(key = "MyApp:Settings:Database")]
//! struct DatabaseOptions {
//!     host: String,
//! }
//! ```

// Core modules
mod adapter;
mod error;
mod options;
mod sync;

// Grouped modules
pub mod config;
pub mod registry;
pub mod validation;

// Re-exports from core
pub use adapter::{DelegateValidation, RuleValidation, ValidateOptions, ValidateOptionsResult};
pub use error::{Error, Result};
pub use options::{Options, short_type_name};

// Re-exports from grouped modules
pub use config::{Configuration, ConfigurationBuilder, ConfigurationSection};
pub use registry::{
    OptionsBuilder, OptionsProvider, OptionsRegistry, OptionsScope, SweepFailure, SweepReport,
};
pub use validation::{
    DisplayNamePolicy, RuleBuilder, RuleSet, ValidationContext, ValidationFailure,
    ValidationResult, Validator,
};

// Derive macro re-export (requires `derive` feature)
/// Derive macro for implementing [`Options`].
///
/// # Example
///
/// ```rust,ignore
/// use optguard::Options;
/// use serde::{Deserialize, Serialize};
///
/// #[derive(Options, Default, Serialize, Deserialize)]
/// #[options(key = "MyApp:Cache")]
/// struct CacheOptions {
///     ttl_secs: u64,
/// }
///
/// assert_eq!(CacheOptions::configuration_key(), "MyApp:Cache");
/// ```
#[cfg(feature = "derive")]
pub use optguard_derive::Options;
