//! Hierarchical configuration
//!
//! This module contains the configuration tree that options are bound from:
//! - `Configuration` - Merged tree with colon-delimited section lookup
//! - `ConfigurationBuilder` - Layers files, environment variables and in-memory values
//! - `ConfigurationSection` - A detached subtree that binds onto settings types

mod builder;
mod de;
mod env;
mod format;
mod section;
mod tree;

pub use builder::ConfigurationBuilder;
pub use env::{DefaultEnvSource, ENV_DELIMITER, EnvSource};
#[cfg(feature = "toml")]
pub use format::TomlFormat;
#[cfg(feature = "yaml")]
pub use format::YamlFormat;
pub use format::{ConfigFormat, JsonFormat};
pub use section::ConfigurationSection;
pub use tree::KEY_DELIMITER;

use serde_json::{Map, Value};

/// Merged configuration tree
///
/// # Example
/// ```rust
/// use optguard::Configuration;
/// use serde_json::json;
///
/// let config = Configuration::from_value(json!({
///     "MyApp": {"Settings": {"Database": {"Host": "db"}}}
/// }));
///
/// let section = config.section("MyApp:Settings:Database");
/// assert!(section.exists());
/// assert_eq!(section.get("Host"), Some(&json!("db")));
/// assert!(!config.section("Missing").exists());
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Configuration {
    root: Value,
}

impl Default for Configuration {
    fn default() -> Self {
        Self {
            root: Value::Object(Map::new()),
        }
    }
}

impl Configuration {
    /// Create a new builder for Configuration
    pub fn builder() -> ConfigurationBuilder {
        ConfigurationBuilder::new()
    }

    /// Wrap an existing tree
    pub fn from_value(root: Value) -> Self {
        Self { root }
    }

    /// The whole merged tree
    pub fn root(&self) -> &Value {
        &self.root
    }

    /// Whether no source contributed any key
    pub fn is_empty(&self) -> bool {
        match &self.root {
            Value::Object(map) => map.is_empty(),
            Value::Null => true,
            _ => false,
        }
    }

    /// Look up a value by colon-delimited key
    pub fn get(&self, key: &str) -> Option<&Value> {
        tree::lookup(&self.root, key)
    }

    /// Section at a colon-delimited key.
    ///
    /// Each `:` descends one level. Keys match exactly first, then ignoring
    /// ASCII case. A missing path returns a section without a value rather
    /// than an error.
    pub fn section(&self, key: &str) -> ConfigurationSection {
        ConfigurationSection::new(key, self.get(key).cloned())
    }
}
