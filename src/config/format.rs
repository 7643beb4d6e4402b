//! Configuration file formats
//!
//! Every format parses its content into a `serde_json::Value` tree so the
//! layers can be merged regardless of where they came from.

use crate::error::{Error, Result};
use serde_json::Value;
use std::path::Path;

/// Trait for configuration file formats
pub trait ConfigFormat: Send + Sync {
    /// Human-readable format name used in error messages (e.g., "json", "toml")
    fn name(&self) -> &'static str;

    /// Parse file content into a configuration tree
    fn parse(&self, content: &str, origin: &str) -> Result<Value>;

    /// Read and parse a file
    fn read(&self, path: &Path) -> Result<Value> {
        let content = std::fs::read_to_string(path).map_err(|e| Error::FileRead {
            path: path.to_path_buf(),
            source: e,
        })?;
        self.parse(&content, &path.display().to_string())
    }
}

fn parse_error(format: &'static str, origin: &str, reason: impl ToString) -> Error {
    Error::Parse {
        format,
        origin: origin.to_string(),
        reason: reason.to_string(),
    }
}

// =============================================================================
// JSON
// =============================================================================

/// JSON configuration files (default)
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonFormat;

impl ConfigFormat for JsonFormat {
    fn name(&self) -> &'static str {
        "json"
    }

    fn parse(&self, content: &str, origin: &str) -> Result<Value> {
        // An empty file is an empty layer, not an error
        if content.trim().is_empty() {
            return Ok(Value::Object(serde_json::Map::new()));
        }
        serde_json::from_str(content).map_err(|e| parse_error("json", origin, e))
    }
}

// =============================================================================
// TOML
// =============================================================================

/// TOML configuration files
#[cfg(feature = "toml")]
#[derive(Debug, Clone, Copy, Default)]
pub struct TomlFormat;

#[cfg(feature = "toml")]
impl ConfigFormat for TomlFormat {
    fn name(&self) -> &'static str {
        "toml"
    }

    fn parse(&self, content: &str, origin: &str) -> Result<Value> {
        let table: toml::Table =
            toml::from_str(content).map_err(|e| parse_error("toml", origin, e))?;
        serde_json::to_value(table).map_err(|e| parse_error("toml", origin, e))
    }
}

// =============================================================================
// YAML
// =============================================================================

/// YAML configuration files
#[cfg(feature = "yaml")]
#[derive(Debug, Clone, Copy, Default)]
pub struct YamlFormat;

#[cfg(feature = "yaml")]
impl ConfigFormat for YamlFormat {
    fn name(&self) -> &'static str {
        "yaml"
    }

    fn parse(&self, content: &str, origin: &str) -> Result<Value> {
        if content.trim().is_empty() {
            return Ok(Value::Object(serde_json::Map::new()));
        }
        serde_yaml::from_str(content).map_err(|e| parse_error("yaml", origin, e))
    }
}

// =============================================================================
// Tests
// =============================================================================
