//! Builder for layered configuration
//!
//! Sources are applied in the order they are added; later sources override
//! earlier ones key by key.

use super::Configuration;
use super::env::{DefaultEnvSource, EnvSource, env_layer};
use super::format::{ConfigFormat, JsonFormat};
use super::tree::{KEY_DELIMITER, insert_path, merge_layer};
use crate::error::Result;
use serde_json::{Map, Value};
use std::path::PathBuf;
use std::sync::Arc;

enum Source {
    File {
        path: PathBuf,
        format: Box<dyn ConfigFormat>,
        optional: bool,
    },
    Env {
        prefix: String,
        source: Arc<dyn EnvSource>,
    },
    Pairs(Vec<(String, String)>),
    Tree(Value),
}

/// Builder for creating a [`Configuration`] with a fluent API
///
/// # Example
/// ```rust,no_run
/// use optguard::Configuration;
///
/// let config = Configuration::builder()
///     .base_path("~/.config/my-app")
///     .add_json_file("appsettings.json", false)
///     .add_json_file("appsettings.local.json", true)
///     .add_env_vars("MYAPP_")
///     .build()?;
/// # Ok::<(), optguard::Error>(())
/// ```
#[derive(Default)]
pub struct ConfigurationBuilder {
    base_path: Option<PathBuf>,
    sources: Vec<Source>,
}

impl std::fmt::Debug for ConfigurationBuilder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConfigurationBuilder")
            .field("base_path", &self.base_path)
            .field("sources", &self.sources.len())
            .finish()
    }
}

impl ConfigurationBuilder {
    /// Create an empty builder
    pub fn new() -> Self {
        Self::default()
    }

    /// Directory that relative file paths are resolved against
    ///
    /// Supports `~` expansion for home directory.
    pub fn base_path(mut self, path: impl Into<PathBuf>) -> Self {
        let path: PathBuf = path.into();
        let expanded = if path.starts_with("~") {
            if let Some(home) = dirs::home_dir() {
                home.join(path.strip_prefix("~").unwrap_or(&path))
            } else {
                path
            }
        } else {
            path
        };
        self.base_path = Some(expanded);
        self
    }

    /// Add a file in any [`ConfigFormat`]
    ///
    /// A missing `optional` file is skipped; a missing required file fails `build()`.
    pub fn add_file(
        mut self,
        path: impl Into<PathBuf>,
        format: impl ConfigFormat + 'static,
        optional: bool,
    ) -> Self {
        self.sources.push(Source::File {
            path: path.into(),
            format: Box::new(format),
            optional,
        });
        self
    }

    /// Add a JSON file
    pub fn add_json_file(self, path: impl Into<PathBuf>, optional: bool) -> Self {
        self.add_file(path, JsonFormat, optional)
    }

    /// Add a TOML file
    #[cfg(feature = "toml")]
    pub fn add_toml_file(self, path: impl Into<PathBuf>, optional: bool) -> Self {
        self.add_file(path, super::format::TomlFormat, optional)
    }

    /// Add a YAML file
    #[cfg(feature = "yaml")]
    pub fn add_yaml_file(self, path: impl Into<PathBuf>, optional: bool) -> Self {
        self.add_file(path, super::format::YamlFormat, optional)
    }

    /// Add process environment variables starting with `prefix`
    ///
    /// `MYAPP_Database__Port=5432` with prefix `"MYAPP_"` sets `Database:Port`.
    pub fn add_env_vars(self, prefix: impl Into<String>) -> Self {
        self.add_env_vars_from(prefix, DefaultEnvSource)
    }

    /// Add environment variables from a custom [`EnvSource`]
    pub fn add_env_vars_from(
        mut self,
        prefix: impl Into<String>,
        source: impl EnvSource + 'static,
    ) -> Self {
        self.sources.push(Source::Env {
            prefix: prefix.into(),
            source: Arc::new(source),
        });
        self
    }

    /// Add in-memory pairs keyed by colon-delimited paths
    ///
    /// # Example
    /// ```rust
    /// use optguard::Configuration;
    ///
    /// let config = Configuration::builder()
    ///     .add_in_memory([("Database:Host", "localhost"), ("Database:Port", "5432")])
    ///     .build()?;
    ///
    /// assert_eq!(config.get("Database:Port"), Some(&serde_json::json!("5432")));
    /// # Ok::<(), optguard::Error>(())
    /// ```
    pub fn add_in_memory<K, V>(mut self, pairs: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        self.sources.push(Source::Pairs(
            pairs
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        ));
        self
    }

    /// Add an already-built tree
    pub fn add_value(mut self, value: Value) -> Self {
        self.sources.push(Source::Tree(value));
        self
    }

    fn resolve(&self, path: PathBuf) -> PathBuf {
        match &self.base_path {
            Some(base) if path.is_relative() => base.join(path),
            _ => path,
        }
    }

    /// Load every source and merge them into a [`Configuration`]
    ///
    /// # Errors
    ///
    /// Returns an error if a required file is missing or any file fails to parse.
    pub fn build(mut self) -> Result<Configuration> {
        let mut root = Value::Object(Map::new());

        for source in std::mem::take(&mut self.sources) {
            match source {
                Source::File {
                    path,
                    format,
                    optional,
                } => {
                    let path = self.resolve(path);
                    if optional && !path.exists() {
                        log::debug!("Skipping optional configuration file {}", path.display());
                        continue;
                    }
                    let layer = format.read(&path)?;
                    log::debug!("Loaded {} configuration from {}", format.name(), path.display());
                    merge_layer(&mut root, layer);
                }
                Source::Env { prefix, source } => {
                    merge_layer(&mut root, env_layer(&prefix, source.as_ref()));
                }
                Source::Pairs(pairs) => {
                    for (key, raw) in pairs {
                        let segments: Vec<&str> = key.split(KEY_DELIMITER).collect();
                        insert_path(&mut root, &segments, Value::String(raw));
                    }
                }
                Source::Tree(value) => merge_layer(&mut root, value),
            }
        }

        Ok(Configuration::from_value(root))
    }
}
