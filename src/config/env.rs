//! Environment variable configuration layer
//!
//! Variables named `{PREFIX}{Key}` contribute to the tree, with `__` marking
//! hierarchy levels: `MYAPP_Database__Port=5432` sets `Database:Port` when the
//! prefix is `MYAPP_`. Prefix matching ignores ASCII case.

use super::tree::insert_path;
use serde_json::{Map, Value};
use std::collections::HashMap;

/// Separator for hierarchy levels inside environment variable names
pub const ENV_DELIMITER: &str = "__";

/// Source of environment variables.
///
/// Abstracted so tests can supply variables without touching the process
/// environment.
pub trait EnvSource: Send + Sync {
    /// All variables visible to this source
    fn vars(&self) -> Vec<(String, String)>;
}

/// Reads the real process environment
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultEnvSource;

impl EnvSource for DefaultEnvSource {
    fn vars(&self) -> Vec<(String, String)> {
        std::env::vars().collect()
    }
}

impl EnvSource for HashMap<String, String> {
    fn vars(&self) -> Vec<(String, String)> {
        self.iter().map(|(k, v)| (k.clone(), v.clone())).collect()
    }
}

fn strip_prefix_ignore_case<'a>(name: &'a str, prefix: &str) -> Option<&'a str> {
    let head = name.get(..prefix.len())?;
    head.eq_ignore_ascii_case(prefix)
        .then(|| &name[prefix.len()..])
}

/// Build a configuration tree from every variable carrying `prefix`
pub(crate) fn env_layer(prefix: &str, source: &dyn EnvSource) -> Value {
    let mut root = Value::Object(Map::new());
    let mut vars = source.vars();
    // Deterministic layering when two spellings map to the same key
    vars.sort();

    for (name, raw) in vars {
        let Some(key) = strip_prefix_ignore_case(&name, prefix) else {
            continue;
        };
        if key.is_empty() {
            continue;
        }
        let segments: Vec<&str> = key
            .split(ENV_DELIMITER)
            .flat_map(|part| part.split(super::tree::KEY_DELIMITER))
            .collect();
        insert_path(&mut root, &segments, Value::String(raw));
    }

    log::debug!("Loaded environment layer with prefix '{prefix}'");
    root
}
