//! Configuration sections and binding onto settings types

use super::de::from_config_value;
use super::tree::{KEY_DELIMITER, bind_merge, lookup};
use crate::error::{Error, Result};
use serde::{Serialize, de::DeserializeOwned};
use serde_json::Value;

/// A named region of the configuration tree.
///
/// Sections are detached snapshots: they own a copy of their subtree, so a
/// binding registered from a section keeps working after the `Configuration`
/// it came from is dropped. A section for a missing path is still valid; it
/// simply has no value and binds nothing.
#[derive(Debug, Clone, PartialEq)]
pub struct ConfigurationSection {
    key: String,
    value: Option<Value>,
}

impl ConfigurationSection {
    pub(crate) fn new(key: impl Into<String>, value: Option<Value>) -> Self {
        Self {
            key: key.into(),
            value,
        }
    }

    /// Full colon-delimited key this section was resolved from
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Last segment of the key (`"Database"` for `"App:Database"`)
    pub fn name(&self) -> &str {
        self.key.rsplit(KEY_DELIMITER).next().unwrap_or(&self.key)
    }

    /// Whether the configuration contained anything at this key
    pub fn exists(&self) -> bool {
        self.value.is_some()
    }

    /// Raw subtree for this section
    pub fn value(&self) -> Option<&Value> {
        self.value.as_ref()
    }

    /// Look up a value below this section by relative key
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.value.as_ref().and_then(|v| lookup(v, key))
    }

    /// Child section at a relative key
    pub fn section(&self, key: &str) -> ConfigurationSection {
        ConfigurationSection::new(
            format!("{}{KEY_DELIMITER}{key}", self.key),
            self.get(key).cloned(),
        )
    }

    /// Bind this section onto an existing value.
    ///
    /// Fields present in the section overwrite the corresponding fields of
    /// `target`, everything else keeps its current value. Field names match
    /// ignoring case, `_` and `-` at any depth. Strings are parsed into
    /// whatever the field's type asks for, so `"8080"` binds to a `u16` and
    /// `"007"` stays `"007"` in a `String`. A missing section leaves `target`
    /// untouched.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Bind`] when a value cannot be converted to the field type.
    pub fn bind_into<T>(&self, target: &mut T, type_name: &'static str) -> Result<()>
    where
        T: Serialize + DeserializeOwned,
    {
        let Some(overlay) = &self.value else {
            log::debug!("Section '{}' not present, keeping defaults for {type_name}", self.key);
            return Ok(());
        };

        let bind_error = |source| Error::Bind {
            key: self.key.clone(),
            type_name,
            source,
        };

        let mut current = serde_json::to_value(&*target).map_err(bind_error)?;
        bind_merge(&mut current, overlay);
        *target = from_config_value(current).map_err(bind_error)?;
        Ok(())
    }

    /// Bind this section onto a fresh `T::default()`
    ///
    /// # Errors
    ///
    /// Returns [`Error::Bind`] when a value cannot be converted to the field type.
    pub fn bind<T>(&self) -> Result<T>
    where
        T: Default + Serialize + DeserializeOwned,
    {
        let mut value = T::default();
        self.bind_into(&mut value, crate::options::short_type_name::<T>())?;
        Ok(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;
    use serde_json::json;

    #[derive(Debug, PartialEq, Serialize, Deserialize)]
    struct Database {
        host: String,
        port: u16,
        pool: Pool,
    }

    #[derive(Debug, PartialEq, Serialize, Deserialize)]
    struct Pool {
        max_size: u32,
    }

    impl Default for Database {
        fn default() -> Self {
            Self {
                host: "localhost".into(),
                port: 5432,
                pool: Pool { max_size: 10 },
            }
        }
    }

    #[test]
    fn test_bind_keeps_defaults_for_missing_fields() {
        let section = ConfigurationSection::new("Database", Some(json!({"Host": "db"})));
        let db: Database = section.bind().unwrap();

        assert_eq!(db.host, "db");
        assert_eq!(db.port, 5432);
        assert_eq!(db.pool.max_size, 10);
    }

    #[test]
    fn test_bind_nested_and_coerced() {
        let section = ConfigurationSection::new(
            "Database",
            Some(json!({"Port": "6543", "Pool": {"MaxSize": "25"}})),
        );
        let db: Database = section.bind().unwrap();

        assert_eq!(db.port, 6543);
        assert_eq!(db.pool.max_size, 25);
    }

    #[test]
    fn test_missing_section_binds_defaults() {
        let section = ConfigurationSection::new("Database", None);
        assert!(!section.exists());
        assert_eq!(section.bind::<Database>().unwrap(), Database::default());
    }

    #[test]
    fn test_type_mismatch_is_bind_error() {
        let section = ConfigurationSection::new("Database", Some(json!({"Port": "not-a-port"})));
        let err = section.bind::<Database>().unwrap_err();

        match err {
            Error::Bind { key, type_name, .. } => {
                assert_eq!(key, "Database");
                assert_eq!(type_name, "Database");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_child_section_and_name() {
        let section = ConfigurationSection::new(
            "App:Database",
            Some(json!({"Pool": {"MaxSize": 3}})),
        );
        let pool = section.section("Pool");

        assert_eq!(section.name(), "Database");
        assert_eq!(pool.key(), "App:Database:Pool");
        assert_eq!(pool.get("MaxSize"), Some(&json!(3)));
    }
}
