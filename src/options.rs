//! The `Options` trait and configuration key resolution
//!
//! Every settings type that can be registered implements [`Options`]. The
//! trait carries the optional configuration key for the type. When no key is
//! declared, the type's own name is used verbatim.
//!
//! ```rust
//! use optguard::Options;
//! use serde::{Deserialize, Serialize};
//!
//! #[derive(Default, Serialize, Deserialize)]
//! struct DatabaseOptions {
//!     host: String,
//! }
//!
//! impl Options for DatabaseOptions {}
//!
//! #[derive(Default, Serialize, Deserialize)]
//! struct CacheOptions {
//!     ttl: u64,
//! }
//!
//! impl Options for CacheOptions {
//!     const KEY: Option<&'static str> = Some("MyApp:Settings:Cache");
//! }
//!
//! assert_eq!(DatabaseOptions::configuration_key(), "DatabaseOptions");
//! assert_eq!(CacheOptions::configuration_key(), "MyApp:Settings:Cache");
//! ```

use serde::{Serialize, de::DeserializeOwned};

/// A settings type that can be bound from configuration and validated.
///
/// With the `derive` feature, `#[derive(Options)]` implements this trait and
/// reads the key from `#[options(key = "...")]`.
pub trait Options: Default + Serialize + DeserializeOwned + Send + Sync + 'static {
    /// Explicit configuration key. Either a simple name (`"Database"`) or a
    /// colon-delimited path (`"MyApp:Settings:Database"`).
    const KEY: Option<&'static str> = None;

    /// The bare declared name of the type, without module path or generics
    fn type_name() -> &'static str {
        short_type_name::<Self>()
    }

    /// Key of the configuration section this type binds from.
    ///
    /// Resolved on every call: the explicit key when present, otherwise the
    /// type name with no transformation.
    fn configuration_key() -> &'static str {
        Self::KEY.unwrap_or_else(Self::type_name)
    }
}

/// Strip the module path and generic arguments from `std::any::type_name`.
///
/// `app::config::Database<app::Pg>` becomes `Database`.
pub fn short_type_name<T: ?Sized>() -> &'static str {
    let full = std::any::type_name::<T>();
    let base = full.split('<').next().unwrap_or(full);
    base.rsplit("::").next().unwrap_or(base)
}
