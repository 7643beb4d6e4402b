//! Error types for optguard library

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for optguard operations
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for optguard library
#[derive(Error, Debug)]
pub enum Error {
    // -------------------------------------------------------------------------
    // Configuration Source Errors
    // -------------------------------------------------------------------------
    #[error("Failed to read file '{path}': {source}")]
    FileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse {format} configuration '{origin}': {reason}")]
    Parse {
        format: &'static str,
        origin: String,
        reason: String,
    },

    #[error("Configuration error: {0}")]
    Config(String),

    // -------------------------------------------------------------------------
    // Binding Errors
    // -------------------------------------------------------------------------
    #[error("Failed to bind section '{key}' to {type_name}: {source}")]
    Bind {
        key: String,
        type_name: &'static str,
        #[source]
        source: serde_json::Error,
    },

    // -------------------------------------------------------------------------
    // Validation Errors
    // -------------------------------------------------------------------------
    #[error("Validation failed for '{type_name}': {}", .failures.join("; "))]
    Validation {
        type_name: &'static str,
        failures: Vec<String>,
    },

    #[error("{} options type(s) failed startup validation: {}", .errors.len(), join_errors(.errors))]
    StartupValidation { errors: Vec<Error> },

    // -------------------------------------------------------------------------
    // Registry Errors
    // -------------------------------------------------------------------------
    #[error("Options type '{0}' is not registered")]
    NotRegistered(&'static str),
}

impl Error {
    /// Check if this error came from a validator rather than from binding or I/O
    #[must_use]
    pub fn is_validation_error(&self) -> bool {
        matches!(
            self,
            Error::Validation { .. } | Error::StartupValidation { .. }
        )
    }

    /// Validation messages carried by this error, flattened across startup failures
    #[must_use]
    pub fn failures(&self) -> Vec<&str> {
        match self {
            Error::Validation { failures, .. } => failures.iter().map(String::as_str).collect(),
            Error::StartupValidation { errors } => {
                errors.iter().flat_map(Error::failures).collect()
            }
            _ => Vec::new(),
        }
    }
}

fn join_errors(errors: &[Error]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(" | ")
}
