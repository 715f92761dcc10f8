use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while building the shared database handle
#[derive(Error, Debug)]
pub enum DbError {
    /// No profile file for the selected environment
    #[error("No database profile for environment '{env}' (looked for {path:?})")]
    ProfileNotFound { env: String, path: PathBuf },

    #[error("I/O error reading {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Profile is not valid TOML or lacks the `[db]` table
    #[error("Invalid database profile {path:?}: {source}")]
    ProfileParse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("Database profile is missing required field '{field}'")]
    MissingField { field: String },

    #[error("Invalid database option '{key}': {reason}")]
    InvalidOption { key: String, reason: String },
}

pub type Result<T> = std::result::Result<T, DbError>;

impl DbError {
    pub fn missing_field(field: impl Into<String>) -> Self {
        Self::MissingField {
            field: field.into(),
        }
    }

    pub fn invalid_option(key: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidOption {
            key: key.into(),
            reason: reason.into(),
        }
    }
}
