//! Structured error types for dirload-core.
//!
//! Library consumers get structured errors; the `dirload` binary wraps them
//! in `anyhow` for reporting.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Main error type for directory loading
#[derive(Error, Debug)]
pub enum LoaderError {
    /// Folder missing, unreadable, or an entry could not be stat'ed
    #[error("I/O error at {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// A module produced an empty value where a named object was expected
    #[error("Object is null for file: {file:?}")]
    NullObject { file: String },

    /// No declared name and nothing to derive one from
    #[error("Cannot have undefined object name when loading an object{}", file_hint(.file))]
    UndefinedName { file: Option<String> },

    /// Declared name cannot be used as a mapping key
    #[error("Invalid object name in file {file:?}: {reason}")]
    InvalidName { file: String, reason: String },

    /// The resolver failed to load or execute a module
    #[error("Failed to load module {path:?}: {source}")]
    ModuleLoad {
        path: PathBuf,
        #[source]
        source: anyhow::Error,
    },
}

fn file_hint(file: &Option<String>) -> String {
    match file {
        Some(file) => format!(" (file {:?})", file),
        None => String::new(),
    }
}

/// Result type alias for loader operations
pub type Result<T> = std::result::Result<T, LoaderError>;

impl LoaderError {
    /// Create an I/O error bound to a path
    pub fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    pub fn null_object(file: impl Into<String>) -> Self {
        Self::NullObject { file: file.into() }
    }

    pub fn undefined_name(file: Option<&str>) -> Self {
        Self::UndefinedName {
            file: file.map(str::to_string),
        }
    }

    pub fn invalid_name(file: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidName {
            file: file.into(),
            reason: reason.into(),
        }
    }

    /// Wrap a resolver failure with the module path
    pub fn module_load(path: impl Into<PathBuf>, source: anyhow::Error) -> Self {
        Self::ModuleLoad {
            path: path.into(),
            source,
        }
    }
}
