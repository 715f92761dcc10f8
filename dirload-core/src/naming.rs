//! Entry filtering and object name resolution.

use serde_json::Value;

use crate::error::{LoaderError, Result};

/// Field a loaded object uses to declare its own name
pub const NAME_FIELD: &str = "name";

/// Script suffix recognised when no other is configured
pub const DEFAULT_SUFFIX: &str = ".js";

/// Stem of the reserved aggregation (barrel) module
pub const INDEX_STEM: &str = "index";

/// How child lists are combined in `load_list`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ListAggregation {
    /// Child lists are appended ahead of the folder's own values
    #[default]
    Concatenate,
    /// Children are traversed but their values are dropped
    LocalOnly,
}

/// Knobs shared by a loader and every child it spawns
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoaderOptions {
    pub suffix: String,
    pub index_file: String,
    pub list_aggregation: ListAggregation,
}

impl Default for LoaderOptions {
    fn default() -> Self {
        Self::with_suffix(DEFAULT_SUFFIX)
    }
}

impl LoaderOptions {
    /// Use `suffix` for scripts; the reserved index file follows it (`index` + suffix)
    pub fn with_suffix(suffix: impl Into<String>) -> Self {
        let suffix = suffix.into();
        Self {
            index_file: format!("{}{}", INDEX_STEM, suffix),
            suffix,
            list_aggregation: ListAggregation::default(),
        }
    }

    pub fn list_aggregation(mut self, mode: ListAggregation) -> Self {
        self.list_aggregation = mode;
        self
    }

    /// Whether a directory entry should be loaded as a module.
    ///
    /// The entry type is not consulted; only the name and the exclusion list.
    pub fn is_loadable(&self, name: &str, exclude: &[String]) -> bool {
        !name.starts_with('.')
            && name != self.index_file
            && name.ends_with(&self.suffix)
            && !exclude.iter().any(|e| e == name)
    }

    /// File name with the script suffix removed
    pub fn strip_suffix<'a>(&self, file: &'a str) -> &'a str {
        file.strip_suffix(self.suffix.as_str()).unwrap_or(file)
    }
}

/// Values that count as "no object": null, false, zero and the empty string.
pub fn is_absent(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::Bool(b) => !b,
        Value::Number(n) => n.as_f64() == Some(0.0),
        Value::String(s) => s.is_empty(),
        Value::Array(_) | Value::Object(_) => false,
    }
}

/// Resolve the mapping key for a loaded value.
///
/// A declared `name` wins even when it disagrees with the file name. Without
/// one, the name is derived from `file` and written back into object values.
pub fn resolve_name(value: &mut Value, file: Option<&str>, options: &LoaderOptions) -> Result<String> {
    if is_absent(value) {
        return Err(LoaderError::null_object(file.unwrap_or_default()));
    }

    let declared = value.get(NAME_FIELD).filter(|n| !n.is_null());
    let name = match declared {
        Some(Value::String(s)) => s.clone(),
        Some(Value::Number(n)) => n.to_string(),
        Some(Value::Bool(b)) => b.to_string(),
        Some(other) => {
            let kind = if other.is_array() { "array" } else { "object" };
            return Err(LoaderError::invalid_name(
                file.unwrap_or_default(),
                format!("name must be a scalar, found {}", kind),
            ));
        }
        None => {
            let Some(file) = file.filter(|f| !f.is_empty()) else {
                return Err(LoaderError::undefined_name(None));
            };
            let derived = options.strip_suffix(file).to_string();
            if let Value::Object(map) = value {
                map.insert(NAME_FIELD.to_string(), Value::String(derived.clone()));
            }
            derived
        }
    };

    if name.is_empty() {
        return Err(LoaderError::undefined_name(file));
    }
    Ok(name)
}
