//! Environment-selected database profiles.
//!
//! `DIRLOAD_ENV` picks a profile name (default `development`), and the
//! profile is read from `<config dir>/<name>.toml`:
//!
//! ```toml
//! [db]
//! database = "app_dev"
//! user = "app"
//! password = "${DB_PASSWORD}"
//! host = "localhost"
//! port = 5432
//! ```
//!
//! Everything in `[db]` besides the three credentials is the options bundle
//! forwarded to the connection builder.

use std::collections::HashMap;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::{DbError, Result};

/// Environment variable selecting the profile
pub const ENV_VAR: &str = "DIRLOAD_ENV";

/// Environment variable overriding the profile directory
pub const CONFIG_DIR_VAR: &str = "DIRLOAD_CONFIG_DIR";

pub const DEFAULT_ENV: &str = "development";

pub const DEFAULT_CONFIG_DIR: &str = "configs";

static VAR_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\$\{([A-Za-z_][A-Za-z0-9_]*)\}").expect("valid pattern"));

/// Load environment variables from .env files
///
/// The current directory is checked first, then ~/.dirload/.env. Variables
/// already set in the process are never overwritten.
pub fn load_dotenv() {
    let mut loaded_from = Vec::new();

    if let Ok(path) = dotenvy::dotenv() {
        debug!("Loaded .env from current directory: {}", path.display());
        loaded_from.push(path.display().to_string());
    }

    if let Some(home_dir) = dirs::home_dir() {
        let env_file = home_dir.join(".dirload").join(".env");
        if env_file.exists() {
            match dotenvy::from_path(&env_file) {
                Ok(_) => loaded_from.push(env_file.display().to_string()),
                Err(e) => debug!("Failed to load {}: {}", env_file.display(), e),
            }
        }
    }

    if loaded_from.is_empty() {
        debug!("No .env files found, using process environment only");
    } else {
        info!("Loaded environment from: {}", loaded_from.join(", "));
    }
}

/// Active environment name, `development` when unset or blank
pub fn environment_name() -> String {
    env_name_or_default(env::var(ENV_VAR).ok())
}

/// Directory holding `<env>.toml` profiles
pub fn config_dir() -> PathBuf {
    env::var(CONFIG_DIR_VAR)
        .ok()
        .filter(|dir| !dir.trim().is_empty())
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_DIR))
}

fn env_name_or_default(value: Option<String>) -> String {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .unwrap_or_else(|| DEFAULT_ENV.to_string())
}

#[derive(Debug, Deserialize)]
struct ProfileFile {
    db: DbProfile,
}

/// Connection settings for one environment
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DbProfile {
    #[serde(default)]
    pub database: String,
    #[serde(default)]
    pub user: String,
    #[serde(default, skip_serializing)]
    pub password: String,
    /// Everything else in `[db]`, passed through to the connection builder
    #[serde(flatten)]
    pub options: toml::Table,
}

impl DbProfile {
    /// Load the profile for `env` from `dir`
    pub fn load(dir: &Path, env: &str) -> Result<Self> {
        let path = dir.join(format!("{}.toml", env));
        if !path.exists() {
            return Err(DbError::ProfileNotFound {
                env: env.to_string(),
                path,
            });
        }

        let content = fs::read_to_string(&path).map_err(|source| DbError::Io {
            path: path.clone(),
            source,
        })?;
        let profile = Self::from_toml(&content, &path, &process_vars())?;
        info!(env, database = %profile.database, "loaded database profile");
        Ok(profile)
    }

    /// Parse a profile document, expanding `${VAR}` references from `vars`
    pub fn from_toml(content: &str, path: &Path, vars: &HashMap<String, String>) -> Result<Self> {
        let file: ProfileFile = toml::from_str(content).map_err(|source| DbError::ProfileParse {
            path: path.to_path_buf(),
            source,
        })?;

        let mut profile = file.db;
        profile.database = expand_string(&profile.database, vars);
        profile.user = expand_string(&profile.user, vars);
        profile.password = expand_string(&profile.password, vars);
        for (_, value) in profile.options.iter_mut() {
            if let toml::Value::String(s) = value {
                *s = expand_string(s, vars);
            }
        }

        if profile.database.is_empty() {
            return Err(DbError::missing_field("database"));
        }
        if profile.user.is_empty() {
            return Err(DbError::missing_field("user"));
        }
        Ok(profile)
    }
}

fn process_vars() -> HashMap<String, String> {
    env::vars().collect()
}

/// Expand ${var} references; unknown variables expand to nothing
fn expand_string(s: &str, vars: &HashMap<String, String>) -> String {
    VAR_PATTERN
        .replace_all(s, |caps: &regex::Captures| {
            vars.get(&caps[1]).cloned().unwrap_or_default()
        })
        .into_owned()
}
