//! The one database handle shared by every model load.

use std::str::FromStr;
use std::time::Duration;

use serde::Serialize;
use sqlx::postgres::{PgConnectOptions, PgPoolOptions, PgSslMode};
use sqlx::PgPool;
use tracing::{debug, info};

use crate::config::DbProfile;
use crate::error::{DbError, Result};

const DEFAULT_MAX_CONNECTIONS: u32 = 5;

/// Option keys safe to hand to module commands
const PUBLIC_OPTIONS: &[&str] = &[
    "dialect",
    "host",
    "port",
    "application_name",
    "ssl_mode",
    "max_connections",
    "min_connections",
    "acquire_timeout_secs",
];

/// Public description of a handle; never carries the password
#[derive(Debug, Clone, Serialize)]
pub struct ConnectionInfo {
    pub dialect: &'static str,
    pub database: String,
    pub user: String,
    pub options: toml::Table,
}

#[derive(Debug, Clone)]
pub struct Database {
    pool: PgPool,
    info: ConnectionInfo,
}

impl Database {
    /// Build the pool without opening a connection.
    ///
    /// Must be called inside a Tokio runtime; the pool spawns its
    /// maintenance task on construction.
    pub fn connect_lazy(profile: &DbProfile) -> Result<Self> {
        let mut connect = PgConnectOptions::new()
            .database(&profile.database)
            .username(&profile.user);
        if !profile.password.is_empty() {
            connect = connect.password(&profile.password);
        }
        let mut pool = PgPoolOptions::new().max_connections(DEFAULT_MAX_CONNECTIONS);

        for (key, value) in &profile.options {
            match key.as_str() {
                "dialect" => {
                    let dialect = as_str(key, value)?;
                    if !matches!(dialect, "postgres" | "postgresql") {
                        return Err(DbError::invalid_option(
                            key,
                            format!("unsupported dialect '{}'", dialect),
                        ));
                    }
                }
                "host" => connect = connect.host(as_str(key, value)?),
                "port" => connect = connect.port(as_int(key, value)?),
                "application_name" => connect = connect.application_name(as_str(key, value)?),
                "ssl_mode" => {
                    let mode = PgSslMode::from_str(as_str(key, value)?)
                        .map_err(|e| DbError::invalid_option(key, e.to_string()))?;
                    connect = connect.ssl_mode(mode);
                }
                "max_connections" => pool = pool.max_connections(as_int(key, value)?),
                "min_connections" => pool = pool.min_connections(as_int(key, value)?),
                "acquire_timeout_secs" => {
                    pool = pool.acquire_timeout(Duration::from_secs(as_int(key, value)?))
                }
                _ => debug!(option = %key, "ignoring unrecognised database option"),
            }
        }

        let pool = pool.connect_lazy_with(connect);
        info!(database = %profile.database, user = %profile.user, "database handle created");

        Ok(Self {
            pool,
            info: ConnectionInfo {
                dialect: "postgres",
                database: profile.database.clone(),
                user: profile.user.clone(),
                options: profile
                    .options
                    .iter()
                    .filter(|(key, _)| PUBLIC_OPTIONS.contains(&key.as_str()))
                    .map(|(key, value)| (key.clone(), value.clone()))
                    .collect(),
            },
        })
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    pub fn info(&self) -> &ConnectionInfo {
        &self.info
    }
}

fn as_str<'a>(key: &str, value: &'a toml::Value) -> Result<&'a str> {
    value
        .as_str()
        .ok_or_else(|| DbError::invalid_option(key, "expected a string"))
}

fn as_int<T: TryFrom<i64>>(key: &str, value: &toml::Value) -> Result<T> {
    let raw = value
        .as_integer()
        .ok_or_else(|| DbError::invalid_option(key, "expected an integer"))?;
    T::try_from(raw).map_err(|_| DbError::invalid_option(key, format!("{} is out of range", raw)))
}
