use std::path::Path;
use std::sync::Arc;

use serde::ser::SerializeStruct;
use serde::{Serialize, Serializer};

use crate::config::{self, DbProfile};
use crate::connection::Database;
use crate::data_types::DataTypes;
use crate::error::Result;

/// Dependencies handed to every model module in one load.
///
/// Cloning shares the same database handle.
#[derive(Debug, Clone)]
pub struct SharedDeps {
    pub db: Arc<Database>,
    pub data_types: DataTypes,
}

impl SharedDeps {
    pub fn new(db: Database) -> Self {
        Self {
            db: Arc::new(db),
            data_types: DataTypes,
        }
    }

    /// Build from the process environment after loading `.env`.
    ///
    /// `env` and `dir` override `DIRLOAD_ENV` and `DIRLOAD_CONFIG_DIR`.
    pub fn from_env(env: Option<&str>, dir: Option<&Path>) -> Result<Self> {
        config::load_dotenv();
        let env = env.map(str::to_string).unwrap_or_else(config::environment_name);
        let dir = dir.map(Path::to_path_buf).unwrap_or_else(config::config_dir);
        Self::from_profile(&dir, &env)
    }

    /// Build from an explicit profile directory and environment name
    pub fn from_profile(dir: &Path, env: &str) -> Result<Self> {
        let profile = DbProfile::load(dir, env)?;
        Ok(Self::new(Database::connect_lazy(&profile)?))
    }
}

impl Serialize for SharedDeps {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("SharedDeps", 2)?;
        state.serialize_field("connection", self.db.info())?;
        state.serialize_field("data_types", &self.data_types)?;
        state.end()
    }
}
