//! Shared database handle for model loading.
//!
//! Reads an environment-selected profile, builds one lazily-connected
//! Postgres pool and bundles it with the data-type catalog as [`SharedDeps`].

pub mod config;
pub mod connection;
pub mod data_types;
pub mod deps;
pub mod error;

pub use config::{load_dotenv, DbProfile};
pub use connection::{ConnectionInfo, Database};
pub use data_types::{DataType, DataTypes};
pub use deps::SharedDeps;
pub use error::{DbError, Result};
