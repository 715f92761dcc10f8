//! Directory-scanning module loader.
//!
//! Walks a folder tree, picks out script modules by name, hands each to a
//! pluggable resolver and aggregates the results as a list or a name-keyed map.

pub mod error;
pub mod loader;
pub mod naming;
pub mod resolver;

pub use error::{LoaderError, Result};
pub use loader::{DirectoryLoader, ObjectMap};
pub use naming::{resolve_name, ListAggregation, LoaderOptions};
pub use resolver::{CommandResolver, JsonResolver, ModuleFactory, ModuleResolver, StaticResolver};
