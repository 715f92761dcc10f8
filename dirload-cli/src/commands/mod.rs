//! Command implementations for the dirload CLI

pub mod load;
pub mod models;

pub use load::{run_list, run_objects};
pub use models::run_models;
