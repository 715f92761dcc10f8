//! Model loading with the shared database handle

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use dirload_db::SharedDeps;
use tracing::info;

use super::load::{parse_command, print_json, ScanArgs};

#[derive(Parser, Debug)]
pub struct ModelsArgs {
    #[command(flatten)]
    pub scan: ScanArgs,

    /// Module command invoked per model file; receives the shared dependencies as JSON on stdin
    #[arg(long, value_name = "CMD", env = "DIRLOAD_MODULE_COMMAND")]
    pub command: String,

    /// Profile name (overrides DIRLOAD_ENV, default: development)
    #[arg(long = "env", value_name = "NAME")]
    pub env_name: Option<String>,

    /// Directory holding <env>.toml profiles (overrides DIRLOAD_CONFIG_DIR)
    #[arg(long, value_name = "DIR")]
    pub config_dir: Option<PathBuf>,
}

pub fn run_models(args: ModelsArgs) -> Result<()> {
    let deps = SharedDeps::from_env(args.env_name.as_deref(), args.config_dir.as_deref())
        .context("Failed to build database handle")?;
    let factory = parse_command(&args.command)?;
    let loader = args.scan.loader(args.scan.options())?;

    let models = loader.load_models(&factory, &deps)?;
    info!(count = models.len(), database = %deps.db.info().database, "loaded models");
    print_json(&models)
}
