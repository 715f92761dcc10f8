//! Plain loading commands
//!
//! Commands: list, objects

use std::path::{Path, PathBuf};

use anyhow::{anyhow, Context, Result};
use clap::{Parser, ValueEnum};
use dirload_core::{
    CommandResolver, DirectoryLoader, JsonResolver, ListAggregation, LoaderOptions, ModuleResolver,
};
use serde::Serialize;
use serde_json::Value;
use tracing::info;

// === Arg Structs ===

/// Folder selection shared by every loading command
#[derive(Parser, Debug)]
pub struct ScanArgs {
    /// Root folder to scan
    #[arg(value_name = "FOLDER")]
    pub folder: PathBuf,

    /// Entry name to skip entirely, file or folder (repeatable, exact match)
    #[arg(long, short = 'x', value_name = "NAME")]
    pub exclude: Vec<String>,

    /// Only load the root folder, do not descend into subfolders
    #[arg(long)]
    pub no_recurse: bool,

    /// Suffix identifying module files (also moves the reserved index file)
    #[arg(long, default_value = ".js")]
    pub suffix: String,
}

impl ScanArgs {
    pub fn loader(&self, options: LoaderOptions) -> Result<DirectoryLoader> {
        DirectoryLoader::with_options(
            &self.folder,
            self.exclude.iter().cloned(),
            !self.no_recurse,
            options,
        )
        .with_context(|| format!("Failed to open folder: {}", self.folder.display()))
    }

    pub fn options(&self) -> LoaderOptions {
        LoaderOptions::with_suffix(&self.suffix)
    }
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResolverKind {
    /// Parse each module file as JSON
    Json,
    /// Run --command with the module path and read JSON from stdout
    Command,
}

#[derive(Parser, Debug)]
pub struct LoadArgs {
    #[command(flatten)]
    pub scan: ScanArgs,

    /// How module files are turned into values
    #[arg(long, value_enum, default_value_t = ResolverKind::Json)]
    pub resolver: ResolverKind,

    /// Module command for --resolver command (e.g. "node export.js"); the path is appended
    #[arg(long, value_name = "CMD", env = "DIRLOAD_MODULE_COMMAND")]
    pub command: Option<String>,
}

#[derive(Parser, Debug)]
pub struct ListArgs {
    #[command(flatten)]
    pub load: LoadArgs,

    /// Leave subfolder values out of the list (subfolders are still loaded)
    #[arg(long)]
    pub local_only: bool,
}

// === Command Implementations ===

pub fn run_list(args: ListArgs) -> Result<()> {
    let aggregation = if args.local_only {
        ListAggregation::LocalOnly
    } else {
        ListAggregation::Concatenate
    };
    let loader = args
        .load
        .scan
        .loader(args.load.scan.options().list_aggregation(aggregation))?;
    let resolver = build_resolver(&args.load)?;

    let values = loader.load_list(&resolver)?;
    info!(count = values.len(), "loaded module list");
    print_json(&values)
}

pub fn run_objects(args: LoadArgs) -> Result<()> {
    let loader = args.scan.loader(args.scan.options())?;
    let resolver = build_resolver(&args)?;

    let objects = loader.load_objects(&resolver)?;
    info!(count = objects.len(), "loaded objects");
    print_json(&objects)
}

/// Resolver picked on the command line
pub enum CliResolver {
    Json(JsonResolver),
    Command(CommandResolver),
}

impl ModuleResolver for CliResolver {
    fn load(&self, path: &Path) -> Result<Value> {
        match self {
            CliResolver::Json(resolver) => resolver.load(path),
            CliResolver::Command(resolver) => resolver.load(path),
        }
    }
}

fn build_resolver(args: &LoadArgs) -> Result<CliResolver> {
    match args.resolver {
        ResolverKind::Json => Ok(CliResolver::Json(JsonResolver)),
        ResolverKind::Command => {
            let command = args
                .command
                .as_deref()
                .ok_or_else(|| anyhow!("--resolver command requires --command"))?;
            Ok(CliResolver::Command(parse_command(command)?))
        }
    }
}

/// Split a shell-style command line into a resolver
pub fn parse_command(command: &str) -> Result<CommandResolver> {
    let words = shlex::split(command)
        .ok_or_else(|| anyhow!("Unbalanced quotes in command: {}", command))?;
    let (program, args) = words
        .split_first()
        .ok_or_else(|| anyhow!("Module command is empty"))?;
    Ok(CommandResolver::new(program.clone()).args(args.iter().cloned()))
}

pub fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    let rendered = serde_json::to_string_pretty(value).context("Failed to serialize output")?;
    println!("{}", rendered);
    Ok(())
}

// === Tests ===
