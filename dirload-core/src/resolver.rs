//! Pluggable module resolution.
//!
//! A resolver turns a module path into a loaded value. The loader never
//! interprets modules itself; it only decides which paths to hand over.

use std::collections::HashMap;
use std::fs;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

use anyhow::{anyhow, bail, Context, Result};
use serde::Serialize;
use serde_json::Value;
use tracing::debug;

/// Load a module as a self-contained value
pub trait ModuleResolver {
    fn load(&self, path: &Path) -> Result<Value>;
}

/// Load a module as a callable and invoke it with shared dependencies
pub trait ModuleFactory<D: ?Sized> {
    fn invoke(&self, path: &Path, deps: &D) -> Result<Value>;
}

impl<F> ModuleResolver for F
where
    F: Fn(&Path) -> Result<Value>,
{
    fn load(&self, path: &Path) -> Result<Value> {
        self(path)
    }
}

impl<D: ?Sized, F> ModuleFactory<D> for F
where
    F: Fn(&Path, &D) -> Result<Value>,
{
    fn invoke(&self, path: &Path, deps: &D) -> Result<Value> {
        self(path, deps)
    }
}

/// Treats each module file as a JSON document
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonResolver;

impl ModuleResolver for JsonResolver {
    fn load(&self, path: &Path) -> Result<Value> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read module: {}", path.display()))?;
        serde_json::from_str(&content)
            .with_context(|| format!("Module is not valid JSON: {}", path.display()))
    }
}

/// Runs an external program per module and reads its JSON export from stdout.
///
/// The module path is appended after `args`. When invoked as a factory the
/// dependencies are written to the child's stdin as a single JSON document.
#[derive(Debug, Clone)]
pub struct CommandResolver {
    program: String,
    args: Vec<String>,
}

impl CommandResolver {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
        }
    }

    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    fn run(&self, path: &Path, stdin: Option<Vec<u8>>) -> Result<Value> {
        debug!(program = %self.program, module = %path.display(), "spawning module command");

        let mut child = Command::new(&self.program)
            .args(&self.args)
            .arg(path)
            .stdin(if stdin.is_some() { Stdio::piped() } else { Stdio::null() })
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .with_context(|| format!("Failed to spawn module command: {}", self.program))?;

        if let Some(input) = stdin {
            let mut pipe = child
                .stdin
                .take()
                .ok_or_else(|| anyhow!("module command stdin unavailable"))?;
            // A command may exit without reading stdin; its exit status decides
            match pipe.write_all(&input) {
                Err(err) if err.kind() == ErrorKind::BrokenPipe => {
                    debug!(module = %path.display(), "module command closed stdin early");
                }
                other => other.context("Failed to write dependencies to module command")?,
            }
        }

        let output = child
            .wait_with_output()
            .context("Failed to wait for module command")?;

        if !output.status.success() {
            let code = output.status.code().unwrap_or(-1);
            bail!(
                "Module command exited with code {}: {}",
                code,
                String::from_utf8_lossy(&output.stderr).trim()
            );
        }

        serde_json::from_slice(&output.stdout)
            .with_context(|| format!("Module command printed invalid JSON for {}", path.display()))
    }
}

impl ModuleResolver for CommandResolver {
    fn load(&self, path: &Path) -> Result<Value> {
        self.run(path, None)
    }
}

impl<D: Serialize + ?Sized> ModuleFactory<D> for CommandResolver {
    fn invoke(&self, path: &Path, deps: &D) -> Result<Value> {
        let input = serde_json::to_vec(deps).context("Failed to serialize module dependencies")?;
        self.run(path, Some(input))
    }
}

/// In-memory resolver keyed by module path
#[derive(Debug, Clone, Default)]
pub struct StaticResolver {
    modules: HashMap<PathBuf, Value>,
}

impl StaticResolver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, path: impl Into<PathBuf>, value: Value) -> &mut Self {
        self.modules.insert(path.into(), value);
        self
    }
}

impl ModuleResolver for StaticResolver {
    fn load(&self, path: &Path) -> Result<Value> {
        self.modules
            .get(path)
            .cloned()
            .ok_or_else(|| anyhow!("No module registered for {}", path.display()))
    }
}
