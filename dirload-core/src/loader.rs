//! Recursive directory module loader.
//!
//! A `DirectoryLoader` snapshots one folder's entries at construction and
//! spawns a child loader per subfolder it recurses into. Child results are
//! merged into the parent before the parent's own modules are loaded, so a
//! folder's own files win name collisions against its subfolders.

use std::collections::BTreeMap;
use std::ffi::OsString;
use std::fs;
use std::path::{Path, PathBuf};

use serde_json::Value;
use tracing::{debug, info};

use crate::error::{LoaderError, Result};
use crate::naming::{resolve_name, ListAggregation, LoaderOptions};
use crate::resolver::{ModuleFactory, ModuleResolver};

/// Name-keyed aggregate produced by the mapping operations
pub type ObjectMap = BTreeMap<String, Value>;

/// One directory entry: the on-disk name plus its lossy text form used for
/// filtering and naming
#[derive(Debug, Clone)]
struct Entry {
    raw: OsString,
    name: String,
}

#[derive(Debug, Clone)]
pub struct DirectoryLoader {
    folder: PathBuf,
    exclude: Vec<String>,
    recurse: bool,
    options: LoaderOptions,
    entries: Vec<Entry>,
}

impl DirectoryLoader {
    /// Snapshot `folder` with the default `.js` options
    pub fn new<I, S>(folder: impl Into<PathBuf>, exclude: I, recurse: bool) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::with_options(folder, exclude, recurse, LoaderOptions::default())
    }

    pub fn with_options<I, S>(
        folder: impl Into<PathBuf>,
        exclude: I,
        recurse: bool,
        options: LoaderOptions,
    ) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let folder = folder.into();
        let exclude = exclude.into_iter().map(Into::into).collect();
        let entries = read_entries(&folder)?;
        debug!(folder = %folder.display(), entries = entries.len(), "snapshot folder");
        Ok(Self {
            folder,
            exclude,
            recurse,
            options,
            entries,
        })
    }

    pub fn folder(&self) -> &Path {
        &self.folder
    }

    /// Entry names captured at construction, sorted
    pub fn entries(&self) -> impl Iterator<Item = &str> + '_ {
        self.entries.iter().map(|entry| entry.name.as_str())
    }

    /// Entries that pass the module eligibility rules, in snapshot order
    pub fn loadable_entries(&self) -> impl Iterator<Item = &str> + '_ {
        self.loadable().map(|entry| entry.name.as_str())
    }

    /// Load every eligible module into a flat list.
    ///
    /// With `ListAggregation::LocalOnly` subfolders are still visited, so
    /// their modules execute, but only this folder's values are returned.
    pub fn load_list<R>(&self, resolver: &R) -> Result<Vec<Value>>
    where
        R: ModuleResolver + ?Sized,
    {
        let mut output = Vec::new();
        if !self.has_files() {
            return Ok(output);
        }

        if self.recurse {
            for entry in &self.entries {
                if let Some(child) = self.child(entry)? {
                    let results = child.load_list(resolver)?;
                    if self.options.list_aggregation == ListAggregation::Concatenate {
                        output.extend(results);
                    }
                }
            }
        }

        for entry in self.loadable() {
            output.push(self.require(entry, |path| resolver.load(path))?);
        }
        Ok(output)
    }

    /// Load every eligible module as a self-contained value, keyed by name
    pub fn load_objects<R>(&self, resolver: &R) -> Result<ObjectMap>
    where
        R: ModuleResolver + ?Sized,
    {
        self.load_map("load_objects", &|path: &Path| resolver.load(path))
    }

    /// Invoke every eligible module with `deps`, keyed by name
    pub fn load_models<D, F>(&self, factory: &F, deps: &D) -> Result<ObjectMap>
    where
        D: ?Sized,
        F: ModuleFactory<D> + ?Sized,
    {
        self.load_map("load_models", &|path: &Path| factory.invoke(path, deps))
    }

    fn load_map<L>(&self, operation: &str, load: &L) -> Result<ObjectMap>
    where
        L: Fn(&Path) -> anyhow::Result<Value>,
    {
        let mut output = ObjectMap::new();
        if !self.has_files() {
            return Ok(output);
        }

        if self.recurse {
            for entry in &self.entries {
                if let Some(child) = self.child(entry)? {
                    output.extend(child.load_map(operation, load)?);
                }
            }
        }

        for entry in self.loadable() {
            let file = entry.name.as_str();
            let mut object = self.require(entry, load)?;
            info!(operation, file, folder = %self.folder.display(), "loaded module");
            let name = resolve_name(&mut object, Some(file), &self.options)?;
            if output.contains_key(&name) {
                debug!(name = %name, file, "overwriting previously loaded object");
            }
            output.insert(name, object);
        }
        Ok(output)
    }

    fn loadable(&self) -> impl Iterator<Item = &Entry> + '_ {
        self.entries
            .iter()
            .filter(move |entry| self.options.is_loadable(&entry.name, &self.exclude))
    }

    fn require<L>(&self, entry: &Entry, load: L) -> Result<Value>
    where
        L: FnOnce(&Path) -> anyhow::Result<Value>,
    {
        let path = self.folder.join(&entry.raw);
        load(&path).map_err(|err| LoaderError::module_load(path, err))
    }

    // Single-entry folders are skipped entirely.
    fn has_files(&self) -> bool {
        self.entries.len() > 1
    }

    fn is_excluded(&self, name: &str) -> bool {
        self.exclude.iter().any(|e| e == name)
    }

    fn is_folder(&self, entry: &Entry) -> Result<bool> {
        let path = self.folder.join(&entry.raw);
        let metadata = fs::metadata(&path).map_err(|err| LoaderError::io(&path, err))?;
        Ok(metadata.is_dir() && !self.is_excluded(&entry.name))
    }

    /// Snapshot `entry` as a child loader when it is a folder to recurse into.
    ///
    /// Called lazily per entry so each subfolder is listed only after its
    /// earlier siblings have finished loading.
    fn child(&self, entry: &Entry) -> Result<Option<DirectoryLoader>> {
        if !self.is_folder(entry)? {
            return Ok(None);
        }
        debug!(folder = %self.folder.display(), subfolder = %entry.name, "recursing");
        Self::with_options(
            self.folder.join(&entry.raw),
            self.exclude.iter().cloned(),
            self.recurse,
            self.options.clone(),
        )
        .map(Some)
    }
}

fn read_entries(folder: &Path) -> Result<Vec<Entry>> {
    let mut entries = Vec::new();
    for entry in fs::read_dir(folder).map_err(|err| LoaderError::io(folder, err))? {
        let raw = entry.map_err(|err| LoaderError::io(folder, err))?.file_name();
        let name = raw.to_string_lossy().into_owned();
        entries.push(Entry { raw, name });
    }
    entries.sort_by(|a, b| a.raw.cmp(&b.raw));
    Ok(entries)
}
