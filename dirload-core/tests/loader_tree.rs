//! Whole-tree loading behaviour against real directories

use std::fs;
use std::path::Path;

use dirload_core::{DirectoryLoader, JsonResolver, LoaderError, LoaderOptions};
use serde_json::{json, Value};
use tempfile::TempDir;

fn write(dir: &Path, name: &str, value: Value) {
    fs::write(dir.join(name), serde_json::to_string(&value).unwrap()).unwrap();
}

fn subdir(dir: &Path, name: &str) -> std::path::PathBuf {
    let path = dir.join(name);
    fs::create_dir(&path).unwrap();
    path
}

fn no_exclusions() -> Vec<String> {
    Vec::new()
}

#[test]
fn test_mixed_tree_scenario() {
    let temp_dir = TempDir::new().unwrap();
    let root = temp_dir.path();
    write(root, "a.js", json!({"name": "Alpha"}));
    write(root, "b.js", json!({}));
    let sub = subdir(root, "sub");
    write(&sub, "c.js", json!({"name": "Gamma"}));
    write(&sub, "index.js", json!({"name": "Barrel"}));

    let loader = DirectoryLoader::new(root, no_exclusions(), true).unwrap();
    let objects = loader.load_objects(&JsonResolver).unwrap();

    assert_eq!(
        objects.keys().map(String::as_str).collect::<Vec<_>>(),
        vec!["Alpha", "Gamma", "b"]
    );
    assert_eq!(objects["b"], json!({"name": "b"}));
}

#[test]
fn test_flat_folder_one_entry_per_file() {
    let temp_dir = TempDir::new().unwrap();
    let root = temp_dir.path();
    write(root, "user.js", json!({"name": "User"}));
    write(root, "post.js", json!({"table": "posts"}));
    write(root, "widget.js", json!({}));

    let loader = DirectoryLoader::new(root, no_exclusions(), true).unwrap();
    let objects = loader.load_objects(&JsonResolver).unwrap();

    assert_eq!(objects.len(), 3);
    assert!(objects.contains_key("User"));
    assert!(objects.contains_key("post"));
    assert!(objects.contains_key("widget"));
}

#[test]
fn test_exclusion_blocks_files_and_folders() {
    let temp_dir = TempDir::new().unwrap();
    let root = temp_dir.path();
    write(root, "keep.js", json!({}));
    write(root, "skip.js", json!({}));
    let private = subdir(root, "private");
    write(&private, "secret.js", json!({}));
    write(&private, "other.js", json!({}));

    let loader = DirectoryLoader::new(root, ["skip.js", "private"], true).unwrap();
    let objects = loader.load_objects(&JsonResolver).unwrap();

    assert_eq!(objects.keys().collect::<Vec<_>>(), vec!["keep"]);
}

#[test]
fn test_exclusion_applies_in_nested_folders() {
    let temp_dir = TempDir::new().unwrap();
    let root = temp_dir.path();
    write(root, "a.js", json!({}));
    let sub = subdir(root, "sub");
    write(&sub, "b.js", json!({}));
    write(&sub, "skip.js", json!({}));

    let loader = DirectoryLoader::new(root, ["skip.js"], true).unwrap();
    let objects = loader.load_objects(&JsonResolver).unwrap();

    assert_eq!(objects.keys().collect::<Vec<_>>(), vec!["a", "b"]);
}

#[test]
fn test_hidden_and_index_never_loaded() {
    let temp_dir = TempDir::new().unwrap();
    let root = temp_dir.path();
    write(root, ".hidden.js", json!({"name": "Hidden"}));
    write(root, "index.js", json!({"name": "Index"}));
    write(root, "real.js", json!({}));

    let loader = DirectoryLoader::new(root, no_exclusions(), true).unwrap();
    let objects = loader.load_objects(&JsonResolver).unwrap();

    assert_eq!(objects.keys().collect::<Vec<_>>(), vec!["real"]);
}

#[test]
fn test_non_script_folders_still_recursed() {
    let temp_dir = TempDir::new().unwrap();
    let root = temp_dir.path();
    write(root, "readme.md", json!("docs"));
    let nested = subdir(root, "models");
    write(&nested, "order.js", json!({}));
    write(&nested, "notes.txt", json!("ignored"));

    let loader = DirectoryLoader::new(root, no_exclusions(), true).unwrap();
    let objects = loader.load_objects(&JsonResolver).unwrap();

    assert_eq!(objects.keys().collect::<Vec<_>>(), vec!["order"]);
}

#[test]
fn test_collision_across_subfolders_last_wins() {
    let temp_dir = TempDir::new().unwrap();
    let root = temp_dir.path();
    let first = subdir(root, "a_first");
    let second = subdir(root, "b_second");
    write(&first, "thing.js", json!({"name": "Thing", "from": "first"}));
    write(&first, "x.js", json!({}));
    write(&second, "thing.js", json!({"name": "Thing", "from": "second"}));
    write(&second, "y.js", json!({}));

    let loader = DirectoryLoader::new(root, no_exclusions(), true).unwrap();
    let objects = loader.load_objects(&JsonResolver).unwrap();

    assert_eq!(objects.len(), 3);
    assert_eq!(objects["Thing"]["from"], "second");
}

#[test]
fn test_null_module_aborts_whole_load() {
    let temp_dir = TempDir::new().unwrap();
    let root = temp_dir.path();
    write(root, "good.js", json!({}));
    let sub = subdir(root, "sub");
    write(&sub, "empty.js", Value::Null);
    write(&sub, "fine.js", json!({}));

    let loader = DirectoryLoader::new(root, no_exclusions(), true).unwrap();
    let err = loader.load_objects(&JsonResolver).unwrap_err();

    match err {
        LoaderError::NullObject { file } => assert_eq!(file, "empty.js"),
        other => panic!("expected null object error, got {other}"),
    }
}

#[test]
fn test_models_receive_shared_deps_across_tree() {
    let temp_dir = TempDir::new().unwrap();
    let root = temp_dir.path();
    write(root, "user.js", json!({}));
    let sub = subdir(root, "billing");
    write(&sub, "invoice.js", json!({}));
    write(&sub, "payment.js", json!({}));

    let deps = json!({"connection": "shared"});
    let factory = |path: &Path, deps: &Value| -> anyhow::Result<Value> {
        let mut value: Value = serde_json::from_str(&fs::read_to_string(path)?)?;
        value["connection"] = deps["connection"].clone();
        Ok(value)
    };

    let loader = DirectoryLoader::new(root, no_exclusions(), true).unwrap();
    let models = loader.load_models(&factory, &deps).unwrap();

    assert_eq!(models.len(), 3);
    assert!(models.values().all(|m| m["connection"] == "shared"));
}

#[test]
fn test_custom_suffix() {
    let temp_dir = TempDir::new().unwrap();
    let root = temp_dir.path();
    write(root, "a.json", json!({}));
    write(root, "b.js", json!({}));
    write(root, "index.json", json!({}));

    let loader = DirectoryLoader::with_options(
        root,
        no_exclusions(),
        true,
        LoaderOptions::with_suffix(".json"),
    )
    .unwrap();
    let objects = loader.load_objects(&JsonResolver).unwrap();

    assert_eq!(objects.keys().collect::<Vec<_>>(), vec!["a"]);
}

#[cfg(unix)]
#[test]
fn test_broken_symlink_is_filesystem_error() {
    let temp_dir = TempDir::new().unwrap();
    let root = temp_dir.path();
    write(root, "a.js", json!({}));
    std::os::unix::fs::symlink(root.join("missing"), root.join("dangling")).unwrap();

    let loader = DirectoryLoader::new(root, no_exclusions(), true).unwrap();
    let err = loader.load_objects(&JsonResolver).unwrap_err();

    assert!(matches!(err, LoaderError::Io { .. }));
}

#[cfg(unix)]
#[test]
fn test_non_utf8_entry_does_not_break_scan() {
    use std::ffi::OsStr;
    use std::os::unix::ffi::OsStrExt;

    let temp_dir = TempDir::new().unwrap();
    let root = temp_dir.path();
    write(root, "a.js", json!({"name": "A"}));
    write(root, "b.js", json!({}));
    fs::write(root.join(OsStr::from_bytes(b"notes\xff.txt")), "stray").unwrap();
    let odd_dir = root.join(OsStr::from_bytes(b"sub\xfe"));
    fs::create_dir(&odd_dir).unwrap();
    write(&odd_dir, "c.js", json!({"name": "C"}));
    write(&odd_dir, "d.js", json!({}));

    let loader = DirectoryLoader::new(root, no_exclusions(), true).unwrap();
    let objects = loader.load_objects(&JsonResolver).unwrap();

    assert_eq!(objects.keys().collect::<Vec<_>>(), vec!["A", "C", "b", "d"]);
}
