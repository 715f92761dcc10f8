//! Smoke tests for the dirload binary

use std::fs;

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

fn dirload() -> Command {
    let mut cmd = Command::cargo_bin("dirload").unwrap();
    cmd.env_remove("DIRLOAD_MODULE_COMMAND")
        .env_remove("DIRLOAD_ENV")
        .env_remove("DIRLOAD_CONFIG_DIR");
    cmd
}

fn model_tree() -> TempDir {
    let temp_dir = TempDir::new().unwrap();
    let root = temp_dir.path();
    fs::write(root.join("a.json"), r#"{"name": "Alpha"}"#).unwrap();
    fs::write(root.join("b.json"), "{}").unwrap();
    fs::create_dir(root.join("sub")).unwrap();
    fs::write(root.join("sub/c.json"), r#"{"name": "Gamma"}"#).unwrap();
    fs::write(root.join("sub/d.json"), "{}").unwrap();
    temp_dir
}

// === Help Tests ===

#[test]
fn test_objects_help() {
    dirload()
        .arg("objects")
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Entry name to skip"));
}

#[test]
fn test_models_help() {
    dirload()
        .arg("models")
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("DIRLOAD_ENV"));
}

// === Loading Tests ===

#[test]
fn test_objects_prints_name_keyed_map() {
    let tree = model_tree();

    let output = dirload()
        .arg("objects")
        .arg(tree.path())
        .args(["--suffix", ".json"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let map: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    let mut keys: Vec<_> = map.as_object().unwrap().keys().cloned().collect();
    keys.sort();
    assert_eq!(keys, vec!["Alpha", "Gamma", "b", "d"]);
}

#[test]
fn test_objects_respects_exclude() {
    let tree = model_tree();

    dirload()
        .arg("objects")
        .arg(tree.path())
        .args(["--suffix", ".json", "--exclude", "sub"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Alpha").and(predicate::str::contains("Gamma").not()));
}

#[test]
fn test_list_local_only() {
    let tree = model_tree();

    let output = dirload()
        .arg("list")
        .arg(tree.path())
        .args(["--suffix", ".json", "--local-only"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let list: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(list.as_array().unwrap().len(), 2);
}

#[test]
fn test_null_module_fails_without_output() {
    let tree = model_tree();
    fs::write(tree.path().join("empty.json"), "null").unwrap();

    dirload()
        .arg("objects")
        .arg(tree.path())
        .args(["--suffix", ".json"])
        .assert()
        .failure()
        .stdout(predicate::str::is_empty())
        .stderr(predicate::str::contains("Object is null"));
}

#[test]
fn test_missing_folder_fails() {
    let temp_dir = TempDir::new().unwrap();

    dirload()
        .arg("objects")
        .arg(temp_dir.path().join("nope"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to open folder"));
}

#[test]
fn test_models_without_profile_fails() {
    let tree = model_tree();
    let configs = TempDir::new().unwrap();

    dirload()
        .current_dir(configs.path())
        .arg("models")
        .arg(tree.path())
        .args(["--suffix", ".json", "--command", "cat", "--env", "staging"])
        .arg("--config-dir")
        .arg(configs.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("No database profile for environment 'staging'"));
}

#[cfg(unix)]
#[test]
fn test_models_pass_shared_deps_to_command() {
    let tree = model_tree();
    let configs = TempDir::new().unwrap();
    fs::write(
        configs.path().join("development.toml"),
        "[db]\ndatabase = \"app_dev\"\nuser = \"dev\"\nhost = \"127.0.0.1\"\n",
    )
    .unwrap();

    // The module command echoes the dependencies back as the model
    let output = dirload()
        .current_dir(configs.path())
        .arg("models")
        .arg(tree.path())
        .args(["--suffix", ".json", "--command", "sh -c cat"])
        .arg("--config-dir")
        .arg(configs.path())
        .output()
        .unwrap();
    assert!(output.status.success());

    let map: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(map["b"]["connection"]["database"], "app_dev");
    assert_eq!(map["d"]["data_types"]["STRING"], "VARCHAR(255)");
}
