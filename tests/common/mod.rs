#![allow(dead_code)]

use assert_cmd::cargo;
use std::fs;
use std::path::Path;
use std::thread;
use std::time::Duration;

pub fn dedup() -> assert_cmd::Command {
    assert_cmd::Command::new(cargo::cargo_bin!("folder-dedup"))
}

pub fn create_file(dir: &Path, name: &str, content: &[u8]) {
    let path = dir.join(name);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(path, content).unwrap();
}

/// Sleep long enough that files created afterwards are strictly newer,
/// even on filesystems with one-second timestamps
pub fn tick() {
    thread::sleep(Duration::from_millis(1100));
}

/// Run with JSON output and the given extra arguments, returning the report
pub fn run_json(dir: &Path, args: &[&str]) -> serde_json::Value {
    let output = dedup()
        .arg(dir)
        .args(args)
        .arg("--format")
        .arg("json")
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();

    serde_json::from_slice(&output).unwrap()
}

/// Paths of the planned deletions, relative to `root`, in report order
pub fn deletion_paths(json: &serde_json::Value, root: &Path) -> Vec<String> {
    json["deletions"]
        .as_array()
        .unwrap()
        .iter()
        .map(|d| {
            Path::new(d["path"].as_str().unwrap())
                .strip_prefix(root)
                .unwrap()
                .to_string_lossy()
                .into_owned()
        })
        .collect()
}
