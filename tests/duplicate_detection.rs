mod common;

use common::{create_file, deletion_paths, run_json, tick};
use tempfile::TempDir;

#[test]
fn test_keeps_earliest_created_copy() {
    let dir = TempDir::new().unwrap();
    create_file(dir.path(), "a.txt", b"X");
    tick();
    create_file(dir.path(), "b.txt", b"X");
    tick();
    create_file(dir.path(), "c.txt", b"Y");

    let json = run_json(dir.path(), &["--dry-run"]);

    assert_eq!(deletion_paths(&json, dir.path()), vec!["b.txt"]);
    assert_eq!(json["stats"]["duplicate_files"], 1);
    assert_eq!(json["stats"]["reclaimable_bytes"], 1);
    assert!(
        json["deletions"][0]["kept"]
            .as_str()
            .unwrap()
            .ends_with("a.txt")
    );
}

#[test]
fn test_age_beats_name_order() {
    let dir = TempDir::new().unwrap();
    create_file(dir.path(), "zz_original.txt", b"same bytes");
    tick();
    create_file(dir.path(), "aa_copy.txt", b"same bytes");

    let json = run_json(dir.path(), &["--dry-run"]);

    assert_eq!(deletion_paths(&json, dir.path()), vec!["aa_copy.txt"]);
}

#[test]
fn test_all_distinct_files() {
    let dir = TempDir::new().unwrap();
    create_file(dir.path(), "a.txt", b"content a");
    create_file(dir.path(), "b.txt", b"content b");
    create_file(dir.path(), "c.txt", b"content c");

    let json = run_json(dir.path(), &["--dry-run"]);

    assert!(json["deletions"].as_array().unwrap().is_empty());
    assert_eq!(json["stats"]["files_scanned"], 3);
    assert_eq!(json["stats"]["reclaimable_bytes"], 0);
}

#[test]
fn test_large_files_detected() {
    let dir = TempDir::new().unwrap();
    // Several hash chunks long
    let large_content: Vec<u8> = (0..300 * 1024).map(|i| (i % 251) as u8).collect();
    create_file(dir.path(), "large_a.bin", &large_content);
    tick();
    create_file(dir.path(), "large_b.bin", &large_content);

    let json = run_json(dir.path(), &["--dry-run"]);

    assert_eq!(deletion_paths(&json, dir.path()), vec!["large_b.bin"]);
    assert_eq!(json["stats"]["reclaimable_bytes"], large_content.len() as u64);
}

#[test]
fn test_three_way_duplicates() {
    let dir = TempDir::new().unwrap();
    create_file(dir.path(), "a.txt", b"triple duplicate");
    tick();
    create_file(dir.path(), "b.txt", b"triple duplicate");
    create_file(dir.path(), "c.txt", b"triple duplicate");

    let json = run_json(dir.path(), &["--dry-run"]);

    let mut deleted = deletion_paths(&json, dir.path());
    deleted.sort();
    assert_eq!(deleted, vec!["b.txt", "c.txt"]);
    // Two copies go, one stays
    let wasted = json["stats"]["reclaimable_bytes"].as_u64().unwrap();
    assert_eq!(wasted, 2 * b"triple duplicate".len() as u64);
}

#[test]
fn test_multiple_duplicate_groups() {
    let dir = TempDir::new().unwrap();
    let content1 = b"group one content";
    let content2 = b"group two content, longer";
    create_file(dir.path(), "group1_a.txt", content1);
    create_file(dir.path(), "group2_a.txt", content2);
    tick();
    create_file(dir.path(), "group1_b.txt", content1);
    create_file(dir.path(), "group2_b.txt", content2);

    let json = run_json(dir.path(), &["--dry-run"]);

    assert_eq!(
        deletion_paths(&json, dir.path()),
        vec!["group1_b.txt", "group2_b.txt"]
    );
    let expected_wasted = content1.len() + content2.len();
    assert_eq!(json["stats"]["reclaimable_bytes"], expected_wasted as u64);
}

#[test]
fn test_empty_files_are_duplicates_of_each_other() {
    let dir = TempDir::new().unwrap();
    create_file(dir.path(), "empty1.txt", b"");
    tick();
    create_file(dir.path(), "empty2.txt", b"");

    let json = run_json(dir.path(), &["--dry-run"]);

    assert_eq!(deletion_paths(&json, dir.path()), vec!["empty2.txt"]);
    assert_eq!(json["stats"]["reclaimable_bytes"], 0);
}

#[test]
fn test_duplicates_across_folders_are_not_compared() {
    let dir = TempDir::new().unwrap();
    create_file(dir.path(), "top.txt", b"shared content");
    create_file(dir.path(), "sub/copy.txt", b"shared content");
    create_file(dir.path(), "other/copy.txt", b"shared content");

    let json = run_json(dir.path(), &["--dry-run"]);

    assert!(json["deletions"].as_array().unwrap().is_empty());
    assert_eq!(json["stats"]["files_scanned"], 3);
}

#[cfg(unix)]
#[test]
fn test_broken_entry_does_not_disturb_grouping() {
    let dir = TempDir::new().unwrap();
    create_file(dir.path(), "a.txt", b"dup");
    tick();
    create_file(dir.path(), "b.txt", b"dup");
    std::os::unix::fs::symlink(dir.path().join("missing"), dir.path().join("broken")).unwrap();

    let json = run_json(dir.path(), &["--dry-run", "--follow-symlinks"]);

    assert_eq!(deletion_paths(&json, dir.path()), vec!["b.txt"]);
    assert_eq!(json["stats"]["errors"], 1);
    assert_eq!(json["errors"][0]["kind"], "unreadable_file");
}

#[cfg(unix)]
#[test]
fn test_symlinks_skipped_by_default() {
    let dir = TempDir::new().unwrap();
    create_file(dir.path(), "real.txt", b"content");
    std::os::unix::fs::symlink(dir.path().join("real.txt"), dir.path().join("link.txt")).unwrap();

    let json = run_json(dir.path(), &["--dry-run"]);

    assert!(json["deletions"].as_array().unwrap().is_empty());
    assert_eq!(json["stats"]["files_scanned"], 1);
    assert_eq!(json["errors"][0]["kind"], "not_regular_file");
}
