// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

#[test]
fn create_today_makes_parent_and_dated_name() {
    let tmp = tempfile::tempdir().unwrap();
    let jel_dir = tmp.path().join("jels");
    let paths = JelPaths::new(&jel_dir);

    let fpath = paths.create_today().unwrap();
    assert!(jel_dir.is_dir());
    assert_eq!(fpath.parent(), Some(jel_dir.as_path()));

    let name = fpath.file_name().unwrap().to_str().unwrap();
    assert!(name.ends_with(".tms.jel"));
    // date-stamped stem: YYYY-MM-DD
    let stem = name.trim_end_matches(".tms.jel");
    assert_eq!(stem.len(), 10);
    assert_eq!(stem.matches('-').count(), 2);
}

#[test]
fn is_valid_accepts_only_jels_in_the_configured_dir() {
    let tmp = tempfile::tempdir().unwrap();
    let paths = JelPaths::new(tmp.path());

    let good = tmp.path().join("2024-01-27.tms.jel");
    std::fs::write(&good, "").unwrap();
    assert!(paths.is_valid(&good));

    // wrong suffix
    let wrong_suffix = tmp.path().join("2024-01-27.log");
    std::fs::write(&wrong_suffix, "").unwrap();
    assert!(!paths.is_valid(&wrong_suffix));

    // right suffix, wrong parent
    let sub = tmp.path().join("sub");
    std::fs::create_dir(&sub).unwrap();
    let wrong_parent = sub.join("2024-01-27.tms.jel");
    std::fs::write(&wrong_parent, "").unwrap();
    assert!(!paths.is_valid(&wrong_parent));

    // right name, but a directory
    let dir_not_file = tmp.path().join("fake.tms.jel");
    std::fs::create_dir(&dir_not_file).unwrap();
    assert!(!paths.is_valid(&dir_not_file));

    // right name, does not exist
    assert!(!paths.is_valid(&tmp.path().join("ghost.tms.jel")));
}

#[test]
fn taskforce_dir_create_is_idempotent() {
    let tmp = tempfile::tempdir().unwrap();
    let dirs = TaskforceDirs::new(tmp.path());
    let uuid = TaskforceUuid::new("TF-abc");

    let p1 = dirs.create(&uuid).unwrap();
    let p2 = dirs.create(&uuid).unwrap();
    assert_eq!(p1, p2);
    assert!(p1.is_dir());
    assert_eq!(
        p1.file_name().unwrap().to_str().unwrap(),
        "ewms-taskforce-TF-abc"
    );
}

#[test]
fn glob_patterns_cover_the_three_swept_shapes() {
    let jels = JelPaths::new("/data/jel");
    let dirs = TaskforceDirs::new("/data/jel");

    assert_eq!(jels.glob_pattern(), "/data/jel/*.tms.jel");
    assert_eq!(dirs.glob_pattern(), "/data/jel/ewms-taskforce-*");
    assert_eq!(
        dirs.tarball_glob_pattern(),
        "/data/jel/ewms-taskforce-*.tar.gz"
    );
}
