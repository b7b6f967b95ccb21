mod common;

use assert_cmd::Command;
use common::{create_fixture, standard_fixture};
use predicates::prelude::*;
use std::fs;
use tempfile::TempDir;

fn hubtree() -> Command {
    Command::cargo_bin("hubtree").unwrap()
}

#[test]
fn test_help_flag() {
    hubtree()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Build a UCSC track hub trackDb"))
        .stdout(predicate::str::contains("--output-dir"))
        .stdout(predicate::str::contains("--trackdb-filename"))
        .stdout(predicate::str::contains("--start-index"))
        .stdout(predicate::str::contains("--file-path"))
        .stdout(predicate::str::contains("--post-content"))
        .stdout(predicate::str::contains("--on-unrecognized"))
        .stdout(predicate::str::contains("--link-mode"))
        .stdout(predicate::str::contains("Examples:"));
}

#[test]
fn test_version_flag() {
    hubtree()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("hubtree"));
}

#[test]
fn test_output_dir_is_required() {
    let tmp = standard_fixture();
    hubtree()
        .arg(tmp.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("--output-dir"));
}

#[test]
fn test_nonexistent_path_exits_with_error() {
    let out = TempDir::new().unwrap();
    hubtree()
        .args(["-o", out.path().to_str().unwrap(), "/this/path/does/not/exist"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("No such file"));
}

#[test]
fn test_file_path_exits_with_error() {
    let tmp = create_fixture(&["afile.bw"]);
    let out = TempDir::new().unwrap();
    hubtree()
        .arg("-o")
        .arg(out.path())
        .arg(tmp.path().join("afile.bw"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("Not a directory"));
}

#[test]
fn test_writes_trackdb_and_links() {
    let tmp = standard_fixture();
    let out = TempDir::new().unwrap();
    let hub_dir = out.path().join("hg38");

    hubtree().arg("-o").arg(&hub_dir).arg(tmp.path()).assert().success();

    let trackdb = fs::read_to_string(hub_dir.join("trackDb.txt")).unwrap();
    assert!(trackdb.contains("superTrack on"));
    assert!(trackdb.contains("bigDataUrl a.super/b.composite/track1.bw"));
    assert!(hub_dir.join("a.super/b.composite/track1.bw").exists());
    assert!(hub_dir.join("a.super/c.multiwig/track2.bb").exists());
    assert!(hub_dir.join("track3.bw").exists());
}

#[test]
fn test_trackdb_options() {
    let tmp = standard_fixture();
    let out = TempDir::new().unwrap();

    hubtree()
        .arg("-o")
        .arg(out.path())
        .args(["-t", "trackDb.extra.txt", "-i", "5"])
        .args(["-f", "https://example.org/hub/hg38/"])
        .args(["-p", "include trackDb.more.txt"])
        .arg(tmp.path())
        .assert()
        .success();

    let trackdb = fs::read_to_string(out.path().join("trackDb.extra.txt")).unwrap();
    assert!(trackdb.contains("track track_5\n"));
    assert!(trackdb.contains("track track_7\n"));
    assert!(!trackdb.contains("track track_8\n"));
    assert!(trackdb.contains("bigDataUrl https://example.org/hub/hg38/track3.bw"));
    assert!(trackdb.ends_with("include trackDb.more.txt\n"));
}

#[test]
fn test_empty_trackdb_filename_rejected() {
    let tmp = standard_fixture();
    let out = TempDir::new().unwrap();
    hubtree()
        .arg("-o")
        .arg(out.path())
        .args(["-t", ""])
        .arg(tmp.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("please provide a file name"));
}

#[test]
fn test_start_index_must_be_positive() {
    let tmp = standard_fixture();
    let out = TempDir::new().unwrap();
    hubtree()
        .arg("-o")
        .arg(out.path())
        .args(["-i", "0"])
        .arg(tmp.path())
        .assert()
        .failure();
}

#[test]
fn test_unrecognized_entry_aborts_without_output() {
    let tmp = create_fixture(&["a.composite/x.bw", "notes.txt"]);
    let out = TempDir::new().unwrap();
    let hub_dir = out.path().join("hub");

    hubtree()
        .arg("-o")
        .arg(&hub_dir)
        .arg(tmp.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("notes.txt"))
        .stderr(predicate::str::contains("unrecognized entry"))
        .stderr(predicate::str::contains("nothing written"));

    assert!(!hub_dir.exists());
}

#[test]
fn test_unrecognized_entry_skipped_with_warn() {
    let tmp = create_fixture(&["a.composite/x.bw", "notes.txt"]);
    let out = TempDir::new().unwrap();

    hubtree()
        .arg("-o")
        .arg(out.path())
        .args(["--on-unrecognized", "warn"])
        .arg(tmp.path())
        .assert()
        .success()
        .stderr(predicate::str::contains("notes.txt"));

    assert!(out.path().join("a.composite/x.bw").exists());
    assert!(!out.path().join("notes.txt").exists());
}

#[test]
fn test_every_violation_is_listed() {
    let tmp = create_fixture(&[
        "foo.super/bar.composite/baz.multiwig/track.bw",
        "q.composite/sub.multiwig/",
    ]);
    let out = TempDir::new().unwrap();

    hubtree()
        .arg("-o")
        .arg(out.path())
        .arg(tmp.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("baz.multiwig"))
        .stderr(predicate::str::contains("nested too deep"))
        .stderr(predicate::str::contains("sub.multiwig: not allowed inside"))
        .stderr(predicate::str::contains("2 problem(s)"));
}

#[test]
fn test_link_error_exits_nonzero_after_writing_trackdb() {
    let tmp = standard_fixture();
    let out = TempDir::new().unwrap();
    fs::create_dir_all(out.path().join("track3.bw")).unwrap();

    hubtree()
        .arg("-o")
        .arg(out.path())
        .arg(tmp.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("could not be placed"));

    assert!(out.path().join("trackDb.txt").exists());
}

#[test]
fn test_output_inside_source_is_refused() {
    let tmp = create_fixture(&["a.composite/x.bw"]);

    hubtree()
        .arg("-o")
        .arg(tmp.path())
        .arg(tmp.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("inside the source tree"));

    let source = tmp.path().join("a.composite/x.bw");
    assert!(fs::symlink_metadata(&source).unwrap().file_type().is_file());
    assert_eq!(fs::read_to_string(&source).unwrap(), "a.composite/x.bw");
    assert!(!tmp.path().join("trackDb.txt").exists());
}

#[test]
fn test_default_args() {
    use clap::Parser;
    use hubtree::cli::Args;
    use hubtree::error::UnrecognizedPolicy;
    use hubtree::link::LinkMode;
    let args = Args::parse_from(["hubtree", "-o", "out", "data"]);
    assert_eq!(args.trackdb_filename, "trackDb.txt");
    assert_eq!(args.start_index, 1);
    assert_eq!(args.file_path, "");
    assert_eq!(args.on_unrecognized, UnrecognizedPolicy::Fatal);
    assert_eq!(args.link_mode, LinkMode::Relative);
    assert!(!args.no_follow_symlinks);
}

#[test]
fn test_multiple_ignore_patterns() {
    use clap::Parser;
    use hubtree::cli::Args;
    let args = Args::parse_from(["hubtree", "-o", "out", "-I", "*.log", "-I", "scratch", "data"]);
    assert_eq!(args.ignore, vec!["*.log", "scratch"]);
}

#[test]
fn test_quiet_resets_verbose() {
    use clap::Parser;
    use hubtree::cli::Args;
    let args = Args::parse_from(["hubtree", "-o", "out", "-vv", "--quiet", "data"]).validated();
    assert!(args.quiet);
    assert_eq!(args.verbose, 0);
    assert_eq!(args.log_level(), "error");
}

#[test]
fn test_verbose_levels() {
    use clap::Parser;
    use hubtree::cli::Args;
    let levels: Vec<&str> = ["-v", "-vv", "-vvv"]
        .iter()
        .map(|v| Args::parse_from(["hubtree", "-o", "out", *v, "data"]).log_level())
        .collect();
    assert_eq!(levels, vec!["info", "debug", "trace"]);
}
