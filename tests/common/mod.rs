use hubtree::error::UnrecognizedPolicy;
use hubtree::hub::{build_ignore_set, BuildConfig, Node};
use std::fs;
use tempfile::TempDir;

/// Default BuildConfig: unrecognized entries are fatal.
pub fn default_build_config() -> BuildConfig {
    BuildConfig {
        unrecognized: UnrecognizedPolicy::Fatal,
        ignore_patterns: build_ignore_set(&[]),
        follow_symlinks: true,
    }
}

/// BuildConfig that skips unrecognized entries with a warning.
pub fn warn_build_config() -> BuildConfig {
    BuildConfig {
        unrecognized: UnrecognizedPolicy::Warn,
        ..default_build_config()
    }
}

/// Create a directory structure from a list of relative paths.
/// Paths ending with '/' create directories; others create small files.
pub fn create_fixture(paths: &[&str]) -> TempDir {
    let tmp = TempDir::new().unwrap();
    for p in paths {
        let full = tmp.path().join(p);
        if p.ends_with('/') {
            fs::create_dir_all(&full).unwrap();
        } else {
            if let Some(parent) = full.parent() {
                fs::create_dir_all(parent).unwrap();
            }
            fs::write(&full, p.as_bytes()).unwrap();
        }
    }
    tmp
}

/// The layout used throughout: one super track with a composite and a
/// multiWig, plus a top-level track.
pub fn standard_fixture() -> TempDir {
    create_fixture(&[
        "a.super/b.composite/track1.bw",
        "a.super/c.multiwig/track2.bb",
        "track3.bw",
    ])
}

/// Names of `nodes`, in order.
pub fn names(nodes: &[Node]) -> Vec<&str> {
    nodes.iter().map(|n| n.name.as_str()).collect()
}
