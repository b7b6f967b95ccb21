//! Violations found while validating a source tree, and link failures.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// How to treat entries that are neither a container directory nor a track file.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum UnrecognizedPolicy {
    /// Report the entry and refuse to build the hub.
    #[default]
    Fatal,
    /// Log a warning and leave the entry out of the hub.
    Warn,
}

/// A single structural problem in the source tree.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Violation {
    #[error("{}: container nested too deep (depth {depth}); only one container level is allowed below a .super directory", .path.display())]
    UnsupportedNesting { path: PathBuf, depth: usize },

    #[error("{}: not allowed inside {}", .child.display(), .container.display())]
    IllegalContainment { container: PathBuf, child: PathBuf },

    #[error("{}: unrecognized entry (expected a .super/.composite/.multiwig directory or a .bw/.bigwig/.bb/.bigbed file)", .path.display())]
    UnrecognizedEntry { path: PathBuf },

    #[error("{}: container holds no tracks", .path.display())]
    EmptyContainer { path: PathBuf },

    #[error("{}: mixes bigWig and bigBed tracks", .container.display())]
    MixedTrackTypes { container: PathBuf },

    #[error("{}: track name '{name}' is already used by {}", .path.display(), .first.display())]
    DuplicateTrackName {
        path: PathBuf,
        name: String,
        first: PathBuf,
    },

    #[error("{}: container name '{name}' clashes with generated track ids ({prefix}N)", .path.display())]
    ReservedTrackName {
        path: PathBuf,
        name: String,
        prefix: &'static str,
    },

    #[error("{}: invalid overrides file: {message}", .path.display())]
    InvalidOverrides { path: PathBuf, message: String },

    #[error("{}: {message}", .path.display())]
    Unreadable { path: PathBuf, message: String },
}

impl Violation {
    /// Whether this violation prevents the hub from being built under `policy`.
    pub fn is_fatal(&self, policy: UnrecognizedPolicy) -> bool {
        match self {
            Violation::UnrecognizedEntry { .. } => policy == UnrecognizedPolicy::Fatal,
            _ => true,
        }
    }
}

/// Every violation found in one walk of the source tree.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{} problem(s) found under {}", .violations.len(), .root.display())]
pub struct BuildError {
    pub root: PathBuf,
    pub violations: Vec<Violation>,
}

/// A leaf file that could not be linked into the output directory.
#[derive(Debug, Error)]
#[error("{} -> {}: {error}", .destination.display(), .source_path.display())]
pub struct LinkError {
    pub source_path: PathBuf,
    pub destination: PathBuf,
    pub error: io::Error,
}
