//! The validated hub hierarchy and the walk that builds it.

mod build;

use globset::GlobSet;
use std::path::{Path, PathBuf};

use crate::classify::Kind;
use crate::error::{UnrecognizedPolicy, Violation};
use crate::overrides::Settings;

pub use build::{build, build_ignore_set};

/// One container directory or track file of the hub.
#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    /// Entry name with its classifying suffix removed.
    pub name: String,
    pub kind: Kind,
    /// Path of the original entry.
    pub source_path: PathBuf,
    /// Path of the entry relative to the source root.
    pub rel_path: PathBuf,
    /// Children in name order. Always empty for tracks.
    pub children: Vec<Node>,
    /// 0 for entries directly under the source root.
    pub depth: usize,
    /// Settings from `trackhub.toml`, applied last when emitting.
    pub overrides: Settings,
}

impl Node {
    /// Original entry name, suffix included.
    pub fn file_name(&self) -> String {
        self.source_path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| self.name.clone())
    }

    /// `/`-separated relative path, used for link names and `bigDataUrl`.
    pub fn rel_url(&self) -> String {
        self.rel_path
            .components()
            .map(|c| c.as_os_str().to_string_lossy())
            .collect::<Vec<_>>()
            .join("/")
    }

    /// Track type shared by the children of a container; `None` for an
    /// empty container or one that mixes kinds.
    pub fn child_track_type(&self) -> Option<&'static str> {
        let mut kinds = self.children.iter().filter(|c| c.kind.is_track()).map(|c| c.kind);
        let first = kinds.next()?;
        if kinds.all(|k| k == first) {
            first.track_type()
        } else {
            None
        }
    }

    /// Depth-first iterator over this node and its descendants.
    pub fn walk(&self) -> impl Iterator<Item = &Node> {
        let mut stack = vec![self];
        std::iter::from_fn(move || {
            let node = stack.pop()?;
            stack.extend(node.children.iter().rev());
            Some(node)
        })
    }
}

/// A validated hub: the top-level nodes found under `root`.
#[derive(Debug, Clone, PartialEq)]
pub struct Hub {
    pub root: PathBuf,
    pub nodes: Vec<Node>,
    /// Non-fatal violations (skipped unrecognized entries).
    pub warnings: Vec<Violation>,
}

impl Hub {
    /// All nodes in emission order.
    pub fn iter(&self) -> impl Iterator<Item = &Node> {
        self.nodes.iter().flat_map(|n| n.walk())
    }

    pub fn tracks(&self) -> impl Iterator<Item = &Node> {
        self.iter().filter(|n| n.kind.is_track())
    }

    pub fn containers(&self) -> impl Iterator<Item = &Node> {
        self.iter().filter(|n| n.kind.is_container())
    }
}

/// Configuration for walking a source tree.
pub struct BuildConfig {
    /// What to do with entries that are neither containers nor tracks.
    pub unrecognized: UnrecognizedPolicy,
    /// Glob patterns (relative to the root) for entries to leave out silently.
    pub ignore_patterns: GlobSet,
    /// Classify symlinks by what they point to.
    pub follow_symlinks: bool,
}

impl Default for BuildConfig {
    fn default() -> Self {
        Self {
            unrecognized: UnrecognizedPolicy::default(),
            ignore_patterns: build_ignore_set(&[]),
            follow_symlinks: true,
        }
    }
}

/// Abstraction over hub construction so it can be swapped or mocked.
pub trait HubBuilder {
    fn build_hub(&self, root: &Path, config: &BuildConfig) -> Result<Hub, crate::error::BuildError>;
}

/// Default `HubBuilder` backed by the walkdir-based walk.
pub struct WalkdirHubBuilder;

impl HubBuilder for WalkdirHubBuilder {
    fn build_hub(&self, root: &Path, config: &BuildConfig) -> Result<Hub, crate::error::BuildError> {
        build(root, config)
    }
}
