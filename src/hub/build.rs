use globset::{Glob, GlobSet, GlobSetBuilder};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};
use walkdir::WalkDir;

use super::{BuildConfig, Hub, Node};
use crate::classify::{classify, display_name, Kind};
use crate::emit::TRACK_ID_PREFIX;
use crate::error::{BuildError, Violation};
use crate::overrides::{Overrides, Settings, OVERRIDES_FILE};

/// Build a GlobSet from user ignore patterns.
/// Invalid patterns are skipped with a warning.
pub fn build_ignore_set(user_patterns: &[String]) -> GlobSet {
    let mut builder = GlobSetBuilder::new();
    let mut invalid = Vec::new();
    for pattern in user_patterns {
        match Glob::new(pattern) {
            Ok(g) => {
                builder.add(g);
            }
            Err(_) => invalid.push(pattern.clone()),
        }
    }
    if !invalid.is_empty() {
        warn!("invalid ignore pattern(s), skipped: {:?}", invalid);
    }
    builder.build().unwrap_or_else(|e| {
        warn!("failed to build ignore set: {}", e);
        GlobSet::empty()
    })
}

/// Walk `root`, classify every entry and validate the hierarchy.
///
/// All violations are collected in one pass. A hub is returned only when
/// none of them is fatal under `config.unrecognized`.
pub fn build(root: &Path, config: &BuildConfig) -> Result<Hub, BuildError> {
    let root = match root.canonicalize() {
        Ok(p) if p.is_dir() => p,
        Ok(p) => return Err(single(p, "not a directory".to_string())),
        Err(e) => return Err(single(root.to_path_buf(), e.to_string())),
    };

    let mut walk = Walk {
        root: &root,
        config,
        violations: Vec::new(),
        names: HashMap::new(),
    };
    let mut overrides = walk.load_overrides(&root);
    let nodes = walk.entries(&root, 0, None, &mut overrides);
    report_unused(&root, &overrides);

    let violations = walk.violations;
    if violations.iter().any(|v| v.is_fatal(config.unrecognized)) {
        return Err(BuildError { root, violations });
    }

    let hub = Hub {
        root,
        nodes,
        warnings: violations,
    };
    info!(
        "validated {}: {} container(s), {} track(s), {} skipped",
        hub.root.display(),
        hub.containers().count(),
        hub.tracks().count(),
        hub.warnings.len()
    );
    Ok(hub)
}

fn single(path: PathBuf, message: String) -> BuildError {
    BuildError {
        root: path.clone(),
        violations: vec![Violation::Unreadable { path, message }],
    }
}

fn report_unused(dir: &Path, overrides: &Overrides) {
    for name in overrides.unused() {
        warn!(
            "{}: override for '{}' matches no entry",
            dir.join(OVERRIDES_FILE).display(),
            name
        );
    }
}

/// State threaded through one walk.
struct Walk<'a> {
    root: &'a Path,
    config: &'a BuildConfig,
    violations: Vec<Violation>,
    /// Container track names seen so far, with the first path that used them.
    names: HashMap<String, PathBuf>,
}

impl Walk<'_> {
    fn load_overrides(&mut self, dir: &Path) -> Overrides {
        Overrides::load(dir).unwrap_or_else(|message| {
            self.violations.push(Violation::InvalidOverrides {
                path: dir.join(OVERRIDES_FILE),
                message,
            });
            Overrides::default()
        })
    }

    /// Only the overrides file and `-I` matches are left out. Everything
    /// else, dotfiles included, is classified.
    fn is_skipped(&self, name: &str, path: &Path) -> bool {
        if name == OVERRIDES_FILE {
            return true;
        }
        let rel = path.strip_prefix(self.root).unwrap_or(path);
        self.config.ignore_patterns.is_match(rel)
    }

    /// Classify and validate the entries of `dir`, which sit at `depth`.
    /// `parent` is the kind of `dir`, `None` for the source root.
    fn entries(
        &mut self,
        dir: &Path,
        depth: usize,
        parent: Option<Kind>,
        overrides: &mut Overrides,
    ) -> Vec<Node> {
        let walker = WalkDir::new(dir)
            .min_depth(1)
            .max_depth(1)
            .follow_links(self.config.follow_symlinks)
            .sort_by_file_name();

        let mut nodes = Vec::new();
        for entry_result in walker {
            let entry = match entry_result {
                Ok(entry) => entry,
                Err(e) => {
                    let path = e.path().unwrap_or(dir).to_path_buf();
                    let message = match e.io_error() {
                        Some(io_err) => io_err.to_string(),
                        None => e.to_string(),
                    };
                    self.violations.push(Violation::Unreadable { path, message });
                    continue;
                }
            };

            let name = entry.file_name().to_string_lossy().into_owned();
            let path = entry.path();
            if self.is_skipped(&name, path) {
                debug!("ignored {}", path.display());
                continue;
            }

            let is_dir = entry.file_type().is_dir();
            let kind = classify(&name, is_dir);
            debug!("{} -> {:?} (depth {})", path.display(), kind, depth);

            match kind {
                Kind::Unrecognized => self.unrecognized(dir, path, is_dir, parent),
                Kind::BigWig | Kind::BigBed => {
                    let settings = overrides.take(&name);
                    nodes.push(self.node(path, &name, kind, depth, Vec::new(), settings));
                }
                Kind::MultiWig | Kind::Composite | Kind::Super => {
                    if let Some(violation) = placement_violation(dir, path, kind, depth, parent) {
                        self.violations.push(violation);
                        continue;
                    }
                    let settings = overrides.take(&name);
                    if let Some(node) = self.container(path, &name, kind, depth, settings) {
                        nodes.push(node);
                    }
                }
            }
        }
        nodes
    }

    fn unrecognized(&mut self, dir: &Path, path: &Path, is_dir: bool, parent: Option<Kind>) {
        if is_dir && parent.is_some_and(Kind::holds_tracks_only) {
            self.violations.push(Violation::IllegalContainment {
                container: dir.to_path_buf(),
                child: path.to_path_buf(),
            });
            return;
        }
        let violation = Violation::UnrecognizedEntry {
            path: path.to_path_buf(),
        };
        if !violation.is_fatal(self.config.unrecognized) {
            warn!("skipping {}", violation);
        }
        self.violations.push(violation);
    }

    /// Descend into a container that is allowed where it sits.
    fn container(
        &mut self,
        path: &Path,
        file_name: &str,
        kind: Kind,
        depth: usize,
        mut settings: Settings,
    ) -> Option<Node> {
        let mut own = self.load_overrides(path);
        let before = self.violations.len();
        let children = self.entries(path, depth + 1, Some(kind), &mut own);
        settings.extend(own.take(file_name));
        report_unused(path, &own);

        let policy = self.config.unrecognized;
        let nested_fatal = self.violations[before..].iter().any(|v| v.is_fatal(policy));
        if children.is_empty() {
            if !nested_fatal {
                self.violations.push(Violation::EmptyContainer {
                    path: path.to_path_buf(),
                });
            }
            return None;
        }

        let node = self.node(path, file_name, kind, depth, children, settings);
        if kind.holds_tracks_only() && node.child_track_type().is_none() {
            self.violations.push(Violation::MixedTrackTypes {
                container: path.to_path_buf(),
            });
        }
        if node.name.starts_with(TRACK_ID_PREFIX) {
            self.violations.push(Violation::ReservedTrackName {
                path: path.to_path_buf(),
                name: node.name.clone(),
                prefix: TRACK_ID_PREFIX,
            });
        } else if let Some(first) = self.names.get(&node.name) {
            self.violations.push(Violation::DuplicateTrackName {
                path: path.to_path_buf(),
                name: node.name.clone(),
                first: first.clone(),
            });
        } else {
            self.names.insert(node.name.clone(), path.to_path_buf());
        }
        Some(node)
    }

    fn node(
        &self,
        path: &Path,
        file_name: &str,
        kind: Kind,
        depth: usize,
        children: Vec<Node>,
        overrides: Settings,
    ) -> Node {
        Node {
            name: display_name(file_name).to_string(),
            kind,
            source_path: path.to_path_buf(),
            rel_path: path.strip_prefix(self.root).unwrap_or(path).to_path_buf(),
            children,
            depth,
            overrides,
        }
    }
}

/// Check that a container may sit at `depth` inside `parent`.
fn placement_violation(
    dir: &Path,
    path: &Path,
    kind: Kind,
    depth: usize,
    parent: Option<Kind>,
) -> Option<Violation> {
    if depth >= 2 {
        return Some(Violation::UnsupportedNesting {
            path: path.to_path_buf(),
            depth,
        });
    }
    if parent.is_some_and(Kind::holds_tracks_only) {
        return Some(Violation::IllegalContainment {
            container: dir.to_path_buf(),
            child: path.to_path_buf(),
        });
    }
    if kind == Kind::Super && depth > 0 {
        return Some(Violation::UnsupportedNesting {
            path: path.to_path_buf(),
            depth,
        });
    }
    None
}
