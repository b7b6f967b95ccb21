//! Mirror the hub's track files into the output directory.
//!
//! A track at `<root>/a.super/b.composite/x.bw` is linked at
//! `<out>/a.super/b.composite/x.bw`, so two files sharing a name in
//! different containers never collide.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use crate::error::LinkError;
use crate::hub::{Hub, Node};

/// How track files are placed in the output directory.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum LinkMode {
    /// Symlink with a target relative to the link's directory.
    #[default]
    Relative,
    /// Symlink with an absolute target.
    Absolute,
    /// Copy the file.
    Copy,
}

/// What one materialization run did.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct LinkReport {
    /// Destinations written, in hub order.
    pub created: Vec<PathBuf>,
    /// How many of them replaced a stale symlink.
    pub replaced: usize,
}

/// Where a track lands under `out_dir`.
pub fn destination(out_dir: &Path, node: &Node) -> PathBuf {
    out_dir.join(&node.rel_path)
}

/// Resolve `out_dir` and check that it lies outside `source_root`.
///
/// The check runs before anything is created, on the longest existing
/// prefix of `out_dir`, and again once the directory exists.
pub fn output_dir(out_dir: &Path, source_root: &Path) -> io::Result<PathBuf> {
    ensure_outside(&resolve_existing(out_dir)?, source_root)?;
    fs::create_dir_all(out_dir)?;
    let resolved = out_dir.canonicalize()?;
    ensure_outside(&resolved, source_root)?;
    Ok(resolved)
}

fn ensure_outside(dir: &Path, source_root: &Path) -> io::Result<()> {
    if dir.starts_with(source_root) {
        return Err(io::Error::new(
            io::ErrorKind::InvalidInput,
            format!(
                "output directory {} is inside the source tree {}",
                dir.display(),
                source_root.display()
            ),
        ));
    }
    Ok(())
}

/// `path` made absolute, with its longest existing prefix canonicalized.
fn resolve_existing(path: &Path) -> io::Result<PathBuf> {
    let path = if path.is_absolute() {
        path.to_path_buf()
    } else {
        std::env::current_dir()?.join(path)
    };
    for ancestor in path.ancestors() {
        if let Ok(resolved) = ancestor.canonicalize() {
            return Ok(match path.strip_prefix(ancestor) {
                Ok(rest) if !rest.as_os_str().is_empty() => resolved.join(rest),
                _ => resolved,
            });
        }
    }
    Ok(path)
}

/// Link (or copy) every track of `hub` into `out_dir`.
///
/// `out_dir` must lie outside the source tree. Existing symlinks at a
/// destination are replaced; an existing file or directory is reported and
/// left alone. Failures do not stop the run and nothing already written is
/// rolled back.
pub fn materialize(hub: &Hub, out_dir: &Path, mode: LinkMode) -> Result<LinkReport, Vec<LinkError>> {
    let out_dir = match output_dir(out_dir, &hub.root) {
        Ok(dir) => dir,
        Err(error) => {
            return Err(vec![LinkError {
                source_path: hub.root.clone(),
                destination: out_dir.to_path_buf(),
                error,
            }])
        }
    };

    let mut report = LinkReport::default();
    let mut errors = Vec::new();
    for node in hub.tracks() {
        let dest = destination(&out_dir, node);
        match place(&node.source_path, &dest, mode) {
            Ok(replaced) => {
                debug!("{} -> {}", dest.display(), node.source_path.display());
                report.replaced += usize::from(replaced);
                report.created.push(dest);
            }
            Err(error) => errors.push(LinkError {
                source_path: node.source_path.clone(),
                destination: dest,
                error,
            }),
        }
    }

    info!(
        "placed {} track file(s) under {} ({} replaced, {} failed)",
        report.created.len(),
        out_dir.display(),
        report.replaced,
        errors.len()
    );
    if errors.is_empty() {
        Ok(report)
    } else {
        Err(errors)
    }
}

/// Place one file, returning whether a stale symlink was replaced.
fn place(source: &Path, dest: &Path, mode: LinkMode) -> io::Result<bool> {
    if let Some(parent) = dest.parent() {
        fs::create_dir_all(parent)?;
    }
    if same_entry(source, dest) {
        return Err(io::Error::new(
            io::ErrorKind::InvalidInput,
            "destination is the source file itself",
        ));
    }

    let replaced = match fs::symlink_metadata(dest) {
        Ok(meta) if meta.file_type().is_symlink() => {
            fs::remove_file(dest)?;
            true
        }
        Ok(meta) => {
            let what = if meta.is_dir() { "a directory" } else { "a file" };
            return Err(io::Error::new(
                io::ErrorKind::AlreadyExists,
                format!("{what} is in the way"),
            ));
        }
        Err(e) if e.kind() == io::ErrorKind::NotFound => false,
        Err(e) => return Err(e),
    };

    match mode {
        LinkMode::Copy => {
            fs::copy(source, dest)?;
        }
        LinkMode::Absolute => symlink(source, dest)?,
        LinkMode::Relative => {
            let target = dest
                .parent()
                .and_then(|dir| pathdiff::diff_paths(source, dir))
                .unwrap_or_else(|| source.to_path_buf());
            symlink(&target, dest)?;
        }
    }
    Ok(replaced)
}

/// Whether `a` and `b` name the same directory entry. The directories they
/// sit in are resolved, the entries themselves are not.
fn same_entry(a: &Path, b: &Path) -> bool {
    fn entry(p: &Path) -> Option<PathBuf> {
        Some(p.parent()?.canonicalize().ok()?.join(p.file_name()?))
    }
    match (entry(a), entry(b)) {
        (Some(a), Some(b)) => a == b,
        _ => false,
    }
}

#[cfg(unix)]
fn symlink(target: &Path, link: &Path) -> io::Result<()> {
    std::os::unix::fs::symlink(target, link)
}

#[cfg(windows)]
fn symlink(target: &Path, link: &Path) -> io::Result<()> {
    std::os::windows::fs::symlink_file(target, link)
}
