#![forbid(unsafe_code)]

use anyhow::{bail, ensure, Context, Result};
use clap::Parser;
use hubtree::cli::Args;
use hubtree::emit::{self, EmitConfig};
use hubtree::hub::{build_ignore_set, BuildConfig, HubBuilder, WalkdirHubBuilder};
use hubtree::link;
use hubtree::settings::ColorRules;
use std::path::Path;
use tracing_subscriber::EnvFilter;

fn main() {
    let args = Args::parse().validated();
    init_tracing(&args);

    if let Err(e) = run_app(&args) {
        eprintln!("hubtree: {e:#}");
        std::process::exit(1);
    }
}

/// Log to stderr. `RUST_LOG` takes precedence over `-v`/`-q`.
fn init_tracing(args: &Args) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(args.log_level()));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
}

fn run_app(args: &Args) -> Result<()> {
    let indir = args
        .indir
        .canonicalize()
        .with_context(|| format!("{}: failed to resolve path", args.indir.display()))?;
    ensure!(indir.is_dir(), "{}: Not a directory", indir.display());
    check_trackdb_filename(&args.trackdb_filename)?;
    let start_index = usize::try_from(args.start_index).context("start index out of range")?;

    let build_config = BuildConfig {
        unrecognized: args.on_unrecognized,
        ignore_patterns: build_ignore_set(&args.ignore),
        follow_symlinks: !args.no_follow_symlinks,
    };

    // Nothing is written unless the whole tree validates.
    let hub = match WalkdirHubBuilder.build_hub(&indir, &build_config) {
        Ok(hub) => hub,
        Err(err) => {
            for violation in &err.violations {
                eprintln!("hubtree: {violation}");
            }
            bail!("{err}; nothing written");
        }
    };

    let emit_config = EmitConfig {
        start_index,
        file_path: args.file_path.clone(),
        post_content: args.post_content.clone(),
        colors: ColorRules::default(),
    };

    let outdir = link::output_dir(&args.outdir, &hub.root)
        .with_context(|| format!("{}: unusable output directory", args.outdir.display()))?;
    let placed = link::materialize(&hub, &outdir, args.link_mode);

    let trackdb = outdir.join(&args.trackdb_filename);
    emit::emit(&hub, &emit_config, &trackdb)
        .with_context(|| format!("{}: failed to write trackDb", trackdb.display()))?;

    if let Err(errors) = placed {
        for error in &errors {
            eprintln!("hubtree: {error}");
        }
        bail!(
            "{} track file(s) could not be placed in {}",
            errors.len(),
            args.outdir.display()
        );
    }
    Ok(())
}

/// The trackDb name must be a bare, non-empty file name.
fn check_trackdb_filename(name: &str) -> Result<()> {
    ensure!(!name.is_empty(), "please provide a file name for --trackdb-filename");
    let bare = Path::new(name).file_name().is_some_and(|n| n == name);
    ensure!(bare, "{name}: --trackdb-filename must be a file name, not a path");
    Ok(())
}
