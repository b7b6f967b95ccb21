use clap::{Parser, ValueEnum};
use std::fmt::Write;
use std::path::PathBuf;

use crate::classify::{suffixes, Kind};
use crate::error::UnrecognizedPolicy;
use crate::link::LinkMode;
use crate::overrides::OVERRIDES_FILE;

#[derive(Parser, Debug, Clone)]
#[command(
    name = "hubtree",
    version,
    about = "Build a UCSC track hub trackDb from a directory tree",
    after_help = "Examples:\n  hubtree -o hub/hg38 data/\n  hubtree -o hub/hg38 -f https://example.org/hub/hg38 --on-unrecognized warn data/"
)]
pub struct Args {
    /// Source directory with .super/.composite/.multiwig folders and track files
    pub indir: PathBuf,

    /// Output directory for the trackDb file and linked track files
    #[arg(short = 'o', long = "output-dir")]
    pub outdir: PathBuf,

    /// File name of the generated trackDb
    #[arg(short = 't', long = "trackdb-filename", default_value = "trackDb.txt")]
    pub trackdb_filename: String,

    /// Number of the first track id (track_N); set it when combining several trackDb files
    #[arg(short = 'i', long = "start-index", default_value = "1", value_parser = clap::value_parser!(u64).range(1..))]
    pub start_index: u64,

    /// Host location prepended to every bigDataUrl
    #[arg(short = 'f', long = "file-path", default_value = "")]
    pub file_path: String,

    /// Text appended to the trackDb, e.g. 'include trackDb.extra.txt'
    #[arg(short = 'p', long = "post-content", default_value = "")]
    pub post_content: String,

    /// Glob patterns to exclude, relative to the source directory (repeatable)
    #[arg(short = 'I', long = "ignore", action = clap::ArgAction::Append)]
    pub ignore: Vec<String>,

    /// What to do with entries that are neither containers nor track files
    #[arg(long = "on-unrecognized", value_enum, default_value_t = UnrecognizedPolicy::Fatal)]
    pub on_unrecognized: UnrecognizedPolicy,

    /// How track files are placed in the output directory
    #[arg(long = "link-mode", value_enum, default_value_t = LinkMode::Relative)]
    pub link_mode: LinkMode,

    /// Classify symlinks in the source tree as themselves instead of their targets
    #[arg(long = "no-follow-symlinks")]
    pub no_follow_symlinks: bool,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short = 'v', long = "verbose", action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Only log errors
    #[arg(short = 'q', long = "quiet")]
    pub quiet: bool,
}

impl Args {
    /// Enforce invariants after parsing.
    pub fn validated(mut self) -> Self {
        if self.quiet {
            self.verbose = 0;
        }
        self
    }

    /// Default log filter for the chosen verbosity.
    pub fn log_level(&self) -> &'static str {
        match (self.quiet, self.verbose) {
            (true, _) => "error",
            (false, 0) => "warn",
            (false, 1) => "info",
            (false, 2) => "debug",
            (false, _) => "trace",
        }
    }
}

/// Long help on the source layout and the enumerated option values, used
/// for the man page.
pub fn layout_help() -> String {
    let mut out = String::from("Source layout:\n");
    for (kind, role) in [
        (Kind::Super, "super track; holds groups and tracks"),
        (Kind::Composite, "composite track; holds tracks only"),
        (Kind::MultiWig, "overlaid multiWig track; holds tracks only"),
        (Kind::BigWig, "bigWig track file"),
        (Kind::BigBed, "bigBed track file"),
    ] {
        let names: Vec<String> = suffixes(kind).map(|s| format!("*.{s}")).collect();
        let _ = writeln!(out, "  {:<20} {role}", names.join(", "));
    }
    let _ = writeln!(
        out,
        "\nGroups sit at the top level or directly inside a super track.\n\
         A {OVERRIDES_FILE} in any directory overrides generated settings per entry."
    );

    describe_values::<UnrecognizedPolicy>(&mut out, "--on-unrecognized");
    describe_values::<LinkMode>(&mut out, "--link-mode");
    out
}

fn describe_values<T: ValueEnum>(out: &mut String, flag: &str) {
    let _ = writeln!(out, "\n{flag}:");
    for value in T::value_variants() {
        if let Some(pv) = value.to_possible_value() {
            let help = pv.get_help().map(ToString::to_string).unwrap_or_default();
            let _ = writeln!(out, "  {:<10} {help}", pv.get_name());
        }
    }
}
