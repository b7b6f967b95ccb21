//! Per-directory `trackhub.toml` overrides.
//!
//! Each table is keyed by an entry name in the same directory (or the
//! directory's own name) and holds settings that replace or extend the
//! generated stanza for that entry:
//!
//! ```toml
//! ["H3K27me3.multiwig"]
//! viewLimits = "0:14"
//!
//! ["peaks.bb"]
//! type = "bigBed 9 +"
//! visibility = "dense"
//! ```

use serde::Deserialize;
use std::collections::BTreeMap;
use std::fmt::Write;
use std::fs;
use std::path::Path;

use crate::classify::Kind;
use crate::settings::{defaults_for, trailer_for, BIGWIG_DISPLAY, DEFAULT_COLOR};

/// File name looked up in every directory of the source tree.
pub const OVERRIDES_FILE: &str = "trackhub.toml";

/// Settings for one entry, in key order.
pub type Settings = Vec<(String, String)>;

#[derive(Debug, Default, Deserialize)]
#[serde(transparent)]
struct RawOverrides(BTreeMap<String, BTreeMap<String, toml::Value>>);

/// Parsed overrides of one directory.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct Overrides {
    entries: BTreeMap<String, Settings>,
}

impl Overrides {
    /// Load `dir/trackhub.toml`. A missing file yields empty overrides.
    pub fn load(dir: &Path) -> Result<Self, String> {
        let path = dir.join(OVERRIDES_FILE);
        if !path.is_file() {
            return Ok(Self::default());
        }
        let text = fs::read_to_string(&path).map_err(|e| e.to_string())?;
        Self::parse(&text)
    }

    pub fn parse(text: &str) -> Result<Self, String> {
        let raw: RawOverrides = toml::from_str(text).map_err(|e| e.message().to_string())?;
        let mut entries = BTreeMap::new();
        for (name, table) in raw.0 {
            let mut settings = Settings::with_capacity(table.len());
            for (key, value) in table {
                settings.push((key.clone(), value_to_string(&key, value)?));
            }
            entries.insert(name, settings);
        }
        Ok(Self { entries })
    }

    /// Remove and return the settings for `name`.
    pub fn take(&mut self, name: &str) -> Settings {
        self.entries.remove(name).unwrap_or_default()
    }

    /// Names that were never taken.
    pub fn unused(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }
}

/// A `trackhub.toml` with one table per entry kind, each listing the
/// settings hubtree generates for that kind with their default values.
pub fn example() -> String {
    let mut out = format!(
        "# {OVERRIDES_FILE}: per-entry trackDb settings for the entries of this directory.\n\
         # Tables are keyed by entry name, suffix included; a directory may also\n\
         # name itself. Values replace the generated ones, new keys are appended.\n"
    );
    for (name, kind) in [
        ("liver.super", Kind::Super),
        ("H3K27ac.composite", Kind::Composite),
        ("RNA.multiwig", Kind::MultiWig),
        ("input.bw", Kind::BigWig),
        ("peaks.bb", Kind::BigBed),
    ] {
        let _ = writeln!(out, "\n[{}]", toml::Value::from(name));
        for (key, value) in generated_settings(kind) {
            let _ = writeln!(out, "{key} = {}", toml::Value::from(value));
        }
    }
    out
}

fn generated_settings(kind: Kind) -> Vec<(&'static str, &'static str)> {
    let mut settings: Vec<_> = defaults_for(kind).to_vec();
    if kind.is_track() {
        settings.push(("color", DEFAULT_COLOR));
    }
    settings.extend_from_slice(trailer_for(kind));
    if matches!(kind, Kind::MultiWig | Kind::BigWig) {
        for &(key, value) in BIGWIG_DISPLAY {
            match settings.iter_mut().find(|(k, _)| *k == key) {
                Some(slot) => slot.1 = value,
                None => settings.push((key, value)),
            }
        }
    }
    settings
}

fn value_to_string(key: &str, value: toml::Value) -> Result<String, String> {
    match value {
        toml::Value::String(s) => Ok(s),
        toml::Value::Integer(i) => Ok(i.to_string()),
        toml::Value::Float(f) => Ok(f.to_string()),
        toml::Value::Boolean(b) => Ok(if b { "on" } else { "off" }.to_string()),
        other => Err(format!(
            "`{key}` must be a string, number or boolean, found {}",
            other.type_str()
        )),
    }
}
