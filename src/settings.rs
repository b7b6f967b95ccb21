//! Per-kind trackDb settings, the leaf color palette, and the `Stanza` type
//! that carries them into the emitter.

use globset::{GlobBuilder, GlobMatcher};

use crate::classify::Kind;

/// Ordered `key value` lines of one trackDb stanza.
///
/// Setting an existing key replaces its value in place, so defaults keep
/// their position when overridden.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Stanza {
    entries: Vec<(String, String)>,
}

impl Stanza {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&mut self, key: impl Into<String>, value: impl Into<String>) {
        let key = key.into();
        let value = value.into();
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some(slot) => slot.1 = value,
            None => self.entries.push((key, value)),
        }
    }

    pub fn set_all(&mut self, pairs: &[(&str, &str)]) {
        for (k, v) in pairs {
            self.set(*k, *v);
        }
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Display block shared by standalone bigWig tracks and multiWig containers.
pub const BIGWIG_DISPLAY: &[(&str, &str)] = &[
    ("visibility", "full"),
    ("maxHeightPixels", "500:50:8"),
    ("viewLimits", "0:15"),
    ("alwaysZero", "on"),
    ("autoScale", "on"),
    ("windowingFunction", "mean+whiskers"),
];

pub const SUPER_DEFAULTS: &[(&str, &str)] = &[("superTrack", "on")];

pub const SUPER_TRAILER: &[(&str, &str)] = &[("priority", "1")];

pub const COMPOSITE_DEFAULTS: &[(&str, &str)] = &[("compositeTrack", "on")];

pub const COMPOSITE_TRAILER: &[(&str, &str)] = &[
    ("visibility", "full"),
    ("priority", "1"),
    ("centerLabelsDense", "on"),
];

pub const MULTIWIG_DEFAULTS: &[(&str, &str)] = &[("container", "multiWig")];

pub const MULTIWIG_TRAILER: &[(&str, &str)] = &[
    ("aggregate", "none"),
    ("showSubtrackColorOnUi", "on"),
    ("priority", "1"),
];

pub const BIGBED_TRAILER: &[(&str, &str)] = &[
    ("itemRgb", "on"),
    ("visibility", "squish"),
    ("maxItems", "100000"),
    ("maxWindowToDraw", "20000000"),
];

pub const DEFAULT_COLOR: &str = "255,0,0";

/// Built-in palette, first match wins, so narrower patterns come first.
pub const DEFAULT_PALETTE: &[(&str, &str)] = &[
    ("*CD24*H3K27ac*", "252,78,42"),
    ("*CD24*H3K27me3*", "140,107,177"),
    ("*input*", "150,150,150"),
    ("*H3K4me1*", "65,171,93"),
    ("*H3K4me2*", "161,217,155"),
    ("*H3K27ac*", "252,78,42"),
    ("*H3K4me3*", "203,24,29"),
    ("*H3K36me3*", "254,196,79"),
    ("*H3K27me3*", "140,107,177"),
    ("*H3K27me2*", "147,123,173"),
    ("*H2AK119Ub*", "184,151,191"),
    ("*H3K27me1*", "230,179,99"),
    ("*H3K9me3*", "29,145,192"),
    ("*H3K9me2*", "51,51,255"),
    ("*H3K9ac*", "164,0,0"),
    ("*CTCF*", "106,81,163"),
    ("*WGBS*", "0,102,255"),
    ("*methyl*", "0,102,255"),
    ("*RNA*fwd*", "0,102,0"),
    ("*RNA*rev*", "153,51,0"),
    ("*RNA*RPKM*", "71,107,107"),
    ("*RNA*", "71,107,107"),
    ("*DNase*", "0,204,102"),
    ("*Hp1a*", "0,128,255"),
    ("*H1*", "255,102,255"),
    ("*Rpb1*", "173,68,2"),
];

/// Ordered color rules matched case-insensitively against a track's file
/// name or its parent directory name.
#[derive(Debug, Clone)]
pub struct ColorRules {
    rules: Vec<(GlobMatcher, String)>,
}

impl ColorRules {
    /// Compile `(glob, "r,g,b")` pairs. Invalid globs are an error.
    pub fn new(rules: &[(&str, &str)]) -> Result<Self, globset::Error> {
        let rules = rules
            .iter()
            .map(|(pattern, color)| -> Result<_, globset::Error> {
                let glob = GlobBuilder::new(pattern)
                    .case_insensitive(true)
                    .literal_separator(false)
                    .build()?;
                Ok((glob.compile_matcher(), color.to_string()))
            })
            .collect::<Result<Vec<_>, globset::Error>>()?;
        Ok(Self { rules })
    }

    pub fn empty() -> Self {
        Self { rules: Vec::new() }
    }

    /// Color for a track, or `DEFAULT_COLOR` when no rule matches.
    pub fn color_for(&self, file_name: &str, parent_name: &str) -> &str {
        self.rules
            .iter()
            .find(|(m, _)| m.is_match(file_name) || m.is_match(parent_name))
            .map(|(_, c)| c.as_str())
            .unwrap_or(DEFAULT_COLOR)
    }
}

impl Default for ColorRules {
    fn default() -> Self {
        // The built-in patterns are static and known to compile.
        Self::new(DEFAULT_PALETTE).unwrap_or_else(|_| Self::empty())
    }
}

/// Leading settings for a kind, written right after `track` (and `type`/`parent`).
pub fn defaults_for(kind: Kind) -> &'static [(&'static str, &'static str)] {
    match kind {
        Kind::Super => SUPER_DEFAULTS,
        Kind::Composite => COMPOSITE_DEFAULTS,
        Kind::MultiWig => MULTIWIG_DEFAULTS,
        _ => &[],
    }
}

/// Trailing settings for a kind, written after the labels.
pub fn trailer_for(kind: Kind) -> &'static [(&'static str, &'static str)] {
    match kind {
        Kind::Super => SUPER_TRAILER,
        Kind::Composite => COMPOSITE_TRAILER,
        Kind::MultiWig => MULTIWIG_TRAILER,
        Kind::BigBed => BIGBED_TRAILER,
        _ => &[],
    }
}
