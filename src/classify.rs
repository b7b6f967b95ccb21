//! Name-based classification of source entries.

/// What a source entry represents in the hub.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Kind {
    /// `*.multiwig` directory: overlaid bigWig tracks (`container multiWig`).
    MultiWig,
    /// `*.composite` directory: a composite track.
    Composite,
    /// `*.super` directory: an umbrella super track.
    Super,
    /// `*.bw` / `*.bigwig` file.
    BigWig,
    /// `*.bb` / `*.bigbed` file.
    BigBed,
    /// Anything else.
    Unrecognized,
}

const DIR_SUFFIXES: &[(&str, Kind)] = &[
    ("multiwig", Kind::MultiWig),
    ("composite", Kind::Composite),
    ("super", Kind::Super),
];

const FILE_SUFFIXES: &[(&str, Kind)] = &[
    ("bw", Kind::BigWig),
    ("bigwig", Kind::BigWig),
    ("bb", Kind::BigBed),
    ("bigbed", Kind::BigBed),
];

impl Kind {
    /// Directory kinds that group other entries.
    pub fn is_container(self) -> bool {
        matches!(self, Kind::MultiWig | Kind::Composite | Kind::Super)
    }

    /// Data file kinds.
    pub fn is_track(self) -> bool {
        matches!(self, Kind::BigWig | Kind::BigBed)
    }

    /// Containers that may only hold track files.
    pub fn holds_tracks_only(self) -> bool {
        matches!(self, Kind::MultiWig | Kind::Composite)
    }

    /// The `type` value the trackDb format expects for a track of this kind.
    pub fn track_type(self) -> Option<&'static str> {
        match self {
            Kind::BigWig => Some("bigWig"),
            Kind::BigBed => Some("bigBed 3 +"),
            _ => None,
        }
    }
}

/// Classify an entry from its base name. Suffixes are matched case-insensitively.
pub fn classify(name: &str, is_dir: bool) -> Kind {
    let table = if is_dir { DIR_SUFFIXES } else { FILE_SUFFIXES };
    match split_suffix(name) {
        Some((_, suffix)) => table
            .iter()
            .find(|(s, _)| suffix.eq_ignore_ascii_case(s))
            .map(|(_, kind)| *kind)
            .unwrap_or(Kind::Unrecognized),
        None => Kind::Unrecognized,
    }
}

/// Suffixes that classify an entry as `kind`, lowercase.
pub fn suffixes(kind: Kind) -> impl Iterator<Item = &'static str> {
    DIR_SUFFIXES
        .iter()
        .chain(FILE_SUFFIXES)
        .filter(move |(_, k)| *k == kind)
        .map(|(s, _)| *s)
}

/// Base name with its classifying suffix removed (`reads.bw` -> `reads`).
/// Names without a usable suffix are returned unchanged.
pub fn display_name(name: &str) -> &str {
    split_suffix(name).map(|(stem, _)| stem).unwrap_or(name)
}

/// Split on the last dot, requiring a non-empty stem and suffix.
fn split_suffix(name: &str) -> Option<(&str, &str)> {
    let (stem, suffix) = name.rsplit_once('.')?;
    if stem.is_empty() || suffix.is_empty() {
        return None;
    }
    Some((stem, suffix))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn container_suffixes() {
        assert_eq!(classify("H3K4me3.multiwig", true), Kind::MultiWig);
        assert_eq!(classify("marks.composite", true), Kind::Composite);
        assert_eq!(classify("liver.super", true), Kind::Super);
        assert_eq!(classify("Liver.SUPER", true), Kind::Super);
    }

    #[test]
    fn plain_directories_are_unrecognized() {
        assert_eq!(classify("data", true), Kind::Unrecognized);
        assert_eq!(classify("data.tracks", true), Kind::Unrecognized);
        assert_eq!(classify(".super", true), Kind::Unrecognized);
        assert_eq!(classify("x.", true), Kind::Unrecognized);
    }

    #[test]
    fn track_extensions_ignore_case() {
        for name in ["a.bw", "a.BW", "a.bigwig", "a.BigWig"] {
            assert_eq!(classify(name, false), Kind::BigWig, "{name}");
        }
        for name in ["a.bb", "a.Bb", "a.bigbed", "a.bigBed"] {
            assert_eq!(classify(name, false), Kind::BigBed, "{name}");
        }
    }

    #[test]
    fn other_files_are_unrecognized() {
        for name in ["notes.txt", "a.bam", "bw", "a.bw.gz", "readme"] {
            assert_eq!(classify(name, false), Kind::Unrecognized, "{name}");
        }
    }

    #[test]
    fn suffix_meaning_depends_on_entry_type() {
        assert_eq!(classify("x.bw", true), Kind::Unrecognized);
        assert_eq!(classify("x.super", false), Kind::Unrecognized);
    }

    #[test]
    fn suffixes_per_kind() {
        assert_eq!(suffixes(Kind::BigBed).collect::<Vec<_>>(), vec!["bb", "bigbed"]);
        assert_eq!(suffixes(Kind::Super).collect::<Vec<_>>(), vec!["super"]);
        assert_eq!(suffixes(Kind::Unrecognized).count(), 0);
    }

    #[test]
    fn display_name_strips_last_suffix() {
        assert_eq!(display_name("sample.rep1.bw"), "sample.rep1");
        assert_eq!(display_name("liver.super"), "liver");
        assert_eq!(display_name("plain"), "plain");
    }

    #[test]
    fn kind_predicates() {
        assert!(Kind::Super.is_container());
        assert!(!Kind::Super.holds_tracks_only());
        assert!(Kind::MultiWig.holds_tracks_only());
        assert!(Kind::BigBed.is_track());
        assert!(!Kind::Unrecognized.is_track());
        assert_eq!(Kind::BigBed.track_type(), Some("bigBed 3 +"));
        assert_eq!(Kind::Composite.track_type(), None);
    }
}
