//! Serialize a validated hub into trackDb stanzas.

use std::fs;
use std::io;
use std::path::Path;
use tracing::info;

use crate::classify::Kind;
use crate::hub::{Hub, Node};
use crate::settings::{defaults_for, trailer_for, ColorRules, Stanza, BIGWIG_DISPLAY};

/// Settings for writing a trackDb file.
#[derive(Debug, Clone)]
pub struct EmitConfig {
    /// Number of the first `track_N` id.
    pub start_index: usize,
    /// Prefix for every `bigDataUrl` (host location of the linked files).
    pub file_path: String,
    /// Text appended after the last stanza, e.g. an `include` line.
    pub post_content: String,
    pub colors: ColorRules,
}

impl Default for EmitConfig {
    fn default() -> Self {
        Self {
            start_index: 1,
            file_path: String::new(),
            post_content: String::new(),
            colors: ColorRules::default(),
        }
    }
}

const INDENT: &str = "    ";

/// Leaf tracks are numbered `track_1`, `track_2`, ... in emission order.
pub const TRACK_ID_PREFIX: &str = "track_";

/// Render the whole trackDb document. Same hub and config, same bytes.
pub fn render(hub: &Hub, config: &EmitConfig) -> String {
    let root_name = hub
        .root
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();

    let mut out = String::new();
    let mut next_id = config.start_index;
    for node in &hub.nodes {
        write_node(&mut out, node, None, &root_name, config, &mut next_id);
    }

    if !config.post_content.is_empty() {
        out.push_str(&config.post_content);
        if !config.post_content.ends_with('\n') {
            out.push('\n');
        }
    }
    out
}

/// Render and write the trackDb document to `dest`.
pub fn emit(hub: &Hub, config: &EmitConfig, dest: &Path) -> io::Result<()> {
    let text = render(hub, config);
    fs::write(dest, &text)?;
    info!(
        "wrote {} stanza(s) to {}",
        hub.iter().count(),
        dest.display()
    );
    Ok(())
}

fn write_node(
    out: &mut String,
    node: &Node,
    parent: Option<&Node>,
    root_name: &str,
    config: &EmitConfig,
    next_id: &mut usize,
) {
    let track_id = if node.kind.is_track() {
        let id = format!("{TRACK_ID_PREFIX}{}", *next_id);
        *next_id += 1;
        id
    } else {
        node.name.clone()
    };

    let stanza = stanza(node, parent, &track_id, root_name, config);
    let indent = INDENT.repeat(node.depth);
    for (key, value) in stanza.iter() {
        out.push_str(&indent);
        out.push_str(key);
        out.push(' ');
        out.push_str(value);
        out.push('\n');
    }
    out.push('\n');

    for child in &node.children {
        write_node(out, child, Some(node), root_name, config, next_id);
    }
}

/// Build the stanza for one node. `root_name` stands in for the parent
/// directory name of top-level tracks when picking a color.
pub fn stanza(
    node: &Node,
    parent: Option<&Node>,
    track_id: &str,
    root_name: &str,
    config: &EmitConfig,
) -> Stanza {
    let mut s = Stanza::new();
    s.set("track", track_id);
    if let Some(parent) = parent {
        s.set("parent", parent.name.as_str());
    }

    match node.kind {
        Kind::Composite | Kind::MultiWig => {
            s.set("type", node.child_track_type().unwrap_or("bigWig"))
        }
        kind => {
            if let Some(t) = kind.track_type() {
                s.set("type", t);
            }
        }
    }
    s.set_all(defaults_for(node.kind));

    if node.kind.is_track() {
        s.set("bigDataUrl", data_url(&config.file_path, &node.rel_url()));
    }
    s.set("shortLabel", node.name.as_str());
    s.set("longLabel", node.name.as_str());

    if node.kind.is_track() {
        let parent_name = parent.map(Node::file_name);
        let parent_name = parent_name.as_deref().unwrap_or(root_name);
        s.set("color", config.colors.color_for(&node.file_name(), parent_name));
    }
    s.set_all(trailer_for(node.kind));

    let in_multiwig = parent.is_some_and(|p| p.kind == Kind::MultiWig);
    if node.kind == Kind::MultiWig || (node.kind == Kind::BigWig && !in_multiwig) {
        s.set_all(BIGWIG_DISPLAY);
    }

    for (key, value) in &node.overrides {
        s.set(key.as_str(), value.as_str());
    }
    s
}

/// `bigDataUrl` for a track linked at `rel_url` under the output directory.
pub fn data_url(file_path: &str, rel_url: &str) -> String {
    if file_path.is_empty() || file_path.ends_with('/') {
        format!("{file_path}{rel_url}")
    } else {
        format!("{file_path}/{rel_url}")
    }
}
