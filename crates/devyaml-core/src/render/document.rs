//! Whole-document assembly.
//!
//! A document is a root mapping whose entries are rendered as top-level
//! blocks (`wifi:`, `logger:`, ...) separated by one blank line.

use tracing::{debug, instrument, trace};

use super::render_node;
use crate::model::{Mapping, Node, NodeKind};

/// Render a root mapping as a complete document.
///
/// Blocks follow the mapping's key order, one blank line apart, and the
/// text ends with a single newline. An empty mapping renders as `""`.
#[instrument(skip_all, fields(blocks = root.len()))]
pub fn render_to_text(root: &Mapping) -> String {
    let blocks: Vec<String> = root
        .iter_ordered()
        .map(|(key, node)| {
            trace!(block = key, kind = node.kind_name(), "rendering block");
            render_node(node, 0, Some(key))
        })
        .filter(|block| !block.is_empty())
        .collect();

    let text = terminate(blocks.join("\n\n"));
    debug!(bytes = text.len(), "document rendered");
    text
}

/// Render any node as a complete document.
///
/// Mapping roots get the block layout of [`render_to_text`] with the
/// root's own comments as a file header and footer. Other roots render
/// as a single fragment.
#[instrument(skip_all, fields(kind = root.kind_name()))]
pub fn render_document(root: &Node) -> String {
    let NodeKind::Mapping(mapping) = root.kind() else {
        return terminate(render_node(root, 0, None));
    };

    let mut sections = Vec::new();
    let mut header = Vec::new();
    if let Some(tag) = root.tag() {
        header.push(tag.to_string());
    }
    if let Some(comment) = root.comment() {
        header.extend(comment.above_lines().map(comment_line));
        if let Some(inline) = comment.inline_text() {
            header.push(comment_line(&inline));
        }
    }
    if !header.is_empty() {
        sections.push(header.join("\n"));
    }

    let body = render_to_text(mapping);
    if !body.is_empty() {
        sections.push(body.trim_end_matches('\n').to_owned());
    }

    if let Some(comment) = root.comment() {
        let footer: Vec<String> = comment.below_lines().map(comment_line).collect();
        if !footer.is_empty() {
            sections.push(footer.join("\n"));
        }
    }

    terminate(sections.join("\n\n"))
}

fn comment_line(text: &str) -> String {
    if text.is_empty() {
        "#".to_owned()
    } else {
        format!("# {text}")
    }
}

fn terminate(mut text: String) -> String {
    if !text.is_empty() {
        text.push('\n');
    }
    text
}
