//! Recursive renderer for the restricted YAML dialect.
//!
//! Data flows down (parents pass the indentation to use) and back up
//! (children return text fragments that parents splice together). Every
//! fragment carries its own indentation on every line and never ends with
//! a newline or a blank line.
//!
//! # Layout rules
//!
//! | Node                | Output                                          |
//! |---------------------|-------------------------------------------------|
//! | named scalar        | `key: value`                                    |
//! | named literal block | `key: \|-` then lines at indent + 2             |
//! | named mapping       | `key:` then children at indent + 2              |
//! | named sequence      | `key:` then `- item` lines at indent + 2        |
//! | unnamed composite   | children at the same indent (document root)     |
//!
//! Comments go above or below the node at its indent, or at the end of its
//! first line when inline.

pub mod document;
pub mod quoting;

use std::borrow::Cow;

pub use document::{render_document, render_to_text};
pub use quoting::{needs_quotes, quote};

use crate::model::{Comment, Mapping, Node, NodeKind, Scalar, ScalarStyle, ScalarValue, Sequence, Tag};

/// Spaces per nesting level.
pub const INDENT: usize = 2;

/// Where a node sits, which decides literal-block indentation indicators.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Position {
    /// Mapping value or standalone fragment: content is 2 columns past the key.
    Entry,
    /// Sequence item: content is 4 columns past the dash.
    Item,
}

/// Render `node` at `indent`, under `name` when it is a mapping value.
///
/// Output includes the node's above/below comments.
pub fn render_node(node: &Node, indent: usize, name: Option<&str>) -> String {
    let mut parts = Vec::new();
    let comment = node.comment();

    if let Some(comment) = comment {
        push_comment_lines(&mut parts, comment.above_lines(), indent);
    }
    let body = render_body(node, indent, name, Position::Entry);
    if !body.is_empty() {
        parts.push(body);
    }
    if let Some(comment) = comment {
        push_comment_lines(&mut parts, comment.below_lines(), indent);
    }

    finish(parts)
}

/// The node itself, without above/below comments.
fn render_body(node: &Node, indent: usize, name: Option<&str>, position: Position) -> String {
    let inline = node.comment().and_then(Comment::inline_text);
    match node.kind() {
        NodeKind::Scalar(scalar) => {
            render_scalar(scalar, node.tag(), inline, indent, name, position)
        }
        NodeKind::Mapping(mapping) => render_mapping(mapping, node.tag(), inline, indent, name),
        NodeKind::Sequence(sequence) => {
            render_sequence(sequence, node.tag(), inline, indent, name)
        }
    }
}

// ── Scalars ──────────────────────────────────────────────────────────────────

fn render_scalar(
    scalar: &Scalar,
    tag: Option<&Tag>,
    inline: Option<String>,
    indent: usize,
    name: Option<&str>,
    position: Position,
) -> String {
    let prefix = match name {
        Some(name) => format!("{}{}: ", pad(indent), format_key(name)),
        None => pad(indent),
    };

    if let ScalarValue::LiteralBlock(text) = scalar.value() {
        return render_literal(text, &prefix, tag, inline, indent, position);
    }

    let mut line = format!("{prefix}{}", scalar_text(scalar, tag));
    truncate_trailing_spaces(&mut line);
    append_inline(&mut line, inline);
    line
}

/// The value text of a non-literal scalar.
///
/// A tag replaces the quoting policy; tagged text is only quoted when it
/// would otherwise spill onto another line.
pub fn scalar_text<'a>(scalar: &'a Scalar, tag: Option<&Tag>) -> Cow<'a, str> {
    match (tag, scalar.value()) {
        (Some(tag), ScalarValue::String(s) | ScalarValue::Secret(s)) => {
            Cow::Owned(quoting::format_tagged(tag.as_str(), s))
        }
        (Some(tag), _) => Cow::Owned(format!("{tag} {scalar}")),
        (None, ScalarValue::String(s)) => match scalar.style() {
            ScalarStyle::DoubleQuoted => Cow::Owned(quote(s)),
            ScalarStyle::Auto => quoting::format_str(s),
        },
        (None, _) => Cow::Owned(scalar.to_string()),
    }
}

fn render_literal(
    text: &str,
    prefix: &str,
    tag: Option<&Tag>,
    inline: Option<String>,
    indent: usize,
    position: Position,
) -> String {
    // Content whose first line is indented needs an explicit indicator,
    // otherwise a loader would take that indentation as the block's own.
    let indicator = match (text.starts_with(' '), position) {
        (false, _) => "",
        (true, Position::Entry) => "2",
        (true, Position::Item) => "4",
    };

    let mut header = match tag {
        Some(tag) => format!("{prefix}{tag} |{indicator}-"),
        None => format!("{prefix}|{indicator}-"),
    };
    append_inline(&mut header, inline);

    let content_pad = pad(indent + INDENT);
    let mut lines = vec![header];
    lines.extend(text.split('\n').map(|line| {
        if line.is_empty() {
            String::new()
        } else {
            format!("{content_pad}{line}")
        }
    }));

    finish(lines)
}

// ── Mappings ─────────────────────────────────────────────────────────────────

fn render_mapping(
    mapping: &Mapping,
    tag: Option<&Tag>,
    inline: Option<String>,
    indent: usize,
    name: Option<&str>,
) -> String {
    let mut parts = Vec::with_capacity(mapping.len() + 1);
    parts.extend(header_line(indent, name, tag, inline));

    let child_indent = if name.is_some() { indent + INDENT } else { indent };
    for (key, child) in mapping.iter_ordered() {
        let fragment = render_node(child, child_indent, Some(key));
        if !fragment.is_empty() {
            parts.push(fragment);
        }
    }

    finish(parts)
}

// ── Sequences ────────────────────────────────────────────────────────────────

fn render_sequence(
    sequence: &Sequence,
    tag: Option<&Tag>,
    inline: Option<String>,
    indent: usize,
    name: Option<&str>,
) -> String {
    let mut parts = Vec::with_capacity(sequence.len() + 1);
    parts.extend(header_line(indent, name, tag, inline));

    let item_indent = if name.is_some() { indent + INDENT } else { indent };
    for item in sequence {
        parts.push(render_item(item, item_indent));
    }

    finish(parts)
}

/// One sequence item: rendered unnamed one level deeper, then the first
/// line is pulled back to `indent` behind a `- `.
fn render_item(item: &Node, indent: usize) -> String {
    let mut parts = Vec::new();
    let comment = item.comment();

    if let Some(comment) = comment {
        push_comment_lines(&mut parts, comment.above_lines(), indent);
    }

    let body = render_body(item, indent + INDENT, None, Position::Item);
    let mut lines = body.split('\n');
    let first = lines.next().map(str::trim_start).unwrap_or_default();
    parts.push(if first.is_empty() {
        format!("{}-", pad(indent))
    } else {
        format!("{}- {first}", pad(indent))
    });
    parts.extend(lines.map(str::to_owned));

    if let Some(comment) = comment {
        push_comment_lines(&mut parts, comment.below_lines(), indent);
    }

    finish(parts)
}

// ── Shared helpers ───────────────────────────────────────────────────────────

/// The `key:` line of a composite, carrying its tag and inline comment.
///
/// Unnamed, untagged composites have no header; their inline comment then
/// stands on its own line.
fn header_line(
    indent: usize,
    name: Option<&str>,
    tag: Option<&Tag>,
    inline: Option<String>,
) -> Option<String> {
    let mut line = match (name, tag) {
        (Some(name), Some(tag)) => format!("{}{}: {tag}", pad(indent), format_key(name)),
        (Some(name), None) => format!("{}{}:", pad(indent), format_key(name)),
        (None, Some(tag)) => format!("{}{tag}", pad(indent)),
        (None, None) => return inline.map(|text| format!("{}# {text}", pad(indent))),
    };
    append_inline(&mut line, inline);
    Some(line)
}

fn format_key(key: &str) -> Cow<'_, str> {
    quoting::format_str(key)
}

fn push_comment_lines<'a>(
    out: &mut Vec<String>,
    lines: impl Iterator<Item = &'a str>,
    indent: usize,
) {
    for line in lines {
        if line.is_empty() {
            out.push(format!("{}#", pad(indent)));
        } else {
            out.push(format!("{}# {line}", pad(indent)));
        }
    }
}

fn append_inline(line: &mut String, inline: Option<String>) {
    if let Some(text) = inline {
        line.push_str("  # ");
        line.push_str(&text);
    }
}

fn truncate_trailing_spaces(line: &mut String) {
    let len = line.trim_end_matches(' ').len();
    line.truncate(len);
}

fn pad(indent: usize) -> String {
    " ".repeat(indent)
}

/// Join fragments with newlines and drop trailing blank lines.
fn finish(parts: Vec<String>) -> String {
    let mut text = parts.join("\n");
    while let Some(pos) = text.rfind('\n') {
        if text[pos + 1..].trim().is_empty() {
            text.truncate(pos);
        } else {
            break;
        }
    }
    if text.trim().is_empty() {
        text.clear();
    }
    text
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::KeyOrder;

    #[test]
    fn named_scalar_is_one_line() {
        assert_eq!(render_node(&Node::int(115200), 0, Some("baud_rate")), "baud_rate: 115200");
        assert_eq!(render_node(&Node::float(0.5), 2, Some("k")), "  k: 0.5");
        assert_eq!(render_node(&Node::null(), 0, Some("k")), "k: null");
    }

    #[test]
    fn unnamed_scalar_is_just_the_value() {
        assert_eq!(render_node(&Node::string("123"), 0, None), "\"123\"");
        assert_eq!(render_node(&Node::bool(true), 0, None), "true");
    }

    #[test]
    fn secret_ignores_quoting_policy() {
        let node = Node::secret("wifi: password");
        assert_eq!(render_node(&node, 0, None), "!secret wifi: password");
    }

    #[test]
    fn tag_overrides_quoting() {
        let node = Node::string("id(relay).turn_on();").with_tag("lambda");
        assert_eq!(
            render_node(&node, 0, Some("then")),
            "then: !lambda id(relay).turn_on();"
        );
        let number = Node::int(5).with_tag("!!str");
        assert_eq!(render_node(&number, 0, Some("k")), "k: !!str 5");
    }

    #[test]
    fn tagged_multiline_text_stays_inside_its_key() {
        let lambda = Node::string("first\nsecond: x").with_tag("!lambda");
        let root = Mapping::new().with(
            "w",
            Mapping::new()
                .with_order(KeyOrder::pinned(["then", "z"]))
                .with("then", lambda)
                .with("z", 1),
        );
        assert_eq!(
            render_to_text(&root),
            "w:\n  then: !lambda \"first\\nsecond: x\"\n  z: 1\n"
        );
    }

    #[test]
    fn secret_with_line_break_is_quoted() {
        let node = Node::secret("wifi\npassword: leaked");
        assert_eq!(
            render_node(&node, 0, Some("password")),
            "password: !secret \"wifi\\npassword: leaked\""
        );
    }

    #[test]
    fn forced_quotes_apply_to_plain_strings() {
        let node = Node::quoted("living_room");
        assert_eq!(render_node(&node, 0, Some("name")), "name: \"living_room\"");
    }

    #[test]
    fn keys_needing_quotes_are_quoted() {
        let m = Mapping::new().with("on", true).with("a:b", 1);
        assert_eq!(
            render_node(&m.into(), 0, None),
            "\"a:b\": 1\n\"on\": true"
        );
    }

    #[test]
    fn literal_block_named() {
        let node = Node::literal("\nline one\n  indented two\nline three\n\n");
        assert_eq!(
            render_node(&node, 2, Some("lambda")),
            "  lambda: |-\n    line one\n      indented two\n    line three"
        );
    }

    #[test]
    fn literal_block_keeps_inner_blank_lines() {
        let node = Node::literal("a\n\nb");
        assert_eq!(render_node(&node, 0, Some("k")), "k: |-\n  a\n\n  b");
    }

    #[test]
    fn literal_block_unnamed() {
        assert_eq!(render_node(&Node::literal("x\ny"), 0, None), "|-\n  x\n  y");
    }

    #[test]
    fn literal_block_with_leading_indent_gets_indicator() {
        let node = Node::literal("  indented\nflush");
        assert_eq!(
            render_node(&node, 0, Some("k")),
            "k: |2-\n    indented\n  flush"
        );
        let seq: Node = Sequence::new().with(node).into();
        assert_eq!(render_node(&seq, 0, None), "- |4-\n      indented\n    flush");
    }

    #[test]
    fn named_mapping_indents_children() {
        let m: Node = Mapping::new()
            .with("ssid", "MyWifi")
            .with("password", "secret")
            .with_order(KeyOrder::pinned(["ssid", "password"]))
            .into();
        assert_eq!(
            render_node(&m, 0, Some("wifi")),
            "wifi:\n  ssid: MyWifi\n  password: secret"
        );
    }

    #[test]
    fn default_order_is_lexicographic() {
        let m: Node = Mapping::new().with("ssid", "x").with("password", "y").into();
        assert_eq!(
            render_node(&m, 0, Some("wifi")),
            "wifi:\n  password: y\n  ssid: x"
        );
    }

    #[test]
    fn empty_named_composites_render_header_only() {
        assert_eq!(render_node(&Node::mapping(), 0, Some("captive_portal")), "captive_portal:");
        assert_eq!(render_node(&Node::sequence(), 2, Some("filters")), "  filters:");
        assert_eq!(render_node(&Node::mapping(), 0, None), "");
    }

    #[test]
    fn nested_mappings() {
        let m: Node = Mapping::new()
            .with(
                "manual_ip",
                Mapping::new()
                    .with("static_ip", "192.168.1.50")
                    .with("gateway", "192.168.1.1"),
            )
            .with("ssid", "MyWifi")
            .into();
        assert_eq!(
            render_node(&m, 0, Some("wifi")),
            "wifi:\n  manual_ip:\n    gateway: 192.168.1.1\n    static_ip: 192.168.1.50\n  ssid: MyWifi"
        );
    }

    #[test]
    fn sequence_of_scalars() {
        let seq: Node = ["a", "b", "c"].into_iter().collect::<Sequence>().into();
        assert_eq!(render_node(&seq, 0, Some("tags")), "tags:\n  - a\n  - b\n  - c");
    }

    #[test]
    fn sequence_of_mappings_aligns_continuation_lines() {
        let order = KeyOrder::pinned(["platform", "pin"]);
        let seq: Node = Sequence::new()
            .with(Mapping::new().with("platform", "dht").with("pin", "D1").with_order(order.clone()))
            .with(Mapping::new().with("platform", "gpio").with("pin", "D2").with_order(order))
            .into();
        assert_eq!(
            render_node(&seq, 0, None),
            "- platform: dht\n  pin: D1\n- platform: gpio\n  pin: D2"
        );
        assert_eq!(
            render_node(&seq, 0, Some("sensor")),
            "sensor:\n  - platform: dht\n    pin: D1\n  - platform: gpio\n    pin: D2"
        );
    }

    #[test]
    fn nested_sequences() {
        let inner: Sequence = [1, 2].into_iter().collect();
        let seq: Node = Sequence::new().with(inner).with("x").into();
        assert_eq!(render_node(&seq, 0, None), "- - 1\n  - 2\n- x");
    }

    #[test]
    fn empty_item_renders_bare_dash() {
        let seq: Node = Sequence::new().with(Node::mapping()).into();
        assert_eq!(render_node(&seq, 0, Some("k")), "k:\n  -");
    }

    #[test]
    fn sequence_item_count_matches_dash_count() {
        for n in [0usize, 1, 7, 40] {
            let seq: Node = (0..n).map(|i| format!("item{i}")).collect::<Sequence>().into();
            let text = render_node(&seq, 0, None);
            let dashes = text.lines().filter(|l| l.starts_with("- ")).count();
            assert_eq!(dashes, n);
            assert_eq!(text.lines().count(), n);
        }
    }

    #[test]
    fn comments_above_and_below() {
        let node = Node::string("D1")
            .with_comment("data pin\r\nactive high")
            .with_comment_below("end");
        assert_eq!(
            render_node(&node, 2, Some("pin")),
            "  # data pin\n  # active high\n  pin: D1\n  # end"
        );
    }

    #[test]
    fn empty_comment_line_renders_bare_hash() {
        let node = Node::int(1).with_comment("a\n\nb");
        assert_eq!(render_node(&node, 0, Some("k")), "# a\n#\n# b\nk: 1");
    }

    #[test]
    fn inline_comments() {
        let scalar = Node::int(80).with_inline_comment("http");
        assert_eq!(render_node(&scalar, 0, Some("port")), "port: 80  # http");

        let named: Node = Mapping::new().with("a", 1).into();
        let named = named.with_inline_comment("block");
        assert_eq!(render_node(&named, 0, Some("m")), "m:  # block\n  a: 1");

        let root: Node = Mapping::new().with("a", 1).into();
        let root = root.with_inline_comment("root");
        assert_eq!(render_node(&root, 0, None), "# root\na: 1");
    }

    #[test]
    fn comments_on_sequence_items() {
        let seq: Node = Sequence::new()
            .with(Node::string("a").with_comment("first"))
            .with(Node::string("b").with_inline_comment("second"))
            .into();
        assert_eq!(
            render_node(&seq, 0, Some("k")),
            "k:\n  # first\n  - a\n  - b  # second"
        );
    }

    #[test]
    fn comments_do_not_change_quoting() {
        let plain = Node::string("abc").with_comment("x: #y");
        assert_eq!(render_node(&plain, 0, Some("k")), "# x: #y\nk: abc");
    }

    #[test]
    fn tagged_composites() {
        let m: Node = Mapping::new().with("a", 1).into();
        let m = m.with_tag("!include_vars");
        assert_eq!(render_node(&m, 0, Some("k")), "k: !include_vars\n  a: 1");
        let seq: Node = Sequence::new().with(m.clone()).into();
        assert_eq!(render_node(&seq, 0, None), "- !include_vars\n  a: 1");
    }

    #[test]
    fn tagged_literal_block() {
        let node = Node::literal("return 1;").with_tag("lambda");
        assert_eq!(render_node(&node, 0, Some("k")), "k: !lambda |-\n  return 1;");
    }

    #[test]
    fn render_is_idempotent() {
        let m: Node = Mapping::new()
            .with("b", Node::literal("x\ny").with_comment("c"))
            .with("a", Sequence::new().with(1).with(Mapping::new().with("z", "q: r")))
            .into();
        assert_eq!(render_node(&m, 0, None), render_node(&m, 0, None));
    }

    #[test]
    fn finish_drops_trailing_blank_lines() {
        assert_eq!(finish(vec!["a".into(), "  ".into(), String::new()]), "a");
        assert_eq!(finish(vec![String::new()]), "");
    }
}
