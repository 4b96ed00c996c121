//! The universal tree element.
//!
//! ## Structure
//!
//! ```text
//! Node
//! ├── kind: NodeKind
//! │    ├── Scalar(Scalar)
//! │    ├── Mapping(Mapping)   key → Node
//! │    └── Sequence(Sequence) [Node]
//! ├── name: Option<String>    key under which it renders
//! ├── comment: Option<Comment>
//! └── tag: Option<Tag>        e.g. `!secret`, wins over quoting
//! ```
//!
//! The mutation API (`set_child`, `append_item`) and the lookup API
//! (`get_child`, `has_child`, `lookup`) are what a validation layer needs
//! to check required fields before asking for a rendering.

use std::fmt;

use serde::ser::{Serialize, SerializeMap, SerializeSeq, Serializer};

use super::{Comment, Mapping, Scalar, ScalarValue, Sequence};
use crate::error::{DocumentError, DocumentResult};
use crate::render;

/// A YAML-style type tag such as `!secret` or `!lambda`.
///
/// Always stored with its leading `!`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Tag(String);

impl Tag {
    /// Create a tag, adding the leading `!` if missing.
    pub fn new(tag: impl AsRef<str>) -> Self {
        let tag = tag.as_ref().trim();
        if tag.starts_with('!') {
            Self(tag.to_owned())
        } else {
            Self(format!("!{tag}"))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Tag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// What a node holds.
#[derive(Debug, Clone, PartialEq)]
pub enum NodeKind {
    Scalar(Scalar),
    Mapping(Mapping),
    Sequence(Sequence),
}

impl NodeKind {
    pub const fn kind_name(&self) -> &'static str {
        match self {
            Self::Scalar(_) => "scalar",
            Self::Mapping(_) => "mapping",
            Self::Sequence(_) => "sequence",
        }
    }
}

/// A document node plus its metadata.
#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    kind: NodeKind,
    name: Option<String>,
    comment: Option<Comment>,
    tag: Option<Tag>,
}

impl Node {
    pub fn new(kind: NodeKind) -> Self {
        Self {
            kind,
            name: None,
            comment: None,
            tag: None,
        }
    }

    // ── Constructors ─────────────────────────────────────────────────────

    pub fn mapping() -> Self {
        Self::new(NodeKind::Mapping(Mapping::new()))
    }

    pub fn sequence() -> Self {
        Self::new(NodeKind::Sequence(Sequence::new()))
    }

    pub fn scalar(scalar: Scalar) -> Self {
        Self::new(NodeKind::Scalar(scalar))
    }

    pub fn string(text: impl AsRef<str>) -> Self {
        Self::scalar(Scalar::string(text))
    }

    pub fn quoted(text: impl AsRef<str>) -> Self {
        Self::scalar(Scalar::quoted(text))
    }

    pub fn int(value: i64) -> Self {
        Self::scalar(Scalar::int(value))
    }

    pub fn float(value: f64) -> Self {
        Self::scalar(Scalar::float(value))
    }

    pub fn bool(value: bool) -> Self {
        Self::scalar(Scalar::bool(value))
    }

    pub fn null() -> Self {
        Self::scalar(Scalar::null())
    }

    pub fn secret(reference: impl AsRef<str>) -> Self {
        Self::scalar(Scalar::secret(reference))
    }

    pub fn literal(text: impl AsRef<str>) -> Self {
        Self::scalar(Scalar::literal(text))
    }

    // ── Metadata ─────────────────────────────────────────────────────────

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.set_name(name);
        self
    }

    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = Some(name.into());
    }

    pub(crate) fn without_name(mut self) -> Self {
        self.name = None;
        self
    }

    /// Add a line (or several) printed above the node.
    pub fn with_comment(mut self, text: impl Into<String>) -> Self {
        self.comment_mut().push_above(text);
        self
    }

    /// Set the comment printed at the end of the node's first line.
    pub fn with_inline_comment(mut self, text: impl Into<String>) -> Self {
        self.comment_mut().set_inline(text);
        self
    }

    /// Add a line (or several) printed below the node.
    pub fn with_comment_below(mut self, text: impl Into<String>) -> Self {
        self.comment_mut().push_below(text);
        self
    }

    pub fn set_comment(&mut self, comment: Comment) {
        self.comment = (!comment.is_empty()).then_some(comment);
    }

    pub fn comment_mut(&mut self) -> &mut Comment {
        self.comment.get_or_insert_with(Comment::default)
    }

    pub fn with_tag(mut self, tag: impl AsRef<str>) -> Self {
        self.tag = Some(Tag::new(tag));
        self
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn comment(&self) -> Option<&Comment> {
        self.comment.as_ref().filter(|c| !c.is_empty())
    }

    pub fn tag(&self) -> Option<&Tag> {
        self.tag.as_ref()
    }

    pub fn kind(&self) -> &NodeKind {
        &self.kind
    }

    pub fn kind_name(&self) -> &'static str {
        self.kind.kind_name()
    }

    // ── Kind accessors ───────────────────────────────────────────────────

    pub fn as_scalar(&self) -> Option<&Scalar> {
        match &self.kind {
            NodeKind::Scalar(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_mapping(&self) -> Option<&Mapping> {
        match &self.kind {
            NodeKind::Mapping(m) => Some(m),
            _ => None,
        }
    }

    pub fn as_mapping_mut(&mut self) -> Option<&mut Mapping> {
        match &mut self.kind {
            NodeKind::Mapping(m) => Some(m),
            _ => None,
        }
    }

    pub fn as_sequence(&self) -> Option<&Sequence> {
        match &self.kind {
            NodeKind::Sequence(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_sequence_mut(&mut self) -> Option<&mut Sequence> {
        match &mut self.kind {
            NodeKind::Sequence(s) => Some(s),
            _ => None,
        }
    }

    pub fn is_scalar(&self) -> bool {
        matches!(self.kind, NodeKind::Scalar(_))
    }

    pub fn is_mapping(&self) -> bool {
        matches!(self.kind, NodeKind::Mapping(_))
    }

    pub fn is_sequence(&self) -> bool {
        matches!(self.kind, NodeKind::Sequence(_))
    }

    // ── Mutation API ─────────────────────────────────────────────────────

    /// Set the child at `key`. Fails unless this node is a mapping.
    pub fn set_child(&mut self, key: impl Into<String>, node: impl Into<Node>) -> DocumentResult<Option<Node>> {
        let path = self.display_path();
        let found = self.kind_name();
        self.as_mapping_mut()
            .map(|m| m.insert(key, node))
            .ok_or(DocumentError::NotAMapping { path, found })
    }

    /// Append an item. Fails unless this node is a sequence.
    pub fn append_item(&mut self, node: impl Into<Node>) -> DocumentResult<()> {
        let path = self.display_path();
        let found = self.kind_name();
        self.as_sequence_mut()
            .map(|s| s.push(node))
            .ok_or(DocumentError::NotASequence { path, found })
    }

    /// The child at `key`, if this is a mapping that has one.
    pub fn get_child(&self, key: &str) -> Option<&Node> {
        self.as_mapping().and_then(|m| m.get(key))
    }

    pub fn has_child(&self, key: &str) -> bool {
        self.as_mapping().is_some_and(|m| m.contains_key(key))
    }

    /// Follow a dotted path such as `wifi.ssid` or `sensor.0.platform`.
    ///
    /// Numeric segments index into sequences. An empty path is this node.
    pub fn lookup(&self, path: &str) -> DocumentResult<&Node> {
        let mut current = self;
        let mut walked = String::new();

        for segment in path.split('.').filter(|s| !s.is_empty()) {
            let here = if walked.is_empty() {
                self.display_path()
            } else {
                walked.clone()
            };
            if !walked.is_empty() {
                walked.push('.');
            }
            walked.push_str(segment);

            current = match &current.kind {
                NodeKind::Mapping(m) => m
                    .get(segment)
                    .ok_or_else(|| DocumentError::PathNotFound { path: walked.clone() })?,
                NodeKind::Sequence(s) => {
                    let index: usize = segment.parse().map_err(|_| DocumentError::NotAMapping {
                        path: here.clone(),
                        found: "sequence",
                    })?;
                    s.get(index).ok_or(DocumentError::IndexOutOfRange {
                        path: here,
                        index,
                        len: s.len(),
                    })?
                }
                NodeKind::Scalar(_) => {
                    return Err(DocumentError::NotAMapping {
                        path: here,
                        found: "scalar",
                    });
                }
            };
        }

        Ok(current)
    }

    fn display_path(&self) -> String {
        self.name.clone().unwrap_or_else(|| "<root>".into())
    }

    // ── Rendering ────────────────────────────────────────────────────────

    /// Render this node at indent 0 under its own name, if any.
    pub fn render(&self) -> String {
        render::render_node(self, 0, self.name())
    }
}

impl From<NodeKind> for Node {
    fn from(kind: NodeKind) -> Self {
        Node::new(kind)
    }
}

impl From<Scalar> for Node {
    fn from(s: Scalar) -> Self {
        Node::scalar(s)
    }
}

impl From<Mapping> for Node {
    fn from(m: Mapping) -> Self {
        Node::new(NodeKind::Mapping(m))
    }
}

impl From<Sequence> for Node {
    fn from(s: Sequence) -> Self {
        Node::new(NodeKind::Sequence(s))
    }
}

impl From<&str> for Node {
    fn from(s: &str) -> Self {
        Node::string(s)
    }
}

impl From<String> for Node {
    fn from(s: String) -> Self {
        Node::string(s)
    }
}

impl From<i64> for Node {
    fn from(v: i64) -> Self {
        Node::int(v)
    }
}

impl From<i32> for Node {
    fn from(v: i32) -> Self {
        Node::int(i64::from(v))
    }
}

impl From<u32> for Node {
    fn from(v: u32) -> Self {
        Node::int(i64::from(v))
    }
}

impl From<f64> for Node {
    fn from(v: f64) -> Self {
        Node::float(v)
    }
}

impl From<bool> for Node {
    fn from(v: bool) -> Self {
        Node::bool(v)
    }
}

/// Plain-data view of the tree: mappings in render order, secrets as their
/// `!secret` text, comments and tags dropped.
impl Serialize for Node {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match &self.kind {
            NodeKind::Scalar(scalar) => match scalar.value() {
                ScalarValue::String(s) | ScalarValue::LiteralBlock(s) => serializer.serialize_str(s),
                ScalarValue::Int(i) => serializer.serialize_i64(*i),
                ScalarValue::Float(x) => serializer.serialize_f64(*x),
                ScalarValue::Bool(b) => serializer.serialize_bool(*b),
                ScalarValue::Null => serializer.serialize_unit(),
                ScalarValue::Secret(_) => serializer.serialize_str(&scalar.to_string()),
            },
            NodeKind::Mapping(mapping) => {
                let mut map = serializer.serialize_map(Some(mapping.len()))?;
                for (key, child) in mapping.iter_ordered() {
                    map.serialize_entry(key, child)?;
                }
                map.end()
            }
            NodeKind::Sequence(sequence) => {
                let mut seq = serializer.serialize_seq(Some(sequence.len()))?;
                for item in sequence {
                    seq.serialize_element(item)?;
                }
                seq.end()
            }
        }
    }
}
