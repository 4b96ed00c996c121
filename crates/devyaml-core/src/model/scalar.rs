//! Scalar values: the leaves of a document tree.
//!
//! # Design
//!
//! [`ScalarValue`] is an open enum callers can match on, but a [`Scalar`]
//! can only be built through constructors that normalize text. That keeps
//! the "normalized at assignment" invariant out of the renderer's hands:
//! two renders of the same scalar are always byte-identical.

use std::fmt;

use super::normalize_newlines;
use crate::render::quoting::format_tagged;

/// The typed content of a scalar.
#[derive(Debug, Clone, PartialEq)]
pub enum ScalarValue {
    String(String),
    Int(i64),
    Float(f64),
    Bool(bool),
    Null,
    /// A reference into an external secrets store, rendered `!secret <name>`.
    Secret(String),
    /// Multi-line text rendered with a `|-` block header.
    LiteralBlock(String),
}

impl ScalarValue {
    pub const fn kind_name(&self) -> &'static str {
        match self {
            Self::String(_) => "string",
            Self::Int(_) => "int",
            Self::Float(_) => "float",
            Self::Bool(_) => "bool",
            Self::Null => "null",
            Self::Secret(_) => "secret",
            Self::LiteralBlock(_) => "literal block",
        }
    }
}

/// How a string scalar is presented.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ScalarStyle {
    /// Let the quoting policy decide.
    #[default]
    Auto,
    /// Always double-quote, even when the policy would not.
    DoubleQuoted,
}

/// An atomic leaf value.
#[derive(Debug, Clone, PartialEq)]
pub struct Scalar {
    value: ScalarValue,
    style: ScalarStyle,
}

impl Scalar {
    /// A string scalar; line endings are canonicalized here.
    pub fn string(text: impl AsRef<str>) -> Self {
        Self::plain(ScalarValue::String(normalize_newlines(text.as_ref())))
    }

    /// A string scalar that always renders double-quoted.
    pub fn quoted(text: impl AsRef<str>) -> Self {
        Self {
            style: ScalarStyle::DoubleQuoted,
            ..Self::string(text)
        }
    }

    pub fn int(value: i64) -> Self {
        Self::plain(ScalarValue::Int(value))
    }

    pub fn float(value: f64) -> Self {
        Self::plain(ScalarValue::Float(value))
    }

    pub fn bool(value: bool) -> Self {
        Self::plain(ScalarValue::Bool(value))
    }

    pub fn null() -> Self {
        Self::plain(ScalarValue::Null)
    }

    /// A secret reference. The reference is trimmed; it is a key, not content.
    pub fn secret(reference: impl AsRef<str>) -> Self {
        Self::plain(ScalarValue::Secret(reference.as_ref().trim().to_owned()))
    }

    /// A literal block.
    ///
    /// Leading and trailing blank lines are dropped before storage; blank
    /// lines in the middle are kept.
    pub fn literal(text: impl AsRef<str>) -> Self {
        Self::plain(ScalarValue::LiteralBlock(trim_blank_lines(
            &normalize_newlines(text.as_ref()),
        )))
    }

    /// Build from an arbitrary value, applying the same normalization as the
    /// dedicated constructors.
    pub fn from_value(value: ScalarValue) -> Self {
        match value {
            ScalarValue::String(s) => Self::string(s),
            ScalarValue::Secret(s) => Self::secret(s),
            ScalarValue::LiteralBlock(s) => Self::literal(s),
            other => Self::plain(other),
        }
    }

    fn plain(value: ScalarValue) -> Self {
        Self {
            value,
            style: ScalarStyle::Auto,
        }
    }

    // Getters

    pub fn value(&self) -> &ScalarValue {
        &self.value
    }

    pub fn style(&self) -> ScalarStyle {
        self.style
    }

    pub fn with_style(mut self, style: ScalarStyle) -> Self {
        self.style = style;
        self
    }

    /// The string content, for `String`, `Secret` and `LiteralBlock` scalars.
    pub fn as_str(&self) -> Option<&str> {
        match &self.value {
            ScalarValue::String(s) | ScalarValue::Secret(s) | ScalarValue::LiteralBlock(s) => {
                Some(s)
            }
            _ => None,
        }
    }

    pub fn is_literal_block(&self) -> bool {
        matches!(self.value, ScalarValue::LiteralBlock(_))
    }
}

/// Canonical, locale-independent text of a float.
///
/// Always carries a decimal point so the value reads back as a float, and
/// uses the YAML spellings for the non-finite values.
pub fn format_float(value: f64) -> String {
    if value.is_nan() {
        ".nan".into()
    } else if value.is_infinite() {
        if value > 0.0 { ".inf".into() } else { "-.inf".into() }
    } else if value.fract() == 0.0 {
        format!("{value:.1}")
    } else {
        value.to_string()
    }
}

fn trim_blank_lines(text: &str) -> String {
    let lines: Vec<&str> = text.split('\n').collect();
    let start = lines.iter().position(|l| !l.trim().is_empty());
    let end = lines.iter().rposition(|l| !l.trim().is_empty());
    match (start, end) {
        (Some(start), Some(end)) => lines[start..=end].join("\n"),
        _ => String::new(),
    }
}

impl fmt::Display for Scalar {
    /// The raw, unquoted value text.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.value {
            ScalarValue::String(s) | ScalarValue::LiteralBlock(s) => f.write_str(s),
            ScalarValue::Int(i) => write!(f, "{i}"),
            ScalarValue::Float(x) => f.write_str(&format_float(*x)),
            ScalarValue::Bool(b) => write!(f, "{b}"),
            ScalarValue::Null => f.write_str("null"),
            ScalarValue::Secret(name) => f.write_str(&format_tagged("!secret", name)),
        }
    }
}

impl From<&str> for Scalar {
    fn from(s: &str) -> Self {
        Scalar::string(s)
    }
}

impl From<String> for Scalar {
    fn from(s: String) -> Self {
        Scalar::string(s)
    }
}

impl From<i64> for Scalar {
    fn from(v: i64) -> Self {
        Scalar::int(v)
    }
}

impl From<i32> for Scalar {
    fn from(v: i32) -> Self {
        Scalar::int(i64::from(v))
    }
}

impl From<u32> for Scalar {
    fn from(v: u32) -> Self {
        Scalar::int(i64::from(v))
    }
}

impl From<f64> for Scalar {
    fn from(v: f64) -> Self {
        Scalar::float(v)
    }
}

impl From<bool> for Scalar {
    fn from(v: bool) -> Self {
        Scalar::bool(v)
    }
}
