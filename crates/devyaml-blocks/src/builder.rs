//! Generic block builder driven by the schema registry.
//!
//! ```text
//! BlockBuilder::new("wifi")        ← look up schema
//!     .set("ssid", "MyWifi")       ← collect raw values
//!     .set("password", "!secret wifi_password")
//!     .build()                     ← unknown fields → required → hints → defaults
//! ```

use devyaml_core::prelude::{Mapping, Node, Scalar, ScalarValue};
use tracing::{debug, instrument, trace};

use crate::error::{BlockError, BlockResult};
use crate::schema::{find_block, BlockSchema, FieldSpec, ValueHint};

/// Collects field values for one block and checks them against its schema.
#[derive(Debug, Clone)]
pub struct BlockBuilder {
    schema: &'static BlockSchema,
    values: Vec<(String, Node)>,
    comment: Option<String>,
    inline_comment: Option<String>,
}

impl BlockBuilder {
    /// Start a block by name.
    ///
    /// # Errors
    ///
    /// Returns [`BlockError::UnknownBlock`] if no schema is registered.
    pub fn new(name: &str) -> BlockResult<Self> {
        find_block(name)
            .map(Self::for_schema)
            .ok_or_else(|| BlockError::UnknownBlock { block: name.into() })
    }

    pub fn for_schema(schema: &'static BlockSchema) -> Self {
        Self {
            schema,
            values: Vec::new(),
            comment: None,
            inline_comment: None,
        }
    }

    pub fn schema(&self) -> &'static BlockSchema {
        self.schema
    }

    /// Set a field. Setting it again replaces the earlier value.
    pub fn set(mut self, field: impl Into<String>, value: impl Into<Node>) -> Self {
        self.insert(field, value);
        self
    }

    pub fn insert(&mut self, field: impl Into<String>, value: impl Into<Node>) {
        let field = field.into();
        let value = value.into();
        match self.values.iter_mut().find(|(k, _)| *k == field) {
            Some(slot) => slot.1 = value,
            None => self.values.push((field, value)),
        }
    }

    pub fn has(&self, field: &str) -> bool {
        self.values.iter().any(|(k, _)| k == field)
    }

    /// Comment printed above the block.
    pub fn comment(mut self, text: impl Into<String>) -> Self {
        self.comment = Some(text.into());
        self
    }

    /// Comment printed after the block's key.
    pub fn inline_comment(mut self, text: impl Into<String>) -> Self {
        self.inline_comment = Some(text.into());
        self
    }

    /// Check the collected values and produce the block node.
    ///
    /// The result is a mapping named after the block, with keys in schema
    /// order and extra fields after.
    ///
    /// # Errors
    ///
    /// - [`BlockError::UnknownField`] for a field the schema does not list
    ///   (unless it allows extras)
    /// - [`BlockError::MissingRequiredField`] for the first absent required field
    /// - [`BlockError::InvalidValue`] when a value does not fit its hint
    #[instrument(skip_all, fields(block = self.schema.name))]
    pub fn build(self) -> BlockResult<Node> {
        let schema = self.schema;

        if !schema.allow_extra {
            if let Some((field, _)) = self.values.iter().find(|(k, _)| schema.field(k).is_none()) {
                return Err(BlockError::UnknownField {
                    block: schema.name.into(),
                    field: field.clone(),
                });
            }
        }

        if let Some(missing) = schema.required_fields().find(|f| !self.has(f.name)) {
            return Err(BlockError::MissingRequiredField {
                block: schema.name,
                field: missing.name,
            });
        }

        let mut mapping = Mapping::new().with_order(schema.key_order());
        for (field, value) in self.values {
            let value = match schema.field(&field) {
                Some(spec) => apply_hint(schema.name, spec, value)?,
                None => {
                    trace!(field = %field, "extra field");
                    value
                }
            };
            mapping.insert(field, value);
        }

        for field in schema.fields {
            if let Some(default) = field.default {
                if !mapping.contains_key(field.name) {
                    trace!(field = field.name, "default applied");
                    mapping.insert(field.name, default.to_node());
                }
            }
        }

        debug!(fields = mapping.len(), "block built");

        let mut node = Node::from(mapping).with_name(schema.name);
        if let Some(text) = self.comment {
            node = node.with_comment(text);
        }
        if let Some(text) = self.inline_comment {
            node = node.with_inline_comment(text);
        }
        Ok(node)
    }
}

/// Check and convert one field value according to its hint.
///
/// # Errors
///
/// Returns [`BlockError::InvalidValue`] when the value cannot take the
/// hinted form.
pub fn apply_hint(block: &str, field: &FieldSpec, node: Node) -> BlockResult<Node> {
    let invalid = |reason: String| BlockError::InvalidValue {
        block: block.into(),
        field: field.name.into(),
        reason,
    };

    if field.hint == ValueHint::Auto {
        return Ok(node);
    }
    let Some(scalar) = node.as_scalar() else {
        return Err(invalid(format!(
            "expected {} value, found a {}",
            field.hint.as_str(),
            node.kind_name()
        )));
    };

    let value = scalar.value().clone();
    let converted = match (field.hint, &value) {
        (ValueHint::Auto, _) => return Ok(node),

        (ValueHint::Quoted, ScalarValue::Null) => {
            return Err(invalid("expected a value to quote, found null".into()));
        }
        (ValueHint::Quoted, ScalarValue::Secret(_)) => return Ok(node),
        (ValueHint::Quoted, _) => Scalar::quoted(scalar.to_string()),

        (ValueHint::Secret, ScalarValue::String(s)) => match s.strip_prefix("!secret ") {
            Some(reference) => Scalar::secret(reference),
            None => return Ok(node),
        },
        (ValueHint::Secret, _) => return Ok(node),

        (ValueHint::Lambda, ScalarValue::String(s)) => Scalar::literal(s),
        (ValueHint::Lambda, ScalarValue::LiteralBlock(_)) => return Ok(node),
        (ValueHint::Lambda, other) => {
            return Err(invalid(format!("expected lambda source text, found {}", other.kind_name())));
        }

        (ValueHint::Integer, ScalarValue::Int(_)) => return Ok(node),
        (ValueHint::Integer, ScalarValue::String(s)) => match s.trim().parse::<i64>() {
            Ok(value) => Scalar::int(value),
            Err(_) => return Err(invalid(format!("'{s}' is not an integer"))),
        },
        (ValueHint::Integer, other) => {
            return Err(invalid(format!("expected an integer, found {}", other.kind_name())));
        }

        (ValueHint::Boolean, ScalarValue::Bool(_)) => return Ok(node),
        (ValueHint::Boolean, ScalarValue::String(s)) => match s.to_ascii_lowercase().as_str() {
            "true" => Scalar::bool(true),
            "false" => Scalar::bool(false),
            _ => return Err(invalid(format!("'{s}' is not a boolean"))),
        },
        (ValueHint::Boolean, other) => {
            return Err(invalid(format!("expected a boolean, found {}", other.kind_name())));
        }
    };

    Ok(retype(&node, converted))
}

/// A scalar node carrying over the comment and tag of `original`.
fn retype(original: &Node, scalar: Scalar) -> Node {
    let mut node = Node::scalar(scalar);
    if let Some(comment) = original.comment() {
        node.set_comment(comment.clone());
    }
    if let Some(tag) = original.tag() {
        node = node.with_tag(tag.as_str());
    }
    node
}
