//! TOML manifest front-end.
//!
//! A manifest describes one device. Each top-level table is a block; an
//! array of tables is a repeated component.
//!
//! # Format
//!
//! ```toml
//! [esphome]
//! name = "livingroom"
//!
//! [esp8266]
//! board = "d1_mini"
//!
//! [wifi]
//! ssid     = "MyWifi"
//! password = { secret = "wifi_password" }   # → !secret wifi_password
//!
//! [[sensor]]
//! platform = "template"
//! lambda   = { lambda = "return 42.0;" }    # → literal block
//!
//! [comments]
//! header = "Living room node"               # top of the file
//! wifi   = "Network"                        # above the wifi block
//! ```
//!
//! Values convert as: strings, integers, floats and booleans to scalars,
//! datetimes to strings, arrays to sequences, tables to mappings (keys in
//! the order written).

use std::{
    collections::BTreeMap,
    fs,
    path::{Path, PathBuf},
};

use devyaml_core::prelude::{KeyOrder, Mapping, Node, Sequence};
use serde::{Deserialize, Serialize};
use toml::{Table, Value};
use tracing::{debug, info, instrument, warn};
use walkdir::WalkDir;

use crate::builder::BlockBuilder;
use crate::device::DeviceConfig;
use crate::error::{BlockError, BlockResult};
use crate::schema::{find_block, is_platform_block, BlockSchema};

/// File extension of manifests picked up from a directory.
pub const MANIFEST_EXTENSION: &str = "toml";

const COMMENTS_TABLE: &str = "comments";
const HEADER_KEY: &str = "header";

/// Fallbacks applied when a manifest leaves the platform out.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ManifestDefaults {
    /// Platform block added when none is present (`esp8266` or `esp32`).
    pub platform: Option<String>,

    /// Board filled into a platform block that has none.
    pub board: Option<String>,
}

impl ManifestDefaults {
    /// Whether the default board applies to `platform`.
    fn board_for(&self, platform: &str) -> Option<&str> {
        match self.platform.as_deref() {
            Some(p) if p != platform => None,
            _ => self.board.as_deref(),
        }
    }
}

// ── Parsing ──────────────────────────────────────────────────────────────────

/// Read and parse a manifest file.
///
/// # Errors
///
/// Returns [`BlockError::ManifestRead`] if the file cannot be read, and
/// any error of [`parse_manifest`].
#[instrument(skip_all, fields(path = %path.display()))]
pub fn load_manifest(path: &Path, defaults: &ManifestDefaults) -> BlockResult<DeviceConfig> {
    let raw = fs::read_to_string(path).map_err(|e| BlockError::ManifestRead {
        path: path.to_path_buf(),
        message: e.to_string(),
    })?;

    parse_manifest(&raw, defaults).map_err(|e| match e {
        BlockError::ManifestParse(message) => {
            BlockError::ManifestParse(format!("{}: {message}", path.display()))
        }
        other => other,
    })
}

/// Build a device from manifest text.
///
/// The result is not validated; call [`DeviceConfig::validate`].
///
/// # Errors
///
/// - [`BlockError::ManifestParse`] for invalid TOML
/// - [`BlockError::UnknownBlock`] for a table that is not a component
/// - [`BlockError::InvalidBlock`] for a block that is not a table
/// - any builder error for the blocks themselves
#[instrument(skip_all, fields(bytes = text.len()))]
pub fn parse_manifest(text: &str, defaults: &ManifestDefaults) -> BlockResult<DeviceConfig> {
    let table: Table =
        toml::from_str(text).map_err(|e| BlockError::ManifestParse(e.to_string()))?;

    let comments = match table.get(COMMENTS_TABLE) {
        Some(Value::Table(t)) => comment_table(t)?,
        Some(other) => {
            return Err(BlockError::InvalidBlock {
                block: COMMENTS_TABLE.into(),
                reason: format!("expected a table, found {}", other.type_str()),
            });
        }
        None => BTreeMap::new(),
    };

    let mut device = DeviceConfig::new();

    for (key, value) in table.iter().filter(|(k, _)| *k != COMMENTS_TABLE) {
        let schema = find_block(key).ok_or_else(|| BlockError::UnknownBlock { block: key.clone() })?;

        match value {
            Value::Table(fields) => {
                device.build(block_builder(schema, fields, defaults)?)?;
            }
            Value::Array(items) if schema.repeated => {
                for item in items {
                    let Value::Table(fields) = item else {
                        return Err(BlockError::InvalidBlock {
                            block: key.clone(),
                            reason: format!("array items must be tables, found {}", item.type_str()),
                        });
                    };
                    device.build(block_builder(schema, fields, defaults)?)?;
                }
            }
            Value::Array(_) => {
                return Err(BlockError::InvalidBlock {
                    block: key.clone(),
                    reason: "only repeated components can be given as an array of tables".into(),
                });
            }
            other => {
                return Err(BlockError::InvalidBlock {
                    block: key.clone(),
                    reason: format!("expected a table, found {}", other.type_str()),
                });
            }
        }
    }

    apply_platform_default(&mut device, defaults)?;

    for (target, text) in comments {
        if target == HEADER_KEY {
            device.set_header(text);
        } else if !device.set_block_comment(&target, text) {
            warn!(block = %target, "comment for a block that is not defined");
        }
    }

    debug!(blocks = device.blocks().len(), "manifest parsed");
    Ok(device)
}

fn block_builder(
    schema: &'static BlockSchema,
    fields: &Table,
    defaults: &ManifestDefaults,
) -> BlockResult<BlockBuilder> {
    let mut builder = BlockBuilder::for_schema(schema);
    for (field, value) in fields {
        builder.insert(field.as_str(), convert_value(schema.name, field, value)?);
    }

    if is_platform_block(schema.name) && !builder.has("board") {
        if let Some(board) = defaults.board_for(schema.name) {
            debug!(board, "board from defaults");
            builder.insert("board", board);
        }
    }
    Ok(builder)
}

fn apply_platform_default(device: &mut DeviceConfig, defaults: &ManifestDefaults) -> BlockResult<()> {
    let has_platform = device.block_names().into_iter().any(is_platform_block);
    let Some(platform) = defaults.platform.as_deref() else {
        return Ok(());
    };
    if has_platform {
        return Ok(());
    }

    if !is_platform_block(platform) {
        return Err(BlockError::InvalidValue {
            block: "defaults".into(),
            field: "platform".into(),
            reason: format!("'{platform}' is not a platform block"),
        });
    }
    let mut builder = BlockBuilder::new(platform)?;
    if let Some(board) = defaults.board.as_deref() {
        builder.insert("board", board);
    }
    info!(platform, "platform block from defaults");
    device.build(builder)
}

/// Collect the `[comments]` table: a string or array of strings per key.
fn comment_table(table: &Table) -> BlockResult<BTreeMap<String, String>> {
    table
        .iter()
        .map(|(key, value)| {
            let text = match value {
                Value::String(s) => s.clone(),
                Value::Array(lines) => lines
                    .iter()
                    .map(|line| {
                        line.as_str().map(str::to_owned).ok_or_else(|| BlockError::InvalidValue {
                            block: COMMENTS_TABLE.into(),
                            field: key.clone(),
                            reason: "comment lines must be strings".into(),
                        })
                    })
                    .collect::<BlockResult<Vec<_>>>()?
                    .join("\n"),
                other => {
                    return Err(BlockError::InvalidValue {
                        block: COMMENTS_TABLE.into(),
                        field: key.clone(),
                        reason: format!("expected a string, found {}", other.type_str()),
                    });
                }
            };
            Ok((key.clone(), text))
        })
        .collect()
}

// ── Value conversion ─────────────────────────────────────────────────────────

/// Convert a TOML value into a node.
///
/// `{ secret = "name" }` becomes a secret reference and `{ lambda = "..." }`
/// a literal block; any other table becomes a mapping.
///
/// # Errors
///
/// Returns [`BlockError::InvalidValue`] when a `secret` or `lambda`
/// table does not hold a string.
pub fn convert_value(block: &str, field: &str, value: &Value) -> BlockResult<Node> {
    let node = match value {
        Value::String(s) => Node::string(s),
        Value::Integer(i) => Node::int(*i),
        Value::Float(x) => Node::float(*x),
        Value::Boolean(b) => Node::bool(*b),
        Value::Datetime(dt) => Node::string(dt.to_string()),
        Value::Array(items) => items
            .iter()
            .map(|item| convert_value(block, field, item))
            .collect::<BlockResult<Sequence>>()?
            .into(),
        Value::Table(table) => convert_table(block, field, table)?,
    };
    Ok(node)
}

fn convert_table(block: &str, field: &str, table: &Table) -> BlockResult<Node> {
    if table.len() == 1 {
        let special = |value: &Value, kind: &str| {
            value.as_str().map(str::to_owned).ok_or_else(|| BlockError::InvalidValue {
                block: block.into(),
                field: field.into(),
                reason: format!("'{kind}' must be a string, found {}", value.type_str()),
            })
        };
        if let Some(value) = table.get("secret") {
            return Ok(Node::secret(special(value, "secret")?));
        }
        if let Some(value) = table.get("lambda") {
            return Ok(Node::literal(special(value, "lambda")?));
        }
    }

    let mut mapping = Mapping::new().with_order(KeyOrder::pinned(table.keys()));
    for (key, value) in table {
        mapping.insert(key.as_str(), convert_value(block, &format!("{field}.{key}"), value)?);
    }
    Ok(mapping.into())
}

// ── Discovery ────────────────────────────────────────────────────────────────

/// Every manifest under `dir`, sorted by path.
///
/// # Errors
///
/// Returns [`BlockError::ManifestRead`] if the tree cannot be walked.
#[instrument(skip_all, fields(dir = %dir.display()))]
pub fn discover_manifests(dir: &Path) -> BlockResult<Vec<PathBuf>> {
    let mut found = Vec::new();
    for entry in WalkDir::new(dir).sort_by_file_name() {
        let entry = entry.map_err(|e| BlockError::ManifestRead {
            path: e.path().unwrap_or(dir).to_path_buf(),
            message: e.to_string(),
        })?;
        let path = entry.path();
        if entry.file_type().is_file()
            && path.extension().and_then(|e| e.to_str()) == Some(MANIFEST_EXTENSION)
        {
            found.push(path.to_path_buf());
        }
    }
    debug!(count = found.len(), "manifests discovered");
    Ok(found)
}

#[cfg(test)]
mod tests {
    use super::*;

    const LIVINGROOM: &str = r#"
[esphome]
name = "livingroom"

[esp8266]
board = "d1_mini"

[wifi]
ssid = "MyWifi"
password = { secret = "wifi_password" }

[captive_portal]

[[sensor]]
platform = "dht"
pin = "D1"

[[sensor]]
platform = "gpio"
pin = "D2"
"#;

    fn parse(text: &str) -> BlockResult<DeviceConfig> {
        parse_manifest(text, &ManifestDefaults::default())
    }

    #[test]
    fn full_manifest_renders() {
        let device = parse(LIVINGROOM).unwrap();
        device.validate().unwrap();
        assert_eq!(
            device.render(),
            "esphome:\n  name: livingroom\n\n\
             esp8266:\n  board: d1_mini\n\n\
             wifi:\n  ssid: MyWifi\n  password: !secret wifi_password\n\n\
             captive_portal:\n\n\
             sensor:\n  - platform: dht\n    pin: D1\n  - platform: gpio\n    pin: D2\n"
        );
    }

    #[test]
    fn invalid_toml_is_a_parse_error() {
        assert!(matches!(parse("[wifi"), Err(BlockError::ManifestParse(_))));
    }

    #[test]
    fn unknown_table_is_unknown_block() {
        assert_eq!(
            parse("[bluetooth]\n").unwrap_err(),
            BlockError::UnknownBlock {
                block: "bluetooth".into()
            }
        );
    }

    #[test]
    fn non_repeated_block_rejects_array() {
        let err = parse("[[wifi]]\nssid = \"a\"\npassword = \"b\"\n").unwrap_err();
        assert!(matches!(err, BlockError::InvalidBlock { .. }));
    }

    #[test]
    fn scalar_block_is_rejected() {
        let err = parse("captive_portal = true\n").unwrap_err();
        assert!(err.to_string().contains("expected a table, found boolean"));
    }

    #[test]
    fn lambda_tables_become_literal_blocks() {
        let text = r#"
[[sensor]]
platform = "template"
name = "Answer"
update_interval = { lambda = "auto x = 42.0;\nreturn x;" }
"#;
        let device = parse(text).unwrap();
        assert_eq!(
            device.render(),
            "sensor:\n  - platform: template\n    name: Answer\n    update_interval: |-\n      auto x = 42.0;\n      return x;\n"
        );
    }

    #[test]
    fn nested_tables_keep_written_order() {
        let text = r#"
[wifi]
ssid = "MyWifi"
password = "pw"
manual_ip = { static_ip = "192.168.1.50", gateway = "192.168.1.1", subnet = "255.255.255.0" }
"#;
        let device = parse(text).unwrap();
        assert!(device.render().contains(
            "  manual_ip:\n    static_ip: 192.168.1.50\n    gateway: 192.168.1.1\n    subnet: 255.255.255.0\n"
        ));
    }

    #[test]
    fn arrays_become_sequences() {
        let text = "[time]\n";
        assert!(matches!(parse(text), Err(BlockError::MissingRequiredField { .. })));

        let text = r#"
[[time]]
platform = "sntp"
servers = ["0.pool.ntp.org", "1.pool.ntp.org"]
"#;
        assert_eq!(
            parse(text).unwrap().render(),
            "time:\n  - platform: sntp\n    servers:\n      - 0.pool.ntp.org\n      - 1.pool.ntp.org\n"
        );
    }

    #[test]
    fn scalars_keep_their_types() {
        let text = r#"
[esphome]
name = "x"
comment = "123"

[logger]
baud_rate = 0
level = "VERBOSE"
"#;
        let out = parse(text).unwrap().render();
        assert!(out.contains("comment: \"123\""), "{out}");
        assert!(out.contains("baud_rate: 0"), "{out}");
    }

    #[test]
    fn secret_table_must_hold_a_string() {
        let err = parse("[api]\npassword = { secret = 5 }\n").unwrap_err();
        assert!(err.to_string().contains("'secret' must be a string"));
    }

    #[test]
    fn comments_table_attaches_comments() {
        let text = r#"
[esphome]
name = "x"

[wifi]
ssid = "a"
password = "b"

[comments]
header = ["Generated for the hallway", "edit the manifest, not this file"]
wifi = "Network"
"#;
        let out = parse(text).unwrap().render();
        assert!(out.starts_with(
            "# Generated for the hallway\n# edit the manifest, not this file\n\nesphome:\n"
        ));
        assert!(out.contains("\n\n# Network\nwifi:\n"));
    }

    #[test]
    fn defaults_fill_missing_platform() {
        let defaults = ManifestDefaults {
            platform: Some("esp32".into()),
            board: Some("esp32dev".into()),
        };
        let device = parse_manifest("[esphome]\nname = \"x\"\n", &defaults).unwrap();
        device.validate().unwrap();
        assert_eq!(device.platform(), Some("esp32"));
        assert!(device.render().contains("esp32:\n  board: esp32dev\n"));
    }

    #[test]
    fn default_board_fills_matching_platform_only() {
        let defaults = ManifestDefaults {
            platform: Some("esp32".into()),
            board: Some("esp32dev".into()),
        };
        let err = parse_manifest("[esp8266]\n", &defaults).unwrap_err();
        assert_eq!(
            err,
            BlockError::MissingRequiredField {
                block: "esp8266",
                field: "board"
            }
        );

        let board_only = ManifestDefaults {
            platform: None,
            board: Some("nodemcuv2".into()),
        };
        let device = parse_manifest("[esp8266]\n", &board_only).unwrap();
        assert!(device.render().contains("board: nodemcuv2"));
    }

    #[test]
    fn non_platform_default_is_rejected() {
        let defaults = ManifestDefaults {
            platform: Some("wifi".into()),
            board: None,
        };
        let err = parse_manifest("[esphome]\nname = \"x\"\n", &defaults).unwrap_err();
        assert!(matches!(err, BlockError::InvalidValue { .. }));
    }
}
