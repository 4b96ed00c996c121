//! Component schema registry.
//!
//! Every top-level block a device file may contain is described exactly
//! once by a [`BlockSchema`] in [`BLOCK_REGISTRY`]. The generic
//! [`BlockBuilder`](crate::builder::BlockBuilder) interprets these entries,
//! so there is no per-component builder type.
//!
//! # Adding a New Component
//!
//! 1. Add one [`BlockSchema`] entry to [`BLOCK_REGISTRY`]
//! 2. That's it: the builder, manifest reader and `devyaml blocks` all
//!    derive from the table
//!
//! Registry order is also the order blocks appear in a rendered device
//! file, so platform-level blocks come first.

use devyaml_core::prelude::{KeyOrder, Node};

// ── Field definitions ────────────────────────────────────────────────────────

/// How a field's value is checked and converted before rendering.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueHint {
    /// Rendered as given, quoting decided by content.
    Auto,
    /// Always double-quoted.
    Quoted,
    /// `"!secret name"` strings become secret references.
    Secret,
    /// Strings become literal blocks.
    Lambda,
    /// Must be an integer (numeric strings are accepted).
    Integer,
    /// Must be a boolean (`"true"`/`"false"` strings are accepted).
    Boolean,
}

impl ValueHint {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Auto => "auto",
            Self::Quoted => "quoted",
            Self::Secret => "secret",
            Self::Lambda => "lambda",
            Self::Integer => "integer",
            Self::Boolean => "boolean",
        }
    }
}

/// A default filled in when the field is absent.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DefaultValue {
    Str(&'static str),
    Int(i64),
    Bool(bool),
}

impl DefaultValue {
    pub fn to_node(self) -> Node {
        match self {
            Self::Str(s) => Node::string(s),
            Self::Int(i) => Node::int(i),
            Self::Bool(b) => Node::bool(b),
        }
    }
}

/// One field of a block.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FieldSpec {
    pub name: &'static str,

    /// Building fails when a required field is absent.
    pub required: bool,

    pub default: Option<DefaultValue>,

    pub hint: ValueHint,
}

impl FieldSpec {
    pub const fn required(name: &'static str, hint: ValueHint) -> Self {
        Self {
            name,
            required: true,
            default: None,
            hint,
        }
    }

    pub const fn optional(name: &'static str, hint: ValueHint) -> Self {
        Self {
            name,
            required: false,
            default: None,
            hint,
        }
    }

    pub const fn defaulted(name: &'static str, default: DefaultValue, hint: ValueHint) -> Self {
        Self {
            name,
            required: false,
            default: Some(default),
            hint,
        }
    }
}

// ── Block definitions ────────────────────────────────────────────────────────

/// Describes everything the builder needs to know about one component.
#[derive(Debug, Clone, Copy)]
pub struct BlockSchema {
    /// Top-level key, e.g. `wifi`.
    pub name: &'static str,

    /// One-line summary shown by `devyaml blocks`.
    pub description: &'static str,

    /// Known fields, in render order.
    pub fields: &'static [FieldSpec],

    /// Repeated blocks collect into a sequence (`sensor:` then `- platform: ...`).
    pub repeated: bool,

    /// Whether fields outside `fields` are accepted as-is.
    ///
    /// Platform-driven components (`sensor`, `switch`, ...) take
    /// platform-specific options, so they allow extras.
    pub allow_extra: bool,
}

impl BlockSchema {
    pub fn field(&self, name: &str) -> Option<&'static FieldSpec> {
        self.fields.iter().find(|f| f.name == name)
    }

    pub fn field_names(&self) -> impl Iterator<Item = &'static str> {
        self.fields.iter().map(|f| f.name)
    }

    pub fn required_fields(&self) -> impl Iterator<Item = &'static FieldSpec> {
        self.fields.iter().filter(|f| f.required)
    }

    /// Schema fields first in table order, extras after.
    pub fn key_order(&self) -> KeyOrder {
        KeyOrder::pinned(self.field_names())
    }
}

use DefaultValue::{Bool, Int, Str};
use ValueHint::{Auto, Boolean, Integer, Lambda, Quoted, Secret};

const fn req(name: &'static str, hint: ValueHint) -> FieldSpec {
    FieldSpec::required(name, hint)
}

const fn opt(name: &'static str, hint: ValueHint) -> FieldSpec {
    FieldSpec::optional(name, hint)
}

const fn def(name: &'static str, default: DefaultValue, hint: ValueHint) -> FieldSpec {
    FieldSpec::defaulted(name, default, hint)
}

/// Single source of truth for component schemas.
pub static BLOCK_REGISTRY: &[BlockSchema] = &[
    BlockSchema {
        name: "esphome",
        description: "Device identity and build options",
        fields: &[
            req("name", Auto),
            opt("friendly_name", Auto),
            opt("area", Auto),
            opt("comment", Auto),
            opt("min_version", Quoted),
            opt("build_path", Auto),
            opt("on_boot", Auto),
            opt("on_shutdown", Auto),
        ],
        repeated: false,
        allow_extra: false,
    },
    BlockSchema {
        name: "esp8266",
        description: "ESP8266 platform",
        fields: &[
            req("board", Auto),
            opt("framework", Auto),
            opt("restore_from_flash", Boolean),
            opt("early_pin_init", Boolean),
            opt("board_flash_mode", Auto),
        ],
        repeated: false,
        allow_extra: false,
    },
    BlockSchema {
        name: "esp32",
        description: "ESP32 platform",
        fields: &[
            req("board", Auto),
            opt("variant", Auto),
            opt("framework", Auto),
            opt("flash_size", Auto),
        ],
        repeated: false,
        allow_extra: false,
    },
    BlockSchema {
        name: "wifi",
        description: "WiFi station and fallback access point",
        fields: &[
            req("ssid", Auto),
            req("password", Secret),
            opt("manual_ip", Auto),
            opt("ap", Auto),
            opt("networks", Auto),
            opt("domain", Auto),
            opt("use_address", Auto),
            opt("fast_connect", Boolean),
            opt("power_save_mode", Auto),
            opt("output_power", Auto),
        ],
        repeated: false,
        allow_extra: false,
    },
    BlockSchema {
        name: "captive_portal",
        description: "Captive portal served by the fallback access point",
        fields: &[],
        repeated: false,
        allow_extra: false,
    },
    BlockSchema {
        name: "logger",
        description: "Serial and network logging",
        fields: &[
            def("level", Str("DEBUG"), Auto),
            opt("baud_rate", Integer),
            opt("hardware_uart", Auto),
            opt("tx_buffer_size", Integer),
            opt("logs", Auto),
        ],
        repeated: false,
        allow_extra: false,
    },
    BlockSchema {
        name: "api",
        description: "Native API for Home Assistant",
        fields: &[
            opt("encryption", Auto),
            opt("password", Secret),
            opt("port", Integer),
            opt("reboot_timeout", Auto),
            opt("services", Auto),
        ],
        repeated: false,
        allow_extra: false,
    },
    BlockSchema {
        name: "ota",
        description: "Over-the-air updates",
        fields: &[
            def("platform", Str("esphome"), Auto),
            opt("password", Secret),
            opt("port", Integer),
            opt("safe_mode", Boolean),
            opt("reboot_timeout", Auto),
        ],
        repeated: false,
        allow_extra: false,
    },
    BlockSchema {
        name: "mqtt",
        description: "MQTT client",
        fields: &[
            req("broker", Auto),
            def("port", Int(1883), Integer),
            opt("username", Auto),
            opt("password", Secret),
            opt("client_id", Auto),
            opt("discovery", Boolean),
            opt("topic_prefix", Auto),
            opt("birth_message", Auto),
            opt("will_message", Auto),
        ],
        repeated: false,
        allow_extra: false,
    },
    BlockSchema {
        name: "web_server",
        description: "Built-in web interface",
        fields: &[
            def("port", Int(80), Integer),
            opt("version", Integer),
            opt("auth", Auto),
            opt("local", Boolean),
            opt("include_internal", Boolean),
        ],
        repeated: false,
        allow_extra: false,
    },
    BlockSchema {
        name: "i2c",
        description: "I2C bus",
        fields: &[
            opt("id", Auto),
            req("sda", Auto),
            req("scl", Auto),
            def("scan", Bool(true), Boolean),
            opt("frequency", Auto),
        ],
        repeated: false,
        allow_extra: false,
    },
    BlockSchema {
        name: "sensor",
        description: "Numeric sensors",
        fields: &[
            req("platform", Auto),
            opt("name", Auto),
            opt("id", Auto),
            opt("pin", Auto),
            opt("update_interval", Auto),
            opt("unit_of_measurement", Quoted),
            opt("accuracy_decimals", Integer),
            opt("device_class", Auto),
            opt("state_class", Auto),
            opt("icon", Quoted),
            opt("internal", Boolean),
            opt("lambda", Lambda),
            opt("filters", Auto),
            opt("on_value", Auto),
        ],
        repeated: true,
        allow_extra: true,
    },
    BlockSchema {
        name: "binary_sensor",
        description: "On/off sensors and buttons",
        fields: &[
            req("platform", Auto),
            opt("name", Auto),
            opt("id", Auto),
            opt("pin", Auto),
            opt("device_class", Auto),
            opt("icon", Quoted),
            opt("internal", Boolean),
            opt("lambda", Lambda),
            opt("filters", Auto),
            opt("on_press", Auto),
            opt("on_release", Auto),
        ],
        repeated: true,
        allow_extra: true,
    },
    BlockSchema {
        name: "switch",
        description: "Switches and relays",
        fields: &[
            req("platform", Auto),
            opt("name", Auto),
            opt("id", Auto),
            opt("pin", Auto),
            opt("inverted", Boolean),
            opt("restore_mode", Auto),
            opt("icon", Quoted),
            opt("lambda", Lambda),
            opt("turn_on_action", Auto),
            opt("turn_off_action", Auto),
        ],
        repeated: true,
        allow_extra: true,
    },
    BlockSchema {
        name: "light",
        description: "Lights and LED strips",
        fields: &[
            req("platform", Auto),
            opt("name", Auto),
            opt("id", Auto),
            opt("output", Auto),
            opt("pin", Auto),
            opt("num_leds", Integer),
            opt("default_transition_length", Auto),
            opt("restore_mode", Auto),
            opt("effects", Auto),
        ],
        repeated: true,
        allow_extra: true,
    },
    BlockSchema {
        name: "time",
        description: "Time sources",
        fields: &[
            req("platform", Auto),
            opt("id", Auto),
            opt("timezone", Auto),
            opt("servers", Auto),
            opt("on_time", Auto),
        ],
        repeated: true,
        allow_extra: true,
    },
];

/// Blocks that select the target chip. A device needs exactly one.
pub const PLATFORM_BLOCKS: &[&str] = &["esp8266", "esp32"];

// ── Lookup helpers ───────────────────────────────────────────────────────────

/// Look up a block schema by its top-level key.
pub fn find_block(name: &str) -> Option<&'static BlockSchema> {
    BLOCK_REGISTRY.iter().find(|b| b.name == name)
}

pub fn is_platform_block(name: &str) -> bool {
    PLATFORM_BLOCKS.contains(&name)
}

/// Top-level key order of a device file: registry order.
pub fn document_order() -> KeyOrder {
    KeyOrder::pinned(BLOCK_REGISTRY.iter().map(|b| b.name))
}

// ── Tests ────────────────────────────────────────────────────────────────────
