//! Device-level building blocks for devyaml.
//!
//! Turns component names and field values into validated nodes, assembles
//! them into a device file and reads TOML manifests describing devices.
//!
//! ```text
//! manifest.toml ──parse──▶ BlockBuilder ──build──▶ DeviceConfig ──render──▶ device.yaml
//!                              ▲
//!                              └── schema::BLOCK_REGISTRY
//! ```
//!
//! ## Usage
//!
//! ```rust
//! use devyaml_blocks::prelude::*;
//!
//! let mut device = DeviceConfig::new();
//! device.build(BlockBuilder::new("esphome")?.set("name", "porch"))?;
//! device.build(BlockBuilder::new("esp32")?.set("board", "esp32dev"))?;
//! device.validate()?;
//!
//! assert_eq!(device.render(), "esphome:\n  name: porch\n\nesp32:\n  board: esp32dev\n");
//! # Ok::<(), devyaml_blocks::BlockError>(())
//! ```

pub mod builder;
pub mod device;
pub mod error;
pub mod manifest;
pub mod schema;

pub use builder::BlockBuilder;
pub use device::DeviceConfig;
pub use error::{BlockError, BlockErrorCategory, BlockResult};
pub use manifest::{discover_manifests, load_manifest, parse_manifest, ManifestDefaults};
pub use schema::{find_block, BlockSchema, FieldSpec, ValueHint, BLOCK_REGISTRY};

pub mod prelude {
    pub use crate::builder::BlockBuilder;
    pub use crate::device::DeviceConfig;
    pub use crate::error::{BlockError, BlockResult};
    pub use crate::manifest::{load_manifest, parse_manifest, ManifestDefaults};
    pub use crate::schema::{find_block, BLOCK_REGISTRY};
}
