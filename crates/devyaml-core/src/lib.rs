//! devyaml Core - document model and renderer
//!
//! This crate builds small hierarchical documents in memory and renders
//! them to the restricted YAML dialect used for device configuration.
//!
//! ## Architecture Overview
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │      devyaml-cli / devyaml-blocks       │
//! │   (build trees, ask for a rendering)    │
//! └──────────────────┬──────────────────────┘
//!                    │ insert / push / lookup
//!                    ▼
//! ┌─────────────────────────────────────────┐
//! │              Node Model                 │
//! │  Node = Scalar | Mapping | Sequence     │
//! │  + name, Comment, Tag, KeyOrder         │
//! └──────────────────┬──────────────────────┘
//!                    │ &Node (read only)
//!                    ▼
//! ┌─────────────────────────────────────────┐
//! │               Renderer                  │
//! │  quoting · comments · literal blocks    │
//! │  ordering · indentation · documents     │
//! └─────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//!
//! ```rust
//! use devyaml_core::prelude::*;
//!
//! let wifi = Mapping::new()
//!     .with_order(KeyOrder::pinned(["ssid", "password"]))
//!     .with("ssid", "MyWifi")
//!     .with("password", Node::secret("wifi_password"));
//!
//! let mut root = Mapping::new();
//! root.insert("wifi", wifi);
//!
//! assert_eq!(
//!     render_to_text(&root),
//!     "wifi:\n  ssid: MyWifi\n  password: !secret wifi_password\n"
//! );
//! ```

// Node model: scalars, mappings, sequences, comments, ordering
pub mod model;

// Renderer: quoting policy, recursive emitter, document assembly
pub mod render;

// Error types
pub mod error;

// Public API - what external crates should use
pub mod prelude {
    pub use crate::error::{DocumentError, DocumentResult};
    pub use crate::model::{
        Comment, KeyOrder, Mapping, Node, NodeKind, OrderFn, Scalar, ScalarStyle, ScalarValue,
        Sequence, Tag,
    };
    pub use crate::render::{needs_quotes, render_document, render_node, render_to_text};
}

// Version info
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
