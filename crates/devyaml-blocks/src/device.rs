//! A whole device file: built blocks in registry order.

use devyaml_core::prelude::{render_document, Comment, Mapping, Node};
use tracing::{debug, instrument, warn};

use crate::builder::BlockBuilder;
use crate::error::{BlockError, BlockResult};
use crate::schema::{document_order, find_block, PLATFORM_BLOCKS};

/// Collects blocks for one device and renders them as a document.
///
/// Repeated components (`sensor`, `switch`, ...) accumulate as sequence
/// items under their key; adding any other block again replaces it.
#[derive(Debug, Clone, PartialEq)]
pub struct DeviceConfig {
    blocks: Mapping,
    header: Comment,
}

impl Default for DeviceConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl DeviceConfig {
    pub fn new() -> Self {
        Self {
            blocks: Mapping::new().with_order(document_order()),
            header: Comment::new(),
        }
    }

    /// Add a built block, named after its component.
    ///
    /// # Errors
    ///
    /// Returns [`BlockError::UnknownBlock`] if the node is unnamed or its
    /// name is not a registered component.
    #[instrument(skip_all, fields(block = block.name().unwrap_or("<unnamed>")))]
    pub fn add(&mut self, block: Node) -> BlockResult<()> {
        let name = block.name().unwrap_or_default().to_owned();
        let schema = find_block(&name).ok_or(BlockError::UnknownBlock { block: name })?;

        if schema.repeated {
            let list = self.blocks.entry_or_insert_with(schema.name, Node::sequence);
            list.append_item(block)?;
            debug!(items = list.as_sequence().map_or(0, |s| s.len()), "item appended");
        } else if self.blocks.insert(schema.name, block).is_some() {
            warn!("block replaced");
        }
        Ok(())
    }

    /// Like [`add`](Self::add), but refuses to replace a single block.
    ///
    /// # Errors
    ///
    /// Returns [`BlockError::DuplicateBlock`] if a non-repeated block with
    /// the same name already exists.
    pub fn add_unique(&mut self, block: Node) -> BlockResult<()> {
        if let Some(name) = block.name() {
            let repeated = find_block(name).is_some_and(|s| s.repeated);
            if !repeated && self.contains(name) {
                return Err(BlockError::DuplicateBlock { block: name.into() });
            }
        }
        self.add(block)
    }

    /// Build and add in one step.
    pub fn build(&mut self, builder: BlockBuilder) -> BlockResult<()> {
        let block = builder.build()?;
        self.add(block)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.blocks.contains_key(name)
    }

    pub fn get(&self, name: &str) -> Option<&Node> {
        self.blocks.get(name)
    }

    /// Block names in render order.
    pub fn block_names(&self) -> Vec<&str> {
        self.blocks.ordered_keys()
    }

    pub fn blocks(&self) -> &Mapping {
        &self.blocks
    }

    /// Comment printed at the top of the rendered file.
    pub fn set_header(&mut self, text: impl Into<String>) {
        self.header = Comment::above(text);
    }

    /// Comment printed above a block's key. Returns whether the block exists.
    pub fn set_block_comment(&mut self, name: &str, text: impl Into<String>) -> bool {
        match self.blocks.get_mut(name) {
            Some(block) => {
                block.set_comment(Comment::above(text));
                true
            }
            None => false,
        }
    }

    /// The block whose key selects the chip, if exactly one is present.
    pub fn platform(&self) -> Option<&'static str> {
        let mut present = PLATFORM_BLOCKS.iter().copied().filter(|p| self.contains(p));
        match (present.next(), present.next()) {
            (Some(platform), None) => Some(platform),
            _ => None,
        }
    }

    /// Check that the device can be flashed as assembled.
    ///
    /// # Errors
    ///
    /// - [`BlockError::MissingBlock`] without an `esphome` block or without
    ///   any platform block
    /// - [`BlockError::ConflictingBlocks`] with more than one platform block
    #[instrument(skip_all)]
    pub fn validate(&self) -> BlockResult<()> {
        if !self.contains("esphome") {
            return Err(BlockError::MissingBlock { block: "esphome" });
        }

        let present: Vec<&'static str> = PLATFORM_BLOCKS
            .iter()
            .copied()
            .filter(|p| self.contains(p))
            .collect();
        match present.as_slice() {
            [] => Err(BlockError::MissingBlock {
                block: "esp8266 or esp32",
            }),
            [_] => {
                debug!(blocks = self.blocks.len(), "device is valid");
                Ok(())
            }
            [first, second, ..] => Err(BlockError::ConflictingBlocks {
                first: *first,
                second: *second,
            }),
        }
    }

    /// Render the device file.
    pub fn render(&self) -> String {
        render_document(&self.to_node())
    }

    /// The whole device as one root node, header comment included.
    pub fn to_node(&self) -> Node {
        let mut root = Node::from(self.blocks.clone());
        root.set_comment(self.header.clone());
        root
    }
}
