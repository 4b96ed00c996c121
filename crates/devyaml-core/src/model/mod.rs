// ============================================================================
//  NODE MODEL
// ============================================================================

//! The document node model.
//!
//! A tree is built bottom-up from [`Node`]s. Every node is one of three
//! kinds (see [`NodeKind`]) and may carry a name, a [`Comment`] and a
//! [`Tag`]. Composite nodes exclusively own their children.
//!
//! - **No I/O**: the model is plain data
//! - **Normalized on write**: text is canonicalized when assigned, so
//!   rendering never has to
//! - **Send + Sync**: no interior mutability anywhere

pub mod comment;
pub mod mapping;
pub mod node;
pub mod order;
pub mod scalar;
pub mod sequence;

pub use comment::Comment;
pub use mapping::Mapping;
pub use node::{Node, NodeKind, Tag};
pub use order::{KeyOrder, OrderFn};
pub use scalar::{Scalar, ScalarStyle, ScalarValue};
pub use sequence::Sequence;

/// Canonicalize line endings: `\r\n` and lone `\r` become `\n`.
pub(crate) fn normalize_newlines(text: &str) -> String {
    if !text.contains('\r') {
        return text.to_owned();
    }
    text.replace("\r\n", "\n").replace('\r', "\n")
}
