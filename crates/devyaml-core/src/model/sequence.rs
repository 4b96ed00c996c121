//! Ordered lists of unnamed nodes.

use super::Node;

/// An ordered, index-addressable list of child nodes.
///
/// Items keep their insertion order; nothing ever resorts them.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Sequence {
    items: Vec<Node>,
}

impl Sequence {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an item. Sequence items are unnamed, so any name is cleared.
    pub fn push(&mut self, node: impl Into<Node>) {
        self.items.push(node.into().without_name());
    }

    /// Builder-style [`push`](Self::push).
    pub fn with(mut self, node: impl Into<Node>) -> Self {
        self.push(node);
        self
    }

    pub fn get(&self, index: usize) -> Option<&Node> {
        self.items.get(index)
    }

    pub fn get_mut(&mut self, index: usize) -> Option<&mut Node> {
        self.items.get_mut(index)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Node> {
        self.items.iter()
    }
}

impl<'a> IntoIterator for &'a Sequence {
    type Item = &'a Node;
    type IntoIter = std::slice::Iter<'a, Node>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}

impl<N: Into<Node>> FromIterator<N> for Sequence {
    fn from_iter<T: IntoIterator<Item = N>>(iter: T) -> Self {
        let mut seq = Sequence::new();
        for node in iter {
            seq.push(node);
        }
        seq
    }
}
