//! Keyed, ordered collections of named nodes.

use std::collections::BTreeMap;

use super::{KeyOrder, Node};

/// A mapping from unique string keys to child nodes.
///
/// Keys are unique: inserting an existing key replaces its value. The
/// order keys were inserted in is not remembered; render order comes from
/// the mapping's [`KeyOrder`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Mapping {
    entries: BTreeMap<String, Node>,
    order: KeyOrder,
}

impl Mapping {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the child at `key`, returning the value it replaced.
    ///
    /// The child's name becomes `key`.
    pub fn insert(&mut self, key: impl Into<String>, node: impl Into<Node>) -> Option<Node> {
        let key = key.into();
        let mut node = node.into();
        node.set_name(key.clone());
        self.entries.insert(key, node)
    }

    /// Builder-style [`insert`](Self::insert).
    pub fn with(mut self, key: impl Into<String>, node: impl Into<Node>) -> Self {
        self.insert(key, node);
        self
    }

    pub fn get(&self, key: &str) -> Option<&Node> {
        self.entries.get(key)
    }

    pub fn get_mut(&mut self, key: &str) -> Option<&mut Node> {
        self.entries.get_mut(key)
    }

    /// Get the child at `key`, inserting one built by `default` if absent.
    pub fn entry_or_insert_with(&mut self, key: &str, default: impl FnOnce() -> Node) -> &mut Node {
        self.entries.entry(key.to_owned()).or_insert_with(|| {
            let mut node = default();
            node.set_name(key);
            node
        })
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    pub fn remove(&mut self, key: &str) -> Option<Node> {
        self.entries.remove(key).map(Node::without_name)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn order(&self) -> &KeyOrder {
        &self.order
    }

    pub fn set_order(&mut self, order: KeyOrder) {
        self.order = order;
    }

    pub fn with_order(mut self, order: KeyOrder) -> Self {
        self.order = order;
        self
    }

    /// Keys in lexicographic order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    /// Keys in render order.
    pub fn ordered_keys(&self) -> Vec<&str> {
        self.order.apply(self.keys())
    }

    /// Entries in render order.
    pub fn iter_ordered(&self) -> impl Iterator<Item = (&str, &Node)> {
        self.ordered_keys()
            .into_iter()
            .filter_map(|key| self.entries.get_key_value(key))
            .map(|(key, node)| (key.as_str(), node))
    }
}

impl<K, V> FromIterator<(K, V)> for Mapping
where
    K: Into<String>,
    V: Into<Node>,
{
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        let mut mapping = Mapping::new();
        for (key, node) in iter {
            mapping.insert(key, node);
        }
        mapping
    }
}
