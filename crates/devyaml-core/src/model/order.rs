//! Mapping key ordering strategies.
//!
//! Output order of a mapping never depends on insertion order. It is
//! decided here, from the set of keys alone, so the same mapping always
//! renders the same way.

use std::collections::HashSet;
use std::fmt;

/// A user-supplied ordering: receives the keys in lexicographic order and
/// returns them in the desired order.
pub type OrderFn = fn(Vec<&str>) -> Vec<&str>;

/// How a mapping orders its keys when rendered.
#[derive(Clone, Default)]
pub enum KeyOrder {
    /// Plain code-point order.
    #[default]
    Lexicographic,
    /// These keys first, in this order; everything else lexicographic after.
    Pinned(Vec<String>),
    /// Delegate to a function.
    Custom(OrderFn),
}

impl KeyOrder {
    pub fn pinned<I, S>(keys: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::Pinned(keys.into_iter().map(Into::into).collect())
    }

    /// Order `keys`.
    ///
    /// The result always contains every input key exactly once. Keys a
    /// strategy does not mention, and keys a custom function drops, are
    /// appended in lexicographic order; keys it invents are ignored.
    pub fn apply<'a>(&self, keys: impl IntoIterator<Item = &'a str>) -> Vec<&'a str> {
        let mut sorted: Vec<&'a str> = keys.into_iter().collect();
        sorted.sort_unstable();
        sorted.dedup();

        let preferred: Vec<&'a str> = match self {
            Self::Lexicographic => return sorted,
            Self::Pinned(pinned) => pinned
                .iter()
                .filter_map(|p| sorted.iter().copied().find(|k| *k == p.as_str()))
                .collect(),
            Self::Custom(order) => {
                let known: HashSet<&str> = sorted.iter().copied().collect();
                order(sorted.clone())
                    .into_iter()
                    .filter_map(|k| known.get(k).copied())
                    .collect()
            }
        };

        let mut seen = HashSet::with_capacity(sorted.len());
        let mut ordered = Vec::with_capacity(sorted.len());
        for key in preferred.into_iter().chain(sorted) {
            if seen.insert(key) {
                ordered.push(key);
            }
        }
        ordered
    }
}

impl fmt::Debug for KeyOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Lexicographic => f.write_str("Lexicographic"),
            Self::Pinned(keys) => f.debug_tuple("Pinned").field(keys).finish(),
            Self::Custom(_) => f.write_str("Custom(..)"),
        }
    }
}

impl PartialEq for KeyOrder {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Lexicographic, Self::Lexicographic) => true,
            (Self::Pinned(a), Self::Pinned(b)) => a == b,
            (Self::Custom(a), Self::Custom(b)) => std::ptr::fn_addr_eq(*a, *b),
            _ => false,
        }
    }
}
