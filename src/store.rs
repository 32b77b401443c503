//! The capability interface shared by every component of the store.

use std::collections::HashSet;
use std::fmt;

use crate::error::ConfigError;

/// Accumulator for key enumeration.
///
/// [`ConfigStore::list_keys`] collects keys into a `KeyList`; duplicates
/// (for example the same key present in several layers of a stack) collapse
/// naturally. Order is unspecified.
#[derive(Debug, Default)]
pub struct KeyList {
    keys: HashSet<String>,
}

impl KeyList {
    /// Creates an empty key list.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a key, collapsing duplicates.
    pub fn add(&mut self, key: impl Into<String>) {
        self.keys.insert(key.into());
    }

    /// Number of distinct keys collected so far.
    pub fn len(&self) -> usize {
        self.keys.len()
    }

    /// Whether no keys have been collected.
    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    /// Whether the given key has been collected.
    pub fn contains(&self, key: &str) -> bool {
        self.keys.contains(key)
    }

    /// Iterates over the collected keys in unspecified order.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.keys.iter().map(String::as_str)
    }

    /// Consumes the list into a vector, in unspecified order.
    pub fn into_vec(self) -> Vec<String> {
        self.keys.into_iter().collect()
    }
}

/// Something holding string values under dotted keys.
///
/// Implemented by [`Layer`](crate::Layer), [`LayerStack`](crate::LayerStack)
/// and [`View`](crate::View), so the same calling code works against a bare
/// layer, a whole priority stack, or a prefix-scoped slice of either.
pub trait ConfigStore: Send + Sync + fmt::Debug {
    /// Tests whether writes can currently succeed on this target.
    fn is_writable(&self) -> bool;

    /// Gets the raw string value for the given key, exact match only.
    fn get_string(&self, key: &str) -> Option<String>;

    /// Sets the raw string value for the given key.
    ///
    /// Fails if the target is not writable.
    fn set_string(&self, key: &str, value: &str) -> Result<(), ConfigError>;

    /// Deletes the value for the given key.
    ///
    /// Deleting an absent key is not an error; writing to a read-only
    /// target is.
    fn delete_value(&self, key: &str) -> Result<(), ConfigError>;

    /// Lists keys under `prefix`, collecting them into `out`.
    ///
    /// The prefix is matched per dotted segment. With `direct` set, only the
    /// immediate child segment of each matching key is collected, otherwise
    /// the full remainder after the prefix.
    ///
    /// For stored keys `test.key.1`, `test.key.2` and `test.value.3`,
    /// listing under `"test"` yields `["key", "value"]` when `direct` and
    /// `["key.1", "key.2", "value.3"]` otherwise.
    fn list_keys(&self, prefix: &str, out: &mut KeyList, direct: bool);
}

/// Appends the segment separator to a non-empty prefix that lacks one.
pub(crate) fn normalize_prefix(prefix: &str) -> String {
    if prefix.is_empty() || prefix.ends_with('.') {
        prefix.to_string()
    } else {
        format!("{prefix}.")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn key_list_collapses_duplicates() {
        let mut list = KeyList::new();
        list.add("a");
        list.add("b");
        list.add("a");

        assert_eq!(list.len(), 2);
        assert!(list.contains("a"));
        assert!(list.contains("b"));
        assert!(!list.contains("c"));

        let mut v = list.into_vec();
        v.sort();
        assert_eq!(v, vec!["a", "b"]);
    }

    #[test]
    fn prefix_normalization() {
        assert_eq!(normalize_prefix(""), "");
        assert_eq!(normalize_prefix("a"), "a.");
        assert_eq!(normalize_prefix("a.b"), "a.b.");
        assert_eq!(normalize_prefix("a.b."), "a.b.");
    }
}
