//! Ordered map type for document tree mappings.
//!
//! [`Map`] wraps an [`IndexMap`] so that mapping keys keep insertion order.
//! The tree builder inserts struct fields in declaration order, and both
//! emitters walk the map in that order, so the generated YAML follows the
//! model's field order exactly.
//!
//! ## Examples
//!
//! ```rust
//! use confdoc::{Map, Value};
//!
//! let mut map = Map::new();
//! map.insert("name".to_string(), Value::from("Alice"));
//! map.insert("age".to_string(), Value::from(30));
//!
//! assert_eq!(map.len(), 2);
//! assert_eq!(map.get("name").and_then(|v| v.as_str()), Some("Alice"));
//! ```

use indexmap::IndexMap;
use std::collections::HashSet;

/// An insertion-ordered map of string keys to tree values.
///
/// # Examples
///
/// ```rust
/// use confdoc::{Map, Value};
///
/// let mut map = Map::new();
/// map.insert("second".to_string(), Value::from(2));
/// map.insert("first".to_string(), Value::from(1));
///
/// let keys: Vec<_> = map.keys().cloned().collect();
/// assert_eq!(keys, vec!["second", "first"]);
/// ```
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Map {
    entries: IndexMap<String, crate::Value>,
    // keys serialized from numbers or bools
    bare_keys: HashSet<String>,
}

impl Map {
    /// Creates an empty `Map`.
    #[must_use]
    pub fn new() -> Self {
        Map::default()
    }

    /// Creates an empty `Map` with the specified capacity.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Map {
            entries: IndexMap::with_capacity(capacity),
            bare_keys: HashSet::new(),
        }
    }

    /// Inserts a key-value pair into the map.
    ///
    /// If the map already contained this key, the old value is returned and
    /// the key keeps its original position.
    pub fn insert(&mut self, key: String, value: crate::Value) -> Option<crate::Value> {
        self.bare_keys.remove(&key);
        self.entries.insert(key, value)
    }

    /// Inserts an entry whose key is the text of a number or bool.
    ///
    /// Emitters write such keys unquoted, so a YAML reader parses them back
    /// to the number or bool they came from.
    ///
    /// ```rust
    /// use confdoc::{Map, Value};
    ///
    /// let mut map = Map::new();
    /// map.insert_bare("80".to_string(), Value::from("http"));
    /// map.insert("81".to_string(), Value::from("alt"));
    ///
    /// assert!(map.is_bare_key("80"));
    /// assert!(!map.is_bare_key("81"));
    /// ```
    pub fn insert_bare(&mut self, key: String, value: crate::Value) -> Option<crate::Value> {
        let old = self.entries.insert(key.clone(), value);
        self.bare_keys.insert(key);
        old
    }

    #[must_use]
    pub fn is_bare_key(&self, key: &str) -> bool {
        self.bare_keys.contains(key)
    }

    /// Returns a reference to the value corresponding to the key.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&crate::Value> {
        self.entries.get(key)
    }

    /// Returns `true` if the map contains the key.
    #[must_use]
    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Returns an iterator over the keys of the map, in insertion order.
    pub fn keys(&self) -> indexmap::map::Keys<'_, String, crate::Value> {
        self.entries.keys()
    }

    /// Returns an iterator over the values of the map, in insertion order.
    pub fn values(&self) -> indexmap::map::Values<'_, String, crate::Value> {
        self.entries.values()
    }

    /// Returns an iterator over the key-value pairs of the map, in insertion order.
    pub fn iter(&self) -> indexmap::map::Iter<'_, String, crate::Value> {
        self.entries.iter()
    }
}

impl<'a> IntoIterator for &'a Map {
    type Item = (&'a String, &'a crate::Value);
    type IntoIter = indexmap::map::Iter<'a, String, crate::Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

impl IntoIterator for Map {
    type Item = (String, crate::Value);
    type IntoIter = indexmap::map::IntoIter<String, crate::Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

impl FromIterator<(String, crate::Value)> for Map {
    fn from_iter<T: IntoIterator<Item = (String, crate::Value)>>(iter: T) -> Self {
        Map {
            entries: IndexMap::from_iter(iter),
            bare_keys: HashSet::new(),
        }
    }
}
