//! Ordered map type for record objects.
//!
//! [`RecordMap`] wraps an [`IndexMap`] so that object members keep the order in
//! which they were inserted. Order is not part of object equality in the
//! format's data model, but it decides the member order of serialized output,
//! so it has to be stable.
//!
//! Inserting a key that is already present replaces the value in place: the
//! member keeps its original position and the last write wins.
//!
//! ## Examples
//!
//! ```rust
//! use serde_jsrs::{RecordMap, Value};
//!
//! let mut map = RecordMap::new();
//! map.insert("name".to_string(), Value::from("Marcus"));
//! map.insert("age".to_string(), Value::from(42));
//!
//! assert_eq!(map.len(), 2);
//! assert_eq!(map.get("name").and_then(|v| v.as_str()), Some("Marcus"));
//! ```

use crate::Value;
use indexmap::IndexMap;
use std::collections::HashMap;

/// An insertion-ordered map of string keys to record values.
///
/// # Examples
///
/// ```rust
/// use serde_jsrs::{RecordMap, Value};
///
/// let mut map = RecordMap::new();
/// map.insert("first".to_string(), Value::from(1));
/// map.insert("second".to_string(), Value::from(2));
/// map.insert("first".to_string(), Value::from(3));
///
/// let keys: Vec<_> = map.keys().cloned().collect();
/// assert_eq!(keys, vec!["first", "second"]);
/// assert_eq!(map.get("first").and_then(|v| v.as_f64()), Some(3.0));
/// ```
///
/// Equality is structural: the same keys mapped to equal values, in any order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RecordMap(IndexMap<String, Value>);

impl RecordMap {
    /// Creates an empty `RecordMap`.
    #[must_use]
    pub fn new() -> Self {
        RecordMap(IndexMap::new())
    }

    /// Creates an empty `RecordMap` with the specified capacity.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        RecordMap(IndexMap::with_capacity(capacity))
    }

    /// Inserts a key-value pair into the map.
    ///
    /// If the map already contained this key, the old value is returned and
    /// the key keeps its position.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use serde_jsrs::{RecordMap, Value};
    ///
    /// let mut map = RecordMap::new();
    /// assert!(map.insert("key".to_string(), Value::from(42)).is_none());
    /// assert!(map.insert("key".to_string(), Value::from(43)).is_some());
    /// ```
    pub fn insert(&mut self, key: String, value: Value) -> Option<Value> {
        self.0.insert(key, value)
    }

    /// Returns a reference to the value corresponding to the key.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    /// Returns a mutable reference to the value corresponding to the key.
    pub fn get_mut(&mut self, key: &str) -> Option<&mut Value> {
        self.0.get_mut(key)
    }

    #[must_use]
    pub fn contains_key(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    /// Removes a key, preserving the order of the remaining members.
    pub fn remove(&mut self, key: &str) -> Option<Value> {
        self.0.shift_remove(key)
    }

    /// Returns the number of members in the map.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns `true` if the map contains no members.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Returns an iterator over the keys of the map, in insertion order.
    pub fn keys(&self) -> indexmap::map::Keys<'_, String, Value> {
        self.0.keys()
    }

    /// Returns an iterator over the values of the map, in insertion order.
    pub fn values(&self) -> indexmap::map::Values<'_, String, Value> {
        self.0.values()
    }

    /// Returns an iterator over the key-value pairs of the map, in insertion order.
    pub fn iter(&self) -> indexmap::map::Iter<'_, String, Value> {
        self.0.iter()
    }
}

impl From<HashMap<String, Value>> for RecordMap {
    fn from(map: HashMap<String, Value>) -> Self {
        RecordMap(map.into_iter().collect())
    }
}

impl From<RecordMap> for HashMap<String, Value> {
    fn from(map: RecordMap) -> Self {
        map.0.into_iter().collect()
    }
}

impl IntoIterator for RecordMap {
    type Item = (String, Value);
    type IntoIter = indexmap::map::IntoIter<String, Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl<'a> IntoIterator for &'a RecordMap {
    type Item = (&'a String, &'a Value);
    type IntoIter = indexmap::map::Iter<'a, String, Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl FromIterator<(String, Value)> for RecordMap {
    fn from_iter<T: IntoIterator<Item = (String, Value)>>(iter: T) -> Self {
        RecordMap(IndexMap::from_iter(iter))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_last_write_wins_keeps_position() {
        let mut map = RecordMap::new();
        map.insert("a".to_string(), Value::from(1));
        map.insert("b".to_string(), Value::from(2));
        map.insert("a".to_string(), Value::from(3));

        let entries: Vec<_> = map.iter().map(|(k, v)| (k.clone(), v.clone())).collect();
        assert_eq!(
            entries,
            vec![
                ("a".to_string(), Value::from(3)),
                ("b".to_string(), Value::from(2)),
            ]
        );
    }

    #[test]
    fn test_equality_ignores_order() {
        let left: RecordMap = vec![
            ("a".to_string(), Value::from(1)),
            ("b".to_string(), Value::Null),
        ]
        .into_iter()
        .collect();
        let right: RecordMap = vec![
            ("b".to_string(), Value::Null),
            ("a".to_string(), Value::from(1)),
        ]
        .into_iter()
        .collect();
        assert_eq!(left, right);

        let mut shorter = right.clone();
        shorter.remove("b");
        assert_ne!(left, shorter);
    }
}
