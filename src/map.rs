//! Ordered entry map backing [`Scope`](crate::Scope).
//!
//! Scope keys are unique and a repeated key replaces the earlier value, but
//! the order in which keys first appeared is kept, so dumps and serde output
//! follow the document.
//!
//! ```rust
//! use skopik::{ScopeMap, Value};
//!
//! let mut map = ScopeMap::new();
//! map.insert("b".to_string(), Value::from(1));
//! map.insert("a".to_string(), Value::from(2));
//! map.insert("b".to_string(), Value::from(3));
//!
//! let keys: Vec<_> = map.keys().cloned().collect();
//! assert_eq!(keys, vec!["b", "a"]);
//! assert_eq!(map.get("b").and_then(|v| v.as_i32()), Some(3));
//! ```

use crate::Value;
use indexmap::IndexMap;

/// An insertion-ordered map of entry names to values.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ScopeMap(IndexMap<String, Value>);

impl ScopeMap {
    #[must_use]
    pub fn new() -> Self {
        ScopeMap(IndexMap::new())
    }

    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        ScopeMap(IndexMap::with_capacity(capacity))
    }

    /// Inserts an entry. A replaced value keeps its original position and is
    /// returned.
    pub fn insert(&mut self, key: String, value: Value) -> Option<Value> {
        self.0.insert(key, value)
    }

    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    /// The stored key together with its value.
    #[must_use]
    pub fn get_key_value(&self, key: &str) -> Option<(&String, &Value)> {
        self.0.get_key_value(key)
    }

    pub fn get_mut(&mut self, key: &str) -> Option<&mut Value> {
        self.0.get_mut(key)
    }

    /// Entry at a position in insertion order.
    #[must_use]
    pub fn get_index(&self, index: usize) -> Option<(&String, &Value)> {
        self.0.get_index(index)
    }

    #[must_use]
    pub fn contains_key(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn keys(&self) -> indexmap::map::Keys<'_, String, Value> {
        self.0.keys()
    }

    pub fn values(&self) -> indexmap::map::Values<'_, String, Value> {
        self.0.values()
    }

    pub fn iter(&self) -> indexmap::map::Iter<'_, String, Value> {
        self.0.iter()
    }
}

impl IntoIterator for ScopeMap {
    type Item = (String, Value);
    type IntoIter = indexmap::map::IntoIter<String, Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl<'a> IntoIterator for &'a ScopeMap {
    type Item = (&'a String, &'a Value);
    type IntoIter = indexmap::map::Iter<'a, String, Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl FromIterator<(String, Value)> for ScopeMap {
    fn from_iter<T: IntoIterator<Item = (String, Value)>>(iter: T) -> Self {
        ScopeMap(IndexMap::from_iter(iter))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_replacement_keeps_position() {
        let mut map: ScopeMap = [("x", 1), ("y", 2), ("z", 3)]
            .into_iter()
            .map(|(k, v)| (k.to_string(), Value::from(v)))
            .collect();
        map.insert("y".to_string(), Value::from("two"));

        assert_eq!(map.len(), 3);
        let (key, value) = map.get_index(1).unwrap();
        assert_eq!(key, "y");
        assert_eq!(value.as_str(), Some("two"));
    }

    #[test]
    fn test_get_mut_and_contains() {
        let mut map = ScopeMap::with_capacity(1);
        assert!(map.is_empty());
        map.insert("k".to_string(), Value::Null);
        *map.get_mut("k").unwrap() = Value::from(true);
        assert!(map.contains_key("k"));
        assert_eq!(map.values().next(), Some(&Value::from(true)));
        assert_eq!(map.into_iter().count(), 1);
    }

    #[test]
    fn test_get_key_value_borrows_stored_key() {
        let mut map = ScopeMap::new();
        map.insert("host".to_string(), Value::from("db1"));
        map.insert("port".to_string(), Value::from(5432));

        let (key, value) = map.get_key_value("port").unwrap();
        assert!(std::ptr::eq(key, map.get_index(1).unwrap().0));
        assert_eq!(value.as_i32(), Some(5432));
        assert!(map.get_key_value("user").is_none());
    }
}
