//! Ordered map type for decoded PHP arrays.
//!
//! PHP arrays are ordered dictionaries with mixed integer/string keys, so
//! [`PhpMap`] wraps an [`IndexMap`] keyed by [`ArrayKey`]. Iteration yields
//! pairs in the order they appeared on the wire, which matches PHP's own
//! array semantics.
//!
//! ## Examples
//!
//! ```rust
//! use phpsess::{decode_value, PhpValue};
//!
//! let value = decode_value(b"a:2:{s:1:\"a\";i:1;i:0;i:2;}").unwrap();
//! let map = value.as_map().unwrap();
//! assert_eq!(map.get("a").and_then(PhpValue::as_i64), Some(1));
//! assert_eq!(map.get(0).and_then(PhpValue::as_i64), Some(2));
//! ```

use crate::value::{ArrayKey, PhpValue};
use indexmap::IndexMap;

/// An insertion-ordered map of PHP array keys to values.
///
/// # Examples
///
/// ```rust
/// use phpsess::{ArrayKey, PhpMap, PhpValue};
///
/// let mut map = PhpMap::new();
/// map.insert(ArrayKey::from("name"), PhpValue::from("Alice"));
/// map.insert(ArrayKey::from(7), PhpValue::from(true));
///
/// let keys: Vec<_> = map.keys().cloned().collect();
/// assert_eq!(keys, vec![ArrayKey::from("name"), ArrayKey::from(7)]);
/// ```
#[derive(Debug, Clone, PartialEq, Default)]
pub struct PhpMap(IndexMap<ArrayKey, PhpValue>);

impl PhpMap {
    /// Creates an empty `PhpMap`.
    #[must_use]
    pub fn new() -> Self {
        PhpMap(IndexMap::new())
    }

    /// Creates an empty `PhpMap` with the specified capacity.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        PhpMap(IndexMap::with_capacity(capacity))
    }

    /// Builds a map from decoded pairs, keeping insertion order.
    ///
    /// Duplicate keys follow PHP assignment semantics: the last value wins
    /// while the key keeps its first position.
    #[must_use]
    pub fn from_pairs(pairs: Vec<(ArrayKey, PhpValue)>) -> Self {
        let mut map = PhpMap::with_capacity(pairs.len());
        for (key, value) in pairs {
            map.insert(key, value);
        }
        map
    }

    /// Inserts a key-value pair, returning the previous value for the key
    /// if any.
    pub fn insert(&mut self, key: ArrayKey, value: PhpValue) -> Option<PhpValue> {
        self.0.insert(key, value)
    }

    /// Returns a reference to the value for `key`.
    ///
    /// The key can be given as anything convertible to [`ArrayKey`]: an
    /// `i64`, a `&str`, or an `ArrayKey` itself.
    #[must_use]
    pub fn get(&self, key: impl Into<ArrayKey>) -> Option<&PhpValue> {
        self.0.get(&key.into())
    }

    /// Returns `true` if the map contains `key`.
    #[must_use]
    pub fn contains_key(&self, key: impl Into<ArrayKey>) -> bool {
        self.0.contains_key(&key.into())
    }

    /// Returns the number of entries in the map.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns `true` if the map contains no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Returns an iterator over the keys, in insertion order.
    pub fn keys(&self) -> indexmap::map::Keys<'_, ArrayKey, PhpValue> {
        self.0.keys()
    }

    /// Returns an iterator over the values, in insertion order.
    pub fn values(&self) -> indexmap::map::Values<'_, ArrayKey, PhpValue> {
        self.0.values()
    }

    /// Returns an iterator over the key-value pairs, in insertion order.
    pub fn iter(&self) -> indexmap::map::Iter<'_, ArrayKey, PhpValue> {
        self.0.iter()
    }
}

impl IntoIterator for PhpMap {
    type Item = (ArrayKey, PhpValue);
    type IntoIter = indexmap::map::IntoIter<ArrayKey, PhpValue>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl<'a> IntoIterator for &'a PhpMap {
    type Item = (&'a ArrayKey, &'a PhpValue);
    type IntoIter = indexmap::map::Iter<'a, ArrayKey, PhpValue>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl FromIterator<(ArrayKey, PhpValue)> for PhpMap {
    fn from_iter<T: IntoIterator<Item = (ArrayKey, PhpValue)>>(iter: T) -> Self {
        PhpMap(IndexMap::from_iter(iter))
    }
}
