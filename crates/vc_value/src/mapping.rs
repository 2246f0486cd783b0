use alloc::string::String;
use core::fmt;
use core::iter::FusedIterator;

use indexmap::IndexMap;

use crate::Value;
use crate::hash::FixedHashState;

// -----------------------------------------------------------------------------
// Mapping

/// An insertion-ordered map from string keys to values.
///
/// Keys are unique: inserting an existing key replaces its value in place
/// and keeps the original position. Equality compares entries in order.
///
/// # Examples
///
/// ```
/// use vc_value::{Mapping, Value};
///
/// let mut map = Mapping::new();
/// map.insert("b", Value::Int(1));
/// map.insert("a", Value::Int(2));
/// map.insert("b", Value::Int(3));
///
/// assert_eq!(map.len(), 2);
/// assert_eq!(map.keys().collect::<Vec<_>>(), ["b", "a"]);
/// assert_eq!(map.get("b"), Some(&Value::Int(3)));
/// ```
#[derive(Clone)]
pub struct Mapping<V = Value> {
    entries: IndexMap<String, V, FixedHashState>,
}

impl<V> Default for Mapping<V> {
    #[inline]
    fn default() -> Self {
        Self::new()
    }
}

impl<V: PartialEq> PartialEq for Mapping<V> {
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len() && self.iter().eq(other.iter())
    }
}

impl<V> Mapping<V> {
    /// Creates an empty [`Mapping`].
    #[inline]
    pub const fn new() -> Self {
        Self {
            entries: IndexMap::with_hasher(FixedHashState),
        }
    }

    /// Creates an empty [`Mapping`] with space for `capacity` entries.
    #[inline]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: IndexMap::with_capacity_and_hasher(capacity, FixedHashState),
        }
    }

    /// Returns the number of entries.
    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if the mapping has no entries.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Inserts a value under `key`.
    ///
    /// If the key was present, the old value is returned and the entry keeps
    /// its position. Otherwise the entry is appended.
    #[inline]
    pub fn insert(&mut self, key: impl Into<String>, value: V) -> Option<V> {
        self.entries.insert(key.into(), value)
    }

    /// Returns a reference to the value stored under `key`.
    #[inline]
    pub fn get(&self, key: &str) -> Option<&V> {
        self.entries.get(key)
    }

    /// Returns a mutable reference to the value stored under `key`.
    #[inline]
    pub fn get_mut(&mut self, key: &str) -> Option<&mut V> {
        self.entries.get_mut(key)
    }

    /// Returns `true` if `key` is present.
    #[inline]
    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    /// Removes `key`, shifting later entries to keep the order.
    #[inline]
    pub fn remove(&mut self, key: &str) -> Option<V> {
        self.entries.shift_remove(key)
    }

    /// Returns an iterator over `(key, value)` pairs in insertion order.
    #[inline]
    pub fn iter(&self) -> Iter<'_, V> {
        Iter {
            inner: self.entries.iter(),
        }
    }

    /// Returns an iterator over the keys in insertion order.
    #[inline]
    pub fn keys(&self) -> impl ExactSizeIterator<Item = &str> + '_ {
        self.entries.keys().map(String::as_str)
    }

    /// Returns an iterator over the values in insertion order.
    #[inline]
    pub fn values(&self) -> impl ExactSizeIterator<Item = &V> + '_ {
        self.entries.values()
    }

    /// Applies `func` to every value, keeping keys and order.
    ///
    /// Stops at the first error.
    pub fn try_map<U, E>(&self, mut func: impl FnMut(&V) -> Result<U, E>) -> Result<Mapping<U>, E> {
        let mut output = Mapping::with_capacity(self.len());
        for (key, value) in &self.entries {
            output.entries.insert(key.clone(), func(value)?);
        }
        Ok(output)
    }
}

impl<V: fmt::Debug> fmt::Debug for Mapping<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}

impl<K: Into<String>, V> FromIterator<(K, V)> for Mapping<V> {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut map = Mapping::new();
        map.extend(iter);
        map
    }
}

impl<K: Into<String>, V> Extend<(K, V)> for Mapping<V> {
    fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iter: I) {
        for (key, value) in iter {
            self.insert(key, value);
        }
    }
}

// -----------------------------------------------------------------------------
// Iterators

/// Borrowing iterator of a [`Mapping`], see [`Mapping::iter`].
pub struct Iter<'a, V> {
    inner: indexmap::map::Iter<'a, String, V>,
}

impl<'a, V> Iterator for Iter<'a, V> {
    type Item = (&'a str, &'a V);

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(|(k, v)| (k.as_str(), v))
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<V> ExactSizeIterator for Iter<'_, V> {}
impl<V> FusedIterator for Iter<'_, V> {}

/// Owning iterator of a [`Mapping`].
pub struct IntoIter<V> {
    inner: indexmap::map::IntoIter<String, V>,
}

impl<V> Iterator for IntoIter<V> {
    type Item = (String, V);

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next()
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<V> ExactSizeIterator for IntoIter<V> {}
impl<V> FusedIterator for IntoIter<V> {}

impl<V> IntoIterator for Mapping<V> {
    type Item = (String, V);
    type IntoIter = IntoIter<V>;

    #[inline]
    fn into_iter(self) -> Self::IntoIter {
        IntoIter {
            inner: self.entries.into_iter(),
        }
    }
}

impl<'a, V> IntoIterator for &'a Mapping<V> {
    type Item = (&'a str, &'a V);
    type IntoIter = Iter<'a, V>;

    #[inline]
    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
