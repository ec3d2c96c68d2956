//! Ordered multi-valued maps for request parameters and field filters.
//!
//! Both maps keep keys in first-insertion order. The textual renderer joins
//! filter clauses in that order, so it has to survive normalization intact.

use serde::{Serialize, Serializer, ser::SerializeMap};

/// Raw request parameters: each key maps to every value supplied for it.
///
/// This is the shape an HTTP query-string parser hands over, where
/// `type=a&type=b` yields one key with two values.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Params {
    /// Entries in first-seen key order.
    entries: Vec<(String, Vec<String>)>,
}

impl Params {
    /// Creates an empty parameter map.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a value to `key`, creating the key if it is new.
    pub fn push(&mut self, key: impl Into<String>, value: impl Into<String>) {
        let key = key.into();
        let value = value.into();
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some((_, values)) => values.push(value),
            None => self.entries.push((key, vec![value])),
        }
    }

    /// Builds a parameter map from `(key, value)` pairs.
    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let mut params = Self::new();
        for (key, value) in pairs {
            params.push(key, value);
        }
        params
    }

    /// Parses `key=value` arguments, as given on the command line.
    ///
    /// An argument without `=` is treated as a key with an empty value.
    pub fn from_args<I, S>(args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut params = Self::new();
        for arg in args {
            let arg = arg.as_ref();
            match arg.split_once('=') {
                Some((key, value)) => params.push(key, value),
                None => params.push(arg, ""),
            }
        }
        params
    }

    /// Returns all values for `key`.
    pub fn get(&self, key: &str) -> Option<&[String]> {
        self.entries
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, values)| values.as_slice())
    }

    /// Removes `key` and returns its values.
    pub fn take(&mut self, key: &str) -> Option<Vec<String>> {
        let position = self.entries.iter().position(|(k, _)| k == key)?;
        Some(self.entries.remove(position).1)
    }

    /// Removes `key` and returns its first value.
    pub fn take_first(&mut self, key: &str) -> Option<String> {
        self.take(key).and_then(|values| values.into_iter().next())
    }

    /// Iterates over entries in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.entries
            .iter()
            .map(|(k, values)| (k.as_str(), values.as_slice()))
    }

    /// Consumes the map, yielding entries in insertion order.
    pub fn into_entries(self) -> Vec<(String, Vec<String>)> {
        self.entries
    }

    /// Returns true if no parameters are present.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Field filters: field key to the list of accepted raw values.
///
/// Insertion order is preserved and re-inserting an existing key replaces its
/// values in place.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterMap {
    /// Entries in insertion order.
    entries: Vec<(String, Vec<String>)>,
}

impl FilterMap {
    /// Creates an empty filter map.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the values for `key`, keeping its original position if present.
    pub fn insert(&mut self, key: impl Into<String>, values: Vec<String>) {
        let key = key.into();
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some((_, existing)) => *existing = values,
            None => self.entries.push((key, values)),
        }
    }

    /// Returns the values for `key`.
    pub fn get(&self, key: &str) -> Option<&[String]> {
        self.entries
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, values)| values.as_slice())
    }

    /// Removes `key`, returning its values.
    pub fn remove(&mut self, key: &str) -> Option<Vec<String>> {
        let position = self.entries.iter().position(|(k, _)| k == key)?;
        Some(self.entries.remove(position).1)
    }

    /// Returns true if `key` is present.
    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.iter().any(|(k, _)| k == key)
    }

    /// Iterates over `(key, values)` in insertion order.
    pub fn iter(&self) -> impl ExactSizeIterator<Item = (&str, &[String])> {
        self.entries
            .iter()
            .map(|(k, values)| (k.as_str(), values.as_slice()))
    }

    /// Iterates over keys in insertion order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(k, _)| k.as_str())
    }

    /// Number of filter keys.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if there are no filters.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<K: Into<String>> FromIterator<(K, Vec<String>)> for FilterMap {
    fn from_iter<T: IntoIterator<Item = (K, Vec<String>)>>(iter: T) -> Self {
        let mut map = Self::new();
        for (key, values) in iter {
            map.insert(key, values);
        }
        map
    }
}

impl Serialize for FilterMap {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (key, values) in &self.entries {
            map.serialize_entry(key, values)?;
        }
        map.end()
    }
}
