//! Layered configuration merging.

use std::collections::{BTreeMap, HashMap};
use std::hash::Hash;

/// Combine two layers of configuration; `other` takes precedence.
pub trait Merge {
    fn merge(self, other: Self) -> Self;
}

impl<T> Merge for Option<T> {
    fn merge(self, other: Self) -> Self {
        other.or(self)
    }
}

/// Keys from both layers; values from `other` win.
impl<K: Ord, V> Merge for BTreeMap<K, V> {
    fn merge(mut self, other: Self) -> Self {
        self.extend(other);
        self
    }
}

/// Keys from both layers; values present in both are merged recursively.
impl<K: Hash + Eq, V: Merge> Merge for HashMap<K, V> {
    fn merge(mut self, other: Self) -> Self {
        for (key, value) in other {
            let merged = match self.remove(&key) {
                Some(existing) => existing.merge(value),
                None => value,
            };
            self.insert(key, merged);
        }
        self
    }
}
