// JSDB - JavaScript Debugger
// Copyright (C) 2024 Zhuo Zhang and Wuqi Zhang
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU Affero General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE. See the
// GNU Affero General Public License for more details.
//
// You should have received a copy of the GNU Affero General Public License
// along with this program. If not, see <https://www.gnu.org/licenses/>.

//! Fetch cache utilities.
//!
//! Remote data is fetched lazily and remembered per key. A [`FetchCache`]
//! distinguishes three states so that a failed fetch is not retried on every
//! access.

use std::{
    collections::HashMap,
    hash::Hash,
    ops::{Deref, DerefMut},
};

use tracing::trace;

/// A cache map that tracks three states for each key:
/// 1. Key not in map = Not fetched
/// 2. Key maps to Some(V) = Fetched with valid value
/// 3. Key maps to None = Fetched but no valid value
#[derive(Debug, Clone)]
pub struct FetchCache<K, V> {
    data: HashMap<K, Option<V>>,
}

impl<K, V> Deref for FetchCache<K, V> {
    type Target = HashMap<K, Option<V>>;

    fn deref(&self) -> &Self::Target {
        &self.data
    }
}

impl<K, V> DerefMut for FetchCache<K, V> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.data
    }
}

impl<K, V> FetchCache<K, V>
where
    K: Eq + Hash,
{
    /// Creates an empty cache.
    pub fn new() -> Self {
        Self { data: HashMap::new() }
    }

    /// Check if the cache has an entry (valid or failed) for the given key
    pub fn has_cached(&self, key: &K) -> bool {
        self.data.contains_key(key)
    }

    /// Returns the cached value, or `None` if the key was never fetched or
    /// the fetch failed. Use [`Self::has_cached`] to tell the two apart.
    pub fn cached(&self, key: &K) -> Option<&V> {
        self.data.get(key).and_then(Option::as_ref)
    }

    /// Returns true if the key was fetched and the fetch failed
    pub fn is_failed(&self, key: &K) -> bool {
        matches!(self.data.get(key), Some(None))
    }

    /// Record the outcome of a fetch
    pub fn record(&mut self, key: K, value: Option<V>) {
        trace!(fetched = value.is_some(), "recording fetch result");
        self.data.insert(key, value);
    }

    /// Forget the entry for `key` so the next access fetches again
    pub fn invalidate(&mut self, key: &K) -> bool {
        self.data.remove(key).is_some()
    }
}

impl<K, V> Default for FetchCache<K, V>
where
    K: Eq + Hash,
{
    fn default() -> Self {
        Self::new()
    }
}
