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

//! Value loading.
//!
//! Proxies never talk to the transport directly. They ask a [`ValueLoader`]
//! for deep data the first time it is needed, and the loader decides how to
//! fetch and cache it. [`CachingValueLoader`] is the standard implementation:
//! it sits on a [`MirrorFetcher`] and remembers every response per handle for
//! the lifetime of the session.

use std::{collections::HashMap, sync::Arc};

use auto_impl::auto_impl;
use jsdb_common::{FetchCache, LoaderConfig};
use parking_lot::{Mutex, RwLock};
use tracing::{debug, trace, warn};

use crate::{LoadError, RawName, SubpropertiesMirror, ValueMirror};

/// Session-scoped source of deep value data.
///
/// Implementations must be safe to call from inside proxy accessors and from
/// any thread.
#[auto_impl(Arc, Box)]
pub trait ValueLoader: Send + Sync {
    /// Loads the properties of an object-like value.
    fn load_subproperties(&self, mirror: &ValueMirror)
        -> Result<Arc<SubpropertiesMirror>, LoadError>;

    /// Loads the full text of a value the remote truncated.
    fn load_full_string(&self, mirror: &ValueMirror) -> Result<Arc<str>, LoadError>;

    /// Writes a new value to a remote variable.
    ///
    /// The remote protocol has no write support yet, so the default rejects.
    fn write_variable(&self, name: &RawName, new_value: &str) -> Result<(), LoadError> {
        let _ = (name, new_value);
        Err(LoadError::Unsupported("write_variable"))
    }
}

/// Shared handle to the loader of a session.
pub type SharedLoader = Arc<dyn ValueLoader>;

/// Transport seam: performs the actual remote round trips.
#[auto_impl(&, Arc, Box)]
pub trait MirrorFetcher: Send + Sync {
    /// Fetches the properties of the object behind `handle`.
    fn fetch_subproperties(&self, handle: u64) -> eyre::Result<SubpropertiesMirror>;

    /// Fetches the untruncated text of the value behind `handle`.
    fn fetch_full_string(&self, handle: u64) -> eyre::Result<String>;
}

/// One cache plus the fetches currently running for it.
///
/// A handle's gate is held for the duration of its fetch, so concurrent
/// misses on that handle wait for the first one instead of fetching again.
/// Lookups only ever take the cache's read lock, and no lock on the cache is
/// held across a fetch.
#[derive(Debug)]
struct CacheSlot<T> {
    cache: RwLock<FetchCache<u64, T>>,
    in_flight: Mutex<HashMap<u64, Arc<Mutex<()>>>>,
}

impl<T: Clone> Default for CacheSlot<T> {
    fn default() -> Self {
        Self { cache: RwLock::new(FetchCache::new()), in_flight: Mutex::new(HashMap::new()) }
    }
}

impl<T: Clone> CacheSlot<T> {
    /// `None` when `handle` was never fetched; a remembered failure is
    /// reported as [`LoadError::Unavailable`].
    fn lookup(&self, handle: u64) -> Option<Result<T, LoadError>> {
        let cache = self.cache.read();
        if !cache.has_cached(&handle) {
            return None;
        }
        if cache.is_failed(&handle) {
            trace!(handle, "remembered fetch failure");
            return Some(Err(LoadError::Unavailable(handle)));
        }
        trace!(handle, "value data cache hit");
        cache.cached(&handle).cloned().map(Ok)
    }

    fn gate(&self, handle: u64) -> Arc<Mutex<()>> {
        Arc::clone(self.in_flight.lock().entry(handle).or_default())
    }

    fn release(&self, handle: u64, gate: &Arc<Mutex<()>>) {
        let mut in_flight = self.in_flight.lock();
        if in_flight.get(&handle).is_some_and(|current| Arc::ptr_eq(current, gate)) {
            in_flight.remove(&handle);
        }
    }

    fn invalidate(&self, handle: u64) -> bool {
        self.cache.write().invalidate(&handle)
    }

    fn clear(&self) {
        self.cache.write().clear();
    }
}

/// A [`ValueLoader`] that fetches each handle at most once.
///
/// Failed fetches are remembered as well and reported as
/// [`LoadError::Unavailable`] until the handle is invalidated.
#[derive(Debug)]
pub struct CachingValueLoader<F> {
    fetcher: F,
    config: LoaderConfig,
    subproperties: CacheSlot<Arc<SubpropertiesMirror>>,
    strings: CacheSlot<Arc<str>>,
}

impl<F: MirrorFetcher> CachingValueLoader<F> {
    /// Creates a loader with the default configuration.
    pub fn new(fetcher: F) -> Self {
        Self::with_config(fetcher, LoaderConfig::default())
    }

    /// Creates a loader with an explicit configuration.
    pub fn with_config(fetcher: F, config: LoaderConfig) -> Self {
        Self {
            fetcher,
            config,
            subproperties: CacheSlot::default(),
            strings: CacheSlot::default(),
        }
    }

    /// The underlying fetcher
    pub fn fetcher(&self) -> &F {
        &self.fetcher
    }

    /// Drops everything cached for `handle`.
    pub fn invalidate_handle(&self, handle: u64) {
        let dropped = self.subproperties.invalidate(handle) | self.strings.invalidate(handle);
        if dropped {
            debug!(handle, "invalidated cached value data");
        }
    }

    /// Drops the whole cache, e.g. when the remote resumes execution.
    pub fn invalidate(&self) {
        self.subproperties.clear();
        self.strings.clear();
        debug!("invalidated value loader cache");
    }

    /// Shared lookup for both caches.
    fn load_cached<T: Clone>(
        &self,
        slot: &CacheSlot<T>,
        handle: u64,
        fetch: impl FnOnce() -> eyre::Result<T>,
    ) -> Result<T, LoadError> {
        if let Some(found) = slot.lookup(handle) {
            return found;
        }

        let gate = slot.gate(handle);
        let result = {
            let _turn = gate.lock();
            // Another caller may have finished the fetch while we waited.
            match slot.lookup(handle) {
                Some(found) => found,
                None => Self::fetch_into(slot, handle, fetch),
            }
        };
        slot.release(handle, &gate);
        result
    }

    fn fetch_into<T: Clone>(
        slot: &CacheSlot<T>,
        handle: u64,
        fetch: impl FnOnce() -> eyre::Result<T>,
    ) -> Result<T, LoadError> {
        trace!(handle, "value data cache miss, fetching");
        match fetch() {
            Ok(data) => {
                slot.cache.write().record(handle, Some(data.clone()));
                Ok(data)
            }
            Err(err) => {
                warn!(handle, error = %err, "failed to fetch value data");
                slot.cache.write().record(handle, None);
                Err(LoadError::Fetch { handle, message: format!("{err:#}") })
            }
        }
    }
}

impl<F: MirrorFetcher> ValueLoader for CachingValueLoader<F> {
    fn load_subproperties(
        &self,
        mirror: &ValueMirror,
    ) -> Result<Arc<SubpropertiesMirror>, LoadError> {
        if !mirror.value_type().is_object_like() {
            trace!(value_type = %mirror.value_type(), "value has no remote properties");
            return Ok(Arc::default());
        }
        let handle = mirror.handle().ok_or(LoadError::NoHandle)?;
        self.load_cached(&self.subproperties, handle, || {
            self.fetcher.fetch_subproperties(handle).map(Arc::new)
        })
    }

    fn load_full_string(&self, mirror: &ValueMirror) -> Result<Arc<str>, LoadError> {
        if !mirror.is_truncated() {
            return Ok(Arc::from(mirror.text()));
        }
        let handle = mirror.handle().ok_or(LoadError::NoHandle)?;

        if !self.config.cache_strings {
            trace!(handle, "string caching disabled, fetching");
            return self
                .fetcher
                .fetch_full_string(handle)
                .map(Arc::from)
                .map_err(|err| LoadError::Fetch { handle, message: format!("{err:#}") });
        }

        self.load_cached(&self.strings, handle, || {
            self.fetcher.fetch_full_string(handle).map(Arc::from)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{test_utils::StaticFetcher, ValueType};

    fn object(handle: u64) -> ValueMirror {
        ValueMirror::new(ValueType::Object, "#<Object>").with_handle(handle)
    }

    #[test]
    fn test_missing_handle() {
        let loader = CachingValueLoader::new(StaticFetcher::default());
        let mirror = ValueMirror::new(ValueType::Object, "#<Object>");
        assert_eq!(loader.load_subproperties(&mirror).unwrap_err(), LoadError::NoHandle);
        assert_eq!(loader.fetcher().subproperty_fetches(), 0);
    }

    #[test]
    fn test_untruncated_string_is_not_fetched() {
        let loader = CachingValueLoader::new(StaticFetcher::default());
        let mirror = ValueMirror::new(ValueType::String, "short").with_full_length(5);
        assert_eq!(&*loader.load_full_string(&mirror).unwrap(), "short");
        assert_eq!(loader.fetcher().string_fetches(), 0);
    }

    #[test]
    fn test_invalidate_handle_refetches() {
        let fetcher =
            StaticFetcher::default().with_subproperties(1, SubpropertiesMirror::default());
        let loader = CachingValueLoader::new(fetcher);

        loader.load_subproperties(&object(1)).unwrap();
        loader.load_subproperties(&object(1)).unwrap();
        assert_eq!(loader.fetcher().subproperty_fetches(), 1);

        loader.invalidate_handle(1);
        loader.load_subproperties(&object(1)).unwrap();
        assert_eq!(loader.fetcher().subproperty_fetches(), 2);
    }

    #[test]
    fn test_string_cache_can_be_disabled() {
        let fetcher = StaticFetcher::default().with_string(9, "a much longer text");
        let loader =
            CachingValueLoader::with_config(fetcher, LoaderConfig { cache_strings: false });
        let mirror =
            ValueMirror::new(ValueType::String, "a much").with_handle(9).with_full_length(18);

        assert_eq!(&*loader.load_full_string(&mirror).unwrap(), "a much longer text");
        assert_eq!(&*loader.load_full_string(&mirror).unwrap(), "a much longer text");
        assert_eq!(loader.fetcher().string_fetches(), 2);
    }

    #[test]
    fn test_scalars_have_no_properties() {
        let loader = CachingValueLoader::new(StaticFetcher::default());
        let string = ValueMirror::new(ValueType::String, "abc").with_handle(3).with_full_length(9);
        assert!(loader.load_subproperties(&string).unwrap().properties.is_empty());
        assert_eq!(loader.fetcher().subproperty_fetches(), 0);

        let unknown = ValueMirror::new(ValueType::parse("symbol"), "Symbol(x)").with_handle(4);
        assert!(loader.load_subproperties(&unknown).unwrap().properties.is_empty());
        assert_eq!(loader.fetcher().subproperty_fetches(), 0);
    }

    #[test]
    fn test_gates_are_released() {
        let fetcher =
            StaticFetcher::default().with_subproperties(1, SubpropertiesMirror::default());
        let loader = CachingValueLoader::new(fetcher);

        loader.load_subproperties(&object(1)).unwrap();
        assert!(loader.load_subproperties(&object(2)).is_err());
        assert!(loader.load_subproperties(&object(2)).is_err());
        assert!(loader.subproperties.in_flight.lock().is_empty());
        assert!(loader.strings.in_flight.lock().is_empty());
    }
}
