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

//! Test fixtures.
//!
//! [`StaticFetcher`] answers fetches from in-memory tables and counts round
//! trips. [`RecordingLoader`] accepts or rejects writes and keeps a log of
//! them. The [`mirror`] module builds common mirrors.

use std::{
    collections::HashMap,
    sync::{
        atomic::{AtomicUsize, Ordering},
        Arc,
    },
};

use parking_lot::Mutex;

use crate::{
    CachingValueLoader, LoadError, MirrorFetcher, RawName, SharedLoader, SubpropertiesMirror,
    ValueLoader, ValueMirror,
};

/// A [`MirrorFetcher`] backed by fixed tables. Unknown handles fail.
#[derive(Debug, Default)]
pub struct StaticFetcher {
    subproperties: HashMap<u64, SubpropertiesMirror>,
    strings: HashMap<u64, String>,
    subproperty_fetches: AtomicUsize,
    string_fetches: AtomicUsize,
}

impl StaticFetcher {
    /// Registers the properties of `handle`.
    pub fn with_subproperties(mut self, handle: u64, data: SubpropertiesMirror) -> Self {
        self.subproperties.insert(handle, data);
        self
    }

    /// Registers the full text of `handle`.
    pub fn with_string(mut self, handle: u64, text: impl Into<String>) -> Self {
        self.strings.insert(handle, text.into());
        self
    }

    /// Number of property fetches performed so far
    pub fn subproperty_fetches(&self) -> usize {
        self.subproperty_fetches.load(Ordering::SeqCst)
    }

    /// Number of string fetches performed so far
    pub fn string_fetches(&self) -> usize {
        self.string_fetches.load(Ordering::SeqCst)
    }
}

impl MirrorFetcher for StaticFetcher {
    fn fetch_subproperties(&self, handle: u64) -> eyre::Result<SubpropertiesMirror> {
        self.subproperty_fetches.fetch_add(1, Ordering::SeqCst);
        self.subproperties
            .get(&handle)
            .cloned()
            .ok_or_else(|| eyre::eyre!("no object with handle {handle}"))
    }

    fn fetch_full_string(&self, handle: u64) -> eyre::Result<String> {
        self.string_fetches.fetch_add(1, Ordering::SeqCst);
        self.strings
            .get(&handle)
            .cloned()
            .ok_or_else(|| eyre::eyre!("no string with handle {handle}"))
    }
}

/// A caching loader over an empty [`StaticFetcher`].
pub fn static_loader() -> SharedLoader {
    Arc::new(CachingValueLoader::new(StaticFetcher::default()))
}

/// A [`ValueLoader`] with write support, for exercising mutable variables.
#[derive(Debug, Default)]
pub struct RecordingLoader {
    reject_writes: bool,
    writes: Mutex<Vec<(RawName, String)>>,
}

impl RecordingLoader {
    /// A loader whose writes all fail.
    pub fn rejecting() -> Self {
        Self { reject_writes: true, ..Default::default() }
    }

    /// Writes received so far, in order
    pub fn writes(&self) -> Vec<(RawName, String)> {
        self.writes.lock().clone()
    }
}

impl ValueLoader for RecordingLoader {
    fn load_subproperties(
        &self,
        mirror: &ValueMirror,
    ) -> Result<Arc<SubpropertiesMirror>, LoadError> {
        mirror.handle().ok_or(LoadError::NoHandle)?;
        Ok(Arc::default())
    }

    fn load_full_string(&self, mirror: &ValueMirror) -> Result<Arc<str>, LoadError> {
        Ok(Arc::from(mirror.text()))
    }

    fn write_variable(&self, name: &RawName, new_value: &str) -> Result<(), LoadError> {
        self.writes.lock().push((name.clone(), new_value.to_string()));
        if self.reject_writes {
            return Err(LoadError::Unsupported("write_variable"));
        }
        Ok(())
    }
}

/// Mirror builders.
pub mod mirror {
    use crate::{FunctionMirror, ValueMirror, ValueType};

    /// A number
    pub fn number(value: f64) -> ValueMirror {
        ValueMirror::new(ValueType::Number, value.to_string())
    }

    /// A complete string
    pub fn string(text: &str) -> ValueMirror {
        ValueMirror::new(ValueType::String, text)
    }

    /// A string the remote truncated to `prefix`
    pub fn truncated_string(handle: u64, prefix: &str, full_length: usize) -> ValueMirror {
        ValueMirror::new(ValueType::String, prefix)
            .with_handle(handle)
            .with_full_length(full_length)
    }

    /// `undefined`
    pub fn undefined() -> ValueMirror {
        ValueMirror::new(ValueType::Undefined, "undefined")
    }

    /// An object with a remote handle
    pub fn object(handle: u64, class_name: &str) -> ValueMirror {
        inline_object(class_name).with_handle(handle)
    }

    /// An object without a remote handle
    pub fn inline_object(class_name: &str) -> ValueMirror {
        ValueMirror::new(ValueType::Object, format!("#<{class_name}>")).with_class_name(class_name)
    }

    /// An array
    pub fn array(handle: u64, length: u64) -> ValueMirror {
        ValueMirror::new(ValueType::Array, format!("Array({length})"))
            .with_handle(handle)
            .with_class_name("Array")
    }

    /// A function with a declared name and no script position
    pub fn function(handle: u64, name: &str) -> ValueMirror {
        ValueMirror::new(ValueType::Function, format!("function {name}() {{ [code] }}"))
            .with_handle(handle)
            .with_class_name("Function")
            .with_function(FunctionMirror { name: Some(name.to_string()), ..Default::default() })
    }
}
