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

//! Variable proxies.
//!
//! A variable binds a [`RawName`] to a [`ValueProxy`]. The value proxy is
//! built eagerly when the variable is constructed; its deep data is still
//! loaded lazily.

use std::{fmt, sync::Arc};

use jsdb_common::CapabilityConfig;
use parking_lot::Mutex;
use tracing::{debug, warn};

use crate::{
    create_value_with, JsObjectProperty, RawName, SharedLoader, ValueMirror, ValueProxy,
    VariableError,
};

/// Completion callback for [`JsVariable::set_value`].
///
/// Any `FnOnce(Result<(), String>) + Send` closure is a callback.
pub trait SetValueCallback: Send {
    /// The write was applied remotely.
    fn success(self: Box<Self>);

    /// The write failed remotely.
    fn failure(self: Box<Self>, message: String);
}

impl<F> SetValueCallback for F
where
    F: FnOnce(Result<(), String>) + Send,
{
    fn success(self: Box<Self>) {
        (*self)(Ok(()))
    }

    fn failure(self: Box<Self>, message: String) {
        (*self)(Err(message))
    }
}

/// What the remote protocol allows for a binding.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VariableCapabilities {
    /// Writes are possible
    pub mutable: bool,
    /// Reads are possible
    pub readable: bool,
}

impl Default for VariableCapabilities {
    /// The protocol has no write support and no read restrictions yet.
    fn default() -> Self {
        Self { mutable: false, readable: true }
    }
}

impl From<CapabilityConfig> for VariableCapabilities {
    fn from(config: CapabilityConfig) -> Self {
        Self { mutable: config.mutable, readable: config.readable }
    }
}

/// Common surface of variables and object properties.
pub trait JsVariable: fmt::Display + Send + Sync {
    /// The bound value. Always present.
    fn value(&self) -> &ValueProxy;

    /// Display form of the identifier.
    fn name(&self) -> String;

    /// The identifier as reported by the remote.
    fn raw_name(&self) -> &RawName;

    /// Whether the remote protocol currently supports writing this variable.
    /// Callers must check this before calling [`Self::set_value`].
    fn is_mutable(&self) -> bool;

    /// Whether the variable can currently be read.
    fn is_readable(&self) -> bool;

    /// Writes `new_value` to the remote variable.
    ///
    /// Fails with [`VariableError::UnsupportedOperation`] without side
    /// effects when the variable is not mutable.
    fn set_value(
        &self,
        new_value: &str,
        callback: Option<Box<dyn SetValueCallback>>,
    ) -> Result<(), VariableError>;

    /// Narrows to the object property extension, if this variable is one.
    fn as_object_property(&self) -> Option<&dyn JsObjectProperty>;
}

/// A named or indexed binding to a remote value.
#[derive(derive_more::Debug)]
pub struct VariableProxy {
    raw_name: RawName,
    value: ValueProxy,
    capabilities: VariableCapabilities,
    #[debug(skip)]
    loader: SharedLoader,
    #[debug(skip)]
    write_guard: Mutex<()>,
}

impl VariableProxy {
    /// Binds `raw_name` to a new proxy for `mirror`, with default
    /// capabilities.
    pub fn new(
        loader: SharedLoader,
        mirror: impl Into<Arc<ValueMirror>>,
        raw_name: impl Into<RawName>,
    ) -> Self {
        Self::bind(loader, mirror, raw_name, VariableCapabilities::default())
    }

    /// Binds `raw_name` to a new proxy for `mirror`. Properties loaded
    /// through the bound value inherit `capabilities`.
    pub fn bind(
        loader: SharedLoader,
        mirror: impl Into<Arc<ValueMirror>>,
        raw_name: impl Into<RawName>,
        capabilities: VariableCapabilities,
    ) -> Self {
        let value = create_value_with(&loader, mirror, capabilities);
        Self {
            raw_name: raw_name.into(),
            value,
            capabilities,
            loader,
            write_guard: Mutex::new(()),
        }
    }

    /// Replaces the capabilities of this binding and of the properties
    /// loaded through its value.
    pub fn with_capabilities(self, capabilities: VariableCapabilities) -> Self {
        Self::bind(self.loader, Arc::clone(self.value.mirror()), self.raw_name, capabilities)
    }

    /// Current capabilities
    pub fn capabilities(&self) -> VariableCapabilities {
        self.capabilities
    }

    /// The loader the bound value uses
    pub fn loader(&self) -> &SharedLoader {
        &self.loader
    }
}

impl JsVariable for VariableProxy {
    fn value(&self) -> &ValueProxy {
        &self.value
    }

    fn name(&self) -> String {
        self.raw_name.to_string()
    }

    fn raw_name(&self) -> &RawName {
        &self.raw_name
    }

    fn is_mutable(&self) -> bool {
        self.capabilities.mutable
    }

    fn is_readable(&self) -> bool {
        self.capabilities.readable
    }

    fn set_value(
        &self,
        new_value: &str,
        callback: Option<Box<dyn SetValueCallback>>,
    ) -> Result<(), VariableError> {
        let _guard = self.write_guard.lock();

        if !self.is_mutable() {
            warn!(name = %self.raw_name, "rejected write to immutable variable");
            return Err(VariableError::UnsupportedOperation {
                operation: "set_value",
                name: self.name(),
            });
        }

        match self.loader.write_variable(&self.raw_name, new_value) {
            Ok(()) => {
                debug!(name = %self.raw_name, "variable written");
                if let Some(callback) = callback {
                    callback.success();
                }
                Ok(())
            }
            Err(err) => {
                warn!(name = %self.raw_name, error = %err, "variable write failed");
                if let Some(callback) = callback {
                    callback.failure(err.to_string());
                }
                Err(err.into())
            }
        }
    }

    fn as_object_property(&self) -> Option<&dyn JsObjectProperty> {
        None
    }
}

impl fmt::Display for VariableProxy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[JsVariable: name={},value={}]", self.raw_name, self.value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{mirror, static_loader};

    #[test]
    fn test_defaults() {
        let variable = VariableProxy::new(static_loader(), mirror::number(1.0), "a");
        assert!(!variable.is_mutable());
        assert!(variable.is_readable());
        assert!(variable.as_object_property().is_none());
        assert_eq!(variable.capabilities(), VariableCapabilities::default());
    }

    #[test]
    fn test_index_name() {
        let variable = VariableProxy::new(static_loader(), mirror::string("x"), 3u64);
        assert_eq!(variable.name(), "3");
        assert_eq!(variable.raw_name(), &RawName::Index(3));
    }

    #[test]
    fn test_display() {
        let variable = VariableProxy::new(static_loader(), mirror::number(42.0), "count");
        assert_eq!(variable.to_string(), "[JsVariable: name=count,value=42]");
    }

    #[test]
    fn test_capabilities_from_config() {
        let config = CapabilityConfig { mutable: true, readable: false };
        let capabilities = VariableCapabilities::from(config);
        assert!(capabilities.mutable);
        assert!(!capabilities.readable);
    }
}
