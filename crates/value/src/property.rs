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

//! Object property proxies.
//!
//! A property is a variable that belongs to an object. On top of the
//! variable surface it carries a descriptor: the writable, configurable and
//! enumerable flags and optional accessor functions. The remote protocol
//! does not report descriptors reliably yet, so flags default to `true`
//! unless the loader supplied them or the caller overrides them.

use std::{fmt, sync::Arc};

use delegate::delegate;
use tracing::error;

use crate::{
    create_value_with, FunctionValue, JsVariable, PropertyMirror, RawName, SetValueCallback,
    SharedLoader, ValueMirror, ValueProxy, VariableCapabilities, VariableError, VariableProxy,
};

/// Completion callback for [`JsObjectProperty::evaluate_get`].
///
/// Any `FnOnce(Result<ValueProxy, String>) + Send` closure is a callback.
pub trait EvaluateCallback: Send {
    /// The getter returned a value.
    fn success(self: Box<Self>, value: ValueProxy);

    /// The getter threw or could not be invoked.
    fn failure(self: Box<Self>, message: String);
}

impl<F> EvaluateCallback for F
where
    F: FnOnce(Result<ValueProxy, String>) + Send,
{
    fn success(self: Box<Self>, value: ValueProxy) {
        (*self)(Ok(value))
    }

    fn failure(self: Box<Self>, message: String) {
        (*self)(Err(message))
    }
}

/// Property attributes and accessors.
#[derive(Debug)]
pub struct PropertyDescriptor {
    /// Value can be changed by assignment
    pub writable: bool,
    /// Property can be deleted or redefined
    pub configurable: bool,
    /// Property shows up in enumeration
    pub enumerable: bool,
    /// Accessor getter
    pub getter: Option<ValueProxy>,
    /// Accessor setter
    pub setter: Option<ValueProxy>,
}

impl Default for PropertyDescriptor {
    fn default() -> Self {
        Self { writable: true, configurable: true, enumerable: true, getter: None, setter: None }
    }
}

/// Accessor extension of [`JsVariable`] for object properties.
pub trait JsObjectProperty: JsVariable {
    /// Writable flag
    fn is_writable(&self) -> bool;

    /// Configurable flag
    fn is_configurable(&self) -> bool;

    /// Enumerable flag
    fn is_enumerable(&self) -> bool;

    /// Accessor getter, if any
    fn getter(&self) -> Option<&ValueProxy>;

    /// Accessor setter, if any
    fn setter(&self) -> Option<&ValueProxy>;

    /// The getter narrowed to a function; `None` if absent or not callable.
    fn getter_as_function(&self) -> Option<&FunctionValue> {
        self.getter()?.as_function()
    }

    /// Invokes the getter remotely and reports the result via `callback`.
    ///
    /// Not wired to the remote protocol: always fails with
    /// [`VariableError::NotImplemented`] and never calls `callback`.
    fn evaluate_get(&self, callback: Box<dyn EvaluateCallback>) -> Result<(), VariableError>;
}

/// A variable that is a property of a remote object.
#[derive(Debug)]
pub struct PropertyProxy {
    variable: VariableProxy,
    descriptor: PropertyDescriptor,
}

impl PropertyProxy {
    /// Binds `raw_name` to a new proxy for `mirror`, with a default
    /// descriptor.
    pub fn new(
        loader: SharedLoader,
        mirror: impl Into<Arc<ValueMirror>>,
        raw_name: impl Into<RawName>,
    ) -> Self {
        Self {
            variable: VariableProxy::new(loader, mirror, raw_name),
            descriptor: PropertyDescriptor::default(),
        }
    }

    /// Builds a property from loader data. Flags the remote reported
    /// override the defaults; accessors become value proxies.
    pub fn from_mirror(
        loader: &SharedLoader,
        property: &PropertyMirror,
        capabilities: VariableCapabilities,
    ) -> Self {
        let defaults = PropertyDescriptor::default();
        let accessor =
            |mirror: &ValueMirror| create_value_with(loader, mirror.clone(), capabilities);
        let descriptor = PropertyDescriptor {
            writable: property.writable.unwrap_or(defaults.writable),
            configurable: property.configurable.unwrap_or(defaults.configurable),
            enumerable: property.enumerable.unwrap_or(defaults.enumerable),
            getter: property.getter.as_ref().map(accessor),
            setter: property.setter.as_ref().map(accessor),
        };
        Self {
            variable: VariableProxy::bind(
                Arc::clone(loader),
                property.value.clone(),
                property.name.clone(),
                capabilities,
            ),
            descriptor,
        }
    }

    /// Replaces the descriptor.
    pub fn with_descriptor(mut self, descriptor: PropertyDescriptor) -> Self {
        self.descriptor = descriptor;
        self
    }

    /// Replaces the capabilities of the underlying binding and its accessors.
    pub fn with_capabilities(mut self, capabilities: VariableCapabilities) -> Self {
        self.variable = self.variable.with_capabilities(capabilities);
        let loader = self.variable.loader();
        let rebind = |accessor: &mut Option<ValueProxy>| {
            if let Some(value) = accessor.as_mut() {
                *value = create_value_with(loader, Arc::clone(value.mirror()), capabilities);
            }
        };
        rebind(&mut self.descriptor.getter);
        rebind(&mut self.descriptor.setter);
        self
    }

    /// The underlying variable
    pub fn variable(&self) -> &VariableProxy {
        &self.variable
    }

    /// The descriptor
    pub fn descriptor(&self) -> &PropertyDescriptor {
        &self.descriptor
    }
}

impl JsVariable for PropertyProxy {
    delegate! {
        to self.variable {
            fn value(&self) -> &ValueProxy;
            fn name(&self) -> String;
            fn raw_name(&self) -> &RawName;
            fn is_mutable(&self) -> bool;
            fn is_readable(&self) -> bool;
            fn set_value(
                &self,
                new_value: &str,
                callback: Option<Box<dyn SetValueCallback>>,
            ) -> Result<(), VariableError>;
        }
    }

    fn as_object_property(&self) -> Option<&dyn JsObjectProperty> {
        Some(self)
    }
}

impl JsObjectProperty for PropertyProxy {
    fn is_writable(&self) -> bool {
        self.descriptor.writable
    }

    fn is_configurable(&self) -> bool {
        self.descriptor.configurable
    }

    fn is_enumerable(&self) -> bool {
        self.descriptor.enumerable
    }

    fn getter(&self) -> Option<&ValueProxy> {
        self.descriptor.getter.as_ref()
    }

    fn setter(&self) -> Option<&ValueProxy> {
        self.descriptor.setter.as_ref()
    }

    fn evaluate_get(&self, _callback: Box<dyn EvaluateCallback>) -> Result<(), VariableError> {
        error!(name = %self.raw_name(), "getter evaluation is not supported");
        Err(VariableError::NotImplemented { operation: "evaluate_get" })
    }
}

impl fmt::Display for PropertyProxy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.variable, f)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{mirror, static_loader};

    #[test]
    fn test_default_descriptor() {
        let property = PropertyProxy::new(static_loader(), mirror::number(1.0), "x");
        assert!(property.is_writable());
        assert!(property.is_configurable());
        assert!(property.is_enumerable());
        assert!(property.getter().is_none());
        assert!(property.setter().is_none());
        assert!(property.getter_as_function().is_none());
    }

    #[test]
    fn test_narrowing_from_variable() {
        let property = PropertyProxy::new(static_loader(), mirror::number(1.0), "x");
        let variable: &dyn JsVariable = &property;
        let narrowed = variable.as_object_property().unwrap();
        assert_eq!(narrowed.name(), "x");
        assert!(narrowed.is_enumerable());
    }

    #[test]
    fn test_reported_flags_and_accessors() {
        let loader = static_loader();
        let mut mirror_data = PropertyMirror::new("size", mirror::undefined());
        mirror_data.enumerable = Some(false);
        mirror_data.getter = Some(mirror::function(20, "get size"));
        mirror_data.setter = Some(mirror::number(0.0));

        let property =
            PropertyProxy::from_mirror(&loader, &mirror_data, VariableCapabilities::default());
        assert!(!property.is_enumerable());
        assert!(property.is_writable());
        assert!(property.is_configurable());

        assert_eq!(property.getter_as_function().unwrap().name(), "get size");
        assert!(property.setter().unwrap().as_function().is_none());
    }

    #[test]
    fn test_display_matches_variable() {
        let property = PropertyProxy::new(static_loader(), mirror::string("hi"), "greeting");
        assert_eq!(property.to_string(), "[JsVariable: name=greeting,value=hi]");
    }
}
