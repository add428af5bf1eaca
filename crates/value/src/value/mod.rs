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

//! Value proxies.
//!
//! [`create_value_with`] is the only place that looks at the remote type tag to
//! decide which proxy to build. Everything downstream works with
//! [`ValueProxy`] and narrows with `as_object`/`as_array`/`as_function`.

mod array;
mod function;
mod object;
mod scalar;

pub use array::ArrayValue;
pub use function::{FunctionValue, SourcePosition};
pub use object::ObjectValue;
pub use scalar::ScalarValue;

use std::{fmt, sync::Arc};

use tracing::trace;

use crate::{SharedLoader, ValueMirror, ValueType, VariableCapabilities};

/// Local stand-in for one remote value.
#[derive(Debug, derive_more::From)]
pub enum ValueProxy {
    /// Primitives, `undefined`, `null` and any unrecognized type
    Scalar(ScalarValue),
    /// Objects, errors, dates and regexps
    Object(ObjectValue),
    /// Arrays
    Array(ArrayValue),
    /// Functions
    Function(FunctionValue),
}

/// Builds the proxy matching the mirror's type tag.
///
/// Never fails and performs no I/O. Unknown tags produce a scalar proxy.
/// Every call returns a new, independent proxy. Properties loaded through
/// the proxy get the default capabilities.
pub fn create_value(loader: &SharedLoader, mirror: impl Into<Arc<ValueMirror>>) -> ValueProxy {
    create_value_with(loader, mirror, VariableCapabilities::default())
}

/// Like [`create_value`], but every property later built from this value's
/// loaded data, at any depth, gets `capabilities`.
pub fn create_value_with(
    loader: &SharedLoader,
    mirror: impl Into<Arc<ValueMirror>>,
    capabilities: VariableCapabilities,
) -> ValueProxy {
    let mirror = mirror.into();
    trace!(value_type = %mirror.value_type(), handle = ?mirror.handle(), "creating value proxy");

    let loader = Arc::clone(loader);
    match mirror.value_type() {
        ValueType::Function => FunctionValue::new(loader, mirror, capabilities).into(),
        ValueType::Error | ValueType::Object | ValueType::Date | ValueType::Regexp => {
            ObjectValue::new(loader, mirror, capabilities).into()
        }
        ValueType::Array => ArrayValue::new(loader, mirror, capabilities).into(),
        _ => ScalarValue::new(loader, mirror).into(),
    }
}

impl ValueProxy {
    /// The mirror this proxy was built from
    pub fn mirror(&self) -> &Arc<ValueMirror> {
        match self {
            Self::Scalar(value) => value.mirror(),
            Self::Object(value) => value.mirror(),
            Self::Array(value) => value.mirror(),
            Self::Function(value) => value.mirror(),
        }
    }

    /// Runtime type tag
    pub fn value_type(&self) -> &ValueType {
        self.mirror().value_type()
    }

    /// Textual rendering reported by the remote
    pub fn value_string(&self) -> &str {
        self.mirror().text()
    }

    /// Narrows to a scalar
    pub fn as_scalar(&self) -> Option<&ScalarValue> {
        match self {
            Self::Scalar(value) => Some(value),
            _ => None,
        }
    }

    /// Narrows to an object. Arrays and functions are objects too.
    pub fn as_object(&self) -> Option<&ObjectValue> {
        match self {
            Self::Scalar(_) => None,
            Self::Object(value) => Some(value),
            Self::Array(value) => Some(value),
            Self::Function(value) => Some(value),
        }
    }

    /// Narrows to an array
    pub fn as_array(&self) -> Option<&ArrayValue> {
        match self {
            Self::Array(value) => Some(value),
            _ => None,
        }
    }

    /// Narrows to a function
    pub fn as_function(&self) -> Option<&FunctionValue> {
        match self {
            Self::Function(value) => Some(value),
            _ => None,
        }
    }
}

impl fmt::Display for ValueProxy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.value_string())
    }
}
