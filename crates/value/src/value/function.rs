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

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::{ObjectValue, SharedLoader, ValueMirror, VariableCapabilities};

/// Location of a function in a remote script.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SourcePosition {
    /// Remote script id
    pub script_id: u64,
    /// Zero-based line
    pub line: u32,
    /// Zero-based column
    pub column: u32,
}

/// Proxy for functions. A function is an object with callable metadata.
#[derive(Debug, derive_more::Deref)]
pub struct FunctionValue {
    object: ObjectValue,
}

impl FunctionValue {
    pub(crate) fn new(
        loader: SharedLoader,
        mirror: Arc<ValueMirror>,
        capabilities: VariableCapabilities,
    ) -> Self {
        Self { object: ObjectValue::new(loader, mirror, capabilities) }
    }

    /// Declared name, falling back to the name the runtime inferred, or an
    /// empty string for anonymous functions.
    pub fn name(&self) -> &str {
        self.mirror()
            .function()
            .and_then(|function| {
                function
                    .name
                    .as_deref()
                    .filter(|name| !name.is_empty())
                    .or(function.inferred_name.as_deref())
            })
            .unwrap_or_default()
    }

    /// Name inferred by the runtime, if any
    pub fn inferred_name(&self) -> Option<&str> {
        self.mirror().function()?.inferred_name.as_deref()
    }

    /// Where the function is defined. `None` for natives and functions the
    /// remote did not attribute to a script.
    pub fn source_position(&self) -> Option<SourcePosition> {
        let function = self.mirror().function()?;
        Some(SourcePosition {
            script_id: function.script_id?,
            line: function.line.unwrap_or_default(),
            column: function.column.unwrap_or_default(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        create_value,
        test_utils::{mirror, static_loader},
        FunctionMirror, ValueType,
    };

    #[test]
    fn test_named_function() {
        let loader = static_loader();
        let value = create_value(
            &loader,
            ValueMirror::new(ValueType::Function, "function add(a, b) { ... }")
                .with_handle(10)
                .with_function(FunctionMirror {
                    name: Some("add".to_string()),
                    inferred_name: None,
                    script_id: Some(42),
                    line: Some(7),
                    column: None,
                }),
        );
        let function = value.as_function().unwrap();

        assert_eq!(function.name(), "add");
        assert_eq!(function.inferred_name(), None);
        assert_eq!(
            function.source_position(),
            Some(SourcePosition { script_id: 42, line: 7, column: 0 })
        );
        assert_eq!(function.handle(), Some(10));
    }

    #[test]
    fn test_anonymous_function_uses_inferred_name() {
        let loader = static_loader();
        let value = create_value(
            &loader,
            ValueMirror::new(ValueType::Function, "function () {}").with_function(FunctionMirror {
                name: Some(String::new()),
                inferred_name: Some("obj.handler".to_string()),
                ..Default::default()
            }),
        );
        let function = value.as_function().unwrap();

        assert_eq!(function.name(), "obj.handler");
        assert_eq!(function.source_position(), None);
    }

    #[test]
    fn test_function_without_metadata() {
        let loader = static_loader();
        let value = create_value(&loader, mirror::function(11, ""));
        let function = value.as_function().unwrap();
        assert_eq!(function.name(), "");
        assert_eq!(function.source_position(), None);
    }
}
