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

use std::{collections::BTreeMap, sync::Arc};

use crate::{
    LoadError, ObjectValue, PropertyProxy, RawName, SharedLoader, ValueMirror, ValueType,
    VariableCapabilities,
};

/// Proxy for arrays.
///
/// An array is an object whose index-named properties are its elements.
#[derive(Debug, derive_more::Deref)]
pub struct ArrayValue {
    object: ObjectValue,
}

impl ArrayValue {
    pub(crate) fn new(
        loader: SharedLoader,
        mirror: Arc<ValueMirror>,
        capabilities: VariableCapabilities,
    ) -> Self {
        Self { object: ObjectValue::new(loader, mirror, capabilities) }
    }

    /// Array length.
    ///
    /// Taken from the remote `length` property when it is a number, otherwise
    /// one past the greatest element index, or 0 for an array with no
    /// elements.
    pub fn length(&self) -> Result<u64, LoadError> {
        let data = self.object.subproperties()?;

        let reported = data.properties.iter().find_map(|property| {
            let is_length = matches!(&property.name, RawName::Name(name) if name == "length");
            (is_length && property.value.value_type() == &ValueType::Number)
                .then(|| property.value.text().parse::<u64>().ok())
                .flatten()
        });
        if let Some(length) = reported {
            return Ok(length);
        }

        Ok(data
            .properties
            .iter()
            .filter_map(|property| property.name.as_index())
            .max()
            .map_or(0, |index| index.saturating_add(1)))
    }

    /// Element at `index`, or `None` for a hole or an out-of-range index.
    pub fn element(&self, index: u64) -> Result<Option<PropertyProxy>, LoadError> {
        let data = self.object.subproperties()?;
        Ok(data
            .properties
            .iter()
            .find(|property| property.name.as_index() == Some(index))
            .map(|property| self.object.build_property(property)))
    }

    /// All elements keyed by index. Holes are absent from the map.
    pub fn elements(&self) -> Result<BTreeMap<u64, PropertyProxy>, LoadError> {
        let data = self.object.subproperties()?;
        let mut elements = BTreeMap::new();
        for property in &data.properties {
            if let Some(index) = property.name.as_index() {
                elements
                    .entry(index)
                    .or_insert_with(|| self.object.build_property(property));
            }
        }
        Ok(elements)
    }
}
