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

use tracing::debug;

use crate::{
    LoadError, PropertyMirror, PropertyProxy, SharedLoader, SubpropertiesMirror, ValueMirror,
    VariableCapabilities,
};

/// Proxy for objects, errors, dates and regexps.
///
/// Properties are not fetched until one of the property accessors is called.
/// The loader caches the fetched data; each call builds fresh property
/// proxies from it, all carrying the capabilities this object was built with.
#[derive(derive_more::Debug)]
pub struct ObjectValue {
    #[debug(skip)]
    loader: SharedLoader,
    mirror: Arc<ValueMirror>,
    capabilities: VariableCapabilities,
}

impl ObjectValue {
    pub(crate) fn new(
        loader: SharedLoader,
        mirror: Arc<ValueMirror>,
        capabilities: VariableCapabilities,
    ) -> Self {
        Self { loader, mirror, capabilities }
    }

    /// The mirror this proxy was built from
    pub fn mirror(&self) -> &Arc<ValueMirror> {
        &self.mirror
    }

    /// The loader that materializes this object's data
    pub fn loader(&self) -> &SharedLoader {
        &self.loader
    }

    /// Capabilities given to the properties of this object
    pub fn capabilities(&self) -> VariableCapabilities {
        self.capabilities
    }

    /// Remote class name, e.g. `Object`, `Date` or `RegExp`
    pub fn class_name(&self) -> Option<&str> {
        self.mirror.class_name()
    }

    /// Remote handle of the object
    pub fn handle(&self) -> Option<u64> {
        self.mirror.handle()
    }

    /// Properties in the order the remote reported them.
    pub fn properties(&self) -> Result<Vec<PropertyProxy>, LoadError> {
        Ok(self.build(&self.subproperties()?.properties))
    }

    /// Engine-internal properties in the order the remote reported them.
    pub fn internal_properties(&self) -> Result<Vec<PropertyProxy>, LoadError> {
        Ok(self.build(&self.subproperties()?.internal_properties))
    }

    /// Looks up a regular property by its rendered name.
    pub fn property(&self, name: &str) -> Result<Option<PropertyProxy>, LoadError> {
        let data = self.subproperties()?;
        Ok(data
            .properties
            .iter()
            .find(|property| property.name.to_string() == name)
            .map(|property| self.build_property(property)))
    }

    /// Raw property data, fetched through the loader. Objects without a
    /// handle have nothing to fetch and report no properties.
    pub(crate) fn subproperties(&self) -> Result<Arc<SubpropertiesMirror>, LoadError> {
        if self.mirror.handle().is_none() {
            debug!(value_type = %self.mirror.value_type(), "object has no handle, no properties");
            return Ok(Arc::default());
        }
        self.loader.load_subproperties(&self.mirror)
    }

    pub(crate) fn build_property(&self, property: &PropertyMirror) -> PropertyProxy {
        PropertyProxy::from_mirror(&self.loader, property, self.capabilities)
    }

    fn build(&self, properties: &[PropertyMirror]) -> Vec<PropertyProxy> {
        properties.iter().map(|property| self.build_property(property)).collect()
    }
}
