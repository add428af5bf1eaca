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

//! Mirror context.
//!
//! Ties a session loader to the configured capability defaults so that every
//! binding created for the session, including properties loaded later from
//! its values, starts with the same capabilities.

use std::sync::Arc;

use jsdb_common::MirrorConfig;
use tracing::debug;

use crate::{
    create_value_with, PropertyProxy, RawName, SharedLoader, ValueMirror, ValueProxy,
    VariableCapabilities, VariableProxy,
};

/// Entry point for building proxies in one debugger session.
#[derive(derive_more::Debug, Clone)]
pub struct MirrorContext {
    #[debug(skip)]
    loader: SharedLoader,
    capabilities: VariableCapabilities,
}

impl MirrorContext {
    /// Creates a context with the protocol's default capabilities.
    pub fn new(loader: SharedLoader) -> Self {
        Self { loader, capabilities: VariableCapabilities::default() }
    }

    /// Creates a context using the capability defaults from `config`.
    pub fn from_config(loader: SharedLoader, config: &MirrorConfig) -> Self {
        debug!(capabilities = ?config.capabilities, "creating mirror context");
        Self { loader, capabilities: config.capabilities.into() }
    }

    /// The session loader
    pub fn loader(&self) -> &SharedLoader {
        &self.loader
    }

    /// Capabilities given to new bindings
    pub fn capabilities(&self) -> VariableCapabilities {
        self.capabilities
    }

    /// Builds a value proxy for `mirror`.
    pub fn create_value(&self, mirror: impl Into<Arc<ValueMirror>>) -> ValueProxy {
        create_value_with(&self.loader, mirror, self.capabilities)
    }

    /// Binds `raw_name` to `mirror`.
    pub fn create_variable(
        &self,
        mirror: impl Into<Arc<ValueMirror>>,
        raw_name: impl Into<RawName>,
    ) -> VariableProxy {
        VariableProxy::bind(Arc::clone(&self.loader), mirror, raw_name, self.capabilities)
    }

    /// Binds a property `raw_name` to `mirror`.
    pub fn create_property(
        &self,
        mirror: impl Into<Arc<ValueMirror>>,
        raw_name: impl Into<RawName>,
    ) -> PropertyProxy {
        PropertyProxy::new(Arc::clone(&self.loader), mirror, raw_name)
            .with_capabilities(self.capabilities)
    }

    /// Binds every `(name, mirror)` pair, keeping the input order.
    pub fn create_variables<N, I>(&self, bindings: I) -> Vec<VariableProxy>
    where
        N: Into<RawName>,
        I: IntoIterator<Item = (N, ValueMirror)>,
    {
        bindings.into_iter().map(|(name, mirror)| self.create_variable(mirror, name)).collect()
    }
}
