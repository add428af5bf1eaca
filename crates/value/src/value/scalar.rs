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

use crate::{LoadError, SharedLoader, ValueMirror};

/// Proxy for primitives, `undefined`, `null` and unrecognized types.
#[derive(derive_more::Debug)]
pub struct ScalarValue {
    #[debug(skip)]
    loader: SharedLoader,
    mirror: Arc<ValueMirror>,
}

impl ScalarValue {
    pub(crate) fn new(loader: SharedLoader, mirror: Arc<ValueMirror>) -> Self {
        Self { loader, mirror }
    }

    /// The mirror this proxy was built from
    pub fn mirror(&self) -> &Arc<ValueMirror> {
        &self.mirror
    }

    /// Returns true if the remote sent only a prefix of the value's text.
    pub fn is_truncated(&self) -> bool {
        self.mirror.is_truncated()
    }

    /// Returns the complete text of the value, fetching it through the
    /// loader when the remote truncated it.
    pub fn load_full_string(&self) -> Result<Arc<str>, LoadError> {
        if !self.is_truncated() {
            return Ok(Arc::from(self.mirror.text()));
        }
        self.loader.load_full_string(&self.mirror)
    }
}
