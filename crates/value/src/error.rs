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

use thiserror::Error;

/// Errors raised by a [`ValueLoader`](crate::ValueLoader) while fetching deep value data.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LoadError {
    /// The mirror carries no remote handle, so there is nothing to fetch
    #[error("value has no remote handle")]
    NoHandle,
    /// The remote fetch failed
    #[error("failed to fetch data for handle {handle}: {message}")]
    Fetch {
        /// Remote handle of the value
        handle: u64,
        /// Rendered cause reported by the transport
        message: String,
    },
    /// An earlier fetch for this handle failed and the failure is cached
    #[error("data for handle {0} is unavailable after a failed fetch")]
    Unavailable(u64),
    /// The remote protocol has no support for the operation
    #[error("{0} is not supported by the remote protocol")]
    Unsupported(&'static str),
}

/// Errors raised by variable and property operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum VariableError {
    /// The operation requires a capability the binding does not have.
    /// Callers are expected to check [`JsVariable::is_mutable`](crate::JsVariable::is_mutable)
    /// before writing.
    #[error("{operation} is not supported on variable `{name}`")]
    UnsupportedOperation {
        /// Operation that was attempted
        operation: &'static str,
        /// Display name of the variable
        name: String,
    },
    /// The operation is not wired to the remote protocol yet. Hitting this
    /// is a contract violation by the caller.
    #[error("{operation} is not implemented")]
    NotImplemented {
        /// Operation that was attempted
        operation: &'static str,
    },
    /// A delegated load or write failed
    #[error(transparent)]
    Load(#[from] LoadError),
}
