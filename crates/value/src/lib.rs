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

// Copyright (C) 2024 Zhuo Zhang and Wuqi Zhang
// SPDX-License-Identifier: AGPL-3.0
//! JSDB Value - local proxies for remote JavaScript values
//!
//! A debugger session reports remote values as [`ValueMirror`]s. This crate
//! turns them into local proxies:
//!
//! - [`create_value`] dispatches on the remote type tag and builds a
//!   [`ValueProxy`] (scalar, object, array or function).
//! - [`VariableProxy`] binds a name or index to a value proxy and carries the
//!   mutability and readability capabilities of the binding.
//! - [`PropertyProxy`] is a variable describing an object property, with
//!   accessor metadata on top.
//!
//! Proxies are cheap to build. Deep data (object properties, full strings)
//! is fetched on first access through a [`ValueLoader`], which owns the
//! session cache.

/// Mirror context applying configured capabilities to new bindings
pub mod context;
/// Error types for loading and variable operations
pub mod error;
/// Value loader trait and the caching loader implementation
pub mod loader;
/// Immutable snapshots of remote values as reported by the protocol layer
pub mod mirror;
/// Object property proxies with accessor metadata
pub mod property;
/// Fixtures for exercising proxies without a live session
#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;
/// Value proxies and the polymorphic value factory
pub mod value;
/// Variable proxies binding names to values
pub mod variable;

pub use context::*;
pub use error::*;
pub use loader::*;
pub use mirror::*;
pub use property::*;
pub use value::*;
pub use variable::*;
