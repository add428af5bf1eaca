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
//! JSDB Common - Shared functionality for JSDB components
//!
//! This crate provides the ambient pieces used by every JSDB crate:
//! logging setup, configuration loading, and the fetch cache that backs
//! lazy loading of remote data.

/// Three-state fetch cache for memoizing remote responses
pub mod cache;
/// Configuration for value mirroring, loaded from TOML
pub mod config;
/// Logging setup and utilities for consistent logging across JSDB components
pub mod logging;

pub use cache::*;
pub use config::*;
pub use logging::*;
