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

//! Configuration for value mirroring.
//!
//! The configuration lives in `~/.jsdb/config.toml` by default:
//!
//! ```toml
//! [capabilities]
//! mutable = false
//! readable = true
//!
//! [loader]
//! cache_strings = true
//! ```

use std::{
    fs,
    path::{Path, PathBuf},
};

use eyre::{Context, Result};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

/// Top-level configuration for the value mirroring layer
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MirrorConfig {
    /// Capability defaults applied to newly constructed variables
    pub capabilities: CapabilityConfig,
    /// Value loader behavior
    pub loader: LoaderConfig,
}

/// What the remote protocol lets us do with a variable.
///
/// The protocol currently offers no write support and no read restrictions,
/// so the defaults are `mutable = false` and `readable = true`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CapabilityConfig {
    /// Whether variables accept writes
    pub mutable: bool,
    /// Whether variables can be read
    pub readable: bool,
}

impl Default for CapabilityConfig {
    fn default() -> Self {
        Self { mutable: false, readable: true }
    }
}

/// Value loader configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoaderConfig {
    /// Remember full strings fetched for truncated values
    pub cache_strings: bool,
}

impl Default for LoaderConfig {
    fn default() -> Self {
        Self { cache_strings: true }
    }
}

impl MirrorConfig {
    /// Get the default configuration file path: `~/.jsdb/config.toml`
    pub fn config_path() -> Result<PathBuf> {
        let home = dirs_next::home_dir()
            .ok_or_else(|| eyre::eyre!("Unable to determine home directory"))?;
        Ok(home.join(".jsdb").join("config.toml"))
    }

    /// Load configuration from `path`
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {path:?}"))?;
        let config = Self::from_toml(&content)?;
        debug!("Loaded configuration from {:?}", path);
        Ok(config)
    }

    /// Load configuration from the default location, falling back to
    /// defaults when the file does not exist
    pub fn load_or_default() -> Result<Self> {
        Self::load_or_default_from(Self::config_path()?)
    }

    /// Load configuration from `path`, falling back to defaults when the
    /// file does not exist
    pub fn load_or_default_from(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            info!("Config file not found at {:?}, using defaults", path);
            return Ok(Self::default());
        }
        Self::load(path)
    }

    /// Parse configuration from a TOML string
    pub fn from_toml(content: &str) -> Result<Self> {
        toml::from_str(content).with_context(|| "Failed to parse config file as TOML")
    }

    /// Save configuration to `path`, creating parent directories as needed
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create config directory: {parent:?}"))?;
        }

        let content =
            toml::to_string_pretty(self).with_context(|| "Failed to serialize config to TOML")?;
        fs::write(path, content)
            .with_context(|| format!("Failed to write config file: {path:?}"))?;

        debug!("Saved configuration to {:?}", path);
        Ok(())
    }
}
