//! Configuration loaded from a TOML file.
//!
//! Every field has a default, so an empty or partial file is valid.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{CoreError, CoreResult};
use crate::fs::resolve::MAX_SYMLINK_HOPS;

/// Top-level configuration.
///
/// Call [`Config::load`] to read from a TOML path.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub resolve: ResolveConfig,
    #[serde(default)]
    pub listing: ListingConfig,
    #[serde(default)]
    pub subtitles: SubtitleConfig,
}

impl Config {
    /// Loads configuration from a TOML file at `path`.
    ///
    /// # Errors
    ///
    /// - [`CoreError::NotFound`] if the file does not exist.
    /// - [`CoreError::PermissionDenied`] if the file is not readable.
    /// - [`CoreError::ConfigParse`] if the TOML is malformed.
    pub fn load(path: &Path) -> CoreResult<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| match e.kind() {
            std::io::ErrorKind::NotFound => CoreError::NotFound(path.to_path_buf()),
            std::io::ErrorKind::PermissionDenied => CoreError::PermissionDenied(path.to_path_buf()),
            _ => CoreError::Io(e),
        })?;
        toml::from_str(&content).map_err(|e| CoreError::ConfigParse(e.to_string()))
    }
}

/// Symlink resolution settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolveConfig {
    #[serde(default = "default_max_hops")]
    pub max_hops: usize,
    #[serde(default = "default_true")]
    pub canonicalize_first: bool,
}

impl Default for ResolveConfig {
    fn default() -> Self {
        Self {
            max_hops: default_max_hops(),
            canonicalize_first: true,
        }
    }
}

/// Directory listing order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListingConfig {
    #[serde(default = "default_true")]
    pub natural_sort: bool,
}

impl Default for ListingConfig {
    fn default() -> Self {
        Self { natural_sort: true }
    }
}

/// Subtitle discovery for video items.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubtitleConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,
}

impl Default for SubtitleConfig {
    fn default() -> Self {
        Self { enabled: true }
    }
}

fn default_true() -> bool {
    true
}

fn default_max_hops() -> usize {
    MAX_SYMLINK_HOPS
}
