//! `packdoc.toml` settings.
//!
//! ```toml
//! manifest = "composer.json"
//! package_roots = ["Company", "Company\\Project"]
//! include_dev = false
//! ```
//!
//! Every key is optional. A missing file means defaults.

use crate::core::error::PackdocError;
use crate::core::manifest::MANIFEST_FILE;
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

pub const CONFIG_FILE: &str = "packdoc.toml";

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PackdocConfig {
    /// Manifest path, relative to the config file's directory.
    pub manifest: PathBuf,
    pub package_roots: Vec<String>,
    /// Whether `autoload-dev` mappings are searched too.
    pub include_dev: bool,
}

impl Default for PackdocConfig {
    fn default() -> Self {
        Self {
            manifest: PathBuf::from(MANIFEST_FILE),
            package_roots: Vec::new(),
            include_dev: true,
        }
    }
}

impl PackdocConfig {
    /// Parses a config file, resolving `manifest` against its directory.
    pub fn from_file(path: &Path) -> Result<Self, PackdocError> {
        let content = fs::read_to_string(path)?;
        let mut config: PackdocConfig =
            toml::from_str(&content).map_err(|e| PackdocError::ConfigError(e.to_string()))?;
        if let Some(dir) = path.parent() {
            config.manifest = dir.join(&config.manifest);
        }
        Ok(config)
    }
}

/// Loads `packdoc.toml` from `dir`, falling back to defaults when absent.
///
/// The default manifest is resolved against `dir` either way.
pub fn load_config(dir: &Path) -> Result<PackdocConfig, PackdocError> {
    let config_path = dir.join(CONFIG_FILE);
    if config_path.exists() {
        return PackdocConfig::from_file(&config_path);
    }
    Ok(PackdocConfig {
        manifest: dir.join(MANIFEST_FILE),
        ..PackdocConfig::default()
    })
}
