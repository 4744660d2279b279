//! composer.json namespace mappings.
//!
//! Reads the `autoload.psr-4` and `autoload-dev.psr-4` sections and turns
//! every existing `namespace => path` pair into a single-path [`Namespace`].
//! Mapped paths that do not exist are skipped, unlike [`Namespace::new`],
//! which refuses them.

use crate::core::error::PackdocError;
use crate::core::identifier;
use crate::core::namespace::Namespace;
use serde_json::Value;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Default manifest file name.
pub const MANIFEST_FILE: &str = "composer.json";

const AUTOLOAD_SECTIONS: [&str; 2] = ["autoload", "autoload-dev"];

#[derive(Debug, Clone)]
pub struct Manifest {
    path: PathBuf,
    namespaces: Vec<Namespace>,
}

impl Manifest {
    /// Reads a manifest including its development mappings.
    pub fn open(path: &Path) -> Result<Self, PackdocError> {
        Self::open_with(path, true)
    }

    /// Reads a manifest, optionally skipping the `autoload-dev` section.
    pub fn open_with(path: &Path, include_dev: bool) -> Result<Self, PackdocError> {
        let path =
            fs::canonicalize(path).map_err(|_| PackdocError::ManifestNotFound(path.into()))?;
        let content = fs::read_to_string(&path)?;
        let json: Value = serde_json::from_str(&content)?;
        let root = path.parent().unwrap_or(Path::new("/"));

        let sections = if include_dev {
            &AUTOLOAD_SECTIONS[..]
        } else {
            &AUTOLOAD_SECTIONS[..1]
        };
        let mut namespaces = Vec::new();
        for section in sections {
            if let Some(config) = json.get(section).and_then(|s| s.get("psr-4")) {
                parse_namespaces(section, config, root, &mut namespaces)?;
            }
        }

        debug!(manifest = %path.display(), namespaces = namespaces.len(), "manifest loaded");
        Ok(Self { path, namespaces })
    }

    /// Canonical path of the manifest file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Directory the mapped paths are relative to.
    pub fn root(&self) -> &Path {
        self.path.parent().unwrap_or(Path::new("/"))
    }

    pub fn namespaces(&self) -> &[Namespace] {
        &self.namespaces
    }

    pub fn into_namespaces(self) -> Vec<Namespace> {
        self.namespaces
    }
}

fn parse_namespaces(
    section: &str,
    config: &Value,
    root: &Path,
    out: &mut Vec<Namespace>,
) -> Result<(), PackdocError> {
    let entries = match config {
        Value::Object(entries) => entries,
        // An empty PSR-4 map is often written as `[]`.
        Value::Array(items) if items.is_empty() => return Ok(()),
        Value::Null => return Ok(()),
        _ => {
            return Err(PackdocError::ManifestParse(format!(
                "{section}.psr-4 must be an object"
            )));
        }
    };

    for (name, paths) in entries {
        // The fallback mapping ("" => dir) has no namespace to contribute.
        if identifier::trim(name).is_empty() {
            debug!(section, "skipping fallback mapping");
            continue;
        }
        for relative in mapped_paths(section, name, paths)? {
            let candidate = root.join(relative);
            if !candidate.exists() {
                debug!(namespace = %name, path = %candidate.display(), "skipping missing path");
                continue;
            }
            out.push(Namespace::new(name, [candidate])?);
        }
    }
    Ok(())
}

fn mapped_paths<'v>(
    section: &str,
    name: &str,
    paths: &'v Value,
) -> Result<Vec<&'v str>, PackdocError> {
    let invalid = || {
        PackdocError::ManifestParse(format!(
            "{section}.psr-4 entry '{name}' must be a path or list of paths"
        ))
    };
    match paths {
        Value::String(path) => Ok(vec![path.as_str()]),
        Value::Array(items) => items
            .iter()
            .map(|item| item.as_str().ok_or_else(&invalid))
            .collect(),
        _ => Err(invalid()),
    }
}
