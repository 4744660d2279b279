//! Package documentation.
//!
//! A package documents itself with a single `readme.md` in one of its
//! directories. A split package may keep it in any of its roots, but only
//! one of them.

use crate::core::error::PackdocError;
use crate::core::finder::README_FILE;
use crate::core::markdown;
use crate::core::namespace::NamespaceLike;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Readme {
    path: Option<PathBuf>,
}

impl Readme {
    /// Locates the readme of a package (or any namespace).
    pub fn for_package<N: NamespaceLike + ?Sized>(package: &N) -> Result<Self, PackdocError> {
        Self::locate(package.id(), package.paths())
    }

    /// Locates a readme across `paths`; `owner` names them in errors.
    pub fn locate(owner: &str, paths: &[PathBuf]) -> Result<Self, PackdocError> {
        let mut found: Vec<PathBuf> = Vec::new();
        for path in paths {
            let candidate = path.join(README_FILE);
            if !candidate.is_file() {
                continue;
            }
            let real = fs::canonicalize(&candidate)?;
            if !found.contains(&real) {
                found.push(real);
            }
        }

        if found.len() > 1 {
            return Err(PackdocError::AmbiguousDocumentation {
                package: owner.to_string(),
                paths: found,
            });
        }
        let path = found.pop();
        debug!(package = owner, found = path.is_some(), "readme lookup");
        Ok(Self { path })
    }

    pub fn exists(&self) -> bool {
        self.path.is_some()
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Raw readme text, or an empty string when there is no readme.
    pub fn content(&self) -> Result<String, PackdocError> {
        match &self.path {
            Some(path) => Ok(fs::read_to_string(path)?),
            None => Ok(String::new()),
        }
    }

    /// Readme rendered as an HTML fragment.
    pub fn content_as_html(&self) -> Result<String, PackdocError> {
        Ok(markdown::to_html(&self.content()?))
    }
}
