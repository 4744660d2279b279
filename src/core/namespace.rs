//! PSR-4 namespaces bound to one or more directories.
//!
//! A [`Namespace`] is an identifier plus the canonical directories that
//! together hold it. A namespace split across several roots (the same
//! identifier mapped to more than one directory) is a single value whose
//! `paths` lists every root in supply order.

use crate::core::error::PackdocError;
use crate::core::identifier;
use std::collections::BTreeMap;
use std::collections::btree_map;
use std::ffi::OsString;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::trace;

/// An identifier bound to the directories that hold it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Namespace {
    id: String,
    paths: Vec<PathBuf>,
}

/// Shared capabilities of namespaces and the packages built on them.
pub trait NamespaceLike {
    fn as_namespace(&self) -> &Namespace;

    fn id(&self) -> &str {
        &self.as_namespace().id
    }

    fn paths(&self) -> &[PathBuf] {
        &self.as_namespace().paths
    }

    fn parent_id(&self) -> Option<&str> {
        identifier::parent(self.id())
    }

    fn find_namespace(&self, id: &str) -> Option<Namespace> {
        self.as_namespace().find(id)
    }

    fn iter_namespaces(&self) -> Result<SubNamespaces, PackdocError> {
        self.as_namespace().children()
    }
}

impl NamespaceLike for Namespace {
    fn as_namespace(&self) -> &Namespace {
        self
    }
}

impl Namespace {
    /// Builds a namespace, canonicalising every path.
    ///
    /// Fails on an identifier with illegal characters, an identifier that is
    /// empty once separators are trimmed, no paths at all, or any path that
    /// does not exist. Duplicate paths collapse onto their first occurrence.
    pub fn new<I, P>(id: &str, paths: I) -> Result<Self, PackdocError>
    where
        I: IntoIterator<Item = P>,
        P: AsRef<Path>,
    {
        if !identifier::is_valid(id) {
            return Err(PackdocError::InvalidIdentifier(id.to_string()));
        }
        let trimmed = identifier::trim(id);
        if trimmed.is_empty() {
            return Err(PackdocError::InvalidIdentifier(id.to_string()));
        }

        let mut resolved = Vec::new();
        for path in paths {
            let path = path.as_ref();
            let real = fs::canonicalize(path)
                .map_err(|_| PackdocError::InvalidPath(path.to_path_buf()))?;
            resolved.push(real);
        }
        if resolved.is_empty() {
            return Err(PackdocError::EmptyNamespace(trimmed.to_string()));
        }

        trace!(id = trimmed, paths = resolved.len(), "namespace");
        Ok(Self::from_resolved(trimmed.to_string(), resolved))
    }

    /// Builds a namespace from an already validated id and canonical paths.
    fn from_resolved(id: String, paths: Vec<PathBuf>) -> Self {
        let mut unique: Vec<PathBuf> = Vec::with_capacity(paths.len());
        for path in paths {
            if !unique.contains(&path) {
                unique.push(path);
            }
        }
        Self { id, paths: unique }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn paths(&self) -> &[PathBuf] {
        &self.paths
    }

    /// Resolves a descendant namespace by fully-qualified identifier.
    ///
    /// The containment test is a plain string prefix on the trimmed id, so
    /// `Test\PackageX` is looked up under `Test\Package` as the directory
    /// `PackageX` next to `Package`.
    pub fn find(&self, id: &str) -> Option<Namespace> {
        if !identifier::is_valid(id) {
            return None;
        }
        let name = identifier::trim(id);
        let relative = name.strip_prefix(self.id.as_str())?;
        let relative_path = relative.replace(identifier::SEPARATOR, "/");

        let paths: Vec<PathBuf> = self
            .paths
            .iter()
            .filter_map(|base| {
                let mut candidate = OsString::from(base.as_os_str());
                candidate.push(&relative_path);
                fs::canonicalize(PathBuf::from(candidate)).ok()
            })
            .collect();
        if paths.is_empty() {
            return None;
        }

        Some(Self::from_resolved(format!("{}{}", self.id, relative), paths))
    }

    /// Lists the immediate child namespaces across every path.
    ///
    /// Children with the same directory name under different roots merge
    /// into one namespace. Names that are not valid identifiers are skipped.
    /// The listing happens up front; children are built as the iterator is
    /// pulled, sorted by name.
    pub fn children(&self) -> Result<SubNamespaces, PackdocError> {
        let mut spaces: BTreeMap<String, Vec<PathBuf>> = BTreeMap::new();
        for path in &self.paths {
            for entry in fs::read_dir(path)? {
                let entry = entry?;
                let child = entry.path();
                if !child.is_dir() {
                    continue;
                }
                let Some(name) = entry.file_name().to_str().map(str::to_string) else {
                    continue;
                };
                if !identifier::is_valid(&name) {
                    trace!(name = %name, "skipping directory with illegal namespace name");
                    continue;
                }
                let real = fs::canonicalize(&child)?;
                spaces.entry(name).or_default().push(real);
            }
        }

        Ok(SubNamespaces {
            parent: self.id.clone(),
            inner: spaces.into_iter(),
        })
    }
}

/// Child namespaces of a [`Namespace`], in ascending name order.
#[derive(Debug)]
pub struct SubNamespaces {
    parent: String,
    inner: btree_map::IntoIter<String, Vec<PathBuf>>,
}

impl Iterator for SubNamespaces {
    type Item = Namespace;

    fn next(&mut self) -> Option<Namespace> {
        let (name, paths) = self.inner.next()?;
        Some(Namespace::from_resolved(
            identifier::join(&self.parent, &name),
            paths,
        ))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl ExactSizeIterator for SubNamespaces {}
