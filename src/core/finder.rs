//! Package discovery across namespaces.
//!
//! The finder walks each package root in turn. For a root `R` it:
//!
//! 1. resolves `R` inside every supplied namespace and merges the hits into
//!    one (possibly split) root namespace whose children are packages;
//! 2. collects supplied namespaces that sit directly below `R` (their parent
//!    id is `R`), merging the ones that share an identifier;
//! 3. emits the packages from step 1, then those from step 2.
//!
//! A top-level package is emitted before its sub-packages are searched. If
//! any directory one level below the package holds a `readme.md`, every
//! immediate child directory becomes a sub-package. Sub-packages are never
//! searched for further children.
//!
//! Discovery is pull-driven: no directory is read until the consumer asks
//! for the next package.

use crate::core::error::PackdocError;
use crate::core::namespace::{Namespace, NamespaceLike, SubNamespaces};
use crate::core::package::Package;
use rayon::prelude::*;
use rustc_hash::FxHashMap;
use std::fs;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::debug;

/// File whose presence one level below a package marks its sub-packages.
pub const README_FILE: &str = "readme.md";

/// Finds packages under a list of package roots.
#[derive(Debug, Clone)]
pub struct Finder {
    namespaces: Vec<Namespace>,
    package_roots: Vec<String>,
}

impl Finder {
    pub fn new(namespaces: Vec<Namespace>, package_roots: Vec<String>) -> Self {
        Self {
            namespaces,
            package_roots,
        }
    }

    pub fn namespaces(&self) -> &[Namespace] {
        &self.namespaces
    }

    pub fn package_roots(&self) -> &[String] {
        &self.package_roots
    }

    /// Starts a fresh walk over every package root.
    pub fn iter(&self) -> Packages<'_> {
        Packages::new(&self.namespaces, &self.package_roots)
    }

    /// Collects every package, stopping at the first error.
    pub fn find_all(&self) -> Result<Vec<Package>, PackdocError> {
        self.iter().collect()
    }

    /// Like [`Finder::find_all`], scanning package roots concurrently.
    ///
    /// Each root is walked independently; results are concatenated in
    /// supplied-root order, so the output matches `find_all`.
    pub fn find_all_parallel(&self) -> Result<Vec<Package>, PackdocError> {
        let per_root = self
            .package_roots
            .par_iter()
            .map(|root| {
                Packages::new(&self.namespaces, std::slice::from_ref(root))
                    .collect::<Result<Vec<_>, _>>()
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(per_root.into_iter().flatten().collect())
    }
}

impl<'a> IntoIterator for &'a Finder {
    type Item = Result<Package, PackdocError>;
    type IntoIter = Packages<'a>;

    fn into_iter(self) -> Packages<'a> {
        self.iter()
    }
}

/// Pending work on the discovery stack. The top frame is resumed first.
#[derive(Debug)]
enum Frame {
    /// Children of a namespace, each loaded as a package with `parent`.
    Scan {
        children: SubNamespaces,
        parent: Option<Arc<Package>>,
    },
    /// Supplied namespaces sitting directly below the current root.
    Direct(std::vec::IntoIter<Namespace>),
    /// A top-level package already emitted, whose sub-packages are unsearched.
    SubPackages(Arc<Package>),
}

/// Lazy, depth-first stream of packages produced by a [`Finder`].
///
/// Yields `Err` at most once; the stream is finished after an error.
#[derive(Debug)]
pub struct Packages<'a> {
    namespaces: &'a [Namespace],
    roots: std::slice::Iter<'a, String>,
    stack: Vec<Frame>,
    failed: bool,
}

impl<'a> Packages<'a> {
    fn new(namespaces: &'a [Namespace], roots: &'a [String]) -> Self {
        Self {
            namespaces,
            roots: roots.iter(),
            stack: Vec::new(),
            failed: false,
        }
    }

    /// Resolves a package root and pushes its work, direct packages at the bottom.
    fn enter_root(&mut self, root: &str) -> Result<(), PackdocError> {
        let mut root_paths: Vec<PathBuf> = Vec::new();
        let mut direct_index: FxHashMap<&str, usize> = FxHashMap::default();
        let mut direct: Vec<(&str, Vec<PathBuf>)> = Vec::new();

        for namespace in self.namespaces {
            if let Some(found) = namespace.find_namespace(root) {
                root_paths.extend_from_slice(found.paths());
            }

            if namespace.parent_id() == Some(root) {
                let slot = *direct_index.entry(namespace.id()).or_insert_with(|| {
                    direct.push((namespace.id(), Vec::new()));
                    direct.len() - 1
                });
                direct[slot].1.extend_from_slice(namespace.paths());
            }
        }
        debug!(
            root,
            root_paths = root_paths.len(),
            direct = direct.len(),
            "entering package root"
        );

        let direct = direct
            .into_iter()
            .map(|(id, paths)| Namespace::new(id, paths))
            .collect::<Result<Vec<_>, _>>()?;
        self.stack.push(Frame::Direct(direct.into_iter()));

        if !root_paths.is_empty() {
            let namespace = Namespace::new(root, root_paths)?;
            self.stack.push(Frame::Scan {
                children: namespace.iter_namespaces()?,
                parent: None,
            });
        }
        Ok(())
    }

    /// Emits a package, queueing the sub-package search for top-level ones.
    fn load(&mut self, namespace: Namespace, parent: Option<Arc<Package>>) -> Package {
        match parent {
            Some(parent) => Package::new(namespace, Some(parent)),
            None => {
                let package = Arc::new(Package::new(namespace, None));
                self.stack.push(Frame::SubPackages(Arc::clone(&package)));
                Package::clone(&package)
            }
        }
    }

    fn advance(&mut self) -> Result<Option<Package>, PackdocError> {
        loop {
            let Some(frame) = self.stack.last_mut() else {
                match self.roots.next() {
                    Some(root) => {
                        self.enter_root(root)?;
                        continue;
                    }
                    None => return Ok(None),
                }
            };

            match frame {
                Frame::Scan { children, parent } => match children.next() {
                    Some(namespace) => {
                        let parent = parent.clone();
                        return Ok(Some(self.load(namespace, parent)));
                    }
                    None => {
                        self.stack.pop();
                    }
                },
                Frame::Direct(namespaces) => match namespaces.next() {
                    Some(namespace) => return Ok(Some(self.load(namespace, None))),
                    None => {
                        self.stack.pop();
                    }
                },
                Frame::SubPackages(package) => {
                    let package = Arc::clone(package);
                    self.stack.pop();
                    if has_nested_readme(package.paths())? {
                        debug!(package = package.id(), "inferring sub-packages");
                        self.stack.push(Frame::Scan {
                            children: package.iter_namespaces()?,
                            parent: Some(package),
                        });
                    }
                }
            }
        }
    }
}

impl Iterator for Packages<'_> {
    type Item = Result<Package, PackdocError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed {
            return None;
        }
        match self.advance() {
            Ok(package) => package.map(Ok),
            Err(e) => {
                self.failed = true;
                self.stack.clear();
                Some(Err(e))
            }
        }
    }
}

/// Returns true if any directory directly below one of `paths` holds a readme.
///
/// Dot-directories are ignored.
fn has_nested_readme(paths: &[PathBuf]) -> Result<bool, PackdocError> {
    for path in paths {
        for entry in fs::read_dir(path)? {
            let entry = entry?;
            let hidden = entry.file_name().to_string_lossy().starts_with('.');
            let child = entry.path();
            if hidden || !child.is_dir() {
                continue;
            }
            if child.join(README_FILE).is_file() {
                return Ok(true);
            }
        }
    }
    Ok(false)
}
