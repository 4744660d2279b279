//! Packages: namespaces promoted to a unit of functionality.
//!
//! A package is a collection of related classes forming a single unit,
//! the way a class is a collection of related functions. Packages may carry
//! one tier of sub-packages; a sub-package holds a shared handle to its
//! parent and never has children of its own.

use crate::core::namespace::{Namespace, NamespaceLike};
use std::sync::Arc;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Package {
    namespace: Namespace,
    parent: Option<Arc<Package>>,
}

impl Package {
    pub fn new(namespace: Namespace, parent: Option<Arc<Package>>) -> Self {
        Self { namespace, parent }
    }

    pub fn is_sub_package(&self) -> bool {
        self.parent.is_some()
    }

    /// The parent package, or `None` for a root package.
    pub fn parent(&self) -> Option<&Package> {
        self.parent.as_deref()
    }

    /// The shared parent handle, for identity comparisons with `Arc::ptr_eq`.
    pub fn parent_handle(&self) -> Option<&Arc<Package>> {
        self.parent.as_ref()
    }

    pub fn namespace(&self) -> &Namespace {
        &self.namespace
    }
}

impl NamespaceLike for Package {
    fn as_namespace(&self) -> &Namespace {
        &self.namespace
    }
}
