//! Core modules for package discovery and documentation.
//!
//! Namespaces and packages are the domain types; the finder walks them.
//! Manifest and readme readers sit at the edges, and the remaining modules
//! carry configuration, logging and output for the CLI.

pub mod config;
pub mod error;
pub mod finder;
pub mod identifier;
pub mod logging;
pub mod manifest;
pub mod markdown;
pub mod namespace;
pub mod output;
pub mod package;
pub mod readme;
