//! Packdoc: package discovery and documentation for PSR-4 codebases.
//!
//! A PSR-4 codebase maps namespace prefixes onto directories. Packdoc treats
//! chosen namespaces as *package roots* and reports every package below
//! them, together with the package's `readme.md`.
//!
//! # Concepts
//!
//! - **Namespace**: an identifier (`Company\Project`) bound to one or more
//!   directories. The same identifier may be split across several roots.
//! - **Package**: a namespace directly below a package root.
//! - **Sub-package**: a directory directly below a package, when at least one
//!   directory at that level carries a `readme.md`. Only one tier exists.
//!
//! # Discovery order
//!
//! Package roots are walked in the order given. Within a root, packages come
//! out depth-first (each top-level package immediately followed by its
//! sub-packages), children sorted by name.
//!
//! # Examples
//!
//! ```bash
//! # List packages below the Company namespace
//! packdoc list --root Company
//!
//! # Render a package's readme as HTML
//! packdoc show 'Company\Library' --html
//! ```
//!
//! # Crate Structure
//!
//! - [`core`]: domain types, the finder, readers and CLI support

pub mod core;

pub use crate::core::error::PackdocError;
pub use crate::core::finder::{Finder, Packages};
pub use crate::core::manifest::Manifest;
pub use crate::core::namespace::{Namespace, NamespaceLike};
pub use crate::core::package::Package;
pub use crate::core::readme::Readme;

use crate::core::config::{self, PackdocConfig};
use crate::core::{identifier, logging, output};
use clap::{Parser, Subcommand};
use colored::Colorize;
use std::path::{Path, PathBuf};
use tracing::info;

#[derive(Parser, Debug)]
#[clap(
    name = "packdoc",
    version = env!("CARGO_PKG_VERSION"),
    about = "Discover PSR-4 packages and their documentation"
)]
struct Cli {
    /// Config file (defaults to ./packdoc.toml when present).
    #[clap(long, global = true)]
    config: Option<PathBuf>,
    /// Increase log verbosity (-v info, -vv debug, -vvv trace).
    #[clap(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,
    /// Disable colored output.
    #[clap(long, global = true)]
    no_color: bool,
    #[clap(subcommand)]
    command: Command,
}

/// Where namespaces come from and which roots to search.
#[derive(clap::Args, Debug)]
struct SourceArgs {
    /// Path to composer.json (overrides the config file).
    #[clap(long, short)]
    manifest: Option<PathBuf>,
    /// Package root namespace to search; may be repeated.
    #[clap(long = "root", short = 'r')]
    roots: Vec<String>,
    /// Ignore autoload-dev mappings.
    #[clap(long)]
    no_dev: bool,
}

#[derive(Debug, Clone, Copy, clap::ValueEnum)]
enum OutputFormat {
    Text,
    Json,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List packages in discovery order
    #[clap(name = "list", visible_alias = "ls")]
    List {
        #[clap(flatten)]
        source: SourceArgs,
        /// Output format: 'text' or 'json'.
        #[clap(long, value_enum, default_value = "text")]
        format: OutputFormat,
    },

    /// Print a package's readme
    #[clap(name = "show")]
    Show {
        /// Package identifier, e.g. 'Company\Library'.
        id: String,
        #[clap(flatten)]
        source: SourceArgs,
        /// Render the readme as HTML.
        #[clap(long)]
        html: bool,
        /// Output format: 'text' or 'json'.
        #[clap(long, value_enum, default_value = "text")]
        format: OutputFormat,
    },

    /// Show version information
    #[clap(name = "version")]
    Version,
}

pub fn run() -> Result<(), PackdocError> {
    let cli = Cli::parse();
    logging::init(cli.verbose);
    if cli.no_color {
        colored::control::set_override(false);
    }

    match cli.command {
        Command::Version => {
            println!("v{}", env!("CARGO_PKG_VERSION"));
        }
        Command::List { source, format } => {
            let finder = build_finder(cli.config.as_deref(), &source)?;
            let packages = finder.find_all()?;
            match format {
                OutputFormat::Text => print!("{}", output::render_package_list(&packages)),
                OutputFormat::Json => println!(
                    "{}",
                    serde_json::to_string_pretty(&output::package_list_json(&packages))?
                ),
            }
        }
        Command::Show {
            id,
            source,
            html,
            format,
        } => {
            let finder = build_finder(cli.config.as_deref(), &source)?;
            let wanted = identifier::trim(&id);
            let package = finder
                .iter()
                .find(|found| found.as_ref().map_or(true, |p| p.id() == wanted))
                .transpose()?
                .ok_or_else(|| PackdocError::NotFound(format!("package '{}'", wanted)))?;

            let readme = Readme::for_package(&package)?;
            let content = if html {
                readme.content_as_html()?
            } else {
                readme.content()?
            };

            match format {
                OutputFormat::Text => {
                    if !readme.exists() {
                        eprintln!(
                            "{} No readme.md in {}",
                            "ℹ".bright_blue(),
                            package.id().bright_white()
                        );
                    }
                    print!("{}", content);
                    if !content.is_empty() && !content.ends_with('\n') {
                        println!();
                    }
                }
                OutputFormat::Json => {
                    let report = output::DocumentReport::new(&package, &readme, content);
                    println!("{}", serde_json::to_string_pretty(&report)?);
                }
            }
        }
    }
    Ok(())
}

/// Resolves config, manifest and roots into a ready finder.
///
/// Command-line values win over the config file.
fn build_finder(config_path: Option<&Path>, source: &SourceArgs) -> Result<Finder, PackdocError> {
    let config = match config_path {
        Some(path) => PackdocConfig::from_file(path)?,
        None => config::load_config(&std::env::current_dir()?)?,
    };

    let manifest_path = source.manifest.clone().unwrap_or(config.manifest);
    let roots = if source.roots.is_empty() {
        config.package_roots
    } else {
        source.roots.clone()
    };
    if roots.is_empty() {
        return Err(PackdocError::ConfigError(
            "no package roots; pass --root or set package_roots in packdoc.toml".into(),
        ));
    }

    let manifest = Manifest::open_with(&manifest_path, config.include_dev && !source.no_dev)?;
    info!(
        manifest = %manifest.path().display(),
        namespaces = manifest.namespaces().len(),
        roots = roots.len(),
        "searching for packages"
    );
    Ok(Finder::new(manifest.into_namespaces(), roots))
}
