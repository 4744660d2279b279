use std::io;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum PackdocError {
    #[error("Invalid namespace identifier: '{0}'")]
    InvalidIdentifier(String),
    #[error("Invalid path: '{}'", .0.display())]
    InvalidPath(PathBuf),
    #[error("Namespace '{0}' has no paths")]
    EmptyNamespace(String),
    #[error("Multiple readme files found in package '{package}': {}", display_paths(.paths))]
    AmbiguousDocumentation { package: String, paths: Vec<PathBuf> },
    #[error("Manifest not found: '{}'", .0.display())]
    ManifestNotFound(PathBuf),
    #[error("Manifest error: {0}")]
    ManifestParse(String),
    #[error("Config error: {0}")]
    ConfigError(String),
    #[error("Not found: {0}")]
    NotFound(String),
    #[error("I/O error: {0}")]
    IoError(#[from] io::Error),
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),
}

fn display_paths(paths: &[PathBuf]) -> String {
    paths
        .iter()
        .map(|p| p.display().to_string())
        .collect::<Vec<_>>()
        .join(", ")
}
