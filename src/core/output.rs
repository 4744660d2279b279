//! Rendering of package listings for CLI surfaces.

use crate::core::namespace::NamespaceLike;
use crate::core::package::Package;
use crate::core::readme::Readme;
use colored::Colorize;
use serde::Serialize;
use sha2::{Digest, Sha256};

#[derive(Debug, Clone, Serialize)]
pub struct PackageSummary {
    pub id: String,
    pub paths: Vec<String>,
    pub parent: Option<String>,
    pub sub_package: bool,
}

impl From<&Package> for PackageSummary {
    fn from(package: &Package) -> Self {
        Self {
            id: package.id().to_string(),
            paths: package
                .paths()
                .iter()
                .map(|p| p.display().to_string())
                .collect(),
            parent: package.parent().map(|p| p.id().to_string()),
            sub_package: package.is_sub_package(),
        }
    }
}

/// Documentation of one package, as emitted by `packdoc show --format json`.
#[derive(Debug, Clone, Serialize)]
pub struct DocumentReport {
    #[serde(flatten)]
    pub package: PackageSummary,
    pub readme: Option<String>,
    pub hash: Option<String>,
    pub content: String,
}

impl DocumentReport {
    pub fn new(package: &Package, readme: &Readme, content: String) -> Self {
        let hash = readme.exists().then(|| {
            let mut hasher = Sha256::new();
            hasher.update(content.as_bytes());
            format!("{:x}", hasher.finalize())
        });
        Self {
            package: PackageSummary::from(package),
            readme: readme.path().map(|p| p.display().to_string()),
            hash,
            content,
        }
    }
}

/// One line per package; sub-packages are indented under their parent.
pub fn render_package_list(packages: &[Package]) -> String {
    let mut out = String::new();
    for package in packages {
        if package.is_sub_package() {
            out.push_str(&format!("  {} {}\n", "└".dimmed(), package.id()));
        } else {
            out.push_str(&format!("{}\n", package.id().bold()));
        }
        for path in package.paths() {
            let indent = if package.is_sub_package() { "    " } else { "  " };
            out.push_str(&format!("{}{}\n", indent, path.display().to_string().dimmed()));
        }
    }
    out
}

pub fn package_list_json(packages: &[Package]) -> serde_json::Value {
    let summaries: Vec<PackageSummary> = packages.iter().map(PackageSummary::from).collect();
    serde_json::json!({
        "count": summaries.len(),
        "packages": summaries,
    })
}
