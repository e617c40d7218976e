//! Install root resolution and source artifact locations.

use crate::constants;
use crate::models::config::InstallerFile;
use anyhow::{Context, Result};
use std::env;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone)]
pub struct InstallPaths {
    pub root: PathBuf,
    pub config: PathBuf,
    pub binary: PathBuf,
    pub unit_template: PathBuf,
    pub legacy_state: PathBuf,
}

impl InstallPaths {
    /// Resolve the install root from CLI arg, env var, or auto-detection.
    pub fn resolve_root(root_arg: Option<PathBuf>) -> Result<PathBuf> {
        if let Some(root) = root_arg {
            return Ok(root);
        }
        if let Ok(root) = env::var(constants::ROOT_ENV) {
            return Ok(PathBuf::from(root));
        }
        let cwd = env::current_dir().context("resolve current directory")?;
        for ancestor in cwd.ancestors() {
            if looks_like_root(ancestor) {
                return Ok(ancestor.to_path_buf());
            }
        }
        Ok(cwd)
    }

    /// Locate source artifacts under `root` as configured by `file`.
    pub fn from_root(root: PathBuf, file: &InstallerFile) -> Self {
        let name = &file.service.name;
        let binary = file
            .sources
            .binary
            .clone()
            .unwrap_or_else(|| default_binary_source(name));
        let unit_template = file
            .sources
            .unit_template
            .clone()
            .unwrap_or_else(|| PathBuf::from(format!("{}.service", name)));
        Self {
            config: root.join(constants::CONFIG_FILE),
            binary: resolve_path(&root, binary),
            unit_template: resolve_path(&root, unit_template),
            legacy_state: resolve_path(&root, file.sources.legacy_state.clone()),
            root,
        }
    }
}

/// Cargo release output for `name`; the stock service uses the constant as-is.
fn default_binary_source(name: &str) -> PathBuf {
    let stock = PathBuf::from(constants::DEFAULT_BINARY_SOURCE);
    if name == constants::DEFAULT_SERVICE_NAME {
        stock
    } else {
        stock.with_file_name(name)
    }
}

fn looks_like_root(path: &Path) -> bool {
    path.join("Cargo.toml").is_file()
        && (path.join(constants::CONFIG_FILE).is_file()
            || path
                .join(format!("{}.service", constants::DEFAULT_SERVICE_NAME))
                .is_file())
}

fn resolve_path(root: &Path, path: PathBuf) -> PathBuf {
    if path.is_absolute() {
        path
    } else {
        root.join(path)
    }
}

impl std::fmt::Display for InstallPaths {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "installer@{}", self.root.display())
    }
}
