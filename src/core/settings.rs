//! Loading and validation of `installer.toml`.

use crate::models::config::InstallerFile;
use anyhow::{bail, Context, Result};
use std::fs;
use std::path::Path;

/// Load `installer.toml`; a missing file yields the defaults.
pub fn load(path: &Path) -> Result<InstallerFile> {
    if !path.exists() {
        return Ok(InstallerFile::default());
    }
    let content = fs::read_to_string(path)
        .with_context(|| format!("read installer config {}", path.display()))?;
    let file: InstallerFile = toml::from_str(&content)
        .with_context(|| format!("parse installer config {}", path.display()))?;
    validate(&file)?;
    Ok(file)
}

fn validate(file: &InstallerFile) -> Result<()> {
    check_name("service.name", &file.service.name)?;
    if let Some(user) = &file.service.user {
        check_name("service.user", user)?;
    }
    if let Some(group) = &file.service.group {
        check_name("service.group", group)?;
    }
    for key in file.runtime.extra_environment.keys() {
        if key.is_empty()
            || !key
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '_')
        {
            bail!("runtime.extra_environment: invalid key '{}'", key);
        }
    }
    Ok(())
}

fn check_name(field: &str, value: &str) -> Result<()> {
    if value.is_empty() {
        bail!("{}: cannot be empty", field);
    }
    if value.starts_with('-') {
        bail!("{}: cannot start with '-'", field);
    }
    if !value
        .chars()
        .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_' || c == '-')
    {
        bail!("{}: only [a-z0-9_-] allowed, got '{}'", field, value);
    }
    Ok(())
}
