//! Preconditions checked before any host mutation.

use crate::constants;
use crate::core::host::Host;
use crate::core::paths::InstallPaths;
use anyhow::{bail, Result};
use serde::Serialize;

#[derive(Debug, Clone, Serialize)]
pub struct CheckResult {
    pub name: String,
    pub ok: bool,
    pub detail: String,
}

impl CheckResult {
    fn pass(name: &str, detail: String) -> Self {
        Self {
            name: name.to_string(),
            ok: true,
            detail,
        }
    }

    fn fail(name: &str, detail: String) -> Self {
        Self {
            name: name.to_string(),
            ok: false,
            detail,
        }
    }
}

/// Evaluate every precondition. Read-only.
pub fn checks<H: Host + ?Sized>(host: &H, paths: &InstallPaths) -> Vec<CheckResult> {
    let mut out = Vec::new();

    if host.is_root() {
        out.push(CheckResult::fail(
            "unprivileged",
            "running as root; run as a regular user, commands are escalated with sudo".into(),
        ));
    } else {
        out.push(CheckResult::pass("unprivileged", "not running as root".into()));
    }

    for tool in [constants::SYSTEMCTL, constants::SUDO] {
        match host.find_on_path(tool) {
            Some(found) => out.push(CheckResult::pass(tool, found.display().to_string())),
            None => out.push(CheckResult::fail(tool, format!("{} not found on PATH", tool))),
        }
    }

    if host.is_file(&paths.binary) {
        out.push(CheckResult::pass("binary", paths.binary.display().to_string()));
    } else {
        out.push(CheckResult::fail(
            "binary",
            format!(
                "{} missing (build it first: cargo build --release)",
                paths.binary.display()
            ),
        ));
    }

    if host.is_file(&paths.unit_template) {
        out.push(CheckResult::pass(
            "unit template",
            paths.unit_template.display().to_string(),
        ));
    } else {
        out.push(CheckResult::fail(
            "unit template",
            format!("{} missing", paths.unit_template.display()),
        ));
    }

    out
}

/// Print each check and fail with every unmet precondition.
pub fn validate<H: Host + ?Sized>(host: &H, paths: &InstallPaths) -> Result<()> {
    let results = checks(host, paths);
    for r in &results {
        let tag = if r.ok { "PASS" } else { "FAIL" };
        println!("  [{}] {}: {}", tag, r.name, r.detail);
    }
    let failed: Vec<_> = results.iter().filter(|r| !r.ok).collect();
    if !failed.is_empty() {
        let msg = failed
            .iter()
            .map(|r| format!("  - {}", r.detail))
            .collect::<Vec<_>>()
            .join("\n");
        bail!("preflight failed:\n{}", msg);
    }
    Ok(())
}
