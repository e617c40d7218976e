//! Diagnostics for an existing installation. Never changes the host.

use crate::cli::CliContext;
use crate::constants;
use crate::util::{fs as ufs, path as upath, systemd};
use anyhow::{bail, Context, Result};
use clap::Args;
use nix::unistd::User;
use sha2::{Digest, Sha256};
use std::fs;
use std::path::Path;

#[cfg(unix)]
use std::os::unix::fs::MetadataExt;

#[derive(Args, Debug)]
pub struct DoctorArgs {
    /// Skip the systemctl is-enabled/is-active queries
    #[arg(long)]
    pub no_systemctl: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Level {
    Pass,
    Warn,
    Fail,
}

#[derive(Debug, Clone)]
pub struct Finding {
    pub level: Level,
    pub message: String,
}

impl Finding {
    fn pass(message: String) -> Self {
        Self {
            level: Level::Pass,
            message,
        }
    }

    fn warn(message: String) -> Self {
        Self {
            level: Level::Warn,
            message,
        }
    }

    fn fail(message: String) -> Self {
        Self {
            level: Level::Fail,
            message,
        }
    }
}

pub fn run(ctx: &CliContext, args: DoctorArgs) -> Result<()> {
    let state = &ctx.state;
    println!("Doctor: {} ({})", state.service, ctx.paths);

    let mut findings = Vec::new();

    let uid = match User::from_name(&state.user) {
        Ok(Some(user)) => {
            findings.push(Finding::pass(format!("account {} exists", state.user)));
            Some(user.uid.as_raw())
        }
        Ok(None) => {
            findings.push(Finding::fail(format!("account {} missing", state.user)));
            None
        }
        Err(e) => {
            findings.push(Finding::warn(format!("account lookup failed: {}", e)));
            None
        }
    };

    findings.push(check_binary(&state.installed_binary));
    findings.push(check_mode("unit file", &state.unit_path, |m| {
        m == constants::UNIT_FILE_MODE
    }));
    findings.push(check_mode("environment file", &state.env_file, ufs::is_owner_only));
    findings.push(check_dir("data directory", &state.data_dir, uid));
    findings.push(check_dir("log directory", &state.log_dir, uid));
    findings.push(compare_state(&ctx.paths.legacy_state, &state.state_file));

    if !args.no_systemctl {
        findings.push(unit_state_finding(
            "enabled",
            systemd::unit_state("is-enabled", &state.unit_name),
        ));
        findings.push(unit_state_finding(
            "active",
            systemd::unit_state("is-active", &state.unit_name),
        ));
    }

    let mut ok = 0u32;
    let mut warn = 0u32;
    let mut fail = 0u32;
    for f in &findings {
        let tag = match f.level {
            Level::Pass => {
                ok += 1;
                "PASS"
            }
            Level::Warn => {
                warn += 1;
                "WARN"
            }
            Level::Fail => {
                fail += 1;
                "FAIL"
            }
        };
        println!("  [{}] {}", tag, f.message);
    }

    println!();
    println!("Doctor summary: {} pass, {} warn, {} fail", ok, warn, fail);
    if fail > 0 {
        bail!("{} check(s) failed; re-run the installer to repair", fail);
    }
    Ok(())
}

fn check_binary(path: &Path) -> Finding {
    if upath::is_executable_file(path) {
        Finding::pass(format!("binary installed: {}", path.display()))
    } else if path.exists() {
        Finding::fail(format!("binary not executable: {}", path.display()))
    } else {
        Finding::fail(format!("binary missing: {}", path.display()))
    }
}

fn check_mode(label: &str, path: &Path, accept: impl Fn(u32) -> bool) -> Finding {
    if !path.exists() {
        return Finding::fail(format!("{} missing: {}", label, path.display()));
    }
    match ufs::mode(path) {
        Ok(mode) if accept(mode) => Finding::pass(format!("{} mode ok: {:04o}", label, mode)),
        Ok(mode) => Finding::fail(format!(
            "{} mode {:04o} on {}",
            label,
            mode,
            path.display()
        )),
        Err(e) => Finding::warn(format!("{}: {:#}", label, e)),
    }
}

/// `uid` is the service account's; ownership is only checked when known.
fn check_dir(label: &str, path: &Path, uid: Option<u32>) -> Finding {
    let meta = match fs::metadata(path) {
        Ok(meta) if meta.is_dir() => meta,
        Ok(_) => return Finding::fail(format!("{} is not a directory: {}", label, path.display())),
        Err(_) => return Finding::fail(format!("{} missing: {}", label, path.display())),
    };
    #[cfg(unix)]
    {
        if let Some(uid) = uid {
            if meta.uid() != uid {
                return Finding::fail(format!(
                    "{} owned by uid {} (expected {}): {}",
                    label,
                    meta.uid(),
                    uid,
                    path.display()
                ));
            }
        }
    }
    #[cfg(not(unix))]
    let _ = (meta, uid);
    Finding::pass(format!("{} present: {}", label, path.display()))
}

/// A legacy state file next to the installer should match the migrated copy.
fn compare_state(legacy: &Path, migrated: &Path) -> Finding {
    if !legacy.is_file() {
        return Finding::pass("no legacy state file to migrate".to_string());
    }
    let legacy_sum = match sha256_file(legacy) {
        Ok(sum) => sum,
        Err(e) => return Finding::warn(format!("{:#}", e)),
    };
    match sha256_file(migrated) {
        Ok(sum) if sum == legacy_sum => {
            Finding::pass(format!("state file migrated: {}", migrated.display()))
        }
        // The daemon rewrites its state after the install copied it.
        Ok(_) => Finding::warn(format!(
            "{} differs from {} (the daemon may have updated it)",
            migrated.display(),
            legacy.display()
        )),
        Err(_) if !migrated.exists() && is_searchable(migrated) => Finding::fail(format!(
            "legacy state {} not migrated to {}",
            legacy.display(),
            migrated.display()
        )),
        Err(_) => Finding::warn(format!(
            "cannot read {} (run doctor with sudo to compare)",
            migrated.display()
        )),
    }
}

/// True when the parent directory can be listed, so a missing file is really missing.
fn is_searchable(path: &Path) -> bool {
    path.parent().map(|p| fs::read_dir(p).is_ok()).unwrap_or(false)
}

fn sha256_file(path: &Path) -> Result<String> {
    let bytes = fs::read(path).with_context(|| format!("read {}", path.display()))?;
    Ok(format!("{:064x}", Sha256::digest(&bytes)))
}

fn unit_state_finding(query: &str, answer: Option<String>) -> Finding {
    match answer.as_deref() {
        Some(a) if a == query => Finding::pass(format!("unit is {}", a)),
        Some(a) => Finding::warn(format!("unit is {} (expected {})", a, query)),
        None => Finding::warn(format!("could not query whether the unit is {}", query)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[cfg(unix)]
    fn write_mode(path: &Path, contents: &str, mode: u32) {
        use std::os::unix::fs::PermissionsExt;
        fs::write(path, contents).unwrap();
        fs::set_permissions(path, fs::Permissions::from_mode(mode)).unwrap();
    }

    #[cfg(unix)]
    #[test]
    fn test_env_file_mode_must_be_owner_only() {
        let dir = TempDir::new().unwrap();
        let env = dir.path().join("bot");
        write_mode(&env, "DISCORD_TOKEN=x\n", 0o600);
        assert_eq!(
            check_mode("environment file", &env, ufs::is_owner_only).level,
            Level::Pass
        );
        write_mode(&env, "DISCORD_TOKEN=x\n", 0o644);
        assert_eq!(
            check_mode("environment file", &env, ufs::is_owner_only).level,
            Level::Fail
        );
    }

    #[test]
    fn test_missing_file_fails() {
        let dir = TempDir::new().unwrap();
        let f = check_mode("unit file", &dir.path().join("absent.service"), |_| true);
        assert_eq!(f.level, Level::Fail);
        assert!(f.message.contains("missing"));
    }

    #[cfg(unix)]
    #[test]
    fn test_binary_must_be_executable() {
        let dir = TempDir::new().unwrap();
        let bin = dir.path().join("daily-checkin-bot");
        write_mode(&bin, "#!/bin/sh\n", 0o644);
        assert_eq!(check_binary(&bin).level, Level::Fail);
        write_mode(&bin, "#!/bin/sh\n", 0o755);
        assert_eq!(check_binary(&bin).level, Level::Pass);
    }

    #[cfg(unix)]
    #[test]
    fn test_dir_owner_checked() {
        let dir = TempDir::new().unwrap();
        let mine = fs::metadata(dir.path()).unwrap().uid();
        assert_eq!(check_dir("data directory", dir.path(), Some(mine)).level, Level::Pass);
        assert_eq!(
            check_dir("data directory", dir.path(), Some(mine.wrapping_add(1))).level,
            Level::Fail
        );
        assert_eq!(check_dir("data directory", dir.path(), None).level, Level::Pass);
    }

    #[test]
    fn test_state_comparison() {
        let dir = TempDir::new().unwrap();
        let legacy = dir.path().join("bot_data.json");
        let migrated_dir = dir.path().join("data");
        fs::create_dir(&migrated_dir).unwrap();
        let migrated = migrated_dir.join("bot_data.json");

        assert_eq!(compare_state(&legacy, &migrated).level, Level::Pass);

        fs::write(&legacy, "{\"users\":{}}").unwrap();
        assert_eq!(compare_state(&legacy, &migrated).level, Level::Fail);

        fs::write(&migrated, "{\"users\":{}}").unwrap();
        assert_eq!(compare_state(&legacy, &migrated).level, Level::Pass);

        fs::write(&migrated, "{\"users\":{\"1\":3}}").unwrap();
        assert_eq!(compare_state(&legacy, &migrated).level, Level::Warn);
    }

    #[test]
    fn test_unit_state_answers() {
        assert_eq!(
            unit_state_finding("enabled", Some("enabled".into())).level,
            Level::Pass
        );
        assert_eq!(
            unit_state_finding("active", Some("inactive".into())).level,
            Level::Warn
        );
        assert_eq!(unit_state_finding("active", None).level, Level::Warn);
    }
}
