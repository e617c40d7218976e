//! Environment file carrying the bot token and log directive.
//!
//! The file is rendered into a private staging file (mode 0600 from the
//! moment it exists) and placed with `install -m 0600 -o root`, so neither
//! copy is ever readable by group or others.

use crate::constants;
use crate::core::action::Action;
use crate::core::host::Host;
use crate::models::credential::{Credential, LogDirective};
use crate::models::system_state::SystemState;
use crate::util::fs as host_fs;
use anyhow::{Context, Result};
use std::io::Write;
use std::path::Path;
use tempfile::NamedTempFile;
use zeroize::Zeroizing;

const TOKEN_HEADER: &str = "# Discord bot token";
const LOG_HEADER: &str = "# Log verbosity (tracing EnvFilter directive)";

pub fn render(credential: &Credential, log: &LogDirective) -> Zeroizing<String> {
    render_with(credential.expose(), log.as_str())
}

/// Layout of the file with a placeholder in place of the token.
pub fn render_template(default_log: &str) -> String {
    render_with("<token>", default_log).to_string()
}

fn render_with(token: &str, log: &str) -> Zeroizing<String> {
    Zeroizing::new(format!(
        "{}\n{}={}\n{}\n{}={}\n",
        TOKEN_HEADER,
        constants::TOKEN_KEY,
        token,
        LOG_HEADER,
        constants::LOG_KEY,
        log
    ))
}

/// Write `contents` to a fresh owner-only temp file.
pub fn stage(contents: &str) -> Result<NamedTempFile> {
    let mut tmp = tempfile::Builder::new()
        .prefix(".checkin-env-")
        .tempfile()
        .context("create staging file")?;
    host_fs::set_permissions(tmp.as_file(), tmp.path(), constants::ENV_FILE_MODE)?;
    tmp.write_all(contents.as_bytes())
        .context("write staging file")?;
    tmp.flush().context("flush staging file")?;
    Ok(tmp)
}

pub fn plan(state: &SystemState, staged: &Path) -> Vec<Action> {
    vec![Action::InstallFile {
        from: staged.to_path_buf(),
        to: state.env_file.clone(),
        mode: constants::ENV_FILE_MODE,
        owner: "root".to_string(),
        group: "root".to_string(),
    }]
}

pub fn write<H: Host + ?Sized>(
    host: &mut H,
    state: &SystemState,
    credential: &Credential,
    log: &LogDirective,
) -> Result<()> {
    let contents = render(credential, log);
    let staged = stage(&contents)?;
    for action in plan(state, staged.path()) {
        println!("  {}", action.describe());
        host.run(&action.command())?;
    }
    staged.close().context("remove staging file")?;
    println!("Wrote {}", state.env_file.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::host::fake::FakeHost;

    const GOOD: &str = "AAAAAAAAAAAAAAAAAAAAAAAA.BBBBBB.CCCCCCCCCCCCCCCCCCCCCCCCCCC";

    fn credential() -> Credential {
        Credential::new(Zeroizing::new(GOOD.to_string()))
    }

    #[test]
    fn test_render_two_entries_with_headers() {
        let log = LogDirective::resolve("", constants::DEFAULT_LOG_DIRECTIVE);
        let out = render(&credential(), &log);
        let lines: Vec<&str> = out.lines().collect();
        assert_eq!(lines.len(), 4);
        assert!(lines[0].starts_with('#'));
        assert_eq!(lines[1], format!("DISCORD_TOKEN={}", GOOD));
        assert!(lines[2].starts_with('#'));
        assert_eq!(lines[3], "RUST_LOG=daily_checkin_bot=info,serenity=warn");
    }

    #[test]
    fn test_template_hides_token() {
        let out = render_template(constants::DEFAULT_LOG_DIRECTIVE);
        assert!(out.contains("DISCORD_TOKEN=<token>"));
    }

    #[cfg(unix)]
    #[test]
    fn test_staged_file_is_owner_only() {
        let staged = stage("DISCORD_TOKEN=x\n").unwrap();
        let mode = host_fs::mode(staged.path()).unwrap();
        assert!(host_fs::is_owner_only(mode), "mode {:o}", mode);
        assert_eq!(std::fs::read_to_string(staged.path()).unwrap(), "DISCORD_TOKEN=x\n");
    }

    #[cfg(unix)]
    #[test]
    fn test_write_installs_with_restrictive_mode() {
        let state = SystemState::default();
        let mut host = FakeHost::default();
        let log = LogDirective::resolve("", constants::DEFAULT_LOG_DIRECTIVE);
        write(&mut host, &state, &credential(), &log).unwrap();

        let placed = host.installed.get(&state.env_file).unwrap();
        assert_eq!(placed.mode, 0o600);
        assert_eq!(placed.owner, "root");
        assert!(host_fs::is_owner_only(placed.staged_mode));
        assert!(placed.contents.contains(&format!("DISCORD_TOKEN={}", GOOD)));

        // No separate chmod: mode is applied as the file is created.
        assert_eq!(host.commands.len(), 1);
        assert_eq!(host.commands[0].program, "install");
    }

    #[test]
    fn test_staging_removed_after_write() {
        let state = SystemState::default();
        let mut host = FakeHost::default();
        let log = LogDirective::resolve("", constants::DEFAULT_LOG_DIRECTIVE);
        write(&mut host, &state, &credential(), &log).unwrap();
        let staged = std::path::PathBuf::from(&host.commands[0].args[6]);
        assert!(!staged.exists());
    }
}
