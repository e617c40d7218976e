//! Host access: read-only checks plus external command execution.
//!
//! Every installer step goes through `Host`, so pipeline tests swap in a
//! recording fake instead of touching the real system.

use crate::core::action::HostCommand;
use crate::util::{path as host_path, privilege};
use anyhow::{bail, Context, Result};
use std::path::{Path, PathBuf};
use std::process::Command;
use std::time::Duration;

/// Captured result of a query command. A non-zero exit is data, not an error.
#[derive(Debug, Clone, Default)]
pub struct CommandOutput {
    pub success: bool,
    pub code: Option<i32>,
    pub text: String,
}

pub trait Host {
    fn is_root(&self) -> bool;

    fn find_on_path(&self, program: &str) -> Option<PathBuf>;

    /// Unprivileged existence check.
    fn is_file(&self, path: &Path) -> bool;

    fn user_exists(&self, name: &str) -> Result<bool>;

    fn group_exists(&self, name: &str) -> Result<bool>;

    /// Run a mutating command; non-zero exit is an error.
    fn run(&mut self, cmd: &HostCommand) -> Result<()>;

    /// Run a command and hand back its output whatever the exit status.
    fn query(&mut self, cmd: &HostCommand) -> Result<CommandOutput>;

    fn pause(&mut self, duration: Duration);
}

/// The real machine.
#[derive(Debug, Default)]
pub struct SystemHost;

impl SystemHost {
    fn command(cmd: &HostCommand) -> Command {
        let argv = cmd.argv();
        let mut command = Command::new(&argv[0]);
        command.args(&argv[1..]);
        command
    }
}

impl Host for SystemHost {
    fn is_root(&self) -> bool {
        privilege::is_root()
    }

    fn find_on_path(&self, program: &str) -> Option<PathBuf> {
        host_path::find_on_path(program)
    }

    fn is_file(&self, path: &Path) -> bool {
        path.is_file()
    }

    fn user_exists(&self, name: &str) -> Result<bool> {
        let user = nix::unistd::User::from_name(name)
            .with_context(|| format!("look up account {}", name))?;
        Ok(user.is_some())
    }

    fn group_exists(&self, name: &str) -> Result<bool> {
        let group = nix::unistd::Group::from_name(name)
            .with_context(|| format!("look up group {}", name))?;
        Ok(group.is_some())
    }

    fn run(&mut self, cmd: &HostCommand) -> Result<()> {
        tracing::debug!(command = %cmd, "running host command");
        let output = Self::command(cmd)
            .output()
            .with_context(|| format!("run `{}`", cmd))?;
        if output.status.success() {
            return Ok(());
        }
        let stdout = String::from_utf8_lossy(&output.stdout);
        let stderr = String::from_utf8_lossy(&output.stderr);
        tracing::debug!(command = %cmd, status = ?output.status.code(), "host command failed");
        bail!(
            "`{}` failed ({}): {}{}",
            cmd,
            exit_label(output.status.code()),
            stdout.trim_end(),
            stderr.trim_end()
        );
    }

    fn query(&mut self, cmd: &HostCommand) -> Result<CommandOutput> {
        tracing::debug!(command = %cmd, "querying host");
        let output = Self::command(cmd)
            .output()
            .with_context(|| format!("run `{}`", cmd))?;
        let mut text = String::from_utf8_lossy(&output.stdout).into_owned();
        text.push_str(&String::from_utf8_lossy(&output.stderr));
        Ok(CommandOutput {
            success: output.status.success(),
            code: output.status.code(),
            text,
        })
    }

    fn pause(&mut self, duration: Duration) {
        std::thread::sleep(duration);
    }
}

pub fn exit_label(code: Option<i32>) -> String {
    match code {
        Some(code) => format!("exit {}", code),
        None => "killed by signal".to_string(),
    }
}
