//! Reconciliation actions and the host commands that carry them out.
//!
//! Step planners return `Action`s; only the host layer turns them into
//! processes, so planning stays a pure function of the desired state.

use crate::constants;
use serde::Serialize;
use std::fmt;
use std::path::{Path, PathBuf};

/// A single external process invocation, optionally escalated with sudo.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HostCommand {
    pub program: String,
    pub args: Vec<String>,
    pub privileged: bool,
}

impl HostCommand {
    pub fn new(program: &str) -> Self {
        Self {
            program: program.to_string(),
            args: Vec::new(),
            privileged: false,
        }
    }

    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    pub fn path(self, path: &Path) -> Self {
        self.arg(path.display().to_string())
    }

    pub fn privileged(mut self) -> Self {
        self.privileged = true;
        self
    }

    /// Full argv, including the sudo prefix for privileged commands.
    pub fn argv(&self) -> Vec<String> {
        let mut argv = Vec::with_capacity(self.args.len() + 2);
        if self.privileged {
            argv.push(constants::SUDO.to_string());
        }
        argv.push(self.program.clone());
        argv.extend(self.args.iter().cloned());
        argv
    }
}

impl fmt::Display for HostCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.argv().join(" "))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum SystemctlVerb {
    DaemonReload,
    Enable,
    Start,
}

impl SystemctlVerb {
    pub fn as_str(&self) -> &'static str {
        match self {
            SystemctlVerb::DaemonReload => "daemon-reload",
            SystemctlVerb::Enable => "enable",
            SystemctlVerb::Start => "start",
        }
    }
}

/// One mutation of host state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum Action {
    /// Configured primary group that differs from the account name.
    CreateGroup {
        group: String,
    },
    CreateAccount {
        user: String,
        group: String,
        home: PathBuf,
        /// Join an existing group instead of creating a same-named one.
        group_exists: bool,
    },
    CreateDirs {
        paths: Vec<PathBuf>,
    },
    CopyFile {
        from: PathBuf,
        to: PathBuf,
    },
    Chown {
        paths: Vec<PathBuf>,
        user: String,
        group: String,
        recursive: bool,
    },
    Chmod {
        path: PathBuf,
        mode: u32,
    },
    /// Copy with mode and owner applied at creation (`install(1)`).
    InstallFile {
        from: PathBuf,
        to: PathBuf,
        mode: u32,
        owner: String,
        group: String,
    },
    Systemctl {
        verb: SystemctlVerb,
        unit: Option<String>,
    },
}

impl Action {
    pub fn command(&self) -> HostCommand {
        match self {
            Action::CreateGroup { group } => HostCommand::new("groupadd")
                .arg("--system")
                .arg(group.as_str())
                .privileged(),
            Action::CreateAccount {
                user,
                group,
                home,
                group_exists,
            } => {
                let cmd = HostCommand::new("useradd")
                    .arg("--system")
                    .arg("--shell")
                    .arg(constants::NOLOGIN_SHELL)
                    .arg("--home-dir")
                    .path(home)
                    .arg("--create-home");
                let cmd = if *group_exists || group != user {
                    cmd.arg("--gid").arg(group.as_str())
                } else {
                    cmd.arg("--user-group")
                };
                cmd.arg(user.as_str()).privileged()
            }
            Action::CreateDirs { paths } => paths
                .iter()
                .fold(HostCommand::new("mkdir").arg("-p"), |cmd, p| cmd.path(p))
                .privileged(),
            Action::CopyFile { from, to } => HostCommand::new("cp")
                .path(from)
                .path(to)
                .privileged(),
            Action::Chown {
                paths,
                user,
                group,
                recursive,
            } => {
                let mut cmd = HostCommand::new("chown");
                if *recursive {
                    cmd = cmd.arg("-R");
                }
                paths
                    .iter()
                    .fold(cmd.arg(format!("{}:{}", user, group)), |cmd, p| cmd.path(p))
                    .privileged()
            }
            Action::Chmod { path, mode } => HostCommand::new("chmod")
                .arg(format!("{:04o}", mode))
                .path(path)
                .privileged(),
            Action::InstallFile {
                from,
                to,
                mode,
                owner,
                group,
            } => HostCommand::new("install")
                .arg("-m")
                .arg(format!("{:04o}", mode))
                .arg("-o")
                .arg(owner.as_str())
                .arg("-g")
                .arg(group.as_str())
                .path(from)
                .path(to)
                .privileged(),
            Action::Systemctl { verb, unit } => {
                let cmd = HostCommand::new(constants::SYSTEMCTL).arg(verb.as_str());
                match unit {
                    Some(unit) => cmd.arg(unit.as_str()).privileged(),
                    None => cmd.privileged(),
                }
            }
        }
    }

    /// Operator-facing one-liner.
    pub fn describe(&self) -> String {
        match self {
            Action::CreateGroup { group } => format!("create system group {}", group),
            Action::CreateAccount { user, home, .. } => {
                format!("create system account {} (home {})", user, home.display())
            }
            Action::CreateDirs { paths } => format!("create {}", join_paths(paths)),
            Action::CopyFile { from, to } => {
                format!("copy {} -> {}", from.display(), to.display())
            }
            Action::Chown {
                paths,
                user,
                group,
                recursive,
            } => format!(
                "chown{} {}:{} {}",
                if *recursive { " -R" } else { "" },
                user,
                group,
                join_paths(paths)
            ),
            Action::Chmod { path, mode } => format!("chmod {:04o} {}", mode, path.display()),
            Action::InstallFile {
                to, mode, owner, ..
            } => format!("install {} (mode {:04o}, owner {})", to.display(), mode, owner),
            Action::Systemctl { verb, unit } => match unit {
                Some(unit) => format!("systemctl {} {}", verb.as_str(), unit),
                None => format!("systemctl {}", verb.as_str()),
            },
        }
    }
}

fn join_paths(paths: &[PathBuf]) -> String {
    paths
        .iter()
        .map(|p| p.display().to_string())
        .collect::<Vec<_>>()
        .join(" ")
}
