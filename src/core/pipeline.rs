//! The install run: a single forward pass over the provisioning steps.
//!
//! `Validate → CollectCredential → ProvisionAccount → ProvisionFilesystem →
//! WriteSecretStore → InstallUnit → [Activate | Skip]`
//!
//! The first failing step aborts the run. Earlier steps are not undone; every
//! step is an ensure operation, so re-running the installer repairs a partial
//! install.

use crate::core::activation::{self, Activation};
use crate::core::file_lock::InstallLock;
use crate::core::host::Host;
use crate::core::paths::InstallPaths;
use crate::core::prompt::Prompter;
use crate::core::{account, collector, filesystem, preflight, secret_store, unit};
use crate::models::system_state::SystemState;
use anyhow::{Context, Result};
use serde::Serialize;
use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Step {
    Validate,
    CollectCredential,
    ProvisionAccount,
    ProvisionFilesystem,
    WriteSecretStore,
    InstallUnit,
    Activate,
}

impl Step {
    pub const ALL: [Step; 7] = [
        Step::Validate,
        Step::CollectCredential,
        Step::ProvisionAccount,
        Step::ProvisionFilesystem,
        Step::WriteSecretStore,
        Step::InstallUnit,
        Step::Activate,
    ];

    pub fn title(&self) -> &'static str {
        match self {
            Step::Validate => "Checking prerequisites",
            Step::CollectCredential => "Collecting bot token",
            Step::ProvisionAccount => "Provisioning service account",
            Step::ProvisionFilesystem => "Preparing data and log directories",
            Step::WriteSecretStore => "Writing environment file",
            Step::InstallUnit => "Installing systemd unit",
            Step::Activate => "Starting service",
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Step::Validate => "validate",
            Step::CollectCredential => "collect-credential",
            Step::ProvisionAccount => "provision-account",
            Step::ProvisionFilesystem => "provision-filesystem",
            Step::WriteSecretStore => "write-secret-store",
            Step::InstallUnit => "install-unit",
            Step::Activate => "activate",
        }
    }
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Context attached to the error of the step that ended the run.
/// Recover it with `err.downcast_ref::<Aborted>()`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Aborted(pub Step);

impl fmt::Display for Aborted {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "install aborted at step '{}'", self.0)
    }
}

/// Terminal state of a run that reached the end.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Completed {
    pub started: bool,
}

pub struct Installer<'a, H: Host + ?Sized, P: Prompter + ?Sized> {
    pub host: &'a mut H,
    pub prompter: &'a mut P,
    pub state: &'a SystemState,
    pub paths: &'a InstallPaths,
    pub default_log: &'a str,
    pub grace: Duration,
    /// Single-instance lock, taken once preflight has passed.
    pub lock_path: Option<PathBuf>,
}

impl<'a, H: Host + ?Sized, P: Prompter + ?Sized> Installer<'a, H, P> {
    pub fn run(&mut self) -> Result<Completed> {
        let state = self.state;
        let paths = self.paths;

        announce(Step::Validate);
        preflight::validate(&*self.host, paths).context(Aborted(Step::Validate))?;
        let _lock = match &self.lock_path {
            Some(path) => Some(InstallLock::acquire(path).context(Aborted(Step::Validate))?),
            None => None,
        };

        announce(Step::CollectCredential);
        let input = collector::collect(&mut *self.prompter, self.default_log)
            .context(Aborted(Step::CollectCredential))?;

        announce(Step::ProvisionAccount);
        account::ensure(&mut *self.host, state).context(Aborted(Step::ProvisionAccount))?;

        announce(Step::ProvisionFilesystem);
        filesystem::provision(&mut *self.host, state, &paths.legacy_state)
            .context(Aborted(Step::ProvisionFilesystem))?;

        announce(Step::WriteSecretStore);
        secret_store::write(&mut *self.host, state, &input.credential, &input.log)
            .context(Aborted(Step::WriteSecretStore))?;
        drop(input);

        announce(Step::InstallUnit);
        unit::install(&mut *self.host, state, paths).context(Aborted(Step::InstallUnit))?;

        announce(Step::Activate);
        let activation =
            activation::activate(&mut *self.host, &mut *self.prompter, state, self.grace)
                .context(Aborted(Step::Activate))?;

        Ok(Completed {
            started: activation == Activation::Started,
        })
    }
}

fn announce(step: Step) {
    tracing::info!(step = %step, "entering step");
    println!();
    println!("==> {}", step.title());
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants;
    use crate::core::host::fake::FakeHost;
    use crate::core::prompt::scripted::{Answer, ScriptedPrompter};
    use crate::models::config::InstallerFile;
    use std::path::PathBuf;

    const GOOD: &str = "AAAAAAAAAAAAAAAAAAAAAAAA.BBBBBB.CCCCCCCCCCCCCCCCCCCCCCCCCCC";

    fn fixture() -> (SystemState, InstallPaths) {
        let file = InstallerFile::default();
        let paths = InstallPaths::from_root(PathBuf::from("/src"), &file);
        (SystemState::from_config(&file), paths)
    }

    fn run(
        host: &mut FakeHost,
        prompter: &mut ScriptedPrompter,
        state: &SystemState,
        paths: &InstallPaths,
    ) -> Result<Completed> {
        Installer {
            host,
            prompter,
            state,
            paths,
            default_log: constants::DEFAULT_LOG_DIRECTIVE,
            grace: Duration::from_secs(2),
            lock_path: None,
        }
        .run()
    }

    fn aborted_at(err: &anyhow::Error) -> Option<Step> {
        err.downcast_ref::<Aborted>().map(|a| a.0)
    }

    #[test]
    fn test_full_run_writes_expected_environment() {
        let (state, paths) = fixture();
        let mut host = FakeHost::ready(&paths);
        let mut p = ScriptedPrompter::new(vec![
            Answer::Secret(GOOD.into()),
            Answer::Text(String::new()),
            Answer::Confirm(true),
        ]);
        let done = run(&mut host, &mut p, &state, &paths).unwrap();
        assert!(done.started);

        let env = &host.installed[&state.env_file];
        assert!(env
            .contents
            .lines()
            .any(|l| l == format!("DISCORD_TOKEN={}", GOOD)));
        assert!(env
            .contents
            .lines()
            .any(|l| l == "RUST_LOG=daily_checkin_bot=info,serenity=warn"));
        assert_eq!(env.mode, 0o600);
    }

    #[test]
    fn test_preflight_failure_has_no_side_effects() {
        let (state, paths) = fixture();
        for breakage in 0..4 {
            let mut host = FakeHost::ready(&paths);
            match breakage {
                0 => host.root = true,
                1 => {
                    host.tools.remove("systemctl");
                }
                2 => {
                    host.files.remove(&paths.binary);
                }
                _ => {
                    host.files.remove(&paths.unit_template);
                }
            }
            let mut p = ScriptedPrompter::new(vec![]);
            let err = run(&mut host, &mut p, &state, &paths).unwrap_err();
            assert_eq!(aborted_at(&err), Some(Step::Validate));
            assert!(host.commands.is_empty());
            assert!(p.asked.is_empty());
        }
    }

    #[test]
    fn test_empty_token_aborts_before_mutation() {
        let (state, paths) = fixture();
        let mut host = FakeHost::ready(&paths);
        let mut p = ScriptedPrompter::new(vec![Answer::Secret(String::new())]);
        let err = run(&mut host, &mut p, &state, &paths).unwrap_err();
        assert_eq!(aborted_at(&err), Some(Step::CollectCredential));
        assert!(host.commands.is_empty());
    }

    #[test]
    fn test_declined_override_aborts() {
        let (state, paths) = fixture();
        let mut host = FakeHost::ready(&paths);
        let mut p = ScriptedPrompter::new(vec![
            Answer::Secret("nope".into()),
            Answer::Confirm(false),
        ]);
        let err = run(&mut host, &mut p, &state, &paths).unwrap_err();
        assert_eq!(aborted_at(&err), Some(Step::CollectCredential));
        assert!(host.commands.is_empty());
    }

    #[test]
    fn test_declined_start_completes_enabled() {
        let (state, paths) = fixture();
        let mut host = FakeHost::ready(&paths);
        let mut p = ScriptedPrompter::new(vec![
            Answer::Secret(GOOD.into()),
            Answer::Text(String::new()),
            Answer::Confirm(false),
        ]);
        let done = run(&mut host, &mut p, &state, &paths).unwrap();
        assert!(!done.started);
        let ran = host.mutations();
        assert!(ran.contains(&"sudo systemctl enable daily-checkin-bot.service".to_string()));
        assert!(!ran.iter().any(|c| c.contains("systemctl start")));
    }

    #[test]
    fn test_failure_keeps_earlier_steps() {
        let (state, paths) = fixture();
        let mut host = FakeHost::ready(&paths);
        host.fail_on = Some("systemctl enable".into());
        let mut p = ScriptedPrompter::new(vec![
            Answer::Secret(GOOD.into()),
            Answer::Text(String::new()),
        ]);
        let err = run(&mut host, &mut p, &state, &paths).unwrap_err();
        assert_eq!(aborted_at(&err), Some(Step::InstallUnit));
        assert!(host.users.contains(&state.user));
        assert!(host.installed.contains_key(&state.env_file));
        assert!(!host.mutations().iter().any(|c| c.contains("userdel") || c.contains("rm ")));
    }

    #[test]
    fn test_legacy_state_migrated() {
        let (state, paths) = fixture();
        let mut host = FakeHost::ready(&paths);
        host.files.insert(paths.legacy_state.clone());
        let mut p = ScriptedPrompter::new(vec![
            Answer::Secret(GOOD.into()),
            Answer::Text(String::new()),
            Answer::Confirm(false),
        ]);
        run(&mut host, &mut p, &state, &paths).unwrap();
        assert!(host.files.contains(&state.state_file));
        assert_eq!(
            host.owners.get(&state.state_file).map(String::as_str),
            Some("daily-checkin-bot:daily-checkin-bot")
        );
    }

    #[test]
    fn test_rerun_after_success_skips_account() {
        let (state, paths) = fixture();
        let mut host = FakeHost::ready(&paths);
        for _ in 0..2 {
            let mut p = ScriptedPrompter::new(vec![
                Answer::Secret(GOOD.into()),
                Answer::Text(String::new()),
                Answer::Confirm(false),
            ]);
            run(&mut host, &mut p, &state, &paths).unwrap();
        }
        let useradds = host
            .commands
            .iter()
            .filter(|c| c.program == "useradd")
            .count();
        assert_eq!(useradds, 1);
    }

    #[test]
    fn test_concurrent_run_refused_after_preflight() {
        let (state, paths) = fixture();
        let dir = tempfile::TempDir::new().unwrap();
        let lock_path = dir.path().join("installer.lock");
        let _held = InstallLock::acquire(&lock_path).unwrap();

        let mut host = FakeHost::ready(&paths);
        let mut p = ScriptedPrompter::new(vec![]);
        let err = Installer {
            host: &mut host,
            prompter: &mut p,
            state: &state,
            paths: &paths,
            default_log: constants::DEFAULT_LOG_DIRECTIVE,
            grace: Duration::from_secs(2),
            lock_path: Some(lock_path),
        }
        .run()
        .unwrap_err();
        assert_eq!(aborted_at(&err), Some(Step::Validate));
        assert!(host.commands.is_empty());
        assert!(p.asked.is_empty());
    }

    #[test]
    fn test_step_order() {
        assert_eq!(Step::ALL.first(), Some(&Step::Validate));
        assert_eq!(Step::ALL.last(), Some(&Step::Activate));
        assert_eq!(Step::WriteSecretStore.to_string(), "write-secret-store");
    }
}
