use crate::cli::CliContext;
use crate::core::file_lock::InstallLock;
use crate::core::host::SystemHost;
use crate::core::pipeline::{Aborted, Installer};
use crate::core::prompt::TerminalPrompter;
use crate::util::journald::{self, InstallEvent};
use anyhow::Result;
use std::time::Duration;

const JOURNAL_TAG: &str = "daily-checkin-installer";

pub fn run(ctx: &CliContext) -> Result<()> {
    let state = &ctx.state;
    println!(
        "Installing {} from {}",
        state.service,
        ctx.paths.root.display()
    );

    let mut host = SystemHost;
    let mut prompter = TerminalPrompter;
    let result = Installer {
        host: &mut host,
        prompter: &mut prompter,
        state,
        paths: &ctx.paths,
        default_log: &ctx.file.runtime.default_log_directive,
        grace: Duration::from_secs(ctx.file.runtime.activation_grace_secs),
        lock_path: Some(InstallLock::default_path(&state.service)),
    }
    .run();

    let done = match result {
        Ok(done) => done,
        Err(err) => {
            let step = err.downcast_ref::<Aborted>().map(|a| a.0.to_string());
            journald::forward_event(JOURNAL_TAG, &InstallEvent::aborted(&state.service, step));
            return Err(err);
        }
    };
    journald::forward_event(
        JOURNAL_TAG,
        &InstallEvent::completed(&state.service, done.started),
    );

    println!();
    println!("Installed {}", state.service);
    println!("  binary:   {}", state.installed_binary.display());
    println!("  unit:     {}", state.unit_path.display());
    println!("  env file: {}", state.env_file.display());
    println!("  data:     {}", state.data_dir.display());
    println!("  logs:     {}", state.log_dir.display());
    println!();
    if !done.started {
        println!("  sudo systemctl start {}", state.unit_name);
    }
    println!("  sudo systemctl status {}", state.unit_name);
    println!("  sudo journalctl -u {} -f", state.unit_name);
    Ok(())
}
