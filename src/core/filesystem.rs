//! Data and log directories, legacy state migration, ownership.

use crate::core::action::Action;
use crate::core::host::Host;
use crate::models::system_state::SystemState;
use anyhow::Result;
use std::path::Path;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FilesystemObservation {
    /// Legacy state file next to the installer.
    pub legacy_present: bool,
}

pub fn observe<H: Host + ?Sized>(host: &H, legacy: &Path) -> FilesystemObservation {
    FilesystemObservation {
        legacy_present: host.is_file(legacy),
    }
}

/// A legacy state file is copied on every run, replacing whatever the data
/// directory holds.
pub fn plan(state: &SystemState, legacy: &Path, obs: FilesystemObservation) -> Vec<Action> {
    let mut actions = vec![Action::CreateDirs {
        paths: vec![state.data_dir.clone(), state.log_dir.clone()],
    }];

    if obs.legacy_present {
        actions.push(Action::CopyFile {
            from: legacy.to_path_buf(),
            to: state.state_file.clone(),
        });
        actions.push(Action::Chown {
            paths: vec![state.state_file.clone()],
            user: state.user.clone(),
            group: state.group.clone(),
            recursive: false,
        });
    }

    // Always runs, also on pre-existing directories.
    actions.push(Action::Chown {
        paths: vec![state.data_dir.clone(), state.log_dir.clone()],
        user: state.user.clone(),
        group: state.group.clone(),
        recursive: true,
    });
    actions
}

pub fn provision<H: Host + ?Sized>(host: &mut H, state: &SystemState, legacy: &Path) -> Result<()> {
    let obs = observe(&*host, legacy);
    for action in plan(state, legacy, obs) {
        println!("  {}", action.describe());
        host.run(&action.command())?;
    }
    if obs.legacy_present {
        println!("Migrated {} to {}", legacy.display(), state.state_file.display());
    }
    Ok(())
}
