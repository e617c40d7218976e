//! Binary and unit file installation, reload, enable.

use crate::constants;
use crate::core::action::{Action, SystemctlVerb};
use crate::core::host::Host;
use crate::core::paths::InstallPaths;
use crate::models::system_state::SystemState;
use anyhow::Result;

pub fn plan(state: &SystemState, paths: &InstallPaths) -> Vec<Action> {
    vec![
        Action::InstallFile {
            from: paths.binary.clone(),
            to: state.installed_binary.clone(),
            mode: constants::BINARY_MODE,
            owner: "root".to_string(),
            group: "root".to_string(),
        },
        Action::CopyFile {
            from: paths.unit_template.clone(),
            to: state.unit_path.clone(),
        },
        Action::Chmod {
            path: state.unit_path.clone(),
            mode: constants::UNIT_FILE_MODE,
        },
        Action::Chown {
            paths: vec![state.unit_path.clone()],
            user: "root".to_string(),
            group: "root".to_string(),
            recursive: false,
        },
        Action::Systemctl {
            verb: SystemctlVerb::DaemonReload,
            unit: None,
        },
        Action::Systemctl {
            verb: SystemctlVerb::Enable,
            unit: Some(state.unit_name.clone()),
        },
    ]
}

/// Each action is its own fallible step; the first failure stops the rest.
pub fn install<H: Host + ?Sized>(
    host: &mut H,
    state: &SystemState,
    paths: &InstallPaths,
) -> Result<()> {
    for action in plan(state, paths) {
        println!("  {}", action.describe());
        host.run(&action.command())?;
    }
    println!("Enabled {}", state.unit_name);
    Ok(())
}
