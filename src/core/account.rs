//! Service account: created only when absent, never modified.

use crate::core::action::Action;
use crate::core::host::Host;
use crate::models::system_state::SystemState;
use anyhow::Result;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AccountObservation {
    pub user_exists: bool,
    pub group_exists: bool,
}

pub fn observe<H: Host + ?Sized>(host: &H, state: &SystemState) -> Result<AccountObservation> {
    Ok(AccountObservation {
        user_exists: host.user_exists(&state.user)?,
        group_exists: host.group_exists(&state.group)?,
    })
}

/// Nothing to do when the account is already there. A configured group
/// other than the account name is created first when missing, so `useradd`
/// can join it.
pub fn plan(state: &SystemState, obs: AccountObservation) -> Vec<Action> {
    if obs.user_exists {
        return Vec::new();
    }
    let mut actions = Vec::new();
    let custom_group = state.group != state.user;
    if custom_group && !obs.group_exists {
        actions.push(Action::CreateGroup {
            group: state.group.clone(),
        });
    }
    actions.push(Action::CreateAccount {
        user: state.user.clone(),
        group: state.group.clone(),
        home: state.home.clone(),
        group_exists: obs.group_exists || custom_group,
    });
    actions
}

pub fn ensure<H: Host + ?Sized>(host: &mut H, state: &SystemState) -> Result<()> {
    let obs = observe(host, state)?;
    if obs.user_exists {
        println!("Account {} already exists, leaving it unchanged", state.user);
        return Ok(());
    }
    for action in plan(state, obs) {
        println!("  {}", action.describe());
        host.run(&action.command())?;
    }
    println!("Created account {}", state.user);
    Ok(())
}
