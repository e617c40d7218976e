//! Optional start of the freshly enabled unit.

use crate::core::action::{Action, SystemctlVerb};
use crate::core::host::{exit_label, Host};
use crate::core::prompt::Prompter;
use crate::models::system_state::SystemState;
use crate::util::systemd;
use anyhow::Result;
use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Activation {
    Started,
    Skipped,
}

pub fn start_prompt(state: &SystemState) -> String {
    format!("Start {} now?", state.unit_name)
}

/// A failed start is returned as an error after the status has been shown;
/// nothing installed earlier is touched.
pub fn activate<H: Host + ?Sized, P: Prompter + ?Sized>(
    host: &mut H,
    prompter: &mut P,
    state: &SystemState,
    grace: Duration,
) -> Result<Activation> {
    if !prompter.confirm(&start_prompt(state), true)? {
        println!(
            "Not started. Start later with: sudo systemctl start {}",
            state.unit_name
        );
        return Ok(Activation::Skipped);
    }

    let start = Action::Systemctl {
        verb: SystemctlVerb::Start,
        unit: Some(state.unit_name.clone()),
    };
    println!("  {}", start.describe());
    let started = host.run(&start.command());
    if started.is_ok() {
        host.pause(grace);
    }

    show_status(host, state)?;

    started?;
    Ok(Activation::Started)
}

fn show_status<H: Host + ?Sized>(host: &mut H, state: &SystemState) -> Result<()> {
    let out = host.query(&systemd::status(&state.unit_name))?;
    println!("{}", out.text.trim_end());
    if !out.success {
        eprintln!(
            "warning: systemctl status reported {} for {}",
            exit_label(out.code),
            state.unit_name
        );
    }
    Ok(())
}
