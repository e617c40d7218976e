//! systemctl queries used outside the mutating action set.

use crate::constants;
use crate::core::action::HostCommand;
use std::process::Command;

pub fn status(unit: &str) -> HostCommand {
    HostCommand::new(constants::SYSTEMCTL)
        .arg("status")
        .arg(unit)
        .arg("--no-pager")
        .privileged()
}

/// `systemctl is-enabled`/`is-active` answer, or `None` if systemctl can't run.
pub fn unit_state(query: &str, unit: &str) -> Option<String> {
    let output = Command::new(constants::SYSTEMCTL)
        .arg(query)
        .arg(unit)
        .output()
        .ok()?;
    let answer = String::from_utf8_lossy(&output.stdout).trim().to_string();
    if answer.is_empty() {
        None
    } else {
        Some(answer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_command() {
        assert_eq!(
            status("daily-checkin-bot.service").to_string(),
            "sudo systemctl status daily-checkin-bot.service --no-pager"
        );
    }
}
