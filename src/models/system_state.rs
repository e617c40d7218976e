//! Desired end state of a host running the bot as a service.
//!
//! Both the imperative installer and the declarative NixOS module renderer
//! are driven from this one descriptor.

use crate::constants;
use crate::models::config::InstallerFile;
use serde::Serialize;
use std::collections::BTreeMap;
use std::path::PathBuf;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SystemState {
    pub service: String,
    pub description: String,
    pub user: String,
    pub group: String,
    /// Account home; same as the data directory.
    pub home: PathBuf,
    pub data_dir: PathBuf,
    pub log_dir: PathBuf,
    /// State file inside `data_dir` the daemon reads via `DATA_FILE_PATH`.
    pub state_file: PathBuf,
    pub installed_binary: PathBuf,
    pub env_file: PathBuf,
    pub unit_name: String,
    pub unit_path: PathBuf,
    /// Non-secret environment baked into the unit.
    pub environment: BTreeMap<String, String>,
}

impl SystemState {
    pub fn from_config(file: &InstallerFile) -> Self {
        let service = file.service.name.clone();
        let user = file.service.user.clone().unwrap_or_else(|| service.clone());
        let group = file.service.group.clone().unwrap_or_else(|| user.clone());
        let data_dir = PathBuf::from(constants::STATE_DIR).join(&service);
        let log_dir = PathBuf::from(constants::LOG_DIR).join(&service);
        let state_file = data_dir.join(constants::LEGACY_STATE_FILE);
        let unit_name = format!("{}.service", service);

        let mut environment = file.runtime.extra_environment.clone();
        environment.insert(
            constants::DATA_FILE_KEY.to_string(),
            state_file.display().to_string(),
        );

        Self {
            description: file.service.description.clone(),
            user,
            group,
            home: data_dir.clone(),
            data_dir,
            log_dir,
            state_file,
            installed_binary: PathBuf::from(constants::BIN_DIR).join(&service),
            env_file: PathBuf::from(constants::ENV_FILE_DIR).join(&service),
            unit_path: PathBuf::from(constants::UNIT_DIR).join(&unit_name),
            unit_name,
            environment,
            service,
        }
    }
}

impl Default for SystemState {
    fn default() -> Self {
        Self::from_config(&InstallerFile::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_layout() {
        let state = SystemState::default();
        assert_eq!(state.service, "daily-checkin-bot");
        assert_eq!(state.user, "daily-checkin-bot");
        assert_eq!(state.group, "daily-checkin-bot");
        assert_eq!(state.data_dir, PathBuf::from("/var/lib/daily-checkin-bot"));
        assert_eq!(state.home, state.data_dir);
        assert_eq!(state.log_dir, PathBuf::from("/var/log/daily-checkin-bot"));
        assert_eq!(
            state.installed_binary,
            PathBuf::from("/usr/local/bin/daily-checkin-bot")
        );
        assert_eq!(state.env_file, PathBuf::from("/etc/default/daily-checkin-bot"));
        assert_eq!(
            state.unit_path,
            PathBuf::from("/etc/systemd/system/daily-checkin-bot.service")
        );
        assert_eq!(
            state.environment.get("DATA_FILE_PATH").map(String::as_str),
            Some("/var/lib/daily-checkin-bot/bot_data.json")
        );
    }

    #[test]
    fn test_custom_account() {
        let mut file = InstallerFile::default();
        file.service.name = "checkin".into();
        file.service.user = Some("bots".into());
        let state = SystemState::from_config(&file);
        assert_eq!(state.user, "bots");
        assert_eq!(state.group, "bots");
        assert_eq!(state.unit_name, "checkin.service");
        assert_eq!(state.data_dir, PathBuf::from("/var/lib/checkin"));
    }
}
