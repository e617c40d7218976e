//! Installer configuration file model (`installer.toml`).

use crate::constants;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::PathBuf;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct InstallerFile {
    #[serde(default)]
    pub service: ServiceSection,
    #[serde(default)]
    pub sources: SourceSection,
    #[serde(default)]
    pub runtime: RuntimeSection,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceSection {
    /// Service, unit and binary base name.
    #[serde(default = "default_service_name")]
    pub name: String,

    /// Account to run as (default: the service name).
    #[serde(default)]
    pub user: Option<String>,

    /// Primary group of the account (default: the account name).
    #[serde(default)]
    pub group: Option<String>,

    #[serde(default = "default_description")]
    pub description: String,
}

impl Default for ServiceSection {
    fn default() -> Self {
        Self {
            name: default_service_name(),
            user: None,
            group: None,
            description: default_description(),
        }
    }
}

/// Build artifacts, relative to the install root unless absolute.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceSection {
    #[serde(default)]
    pub binary: Option<PathBuf>,

    /// Unit template (default: `<service>.service`).
    #[serde(default)]
    pub unit_template: Option<PathBuf>,

    #[serde(default = "default_legacy_state")]
    pub legacy_state: PathBuf,
}

impl Default for SourceSection {
    fn default() -> Self {
        Self {
            binary: None,
            unit_template: None,
            legacy_state: default_legacy_state(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RuntimeSection {
    /// Directive used when the operator leaves the log prompt blank.
    #[serde(default = "default_log_directive")]
    pub default_log_directive: String,

    #[serde(default = "default_grace_secs")]
    pub activation_grace_secs: u64,

    /// Extra `Environment=` entries for rendered units and modules.
    #[serde(default)]
    pub extra_environment: BTreeMap<String, String>,
}

impl Default for RuntimeSection {
    fn default() -> Self {
        Self {
            default_log_directive: default_log_directive(),
            activation_grace_secs: default_grace_secs(),
            extra_environment: BTreeMap::new(),
        }
    }
}

fn default_service_name() -> String {
    constants::DEFAULT_SERVICE_NAME.to_string()
}

fn default_description() -> String {
    constants::DEFAULT_DESCRIPTION.to_string()
}

fn default_legacy_state() -> PathBuf {
    PathBuf::from(constants::LEGACY_STATE_FILE)
}

fn default_log_directive() -> String {
    constants::DEFAULT_LOG_DIRECTIVE.to_string()
}

fn default_grace_secs() -> u64 {
    constants::DEFAULT_ACTIVATION_GRACE_SECS
}
