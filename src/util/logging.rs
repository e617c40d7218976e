//! Diagnostic tracing for the installer itself (stderr).

use crate::constants;
use tracing_subscriber::EnvFilter;

/// Filter comes from `CHECKIN_INSTALLER_LOG`, defaulting to `warn`.
pub fn init() {
    let filter = EnvFilter::try_from_env(constants::LOG_ENV)
        .unwrap_or_else(|_| EnvFilter::new("warn"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}
