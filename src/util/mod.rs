//! Utility modules for filesystem, privilege, logging and systemd access.

pub mod fs;
pub mod journald;
pub mod logging;
pub mod path;
pub mod privilege;
pub mod systemd;
