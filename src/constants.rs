//! Centralized constants for names, paths, permissions, and defaults.

/// Default service name; also the account, binary and unit base name.
pub const DEFAULT_SERVICE_NAME: &str = "daily-checkin-bot";

/// Default unit description.
pub const DEFAULT_DESCRIPTION: &str = "Daily Check-in Discord Bot";

/// Fallback tracing directive when the operator leaves the prompt blank.
pub const DEFAULT_LOG_DIRECTIVE: &str = "daily_checkin_bot=info,serenity=warn";

/// Build output path of the daemon, relative to the install root.
pub const DEFAULT_BINARY_SOURCE: &str = "target/release/daily-checkin-bot";

/// Legacy state file left next to the installer by pre-service deployments.
pub const LEGACY_STATE_FILE: &str = "bot_data.json";

/// Installer configuration file, looked up in the install root.
pub const CONFIG_FILE: &str = "installer.toml";

/// Env var overriding the install root.
pub const ROOT_ENV: &str = "CHECKIN_INSTALLER_ROOT";

/// Env var holding the installer's own tracing filter.
pub const LOG_ENV: &str = "CHECKIN_INSTALLER_LOG";

/// Installed binary directory.
pub const BIN_DIR: &str = "/usr/local/bin";

/// Parent of the service data directory.
pub const STATE_DIR: &str = "/var/lib";

/// Parent of the service log directory.
pub const LOG_DIR: &str = "/var/log";

/// Directory holding environment files read by units.
pub const ENV_FILE_DIR: &str = "/etc/default";

/// systemd system unit directory.
pub const UNIT_DIR: &str = "/etc/systemd/system";

/// Login shell for the service account.
pub const NOLOGIN_SHELL: &str = "/usr/sbin/nologin";

/// Permission mode for the environment file.
pub const ENV_FILE_MODE: u32 = 0o600;

/// Permission mode for the installed unit file.
pub const UNIT_FILE_MODE: u32 = 0o644;

/// Permission mode for the installed binary.
pub const BINARY_MODE: u32 = 0o755;

/// Env key carrying the bot token.
pub const TOKEN_KEY: &str = "DISCORD_TOKEN";

/// Env key carrying the tracing directive.
pub const LOG_KEY: &str = "RUST_LOG";

/// Env key telling the daemon where its state file lives.
pub const DATA_FILE_KEY: &str = "DATA_FILE_PATH";

/// Token segment lengths (`xxx.yyy.zzz`).
pub const TOKEN_SEGMENT_LENGTHS: [usize; 3] = [24, 6, 27];

/// Seconds to wait after `systemctl start` before querying status.
pub const DEFAULT_ACTIVATION_GRACE_SECS: u64 = 2;

/// Service manager control tool.
pub const SYSTEMCTL: &str = "systemctl";

/// Per-command privilege escalation tool.
pub const SUDO: &str = "sudo";
