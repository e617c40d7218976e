//! CLI routing and command dispatch.

use crate::core::paths::InstallPaths;
use crate::core::settings;
use crate::models::config::InstallerFile;
use crate::models::system_state::SystemState;
use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

pub mod doctor;
pub mod install;
pub mod plan;
pub mod render;

/// Shared context passed to all command handlers.
pub struct CliContext {
    pub paths: InstallPaths,
    pub file: InstallerFile,
    pub state: SystemState,
}

#[derive(Parser, Debug)]
#[command(
    name = "daily-checkin-installer",
    version,
    about = "Install the daily check-in bot as a systemd service"
)]
pub struct Cli {
    /// Install root holding the build output, unit template and installer.toml
    #[arg(long, global = true, value_name = "PATH")]
    pub root: Option<PathBuf>,

    /// Defaults to `install` when omitted
    #[command(subcommand)]
    pub command: Option<Commands>,
}

impl Cli {
    pub fn run(self) -> Result<()> {
        let root = InstallPaths::resolve_root(self.root)?;
        let config_path = root.join(crate::constants::CONFIG_FILE);
        let file = settings::load(&config_path)?;
        let paths = InstallPaths::from_root(root, &file);
        let state = SystemState::from_config(&file);
        tracing::debug!(paths = %paths, service = %state.service, "resolved install context");

        let ctx = CliContext { paths, file, state };

        match self.command.unwrap_or(Commands::Install) {
            Commands::Install => install::run(&ctx),
            Commands::Plan(args) => plan::run(&ctx, args),
            Commands::Render { command } => render::run(&ctx, command),
            Commands::Doctor(args) => doctor::run(&ctx, args),
        }
    }
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Interactively install, enable and optionally start the service
    Install,
    /// Dry-run: show every action an install would take (no changes)
    Plan(plan::PlanArgs),
    /// Print the unit file, NixOS module, or environment file layout
    Render {
        #[command(subcommand)]
        command: render::RenderCommand,
    },
    /// Diagnose an existing installation (safe, read-only)
    Doctor(doctor::DoctorArgs),
}
