//! Render generated artifacts to stdout or a file.

use crate::cli::CliContext;
use crate::core::{nix_gen, secret_store, unit_gen};
use anyhow::{Context, Result};
use clap::Subcommand;
use std::fs;
use std::path::PathBuf;

#[derive(Subcommand, Debug)]
pub enum RenderCommand {
    /// The systemd unit the installer places
    Unit {
        #[arg(long, value_name = "PATH")]
        output: Option<PathBuf>,
    },
    /// A NixOS module declaring the same service
    Nixos {
        #[arg(long, value_name = "PATH")]
        output: Option<PathBuf>,
    },
    /// The environment file layout, with the token left as a placeholder
    EnvTemplate {
        #[arg(long, value_name = "PATH")]
        output: Option<PathBuf>,
    },
}

pub fn run(ctx: &CliContext, cmd: RenderCommand) -> Result<()> {
    let default_log = &ctx.file.runtime.default_log_directive;
    let (content, output) = match cmd {
        RenderCommand::Unit { output } => (unit_gen::render_unit(&ctx.state), output),
        RenderCommand::Nixos { output } => (nix_gen::render_module(&ctx.state, default_log), output),
        RenderCommand::EnvTemplate { output } => (secret_store::render_template(default_log), output),
    };

    match output {
        Some(path) => {
            fs::write(&path, &content).with_context(|| format!("write {}", path.display()))?;
            println!("Wrote {}", path.display());
        }
        None => print!("{}", content),
    }
    Ok(())
}
