//! Host-side installer for the daily check-in bot.
//!
//! Turns the pre-built `daily-checkin-bot` binary into a hardened systemd
//! service: dedicated account, data and log directories, a root-only
//! environment file holding the bot token, and an enabled unit.
//!
//! ## Modules
//! - `cli` — Command-line handlers (install, plan, render, doctor)
//! - `core` — Install steps, host command execution, unit/NixOS rendering
//! - `models` — Installer config, service descriptor, credential types
//! - `util` — System utilities (fs, PATH lookup, systemd, journald, logging)

pub mod cli;
pub mod constants;
pub mod core;
pub mod models;
pub mod util;
