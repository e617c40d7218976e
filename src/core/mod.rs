//! Install steps, the host/prompt seams they run against, and renderers.

pub mod account;
pub mod action;
pub mod activation;
pub mod collector;
pub mod file_lock;
pub mod filesystem;
pub mod host;
pub mod nix_gen;
pub mod paths;
pub mod pipeline;
pub mod preflight;
pub mod prompt;
pub mod secret_store;
pub mod settings;
pub mod unit;
pub mod unit_gen;
