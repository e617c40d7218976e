//! Data structures shared by the installer steps.

pub mod config;
pub mod credential;
pub mod system_state;
