//! Scout daemon support: shared by every Scout executable
//!
//! - `config`: layered configuration (defaults, `scout.toml`, `SCOUT__*` env)
//! - `logging`: stdout + per-process log file
//! - `plan`: the processes a supervised run starts
//! - `signals`: Ctrl+C / SIGTERM to `InterruptToken`

pub mod config;
pub mod logging;
pub mod plan;
pub mod signals;

pub use config::{ConfigError, ScoutConfig};
