//! External process execution
//!
//! This module provides:
//! - The `ProcessRunner` seam stage functions use to run commands
//! - The system implementation backed by `tokio::process`
//! - Command builders for dependency installation and git init

pub mod process;

pub use process::{git_init_command, install_command, ProcessCommand, ProcessRunner, SystemRunner};
