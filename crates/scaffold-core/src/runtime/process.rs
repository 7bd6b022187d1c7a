//! External process execution for package-manager and VCS commands
//!
//! Output is buffered and only surfaced when the command fails.

use crate::config::PackageManager;
use crate::error::{Result, ScaffoldError};
use async_trait::async_trait;
use std::fmt;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use tokio::process::Command as TokioCommand;

/// A command to run, with its environment overrides and working directory
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessCommand {
    pub program: String,
    pub args: Vec<String>,
    pub env: Vec<(String, String)>,
    pub cwd: Option<PathBuf>,
}

impl ProcessCommand {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
            env: Vec::new(),
            cwd: None,
        }
    }

    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    pub fn env(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.env.push((key.into(), value.into()));
        self
    }

    pub fn current_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.cwd = Some(dir.into());
        self
    }
}

impl fmt::Display for ProcessCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.program)?;
        for arg in &self.args {
            write!(f, " {}", arg)?;
        }
        Ok(())
    }
}

/// `<pm> install` with development dependencies enabled
pub fn install_command(package_manager: PackageManager, cwd: &Path) -> ProcessCommand {
    ProcessCommand::new(package_manager.as_str())
        .arg("install")
        .env("NODE_ENV", "development")
        .current_dir(cwd)
}

pub fn git_init_command(cwd: &Path) -> ProcessCommand {
    ProcessCommand::new("git").arg("init").current_dir(cwd)
}

/// Runs external commands to completion
#[async_trait]
pub trait ProcessRunner: Send + Sync {
    async fn run(&self, command: &ProcessCommand) -> Result<()>;
}

/// Runner backed by real child processes
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemRunner;

#[async_trait]
impl ProcessRunner for SystemRunner {
    async fn run(&self, command: &ProcessCommand) -> Result<()> {
        tracing::debug!(command = %command, cwd = ?command.cwd, "spawning process");

        let mut cmd = TokioCommand::new(&command.program);
        cmd.args(&command.args)
            .envs(command.env.iter().map(|(k, v)| (k.as_str(), v.as_str())))
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());
        if let Some(cwd) = &command.cwd {
            cmd.current_dir(cwd);
        }

        let output = cmd.output().await.map_err(|source| ScaffoldError::Spawn {
            command: command.to_string(),
            source,
        })?;

        if output.status.success() {
            return Ok(());
        }

        Err(ScaffoldError::ExternalProcessFailed {
            command: command.to_string(),
            code: output.status.code(),
            stdout: String::from_utf8_lossy(&output.stdout).trim().to_string(),
            stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
        })
    }
}
