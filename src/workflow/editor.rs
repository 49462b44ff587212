//! External editor invocation

use std::path::Path;
use std::process::Command;

use anyhow::{Context, Result};

/// Opens a file for the user to edit
pub trait Editor {
    fn open(&self, path: &Path) -> Result<()>;
}

/// Runs a shell-style command line with the file path appended.
///
/// The command is split on whitespace, so `code --wait` works. The
/// editor's exit status is not inspected.
#[derive(Debug, Clone)]
pub struct ShellEditor {
    command: String,
}

impl ShellEditor {
    pub fn new(command: impl Into<String>) -> Self {
        Self {
            command: command.into(),
        }
    }

    /// Builds the process invocation for `path`
    pub fn command_for(&self, path: &Path) -> Result<Command> {
        let mut parts = self.command.split_whitespace();
        let program = parts
            .next()
            .ok_or_else(|| anyhow::anyhow!("Editor command is empty"))?;

        let mut cmd = Command::new(program);
        cmd.args(parts).arg(path);
        Ok(cmd)
    }
}

impl Editor for ShellEditor {
    fn open(&self, path: &Path) -> Result<()> {
        let mut cmd = self.command_for(path)?;
        cmd.status()
            .with_context(|| format!("Failed to launch editor '{}'", self.command))?;
        Ok(())
    }
}
