//! Shell command execution

use std::path::Path;
use std::process::Command;
use tracing::debug;

use crate::error::Result;

/// Captured result of a finished command
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandOutput {
    /// Exit code, `None` when killed by a signal
    pub code: Option<i32>,
    pub stdout: String,
    pub stderr: String,
}

impl CommandOutput {
    pub fn success(&self) -> bool {
        self.code == Some(0)
    }

    /// Text to show for a failed command: stderr, then stdout, then the exit code
    pub fn failure_message(&self) -> String {
        if !self.stderr.trim().is_empty() {
            self.stderr.trim_end().to_string()
        } else if !self.stdout.trim().is_empty() {
            self.stdout.trim_end().to_string()
        } else {
            match self.code {
                Some(code) => format!("exit code {code}"),
                None => "terminated by signal".to_string(),
            }
        }
    }
}

/// Runs command lines through the platform shell
pub trait ShellExecutor {
    /// Run `command` to completion in `cwd` (or the current directory).
    ///
    /// An `Err` means the command could not be spawned at all; a non-zero
    /// exit is reported through [`CommandOutput::code`].
    fn run(&self, command: &str, cwd: Option<&Path>) -> Result<CommandOutput>;
}

/// [`ShellExecutor`] using `sh -c` (`cmd /C` on Windows)
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemShell;

impl SystemShell {
    pub fn new() -> Self {
        Self
    }
}

impl ShellExecutor for SystemShell {
    fn run(&self, command: &str, cwd: Option<&Path>) -> Result<CommandOutput> {
        let mut cmd = if cfg!(windows) {
            let mut cmd = Command::new("cmd");
            cmd.arg("/C").arg(command);
            cmd
        } else {
            let mut cmd = Command::new("sh");
            cmd.arg("-c").arg(command);
            cmd
        };

        if let Some(dir) = cwd {
            cmd.current_dir(dir);
        }

        debug!("Executing `{}` in {:?}", command, cwd);
        let output = cmd.output()?;

        Ok(CommandOutput {
            code: output.status.code(),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        })
    }
}
