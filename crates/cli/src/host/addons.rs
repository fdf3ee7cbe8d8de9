use debugfile_core::{Error, Result, host::AddonManager};
use std::process::{Command, Output};
use tracing::{debug, warn};

/// Manages add-ons through the editor's command line (`code --install-extension ...`)
#[derive(Debug, Clone)]
pub struct EditorAddons {
    editor: String,
}

impl EditorAddons {
    pub fn new(editor: impl Into<String>) -> Self {
        Self {
            editor: editor.into(),
        }
    }

    fn run(&self, args: &[&str]) -> Result<Output> {
        debug!("Running {} {}", self.editor, args.join(" "));
        Ok(Command::new(&self.editor).args(args).output()?)
    }

    fn run_checked(&self, args: &[&str]) -> Result<()> {
        let output = self.run(args)?;
        if output.status.success() {
            return Ok(());
        }

        let stderr = String::from_utf8_lossy(&output.stderr);
        let stdout = String::from_utf8_lossy(&output.stdout);
        let message = if stderr.trim().is_empty() { stdout } else { stderr };
        Err(Error::HostError(format!(
            "{} {} failed: {}",
            self.editor,
            args.join(" "),
            message.trim()
        )))
    }
}

impl AddonManager for EditorAddons {
    fn installed(&self) -> Vec<String> {
        match self.run(&["--list-extensions"]) {
            Ok(output) if output.status.success() => parse_extension_list(&String::from_utf8_lossy(&output.stdout)),
            Ok(output) => {
                warn!(
                    "{} --list-extensions failed: {}",
                    self.editor,
                    String::from_utf8_lossy(&output.stderr).trim()
                );
                Vec::new()
            }
            Err(e) => {
                warn!("Cannot list installed extensions with {}: {}", self.editor, e);
                Vec::new()
            }
        }
    }

    fn install(&self, id: &str) -> Result<()> {
        self.run_checked(&["--install-extension", id, "--force"])
    }

    fn uninstall(&self, id: &str) -> Result<()> {
        self.run_checked(&["--uninstall-extension", id])
    }
}

/// One id per line; blank lines and editor banners are ignored
fn parse_extension_list(output: &str) -> Vec<String> {
    output
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.contains(char::is_whitespace) && line.contains('.'))
        .map(str::to_string)
        .collect()
}
