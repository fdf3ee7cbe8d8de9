use anyhow::{Context, Result};
use debugfile_core::{Settings, host::SettingsScope};
use std::path::Path;

use crate::host::{HostOptions, TerminalHost, project_root};

pub fn reset_command(options: &HostOptions, global: bool, workspace: Option<&Path>) -> Result<()> {
    let scope = if global {
        SettingsScope::Global
    } else {
        let root = match workspace {
            Some(dir) => std::fs::canonicalize(dir)
                .with_context(|| format!("No such directory: {}", dir.display()))?,
            None => {
                let cwd = std::env::current_dir().context("Failed to get current directory")?;
                // a subdirectory resets its project
                project_root(&cwd).unwrap_or(cwd)
            }
        };
        SettingsScope::Project(root)
    };

    let host = TerminalHost::new(options)?;
    Settings::new(&host.settings).clear_addon_lists(&scope);

    match &scope {
        SettingsScope::Global => println!("🧹 Cleared global extension lists"),
        SettingsScope::Project(root) => println!("🧹 Cleared extension lists for {}", root.display()),
    }
    Ok(())
}
