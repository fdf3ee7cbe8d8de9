use anyhow::{Context, Result};
use debugfile_core::{DependencyDecision, Debugger};
use std::path::Path;

use crate::host::{HostOptions, TerminalHost};

pub fn check_command(options: &HostOptions, file: &Path) -> Result<()> {
    let file = std::fs::canonicalize(file).with_context(|| format!("File not found: {}", file.display()))?;

    let host = TerminalHost::new(options)?;
    let debugger = Debugger::new(host.services(), &host.localizer);

    match debugger.check_companions(&file) {
        None => println!("No debug provider for {}", file.display()),
        Some(DependencyDecision::Proceed) => println!("✅ Ready to debug {}", file.display()),
        Some(decision) => println!("⚠️  {}: {:?}", file.display(), decision),
    }
    Ok(())
}
