use anyhow::{Context, Result, bail};
use debugfile_core::{
    DebugOutcome, DebugRequest, Debugger, LaunchConfiguration, LaunchOutcome,
};
use std::fs;
use std::path::Path;
use tracing::{debug, info};

use crate::host::{HostOptions, TerminalHost};

pub fn debug_command(
    options: &HostOptions,
    file: &Path,
    overrides: Option<&Path>,
    args: Vec<String>,
    dry_run: bool,
) -> Result<()> {
    let file = fs::canonicalize(file).with_context(|| format!("File not found: {}", file.display()))?;
    debug!("Debugging {:?}", file);

    let mut request = DebugRequest::new().with_extra_args(args);
    if let Some(path) = overrides {
        request = request.with_overrides(read_overrides(path)?);
    }

    let host = TerminalHost::new(options)?;
    let mut debugger = Debugger::new(host.services(), &host.localizer);

    if dry_run {
        let Some(resolved) = debugger.resolve(Some(&file), &request)? else {
            bail!("No debug provider for {}", file.display());
        };
        println!("{}", serde_json::to_string_pretty(&resolved)?);
        return Ok(());
    }

    match debugger.debug_file(Some(&file), request)? {
        DebugOutcome::Unsupported => bail!("No debug provider for {}", file.display()),
        DebugOutcome::Blocked(decision) => bail!("Not launching {}: {:?}", file.display(), decision),
        DebugOutcome::Launched(LaunchOutcome::CommandDispatched(command)) => {
            info!("Dispatched {}", command);
        }
        DebugOutcome::Launched(LaunchOutcome::Started(_)) => {
            if let Some(session) = host.debug_host.wait_for_exit() {
                for path in debugger.session_terminated(&session) {
                    info!("Removed {}", path.display());
                }
            }
        }
    }

    Ok(())
}

fn read_overrides(path: &Path) -> Result<LaunchConfiguration> {
    let contents =
        fs::read_to_string(path).with_context(|| format!("Failed to read overrides {}", path.display()))?;
    let value: serde_json::Value = serde_json::from_str(&contents)
        .with_context(|| format!("Invalid JSON in {}", path.display()))?;
    if !value.is_object() {
        bail!("Overrides in {} must be a JSON object", path.display());
    }
    Ok(LaunchConfiguration::from_value(value))
}
