use anyhow::{Context, Result};
use debugfile_core::{Debugger, DependencyDecision, detect_language};
use notify::{Event, EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::mpsc;
use std::time::SystemTime;
use tracing::{debug, warn};

use crate::host::{HostOptions, TerminalHost};

/// Run the extension check once for every supported file that shows up
pub fn watch_command(options: &HostOptions, dir: &Path) -> Result<()> {
    let dir = std::fs::canonicalize(dir).with_context(|| format!("No such directory: {}", dir.display()))?;

    let host = TerminalHost::new(options)?;
    let debugger = Debugger::new(host.services(), &host.localizer);

    let (tx, rx) = mpsc::channel();
    let mut watcher = RecommendedWatcher::new(tx, notify::Config::default())
        .context("Failed to create file watcher")?;
    watcher
        .watch(&dir, RecursiveMode::Recursive)
        .with_context(|| format!("Failed to watch {}", dir.display()))?;

    println!("👀 Watching {} (Ctrl+C to stop)", dir.display());

    let mut seen = SeenFiles::default();
    for result in rx {
        let event = match result {
            Ok(event) => event,
            Err(e) => {
                warn!("Watch error: {}", e);
                continue;
            }
        };

        for file in candidate_files(&event) {
            if !seen.is_new(&file) {
                continue;
            }
            let supported = detect_language(&file)
                .is_some_and(|language| debugger.registry().contains(language.as_str()));
            if !supported {
                continue;
            }

            debug!("Checking extensions for {:?}", file);
            match debugger.check_companions(&file) {
                Some(DependencyDecision::Proceed) | None => {}
                Some(decision) => println!("⚠️  {}: {:?}", file.display(), decision),
            }
        }
    }

    Ok(())
}

/// Last modification time checked per file.
///
/// One save fires several events with the same mtime; only the first counts.
/// A later edit checks the file again.
#[derive(Debug, Default)]
struct SeenFiles {
    modified: HashMap<PathBuf, Option<SystemTime>>,
}

impl SeenFiles {
    fn is_new(&mut self, file: &Path) -> bool {
        let mtime = std::fs::metadata(file).and_then(|m| m.modified()).ok();
        match self.modified.insert(file.to_path_buf(), mtime) {
            Some(previous) => mtime.is_none() || previous != mtime,
            None => true,
        }
    }
}

/// Regular files created or modified by `event`
fn candidate_files(event: &Event) -> Vec<PathBuf> {
    match event.kind {
        EventKind::Create(_) | EventKind::Modify(_) => event
            .paths
            .iter()
            .filter(|path| path.is_file())
            .cloned()
            .collect(),
        _ => Vec::new(),
    }
}
