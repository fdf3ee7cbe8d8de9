//! Runtime package lookup for transpile-on-the-fly languages

use serde_json::Value;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

use crate::{host::ShellExecutor, types::RuntimeStrategy};

const NODE_MODULES: &str = "node_modules";
const PACKAGE_MANIFEST: &str = "package.json";

/// Finds the package behind a [`RuntimeStrategy`]
pub trait PackageLocator {
    /// Installed location of the runtime package for `file`, if any
    fn locate(&self, file: &Path, strategy: &RuntimeStrategy) -> Option<PathBuf>;
}

/// npm-based lookup: global root first, then the enclosing projects
pub struct NodePackageLocator<'a> {
    shell: &'a dyn ShellExecutor,
}

impl<'a> NodePackageLocator<'a> {
    pub fn new(shell: &'a dyn ShellExecutor) -> Self {
        Self { shell }
    }

    /// `npm root -g`, `None` when npm is unavailable
    fn global_root(&self) -> Option<PathBuf> {
        match self.shell.run("npm root -g", None) {
            Ok(output) if output.success() => {
                let root = output.stdout.trim();
                (!root.is_empty()).then(|| PathBuf::from(root))
            }
            Ok(output) => {
                debug!("npm root -g failed: {}", output.failure_message());
                None
            }
            Err(e) => {
                debug!("npm is not available: {}", e);
                None
            }
        }
    }

    fn find_global(&self, package: &str) -> Option<PathBuf> {
        let path = self.global_root()?.join(package);
        path.exists().then_some(path)
    }

    fn install(&self, command: &str) -> bool {
        info!("Installing runtime with `{}`", command);
        match self.shell.run(command, None) {
            Ok(output) if output.success() => true,
            Ok(output) => {
                warn!("`{}` failed: {}", command, output.failure_message());
                false
            }
            Err(e) => {
                warn!("Failed to run `{}`: {}", command, e);
                false
            }
        }
    }
}

impl PackageLocator for NodePackageLocator<'_> {
    fn locate(&self, file: &Path, strategy: &RuntimeStrategy) -> Option<PathBuf> {
        let package = strategy.package.as_str();

        if let Some(path) = self.find_global(package) {
            debug!("Found global {} at {:?}", package, path);
            return Some(path);
        }

        if let Some(path) = find_in_projects(file, package) {
            debug!("Found project {} at {:?}", package, path);
            return Some(path);
        }

        let command = strategy.install_command.as_deref()?;
        if self.install(command) {
            return self.find_global(package);
        }
        None
    }
}

/// Walk up from `file` through every directory holding a `package.json`.
///
/// A project provides the package when its manifest lists it under
/// `dependencies` or `devDependencies`, or when `node_modules/<package>`
/// exists next to the manifest.
pub fn find_in_projects(file: &Path, package: &str) -> Option<PathBuf> {
    let start = if file.is_dir() { Some(file) } else { file.parent() };

    for dir in start.into_iter().flat_map(Path::ancestors) {
        let manifest = dir.join(PACKAGE_MANIFEST);
        if !manifest.is_file() {
            continue;
        }

        let installed = dir.join(NODE_MODULES).join(package);
        if installed.exists() || manifest_declares(&manifest, package) {
            return Some(installed);
        }
    }
    None
}

fn manifest_declares(manifest: &Path, package: &str) -> bool {
    let parsed = std::fs::read_to_string(manifest)
        .map_err(|e| e.to_string())
        .and_then(|contents| serde_json::from_str::<Value>(&contents).map_err(|e| e.to_string()));

    match parsed {
        Ok(value) => ["dependencies", "devDependencies"]
            .iter()
            .any(|section| value.get(section).and_then(|deps| deps.get(package)).is_some()),
        Err(e) => {
            warn!("Skipping unreadable {:?}: {}", manifest, e);
            false
        }
    }
}

/// Executable to launch for a located package.
///
/// Project installs expose their binaries under `node_modules/.bin`; anything
/// else is expected on `PATH`.
pub fn runtime_executable(located: &Path, strategy: &RuntimeStrategy) -> String {
    let bin = located
        .parent()
        .filter(|dir| dir.file_name().is_some_and(|name| name == NODE_MODULES))
        .map(|dir| dir.join(".bin").join(&strategy.executable));

    match bin {
        Some(bin) if bin.exists() => bin.to_string_lossy().into_owned(),
        _ => strategy.executable.clone(),
    }
}
