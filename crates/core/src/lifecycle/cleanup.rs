//! Post-session cleanup of compiled artifacts

use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

use crate::types::{CleanupRule, LaunchConfiguration};

/// Operating system family, decides which artifacts a build leaves behind
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Platform {
    Linux,
    MacOs,
    Windows,
}

impl Platform {
    pub fn current() -> Self {
        if cfg!(target_os = "macos") {
            Platform::MacOs
        } else if cfg!(windows) {
            Platform::Windows
        } else {
            Platform::Linux
        }
    }

    fn is_binary_name(self, path: &Path) -> bool {
        match path.extension() {
            None => true,
            Some(ext) => self == Platform::Windows && ext.eq_ignore_ascii_case("exe"),
        }
    }
}

type MatchRule = fn(&LaunchConfiguration, &LaunchConfiguration) -> bool;

/// Checked in order; the first rule any pending watch satisfies picks it
pub(super) const MATCH_RULES: [(&str, MatchRule); 3] = [
    ("type", same_type),
    ("name", same_name),
    ("program", same_program),
];

fn same_type(a: &LaunchConfiguration, b: &LaunchConfiguration) -> bool {
    same_field(a, b, "type")
}

fn same_name(a: &LaunchConfiguration, b: &LaunchConfiguration) -> bool {
    same_field(a, b, "name")
}

fn same_program(a: &LaunchConfiguration, b: &LaunchConfiguration) -> bool {
    same_field(a, b, "program")
}

fn same_field(a: &LaunchConfiguration, b: &LaunchConfiguration, key: &str) -> bool {
    matches!((a.get_str(key), b.get_str(key)), (Some(x), Some(y)) if x == y)
}

/// A launched configuration waiting for its session to end
#[derive(Debug, Clone)]
pub struct PendingCleanup {
    pub configuration: LaunchConfiguration,
    /// The source file; never removed
    pub file: PathBuf,
    pub cleanup: CleanupRule,
    /// Set only when the launch created the directory
    pub build_directory: Option<PathBuf>,
}

impl PendingCleanup {
    /// Whether the session leaves anything behind at all
    pub fn has_work(&self) -> bool {
        self.cleanup != CleanupRule::None || self.build_directory.is_some()
    }

    /// Paths to delete, in deletion order
    pub fn plan(&self, platform: Platform) -> Vec<PathBuf> {
        let mut paths = Vec::new();

        if self.cleanup == CleanupRule::CompiledBinary {
            if let Some(program) = self.configuration.program().map(PathBuf::from) {
                if program.is_file() && platform.is_binary_name(&program) && program != self.file {
                    paths.push(program.clone());
                }

                if platform == Platform::MacOs {
                    let mut symbols = program.into_os_string();
                    symbols.push(".dSYM");
                    let symbols = PathBuf::from(symbols);
                    if symbols.is_dir() {
                        paths.push(symbols);
                    }
                }
            }
        }

        if let Some(dir) = &self.build_directory {
            if dir.is_dir() && dir != &self.file {
                paths.push(dir.clone());
            }
        }

        paths
    }
}

/// Delete the planned paths, returning those actually removed
pub fn remove_all(paths: Vec<PathBuf>) -> Vec<PathBuf> {
    paths
        .into_iter()
        .filter(|path| {
            let result = if path.is_dir() {
                fs::remove_dir_all(path)
            } else {
                fs::remove_file(path)
            };
            match result {
                Ok(()) => {
                    debug!("Removed {:?}", path);
                    true
                }
                Err(e) => {
                    warn!("Failed to remove {:?}: {}", path, e);
                    false
                }
            }
        })
        .collect()
}
