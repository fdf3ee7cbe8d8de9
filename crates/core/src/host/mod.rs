//! Host editor interfaces
//!
//! The engine never talks to an editor directly. Everything it needs from the
//! host goes through these traits, implemented once per front-end and passed
//! by reference to the components that need them.

use serde_json::Value;
use std::path::{Path, PathBuf};

use crate::{
    error::Result,
    types::{LanguageId, LaunchConfiguration},
};

pub mod shell;

pub use shell::{CommandOutput, ShellExecutor, SystemShell};

/// Identifier of a debug session started by the host
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SessionId(pub String);

/// A debug session the host reports as terminated
#[derive(Debug, Clone)]
pub struct TerminatedSession {
    pub id: SessionId,
    pub configuration: LaunchConfiguration,
}

/// Documents and workspace folders
pub trait Workspace {
    /// Language the host classifies this file as
    fn language_of(&self, file: &Path) -> Option<LanguageId>;

    /// Workspace folder containing the file
    fn workspace_folder(&self, file: &Path) -> Option<PathBuf>;

    /// File shown in the active editor
    fn active_file(&self) -> Option<PathBuf>;
}

/// Debug subsystem and command dispatch
pub trait DebugHost {
    /// Start a session with an existing debug adapter
    fn start_debugging(&self, configuration: &LaunchConfiguration) -> Result<SessionId>;

    /// Invoke a registered host command
    fn execute_command(&self, command: &str) -> Result<()>;
}

/// Companion add-on management
pub trait AddonManager {
    /// Ids (`publisher.name`) of the installed add-ons
    fn installed(&self) -> Vec<String>;

    fn install(&self, id: &str) -> Result<()>;

    fn uninstall(&self, id: &str) -> Result<()>;
}

/// Marketplace metadata, used for user-facing names only
pub trait AddonCatalog {
    fn display_name(&self, id: &str) -> Option<String>;
}

/// A catalog that knows no names; ids are shown as they are
#[derive(Debug, Default, Clone, Copy)]
pub struct NoCatalog;

impl AddonCatalog for NoCatalog {
    fn display_name(&self, _id: &str) -> Option<String> {
        None
    }
}

/// User-facing messages and prompts
pub trait Notifier {
    fn info(&self, message: &str);

    fn warn(&self, message: &str);

    fn error(&self, message: &str);

    /// Modal prompt; returns the index of the chosen button, `None` when dismissed
    fn prompt(&self, message: &str, choices: &[&str]) -> Option<usize>;

    /// Ephemeral status text
    fn status(&self, message: &str);

    fn clear_status(&self);

    /// Ask the user to reload the host so new add-ons activate
    fn request_reload(&self, message: &str);
}

/// Where a setting is stored
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum SettingsScope {
    Global,
    Project(PathBuf),
}

/// Persisted key-value settings
pub trait SettingsStore {
    fn get(&self, scope: &SettingsScope, key: &str) -> Result<Option<Value>>;

    fn update(&self, scope: &SettingsScope, key: &str, value: Option<Value>) -> Result<()>;
}
