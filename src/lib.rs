//! In-memory hosts for the workspace integration tests in `tests/`.
//!
//! Every fake records what the engine asked of it so tests can assert on
//! the exact interaction.

use debugfile_core::{
    Debugger, HostServices, LanguageId, LaunchConfiguration, Localizer, Platform, Result,
    detect_language,
    error::Error,
    host::{
        AddonManager, CommandOutput, DebugHost, NoCatalog, Notifier, SessionId, SettingsScope,
        SettingsStore, ShellExecutor, Workspace,
    },
};
use serde_json::Value;
use std::cell::{Cell, RefCell};
use std::collections::{HashMap, VecDeque};
use std::fs;
use std::path::{Path, PathBuf};

/// Detects languages from paths; every file lives in one workspace folder
#[derive(Debug, Default)]
pub struct FakeWorkspace {
    pub root: Option<PathBuf>,
    pub active: Option<PathBuf>,
}

impl Workspace for FakeWorkspace {
    fn language_of(&self, file: &Path) -> Option<LanguageId> {
        detect_language(file)
    }

    fn workspace_folder(&self, file: &Path) -> Option<PathBuf> {
        self.root.clone().filter(|root| file.starts_with(root))
    }

    fn active_file(&self) -> Option<PathBuf> {
        self.active.clone()
    }
}

#[derive(Debug, Default)]
pub struct FakeDebugHost {
    pub reject: Cell<bool>,
    pub started: RefCell<Vec<LaunchConfiguration>>,
    pub commands: RefCell<Vec<String>>,
}

impl DebugHost for FakeDebugHost {
    fn start_debugging(&self, configuration: &LaunchConfiguration) -> Result<SessionId> {
        if self.reject.get() {
            return Err(Error::HostError(format!(
                "Configured debug type '{}' is not supported",
                configuration.adapter_type().unwrap_or_default()
            )));
        }
        self.started.borrow_mut().push(configuration.clone());
        Ok(SessionId(format!("session-{}", self.started.borrow().len())))
    }

    fn execute_command(&self, command: &str) -> Result<()> {
        self.commands.borrow_mut().push(command.to_string());
        Ok(())
    }
}

#[derive(Debug, Default)]
pub struct FakeAddons {
    pub installed: RefCell<Vec<String>>,
    pub failing: RefCell<Vec<String>>,
    pub install_calls: RefCell<Vec<String>>,
}

impl FakeAddons {
    pub fn with_installed(ids: &[&str]) -> Self {
        let addons = Self::default();
        addons
            .installed
            .borrow_mut()
            .extend(ids.iter().map(|id| id.to_string()));
        addons
    }
}

impl AddonManager for FakeAddons {
    fn installed(&self) -> Vec<String> {
        self.installed.borrow().clone()
    }

    fn install(&self, id: &str) -> Result<()> {
        self.install_calls.borrow_mut().push(id.to_string());
        if self.failing.borrow().iter().any(|f| f == id) {
            return Err(Error::HostError(format!("{id}: not found in marketplace")));
        }
        self.installed.borrow_mut().push(id.to_string());
        Ok(())
    }

    fn uninstall(&self, id: &str) -> Result<()> {
        self.installed.borrow_mut().retain(|installed| installed != id);
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Level {
    Info,
    Warn,
    Error,
}

/// Answers prompts from a queue; an empty queue dismisses
#[derive(Debug, Default)]
pub struct ScriptedNotifier {
    pub answers: RefCell<VecDeque<Option<usize>>>,
    pub prompts: RefCell<Vec<String>>,
    pub messages: RefCell<Vec<(Level, String)>>,
    pub reloads: Cell<usize>,
}

impl ScriptedNotifier {
    pub fn answering(answers: &[Option<usize>]) -> Self {
        let notifier = Self::default();
        notifier.answers.borrow_mut().extend(answers.iter().copied());
        notifier
    }

    pub fn messages_at(&self, level: Level) -> Vec<String> {
        self.messages
            .borrow()
            .iter()
            .filter(|(l, _)| *l == level)
            .map(|(_, message)| message.clone())
            .collect()
    }
}

impl Notifier for ScriptedNotifier {
    fn info(&self, message: &str) {
        self.messages.borrow_mut().push((Level::Info, message.to_string()));
    }

    fn warn(&self, message: &str) {
        self.messages.borrow_mut().push((Level::Warn, message.to_string()));
    }

    fn error(&self, message: &str) {
        self.messages.borrow_mut().push((Level::Error, message.to_string()));
    }

    fn prompt(&self, message: &str, _choices: &[&str]) -> Option<usize> {
        self.prompts.borrow_mut().push(message.to_string());
        self.answers.borrow_mut().pop_front().flatten()
    }

    fn status(&self, _message: &str) {}

    fn clear_status(&self) {}

    fn request_reload(&self, _message: &str) {
        self.reloads.set(self.reloads.get() + 1);
    }
}

/// Settings kept in memory for the life of the value
#[derive(Debug, Default)]
pub struct MemorySettings {
    values: RefCell<HashMap<(SettingsScope, String), Value>>,
}

impl SettingsStore for MemorySettings {
    fn get(&self, scope: &SettingsScope, key: &str) -> Result<Option<Value>> {
        Ok(self.values.borrow().get(&(scope.clone(), key.to_string())).cloned())
    }

    fn update(&self, scope: &SettingsScope, key: &str, value: Option<Value>) -> Result<()> {
        let entry = (scope.clone(), key.to_string());
        match value {
            Some(value) => self.values.borrow_mut().insert(entry, value),
            None => self.values.borrow_mut().remove(&entry),
        };
        Ok(())
    }
}

/// Records commands; those containing a failing pattern exit with its output,
/// all others succeed and write the `produces` files
#[derive(Debug, Default)]
pub struct FakeShell {
    pub ran: RefCell<Vec<(String, Option<PathBuf>)>>,
    pub failing: RefCell<Vec<(String, CommandOutput)>>,
    pub produces: RefCell<Vec<PathBuf>>,
}

impl FakeShell {
    pub fn fail_on(&self, pattern: &str, stderr: &str) {
        self.failing.borrow_mut().push((
            pattern.to_string(),
            CommandOutput {
                code: Some(1),
                stdout: String::new(),
                stderr: stderr.to_string(),
            },
        ));
    }

    pub fn commands(&self) -> Vec<String> {
        self.ran.borrow().iter().map(|(command, _)| command.clone()).collect()
    }
}

impl ShellExecutor for FakeShell {
    fn run(&self, command: &str, cwd: Option<&Path>) -> Result<CommandOutput> {
        self.ran
            .borrow_mut()
            .push((command.to_string(), cwd.map(Path::to_path_buf)));

        if let Some((_, output)) = self
            .failing
            .borrow()
            .iter()
            .find(|(pattern, _)| command.contains(pattern.as_str()))
        {
            return Ok(output.clone());
        }

        for path in self.produces.borrow().iter() {
            if let Some(parent) = path.parent() {
                fs::create_dir_all(parent)?;
            }
            fs::write(path, "")?;
        }
        Ok(CommandOutput {
            code: Some(0),
            ..Default::default()
        })
    }
}

/// All fakes in one place
#[derive(Default)]
pub struct Harness {
    pub workspace: FakeWorkspace,
    pub debug_host: FakeDebugHost,
    pub addons: FakeAddons,
    pub notifier: ScriptedNotifier,
    pub settings: MemorySettings,
    pub shell: FakeShell,
    pub localizer: Localizer,
}

impl Harness {
    pub fn new(root: Option<PathBuf>) -> Self {
        Self {
            workspace: FakeWorkspace { root, active: None },
            ..Default::default()
        }
    }

    pub fn services(&self) -> HostServices<'_> {
        HostServices {
            workspace: &self.workspace,
            debug_host: &self.debug_host,
            addons: &self.addons,
            catalog: &NoCatalog,
            notifier: &self.notifier,
            settings: &self.settings,
            shell: &self.shell,
        }
    }

    /// A debugger over these fakes, cleaning up as on `platform`
    pub fn debugger(&self, platform: Platform) -> Debugger<'_> {
        Debugger::new(self.services(), &self.localizer).with_platform(platform)
    }
}
