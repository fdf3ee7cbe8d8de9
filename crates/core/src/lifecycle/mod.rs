//! Pre-launch commands, session start and post-session cleanup

mod cleanup;

pub use cleanup::{PendingCleanup, Platform, remove_all};

use std::path::PathBuf;
use tracing::{debug, info};

use crate::{
    error::{Error, Result},
    host::{DebugHost, Notifier, SessionId, ShellExecutor, TerminatedSession},
    i18n::Localizer,
    types::ResolvedProvider,
};

/// What [`SessionLifecycle::run`] ended up doing
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LaunchOutcome {
    /// A debug session is running
    Started(SessionId),
    /// The configuration named a host command, which was dispatched instead
    CommandDispatched(String),
}

/// Drives one launch at a time and remembers what to clean up afterwards
pub struct SessionLifecycle<'a> {
    debug_host: &'a dyn DebugHost,
    shell: &'a dyn ShellExecutor,
    notifier: &'a dyn Notifier,
    localizer: &'a Localizer,
    platform: Platform,
    pending: Vec<PendingCleanup>,
}

impl<'a> SessionLifecycle<'a> {
    pub fn new(
        debug_host: &'a dyn DebugHost,
        shell: &'a dyn ShellExecutor,
        notifier: &'a dyn Notifier,
        localizer: &'a Localizer,
    ) -> Self {
        Self {
            debug_host,
            shell,
            notifier,
            localizer,
            platform: Platform::current(),
            pending: Vec::new(),
        }
    }

    /// Clean up as if running on `platform`
    pub fn with_platform(mut self, platform: Platform) -> Self {
        self.platform = platform;
        self
    }

    /// Watches registered and not yet triggered
    pub fn pending(&self) -> &[PendingCleanup] {
        &self.pending
    }

    /// Run the commands, then start the session or dispatch the host command
    pub fn run(&mut self, resolved: &ResolvedProvider) -> Result<LaunchOutcome> {
        // Only a directory this launch creates is removed afterwards
        let created_build_directory = match &resolved.build_directory {
            Some(dir) if dir.is_dir() => {
                debug!("Reusing build directory {:?}", dir);
                None
            }
            Some(dir) => {
                debug!("Creating build directory {:?}", dir);
                std::fs::create_dir_all(dir)?;
                Some(dir.clone())
            }
            None => None,
        };

        self.run_commands(resolved)?;

        let configuration = &resolved.configuration;
        if let Some(command) = configuration.command() {
            info!("Dispatching host command `{}`", command);
            self.debug_host.execute_command(command)?;
            return Ok(LaunchOutcome::CommandDispatched(command.to_string()));
        }

        let name = configuration.display_name().to_string();
        let session = match self.debug_host.start_debugging(configuration) {
            Ok(session) => session,
            Err(e) => {
                self.notifier
                    .error(&self.localizer.localize("error.command.extensions", &[&name]));
                return Err(Error::SessionRejected {
                    name,
                    reason: e.to_string(),
                });
            }
        };
        info!("Started `{}` as session {}", name, session.0);

        let watch = PendingCleanup {
            configuration: configuration.clone(),
            file: resolved.file.clone(),
            cleanup: resolved.cleanup,
            build_directory: created_build_directory,
        };
        if watch.has_work() {
            self.pending.push(watch);
        }

        Ok(LaunchOutcome::Started(session))
    }

    fn run_commands(&self, resolved: &ResolvedProvider) -> Result<()> {
        let cwd = resolved.workspace_folder.as_deref();
        let name = resolved.configuration.display_name();

        for command in &resolved.commands {
            self.notifier
                .status(&self.localizer.localize("status.running", &[command]));
            let result = self.shell.run(command, cwd);
            self.notifier.clear_status();

            let output = match result {
                Ok(output) if output.success() => continue,
                Ok(output) => output.failure_message(),
                Err(e) => e.to_string(),
            };

            self.notifier
                .error(&self.localizer.localize("error.command.failed", &[name, &output]));
            return Err(Error::CommandFailed {
                command: command.clone(),
                output,
            });
        }
        Ok(())
    }

    /// Handle a terminated session; returns the paths removed.
    ///
    /// The first rule in type, name, program order that some pending watch
    /// satisfies selects that watch, which is consumed.
    pub fn on_session_terminated(&mut self, session: &TerminatedSession) -> Vec<PathBuf> {
        let found = cleanup::MATCH_RULES.iter().find_map(|(rule_name, rule)| {
            self.pending
                .iter()
                .position(|watch| rule(&session.configuration, &watch.configuration))
                .map(|index| (*rule_name, index))
        });

        let Some((rule_name, index)) = found else {
            debug!("No cleanup pending for session {}", session.id.0);
            return Vec::new();
        };

        let watch = self.pending.remove(index);
        debug!(
            "Session {} matched `{}` by {}",
            session.id.0,
            watch.configuration.display_name(),
            rule_name
        );
        remove_all(watch.plan(self.platform))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::CommandOutput;
    use crate::types::{CleanupRule, LanguageId, LaunchConfiguration};
    use serde_json::json;
    use std::cell::RefCell;
    use std::fs;
    use std::path::Path;
    use tempfile::TempDir;

    #[derive(Default)]
    struct FakeDebugHost {
        reject: bool,
        started: RefCell<Vec<LaunchConfiguration>>,
        commands: RefCell<Vec<String>>,
    }

    impl DebugHost for FakeDebugHost {
        fn start_debugging(&self, configuration: &LaunchConfiguration) -> Result<SessionId> {
            if self.reject {
                return Err(Error::HostError("no adapter for type".to_string()));
            }
            self.started.borrow_mut().push(configuration.clone());
            Ok(SessionId(format!("session-{}", self.started.borrow().len())))
        }

        fn execute_command(&self, command: &str) -> Result<()> {
            self.commands.borrow_mut().push(command.to_string());
            Ok(())
        }
    }

    /// Creates `creates` for every command and fails those containing `fail`
    #[derive(Default)]
    struct FakeShell {
        creates: Option<PathBuf>,
        ran: RefCell<Vec<(String, Option<PathBuf>)>>,
    }

    impl ShellExecutor for FakeShell {
        fn run(&self, command: &str, cwd: Option<&Path>) -> Result<CommandOutput> {
            self.ran
                .borrow_mut()
                .push((command.to_string(), cwd.map(Path::to_path_buf)));
            if command.contains("fail") {
                return Ok(CommandOutput {
                    code: Some(1),
                    stdout: String::new(),
                    stderr: "main.c:1: error: expected ';'\n".to_string(),
                });
            }
            if let Some(path) = &self.creates {
                fs::write(path, "")?;
            }
            Ok(CommandOutput {
                code: Some(0),
                ..Default::default()
            })
        }
    }

    #[derive(Default)]
    struct RecordingNotifier {
        errors: RefCell<Vec<String>>,
    }

    impl Notifier for RecordingNotifier {
        fn info(&self, _message: &str) {}
        fn warn(&self, _message: &str) {}
        fn error(&self, message: &str) {
            self.errors.borrow_mut().push(message.to_string());
        }
        fn prompt(&self, _message: &str, _choices: &[&str]) -> Option<usize> {
            None
        }
        fn status(&self, _message: &str) {}
        fn clear_status(&self) {}
        fn request_reload(&self, _message: &str) {}
    }

    fn c_provider(root: &Path, commands: &[&str]) -> ResolvedProvider {
        let file = root.join("main.c");
        let program = root.join("main");
        ResolvedProvider {
            language: LanguageId::new("c"),
            file,
            workspace_folder: Some(root.to_path_buf()),
            configuration: LaunchConfiguration::from_value(json!({
                "name": "Clang",
                "type": "lldb",
                "program": program.to_string_lossy(),
            })),
            commands: commands.iter().map(|c| c.to_string()).collect(),
            required_addons: Vec::new(),
            build_directory: None,
            cleanup: CleanupRule::CompiledBinary,
        }
    }

    #[test]
    fn test_run_commands_then_start() {
        let temp_dir = TempDir::new().unwrap();
        let host = FakeDebugHost::default();
        let shell = FakeShell::default();
        let notifier = RecordingNotifier::default();
        let localizer = Localizer::default();
        let mut lifecycle = SessionLifecycle::new(&host, &shell, &notifier, &localizer);

        let resolved = c_provider(temp_dir.path(), &["gcc -g main.c -o main", "strip main"]);
        let outcome = lifecycle.run(&resolved).unwrap();

        assert_eq!(outcome, LaunchOutcome::Started(SessionId("session-1".to_string())));
        let ran = shell.ran.borrow();
        assert_eq!(ran.len(), 2);
        assert_eq!(ran[0].1.as_deref(), Some(temp_dir.path()));
        assert_eq!(lifecycle.pending().len(), 1);
    }

    #[test]
    fn test_failing_command_aborts() {
        let temp_dir = TempDir::new().unwrap();
        let host = FakeDebugHost::default();
        let shell = FakeShell::default();
        let notifier = RecordingNotifier::default();
        let localizer = Localizer::default();
        let mut lifecycle = SessionLifecycle::new(&host, &shell, &notifier, &localizer);

        let resolved = c_provider(temp_dir.path(), &["gcc fail", "never runs"]);
        let err = lifecycle.run(&resolved).unwrap_err();

        assert!(matches!(err, Error::CommandFailed { ref output, .. } if output.contains("expected ';'")));
        assert_eq!(shell.ran.borrow().len(), 1);
        assert!(host.started.borrow().is_empty());
        assert_eq!(
            notifier.errors.borrow()[0],
            "Clang build failed:\nmain.c:1: error: expected ';'"
        );
        assert!(lifecycle.pending().is_empty());
    }

    #[test]
    fn test_rejected_session() {
        let temp_dir = TempDir::new().unwrap();
        let host = FakeDebugHost {
            reject: true,
            ..Default::default()
        };
        let shell = FakeShell::default();
        let notifier = RecordingNotifier::default();
        let localizer = Localizer::default();
        let mut lifecycle = SessionLifecycle::new(&host, &shell, &notifier, &localizer);

        let err = lifecycle.run(&c_provider(temp_dir.path(), &[])).unwrap_err();
        assert!(matches!(err, Error::SessionRejected { ref name, .. } if name == "Clang"));
        assert!(notifier.errors.borrow()[0].contains("'Clang'"));
        assert!(lifecycle.pending().is_empty());
    }

    #[test]
    fn test_command_field_dispatches() {
        let temp_dir = TempDir::new().unwrap();
        let host = FakeDebugHost::default();
        let shell = FakeShell::default();
        let notifier = RecordingNotifier::default();
        let localizer = Localizer::default();
        let mut lifecycle = SessionLifecycle::new(&host, &shell, &notifier, &localizer);

        let mut resolved = c_provider(temp_dir.path(), &[]);
        resolved
            .configuration
            .insert("command", "workbench.action.debug.start");

        let outcome = lifecycle.run(&resolved).unwrap();
        assert_eq!(
            outcome,
            LaunchOutcome::CommandDispatched("workbench.action.debug.start".to_string())
        );
        assert!(host.started.borrow().is_empty());
        assert_eq!(*host.commands.borrow(), vec!["workbench.action.debug.start".to_string()]);
    }

    #[test]
    fn test_termination_removes_binary_once() {
        let temp_dir = TempDir::new().unwrap();
        let host = FakeDebugHost::default();
        let shell = FakeShell {
            creates: Some(temp_dir.path().join("main")),
            ..Default::default()
        };
        let notifier = RecordingNotifier::default();
        let localizer = Localizer::default();
        let mut lifecycle =
            SessionLifecycle::new(&host, &shell, &notifier, &localizer).with_platform(Platform::Linux);

        fs::write(temp_dir.path().join("main.c"), "int main() {}").unwrap();
        fs::write(temp_dir.path().join("notes.txt"), "").unwrap();
        let resolved = c_provider(temp_dir.path(), &["gcc -g main.c -o main"]);

        let LaunchOutcome::Started(id) = lifecycle.run(&resolved).unwrap() else {
            panic!("expected a session");
        };
        let session = TerminatedSession {
            id,
            configuration: resolved.configuration.clone(),
        };

        let removed = lifecycle.on_session_terminated(&session);
        assert_eq!(removed, vec![temp_dir.path().join("main")]);
        assert!(temp_dir.path().join("main.c").exists());
        assert!(temp_dir.path().join("notes.txt").exists());

        // one-shot
        fs::write(temp_dir.path().join("main"), "").unwrap();
        assert!(lifecycle.on_session_terminated(&session).is_empty());
        assert!(temp_dir.path().join("main").exists());
    }

    #[test]
    fn test_existing_build_directory_is_kept() {
        let temp_dir = TempDir::new().unwrap();
        let build_dir = temp_dir.path().join(".debug");
        fs::create_dir_all(&build_dir).unwrap();
        fs::write(build_dir.join("keep.txt"), "mine").unwrap();

        let host = FakeDebugHost::default();
        let shell = FakeShell {
            creates: Some(build_dir.join("main")),
            ..Default::default()
        };
        let notifier = RecordingNotifier::default();
        let localizer = Localizer::default();
        let mut lifecycle =
            SessionLifecycle::new(&host, &shell, &notifier, &localizer).with_platform(Platform::Linux);

        let mut resolved = c_provider(temp_dir.path(), &["gcc -g main.c -o .debug/main"]);
        resolved
            .configuration
            .insert("program", build_dir.join("main").to_string_lossy().into_owned());
        resolved.build_directory = Some(build_dir.clone());

        let LaunchOutcome::Started(id) = lifecycle.run(&resolved).unwrap() else {
            panic!("expected a session");
        };
        assert_eq!(lifecycle.pending()[0].build_directory, None);

        let removed = lifecycle.on_session_terminated(&TerminatedSession {
            id,
            configuration: resolved.configuration.clone(),
        });
        assert_eq!(removed, vec![build_dir.join("main")]);
        assert!(build_dir.join("keep.txt").is_file());
    }

    #[test]
    fn test_created_build_directory_is_removed() {
        let temp_dir = TempDir::new().unwrap();
        let build_dir = temp_dir.path().join(".debug");
        let host = FakeDebugHost::default();
        let shell = FakeShell::default();
        let notifier = RecordingNotifier::default();
        let localizer = Localizer::default();
        let mut lifecycle =
            SessionLifecycle::new(&host, &shell, &notifier, &localizer).with_platform(Platform::Linux);

        let mut resolved = c_provider(temp_dir.path(), &[]);
        resolved.build_directory = Some(build_dir.clone());

        let LaunchOutcome::Started(id) = lifecycle.run(&resolved).unwrap() else {
            panic!("expected a session");
        };
        assert!(build_dir.is_dir());

        let removed = lifecycle.on_session_terminated(&TerminatedSession {
            id,
            configuration: resolved.configuration.clone(),
        });
        assert_eq!(removed, vec![build_dir.clone()]);
        assert!(!build_dir.exists());
    }

    #[test]
    fn test_unrelated_session_is_ignored() {
        let temp_dir = TempDir::new().unwrap();
        let host = FakeDebugHost::default();
        let shell = FakeShell::default();
        let notifier = RecordingNotifier::default();
        let localizer = Localizer::default();
        let mut lifecycle = SessionLifecycle::new(&host, &shell, &notifier, &localizer);

        lifecycle.run(&c_provider(temp_dir.path(), &[])).unwrap();
        let other = TerminatedSession {
            id: SessionId("other".to_string()),
            configuration: LaunchConfiguration::from_value(json!({
                "name": "Python",
                "type": "python",
                "program": "/elsewhere/app.py",
            })),
        };

        assert!(lifecycle.on_session_terminated(&other).is_empty());
        assert_eq!(lifecycle.pending().len(), 1);
    }

    #[test]
    fn test_build_directory_created_and_removed() {
        let temp_dir = TempDir::new().unwrap();
        let build_dir = temp_dir.path().join(".debug");
        let host = FakeDebugHost::default();
        let shell = FakeShell {
            creates: Some(build_dir.join("main")),
            ..Default::default()
        };
        let notifier = RecordingNotifier::default();
        let localizer = Localizer::default();
        let mut lifecycle =
            SessionLifecycle::new(&host, &shell, &notifier, &localizer).with_platform(Platform::Linux);

        let mut resolved = c_provider(temp_dir.path(), &["rustc -g main.rs"]);
        resolved
            .configuration
            .insert("program", build_dir.join("main").to_string_lossy().into_owned());
        resolved.build_directory = Some(build_dir.clone());

        lifecycle.run(&resolved).unwrap();
        assert!(build_dir.join("main").is_file());

        let removed = lifecycle.on_session_terminated(&TerminatedSession {
            id: SessionId("x".to_string()),
            configuration: LaunchConfiguration::from_value(json!({ "name": "Clang" })),
        });
        assert_eq!(removed, vec![build_dir.join("main"), build_dir.clone()]);
        assert!(!build_dir.exists());
        assert!(temp_dir.path().exists());
    }
}
