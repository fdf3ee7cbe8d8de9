use debugfile_core::{
    LaunchConfiguration, Result,
    host::{DebugHost, SessionId, TerminatedSession},
};
use std::cell::{Cell, RefCell};
use std::io::{self, BufRead, Write};
use tracing::debug;

/// Hands launch configurations to whatever debugger is driving the terminal.
///
/// Starting a session prints the configuration as JSON on stdout. The
/// session is considered running until a line arrives on stdin.
#[derive(Default)]
pub struct ConsoleDebugHost {
    next_id: Cell<u32>,
    running: RefCell<Option<(SessionId, LaunchConfiguration)>>,
}

impl ConsoleDebugHost {
    pub fn new() -> Self {
        Self::default()
    }

    /// Block until the session ends; `None` when nothing was started
    pub fn wait_for_exit(&self) -> Option<TerminatedSession> {
        let (id, configuration) = self.running.borrow_mut().take()?;

        eprintln!("▶️  Session {} running, press Enter when it has ended", id.0);
        let mut line = String::new();
        if let Err(e) = io::stdin().lock().read_line(&mut line) {
            debug!("stdin closed: {}", e);
        }

        Some(TerminatedSession { id, configuration })
    }
}

impl DebugHost for ConsoleDebugHost {
    fn start_debugging(&self, configuration: &LaunchConfiguration) -> Result<SessionId> {
        let json = serde_json::to_string_pretty(configuration)?;
        let mut stdout = io::stdout().lock();
        writeln!(stdout, "{}", json)?;
        stdout.flush()?;

        let id = self.next_id.get() + 1;
        self.next_id.set(id);
        let session = SessionId(format!("session-{id}"));
        *self.running.borrow_mut() = Some((session.clone(), configuration.clone()));
        Ok(session)
    }

    fn execute_command(&self, command: &str) -> Result<()> {
        println!("{}", serde_json::json!({ "command": command }));
        Ok(())
    }
}
