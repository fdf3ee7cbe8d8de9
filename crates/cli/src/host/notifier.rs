use debugfile_core::host::Notifier;
use std::io::{self, BufRead, IsTerminal, Write};

/// Messages on stderr, prompts answered on stdin.
///
/// When stdin is not a terminal every prompt counts as dismissed.
#[derive(Debug, Clone, Copy, Default)]
pub struct TerminalNotifier {
    interactive: bool,
}

impl TerminalNotifier {
    pub fn new() -> Self {
        Self {
            interactive: io::stdin().is_terminal(),
        }
    }

    pub fn non_interactive() -> Self {
        Self { interactive: false }
    }
}

impl Notifier for TerminalNotifier {
    fn info(&self, message: &str) {
        eprintln!("ℹ️  {}", message);
    }

    fn warn(&self, message: &str) {
        eprintln!("⚠️  {}", message);
    }

    fn error(&self, message: &str) {
        eprintln!("❌ {}", message);
    }

    fn prompt(&self, message: &str, choices: &[&str]) -> Option<usize> {
        if !self.interactive {
            tracing::debug!("Not prompting without a terminal: {}", message);
            return None;
        }

        eprintln!("❓ {}", message);
        for (index, choice) in choices.iter().enumerate() {
            eprintln!("   {}) {}", index + 1, choice);
        }
        eprint!("> ");
        io::stderr().flush().ok();

        let mut answer = String::new();
        io::stdin().lock().read_line(&mut answer).ok()?;
        parse_choice(&answer, choices.len())
    }

    fn status(&self, message: &str) {
        eprintln!("⏳ {}", message);
    }

    fn clear_status(&self) {}

    fn request_reload(&self, message: &str) {
        eprintln!("🔄 {}", message);
    }
}

/// 1-based answer to a 0-based choice index
fn parse_choice(answer: &str, count: usize) -> Option<usize> {
    answer
        .trim()
        .parse::<usize>()
        .ok()
        .filter(|n| (1..=count).contains(n))
        .map(|n| n - 1)
}
