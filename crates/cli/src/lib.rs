pub mod cli;
pub mod commands;
pub mod host;

// Re-export commonly used items
pub use cli::{Cli, Commands, GlobalArgs};
pub use host::{HostOptions, TerminalHost};
