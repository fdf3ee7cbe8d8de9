use std::io;
use std::path::PathBuf;

/// Errors that can occur while resolving or launching a debug configuration
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("IO error: {0}")]
    IoError(#[from] io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Settings error: {0}")]
    SettingsError(String),

    #[error("No runtime `{runtime}` found for {file} and no compiled fallback at {fallback}")]
    RuntimeUnavailable {
        runtime: String,
        file: PathBuf,
        fallback: PathBuf,
    },

    #[error("Command `{command}` failed: {output}")]
    CommandFailed { command: String, output: String },

    #[error("Debug session `{name}` could not be started: {reason}")]
    SessionRejected { name: String, reason: String },

    #[error("Host error: {0}")]
    HostError(String),

    #[error("Localization error: {0}")]
    LocaleError(String),
}

/// Result type alias for debugfile operations
pub type Result<T> = std::result::Result<T, Error>;
