pub mod language;
pub mod serde_helpers;

pub use language::detect_language;
