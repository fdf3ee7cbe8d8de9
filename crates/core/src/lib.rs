//! debugfile - Debug the current file without writing a launch configuration
//!
//! This crate provides functionality to:
//! - Map a file's language to a debug launch template
//! - Resolve `${placeholder}` tokens and merge caller overrides into it
//! - Check and install the editor add-ons that provide the debug adapter
//! - Run pre-launch build commands, start the session and clean up afterwards
//!
//! The host editor is reached only through the traits in [`host`].
pub mod debugger;
pub mod dependency;
pub mod error;
pub mod host;
pub mod i18n;
pub mod lifecycle;
pub mod placeholder;
pub mod registry;
pub mod resolver;
pub mod settings;
pub mod types;
pub mod utils;

// Re-export commonly used types and traits
pub use error::{Error, Result};
pub use types::*;

// Re-export main API components
pub use debugger::{DebugOutcome, DebugRequest, Debugger, HostServices};
pub use dependency::DependencyGate;
pub use i18n::{Locale, Localizer};
pub use lifecycle::{LaunchOutcome, Platform, SessionLifecycle};
pub use registry::{ProviderRegistry, ProviderRegistryBuilder};
pub use resolver::{ProviderResolver, ResolutionContext};
pub use settings::{JsonSettingsStore, Settings};
pub use utils::detect_language;
