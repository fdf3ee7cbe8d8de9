pub mod configuration;
pub mod decision;
pub mod language;
pub mod provider;

// Re-export commonly used types
pub use configuration::LaunchConfiguration;
pub use decision::{DependencyDecision, PromptPolicy};
pub use language::LanguageId;
pub use provider::{CleanupRule, ProviderTemplate, ResolvedProvider, RuntimeStrategy};
