use crate::impl_case_insensitive_deserialize;
use serde::Serialize;

/// Outcome of checking a provider's companion add-ons.
///
/// Only [`DependencyDecision::Proceed`] lets the launch pipeline continue.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DependencyDecision {
    /// Everything required is installed
    Proceed,
    /// Missing add-ons are skipped by policy or by an earlier user choice
    SkippedPermanently,
    /// The user dismissed the prompt
    Cancelled,
    /// Add-ons were installed; the host has to reload before they are usable
    AwaitingReload,
}

impl DependencyDecision {
    pub fn should_launch(self) -> bool {
        matches!(self, DependencyDecision::Proceed)
    }
}

/// When to offer installing missing companion add-ons
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum PromptPolicy {
    Always,
    #[default]
    OncePerProject,
    Never,
}

impl_case_insensitive_deserialize!(
    PromptPolicy,
    Always => "always",
    OncePerProject => "onceperproject",
    Never => "never"
);
