use serde::Serialize;
use std::path::PathBuf;

use super::{LanguageId, LaunchConfiguration};

/// Per-language launch template.
///
/// String values anywhere in `configuration`, `commands` and
/// `build_directory` may contain `${placeholder}` tokens.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProviderTemplate {
    pub configuration: LaunchConfiguration,
    /// Shell commands run in order before launching
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub commands: Vec<String>,
    /// Companion add-ons (`publisher.name`) providing the debug adapter
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub required_addons: Vec<String>,
    /// Dynamic interpreter detection for transpile-on-the-fly languages
    #[serde(skip_serializing_if = "Option::is_none")]
    pub runtime: Option<RuntimeStrategy>,
    /// Directory created before the commands run and removed after the session
    #[serde(skip_serializing_if = "Option::is_none")]
    pub build_directory: Option<String>,
    pub cleanup: CleanupRule,
}

impl ProviderTemplate {
    pub fn new(configuration: LaunchConfiguration) -> Self {
        Self {
            configuration,
            ..Default::default()
        }
    }

    pub fn with_commands<I, S>(mut self, commands: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.commands = commands.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_required_addons<I, S>(mut self, addons: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.required_addons = addons.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_runtime(mut self, runtime: RuntimeStrategy) -> Self {
        self.runtime = Some(runtime);
        self
    }

    pub fn with_build_directory(mut self, directory: impl Into<String>) -> Self {
        self.build_directory = Some(directory.into());
        self
    }

    pub fn with_cleanup(mut self, cleanup: CleanupRule) -> Self {
        self.cleanup = cleanup;
        self
    }
}

/// How to run a source file through a companion runtime package.
///
/// When the package cannot be found the resolver falls back to a sibling file
/// with `compiled_extension`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RuntimeStrategy {
    /// Package looked up in the global and project package roots
    pub package: String,
    /// Value written to `runtimeExecutable` when the package is found
    pub executable: String,
    /// Extension (without dot) of the already compiled sibling file
    pub compiled_extension: String,
    /// Run once to install the package when it is missing everywhere
    #[serde(skip_serializing_if = "Option::is_none")]
    pub install_command: Option<String>,
}

impl RuntimeStrategy {
    pub fn new(
        package: impl Into<String>,
        executable: impl Into<String>,
        compiled_extension: impl Into<String>,
    ) -> Self {
        Self {
            package: package.into(),
            executable: executable.into(),
            compiled_extension: compiled_extension.into(),
            install_command: None,
        }
    }

    pub fn with_install_command(mut self, command: impl Into<String>) -> Self {
        self.install_command = Some(command.into());
        self
    }
}

/// Artifacts to delete once the launched session terminates
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum CleanupRule {
    /// Interpreted languages leave nothing behind
    #[default]
    None,
    /// Remove the binary at `program` and its debug-symbol bundle
    CompiledBinary,
}

/// A provider after merging and placeholder substitution, ready to launch.
///
/// Created per request and never cached.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolvedProvider {
    pub language: LanguageId,
    pub file: PathBuf,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub workspace_folder: Option<PathBuf>,
    pub configuration: LaunchConfiguration,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub commands: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub required_addons: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub build_directory: Option<PathBuf>,
    pub cleanup: CleanupRule,
}
