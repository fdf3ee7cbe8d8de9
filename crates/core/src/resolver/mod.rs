//! Turns a file plus a provider template into a launch-ready configuration
//!
//! Resolution runs fresh for every request: merge the template with the
//! defaults and the caller's overrides, apply the runtime strategy, then
//! substitute placeholders throughout.

mod merge;
mod runtime;

pub use merge::{base_configuration, merge_configuration};
pub use runtime::{NodePackageLocator, PackageLocator, find_in_projects, runtime_executable};

use std::path::{Path, PathBuf};
use tracing::{debug, warn};

use crate::{
    error::{Error, Result},
    host::Notifier,
    i18n::Localizer,
    placeholder::{PlaceholderContext, resolve_all, substitute_value},
    registry::ProviderRegistry,
    types::{LanguageId, LaunchConfiguration, ResolvedProvider, RuntimeStrategy},
};

/// Inputs for one resolution
#[derive(Debug, Clone)]
pub struct ResolutionContext {
    pub file: PathBuf,
    pub workspace_folder: Option<PathBuf>,
    pub language: LanguageId,
    /// Appended after the template and override arguments
    pub extra_args: Vec<String>,
    pub overrides: Option<LaunchConfiguration>,
    pub file_directory_as_cwd: bool,
}

impl ResolutionContext {
    pub fn new(file: impl Into<PathBuf>, language: impl Into<LanguageId>) -> Self {
        Self {
            file: file.into(),
            workspace_folder: None,
            language: language.into(),
            extra_args: Vec::new(),
            overrides: None,
            file_directory_as_cwd: false,
        }
    }

    pub fn with_workspace_folder(mut self, folder: Option<PathBuf>) -> Self {
        self.workspace_folder = folder;
        self
    }

    pub fn with_extra_args(mut self, args: Vec<String>) -> Self {
        self.extra_args = args;
        self
    }

    pub fn with_overrides(mut self, overrides: Option<LaunchConfiguration>) -> Self {
        self.overrides = overrides;
        self
    }

    pub fn with_file_directory_as_cwd(mut self, enabled: bool) -> Self {
        self.file_directory_as_cwd = enabled;
        self
    }

    fn placeholders(&self) -> PlaceholderContext {
        PlaceholderContext::new(self.file.clone(), self.workspace_folder.clone())
            .with_file_directory_as_cwd(self.file_directory_as_cwd)
    }
}

/// Resolves launch configurations against a [`ProviderRegistry`]
pub struct ProviderResolver<'a> {
    registry: &'a ProviderRegistry,
    locator: &'a dyn PackageLocator,
    notifier: &'a dyn Notifier,
    localizer: &'a Localizer,
}

impl<'a> ProviderResolver<'a> {
    pub fn new(
        registry: &'a ProviderRegistry,
        locator: &'a dyn PackageLocator,
        notifier: &'a dyn Notifier,
        localizer: &'a Localizer,
    ) -> Self {
        Self {
            registry,
            locator,
            notifier,
            localizer,
        }
    }

    /// Resolve the provider for `ctx`.
    ///
    /// Returns `Ok(None)` when the file does not exist or the language has no
    /// provider. Fails with [`Error::RuntimeUnavailable`] when the template's
    /// runtime is missing and there is no compiled fallback; the user has
    /// already been told in that case.
    pub fn resolve(&self, ctx: &ResolutionContext) -> Result<Option<ResolvedProvider>> {
        if !ctx.file.is_file() {
            debug!("Not debugging missing file {:?}", ctx.file);
            return Ok(None);
        }

        let Some(template) = self.registry.lookup(ctx.language.as_str()) else {
            debug!("No provider for language `{}`", ctx.language);
            return Ok(None);
        };

        let mut configuration = merge_configuration(
            &ctx.file,
            &template.configuration,
            ctx.overrides.as_ref(),
            &ctx.extra_args,
        );

        if let Some(runtime) = &template.runtime {
            self.apply_runtime(&ctx.file, runtime, &mut configuration)?;
        }

        // Build output needs an absolute anchor; without a workspace folder
        // the file's own directory stands in for it
        let placeholders = if template.build_directory.is_some() && ctx.workspace_folder.is_none() {
            ctx.placeholders().with_file_directory_as_cwd(true)
        } else {
            ctx.placeholders()
        };
        let configuration =
            LaunchConfiguration::from_value(substitute_value(&configuration.into_value(), &placeholders));
        let commands = template
            .commands
            .iter()
            .map(|command| resolve_all(command, &placeholders))
            .collect();
        let build_directory = template
            .build_directory
            .as_deref()
            .map(|dir| PathBuf::from(resolve_all(dir, &placeholders)));

        debug!(
            "Resolved `{}` for {:?}: {:?}",
            ctx.language, ctx.file, configuration
        );

        Ok(Some(ResolvedProvider {
            language: ctx.language.clone(),
            file: ctx.file.clone(),
            workspace_folder: ctx.workspace_folder.clone(),
            configuration,
            commands,
            required_addons: template.required_addons.clone(),
            build_directory,
            cleanup: template.cleanup,
        }))
    }

    fn apply_runtime(
        &self,
        file: &Path,
        runtime: &RuntimeStrategy,
        configuration: &mut LaunchConfiguration,
    ) -> Result<()> {
        if let Some(located) = self.locator.locate(file, runtime) {
            configuration.insert("runtimeExecutable", runtime_executable(&located, runtime));
            configuration.insert("program", file.to_string_lossy().into_owned());
            return Ok(());
        }

        let fallback = file.with_extension(&runtime.compiled_extension);
        if fallback.is_file() {
            if fallback != file {
                let name = file_name(&fallback);
                warn!("{} not found, using {:?}", runtime.package, fallback);
                self.notifier
                    .warn(&self.localizer.localize("error.no.tsx", &[&name]));
            }
            configuration.insert("program", fallback.to_string_lossy().into_owned());
            return Ok(());
        }

        self.notifier.error(&self.localizer.localize(
            "error.compile.error",
            &[&file_name(file), &file_name(&fallback)],
        ));
        Err(Error::RuntimeUnavailable {
            runtime: runtime.package.clone(),
            file: file.to_path_buf(),
            fallback,
        })
    }
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.to_string_lossy().into_owned())
}
