//! The "debug current file" pipeline
//!
//! [`Debugger`] ties the pieces together: resolve the provider for a file,
//! check its companion add-ons, then hand it to the [`SessionLifecycle`].

use std::path::{Path, PathBuf};
use tracing::{debug, info};

use crate::{
    dependency::DependencyGate,
    error::Result,
    host::{
        AddonCatalog, AddonManager, DebugHost, Notifier, SettingsStore, ShellExecutor,
        TerminatedSession, Workspace,
    },
    i18n::Localizer,
    lifecycle::{LaunchOutcome, Platform, SessionLifecycle},
    registry::ProviderRegistry,
    resolver::{NodePackageLocator, PackageLocator, ProviderResolver, ResolutionContext},
    settings::Settings,
    types::{DependencyDecision, LanguageId, LaunchConfiguration, ResolvedProvider},
};

/// Host services the pipeline talks to
#[derive(Clone, Copy)]
pub struct HostServices<'a> {
    pub workspace: &'a dyn Workspace,
    pub debug_host: &'a dyn DebugHost,
    pub addons: &'a dyn AddonManager,
    pub catalog: &'a dyn AddonCatalog,
    pub notifier: &'a dyn Notifier,
    pub settings: &'a dyn SettingsStore,
    pub shell: &'a dyn ShellExecutor,
}

/// Caller supplied adjustments for one launch
#[derive(Debug, Clone, Default)]
pub struct DebugRequest {
    /// Appended to the configuration's `args`
    pub extra_args: Vec<String>,
    /// Merged over the provider template
    pub overrides: Option<LaunchConfiguration>,
}

impl DebugRequest {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_extra_args(mut self, args: Vec<String>) -> Self {
        self.extra_args = args;
        self
    }

    pub fn with_overrides(mut self, overrides: LaunchConfiguration) -> Self {
        self.overrides = Some(overrides);
        self
    }
}

/// Result of [`Debugger::debug_file`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DebugOutcome {
    /// No file, a missing file, or a language without provider
    Unsupported,
    /// The dependency gate stopped the launch
    Blocked(DependencyDecision),
    Launched(LaunchOutcome),
}

pub struct Debugger<'a> {
    registry: ProviderRegistry,
    hosts: HostServices<'a>,
    localizer: &'a Localizer,
    locator: Option<&'a dyn PackageLocator>,
    lifecycle: SessionLifecycle<'a>,
}

impl<'a> Debugger<'a> {
    /// A debugger with the built-in providers
    pub fn new(hosts: HostServices<'a>, localizer: &'a Localizer) -> Self {
        Self {
            registry: ProviderRegistry::new(),
            hosts,
            localizer,
            locator: None,
            lifecycle: SessionLifecycle::new(hosts.debug_host, hosts.shell, hosts.notifier, localizer),
        }
    }

    pub fn with_registry(mut self, registry: ProviderRegistry) -> Self {
        self.registry = registry;
        self
    }

    /// Replace the npm based runtime lookup
    pub fn with_locator(mut self, locator: &'a dyn PackageLocator) -> Self {
        self.locator = Some(locator);
        self
    }

    pub fn with_platform(mut self, platform: Platform) -> Self {
        self.lifecycle = self.lifecycle.with_platform(platform);
        self
    }

    pub fn registry(&self) -> &ProviderRegistry {
        &self.registry
    }

    /// Languages the host should enable "debug current file" for
    pub fn supported_languages(&self) -> Vec<&LanguageId> {
        self.registry.supported_languages()
    }

    /// Resolve without launching
    pub fn resolve(&self, file: Option<&Path>, request: &DebugRequest) -> Result<Option<ResolvedProvider>> {
        let Some(ctx) = self.context(file, request) else {
            return Ok(None);
        };

        let node;
        let locator: &dyn PackageLocator = match self.locator {
            Some(locator) => locator,
            None => {
                node = NodePackageLocator::new(self.hosts.shell);
                &node
            }
        };

        ProviderResolver::new(&self.registry, locator, self.hosts.notifier, self.localizer).resolve(&ctx)
    }

    /// Check the companion add-ons of `file` without launching.
    ///
    /// `None` when the file has no provider.
    pub fn check_companions(&self, file: &Path) -> Option<DependencyDecision> {
        if !file.is_file() {
            return None;
        }
        let language = self.hosts.workspace.language_of(file)?;
        let template = self.registry.lookup(language.as_str())?;
        Some(self.gate().check_to_install(&template.required_addons, file))
    }

    /// Resolve, gate and launch the given file, or the active one
    pub fn debug_file(&mut self, file: Option<&Path>, request: DebugRequest) -> Result<DebugOutcome> {
        let Some(resolved) = self.resolve(file, &request)? else {
            return Ok(DebugOutcome::Unsupported);
        };

        let decision = self
            .gate()
            .check_to_install(&resolved.required_addons, &resolved.file);
        if !decision.should_launch() {
            info!("Not launching {:?}: {:?}", resolved.file, decision);
            return Ok(DebugOutcome::Blocked(decision));
        }

        self.lifecycle.run(&resolved).map(DebugOutcome::Launched)
    }

    /// Forward a terminated session; returns the paths cleaned up
    pub fn session_terminated(&mut self, session: &TerminatedSession) -> Vec<PathBuf> {
        self.lifecycle.on_session_terminated(session)
    }

    fn gate(&self) -> DependencyGate<'_> {
        DependencyGate::new(
            self.hosts.workspace,
            self.hosts.addons,
            self.hosts.catalog,
            self.hosts.notifier,
            Settings::new(self.hosts.settings),
            self.localizer,
        )
    }

    fn context(&self, file: Option<&Path>, request: &DebugRequest) -> Option<ResolutionContext> {
        let file = match file {
            Some(file) => file.to_path_buf(),
            None => self.hosts.workspace.active_file()?,
        };

        let Some(language) = self.hosts.workspace.language_of(&file) else {
            debug!("Unknown language for {:?}", file);
            return None;
        };
        let workspace_folder = self.hosts.workspace.workspace_folder(&file);
        let file_directory_as_cwd =
            Settings::new(self.hosts.settings).file_directory_as_cwd(workspace_folder.as_deref());

        Some(
            ResolutionContext::new(file, language)
                .with_workspace_folder(workspace_folder)
                .with_extra_args(request.extra_args.clone())
                .with_overrides(request.overrides.clone())
                .with_file_directory_as_cwd(file_directory_as_cwd),
        )
    }
}
