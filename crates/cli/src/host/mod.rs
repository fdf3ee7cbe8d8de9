//! Terminal implementations of the host traits

pub mod addons;
pub mod catalog;
pub mod console;
pub mod notifier;
pub mod workspace;

pub use addons::EditorAddons;
pub use catalog::MarketplaceCatalog;
pub use console::ConsoleDebugHost;
pub use notifier::TerminalNotifier;
pub use workspace::{CliWorkspace, ROOT_MARKERS, find_root, project_root};

use anyhow::{Context, Result};
use debugfile_core::{
    HostServices, JsonSettingsStore, LanguageId, Locale, Localizer,
    host::{AddonCatalog, NoCatalog, SystemShell},
};
use std::path::PathBuf;
use tracing::debug;

const SETTINGS_FILE: &str = "settings.json";

/// Options shared by every subcommand
#[derive(Debug, Clone, Default)]
pub struct HostOptions {
    pub workspace: Option<PathBuf>,
    pub language: Option<String>,
    pub editor: String,
    pub offline: bool,
    pub config_dir: Option<PathBuf>,
    pub nls_dir: Option<PathBuf>,
}

/// Global settings file: `<config dir>/debugfile/settings.json`
pub fn global_settings_path(config_dir: Option<&PathBuf>) -> Option<PathBuf> {
    let dir = match config_dir {
        Some(dir) => dir.clone(),
        None => dirs::config_dir()?.join("debugfile"),
    };
    Some(dir.join(SETTINGS_FILE))
}

/// Every host service the terminal front-end provides
pub struct TerminalHost {
    pub workspace: CliWorkspace,
    pub debug_host: ConsoleDebugHost,
    pub addons: EditorAddons,
    pub catalog: Box<dyn AddonCatalog>,
    pub notifier: TerminalNotifier,
    pub settings: JsonSettingsStore,
    pub shell: SystemShell,
    pub localizer: Localizer,
}

impl TerminalHost {
    pub fn new(options: &HostOptions) -> Result<Self> {
        let locale = Locale::from_env();
        let localizer = match &options.nls_dir {
            Some(dir) => Localizer::load(dir, locale)
                .with_context(|| format!("Failed to load message bundles from {}", dir.display()))?,
            None => Localizer::builtin(locale),
        };
        debug!("Using locale {}", localizer.locale().tag());

        let catalog: Box<dyn AddonCatalog> = if options.offline {
            Box::new(NoCatalog)
        } else {
            Box::new(MarketplaceCatalog::new())
        };

        let root = options
            .workspace
            .as_ref()
            .map(|dir| {
                std::fs::canonicalize(dir).with_context(|| format!("No such workspace: {}", dir.display()))
            })
            .transpose()?;
        let workspace = CliWorkspace::new()
            .with_root(root)
            .with_language(options.language.as_deref().map(LanguageId::new));

        Ok(Self {
            workspace,
            debug_host: ConsoleDebugHost::new(),
            addons: EditorAddons::new(options.editor.clone()),
            catalog,
            notifier: TerminalNotifier::new(),
            settings: JsonSettingsStore::new(global_settings_path(options.config_dir.as_ref())),
            shell: SystemShell::new(),
            localizer,
        })
    }

    pub fn services(&self) -> HostServices<'_> {
        HostServices {
            workspace: &self.workspace,
            debug_host: &self.debug_host,
            addons: &self.addons,
            catalog: self.catalog.as_ref(),
            notifier: &self.notifier,
            settings: &self.settings,
            shell: &self.shell,
        }
    }
}
