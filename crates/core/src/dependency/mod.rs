//! Companion add-on gate
//!
//! Decides whether a launch may proceed when the provider needs add-ons that
//! are not installed, prompting the user at most as often as the configured
//! [`PromptPolicy`] allows.

mod matching;

pub use matching::{matches_installed, uninstalled};

use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

use crate::{
    host::{AddonCatalog, AddonManager, Notifier, Workspace},
    i18n::Localizer,
    settings::Settings,
    types::{DependencyDecision, PromptPolicy},
};

const INSTALL: usize = 0;
const SKIP: usize = 1;

/// Checks companion add-ons before a launch
pub struct DependencyGate<'a> {
    workspace: &'a dyn Workspace,
    addons: &'a dyn AddonManager,
    catalog: &'a dyn AddonCatalog,
    notifier: &'a dyn Notifier,
    settings: Settings<'a>,
    localizer: &'a Localizer,
}

impl<'a> DependencyGate<'a> {
    pub fn new(
        workspace: &'a dyn Workspace,
        addons: &'a dyn AddonManager,
        catalog: &'a dyn AddonCatalog,
        notifier: &'a dyn Notifier,
        settings: Settings<'a>,
        localizer: &'a Localizer,
    ) -> Self {
        Self {
            workspace,
            addons,
            catalog,
            notifier,
            settings,
            localizer,
        }
    }

    /// Decide whether debugging `file` may go ahead given `addon_ids`
    pub fn check_to_install(&self, addon_ids: &[String], file: &Path) -> DependencyDecision {
        let mut missing = uninstalled(addon_ids, &self.addons.installed());
        if missing.is_empty() {
            return DependencyDecision::Proceed;
        }

        let project: Option<PathBuf> = self.workspace.workspace_folder(file);
        let project = project.as_deref();
        let not_installed = missing.clone();
        debug!("Missing add-ons for {:?}: {:?}", file, missing);

        let policy = self.settings.prompt_policy(project);
        if policy == PromptPolicy::Never {
            return self.skipped(&not_installed);
        }

        let skipped = self.settings.skipped_addons(project);
        missing.retain(|id| !skipped.contains(&id.to_lowercase()));
        if missing.is_empty() {
            return self.skipped(&not_installed);
        }

        if policy == PromptPolicy::OncePerProject {
            let prompted = self.settings.prompted_addons(project);
            missing.retain(|id| !prompted.contains(&id.to_lowercase()));
            if missing.is_empty() {
                return self.skipped(&not_installed);
            }
            self.settings.add_prompted_addons(project, &missing);
        }

        let names = self.display_names(&missing);
        let message = self.localizer.localize("box.install.extensions", &[&names]);
        let install = self.localizer.localize("button.install", &[]);
        let skip = self.localizer.localize("button.skip", &[]);
        let dismiss = self.localizer.localize("button.dismiss", &[]);

        match self.notifier.prompt(&message, &[&install, &skip, &dismiss]) {
            Some(INSTALL) => self.install(&missing),
            Some(SKIP) => {
                info!("Skipping {:?} from now on", missing);
                self.settings.add_skipped_addons(project, &missing);
                DependencyDecision::SkippedPermanently
            }
            _ => DependencyDecision::Cancelled,
        }
    }

    fn skipped(&self, ids: &[String]) -> DependencyDecision {
        self.notifier.info(
            &self
                .localizer
                .localize("info.extensions.skipped", &[&self.display_names(ids)]),
        );
        DependencyDecision::SkippedPermanently
    }

    fn install(&self, ids: &[String]) -> DependencyDecision {
        let total = ids.len().to_string();
        let mut failed = Vec::new();

        for (index, id) in ids.iter().enumerate() {
            let name = self.display_name(id);
            self.notifier.status(&self.localizer.localize(
                "status.installing.extension",
                &[&name, &(index + 1).to_string(), &total],
            ));

            // a stale copy may be half-installed
            if let Err(e) = self.addons.uninstall(id) {
                debug!("Uninstall of {} skipped: {}", id, e);
            }
            match self.addons.install(id) {
                Ok(()) => info!("Installed {}", id),
                Err(e) => {
                    warn!("Failed to install {}: {}", id, e);
                    failed.push(id.clone());
                }
            }
        }
        self.notifier.clear_status();

        if !failed.is_empty() {
            self.notifier.error(
                &self
                    .localizer
                    .localize("error.install.extensions", &[&self.display_names(&failed)]),
            );
        }

        if failed.len() == ids.len() {
            return DependencyDecision::Cancelled;
        }

        self.notifier
            .request_reload(&self.localizer.localize("box.reload", &[]));
        DependencyDecision::AwaitingReload
    }

    fn display_name(&self, id: &str) -> String {
        self.catalog.display_name(id).unwrap_or_else(|| id.to_string())
    }

    fn display_names(&self, ids: &[String]) -> String {
        ids.iter()
            .map(|id| self.display_name(id))
            .collect::<Vec<_>>()
            .join(", ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{Error, Result};
    use crate::host::{SettingsScope, SettingsStore};
    use crate::settings::{JsonSettingsStore, PROMPT_BEHAVIOR, SKIPPED_EXTENSIONS};
    use crate::types::LanguageId;
    use serde_json::json;
    use std::cell::{Cell, RefCell};
    use tempfile::TempDir;

    struct FixedWorkspace(Option<PathBuf>);

    impl Workspace for FixedWorkspace {
        fn language_of(&self, _file: &Path) -> Option<LanguageId> {
            None
        }
        fn workspace_folder(&self, _file: &Path) -> Option<PathBuf> {
            self.0.clone()
        }
        fn active_file(&self) -> Option<PathBuf> {
            None
        }
    }

    #[derive(Default)]
    struct FakeAddons {
        installed: RefCell<Vec<String>>,
        broken: Vec<String>,
        install_calls: Cell<usize>,
    }

    impl AddonManager for FakeAddons {
        fn installed(&self) -> Vec<String> {
            self.installed.borrow().clone()
        }
        fn install(&self, id: &str) -> Result<()> {
            self.install_calls.set(self.install_calls.get() + 1);
            if self.broken.iter().any(|b| b == id) {
                return Err(Error::HostError(format!("{id} unavailable")));
            }
            self.installed.borrow_mut().push(id.to_string());
            Ok(())
        }
        fn uninstall(&self, id: &str) -> Result<()> {
            Err(Error::HostError(format!("{id} is not installed")))
        }
    }

    struct Catalog;

    impl AddonCatalog for Catalog {
        fn display_name(&self, id: &str) -> Option<String> {
            (id == "ms-python.python").then(|| "Python".to_string())
        }
    }

    /// Answers every prompt with the same choice
    struct ScriptedNotifier {
        choice: Option<usize>,
        prompts: RefCell<Vec<String>>,
        infos: RefCell<Vec<String>>,
        errors: RefCell<Vec<String>>,
        reloads: Cell<usize>,
    }

    impl ScriptedNotifier {
        fn answering(choice: Option<usize>) -> Self {
            Self {
                choice,
                prompts: RefCell::new(Vec::new()),
                infos: RefCell::new(Vec::new()),
                errors: RefCell::new(Vec::new()),
                reloads: Cell::new(0),
            }
        }
    }

    impl Notifier for ScriptedNotifier {
        fn info(&self, message: &str) {
            self.infos.borrow_mut().push(message.to_string());
        }
        fn warn(&self, _message: &str) {}
        fn error(&self, message: &str) {
            self.errors.borrow_mut().push(message.to_string());
        }
        fn prompt(&self, message: &str, choices: &[&str]) -> Option<usize> {
            assert_eq!(choices.len(), 3);
            self.prompts.borrow_mut().push(message.to_string());
            self.choice
        }
        fn status(&self, _message: &str) {}
        fn clear_status(&self) {}
        fn request_reload(&self, _message: &str) {
            self.reloads.set(self.reloads.get() + 1);
        }
    }

    struct Fixture {
        temp_dir: TempDir,
        store: JsonSettingsStore,
        workspace: FixedWorkspace,
        addons: FakeAddons,
        localizer: Localizer,
    }

    impl Fixture {
        fn new() -> Self {
            let temp_dir = TempDir::new().unwrap();
            let store = JsonSettingsStore::new(Some(temp_dir.path().join("global.json")));
            let workspace = FixedWorkspace(Some(temp_dir.path().join("proj")));
            Self {
                temp_dir,
                store,
                workspace,
                addons: FakeAddons::default(),
                localizer: Localizer::default(),
            }
        }

        fn file(&self) -> PathBuf {
            self.temp_dir.path().join("proj/app.py")
        }

        fn check(&self, notifier: &ScriptedNotifier, ids: &[&str]) -> DependencyDecision {
            let ids: Vec<String> = ids.iter().map(|s| s.to_string()).collect();
            DependencyGate::new(
                &self.workspace,
                &self.addons,
                &Catalog,
                notifier,
                Settings::new(&self.store),
                &self.localizer,
            )
            .check_to_install(&ids, &self.file())
        }
    }

    #[test]
    fn test_all_installed_proceeds() {
        let fx = Fixture::new();
        fx.addons.installed.borrow_mut().push("MS-Python.Python".to_string());
        let notifier = ScriptedNotifier::answering(Some(INSTALL));

        assert_eq!(fx.check(&notifier, &["ms-python.python"]), DependencyDecision::Proceed);
        assert_eq!(fx.check(&notifier, &[]), DependencyDecision::Proceed);
        assert_eq!(fx.addons.install_calls.get(), 0);
        assert!(notifier.prompts.borrow().is_empty());
    }

    #[test]
    fn test_install_awaits_reload() {
        let fx = Fixture::new();
        let notifier = ScriptedNotifier::answering(Some(INSTALL));

        assert_eq!(
            fx.check(&notifier, &["ms-python.python"]),
            DependencyDecision::AwaitingReload
        );
        assert_eq!(notifier.prompts.borrow()[0], "Debugging this file requires Python. Install now?");
        assert_eq!(fx.addons.install_calls.get(), 1);
        assert_eq!(notifier.reloads.get(), 1);
    }

    #[test]
    fn test_install_continues_past_failures() {
        let mut fx = Fixture::new();
        fx.addons.broken = vec!["vadimcn.vscode-lldb".to_string()];
        let notifier = ScriptedNotifier::answering(Some(INSTALL));

        let decision = fx.check(&notifier, &["vadimcn.vscode-lldb", "rust-lang.rust-analyzer"]);
        assert_eq!(decision, DependencyDecision::AwaitingReload);
        assert_eq!(fx.addons.install_calls.get(), 2);
        assert_eq!(notifier.errors.borrow().len(), 1);
    }

    #[test]
    fn test_every_install_failing_cancels() {
        let mut fx = Fixture::new();
        fx.addons.broken = vec!["golang.go".to_string()];
        let notifier = ScriptedNotifier::answering(Some(INSTALL));

        assert_eq!(fx.check(&notifier, &["golang.go"]), DependencyDecision::Cancelled);
        assert_eq!(notifier.reloads.get(), 0);
        assert_eq!(notifier.errors.borrow().len(), 1);
    }

    #[test]
    fn test_once_per_project_prompts_once() {
        for choice in [Some(INSTALL), Some(SKIP), Some(2), None] {
            let mut fx = Fixture::new();
            fx.addons.broken = vec!["golang.go".to_string()];
            let notifier = ScriptedNotifier::answering(choice);

            fx.check(&notifier, &["golang.go"]);
            let second = fx.check(&notifier, &["golang.go"]);

            assert_eq!(second, DependencyDecision::SkippedPermanently, "{choice:?}");
            assert_eq!(notifier.prompts.borrow().len(), 1, "{choice:?}");
        }
    }

    #[test]
    fn test_prompted_list_survives_restart() {
        let fx = Fixture::new();
        fx.check(&ScriptedNotifier::answering(None), &["golang.go"]);

        // a fresh store reads the same files
        let store = JsonSettingsStore::new(Some(fx.temp_dir.path().join("global.json")));
        let notifier = ScriptedNotifier::answering(None);
        let decision = DependencyGate::new(
            &fx.workspace,
            &fx.addons,
            &Catalog,
            &notifier,
            Settings::new(&store),
            &fx.localizer,
        )
        .check_to_install(&["golang.go".to_string()], &fx.file());

        assert_eq!(decision, DependencyDecision::SkippedPermanently);
        assert!(notifier.prompts.borrow().is_empty());
    }

    #[test]
    fn test_dismiss_cancels() {
        let fx = Fixture::new();
        let notifier = ScriptedNotifier::answering(None);
        assert_eq!(fx.check(&notifier, &["golang.go"]), DependencyDecision::Cancelled);
        assert_eq!(
            fx.store
                .get(&SettingsScope::Project(fx.temp_dir.path().join("proj")), SKIPPED_EXTENSIONS)
                .unwrap(),
            None
        );
    }

    #[test]
    fn test_skip_is_persisted_in_project() {
        let fx = Fixture::new();
        fx.store
            .update(&SettingsScope::Global, PROMPT_BEHAVIOR, Some(json!("always")))
            .unwrap();

        let notifier = ScriptedNotifier::answering(Some(SKIP));
        assert_eq!(fx.check(&notifier, &["golang.go"]), DependencyDecision::SkippedPermanently);
        assert_eq!(
            fx.store
                .get(&SettingsScope::Project(fx.temp_dir.path().join("proj")), SKIPPED_EXTENSIONS)
                .unwrap(),
            Some(json!(["golang.go"]))
        );

        // `always` still honours the skip-list
        let again = ScriptedNotifier::answering(Some(INSTALL));
        assert_eq!(fx.check(&again, &["Golang.Go"]), DependencyDecision::SkippedPermanently);
        assert!(again.prompts.borrow().is_empty());
        assert_eq!(again.infos.borrow().len(), 1);
    }

    #[test]
    fn test_always_prompts_every_time() {
        let fx = Fixture::new();
        fx.store
            .update(&SettingsScope::Global, PROMPT_BEHAVIOR, Some(json!("Always")))
            .unwrap();
        let notifier = ScriptedNotifier::answering(None);

        fx.check(&notifier, &["golang.go"]);
        fx.check(&notifier, &["golang.go"]);
        assert_eq!(notifier.prompts.borrow().len(), 2);
    }

    #[test]
    fn test_never_policy_skips_without_prompt() {
        let fx = Fixture::new();
        fx.store
            .update(
                &SettingsScope::Project(fx.temp_dir.path().join("proj")),
                PROMPT_BEHAVIOR,
                Some(json!("never")),
            )
            .unwrap();
        let notifier = ScriptedNotifier::answering(Some(INSTALL));

        assert_eq!(fx.check(&notifier, &["golang.go"]), DependencyDecision::SkippedPermanently);
        assert!(notifier.prompts.borrow().is_empty());
        assert_eq!(fx.addons.install_calls.get(), 0);
    }
}
