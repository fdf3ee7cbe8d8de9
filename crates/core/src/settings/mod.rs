//! Typed access to persisted settings
//!
//! Values are read through the store on every call. Read failures fall back
//! to defaults and write failures are logged; neither aborts a launch.

mod store;

pub use store::{JsonSettingsStore, PROJECT_SETTINGS_FILE};

use serde::de::DeserializeOwned;
use serde_json::Value;
use std::collections::BTreeSet;
use std::path::Path;
use tracing::warn;

use crate::{
    host::{SettingsScope, SettingsStore},
    types::PromptPolicy,
};

pub const PROMPT_BEHAVIOR: &str = "extensionPromptBehavior";
pub const SKIPPED_EXTENSIONS: &str = "skippedExtensions";
pub const PROMPT_SHOWN_EXTENSIONS: &str = "promptShownExtensions";
pub const FILE_DIRECTORY_AS_CWD: &str = "fileDirectoryAsCwd";

/// Settings view over a [`SettingsStore`]
#[derive(Clone, Copy)]
pub struct Settings<'a> {
    store: &'a dyn SettingsStore,
}

impl<'a> Settings<'a> {
    pub fn new(store: &'a dyn SettingsStore) -> Self {
        Self { store }
    }

    /// Project scope when the file belongs to one, global otherwise
    pub fn scope_for(project: Option<&Path>) -> SettingsScope {
        match project {
            Some(root) => SettingsScope::Project(root.to_path_buf()),
            None => SettingsScope::Global,
        }
    }

    fn read<T: DeserializeOwned>(&self, scope: &SettingsScope, key: &str) -> Option<T> {
        let value = match self.store.get(scope, key) {
            Ok(value) => value?,
            Err(e) => {
                warn!("Failed to read setting `{}` ({:?}): {}", key, scope, e);
                return None;
            }
        };

        match serde_json::from_value(value) {
            Ok(parsed) => Some(parsed),
            Err(e) => {
                warn!("Ignoring invalid value for `{}` ({:?}): {}", key, scope, e);
                None
            }
        }
    }

    /// Project value first, then global
    fn read_layered<T: DeserializeOwned>(&self, project: Option<&Path>, key: &str) -> Option<T> {
        project
            .and_then(|root| self.read(&SettingsScope::Project(root.to_path_buf()), key))
            .or_else(|| self.read(&SettingsScope::Global, key))
    }

    fn write(&self, scope: &SettingsScope, key: &str, value: Option<Value>) {
        if let Err(e) = self.store.update(scope, key, value) {
            warn!("Failed to persist setting `{}` ({:?}): {}", key, scope, e);
        }
    }

    fn read_ids(&self, scope: &SettingsScope, key: &str) -> BTreeSet<String> {
        self.read::<Vec<String>>(scope, key)
            .unwrap_or_default()
            .into_iter()
            .map(|id| id.to_lowercase())
            .collect()
    }

    fn append_ids(&self, scope: &SettingsScope, key: &str, ids: &[String]) {
        let mut all = self.read::<Vec<String>>(scope, key).unwrap_or_default();
        for id in ids {
            if !all.iter().any(|existing| existing.eq_ignore_ascii_case(id)) {
                all.push(id.clone());
            }
        }
        self.write(scope, key, Some(Value::from(all)));
    }

    pub fn prompt_policy(&self, project: Option<&Path>) -> PromptPolicy {
        self.read_layered(project, PROMPT_BEHAVIOR).unwrap_or_default()
    }

    pub fn file_directory_as_cwd(&self, project: Option<&Path>) -> bool {
        self.read_layered(project, FILE_DIRECTORY_AS_CWD).unwrap_or(false)
    }

    /// Lowercased ids skipped in the project or globally
    pub fn skipped_addons(&self, project: Option<&Path>) -> BTreeSet<String> {
        let mut ids = self.read_ids(&SettingsScope::Global, SKIPPED_EXTENSIONS);
        if let Some(root) = project {
            ids.extend(self.read_ids(&SettingsScope::Project(root.to_path_buf()), SKIPPED_EXTENSIONS));
        }
        ids
    }

    pub fn add_skipped_addons(&self, project: Option<&Path>, ids: &[String]) {
        self.append_ids(&Self::scope_for(project), SKIPPED_EXTENSIONS, ids);
    }

    /// Lowercased ids already offered for installation in this project
    pub fn prompted_addons(&self, project: Option<&Path>) -> BTreeSet<String> {
        self.read_ids(&Self::scope_for(project), PROMPT_SHOWN_EXTENSIONS)
    }

    pub fn add_prompted_addons(&self, project: Option<&Path>, ids: &[String]) {
        self.append_ids(&Self::scope_for(project), PROMPT_SHOWN_EXTENSIONS, ids);
    }

    /// Forget skipped and prompted add-ons in one scope
    pub fn clear_addon_lists(&self, scope: &SettingsScope) {
        self.write(scope, SKIPPED_EXTENSIONS, None);
        self.write(scope, PROMPT_SHOWN_EXTENSIONS, None);
    }
}
