use serde_json::{Map, Value};
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::{
    error::{Error, Result},
    host::{SettingsScope, SettingsStore},
};

/// File name of the project-scoped settings document
pub const PROJECT_SETTINGS_FILE: &str = ".debugfile.json";

/// Settings persisted as JSON documents: one per project, one global.
///
/// Every read goes to disk so external edits are picked up immediately.
#[derive(Debug, Clone)]
pub struct JsonSettingsStore {
    global_path: Option<PathBuf>,
}

impl JsonSettingsStore {
    pub fn new(global_path: Option<PathBuf>) -> Self {
        Self { global_path }
    }

    pub fn path_for(&self, scope: &SettingsScope) -> Option<PathBuf> {
        match scope {
            SettingsScope::Global => self.global_path.clone(),
            SettingsScope::Project(root) => Some(root.join(PROJECT_SETTINGS_FILE)),
        }
    }

    fn load(path: &Path) -> Result<Map<String, Value>> {
        if !path.exists() {
            return Ok(Map::new());
        }

        let contents = std::fs::read_to_string(path)?;
        if contents.trim().is_empty() {
            return Ok(Map::new());
        }

        match serde_json::from_str::<Value>(&contents)
            .map_err(|e| Error::SettingsError(format!("Failed to parse {}: {e}", path.display())))?
        {
            Value::Object(map) => Ok(map),
            _ => Err(Error::SettingsError(format!(
                "{} does not contain a JSON object",
                path.display()
            ))),
        }
    }

    fn save(path: &Path, settings: &Map<String, Value>) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let contents = serde_json::to_string_pretty(settings)
            .map_err(|e| Error::SettingsError(format!("Failed to serialize settings: {e}")))?;
        std::fs::write(path, contents)?;
        Ok(())
    }
}

impl SettingsStore for JsonSettingsStore {
    fn get(&self, scope: &SettingsScope, key: &str) -> Result<Option<Value>> {
        let Some(path) = self.path_for(scope) else {
            return Ok(None);
        };
        Ok(Self::load(&path)?.remove(key))
    }

    fn update(&self, scope: &SettingsScope, key: &str, value: Option<Value>) -> Result<()> {
        let path = self
            .path_for(scope)
            .ok_or_else(|| Error::SettingsError("No location for global settings".to_string()))?;

        let mut settings = Self::load(&path)?;
        match value {
            Some(value) => {
                settings.insert(key.to_string(), value);
            }
            None => {
                if settings.remove(key).is_none() {
                    return Ok(());
                }
            }
        }

        debug!("Writing setting `{}` to {:?}", key, path);
        Self::save(&path, &settings)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_missing_file_reads_as_empty() {
        let temp_dir = TempDir::new().unwrap();
        let store = JsonSettingsStore::new(Some(temp_dir.path().join("settings.json")));

        assert_eq!(store.get(&SettingsScope::Global, "anything").unwrap(), None);
        let project = SettingsScope::Project(temp_dir.path().join("proj"));
        assert_eq!(store.get(&project, "anything").unwrap(), None);
    }

    #[test]
    fn test_update_preserves_other_keys() {
        let temp_dir = TempDir::new().unwrap();
        let project_dir = temp_dir.path().join("proj");
        fs::create_dir(&project_dir).unwrap();
        fs::write(
            project_dir.join(PROJECT_SETTINGS_FILE),
            r#"{ "fileDirectoryAsCwd": true }"#,
        )
        .unwrap();

        let store = JsonSettingsStore::new(None);
        let scope = SettingsScope::Project(project_dir.clone());
        store
            .update(&scope, "skippedExtensions", Some(json!(["golang.go"])))
            .unwrap();

        assert_eq!(store.get(&scope, "fileDirectoryAsCwd").unwrap(), Some(json!(true)));
        assert_eq!(
            store.get(&scope, "skippedExtensions").unwrap(),
            Some(json!(["golang.go"]))
        );

        store.update(&scope, "skippedExtensions", None).unwrap();
        assert_eq!(store.get(&scope, "skippedExtensions").unwrap(), None);
    }

    #[test]
    fn test_global_scope_creates_parent_directories() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("config").join("debugfile").join("settings.json");
        let store = JsonSettingsStore::new(Some(path.clone()));

        store
            .update(&SettingsScope::Global, "extensionPromptBehavior", Some(json!("never")))
            .unwrap();

        assert!(path.exists());
        assert_eq!(
            store.get(&SettingsScope::Global, "extensionPromptBehavior").unwrap(),
            Some(json!("never"))
        );
    }

    #[test]
    fn test_global_scope_without_location() {
        let store = JsonSettingsStore::new(None);
        assert_eq!(store.get(&SettingsScope::Global, "key").unwrap(), None);
        assert!(store.update(&SettingsScope::Global, "key", Some(json!(1))).is_err());
    }

    #[test]
    fn test_invalid_document_is_an_error() {
        let temp_dir = TempDir::new().unwrap();
        fs::write(temp_dir.path().join(PROJECT_SETTINGS_FILE), "[1, 2]").unwrap();
        let store = JsonSettingsStore::new(None);
        let scope = SettingsScope::Project(temp_dir.path().to_path_buf());
        assert!(matches!(store.get(&scope, "key"), Err(Error::SettingsError(_))));
    }
}
