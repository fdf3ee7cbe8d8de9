//! Language to provider template registry
//!
//! Templates are immutable once the registry is built. New languages are
//! added as entries, not as new types.

mod builtin;

use std::collections::BTreeMap;

use crate::types::{LanguageId, ProviderTemplate};

/// Lookup table from language id to launch template
#[derive(Debug, Clone)]
pub struct ProviderRegistry {
    providers: BTreeMap<LanguageId, ProviderTemplate>,
}

impl ProviderRegistry {
    /// Create a registry with the built-in providers
    pub fn new() -> Self {
        ProviderRegistryBuilder::new().with_builtin_providers().build()
    }

    /// Get the template for a language, `None` when unsupported
    pub fn lookup(&self, language: &str) -> Option<&ProviderTemplate> {
        self.providers.get(language)
    }

    /// Check if a language has a provider
    pub fn contains(&self, language: &str) -> bool {
        self.providers.contains_key(language)
    }

    /// All supported languages, sorted
    pub fn supported_languages(&self) -> Vec<&LanguageId> {
        self.providers.keys().collect()
    }
}

impl Default for ProviderRegistry {
    fn default() -> Self {
        Self::new()
    }
}

/// Builder for registries with custom providers
#[derive(Debug, Default)]
pub struct ProviderRegistryBuilder {
    providers: BTreeMap<LanguageId, ProviderTemplate>,
}

impl ProviderRegistryBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or replace the provider for a language
    pub fn with_provider(mut self, language: impl Into<LanguageId>, template: ProviderTemplate) -> Self {
        self.providers.insert(language.into(), template);
        self
    }

    /// Add the providers shipped with debugfile
    pub fn with_builtin_providers(mut self) -> Self {
        for (language, template) in builtin::providers() {
            self.providers.insert(language, template);
        }
        self
    }

    pub fn build(self) -> ProviderRegistry {
        ProviderRegistry {
            providers: self.providers,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{CleanupRule, LaunchConfiguration};

    const BUILTIN: [&str; 11] = [
        "c",
        "coffeescript",
        "cpp",
        "dart",
        "go",
        "javascript",
        "lua",
        "python",
        "rust",
        "shellscript",
        "typescript",
    ];

    #[test]
    fn test_default_registry() {
        let registry = ProviderRegistry::new();
        let languages: Vec<&str> = registry.supported_languages().iter().map(|l| l.as_str()).collect();
        assert_eq!(languages, BUILTIN);

        for language in BUILTIN {
            let template = registry.lookup(language).unwrap();
            assert!(template.configuration.name().is_some(), "{language} has no name");
            assert!(template.configuration.adapter_type().is_some(), "{language} has no type");
        }
    }

    #[test]
    fn test_supported_languages_are_stable() {
        let registry = ProviderRegistry::new();
        assert_eq!(registry.supported_languages(), registry.supported_languages());
        assert_eq!(
            ProviderRegistry::new().supported_languages(),
            registry.supported_languages()
        );
    }

    #[test]
    fn test_unknown_language() {
        let registry = ProviderRegistry::new();
        assert!(registry.lookup("cobol").is_none());
        assert!(registry.lookup("Python").is_none());
        assert!(!registry.contains("plaintext"));
    }

    #[test]
    fn test_compiled_languages() {
        let registry = ProviderRegistry::new();

        let c = registry.lookup("c").unwrap();
        assert_eq!(c.configuration.program(), Some("${fileNoExtension}"));
        assert_eq!(c.commands.len(), 1);
        assert_eq!(c.cleanup, CleanupRule::CompiledBinary);

        let rust = registry.lookup("rust").unwrap();
        assert_eq!(rust.build_directory.as_deref(), Some("${workspaceFolder}/.debug"));
        assert_eq!(rust.required_addons, vec!["vadimcn.vscode-lldb", "rust-lang.rust-analyzer"]);

        let python = registry.lookup("python").unwrap();
        assert!(python.commands.is_empty());
        assert_eq!(python.cleanup, CleanupRule::None);
    }

    #[test]
    fn test_runtime_detection_languages() {
        let registry = ProviderRegistry::new();
        for language in ["javascript", "typescript"] {
            let runtime = registry.lookup(language).unwrap().runtime.as_ref().unwrap();
            assert_eq!(runtime.package, "tsx");
            assert_eq!(runtime.compiled_extension, "js");
        }
        assert!(registry.lookup("coffeescript").unwrap().runtime.is_none());
    }

    #[test]
    fn test_custom_registry() {
        let registry = ProviderRegistryBuilder::new()
            .with_provider(
                "zig",
                ProviderTemplate::new(LaunchConfiguration::from_value(
                    serde_json::json!({ "name": "Zig", "type": "lldb" }),
                )),
            )
            .build();

        assert!(registry.contains("zig"));
        assert!(!registry.contains("python"));
        assert_eq!(registry.supported_languages().len(), 1);
    }
}
