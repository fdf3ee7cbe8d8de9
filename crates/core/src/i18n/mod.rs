//! Message bundles
//!
//! Bundles are flat JSON objects keyed by message id. `package.nls.json` is
//! the default (English) bundle; `package.nls.<locale>.json` overlays it.
//! Messages use `{0}`, `{1}`, ... positional placeholders.

use std::collections::HashMap;
use std::path::Path;
use tracing::{debug, warn};

use crate::error::{Error, Result};

const DEFAULT_BUNDLE_FILE: &str = "package.nls.json";
const BUILTIN_DEFAULT: &str = include_str!("../../i18n/package.nls.json");
const BUILTIN_ZH_CN: &str = include_str!("../../i18n/package.nls.zh-cn.json");

/// Locales with a bundle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Locale {
    #[default]
    EnUs,
    ZhCn,
}

impl Locale {
    /// Map a locale tag to a supported locale; unknown tags use English
    pub fn normalize(tag: &str) -> Self {
        let tag = tag.split('.').next().unwrap_or(tag).replace('_', "-");
        match tag.to_lowercase().as_str() {
            "zh-cn" | "zh-hans" | "zh" => Locale::ZhCn,
            _ => Locale::EnUs,
        }
    }

    /// Locale from `DEBUGFILE_LOCALE`, the editor's `VSCODE_NLS_CONFIG`, then `LANG`
    pub fn from_env() -> Self {
        if let Ok(tag) = std::env::var("DEBUGFILE_LOCALE") {
            return Self::normalize(&tag);
        }

        if let Ok(config) = std::env::var("VSCODE_NLS_CONFIG") {
            if let Some(tag) = serde_json::from_str::<serde_json::Value>(&config)
                .ok()
                .and_then(|v| v.get("locale").and_then(|l| l.as_str()).map(str::to_string))
            {
                return Self::normalize(&tag);
            }
        }

        std::env::var("LANG")
            .map(|tag| Self::normalize(&tag))
            .unwrap_or_default()
    }

    pub fn tag(self) -> &'static str {
        match self {
            Locale::EnUs => "en-us",
            Locale::ZhCn => "zh-cn",
        }
    }
}

/// Looks up messages by id
#[derive(Debug, Clone)]
pub struct Localizer {
    locale: Locale,
    messages: HashMap<String, String>,
}

impl Localizer {
    /// Bundles compiled into the binary
    pub fn builtin(locale: Locale) -> Self {
        let mut messages = parse_bundle(BUILTIN_DEFAULT).unwrap_or_default();
        if let Some(bundle) = builtin_locale_bundle(locale) {
            messages.extend(parse_bundle(bundle).unwrap_or_default());
        }
        Self { locale, messages }
    }

    /// Load bundles from `dir` on top of the built-in ones.
    ///
    /// Order of precedence, lowest first: built-in default, default file,
    /// built-in locale, locale file. Missing files are skipped; unreadable
    /// ones are an error.
    pub fn load(dir: &Path, locale: Locale) -> Result<Self> {
        let mut messages = parse_bundle(BUILTIN_DEFAULT)?;
        extend_from_file(&mut messages, &dir.join(DEFAULT_BUNDLE_FILE))?;

        if let Some(bundle) = builtin_locale_bundle(locale) {
            messages.extend(parse_bundle(bundle)?);
            extend_from_file(
                &mut messages,
                &dir.join(format!("package.nls.{}.json", locale.tag())),
            )?;
        }

        Ok(Self { locale, messages })
    }

    pub fn locale(&self) -> Locale {
        self.locale
    }

    /// Message for `key` with positional arguments; unknown keys yield the key
    pub fn localize(&self, key: &str, args: &[&str]) -> String {
        match self.messages.get(key) {
            Some(template) => format(template, args),
            None => {
                warn!("Missing message `{}`", key);
                key.to_string()
            }
        }
    }
}

impl Default for Localizer {
    fn default() -> Self {
        Self::builtin(Locale::EnUs)
    }
}

fn builtin_locale_bundle(locale: Locale) -> Option<&'static str> {
    match locale {
        Locale::EnUs => None,
        Locale::ZhCn => Some(BUILTIN_ZH_CN),
    }
}

fn extend_from_file(messages: &mut HashMap<String, String>, path: &Path) -> Result<()> {
    if !path.exists() {
        debug!("No bundle at {:?}", path);
        return Ok(());
    }
    messages.extend(parse_bundle(&std::fs::read_to_string(path)?)?);
    Ok(())
}

fn parse_bundle(contents: &str) -> Result<HashMap<String, String>> {
    serde_json::from_str(contents).map_err(|e| Error::LocaleError(format!("Invalid bundle: {e}")))
}

/// Replace `{n}` with the n-th argument, everywhere it occurs
pub fn format(template: &str, args: &[&str]) -> String {
    args.iter()
        .enumerate()
        .fold(template.to_string(), |message, (index, value)| {
            message.replace(&format!("{{{index}}}"), value)
        })
}
