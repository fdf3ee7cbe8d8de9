//! `${placeholder}` substitution for launch templates.
//!
//! Every token is a pure function of the file being debugged and the
//! workspace folder that contains it. Unknown tokens are left for the host.

use regex::{Captures, Regex};
use serde_json::Value;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

static TOKEN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\$\{([A-Za-z]+)\}").expect("placeholder pattern is valid"));

/// Supported placeholder tokens
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Placeholder {
    WorkspaceFolder,
    WorkspaceRootFolderName,
    File,
    FileNoExtension,
    RelativeFile,
    FileBasenameNoExtension,
    FileBasename,
    FileDirname,
    FileExtname,
}

impl Placeholder {
    pub const ALL: [Placeholder; 9] = [
        Placeholder::WorkspaceFolder,
        Placeholder::WorkspaceRootFolderName,
        Placeholder::File,
        Placeholder::FileNoExtension,
        Placeholder::RelativeFile,
        Placeholder::FileBasenameNoExtension,
        Placeholder::FileBasename,
        Placeholder::FileDirname,
        Placeholder::FileExtname,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Placeholder::WorkspaceFolder => "workspaceFolder",
            Placeholder::WorkspaceRootFolderName => "workspaceRootFolderName",
            Placeholder::File => "file",
            Placeholder::FileNoExtension => "fileNoExtension",
            Placeholder::RelativeFile => "relativeFile",
            Placeholder::FileBasenameNoExtension => "fileBasenameNoExtension",
            Placeholder::FileBasename => "fileBasename",
            Placeholder::FileDirname => "fileDirname",
            Placeholder::FileExtname => "fileExtname",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|p| p.name() == name)
    }

    /// Token as written in templates, e.g. `${file}`
    pub fn token(self) -> String {
        format!("${{{}}}", self.name())
    }

    /// Value of this placeholder, `None` when it cannot be derived
    pub fn resolve(self, ctx: &PlaceholderContext) -> Option<String> {
        let file = ctx.file.as_path();
        match self {
            Placeholder::WorkspaceFolder => ctx.working_folder().map(path_string),
            Placeholder::WorkspaceRootFolderName => ctx
                .workspace_folder
                .as_deref()
                .and_then(Path::file_name)
                .map(|name| name.to_string_lossy().into_owned()),
            Placeholder::File => Some(path_string(file)),
            Placeholder::FileNoExtension => Some(path_string(&file.with_extension(""))),
            Placeholder::RelativeFile => match ctx.workspace_folder.as_deref() {
                Some(root) => file.strip_prefix(root).ok().map(path_string),
                None => Some(path_string(file)),
            },
            Placeholder::FileBasenameNoExtension => file
                .file_stem()
                .map(|stem| stem.to_string_lossy().into_owned()),
            Placeholder::FileBasename => file
                .file_name()
                .map(|name| name.to_string_lossy().into_owned()),
            Placeholder::FileDirname => file.parent().map(path_string),
            Placeholder::FileExtname => file
                .extension()
                .map(|ext| format!(".{}", ext.to_string_lossy())),
        }
    }
}

/// Location data placeholders are derived from
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlaceholderContext {
    pub file: PathBuf,
    pub workspace_folder: Option<PathBuf>,
    /// Resolve `workspaceFolder` to the file's own directory
    pub file_directory_as_cwd: bool,
}

impl PlaceholderContext {
    pub fn new(file: impl Into<PathBuf>, workspace_folder: Option<PathBuf>) -> Self {
        Self {
            file: file.into(),
            workspace_folder,
            file_directory_as_cwd: false,
        }
    }

    pub fn with_file_directory_as_cwd(mut self, enabled: bool) -> Self {
        self.file_directory_as_cwd = enabled;
        self
    }

    fn working_folder(&self) -> Option<&Path> {
        if self.file_directory_as_cwd {
            self.file.parent()
        } else {
            self.workspace_folder.as_deref()
        }
    }
}

fn path_string(path: &Path) -> String {
    path.to_string_lossy().into_owned()
}

/// Replace every supported token in `template`.
///
/// Tokens without a value become the empty string.
pub fn resolve_all(template: &str, ctx: &PlaceholderContext) -> String {
    if !template.contains("${") {
        return template.to_string();
    }

    TOKEN
        .replace_all(template, |caps: &Captures<'_>| match Placeholder::from_name(&caps[1]) {
            Some(placeholder) => placeholder.resolve(ctx).unwrap_or_default(),
            None => caps[0].to_string(),
        })
        .into_owned()
}

/// Substitute tokens in every string of a JSON value, returning a new value.
///
/// Object keys and non-string scalars are kept as they are.
pub fn substitute_value(value: &Value, ctx: &PlaceholderContext) -> Value {
    match value {
        Value::String(s) => Value::String(resolve_all(s, ctx)),
        Value::Array(items) => Value::Array(items.iter().map(|v| substitute_value(v, ctx)).collect()),
        Value::Object(map) => Value::Object(
            map.iter()
                .map(|(k, v)| (k.clone(), substitute_value(v, ctx)))
                .collect(),
        ),
        other => other.clone(),
    }
}

/// Whether a supported token is still present anywhere in `value`
pub fn contains_placeholder(value: &Value) -> bool {
    match value {
        Value::String(s) => TOKEN
            .captures_iter(s)
            .any(|caps| Placeholder::from_name(&caps[1]).is_some()),
        Value::Array(items) => items.iter().any(contains_placeholder),
        Value::Object(map) => map.values().any(contains_placeholder),
        _ => false,
    }
}
