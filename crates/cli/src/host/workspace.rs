use debugfile_core::{LanguageId, detect_language, host::Workspace};
use std::path::{Path, PathBuf};

/// Files whose presence marks a workspace root
pub const ROOT_MARKERS: &[&str] = &[".git", ".vscode", "package.json", "Cargo.toml", "go.mod"];

/// Workspace view for files given on the command line
#[derive(Debug, Clone, Default)]
pub struct CliWorkspace {
    root: Option<PathBuf>,
    language: Option<LanguageId>,
    active: Option<PathBuf>,
}

impl CliWorkspace {
    pub fn new() -> Self {
        Self::default()
    }

    /// Use `root` for every file instead of searching for markers
    pub fn with_root(mut self, root: Option<PathBuf>) -> Self {
        self.root = root;
        self
    }

    /// Force the language instead of detecting it
    pub fn with_language(mut self, language: Option<LanguageId>) -> Self {
        self.language = language;
        self
    }

    pub fn with_active_file(mut self, file: Option<PathBuf>) -> Self {
        self.active = file;
        self
    }
}

impl Workspace for CliWorkspace {
    fn language_of(&self, file: &Path) -> Option<LanguageId> {
        self.language.clone().or_else(|| detect_language(file))
    }

    fn workspace_folder(&self, file: &Path) -> Option<PathBuf> {
        self.root.clone().or_else(|| find_root(file))
    }

    fn active_file(&self) -> Option<PathBuf> {
        self.active.clone()
    }
}

/// Nearest ancestor directory of `file` holding one of [`ROOT_MARKERS`]
pub fn find_root(file: &Path) -> Option<PathBuf> {
    project_root(file.parent()?)
}

/// `dir` or its nearest ancestor holding one of [`ROOT_MARKERS`]
pub fn project_root(dir: &Path) -> Option<PathBuf> {
    dir.ancestors()
        .find(|dir| ROOT_MARKERS.iter().any(|marker| dir.join(marker).exists()))
        .map(Path::to_path_buf)
}
