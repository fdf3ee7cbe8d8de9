use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use crate::types::LanguageId;

/// Detect the language of a source file from its extension, or from the
/// shebang line for extension-less scripts
pub fn detect_language(file_path: &Path) -> Option<LanguageId> {
    tracing::trace!("Detecting language for: {:?}", file_path);

    let language = match file_path.extension().and_then(|e| e.to_str()) {
        Some(ext) => language_for_extension(ext),
        None => shebang_language(file_path),
    };

    match language {
        Some(language) => {
            tracing::debug!("Detected {} for {:?}", language, file_path);
            Some(LanguageId::from(language))
        }
        None => {
            tracing::debug!("No language detected for {:?}", file_path);
            None
        }
    }
}

fn language_for_extension(ext: &str) -> Option<&'static str> {
    let language = match ext.to_lowercase().as_str() {
        "js" | "mjs" | "cjs" => "javascript",
        "ts" | "mts" | "cts" => "typescript",
        "py" | "pyw" => "python",
        "go" => "go",
        "dart" => "dart",
        "coffee" => "coffeescript",
        "c" => "c",
        "cc" | "cpp" | "cxx" | "c++" => "cpp",
        "rs" => "rust",
        "sh" | "bash" | "zsh" => "shellscript",
        "lua" => "lua",
        _ => return None,
    };
    Some(language)
}

fn shebang_language(file_path: &Path) -> Option<&'static str> {
    let file = File::open(file_path).ok()?;
    let first_line = BufReader::new(file).lines().next()?.ok()?;
    let interpreter_line = first_line.strip_prefix("#!")?;

    // `#!/usr/bin/env python3` names the interpreter after `env`
    let mut words = interpreter_line.split_whitespace();
    let mut interpreter = words.next()?.rsplit('/').next()?;
    if interpreter == "env" {
        interpreter = words.find(|w| !w.starts_with('-'))?;
    }

    let language = match interpreter.trim_end_matches(|c: char| c.is_ascii_digit() || c == '.') {
        "python" => "python",
        "node" | "nodejs" => "javascript",
        "tsx" | "ts-node" => "typescript",
        "sh" | "bash" | "zsh" | "dash" => "shellscript",
        "lua" | "luajit" => "lua",
        _ => return None,
    };
    Some(language)
}
