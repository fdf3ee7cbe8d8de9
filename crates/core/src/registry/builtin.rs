//! Providers shipped with debugfile

use serde_json::json;

use crate::types::{CleanupRule, LanguageId, LaunchConfiguration, ProviderTemplate, RuntimeStrategy};

const LLDB: &str = "vadimcn.vscode-lldb";

fn config(value: serde_json::Value) -> LaunchConfiguration {
    LaunchConfiguration::from_value(value)
}

/// Runs `.ts`/`.js` sources through `tsx`, falling back to the emitted `.js`
fn node_runtime() -> RuntimeStrategy {
    RuntimeStrategy::new("tsx", "tsx", "js").with_install_command("npm install -g tsx")
}

fn node(name: &str) -> ProviderTemplate {
    ProviderTemplate::new(config(json!({
        "name": name,
        "type": "node",
        "args": ["--no-warnings"],
        "skipFiles": ["<node_internals>/**", "${workspaceFolder}/node_modules/**"],
    })))
    .with_runtime(node_runtime())
}

fn simple(name: &str, adapter: &str, addon: &str) -> ProviderTemplate {
    ProviderTemplate::new(config(json!({ "name": name, "type": adapter })))
        .with_required_addons([addon])
}

pub(super) fn providers() -> Vec<(LanguageId, ProviderTemplate)> {
    vec![
        ("javascript".into(), node("Node")),
        ("typescript".into(), node("Typescript")),
        ("python".into(), simple("Python", "python", "ms-python.python")),
        ("go".into(), simple("Golang", "go", "golang.go")),
        ("dart".into(), simple("Dart", "dart", "dart-code.dart-code")),
        (
            "coffeescript".into(),
            ProviderTemplate::new(config(json!({ "name": "Coffee", "type": "node" }))),
        ),
        (
            "c".into(),
            ProviderTemplate::new(config(json!({
                "name": "Clang",
                "type": "lldb",
                "program": "${fileNoExtension}",
            })))
            .with_commands([r#"gcc -g "${file}" -o "${fileNoExtension}""#])
            .with_required_addons([LLDB])
            .with_cleanup(CleanupRule::CompiledBinary),
        ),
        (
            "cpp".into(),
            ProviderTemplate::new(config(json!({
                "name": "C++",
                "type": "lldb",
                "program": "${fileNoExtension}",
            })))
            .with_commands([r#"gcc -g "${file}" -o "${fileNoExtension}" -lstdc++"#])
            .with_required_addons([LLDB])
            .with_cleanup(CleanupRule::CompiledBinary),
        ),
        // Single-file debugging only; projects are better served by rust-analyzer
        (
            "rust".into(),
            ProviderTemplate::new(config(json!({
                "name": "Rust",
                "type": "lldb",
                "program": "${workspaceFolder}/.debug/${fileBasenameNoExtension}",
                "env": {
                    "RUST_BACKTRACE": "full",
                    "RUST_LOG": "trace",
                },
                "sourceLanguages": ["rust"],
            })))
            .with_build_directory("${workspaceFolder}/.debug")
            .with_commands([
                r#"rustc -g "${file}" -o "${workspaceFolder}/.debug/${fileBasenameNoExtension}""#,
            ])
            .with_required_addons([LLDB, "rust-lang.rust-analyzer"])
            .with_cleanup(CleanupRule::CompiledBinary),
        ),
        (
            "shellscript".into(),
            simple("Bash", "bashdb", "rogalmic.bash-debug"),
        ),
        ("lua".into(), simple("Lua", "lrdb", "satoren.lrdb")),
    ]
}
