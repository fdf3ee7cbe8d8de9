//! Launch configuration merging
//!
//! Precedence, lowest first: built-in defaults, template, caller overrides.
//! Later layers replace top-level fields, except `env` (key union, later
//! values win) and `args` (concatenated in layer order, then the extra
//! arguments).

use serde_json::{Map, Value, json};
use std::path::Path;
use tracing::warn;

use crate::types::LaunchConfiguration;

/// Fields every launch starts from
pub fn base_configuration(file: &Path) -> LaunchConfiguration {
    LaunchConfiguration::from_value(json!({
        "request": "launch",
        "program": file.to_string_lossy(),
        "cwd": "${workspaceFolder}",
        "console": "internalConsole",
        "smartStep": true,
        "sourceMaps": true,
        "stopOnEntry": false,
    }))
}

/// Merge the defaults, the template and the caller's overrides
pub fn merge_configuration(
    file: &Path,
    template: &LaunchConfiguration,
    overrides: Option<&LaunchConfiguration>,
    extra_args: &[String],
) -> LaunchConfiguration {
    let mut merged = base_configuration(file);
    let layers: Vec<&LaunchConfiguration> = std::iter::once(template).chain(overrides).collect();

    let mut env = Map::new();
    let mut args = Vec::new();

    for layer in &layers {
        for (key, value) in layer.iter() {
            match key.as_str() {
                "env" => merge_env(&mut env, value),
                "args" => append_args(&mut args, value),
                _ => merged.insert(key.clone(), value.clone()),
            }
        }
    }
    args.extend(extra_args.iter().cloned().map(Value::String));

    merged.insert("env", Value::Object(env));
    merged.insert("args", Value::Array(args));
    merged
}

fn merge_env(env: &mut Map<String, Value>, value: &Value) {
    match value {
        Value::Object(vars) => {
            for (name, value) in vars {
                env.insert(name.clone(), value.clone());
            }
        }
        Value::Null => {}
        other => warn!("Ignoring `env` that is not an object: {}", other),
    }
}

fn append_args(args: &mut Vec<Value>, value: &Value) {
    match value {
        Value::Array(items) => args.extend(items.iter().cloned()),
        // launch.json allows a single string
        Value::String(_) => args.push(value.clone()),
        Value::Null => {}
        other => warn!("Ignoring `args` that is not a list: {}", other),
    }
}
