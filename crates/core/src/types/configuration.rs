use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A debug launch configuration as consumed by the host's debug subsystem.
///
/// Field names follow the host's launch.json conventions (`type`, `request`,
/// `program`, `args`, `env`, ...). Values are kept as raw JSON so adapter
/// specific fields pass through untouched.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LaunchConfiguration(Map<String, Value>);

impl LaunchConfiguration {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from a JSON value; anything but an object yields an empty configuration.
    pub fn from_value(value: Value) -> Self {
        match value {
            Value::Object(map) => Self(map),
            _ => Self::default(),
        }
    }

    pub fn into_value(self) -> Value {
        Value::Object(self.0)
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.0.get(key).and_then(Value::as_str)
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        self.0.insert(key.into(), value.into());
    }

    pub fn remove(&mut self, key: &str) -> Option<Value> {
        self.0.remove(key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.0.iter()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn name(&self) -> Option<&str> {
        self.get_str("name")
    }

    /// The debug adapter type (`type` field)
    pub fn adapter_type(&self) -> Option<&str> {
        self.get_str("type")
    }

    pub fn program(&self) -> Option<&str> {
        self.get_str("program")
    }

    pub fn cwd(&self) -> Option<&str> {
        self.get_str("cwd")
    }

    /// Host command that replaces starting a debug session
    pub fn command(&self) -> Option<&str> {
        self.get_str("command")
    }

    /// String arguments; non-string entries are skipped
    pub fn args(&self) -> Vec<String> {
        self.get("args")
            .and_then(Value::as_array)
            .map(|args| {
                args.iter()
                    .filter_map(|arg| arg.as_str().map(str::to_string))
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Label used in user-facing messages
    pub fn display_name(&self) -> &str {
        self.name().unwrap_or("Debug")
    }
}

impl From<Map<String, Value>> for LaunchConfiguration {
    fn from(map: Map<String, Value>) -> Self {
        Self(map)
    }
}
