use debugfile_core::host::AddonCatalog;
use serde_json::{Value, json};
use std::cell::RefCell;
use std::collections::HashMap;
use std::time::Duration;
use tracing::debug;

const GALLERY_URL: &str = "https://marketplace.visualstudio.com/_apis/public/gallery/extensionquery";
const TIMEOUT: Duration = Duration::from_secs(5);
/// `ExtensionName` filter of the gallery query API
const FILTER_BY_NAME: u32 = 7;

/// Display names from the public extension gallery.
///
/// Lookups are best effort: any failure yields `None` and the caller shows
/// the raw id. Answers are cached for the life of the process.
#[derive(Default)]
pub struct MarketplaceCatalog {
    cache: RefCell<HashMap<String, Option<String>>>,
}

impl MarketplaceCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    fn query(&self, id: &str) -> Option<String> {
        let client = reqwest::blocking::Client::builder()
            .timeout(TIMEOUT)
            .user_agent(concat!("debugfile/", env!("CARGO_PKG_VERSION")))
            .build()
            .ok()?;

        let body = json!({
            "filters": [{ "criteria": [{ "filterType": FILTER_BY_NAME, "value": id }] }],
            "flags": 0,
        });

        let response = client
            .post(GALLERY_URL)
            .header("Accept", "application/json;api-version=3.0-preview.1")
            .json(&body)
            .send()
            .and_then(|r| r.error_for_status())
            .map_err(|e| debug!("Gallery query for {} failed: {}", id, e))
            .ok()?;

        let value: Value = response.json().ok()?;
        display_name_from_response(&value)
    }
}

impl AddonCatalog for MarketplaceCatalog {
    fn display_name(&self, id: &str) -> Option<String> {
        if let Some(cached) = self.cache.borrow().get(id) {
            return cached.clone();
        }
        let name = self.query(id);
        self.cache.borrow_mut().insert(id.to_string(), name.clone());
        name
    }
}

fn display_name_from_response(value: &Value) -> Option<String> {
    value
        .pointer("/results/0/extensions/0/displayName")
        .and_then(Value::as_str)
        .filter(|name| !name.is_empty())
        .map(str::to_string)
}
