//! Translation resource files: location, loading and flattening.

use std::collections::{
    BTreeMap,
    HashMap,
};
use std::path::PathBuf;

use serde::Serialize;
use serde_json::Value;
use thiserror::Error;

/// Token replaced by the locale in a resource path template.
pub const LOCALE_TOKEN: &str = "__lng__";
/// Token replaced by the namespace in a resource path template.
pub const NAMESPACE_TOKEN: &str = "__ns__";

#[derive(Error, Debug)]
pub enum ResourceError {
    /// The file is missing or unreadable.
    #[error("Failed to read translation resource {path:?}: {source}")]
    Read {
        /// Resolved resource path.
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The file is not valid JSON.
    #[error("Failed to parse translation resource {path:?}: {source}")]
    Parse {
        /// Resolved resource path.
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Substitutes the locale and namespace tokens of a resource path template.
///
/// # Examples
/// ```
/// use site_i18n::translate::resource_path;
///
/// assert_eq!(
///     resource_path("./locales/__lng__/__ns__.json", "fr", "home"),
///     "./locales/fr/home.json"
/// );
/// ```
#[must_use]
pub fn resource_path(template: &str, locale: &str, namespace: &str) -> String {
    template.replace(NAMESPACE_TOKEN, namespace).replace(LOCALE_TOKEN, locale)
}

/// Reads resource files located by a path template, relative to a root directory.
#[derive(Debug, Clone)]
pub struct ResourceLoader {
    /// Directory relative templates are joined to.
    root: PathBuf,
    /// Template containing `__lng__` and `__ns__`.
    template: String,
}

impl ResourceLoader {
    #[must_use]
    pub fn new(root: impl Into<PathBuf>, template: impl Into<String>) -> Self {
        Self { root: root.into(), template: template.into() }
    }

    /// Path of the resource file for a locale and namespace.
    #[must_use]
    pub fn path_for(&self, locale: &str, namespace: &str) -> PathBuf {
        self.root.join(resource_path(&self.template, locale, namespace))
    }

    /// Loads and parses one resource file.
    ///
    /// # Errors
    /// Returns error if the file cannot be read or is not valid JSON.
    pub fn load(&self, locale: &str, namespace: &str) -> Result<Value, ResourceError> {
        let path = self.path_for(locale, namespace);
        tracing::debug!(locale, namespace, path = %path.display(), "Loading translation resource");

        let content = match std::fs::read_to_string(&path) {
            Ok(content) => content,
            Err(source) => return Err(ResourceError::Read { path, source }),
        };

        serde_json::from_str(&content).map_err(|source| ResourceError::Parse { path, source })
    }
}

/// Loaded resources keyed by locale then namespace, as embedded in a page.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct ResourceStore(
    /// locale -> namespace -> resource
    BTreeMap<String, BTreeMap<String, Value>>,
);

impl ResourceStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, locale: &str, namespace: &str, resource: Value) {
        self.0.entry(locale.to_string()).or_default().insert(namespace.to_string(), resource);
    }

    #[must_use]
    pub fn get(&self, locale: &str, namespace: &str) -> Option<&Value> {
        self.0.get(locale).and_then(|namespaces| namespaces.get(namespace))
    }

    /// Namespaces loaded for `locale`, in name order.
    pub fn namespaces(&self, locale: &str) -> impl Iterator<Item = &str> {
        self.0.get(locale).into_iter().flat_map(|namespaces| namespaces.keys().map(String::as_str))
    }
}

/// Flattens a resource into `key.path -> text` entries.
///
/// Nested objects join their keys with `separator`, array items append
/// `[index]`, and non-string leaves keep their JSON text.
///
/// # Examples
/// ```
/// use serde_json::json;
/// use site_i18n::translate::flatten_json;
///
/// let resource = json!({"menu": {"home": "Home", "about": "About"}});
///
/// let flattened = flatten_json(&resource, ".", None);
/// assert_eq!(flattened.get("menu.home"), Some(&"Home".to_string()));
/// assert_eq!(flattened.get("menu.about"), Some(&"About".to_string()));
/// ```
#[must_use]
pub fn flatten_json(
    json: &Value,
    separator: &str,
    prefix: Option<&str>,
) -> HashMap<String, String> {
    let mut entries = HashMap::new();
    let mut pending: Vec<(Option<String>, &Value)> = vec![(prefix.map(String::from), json)];

    while let Some((key, value)) = pending.pop() {
        match value {
            Value::Object(map) => pending.extend(map.iter().map(|(child, value)| {
                let child_key = key
                    .as_deref()
                    .map_or_else(|| child.clone(), |parent| format!("{parent}{separator}{child}"));
                (Some(child_key), value)
            })),
            Value::Array(items) => pending.extend(items.iter().enumerate().map(|(index, value)| {
                (Some(format!("{}[{index}]", key.as_deref().unwrap_or_default())), value)
            })),
            Value::String(text) => {
                if let Some(key) = key {
                    entries.insert(key, text.clone());
                }
            }
            other => {
                if let Some(key) = key {
                    entries.insert(key, other.to_string());
                }
            }
        }
    }

    entries
}
