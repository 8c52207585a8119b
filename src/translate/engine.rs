//! JSON-backed translation engine.

use std::collections::HashMap;

use serde_json::Value;

use super::{
    NAMESPACE_SEPARATOR,
    ResourceError,
    ResourceLoader,
    TranslateParams,
    Translator,
    flatten_json,
};
use crate::config::I18nSettings;

/// Separator between nested key segments (`menu.items.home`).
const KEY_SEPARATOR: &str = ".";

/// Translation engine answering lookups from flattened resource files.
///
/// Missing keys fall back to the fallback locale, then to the key itself.
#[derive(Debug, Clone)]
pub struct ResourceTranslator {
    /// locale -> namespace -> flattened key -> text
    resources: HashMap<String, HashMap<String, HashMap<String, String>>>,
    /// Locale used when `params.lng` is unset.
    default_locale: String,
    /// Namespace for keys without `ns:`.
    default_namespace: String,
    /// Locale consulted when a key is missing.
    fallback_locale: Option<String>,
}

impl ResourceTranslator {
    #[must_use]
    pub fn new(default_locale: impl Into<String>, default_namespace: impl Into<String>) -> Self {
        Self {
            resources: HashMap::new(),
            default_locale: default_locale.into(),
            default_namespace: default_namespace.into(),
            fallback_locale: None,
        }
    }

    #[must_use]
    pub fn with_fallback_locale(mut self, fallback_locale: Option<String>) -> Self {
        self.fallback_locale = fallback_locale;
        self
    }

    /// Creates an engine and preloads every configured locale and namespace.
    ///
    /// # Errors
    /// Returns the first resource file that cannot be read or parsed.
    pub fn init(settings: &I18nSettings, loader: &ResourceLoader) -> Result<Self, ResourceError> {
        let default_locale = settings.locales.first().cloned().unwrap_or_default();
        let default_namespace = settings.default_namespace().unwrap_or_default();

        let mut translator = Self::new(default_locale, default_namespace)
            .with_fallback_locale(settings.fallback_locale.clone());

        for locale in &settings.locales {
            for namespace in &settings.namespaces {
                let resource = loader.load(locale, namespace)?;
                translator.add_resource(locale, namespace, &resource);
            }
        }

        tracing::debug!(
            locales = settings.locales.len(),
            namespaces = settings.namespaces.len(),
            "Translation resources preloaded"
        );

        Ok(translator)
    }

    /// Adds (or replaces) the resource for a locale and namespace.
    pub fn add_resource(&mut self, locale: &str, namespace: &str, resource: &Value) {
        self.resources
            .entry(locale.to_string())
            .or_default()
            .insert(namespace.to_string(), flatten_json(resource, KEY_SEPARATOR, None));
    }

    fn lookup(&self, locale: &str, namespace: &str, key: &str) -> Option<&str> {
        self.resources
            .get(locale)
            .and_then(|namespaces| namespaces.get(namespace))
            .and_then(|keys| keys.get(key))
            .map(String::as_str)
    }
}

impl Translator for ResourceTranslator {
    fn translate(&self, key: &str, params: &TranslateParams) -> String {
        let (namespace, key) = key.split_once(NAMESPACE_SEPARATOR).unwrap_or_else(|| {
            (params.ns.as_deref().unwrap_or(&self.default_namespace), key)
        });
        let locale = params.lng.as_deref().unwrap_or(&self.default_locale);

        let found = self.lookup(locale, namespace, key).or_else(|| {
            self.fallback_locale
                .as_deref()
                .filter(|fallback| *fallback != locale)
                .and_then(|fallback| self.lookup(fallback, namespace, key))
        });

        let Some(text) = found else {
            tracing::debug!(locale, namespace, key, "Missing translation");
            return key.to_string();
        };

        interpolate(text, params)
    }
}

/// Replaces `{{name}}` placeholders with values from `params`.
///
/// Placeholders without a value are kept verbatim.
fn interpolate(text: &str, params: &TranslateParams) -> String {
    if params.values.is_empty() {
        return text.to_string();
    }

    let mut result = String::with_capacity(text.len());
    let mut rest = text;

    while let Some(open) = rest.find("{{") {
        let Some(close) = rest.get(open + 2..).and_then(|tail| tail.find("}}")) else {
            break;
        };
        let (literal, tail) = rest.split_at(open);
        result.push_str(literal);

        let placeholder = tail.get(..close + 4).unwrap_or_default();
        let name = tail.get(2..close + 2).unwrap_or_default().trim();

        match params.values.get(name) {
            Some(Value::String(value)) => result.push_str(value),
            Some(value) => result.push_str(&value.to_string()),
            None => result.push_str(placeholder),
        }

        rest = tail.get(close + 4..).unwrap_or_default();
    }
    result.push_str(rest);

    result
}
