//! Translation engine contract and the helpers attached to localized files.
mod engine;
mod helpers;
mod resource;

use serde_json::{
    Map,
    Value,
};

pub use engine::ResourceTranslator;
pub use helpers::LocaleHelpers;
pub use resource::{
    LOCALE_TOKEN,
    NAMESPACE_TOKEN,
    ResourceError,
    ResourceLoader,
    ResourceStore,
    flatten_json,
    resource_path,
};

/// Separator between a namespace and a key (`home:title`).
pub const NAMESPACE_SEPARATOR: char = ':';

/// A translation engine.
///
/// `key` is usually namespaced (`"home:hello"`); `params.lng` selects the locale.
pub trait Translator: Send + Sync + std::fmt::Debug {
    /// Returns the text for `key`, or the key itself when it is missing.
    fn translate(&self, key: &str, params: &TranslateParams) -> String;
}

/// Options of a single translation lookup.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TranslateParams {
    /// Locale to translate into. Helpers fill in their own locale when unset.
    pub lng: Option<String>,
    /// Namespace for keys without an explicit `ns:` prefix.
    pub ns: Option<String>,
    /// Interpolation values for `{{name}}` placeholders.
    pub values: Map<String, Value>,
}

impl TranslateParams {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_lng(mut self, lng: impl Into<String>) -> Self {
        self.lng = Some(lng.into());
        self
    }

    #[must_use]
    pub fn with_ns(mut self, ns: impl Into<String>) -> Self {
        self.ns = Some(ns.into());
        self
    }

    #[must_use]
    pub fn with_value(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.values.insert(name.into(), value.into());
        self
    }
}
