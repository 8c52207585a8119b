//! Translation helpers bound to a single localized file.

use std::sync::Arc;

use super::{
    NAMESPACE_SEPARATOR,
    TranslateParams,
    Translator,
};
use crate::path::resolve_absolute;

/// `t`, `tt` and `tpath` for one locale.
///
/// Holds its own copy of the locale, namespace, key prefix and path template,
/// so later changes to the plugin settings never leak into forked files.
#[derive(Debug, Clone)]
pub struct LocaleHelpers {
    /// Shared engine.
    translator: Arc<dyn Translator>,
    /// Locale of the copy.
    locale: String,
    /// Namespace for keys without `ns:`.
    namespace: String,
    /// Key prefix applied by `tt`.
    prefix: Option<String>,
    /// Output path template used by `tpath`.
    path_template: String,
}

impl LocaleHelpers {
    #[must_use]
    pub fn new(
        translator: Arc<dyn Translator>,
        locale: impl Into<String>,
        namespace: impl Into<String>,
        prefix: Option<String>,
        path_template: impl Into<String>,
    ) -> Self {
        Self {
            translator,
            locale: locale.into(),
            namespace: namespace.into(),
            prefix: prefix.filter(|p| !p.is_empty()),
            path_template: path_template.into(),
        }
    }

    #[must_use]
    pub fn locale(&self) -> &str {
        &self.locale
    }

    #[must_use]
    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    #[must_use]
    pub fn prefix(&self) -> Option<&str> {
        self.prefix.as_deref()
    }

    /// Translates `key` in this file's locale.
    ///
    /// Keys without a `ns:` prefix are looked up in `params.ns` or, failing
    /// that, in the file's namespace. `params.lng` overrides the locale.
    #[must_use]
    pub fn t(&self, key: &str, mut params: TranslateParams) -> String {
        if params.lng.is_none() {
            params.lng = Some(self.locale.clone());
        }

        if key.contains(NAMESPACE_SEPARATOR) {
            return self.translator.translate(key, &params);
        }

        let namespace = params.ns.as_deref().unwrap_or(&self.namespace);
        let key = format!("{namespace}{NAMESPACE_SEPARATOR}{key}");
        self.translator.translate(&key, &params)
    }

    /// Same as [`LocaleHelpers::t`] with the file's key prefix (`i18nPrefix`) prepended.
    #[must_use]
    pub fn tt(&self, key: &str, params: TranslateParams) -> String {
        match &self.prefix {
            Some(prefix) => self.t(&format!("{prefix}.{key}"), params),
            None => self.t(key, params),
        }
    }

    /// Localizes an absolute link; relative links are returned unchanged.
    #[must_use]
    pub fn tpath(&self, path: &str, locale: Option<&str>) -> String {
        resolve_absolute(&self.path_template, path, locale.unwrap_or(&self.locale))
    }
}
