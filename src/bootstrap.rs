//! Client-side bootstrap script for localized pages.

use serde::Serialize;

use crate::translate::ResourceStore;

/// Client helper script written to the configured `helpers` path.
pub const CLIENT_HELPERS: &str = include_str!("../assets/i18n-helpers.js");

/// Namespace configuration of the client translation library.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ClientNamespaces<'a> {
    /// Namespaces the page may load.
    pub namespaces: &'a [String],
    /// Namespace of the page.
    pub default_ns: &'a str,
}

/// Options passed to the client translation library's `init`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ClientConfig<'a> {
    /// Locale of the page.
    pub lng: &'a str,
    /// URL template for lazily fetched resources.
    pub res_get_path: &'a str,
    pub ns: ClientNamespaces<'a>,
    /// Always the page locale.
    pub preload: [&'a str; 1],
    /// Always `false`.
    pub get_async: bool,
    /// Always `false`.
    pub fallback_lng: bool,
    /// Resources embedded in the page.
    pub res_store: &'a ResourceStore,
}

/// Everything a page needs to translate on the client.
#[derive(Debug, Clone)]
pub struct Bootstrap<'a> {
    pub config: ClientConfig<'a>,
    /// Namespace bound to the client `t`.
    pub namespace: &'a str,
    /// Key prefix bound to the client `tt`.
    pub prefix: Option<&'a str>,
    /// Locale bound to the client `tpath`.
    pub locale: &'a str,
    /// Output path template used by the client `tpath`.
    pub path_template: &'a str,
}

/// Serializes `value` as JSON safe to inline in a `<script>` element.
fn script_json<T: Serialize + ?Sized>(value: &T) -> Result<String, serde_json::Error> {
    Ok(serde_json::to_string(value)?.replace("</", "<\\/"))
}

impl Bootstrap<'_> {
    /// Renders the bootstrap script.
    ///
    /// # Errors
    /// Returns error if the configuration cannot be serialized.
    pub fn render(&self) -> Result<String, serde_json::Error> {
        let config = script_json(&self.config)?;
        let namespace = script_json(self.namespace)?;
        let prefix = script_json(self.prefix.unwrap_or_default())?;
        let locale = script_json(self.locale)?;
        let path = script_json(self.path_template)?;

        Ok(format!(
            r";(function (root) {{
  var constant = function (value) {{ return function () {{ return value }} }}

  if (!root.i18n) throw new Error('i18n must be loaded before bootstrapping the client')
  root.i18n.init({config})

  if (!root.i18nHelpers) throw new Error('i18nHelpers must be loaded before bootstrapping the client')
  var h = root.i18nHelpers({{
    namespace: constant({namespace}),
    prefix: constant({prefix}),
    locale: constant({locale}),
    path: constant({path})
  }})

  root.t = h.t
  root.tt = h.tt
  root.tpath = h.tpath
}})(window)
"
        ))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use googletest::prelude::*;
    use rstest::*;
    use serde_json::json;

    use super::*;

    #[fixture]
    fn store() -> ResourceStore {
        let mut store = ResourceStore::new();
        store.insert("fr", "home", json!({"hello": "Bonjour"}));
        store
    }

    fn bootstrap<'a>(
        store: &'a ResourceStore,
        namespaces: &'a [String],
        prefix: Option<&'a str>,
    ) -> Bootstrap<'a> {
        Bootstrap {
            config: ClientConfig {
                lng: "fr",
                res_get_path: "/locales/__lng__/__ns__.json",
                ns: ClientNamespaces { namespaces, default_ns: "home" },
                preload: ["fr"],
                get_async: false,
                fallback_lng: false,
                res_store: store,
            },
            namespace: "home",
            prefix,
            locale: "fr",
            path_template: ":locale/:file",
        }
    }

    #[rstest]
    fn client_config_serializes_camel_case(store: ResourceStore) {
        let namespaces = vec!["home".to_string()];
        let bootstrap = bootstrap(&store, &namespaces, None);

        assert_eq!(
            serde_json::to_value(&bootstrap.config).unwrap(),
            json!({
                "lng": "fr",
                "resGetPath": "/locales/__lng__/__ns__.json",
                "ns": {"namespaces": ["home"], "defaultNs": "home"},
                "preload": ["fr"],
                "getAsync": false,
                "fallbackLng": false,
                "resStore": {"fr": {"home": {"hello": "Bonjour"}}}
            })
        );
    }

    #[rstest]
    fn render_embeds_settings(store: ResourceStore) {
        let namespaces = vec!["home".to_string()];
        let script = bootstrap(&store, &namespaces, Some("page")).render().unwrap();

        assert_that!(script, contains_substring("root.i18n.init({\"lng\":\"fr\""));
        assert_that!(script, contains_substring("namespace: constant(\"home\")"));
        assert_that!(script, contains_substring("prefix: constant(\"page\")"));
        assert_that!(script, contains_substring("locale: constant(\"fr\")"));
        assert_that!(script, contains_substring("path: constant(\":locale/:file\")"));
        assert_that!(script, contains_substring("root.tpath = h.tpath"));
    }

    #[rstest]
    fn render_missing_prefix_is_empty_string(store: ResourceStore) {
        let namespaces = vec!["home".to_string()];
        let script = bootstrap(&store, &namespaces, None).render().unwrap();

        assert_that!(script, contains_substring("prefix: constant(\"\")"));
    }

    #[rstest]
    fn render_escapes_script_terminators() {
        let mut store = ResourceStore::new();
        store.insert("fr", "home", json!({"evil": "</script><script>alert(1)"}));
        let namespaces = vec!["home".to_string()];

        let script = bootstrap(&store, &namespaces, Some("it's")).render().unwrap();

        assert_that!(script, not(contains_substring("</script>")));
        assert_that!(script, contains_substring("<\\/script>"));
        assert_that!(script, contains_substring("prefix: constant(\"it's\")"));
    }

    #[rstest]
    fn client_helpers_are_bundled() {
        assert_that!(CLIENT_HELPERS, contains_substring("root.i18nHelpers"));
    }
}
