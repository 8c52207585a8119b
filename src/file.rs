//! Content files flowing through a build.

use std::collections::BTreeMap;

use serde::{
    Deserialize,
    Serialize,
};
use serde_json::{
    Map,
    Value,
};

use crate::translate::{
    LocaleHelpers,
    ResourceStore,
};

/// Files of one build, keyed by their path relative to the source root.
pub type FileSet = BTreeMap<String, FileRecord>;

/// Frontmatter keys read by the localization plugin.
const I18N_KEYS: [&str; 3] = ["i18nNamespace", "i18nPrefix", "i18nPreload"];

/// Namespaces to embed in a page besides its own.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(untagged)]
pub enum Preload {
    /// Comma and/or whitespace separated list: `"common, nav"`.
    Joined(String),
    /// Explicit list: `["common", "nav"]`.
    List(Vec<String>),
}

impl Preload {
    #[must_use]
    pub fn namespaces(&self) -> Vec<String> {
        match self {
            Self::Joined(joined) => joined
                .split(|c: char| c == ',' || c.is_whitespace())
                .filter(|ns| !ns.is_empty())
                .map(String::from)
                .collect(),
            Self::List(list) => list.clone(),
        }
    }
}

/// Per-file localization overrides.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct I18nFrontmatter {
    /// Namespace for keys without an explicit `ns:`.
    pub i18n_namespace: Option<String>,
    /// Key prefix applied by `tt`.
    pub i18n_prefix: Option<String>,
    /// Extra namespaces embedded for client-side translation.
    pub i18n_preload: Option<Preload>,
}

impl I18nFrontmatter {
    /// Moves the localization keys out of `metadata` and parses them.
    ///
    /// # Errors
    /// Returns error if a key is present with the wrong type.
    pub fn extract(metadata: &mut Map<String, Value>) -> Result<Self, serde_json::Error> {
        let fields: Map<String, Value> = I18N_KEYS
            .iter()
            .filter_map(|key| metadata.remove(*key).map(|value| ((*key).to_string(), value)))
            .filter(|(_, value)| !value.is_null())
            .collect();

        serde_json::from_value(Value::Object(fields))
    }
}

/// One content file.
///
/// `metadata` holds frontmatter the plugin does not interpret. The remaining
/// optional fields are filled in on localized copies.
#[derive(Debug, Clone, Default)]
pub struct FileRecord {
    /// Body without frontmatter.
    pub contents: Vec<u8>,
    pub metadata: Map<String, Value>,
    /// Localization overrides read from frontmatter.
    pub i18n: I18nFrontmatter,

    /// Locale of a localized copy.
    pub locale: Option<String>,
    /// Translation helpers bound to `locale`.
    pub helpers: Option<LocaleHelpers>,
    /// Key of the file this copy was forked from.
    pub orig_path: Option<String>,
    /// Resources embedded for client-side translation.
    pub res_store: Option<ResourceStore>,
    /// Client-side bootstrap script.
    pub bootstrap: Option<String>,
}

impl FileRecord {
    #[must_use]
    pub fn new(contents: impl Into<Vec<u8>>) -> Self {
        Self { contents: contents.into(), ..Self::default() }
    }

    /// Creates a record from contents and frontmatter.
    ///
    /// # Errors
    /// Returns error if a localization key has the wrong type.
    pub fn with_metadata(
        contents: impl Into<Vec<u8>>,
        mut metadata: Map<String, Value>,
    ) -> Result<Self, serde_json::Error> {
        let i18n = I18nFrontmatter::extract(&mut metadata)?;
        Ok(Self { contents: contents.into(), metadata, i18n, ..Self::default() })
    }

    /// Contents as UTF-8 text, with invalid sequences replaced.
    #[must_use]
    pub fn text(&self) -> std::borrow::Cow<'_, str> {
        String::from_utf8_lossy(&self.contents)
    }
}
