use serde::{
    Deserialize,
    Deserializer,
    Serialize,
};
use thiserror::Error;

use super::MatcherError;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Configuration error in '{field_path}': {message}")]
pub struct ValidationError {
    /// JSON path to the field (e.g., "locales[0]")
    pub field_path: String,
    /// What is wrong with the field.
    pub message: String,
}

impl ValidationError {
    #[must_use]
    pub fn new(field_path: impl Into<String>, message: impl Into<String>) -> Self {
        Self { field_path: field_path.into(), message: message.into() }
    }
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Configuration validation failed:\n{}", format_validation_errors(.0))]
    ValidationErrors(Vec<ValidationError>),

    #[error("Failed to load configuration file: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Failed to parse configuration: {0}")]
    ParseError(#[from] serde_json::Error),

    #[error(transparent)]
    Pattern(#[from] MatcherError),
}

fn format_validation_errors(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .enumerate()
        .map(|(i, err)| format!("  {}. {} - {}", i + 1, err.field_path, err.message))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Plugin options.
///
/// Every list option accepts either a single string or an array of strings.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase", default)]
pub struct I18nSettings {
    /// Locales to fork every matching file into, in output order.
    #[serde(deserialize_with = "one_or_many")]
    pub locales: Vec<String>,

    /// Glob patterns selecting the files to localize.
    #[serde(deserialize_with = "one_or_many")]
    pub pattern: Vec<String>,

    /// Output path template (see [`crate::path::expand`]).
    #[serde(rename = "path", alias = "pathTemplate")]
    pub path_template: String,

    /// Translation namespaces. The first one is the default namespace.
    #[serde(deserialize_with = "one_or_many")]
    pub namespaces: Vec<String>,

    /// Location of resource files, with `__lng__` and `__ns__` tokens.
    #[serde(rename = "nsPath", alias = "resourcePathTemplate")]
    pub resource_path_template: String,

    /// Resource location handed to the client-side bootstrap.
    #[serde(rename = "resGetPath")]
    pub client_resource_path: String,

    /// Output key of the bundled client helper script. `null` disables it.
    pub helpers: Option<String>,

    /// Locale consulted when a key is missing. `false` disables fallback.
    #[serde(rename = "fallbackLng", deserialize_with = "fallback_locale")]
    pub fallback_locale: Option<String>,
}

/// A single string or a list of strings.
#[derive(Deserialize)]
#[serde(untagged)]
enum OneOrMany {
    /// `"en"`
    One(String),
    /// `["en", "fr"]`
    Many(Vec<String>),
}

fn one_or_many<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match OneOrMany::deserialize(deserializer)? {
        OneOrMany::One(value) => vec![value],
        OneOrMany::Many(values) => values,
    })
}

/// `fallbackLng`: a locale or `false`.
#[derive(Deserialize)]
#[serde(untagged)]
enum FallbackLocale {
    /// Only `false` is accepted.
    Flag(bool),
    /// Locale to fall back to.
    Locale(String),
}

fn fallback_locale<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<FallbackLocale>::deserialize(deserializer)? {
        None | Some(FallbackLocale::Flag(false)) => Ok(None),
        Some(FallbackLocale::Locale(locale)) => Ok(Some(locale)),
        Some(FallbackLocale::Flag(true)) => {
            Err(serde::de::Error::custom("fallbackLng must be a locale or false"))
        }
    }
}

impl I18nSettings {
    /// Settings with the given locales and every other option at its default.
    #[must_use]
    pub fn with_locales<I, S>(locales: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self { locales: locales.into_iter().map(Into::into).collect(), ..Self::default() }
    }

    /// The namespace used when a file does not pick its own.
    #[must_use]
    pub fn default_namespace(&self) -> Option<&str> {
        self.namespaces.first().map(String::as_str)
    }

    /// # Errors
    /// - Required list is empty
    /// - Invalid glob pattern
    /// - Empty template
    /// - Fallback locale not among `locales`
    pub fn validate(&self) -> Result<(), Vec<ValidationError>> {
        let mut errors = Vec::new();

        if self.locales.is_empty() {
            errors.push(ValidationError::new(
                "locales",
                "At least one locale is required. Example: [\"en\", \"fr\"]",
            ));
        }

        for (index, locale) in self.locales.iter().enumerate() {
            if locale.trim().is_empty() {
                errors.push(ValidationError::new(
                    format!("locales[{index}]"),
                    "A locale cannot be empty",
                ));
            }
        }

        if self.namespaces.is_empty() {
            errors.push(ValidationError::new(
                "namespaces",
                "At least one namespace is required. Example: [\"translation\"]",
            ));
        }

        for (index, namespace) in self.namespaces.iter().enumerate() {
            if namespace.trim().is_empty() {
                errors.push(ValidationError::new(
                    format!("namespaces[{index}]"),
                    "A namespace cannot be empty",
                ));
            }
        }

        if self.pattern.is_empty() {
            errors.push(ValidationError::new(
                "pattern",
                "At least one pattern is required. Example: [\"**/*.html\"]",
            ));
        }

        for (index, pattern) in self.pattern.iter().enumerate() {
            if let Err(e) = super::matcher::build_glob(pattern) {
                errors.push(ValidationError::new(
                    format!("pattern[{index}]"),
                    format!("Invalid glob pattern '{pattern}': {e}"),
                ));
            }
        }

        if self.path_template.is_empty() {
            errors.push(ValidationError::new(
                "path",
                "The path template cannot be empty. Example: \":locale/:file\"",
            ));
        }

        if self.resource_path_template.is_empty() {
            errors.push(ValidationError::new(
                "nsPath",
                "The resource path cannot be empty. Example: \"./locales/__lng__/__ns__.json\"",
            ));
        }

        if let Some(helpers) = &self.helpers
            && helpers.is_empty()
        {
            errors.push(ValidationError::new(
                "helpers",
                "The helpers path cannot be empty. Use null to disable the helper script",
            ));
        }

        if let Some(fallback) = &self.fallback_locale
            && !self.locales.contains(fallback)
        {
            errors.push(ValidationError::new(
                "fallbackLng",
                format!("The fallback locale '{fallback}' must be included in locales"),
            ));
        }

        if errors.is_empty() { Ok(()) } else { Err(errors) }
    }
}

impl Default for I18nSettings {
    fn default() -> Self {
        Self {
            locales: Vec::new(),
            pattern: vec!["**/*".to_string()],
            path_template: ":locale/:file".to_string(),
            namespaces: vec!["translation".to_string()],
            resource_path_template: "./locales/__lng__/__ns__.json".to_string(),
            client_resource_path: "/locales/__lng__/__ns__.json".to_string(),
            helpers: Some("scripts/i18n-helpers.js".to_string()),
            fallback_locale: None,
        }
    }
}
