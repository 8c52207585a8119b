//! Forks matching files into one localized copy per locale.

use std::collections::HashSet;
use std::path::PathBuf;
use std::sync::Arc;

use thiserror::Error;

use crate::bootstrap::{
    Bootstrap,
    CLIENT_HELPERS,
    ClientConfig,
    ClientNamespaces,
};
use crate::config::{
    ConfigError,
    I18nSettings,
    PatternMatcher,
};
use crate::file::{
    FileRecord,
    FileSet,
};
use crate::path::resolve_path;
use crate::translate::{
    LocaleHelpers,
    ResourceError,
    ResourceLoader,
    ResourceStore,
    ResourceTranslator,
    Translator,
};

/// Errors raised while setting up or running the forker.
#[derive(Error, Debug)]
pub enum ForkError {
    /// Settings rejected before any resource was read.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// A resource file needed by the translation engine.
    #[error("Failed to preload translations: {0}")]
    Preload(#[source] ResourceError),

    /// A resource file embedded in one file's copies.
    #[error("Failed to load resources for '{path}': {source}")]
    Resource {
        /// Key of the file being forked.
        path: String,
        #[source]
        source: ResourceError,
    },

    /// The client bootstrap of one file could not be serialized.
    #[error("Failed to render bootstrap for '{path}': {source}")]
    Bootstrap {
        /// Key of the file being forked.
        path: String,
        #[source]
        source: serde_json::Error,
    },
}

/// Counts of one forking pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ForkSummary {
    /// Source files that matched the pattern.
    pub sources: usize,
    /// Localized copies written to the file set.
    pub forks: usize,
    /// Copies that replaced an existing entry.
    pub overwritten: usize,
}

/// The localization plugin.
///
/// Settings are validated when the forker is created, so a misconfigured
/// build fails before any file is touched.
#[derive(Debug, Clone)]
pub struct LocaleForker {
    /// Validated plugin options.
    settings: I18nSettings,
    /// Compiled `pattern` globs.
    matcher: PatternMatcher,
    /// Shared by the helpers of every fork.
    translator: Arc<dyn Translator>,
    /// Reads per-file resource stores.
    loader: ResourceLoader,
}

impl LocaleForker {
    /// Creates a forker reading resource files relative to the working directory.
    ///
    /// # Errors
    /// - Invalid settings
    /// - Invalid glob pattern
    pub fn new(settings: I18nSettings, translator: Arc<dyn Translator>) -> Result<Self, ConfigError> {
        settings.validate().map_err(ConfigError::ValidationErrors)?;
        let matcher = PatternMatcher::new(&settings.pattern)?;
        let loader = ResourceLoader::new(".", settings.resource_path_template.clone());

        tracing::debug!("Options are {:?}", settings);

        Ok(Self { settings, matcher, translator, loader })
    }

    /// Validates `settings`, then builds a forker translating with a
    /// [`ResourceTranslator`] preloaded from `root`.
    ///
    /// # Errors
    /// - Invalid settings, reported before any resource file is read
    /// - Missing or malformed resource file
    pub fn with_resources(settings: I18nSettings, root: impl Into<PathBuf>) -> Result<Self, ForkError> {
        settings.validate().map_err(ConfigError::ValidationErrors)?;

        let root = root.into();
        let loader = ResourceLoader::new(root.clone(), settings.resource_path_template.clone());
        let translator = ResourceTranslator::init(&settings, &loader).map_err(ForkError::Preload)?;

        Ok(Self::new(settings, Arc::new(translator))?.with_resource_root(root))
    }

    /// Resolves resource paths against `root` instead of the working directory.
    #[must_use]
    pub fn with_resource_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.loader = ResourceLoader::new(root, self.settings.resource_path_template.clone());
        self
    }

    /// Replaces every matching file with its localized copies.
    ///
    /// Keys are snapshotted up front, so copies inserted during the pass are
    /// never forked again. All copies of a file are prepared before the file
    /// set is modified; a resource error leaves that file untouched.
    ///
    /// # Errors
    /// Returns error if a resource file cannot be loaded.
    pub fn run(&self, files: &mut FileSet) -> Result<ForkSummary, ForkError> {
        let mut summary = ForkSummary::default();
        let keys: Vec<String> = files.keys().cloned().collect();
        let mut outputs: HashSet<String> = HashSet::new();

        for key in keys {
            // A fork may have replaced a source that is still pending.
            if outputs.contains(&key) || !self.matcher.is_match(&key) {
                continue;
            }
            let Some(original) = files.get(&key) else {
                continue;
            };

            tracing::debug!("Processing {}", key);
            let forks = self.fork(&key, original)?;
            summary.sources += 1;

            let mut replaced_original = false;
            for (output, record) in forks {
                if output == key {
                    replaced_original = true;
                } else if files.contains_key(&output) {
                    tracing::warn!("Overwriting {} with the localized copy of {}", output, key);
                    summary.overwritten += 1;
                }

                tracing::debug!("Adding file {}", output);
                outputs.insert(output.clone());
                files.insert(output, record);
                summary.forks += 1;
            }

            if !replaced_original {
                tracing::debug!("Removing file {}", key);
                files.remove(&key);
            }
        }

        if let Some(helpers) = &self.settings.helpers
            && !files.contains_key(helpers)
        {
            tracing::debug!("Adding client helpers {}", helpers);
            files.insert(helpers.clone(), FileRecord::new(CLIENT_HELPERS));
        }

        tracing::info!(
            sources = summary.sources,
            forks = summary.forks,
            overwritten = summary.overwritten,
            "Localized files"
        );

        Ok(summary)
    }

    /// Builds the localized copies of one file, in locale order.
    fn fork(&self, key: &str, original: &FileRecord) -> Result<Vec<(String, FileRecord)>, ForkError> {
        let default_namespace = self.settings.default_namespace().unwrap_or_default();
        let namespace =
            original.i18n.i18n_namespace.as_deref().unwrap_or(default_namespace).to_string();
        let preload = self.preload_namespaces(original, &namespace);
        tracing::debug!("Loading namespaces: {:?}", preload);

        self.settings
            .locales
            .iter()
            .map(|locale| {
                let mut record = original.clone();
                let output = resolve_path(&self.settings.path_template, key, locale);

                let res_store = self.load_store(key, locale, &preload)?;
                let bootstrap = Bootstrap {
                    config: ClientConfig {
                        lng: locale,
                        res_get_path: &self.settings.client_resource_path,
                        ns: ClientNamespaces {
                            namespaces: &self.settings.namespaces,
                            default_ns: &namespace,
                        },
                        preload: [locale.as_str()],
                        get_async: false,
                        fallback_lng: false,
                        res_store: &res_store,
                    },
                    namespace: &namespace,
                    prefix: original.i18n.i18n_prefix.as_deref(),
                    locale,
                    path_template: &self.settings.path_template,
                }
                .render()
                .map_err(|source| ForkError::Bootstrap { path: key.to_string(), source })?;

                record.helpers = Some(LocaleHelpers::new(
                    Arc::clone(&self.translator),
                    locale.as_str(),
                    namespace.as_str(),
                    original.i18n.i18n_prefix.clone(),
                    self.settings.path_template.as_str(),
                ));
                record.locale = Some(locale.clone());
                record.orig_path = Some(key.to_string());
                record.res_store = Some(res_store);
                record.bootstrap = Some(bootstrap);

                Ok((output, record))
            })
            .collect()
    }

    /// The file's namespace first, then its `i18nPreload` namespaces.
    fn preload_namespaces(&self, record: &FileRecord, namespace: &str) -> Vec<String> {
        let mut namespaces =
            record.i18n.i18n_preload.as_ref().map(crate::file::Preload::namespaces).unwrap_or_default();

        if !namespaces.iter().any(|ns| ns == namespace) {
            namespaces.insert(0, namespace.to_string());
        }
        namespaces
    }

    /// Reads `namespaces` for `locale` into a fresh store.
    fn load_store(
        &self,
        key: &str,
        locale: &str,
        namespaces: &[String],
    ) -> Result<ResourceStore, ForkError> {
        let mut store = ResourceStore::new();
        for namespace in namespaces {
            let resource = self
                .loader
                .load(locale, namespace)
                .map_err(|source| ForkError::Resource { path: key.to_string(), source })?;
            store.insert(locale, namespace, resource);
        }
        Ok(store)
    }
}
