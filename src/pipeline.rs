//! Minimal static site build: read a source tree, run plugins, write the result.

use std::fs;
use std::path::{
    Path,
    PathBuf,
};

use ignore::WalkBuilder;
use serde_json::{
    Map,
    Value,
};
use thiserror::Error;

use crate::config::CONFIG_FILE_NAME;
use crate::file::{
    FileRecord,
    FileSet,
};
use crate::fork::LocaleForker;

/// Error type returned by plugins.
pub type PluginError = Box<dyn std::error::Error + Send + Sync>;

/// Frontmatter delimiter line.
const FRONTMATTER_DELIMITER: &str = "---";

/// File written for keys that name a directory (`about/`).
const INDEX_FILE: &str = "index.html";

#[derive(Error, Debug)]
pub enum PipelineError {
    /// Source directory traversal failed.
    #[error("Failed to walk source directory: {0}")]
    Walk(#[from] ignore::Error),

    /// A source file could not be read.
    #[error("Failed to read '{}': {source}", path.display())]
    Read {
        /// Path on disk.
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A frontmatter block is not a JSON object.
    #[error("Invalid frontmatter in '{path}': {source}")]
    Frontmatter {
        /// File key.
        path: String,
        #[source]
        source: serde_json::Error,
    },

    /// An output file could not be written.
    #[error("Failed to write '{}': {source}", path.display())]
    Write {
        /// Path on disk.
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A plugin rejected the file set.
    #[error("Plugin '{name}' failed: {source}")]
    Plugin {
        /// Name reported by [`Plugin::name`].
        name: String,
        #[source]
        source: PluginError,
    },
}

/// A build step transforming the whole file set.
///
/// Returning normally signals completion; an error aborts the build.
pub trait Plugin: Send + Sync {
    /// Name shown in logs and errors.
    fn name(&self) -> &str;

    /// Transforms the file set in place.
    ///
    /// # Errors
    /// Returns error if the step cannot complete.
    fn transform(&self, files: &mut FileSet) -> Result<(), PluginError>;
}

impl Plugin for LocaleForker {
    fn name(&self) -> &str {
        "i18n"
    }

    fn transform(&self, files: &mut FileSet) -> Result<(), PluginError> {
        self.run(files)?;
        Ok(())
    }
}

/// Reads a source tree, runs plugins over it and writes the result.
pub struct Pipeline {
    /// Root of the source tree.
    source: PathBuf,
    /// Root of the output tree.
    destination: Option<PathBuf>,
    /// Plugins in execution order.
    plugins: Vec<Box<dyn Plugin>>,
}

impl std::fmt::Debug for Pipeline {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Pipeline")
            .field("source", &self.source)
            .field("destination", &self.destination)
            .field("plugins", &self.plugins.iter().map(|plugin| plugin.name()).collect::<Vec<_>>())
            .finish()
    }
}

impl Pipeline {
    #[must_use]
    pub fn new(source: impl Into<PathBuf>) -> Self {
        Self { source: source.into(), destination: None, plugins: Vec::new() }
    }

    /// Sets the output directory. Without one, [`Pipeline::build`] writes nothing.
    #[must_use]
    pub fn destination(mut self, destination: impl Into<PathBuf>) -> Self {
        self.destination = Some(destination.into());
        self
    }

    /// Appends a plugin; plugins run in the order they were added.
    #[must_use]
    pub fn use_plugin(mut self, plugin: impl Plugin + 'static) -> Self {
        self.plugins.push(Box::new(plugin));
        self
    }

    /// Reads the source tree, runs every plugin and writes the destination tree.
    ///
    /// # Errors
    /// - Source or destination I/O failure
    /// - Malformed frontmatter
    /// - Plugin failure
    pub fn build(&self) -> Result<FileSet, PipelineError> {
        let mut files = self.read()?;
        tracing::info!(source = %self.source.display(), files = files.len(), "Read source files");

        self.process(&mut files)?;

        if let Some(destination) = &self.destination {
            write_files(destination, &files)?;
            tracing::info!(
                destination = %destination.display(),
                files = files.len(),
                "Wrote output files"
            );
        }

        Ok(files)
    }

    /// Runs every plugin over `files`.
    ///
    /// # Errors
    /// Returns the first plugin failure.
    pub fn process(&self, files: &mut FileSet) -> Result<(), PipelineError> {
        for plugin in &self.plugins {
            tracing::debug!(plugin = plugin.name(), "Running plugin");
            plugin.transform(files).map_err(|source| PipelineError::Plugin {
                name: plugin.name().to_string(),
                source,
            })?;
        }
        Ok(())
    }

    /// Reads every file under the source root into a file set.
    ///
    /// # Errors
    /// Returns error if a file cannot be read or has malformed frontmatter.
    pub fn read(&self) -> Result<FileSet, PipelineError> {
        let mut files = FileSet::new();

        for result in WalkBuilder::new(&self.source)
            .hidden(false)
            .git_ignore(true)
            .git_global(false)
            .git_exclude(true)
            .require_git(false)
            .follow_links(false)
            .build()
        {
            let entry = result?;

            if !entry.file_type().is_some_and(|ft| ft.is_file()) {
                continue;
            }

            let path = entry.path();
            let Ok(relative_path) = path.strip_prefix(&self.source) else {
                continue;
            };
            let key = file_key(relative_path);

            if key == CONFIG_FILE_NAME || key.starts_with(".git/") {
                continue;
            }

            let contents = fs::read(path)
                .map_err(|source| PipelineError::Read { path: path.to_path_buf(), source })?;
            let record = parse_file(contents)
                .map_err(|source| PipelineError::Frontmatter { path: key.clone(), source })?;

            tracing::debug!("Reading file {}", key);
            files.insert(key, record);
        }

        Ok(files)
    }
}

/// Key of a file relative to the source root, with `/` separators.
fn file_key(relative_path: &Path) -> String {
    relative_path
        .components()
        .map(|component| component.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}

/// Splits an optional JSON frontmatter block off the file contents.
///
/// The block starts at the first line when it is exactly `---` and ends at
/// the next `---` line. Files without one, or that are not UTF-8, keep their
/// contents untouched.
fn parse_file(contents: Vec<u8>) -> Result<FileRecord, serde_json::Error> {
    let Some((frontmatter, body)) = std::str::from_utf8(&contents).ok().and_then(split_frontmatter)
    else {
        return Ok(FileRecord::new(contents));
    };

    let metadata = if frontmatter.trim().is_empty() {
        Map::new()
    } else {
        serde_json::from_str::<Map<String, Value>>(frontmatter)?
    };
    let body = body.as_bytes().to_vec();

    FileRecord::with_metadata(body, metadata)
}

/// Returns `(frontmatter, body)` when `text` opens with a delimited block.
fn split_frontmatter(text: &str) -> Option<(&str, &str)> {
    let mut lines = text.split_inclusive('\n');
    if lines.next()?.trim_end() != FRONTMATTER_DELIMITER {
        return None;
    }

    let start = text.find('\n')? + 1;
    let mut offset = start;
    for line in lines {
        if line.trim_end() == FRONTMATTER_DELIMITER {
            let frontmatter = text.get(start..offset)?;
            let body = text.get(offset + line.len()..)?;
            return Some((frontmatter, body));
        }
        offset += line.len();
    }

    None
}

/// Output path of a file set key.
fn output_path(destination: &Path, key: &str) -> PathBuf {
    let mut path = destination.to_path_buf();
    path.extend(key.split('/').filter(|segment| !segment.is_empty()));
    if key.is_empty() || key.ends_with('/') {
        path.push(INDEX_FILE);
    }
    path
}

/// Writes every record below `destination`, creating directories as needed.
fn write_files(destination: &Path, files: &FileSet) -> Result<(), PipelineError> {
    for (key, record) in files {
        let path = output_path(destination, key);

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .map_err(|source| PipelineError::Write { path: parent.to_path_buf(), source })?;
        }
        fs::write(&path, &record.contents)
            .map_err(|source| PipelineError::Write { path: path.clone(), source })?;

        tracing::debug!("Writing file {}", path.display());
    }
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use std::sync::Arc;

    use googletest::prelude::*;
    use rstest::*;
    use serde_json::json;
    use tempfile::TempDir;

    use super::*;
    use crate::config::I18nSettings;
    use crate::translate::ResourceTranslator;

    /// Upper-cases every file.
    struct Shout;

    impl Plugin for Shout {
        fn name(&self) -> &str {
            "shout"
        }

        fn transform(&self, files: &mut FileSet) -> Result<(), PluginError> {
            for record in files.values_mut() {
                record.contents = record.text().to_uppercase().into_bytes();
            }
            Ok(())
        }
    }

    struct Fail;

    impl Plugin for Fail {
        fn name(&self) -> &str {
            "fail"
        }

        fn transform(&self, _files: &mut FileSet) -> Result<(), PluginError> {
            Err("nope".into())
        }
    }

    #[fixture]
    fn source() -> TempDir {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();
        fs::create_dir_all(root.join("blog")).unwrap();
        fs::write(root.join("index.html"), "---\n{\"title\": \"Home\"}\n---\n<h1>Home</h1>\n")
            .unwrap();
        fs::write(root.join("blog/post.html"), "<p>post</p>").unwrap();
        fs::write(root.join(".htaccess"), "deny").unwrap();
        fs::write(root.join(CONFIG_FILE_NAME), "{}").unwrap();
        temp_dir
    }

    #[rstest]
    #[case::plain(&["a.html"], "a.html")]
    #[case::nested(&["docs", "guide", "intro.md"], "docs/guide/intro.md")]
    fn file_key_uses_forward_slashes(#[case] segments: &[&str], #[case] expected: &str) {
        let path: PathBuf = segments.iter().collect();

        assert_that!(file_key(&path), eq(expected));
    }

    #[rstest]
    #[case::frontmatter("---\n{\"a\": 1}\n---\nbody", Some(("{\"a\": 1}\n", "body")))]
    #[case::crlf("---\r\n{}\r\n---\r\nbody", Some(("{}\r\n", "body")))]
    #[case::empty_frontmatter("---\n---\nbody", Some(("", "body")))]
    #[case::no_frontmatter("body\n---\n", None)]
    #[case::unterminated("---\n{}\nbody", None)]
    #[case::indented_delimiter(" ---\n{}\n---\n", None)]
    fn split_frontmatter_cases(#[case] text: &str, #[case] expected: Option<(&str, &str)>) {
        assert_eq!(split_frontmatter(text), expected);
    }

    #[rstest]
    fn parse_file_reads_metadata() {
        let record =
            parse_file(b"---\n{\"title\": \"Home\", \"i18nNamespace\": \"home\"}\n---\nbody".to_vec())
                .unwrap();

        assert_that!(record.metadata.get("title"), some(eq(&json!("Home"))));
        assert_that!(record.i18n.i18n_namespace, some(eq("home")));
        assert_that!(record.text(), eq("body"));
    }

    #[rstest]
    fn parse_file_keeps_binary_contents() {
        let contents = vec![0xff, 0xfe, 0x00];

        let record = parse_file(contents.clone()).unwrap();

        assert_eq!(record.contents, contents);
        assert!(record.metadata.is_empty());
    }

    #[rstest]
    #[case::not_json("---\ntitle: Home\n---\n")]
    #[case::not_object("---\n[1, 2]\n---\n")]
    fn parse_file_rejects_malformed_frontmatter(#[case] text: &str) {
        assert!(parse_file(text.as_bytes().to_vec()).is_err());
    }

    #[rstest]
    #[case::file("en/index.html", &["en", "index.html"])]
    #[case::directory("en/about/", &["en", "about", "index.html"])]
    #[case::root("", &["index.html"])]
    fn output_path_cases(#[case] key: &str, #[case] expected: &[&str]) {
        let destination = Path::new("out");
        let expected: PathBuf = std::iter::once("out").chain(expected.iter().copied()).collect();

        assert_eq!(output_path(destination, key), expected);
    }

    #[rstest]
    fn read_collects_source_files(source: TempDir) {
        let files = Pipeline::new(source.path()).read().unwrap();

        assert_that!(
            files.keys().cloned().collect::<Vec<String>>(),
            elements_are![eq(".htaccess"), eq("blog/post.html"), eq("index.html")]
        );
        assert_that!(files["index.html"].text(), eq("<h1>Home</h1>\n"));
    }

    #[rstest]
    fn build_runs_plugins_in_order_and_writes(source: TempDir) {
        let out = TempDir::new().unwrap();

        let files = Pipeline::new(source.path())
            .destination(out.path())
            .use_plugin(Shout)
            .build()
            .unwrap();

        assert_that!(files.len(), eq(3));
        assert_that!(
            fs::read_to_string(out.path().join("index.html")).unwrap(),
            eq("<H1>HOME</H1>\n")
        );
        assert_that!(
            fs::read_to_string(out.path().join("blog/post.html")).unwrap(),
            eq("<P>POST</P>")
        );
    }

    #[rstest]
    fn build_without_destination_writes_nothing(source: TempDir) {
        let files = Pipeline::new(source.path()).build().unwrap();

        assert_that!(files.len(), eq(3));
    }

    #[rstest]
    fn build_reports_failing_plugin(source: TempDir) {
        let result = Pipeline::new(source.path()).use_plugin(Fail).use_plugin(Shout).build();

        assert_that!(
            result.err().map(|e| e.to_string()),
            some(eq("Plugin 'fail' failed: nope"))
        );
    }

    #[rstest]
    fn locale_forker_runs_as_plugin(source: TempDir) {
        let settings = I18nSettings {
            pattern: vec!["**/*.html".to_string()],
            helpers: None,
            ..I18nSettings::with_locales(["en"])
        };
        let locales = source.path().join("locales/en");
        fs::create_dir_all(&locales).unwrap();
        fs::write(locales.join("translation.json"), "{}").unwrap();
        let forker = LocaleForker::new(settings, Arc::new(ResourceTranslator::new("en", "translation")))
            .unwrap()
            .with_resource_root(source.path());

        let mut files = Pipeline::new(source.path()).read().unwrap();
        Pipeline::new(source.path()).use_plugin(forker).process(&mut files).unwrap();

        assert!(files.contains_key("en/index.html"));
        assert!(files.contains_key("en/blog/post.html"));
        assert!(files.contains_key("locales/en/translation.json"));
        assert!(!files.contains_key("index.html"));
    }
}
