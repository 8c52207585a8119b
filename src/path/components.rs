//! Decomposition of a relative file path into template components.

/// Named parts of a relative path, used as substitution values for path templates.
///
/// Given `folder/file.html?v=2#top` and the locale `en`:
///
/// | Component | Value                     |
/// |-----------|---------------------------|
/// | `file`    | `folder/file.html?v=2#top` |
/// | `dir`     | `folder`                  |
/// | `base`    | `file.html`               |
/// | `name`    | `file`                    |
/// | `ext`     | `.html`                   |
/// | `query`   | `?v=2`                    |
/// | `hash`    | `#top`                    |
/// | `locale`  | `en`                      |
///
/// Components that do not apply are empty strings, never absent.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PathComponents {
    /// The whole key.
    pub file: String,
    /// Everything before the last `/`, or `.` for top-level files.
    pub dir: String,
    /// File name with extension, without query or hash.
    pub base: String,
    /// File name without extension.
    pub name: String,
    /// Extension including its dot.
    pub ext: String,
    /// Query string including `?`.
    pub query: String,
    /// Fragment including `#`.
    pub hash: String,
    /// Locale the key is being resolved for.
    pub locale: String,
}

impl PathComponents {
    /// Placeholder identifiers understood by [`PathComponents::get`].
    pub const PLACEHOLDERS: [&'static str; 8] =
        ["file", "dir", "base", "name", "ext", "query", "hash", "locale"];

    /// Parses `file` into its components and tags them with `locale`.
    ///
    /// Separators are located with last-occurrence scans, so nested directories
    /// resolve to the rightmost `/` and multiple dots to the rightmost `.`.
    /// Whichever of the last `?` and last `#` comes first bounds the base name.
    #[must_use]
    pub fn parse(file: &str, locale: &str) -> Self {
        let base_start = file.rfind('/').map_or(0, |slash| slash + 1);
        let query_start = file.rfind('?');
        let hash_start = file.rfind('#');

        let base_end = match (query_start, hash_start) {
            (Some(q), Some(h)) => q.min(h),
            (Some(q), None) => q,
            (None, Some(h)) => h,
            (None, None) => file.len(),
        };

        // A marker before the last `/` leaves no room for a base name.
        let base = file.get(base_start..base_end).unwrap_or_default();

        let dir = base_start.checked_sub(1).and_then(|end| file.get(..end)).unwrap_or_default();

        // Leading dots (`.htaccess`) do not start an extension.
        let (name, ext) = match base.rfind('.') {
            Some(dot) if dot > 0 => base.split_at(dot),
            _ => (base, ""),
        };

        let query = match (query_start, hash_start) {
            (Some(q), Some(h)) if q < h => file.get(q..h).unwrap_or_default(),
            (Some(q), None) => file.get(q..).unwrap_or_default(),
            _ => "",
        };

        let hash = hash_start.and_then(|h| file.get(h..)).unwrap_or_default();

        Self {
            file: file.to_string(),
            dir: dir.to_string(),
            base: base.to_string(),
            name: name.to_string(),
            ext: ext.to_string(),
            query: query.to_string(),
            hash: hash.to_string(),
            locale: locale.to_string(),
        }
    }

    /// Returns the value bound to a placeholder identifier, or `None` if the
    /// identifier is not one of [`PathComponents::PLACEHOLDERS`].
    #[must_use]
    pub fn get(&self, identifier: &str) -> Option<&str> {
        let value = match identifier {
            "file" => &self.file,
            "dir" => &self.dir,
            "base" => &self.base,
            "name" => &self.name,
            "ext" => &self.ext,
            "query" => &self.query,
            "hash" => &self.hash,
            "locale" => &self.locale,
            _ => return None,
        };
        Some(value.as_str())
    }
}
