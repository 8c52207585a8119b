//! Locale-specific output path resolution.

use super::{
    PathComponents,
    expand,
};

/// Computes the output path of `original_path` for `locale` using `template`.
///
/// A trailing `/` on the original path (directory index) is preserved on the result.
#[must_use]
pub fn resolve_path(template: &str, original_path: &str, locale: &str) -> String {
    let components = PathComponents::parse(original_path, locale);
    let mut resolved = expand(template, &components);

    if original_path.ends_with('/') {
        resolved.push('/');
    }

    resolved
}

/// Localizes an absolute link (`/about.html`) and leaves relative links untouched.
///
/// # Examples
/// ```
/// use site_i18n::path::resolve_absolute;
///
/// assert_eq!(resolve_absolute(":locale/:file", "/index.html", "en"), "/en/index.html");
/// assert_eq!(resolve_absolute(":locale/:file", "relative.html", "en"), "relative.html");
/// ```
#[must_use]
pub fn resolve_absolute(template: &str, path: &str, locale: &str) -> String {
    path.strip_prefix('/').map_or_else(
        || path.to_string(),
        |relative| format!("/{}", resolve_path(template, relative, locale)),
    )
}

#[cfg(test)]
mod tests {
    use googletest::prelude::*;
    use rstest::rstest;

    use super::*;

    #[rstest]
    #[case("index.html")]
    #[case("a/b/c.txt")]
    #[case("docs/page.php?x=1#top")]
    #[case("no-extension")]
    fn resolve_default_template_prefixes_locale(#[case] path: &str) {
        assert_eq!(resolve_path(":locale/:file", path, "de"), format!("de/{path}"));
    }

    #[rstest]
    fn resolve_preserves_trailing_slash() {
        assert_that!(resolve_path(":dir/:name-:locale:ext", "folder/", "en"), eq("folder/-en/"));
        assert_that!(resolve_path(":locale/:file", "guide/", "en"), eq("en/guide//"));
    }

    #[rstest]
    fn resolve_sibling_template() {
        assert_that!(
            resolve_path(":dir/:name-:locale:ext", "blog/post.html", "fr"),
            eq("blog/post-fr.html")
        );
        assert_that!(
            resolve_path(":dir/:name-:locale:ext", "index.hamlc", "fr"),
            eq("index-fr.hamlc")
        );
    }

    #[rstest]
    fn resolve_empty_path() {
        assert_that!(resolve_path(":locale/:file", "", "en"), eq("en/"));
    }

    #[rstest]
    #[case::absolute("/index.html", "/en/index.html")]
    #[case::nested("/docs/api.html#auth", "/en/docs/api.html#auth")]
    #[case::root("/", "/en/")]
    #[case::relative("relative.html", "relative.html")]
    #[case::dot_relative("./relative.html", "./relative.html")]
    #[case::external("https://example.com/", "https://example.com/")]
    #[case::empty("", "")]
    fn resolve_absolute_links(#[case] path: &str, #[case] expected: &str) {
        assert_that!(resolve_absolute(":locale/:file", path, "en"), eq(expected));
    }
}
