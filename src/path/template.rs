//! Path template expansion.

use super::PathComponents;

/// Returns true for characters allowed in a placeholder identifier (`\w`).
const fn is_identifier_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}

/// Substitutes `:identifier` placeholders in `template` with values from `components`.
///
/// Unknown identifiers are kept verbatim. An empty component is a valid
/// substitution. A single leading `./` or `/` is removed from the result.
///
/// # Examples
/// ```
/// use site_i18n::path::{PathComponents, expand};
///
/// let components = PathComponents::parse("docs/intro.html", "fr");
/// assert_eq!(expand(":locale/:dir/:name:ext", &components), "fr/docs/intro.html");
/// assert_eq!(expand("/:locale/:unknown", &components), "fr/:unknown");
/// ```
#[must_use]
pub fn expand(template: &str, components: &PathComponents) -> String {
    let mut expanded = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(colon) = rest.find(':') {
        let (literal, tail) = rest.split_at(colon);
        expanded.push_str(literal);

        let after_colon = tail.get(1..).unwrap_or_default();
        let identifier_len =
            after_colon.find(|c: char| !is_identifier_char(c)).unwrap_or(after_colon.len());
        let (identifier, remainder) = after_colon.split_at(identifier_len);

        match components.get(identifier) {
            Some(value) if !identifier.is_empty() => expanded.push_str(value),
            _ => {
                expanded.push(':');
                expanded.push_str(identifier);
            }
        }

        rest = remainder;
    }
    expanded.push_str(rest);

    match expanded.strip_prefix("./").or_else(|| expanded.strip_prefix('/')) {
        Some(stripped) => stripped.to_string(),
        None => expanded,
    }
}
