//! Configuration constants and label templating for the annotator.

use regex::{Captures, Regex};
use std::sync::LazyLock;

/// Class added to the footnote list container.
pub const CONTAINER_CLASS: &str = "footnotes";

/// Tag used when the annotator has to create its own container.
pub const CONTAINER_TAG: &str = "ul";

/// Tag of a single footnote list entry.
pub const ENTRY_TAG: &str = "li";

/// Class of a single footnote list entry.
pub const ENTRY_CLASS: &str = "footnote";

/// Class of the identifier span inside an entry.
pub const IDENTIFIER_CLASS: &str = "footnoteIdentifier";

/// Class of the URL span inside an entry. The known-URL list is read back
/// from elements carrying this class.
pub const URL_CLASS: &str = "footnoteUrl";

/// Class of the marker inserted next to each citation.
pub const REFERENCE_CLASS: &str = "footnoteReference";

/// Flag class set on source elements once they have a marker.
pub const NOTED_CLASS: &str = "noted";

/// Attributes that make an element a citation, in lookup priority order.
pub const CITATION_ATTRIBUTES: [&str; 2] = ["cite", "href"];

/// Block quotations get their marker inside the quote instead of after it.
pub const BLOCKQUOTE_TAG: &str = "blockquote";

/// Elements inside a block quotation that can receive the marker.
pub const PLACEMENT_TAGS: [&str; 3] = ["p", "li", "dd"];

/// Default label template.
pub const DEFAULT_FORMAT: &str = "{id}";

/// Name of the charset used when none is configured or the configured one
/// has fewer than two symbols.
pub const DEFAULT_CHARSET: &str = "alpha";

/// Placeholder pattern: `{name}`, optionally escaped as `\{name}`.
#[allow(clippy::expect_used)] // Static regex that is guaranteed to be valid
static PLACEHOLDER_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\\?\{([^{}]+)\}").expect("valid regex"));

/// Substitute `{name}` placeholders in a template.
///
/// Placeholders the lookup does not know are replaced with an empty string.
/// A backslash in front of the brace keeps the placeholder literally,
/// without the backslash.
///
/// # Examples
/// ```
/// use footnotes::config::substitute;
///
/// let lookup = |name: &str| (name == "id").then(|| "b".to_string());
/// assert_eq!(substitute("[{id}]", lookup), "[b]");
/// assert_eq!(substitute("{id}{missing}", lookup), "b");
/// assert_eq!(substitute(r"\{id} {id}", lookup), "{id} b");
/// ```
pub fn substitute<F>(template: &str, lookup: F) -> String
where
    F: Fn(&str) -> Option<String>,
{
    PLACEHOLDER_PATTERN
        .replace_all(template, |caps: &Captures<'_>| {
            let whole = &caps[0];
            if let Some(literal) = whole.strip_prefix('\\') {
                return literal.to_string();
            }
            lookup(&caps[1]).unwrap_or_default()
        })
        .into_owned()
}

/// Check whether a tag name is one of the given names, ignoring ASCII case.
pub fn tag_in(tag: &str, names: &[&str]) -> bool {
    names.iter().any(|name| tag.eq_ignore_ascii_case(name))
}
