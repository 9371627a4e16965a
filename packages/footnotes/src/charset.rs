//! Symbol alphabets used to number footnotes.
//!
//! A [`Charset`] is an ordered list of symbols treated as the digits of a
//! bijective numeral system. Callers pick one of the predefined charsets by
//! name or supply their own symbols through [`CharsetSpec`].

use std::collections::HashMap;
use std::fmt;
use std::sync::LazyLock;

use serde::de::IgnoredAny;
use serde::Deserialize;

use crate::config::DEFAULT_CHARSET;
use crate::error::{FootnotesError, Result};

/// Greek letters, as the characters the `&alpha;` .. `&omega;` entities denote.
const GREEK: [&str; 24] = [
    "α", "β", "γ", "δ", "ε", "ζ", "η", "θ", "ι", "κ", "λ", "μ", "ν", "ξ", "ο", "π", "ρ", "σ", "τ",
    "υ", "φ", "χ", "ψ", "ω",
];

/// Typographic reference marks, starting with the classic `*`, `†`, `‡`.
const SPECIAL: [&str; 16] = [
    "*", "†", "‡", "±", "⊗", "∇", "♦", "×", "⊄", "ϖ", "∂", "∅", "≠", "∝", "∴", "˜",
];

/// Predefined charsets, keyed by registry name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NamedCharset {
    /// `0` .. `9`.
    Numeric,
    /// `a` .. `z`.
    Alpha,
    /// `0` .. `9` followed by `a` .. `z`.
    Alphanumeric,
    /// Lowercase letters in keyboard order.
    Qwerty,
    /// The 24 lowercase Greek letters.
    Greek,
    /// Sixteen reference symbols.
    Special,
}

impl NamedCharset {
    /// Every predefined charset.
    pub const ALL: [Self; 6] = [
        Self::Numeric,
        Self::Alpha,
        Self::Alphanumeric,
        Self::Qwerty,
        Self::Greek,
        Self::Special,
    ];

    /// Registry name of this charset.
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::Numeric => "numeric",
            Self::Alpha => "alpha",
            Self::Alphanumeric => "alphanumeric",
            Self::Qwerty => "qwerty",
            Self::Greek => "greek",
            Self::Special => "special",
        }
    }

    /// Look up a charset by name. Matching is case-sensitive.
    ///
    /// # Examples
    /// ```
    /// use footnotes::charset::NamedCharset;
    ///
    /// assert_eq!(NamedCharset::from_name("greek"), Some(NamedCharset::Greek));
    /// assert_eq!(NamedCharset::from_name("Greek"), None);
    /// ```
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|charset| charset.name() == name)
    }

    /// Symbols of this charset, in numeral order.
    #[must_use]
    pub fn symbols(self) -> &'static [String] {
        REGISTRY.get(&self).map(Vec::as_slice).unwrap_or_default()
    }
}

impl fmt::Display for NamedCharset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

fn split_symbols(chars: &str) -> Vec<String> {
    chars.chars().map(String::from).collect()
}

/// Process-wide table of predefined charsets, built on first use.
static REGISTRY: LazyLock<HashMap<NamedCharset, Vec<String>>> = LazyLock::new(|| {
    let mut registry = HashMap::new();
    registry.insert(NamedCharset::Numeric, split_symbols("0123456789"));
    registry.insert(
        NamedCharset::Alpha,
        split_symbols("abcdefghijklmnopqrstuvwxyz"),
    );
    registry.insert(
        NamedCharset::Alphanumeric,
        split_symbols("0123456789abcdefghijklmnopqrstuvwxyz"),
    );
    registry.insert(
        NamedCharset::Qwerty,
        split_symbols("qwertyuiopasdfghjklzxcvbnm"),
    );
    registry.insert(
        NamedCharset::Greek,
        GREEK.iter().map(|s| s.to_string()).collect(),
    );
    registry.insert(
        NamedCharset::Special,
        SPECIAL.iter().map(|s| s.to_string()).collect(),
    );
    registry
});

/// Charset as written in the caller's options, before resolution.
///
/// Deserializes from a sequence of strings or from a single string. Any
/// other value deserializes into [`CharsetSpec::Unsupported`], which is
/// rejected when the annotator is constructed.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum CharsetSpec {
    /// Symbols used verbatim.
    Symbols(Vec<String>),
    /// A registry name, or a string whose characters become the symbols.
    Name(String),
    /// A value of any other type.
    Unsupported(IgnoredAny),
}

impl From<NamedCharset> for CharsetSpec {
    fn from(charset: NamedCharset) -> Self {
        Self::Name(charset.name().to_string())
    }
}

impl From<Vec<String>> for CharsetSpec {
    fn from(symbols: Vec<String>) -> Self {
        Self::Symbols(symbols)
    }
}

impl From<&str> for CharsetSpec {
    fn from(name: &str) -> Self {
        Self::Name(name.to_string())
    }
}

/// A resolved numeral alphabet with at least two symbols.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Charset {
    symbols: Vec<String>,
}

impl Charset {
    /// Build a charset from symbols.
    ///
    /// Fewer than two symbols cannot number anything, so such input falls
    /// back to the default alphabetic charset.
    pub fn new<I, S>(symbols: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let symbols: Vec<String> = symbols.into_iter().map(Into::into).collect();
        if symbols.len() < 2 {
            tracing::debug!(
                len = symbols.len(),
                fallback = DEFAULT_CHARSET,
                "charset too small, using default"
            );
            return Self::default();
        }
        Self { symbols }
    }

    /// A predefined charset.
    #[must_use]
    pub fn named(charset: NamedCharset) -> Self {
        Self {
            symbols: charset.symbols().to_vec(),
        }
    }

    /// Resolve a charset option.
    ///
    /// # Errors
    /// Returns [`FootnotesError::Configuration`] for
    /// [`CharsetSpec::Unsupported`].
    pub fn resolve(spec: &CharsetSpec) -> Result<Self> {
        match spec {
            CharsetSpec::Symbols(symbols) => Ok(Self::new(symbols.iter().cloned())),
            CharsetSpec::Name(name) => Ok(match NamedCharset::from_name(name) {
                Some(named) => Self::named(named),
                None => Self::new(split_symbols(name)),
            }),
            CharsetSpec::Unsupported(_) => Err(FootnotesError::Configuration(
                "charset option. Must be a sequence or a string".to_string(),
            )),
        }
    }

    /// Number of symbols, i.e. the numeral base.
    #[must_use]
    pub fn base(&self) -> usize {
        self.symbols.len()
    }

    /// The symbols in numeral order.
    #[must_use]
    pub fn symbols(&self) -> &[String] {
        &self.symbols
    }

    /// Label for the footnote at `index`.
    ///
    /// Uses bijective numeration: no symbol plays the role of zero, so after
    /// the single-symbol labels run out the sequence continues with two
    /// copies of the first symbol (`z` is followed by `aa`, not `ba`).
    ///
    /// # Examples
    /// ```
    /// use footnotes::charset::Charset;
    ///
    /// let charset = Charset::new(["a", "b"]);
    /// let labels: Vec<_> = (0..7).map(|i| charset.identifier(i)).collect();
    /// assert_eq!(labels, ["a", "b", "aa", "ab", "ba", "bb", "aaa"]);
    /// ```
    #[must_use]
    pub fn identifier(&self, index: usize) -> String {
        let base = self.base();
        if index < base {
            return self.symbols[index].clone();
        }

        // Every digit after the last one is offset by one, so there is no zero.
        let mut remaining = index;
        let mut digits: Vec<&str> = Vec::new();
        loop {
            digits.push(&self.symbols[remaining % base]);
            remaining /= base;
            if remaining == 0 {
                break;
            }
            remaining -= 1;
        }
        digits.reverse();
        digits.concat()
    }
}

impl Default for Charset {
    fn default() -> Self {
        Self::named(NamedCharset::Alpha)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_registry_sizes() {
        assert_eq!(NamedCharset::Numeric.symbols().len(), 10);
        assert_eq!(NamedCharset::Alpha.symbols().len(), 26);
        assert_eq!(NamedCharset::Alphanumeric.symbols().len(), 36);
        assert_eq!(NamedCharset::Qwerty.symbols().len(), 26);
        assert_eq!(NamedCharset::Greek.symbols().len(), 24);
        assert_eq!(NamedCharset::Special.symbols().len(), 16);
    }

    #[test]
    fn test_from_name_round_trip() {
        for charset in NamedCharset::ALL {
            assert_eq!(NamedCharset::from_name(charset.name()), Some(charset));
        }
        assert_eq!(NamedCharset::from_name("ALPHA"), None);
        assert_eq!(NamedCharset::from_name("roman"), None);
    }

    #[test]
    fn test_identifier_single_symbols() {
        let charset = Charset::default();
        assert_eq!(charset.identifier(0), "a");
        assert_eq!(charset.identifier(25), "z");
    }

    #[test]
    fn test_identifier_rollover_is_bijective() {
        let charset = Charset::default();
        assert_eq!(charset.identifier(26), "aa");
        assert_eq!(charset.identifier(27), "ab");
        assert_eq!(charset.identifier(51), "az");
        assert_eq!(charset.identifier(52), "ba");
        assert_eq!(charset.identifier(701), "zz");
        assert_eq!(charset.identifier(702), "aaa");
    }

    #[test]
    fn test_identifier_base_is_first_symbol_twice() {
        for named in NamedCharset::ALL {
            let charset = Charset::named(named);
            let first = &charset.symbols()[0];
            assert_eq!(&charset.identifier(0), first);
            assert_eq!(charset.identifier(charset.base()), format!("{first}{first}"));
        }
    }

    #[test]
    fn test_identifier_binary_sequence() {
        let charset = Charset::new(["a", "b"]);
        let labels: Vec<String> = (0..5).map(|i| charset.identifier(i)).collect();
        assert_eq!(labels, ["a", "b", "aa", "ab", "ba"]);
    }

    #[test]
    fn test_identifier_multichar_symbols() {
        let charset = Charset::new(["*", "**"]);
        assert_eq!(charset.identifier(2), "**");
        assert_eq!(charset.identifier(3), "***");
    }

    #[test]
    fn test_identifier_labels_are_unique() {
        let charset = Charset::new(["x", "y", "z"]);
        let labels: std::collections::HashSet<String> =
            (0..500).map(|i| charset.identifier(i)).collect();
        assert_eq!(labels.len(), 500);
    }

    #[test]
    fn test_identifier_largest_index() {
        let binary = Charset::new(["a", "b"]);
        let expected = format!("{}b", "a".repeat(usize::BITS as usize - 1));
        assert_eq!(binary.identifier(usize::MAX), expected);
        assert_eq!(binary.identifier(usize::MAX - 1), "a".repeat(usize::BITS as usize));

        let alpha = Charset::default();
        assert!(!alpha.identifier(usize::MAX).is_empty());
    }

    #[test]
    fn test_small_charset_falls_back_to_alpha() {
        assert_eq!(Charset::new(Vec::<String>::new()), Charset::default());
        assert_eq!(Charset::new(["x"]), Charset::default());
        assert_eq!(Charset::new(["x"]).identifier(26), "aa");
    }

    #[test]
    fn test_resolve_named() {
        let charset = Charset::resolve(&CharsetSpec::from(NamedCharset::Greek)).unwrap();
        assert_eq!(charset.identifier(0), "α");
        assert_eq!(charset.base(), 24);
    }

    #[test]
    fn test_resolve_unknown_name_splits_characters() {
        let charset = Charset::resolve(&CharsetSpec::from("xyz")).unwrap();
        assert_eq!(charset.symbols(), ["x", "y", "z"]);
    }

    #[test]
    fn test_resolve_name_is_case_sensitive() {
        let charset = Charset::resolve(&CharsetSpec::from("Numeric")).unwrap();
        assert_eq!(charset.base(), 7);
        assert_eq!(charset.identifier(0), "N");
    }

    #[test]
    fn test_resolve_empty_string_falls_back() {
        let charset = Charset::resolve(&CharsetSpec::from("")).unwrap();
        assert_eq!(charset, Charset::default());
    }

    #[test]
    fn test_resolve_unsupported() {
        let err = Charset::resolve(&CharsetSpec::Unsupported(IgnoredAny)).unwrap_err();
        assert!(matches!(err, FootnotesError::Configuration(_)));
    }

    #[test]
    fn test_deserialize_shapes() {
        let symbols: CharsetSpec = serde_json::from_str(r#"["i", "ii"]"#).unwrap();
        assert!(matches!(symbols, CharsetSpec::Symbols(ref s) if s.len() == 2));

        let name: CharsetSpec = serde_json::from_str(r#""special""#).unwrap();
        assert!(matches!(name, CharsetSpec::Name(ref n) if n == "special"));

        let number: CharsetSpec = serde_json::from_str("42").unwrap();
        assert!(matches!(number, CharsetSpec::Unsupported(_)));

        let object: CharsetSpec = serde_json::from_str(r#"{"a": 1}"#).unwrap();
        assert!(matches!(object, CharsetSpec::Unsupported(_)));
    }
}
