//! Caller-facing options for the annotator.
//!
//! Options can be built in code or loaded from a YAML or JSON file:
//!
//! ```yaml
//! charset: greek
//! format: "<sup>{id}</sup>"
//! footnote_container: references
//! ```

use std::fmt::Debug;
use std::fs;
use std::path::Path;

use serde::Deserialize;

use crate::charset::{Charset, CharsetSpec};
use crate::config::DEFAULT_FORMAT;
use crate::dom::{DocumentTree, NodeId};
use crate::error::{FootnotesError, Result};

/// Reference to an element: its `id` attribute, or a node handle.
///
/// Deserializes from a string, which is taken as an element id.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(from = "String", bound = "")]
pub enum ElementRef<N = NodeId> {
    /// Element with this `id` attribute.
    Id(String),
    /// A node handle of the tree.
    Node(N),
}

impl<N> ElementRef<N> {
    /// Reference an element by id.
    pub fn id(id: impl Into<String>) -> Self {
        Self::Id(id.into())
    }
}

impl<N: Copy + Eq + Debug> ElementRef<N> {
    /// Resolve the reference against a tree.
    ///
    /// Returns `None` if no element has the id, or if the handle does not
    /// point at an element.
    pub fn resolve<D>(&self, doc: &D) -> Option<N>
    where
        D: DocumentTree<Node = N>,
    {
        match self {
            Self::Id(id) => doc.element_by_id(id),
            Self::Node(node) => doc.is_element(*node).then_some(*node),
        }
    }

    /// Human-readable form for error messages.
    #[must_use]
    pub fn describe(&self) -> String {
        match self {
            Self::Id(id) => format!("#{id}"),
            Self::Node(node) => format!("{node:?}"),
        }
    }
}

impl<N> From<String> for ElementRef<N> {
    fn from(id: String) -> Self {
        Self::Id(id)
    }
}

impl<N> From<&str> for ElementRef<N> {
    fn from(id: &str) -> Self {
        Self::Id(id.to_string())
    }
}

/// Annotator options.
///
/// Every field has a default; an empty options file is valid.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, bound = "")]
pub struct Options<N = NodeId> {
    /// Numeral alphabet for identifiers. Defaults to `alpha`.
    pub charset: Option<CharsetSpec>,

    /// Marker label template with `{id}` and `{url}` placeholders.
    pub format: String,

    /// Existing list to hold the footnotes. When absent or not found, a
    /// list is created at the end of the target.
    #[serde(alias = "footnoteContainer")]
    pub footnote_container: Option<ElementRef<N>>,

    /// Reserved. Back-reference links are not generated.
    pub backreferences: bool,
}

impl<N> Default for Options<N> {
    fn default() -> Self {
        Self {
            charset: None,
            format: DEFAULT_FORMAT.to_string(),
            footnote_container: None,
            backreferences: false,
        }
    }
}

impl<N> Options<N> {
    /// Options with every field at its default.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the charset.
    #[must_use]
    pub fn with_charset(mut self, charset: impl Into<CharsetSpec>) -> Self {
        self.charset = Some(charset.into());
        self
    }

    /// Set the label template.
    #[must_use]
    pub fn with_format(mut self, format: impl Into<String>) -> Self {
        self.format = format.into();
        self
    }

    /// Use an existing element as footnote list.
    #[must_use]
    pub fn with_container(mut self, container: ElementRef<N>) -> Self {
        self.footnote_container = Some(container);
        self
    }

    /// Set the reserved back-reference flag.
    #[must_use]
    pub fn with_backreferences(mut self, enabled: bool) -> Self {
        self.backreferences = enabled;
        self
    }

    /// Resolve the configured charset.
    ///
    /// # Errors
    /// Returns [`FootnotesError::Configuration`] if the charset option is
    /// neither a sequence nor a string.
    pub fn resolve_charset(&self) -> Result<Charset> {
        match &self.charset {
            Some(spec) => Charset::resolve(spec),
            None => Ok(Charset::default()),
        }
    }

    /// Parse options from YAML.
    ///
    /// # Errors
    /// Returns [`FootnotesError::Yaml`] if the document does not describe
    /// options.
    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        Ok(serde_yaml_ng::from_str(yaml)?)
    }

    /// Parse options from JSON.
    ///
    /// # Errors
    /// Returns [`FootnotesError::Json`] if the document does not describe
    /// options.
    pub fn from_json_str(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Load options from a `.yaml`, `.yml` or `.json` file.
    ///
    /// # Errors
    /// Returns an error if the extension is unknown, the file cannot be
    /// read, or its content does not describe options.
    pub fn from_file(path: &Path) -> Result<Self> {
        let extension = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(str::to_ascii_lowercase)
            .unwrap_or_default();

        match extension.as_str() {
            "yaml" | "yml" => Self::from_yaml_str(&fs::read_to_string(path)?),
            "json" => Self::from_json_str(&fs::read_to_string(path)?),
            _ => Err(FootnotesError::UnsupportedOptionsFormat(
                path.display().to_string(),
            )),
        }
    }
}
