//! Error types for the footnote annotator.
//!
//! Only construction and input loading can fail. Everything that happens
//! while scanning a tree (missing attributes, odd structure, labels that are
//! not valid markup) falls back silently and is logged instead.

use thiserror::Error;

/// Main error type for the footnotes library.
#[derive(Debug, Error)]
pub enum FootnotesError {
    /// The element reference given as scan target resolved to nothing.
    #[error("Target element not found: {0}")]
    TargetNotFound(String),

    /// An option has a value of the wrong shape.
    #[error("Incorrect usage of the {0}")]
    Configuration(String),

    /// Markup could not be parsed into a document tree.
    #[error("Markup parsing failed: {0}")]
    MarkupParse(#[from] roxmltree::Error),

    /// Options file has an extension we do not know how to read.
    #[error("Unsupported options file format: '{0}'. Expected .yaml, .yml or .json")]
    UnsupportedOptionsFormat(String),

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// YAML deserialization error.
    #[error("YAML options invalid: {0}")]
    Yaml(#[from] serde_yaml_ng::Error),

    /// JSON deserialization error.
    #[error("JSON options invalid: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type alias for footnotes operations.
pub type Result<T> = std::result::Result<T, FootnotesError>;
