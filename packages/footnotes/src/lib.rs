//! Footnotes - turn the links and citations in a document into footnotes.
//!
//! Every element with a `cite` or `href` attribute inside a target element
//! gets a reference marker, and every distinct URL gets one entry in a
//! footnote list. Identifiers are drawn from a configurable symbol alphabet.
//!
//! # Example
//!
//! ```
//! use footnotes::{annotate, Document, ElementRef, NamedCharset, Options};
//!
//! let mut doc = Document::parse(concat!(
//!     r#"<article id="post">"#,
//!     r#"<p>Read <a href="https://a.example">this</a> and <a href="https://a.example">that</a>.</p>"#,
//!     r#"</article>"#,
//! ))
//! .unwrap();
//!
//! let options = Options::new()
//!     .with_charset(NamedCharset::Numeric)
//!     .with_format("[{id}]");
//! let footnotes = annotate(&mut doc, ElementRef::id("post"), options).unwrap();
//!
//! assert_eq!(footnotes.entries(&doc).len(), 1);
//! assert!(doc.to_markup().contains(r#"<span class="footnoteReference">[0]</span>"#));
//! ```
//!
//! # Architecture
//!
//! - [`config`]: Class names, tag sets and label templating
//! - [`charset`]: Predefined charsets and identifier generation
//! - [`options`]: Annotator options and loading them from files
//! - [`dom`]: The tree interface and an in-crate document implementation
//! - [`annotator`]: The annotator itself
//! - [`error`]: Error types and Result alias

pub mod annotator;
pub mod charset;
pub mod config;
pub mod dom;
pub mod error;
pub mod options;

// Re-export commonly used items
pub use annotator::{annotate, CitationMarker, FootnoteEntry, Footnotes};
pub use charset::{Charset, CharsetSpec, NamedCharset};
pub use dom::{Document, DocumentPosition, DocumentTree, NodeId};
pub use error::{FootnotesError, Result};
pub use options::{ElementRef, Options};
