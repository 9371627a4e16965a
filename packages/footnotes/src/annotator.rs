//! The footnote annotator.
//!
//! [`Footnotes`] scans a target element for citations (elements with a
//! `cite` or `href` attribute), keeps one footnote entry per distinct URL in
//! a list, and puts a reference marker next to every citation.

use std::fmt::Debug;

use crate::charset::Charset;
use crate::config::{
    substitute, tag_in, BLOCKQUOTE_TAG, CITATION_ATTRIBUTES, CONTAINER_CLASS, CONTAINER_TAG,
    ENTRY_CLASS, ENTRY_TAG, IDENTIFIER_CLASS, NOTED_CLASS, PLACEMENT_TAGS, REFERENCE_CLASS, URL_CLASS,
};
use crate::dom::DocumentTree;
use crate::error::{FootnotesError, Result};
use crate::options::{ElementRef, Options};

/// One line of the footnote list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FootnoteEntry {
    /// Position in the list, starting at 0.
    pub index: usize,
    /// The cited URL.
    pub url: String,
}

/// A marker inserted for a citation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CitationMarker<N> {
    /// The citing element. Not owned by the marker.
    pub source: N,
    /// The inserted marker element.
    pub marker: N,
    /// Label the marker was rendered from.
    pub label: String,
    /// Index of the footnote entry the marker refers to.
    pub index: usize,
}

/// Annotates citations in a target element with numbered footnotes.
///
/// The annotator only stores node handles; every operation borrows the tree
/// for the duration of the call.
///
/// # Examples
/// ```
/// use footnotes::{Document, DocumentTree, ElementRef, Footnotes, Options};
///
/// let mut doc = Document::parse(
///     r#"<div id="post"><a href="https://a.example">A</a> and <a href="https://b.example">B</a></div>"#,
/// )
/// .unwrap();
///
/// let footnotes = Footnotes::new(&mut doc, ElementRef::id("post"), Options::new()).unwrap();
/// footnotes.apply(&mut doc);
///
/// assert_eq!(
///     footnotes.footnote_urls(&doc),
///     vec!["https://a.example".to_string(), "https://b.example".to_string()]
/// );
/// ```
#[derive(Debug, Clone)]
pub struct Footnotes<N> {
    target: N,
    container: N,
    charset: Charset,
    format: String,
}

impl<N: Copy + Eq + Debug> Footnotes<N> {
    /// Resolve the target and options, and set up the footnote list.
    ///
    /// Options are validated before the tree is touched, so a failed
    /// construction leaves the tree unchanged.
    ///
    /// # Errors
    /// - [`FootnotesError::TargetNotFound`] if `content` resolves to nothing
    /// - [`FootnotesError::Configuration`] if the charset option has the
    ///   wrong shape
    pub fn new<D>(doc: &mut D, content: ElementRef<N>, options: Options<N>) -> Result<Self>
    where
        D: DocumentTree<Node = N>,
    {
        let target = content
            .resolve(&*doc)
            .ok_or_else(|| FootnotesError::TargetNotFound(content.describe()))?;
        let charset = options.resolve_charset()?;

        if options.backreferences {
            tracing::debug!("backreferences requested but not supported, ignoring");
        }

        let container = match options
            .footnote_container
            .as_ref()
            .and_then(|reference| reference.resolve(&*doc))
        {
            Some(existing) => existing,
            None => Self::append_footnote_container(doc, target),
        };
        doc.add_class(container, CONTAINER_CLASS);

        tracing::debug!(
            ?target,
            ?container,
            base = charset.base(),
            format = %options.format,
            "footnote annotator ready"
        );

        Ok(Self {
            target,
            container,
            charset,
            format: options.format,
        })
    }

    /// The element being scanned.
    #[must_use]
    pub fn target(&self) -> N {
        self.target
    }

    /// The footnote list element.
    #[must_use]
    pub fn container(&self) -> N {
        self.container
    }

    /// The resolved charset.
    #[must_use]
    pub fn charset(&self) -> &Charset {
        &self.charset
    }

    /// The marker label template.
    #[must_use]
    pub fn format(&self) -> &str {
        &self.format
    }

    /// Annotate every citation under the target that has no marker yet.
    ///
    /// Citations are processed in document order, so footnote numbers follow
    /// the tree regardless of how the tree was built. Calling this again on
    /// an unchanged tree adds nothing.
    pub fn apply<D>(&self, doc: &mut D) -> &Self
    where
        D: DocumentTree<Node = N>,
    {
        let mut citations = doc.elements_with_attributes(self.target, &CITATION_ATTRIBUTES);
        citations.sort_by(|a, b| doc.compare_document_position(*a, *b).document_order());

        tracing::debug!(count = citations.len(), "scanning citations");
        for element in citations {
            self.attempt(doc, element);
        }
        self
    }

    /// Remove every footnote and marker and reset the `noted` flags.
    pub fn clear<D>(&self, doc: &mut D) -> &Self
    where
        D: DocumentTree<Node = N>,
    {
        doc.empty(self.container);

        let markers = doc.elements_with_class(self.target, REFERENCE_CLASS);
        for marker in &markers {
            doc.remove(*marker);
        }

        let noted = doc.elements_with_class(self.target, NOTED_CLASS);
        for element in &noted {
            doc.remove_class(*element, NOTED_CLASS);
        }

        tracing::debug!(
            markers = markers.len(),
            noted = noted.len(),
            "cleared footnotes"
        );
        self
    }

    /// Annotate a single element if it is an unannotated citation.
    ///
    /// Returns the marker when one was inserted.
    pub fn attempt<D>(&self, doc: &mut D, element: N) -> Option<CitationMarker<N>>
    where
        D: DocumentTree<Node = N>,
    {
        if doc.has_class(element, NOTED_CLASS) {
            tracing::trace!(?element, "already noted");
            return None;
        }
        if self.is_generated(&*doc, element) {
            tracing::trace!(?element, "inside generated footnote markup");
            return None;
        }

        let url = CITATION_ATTRIBUTES
            .iter()
            .find_map(|name| doc.attribute(element, name))
            .map(str::to_string);
        let Some(url) = url else {
            tracing::trace!(?element, "no citation attribute");
            return None;
        };

        Some(self.cite(doc, element, &url))
    }

    /// Cite `url` from `element`: register the URL and insert a marker.
    ///
    /// A URL seen before reuses its footnote entry.
    pub fn cite<D>(&self, doc: &mut D, element: N, url: &str) -> CitationMarker<N>
    where
        D: DocumentTree<Node = N>,
    {
        let index = match self.footnote_urls(&*doc).iter().position(|known| known == url) {
            Some(index) => index,
            None => {
                self.append_footnote(doc, url);
                let urls = self.footnote_urls(&*doc);
                urls.iter()
                    .rposition(|known| known == url)
                    .unwrap_or(urls.len().saturating_sub(1))
            }
        };

        let id = self.identifier(index);
        let label = substitute(&self.format, |name| match name {
            "id" => Some(html_escape::encode_double_quoted_attribute(&id).into_owned()),
            "url" => Some(html_escape::encode_double_quoted_attribute(url).into_owned()),
            _ => None,
        });

        let marker = doc.create_element("span", &[("class", REFERENCE_CLASS)]);
        doc.append_markup(marker, &label);

        let is_blockquote = doc
            .tag_name(element)
            .is_some_and(|tag| tag.eq_ignore_ascii_case(BLOCKQUOTE_TAG));
        if is_blockquote {
            let host = Self::placement_target(&*doc, element);
            doc.append_child(host, marker);
        } else {
            doc.insert_after(element, marker);
        }
        doc.add_class(element, NOTED_CLASS);

        tracing::debug!(?element, url, id = %id, index, "cited");

        CitationMarker {
            source: element,
            marker,
            label,
            index,
        }
    }

    /// URLs currently listed in the footnote container, in list order.
    ///
    /// Always read from the container itself, so entries added or removed by
    /// someone else are taken into account.
    #[must_use]
    pub fn footnote_urls<D>(&self, doc: &D) -> Vec<String>
    where
        D: DocumentTree<Node = N>,
    {
        let url_nodes = doc.elements_with_class(self.container, URL_CLASS);
        doc.texts(&url_nodes)
    }

    /// The footnote list as entries.
    #[must_use]
    pub fn entries<D>(&self, doc: &D) -> Vec<FootnoteEntry>
    where
        D: DocumentTree<Node = N>,
    {
        self.footnote_urls(doc)
            .into_iter()
            .enumerate()
            .map(|(index, url)| FootnoteEntry { index, url })
            .collect()
    }

    /// Identifier for the footnote at `index`.
    #[must_use]
    pub fn identifier(&self, index: usize) -> String {
        self.charset.identifier(index)
    }

    fn append_footnote_container<D>(doc: &mut D, parent: N) -> N
    where
        D: DocumentTree<Node = N>,
    {
        let list = doc.create_element(CONTAINER_TAG, &[("class", CONTAINER_CLASS)]);
        doc.append_child(parent, list);
        list
    }

    fn append_footnote<D>(&self, doc: &mut D, url: &str) -> N
    where
        D: DocumentTree<Node = N>,
    {
        let index = doc.element_child_count(self.container);

        let item = doc.create_element(ENTRY_TAG, &[("class", ENTRY_CLASS)]);
        let identifier = doc.create_element("span", &[("class", IDENTIFIER_CLASS)]);
        doc.append_text(identifier, &self.identifier(index));
        let url_span = doc.create_element("span", &[("class", URL_CLASS)]);
        doc.append_text(url_span, url);

        doc.append_child(item, identifier);
        doc.append_child(item, url_span);
        doc.append_child(self.container, item);
        item
    }

    /// Where a marker for a block quotation goes: the first `p`, `li` or `dd`
    /// found by following last children down, else the quotation itself.
    fn placement_target<D>(doc: &D, blockquote: N) -> N
    where
        D: DocumentTree<Node = N>,
    {
        let mut current = doc.last_element_child(blockquote);
        while let Some(child) = current {
            if doc.tag_name(child).is_some_and(|tag| tag_in(tag, &PLACEMENT_TAGS)) {
                return child;
            }
            current = doc.last_element_child(child);
        }
        blockquote
    }

    /// Elements inside a marker or a footnote entry are our own output.
    /// Anything else in the footnote list is ordinary content.
    fn is_generated<D>(&self, doc: &D, element: N) -> bool
    where
        D: DocumentTree<Node = N>,
    {
        let mut current = Some(element);
        while let Some(node) = current {
            if node == self.target {
                break;
            }
            if doc.has_class(node, REFERENCE_CLASS) || Self::is_entry(doc, node) {
                return true;
            }
            current = doc.parent_element(node);
        }
        false
    }

    fn is_entry<D>(doc: &D, node: N) -> bool
    where
        D: DocumentTree<Node = N>,
    {
        doc.has_class(node, ENTRY_CLASS)
            && doc
                .tag_name(node)
                .is_some_and(|tag| tag.eq_ignore_ascii_case(ENTRY_TAG))
    }
}

/// Build an annotator and run it once.
///
/// # Errors
/// Same as [`Footnotes::new`].
///
/// # Examples
/// ```
/// use footnotes::{annotate, Document, ElementRef, Options};
///
/// let mut doc = Document::parse(r#"<p id="p"><a href="https://x.example">x</a></p>"#).unwrap();
/// let options = Options::new().with_format("[{id}]");
/// annotate(&mut doc, ElementRef::id("p"), options).unwrap();
///
/// assert!(doc.to_markup().contains(r#"<span class="footnoteReference">[a]</span>"#));
/// ```
pub fn annotate<D>(
    doc: &mut D,
    content: ElementRef<D::Node>,
    options: Options<D::Node>,
) -> Result<Footnotes<D::Node>>
where
    D: DocumentTree,
{
    let footnotes = Footnotes::new(doc, content, options)?;
    footnotes.apply(doc);
    Ok(footnotes)
}
