//! DOM Operations Adapter
//!
//! Thin layer over `dom_query` node handles. Everything above this module
//! talks about nodes through these functions, so the tree implementation
//! stays in one place.
//!
//! `NodeRef` is a `Copy` handle (node id + tree reference); node identity is
//! id equality, never structural equality.

use std::cmp::Ordering;

pub use dom_query::{Document, NodeId, NodeRef, Selection};
pub use tendril::StrTendril;

/// Closed set of node variants the heuristics distinguish.
///
/// CDATA sections never survive HTML parsing (they become text), so they
/// share the `Text` variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeKind {
    Element,
    Text,
    Comment,
    /// Document, doctype and anything else without content of its own.
    Other,
}

/// Classify a node.
#[must_use]
pub fn node_kind(node: &NodeRef) -> NodeKind {
    if node.is_element() {
        NodeKind::Element
    } else if node.is_text() {
        NodeKind::Text
    } else if node.is_comment() {
        NodeKind::Comment
    } else {
        NodeKind::Other
    }
}

// === Parsing ===

/// Parse an HTML string into a document.
#[inline]
#[must_use]
pub fn parse(html: &str) -> Document {
    Document::from(html)
}

/// The document's `<body>` element, if present.
#[must_use]
pub fn body(doc: &Document) -> Option<NodeRef<'_>> {
    doc.select("body").nodes().first().copied()
}

// === Tag/Attribute Information ===

/// Lowercased tag name of an element; `None` for other node kinds.
#[must_use]
pub fn tag_name(node: &NodeRef) -> Option<String> {
    if !node.is_element() {
        return None;
    }
    node.node_name().map(|t| t.to_ascii_lowercase())
}

/// True if `node` is an element whose tag is `tag` (case-insensitive).
#[must_use]
pub fn is_tag(node: &NodeRef, tag: &str) -> bool {
    node.is_element()
        && node
            .node_name()
            .is_some_and(|name| name.eq_ignore_ascii_case(tag))
}

/// Attribute value of an element.
#[inline]
#[must_use]
pub fn attr(node: &NodeRef, name: &str) -> Option<StrTendril> {
    if node.is_element() {
        node.attr(name)
    } else {
        None
    }
}

/// True if the whitespace-separated `class` list contains `class`.
#[must_use]
pub fn has_class(node: &NodeRef, class: &str) -> bool {
    attr(node, "class").is_some_and(|list| list.split_ascii_whitespace().any(|c| c == class))
}

/// True if the whitespace-separated `typeof` list contains `token`.
#[must_use]
pub fn has_typeof(node: &NodeRef, token: &str) -> bool {
    attr(node, "typeof").is_some_and(|list| list.split(' ').any(|t| t == token))
}

/// All attributes of an element as owned name/value pairs, in source order.
#[must_use]
pub fn attributes(node: &NodeRef) -> Vec<(String, String)> {
    node.attrs()
        .iter()
        .map(|a| (a.name.local.to_string(), a.value.to_string()))
        .collect()
}

// === Node Content ===

/// Text of a text node (or all descendant text of an element).
#[inline]
#[must_use]
pub fn text(node: &NodeRef) -> StrTendril {
    node.text()
}

/// Data of a comment node, without the `<!--`/`-->` delimiters.
#[must_use]
pub fn comment_data(node: &NodeRef) -> String {
    let html = Selection::from(*node).html();
    html.strip_prefix("<!--")
        .and_then(|rest| rest.strip_suffix("-->"))
        .unwrap_or_default()
        .to_string()
}

/// Trim ASCII whitespace as the HTML standard defines it.
#[inline]
#[must_use]
pub fn html_trim(s: &str) -> &str {
    s.trim_matches(|c| matches!(c, '\t' | '\n' | '\x0C' | '\r' | ' '))
}

/// Length of a node for range offsets: child count for containers,
/// character count for text and comments.
#[must_use]
pub fn node_length(node: &NodeRef) -> usize {
    match node_kind(node) {
        NodeKind::Text => node.text().chars().count(),
        NodeKind::Comment => comment_data(node).chars().count(),
        NodeKind::Element | NodeKind::Other => node.children().len(),
    }
}

// === Tree Navigation ===

/// Node identity.
#[inline]
#[must_use]
pub fn same_node(a: &NodeRef, b: &NodeRef) -> bool {
    a.id == b.id
}

/// Index of `child` among its parent's children.
#[must_use]
pub fn child_index_of(child: &NodeRef) -> usize {
    let mut index = 0;
    let mut current = child.prev_sibling();
    while let Some(prev) = current {
        index += 1;
        current = prev.prev_sibling();
    }
    index
}

/// Child of `node` at `index`.
#[must_use]
pub fn child_at<'a>(node: &NodeRef<'a>, index: usize) -> Option<NodeRef<'a>> {
    node.children().get(index).copied()
}

/// True if `ancestor` is `descendant` or one of its ancestors.
#[must_use]
pub fn contains(ancestor: &NodeRef, descendant: &NodeRef) -> bool {
    let mut current = Some(*descendant);
    while let Some(node) = current {
        if same_node(&node, ancestor) {
            return true;
        }
        current = node.parent();
    }
    false
}

/// Closest ancestor-or-self element whose tag is one of `tag_names`.
#[must_use]
pub fn closest_element<'a>(node: &NodeRef<'a>, tag_names: &[&str]) -> Option<NodeRef<'a>> {
    let mut current = Some(*node);
    while let Some(n) = current {
        if let Some(tag) = tag_name(&n) {
            if tag_names.contains(&tag.as_str()) {
                return Some(n);
            }
        }
        current = n.parent();
    }
    None
}

/// Child-index path from the tree root down to `node`.
fn tree_path(node: &NodeRef) -> Vec<usize> {
    let mut path = Vec::new();
    let mut current = *node;
    while let Some(parent) = current.parent() {
        path.push(child_index_of(&current));
        current = parent;
    }
    path.reverse();
    path
}

/// Compare two nodes in tree order. An ancestor orders before its descendants.
#[must_use]
pub fn compare_document_position(a: &NodeRef, b: &NodeRef) -> Ordering {
    if same_node(a, b) {
        return Ordering::Equal;
    }
    tree_path(a).cmp(&tree_path(b))
}

// === Discussion Structure Helpers ===

/// Indent level of `node` relative to `root`: the number of list items
/// (`li`, `dd`) it is nested in, counting `node` itself.
#[must_use]
pub fn get_indent_level(node: &NodeRef, root: &NodeRef) -> usize {
    let mut indent = 0;
    let mut current = Some(*node);
    while let Some(n) = current {
        if same_node(&n, root) {
            break;
        }
        if is_tag(&n, "li") || is_tag(&n, "dd") {
            indent += 1;
        }
        current = n.parent();
    }
    indent
}

/// Given a heading element (`h1`-`h6`), find the node carrying its id
/// attribute and the offset at which the heading text starts inside it.
///
/// Handles both markup variants: the id set on the heading itself, and the
/// legacy `<span class="mw-headline" id="...">` child. A leading
/// `.mw-headline-number` span (auto-numbered headings) shifts the offset by one.
#[must_use]
pub fn get_headline_node_and_offset<'a>(heading: &NodeRef<'a>) -> (NodeRef<'a>, usize) {
    let mut headline = *heading;
    let mut offset = 0;

    if headline.has_attr("data-mw-comment-start") {
        if let Some(parent) = headline.parent() {
            headline = parent;
        }
    }

    if attr(&headline, "id").is_none_or(|id| id.is_empty()) {
        let legacy = headline
            .children()
            .into_iter()
            .find(|child| has_class(child, "mw-headline"));
        match legacy {
            Some(span) => {
                if span
                    .first_child()
                    .is_some_and(|first| has_class(&first, "mw-headline-number"))
                {
                    offset = 1;
                }
                headline = span;
            }
            None => headline = *heading,
        }
    }

    (headline, offset)
}
