//! Node classification predicates.
//!
//! Pure functions over a single node (and, for empty transclusion markers,
//! its next sibling) that separate real discussion content from rendering
//! artifacts, template bookkeeping and markup we inserted ourselves.

use crate::dom::{self, NodeKind, NodeRef};
use crate::patterns::SOL_TRANSPARENT_LINK;

/// Block-level elements.
pub const BLOCK_ELEMENT_TYPES: &[&str] = &[
    "div", "p",
    // Tables
    "table", "tbody", "thead", "tfoot", "caption", "th", "tr", "td",
    // Lists
    "ul", "ol", "li", "dl", "dt", "dd",
    // HTML5 heading content
    "h1", "h2", "h3", "h4", "h5", "h6", "hgroup",
    // HTML5 sectioning content
    "article", "aside", "body", "nav", "section", "footer", "header", "figure",
    "figcaption", "fieldset", "details", "blockquote",
    // Other
    "hr", "button", "canvas", "center", "col", "colgroup", "embed",
    "map", "object", "pre", "progress", "video",
];

/// Void elements: no children at all, no end tag.
pub const VOID_ELEMENTS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input",
    "link", "meta", "param", "source", "track", "wbr",
];

/// Raw text elements: content is never parsed as markup or escaped.
pub const RAW_TEXT_ELEMENTS: &[&str] = &["script", "style"];

const ESCAPABLE_RAW_TEXT_ELEMENTS: &[&str] = &["textarea", "title"];

/// Class marking reply tool buttons inserted into the page.
const REPLY_BUTTONS_CLASS: &str = "ext-discussiontools-init-replylink-buttons";

/// Attributes marking comment wrappers and boundary markers inserted into the page.
const GENERATED_MARKER_ATTRS: &[&str] = &[
    "data-mw-comment",
    "data-mw-comment-start",
    "data-mw-comment-end",
];

/// Class of the `{{outdent}}` template.
const OUTDENT_CLASS: &str = "outdent-template";

/// True iff `node` is an element with a block-level tag.
#[must_use]
pub fn is_block_element(node: &NodeRef) -> bool {
    dom::tag_name(node).is_some_and(|tag| BLOCK_ELEMENT_TYPES.contains(&tag.as_str()))
}

/// True if `node` produces no rendering of its own.
///
/// Covers comments, `<meta>`, page-property `<link>`s (categories, redirects,
/// language links) and empty inline transclusions such as tracking templates.
/// An empty transclusion `<span>` followed by an element of the same about
/// group is the start of a larger template output, not a standalone marker.
#[must_use]
pub fn is_rendering_transparent_node(node: &NodeRef) -> bool {
    match dom::node_kind(node) {
        NodeKind::Comment => true,
        NodeKind::Element => {
            let Some(tag) = dom::tag_name(node) else {
                return false;
            };
            match tag.as_str() {
                "meta" => true,
                "link" => dom::attr(node, "rel")
                    .is_some_and(|rel| SOL_TRANSPARENT_LINK.is_match(&rel)),
                "span" => {
                    dom::has_typeof(node, "mw:Transclusion")
                        && is_blank_element(node)
                        && !continues_about_group(node)
                }
                _ => false,
            }
        }
        NodeKind::Text | NodeKind::Other => false,
    }
}

/// No inner HTML beyond ASCII whitespace.
fn is_blank_element(node: &NodeRef) -> bool {
    node.children()
        .iter()
        .all(|child| child.is_text() && dom::html_trim(&child.text()).is_empty())
}

/// The next sibling is an element sharing this node's `about` group.
fn continues_about_group(node: &NodeRef) -> bool {
    let Some(next) = node.next_sibling() else {
        return false;
    };
    next.is_element() && dom::attr(&next, "about") == dom::attr(node, "about")
}

/// True if `node` was added to the page by the discussion tooling itself.
#[must_use]
pub fn is_our_generated_node(node: &NodeRef) -> bool {
    node.is_element()
        && (dom::has_class(node, REPLY_BUTTONS_CLASS)
            || GENERATED_MARKER_ATTRS.iter().any(|name| node.has_attr(name)))
}

/// If true, `node` can't have element children. If false, it's complicated.
#[must_use]
pub fn cant_have_element_children(node: &NodeRef) -> bool {
    match dom::node_kind(node) {
        NodeKind::Comment => true,
        NodeKind::Element => dom::tag_name(node).is_some_and(|tag| {
            let tag = tag.as_str();
            VOID_ELEMENTS.contains(&tag)
                || RAW_TEXT_ELEMENTS.contains(&tag)
                || ESCAPABLE_RAW_TEXT_ELEMENTS.contains(&tag)
                // Treated like text when scripting is enabled in the parser
                || tag == "noscript"
        }),
        NodeKind::Text | NodeKind::Other => false,
    }
}

/// True if `node` separates comments rather than being part of one.
#[must_use]
pub fn is_comment_separator(node: &NodeRef) -> bool {
    if !node.is_element() {
        return false;
    }
    // Empty paragraphs (`<p><br></p>`) between indented comments mess up indentation detection
    dom::is_tag(node, "br") || dom::is_tag(node, "hr") || dom::has_class(node, OUTDENT_CLASS)
}

/// True if `node` counts as comment content. Meant for leaf nodes.
#[must_use]
pub fn is_comment_content(node: &NodeRef) -> bool {
    (node.is_text() && !dom::html_trim(&node.text()).is_empty()) || cant_have_element_children(node)
}
