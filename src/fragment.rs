//! Owned copies of range content.
//!
//! `Range::clone_contents` produces a `Fragment` detached from the document,
//! so thread item content can be cleaned up and serialized without touching
//! the parsed tree.

use crate::classifier::{BLOCK_ELEMENT_TYPES, RAW_TEXT_ELEMENTS, VOID_ELEMENTS};
use crate::dom::{self, NodeKind, NodeRef};

/// A detached node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FragmentNode {
    Element {
        tag: String,
        attrs: Vec<(String, String)>,
        children: Vec<FragmentNode>,
    },
    Text(String),
    Comment(String),
}

impl FragmentNode {
    /// Deep copy of `node` and its subtree.
    #[must_use]
    pub fn deep_clone(node: &NodeRef) -> Self {
        match dom::node_kind(node) {
            NodeKind::Element => Self::Element {
                tag: dom::tag_name(node).unwrap_or_default(),
                attrs: dom::attributes(node),
                children: node.children().iter().map(Self::deep_clone).collect(),
            },
            NodeKind::Text => Self::Text(dom::text(node).to_string()),
            NodeKind::Comment => Self::Comment(dom::comment_data(node)),
            NodeKind::Other => Self::Text(String::new()),
        }
    }

    fn element(tag: &str, children: Vec<FragmentNode>) -> Self {
        Self::Element {
            tag: tag.to_string(),
            attrs: Vec::new(),
            children,
        }
    }

    /// Tag name if this is an element.
    #[must_use]
    pub fn tag(&self) -> Option<&str> {
        match self {
            Self::Element { tag, .. } => Some(tag),
            Self::Text(_) | Self::Comment(_) => None,
        }
    }

    fn is_blank_text(&self) -> bool {
        matches!(self, Self::Text(text) if dom::html_trim(text).is_empty())
    }

    fn is_block(&self) -> bool {
        self.tag().is_some_and(|tag| BLOCK_ELEMENT_TYPES.contains(&tag))
    }

    fn push_text(&self, out: &mut String) {
        match self {
            Self::Text(text) => out.push_str(text),
            Self::Element { children, .. } => {
                for child in children {
                    child.push_text(out);
                }
            }
            Self::Comment(_) => {}
        }
    }

    fn push_html(&self, out: &mut String, raw_text: bool) {
        match self {
            Self::Text(text) if raw_text => out.push_str(text),
            Self::Text(text) => escape_text(text, out),
            Self::Comment(data) => {
                out.push_str("<!--");
                out.push_str(data);
                out.push_str("-->");
            }
            Self::Element {
                tag,
                attrs,
                children,
            } => {
                out.push('<');
                out.push_str(tag);
                for (name, value) in attrs {
                    out.push(' ');
                    out.push_str(name);
                    out.push_str("=\"");
                    escape_attr(value, out);
                    out.push('"');
                }
                out.push('>');
                if VOID_ELEMENTS.contains(&tag.as_str()) {
                    return;
                }
                let raw = RAW_TEXT_ELEMENTS.contains(&tag.as_str());
                for child in children {
                    child.push_html(out, raw);
                }
                out.push_str("</");
                out.push_str(tag);
                out.push('>');
            }
        }
    }
}

fn escape_text(input: &str, out: &mut String) {
    for ch in input.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '\u{a0}' => out.push_str("&nbsp;"),
            _ => out.push(ch),
        }
    }
}

fn escape_attr(input: &str, out: &mut String) {
    for ch in input.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '"' => out.push_str("&quot;"),
            '\u{a0}' => out.push_str("&nbsp;"),
            _ => out.push(ch),
        }
    }
}

/// An ordered list of detached nodes.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Fragment {
    children: Vec<FragmentNode>,
}

impl Fragment {
    #[must_use]
    pub fn new(children: Vec<FragmentNode>) -> Self {
        Self { children }
    }

    #[must_use]
    pub fn children(&self) -> &[FragmentNode] {
        &self.children
    }

    /// Concatenated text content. Comments contribute nothing.
    #[must_use]
    pub fn text(&self) -> String {
        let mut out = String::new();
        for child in &self.children {
            child.push_text(&mut out);
        }
        out
    }

    /// Serialize the fragment's nodes as HTML.
    #[must_use]
    pub fn to_html(&self) -> String {
        let mut out = String::new();
        for child in &self.children {
            child.push_html(&mut out, false);
        }
        out
    }

    /// Strip list markup that only exists because of the item's indentation.
    ///
    /// Leading list items with no list around them are wrapped first. Then,
    /// while the fragment's only non-blank node is a list, the list is replaced
    /// by the content of its items. Items holding only inline content become
    /// paragraphs.
    pub fn unwrap(&mut self) {
        self.wrap_orphaned_items();

        while let Some(index) = self.single_list_index() {
            let list = self.children.swap_remove(index);
            let FragmentNode::Element { children: items, .. } = list else {
                break;
            };
            self.children = items
                .into_iter()
                .filter(|item| !item.is_blank_text())
                .flat_map(unwrap_item)
                .collect();
        }
    }

    fn wrap_orphaned_items(&mut self) {
        let Some(first) = self.children.iter().find(|node| !node.is_blank_text()) else {
            return;
        };
        let list_tag = match first.tag() {
            Some("li") => "ul",
            Some("dd") => "dl",
            _ => return,
        };

        let run = self
            .children
            .iter()
            .take_while(|node| node.is_blank_text() || matches!(node.tag(), Some("li" | "dd")))
            .count();
        let items: Vec<_> = self.children.drain(..run).collect();
        self.children.insert(0, FragmentNode::element(list_tag, items));
    }

    /// Index of the only non-blank node, if it is a list.
    fn single_list_index(&self) -> Option<usize> {
        let mut found = None;
        for (index, node) in self.children.iter().enumerate() {
            if node.is_blank_text() {
                continue;
            }
            if found.is_some() {
                return None;
            }
            found = Some(index);
        }
        let index = found?;
        matches!(self.children[index].tag(), Some("ul" | "ol" | "dl")).then_some(index)
    }
}

fn unwrap_item(item: FragmentNode) -> Vec<FragmentNode> {
    if !matches!(item.tag(), Some("li" | "dd" | "dt")) {
        return vec![item];
    }
    let FragmentNode::Element { children, .. } = item else {
        return Vec::new();
    };
    if children.iter().all(FragmentNode::is_blank_text) {
        return Vec::new();
    }
    if children.iter().any(FragmentNode::is_block) {
        children
    } else {
        vec![FragmentNode::element("p", children)]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn text(s: &str) -> FragmentNode {
        FragmentNode::Text(s.to_string())
    }

    fn el(tag: &str, children: Vec<FragmentNode>) -> FragmentNode {
        FragmentNode::element(tag, children)
    }

    #[test]
    fn test_to_html_escapes() {
        let fragment = Fragment::new(vec![FragmentNode::Element {
            tag: "a".to_string(),
            attrs: vec![("title".to_string(), "say \"hi\" & go".to_string())],
            children: vec![text("1 < 2 &\u{a0}3")],
        }]);

        assert_eq!(
            fragment.to_html(),
            "<a title=\"say &quot;hi&quot; &amp; go\">1 &lt; 2 &amp;&nbsp;3</a>"
        );
    }

    #[test]
    fn test_void_and_raw_text_elements() {
        let fragment = Fragment::new(vec![
            el("br", vec![]),
            el("style", vec![text("a > b {}")]),
            FragmentNode::Comment(" c ".to_string()),
        ]);

        assert_eq!(fragment.to_html(), "<br><style>a > b {}</style><!-- c -->");
    }

    #[test]
    fn test_text_skips_comments() {
        let fragment = Fragment::new(vec![
            text("Hello "),
            FragmentNode::Comment("hidden".to_string()),
            el("b", vec![text("world")]),
        ]);

        assert_eq!(fragment.text(), "Hello world");
    }

    #[test]
    fn test_unwrap_nested_single_lists() {
        let mut fragment = Fragment::new(vec![el(
            "dl",
            vec![el("dd", vec![el("dl", vec![el("dd", vec![text("Reply")])])])],
        )]);
        fragment.unwrap();

        assert_eq!(fragment.to_html(), "<p>Reply</p>");
    }

    #[test]
    fn test_unwrap_wraps_orphaned_items() {
        let mut fragment = Fragment::new(vec![
            el("li", vec![text("one")]),
            text("\n"),
            el("li", vec![el("p", vec![text("two")])]),
        ]);
        fragment.unwrap();

        assert_eq!(fragment.to_html(), "<p>one</p><p>two</p>");
    }

    #[test]
    fn test_unwrap_leaves_mixed_content() {
        let mut fragment = Fragment::new(vec![
            el("p", vec![text("para")]),
            el("ul", vec![el("li", vec![text("item")])]),
        ]);
        fragment.unwrap();

        assert_eq!(fragment.to_html(), "<p>para</p><ul><li>item</li></ul>");
    }
}
