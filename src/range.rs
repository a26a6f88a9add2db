//! Immutable DOM ranges.
//!
//! A range is a pair of boundary points. Offsets count children for element
//! containers and characters for text containers. Ranges never mutate; the
//! `with_*` setters return a new range.

use std::cmp::Ordering;
use std::fmt;

use crate::dom::{self, NodeKind, NodeRef};
use crate::error::{Error, Result};
use crate::fragment::{Fragment, FragmentNode};

/// A (container, offset) position in the tree.
#[derive(Clone, Copy)]
pub struct BoundaryPoint<'a> {
    pub node: NodeRef<'a>,
    pub offset: usize,
}

impl<'a> BoundaryPoint<'a> {
    #[must_use]
    pub fn new(node: NodeRef<'a>, offset: usize) -> Self {
        Self { node, offset }
    }

    /// Point immediately before `node` in its parent.
    #[must_use]
    pub fn before(node: NodeRef<'a>) -> Option<Self> {
        node.parent()
            .map(|parent| Self::new(parent, dom::child_index_of(&node)))
    }

    /// Point immediately after `node` in its parent.
    #[must_use]
    pub fn after(node: NodeRef<'a>) -> Option<Self> {
        node.parent()
            .map(|parent| Self::new(parent, dom::child_index_of(&node) + 1))
    }
}

impl PartialEq for BoundaryPoint<'_> {
    fn eq(&self, other: &Self) -> bool {
        dom::same_node(&self.node, &other.node) && self.offset == other.offset
    }
}

impl Eq for BoundaryPoint<'_> {}

impl fmt::Debug for BoundaryPoint<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({:?}, {})", self.node.id, self.offset)
    }
}

/// Position of boundary point `a` relative to `b` in tree order.
///
/// Follows the DOM standard's "position of a boundary point" algorithm.
#[must_use]
pub fn compare_boundary_points(a: &BoundaryPoint, b: &BoundaryPoint) -> Ordering {
    if dom::same_node(&a.node, &b.node) {
        return a.offset.cmp(&b.offset);
    }

    if dom::compare_document_position(&a.node, &b.node) == Ordering::Greater {
        return compare_boundary_points(b, a).reverse();
    }

    if dom::contains(&a.node, &b.node) {
        let mut child = b.node;
        while let Some(parent) = child.parent() {
            if dom::same_node(&parent, &a.node) {
                break;
            }
            child = parent;
        }
        if dom::child_index_of(&child) < a.offset {
            return Ordering::Greater;
        }
    }

    Ordering::Less
}

/// An immutable range between two boundary points.
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct Range<'a> {
    start: BoundaryPoint<'a>,
    end: BoundaryPoint<'a>,
}

impl<'a> Range<'a> {
    /// Create a range. Fails if an offset exceeds its container's length or
    /// the start lies after the end.
    pub fn new(
        start_container: NodeRef<'a>,
        start_offset: usize,
        end_container: NodeRef<'a>,
        end_offset: usize,
    ) -> Result<Self> {
        Self::from_points(
            BoundaryPoint::new(start_container, start_offset),
            BoundaryPoint::new(end_container, end_offset),
        )
    }

    /// Create a range from two boundary points.
    pub fn from_points(start: BoundaryPoint<'a>, end: BoundaryPoint<'a>) -> Result<Self> {
        for point in [&start, &end] {
            let length = dom::node_length(&point.node);
            if point.offset > length {
                return Err(Error::RangeError(format!(
                    "offset {} exceeds container length {length}",
                    point.offset
                )));
            }
        }
        if compare_boundary_points(&start, &end) == Ordering::Greater {
            return Err(Error::RangeError(format!(
                "start {start:?} is after end {end:?}"
            )));
        }
        Ok(Self { start, end })
    }

    /// Range covering exactly the nodes `first` through `last`, which must
    /// share a parent (or at least both have one).
    pub fn spanning(first: NodeRef<'a>, last: NodeRef<'a>) -> Result<Self> {
        let start = BoundaryPoint::before(first)
            .ok_or(Error::PreconditionError("range start node has a parent"))?;
        let end = BoundaryPoint::after(last)
            .ok_or(Error::PreconditionError("range end node has a parent"))?;
        Self::from_points(start, end)
    }

    /// Range with a new start point.
    pub fn with_start(&self, container: NodeRef<'a>, offset: usize) -> Result<Self> {
        Self::from_points(BoundaryPoint::new(container, offset), self.end)
    }

    /// Range with a new end point.
    pub fn with_end(&self, container: NodeRef<'a>, offset: usize) -> Result<Self> {
        Self::from_points(self.start, BoundaryPoint::new(container, offset))
    }

    #[must_use]
    pub fn start(&self) -> BoundaryPoint<'a> {
        self.start
    }

    #[must_use]
    pub fn end(&self) -> BoundaryPoint<'a> {
        self.end
    }

    #[must_use]
    pub fn start_container(&self) -> NodeRef<'a> {
        self.start.node
    }

    #[must_use]
    pub fn start_offset(&self) -> usize {
        self.start.offset
    }

    #[must_use]
    pub fn end_container(&self) -> NodeRef<'a> {
        self.end.node
    }

    #[must_use]
    pub fn end_offset(&self) -> usize {
        self.end.offset
    }

    #[must_use]
    pub fn collapsed(&self) -> bool {
        self.start == self.end
    }

    /// Deepest node containing both boundary containers.
    #[must_use]
    pub fn common_ancestor_container(&self) -> NodeRef<'a> {
        let mut current = self.start.node;
        loop {
            if dom::contains(&current, &self.end.node) {
                return current;
            }
            match current.parent() {
                Some(parent) => current = parent,
                None => return current,
            }
        }
    }

    /// Copy the range's content out of the tree.
    #[must_use]
    pub fn clone_contents(&self) -> Fragment {
        Fragment::new(clone_between(self.start, self.end))
    }
}

impl fmt::Debug for Range<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Range")
            .field("start", &self.start)
            .field("end", &self.end)
            .finish()
    }
}

/// The node at the start boundary of `range`.
///
/// If the start container has children, that is the child at the start
/// offset; otherwise the container itself.
pub fn get_range_first_node<'a>(range: &Range<'a>) -> Result<NodeRef<'a>> {
    if range.collapsed() {
        return Err(Error::PreconditionError("range is not collapsed"));
    }
    let container = range.start_container();
    let children = container.children();
    if children.is_empty() {
        return Ok(container);
    }
    children
        .get(range.start_offset())
        .copied()
        .ok_or(Error::PreconditionError("range start offset points at a child"))
}

/// The node at the end boundary of `range`.
///
/// If the end container has children, that is the child before the end
/// offset; otherwise the container itself.
pub fn get_range_last_node<'a>(range: &Range<'a>) -> Result<NodeRef<'a>> {
    if range.collapsed() {
        return Err(Error::PreconditionError("range is not collapsed"));
    }
    let container = range.end_container();
    let children = container.children();
    if children.is_empty() {
        return Ok(container);
    }
    range
        .end_offset()
        .checked_sub(1)
        .and_then(|index| children.get(index).copied())
        .ok_or(Error::PreconditionError("range end offset follows a child"))
}

fn is_character_data(node: &NodeRef) -> bool {
    matches!(dom::node_kind(node), NodeKind::Text | NodeKind::Comment)
}

/// Slice of a text or comment node between two character offsets.
fn character_data_slice(node: &NodeRef, from: usize, to: usize) -> FragmentNode {
    let take = to.saturating_sub(from);
    if dom::node_kind(node) == NodeKind::Comment {
        FragmentNode::Comment(dom::comment_data(node).chars().skip(from).take(take).collect())
    } else {
        FragmentNode::Text(dom::text(node).chars().skip(from).take(take).collect())
    }
}

/// Shallow copy of an element with the given children.
fn shallow_clone(node: &NodeRef, children: Vec<FragmentNode>) -> FragmentNode {
    FragmentNode::Element {
        tag: dom::tag_name(node).unwrap_or_default(),
        attrs: dom::attributes(node),
        children,
    }
}

fn clone_between(start: BoundaryPoint, end: BoundaryPoint) -> Vec<FragmentNode> {
    if dom::same_node(&start.node, &end.node) && is_character_data(&start.node) {
        return vec![character_data_slice(&start.node, start.offset, end.offset)];
    }

    let range = Range { start, end };
    let common = range.common_ancestor_container();
    let children = common.children();

    let (first, first_partial) = if dom::same_node(&start.node, &common) {
        (start.offset, false)
    } else {
        let index = children
            .iter()
            .position(|child| dom::contains(child, &start.node))
            .unwrap_or(children.len());
        (index, true)
    };
    let (last, last_partial) = if dom::same_node(&end.node, &common) {
        (end.offset, false)
    } else {
        let index = children
            .iter()
            .rposition(|child| dom::contains(child, &end.node))
            .map_or(0, |i| i + 1);
        (index, true)
    };

    let mut out = Vec::new();
    for index in first..last {
        let Some(child) = children.get(index) else {
            break;
        };
        let is_first = first_partial && index == first;
        let is_last = last_partial && index + 1 == last;

        if is_first || is_last {
            let from = if is_first {
                start
            } else {
                BoundaryPoint::new(*child, 0)
            };
            let to = if is_last {
                end
            } else {
                BoundaryPoint::new(*child, dom::node_length(child))
            };
            let inner = clone_between(from, to);
            if is_character_data(child) {
                out.extend(inner);
            } else {
                out.push(shallow_clone(child, inner));
            }
        } else {
            out.push(FragmentNode::deep_clone(child));
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::{parse, Document};

    fn select<'a>(doc: &'a Document, selector: &str) -> NodeRef<'a> {
        doc.select(selector).nodes().first().copied().unwrap()
    }

    #[test]
    fn test_boundary_point_ordering() {
        let doc = parse("<div id=\"d\"><p id=\"a\">one</p><p id=\"b\">two</p></div>");
        let div = select(&doc, "#d");
        let a = select(&doc, "#a");
        let text_b = select(&doc, "#b").children()[0];

        let before_a = BoundaryPoint::new(div, 0);
        let inside_a = BoundaryPoint::new(a, 1);
        let after_a = BoundaryPoint::new(div, 1);
        let in_b = BoundaryPoint::new(text_b, 2);

        assert_eq!(compare_boundary_points(&before_a, &inside_a), Ordering::Less);
        assert_eq!(compare_boundary_points(&inside_a, &after_a), Ordering::Less);
        assert_eq!(compare_boundary_points(&after_a, &in_b), Ordering::Less);
        assert_eq!(compare_boundary_points(&in_b, &before_a), Ordering::Greater);
        assert_eq!(compare_boundary_points(&after_a, &after_a), Ordering::Equal);
    }

    #[test]
    fn test_new_rejects_reversed_points() {
        let doc = parse("<div id=\"d\"><p>one</p><p>two</p></div>");
        let div = select(&doc, "#d");

        assert!(Range::new(div, 0, div, 2).is_ok());
        assert!(matches!(Range::new(div, 2, div, 1), Err(Error::RangeError(_))));
        assert!(matches!(Range::new(div, 0, div, 3), Err(Error::RangeError(_))));
    }

    #[test]
    fn test_collapsed_and_common_ancestor() {
        let doc = parse("<div id=\"d\"><p id=\"a\">one</p><p id=\"b\">two</p></div>");
        let div = select(&doc, "#d");
        let text_a = select(&doc, "#a").children()[0];
        let text_b = select(&doc, "#b").children()[0];

        let range = Range::new(text_a, 1, text_b, 2).unwrap();
        assert!(!range.collapsed());
        assert!(dom::same_node(&range.common_ancestor_container(), &div));

        let empty = Range::new(div, 1, div, 1).unwrap();
        assert!(empty.collapsed());
    }

    #[test]
    fn test_first_and_last_nodes() {
        let doc = parse("<div id=\"d\"><p id=\"a\">one</p><p id=\"b\">two</p></div>");
        let div = select(&doc, "#d");
        let text_a = select(&doc, "#a").children()[0];

        let range = Range::new(div, 0, div, 2).unwrap();
        assert!(dom::same_node(&get_range_first_node(&range).unwrap(), &select(&doc, "#a")));
        assert!(dom::same_node(&get_range_last_node(&range).unwrap(), &select(&doc, "#b")));

        let text_range = Range::new(text_a, 0, text_a, 2).unwrap();
        assert!(dom::same_node(&get_range_first_node(&text_range).unwrap(), &text_a));
        assert!(dom::same_node(&get_range_last_node(&text_range).unwrap(), &text_a));
    }

    #[test]
    fn test_boundary_nodes_of_collapsed_range_fail() {
        let doc = parse("<div id=\"d\"><p>one</p></div>");
        let div = select(&doc, "#d");
        let range = Range::new(div, 0, div, 0).unwrap();

        assert!(matches!(get_range_first_node(&range), Err(Error::PreconditionError(_))));
        assert!(matches!(get_range_last_node(&range), Err(Error::PreconditionError(_))));
    }

    #[test]
    fn test_with_start_and_end() {
        let doc = parse("<div id=\"d\"><p>one</p><p>two</p><p>three</p></div>");
        let div = select(&doc, "#d");
        let range = Range::new(div, 0, div, 3).unwrap();

        let narrowed = range.with_start(div, 1).unwrap().with_end(div, 2).unwrap();
        assert_eq!(narrowed.start_offset(), 1);
        assert_eq!(narrowed.end_offset(), 2);
        assert_eq!(range.start_offset(), 0);
        assert!(range.with_start(div, 3).unwrap().collapsed());
    }

    #[test]
    fn test_clone_contents_partial_text() {
        let doc = parse("<div id=\"d\"><p id=\"a\">Hello <b>big</b> world</p></div>");
        let a = select(&doc, "#a");
        let children = a.children();
        let range = Range::new(children[0], 2, children[2], 3).unwrap();

        let fragment = range.clone_contents();
        assert_eq!(fragment.text(), "llo big wo");
        assert_eq!(fragment.to_html(), "llo <b>big</b> wo");
    }

    #[test]
    fn test_clone_contents_partial_elements() {
        let doc = parse("<div id=\"d\"><p id=\"a\">one</p><p id=\"b\">two</p></div>");
        let text_a = select(&doc, "#a").children()[0];
        let text_b = select(&doc, "#b").children()[0];
        let range = Range::new(text_a, 1, text_b, 2).unwrap();

        let fragment = range.clone_contents();
        assert_eq!(fragment.to_html(), "<p id=\"a\">ne</p><p id=\"b\">tw</p>");
    }

    #[test]
    fn test_spanning_range() {
        let doc = parse("<div id=\"d\"><p id=\"a\">one</p><p id=\"b\">two</p><p id=\"c\">3</p></div>");
        let range = Range::spanning(select(&doc, "#a"), select(&doc, "#b")).unwrap();

        assert!(dom::same_node(&range.start_container(), &select(&doc, "#d")));
        assert_eq!(range.start_offset(), 0);
        assert_eq!(range.end_offset(), 2);
    }
}
