//! Linear document-order traversal.
//!
//! Think of it as reading the tree as a token stream: every node produces an
//! `Enter` event before its children and a `Leave` event after them. The
//! walk starts *before* the given node (its parent counts as already
//! entered) and runs to the end of the document unless the visitor breaks
//! out. Iterative, with O(1) state, so deeply nested lists are fine.

use std::ops::ControlFlow;

use crate::dom::NodeRef;

/// Traversal event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WalkEvent {
    Enter,
    Leave,
}

#[derive(Clone, Copy)]
enum Direction {
    Forward,
    Backward,
}

/// Walk forward in document order from `node`.
///
/// Returns `Some(value)` if the visitor returned `ControlFlow::Break(value)`,
/// or `None` once the document's root has been left.
pub fn linear_walk<'a, B, F>(node: NodeRef<'a>, visitor: F) -> Option<B>
where
    F: FnMut(WalkEvent, NodeRef<'a>) -> ControlFlow<B>,
{
    walk(node, Direction::Forward, visitor)
}

/// Like [`linear_walk`], but children are visited last to first and the
/// walk continues with previous siblings.
pub fn linear_walk_backwards<'a, B, F>(node: NodeRef<'a>, visitor: F) -> Option<B>
where
    F: FnMut(WalkEvent, NodeRef<'a>) -> ControlFlow<B>,
{
    walk(node, Direction::Backward, visitor)
}

fn walk<'a, B, F>(node: NodeRef<'a>, direction: Direction, mut visitor: F) -> Option<B>
where
    F: FnMut(WalkEvent, NodeRef<'a>) -> ControlFlow<B>,
{
    let mut within = node.parent();
    let mut before = Some(node);

    loop {
        let flow = if let Some(current) = before {
            within = Some(current);
            before = match direction {
                Direction::Forward => current.first_child(),
                Direction::Backward => current.last_child(),
            };
            visitor(WalkEvent::Enter, current)
        } else if let Some(current) = within {
            within = current.parent();
            before = match direction {
                Direction::Forward => current.next_sibling(),
                Direction::Backward => current.prev_sibling(),
            };
            visitor(WalkEvent::Leave, current)
        } else {
            return None;
        };

        if let ControlFlow::Break(value) = flow {
            return Some(value);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::{self, parse, Document};

    fn select<'a>(doc: &'a Document, selector: &str) -> NodeRef<'a> {
        doc.select(selector).nodes().first().copied().unwrap()
    }

    fn label(node: NodeRef) -> String {
        dom::attr(&node, "id").map_or_else(|| dom::text(&node).to_string(), |id| id.to_string())
    }

    #[test]
    fn test_forward_event_order() {
        let doc = parse("<div id=\"r\"><p id=\"a\">x</p><p id=\"b\">y</p></div>");
        let root = select(&doc, "#r");

        let mut events = Vec::new();
        linear_walk(root, |event, node| {
            events.push((event, label(node)));
            if event == WalkEvent::Leave && dom::same_node(&node, &root) {
                return ControlFlow::Break(());
            }
            ControlFlow::Continue(())
        });

        let expected = [
            (WalkEvent::Enter, "r"),
            (WalkEvent::Enter, "a"),
            (WalkEvent::Enter, "x"),
            (WalkEvent::Leave, "x"),
            (WalkEvent::Leave, "a"),
            (WalkEvent::Enter, "b"),
            (WalkEvent::Enter, "y"),
            (WalkEvent::Leave, "y"),
            (WalkEvent::Leave, "b"),
            (WalkEvent::Leave, "r"),
        ];
        let actual: Vec<_> = events.iter().map(|(e, l)| (*e, l.as_str())).collect();
        assert_eq!(actual, expected);
    }

    #[test]
    fn test_walk_continues_past_start_subtree() {
        let doc = parse("<div><p id=\"a\">x</p><p id=\"b\">y</p></div>");
        let a = select(&doc, "#a");

        let found = linear_walk(a, |event, node| {
            if event == WalkEvent::Enter && dom::attr(&node, "id").is_some_and(|id| &*id == "b") {
                ControlFlow::Break(label(node))
            } else {
                ControlFlow::Continue(())
            }
        });

        assert_eq!(found.as_deref(), Some("b"));
    }

    #[test]
    fn test_walk_exhausts_to_none() {
        let doc = parse("<p id=\"a\">x</p>");
        let a = select(&doc, "#a");

        let mut leaves = 0;
        let result: Option<()> = linear_walk(a, |event, _| {
            if event == WalkEvent::Leave {
                leaves += 1;
            }
            ControlFlow::Continue(())
        });

        assert!(result.is_none());
        // a, its text, then body, html and the document itself
        assert!(leaves >= 4);
    }

    #[test]
    fn test_backward_walk_visits_previous_siblings() {
        let doc = parse("<div><p id=\"a\">x</p><p id=\"b\">y</p></div>");
        let b = select(&doc, "#b");

        let mut entered = Vec::new();
        linear_walk_backwards(b, |event, node| {
            if event == WalkEvent::Enter && node.is_element() {
                entered.push(label(node));
            }
            if event == WalkEvent::Leave && dom::is_tag(&node, "div") {
                return ControlFlow::Break(());
            }
            ControlFlow::Continue(())
        });

        assert_eq!(entered, ["b", "a"]);
    }
}
