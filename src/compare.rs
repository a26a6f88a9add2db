//! Range overlap classification.
//!
//! `compare_ranges` reduces two ranges to one of seven relationships. The
//! boundary comparison is fuzzy: two boundaries separated only by material
//! that comment detection ignores (line breaks, tracking comments, empty
//! templates, our own markers) count as equal.

use std::cmp::Ordering;
use std::fmt;
use std::ops::ControlFlow;

use crate::classifier::{
    is_comment_content, is_comment_separator, is_our_generated_node,
    is_rendering_transparent_node,
};
use crate::dom::{self, NodeRef};
use crate::error::{Error, Result};
use crate::range::{compare_boundary_points, get_range_first_node, get_range_last_node, Range};
use crate::walker::{linear_walk, WalkEvent};

/// How range A relates to range B.
///
/// ```text
///          [    equal    ]
///          |[ contained ]|
///        [ |  contains   | ]
///  [overlap|start]       |
///          |     [overlap|end]
/// [before] |             |
///          |             | [after]
/// ```
///
/// `After` means A lies entirely *before* B, and `Before` means A lies
/// entirely after B. Callers rely on this naming.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RangeComparison {
    Equal,
    Contains,
    Contained,
    After,
    Before,
    OverlapStart,
    OverlapEnd,
}

impl RangeComparison {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Equal => "equal",
            Self::Contains => "contains",
            Self::Contained => "contained",
            Self::After => "after",
            Self::Before => "before",
            Self::OverlapStart => "overlapstart",
            Self::OverlapEnd => "overlapend",
        }
    }

    /// The relationship seen from the other range.
    #[must_use]
    pub fn inverse(self) -> Self {
        match self {
            Self::Equal => Self::Equal,
            Self::Contains => Self::Contained,
            Self::Contained => Self::Contains,
            Self::After => Self::Before,
            Self::Before => Self::After,
            Self::OverlapStart => Self::OverlapEnd,
            Self::OverlapEnd => Self::OverlapStart,
        }
    }
}

impl fmt::Display for RangeComparison {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Boundary {
    Start,
    End,
}

fn sign(ordering: Ordering) -> i8 {
    match ordering {
        Ordering::Less => -1,
        Ordering::Equal => 0,
        Ordering::Greater => 1,
    }
}

/// Classify how range `a` relates to range `b`.
///
/// Both ranges must be non-collapsed when their boundaries differ, since the
/// fuzzy check needs the nodes at each boundary.
pub fn compare_ranges(a: &Range, b: &Range) -> Result<RangeComparison> {
    let mut start_to_start = sign(compare_boundary_points(&a.start(), &b.start()));
    let start_to_end = sign(compare_boundary_points(&a.start(), &b.end()));
    let end_to_start = sign(compare_boundary_points(&a.end(), &b.start()));
    let mut end_to_end = sign(compare_boundary_points(&a.end(), &b.end()));

    if (start_to_start < 0 && almost_equal_boundaries(a, b, Boundary::Start)?)
        || (start_to_start > 0 && almost_equal_boundaries(b, a, Boundary::Start)?)
    {
        start_to_start = 0;
    }
    if (end_to_end < 0 && almost_equal_boundaries(a, b, Boundary::End)?)
        || (end_to_end > 0 && almost_equal_boundaries(b, a, Boundary::End)?)
    {
        end_to_end = 0;
    }

    let result = if start_to_start == 0 && end_to_end == 0 {
        RangeComparison::Equal
    } else if start_to_start <= 0 && end_to_end >= 0 {
        RangeComparison::Contains
    } else if start_to_start >= 0 && end_to_end <= 0 {
        RangeComparison::Contained
    } else if end_to_start <= 0 {
        RangeComparison::After
    } else if start_to_end >= 0 {
        RangeComparison::Before
    } else if start_to_start > 0 && start_to_end < 0 && end_to_end >= 0 {
        RangeComparison::OverlapStart
    } else if end_to_end < 0 && end_to_start > 0 && start_to_start <= 0 {
        RangeComparison::OverlapEnd
    } else {
        return Err(Error::InvariantError(format!(
            "unclassifiable range pair: {a:?} vs {b:?}"
        )));
    };

    log::trace!(target: "talkpage.compare", "{a:?} {result} {b:?}");
    Ok(result)
}

/// True if the given boundary of `a` and that of `b` differ only by
/// uninteresting nodes. The boundary of `a` must precede that of `b`.
fn almost_equal_boundaries(a: &Range, b: &Range, boundary: Boundary) -> Result<bool> {
    let (from, to) = match boundary {
        Boundary::Start => (get_range_first_node(a)?, get_range_first_node(b)?),
        Boundary::End => (get_range_last_node(a)?, get_range_last_node(b)?),
    };
    let stop_event = match boundary {
        Boundary::Start => WalkEvent::Enter,
        Boundary::End => WalkEvent::Leave,
    };

    // The end boundary node's own subtree is already inside both ranges
    let mut skip: Option<NodeRef> = (boundary == Boundary::End).then_some(from);

    let found_content = linear_walk(from, |event, node| {
        if event == stop_event && dom::same_node(&node, &to) {
            return ControlFlow::Break(false);
        }
        if let Some(skipped) = skip {
            if event == WalkEvent::Leave && dom::same_node(&node, &skipped) {
                skip = None;
            }
            return ControlFlow::Continue(());
        }
        if event == WalkEvent::Enter {
            if is_comment_separator(&node)
                || is_rendering_transparent_node(&node)
                || is_our_generated_node(&node)
            {
                skip = Some(node);
            } else if is_comment_content(&node) {
                return ControlFlow::Break(true);
            }
        }
        ControlFlow::Continue(())
    });

    Ok(!found_content.unwrap_or(false))
}

/// The contiguous run of the common ancestor's children that the range
/// touches, first to last inclusive.
#[must_use]
pub fn get_covered_siblings<'a>(range: &Range<'a>) -> Vec<NodeRef<'a>> {
    let ancestor = range.common_ancestor_container();
    let siblings = ancestor.children();
    if siblings.is_empty() {
        return Vec::new();
    }

    let start = if dom::same_node(&ancestor, &range.start_container()) {
        Some(range.start_offset())
    } else {
        siblings
            .iter()
            .position(|sibling| dom::contains(sibling, &range.start_container()))
    };
    let end = if dom::same_node(&ancestor, &range.end_container()) {
        range.end_offset().checked_sub(1)
    } else {
        siblings
            .iter()
            .rposition(|sibling| dom::contains(sibling, &range.end_container()))
    };

    match (start, end) {
        (Some(start), Some(end)) if start <= end && end < siblings.len() => {
            siblings[start..=end].to_vec()
        }
        _ => Vec::new(),
    }
}

/// The sibling run covering exactly `range` and nothing else, widened to the
/// highest single ancestor that still covers exactly the same content.
///
/// Returns `None` when the covered siblings carry extra content.
pub fn get_fully_covered_siblings<'a>(range: &Range<'a>) -> Result<Option<Vec<NodeRef<'a>>>> {
    let mut siblings = get_covered_siblings(range);
    let (Some(&first), Some(&last)) = (siblings.first(), siblings.last()) else {
        return Ok(None);
    };

    if compare_ranges(&Range::spanning(first, last)?, range)? != RangeComparison::Equal {
        return Ok(None);
    }

    while let Some(parent) = siblings.first().and_then(NodeRef::parent) {
        // Never widen to the whole document
        if parent.parent().is_none()
            || dom::is_tag(&parent, "body")
            || dom::is_tag(&parent, "html")
            || compare_ranges(&Range::spanning(parent, parent)?, range)? != RangeComparison::Equal
        {
            break;
        }
        siblings = vec![parent];
    }

    Ok(Some(siblings))
}
