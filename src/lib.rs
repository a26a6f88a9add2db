//! # talkpage-threads
//!
//! Reconstruct discussion structure from the rendered HTML of wiki talk pages.
//!
//! Talk pages carry no comment markup: threads exist only as indentation
//! lists, signatures and template output. This crate provides the pieces a
//! comment detector is built from, and the model it produces:
//!
//! - **Classification**: predicates separating discussion content from
//!   rendering artifacts ([`classifier`]).
//! - **Traversal**: an iterative enter/leave document walk ([`walker`]).
//! - **Ranges**: immutable DOM ranges and a fuzzy seven-way comparison
//!   ([`range`], [`compare`]).
//! - **Transclusions**: locating the template expansion around a node
//!   ([`transclusion`]).
//! - **Thread items**: headings, comments, reply trees and where their
//!   content was transcluded from ([`thread_item`]).
//!
//! ## Quick Start
//!
//! ```rust
//! use talkpage_threads::{parse, ArticlePathResolver, Options, Range, ThreadItem, ThreadItemSet};
//!
//! let doc = parse("<h2>Topic</h2><p>Hello</p>");
//! let p = doc.select("p").nodes().first().copied().unwrap();
//!
//! let mut items = ThreadItemSet::new();
//! let comment = items.add(ThreadItem::new_comment(0, Range::spanning(p, p)?, "Example", None, vec![]));
//!
//! let resolver = ArticlePathResolver::new(Options::default())?;
//! let source = items.get(comment).unwrap().transcluded_from(&resolver)?;
//! assert!(!source.is_transcluded());
//! # Ok::<(), talkpage_threads::Error>(())
//! ```

mod error;
mod options;
mod patterns;

/// DOM adapter over `dom_query` nodes.
pub mod dom;

/// Node classification predicates.
pub mod classifier;

/// Document-order enter/leave traversal.
pub mod walker;

/// Immutable DOM ranges.
pub mod range;

/// Detached copies of range content.
pub mod fragment;

/// Range comparison and sibling coverage.
pub mod compare;

/// Page titles and link target resolution.
pub mod title;

/// Transclusion lookup and `data-mw` parsing.
pub mod transclusion;

/// Headings, comments and the reply forest.
pub mod thread_item;

/// Charset sniffing for raw page bytes.
pub mod encoding;

// Public API - re-exports
pub use compare::{compare_ranges, get_covered_siblings, get_fully_covered_siblings, RangeComparison};
pub use dom::{Document, NodeRef};
pub use error::{Error, Result};
pub use options::Options;
pub use range::{get_range_first_node, get_range_last_node, BoundaryPoint, Range};
pub use thread_item::{
    ItemId, ThreadItem, ThreadItemKind, ThreadItemSet, ThreadItemType, TranscludedFrom,
};
pub use title::{ArticlePathResolver, Title, TitleResolver};
pub use walker::{linear_walk, linear_walk_backwards, WalkEvent};

/// Parse talk page HTML.
#[must_use]
pub fn parse(html: &str) -> Document {
    dom::parse(html)
}

/// Parse talk page bytes, detecting their charset.
#[must_use]
pub fn parse_bytes(bytes: &[u8]) -> Document {
    dom::parse(&encoding::decode_html(bytes))
}
