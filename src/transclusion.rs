//! Transclusion (template expansion) lookup.
//!
//! Parsoid marks every template expansion as an "about group": a run of
//! sibling elements sharing an `about="#mwtN"` id, the first of which
//! carries `typeof="mw:Transclusion"` and a `data-mw` JSON description of
//! the template calls that produced it.

use std::collections::HashMap;

use serde::Deserialize;
use serde_json::Value;

use crate::dom::{self, NodeRef};
use crate::error::Result;
use crate::patterns::TRANSCLUSION_ABOUT;
use crate::range::Range;
use crate::title::{Title, TitleResolver};

/// `typeof` token of a transclusion's first node.
pub const TRANSCLUSION_TYPEOF: &str = "mw:Transclusion";

/// Parsed `data-mw` attribute of a transclusion.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct DataMw {
    #[serde(default)]
    pub parts: Vec<TransclusionPart>,
}

/// One piece of a transclusion: a template call or surrounding wikitext.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum TransclusionPart {
    Template { template: TemplateCall },
    Wikitext(String),
    Other(Value),
}

#[derive(Debug, Clone, Deserialize)]
pub struct TemplateCall {
    pub target: TemplateTarget,
    #[serde(default)]
    pub params: HashMap<String, Value>,
}

/// What a template call points at. Parser functions have a `function` and
/// no `href`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TemplateTarget {
    #[serde(default)]
    pub wt: String,
    pub href: Option<String>,
    pub function: Option<String>,
}

impl DataMw {
    /// Parse a `data-mw` attribute value.
    pub fn from_json(json: &str) -> Option<Self> {
        match serde_json::from_str(json) {
            Ok(data) => Some(data),
            Err(e) => {
                log::debug!(target: "talkpage.transclusion", "unparseable data-mw: {e}");
                None
            }
        }
    }

    /// Target href of the only part, if this is a single plain template call.
    #[must_use]
    pub fn single_template_href(&self) -> Option<&str> {
        match self.parts.as_slice() {
            [TransclusionPart::Template { template }] => template.target.href.as_deref(),
            _ => None,
        }
    }
}

fn transclusion_about(node: &NodeRef) -> Option<String> {
    dom::attr(node, "about")
        .filter(|about| TRANSCLUSION_ABOUT.is_match(about))
        .map(|about| about.to_string())
}

fn shares_about(node: &NodeRef, about: &str) -> bool {
    node.is_element() && dom::attr(node, "about").is_some_and(|a| &*a == about)
}

/// First node of the closest transclusion enclosing `node`.
///
/// Walks up from `node`. At each ancestor belonging to an about group, steps
/// back to the group's first member; if that member is a transclusion it is
/// the answer, otherwise the search continues upward from it.
#[must_use]
pub fn get_transcluded_from_element<'a>(node: NodeRef<'a>) -> Option<NodeRef<'a>> {
    let mut current = Some(node);
    while let Some(mut n) = current {
        if n.is_element() {
            if let Some(about) = transclusion_about(&n) {
                while let Some(prev) = n.prev_sibling().filter(|p| shares_about(p, &about)) {
                    n = prev;
                }
                if dom::has_typeof(&n, TRANSCLUSION_TYPEOF) {
                    return Some(n);
                }
            }
        }
        current = n.parent();
    }
    None
}

/// Range from just before `start` to just after the last following sibling
/// in the same about group.
pub fn get_transclusion_range<'a>(start: NodeRef<'a>) -> Result<Range<'a>> {
    let about = dom::attr(&start, "about").map(|a| a.to_string());
    let mut end = start;
    if let Some(about) = about {
        while let Some(next) = end.next_sibling().filter(|n| shares_about(n, &about)) {
            end = next;
        }
    }
    Range::spanning(start, end)
}

/// Title of the page transcluded at `node`, if it is a simple single-template
/// transclusion. Multi-part transclusions and parser functions have none.
#[must_use]
pub fn get_single_page_transclusion_title(
    node: &NodeRef,
    resolver: &dyn TitleResolver,
) -> Option<Title> {
    let data_mw = DataMw::from_json(&dom::attr(node, "data-mw")?)?;
    let href = data_mw.single_template_href()?;
    resolver.resolve_title_from_url(href)
}
