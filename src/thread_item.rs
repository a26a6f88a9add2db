//! Thread items: headings and comments, and the reply forest they form.
//!
//! Items of one parse live in a [`ThreadItemSet`] and point at each other by
//! [`ItemId`]. Replies are owned top-down by the set; `parent` is a plain
//! index back-reference.

use std::collections::BTreeSet;
use std::fmt;

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Serialize, Serializer};
use serde_json::Value;

use crate::compare::{compare_ranges, get_fully_covered_siblings, RangeComparison};
use crate::dom::{self, NodeRef};
use crate::error::{Error, Result};
use crate::range::{get_range_first_node, get_range_last_node, Range};
use crate::title::{TitleResolver, NS_TEMPLATE};
use crate::transclusion::{
    get_single_page_transclusion_title, get_transcluded_from_element, get_transclusion_range,
};

/// Index of an item within its [`ThreadItemSet`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ItemId(usize);

impl ItemId {
    #[must_use]
    pub fn index(self) -> usize {
        self.0
    }
}

/// Discriminator of a thread item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ThreadItemType {
    Heading,
    Comment,
}

impl ThreadItemType {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Heading => "heading",
            Self::Comment => "comment",
        }
    }
}

impl fmt::Display for ThreadItemType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HeadingData {
    /// `1`-`6` for `<h1>`-`<h6>`; `None` for a placeholder heading.
    pub heading_level: Option<u8>,
    /// Synthesized for comments that precede the first real heading.
    pub placeholder_heading: bool,
}

#[derive(Debug, Clone)]
pub struct CommentData<'a> {
    pub author: String,
    pub timestamp: Option<DateTime<Utc>>,
    pub signature_ranges: Vec<Range<'a>>,
}

/// Variant data of a thread item.
#[derive(Debug, Clone)]
pub enum ThreadItemKind<'a> {
    Heading(HeadingData),
    Comment(CommentData<'a>),
}

/// Where a thread item's content comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TranscludedFrom {
    /// Written on this page.
    NotTranscluded,
    /// Transcluded, but the source page can't be determined.
    Unknown,
    /// Transcluded from the named page (prefixed title with spaces).
    Page(String),
}

impl TranscludedFrom {
    #[must_use]
    pub fn is_transcluded(&self) -> bool {
        !matches!(self, Self::NotTranscluded)
    }
}

impl Serialize for TranscludedFrom {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        match self {
            Self::NotTranscluded => serializer.serialize_bool(false),
            Self::Unknown => serializer.serialize_bool(true),
            Self::Page(title) => serializer.serialize_str(title),
        }
    }
}

/// A heading or comment found on the page.
#[derive(Debug, Clone)]
pub struct ThreadItem<'a> {
    kind: ThreadItemKind<'a>,
    level: usize,
    range: Range<'a>,
    root_node: Option<NodeRef<'a>>,
    parent: Option<ItemId>,
    id: Option<String>,
    legacy_id: Option<String>,
    name: Option<String>,
    replies: Vec<ItemId>,
    warnings: Vec<String>,
}

impl<'a> ThreadItem<'a> {
    #[must_use]
    pub fn new(kind: ThreadItemKind<'a>, level: usize, range: Range<'a>) -> Self {
        Self {
            kind,
            level,
            range,
            root_node: None,
            parent: None,
            id: None,
            legacy_id: None,
            name: None,
            replies: Vec::new(),
            warnings: Vec::new(),
        }
    }

    #[must_use]
    pub fn new_heading(level: usize, range: Range<'a>, heading_level: Option<u8>) -> Self {
        Self::new(
            ThreadItemKind::Heading(HeadingData {
                heading_level,
                placeholder_heading: heading_level.is_none(),
            }),
            level,
            range,
        )
    }

    #[must_use]
    pub fn new_comment(
        level: usize,
        range: Range<'a>,
        author: impl Into<String>,
        timestamp: Option<DateTime<Utc>>,
        signature_ranges: Vec<Range<'a>>,
    ) -> Self {
        Self::new(
            ThreadItemKind::Comment(CommentData {
                author: author.into(),
                timestamp,
                signature_ranges,
            }),
            level,
            range,
        )
    }

    #[must_use]
    pub fn item_type(&self) -> ThreadItemType {
        match self.kind {
            ThreadItemKind::Heading(_) => ThreadItemType::Heading,
            ThreadItemKind::Comment(_) => ThreadItemType::Comment,
        }
    }

    #[must_use]
    pub fn kind(&self) -> &ThreadItemKind<'a> {
        &self.kind
    }

    #[must_use]
    pub fn heading(&self) -> Option<&HeadingData> {
        match &self.kind {
            ThreadItemKind::Heading(data) => Some(data),
            ThreadItemKind::Comment(_) => None,
        }
    }

    #[must_use]
    pub fn comment(&self) -> Option<&CommentData<'a>> {
        match &self.kind {
            ThreadItemKind::Comment(data) => Some(data),
            ThreadItemKind::Heading(_) => None,
        }
    }

    /// Author of a comment. Headings have none.
    #[must_use]
    pub fn author(&self) -> Option<&str> {
        self.comment().map(|c| c.author.as_str())
    }

    #[must_use]
    pub fn level(&self) -> usize {
        self.level
    }

    pub fn set_level(&mut self, level: usize) {
        self.level = level;
    }

    #[must_use]
    pub fn range(&self) -> &Range<'a> {
        &self.range
    }

    pub fn set_range(&mut self, range: Range<'a>) {
        self.range = range;
    }

    /// Node that `level` is relative to.
    #[must_use]
    pub fn root_node(&self) -> Option<NodeRef<'a>> {
        self.root_node
    }

    pub fn set_root_node(&mut self, root_node: NodeRef<'a>) {
        self.root_node = Some(root_node);
    }

    #[must_use]
    pub fn parent(&self) -> Option<ItemId> {
        self.parent
    }

    #[must_use]
    pub fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    pub fn set_id(&mut self, id: Option<String>) {
        self.id = id;
    }

    /// Id according to an older naming scheme, kept for old links.
    #[must_use]
    pub fn legacy_id(&self) -> Option<&str> {
        self.legacy_id.as_deref()
    }

    pub fn set_legacy_id(&mut self, legacy_id: Option<String>) {
        self.legacy_id = legacy_id;
    }

    #[must_use]
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn set_name(&mut self, name: Option<String>) {
        self.name = name;
    }

    #[must_use]
    pub fn replies(&self) -> &[ItemId] {
        &self.replies
    }

    #[must_use]
    pub fn warnings(&self) -> &[String] {
        &self.warnings
    }

    pub fn add_warning(&mut self, warning: impl Into<String>) {
        self.warnings.push(warning.into());
    }

    pub fn add_warnings<I, S>(&mut self, warnings: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.warnings.extend(warnings.into_iter().map(Into::into));
    }

    /// HTML of the item's content, with indentation list markup removed.
    #[must_use]
    pub fn html(&self) -> String {
        let mut fragment = self.range.clone_contents();
        fragment.unwrap();
        fragment.to_html()
    }

    /// Text of the item's content.
    #[must_use]
    pub fn text(&self) -> String {
        self.range.clone_contents().text()
    }

    /// Nodes containing this item and nothing else, if there are any.
    pub fn fully_covered_siblings(&self) -> Result<Option<Vec<NodeRef<'a>>>> {
        get_fully_covered_siblings(&self.range)
    }

    /// The page this item is transcluded from, if any. Replies to a
    /// transcluded item must be posted on that page.
    ///
    /// Only the transclusions enclosing the first and last node of the item
    /// need examining; any other transclusion either lies outside the item
    /// or inside it (an inline template). The range comparison is fuzzy, so a
    /// transclusion that differs from the item only by line breaks or
    /// tracking markup counts as an exact match.
    ///
    /// An exact match with a single template call is ambiguous: the source
    /// page may hold just this one comment, or the template may be a wrapper
    /// used on this page. Titles in the Template namespace are taken to be
    /// wrappers and don't decide the result.
    pub fn transcluded_from(&self, resolver: &dyn TitleResolver) -> Result<TranscludedFrom> {
        let start = get_transcluded_from_element(get_range_first_node(&self.range)?);
        let end = get_transcluded_from_element(get_range_last_node(&self.range)?);

        let mut candidates = Vec::with_capacity(2);
        candidates.extend(start);
        if let Some(end) = end {
            if !start.is_some_and(|s| dom::same_node(&s, &end)) {
                candidates.push(end);
            }
        }

        for node in candidates {
            let transclusion_range = get_transclusion_range(node)?;
            let compared = compare_ranges(&self.range, &transclusion_range)?;
            let title = get_single_page_transclusion_title(&node, resolver);
            log::debug!(
                target: "talkpage.thread",
                "{} {compared} transclusion {:?} (title: {:?})",
                self.item_type(),
                node.id,
                title.as_ref().map(ToString::to_string)
            );

            match compared {
                RangeComparison::Equal => match title {
                    None => return Ok(TranscludedFrom::Unknown),
                    // Probably a wrapper template; check the other candidate
                    Some(title) if title.in_namespace(NS_TEMPLATE) => {}
                    Some(title) => return Ok(TranscludedFrom::Page(title.prefixed_text())),
                },
                // An inline template inside the item
                RangeComparison::Contains => {}
                RangeComparison::Contained => {
                    return Ok(title.map_or(TranscludedFrom::Unknown, |t| {
                        TranscludedFrom::Page(t.prefixed_text())
                    }));
                }
                RangeComparison::OverlapStart | RangeComparison::OverlapEnd => {
                    return Ok(TranscludedFrom::Unknown);
                }
                RangeComparison::After | RangeComparison::Before => {
                    return Err(Error::InvariantError(format!(
                        "transclusion touching the item boundary compared as {compared}"
                    )));
                }
            }
        }

        Ok(TranscludedFrom::NotTranscluded)
    }
}

/// JSON projection of one item. Cached by clients, so fields are only ever
/// added.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ThreadItemJson<'s> {
    #[serde(rename = "type")]
    item_type: ThreadItemType,
    level: usize,
    id: Option<&'s str>,
    replies: Vec<Option<&'s str>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    heading_level: Option<u8>,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    placeholder_heading: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    author: Option<&'s str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    timestamp: Option<String>,
}

/// All thread items of one page parse.
#[derive(Debug, Clone, Default)]
pub struct ThreadItemSet<'a> {
    items: Vec<ThreadItem<'a>>,
}

impl<'a> ThreadItemSet<'a> {
    #[must_use]
    pub fn new() -> Self {
        Self { items: Vec::new() }
    }

    /// Take ownership of an item and return its id.
    pub fn add(&mut self, item: ThreadItem<'a>) -> ItemId {
        self.items.push(item);
        ItemId(self.items.len() - 1)
    }

    #[must_use]
    pub fn get(&self, id: ItemId) -> Option<&ThreadItem<'a>> {
        self.items.get(id.0)
    }

    pub fn get_mut(&mut self, id: ItemId) -> Option<&mut ThreadItem<'a>> {
        self.items.get_mut(id.0)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Items in insertion order, with their ids.
    pub fn items(&self) -> impl Iterator<Item = (ItemId, &ThreadItem<'a>)> {
        self.items.iter().enumerate().map(|(i, item)| (ItemId(i), item))
    }

    /// Top-level items, in insertion order.
    #[must_use]
    pub fn threads(&self) -> Vec<ItemId> {
        self.items()
            .filter(|(_, item)| item.parent.is_none())
            .map(|(id, _)| id)
            .collect()
    }

    fn item(&self, id: ItemId) -> Result<&ThreadItem<'a>> {
        self.get(id)
            .ok_or(Error::PreconditionError("thread item belongs to this set"))
    }

    /// Record `reply` as the next reply to `parent`.
    ///
    /// An item gets its parent once; re-parenting, self-replies and replies
    /// that would close a cycle are rejected.
    pub fn add_reply(&mut self, parent: ItemId, reply: ItemId) -> Result<()> {
        self.item(parent)?;
        if self.item(reply)?.parent.is_some() {
            return Err(Error::PreconditionError("reply has no parent yet"));
        }

        let mut ancestor = Some(parent);
        while let Some(id) = ancestor {
            if id == reply {
                return Err(Error::PreconditionError("reply is not an ancestor of its parent"));
            }
            ancestor = self.item(id)?.parent;
        }

        self.items[reply.0].parent = Some(parent);
        self.items[parent.0].replies.push(reply);
        log::trace!(target: "talkpage.thread", "{reply:?} replies to {parent:?}");
        Ok(())
    }

    /// Sorted, de-duplicated authors of every comment below `id`.
    pub fn authors_below(&self, id: ItemId) -> Result<Vec<String>> {
        let mut authors = BTreeSet::new();
        let mut stack: Vec<ItemId> = self.item(id)?.replies.clone();
        while let Some(next) = stack.pop() {
            let item = self.item(next)?;
            if let Some(author) = item.author() {
                authors.insert(author.to_string());
            }
            stack.extend(item.replies.iter().copied());
        }
        Ok(authors.into_iter().collect())
    }

    /// The `{type, level, id, replies}` projection of an item, plus the
    /// variant's own fields.
    pub fn to_json_value(&self, id: ItemId) -> Result<Value> {
        let item = self.item(id)?;
        let replies = item
            .replies
            .iter()
            .map(|reply| self.item(*reply).map(ThreadItem::id))
            .collect::<Result<Vec<_>>>()?;

        let mut json = ThreadItemJson {
            item_type: item.item_type(),
            level: item.level,
            id: item.id(),
            replies,
            heading_level: None,
            placeholder_heading: false,
            author: None,
            timestamp: None,
        };
        match &item.kind {
            ThreadItemKind::Heading(heading) => {
                json.heading_level = heading.heading_level;
                json.placeholder_heading = heading.placeholder_heading;
            }
            ThreadItemKind::Comment(comment) => {
                json.author = Some(comment.author.as_str());
                json.timestamp = comment
                    .timestamp
                    .map(|ts| ts.to_rfc3339_opts(SecondsFormat::Secs, true));
            }
        }

        serde_json::to_value(json).map_err(|e| Error::InvariantError(e.to_string()))
    }

    /// [`Self::to_json_value`] as a string.
    pub fn to_json(&self, id: ItemId) -> Result<String> {
        Ok(self.to_json_value(id)?.to_string())
    }
}
