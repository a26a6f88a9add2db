//! Page titles and link target resolution.

use std::fmt;

use percent_encoding::percent_decode_str;
use regex::Regex;
use url::Url;

use crate::error::{Error, Result};
use crate::options::Options;
use crate::patterns::{TITLE_ILLEGAL_CHARS, TITLE_WHITESPACE};

pub const NS_MAIN: i32 = 0;
pub const NS_TALK: i32 = 1;
pub const NS_USER: i32 = 2;
pub const NS_USER_TALK: i32 = 3;
pub const NS_PROJECT: i32 = 4;
pub const NS_PROJECT_TALK: i32 = 5;
pub const NS_FILE: i32 = 6;
pub const NS_FILE_TALK: i32 = 7;
pub const NS_MEDIAWIKI: i32 = 8;
pub const NS_MEDIAWIKI_TALK: i32 = 9;
pub const NS_TEMPLATE: i32 = 10;
pub const NS_TEMPLATE_TALK: i32 = 11;
pub const NS_HELP: i32 = 12;
pub const NS_HELP_TALK: i32 = 13;
pub const NS_CATEGORY: i32 = 14;
pub const NS_CATEGORY_TALK: i32 = 15;

/// Dummy origin for resolving relative link targets.
const LOCAL_ORIGIN: &str = "https://local";

/// A normalized page title.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Title {
    namespace: i32,
    prefix: String,
    text: String,
}

impl Title {
    /// Parse and normalize user-facing title text.
    ///
    /// Returns `None` for empty titles and titles containing characters that
    /// are never valid in a page name.
    #[must_use]
    pub fn new_from_text(text: &str, options: &Options) -> Option<Self> {
        let text = text.replace('_', " ");
        let text = text.split('#').next().unwrap_or_default();
        let text = TITLE_WHITESPACE.replace_all(text, " ");
        let mut text = text.trim();
        if let Some(rest) = text.strip_prefix(':') {
            text = rest.trim_start();
        }

        let mut namespace = NS_MAIN;
        if let Some((prefix, rest)) = text.split_once(':') {
            if let Some(ns) = options.namespace_for_prefix(prefix.trim()) {
                namespace = ns;
                text = rest.trim_start();
            }
        }

        if text.is_empty() || TITLE_ILLEGAL_CHARS.is_match(text) {
            return None;
        }

        let text = if options.capital_links {
            uppercase_first(text)
        } else {
            text.to_string()
        };

        Some(Self {
            namespace,
            prefix: options.namespace_name(namespace).to_string(),
            text,
        })
    }

    #[must_use]
    pub fn namespace(&self) -> i32 {
        self.namespace
    }

    /// Title text without the namespace prefix.
    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    #[must_use]
    pub fn in_namespace(&self, namespace: i32) -> bool {
        self.namespace == namespace
    }

    /// Title text with the namespace prefix, using spaces.
    #[must_use]
    pub fn prefixed_text(&self) -> String {
        if self.prefix.is_empty() {
            self.text.clone()
        } else {
            format!("{}:{}", self.prefix, self.text)
        }
    }
}

impl fmt::Display for Title {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.prefixed_text())
    }
}

fn uppercase_first(text: &str) -> String {
    let mut chars = text.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Maps a link target back to the page it points at.
pub trait TitleResolver {
    fn resolve_title_from_url(&self, url: &str) -> Option<Title>;
}

/// Resolves link targets through the site's article path.
#[derive(Debug, Clone)]
pub struct ArticlePathResolver {
    options: Options,
    article_path: Regex,
}

impl ArticlePathResolver {
    pub fn new(options: Options) -> Result<Self> {
        if !options.article_path.contains("$1") {
            return Err(Error::ConfigError(format!(
                "article path {:?} has no $1 placeholder",
                options.article_path
            )));
        }
        let pattern = regex::escape(&options.article_path).replace(r"\$1", "(.*)");
        let article_path = Regex::new(&pattern).map_err(|e| Error::ConfigError(e.to_string()))?;
        Ok(Self {
            options,
            article_path,
        })
    }

    #[must_use]
    pub fn options(&self) -> &Options {
        &self.options
    }

    fn title_from_query(url: &str) -> Option<String> {
        let base = Url::parse(&format!("{LOCAL_ORIGIN}/")).ok()?;
        let parsed = base.join(url).ok()?;
        parsed
            .query_pairs()
            .find(|(key, _)| key == "title")
            .map(|(_, value)| value.into_owned())
    }
}

impl TitleResolver for ArticlePathResolver {
    fn resolve_title_from_url(&self, url: &str) -> Option<Title> {
        if let Some(title) = Self::title_from_query(url) {
            return Title::new_from_text(&title, &self.options);
        }

        let absolute = if let Some(rest) = url.strip_prefix("./") {
            format!(
                "{LOCAL_ORIGIN}{}",
                self.options.article_path.replace("$1", rest)
            )
        } else if url.contains("://") {
            url.to_string()
        } else {
            format!("{LOCAL_ORIGIN}{url}")
        };

        let captures = self.article_path.captures(&absolute)?;
        let raw = captures.get(1)?.as_str();
        Title::new_from_text(&urldecode(raw), &self.options)
    }
}

/// Decode a URL component, reading `+` as a space.
fn urldecode(s: &str) -> String {
    percent_decode_str(&s.replace('+', " "))
        .decode_utf8_lossy()
        .into_owned()
}
