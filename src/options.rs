//! Site configuration.
//!
//! The heuristics only need a small slice of a wiki's configuration: how
//! article URLs are built and how namespace prefixes map to namespace ids.

use std::collections::{BTreeMap, HashMap};

use serde::Deserialize;

use crate::error::{Error, Result};
use crate::title::{
    NS_CATEGORY, NS_CATEGORY_TALK, NS_FILE, NS_FILE_TALK, NS_HELP, NS_HELP_TALK, NS_MEDIAWIKI,
    NS_MEDIAWIKI_TALK, NS_PROJECT, NS_PROJECT_TALK, NS_TALK, NS_TEMPLATE, NS_TEMPLATE_TALK,
    NS_USER, NS_USER_TALK,
};

/// Site configuration used for title resolution.
///
/// All fields are public. Use `Default::default()` for a stock English wiki,
/// or load a site's values with [`Options::from_json`].
///
/// # Example
///
/// ```rust
/// use talkpage_threads::Options;
///
/// let options = Options {
///     article_path: "/w/$1".to_string(),
///     ..Options::default()
/// };
/// assert!(options.capital_links);
/// ```
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Options {
    /// URL path of an article, with `$1` standing for the page title.
    ///
    /// Default: `"/wiki/$1"`
    pub article_path: String,

    /// Canonical (local) name of each namespace by id. The main namespace
    /// (0) has no prefix and need not be listed.
    pub namespace_names: BTreeMap<i32, String>,

    /// Extra prefixes accepted for a namespace, such as `Image` for `File`.
    /// Matched case-insensitively, with underscores read as spaces.
    pub namespace_aliases: HashMap<String, i32>,

    /// Uppercase the first letter of page titles.
    ///
    /// Default: `true`
    pub capital_links: bool,
}

impl Options {
    /// Parse site configuration from JSON. Missing fields keep their defaults.
    pub fn from_json(json: &str) -> Result<Self> {
        let options: Self =
            serde_json::from_str(json).map_err(|e| Error::ConfigError(e.to_string()))?;
        if !options.article_path.contains("$1") {
            return Err(Error::ConfigError(format!(
                "article path {:?} has no $1 placeholder",
                options.article_path
            )));
        }
        Ok(options)
    }

    /// Namespace id for a title prefix, if the prefix names a namespace.
    #[must_use]
    pub fn namespace_for_prefix(&self, prefix: &str) -> Option<i32> {
        let wanted = prefix.replace('_', " ");
        self.namespace_names
            .iter()
            .find(|(_, name)| name.eq_ignore_ascii_case(&wanted))
            .map(|(id, _)| *id)
            .or_else(|| {
                self.namespace_aliases
                    .iter()
                    .find(|(alias, _)| alias.replace('_', " ").eq_ignore_ascii_case(&wanted))
                    .map(|(_, id)| *id)
            })
    }

    /// Display prefix of a namespace, without the colon. Empty for the main
    /// namespace and unknown ids.
    #[must_use]
    pub fn namespace_name(&self, namespace: i32) -> &str {
        self.namespace_names
            .get(&namespace)
            .map_or("", String::as_str)
    }
}

impl Default for Options {
    fn default() -> Self {
        let namespace_names = [
            (NS_TALK, "Talk"),
            (NS_USER, "User"),
            (NS_USER_TALK, "User talk"),
            (NS_PROJECT, "Project"),
            (NS_PROJECT_TALK, "Project talk"),
            (NS_FILE, "File"),
            (NS_FILE_TALK, "File talk"),
            (NS_MEDIAWIKI, "MediaWiki"),
            (NS_MEDIAWIKI_TALK, "MediaWiki talk"),
            (NS_TEMPLATE, "Template"),
            (NS_TEMPLATE_TALK, "Template talk"),
            (NS_HELP, "Help"),
            (NS_HELP_TALK, "Help talk"),
            (NS_CATEGORY, "Category"),
            (NS_CATEGORY_TALK, "Category talk"),
        ]
        .into_iter()
        .map(|(id, name)| (id, name.to_string()))
        .collect();

        let namespace_aliases = [("Image", NS_FILE), ("Image talk", NS_FILE_TALK)]
            .into_iter()
            .map(|(alias, id)| (alias.to_string(), id))
            .collect();

        Self {
            article_path: "/wiki/$1".to_string(),
            namespace_names,
            namespace_aliases,
            capital_links: true,
        }
    }
}
