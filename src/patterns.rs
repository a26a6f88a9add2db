//! Compiled regex patterns for markup recognition.
//!
//! All patterns are compiled once at first use with `LazyLock`.

#![allow(clippy::expect_used)]

use std::sync::LazyLock;

use regex::Regex;

/// Matches the `about` group id Parsoid assigns to template expansions.
pub static TRANSCLUSION_ABOUT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^#mwt\d+$").expect("TRANSCLUSION_ABOUT regex"));

/// Matches `rel` values of page-property links that render nothing
/// (categories, redirects, interlanguage links).
///
/// Tokens are whitespace separated, so the match is anchored on whitespace
/// or the ends of the attribute value.
pub static SOL_TRANSPARENT_LINK: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?:^|\s)mw:PageProp/(?:Category|redirect|Language)(?:$|\s)")
        .expect("SOL_TRANSPARENT_LINK regex")
});

/// Collapses runs of whitespace in page titles.
pub static TITLE_WHITESPACE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[ \t\n\r\x0C]+").expect("TITLE_WHITESPACE regex"));

/// Characters that can never appear in a page title.
pub static TITLE_ILLEGAL_CHARS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[<>\[\]{}|\x00-\x1F\x7F]").expect("TITLE_ILLEGAL_CHARS regex"));

/// Charset declared in a `<meta>` tag, either `charset=` directly or inside
/// an `http-equiv` content type.
pub static META_CHARSET: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?i)<meta[^>]+charset\s*=\s*["']?([^"'\s>;]+)"#).expect("META_CHARSET regex")
});

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn transclusion_about_matches_parsoid_ids() {
        assert!(TRANSCLUSION_ABOUT.is_match("#mwt1"));
        assert!(TRANSCLUSION_ABOUT.is_match("#mwt12345"));
        assert!(!TRANSCLUSION_ABOUT.is_match("#mwt"));
        assert!(!TRANSCLUSION_ABOUT.is_match("mwt1"));
        assert!(!TRANSCLUSION_ABOUT.is_match("#mwt1x"));
    }

    #[test]
    fn sol_transparent_link_matches_whole_tokens() {
        assert!(SOL_TRANSPARENT_LINK.is_match("mw:PageProp/Category"));
        assert!(SOL_TRANSPARENT_LINK.is_match("foo mw:PageProp/redirect"));
        assert!(SOL_TRANSPARENT_LINK.is_match("mw:PageProp/Language bar"));
        assert!(!SOL_TRANSPARENT_LINK.is_match("mw:PageProp/Categoryx"));
        assert!(!SOL_TRANSPARENT_LINK.is_match("mw:WikiLink"));
    }

    #[test]
    fn meta_charset_finds_both_forms() {
        let direct = META_CHARSET.captures("<META CHARSET=utf-8>").unwrap();
        assert_eq!(&direct[1], "utf-8");

        let http_equiv = META_CHARSET
            .captures(r#"<meta http-equiv="Content-Type" content="text/html; charset=ISO-8859-1">"#)
            .unwrap();
        assert_eq!(&http_equiv[1], "ISO-8859-1");
    }

    #[test]
    fn title_illegal_chars_rejects_brackets() {
        assert!(TITLE_ILLEGAL_CHARS.is_match("Foo[bar]"));
        assert!(TITLE_ILLEGAL_CHARS.is_match("a|b"));
        assert!(!TITLE_ILLEGAL_CHARS.is_match("User talk:Example/Archive 1"));
    }
}
