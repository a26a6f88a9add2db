use talkpage_threads::dom::Document;
use talkpage_threads::{
    parse, ArticlePathResolver, NodeRef, Options, Range, ThreadItem, TranscludedFrom,
};

fn select<'a>(doc: &'a Document, selector: &str) -> NodeRef<'a> {
    doc.select(selector)
        .nodes()
        .first()
        .copied()
        .unwrap_or_else(|| panic!("no node matches {selector}"))
}

fn comment_over<'a>(doc: &'a Document, first: &str, last: &str) -> ThreadItem<'a> {
    let range = Range::spanning(select(doc, first), select(doc, last)).expect("valid range");
    ThreadItem::new_comment(0, range, "Example", None, Vec::new())
}

fn transcluded_from(item: &ThreadItem) -> TranscludedFrom {
    let resolver = ArticlePathResolver::new(Options::default()).expect("default article path");
    item.transcluded_from(&resolver).expect("consistent tree")
}

fn single_template(href: &str) -> String {
    format!(
        r#"{{"parts":[{{"template":{{"target":{{"wt":"x","href":"{href}"}},"params":{{}},"i":0}}}}]}}"#
    )
}

#[test]
fn native_paragraph_is_not_transcluded() {
    let doc = parse("<p id=\"c\">Hello [[User:Example]] 12:00, 1 May 2021 (UTC)</p>");
    let item = comment_over(&doc, "#c", "#c");

    assert_eq!(transcluded_from(&item), TranscludedFrom::NotTranscluded);
}

#[test]
fn whole_page_from_user_subpage_names_the_page() {
    let html = format!(
        "<p id=\"a\" about=\"#mwt1\" typeof=\"mw:Transclusion\" data-mw='{}'>Hello</p><p id=\"b\" about=\"#mwt1\">Example 12:00</p>",
        single_template("./User:Example/Archive_1")
    );
    let doc = parse(&html);
    let item = comment_over(&doc, "#a", "#b");

    assert_eq!(
        transcluded_from(&item),
        TranscludedFrom::Page("User:Example/Archive 1".to_string())
    );
}

#[test]
fn whole_page_from_template_is_ambiguous() {
    // A single comment exactly matching a Template-namespace transclusion may
    // be a wrapper template used on this page. It must not be attributed to
    // the template page.
    let html = format!(
        "<p id=\"a\" about=\"#mwt1\" typeof=\"mw:Transclusion\" data-mw='{}'>Hello</p><p id=\"b\" about=\"#mwt1\">Example 12:00</p>",
        single_template("./Template:Foo")
    );
    let doc = parse(&html);
    let item = comment_over(&doc, "#a", "#b");

    assert_eq!(transcluded_from(&item), TranscludedFrom::NotTranscluded);
}

#[test]
fn comment_inside_larger_transclusion_names_the_page() {
    let html = format!(
        "<div id=\"t\" about=\"#mwt1\" typeof=\"mw:Transclusion\" data-mw='{}'><h3>Box</h3><p id=\"c\">Comment 12:00</p></div>",
        single_template("./User:Example/Box")
    );
    let doc = parse(&html);
    let item = comment_over(&doc, "#c", "#c");

    assert_eq!(
        transcluded_from(&item),
        TranscludedFrom::Page("User:Example/Box".to_string())
    );
}

#[test]
fn comment_inside_parser_function_output_is_unknown() {
    let doc = parse(
        r##"<div id="t" about="#mwt1" typeof="mw:Transclusion" data-mw='{"parts":[{"template":{"target":{"wt":"#if:1","function":"if"},"params":{}}}]}'><h3>Box</h3><p id="c">Comment 12:00</p></div>"##,
    );
    let item = comment_over(&doc, "#c", "#c");

    assert_eq!(transcluded_from(&item), TranscludedFrom::Unknown);
}

#[test]
fn partial_overlap_is_unknown() {
    let html = format!(
        "<p id=\"a\" about=\"#mwt1\" typeof=\"mw:Transclusion\" data-mw='{}'>One</p><p id=\"b\" about=\"#mwt1\">Two</p><p id=\"c\">Three 12:00</p>",
        single_template("./User:Example/Part")
    );
    let doc = parse(&html);
    let item = comment_over(&doc, "#b", "#c");

    assert_eq!(transcluded_from(&item), TranscludedFrom::Unknown);
}

#[test]
fn multi_part_exact_match_is_unknown() {
    let doc = parse(
        r##"<p id="a" about="#mwt1" typeof="mw:Transclusion" data-mw='{"parts":["intro ",{"template":{"target":{"wt":"Sig","href":"./Template:Sig"},"params":{}}}]}'>intro Example 12:00</p>"##,
    );
    let item = comment_over(&doc, "#a", "#a");

    assert_eq!(transcluded_from(&item), TranscludedFrom::Unknown);
}

#[test]
fn inline_template_at_comment_start_is_not_transclusion() {
    let html = format!(
        "<p id=\"c\"><span about=\"#mwt1\" typeof=\"mw:Transclusion\" data-mw='{}'>@Someone</span> thanks, Example 12:00</p>",
        single_template("./Template:Ping")
    );
    let doc = parse(&html);
    let p = select(&doc, "#c");
    let range = Range::new(p, 0, p, 2).expect("valid range");
    let item = ThreadItem::new_comment(0, range, "Example", None, Vec::new());

    assert_eq!(transcluded_from(&item), TranscludedFrom::NotTranscluded);
}

#[test]
fn trailing_tracking_comment_still_matches_exactly() {
    let html = format!(
        "<p id=\"a\" about=\"#mwt1\" typeof=\"mw:Transclusion\" data-mw='{}'>Hello</p><p id=\"b\" about=\"#mwt1\">Example 12:00</p><br><!-- tracking -->",
        single_template("./User:Example/Only")
    );
    let doc = parse(&html);
    let a = select(&doc, "#a");
    let parent = a.parent().expect("body");
    let range = Range::new(parent, 0, parent, 4).expect("valid range");
    let item = ThreadItem::new_comment(0, range, "Example", None, Vec::new());

    assert_eq!(
        transcluded_from(&item),
        TranscludedFrom::Page("User:Example/Only".to_string())
    );
}

#[test]
fn inline_template_then_partial_overlap_is_unknown() {
    let html = format!(
        "<p id=\"a\"><span about=\"#mwt1\" typeof=\"mw:Transclusion\" data-mw='{}'>@Someone</span> hi</p>\
<p id=\"b\" about=\"#mwt2\" typeof=\"mw:Transclusion\" data-mw='{}'>Example 12:00</p>\
<p id=\"c\" about=\"#mwt2\">more</p>",
        single_template("./Template:Ping"),
        single_template("./User:Example/Sub")
    );
    let doc = parse(&html);
    let a = select(&doc, "#a");
    let body = a.parent().expect("body");
    let range = Range::new(a, 0, body, 2).expect("valid range");
    let item = ThreadItem::new_comment(0, range, "Example", None, Vec::new());

    assert_eq!(transcluded_from(&item), TranscludedFrom::Unknown);
}

#[test]
fn template_wrapper_defers_to_inner_transclusion() {
    let html = format!(
        "<div id=\"w\" about=\"#mwt1\" typeof=\"mw:Transclusion\" data-mw='{}'><br>\
<p id=\"b\" about=\"#mwt2\" typeof=\"mw:Transclusion\" data-mw='{}'>Example 12:00</p></div>",
        single_template("./Template:Foo"),
        single_template("./User:Example/Sig")
    );
    let doc = parse(&html);
    let w = select(&doc, "#w");
    let range = Range::new(w, 0, w, 2).expect("valid range");
    let item = ThreadItem::new_comment(0, range, "Example", None, Vec::new());

    assert_eq!(
        transcluded_from(&item),
        TranscludedFrom::Page("User:Example/Sig".to_string())
    );
}
