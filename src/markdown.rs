//! Markdown rendering: a pure function from a markdown string to an HTML
//! fragment. Plain CommonMark with no extension options, so the same input
//! always produces the same fragment, and malformed markdown degrades per
//! CommonMark rules rather than failing.

use pulldown_cmark::{html, Parser};

/// Converts `markdown` into an HTML fragment.
pub fn to_html(markdown: &str) -> String {
    let mut fragment = String::new();
    html::push_html(&mut fragment, Parser::new(markdown));
    fragment
}
