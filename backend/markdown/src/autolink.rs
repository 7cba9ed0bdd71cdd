//! Extended Autolinks
//!
//! GitHub turns bare `https://…` and `www.…` URLs, and bare email addresses,
//! in prose into links.
//! pulldown-cmark only recognises `<…>` autolinks, so text runs are scanned
//! here before HTML generation.

use once_cell::sync::Lazy;
use pulldown_cmark::escape::{escape_href, escape_html};
use regex::Regex;

static LINK_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?i)(?P<url>\b(?:https?://|www\.)[^\s<>]+)|(?P<email>[a-z0-9._+-]+@[a-z0-9_-]+(?:\.[a-z0-9_-]+)+)",
    )
    .unwrap()
});

/// Characters that end a sentence rather than a URL.
const TRAILING_PUNCTUATION: &[char] = &['.', ',', ':', ';', '!', '?', '"', '\'', '*', '_', '~'];

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Fragment {
    Text(String),
    Link { href: String, text: String },
}

impl Fragment {
    /// Renders a link fragment as an escaped `<a>` element.
    pub fn to_anchor(href: &str, text: &str) -> String {
        let mut html = String::with_capacity(href.len() + text.len() + 15);
        html.push_str("<a href=\"");
        // Writing into a String cannot fail.
        let _ = escape_href(&mut html, href);
        html.push_str("\">");
        let _ = escape_html(&mut html, text);
        html.push_str("</a>");
        html
    }
}

/// Splits `text` into plain runs and detected links, in order.
pub fn linkify(text: &str) -> Vec<Fragment> {
    let mut fragments = Vec::new();
    let mut cursor = 0;

    for caps in LINK_PATTERN.captures_iter(text) {
        let (start, candidate, href) = if let Some(found) = caps.name("url") {
            let candidate = trim_url(found.as_str());
            let is_www = candidate.len() >= 4 && candidate[..4].eq_ignore_ascii_case("www.");
            let prefix_len = if is_www { 4 } else { candidate.find("://").map_or(0, |i| i + 3) };
            // A bare scheme or `www.` with nothing after it is not a link.
            if candidate.len() <= prefix_len {
                continue;
            }
            let href = if is_www { format!("http://{candidate}") } else { candidate.to_string() };
            (found.start(), candidate, href)
        } else if let Some(found) = caps.name("email") {
            let candidate = trim_url(found.as_str());
            if candidate.ends_with('-') || !candidate.rsplit('@').next().is_some_and(|d| d.contains('.')) {
                continue;
            }
            (found.start(), candidate, format!("mailto:{candidate}"))
        } else {
            continue;
        };

        if start > cursor {
            fragments.push(Fragment::Text(text[cursor..start].to_string()));
        }
        fragments.push(Fragment::Link { href, text: candidate.to_string() });
        cursor = start + candidate.len();
    }

    if cursor < text.len() {
        fragments.push(Fragment::Text(text[cursor..].to_string()));
    }
    fragments
}

/// Drops trailing punctuation and unbalanced closing parentheses.
fn trim_url(url: &str) -> &str {
    let mut end = url.len();
    loop {
        let current = &url[..end];
        let Some(last) = current.chars().last() else { break };
        if TRAILING_PUNCTUATION.contains(&last) {
            end -= last.len_utf8();
        } else if last == ')' && current.matches(')').count() > current.matches('(').count() {
            end -= 1;
        } else {
            break;
        }
    }
    &url[..end]
}
