//! Fenced Code Block Highlighting
//!
//! Highlights code with syntect using inline styles, so the output carries
//! its own colors and needs no extra stylesheet. Unknown languages, and
//! grammars that fail on a particular input, fall back to escaped plain text.

use std::fmt::Write as _;

use anyhow::{Context, Result};
use once_cell::sync::Lazy;
use pulldown_cmark::escape::escape_html;
use syntect::easy::HighlightLines;
use syntect::highlighting::{Theme, ThemeSet};
use syntect::html::{IncludeBackground, styled_line_to_highlighted_html};
use syntect::parsing::{SyntaxReference, SyntaxSet};
use syntect::util::LinesWithEndings;
use tracing::warn;

static SYNTAXES: Lazy<SyntaxSet> = Lazy::new(SyntaxSet::load_defaults_newlines);
static THEMES: Lazy<ThemeSet> = Lazy::new(ThemeSet::load_defaults);

/// Light theme close to GitHub's rendered code blocks.
const THEME_NAME: &str = "InspiredGitHub";

pub struct CodeBlockHighlighter {
    theme: &'static Theme,
}

impl CodeBlockHighlighter {
    pub fn new() -> Result<Self> {
        let theme = THEMES
            .themes
            .get(THEME_NAME)
            .with_context(|| format!("Highlight theme {THEME_NAME} is not bundled"))?;
        Ok(Self { theme })
    }

    /// Whether `language` (name or file extension) has a bundled grammar.
    pub fn is_known_language(language: &str) -> bool {
        find_syntax(language).is_some()
    }

    /// Renders a complete `<pre><code>` block for `source`.
    ///
    /// The declared language is kept on the `class` attribute even when no
    /// grammar matches it; the body is then plain escaped text.
    pub fn highlight(&self, language: Option<&str>, source: &str) -> Result<String> {
        let mut html = String::with_capacity(source.len() * 2 + 64);
        match language {
            Some(lang) => {
                html.push_str("<pre><code class=\"hljs language-");
                escape_html(&mut html, lang)?;
                html.push_str("\">");
            }
            None => html.push_str("<pre><code class=\"hljs\">"),
        }

        match language.and_then(find_syntax) {
            Some(syntax) => {
                let body = self.highlight_body(syntax, source);
                push_body_or_plain(&mut html, language, source, body)?;
            }
            None => escape_html(&mut html, source)?,
        }

        writeln!(html, "</code></pre>")?;
        Ok(html)
    }
}

impl CodeBlockHighlighter {
    fn highlight_body(&self, syntax: &SyntaxReference, source: &str) -> Result<String> {
        let mut body = String::with_capacity(source.len() * 2);
        let mut lines = HighlightLines::new(syntax, self.theme);
        for line in LinesWithEndings::from(source) {
            let regions = lines.highlight_line(line, &SYNTAXES)?;
            body.push_str(&styled_line_to_highlighted_html(&regions[..], IncludeBackground::No)?);
        }
        Ok(body)
    }
}

/// Appends the highlighted body, or the escaped source when the grammar
/// failed on this input (e.g. a regex hitting its backtrack limit).
fn push_body_or_plain(
    html: &mut String,
    language: Option<&str>,
    source: &str,
    body: Result<String>,
) -> Result<()> {
    match body {
        Ok(body) => html.push_str(&body),
        Err(e) => {
            warn!(language = ?language, error = %e, "Highlighting failed; rendering code block as plain text");
            escape_html(html, source)?;
        }
    }
    Ok(())
}

fn find_syntax(language: &str) -> Option<&'static SyntaxReference> {
    let token = language.trim();
    if token.is_empty() {
        return None;
    }
    SYNTAXES.find_syntax_by_token(token)
}
