//! Markdown to HTML Renderer
//!
//! Streams pulldown-cmark events into HTML, swapping fenced code blocks for
//! highlighted markup and bare URLs for links along the way.

use anyhow::Result;
use pulldown_cmark::{CodeBlockKind, Event, Options, Parser, Tag, html};

use crate::autolink::{self, Fragment};
use crate::code_block::CodeBlockHighlighter;

/// GitHub-Flavored Markdown extensions enabled on every parse.
///
/// Soft line breaks stay soft: a single newline never becomes `<br>`.
pub fn gfm_options() -> Options {
    Options::ENABLE_TABLES
        | Options::ENABLE_STRIKETHROUGH
        | Options::ENABLE_TASKLISTS
        | Options::ENABLE_FOOTNOTES
}

struct CodeBuffer {
    language: Option<String>,
    source: String,
}

pub struct MarkdownRenderer {
    options: Options,
}

impl MarkdownRenderer {
    pub fn new() -> Self {
        Self { options: gfm_options() }
    }

    /// Renders `markdown` into an HTML fragment (no `<html>`/`<body>` wrapper).
    pub fn to_html(&self, markdown: &str) -> Result<String> {
        let highlighter = CodeBlockHighlighter::new()?;
        let mut events: Vec<Event<'_>> = Vec::new();
        let mut pending_text = String::new();
        let mut link_depth = 0usize;
        let mut code: Option<CodeBuffer> = None;

        for event in Parser::new_ext(markdown, self.options) {
            if let Some(block) = code.as_mut() {
                match event {
                    Event::Text(text) => {
                        block.source.push_str(&text);
                        continue;
                    }
                    Event::End(Tag::CodeBlock(_)) => {
                        let html = highlighter.highlight(block.language.as_deref(), &block.source)?;
                        events.push(Event::Html(html.into()));
                    }
                    _ => continue,
                }
                code = None;
                continue;
            }

            // Adjacent text events are merged so URLs are scanned whole.
            if let Event::Text(text) = &event {
                pending_text.push_str(text);
                continue;
            }
            flush_text(&mut pending_text, link_depth == 0, &mut events);

            match event {
                Event::Start(Tag::CodeBlock(kind)) => {
                    code = Some(CodeBuffer { language: fence_language(&kind), source: String::new() });
                }
                Event::Start(tag @ (Tag::Link(..) | Tag::Image(..))) => {
                    link_depth += 1;
                    events.push(Event::Start(tag));
                }
                Event::End(tag @ (Tag::Link(..) | Tag::Image(..))) => {
                    link_depth = link_depth.saturating_sub(1);
                    events.push(Event::End(tag));
                }
                other => events.push(other),
            }
        }
        flush_text(&mut pending_text, link_depth == 0, &mut events);

        let mut out = String::with_capacity(markdown.len() * 3 / 2);
        html::push_html(&mut out, events.into_iter());
        Ok(out)
    }
}

impl Default for MarkdownRenderer {
    fn default() -> Self {
        Self::new()
    }
}

/// First whitespace-separated token of a fence's info string.
fn fence_language(kind: &CodeBlockKind<'_>) -> Option<String> {
    match kind {
        CodeBlockKind::Fenced(info) => info.split_whitespace().next().map(str::to_owned),
        CodeBlockKind::Indented => None,
    }
}

fn flush_text(pending: &mut String, linkify: bool, events: &mut Vec<Event<'_>>) {
    if pending.is_empty() {
        return;
    }
    let text = std::mem::take(pending);
    if !linkify {
        events.push(Event::Text(text.into()));
        return;
    }
    for fragment in autolink::linkify(&text) {
        match fragment {
            Fragment::Text(t) => events.push(Event::Text(t.into())),
            Fragment::Link { href, text } => {
                events.push(Event::Html(Fragment::to_anchor(&href, &text).into()))
            }
        }
    }
}
