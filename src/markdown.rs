//! Discord Markdown Preview
//!
//! Renders message text roughly the way Discord shows it. Extends
//! pulldown-cmark with:
//! - Spoilers: `||hidden||`, also around formatting (`||**bold**||`)
//! - Mention chips: `<@id>`, `<@!id>`, `<@&id>`, `<#id>`
//! - Template variables: `{member_name}`
//! - Syntax highlighting for fenced code (syntect)
//!
//! Raw HTML in the source is shown as text, as Discord does.

use pulldown_cmark::{html::push_html, CodeBlockKind, CowStr, Event, Options, Parser, Tag, TagEnd};
use std::sync::OnceLock;
use syntect::highlighting::{Theme, ThemeSet};
use syntect::html::highlighted_html_for_string;
use syntect::parsing::SyntaxSet;

/// Syntax highlighter resources (lazy loaded)
static SYNTAX_SET: OnceLock<SyntaxSet> = OnceLock::new();
static THEME_SET: OnceLock<ThemeSet> = OnceLock::new();

const THEME: &str = "InspiredGitHub";

const SPOILER_OPEN: &str = r#"<span class="spoiler">"#;
const SPOILER_CLOSE: &str = "</span>";

fn get_syntax_set() -> &'static SyntaxSet {
    SYNTAX_SET.get_or_init(SyntaxSet::load_defaults_newlines)
}

fn get_theme() -> Option<&'static Theme> {
    THEME_SET.get_or_init(ThemeSet::load_defaults).themes.get(THEME)
}

/// Render message text to HTML for preview panes
pub fn render_discord(text: &str) -> String {
    let parser = Parser::new_ext(text, Options::ENABLE_STRIKETHROUGH);
    let events = transform_events(parser);
    let mut html_output = String::new();
    push_html(&mut html_output, events.into_iter());
    html_output
}

enum State {
    Normal,
    InCodeBlock { lang: Option<String>, content: String },
}

fn transform_events<'a>(parser: Parser<'a>) -> Vec<Event<'a>> {
    let mut events = Vec::new();
    let mut state = State::Normal;
    // Adjacent text fragments are merged so tokens split by the parser still match
    let mut pending = String::new();

    for event in parser {
        match state {
            State::Normal => match event {
                Event::Text(t) | Event::Html(t) | Event::InlineHtml(t) => pending.push_str(&t),
                other => {
                    flush_text(&mut pending, &mut events);
                    match other {
                        Event::Start(Tag::CodeBlock(kind)) => {
                            let lang = match kind {
                                CodeBlockKind::Fenced(l) if !l.is_empty() => Some(l.to_string()),
                                _ => None,
                            };
                            state = State::InCodeBlock { lang, content: String::new() };
                        }
                        // Discord keeps single newlines
                        Event::SoftBreak => events.push(Event::HardBreak),
                        other => events.push(other),
                    }
                }
            },

            State::InCodeBlock { ref lang, ref mut content } => match event {
                Event::Text(t) => content.push_str(&t),
                Event::End(TagEnd::CodeBlock) => {
                    let html = highlight_code(content, lang.as_deref());
                    events.push(Event::Html(CowStr::from(html)));
                    state = State::Normal;
                }
                _ => {}
            },
        }
    }
    flush_text(&mut pending, &mut events);

    pair_spoilers(events)
}

fn flush_text<'a>(pending: &mut String, events: &mut Vec<Event<'a>>) {
    if !pending.is_empty() {
        let text = std::mem::take(pending);
        events.extend(process_text_events(&text));
    }
}

// ========================
// Spoilers across inline tags
// ========================

/// `||` markers left over in separate text runs of one block (split by
/// `**`, `~~` or links) are paired up in order; an odd last marker stays text.
fn pair_spoilers(events: Vec<Event<'_>>) -> Vec<Event<'_>> {
    let mut out = Vec::with_capacity(events.len());
    let mut run = Vec::new();
    for event in events {
        if is_inline(&event) {
            run.push(event);
        } else {
            close_run(&mut run, &mut out);
            out.push(event);
        }
    }
    close_run(&mut run, &mut out);
    out
}

fn is_inline(event: &Event<'_>) -> bool {
    match event {
        Event::Start(tag) => matches!(
            tag,
            Tag::Emphasis | Tag::Strong | Tag::Strikethrough | Tag::Link { .. } | Tag::Image { .. }
        ),
        Event::End(tag) => matches!(
            tag,
            TagEnd::Emphasis | TagEnd::Strong | TagEnd::Strikethrough | TagEnd::Link | TagEnd::Image
        ),
        _ => true,
    }
}

fn close_run<'a>(run: &mut Vec<Event<'a>>, out: &mut Vec<Event<'a>>) {
    let markers: usize = run
        .iter()
        .map(|e| match e {
            Event::Text(t) => t.matches("||").count(),
            _ => 0,
        })
        .sum();
    let mut remaining = markers - markers % 2;
    let mut open = false;

    for event in run.drain(..) {
        match event {
            Event::Text(t) if remaining > 0 && t.contains("||") => {
                let text = t.to_string();
                let mut pieces = text.split("||");
                if let Some(first) = pieces.next() {
                    push_text(out, first);
                }
                for piece in pieces {
                    if remaining > 0 {
                        remaining -= 1;
                        let tag = if open { SPOILER_CLOSE } else { SPOILER_OPEN };
                        out.push(Event::Html(CowStr::from(tag)));
                        open = !open;
                    } else {
                        push_text(out, "||");
                    }
                    push_text(out, piece);
                }
            }
            other => out.push(other),
        }
    }
}

fn push_text<'a>(out: &mut Vec<Event<'a>>, text: &str) {
    if !text.is_empty() {
        out.push(Event::Text(CowStr::from(text.to_string())));
    }
}

fn highlight_code(code: &str, lang: Option<&str>) -> String {
    let ss = get_syntax_set();
    let Some(theme) = get_theme() else {
        return plain_code(code);
    };

    let syntax = lang
        .and_then(|l| ss.find_syntax_by_token(l))
        .unwrap_or_else(|| ss.find_syntax_plain_text());

    highlighted_html_for_string(code, ss, syntax, theme).unwrap_or_else(|_| plain_code(code))
}

fn plain_code(code: &str) -> String {
    format!("<pre><code>{}</code></pre>", escape_html(code))
}

/// Split text into plain runs and custom-syntax HTML
fn process_text_events<'a>(text: &str) -> Vec<Event<'a>> {
    let mut events = Vec::new();
    let mut plain = String::new();
    let mut rest = text;

    while let Some(c) = rest.chars().next() {
        match match_token(rest) {
            Some((token, used)) => {
                if !plain.is_empty() {
                    events.push(Event::Text(CowStr::from(std::mem::take(&mut plain))));
                }
                match token {
                    Token::Spoiler(inner) => {
                        events.push(Event::Html(CowStr::from(SPOILER_OPEN)));
                        events.extend(process_text_events(inner));
                        events.push(Event::Html(CowStr::from(SPOILER_CLOSE)));
                    }
                    Token::Html(html) => events.push(Event::Html(CowStr::from(html))),
                }
                rest = &rest[used..];
            }
            None => {
                plain.push(c);
                rest = &rest[c.len_utf8()..];
            }
        }
    }
    if !plain.is_empty() {
        events.push(Event::Text(CowStr::from(plain)));
    }
    events
}

enum Token<'a> {
    Spoiler(&'a str),
    Html(String),
}

/// Recognize a token at the start of `text`, returning it and its byte length
fn match_token(text: &str) -> Option<(Token<'_>, usize)> {
    if let Some(body) = text.strip_prefix("||") {
        let end = body.find("||")?;
        if end == 0 {
            return None;
        }
        return Some((Token::Spoiler(&body[..end]), end + 4));
    }
    if let Some(body) = text.strip_prefix("<@&") {
        let (id, used) = digits_until_close(body)?;
        let html = format!(r#"<span class="mention mention-role">@&amp;{id}</span>"#);
        return Some((Token::Html(html), 3 + used));
    }
    if let Some(body) = text.strip_prefix("<@") {
        let body_start = if body.starts_with('!') { 1 } else { 0 };
        let (id, used) = digits_until_close(&body[body_start..])?;
        let html = format!(r#"<span class="mention mention-user">@{id}</span>"#);
        return Some((Token::Html(html), 2 + body_start + used));
    }
    if let Some(body) = text.strip_prefix("<#") {
        let (id, used) = digits_until_close(body)?;
        let html = format!(r#"<span class="mention mention-channel">#{id}</span>"#);
        return Some((Token::Html(html), 2 + used));
    }
    if let Some(body) = text.strip_prefix('{') {
        let end = body.find('}')?;
        let name = &body[..end];
        if !is_variable_name(name) {
            return None;
        }
        let html = format!(r#"<span class="tpl-var">{{{name}}}</span>"#);
        return Some((Token::Html(html), end + 2));
    }
    None
}

/// `123>` → (`"123"`, 4)
fn digits_until_close(text: &str) -> Option<(&str, usize)> {
    let end = text.find('>')?;
    let id = &text[..end];
    if id.is_empty() || !id.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    Some((id, end + 1))
}

fn is_variable_name(name: &str) -> bool {
    let mut chars = name.chars();
    matches!(chars.next(), Some(c) if c.is_ascii_alphabetic() || c == '_')
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

pub fn escape_html(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_markdown() {
        let html = render_discord("**欢迎** ~~旧~~");
        assert!(html.contains("<strong>欢迎</strong>"));
        assert!(html.contains("<del>旧</del>"));
    }

    #[test]
    fn mentions_become_chips() {
        let html = render_discord("你好 <@123>，请看 <#456> 并找 <@&789>");
        assert!(html.contains(r#"<span class="mention mention-user">@123</span>"#));
        assert!(html.contains(r#"<span class="mention mention-channel">#456</span>"#));
        assert!(html.contains(r#"<span class="mention mention-role">@&amp;789</span>"#));
    }

    #[test]
    fn nickname_mention_and_invalid_id() {
        let html = render_discord("<@!42> <@abc>");
        assert!(html.contains(r#"mention-user">@42<"#));
        assert!(html.contains("&lt;@abc&gt;"));
    }

    #[test]
    fn spoilers_wrap_inner_tokens() {
        let html = render_discord("答案是 ||<@1> 赢了||");
        assert!(html.contains(r#"<span class="spoiler"><span class="mention mention-user">@1</span> 赢了</span>"#));
        assert!(render_discord("||未闭合").contains("||未闭合"));
    }

    #[test]
    fn spoiler_around_formatting() {
        let html = render_discord("||**重要**||");
        assert!(html.contains(r#"<span class="spoiler"><strong>重要</strong></span>"#), "{html}");

        let html = render_discord("看 ||~~旧~~ 和 **新**|| 吧");
        assert!(html.contains(r#"看 <span class="spoiler"><del>旧</del> 和 <strong>新</strong></span> 吧"#), "{html}");
    }

    #[test]
    fn lone_marker_beside_formatting_stays_text() {
        let html = render_discord("a || **b**");
        assert!(html.contains("||"));
        assert!(!html.contains("spoiler"));
    }

    #[test]
    fn spoiler_markers_do_not_pair_across_paragraphs() {
        let html = render_discord("||**一**\n\n**二**||");
        assert!(!html.contains("spoiler"), "{html}");
    }

    #[test]
    fn template_variables_highlighted() {
        let html = render_discord("欢迎 {member_mention} 来到 {guild_name}! {不是变量} {}");
        assert!(html.contains(r#"<span class="tpl-var">{member_mention}</span>"#));
        assert!(html.contains(r#"<span class="tpl-var">{guild_name}</span>"#));
        assert!(html.contains("{不是变量}"));
    }

    #[test]
    fn raw_html_is_escaped() {
        let html = render_discord("<script>alert(1)</script>");
        assert!(!html.contains("<script>"));
        assert!(html.contains("&lt;script&gt;"));
    }

    #[test]
    fn single_newlines_are_kept() {
        let html = render_discord("第一行\n第二行");
        assert!(html.contains("<br />"));
    }

    #[test]
    fn code_blocks_are_highlighted() {
        let html = render_discord("```rust\nfn main() {}\n```");
        assert!(html.contains("<pre"));
        assert!(!html.contains("tpl-var"));
    }
}
