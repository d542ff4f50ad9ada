use colored::{ColoredString, Colorize};
use pulldown_cmark::{CodeBlockKind, Event, HeadingLevel, Options, Parser, Tag, TagEnd};
use syntect::easy::HighlightLines;
use syntect::highlighting::{Style, ThemeSet};
use syntect::parsing::SyntaxSet;
use syntect::util::as_24_bit_terminal_escaped;

const THEME: &str = "base16-ocean.dark";

/// Renders assistant markdown for the terminal.
pub struct MarkdownRenderer {
    syntax_set: SyntaxSet,
    theme_set: ThemeSet,
}

#[derive(Default)]
struct InlineStyle {
    strong: usize,
    emphasis: usize,
    heading: Option<HeadingLevel>,
}

impl InlineStyle {
    fn apply(&self, text: &str) -> ColoredString {
        let mut styled = text.normal();
        if let Some(level) = self.heading {
            styled = match level {
                HeadingLevel::H1 | HeadingLevel::H2 => styled.bright_cyan().bold(),
                _ => styled.bright_white().bold(),
            };
        }
        if self.strong > 0 {
            styled = styled.bold();
        }
        if self.emphasis > 0 {
            styled = styled.italic();
        }
        styled
    }
}

impl MarkdownRenderer {
    pub fn new() -> Self {
        Self {
            syntax_set: SyntaxSet::load_defaults_newlines(),
            theme_set: ThemeSet::load_defaults(),
        }
    }

    pub fn render(&self, text: &str) -> String {
        let mut out = String::new();
        let mut style = InlineStyle::default();
        // One entry per open list: next number for ordered lists, None for bullets.
        let mut lists: Vec<Option<u64>> = Vec::new();
        let mut code: Option<(String, String)> = None;
        let mut link_targets: Vec<String> = Vec::new();

        for event in Parser::new_ext(text, Options::ENABLE_STRIKETHROUGH) {
            if let Some((_, buffer)) = code.as_mut() {
                match event {
                    Event::Text(body) => {
                        buffer.push_str(&body);
                        continue;
                    }
                    Event::End(TagEnd::CodeBlock) => {}
                    _ => continue,
                }
            }

            match event {
                Event::Start(Tag::Heading { level, .. }) => style.heading = Some(level),
                Event::End(TagEnd::Heading(_)) => {
                    style.heading = None;
                    out.push_str("\n\n");
                }
                Event::End(TagEnd::Paragraph) => {
                    out.push('\n');
                    if lists.is_empty() {
                        out.push('\n');
                    }
                }
                Event::Start(Tag::CodeBlock(kind)) => {
                    let language = match kind {
                        CodeBlockKind::Fenced(info) => {
                            info.split_whitespace().next().unwrap_or("").to_string()
                        }
                        CodeBlockKind::Indented => String::new(),
                    };
                    code = Some((language, String::new()));
                }
                Event::End(TagEnd::CodeBlock) => {
                    if let Some((language, body)) = code.take() {
                        out.push_str(&self.highlight_code(&body, &language));
                        out.push_str("\n\n");
                    }
                }
                Event::Start(Tag::List(start)) => {
                    if !lists.is_empty() && !out.ends_with('\n') {
                        out.push('\n');
                    }
                    lists.push(start);
                }
                Event::End(TagEnd::List(_)) => {
                    lists.pop();
                    if lists.is_empty() {
                        out.push('\n');
                    }
                }
                Event::Start(Tag::Item) => {
                    let depth = lists.len().saturating_sub(1);
                    out.push_str(&"  ".repeat(depth));
                    let marker = match lists.last_mut() {
                        Some(Some(n)) => {
                            let marker = format!("{}.", n);
                            *n += 1;
                            marker
                        }
                        _ => "•".to_string(),
                    };
                    out.push_str(&format!("{} ", marker.bright_cyan()));
                }
                Event::End(TagEnd::Item) => {
                    if !out.ends_with('\n') {
                        out.push('\n');
                    }
                }
                Event::Start(Tag::Strong) => style.strong += 1,
                Event::End(TagEnd::Strong) => style.strong = style.strong.saturating_sub(1),
                Event::Start(Tag::Emphasis) => style.emphasis += 1,
                Event::End(TagEnd::Emphasis) => {
                    style.emphasis = style.emphasis.saturating_sub(1)
                }
                Event::Start(Tag::Link { dest_url, .. }) => link_targets.push(dest_url.to_string()),
                Event::End(TagEnd::Link) => {
                    if let Some(url) = link_targets.pop() {
                        out.push_str(&format!(" ({})", url.dimmed()));
                    }
                }
                Event::Text(text) => out.push_str(&style.apply(&text).to_string()),
                Event::Code(inline) => out.push_str(&inline.bright_cyan().to_string()),
                Event::SoftBreak => out.push('\n'),
                Event::HardBreak => out.push('\n'),
                Event::Rule => {
                    out.push_str(&"─".repeat(40).dimmed().to_string());
                    out.push_str("\n\n");
                }
                Event::Html(html) | Event::InlineHtml(html) => out.push_str(&html),
                _ => {}
            }
        }

        // Unterminated fence: show what we have.
        if let Some((language, body)) = code.take() {
            out.push_str(&self.highlight_code(&body, &language));
        }

        out.trim_end().to_string()
    }

    fn highlight_code(&self, code: &str, language: &str) -> String {
        let syntax = if language.is_empty() {
            self.syntax_set.find_syntax_plain_text()
        } else {
            self.syntax_set
                .find_syntax_by_token(language)
                .or_else(|| self.syntax_set.find_syntax_by_extension(language))
                .unwrap_or_else(|| self.syntax_set.find_syntax_plain_text())
        };

        let theme = &self.theme_set.themes[THEME];
        let mut highlighter = HighlightLines::new(syntax, theme);

        let mut result = String::new();
        result.push_str(&format!("{}\n", "┌─────".dimmed()));

        for line in code.lines() {
            let ranges: Vec<(Style, &str)> = highlighter
                .highlight_line(line, &self.syntax_set)
                .unwrap_or_default();
            let escaped = as_24_bit_terminal_escaped(&ranges[..], false);
            result.push_str(&format!("{}  {}\x1b[0m\n", "│".dimmed(), escaped));
        }

        result.push_str(&format!("{}", "└─────".dimmed()));
        result
    }
}

impl Default for MarkdownRenderer {
    fn default() -> Self {
        Self::new()
    }
}
