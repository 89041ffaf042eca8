use crossterm::event::{KeyCode, KeyEvent};
use pulldown_cmark::{Event, HeadingLevel, Parser, Tag, TagEnd};
use ratatui::{
    Frame,
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
};

/// Scrollable read-only view of a Markdown document.
pub struct Viewer {
    pub title: String,
    pub lines: Vec<Line<'static>>,
    pub scroll: usize,
}

impl Viewer {
    pub fn new(markdown: &str, title: String) -> Self {
        Self {
            title,
            lines: markdown_lines(markdown),
            scroll: 0,
        }
    }

    pub fn handle_key(&mut self, key: KeyEvent, area_height: u16) -> bool {
        let page_size = (area_height as usize).saturating_sub(2).max(1);
        let max_scroll = self.lines.len().saturating_sub(page_size);
        match key.code {
            KeyCode::Up => self.scroll = self.scroll.saturating_sub(1),
            KeyCode::Down => self.scroll = (self.scroll + 1).min(max_scroll),
            KeyCode::PageUp => self.scroll = self.scroll.saturating_sub(page_size),
            KeyCode::PageDown => self.scroll = (self.scroll + page_size).min(max_scroll),
            KeyCode::Home => self.scroll = 0,
            KeyCode::End => self.scroll = max_scroll,
            _ => return false,
        }
        true
    }

    pub fn render(&self, f: &mut Frame, area: Rect) {
        let visible = area.height.saturating_sub(2) as usize;
        let total = self.lines.len();
        let scroll_info = if total > visible {
            format!(
                " (lines {}-{} of {})",
                self.scroll + 1,
                (self.scroll + visible).min(total),
                total
            )
        } else {
            String::new()
        };

        let block = Block::default()
            .borders(Borders::ALL)
            .title(format!("{}{scroll_info}", self.title));

        let lines: Vec<Line> = self
            .lines
            .iter()
            .skip(self.scroll)
            .take(visible)
            .cloned()
            .collect();

        f.render_widget(
            Paragraph::new(lines).block(block).wrap(Wrap { trim: false }),
            area,
        );
    }
}

/// Convert Markdown into styled terminal lines: headings, numbered and bulleted lists,
/// bold and italic spans. Everything else is shown as plain text.
pub fn markdown_lines(markdown: &str) -> Vec<Line<'static>> {
    let mut lines: Vec<Line<'static>> = Vec::new();
    let mut spans: Vec<Span<'static>> = Vec::new();
    let mut styles: Vec<Style> = vec![Style::default()];
    let mut lists: Vec<Option<u64>> = Vec::new();

    let flush = |lines: &mut Vec<Line<'static>>, spans: &mut Vec<Span<'static>>| {
        if !spans.is_empty() {
            lines.push(Line::from(std::mem::take(spans)));
        }
    };

    for event in Parser::new(markdown) {
        let current = styles.last().copied().unwrap_or_default();
        match event {
            Event::Start(Tag::Heading { level, .. }) => {
                flush(&mut lines, &mut spans);
                let color = if level == HeadingLevel::H1 {
                    Color::Magenta
                } else {
                    Color::Yellow
                };
                styles.push(current.fg(color).add_modifier(Modifier::BOLD));
            }
            Event::End(TagEnd::Heading(_)) => {
                styles.pop();
                flush(&mut lines, &mut spans);
                lines.push(Line::default());
            }
            Event::Start(Tag::Strong) => styles.push(current.add_modifier(Modifier::BOLD)),
            Event::Start(Tag::Emphasis) => styles.push(current.add_modifier(Modifier::ITALIC)),
            Event::End(TagEnd::Strong | TagEnd::Emphasis) => {
                styles.pop();
            }
            Event::Start(Tag::List(start)) => {
                flush(&mut lines, &mut spans);
                lists.push(start);
            }
            Event::End(TagEnd::List(_)) => {
                lists.pop();
                if lists.is_empty() {
                    lines.push(Line::default());
                }
            }
            Event::Start(Tag::Item) => {
                flush(&mut lines, &mut spans);
                let indent = "  ".repeat(lists.len().saturating_sub(1));
                let marker = match lists.last_mut() {
                    Some(Some(n)) => {
                        let marker = format!("{indent}{n}. ");
                        *n += 1;
                        marker
                    }
                    _ => format!("{indent}• "),
                };
                spans.push(Span::styled(marker, Style::default().fg(Color::Green)));
            }
            Event::End(TagEnd::Item) => flush(&mut lines, &mut spans),
            Event::End(TagEnd::Paragraph) => {
                flush(&mut lines, &mut spans);
                if lists.is_empty() {
                    lines.push(Line::default());
                }
            }
            Event::Text(text) => spans.push(Span::styled(text.into_string(), current)),
            Event::Code(code) => spans.push(Span::styled(
                code.into_string(),
                current.fg(Color::Cyan),
            )),
            Event::SoftBreak | Event::HardBreak => flush(&mut lines, &mut spans),
            Event::Rule => {
                flush(&mut lines, &mut spans);
                lines.push(Line::from("─".repeat(40)));
            }
            _ => {}
        }
    }
    flush(&mut lines, &mut spans);

    while lines.last().is_some_and(|l| l.spans.is_empty()) {
        lines.pop();
    }
    lines
}
