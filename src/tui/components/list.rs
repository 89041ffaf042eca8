use crossterm::event::{KeyCode, KeyEvent, MouseEvent, MouseEventKind};
use ratatui::{
    Frame,
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState},
};
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};
use ytcomments::core::Comment;

const AUTHOR_WIDTH: usize = 22;

/// Scrollable list over the comments currently in view.
pub struct CommentList {
    pub items: Vec<Comment>,
    pub state: ListState,
    viewport_size: usize,
}

impl CommentList {
    pub fn new() -> Self {
        Self {
            items: Vec::new(),
            state: ListState::default(),
            viewport_size: 0,
        }
    }

    pub fn handle_key(&mut self, key: KeyEvent) -> bool {
        match key.code {
            KeyCode::Up => self.step_back(1, true),
            KeyCode::Down => self.step_forward(1, true),
            KeyCode::PageUp => self.step_back(self.viewport_size.max(1), false),
            KeyCode::PageDown => self.step_forward(self.viewport_size.max(1), false),
            KeyCode::Home => self.select(0),
            KeyCode::End => self.select(self.items.len().saturating_sub(1)),
            _ => return false,
        }
        true
    }

    pub fn handle_mouse(&mut self, mouse: MouseEvent) -> bool {
        match mouse.kind {
            MouseEventKind::ScrollUp => self.step_back(1, false),
            MouseEventKind::ScrollDown => self.step_forward(1, false),
            _ => return false,
        }
        true
    }

    fn step_forward(&mut self, step: usize, wrap: bool) {
        if self.items.is_empty() {
            return;
        }
        let current = self.state.selected().unwrap_or(0);
        let last = self.items.len() - 1;
        let next = if wrap && current == last {
            0
        } else {
            (current + step).min(last)
        };
        self.select(next);
    }

    fn step_back(&mut self, step: usize, wrap: bool) {
        if self.items.is_empty() {
            return;
        }
        let current = self.state.selected().unwrap_or(0);
        let next = if wrap && current == 0 {
            self.items.len() - 1
        } else {
            current.saturating_sub(step)
        };
        self.select(next);
    }

    fn select(&mut self, index: usize) {
        if self.items.is_empty() {
            return;
        }
        self.state.select(Some(index.min(self.items.len() - 1)));
        self.adjust_offset();
    }

    pub fn selected(&self) -> Option<&Comment> {
        self.state.selected().and_then(|i| self.items.get(i))
    }

    /// Replace the items, keeping the selection index when it is still in range.
    pub fn update_items(&mut self, items: Vec<Comment>) {
        let current = self.state.selected();
        self.items = items;

        if self.items.is_empty() {
            self.state.select(None);
        } else {
            let index = current.unwrap_or(0).min(self.items.len() - 1);
            self.state.select(Some(index));
        }
        self.adjust_offset();
    }

    pub fn reset(&mut self) {
        self.items.clear();
        self.state = ListState::default();
    }

    pub fn render(&mut self, f: &mut Frame, area: Rect, title: &str) {
        self.viewport_size = (area.height.saturating_sub(2) as usize).max(1);
        self.adjust_offset();

        let text_width = (area.width as usize).saturating_sub(AUTHOR_WIDTH + 16);
        let items: Vec<ListItem> = self
            .items
            .iter()
            .map(|comment| {
                let first_line = comment.plain_text();
                let first_line = first_line.lines().next().unwrap_or_default();
                ListItem::new(Line::from(vec![
                    Span::styled(
                        pad_to_width(&comment.author, AUTHOR_WIDTH),
                        Style::default().fg(Color::Cyan),
                    ),
                    Span::styled(
                        format!(" {:>6} ", format!("👍{}", comment.like_count)),
                        Style::default().fg(Color::Blue),
                    ),
                    Span::raw(truncate_to_width(first_line, text_width)),
                ]))
            })
            .collect();

        let list = List::new(items)
            .block(Block::default().borders(Borders::ALL).title(title))
            .highlight_style(
                Style::default()
                    .bg(Color::DarkGray)
                    .add_modifier(Modifier::BOLD),
            );

        f.render_stateful_widget(list, area, &mut self.state);
    }

    fn adjust_offset(&mut self) {
        if self.items.is_empty() {
            *self.state.offset_mut() = 0;
            return;
        }

        let viewport = self.viewport_size.max(1);
        let selected = self.state.selected().unwrap_or(0).min(self.items.len() - 1);
        let max_offset = self.items.len().saturating_sub(viewport);
        let mut offset = self.state.offset().min(max_offset);

        if selected < offset {
            offset = selected;
        } else if selected >= offset + viewport {
            offset = selected + 1 - viewport;
        }
        *self.state.offset_mut() = offset;
    }
}

impl Default for CommentList {
    fn default() -> Self {
        Self::new()
    }
}

/// Cut `text` to at most `width` terminal columns, marking the cut with an ellipsis.
pub fn truncate_to_width(text: &str, width: usize) -> String {
    if text.width() <= width {
        return text.to_string();
    }
    let mut out = String::new();
    let mut used = 0;
    for c in text.chars() {
        let w = c.width().unwrap_or(0);
        if used + w + 1 > width {
            break;
        }
        out.push(c);
        used += w;
    }
    if width > 0 {
        out.push('…');
    }
    out
}

fn pad_to_width(text: &str, width: usize) -> String {
    let mut out = truncate_to_width(text, width);
    let pad = width.saturating_sub(out.width());
    out.extend(std::iter::repeat_n(' ', pad));
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use crossterm::event::KeyModifiers;

    fn comments(n: usize) -> Vec<Comment> {
        (0..n)
            .map(|i| Comment {
                author: format!("user{i}"),
                text: format!("comment {i}"),
                like_count: i as u64,
                published_at: Utc::now(),
            })
            .collect()
    }

    #[test]
    fn truncates_wide_characters_by_columns() {
        assert_eq!(truncate_to_width("short", 10), "short");
        assert_eq!(truncate_to_width("abcdefgh", 5), "abcd…");
        // each CJK character is two columns wide
        assert_eq!(truncate_to_width("日本語テキスト", 7), "日本語…");
        assert_eq!(pad_to_width("ab", 4), "ab  ");
    }

    #[test]
    fn navigation_wraps_and_clamps() {
        let mut list = CommentList::new();
        list.update_items(comments(3));
        assert_eq!(list.state.selected(), Some(0));

        list.handle_key(KeyEvent::new(KeyCode::Up, KeyModifiers::NONE));
        assert_eq!(list.state.selected(), Some(2));
        list.handle_key(KeyEvent::new(KeyCode::Down, KeyModifiers::NONE));
        assert_eq!(list.state.selected(), Some(0));
        list.handle_key(KeyEvent::new(KeyCode::End, KeyModifiers::NONE));
        assert_eq!(list.selected().map(|c| c.author.as_str()), Some("user2"));

        list.update_items(comments(1));
        assert_eq!(list.state.selected(), Some(0));
        list.update_items(Vec::new());
        assert_eq!(list.state.selected(), None);
    }
}
