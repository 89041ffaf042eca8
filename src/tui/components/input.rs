use crossterm::event::{KeyCode, KeyEvent};
use ratatui::{
    Frame,
    layout::Rect,
    style::{Color, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
};

/// Single-line text field. `cursor` counts characters, not bytes.
#[derive(Debug, Clone)]
pub struct InputField {
    pub value: String,
    pub cursor: usize,
    pub placeholder: String,
    pub label: String,
    pub focused: bool,
}

impl InputField {
    pub fn new(label: &str, placeholder: &str) -> Self {
        Self {
            value: String::new(),
            cursor: 0,
            placeholder: placeholder.to_string(),
            label: label.to_string(),
            focused: true,
        }
    }

    fn byte_index(&self, char_idx: usize) -> usize {
        self.value
            .char_indices()
            .nth(char_idx)
            .map(|(i, _)| i)
            .unwrap_or(self.value.len())
    }

    fn char_len(&self) -> usize {
        self.value.chars().count()
    }

    pub fn handle_key(&mut self, key: KeyEvent) -> bool {
        match key.code {
            KeyCode::Char(c) => {
                let at = self.byte_index(self.cursor);
                self.value.insert(at, c);
                self.cursor += 1;
                true
            }
            KeyCode::Backspace => {
                if self.cursor > 0 {
                    self.cursor -= 1;
                    let at = self.byte_index(self.cursor);
                    self.value.remove(at);
                }
                true
            }
            KeyCode::Delete => {
                if self.cursor < self.char_len() {
                    let at = self.byte_index(self.cursor);
                    self.value.remove(at);
                }
                true
            }
            KeyCode::Left => {
                self.cursor = self.cursor.saturating_sub(1);
                true
            }
            KeyCode::Right => {
                self.cursor = (self.cursor + 1).min(self.char_len());
                true
            }
            KeyCode::Home => {
                self.cursor = 0;
                true
            }
            KeyCode::End => {
                self.cursor = self.char_len();
                true
            }
            _ => false,
        }
    }

    /// Insert pasted text at the cursor, dropping line breaks.
    pub fn paste(&mut self, text: &str) {
        for c in text.chars().filter(|c| !matches!(c, '\n' | '\r')) {
            let at = self.byte_index(self.cursor);
            self.value.insert(at, c);
            self.cursor += 1;
        }
    }

    pub fn render(&self, f: &mut Frame, area: Rect) {
        let block = Block::default()
            .borders(Borders::ALL)
            .title(self.label.as_str())
            .border_style(if self.focused {
                Style::default().fg(Color::Yellow)
            } else {
                Style::default().fg(Color::Gray)
            });

        let text = if self.value.is_empty() && !self.focused {
            Line::from(Span::styled(
                &self.placeholder,
                Style::default().fg(Color::DarkGray),
            ))
        } else if self.focused {
            let (before, after) = self.value.split_at(self.byte_index(self.cursor));
            Line::from(vec![
                Span::raw(before),
                Span::styled("│", Style::default().fg(Color::Yellow)),
                Span::raw(after),
            ])
        } else {
            Line::from(Span::raw(&self.value))
        };

        f.render_widget(Paragraph::new(text).block(block), area);
    }

    pub fn clear(&mut self) {
        self.value.clear();
        self.cursor = 0;
    }
}
