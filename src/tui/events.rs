use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseEvent};
use std::time::Duration;
use ytcomments::Result;

#[derive(Debug, Clone)]
pub enum AppEvent {
    Quit,
    Key(KeyEvent),
    Mouse(MouseEvent),
    Paste(String),
    Tick,
}

pub struct EventHandler {
    tick_rate: Duration,
}

impl EventHandler {
    pub fn new() -> Self {
        Self {
            tick_rate: Duration::from_millis(100),
        }
    }

    pub fn next_event(&self) -> Result<AppEvent> {
        if !event::poll(self.tick_rate)? {
            return Ok(AppEvent::Tick);
        }

        Ok(match event::read()? {
            Event::Key(key)
                if key.code == KeyCode::Char('c')
                    && key.modifiers.contains(KeyModifiers::CONTROL) =>
            {
                AppEvent::Quit
            }
            // Windows reports both press and release.
            Event::Key(key) if key.kind == KeyEventKind::Press => AppEvent::Key(key),
            Event::Mouse(mouse) => AppEvent::Mouse(mouse),
            Event::Paste(text) => AppEvent::Paste(text),
            _ => AppEvent::Tick,
        })
    }
}
