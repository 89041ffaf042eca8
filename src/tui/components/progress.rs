use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Gauge, Paragraph},
};
use ytcomments::core::Stage;

const MAX_LOGS: usize = 12;

pub struct ProgressBar {
    pub progress: f64,
    pub message: String,
    pub logs: Vec<String>,
}

impl ProgressBar {
    pub fn new() -> Self {
        Self {
            progress: 0.0,
            message: String::new(),
            logs: Vec::new(),
        }
    }

    pub fn advance(&mut self, stage: Stage) {
        self.progress = stage.progress().clamp(0.0, 1.0);
        self.message = stage.label().to_string();
        self.add_log(stage.label());
    }

    pub fn add_log(&mut self, log: &str) {
        let timestamp = chrono::Local::now().format("%H:%M:%S");
        self.logs.push(format!("[{timestamp}] {log}"));

        if self.logs.len() > MAX_LOGS {
            self.logs.remove(0);
        }
    }

    pub fn render(&self, f: &mut Frame, area: Rect, video_id: &str) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(1), // Video ID
                Constraint::Length(3), // Gauge
                Constraint::Length(1), // Status
                Constraint::Min(1),    // Log
            ])
            .split(area);

        f.render_widget(
            Paragraph::new(format!("Video: {video_id}")).style(Style::default().fg(Color::White)),
            chunks[0],
        );

        let gauge = Gauge::default()
            .block(Block::default().borders(Borders::ALL).title("Progress"))
            .gauge_style(Style::default().fg(Color::Green))
            .ratio(self.progress);
        f.render_widget(gauge, chunks[1]);

        f.render_widget(
            Paragraph::new(self.message.as_str()).style(Style::default().fg(Color::Yellow)),
            chunks[2],
        );

        let log_lines: Vec<Line> = self
            .logs
            .iter()
            .map(|log| Line::from(Span::raw(log.as_str())))
            .collect();
        f.render_widget(
            Paragraph::new(log_lines).block(Block::default().borders(Borders::ALL).title("Log")),
            chunks[3],
        );
    }

    pub fn reset(&mut self) {
        self.progress = 0.0;
        self.message.clear();
        self.logs.clear();
    }
}

impl Default for ProgressBar {
    fn default() -> Self {
        Self::new()
    }
}
