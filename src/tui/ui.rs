use crate::tui::app::{App, AppState, ResultTab};
use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Tabs, Wrap},
};
use ytcomments::core::{AnalysisResult, AnalysisStep, IssueKind};

pub fn draw(f: &mut Frame, app: &mut App) {
    match app.state.clone() {
        AppState::Input => draw_input(f, app),
        AppState::Processing { video_id } => draw_processing(f, app, &video_id),
        AppState::Results { tab } => draw_results(f, app, tab),
    }
}

fn title_bar(text: &str) -> Paragraph<'_> {
    Paragraph::new(text)
        .style(
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        )
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL))
}

fn help_bar(text: &str) -> Paragraph<'_> {
    Paragraph::new(text)
        .style(Style::default().fg(Color::Gray))
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL))
}

fn draw_input(f: &mut Frame, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Title
            Constraint::Length(3), // Video input
            Constraint::Min(1),    // Error
            Constraint::Length(3), // Help
        ])
        .split(f.area());

    f.render_widget(title_bar("YouTube Comment Analyzer"), chunks[0]);
    app.video_input.render(f, chunks[1]);

    if let Some(error) = &app.error {
        f.render_widget(
            Paragraph::new(error.as_str())
                .style(Style::default().fg(Color::Red))
                .wrap(Wrap { trim: true }),
            chunks[2],
        );
    }

    f.render_widget(help_bar("[Enter] Analyze  [Esc] Exit"), chunks[3]);
}

fn draw_processing(f: &mut Frame, app: &App, video_id: &str) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Title
            Constraint::Min(1),    // Progress area
            Constraint::Length(3), // Help
        ])
        .split(f.area());

    f.render_widget(title_bar("Analyzing..."), chunks[0]);
    app.progress_bar.render(f, chunks[1], video_id);
    f.render_widget(help_bar("[Esc] Cancel"), chunks[2]);
}

fn draw_results(f: &mut Frame, app: &mut App, tab: ResultTab) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Tabs
            Constraint::Min(1),    // Content
            Constraint::Length(1), // Status
            Constraint::Length(3), // Help
        ])
        .split(f.area());

    let selected = ResultTab::ALL.iter().position(|t| *t == tab).unwrap_or(0);
    let tabs = Tabs::new(
        ResultTab::ALL
            .iter()
            .enumerate()
            .map(|(i, t)| format!("{} {}", i + 1, t.title())),
    )
    .block(Block::default().borders(Borders::ALL))
    .select(selected)
    .highlight_style(
        Style::default()
            .fg(Color::Yellow)
            .add_modifier(Modifier::BOLD),
    );
    f.render_widget(tabs, chunks[0]);

    let help = match tab {
        ResultTab::Overview => "[Tab/1-3] Switch  [e] Export  [n] New  [q] Exit",
        ResultTab::Comments => {
            "[↑↓] Move  [s] Sort  [m] More  [Tab/1-3] Switch  [e] Export  [n] New  [q] Exit"
        }
        ResultTab::Questions => "[↑↓/PgUp/PgDn] Scroll  [Tab/1-3] Switch  [e] Export  [n] New  [q] Exit",
    };

    match tab {
        ResultTab::Overview => {
            if let Some(result) = &app.result {
                draw_overview(f, result, chunks[1]);
            }
        }
        ResultTab::Comments => {
            let total = app.result.as_ref().map_or(0, |r| r.comments.len());
            let title = format!(
                "Comments ({} of {}, {})",
                app.comment_list.items.len(),
                total,
                app.sort.label()
            );
            let panes = Layout::default()
                .direction(Direction::Vertical)
                .constraints([Constraint::Min(5), Constraint::Length(8)])
                .split(chunks[1]);
            app.comment_list.render(f, panes[0], &title);
            draw_selected_comment(f, app, panes[1]);
        }
        ResultTab::Questions => match &app.question_viewer {
            Some(viewer) => {
                app.viewer_height = chunks[1].height;
                viewer.render(f, chunks[1]);
            }
            None => {
                let reason = app
                    .result
                    .as_ref()
                    .and_then(|r| r.issue(AnalysisStep::Questions))
                    .map_or("Questions unavailable", |issue| issue.message.as_str());
                f.render_widget(
                    Paragraph::new(reason)
                        .style(Style::default().fg(Color::Red))
                        .wrap(Wrap { trim: true })
                        .block(Block::default().borders(Borders::ALL).title("Questions")),
                    chunks[1],
                );
            }
        },
    }

    if let Some(status) = &app.status {
        f.render_widget(
            Paragraph::new(status.as_str()).style(Style::default().fg(Color::Green)),
            chunks[2],
        );
    }

    f.render_widget(help_bar(help), chunks[3]);
}

fn draw_selected_comment(f: &mut Frame, app: &App, area: Rect) {
    let (title, body) = match app.comment_list.selected() {
        Some(comment) => (
            format!(
                "{} · {} · 👍 {}",
                comment.author,
                comment.published_at.format("%Y-%m-%d %H:%M"),
                comment.like_count
            ),
            comment.plain_text(),
        ),
        None => ("Comment".to_string(), "No comments".to_string()),
    };

    f.render_widget(
        Paragraph::new(body)
            .wrap(Wrap { trim: false })
            .block(Block::default().borders(Borders::ALL).title(title)),
        area,
    );
}

fn draw_overview(f: &mut Frame, result: &AnalysisResult, area: Rect) {
    let label = Style::default().fg(Color::Cyan);
    let mut lines = Vec::new();

    match &result.video {
        Some(video) => {
            lines.push(Line::from(Span::styled(
                video.title.clone(),
                Style::default().add_modifier(Modifier::BOLD),
            )));
            lines.push(Line::from(vec![
                Span::styled("Published: ", label),
                Span::raw(video.published_at.format("%Y-%m-%d").to_string()),
            ]));
            lines.push(Line::from(vec![
                Span::styled("Views: ", label),
                Span::raw(video.view_count.to_string()),
                Span::styled("  Likes: ", label),
                Span::raw(video.like_count.to_string()),
                Span::styled("  Comments: ", label),
                Span::raw(video.comment_count.to_string()),
            ]));
        }
        None => lines.push(Line::from(Span::styled(
            format!("Video {}", result.video_id),
            Style::default().add_modifier(Modifier::BOLD),
        ))),
    }

    let s = &result.sentiment;
    lines.push(Line::default());
    lines.push(Line::from(vec![
        Span::styled("Fetched: ", label),
        Span::raw(format!("{} comments", result.comments.len())),
    ]));
    for (name, share, count, color) in [
        ("Positive", s.positive, s.positive_count, Color::Green),
        ("Neutral ", s.neutral, s.neutral_count, Color::Gray),
        ("Negative", s.negative, s.negative_count, Color::Red),
    ] {
        let bar = "█".repeat((share * 30.0).round() as usize);
        lines.push(Line::from(vec![
            Span::styled(format!("{name} {:>5.1}% ", share * 100.0), label),
            Span::styled(bar, Style::default().fg(color)),
            Span::raw(format!(" {count}")),
        ]));
    }

    if !result.issues.is_empty() {
        lines.push(Line::default());
        for issue in &result.issues {
            let color = match issue.kind {
                IssueKind::NotFound => Color::Yellow,
                IssueKind::Failed => Color::Red,
            };
            lines.push(Line::from(Span::styled(
                issue.message.clone(),
                Style::default().fg(color),
            )));
        }
    }

    lines.push(Line::default());
    lines.push(Line::from(Span::styled(
        format!("Analyzed {}", result.analyzed_at.format("%Y-%m-%d %H:%M:%S UTC")),
        Style::default().fg(Color::DarkGray),
    )));

    f.render_widget(
        Paragraph::new(lines)
            .wrap(Wrap { trim: false })
            .block(Block::default().borders(Borders::ALL).title("Overview")),
        area,
    );
}
