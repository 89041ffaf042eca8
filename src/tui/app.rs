use crate::tui::components::{CommentList, InputField, ProgressBar, Viewer};
use crate::tui::events::AppEvent;
use crossterm::event::{KeyCode, KeyEvent};
use tokio::sync::mpsc;
use ytcomments::core::{AnalysisResult, SortOrder, Stage, extract_video_id, sorted, window};
use ytcomments::export::{ExportFormat, ExportService};
use ytcomments::{AppConfig, Result};

/// Comments added to the view each time the user asks for more.
pub const COMMENT_PAGE: usize = 50;

#[derive(Debug, Clone, PartialEq)]
pub enum AppState {
    Input,
    Processing { video_id: String },
    Results { tab: ResultTab },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResultTab {
    Overview,
    Comments,
    Questions,
}

impl ResultTab {
    pub const ALL: [ResultTab; 3] = [Self::Overview, Self::Comments, Self::Questions];

    pub fn title(self) -> &'static str {
        match self {
            Self::Overview => "Overview",
            Self::Comments => "Comments",
            Self::Questions => "Questions",
        }
    }

    fn next(self) -> Self {
        match self {
            Self::Overview => Self::Comments,
            Self::Comments => Self::Questions,
            Self::Questions => Self::Overview,
        }
    }
}

/// Messages from the background analysis task, tagged with the run they belong to.
#[derive(Debug)]
pub enum Update {
    Stage(u64, Stage),
    Finished(u64, Box<AnalysisResult>),
    Failed(u64, String),
}

pub struct App {
    pub state: AppState,
    pub should_quit: bool,
    config: AppConfig,

    // Input screen
    pub video_input: InputField,
    pub error: Option<String>,

    // Processing screen
    pub progress_bar: ProgressBar,
    run: u64,

    // Results screen
    pub result: Option<AnalysisResult>,
    pub sort: SortOrder,
    pub visible: usize,
    pub comment_list: CommentList,
    pub question_viewer: Option<Viewer>,
    pub viewer_height: u16,
    pub status: Option<String>,

    exporter: ExportService,
    updates_tx: mpsc::UnboundedSender<Update>,
    updates_rx: mpsc::UnboundedReceiver<Update>,
}

impl App {
    pub fn new(config: AppConfig) -> Self {
        let (updates_tx, updates_rx) = mpsc::unbounded_channel();
        let exporter = ExportService::new(&config.export_dir);

        Self {
            state: AppState::Input,
            should_quit: false,
            config,

            video_input: InputField::new("Video URL or ID", "https://youtu.be/..."),
            error: None,

            progress_bar: ProgressBar::new(),
            run: 0,

            result: None,
            sort: SortOrder::Newest,
            visible: COMMENT_PAGE,
            comment_list: CommentList::new(),
            question_viewer: None,
            viewer_height: 0,
            status: None,

            exporter,
            updates_tx,
            updates_rx,
        }
    }

    pub async fn handle_event(&mut self, event: AppEvent) -> Result<()> {
        self.drain_updates();
        match event {
            AppEvent::Quit => self.should_quit = true,
            AppEvent::Key(key) => self.handle_key(key).await?,
            AppEvent::Mouse(mouse) => {
                if matches!(
                    self.state,
                    AppState::Results {
                        tab: ResultTab::Comments
                    }
                ) {
                    self.comment_list.handle_mouse(mouse);
                }
            }
            AppEvent::Paste(text) => {
                if self.state == AppState::Input {
                    self.video_input.paste(&text);
                }
            }
            AppEvent::Tick => {}
        }
        Ok(())
    }

    async fn handle_key(&mut self, key: KeyEvent) -> Result<()> {
        match self.state.clone() {
            AppState::Input => self.handle_input_key(key),
            AppState::Processing { .. } => {
                if key.code == KeyCode::Esc {
                    // The task keeps running; its messages are ignored from now on.
                    self.run += 1;
                    self.progress_bar.reset();
                    self.state = AppState::Input;
                }
            }
            AppState::Results { tab } => self.handle_results_key(key, tab).await?,
        }
        Ok(())
    }

    fn handle_input_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Esc => self.should_quit = true,
            KeyCode::Enter => self.start_analysis(),
            _ => {
                self.video_input.handle_key(key);
            }
        }
    }

    async fn handle_results_key(&mut self, key: KeyEvent, tab: ResultTab) -> Result<()> {
        match key.code {
            KeyCode::Char('q') => self.should_quit = true,
            KeyCode::Esc | KeyCode::Char('n') => {
                self.state = AppState::Input;
                self.video_input.clear();
            }
            KeyCode::Tab => self.state = AppState::Results { tab: tab.next() },
            KeyCode::Char('1') => self.state = AppState::Results { tab: ResultTab::Overview },
            KeyCode::Char('2') => self.state = AppState::Results { tab: ResultTab::Comments },
            KeyCode::Char('3') => self.state = AppState::Results { tab: ResultTab::Questions },
            KeyCode::Char('e') => self.export_all().await,
            KeyCode::Char('s') if tab == ResultTab::Comments => {
                self.sort = self.sort.next();
                self.refresh_comments();
            }
            KeyCode::Char('m') if tab == ResultTab::Comments => {
                self.visible = self.visible.saturating_add(COMMENT_PAGE);
                self.refresh_comments();
            }
            _ => match tab {
                ResultTab::Comments => {
                    self.comment_list.handle_key(key);
                }
                ResultTab::Questions => {
                    if let Some(viewer) = &mut self.question_viewer {
                        viewer.handle_key(key, self.viewer_height);
                    }
                }
                ResultTab::Overview => {}
            },
        }
        Ok(())
    }

    fn start_analysis(&mut self) {
        self.error = None;
        if self.video_input.value.trim().is_empty() {
            self.error = Some("Enter a video URL or ID".to_string());
            return;
        }
        let Some(video_id) = extract_video_id(&self.video_input.value) else {
            self.error = Some("Not a YouTube video URL or ID".to_string());
            return;
        };

        let analyzer = match self.config.analyzer() {
            Ok(analyzer) => analyzer,
            Err(e) => {
                self.error = Some(e.to_string());
                return;
            }
        };

        // A new analysis discards the previous result entirely.
        self.result = None;
        self.question_viewer = None;
        self.comment_list.reset();
        self.status = None;
        self.sort = SortOrder::Newest;
        self.visible = COMMENT_PAGE;

        self.run += 1;
        let run = self.run;
        self.progress_bar.reset();
        self.progress_bar.add_log(&format!("Starting analysis of {video_id}"));
        self.state = AppState::Processing {
            video_id: video_id.clone(),
        };

        let tx = self.updates_tx.clone();
        tokio::spawn(async move {
            let stage_tx = tx.clone();
            let outcome = analyzer
                .analyze_with_progress(&video_id, move |stage| {
                    if stage_tx.send(Update::Stage(run, stage)).is_err() {
                        tracing::debug!(run, "progress receiver gone");
                    }
                })
                .await;

            let update = match outcome {
                Ok(result) => Update::Finished(run, Box::new(result)),
                Err(e) => Update::Failed(run, e.to_string()),
            };
            if tx.send(update).is_err() {
                tracing::debug!(run, "result receiver gone, dropping analysis outcome");
            }
        });
    }

    fn drain_updates(&mut self) {
        while let Ok(update) = self.updates_rx.try_recv() {
            match update {
                Update::Stage(run, stage) if run == self.run => self.progress_bar.advance(stage),
                Update::Finished(run, result) if run == self.run => self.show_result(*result),
                Update::Failed(run, message) if run == self.run => {
                    tracing::warn!(error = %message, "analysis failed");
                    self.progress_bar.reset();
                    self.error = Some(message);
                    self.state = AppState::Input;
                }
                _ => tracing::debug!("dropping update from abandoned analysis"),
            }
        }
    }

    fn show_result(&mut self, result: AnalysisResult) {
        self.question_viewer = result.questions.as_ref().map(|report| {
            Viewer::new(report.as_str(), format!("Questions: {}", result.video_id))
        });
        self.result = Some(result);
        self.refresh_comments();
        self.state = AppState::Results {
            tab: ResultTab::Overview,
        };
    }

    /// Rebuild the list from the stored result using the current order and window.
    fn refresh_comments(&mut self) {
        let Some(result) = &self.result else {
            return;
        };
        let ordered = sorted(&result.comments, self.sort);
        let shown = window(&ordered, 0, self.visible).to_vec();
        self.comment_list.update_items(shown);
    }

    async fn export_all(&mut self) {
        let Some(result) = &self.result else {
            return;
        };
        self.status = Some(match self.exporter.export_all(result, &ExportFormat::ALL).await {
            Ok(paths) => format!(
                "Exported {} files to {}",
                paths.len(),
                self.exporter.dir().display()
            ),
            Err(e) => format!("Export failed: {e}"),
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use clap::Parser;
    use crossterm::event::KeyModifiers;
    use ytcomments::core::{Comment, SentimentSummary};

    #[derive(Parser)]
    struct Harness {
        #[command(flatten)]
        config: AppConfig,
    }

    fn app() -> App {
        App::new(Harness::parse_from(["test"]).config)
    }

    fn result(n: usize) -> AnalysisResult {
        AnalysisResult {
            video_id: "abc".into(),
            comments: (0..n)
                .map(|i| Comment {
                    author: format!("user{i}"),
                    text: "text".into(),
                    like_count: (n - i) as u64,
                    published_at: Utc.with_ymd_and_hms(2024, 1, 1, 0, i as u32 % 60, 0).unwrap(),
                })
                .collect(),
            sentiment: SentimentSummary::default(),
            questions: None,
            video: None,
            issues: Vec::new(),
            analyzed_at: Utc::now(),
        }
    }

    fn press(code: KeyCode) -> AppEvent {
        AppEvent::Key(KeyEvent::new(code, KeyModifiers::NONE))
    }

    #[tokio::test]
    async fn empty_input_shows_error_without_leaving_screen() {
        let mut app = app();
        app.handle_event(press(KeyCode::Enter)).await.unwrap();
        assert_eq!(app.state, AppState::Input);
        assert!(app.error.is_some());
    }

    #[tokio::test]
    async fn results_window_grows_and_resorts() {
        let mut app = app();
        app.show_result(result(COMMENT_PAGE + 10));
        assert_eq!(app.comment_list.items.len(), COMMENT_PAGE);

        app.handle_event(press(KeyCode::Char('2'))).await.unwrap();
        app.handle_event(press(KeyCode::Char('m'))).await.unwrap();
        assert_eq!(app.comment_list.items.len(), COMMENT_PAGE + 10);

        app.handle_event(press(KeyCode::Char('s'))).await.unwrap();
        app.handle_event(press(KeyCode::Char('s'))).await.unwrap();
        assert_eq!(app.sort, SortOrder::MostLiked);
        assert_eq!(app.comment_list.items[0].author, "user0");
    }

    #[tokio::test]
    async fn stale_updates_are_ignored() {
        let mut app = app();
        app.run = 2;
        app.updates_tx
            .send(Update::Finished(1, Box::new(result(1))))
            .unwrap();
        app.handle_event(AppEvent::Tick).await.unwrap();
        assert!(app.result.is_none());
        assert_eq!(app.state, AppState::Input);
    }
}
