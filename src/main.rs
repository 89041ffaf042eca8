mod cli;
mod tui;

use std::process::ExitCode;

use crate::cli::{Cli, Commands};
use crate::tui::{App, EventHandler, init as tui_init, restore as tui_restore, ui};
use clap::Parser;
use ytcomments::core::{AnalysisResult, extract_video_id, sorted, window};
use ytcomments::export::{ExportFormat, ExportService};
use ytcomments::{AppConfig, Error, Result, logging};

#[tokio::main]
async fn main() -> ExitCode {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<()> {
    let config = cli.config;

    match cli.command {
        Some(Commands::Analyze {
            video,
            sort,
            show,
            export,
        }) => {
            logging::init_stderr(&config.log_level)?;
            run_cli_analyze(&config, &video, sort, show, &export).await
        }
        Some(Commands::Exports) => {
            logging::init_stderr(&config.log_level)?;
            run_cli_exports(&config)
        }
        Some(Commands::Tui) | None => {
            let _guard = logging::init_file(&config.log_level, &config.log_dir)?;
            run_tui(config).await
        }
    }
}

async fn run_cli_analyze(
    config: &AppConfig,
    video_input: &str,
    sort: ytcomments::core::SortOrder,
    show: usize,
    formats: &[ExportFormat],
) -> Result<()> {
    if video_input.trim().is_empty() {
        return Err(Error::validation("video ID cannot be empty"));
    }
    let video_id = extract_video_id(video_input)
        .ok_or_else(|| Error::validation("not a YouTube video URL or ID"))?;

    println!("Analyzing video: {video_id}");
    let analyzer = config.analyzer()?;
    let result = analyzer.analyze(&video_id).await?;

    print_summary(&result);

    let comments = sorted(&result.comments, sort);
    let shown = window(&comments, 0, show);
    if !shown.is_empty() {
        println!();
        println!(
            "Comments ({} of {}, {}):",
            shown.len(),
            comments.len(),
            sort.label()
        );
        for comment in shown {
            println!(
                "  {} · {} · 👍 {}",
                comment.author,
                comment.published_at.format("%Y-%m-%d %H:%M"),
                comment.like_count
            );
            for line in textwrap::wrap(&comment.plain_text(), 96) {
                println!("    {line}");
            }
        }
    }

    println!();
    match &result.questions {
        Some(report) => {
            println!("Extracted questions:");
            println!("{report}");
        }
        None => println!("Extracted questions: unavailable"),
    }

    if !formats.is_empty() {
        let exporter = ExportService::new(&config.export_dir);
        println!();
        for path in exporter.export_all(&result, formats).await? {
            println!("Exported: {}", path.display());
        }
    }

    Ok(())
}

fn print_summary(result: &AnalysisResult) {
    if let Some(video) = &result.video {
        println!();
        println!("{}", video.title);
        println!(
            "Published {} · {} views · {} likes · {} comments",
            video.published_at.format("%Y-%m-%d"),
            video.view_count,
            video.like_count,
            video.comment_count
        );
    }

    let s = &result.sentiment;
    println!();
    println!("Fetched {} comments", result.comments.len());
    println!(
        "Sentiment: {:.1}% positive · {:.1}% neutral · {:.1}% negative",
        s.positive * 100.0,
        s.neutral * 100.0,
        s.negative * 100.0
    );

    for issue in &result.issues {
        println!("Note: {}", issue.message);
    }
}

fn run_cli_exports(config: &AppConfig) -> Result<()> {
    let files = ExportService::new(&config.export_dir).list_exports()?;

    if files.is_empty() {
        println!("No exports found in {}.", config.export_dir.display());
        return Ok(());
    }

    println!("Found {} files:", files.len());
    println!();

    for file in files {
        let size_kb = file.size / 1024;
        let size_str = if size_kb < 1024 {
            format!("{size_kb}KB")
        } else {
            format!("{:.1}MB", size_kb as f64 / 1024.0)
        };

        println!("{:<8} {:<40} {}", file.format.label(), file.name, size_str);
    }

    Ok(())
}

async fn run_tui(config: AppConfig) -> Result<()> {
    let mut terminal = tui_init()?;

    let mut app = App::new(config);
    let event_handler = EventHandler::new();

    let outcome = loop {
        let event = match event_handler.next_event() {
            Ok(event) => event,
            Err(e) => break Err(e),
        };
        if let Err(e) = app.handle_event(event).await {
            break Err(e);
        }

        if let Err(e) = terminal.draw(|f| ui::draw(f, &mut app)) {
            break Err(e.into());
        }

        if app.should_quit {
            break Ok(());
        }
    };

    tui_restore()?;
    outcome
}
