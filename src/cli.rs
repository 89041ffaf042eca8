use clap::{Parser, Subcommand};
use ytcomments::AppConfig;
use ytcomments::core::SortOrder;
use ytcomments::export::ExportFormat;

#[derive(Parser)]
#[command(name = "ytcomments")]
#[command(about = "YouTube comment analyzer: sentiment, viewer questions and exports")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    #[command(flatten)]
    pub config: AppConfig,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Fetch and analyze the comments of one video
    Analyze {
        /// YouTube video URL or video ID
        video: String,

        /// Order used when printing comments
        #[arg(short, long, value_enum, default_value_t = SortOrder::Newest)]
        sort: SortOrder,

        /// Number of comments to print
        #[arg(short = 'n', long, default_value_t = 10)]
        show: usize,

        /// Formats to export (comma-separated)
        #[arg(short, long, value_enum, value_delimiter = ',')]
        export: Vec<ExportFormat>,
    },

    /// List exported files
    Exports,

    /// Open TUI interface
    Tui,
}
