use std::path::PathBuf;
use std::time::Duration;

use clap::Args;

use crate::core::{
    Analyzer, DEFAULT_API_BASE, DEFAULT_MAX_OUTPUT_TOKENS, DEFAULT_MODEL, FetchLimits,
    OpenAiCompletion, QuestionExtractor, YouTubeClient,
};
use crate::error::{Error, Result};

/// Runtime settings. Every option can also come from the environment (or a `.env` file).
#[derive(Args, Clone)]
pub struct AppConfig {
    /// YouTube Data API key
    #[arg(long, env = "YOUTUBE_API_KEY", hide_env_values = true, global = true)]
    pub youtube_api_key: Option<String>,

    /// OpenAI API key used for question extraction
    #[arg(long, env = "OPENAI_API_KEY", hide_env_values = true, global = true)]
    pub openai_api_key: Option<String>,

    #[arg(long, env = "YOUTUBE_API_BASE", default_value = DEFAULT_API_BASE, global = true)]
    pub youtube_api_base: String,

    #[arg(long, env = "OPENAI_API_BASE", global = true)]
    pub openai_api_base: Option<String>,

    /// Model used for question extraction
    #[arg(long, env = "YTCOMMENTS_MODEL", default_value = DEFAULT_MODEL, global = true)]
    pub model: String,

    #[arg(long, env = "YTCOMMENTS_MAX_OUTPUT_TOKENS", default_value_t = DEFAULT_MAX_OUTPUT_TOKENS, global = true)]
    pub max_output_tokens: u32,

    /// Stop paging comments after this many pages
    #[arg(
        long,
        env = "YTCOMMENTS_MAX_PAGES",
        value_parser = clap::builder::RangedU64ValueParser::<usize>::new().range(1..),
        global = true
    )]
    pub max_pages: Option<usize>,

    /// Stop paging comments once this many have been collected
    #[arg(
        long,
        env = "YTCOMMENTS_MAX_COMMENTS",
        value_parser = clap::builder::RangedU64ValueParser::<usize>::new().range(1..),
        global = true
    )]
    pub max_comments: Option<usize>,

    /// HTTP timeout for YouTube requests, in seconds
    #[arg(long, env = "YTCOMMENTS_TIMEOUT_SECS", global = true)]
    pub timeout_secs: Option<u64>,

    #[arg(long, env = "YTCOMMENTS_EXPORT_DIR", default_value = "exports", global = true)]
    pub export_dir: PathBuf,

    #[arg(long, env = "YTCOMMENTS_LOG_DIR", default_value = "logs", global = true)]
    pub log_dir: PathBuf,

    /// Default log filter when RUST_LOG is unset
    #[arg(long, env = "YTCOMMENTS_LOG_LEVEL", default_value = "info", global = true)]
    pub log_level: String,
}

impl AppConfig {
    pub fn limits(&self) -> FetchLimits {
        FetchLimits {
            max_pages: self.max_pages,
            max_comments: self.max_comments,
        }
    }

    pub fn youtube_client(&self) -> Result<YouTubeClient> {
        let key = required(self.youtube_api_key.as_deref(), "YOUTUBE_API_KEY")?;
        YouTubeClient::new(
            &self.youtube_api_base,
            key,
            self.timeout_secs.map(Duration::from_secs),
        )
    }

    pub fn completion(&self) -> Result<OpenAiCompletion> {
        let key = required(self.openai_api_key.as_deref(), "OPENAI_API_KEY")?;
        Ok(OpenAiCompletion::new(
            key,
            self.openai_api_base.as_deref(),
            &self.model,
        ))
    }

    pub fn analyzer(&self) -> Result<Analyzer<OpenAiCompletion>> {
        Ok(Analyzer::new(
            self.youtube_client()?,
            QuestionExtractor::new(self.completion()?, self.max_output_tokens),
            self.limits(),
        ))
    }
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field(
                "youtube_api_key",
                &self.youtube_api_key.as_ref().map(|_| "[redacted]"),
            )
            .field(
                "openai_api_key",
                &self.openai_api_key.as_ref().map(|_| "[redacted]"),
            )
            .field("youtube_api_base", &self.youtube_api_base)
            .field("openai_api_base", &self.openai_api_base)
            .field("model", &self.model)
            .field("max_output_tokens", &self.max_output_tokens)
            .field("max_pages", &self.max_pages)
            .field("max_comments", &self.max_comments)
            .field("timeout_secs", &self.timeout_secs)
            .field("export_dir", &self.export_dir)
            .field("log_dir", &self.log_dir)
            .field("log_level", &self.log_level)
            .finish()
    }
}

fn required<'a>(value: Option<&'a str>, var: &str) -> Result<&'a str> {
    match value.map(str::trim) {
        Some(v) if !v.is_empty() => Ok(v),
        _ => Err(Error::custom(format!(
            "{var} is not set. Export it or add it to a .env file."
        ))),
    }
}
