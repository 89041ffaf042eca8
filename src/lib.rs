//! Fetch the comments of a YouTube video, score their sentiment, extract the questions viewers
//! ask with a language model, and export the result.

pub mod config;
pub mod core;
pub mod error;
pub mod export;
pub mod logging;

pub use config::AppConfig;
pub use error::{Error, Result};
