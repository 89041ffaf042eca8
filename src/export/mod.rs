pub mod csv;
pub mod document;

use crate::core::{AnalysisResult, sanitize_video_id};
use crate::error::Result;
use serde::{Deserialize, Serialize};
use std::fs as std_fs;
use std::path::{Path, PathBuf};

use tokio::fs;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
pub enum ExportFormat {
    Csv,
    Json,
    #[value(name = "md")]
    Markdown,
}

impl ExportFormat {
    pub const ALL: [ExportFormat; 3] = [Self::Csv, Self::Json, Self::Markdown];

    fn prefix(self) -> &'static str {
        match self {
            Self::Csv => "comments_",
            Self::Json => "analysis_",
            Self::Markdown => "report_",
        }
    }

    fn extension(self) -> &'static str {
        match self {
            Self::Csv => ".csv",
            Self::Json => ".json",
            Self::Markdown => ".md",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Csv => "CSV",
            Self::Json => "JSON",
            Self::Markdown => "Report",
        }
    }

    fn from_file_name(name: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|f| name.starts_with(f.prefix()) && name.ends_with(f.extension()))
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExportEntry {
    pub path: PathBuf,
    pub name: String,
    pub format: ExportFormat,
    pub size: u64,
    pub modified: std::time::SystemTime,
}

impl ExportEntry {
    pub fn video_id(&self) -> Option<&str> {
        self.name
            .strip_prefix(self.format.prefix())?
            .strip_suffix(self.format.extension())
    }
}

/// Writes analysis artifacts into a single export directory.
#[derive(Debug, Clone)]
pub struct ExportService {
    dir: PathBuf,
}

impl ExportService {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn export_path(&self, format: ExportFormat, video_id: &str) -> Result<PathBuf> {
        let sanitized = sanitize_video_id(video_id)?;
        Ok(self
            .dir
            .join(format!("{}{sanitized}{}", format.prefix(), format.extension())))
    }

    pub async fn export(&self, result: &AnalysisResult, format: ExportFormat) -> Result<PathBuf> {
        ensure_directory(&self.dir)?;
        let path = self.export_path(format, &result.video_id)?;

        let content = match format {
            ExportFormat::Csv => csv::comments_to_csv(&result.comments),
            ExportFormat::Json => serde_json::to_string_pretty(result)?,
            ExportFormat::Markdown => document::render_markdown(result),
        };

        fs::write(&path, content).await?;
        tracing::info!(path = %path.display(), format = format.label(), "export written");
        Ok(path)
    }

    pub async fn export_all(
        &self,
        result: &AnalysisResult,
        formats: &[ExportFormat],
    ) -> Result<Vec<PathBuf>> {
        let mut paths = Vec::with_capacity(formats.len());
        for &format in formats {
            paths.push(self.export(result, format).await?);
        }
        Ok(paths)
    }

    /// Exported files in the directory, newest first. A missing directory is empty.
    pub fn list_exports(&self) -> Result<Vec<ExportEntry>> {
        let entries = match std_fs::read_dir(&self.dir) {
            Ok(entries) => entries,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e.into()),
        };

        let mut files = Vec::new();
        for entry in entries {
            let entry = entry?;
            let path = entry.path();

            if let Some(name) = path.file_name().and_then(|n| n.to_str())
                && let Some(format) = ExportFormat::from_file_name(name)
            {
                let metadata = entry.metadata()?;
                files.push(ExportEntry {
                    name: name.to_string(),
                    path: path.clone(),
                    format,
                    size: metadata.len(),
                    modified: metadata.modified()?,
                });
            }
        }

        files.sort_by(|a, b| b.modified.cmp(&a.modified));
        Ok(files)
    }
}

fn ensure_directory(path: &Path) -> Result<()> {
    std_fs::create_dir_all(path)?;

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;

        let metadata = std_fs::metadata(path)?;
        let mut permissions = metadata.permissions();
        if permissions.mode() & 0o777 != 0o700 {
            permissions.set_mode(0o700);
            std_fs::set_permissions(path, permissions)?;
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{Comment, SentimentSummary};
    use chrono::{TimeZone, Utc};

    fn result(video_id: &str) -> AnalysisResult {
        AnalysisResult {
            video_id: video_id.into(),
            comments: vec![Comment {
                author: "Ana".into(),
                text: "first, and proud".into(),
                like_count: 1,
                published_at: Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap(),
            }],
            sentiment: SentimentSummary::default(),
            questions: None,
            video: None,
            issues: Vec::new(),
            analyzed_at: Utc.with_ymd_and_hms(2024, 1, 2, 0, 0, 0).unwrap(),
        }
    }

    #[tokio::test]
    async fn writes_every_format_and_lists_them() {
        let tmp = tempfile::tempdir().unwrap();
        let service = ExportService::new(tmp.path().join("out"));

        let paths = service
            .export_all(&result("vid_1"), &ExportFormat::ALL)
            .await
            .unwrap();
        assert_eq!(paths.len(), 3);
        assert!(paths[0].ends_with("comments_vid_1.csv"));
        assert!(paths[1].ends_with("analysis_vid_1.json"));
        assert!(paths[2].ends_with("report_vid_1.md"));

        let json = std::fs::read_to_string(&paths[1]).unwrap();
        let parsed: AnalysisResult = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, result("vid_1"));

        let csv = std::fs::read_to_string(&paths[0]).unwrap();
        assert!(csv.contains("\"first, and proud\""));

        let listed = service.list_exports().unwrap();
        assert_eq!(listed.len(), 3);
        assert!(listed.iter().all(|e| e.video_id() == Some("vid_1")));
    }

    #[tokio::test]
    async fn refuses_unsafe_video_ids() {
        let tmp = tempfile::tempdir().unwrap();
        let service = ExportService::new(tmp.path());
        let err = service
            .export(&result("../escape"), ExportFormat::Csv)
            .await
            .unwrap_err();
        assert!(err.is_validation());
    }

    #[test]
    fn missing_directory_lists_nothing() {
        let tmp = tempfile::tempdir().unwrap();
        let service = ExportService::new(tmp.path().join("never-created"));
        assert!(service.list_exports().unwrap().is_empty());
    }

    #[test]
    fn ignores_unrelated_files() {
        assert_eq!(ExportFormat::from_file_name("notes.txt"), None);
        assert_eq!(
            ExportFormat::from_file_name("report_abc.md"),
            Some(ExportFormat::Markdown)
        );
    }
}
