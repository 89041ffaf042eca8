//! Client for the YouTube Data API v3 `commentThreads` and `videos` endpoints.

use std::time::Duration;

use chrono::{DateTime, Utc};
use reqwest::Client;
use serde::Deserialize;
use serde::de::DeserializeOwned;

use crate::core::models::{Comment, VideoInfo};
use crate::error::{Result, TransportError};

pub const DEFAULT_API_BASE: &str = "https://www.googleapis.com/youtube/v3";

/// Largest page size `commentThreads.list` accepts.
pub const MAX_PAGE_SIZE: u32 = 100;

/// Optional ceilings for the comment pagination loop. Both default to uncapped.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FetchLimits {
    pub max_pages: Option<usize>,
    pub max_comments: Option<usize>,
}

#[derive(Debug, Clone, Default)]
pub struct CommentPage {
    pub comments: Vec<Comment>,
    pub next_page_token: Option<String>,
}

#[derive(Clone)]
pub struct YouTubeClient {
    client: Client,
    base_url: String,
    api_key: String,
}

impl YouTubeClient {
    pub fn new(base_url: &str, api_key: &str, timeout: Option<Duration>) -> Result<Self> {
        let mut builder = Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        Ok(Self {
            client: builder.build()?,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
        })
    }

    /// Fetch one page of top-level comments, newest first as ordered by the API.
    pub async fn fetch_comments_page(
        &self,
        video_id: &str,
        page_token: Option<&str>,
    ) -> Result<CommentPage> {
        let max_results = MAX_PAGE_SIZE.to_string();
        let mut query = vec![
            ("part", "snippet"),
            ("videoId", video_id),
            ("maxResults", max_results.as_str()),
            ("order", "time"),
            ("textFormat", "html"),
        ];
        if let Some(token) = page_token {
            query.push(("pageToken", token));
        }

        let response: CommentThreadListResponse =
            self.get_json("commentThreads", &query, "comment page").await?;

        Ok(CommentPage {
            comments: response.items.into_iter().map(Comment::from).collect(),
            next_page_token: response.next_page_token.filter(|t| !t.is_empty()),
        })
    }

    /// Follow continuation tokens until the API stops returning one, or a limit is hit.
    ///
    /// Any page failure discards the comments gathered so far and returns the error.
    pub async fn fetch_all_comments(
        &self,
        video_id: &str,
        limits: FetchLimits,
    ) -> Result<Vec<Comment>> {
        if limits.max_pages == Some(0) || limits.max_comments == Some(0) {
            tracing::warn!(video_id, "zero fetch cap, no comments requested");
            return Ok(Vec::new());
        }

        let mut comments = Vec::new();
        let mut page_token: Option<String> = None;
        let mut pages = 0usize;

        loop {
            let page = self
                .fetch_comments_page(video_id, page_token.as_deref())
                .await?;
            pages += 1;
            tracing::debug!(
                video_id,
                page = pages,
                count = page.comments.len(),
                "fetched comment page"
            );
            comments.extend(page.comments);

            if let Some(max) = limits.max_comments
                && comments.len() >= max
            {
                if page.next_page_token.is_some() || comments.len() > max {
                    tracing::warn!(video_id, max_comments = max, "comment cap reached, stopping");
                }
                comments.truncate(max);
                break;
            }

            page_token = page.next_page_token;
            if page_token.is_none() {
                break;
            }

            if let Some(max) = limits.max_pages
                && pages >= max
            {
                tracing::warn!(video_id, max_pages = max, "page cap reached, stopping");
                break;
            }
        }

        tracing::info!(video_id, pages, count = comments.len(), "comment fetch complete");
        Ok(comments)
    }

    /// Look up title, statistics and thumbnail. `None` when the API knows no such video.
    pub async fn fetch_video_info(&self, video_id: &str) -> Result<Option<VideoInfo>> {
        let query = [("part", "snippet,statistics"), ("id", video_id)];
        let response: VideoListResponse = self.get_json("videos", &query, "video").await?;

        let Some(item) = response.items.into_iter().next() else {
            tracing::info!(video_id, "video lookup returned no items");
            return Ok(None);
        };

        let stats = item.statistics;
        Ok(Some(VideoInfo {
            title: item.snippet.title,
            view_count: parse_statistic("viewCount", stats.view_count)?,
            like_count: parse_statistic("likeCount", stats.like_count)?,
            comment_count: parse_statistic("commentCount", stats.comment_count)?,
            published_at: item.snippet.published_at,
            thumbnail_url: item.snippet.thumbnails.best_url(),
        }))
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        resource: &str,
        query: &[(&str, &str)],
        context: &'static str,
    ) -> Result<T> {
        let url = format!("{}/{resource}", self.base_url);
        let response = self
            .client
            .get(&url)
            .query(query)
            .query(&[("key", self.api_key.as_str())])
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            let message = serde_json::from_str::<ApiErrorResponse>(&body)
                .map(|e| e.error.message)
                .ok()
                .filter(|m| !m.is_empty())
                .unwrap_or_else(|| {
                    status
                        .canonical_reason()
                        .unwrap_or("unexpected status")
                        .to_string()
                });
            return Err(TransportError::Status {
                status: status.as_u16(),
                message,
            }
            .into());
        }

        serde_json::from_str(&body)
            .map_err(|source| TransportError::Malformed { context, source }.into())
    }
}

fn parse_statistic(field: &'static str, value: Option<String>) -> Result<u64> {
    let Some(value) = value else {
        return Ok(0);
    };
    match value.trim().parse() {
        Ok(n) => Ok(n),
        Err(_) => Err(TransportError::InvalidStatistic { field, value }.into()),
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CommentThreadListResponse {
    #[serde(default)]
    items: Vec<CommentThread>,
    next_page_token: Option<String>,
}

#[derive(Debug, Deserialize)]
struct CommentThread {
    snippet: CommentThreadSnippet,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CommentThreadSnippet {
    top_level_comment: TopLevelComment,
}

#[derive(Debug, Deserialize)]
struct TopLevelComment {
    snippet: CommentSnippet,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CommentSnippet {
    #[serde(default)]
    author_display_name: String,
    #[serde(default)]
    text_display: String,
    #[serde(default)]
    like_count: u64,
    published_at: DateTime<Utc>,
}

impl From<CommentThread> for Comment {
    fn from(thread: CommentThread) -> Self {
        let snippet = thread.snippet.top_level_comment.snippet;
        Self {
            author: snippet.author_display_name,
            text: snippet.text_display,
            like_count: snippet.like_count,
            published_at: snippet.published_at,
        }
    }
}

#[derive(Debug, Deserialize)]
struct VideoListResponse {
    #[serde(default)]
    items: Vec<VideoItem>,
}

#[derive(Debug, Deserialize)]
struct VideoItem {
    snippet: VideoSnippet,
    #[serde(default)]
    statistics: VideoStatistics,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct VideoSnippet {
    #[serde(default)]
    title: String,
    published_at: DateTime<Utc>,
    #[serde(default)]
    thumbnails: Thumbnails,
}

#[derive(Debug, Default, Deserialize)]
struct Thumbnails {
    default: Option<Thumbnail>,
    medium: Option<Thumbnail>,
    high: Option<Thumbnail>,
}

impl Thumbnails {
    fn best_url(self) -> String {
        self.high
            .or(self.medium)
            .or(self.default)
            .map(|t| t.url)
            .unwrap_or_default()
    }
}

#[derive(Debug, Deserialize)]
struct Thumbnail {
    url: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct VideoStatistics {
    view_count: Option<String>,
    like_count: Option<String>,
    comment_count: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ApiErrorResponse {
    error: ApiErrorBody,
}

#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    #[serde(default)]
    message: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_statistic_defaults_to_zero() {
        assert_eq!(parse_statistic("likeCount", None).unwrap(), 0);
        assert_eq!(parse_statistic("viewCount", Some("1234".into())).unwrap(), 1234);
    }

    #[test]
    fn non_numeric_statistic_is_an_error() {
        let err = parse_statistic("viewCount", Some("lots".into())).unwrap_err();
        assert!(err.to_string().contains("viewCount"), "{err}");
    }

    #[test]
    fn thumbnail_prefers_high_resolution() {
        let thumbs = Thumbnails {
            default: Some(Thumbnail { url: "d".into() }),
            medium: Some(Thumbnail { url: "m".into() }),
            high: None,
        };
        assert_eq!(thumbs.best_url(), "m");
        assert_eq!(Thumbnails::default().best_url(), "");
    }

    #[test]
    fn decodes_comment_thread_page() {
        let body = r#"{
            "kind": "youtube#commentThreadListResponse",
            "nextPageToken": "QURTSl",
            "items": [{
                "snippet": {
                    "videoId": "abc",
                    "topLevelComment": {
                        "snippet": {
                            "authorDisplayName": "@viewer",
                            "textDisplay": "Nice &amp; clear",
                            "likeCount": 3,
                            "publishedAt": "2024-05-01T10:00:00Z"
                        }
                    }
                }
            }]
        }"#;
        let page: CommentThreadListResponse = serde_json::from_str(body).unwrap();
        assert_eq!(page.next_page_token.as_deref(), Some("QURTSl"));
        let comment = Comment::from(page.items.into_iter().next().unwrap());
        assert_eq!(comment.author, "@viewer");
        assert_eq!(comment.like_count, 3);
        assert_eq!(comment.plain_text(), "Nice & clear");
    }
}
