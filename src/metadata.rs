//! Video metadata lookup.
//!
//! The extractor payload is deliberately loose (every field optional) while
//! `VideoDetails` is the fixed shape the frontend reads from each cached
//! transcript document.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tracing::debug;

pub const NOT_AVAILABLE: &str = "N/A";

/// Subset of yt-dlp's `--dump-single-json` payload that the lookup reads.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct VideoInfo {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    /// Kept as a raw JSON number so it stringifies exactly as the extractor
    /// reported it (`125`, or `125.5` for the odd fractional duration).
    #[serde(default)]
    pub duration: Option<serde_json::Number>,
    #[serde(default)]
    pub upload_date: Option<String>,
    #[serde(default)]
    pub categories: Option<Vec<String>>,
    #[serde(default)]
    pub uploader: Option<String>,
    #[serde(default)]
    pub channel_id: Option<String>,
}

/// Anything that can resolve a video id into extractor metadata.
pub trait MetadataSource: Send + Sync {
    fn video_info(&self, video_id: &str) -> Result<VideoInfo>;
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ThumbnailUrls {
    pub hqdefault: String,
    pub maxresdefault: String,
}

/// `videoInfo` block of a transcript document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VideoDetails {
    pub name: Option<String>,
    #[serde(rename = "thumbnailUrl")]
    pub thumbnail_url: ThumbnailUrls,
    #[serde(rename = "embedUrl")]
    pub embed_url: String,
    /// Always a string; `N/A` when the extractor reports no duration.
    pub duration: String,
    pub description: Option<String>,
    pub upload_date: Option<String>,
    pub genre: String,
    pub author: Option<String>,
    pub channel_id: Option<String>,
}

impl VideoDetails {
    /// Projects extractor output into the document shape. Thumbnail and embed
    /// URLs are derived from the id, never from the payload.
    pub fn from_info(video_id: &str, info: VideoInfo) -> Self {
        let genre = info
            .categories
            .and_then(|categories| categories.into_iter().next())
            .unwrap_or_else(|| NOT_AVAILABLE.to_string());

        Self {
            name: info.title,
            thumbnail_url: ThumbnailUrls {
                hqdefault: format!("https://i.ytimg.com/vi/{video_id}/hqdefault.jpg"),
                maxresdefault: format!("https://i.ytimg.com/vi/{video_id}/maxresdefault.jpg"),
            },
            embed_url: format!("https://www.youtube.com/embed/{video_id}"),
            duration: info
                .duration
                .map(|value| value.to_string())
                .unwrap_or_else(|| NOT_AVAILABLE.to_string()),
            description: info.description,
            upload_date: info.upload_date,
            genre,
            author: info.uploader,
            channel_id: info.channel_id,
        }
    }
}

pub fn lookup_video(source: &dyn MetadataSource, video_id: &str) -> Result<VideoDetails> {
    let info = source
        .video_info(video_id)
        .with_context(|| format!("fetching metadata for {video_id}"))?;
    debug!(video_id, title = ?info.title, "metadata resolved");
    Ok(VideoDetails::from_info(video_id, info))
}
