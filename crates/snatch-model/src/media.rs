use serde::{Deserialize, Serialize};

/// A TikTok post resolved to its downloadable media.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TikTokVideo {
    pub id: String,
    pub title: String,
    pub author: String,
    pub duration_secs: u64,
    pub cover_url: String,
    /// Watermark-free video.
    pub play_url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub watermark_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub music_url: Option<String>,
}

/// A YouTube video as described by the external extraction tool.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct YoutubeVideo {
    pub id: String,
    pub title: String,
    pub uploader: String,
    pub duration_secs: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub thumbnail_url: Option<String>,
    /// Direct media url of the selected format.
    pub stream_url: String,
    pub format_id: String,
    pub ext: String,
}

/// Result of a single translation call.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Translation {
    pub text: String,
    pub translated: String,
    /// Source language as detected by the backend (ISO 639-1 where known).
    pub source_lang: String,
    pub target_lang: String,
    /// English name of the target language.
    pub target_name: String,
}
