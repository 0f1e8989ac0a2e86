//! Wire formats of the remote services.
//!
//! These mirror the JSON each service actually sends, field names included,
//! and are converted into `snatch_model` types at the adapter boundary.

use serde::{Deserialize, Serialize};
use snatch_model::{AuthorizedDownload, ResourceMetadata};

/// Metadata API envelope: `{ "result": { ... } }`.
#[derive(Debug, Clone, Deserialize)]
pub struct MetadataEnvelope {
    pub result: MetadataPayload,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MetadataPayload {
    pub id: String,
    #[serde(rename = "type", default = "default_kind")]
    pub kind: String,
    pub name: String,
    #[serde(default)]
    pub image: String,
    #[serde(default)]
    pub artists: Names,
    #[serde(default)]
    pub duration_ms: u64,
    #[serde(default)]
    pub gid: Option<LooseId>,
}

fn default_kind() -> String {
    "track".to_string()
}

/// Contributors arrive either pre-joined or as a list.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum Names {
    Joined(String),
    List(Vec<String>),
}

impl Default for Names {
    fn default() -> Self {
        Names::List(Vec::new())
    }
}

impl Names {
    pub fn display(&self) -> String {
        match self {
            Names::Joined(s) => s.trim().to_string(),
            Names::List(names) => names
                .iter()
                .map(|n| n.trim())
                .filter(|n| !n.is_empty())
                .collect::<Vec<_>>()
                .join(", "),
        }
    }
}

/// An id the API sends as either a number or a string.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum LooseId {
    Number(u64),
    Text(String),
}

impl LooseId {
    pub fn into_string(self) -> String {
        match self {
            LooseId::Number(n) => n.to_string(),
            LooseId::Text(s) => s,
        }
    }
}

impl From<MetadataPayload> for ResourceMetadata {
    fn from(p: MetadataPayload) -> Self {
        ResourceMetadata {
            contributors: p.artists.display(),
            id: p.id,
            kind: p.kind,
            display_name: p.name,
            artwork_url: p.image,
            duration_ms: p.duration_ms,
            internal_group_id: p.gid.map(LooseId::into_string).unwrap_or_default(),
        }
    }
}

/// Body of the authorize (convert) POST.
#[derive(Debug, Clone, Serialize)]
pub struct ConvertRequest {
    pub urls: String,
    pub cover: String,
}

/// Response of the authorize (convert) POST.
///
/// The convert endpoint names its failure flag `error`; `failed` is also
/// accepted. Either flag set to `true` marks the download as failed.
#[derive(Debug, Clone, Deserialize)]
pub struct ConvertResponse {
    #[serde(default)]
    pub error: Option<bool>,
    #[serde(default)]
    pub failed: Option<bool>,
    #[serde(default)]
    pub url: String,
}

impl ConvertResponse {
    pub fn is_failed(&self) -> bool {
        self.error.unwrap_or(false) || self.failed.unwrap_or(false)
    }
}

impl From<ConvertResponse> for AuthorizedDownload {
    fn from(r: ConvertResponse) -> Self {
        AuthorizedDownload {
            failed: r.is_failed(),
            asset_url: r.url,
        }
    }
}

/// TikTok API envelope: `{ "code": 0, "msg": "success", "data": { ... } }`.
#[derive(Debug, Clone, Deserialize)]
pub struct TikTokEnvelope {
    pub code: i64,
    #[serde(default)]
    pub msg: String,
    pub data: Option<TikTokPayload>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TikTokPayload {
    pub id: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub cover: String,
    #[serde(default)]
    pub duration: u64,
    pub play: String,
    #[serde(default)]
    pub hdplay: Option<String>,
    #[serde(default)]
    pub wmplay: Option<String>,
    #[serde(default)]
    pub music: Option<String>,
    #[serde(default)]
    pub author: Option<TikTokAuthor>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TikTokAuthor {
    #[serde(default)]
    pub unique_id: String,
    #[serde(default)]
    pub nickname: String,
}

/// Subset of `yt-dlp -J` output.
#[derive(Debug, Clone, Deserialize)]
pub struct YtDlpInfo {
    pub id: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub uploader: Option<String>,
    #[serde(default)]
    pub channel: Option<String>,
    #[serde(default)]
    pub duration: Option<f64>,
    #[serde(default)]
    pub thumbnail: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub format_id: Option<String>,
    #[serde(default)]
    pub ext: Option<String>,
    #[serde(default)]
    pub requested_formats: Vec<YtDlpFormat>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct YtDlpFormat {
    pub url: String,
    #[serde(default)]
    pub format_id: Option<String>,
    #[serde(default)]
    pub ext: Option<String>,
}
