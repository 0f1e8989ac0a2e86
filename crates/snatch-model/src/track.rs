use serde::{Deserialize, Serialize};

/// Metadata for a single track as reported by the metadata API.
///
/// Immutable once fetched; the orchestrator passes it through untouched
/// into the final [`DownloadResult`].
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ResourceMetadata {
    pub id: String,
    /// Resource kind (e.g., "track").
    pub kind: String,
    pub display_name: String,
    pub artwork_url: String,
    /// Contributor names in source order, joined with ", ".
    pub contributors: String,
    pub duration_ms: u64,
    /// Grouping id the metadata API assigns (album/group), empty when unknown.
    pub internal_group_id: String,
}

/// Outcome of the authorization (convert) request.
///
/// When `failed` is true, `asset_url` must not be used.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AuthorizedDownload {
    pub failed: bool,
    pub asset_url: String,
}

impl AuthorizedDownload {
    /// The asset url, only when the response is usable.
    pub fn usable_url(&self) -> Option<&str> {
        if self.failed || self.asset_url.trim().is_empty() {
            None
        } else {
            Some(&self.asset_url)
        }
    }
}

/// The only success value of the track download pipeline.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DownloadResult {
    pub metadata: ResourceMetadata,
    pub asset_url: String,
}
