use crate::client::{HttpClient, Page};
use crate::session::SessionContext;
use crate::types::{ConvertRequest, ConvertResponse, MetadataEnvelope};
use anyhow::{Context, Result};
use regex::Regex;
use snatch_model::{AcquireError, AuthorizedDownload, DownloadResult, ResourceMetadata};
use std::fmt;

const TRACK_MARKER: &str = "track/";
const CANONICAL_TRACK_BASE: &str = "https://open.spotify.com/track";

/// Pipeline stages, in order. Any stage may end the run with an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    ExtractingId,
    FetchingConcurrently,
    ExtractingSession,
    Authorizing,
    Done,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Stage::ExtractingId => "extracting-id",
            Stage::FetchingConcurrently => "fetching",
            Stage::ExtractingSession => "extracting-session",
            Stage::Authorizing => "authorizing",
            Stage::Done => "done",
        };
        f.write_str(name)
    }
}

/// Resolve a Spotify track url to its metadata and a downloadable asset url.
///
/// Fetches the intermediary page and the track metadata concurrently,
/// scrapes the session cookie and CSRF token from the page, then posts the
/// convert request with both. A fresh session is scraped on every call.
pub async fn download_track(client: &HttpClient, url: &str) -> Result<DownloadResult, AcquireError> {
    let mut stage = Stage::ExtractingId;
    let result = run_pipeline(client, url, &mut stage).await;

    match &result {
        Ok(download) => tracing::info!(
            stage = %stage,
            track = %download.metadata.display_name,
            asset = %download.asset_url,
            "Track download resolved"
        ),
        Err(e) => tracing::warn!(stage = %stage, url = %url, error = %e, "Track download failed"),
    }

    result
}

async fn run_pipeline(
    client: &HttpClient,
    url: &str,
    stage: &mut Stage,
) -> Result<DownloadResult, AcquireError> {
    let id = extract_resource_id(url)?;
    tracing::info!(id = %id, "Extracted track id");

    advance(stage, Stage::FetchingConcurrently);
    let (page, metadata) = tokio::try_join!(
        fetch_intermediary_page(client, &id),
        fetch_metadata(client, url),
    )
    .map_err(AcquireError::fetch)?;

    advance(stage, Stage::ExtractingSession);
    let session = SessionContext::from_page(&page);
    let Some(token) = session.anti_forgery_token.as_deref() else {
        return Err(AcquireError::MissingCredential(format!(
            "no csrf-token meta tag on the intermediary page for track {id}"
        )));
    };
    if session.cookie_header.is_empty() {
        tracing::debug!("Intermediary page set no cookies");
    }

    advance(stage, Stage::Authorizing);
    let authorized = authorize_download(
        client,
        &id,
        &metadata.artwork_url,
        token,
        &session.cookie_header,
    )
    .await
    .map_err(AcquireError::fetch)?;

    let Some(asset_url) = authorized.usable_url() else {
        return Err(AcquireError::ResourceUnavailable(format!(
            "convert endpoint reported failure for track {id}"
        )));
    };
    let asset_url = asset_url.to_string();

    advance(stage, Stage::Done);
    Ok(DownloadResult { metadata, asset_url })
}

fn advance(stage: &mut Stage, next: Stage) {
    tracing::debug!(from = %stage, to = %next, "Pipeline stage");
    *stage = next;
}

/// Pull the track id out of a Spotify url.
///
/// Locale segments such as `/intl-id/` are removed first; the id is what
/// sits between `track/` and the next `?`, `#` or `/`.
pub fn extract_resource_id(url: &str) -> Result<String, AcquireError> {
    let locale_re = Regex::new(r"/intl-[A-Za-z_-]+/").expect("valid regex");
    let cleaned = locale_re.replace_all(url, "/");

    let start = cleaned
        .find(TRACK_MARKER)
        .ok_or_else(|| AcquireError::MalformedInput(format!("no track id in {url}")))?
        + TRACK_MARKER.len();

    let rest = &cleaned[start..];
    let end = rest.find(['?', '#', '/']).unwrap_or(rest.len());
    let id = rest[..end].trim();

    if id.is_empty() {
        return Err(AcquireError::MalformedInput(format!("empty track id in {url}")));
    }
    Ok(id.to_string())
}

/// The canonical `open.spotify.com` url for a track id.
pub fn canonical_track_url(id: &str) -> String {
    format!("{CANONICAL_TRACK_BASE}/{id}")
}

/// GET the intermediary page whose cookies and CSRF token authorize the
/// convert request.
pub async fn fetch_intermediary_page(client: &HttpClient, id: &str) -> Result<Page> {
    let base = client.config().base_url.trim_end_matches('/');
    let url = format!("{base}/spotify/track-{id}");

    tracing::info!(url = %url, "Fetching intermediary page");
    let page = client.send_for_page(client.get(&url), &url).await?;
    tracing::info!(bytes = page.body.len(), "Received intermediary page");

    Ok(page)
}

/// GET the track metadata for the original (user-supplied) url.
pub async fn fetch_metadata(client: &HttpClient, resource_url: &str) -> Result<ResourceMetadata> {
    let api = &client.config().metadata_api_base;

    tracing::info!(api = %api, url = %resource_url, "Fetching track metadata");
    let request = client.get(api).query(&[("url", resource_url)]);
    let body = client.send_for_text(request, api).await?;

    let envelope: MetadataEnvelope =
        serde_json::from_str(&body).context("Malformed metadata response")?;
    Ok(envelope.result.into())
}

/// POST the convert request carrying the scraped session.
pub async fn authorize_download(
    client: &HttpClient,
    id: &str,
    artwork_url: &str,
    token: &str,
    cookie: &str,
) -> Result<AuthorizedDownload> {
    let base = client.config().base_url.trim_end_matches('/');
    let url = format!("{base}/convert");
    let body = ConvertRequest {
        urls: canonical_track_url(id),
        cover: artwork_url.to_string(),
    };

    tracing::info!(url = %url, "Requesting download authorization");
    let mut request = client.post(&url).json(&body).header("X-CSRF-TOKEN", token);
    if !cookie.is_empty() {
        request = request.header(reqwest::header::COOKIE, cookie);
    }

    let text = client.send_for_text(request, &url).await?;
    let response: ConvertResponse =
        serde_json::from_str(&text).context("Malformed convert response")?;

    Ok(response.into())
}
