use crate::client::{absolutize, HttpClient};
use crate::types::{TikTokEnvelope, TikTokPayload};
use anyhow::{Context, Result};
use regex::Regex;
use snatch_model::{AcquireError, TikTokVideo};

/// Resolve a TikTok post url to its watermark-free media.
pub async fn fetch_video(client: &HttpClient, url: &str) -> Result<TikTokVideo, AcquireError> {
    if !is_tiktok_url(url) {
        return Err(AcquireError::MalformedInput(format!("not a TikTok url: {url}")));
    }

    let api = &client.config().tiktok_api_base;
    tracing::info!(api = %api, url = %url, "Fetching TikTok video");

    let envelope = request_envelope(client, api, url)
        .await
        .map_err(AcquireError::fetch)?;

    if envelope.code != 0 {
        return Err(AcquireError::ResourceUnavailable(format!(
            "TikTok API code {}: {}",
            envelope.code, envelope.msg
        )));
    }
    let data = envelope.data.ok_or_else(|| {
        AcquireError::ResourceUnavailable("TikTok API returned no video data".into())
    })?;

    let video = into_video(data, &api_origin(api));
    tracing::info!(id = %video.id, author = %video.author, "Resolved TikTok video");
    Ok(video)
}

async fn request_envelope(client: &HttpClient, api: &str, url: &str) -> Result<TikTokEnvelope> {
    let request = client.get(api).query(&[("url", url), ("hd", "1")]);
    let body = client.send_for_text(request, api).await?;
    serde_json::from_str(&body).context("Malformed TikTok API response")
}

/// Accepts `tiktok.com` hosts, including `vm.`/`vt.` short links.
pub fn is_tiktok_url(url: &str) -> bool {
    let re = Regex::new(r"^https?://([a-z0-9-]+\.)*tiktok\.com/\S+").expect("valid regex");
    re.is_match(url)
}

/// `scheme://host` part of the API url, used to absolutize media paths.
fn api_origin(api: &str) -> String {
    match api.split_once("://") {
        Some((scheme, rest)) => {
            let host = rest.split('/').next().unwrap_or(rest);
            format!("{scheme}://{host}")
        }
        None => api.trim_end_matches('/').to_string(),
    }
}

fn into_video(data: TikTokPayload, origin: &str) -> TikTokVideo {
    let media = |path: &str| absolutize(origin, path);
    let play = data.hdplay.as_deref().filter(|p| !p.is_empty()).unwrap_or(data.play.as_str());
    let author = data
        .author
        .map(|a| if a.nickname.is_empty() { a.unique_id } else { a.nickname })
        .unwrap_or_default();

    TikTokVideo {
        play_url: media(play),
        cover_url: if data.cover.is_empty() { String::new() } else { media(&data.cover) },
        watermark_url: data.wmplay.as_deref().filter(|p| !p.is_empty()).map(media),
        music_url: data.music.as_deref().filter(|p| !p.is_empty()).map(media),
        id: data.id,
        title: data.title,
        author,
        duration_secs: data.duration,
    }
}
