//! YouTube adapter backed by the `yt-dlp` command-line tool.
//!
//! yt-dlp is asked for a single JSON document (`-J`) describing the video
//! and the format it would download; nothing is written to disk.

use crate::types::YtDlpInfo;
use regex::Regex;
use snatch_model::{AcquireError, YoutubeVideo};
use tokio::process::Command;

pub const DEFAULT_FORMAT: &str = "bestaudio/best";
const YTDLP_BIN: &str = "yt-dlp";

/// Describe a YouTube video and resolve the stream url of `format`.
pub async fn fetch_video(url: &str, format: &str) -> Result<YoutubeVideo, AcquireError> {
    if !is_youtube_url(url) {
        return Err(AcquireError::MalformedInput(format!("not a YouTube url: {url}")));
    }

    tracing::info!(url = %url, format = %format, "Running yt-dlp");
    let output = Command::new(YTDLP_BIN)
        .args(["-J", "--no-warnings", "--no-playlist", "-f", format, url])
        .kill_on_drop(true)
        .output()
        .await
        .map_err(|e| AcquireError::ExternalTool(format!("failed to run {YTDLP_BIN}: {e}")))?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        return Err(AcquireError::ExternalTool(format!(
            "{YTDLP_BIN} exited with {}: {}",
            output.status,
            stderr.trim()
        )));
    }

    let video = parse_info(&output.stdout)?;
    tracing::info!(id = %video.id, format = %video.format_id, "Resolved YouTube stream");
    Ok(video)
}

/// Accepts `youtube.com` (www, m, music) watch/shorts urls and `youtu.be` links.
pub fn is_youtube_url(url: &str) -> bool {
    let re = Regex::new(
        r"^https?://((www|m|music)\.)?(youtube\.com/(watch\?\S*v=|shorts/|live/)|youtu\.be/)[\w-]+",
    )
    .expect("valid regex");
    re.is_match(url)
}

/// Map `yt-dlp -J` stdout to a [`YoutubeVideo`].
///
/// Merged formats (`bestvideo+bestaudio`) have no top-level url; the first
/// requested format is used instead.
pub fn parse_info(stdout: &[u8]) -> Result<YoutubeVideo, AcquireError> {
    let info: YtDlpInfo = serde_json::from_slice(stdout)
        .map_err(|e| AcquireError::ExternalTool(format!("unreadable {YTDLP_BIN} output: {e}")))?;

    let (stream_url, format_id, ext) = match (&info.url, info.requested_formats.first()) {
        (Some(url), _) if !url.is_empty() => (
            url.clone(),
            info.format_id.clone().unwrap_or_default(),
            info.ext.clone().unwrap_or_default(),
        ),
        (_, Some(first)) => (
            first.url.clone(),
            first.format_id.clone().or_else(|| info.format_id.clone()).unwrap_or_default(),
            first.ext.clone().or_else(|| info.ext.clone()).unwrap_or_default(),
        ),
        _ => {
            return Err(AcquireError::ExternalTool(format!(
                "{YTDLP_BIN} reported no stream url for {}",
                info.id
            )))
        }
    };

    Ok(YoutubeVideo {
        uploader: info.uploader.or(info.channel).unwrap_or_default(),
        duration_secs: info.duration.unwrap_or(0.0),
        thumbnail_url: info.thumbnail,
        id: info.id,
        title: info.title,
        stream_url,
        format_id,
        ext,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_youtube_url() {
        assert!(is_youtube_url("https://www.youtube.com/watch?v=dQw4w9WgXcQ"));
        assert!(is_youtube_url("https://youtu.be/dQw4w9WgXcQ?t=42"));
        assert!(is_youtube_url("https://music.youtube.com/watch?v=dQw4w9WgXcQ&list=RD"));
        assert!(is_youtube_url("https://www.youtube.com/shorts/abcDEF12345"));
        assert!(!is_youtube_url("https://open.spotify.com/track/ABC123"));
        assert!(!is_youtube_url("https://www.youtube.com/"));
    }

    #[test]
    fn test_parse_single_format() {
        let json = br#"{
            "id": "dQw4w9WgXcQ",
            "title": "Never Gonna Give You Up",
            "uploader": "Rick Astley",
            "duration": 212.0,
            "thumbnail": "https://i.ytimg.com/vi/dQw4w9WgXcQ/maxresdefault.jpg",
            "url": "https://rr1.googlevideo.com/videoplayback?itag=251",
            "format_id": "251",
            "ext": "webm"
        }"#;
        let video = parse_info(json).unwrap();
        assert_eq!(video.stream_url, "https://rr1.googlevideo.com/videoplayback?itag=251");
        assert_eq!(video.format_id, "251");
        assert_eq!(video.ext, "webm");
        assert_eq!(video.uploader, "Rick Astley");
        assert_eq!(video.duration_secs, 212.0);
    }

    #[test]
    fn test_parse_merged_format_uses_first_requested() {
        let json = br#"{
            "id": "dQw4w9WgXcQ",
            "title": "Never Gonna Give You Up",
            "channel": "Rick Astley",
            "format_id": "137+140",
            "ext": "mp4",
            "requested_formats": [
                { "url": "https://rr1.googlevideo.com/videoplayback?itag=137", "format_id": "137", "ext": "mp4" },
                { "url": "https://rr1.googlevideo.com/videoplayback?itag=140", "format_id": "140", "ext": "m4a" }
            ]
        }"#;
        let video = parse_info(json).unwrap();
        assert_eq!(video.stream_url, "https://rr1.googlevideo.com/videoplayback?itag=137");
        assert_eq!(video.format_id, "137");
        assert_eq!(video.uploader, "Rick Astley");
        assert_eq!(video.thumbnail_url, None);
    }

    #[test]
    fn test_parse_without_stream() {
        let err = parse_info(br#"{ "id": "x", "title": "t" }"#).unwrap_err();
        assert!(matches!(err, AcquireError::ExternalTool(_)));
    }

    #[test]
    fn test_parse_garbage() {
        let err = parse_info(b"ERROR: Video unavailable").unwrap_err();
        assert!(matches!(err, AcquireError::ExternalTool(_)));
    }

    #[tokio::test]
    async fn test_rejects_non_youtube_before_spawning() {
        let err = fetch_video("https://vimeo.com/123", DEFAULT_FORMAT).await.unwrap_err();
        assert!(matches!(err, AcquireError::MalformedInput(_)));
    }
}
