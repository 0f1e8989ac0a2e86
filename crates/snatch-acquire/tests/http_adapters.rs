use std::collections::HashMap;
use std::net::SocketAddr;

use axum::extract::Query;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use serde_json::json;
use tokio::net::TcpListener;

use snatch_acquire::{tiktok, translate, ClientConfig, HttpClient};
use snatch_model::AcquireError;

async fn tikwm(Query(params): Query<HashMap<String, String>>) -> Response {
    let url = params.get("url").cloned().unwrap_or_default();
    if url.contains("/video/404") {
        return Json(json!({ "code": -1, "msg": "Url parsing is failed! Please check url." }))
            .into_response();
    }
    if params.get("hd").map(String::as_str) != Some("1") {
        return StatusCode::BAD_REQUEST.into_response();
    }
    Json(json!({
        "code": 0,
        "msg": "success",
        "data": {
            "id": "7234567890123456789",
            "title": "cat does a backflip",
            "cover": "/video/cover/7234567890123456789.webp",
            "duration": 12,
            "play": "/video/media/play/7234567890123456789.mp4",
            "hdplay": "/video/media/hdplay/7234567890123456789.mp4",
            "wmplay": "/video/media/wmplay/7234567890123456789.mp4",
            "music": "https://sf16.tiktokcdn.com/obj/music.mp3",
            "author": { "unique_id": "catlover", "nickname": "Cat Lover" }
        }
    }))
    .into_response()
}

async fn gtx(Query(params): Query<HashMap<String, String>>) -> Response {
    if params.get("client").map(String::as_str) != Some("gtx")
        || params.get("sl").map(String::as_str) != Some("auto")
    {
        return StatusCode::BAD_REQUEST.into_response();
    }
    let target = params.get("tl").cloned().unwrap_or_default();
    let text = params.get("q").cloned().unwrap_or_default();
    Json(json!([
        [[format!("[{target}] {text}"), text, null, null, 10]],
        null,
        "id"
    ]))
    .into_response()
}

async fn start_server() -> SocketAddr {
    let app = Router::new()
        .route("/api/", get(tikwm))
        .route("/translate_a/single", get(gtx))
        .route("/broken", get(|| async { "<html>not json</html>" }));
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    addr
}

fn client_for(addr: SocketAddr) -> HttpClient {
    HttpClient::new(ClientConfig {
        tiktok_api_base: format!("http://{addr}/api/"),
        translate_api_base: format!("http://{addr}/translate_a/single"),
        ..ClientConfig::default()
    })
    .unwrap()
}

#[tokio::test]
async fn test_tiktok_video_resolves() {
    let addr = start_server().await;
    let video = tiktok::fetch_video(
        &client_for(addr),
        "https://www.tiktok.com/@catlover/video/7234567890123456789",
    )
    .await
    .unwrap();

    assert_eq!(video.id, "7234567890123456789");
    assert_eq!(video.author, "Cat Lover");
    assert_eq!(
        video.play_url,
        format!("http://{addr}/video/media/hdplay/7234567890123456789.mp4")
    );
    assert_eq!(
        video.music_url.as_deref(),
        Some("https://sf16.tiktokcdn.com/obj/music.mp3")
    );
}

#[tokio::test]
async fn test_tiktok_api_error_code_is_unavailable() {
    let addr = start_server().await;
    let err = tiktok::fetch_video(&client_for(addr), "https://www.tiktok.com/@x/video/404")
        .await
        .unwrap_err();
    assert!(matches!(err, AcquireError::ResourceUnavailable(ref m) if m.contains("-1")));
}

#[tokio::test]
async fn test_tiktok_rejects_foreign_url() {
    let addr = start_server().await;
    let err = tiktok::fetch_video(&client_for(addr), "https://www.instagram.com/reel/abc")
        .await
        .unwrap_err();
    assert!(matches!(err, AcquireError::MalformedInput(_)));
}

#[tokio::test]
async fn test_tiktok_malformed_body_is_fetch_failure() {
    let addr = start_server().await;
    let client = HttpClient::new(ClientConfig {
        tiktok_api_base: format!("http://{addr}/broken"),
        ..ClientConfig::default()
    })
    .unwrap();
    let err = tiktok::fetch_video(&client, "https://vt.tiktok.com/ZSabc123/")
        .await
        .unwrap_err();
    assert!(matches!(err, AcquireError::FetchFailure(_)));
}

#[tokio::test]
async fn test_translate_round() {
    let addr = start_server().await;
    let translation = translate::translate(&client_for(addr), "Selamat pagi", "EN")
        .await
        .unwrap();

    assert_eq!(translation.translated, "[en] Selamat pagi");
    assert_eq!(translation.source_lang, "id");
    assert_eq!(translation.target_lang, "en");
    assert_eq!(translation.target_name, "English");
}

#[tokio::test]
async fn test_translate_backend_down_is_fetch_failure() {
    let client = HttpClient::new(ClientConfig {
        translate_api_base: "http://127.0.0.1:9/translate_a/single".into(),
        ..ClientConfig::default()
    })
    .unwrap();
    let err = translate::translate(&client, "hello", "ja").await.unwrap_err();
    assert!(matches!(err, AcquireError::FetchFailure(_)));
}
