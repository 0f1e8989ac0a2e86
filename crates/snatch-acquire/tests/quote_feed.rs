use std::net::SocketAddr;
use std::time::Duration;

use axum::http::{header, HeaderMap, StatusCode};
use axum::response::{Html, IntoResponse, Response};
use axum::routing::get;
use axum::Router;
use tokio::net::TcpListener;

use snatch_acquire::quotes::{all_quotes, random_quote};
use snatch_acquire::{ClientConfig, HttpClient};
use snatch_model::AcquireError;

const FEED: &str = r#"
<html><body>
<div class="container">
  <div class="kotodama-list">
    <div class="char-img"><img data-src="https://cdn.otakotaku.com/char/itachi.jpg"></div>
    <div class="char-name">Itachi Uchiha</div>
    <div class="anime-title">Naruto Shippuden</div>
    <div class="meta">Episode 138</div>
    <div class="quote">
      People's lives don't end
      when they die.
    </div>
    <a class="kuroko-link" href="/quote/42">Selengkapnya</a>
  </div>
  <div class="kotodama-list">
    <div class="char-name">Levi Ackerman</div>
    <div class="anime-title">Shingeki no Kyojin</div>
    <div class="quote">Give up on your dreams and die.</div>
  </div>
  <div class="kotodama-list">
    <div class="char-name">Spike Spiegel</div>
    <div class="anime-title">Cowboy Bebop</div>
    <div class="quote">Whatever happens, happens.</div>
    <a class="kuroko-link" href="https://other.example/x">Selengkapnya</a>
  </div>
</div>
</body></html>
"#;

async fn feed(headers: HeaderMap) -> Response {
    let ua = headers
        .get(header::USER_AGENT)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("");
    if !ua.starts_with("Mozilla/5.0") {
        return StatusCode::FORBIDDEN.into_response();
    }
    Html(FEED).into_response()
}

async fn slow_feed() -> Response {
    tokio::time::sleep(Duration::from_secs(5)).await;
    Html(FEED).into_response()
}

async fn start_server(app: Router) -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    addr
}

fn client_for(addr: SocketAddr, timeout: Duration) -> HttpClient {
    HttpClient::new(ClientConfig {
        quote_base_url: format!("http://{addr}"),
        quote_timeout: timeout,
        ..ClientConfig::default()
    })
    .unwrap()
}

#[tokio::test]
async fn test_all_quotes_skips_incomplete_blocks() {
    let addr = start_server(Router::new().route("/quote/feed", get(feed))).await;
    let client = client_for(addr, Duration::from_secs(10));

    let quotes = all_quotes(&client).await.unwrap();

    assert_eq!(quotes.len(), 2);
    assert_eq!(quotes[0].speaker, "Itachi Uchiha");
    assert_eq!(quotes[0].text, "People's lives don't end when they die.");
    assert_eq!(quotes[0].link, format!("http://{addr}/quote/42"));
    assert_eq!(
        quotes[0].image_url.as_deref(),
        Some("https://cdn.otakotaku.com/char/itachi.jpg")
    );
    assert_eq!(quotes[1].speaker, "Spike Spiegel");
    assert_eq!(quotes[1].context, "Unknown");
    assert_eq!(quotes[1].image_url, None);
    assert_eq!(quotes[1].link, "https://other.example/x");
}

#[tokio::test]
async fn test_random_quote_is_member_of_feed() {
    let addr = start_server(Router::new().route("/quote/feed", get(feed))).await;
    let client = client_for(addr, Duration::from_secs(10));

    let all = all_quotes(&client).await.unwrap();
    let picked = random_quote(&client).await.unwrap().unwrap();
    assert!(all.contains(&picked));
}

#[tokio::test]
async fn test_empty_feed_gives_no_quote() {
    let app = Router::new().route("/quote/feed", get(|| async { Html("<html><body></body></html>") }));
    let addr = start_server(app).await;
    let client = client_for(addr, Duration::from_secs(10));

    assert_eq!(random_quote(&client).await.unwrap(), None);
}

#[tokio::test]
async fn test_error_status_is_fetch_failure() {
    let app = Router::new().route(
        "/quote/feed",
        get(|| async { StatusCode::INTERNAL_SERVER_ERROR }),
    );
    let addr = start_server(app).await;
    let client = client_for(addr, Duration::from_secs(10));

    let err = all_quotes(&client).await.unwrap_err();
    assert!(matches!(err, AcquireError::FetchFailure(ref m) if m.contains("500")));
}

#[tokio::test]
async fn test_timeout_is_fetch_failure() {
    let addr = start_server(Router::new().route("/quote/feed", get(slow_feed))).await;
    let client = client_for(addr, Duration::from_millis(200));

    let err = all_quotes(&client).await.unwrap_err();
    assert!(matches!(err, AcquireError::FetchFailure(_)), "got {err:?}");
}
