use anyhow::{Context, Result};
use reqwest::header::HeaderMap;
use reqwest::RequestBuilder;
use std::time::Duration;

/// Endpoints and transport settings shared by every adapter.
///
/// Built once by the caller and handed to each stage explicitly. Tests point
/// the base urls at a local server.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Host of the intermediary page and the convert endpoint.
    pub base_url: String,
    /// Track metadata API, queried with `?url=`.
    pub metadata_api_base: String,
    /// Host of the quote listing feed.
    pub quote_base_url: String,
    pub tiktok_api_base: String,
    pub translate_api_base: String,
    pub user_agent: String,
    /// Bound on the quote listing fetch. Other calls use the transport default.
    pub quote_timeout: Duration,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: "https://spotmate.online".into(),
            metadata_api_base: "https://api.fabdl.com/spotify/get".into(),
            quote_base_url: "https://otakotaku.com".into(),
            tiktok_api_base: "https://www.tikwm.com/api/".into(),
            translate_api_base: "https://translate.googleapis.com/translate_a/single".into(),
            user_agent: "snatch/0.1 (content retrieval tool)".into(),
            quote_timeout: Duration::from_secs(10),
        }
    }
}

/// A fetched page: body text plus the response headers it came with.
#[derive(Debug, Clone)]
pub struct Page {
    pub body: String,
    pub headers: HeaderMap,
}

/// HTTP client value passed into every pipeline stage.
#[derive(Debug, Clone)]
pub struct HttpClient {
    inner: reqwest::Client,
    config: ClientConfig,
}

impl HttpClient {
    pub fn new(config: ClientConfig) -> reqwest::Result<Self> {
        let inner = reqwest::Client::builder()
            .user_agent(config.user_agent.clone())
            .build()?;
        Ok(Self { inner, config })
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn get(&self, url: &str) -> RequestBuilder {
        self.inner.get(url)
    }

    pub fn post(&self, url: &str) -> RequestBuilder {
        self.inner.post(url)
    }

    /// Send a prepared request and return its body and headers.
    ///
    /// Non-2xx statuses are errors; `url` is only used in messages.
    pub async fn send_for_page(&self, request: RequestBuilder, url: &str) -> Result<Page> {
        let response = request
            .send()
            .await
            .with_context(|| format!("Failed to fetch {url}"))?;

        let status = response.status();
        anyhow::ensure!(status.is_success(), "HTTP {status} for {url}");

        let headers = response.headers().clone();
        let body = response
            .text()
            .await
            .context("Failed to read response body")?;

        Ok(Page { body, headers })
    }

    /// Send a prepared request and return only the body text.
    pub async fn send_for_text(&self, request: RequestBuilder, url: &str) -> Result<String> {
        Ok(self.send_for_page(request, url).await?.body)
    }
}

/// Join a relative path onto a base url without doubling the slash.
///
/// Links that are already absolute (`http://`, `https://`, or
/// protocol-relative `//`) are returned unchanged.
pub fn absolutize(base: &str, link: &str) -> String {
    if link.starts_with("http://") || link.starts_with("https://") {
        return link.to_string();
    }
    if let Some(rest) = link.strip_prefix("//") {
        let scheme = base.split("://").next().unwrap_or("https");
        return format!("{scheme}://{rest}");
    }
    let base = base.trim_end_matches('/');
    let path = link.trim_start_matches('/');
    format!("{base}/{path}")
}
