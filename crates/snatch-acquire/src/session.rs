use crate::client::Page;
use reqwest::header::{HeaderMap, SET_COOKIE};
use scraper::{Html, Selector};

/// Ephemeral session state scraped from the intermediary page.
///
/// Owned by a single pipeline run and dropped afterwards; tokens are
/// short-lived, so a new context is extracted for every download.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionContext {
    /// Value for the `Cookie` header of the authorize request. May be empty.
    pub cookie_header: String,
    pub anti_forgery_token: Option<String>,
}

impl SessionContext {
    pub fn from_page(page: &Page) -> Self {
        Self {
            cookie_header: extract_session_cookie(&page.headers),
            anti_forgery_token: extract_anti_forgery_token(&page.body),
        }
    }
}

/// Build a `Cookie` header value from every `set-cookie` response header.
///
/// Keeps the `name=value` part of each entry (everything before the first
/// `;`) in response order, joined with `"; "`. No cookies yields an empty
/// string.
pub fn extract_session_cookie(headers: &HeaderMap) -> String {
    headers
        .get_all(SET_COOKIE)
        .iter()
        .map(|value| {
            let entry = String::from_utf8_lossy(value.as_bytes());
            entry.split(';').next().unwrap_or("").to_string()
        })
        .collect::<Vec<_>>()
        .join("; ")
}

/// Find the CSRF token carried in `<meta name="csrf-token" content="...">`.
///
/// A blank `content` counts as no token.
pub fn extract_anti_forgery_token(html: &str) -> Option<String> {
    let document = Html::parse_document(html);
    let meta_sel = Selector::parse(r#"meta[name="csrf-token"]"#).expect("valid selector");

    document
        .select(&meta_sel)
        .find_map(|meta| meta.value().attr("content"))
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .map(str::to_string)
}
