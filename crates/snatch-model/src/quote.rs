use serde::{Deserialize, Serialize};

/// Context value used when a quote block carries no meta text.
pub const UNKNOWN_CONTEXT: &str = "Unknown";

/// One quote scraped from the listing feed.
///
/// Only records with a non-empty speaker, source, text, and link are ever
/// constructed by the scraper; blocks missing any of them are dropped.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct QuoteRecord {
    /// Character who says the quote.
    pub speaker: String,
    /// Anime (or other work) the quote comes from.
    pub source: String,
    /// Episode/scene context; "Unknown" when the page gives none.
    pub context: String,
    pub text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    /// Absolute link to the quote's own page.
    pub link: String,
}
