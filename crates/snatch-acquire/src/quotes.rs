use crate::client::{absolutize, HttpClient};
use crate::normalize::non_empty;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use scraper::{ElementRef, Html, Selector};
use snatch_model::{AcquireError, QuoteRecord, UNKNOWN_CONTEXT};

const FEED_PATH: &str = "/quote/feed";

const BROWSER_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) \
    AppleWebKit/537.36 (KHTML, like Gecko) Chrome/124.0.0.0 Safari/537.36";

// Markup of the feed page. One block per quote.
const BLOCK_SELECTOR: &str = "div.kotodama-list";
const NAME_SELECTOR: &str = ".char-name";
const TITLE_SELECTOR: &str = ".anime-title";
const META_SELECTOR: &str = ".meta";
const TEXT_SELECTOR: &str = ".quote";
const IMAGE_SELECTOR: &str = ".char-img img";
const LINK_SELECTOR: &str = "a.kuroko-link";

/// Fetch the feed and return every complete quote on it.
pub async fn all_quotes(client: &HttpClient) -> Result<Vec<QuoteRecord>, AcquireError> {
    let html = fetch_listing_page(client).await?;
    let records = parse_records(&html, &client.config().quote_base_url);
    tracing::info!(quotes = records.len(), "Parsed quote feed");
    Ok(records)
}

/// Fetch the feed and pick one quote uniformly at random.
///
/// `Ok(None)` when the page held no complete quote.
pub async fn random_quote(client: &HttpClient) -> Result<Option<QuoteRecord>, AcquireError> {
    let records = all_quotes(client).await?;
    let mut rng = StdRng::from_entropy();
    Ok(sample_random(&records, &mut rng).cloned())
}

/// GET the listing page with a browser identity and a bounded timeout.
pub async fn fetch_listing_page(client: &HttpClient) -> Result<String, AcquireError> {
    let base = client.config().quote_base_url.trim_end_matches('/');
    let url = format!("{base}{FEED_PATH}");

    tracing::info!(url = %url, "Fetching quote feed");
    let request = client
        .get(&url)
        .header(reqwest::header::USER_AGENT, BROWSER_USER_AGENT)
        .timeout(client.config().quote_timeout);

    let html = client
        .send_for_text(request, &url)
        .await
        .map_err(AcquireError::fetch)?;
    tracing::info!(bytes = html.len(), "Received HTML");

    Ok(html)
}

/// Parse every quote block on the feed page.
///
/// Blocks missing a speaker, source, text, or link are skipped. Links are
/// made absolute against `base_url`.
pub fn parse_records(html: &str, base_url: &str) -> Vec<QuoteRecord> {
    let document = Html::parse_document(html);
    let selectors = QuoteSelectors::new();

    let mut records = Vec::new();
    for (index, block) in document.select(&selectors.block).enumerate() {
        let candidate = Candidate::extract(block, &selectors);
        match candidate.into_record(base_url) {
            Some(record) => records.push(record),
            None => tracing::debug!(block = index, "Skipping incomplete quote block"),
        }
    }

    records
}

/// Pick one record uniformly over `[0, len)`. `None` only when empty.
pub fn sample_random<'a, R: Rng>(
    records: &'a [QuoteRecord],
    rng: &mut R,
) -> Option<&'a QuoteRecord> {
    if records.is_empty() {
        return None;
    }
    records.get(rng.gen_range(0..records.len()))
}

struct QuoteSelectors {
    block: Selector,
    name: Selector,
    title: Selector,
    meta: Selector,
    text: Selector,
    image: Selector,
    link: Selector,
}

impl QuoteSelectors {
    fn new() -> Self {
        let parse = |s: &str| Selector::parse(s).expect("valid selector");
        Self {
            block: parse(BLOCK_SELECTOR),
            name: parse(NAME_SELECTOR),
            title: parse(TITLE_SELECTOR),
            meta: parse(META_SELECTOR),
            text: parse(TEXT_SELECTOR),
            image: parse(IMAGE_SELECTOR),
            link: parse(LINK_SELECTOR),
        }
    }
}

/// Raw fields of one block, before validation.
#[derive(Debug)]
struct Candidate {
    name: Option<String>,
    title: Option<String>,
    meta: Option<String>,
    text: Option<String>,
    image: Option<String>,
    link: Option<String>,
}

impl Candidate {
    fn extract(block: ElementRef, sel: &QuoteSelectors) -> Self {
        let text_of = |s: &Selector| {
            block
                .select(s)
                .next()
                .and_then(|el| non_empty(&el.text().collect::<String>()))
        };

        let image = block.select(&sel.image).next().and_then(|img| {
            img.value()
                .attr("data-src")
                .or_else(|| img.value().attr("src"))
                .and_then(non_empty)
        });
        let link = block
            .select(&sel.link)
            .next()
            .and_then(|a| a.value().attr("href"))
            .and_then(non_empty);

        Self {
            name: text_of(&sel.name),
            title: text_of(&sel.title),
            meta: text_of(&sel.meta),
            text: text_of(&sel.text),
            image,
            link,
        }
    }

    fn into_record(self, base_url: &str) -> Option<QuoteRecord> {
        Some(QuoteRecord {
            speaker: self.name?,
            source: self.title?,
            text: self.text?,
            link: absolutize(base_url, &self.link?),
            context: self.meta.unwrap_or_else(|| UNKNOWN_CONTEXT.to_string()),
            image_url: self.image,
        })
    }
}
