// src/finanzen/client.rs
use std::time::Duration;

use once_cell::sync::Lazy;
use scraper::{Html, Selector};

use crate::extractors::isin;
use crate::utils::error::FetchError;
use crate::utils::html_debug;

pub const BASE_URL: &str = "https://www.finanzen.net";

const USER_AGENT: &str = concat!("finanzen_fundamentals/", env!("CARGO_PKG_VERSION"));
// The site is a shared resource; keep a polite gap between requests.
const REQUEST_DELAY_MS: u64 = 250;
const REQUEST_TIMEOUT_SECS: u64 = 30;

// Unknown stocks do not return a non-2xx status; the site answers with
// a styled info box carrying this message instead.
const LOAD_ERROR: &str = "Die gewünschte Seite konnte nicht angezeigt werden";

static ERROR_BOX_SELECTOR: Lazy<Selector> = Lazy::new(|| {
    Selector::parse("div.special_info_box").expect("Failed to compile ERROR_BOX_SELECTOR")
});

static OG_TITLE_SELECTOR: Lazy<Selector> = Lazy::new(|| {
    Selector::parse(r#"meta[property="og:title"]"#).expect("Failed to compile OG_TITLE_SELECTOR")
});

/// The page categories the site serves, addressed by URL path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Endpoint {
    Search,
    Stock,
    Estimates,
    Fundamentals,
    Index,
}

impl Endpoint {
    pub fn path(self) -> &'static str {
        match self {
            Endpoint::Search => "/suchergebnis.asp?_search=",
            Endpoint::Stock => "/aktien/",
            Endpoint::Estimates => "/schaetzungen/",
            Endpoint::Fundamentals => "/bilanz_guv/",
            Endpoint::Index => "/index/",
        }
    }

    pub fn url(self, value: &str) -> String {
        format!("{}{}{}", BASE_URL, self.path(), value)
    }
}

/// Builds the request URL for an identifier, routing ISIN-shaped input
/// through the search endpoint: the direct page paths only resolve the
/// site's own name slugs. Returns the recognized ISIN alongside, already
/// uppercased for storage.
pub fn join_url(endpoint: Endpoint, value: &str) -> (String, Option<String>) {
    match isin::parse_isin(value) {
        Some(found) => (Endpoint::Search.url(value), Some(found.to_uppercase())),
        None => (endpoint.url(value), None),
    }
}

/// Creates a reqwest client configured for finanzen.net.
fn build_client() -> Result<reqwest::Client, reqwest::Error> {
    reqwest::Client::builder()
        .user_agent(USER_AGENT)
        .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
        .build()
}

/// Fetches a page and returns its body as text.
pub async fn fetch_page(url: &str) -> Result<String, FetchError> {
    let client = build_client()?;

    tracing::info!("Fetching {}", url);
    tokio::time::sleep(Duration::from_millis(REQUEST_DELAY_MS)).await;

    let response = client.get(url).send().await?;

    let status = response.status();
    if !status.is_success() {
        tracing::error!("HTTP error status: {} for URL: {}", status, url);
        return Err(FetchError::Http(status));
    }

    let body = response.text().await?;
    tracing::debug!("Fetched {} bytes from {}", body.len(), url);

    if let Ok(dir) = std::env::var(html_debug::DEBUG_DIR_ENV) {
        if let Err(err) = html_debug::dump_annotated(&body, &dir, url) {
            tracing::warn!("Failed to write annotated debug HTML: {}", err);
        }
    }

    Ok(body)
}

/// Fails fast when the page is the site's "could not be displayed"
/// answer for an unknown stock.
pub fn check_site(document: &Html) -> Result<(), FetchError> {
    for info_box in document.select(&ERROR_BOX_SELECTOR) {
        let text = info_box.text().collect::<String>();
        if text.contains(LOAD_ERROR) {
            return Err(FetchError::StockNotFound);
        }
    }
    Ok(())
}

/// Recovers the ISIN from the page's `og:title` metadata. Fallback for
/// requests made by name slug rather than by ISIN.
pub fn isin_from_document(document: &Html) -> Option<String> {
    document
        .select(&OG_TITLE_SELECTOR)
        .next()
        .and_then(|meta| meta.value().attr("content"))
        .and_then(isin::parse_isin)
        .map(str::to_uppercase)
}
