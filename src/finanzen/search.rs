// src/finanzen/search.rs
use once_cell::sync::Lazy;
use regex::Regex;
use scraper::{Html, Selector};

use crate::extractors::{element_text, isin};
use crate::finanzen::client::{self, Endpoint, BASE_URL};
use crate::finanzen::models::SearchResult;
use crate::utils::error::AppError;

// An unmatched query is answered with a red info line, not an error page.
const NO_RESULT: &str = "kein Ergebnis geliefert";

static NO_RESULT_SELECTOR: Lazy<Selector> =
    Lazy::new(|| Selector::parse("div.red").expect("Failed to compile NO_RESULT_SELECTOR"));

static RESULT_TABLE_SELECTOR: Lazy<Selector> =
    Lazy::new(|| Selector::parse("table.table").expect("Failed to compile RESULT_TABLE_SELECTOR"));

static ROW_SELECTOR: Lazy<Selector> =
    Lazy::new(|| Selector::parse("tr").expect("Failed to compile ROW_SELECTOR"));

static CELL_SELECTOR: Lazy<Selector> =
    Lazy::new(|| Selector::parse("td").expect("Failed to compile CELL_SELECTOR"));

static LINK_SELECTOR: Lazy<Selector> =
    Lazy::new(|| Selector::parse("a").expect("Failed to compile LINK_SELECTOR"));

// The stock's name slug is embedded in its page path.
static SLUG_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"aktien/(.+)-aktie").expect("Failed to compile SLUG_RE"));

/// Searches the site for stocks matching a name, WKN or ISIN. An
/// unmatched query yields an empty list.
pub async fn search_stock(query: &str, limit: Option<usize>) -> Result<Vec<SearchResult>, AppError> {
    let query = query.to_lowercase();
    let url = Endpoint::Search.url(&query);

    let body = client::fetch_page(&url).await?;
    let document = Html::parse_document(&body);

    Ok(parse_search_results(&document, limit))
}

pub fn parse_search_results(document: &Html, limit: Option<usize>) -> Vec<SearchResult> {
    let mut results = Vec::new();

    for note in document.select(&NO_RESULT_SELECTOR) {
        if element_text(note).contains(NO_RESULT) {
            tracing::info!("Search returned no results");
            return results;
        }
    }

    let Some(table) = document.select(&RESULT_TABLE_SELECTOR).next() else {
        tracing::warn!("Search results table not found");
        return results;
    };

    for row in table.select(&ROW_SELECTOR) {
        if let Some(max) = limit {
            if results.len() >= max {
                break;
            }
        }

        let cells: Vec<_> = row.select(&CELL_SELECTOR).collect();
        // The header row carries no data cells.
        let Some(name_cell) = cells.first() else {
            continue;
        };
        let Some(link) = name_cell.select(&LINK_SELECTOR).next() else {
            continue;
        };
        let Some(href) = link.value().attr("href") else {
            continue;
        };

        let name = element_text(*name_cell);
        let slug = SLUG_RE
            .captures(href)
            .map(|captures| captures[1].to_string());
        let url = format!("{}{}", BASE_URL, href);
        let isin = cells.get(1).and_then(|cell| {
            let text = element_text(*cell);
            isin::parse_isin(&text).map(str::to_uppercase)
        });
        let wkn = cells
            .get(2)
            .map(|cell| element_text(*cell))
            .filter(|text| !text.is_empty());

        results.push(SearchResult {
            name,
            slug,
            url,
            isin,
            wkn,
        });
    }

    results
}
