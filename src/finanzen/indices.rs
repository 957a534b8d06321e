// src/finanzen/indices.rs
use std::collections::BTreeMap;

use once_cell::sync::Lazy;
use scraper::{Html, Selector};

use crate::extractors::{element_text, isin};
use crate::finanzen::client::{self, Endpoint, BASE_URL};
use crate::utils::error::AppError;

// Any index overview page carries the navigation listing all indices;
// the DAX constituents page serves as the entry point.
const INDEX_OVERVIEW_PAGE: &str = "dax/30-werte";

static INDEX_NAV_SELECTOR: Lazy<Selector> =
    Lazy::new(|| Selector::parse("ul.box-nav li a").expect("Failed to compile INDEX_NAV_SELECTOR"));

static CONSTITUENTS_SELECTOR: Lazy<Selector> = Lazy::new(|| {
    Selector::parse("div#index-list-container").expect("Failed to compile CONSTITUENTS_SELECTOR")
});

static ROW_SELECTOR: Lazy<Selector> =
    Lazy::new(|| Selector::parse("tr").expect("Failed to compile ROW_SELECTOR"));

static CELL_SELECTOR: Lazy<Selector> =
    Lazy::new(|| Selector::parse("td").expect("Failed to compile CELL_SELECTOR"));

static LINK_SELECTOR: Lazy<Selector> =
    Lazy::new(|| Selector::parse("a").expect("Failed to compile LINK_SELECTOR"));

/// Fetches the known index overview pages as a name to URL mapping.
pub async fn get_indices() -> Result<BTreeMap<String, String>, AppError> {
    let url = Endpoint::Index.url(INDEX_OVERVIEW_PAGE);
    let body = client::fetch_page(&url).await?;
    let document = Html::parse_document(&body);

    Ok(parse_index_nav(&document))
}

pub fn parse_index_nav(document: &Html) -> BTreeMap<String, String> {
    let mut indices = BTreeMap::new();

    for link in document.select(&INDEX_NAV_SELECTOR) {
        let name = element_text(link);
        let Some(href) = link.value().attr("href") else {
            continue;
        };
        if name.is_empty() {
            continue;
        }
        indices.insert(name, format!("{}{}", BASE_URL, href));
    }

    indices
}

/// Fetches the stocks listed on an index page as a name to ISIN mapping.
pub async fn get_stocks_in_index(url: &str) -> Result<BTreeMap<String, String>, AppError> {
    let body = client::fetch_page(url).await?;
    let document = Html::parse_document(&body);

    Ok(parse_index_constituents(&document))
}

pub fn parse_index_constituents(document: &Html) -> BTreeMap<String, String> {
    let mut stocks = BTreeMap::new();

    let Some(container) = document.select(&CONSTITUENTS_SELECTOR).next() else {
        tracing::warn!("Index constituents container not found");
        return stocks;
    };

    for row in container.select(&ROW_SELECTOR) {
        let Some(name_cell) = row.select(&CELL_SELECTOR).next() else {
            continue;
        };
        let Some(link) = name_cell.select(&LINK_SELECTOR).next() else {
            continue;
        };

        let name = element_text(link);
        // The cell text carries the ISIN next to the linked name.
        let cell_text = element_text(name_cell);
        let Some(found) = isin::parse_isin(&cell_text) else {
            tracing::debug!("No ISIN in constituents row '{}'", cell_text);
            continue;
        };

        stocks.insert(name, found.to_uppercase());
    }

    stocks
}
