// src/finanzen/quote.rs
use once_cell::sync::Lazy;
use scraper::{ElementRef, Html, Selector};

use crate::extractors::{direct_text, element_text, isin, numeric};
use crate::finanzen::client::{self, Endpoint, BASE_URL};
use crate::finanzen::models::{self, QuoteSummary, StockMarket};
use crate::utils::error::{AppError, ExtractError};

// The quotebox is a grid of column divs: price with its currency span,
// absolute change, percent change, and a final block with quote time
// and venue.
static QUOTEBOX_SELECTOR: Lazy<Selector> =
    Lazy::new(|| Selector::parse("div.row.quotebox").expect("Failed to compile QUOTEBOX_SELECTOR"));

static PRICE_CELL_SELECTOR: Lazy<Selector> = Lazy::new(|| {
    Selector::parse(r#"div[class*="col-xs-5"]"#).expect("Failed to compile PRICE_CELL_SELECTOR")
});

static CHANGE_CELL_SELECTOR: Lazy<Selector> = Lazy::new(|| {
    Selector::parse(r#"div[class*="col-xs-4"]"#).expect("Failed to compile CHANGE_CELL_SELECTOR")
});

static PERCENT_CELL_SELECTOR: Lazy<Selector> = Lazy::new(|| {
    Selector::parse(r#"div[class*="col-xs-3"]"#).expect("Failed to compile PERCENT_CELL_SELECTOR")
});

static NAME_SELECTOR: Lazy<Selector> = Lazy::new(|| {
    Selector::parse(r#"div[class*="col-sm-5"] h1"#).expect("Failed to compile NAME_SELECTOR")
});

static INSTRUMENT_ID_SELECTOR: Lazy<Selector> = Lazy::new(|| {
    Selector::parse("span.instrument-id").expect("Failed to compile INSTRUMENT_ID_SELECTOR")
});

static SPAN_SELECTOR: Lazy<Selector> =
    Lazy::new(|| Selector::parse("span").expect("Failed to compile SPAN_SELECTOR"));

static DIV_SELECTOR: Lazy<Selector> =
    Lazy::new(|| Selector::parse("div").expect("Failed to compile DIV_SELECTOR"));

/// Fetches the current price summary of a stock on a specific exchange.
pub async fn get_quote(stock: &str, exchange: &str) -> Result<QuoteSummary, AppError> {
    let market = models::stock_market(exchange)
        .ok_or_else(|| AppError::Config(format!("Unknown exchange code '{}'", exchange)))?;

    let url = format!(
        "{}{}{}-aktie{}",
        BASE_URL,
        Endpoint::Stock.path(),
        stock.to_lowercase(),
        market.url_postfix
    );

    let body = client::fetch_page(&url).await?;
    let document = Html::parse_document(&body);
    client::check_site(&document)?;

    Ok(parse_quote(&document, market)?)
}

/// Extracts the quotebox. Only a missing quotebox fails; individual
/// values degrade to missing or empty.
pub fn parse_quote(document: &Html, market: &StockMarket) -> Result<QuoteSummary, ExtractError> {
    let quotebox = document
        .select(&QUOTEBOX_SELECTOR)
        .next()
        .ok_or(ExtractError::MissingFragment("quotebox"))?;

    let price_cell = quotebox.select(&PRICE_CELL_SELECTOR).next();
    let price = cell_number(price_cell);
    let currency = price_cell
        .and_then(|cell| cell.select(&SPAN_SELECTOR).next())
        .map(element_text)
        .unwrap_or_default();

    let change_abs = cell_number(quotebox.select(&CHANGE_CELL_SELECTOR).next());
    let change_pct = cell_number(quotebox.select(&PERCENT_CELL_SELECTOR).next());

    let name = document
        .select(&NAME_SELECTOR)
        .next()
        .map(element_text)
        .unwrap_or_default();

    let (wkn, isin, symbol) = document
        .select(&INSTRUMENT_ID_SELECTOR)
        .next()
        .map(|span| split_instrument_id(&element_text(span)))
        .unwrap_or((None, None, None));

    // Quote time sits in the first inner div of the box's fourth column.
    let time = quotebox
        .children()
        .filter_map(ElementRef::wrap)
        .filter(|el| el.value().name() == "div")
        .nth(3)
        .and_then(|meta| meta.select(&DIV_SELECTOR).next())
        .map(|el| direct_text(el))
        .unwrap_or_default();

    Ok(QuoteSummary {
        name,
        wkn,
        isin,
        symbol,
        price,
        currency,
        change_abs,
        change_pct,
        time,
        exchange: market.real_name.to_string(),
    })
}

fn cell_number(cell: Option<ElementRef<'_>>) -> Option<f64> {
    let raw = direct_text(cell?);
    match numeric::normalize(&raw) {
        Ok(value) => value,
        Err(err) => {
            tracing::debug!("Quotebox value unusable: {}", err);
            None
        }
    }
}

/// Splits the instrument line `WKN: 840400 / ISIN: DE0008404005 Symbol:
/// ALV` into its parts. The symbol is absent for most German stocks.
fn split_instrument_id(text: &str) -> (Option<String>, Option<String>, Option<String>) {
    let Some((wkn_part, rest)) = text.split_once('/') else {
        return (None, None, None);
    };

    let wkn = strip_label(wkn_part, "WKN:");
    let (isin_part, symbol) = match rest.split_once("Symbol") {
        Some((isin_part, symbol_part)) => (isin_part, strip_label(symbol_part, ":")),
        None => (rest, None),
    };
    let isin = strip_label(isin_part, "ISIN:")
        .and_then(|candidate| isin::parse_isin(&candidate).map(str::to_uppercase));

    (wkn, isin, symbol)
}

fn strip_label(part: &str, label: &str) -> Option<String> {
    let cleaned = part.replace(label, "").replace(' ', "");
    (!cleaned.is_empty()).then_some(cleaned)
}
