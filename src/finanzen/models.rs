// src/finanzen/models.rs
use std::collections::HashMap;

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

use crate::extractors::table::SectionTable;

/// Fundamentals scraped from a stock's balance-sheet page. Each
/// category is independent: a section the page does not carry (or whose
/// markup drifted) is `None`, the rest still populate.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Fundamentals {
    #[serde(rename = "ISIN")]
    pub isin: Option<String>,
    #[serde(rename = "Quotes")]
    pub quotes: Option<SectionTable>,
    #[serde(rename = "Key Ratios")]
    pub key_ratios: Option<SectionTable>,
    #[serde(rename = "Income Statement")]
    pub income_statement: Option<SectionTable>,
    #[serde(rename = "Balance Sheet")]
    pub balance_sheet: Option<SectionTable>,
    #[serde(rename = "Other")]
    pub other: Option<SectionTable>,
}

/// Performance overview from a stock's chart page.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ChartInfos {
    #[serde(rename = "ISIN")]
    pub isin: Option<String>,
    #[serde(rename = "Performance")]
    pub performance: Option<SectionTable>,
}

/// Analyst estimates for the coming years.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Estimates {
    #[serde(rename = "ISIN")]
    pub isin: Option<String>,
    #[serde(rename = "Estimates")]
    pub estimates: Option<SectionTable>,
}

/// Current price summary from the quotebox of a stock page on a
/// specific exchange.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct QuoteSummary {
    pub name: String,
    pub wkn: Option<String>,
    pub isin: Option<String>,
    pub symbol: Option<String>,
    pub price: Option<f64>,
    pub currency: String,
    pub change_abs: Option<f64>,
    pub change_pct: Option<f64>,
    pub time: String,
    pub exchange: String,
}

/// One row of the search results page.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchResult {
    pub name: String,
    /// The site's own name slug, usable with the direct page endpoints.
    pub slug: Option<String>,
    pub url: String,
    pub isin: Option<String>,
    pub wkn: Option<String>,
}

/// Exchange metadata: the URL postfix selecting the venue on a stock
/// page, and the venue's display name where one exists.
#[derive(Debug, Clone, Copy)]
pub struct StockMarket {
    pub url_postfix: &'static str,
    pub real_name: &'static str,
}

pub const DEFAULT_EXCHANGE: &str = "TGT";

pub static STOCK_MARKETS: Lazy<HashMap<&'static str, StockMarket>> = Lazy::new(|| {
    HashMap::from([
        ("BER", StockMarket { url_postfix: "@stBoerse_BER", real_name: "Berlin" }),
        ("DUS", StockMarket { url_postfix: "@stBoerse_DUS", real_name: "Düsseldorf" }),
        ("FSE", StockMarket { url_postfix: "@stBoerse_FSE", real_name: "Frankfurt Stock Exchange" }),
        ("HAM", StockMarket { url_postfix: "stBoerse_HAM", real_name: "Hamburg" }),
        ("HAN", StockMarket { url_postfix: "@stBoerse_HAN", real_name: "Hannover" }),
        ("MUN", StockMarket { url_postfix: "@stBoerse_MUN", real_name: "München" }),
        ("XETRA", StockMarket { url_postfix: "@stBoerse_XETRA", real_name: "XETRA" }),
        ("STU", StockMarket { url_postfix: "@stBoerse_STU", real_name: "Stuttgard" }),
        ("TGT", StockMarket { url_postfix: "@stBoerse_TGT", real_name: "Tradegate" }),
        ("BAE", StockMarket { url_postfix: "@stBoerse_BAE", real_name: "" }),
        ("BRX", StockMarket { url_postfix: "@stBoerse_BRX", real_name: "" }),
        ("BTT", StockMarket { url_postfix: "@stBoerse_BTT", real_name: "" }),
        ("CLB", StockMarket { url_postfix: "@stBoerse_CLB", real_name: "" }),
        ("GVIE", StockMarket { url_postfix: "@stBoerse_GVIE", real_name: "" }),
        ("NAS", StockMarket { url_postfix: "@stBoerse_NAS", real_name: "" }),
        ("MXK", StockMarket { url_postfix: "@stBoerse_MXK", real_name: "" }),
        ("SIX", StockMarket { url_postfix: "@stBoerse_SWX", real_name: "" }),
        ("XQTX", StockMarket { url_postfix: "@stBoerse_XQTX", real_name: "" }),
        ("AMEX", StockMarket { url_postfix: "@stBoerse_AMEX", real_name: "" }),
        ("NYSE", StockMarket { url_postfix: "@stBoerse_NYSE", real_name: "New York Stock Exchange" }),
    ])
});

/// Looks up an exchange by its code, case-insensitively.
pub fn stock_market(code: &str) -> Option<&'static StockMarket> {
    STOCK_MARKETS.get(code.to_uppercase().as_str())
}
