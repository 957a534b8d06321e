// src/finanzen/fundamentals.rs
use once_cell::sync::Lazy;
use scraper::Html;

use crate::extractors::section::{locate_section, SectionAnchor};
use crate::extractors::table::{parse_table, SectionTable, TableShape};
use crate::finanzen::client::{self, Endpoint};
use crate::finanzen::models::Fundamentals;
use crate::utils::error::AppError;

// The balance-sheet page renders each category as an h2 heading
// followed by its table.
static QUOTES_ANCHOR: Lazy<SectionAnchor> = Lazy::new(|| SectionAnchor::new("h2", "Die Aktie"));
static KEY_RATIOS_ANCHOR: Lazy<SectionAnchor> =
    Lazy::new(|| SectionAnchor::new("h2", "Unternehmenskennzahlen"));
static INCOME_ANCHOR: Lazy<SectionAnchor> = Lazy::new(|| SectionAnchor::new("h2", "GuV"));
static BALANCE_ANCHOR: Lazy<SectionAnchor> = Lazy::new(|| SectionAnchor::new("h2", "Bilanz"));
static OTHER_ANCHOR: Lazy<SectionAnchor> =
    Lazy::new(|| SectionAnchor::new("h2", "sonstige Angaben"));

/// Fetches and extracts the fundamentals of a stock, addressed by name
/// slug or ISIN.
pub async fn get_fundamentals(stock: &str) -> Result<Fundamentals, AppError> {
    let stock = stock.to_lowercase();
    let (url, isin_hint) = client::join_url(Endpoint::Fundamentals, &stock);

    let body = client::fetch_page(&url).await?;
    let document = Html::parse_document(&body);
    client::check_site(&document)?;

    Ok(parse_fundamentals(&document, isin_hint))
}

/// Extraction half of the pipeline, driven by tests on canned
/// documents. A section the document does not carry leaves its category
/// `None`; the remaining categories still extract.
pub fn parse_fundamentals(document: &Html, isin_hint: Option<String>) -> Fundamentals {
    let isin = isin_hint.or_else(|| client::isin_from_document(document));

    Fundamentals {
        isin,
        quotes: section(document, &QUOTES_ANCHOR),
        key_ratios: section(document, &KEY_RATIOS_ANCHOR),
        income_statement: section(document, &INCOME_ANCHOR),
        balance_sheet: section(document, &BALANCE_ANCHOR),
        other: section(document, &OTHER_ANCHOR),
    }
}

fn section(document: &Html, anchor: &SectionAnchor) -> Option<SectionTable> {
    locate_section(document, anchor)
        .and_then(|root| parse_table(root, TableShape::FUNDAMENTALS))
        .map_err(|err| {
            tracing::warn!("Leaving category '{}' absent: {}", anchor.label(), err);
            err
        })
        .ok()
}

// --- Tests ---
#[cfg(test)]
mod tests {
    use super::*;

    fn category(heading: &str, metric: &str, v2022: &str, v2023: &str) -> String {
        format!(
            r#"<div class="box table-quotes">
                 <h2>{heading}</h2>
                 <table>
                   <thead><tr><th></th><th></th><th>2022</th><th>2023</th></tr></thead>
                   <tbody>
                     <tr>
                       <td><input type="checkbox"></td>
                       <td class="font-bold">{metric}</td>
                       <td>{v2022}</td><td>{v2023}</td>
                     </tr>
                   </tbody>
                 </table>
               </div>"#
        )
    }

    fn full_page(categories: &[String]) -> Html {
        let body = categories.join("\n");
        Html::parse_document(&format!(
            r#"<html>
                 <head><meta property="og:title" content="BASF Aktie | DE000BASF111"></head>
                 <body>{body}</body>
               </html>"#
        ))
    }

    #[test]
    fn extracts_all_five_categories() {
        let document = full_page(&[
            category("Die Aktie", "Dividende", "3,40", "3,40"),
            category("Unternehmenskennzahlen", "KGV", "7,31", "-"),
            category("GuV", "Umsatz", "87.327,0", "68.902,0"),
            category("Bilanz", "Bilanzsumme", "84.472,0", "80.366,0"),
            category("sonstige Angaben", "Mitarbeiter", "111.481", "111.991"),
        ]);

        let fundamentals = parse_fundamentals(&document, None);

        assert_eq!(fundamentals.isin.as_deref(), Some("DE000BASF111"));
        let income = fundamentals.income_statement.expect("GuV should extract");
        assert_eq!(income.value("Umsatz", "2022"), Some(87327.0));
        let ratios = fundamentals.key_ratios.expect("ratios should extract");
        assert_eq!(ratios.value("KGV", "2023"), None);
        assert!(fundamentals.quotes.is_some());
        assert!(fundamentals.balance_sheet.is_some());
        assert!(fundamentals.other.is_some());
    }

    #[test]
    fn missing_balance_sheet_leaves_other_categories_intact() {
        let document = full_page(&[
            category("Die Aktie", "Dividende", "3,40", "3,40"),
            category("Unternehmenskennzahlen", "KGV", "7,31", "6,90"),
            category("GuV", "Umsatz", "87.327,0", "68.902,0"),
            category("sonstige Angaben", "Mitarbeiter", "111.481", "111.991"),
        ]);

        let fundamentals = parse_fundamentals(&document, None);

        assert!(fundamentals.balance_sheet.is_none());
        assert!(fundamentals.quotes.is_some());
        assert!(fundamentals.key_ratios.is_some());
        assert!(fundamentals.income_statement.is_some());
        assert!(fundamentals.other.is_some());
    }

    #[test]
    fn request_isin_wins_over_page_metadata() {
        let document = full_page(&[category("GuV", "Umsatz", "1,0", "2,0")]);

        let fundamentals = parse_fundamentals(&document, Some("DE0007164600".to_string()));

        assert_eq!(fundamentals.isin.as_deref(), Some("DE0007164600"));
    }

    #[test]
    fn repeated_parses_do_not_share_rows() {
        let first = full_page(&[category("GuV", "Umsatz", "1,0", "2,0")]);
        let second = full_page(&[category("GuV", "Ergebnis", "3,0", "4,0")]);

        let _ = parse_fundamentals(&first, None);
        let result = parse_fundamentals(&second, None);

        let income = result.income_statement.expect("GuV should extract");
        assert_eq!(income.rows.len(), 1);
        assert_eq!(income.rows[0].label, "Ergebnis");
    }
}
