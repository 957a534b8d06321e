// src/finanzen/estimates.rs
use once_cell::sync::Lazy;
use scraper::Html;

use crate::extractors::section::{locate_section, SectionAnchor};
use crate::extractors::table::{parse_table, TableShape};
use crate::finanzen::client::{self, Endpoint};
use crate::finanzen::models::Estimates;
use crate::utils::error::AppError;

static ESTIMATES_ANCHOR: Lazy<SectionAnchor> =
    Lazy::new(|| SectionAnchor::new("h1", "^Schätzungen"));

/// Fetches the analyst estimates for a stock.
pub async fn get_estimates(stock: &str) -> Result<Estimates, AppError> {
    let stock = stock.to_lowercase();
    let (url, isin_hint) = client::join_url(Endpoint::Estimates, &stock);

    let body = client::fetch_page(&url).await?;
    let document = Html::parse_document(&body);
    client::check_site(&document)?;

    Ok(parse_estimates(&document, isin_hint))
}

pub fn parse_estimates(document: &Html, isin_hint: Option<String>) -> Estimates {
    let isin = isin_hint.or_else(|| client::isin_from_document(document));

    let estimates = locate_section(document, &ESTIMATES_ANCHOR)
        .and_then(|root| parse_table(root, TableShape::PLAIN))
        .map_err(|err| {
            tracing::warn!("Leaving estimates absent: {}", err);
            err
        })
        .ok();

    Estimates { isin, estimates }
}

// --- Tests ---
#[cfg(test)]
mod tests {
    use super::*;

    fn estimates_page(metric: &str, value: &str) -> Html {
        Html::parse_document(&format!(
            r#"<html><body>
                 <div class="box table-quotes">
                   <h1>Schätzungen zur Aktie</h1>
                   <table>
                     <tr><th>&nbsp;</th><th>2023</th></tr>
                     <tr><td>{metric}</td><td>{value}</td></tr>
                   </table>
                 </div>
               </body></html>"#
        ))
    }

    #[test]
    fn extracts_yearly_estimates() {
        let document = estimates_page("Umsatz", "1.000,5");

        let result = parse_estimates(&document, None);

        let table = result.estimates.expect("estimates should extract");
        assert_eq!(table.columns, vec!["2023"]);
        assert_eq!(table.value("Umsatz", "2023"), Some(1000.5));
    }

    #[test]
    fn dash_cells_become_missing_values() {
        let document = estimates_page("Dividende", "-");

        let result = parse_estimates(&document, None);

        let table = result.estimates.expect("estimates should extract");
        assert_eq!(table.value("Dividende", "2023"), None);
        assert_eq!(table.rows.len(), 1);
    }

    #[test]
    fn heading_must_start_with_the_label() {
        let document = Html::parse_document(
            r#"<html><body>
                 <div><h1>Keine Schätzungen verfügbar</h1></div>
               </body></html>"#,
        );

        let result = parse_estimates(&document, None);

        assert!(result.estimates.is_none());
    }

    #[test]
    fn consecutive_calls_start_from_empty_accumulators() {
        let first = estimates_page("Umsatz", "100,0");
        let second = estimates_page("EPS", "2,5");

        let first_result = parse_estimates(&first, None);
        let second_result = parse_estimates(&second, None);

        let first_table = first_result.estimates.unwrap();
        let second_table = second_result.estimates.unwrap();
        assert_eq!(first_table.rows.len(), 1);
        assert_eq!(second_table.rows.len(), 1);
        assert_eq!(second_table.rows[0].label, "EPS");
    }
}
