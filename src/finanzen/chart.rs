// src/finanzen/chart.rs
use once_cell::sync::Lazy;
use scraper::Html;

use crate::extractors::section::{locate_section, SectionAnchor};
use crate::extractors::table::{parse_table, TableShape};
use crate::finanzen::client::{self, Endpoint};
use crate::finanzen::models::ChartInfos;
use crate::utils::error::AppError;

// The performance overview sits in a box headline on the chart page,
// unlike the h2 sections of the balance-sheet page.
static PERFORMANCE_ANCHOR: Lazy<SectionAnchor> =
    Lazy::new(|| SectionAnchor::new("h3.box-headline", "Performance"));

/// Fetches the performance overview from a stock's chart page.
pub async fn get_chart_infos(stock: &str) -> Result<ChartInfos, AppError> {
    let stock = stock.to_lowercase();
    let (url, isin_hint) = client::join_url(Endpoint::Stock, &stock);

    let body = client::fetch_page(&url).await?;
    let document = Html::parse_document(&body);
    client::check_site(&document)?;

    Ok(parse_chart_infos(&document, isin_hint))
}

pub fn parse_chart_infos(document: &Html, isin_hint: Option<String>) -> ChartInfos {
    let isin = isin_hint.or_else(|| client::isin_from_document(document));

    let performance = locate_section(document, &PERFORMANCE_ANCHOR)
        .and_then(|root| parse_table(root, TableShape::PLAIN))
        .map_err(|err| {
            tracing::warn!("Leaving performance absent: {}", err);
            err
        })
        .ok();

    ChartInfos { isin, performance }
}

// --- Tests ---
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extracts_performance_rows() {
        let document = Html::parse_document(
            r#"<html>
                 <head><meta property="og:title" content="BASF | DE000BASF111"></head>
                 <body>
                   <div class="box">
                     <h3 class="box-headline">Performance BASF Aktie</h3>
                     <table>
                       <tr><th>Zeitraum</th><th>%</th></tr>
                       <tr><td>1 Monat</td><td>+2,54%</td></tr>
                       <tr><td>1 Jahr</td><td>-12,30%</td></tr>
                     </table>
                   </div>
                 </body>
               </html>"#,
        );

        let infos = parse_chart_infos(&document, None);

        assert_eq!(infos.isin.as_deref(), Some("DE000BASF111"));
        let performance = infos.performance.expect("performance should extract");
        assert_eq!(performance.value("1 Monat", "%"), Some(2.54));
        assert_eq!(performance.value("1 Jahr", "%"), Some(-12.3));
    }

    #[test]
    fn page_without_performance_box_degrades() {
        let document =
            Html::parse_document("<html><body><h3>Performance</h3></body></html>");

        let infos = parse_chart_infos(&document, Some("DE0007164600".to_string()));

        assert!(infos.performance.is_none());
        assert_eq!(infos.isin.as_deref(), Some("DE0007164600"));
    }
}
