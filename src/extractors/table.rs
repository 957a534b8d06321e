// src/extractors/table.rs

// --- Imports ---
use crate::extractors::{element_text, numeric};
use crate::utils::error::ExtractError;
use once_cell::sync::Lazy;
use scraper::{ElementRef, Selector};
use serde::{Deserialize, Serialize};

// --- CSS Selectors (Lazy Static) ---
static HEADER_CELL_SELECTOR: Lazy<Selector> =
    Lazy::new(|| Selector::parse("th").expect("Failed to compile HEADER_CELL_SELECTOR"));

static ROW_SELECTOR: Lazy<Selector> =
    Lazy::new(|| Selector::parse("tr").expect("Failed to compile ROW_SELECTOR"));

static CELL_SELECTOR: Lazy<Selector> =
    Lazy::new(|| Selector::parse("td").expect("Failed to compile CELL_SELECTOR"));

// --- Data Structures ---

/// How many structural cells precede the data in a section's table.
/// The fundamentals tables lead every row with a checkbox cell and a
/// bold label cell; the estimates and performance tables only have the
/// label cell.
#[derive(Debug, Clone, Copy)]
pub struct TableShape {
    pub leading_header_cells: usize,
    pub leading_row_cells: usize,
}

impl TableShape {
    /// Checkbox column plus label column.
    pub const FUNDAMENTALS: TableShape = TableShape {
        leading_header_cells: 2,
        leading_row_cells: 2,
    };

    /// Label column only.
    pub const PLAIN: TableShape = TableShape {
        leading_header_cells: 1,
        leading_row_cells: 1,
    };
}

/// One metric row: its label and one normalized value per column.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TableRow {
    pub label: String,
    pub values: Vec<Option<f64>>,
}

/// A section's table with period/field labels as columns. Every
/// retained row has exactly `columns.len()` values.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SectionTable {
    pub columns: Vec<String>,
    pub rows: Vec<TableRow>,
}

impl SectionTable {
    /// Looks up a single normalized value by row label and column label.
    pub fn value(&self, row_label: &str, column: &str) -> Option<f64> {
        let column_index = self.columns.iter().position(|c| c == column)?;
        self.rows
            .iter()
            .find(|row| row.label == row_label)
            .and_then(|row| row.values.get(column_index).copied())
            .flatten()
    }
}

// --- Parser ---

/// Extracts the table under a located section root.
///
/// Column labels come from the `<th>` cells after the shape's leading
/// structural cells. Each body row pairs its label cell with the
/// remaining `<td>` texts run through the numeric normalizer. Rows
/// whose cell count does not line up with the columns are skipped, not
/// silently misaligned. Unparseable cells degrade to missing values.
pub fn parse_table(section: ElementRef<'_>, shape: TableShape) -> Result<SectionTable, ExtractError> {
    let columns: Vec<String> = section
        .select(&HEADER_CELL_SELECTOR)
        .skip(shape.leading_header_cells)
        .map(element_text)
        .collect();

    if columns.is_empty() {
        return Err(ExtractError::MissingFragment("table header cells"));
    }

    let mut rows = Vec::new();
    for table_row in section.select(&ROW_SELECTOR) {
        let cells: Vec<ElementRef> = table_row.select(&CELL_SELECTOR).collect();

        // Header rows carry <th> cells only.
        if cells.is_empty() {
            continue;
        }

        if cells.len() < shape.leading_row_cells {
            tracing::warn!(
                "Skipping row with {} cells, expected at least {} leading cells",
                cells.len(),
                shape.leading_row_cells
            );
            continue;
        }

        // The last leading cell is the label column.
        let label = element_text(cells[shape.leading_row_cells - 1]);
        let value_cells = &cells[shape.leading_row_cells..];

        if value_cells.len() != columns.len() {
            tracing::warn!(
                "Skipping row '{}': {} value cells against {} columns",
                label,
                value_cells.len(),
                columns.len()
            );
            continue;
        }

        let values = value_cells
            .iter()
            .map(|cell| {
                let raw = element_text(*cell);
                match numeric::normalize(&raw) {
                    Ok(value) => value,
                    Err(err) => {
                        tracing::debug!("Treating cell as missing: {}", err);
                        None
                    }
                }
            })
            .collect();

        rows.push(TableRow { label, values });
    }

    Ok(SectionTable { columns, rows })
}

// --- Tests ---
#[cfg(test)]
mod tests {
    use super::*;
    use scraper::Html;

    fn section_root(html: &str) -> Html {
        Html::parse_document(html)
    }

    fn first_div(document: &Html) -> ElementRef<'_> {
        let selector = Selector::parse("div").unwrap();
        document.select(&selector).next().unwrap()
    }

    #[test]
    fn parses_fundamentals_shaped_table() {
        let document = section_root(
            r#"
            <div>
              <h2>GuV</h2>
              <table>
                <thead><tr><th></th><th></th><th>2022</th><th>2023</th></tr></thead>
                <tbody>
                  <tr><td><input type="checkbox"></td><td class="font-bold">Umsatz</td><td>87.327,0</td><td>68.902,0</td></tr>
                  <tr><td><input type="checkbox"></td><td class="font-bold">Ergebnis je Aktie</td><td>-1,38</td><td>-</td></tr>
                </tbody>
              </table>
            </div>
        "#,
        );

        let table = parse_table(first_div(&document), TableShape::FUNDAMENTALS).unwrap();

        assert_eq!(table.columns, vec!["2022", "2023"]);
        assert_eq!(table.rows.len(), 2);
        assert_eq!(table.value("Umsatz", "2022"), Some(87327.0));
        assert_eq!(table.value("Ergebnis je Aktie", "2022"), Some(-1.38));
        assert_eq!(table.value("Ergebnis je Aktie", "2023"), None);
    }

    #[test]
    fn parses_plain_shaped_table() {
        let document = section_root(
            r#"
            <div>
              <h1>Schätzungen</h1>
              <table>
                <tr><th>&nbsp;</th><th>2023</th></tr>
                <tr><td>Umsatz</td><td>1.000,5</td></tr>
              </table>
            </div>
        "#,
        );

        let table = parse_table(first_div(&document), TableShape::PLAIN).unwrap();

        assert_eq!(table.columns, vec!["2023"]);
        assert_eq!(table.value("Umsatz", "2023"), Some(1000.5));
    }

    #[test]
    fn skips_rows_with_mismatched_cell_counts() {
        let document = section_root(
            r#"
            <div>
              <table>
                <tr><th></th><th>2022</th><th>2023</th></tr>
                <tr><td>Komplett</td><td>1,0</td><td>2,0</td></tr>
                <tr><td>Zu kurz</td><td>1,0</td></tr>
                <tr><td>Zu lang</td><td>1,0</td><td>2,0</td><td>3,0</td></tr>
              </table>
            </div>
        "#,
        );

        let table = parse_table(first_div(&document), TableShape::PLAIN).unwrap();

        assert_eq!(table.rows.len(), 1);
        assert_eq!(table.rows[0].label, "Komplett");
    }

    #[test]
    fn unparseable_cell_degrades_to_missing() {
        let document = section_root(
            r#"
            <div>
              <table>
                <tr><th></th><th>2023</th></tr>
                <tr><td>Dividende</td><td>k.A.</td></tr>
              </table>
            </div>
        "#,
        );

        let table = parse_table(first_div(&document), TableShape::PLAIN).unwrap();

        assert_eq!(table.rows[0].values, vec![None]);
    }

    #[test]
    fn section_without_header_cells_is_an_error() {
        let document = section_root("<div><p>Kein Inhalt</p></div>");

        let err = parse_table(first_div(&document), TableShape::PLAIN).unwrap_err();
        assert!(matches!(err, ExtractError::MissingFragment(_)));
    }
}
