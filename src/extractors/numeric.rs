// src/extractors/numeric.rs
use crate::utils::error::ExtractError;

// The site renders absent values as a bare dash.
const MISSING: &str = "-";

/// Converts a raw cell string in German number format into a float.
///
/// `"-"` and empty cells are the explicit missing marker and yield
/// `Ok(None)`. Otherwise the thousands separator (`.`) is stripped
/// first, then the decimal comma becomes a decimal point, then units
/// and garnish (`EUR`, `%`, `+`, embedded spaces) are dropped. Anything
/// that still fails to parse is an `UnparseableNumber`; table-level
/// callers degrade that to a missing value instead of failing the page.
pub fn normalize(raw: &str) -> Result<Option<f64>, ExtractError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() || trimmed == MISSING {
        return Ok(None);
    }

    // Order matters: "1.234,56" must lose its thousands dots before the
    // comma is rewritten, or the dots would be read as decimal points.
    let rewritten = trimmed.replace('.', "").replace(',', ".");
    let cleaned: String = rewritten
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == '.' || *c == '-')
        .collect();

    if cleaned.is_empty() {
        return Err(ExtractError::UnparseableNumber(raw.to_string()));
    }

    cleaned
        .parse::<f64>()
        .map(Some)
        .map_err(|_| ExtractError::UnparseableNumber(raw.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_german_thousands_and_decimal() {
        assert_eq!(normalize("1.234,56").unwrap(), Some(1234.56));
        assert_eq!(normalize("1.000,5").unwrap(), Some(1000.5));
        assert_eq!(normalize("12.345").unwrap(), Some(12345.0));
    }

    #[test]
    fn dash_is_missing() {
        assert_eq!(normalize("-").unwrap(), None);
        assert_eq!(normalize(" - ").unwrap(), None);
        assert_eq!(normalize("").unwrap(), None);
    }

    #[test]
    fn strips_units_and_garnish() {
        assert_eq!(normalize("3,40 EUR").unwrap(), Some(3.4));
        assert_eq!(normalize("+0,75%").unwrap(), Some(0.75));
        assert_eq!(normalize("7,31").unwrap(), Some(7.31));
    }

    #[test]
    fn keeps_the_sign() {
        assert_eq!(normalize("-1,05").unwrap(), Some(-1.05));
        assert_eq!(normalize("-0,34 EUR").unwrap(), Some(-0.34));
    }

    #[test]
    fn rejects_residual_junk() {
        assert!(matches!(
            normalize("n/a"),
            Err(ExtractError::UnparseableNumber(_))
        ));
        assert!(matches!(
            normalize("k.A."),
            Err(ExtractError::UnparseableNumber(_))
        ));
    }
}
