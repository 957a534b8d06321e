// src/utils/html_debug.rs
use std::fs;
use std::path::PathBuf;

use once_cell::sync::Lazy;
use regex::Regex;

use crate::utils::error::AppError;

/// When set, every fetched page is saved to this directory with the
/// recognized landmarks highlighted.
pub const DEBUG_DIR_ENV: &str = "FINANZEN_DEBUG_DIR";

/// Markup landmarks the extractors rely on. If one of these stops
/// matching after a site relaunch, the annotated dump shows what is
/// still there.
const LANDMARK_PATTERNS: &[(&str, &str)] = &[
    (
        r"(?i)<h2[^>]*>[^<]*(?:Die Aktie|Unternehmenskennzahlen|GuV|Bilanz|sonstige Angaben)[^<]*</h2>",
        "section",
    ),
    (
        r"(?i)<h3[^>]*box-headline[^>]*>[^<]*Performance[^<]*</h3>",
        "section",
    ),
    (r"(?i)<h1[^>]*>\s*Schätzungen[^<]*</h1>", "section"),
    (
        r#"(?i)<div[^>]*class=['"][^'"]*quotebox[^'"]*['"][^>]*>"#,
        "quote",
    ),
    (r"(?i)<span[^>]*instrument-id[^>]*>", "quote"),
    (
        r#"(?i)<div[^>]*class=['"][^'"]*special_info_box[^'"]*['"][^>]*>"#,
        "error",
    ),
    (r#"(?i)<table[^>]*class=['"][^'"]*table[^'"]*['"][^>]*>"#, "table"),
];

static COMPILED_LANDMARKS: Lazy<Vec<(Regex, &'static str)>> = Lazy::new(|| {
    LANDMARK_PATTERNS
        .iter()
        .filter_map(|(pattern, kind)| Regex::new(pattern).ok().map(|re| (re, *kind)))
        .collect()
});

/// Saves a fetched page into `dir` with landmark matches wrapped in
/// highlight spans. The filename is derived from the request URL.
pub fn dump_annotated(html: &str, dir: &str, url: &str) -> Result<PathBuf, AppError> {
    fs::create_dir_all(dir)?;

    let slug: String = url
        .trim_start_matches("https://")
        .trim_start_matches("http://")
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() { c } else { '_' })
        .collect();
    let path = PathBuf::from(dir).join(format!("{}.html", slug));

    let mut highlights = Vec::new();
    for (re, kind) in COMPILED_LANDMARKS.iter() {
        for mat in re.find_iter(html) {
            highlights.push((mat.start(), mat.end(), *kind));
        }
    }

    let annotated = annotate(html, &mut highlights);
    fs::write(&path, annotated)?;

    tracing::info!("Saved annotated debug HTML to {}", path.display());
    Ok(path)
}

/// Builds the annotated document by splicing highlight spans around the
/// matched byte ranges.
fn annotate(html: &str, highlights: &mut Vec<(usize, usize, &str)>) -> String {
    let mut out = String::from(
        "<!DOCTYPE html>\n<html>\n<head>\n<style>\n\
         .highlight-section { background-color: #90EE90; }\n\
         .highlight-quote { background-color: #ADD8E6; }\n\
         .highlight-error { background-color: #FFC0CB; }\n\
         .highlight-table { background-color: #FFFF00; }\n\
         </style>\n</head>\n<body>\n",
    );

    highlights.sort_by_key(|h| h.0);

    let mut last_pos = 0;
    for &(start, end, kind) in highlights.iter() {
        // Overlapping matches would splice mid-span; keep the first one.
        if start < last_pos {
            continue;
        }
        out.push_str(&html[last_pos..start]);
        out.push_str(&format!(
            "<span class=\"highlight-{}\" title=\"Position: {}-{}\">",
            kind, start, end
        ));
        out.push_str(&html[start..end]);
        out.push_str("</span>");
        last_pos = end;
    }
    out.push_str(&html[last_pos..]);
    out.push_str("\n</body>\n</html>");

    out
}
