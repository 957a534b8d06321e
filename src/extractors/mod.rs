// src/extractors/mod.rs
pub mod isin;
pub mod numeric;
pub mod section;
pub mod table;

use scraper::{node::Node, ElementRef};

// Re-export key extraction types for convenience
#[allow(unused_imports)]
pub use section::{HeadingLocator, SectionAnchor, SectionLocator};
#[allow(unused_imports)]
pub use table::{SectionTable, TableRow, TableShape};

/// Collects an element's text, descendants included, collapsed to
/// single-spaced form. Non-breaking spaces count as whitespace.
pub(crate) fn element_text(element: ElementRef<'_>) -> String {
    element
        .text()
        .collect::<String>()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

/// Text from the element's immediate text children only. Skips nested
/// markup such as the currency span inside a price cell.
pub(crate) fn direct_text(element: ElementRef<'_>) -> String {
    let mut out = String::new();
    for child in element.children() {
        if let Node::Text(text_node) = child.value() {
            out.push_str(&text_node.text);
        }
    }
    out.split_whitespace().collect::<Vec<_>>().join(" ")
}
