// src/extractors/section.rs

// --- Imports ---
use crate::extractors::element_text;
use crate::utils::error::ExtractError;
use regex::Regex;
use scraper::{ElementRef, Html, Selector};

// --- Data Structures ---

/// Where to look for a section on a page: which heading elements to
/// scan, and what their text must match. The anchor's parent element is
/// treated as the section root, since the site renders each data
/// category as a heading followed by its table inside one container.
pub struct SectionAnchor {
    heading: Selector,
    label: Regex,
}

impl SectionAnchor {
    /// Compiles an anchor from a CSS heading selector (e.g. `"h2"`,
    /// `"h3.box-headline"`) and a label pattern fragment (e.g.
    /// `"Bilanz"`, `"^Schätzungen"`). Both are fixed at build time, so
    /// failing to compile is a programming error.
    pub fn new(heading_selector: &str, label_pattern: &str) -> Self {
        Self {
            heading: Selector::parse(heading_selector)
                .expect("Failed to compile section heading selector"),
            label: Regex::new(label_pattern).expect("Failed to compile section label pattern"),
        }
    }

    pub fn label(&self) -> &str {
        self.label.as_str()
    }
}

// --- Locator ---

/// Finding a section root is the one capability the orchestrators need
/// from a document. Behind a trait so the pipeline can be exercised
/// against canned documents.
pub trait SectionLocator {
    fn locate<'a>(
        &self,
        document: &'a Html,
        anchor: &SectionAnchor,
    ) -> Result<ElementRef<'a>, ExtractError>;
}

/// Locates sections by scanning heading elements and matching their
/// text against the anchor's label pattern.
pub struct HeadingLocator;

impl SectionLocator for HeadingLocator {
    fn locate<'a>(
        &self,
        document: &'a Html,
        anchor: &SectionAnchor,
    ) -> Result<ElementRef<'a>, ExtractError> {
        for heading in document.select(&anchor.heading) {
            let text = element_text(heading);
            if !anchor.label.is_match(&text) {
                continue;
            }

            tracing::debug!(
                "Matched heading <{}> '{}' for label '{}'",
                heading.value().name(),
                text,
                anchor.label()
            );

            if let Some(parent) = heading.parent().and_then(ElementRef::wrap) {
                return Ok(parent);
            }
        }

        Err(ExtractError::SectionNotFound(anchor.label().to_string()))
    }
}

/// Locates a section with the default heading-text strategy.
pub fn locate_section<'a>(
    document: &'a Html,
    anchor: &SectionAnchor,
) -> Result<ElementRef<'a>, ExtractError> {
    HeadingLocator.locate(document, anchor)
}
