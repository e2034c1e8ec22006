//! Cleanup filter for OCR-derived prescription text.
//!
//! OCR itself is an external collaborator; this is the boundary contract:
//! raw string in, cleaned string out. Fixes are limited to spacing and a
//! couple of well-known unit misreads.

use regex::{Regex, RegexBuilder};

/// Cleans raw OCR output before extraction.
pub struct OcrTextCleaner {
    whitespace: Regex,
    unit_gap: Regex,
    misread_mg: Regex,
}

impl Default for OcrTextCleaner {
    fn default() -> Self {
        Self::new()
    }
}

impl OcrTextCleaner {
    /// Create a cleaner with the default fix-up patterns.
    pub fn new() -> Self {
        Self {
            whitespace: Regex::new(r"\s+").expect("static whitespace pattern"),
            unit_gap: RegexBuilder::new(r"(\d)\s+(mg|mcg|ml|g|iu)\b")
                .case_insensitive(true)
                .build()
                .expect("static unit-gap pattern"),
            // "mg" read as "rng" is the classic OCR confusion on dose lines
            misread_mg: RegexBuilder::new(r"(\d)\s*rng\b")
                .case_insensitive(true)
                .build()
                .expect("static misread-unit pattern"),
        }
    }

    /// Normalize spacing and unit glyphs in raw OCR text.
    pub fn clean(&self, raw: &str) -> String {
        let printable: String = raw
            .chars()
            .map(|c| if c.is_control() { ' ' } else { c })
            .collect();
        let collapsed = self.whitespace.replace_all(&printable, " ");
        let unit_fixed = self.misread_mg.replace_all(&collapsed, "${1}mg");
        let joined = self.unit_gap.replace_all(&unit_fixed, "$1$2");
        joined.trim().to_string()
    }
}
