//! Prescription text resolution.
//!
//! Pipeline: OCR cleanup (boundary filter) → name standardization →
//! dictionary-bounded extraction. The interaction engine consumes the
//! extracted, canonicalized names.

mod extractor;
mod ocr;
mod standardizer;

pub use extractor::*;
pub use ocr::*;
pub use standardizer::*;
