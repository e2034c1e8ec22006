//! Prescription extraction models.

use serde::{Deserialize, Serialize};

/// Sentinel for dosage/frequency fields the extractor does not populate.
pub const UNSPECIFIED: &str = "unspecified";

/// A drug mention recognized in prescription text.
///
/// Dosage and frequency parsing is not implemented in the core; both fields
/// always carry the [`UNSPECIFIED`] sentinel.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PrescriptionDrug {
    /// Canonical drug name (reference casing)
    pub name: String,
    /// Dosage as written, or [`UNSPECIFIED`]
    pub dosage: String,
    /// Frequency as written, or [`UNSPECIFIED`]
    pub frequency: String,
}

impl PrescriptionDrug {
    /// Create an entry for a recognized name with sentinel dosage/frequency.
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            dosage: UNSPECIFIED.into(),
            frequency: UNSPECIFIED.into(),
        }
    }
}
