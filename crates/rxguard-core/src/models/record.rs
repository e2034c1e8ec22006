//! Curated interaction dataset models.

use serde::{Deserialize, Serialize};

/// A single row of the curated drug-drug interaction dataset.
///
/// Pair matching is symmetric: (drug_a, drug_b) and (drug_b, drug_a) describe
/// the same interaction, and every lookup checks both orderings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct InteractionRecord {
    /// First drug name (reference casing, order as stored)
    pub drug_a: String,
    /// Second drug name (reference casing, order as stored)
    pub drug_b: String,
    /// Structural similarity of the two molecules (0.0 - 1.0)
    pub chemical_similarity: f64,
    /// Whether the pair is metabolized by a shared enzyme
    pub shares_metabolic_enzyme: bool,
    /// Side-effect profile overlap (0.0 - 1.0)
    pub side_effect_similarity: f64,
    /// Number of protein targets both drugs bind
    pub shared_target_count: u32,
    /// ATC classification similarity (0.0 - 1.0)
    pub atc_similarity: f64,
    /// Dataset risk label; a free string, typically "Low Risk",
    /// "Moderate Risk", or "High Risk"
    pub risk_label: String,
    /// Dataset-provided interaction probability
    pub known_score: f64,
}

impl InteractionRecord {
    /// Check whether this record describes the given pair, in either order.
    pub fn matches_pair(&self, drug_a: &str, drug_b: &str) -> bool {
        (self.drug_a.eq_ignore_ascii_case(drug_a) && self.drug_b.eq_ignore_ascii_case(drug_b))
            || (self.drug_a.eq_ignore_ascii_case(drug_b)
                && self.drug_b.eq_ignore_ascii_case(drug_a))
    }
}
