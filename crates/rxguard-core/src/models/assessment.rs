//! Interaction assessment models.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::{InteractionRecord, PrescriptionDrug};

/// Fixed-shape feature vector for a drug pair.
///
/// The shape is identical whether the values come from a dataset record or
/// from the deterministic fallback generator.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FeatureVector {
    /// Structural similarity (0.0 - 1.0)
    pub chemical_similarity: f64,
    /// Shared metabolic enzyme
    pub shares_metabolic_enzyme: bool,
    /// Side-effect profile overlap (0.0 - 1.0)
    pub side_effect_similarity: f64,
    /// Number of shared protein targets
    pub shared_target_count: u32,
    /// ATC classification similarity (0.0 - 1.0)
    pub atc_similarity: f64,
}

impl From<&InteractionRecord> for FeatureVector {
    fn from(record: &InteractionRecord) -> Self {
        Self {
            chemical_similarity: record.chemical_similarity,
            shares_metabolic_enzyme: record.shares_metabolic_enzyme,
            side_effect_similarity: record.side_effect_similarity,
            shared_target_count: record.shared_target_count,
            atc_similarity: record.atc_similarity,
        }
    }
}

/// Risk tier assigned to an interaction.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum RiskLevel {
    #[serde(rename = "Low Risk")]
    Low,
    #[serde(rename = "Moderate Risk")]
    Moderate,
    #[serde(rename = "High Risk")]
    High,
}

impl RiskLevel {
    /// The label string as it appears in the dataset and in results.
    pub fn as_str(self) -> &'static str {
        match self {
            RiskLevel::Low => "Low Risk",
            RiskLevel::Moderate => "Moderate Risk",
            RiskLevel::High => "High Risk",
        }
    }

    /// Map a blended probability to a tier.
    ///
    /// Boundaries are inclusive: 0.70 is High, 0.40 is Moderate.
    pub fn from_blended(probability: f64) -> Self {
        if probability >= 0.70 {
            RiskLevel::High
        } else if probability >= 0.40 {
            RiskLevel::Moderate
        } else {
            RiskLevel::Low
        }
    }
}

impl fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Clinical recommendation text for a risk label.
///
/// Dataset labels are free strings, so anything outside the three known
/// tiers falls through to the evaluation text.
pub fn recommendation_for(risk_label: &str) -> &'static str {
    match risk_label {
        "Low Risk" => {
            "No significant interaction expected. Continue as prescribed and \
             report any unusual symptoms."
        }
        "Moderate Risk" => {
            "Use with caution. Monitor for adverse effects and consult the \
             prescribing clinician if symptoms develop."
        }
        "High Risk" => {
            "Avoid this combination if possible. Consult the prescribing \
             clinician before co-administering these drugs."
        }
        _ => "Interaction profile unclear. Further clinical evaluation is recommended.",
    }
}

/// One estimator's output.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct EstimatorScore {
    /// Estimated interaction probability (0.0 - 1.0)
    pub probability: f64,
    /// Risk tier under this estimator's own thresholds
    pub risk: RiskLevel,
}

/// Which strategy produced a result, with per-estimator detail for the
/// hybrid path.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "strategy", rename_all = "kebab-case")]
pub enum ModelDetails {
    /// Exact match in the curated interaction dataset
    RuleBased,
    /// Blended output of the two scoring estimators
    Hybrid {
        /// Stability-oriented estimator output
        stability: EstimatorScore,
        /// Precision-oriented estimator output
        precision: EstimatorScore,
        /// 0.6/0.4 blend of the two probabilities, rounded to 4 decimals
        blended_probability: f64,
    },
}

impl ModelDetails {
    /// Strategy tag as serialized.
    pub fn strategy(&self) -> &'static str {
        match self {
            ModelDetails::RuleBased => "rule-based",
            ModelDetails::Hybrid { .. } => "hybrid",
        }
    }
}

/// The assessment produced for one drug pair.
///
/// Created fresh per pair; never persisted or mutated after construction.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DdiResult {
    /// First drug, canonical name
    pub drug_a: String,
    /// Second drug, canonical name
    pub drug_b: String,
    /// Risk label (dataset string on the rule-based path, tier label on the
    /// hybrid path)
    pub risk_label: String,
    /// Interaction probability
    pub probability: f64,
    /// Recommendation text derived from the risk label
    pub recommendation: String,
    /// Strategy and per-estimator detail
    pub model_details: ModelDetails,
}

/// Full screening output for a prescription text.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ScreeningReport {
    /// Drugs recognized in the text, in order of first occurrence
    pub drugs: Vec<PrescriptionDrug>,
    /// One result per unordered drug pair
    pub interactions: Vec<DdiResult>,
}

impl ScreeningReport {
    /// Whether enough drugs were recognized to evaluate any pair.
    ///
    /// When false, `interactions` is empty and the caller should ask for
    /// text with recognizable drug names.
    pub fn has_screenable_pair(&self) -> bool {
        self.drugs.len() >= 2
    }
}
