//! Hybrid scoring model: two independent estimators over a feature vector.
//!
//! Estimator weights:
//! - Stability estimator: enzyme sharing 0.30×2.0, side-effect similarity
//!   0.25×1.5, chemical similarity 0.20, shared targets 0.15 (saturating at
//!   five), ATC similarity 0.10
//! - Precision estimator: additive contributions from a 0.05 base, with an
//!   enzyme bonus, a side-effect cutoff, a superlinear chemical term, and a
//!   logarithmic target term
//!
//! Final probability is a 0.6/0.4 blend of the two, rounded to 4 decimals.

use rand::Rng;

use crate::models::{EstimatorScore, FeatureVector, RiskLevel};

// Stability estimator importance weights.
const STABILITY_ENZYME_WEIGHT: f64 = 0.30;
const STABILITY_ENZYME_SCALE: f64 = 2.0;
const STABILITY_SIDE_EFFECT_WEIGHT: f64 = 0.25;
const STABILITY_SIDE_EFFECT_SCALE: f64 = 1.5;
const STABILITY_CHEMICAL_WEIGHT: f64 = 0.20;
const STABILITY_TARGET_WEIGHT: f64 = 0.15;
const STABILITY_TARGET_SATURATION: f64 = 5.0;
const STABILITY_ATC_WEIGHT: f64 = 0.10;

// Precision estimator contributions.
const PRECISION_BASE: f64 = 0.05;
const PRECISION_ENZYME_BONUS: f64 = 0.40;
const PRECISION_ENZYME_SIDE_EFFECT_SCALE: f64 = 0.30;
const PRECISION_SIDE_EFFECT_CUTOFF: f64 = 0.6;
const PRECISION_SIDE_EFFECT_FLAT: f64 = 0.25;
const PRECISION_SIDE_EFFECT_SCALE: f64 = 0.15;
const PRECISION_CHEMICAL_WEIGHT: f64 = 0.20;
const PRECISION_CHEMICAL_EXPONENT: f64 = 1.5;
const PRECISION_TARGET_WEIGHT: f64 = 0.10;
const PRECISION_ATC_WEIGHT: f64 = 0.10;

// Per-estimator risk thresholds (inclusive).
const STABILITY_HIGH_THRESHOLD: f64 = 0.70;
const STABILITY_MODERATE_THRESHOLD: f64 = 0.40;
const PRECISION_HIGH_THRESHOLD: f64 = 0.65;
const PRECISION_MODERATE_THRESHOLD: f64 = 0.35;

// Blend weights and jitter amplitudes.
const BLEND_STABILITY_WEIGHT: f64 = 0.6;
const BLEND_PRECISION_WEIGHT: f64 = 0.4;
const STABILITY_JITTER: f64 = 0.05;
const PRECISION_JITTER: f64 = 0.025;

/// Output of a full hybrid prediction.
#[derive(Debug, Clone, PartialEq)]
pub struct HybridPrediction {
    /// Stability estimator output
    pub stability: EstimatorScore,
    /// Precision estimator output
    pub precision: EstimatorScore,
    /// 0.6/0.4 blend, rounded to 4 decimals
    pub blended_probability: f64,
    /// Risk tier of the blended probability
    pub risk: RiskLevel,
}

/// The blended scoring model.
///
/// Jitter amplitudes are per-instance so tests can zero them; the estimators
/// are otherwise pure functions of the feature vector.
pub struct HybridModel {
    stability_jitter: f64,
    precision_jitter: f64,
}

impl Default for HybridModel {
    fn default() -> Self {
        Self::new()
    }
}

impl HybridModel {
    /// Model with production jitter (±0.05 stability, ±0.025 precision).
    pub fn new() -> Self {
        Self {
            stability_jitter: STABILITY_JITTER,
            precision_jitter: PRECISION_JITTER,
        }
    }

    /// Model without jitter; repeat predictions are bit-identical.
    pub fn deterministic() -> Self {
        Self {
            stability_jitter: 0.0,
            precision_jitter: 0.0,
        }
    }

    /// Run both estimators concurrently and blend their probabilities.
    pub async fn predict(&self, features: &FeatureVector) -> HybridPrediction {
        let (stability, precision) = tokio::join!(
            self.stability_estimate(features),
            self.precision_estimate(features),
        );

        let blended = blend(stability.probability, precision.probability);
        HybridPrediction {
            stability,
            precision,
            blended_probability: blended,
            risk: RiskLevel::from_blended(blended),
        }
    }

    /// Stability-oriented estimator: weighted linear sum.
    async fn stability_estimate(&self, features: &FeatureVector) -> EstimatorScore {
        let probability = apply_jitter(stability_score(features), self.stability_jitter);
        let risk = if probability >= STABILITY_HIGH_THRESHOLD {
            RiskLevel::High
        } else if probability >= STABILITY_MODERATE_THRESHOLD {
            RiskLevel::Moderate
        } else {
            RiskLevel::Low
        };
        EstimatorScore { probability, risk }
    }

    /// Precision-oriented estimator: additive contributions with cutoffs.
    async fn precision_estimate(&self, features: &FeatureVector) -> EstimatorScore {
        let probability = apply_jitter(precision_score(features), self.precision_jitter);
        let risk = if probability >= PRECISION_HIGH_THRESHOLD {
            RiskLevel::High
        } else if probability >= PRECISION_MODERATE_THRESHOLD {
            RiskLevel::Moderate
        } else {
            RiskLevel::Low
        };
        EstimatorScore { probability, risk }
    }
}

/// Jitter-free stability score, clipped to [0, 1].
fn stability_score(features: &FeatureVector) -> f64 {
    let enzyme = if features.shares_metabolic_enzyme { 1.0 } else { 0.0 };
    let target_load =
        (f64::from(features.shared_target_count) / STABILITY_TARGET_SATURATION).min(1.0);

    let raw = STABILITY_ENZYME_WEIGHT * STABILITY_ENZYME_SCALE * enzyme
        + STABILITY_SIDE_EFFECT_WEIGHT * STABILITY_SIDE_EFFECT_SCALE * features.side_effect_similarity
        + STABILITY_CHEMICAL_WEIGHT * features.chemical_similarity
        + STABILITY_TARGET_WEIGHT * target_load
        + STABILITY_ATC_WEIGHT * features.atc_similarity;
    raw.clamp(0.0, 1.0)
}

/// Jitter-free precision score, clipped to [0, 1].
fn precision_score(features: &FeatureVector) -> f64 {
    let mut raw = PRECISION_BASE;

    if features.shares_metabolic_enzyme {
        raw += PRECISION_ENZYME_BONUS
            + features.side_effect_similarity * PRECISION_ENZYME_SIDE_EFFECT_SCALE;
    }

    if features.side_effect_similarity > PRECISION_SIDE_EFFECT_CUTOFF {
        raw += PRECISION_SIDE_EFFECT_FLAT;
    } else {
        raw += features.side_effect_similarity * PRECISION_SIDE_EFFECT_SCALE;
    }

    raw += features
        .chemical_similarity
        .powf(PRECISION_CHEMICAL_EXPONENT)
        * PRECISION_CHEMICAL_WEIGHT;

    if features.shared_target_count > 0 {
        raw += (f64::from(features.shared_target_count) + 1.0).ln() * PRECISION_TARGET_WEIGHT;
    }

    raw += features.atc_similarity * PRECISION_ATC_WEIGHT;
    raw.clamp(0.0, 1.0)
}

/// Blend the two estimator probabilities, rounded to 4 decimals.
fn blend(stability_probability: f64, precision_probability: f64) -> f64 {
    round4(
        BLEND_STABILITY_WEIGHT * stability_probability
            + BLEND_PRECISION_WEIGHT * precision_probability,
    )
}

fn apply_jitter(probability: f64, amplitude: f64) -> f64 {
    if amplitude == 0.0 {
        return probability;
    }
    let jitter = rand::thread_rng().gen_range(-amplitude..=amplitude);
    (probability + jitter).clamp(0.0, 1.0)
}

fn round4(value: f64) -> f64 {
    (value * 10_000.0).round() / 10_000.0
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;

    fn features(
        chemical: f64,
        enzyme: bool,
        side_effect: f64,
        targets: u32,
        atc: f64,
    ) -> FeatureVector {
        FeatureVector {
            chemical_similarity: chemical,
            shares_metabolic_enzyme: enzyme,
            side_effect_similarity: side_effect,
            shared_target_count: targets,
            atc_similarity: atc,
        }
    }

    #[test]
    fn test_blend_arithmetic() {
        assert_eq!(blend(0.8, 0.5), 0.68);
        assert_eq!(blend(0.0, 0.0), 0.0);
        assert_eq!(blend(1.0, 1.0), 1.0);
        // Rounding to 4 decimals
        assert_eq!(blend(0.33333, 0.33333), 0.3333);
    }

    #[test]
    fn test_stability_score_saturating_weights() {
        // Everything maxed saturates well past 1.0 and clips
        let maxed = features(1.0, true, 1.0, 5, 1.0);
        assert_eq!(stability_score(&maxed), 1.0);

        // Nothing contributes
        let zeroed = features(0.0, false, 0.0, 0, 0.0);
        assert_eq!(stability_score(&zeroed), 0.0);

        // Enzyme sharing alone carries 0.6
        let enzyme_only = features(0.0, true, 0.0, 0, 0.0);
        assert!((stability_score(&enzyme_only) - 0.6).abs() < 1e-12);

        // Target count saturates at five
        let five = features(0.0, false, 0.0, 5, 0.0);
        let fifty = features(0.0, false, 0.0, 50, 0.0);
        assert_eq!(stability_score(&five), stability_score(&fifty));
    }

    #[test]
    fn test_precision_score_cutoffs() {
        // Base contribution only
        let zeroed = features(0.0, false, 0.0, 0, 0.0);
        assert!((precision_score(&zeroed) - 0.05).abs() < 1e-12);

        // Side-effect similarity above the cutoff earns the flat bonus
        let above = features(0.0, false, 0.61, 0, 0.0);
        assert!((precision_score(&above) - 0.30).abs() < 1e-12);

        // At the cutoff, the scaled term applies instead
        let at = features(0.0, false, 0.6, 0, 0.0);
        assert!((precision_score(&at) - (0.05 + 0.6 * 0.15)).abs() < 1e-12);

        // Zero shared targets contribute nothing; one contributes ln(2)*0.1
        let one_target = features(0.0, false, 0.0, 1, 0.0);
        assert!((precision_score(&one_target) - (0.05 + 2.0f64.ln() * 0.10)).abs() < 1e-12);
    }

    #[tokio::test]
    async fn test_deterministic_model_is_repeatable() {
        let model = HybridModel::deterministic();
        let input = features(0.6, true, 0.7, 3, 0.4);

        let first = model.predict(&input).await;
        let second = model.predict(&input).await;
        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn test_prediction_records_both_estimators() {
        let model = HybridModel::deterministic();
        let input = features(0.6, true, 0.7, 3, 0.4);

        let prediction = model.predict(&input).await;

        let expected = blend(
            stability_score(&input),
            precision_score(&input),
        );
        assert_eq!(prediction.blended_probability, expected);
        assert_eq!(prediction.stability.probability, stability_score(&input));
        assert_eq!(prediction.precision.probability, precision_score(&input));
        assert_eq!(prediction.risk, RiskLevel::from_blended(expected));
    }

    #[tokio::test]
    async fn test_jitter_stays_in_bounds() {
        let model = HybridModel::new();
        let maxed = features(1.0, true, 1.0, 5, 1.0);
        let zeroed = features(0.0, false, 0.0, 0, 0.0);

        for _ in 0..50 {
            let high = model.predict(&maxed).await;
            assert!(high.stability.probability <= 1.0);
            assert!(high.precision.probability <= 1.0);
            assert!((0.0..=1.0).contains(&high.blended_probability));

            let low = model.predict(&zeroed).await;
            assert!(low.stability.probability >= 0.0);
            assert!(low.precision.probability >= 0.0);
            assert!((0.0..=1.0).contains(&low.blended_probability));
        }
    }

    proptest! {
        #[test]
        fn prop_scores_stay_in_unit_interval(
            chemical in 0.0f64..=1.0,
            enzyme in proptest::bool::ANY,
            side_effect in 0.0f64..=1.0,
            targets in 0u32..=50,
            atc in 0.0f64..=1.0,
        ) {
            let input = features(chemical, enzyme, side_effect, targets, atc);

            let stability = stability_score(&input);
            let precision = precision_score(&input);
            prop_assert!((0.0..=1.0).contains(&stability));
            prop_assert!((0.0..=1.0).contains(&precision));
            prop_assert!((0.0..=1.0).contains(&blend(stability, precision)));
        }
    }
}
