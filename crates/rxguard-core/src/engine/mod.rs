//! Interaction resolution engine.
//!
//! For each drug pair: exact rule-based lookup in the curated dataset first,
//! otherwise feature derivation plus the blended hybrid scoring model.

mod features;
mod scoring;

pub use features::*;
pub use scoring::*;

use thiserror::Error;
use tracing::debug;

use crate::models::{
    recommendation_for, DdiResult, ModelDetails, PrescriptionDrug, ScreeningReport,
};
use crate::resolver::{DrugExtractor, NameStandardizer};
use crate::store::ReferenceDataStore;

/// Engine errors.
#[derive(Error, Debug)]
pub enum EngineError {
    #[error("Blank drug name in pair ({0:?}, {1:?})")]
    BlankDrugName(String, String),
}

pub type EngineResult<T> = Result<T, EngineError>;

/// Top-level coordinator for drug-drug interaction resolution.
pub struct InteractionEngine<'a> {
    store: &'a ReferenceDataStore,
    standardizer: NameStandardizer<'a>,
    extractor: DrugExtractor<'a>,
    features: FeatureResolver<'a>,
    model: HybridModel,
}

impl<'a> InteractionEngine<'a> {
    /// Create an engine over the given store with the production model.
    pub fn new(store: &'a ReferenceDataStore) -> Self {
        Self::with_model(store, HybridModel::new())
    }

    /// Create an engine with a caller-supplied model (e.g. a deterministic
    /// one in tests).
    pub fn with_model(store: &'a ReferenceDataStore, model: HybridModel) -> Self {
        Self {
            store,
            standardizer: NameStandardizer::new(store),
            extractor: DrugExtractor::new(store),
            features: FeatureResolver::new(store),
            model,
        }
    }

    /// Extract up to two recognized drugs from prescription text.
    pub fn extract_prescription_drugs(&self, text: &str) -> Vec<PrescriptionDrug> {
        self.extractor.extract(text)
    }

    /// Rule-based path: exact symmetric lookup in the curated dataset.
    ///
    /// Returns `None` when no record covers the pair.
    pub fn rule_based_ddi(&self, drug_a: &str, drug_b: &str) -> Option<DdiResult> {
        let a = self.standardizer.standardize(drug_a);
        let b = self.standardizer.standardize(drug_b);

        let record = self.store.find_pair(&a, &b)?;
        debug!(drug_a = %a, drug_b = %b, "rule-based dataset hit");

        Some(DdiResult {
            drug_a: a,
            drug_b: b,
            risk_label: record.risk_label.clone(),
            probability: record.known_score,
            recommendation: recommendation_for(&record.risk_label).to_string(),
            model_details: ModelDetails::RuleBased,
        })
    }

    /// Hybrid path: derive features and run the blended scoring model.
    ///
    /// Errors only on blank names; for any non-empty pair the fallback
    /// feature generator guarantees a result.
    pub async fn predict_with_hybrid_model(
        &self,
        drug_a: &str,
        drug_b: &str,
    ) -> EngineResult<DdiResult> {
        if drug_a.trim().is_empty() || drug_b.trim().is_empty() {
            return Err(EngineError::BlankDrugName(
                drug_a.to_string(),
                drug_b.to_string(),
            ));
        }

        let a = self.standardizer.standardize(drug_a);
        let b = self.standardizer.standardize(drug_b);

        let features = self.features.resolve(&a, &b);
        let prediction = self.model.predict(&features).await;
        debug!(
            drug_a = %a,
            drug_b = %b,
            blended = prediction.blended_probability,
            "hybrid model prediction"
        );

        Ok(DdiResult {
            drug_a: a,
            drug_b: b,
            risk_label: prediction.risk.as_str().to_string(),
            probability: prediction.blended_probability,
            recommendation: recommendation_for(prediction.risk.as_str()).to_string(),
            model_details: ModelDetails::Hybrid {
                stability: prediction.stability,
                precision: prediction.precision,
                blended_probability: prediction.blended_probability,
            },
        })
    }

    /// Resolve one pair: rule-based first, hybrid fallback.
    pub async fn resolve_pair(&self, drug_a: &str, drug_b: &str) -> EngineResult<DdiResult> {
        if let Some(result) = self.rule_based_ddi(drug_a, drug_b) {
            return Ok(result);
        }
        self.predict_with_hybrid_model(drug_a, drug_b).await
    }

    /// Screen a prescription text: extract drugs, then resolve every
    /// unordered pair.
    ///
    /// Fewer than two recognized drugs yields a report with no
    /// interactions; callers decide how to present that.
    pub async fn screen_prescription(&self, text: &str) -> EngineResult<ScreeningReport> {
        let drugs = self.extractor.extract(text);

        let pair_count = drugs.len() * drugs.len().saturating_sub(1) / 2;
        let mut interactions = Vec::with_capacity(pair_count);
        for (index, first) in drugs.iter().enumerate() {
            for second in &drugs[index + 1..] {
                interactions.push(self.resolve_pair(&first.name, &second.name).await?);
            }
        }

        Ok(ScreeningReport {
            drugs,
            interactions,
        })
    }
}
