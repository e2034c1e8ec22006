//! In-memory store for the curated interaction dataset.

use std::collections::HashSet;
use std::path::Path;
use std::sync::OnceLock;

use serde::Deserialize;
use tracing::{debug, info, warn};

use crate::models::InteractionRecord;

/// Raw CSV row of the curated interaction dataset.
#[derive(Debug, Deserialize)]
struct RawInteractionRow {
    #[serde(rename = "Drug1_Name")]
    drug1_name: String,
    #[serde(rename = "Drug2_Name")]
    drug2_name: String,
    #[serde(rename = "Chem_Sim")]
    chem_sim: f64,
    #[serde(rename = "Same_Enzyme")]
    same_enzyme: u8,
    #[serde(rename = "SideEffect_Sim")]
    side_effect_sim: f64,
    #[serde(rename = "Shared_Targets")]
    shared_targets: u32,
    #[serde(rename = "ATC_Similarity")]
    atc_similarity: f64,
    #[serde(rename = "Risk_Label")]
    risk_label: String,
    #[serde(rename = "Y_Score")]
    y_score: f64,
}

impl From<RawInteractionRow> for InteractionRecord {
    fn from(row: RawInteractionRow) -> Self {
        Self {
            drug_a: row.drug1_name,
            drug_b: row.drug2_name,
            chemical_similarity: row.chem_sim,
            shares_metabolic_enzyme: row.same_enzyme != 0,
            side_effect_similarity: row.side_effect_sim,
            shared_target_count: row.shared_targets,
            atc_similarity: row.atc_similarity,
            risk_label: row.risk_label,
            known_score: row.y_score,
        }
    }
}

/// Read-only store of [`InteractionRecord`]s, populated once at startup.
///
/// A failed load leaves the store empty — lookups then degrade to fallback
/// behavior instead of surfacing an error to callers.
pub struct ReferenceDataStore {
    records: Vec<InteractionRecord>,
    names: OnceLock<Vec<String>>,
}

impl ReferenceDataStore {
    /// Create an empty store.
    pub fn empty() -> Self {
        Self::from_records(Vec::new())
    }

    /// Create a store from in-memory records (for testing and embedding).
    pub fn from_records(records: Vec<InteractionRecord>) -> Self {
        Self {
            records,
            names: OnceLock::new(),
        }
    }

    /// Load the dataset from a CSV file.
    ///
    /// A file-level failure is logged and yields an empty store. Rows that
    /// fail to decode are skipped individually.
    pub fn load_from_path<P: AsRef<Path>>(path: P) -> Self {
        let path = path.as_ref();
        match Self::read_csv(path) {
            Ok(records) => {
                info!(count = records.len(), ?path, "loaded interaction dataset");
                Self::from_records(records)
            }
            Err(err) => {
                warn!(?path, error = %err, "failed to load interaction dataset; store is empty");
                Self::empty()
            }
        }
    }

    fn read_csv(path: &Path) -> anyhow::Result<Vec<InteractionRecord>> {
        let mut reader = csv::Reader::from_path(path)?;
        let mut records = Vec::new();
        for (index, result) in reader.deserialize::<RawInteractionRow>().enumerate() {
            match result {
                Ok(row) => records.push(row.into()),
                Err(err) => {
                    warn!(row = index + 1, error = %err, "skipping undecodable dataset row");
                }
            }
        }
        Ok(records)
    }

    /// All records, in dataset order.
    pub fn all(&self) -> &[InteractionRecord] {
        &self.records
    }

    /// Number of records.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the store holds no records.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Find the record for a pair, checking both orderings (case-insensitive).
    pub fn find_pair(&self, drug_a: &str, drug_b: &str) -> Option<&InteractionRecord> {
        self.records.iter().find(|r| r.matches_pair(drug_a, drug_b))
    }

    /// Every distinct drug name in the dataset, in first-seen order.
    ///
    /// Both name columns contribute. Built lazily, once; iteration order is
    /// load-bearing for the standardizer's containment match.
    pub fn names(&self) -> &[String] {
        self.names.get_or_init(|| {
            let mut seen = HashSet::new();
            let mut names = Vec::new();
            for record in &self.records {
                for name in [&record.drug_a, &record.drug_b] {
                    if seen.insert(name.to_lowercase()) {
                        names.push(name.clone());
                    }
                }
            }
            debug!(count = names.len(), "built reference name universe");
            names
        })
    }

    /// Eagerly build the name universe.
    pub fn warm(&self) {
        let _ = self.names();
    }
}
