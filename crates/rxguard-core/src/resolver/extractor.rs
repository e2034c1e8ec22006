//! Dictionary-bounded drug extraction from prescription text.
//!
//! Only names present in the reference dataset can be detected; text-side
//! matching is whole-word and case-insensitive.

use std::sync::OnceLock;

use regex::RegexBuilder;
use tracing::{debug, warn};

use super::NameStandardizer;
use crate::models::PrescriptionDrug;
use crate::store::ReferenceDataStore;

/// Maximum number of distinct drugs extracted from one text.
const MAX_EXTRACTED_DRUGS: usize = 2;

/// A dictionary name with its compiled word-boundary pattern.
struct DictionaryEntry {
    name: String,
    pattern: regex::Regex,
}

/// Extractor that scans free-form text for reference drug names.
pub struct DrugExtractor<'a> {
    store: &'a ReferenceDataStore,
    standardizer: NameStandardizer<'a>,
    /// Longest-first dictionary, compiled once per instance
    dictionary: OnceLock<Vec<DictionaryEntry>>,
}

impl<'a> DrugExtractor<'a> {
    /// Create an extractor over the given store.
    pub fn new(store: &'a ReferenceDataStore) -> Self {
        Self {
            store,
            standardizer: NameStandardizer::new(store),
            dictionary: OnceLock::new(),
        }
    }

    /// Extract up to [`MAX_EXTRACTED_DRUGS`] distinct drugs from the text,
    /// in order of first occurrence.
    pub fn extract(&self, text: &str) -> Vec<PrescriptionDrug> {
        if text.trim().is_empty() {
            return Vec::new();
        }

        // Collect every whole-word occurrence of every dictionary name.
        // Longer names are scanned first, so at equal offsets a multi-word
        // name outranks a shorter colliding one after the stable sort.
        let mut matches: Vec<(usize, &str)> = Vec::new();
        for entry in self.dictionary() {
            for found in entry.pattern.find_iter(text) {
                matches.push((found.start(), entry.name.as_str()));
            }
        }
        matches.sort_by_key(|(offset, _)| *offset);

        let mut accepted: Vec<String> = Vec::new();
        for (_, name) in matches {
            let canonical = self.standardizer.standardize(name);
            if accepted
                .iter()
                .any(|existing| existing.eq_ignore_ascii_case(&canonical))
            {
                continue;
            }
            accepted.push(canonical);
            if accepted.len() == MAX_EXTRACTED_DRUGS {
                break;
            }
        }

        accepted.into_iter().map(PrescriptionDrug::named).collect()
    }

    /// Eagerly compile the dictionary.
    pub fn warm(&self) {
        let _ = self.dictionary();
    }

    /// Drop the compiled dictionary so the next call rebuilds it.
    pub fn reset(&mut self) {
        self.dictionary = OnceLock::new();
    }

    fn dictionary(&self) -> &[DictionaryEntry] {
        self.dictionary.get_or_init(|| {
            let mut names: Vec<&String> = self.store.names().iter().collect();
            // Longest first; the sort is stable, so equal-length names keep
            // their first-seen order
            names.sort_by(|a, b| b.chars().count().cmp(&a.chars().count()));

            let entries: Vec<DictionaryEntry> = names
                .into_iter()
                .filter_map(|name| {
                    let pattern = format!(r"\b{}\b", regex::escape(name));
                    match RegexBuilder::new(&pattern).case_insensitive(true).build() {
                        Ok(regex) => Some(DictionaryEntry {
                            name: name.clone(),
                            pattern: regex,
                        }),
                        Err(err) => {
                            warn!(name = %name, error = %err, "skipping unscannable dictionary name");
                            None
                        }
                    }
                })
                .collect();
            debug!(count = entries.len(), "compiled extraction dictionary");
            entries
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{InteractionRecord, UNSPECIFIED};

    fn record(a: &str, b: &str) -> InteractionRecord {
        InteractionRecord {
            drug_a: a.into(),
            drug_b: b.into(),
            chemical_similarity: 0.5,
            shares_metabolic_enzyme: false,
            side_effect_similarity: 0.5,
            shared_target_count: 0,
            atc_similarity: 0.5,
            risk_label: "Low Risk".into(),
            known_score: 0.1,
        }
    }

    fn setup_store() -> ReferenceDataStore {
        ReferenceDataStore::from_records(vec![
            record("Paracetamol", "Warfarin"),
            record("Aspirin", "Metformin"),
            record("Iron", "Warfarin"),
        ])
    }

    fn names(drugs: &[PrescriptionDrug]) -> Vec<&str> {
        drugs.iter().map(|d| d.name.as_str()).collect()
    }

    #[test]
    fn test_extracts_in_order_of_first_occurrence() {
        let store = setup_store();
        let extractor = DrugExtractor::new(&store);

        let drugs =
            extractor.extract("Take Paracetamol 500mg twice daily with Warfarin 2mg once daily");

        assert_eq!(names(&drugs), ["Paracetamol", "Warfarin"]);
        assert_eq!(drugs[0].dosage, UNSPECIFIED);
        assert_eq!(drugs[0].frequency, UNSPECIFIED);
    }

    #[test]
    fn test_empty_text_yields_nothing() {
        let store = setup_store();
        let extractor = DrugExtractor::new(&store);

        assert!(extractor.extract("").is_empty());
        assert!(extractor.extract("   \n ").is_empty());
    }

    #[test]
    fn test_caps_at_two_drugs() {
        let store = setup_store();
        let extractor = DrugExtractor::new(&store);

        let drugs = extractor.extract("Aspirin with Metformin and also Warfarin");

        assert_eq!(names(&drugs), ["Aspirin", "Metformin"]);
    }

    #[test]
    fn test_repeat_mentions_are_deduplicated() {
        let store = setup_store();
        let extractor = DrugExtractor::new(&store);

        let drugs = extractor.extract("Warfarin 2mg, then WARFARIN again, plus aspirin");

        assert_eq!(names(&drugs), ["Warfarin", "Aspirin"]);
    }

    #[test]
    fn test_word_boundary_prevents_embedded_matches() {
        let store = setup_store();
        let extractor = DrugExtractor::new(&store);

        // "Iron" is a reference name, but "ironic" and "environment" must
        // not trigger it
        let drugs = extractor.extract("An ironic environment, nothing more");
        assert!(drugs.is_empty());

        let drugs = extractor.extract("Iron supplements with warfarin");
        assert_eq!(names(&drugs), ["Iron", "Warfarin"]);
    }

    #[test]
    fn test_unknown_drugs_are_never_detected() {
        let store = setup_store();
        let extractor = DrugExtractor::new(&store);

        let drugs = extractor.extract("Take Obscuramycin 10mg nightly");

        assert!(drugs.is_empty());
    }

    #[test]
    fn test_multi_word_name_wins_at_same_offset() {
        let store = ReferenceDataStore::from_records(vec![
            record("Warfarin Sodium", "Aspirin"),
            record("Warfarin", "Metformin"),
        ]);
        let extractor = DrugExtractor::new(&store);

        let drugs = extractor.extract("Warfarin Sodium 5mg daily");

        // The multi-word name is matched first; the embedded shorter name
        // still whole-word-matches and survives as a second entry because
        // dedup is by canonical name only
        assert_eq!(names(&drugs), ["Warfarin Sodium", "Warfarin"]);
    }

    #[test]
    fn test_reset_rebuilds_dictionary() {
        let store = setup_store();
        let mut extractor = DrugExtractor::new(&store);
        extractor.warm();

        let before = extractor.extract("aspirin with warfarin");
        extractor.reset();
        let after = extractor.extract("aspirin with warfarin");

        assert_eq!(before, after);
    }
}
