//! Drug name standardization against the reference dataset.
//!
//! Matching runs in strict priority order:
//! 1. Exact (case-insensitive) match
//! 2. Containment match (first qualifying name in enumeration order)
//! 3. Fuzzy match (normalized Levenshtein, threshold 0.6)
//! 4. Known-misspelling table
//! 5. Title-cased pass-through

use std::collections::HashMap;

use strsim::normalized_levenshtein;

use crate::store::ReferenceDataStore;

/// Minimum normalized similarity for a fuzzy match (inclusive).
const FUZZY_MATCH_THRESHOLD: f64 = 0.6;

/// Standardizer that maps arbitrary input strings to canonical drug names.
pub struct NameStandardizer<'a> {
    store: &'a ReferenceDataStore,
    /// Misspelling/shorthand map: lowercased input → canonical name
    misspellings: HashMap<String, String>,
}

impl<'a> NameStandardizer<'a> {
    /// Create a standardizer over the given store, with default
    /// misspelling mappings.
    pub fn new(store: &'a ReferenceDataStore) -> Self {
        Self {
            store,
            misspellings: Self::default_misspellings(),
        }
    }

    /// Map an input string to a canonical drug name.
    ///
    /// Falls back to a title-cased copy of the input when nothing in the
    /// reference universe matches; the returned name is then not guaranteed
    /// to exist in the dataset.
    pub fn standardize(&self, input: &str) -> String {
        let trimmed = input.trim();
        if trimmed.is_empty() {
            return input.to_string();
        }
        let lower = trimmed.to_lowercase();

        // Exact match on the reference name universe
        for name in self.store.names() {
            if name.to_lowercase() == lower {
                return name.clone();
            }
        }

        // Containment match. First qualifying name in enumeration order
        // wins; candidates are not ranked by overlap.
        for name in self.store.names() {
            let name_lower = name.to_lowercase();
            if (name_lower.contains(&lower) || lower.contains(&name_lower))
                && name.chars().count() >= trimmed.chars().count()
            {
                return name.clone();
            }
        }

        // Fuzzy match: strictly best similarity at or above the threshold,
        // first-seen name winning ties.
        let mut best: Option<(&String, f64)> = None;
        for name in self.store.names() {
            let similarity = normalized_levenshtein(&lower, &name.to_lowercase());
            if similarity >= FUZZY_MATCH_THRESHOLD
                && best.map_or(true, |(_, score)| similarity > score)
            {
                best = Some((name, similarity));
            }
        }
        if let Some((name, _)) = best {
            return name.clone();
        }

        // Hand-curated misspellings/shorthand, honored only when the
        // corrected name is actually in the reference universe
        if let Some(corrected) = self.misspellings.get(&lower) {
            if let Some(reference) = self
                .store
                .names()
                .iter()
                .find(|name| name.eq_ignore_ascii_case(corrected))
            {
                return reference.clone();
            }
        }

        title_case(trimmed)
    }

    /// Add a custom misspelling mapping.
    pub fn add_misspelling(&mut self, misspelling: &str, canonical: &str) {
        self.misspellings
            .insert(misspelling.to_lowercase(), canonical.to_string());
    }

    /// Default misspelling and shorthand mappings.
    fn default_misspellings() -> HashMap<String, String> {
        let mut map = HashMap::new();

        // Common misspellings
        map.insert("paracetmol".into(), "Paracetamol".into());
        map.insert("paracetamal".into(), "Paracetamol".into());
        map.insert("asprin".into(), "Aspirin".into());
        map.insert("aspirine".into(), "Aspirin".into());
        map.insert("warfrin".into(), "Warfarin".into());
        map.insert("ibuprophen".into(), "Ibuprofen".into());
        map.insert("ibuprofin".into(), "Ibuprofen".into());
        map.insert("amoxcillin".into(), "Amoxicillin".into());
        map.insert("metforman".into(), "Metformin".into());
        map.insert("omeprazol".into(), "Omeprazole".into());

        // Chart shorthand
        map.insert("asa".into(), "Aspirin".into());
        map.insert("apap".into(), "Paracetamol".into());
        map.insert("hctz".into(), "Hydrochlorothiazide".into());
        map.insert("mtx".into(), "Methotrexate".into());

        map
    }
}

/// Title-case every whitespace-delimited token.
fn title_case(input: &str) -> String {
    input
        .split_whitespace()
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => {
                    first.to_uppercase().collect::<String>() + &chars.as_str().to_lowercase()
                }
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}
