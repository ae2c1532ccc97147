// crates/trialdb-core/src/catalog.rs

//! The immutable in-memory trial snapshot.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};

use crate::error::{Result, TrialDbError};
use crate::model::TrialRecord;

static NEXT_GENERATION: AtomicU64 = AtomicU64::new(1);

/// The full set of trial records, loaded once and immutable thereafter.
///
/// Each catalog carries a process-unique generation number. A wholesale
/// reload produces a *new* catalog with a new generation; the ranking
/// cache compares generations and drops stale entries rather than ever
/// mutating a snapshot in place.
#[derive(Debug)]
pub struct TrialCatalog {
    records: Vec<TrialRecord>,
    // Immutable id → position index, built once at load for O(1) lookup.
    by_id: HashMap<String, usize>,
    generation: u64,
}

impl TrialCatalog {
    /// Build a catalog from already-parsed records, preserving their
    /// order. The order is observable: it breaks distance ties in the
    /// ranked view.
    pub fn from_records(records: Vec<TrialRecord>) -> Self {
        let by_id = records
            .iter()
            .enumerate()
            .map(|(i, r)| (r.id.clone(), i))
            .collect();
        let generation = NEXT_GENERATION.fetch_add(1, Ordering::Relaxed);
        log::info!(
            "trial catalog loaded: {} records (generation {})",
            records.len(),
            generation
        );
        TrialCatalog {
            records,
            by_id,
            generation,
        }
    }

    /// All records in stable load order.
    pub fn records(&self) -> &[TrialRecord] {
        &self.records
    }

    /// Look up a record by its identifier.
    pub fn record_by_id(&self, id: &str) -> Result<&TrialRecord> {
        self.by_id
            .get(id)
            .map(|&i| &self.records[i])
            .ok_or_else(|| TrialDbError::NotFound(format!("trial {id}")))
    }

    /// Generation number of this snapshot.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::TrialRecord;

    fn record(id: &str) -> TrialRecord {
        TrialRecord {
            id: id.to_string(),
            study_id: format!("NCT-{id}"),
            short_name: String::new(),
            long_name: None,
            description: String::new(),
            trial_status: None,
            disease_areas: vec![],
            details_url: None,
            keywords: vec![],
            locations: vec![],
        }
    }

    #[test]
    fn lookup_by_id() {
        let catalog = TrialCatalog::from_records(vec![record("a"), record("b")]);
        assert_eq!(catalog.record_by_id("b").unwrap().study_id, "NCT-b");
        assert!(matches!(
            catalog.record_by_id("missing"),
            Err(TrialDbError::NotFound(_))
        ));
    }

    #[test]
    fn records_keep_load_order() {
        let catalog = TrialCatalog::from_records(vec![record("z"), record("a"), record("m")]);
        let ids: Vec<&str> = catalog.records().iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, ["z", "a", "m"]);
    }

    #[test]
    fn generations_are_unique_per_snapshot() {
        let first = TrialCatalog::from_records(vec![record("a")]);
        let second = TrialCatalog::from_records(vec![record("a")]);
        assert_ne!(first.generation(), second.generation());
    }
}
