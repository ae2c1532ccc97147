// crates/trialdb-core/src/search.rs

//! The public query entry point.

use std::sync::Arc;

use parking_lot::RwLock;
use serde::{Deserialize, Serialize};

use crate::catalog::TrialCatalog;
use crate::distance::DistanceEngine;
use crate::error::Result;
use crate::geo::GeoIndex;
use crate::model::TrialRecord;
use crate::ranking::{CacheStats, ClosestSite, RankingCache};

/// A freshly constructed copy of a trial's display fields plus its
/// closest site for the queried postal code. Never shared with the
/// catalog, so concurrent queries cannot observe partial mutation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchResult {
    pub id: String,
    pub study_id: String,
    pub short_name: String,
    pub long_name: Option<String>,
    pub description: String,
    pub trial_status: Option<String>,
    pub details_url: Option<String>,
    pub closest_site: ClosestSite,
}

impl SearchResult {
    fn from_record(record: &TrialRecord, closest_site: ClosestSite) -> Self {
        SearchResult {
            id: record.id.clone(),
            study_id: record.study_id.clone(),
            short_name: record.short_name.clone(),
            long_name: record.long_name.clone(),
            description: record.description.clone(),
            trial_status: record.trial_status.clone(),
            details_url: record.details_url.clone(),
            closest_site,
        }
    }
}

/// Distance-ranked, keyword-filtered trial search over an immutable
/// catalog snapshot.
///
/// Safe to share across threads; queries for the same or different
/// postal codes may run concurrently.
pub struct SearchEngine {
    catalog: RwLock<Arc<TrialCatalog>>,
    cache: RankingCache,
}

impl SearchEngine {
    pub fn new(geo: Arc<GeoIndex>, catalog: TrialCatalog) -> Self {
        SearchEngine {
            catalog: RwLock::new(Arc::new(catalog)),
            cache: RankingCache::new(DistanceEngine::new(geo)),
        }
    }

    /// Trials ordered by ascending distance of their nearest site from
    /// `postal_code`, optionally filtered by keywords.
    ///
    /// An empty keyword set means no filtering. Otherwise a result is
    /// retained when any of its tags equals any requested keyword
    /// (case-sensitive, OR semantics); filtering never re-sorts. An
    /// empty return value is a valid no-match outcome, not an error.
    pub fn search(&self, postal_code: &str, keywords: &[String]) -> Vec<SearchResult> {
        let catalog = self.catalog_snapshot();
        let ranked = self.cache.ranked_for(&catalog, postal_code);

        ranked
            .iter()
            .filter_map(|entry| {
                // Entries come from this same snapshot, so the lookup
                // cannot miss; a defect upstream would surface here.
                let record = catalog.record_by_id(&entry.trial_id).ok()?;
                if keywords.is_empty() || record.matches_any_keyword(keywords) {
                    Some(SearchResult::from_record(record, entry.closest.clone()))
                } else {
                    None
                }
            })
            .collect()
    }

    /// Direct record lookup, surfacing `NotFound` for unknown ids.
    pub fn trial_by_id(&self, id: &str) -> Result<TrialRecord> {
        self.catalog_snapshot().record_by_id(id).map(Clone::clone)
    }

    /// Replace the catalog wholesale. The new snapshot's generation
    /// invalidates every cached ranking; nothing in this crate calls
    /// this periodically.
    pub fn replace_catalog(&self, catalog: TrialCatalog) {
        *self.catalog.write() = Arc::new(catalog);
    }

    /// The current catalog snapshot.
    pub fn catalog_snapshot(&self) -> Arc<TrialCatalog> {
        Arc::clone(&self.catalog.read())
    }

    /// Ranking-cache statistics.
    pub fn cache_stats(&self) -> CacheStats {
        self.cache.stats()
    }
}
