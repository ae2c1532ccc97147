// crates/trialdb-core/src/ranking.rs

//! Memoized, per-postal-code, distance-sorted view of the catalog.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use parking_lot::RwLock;
use serde::{Deserialize, Serialize};

use crate::catalog::TrialCatalog;
use crate::distance::{DistanceEngine, UNRESOLVABLE_DISTANCE_MILES};
use crate::model::TrialRecord;

/// The nearest site of a trial relative to a query postal code.
///
/// A record with no resolvable site keeps the sentinel distance and
/// empty city/state, so it stays orderable and simply sorts last.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClosestSite {
    pub distance_miles: f64,
    pub city: String,
    pub state: String,
}

/// One entry of a ranked view: a trial identifier with its closest site.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankedEntry {
    pub trial_id: String,
    pub closest: ClosestSite,
}

/// Aggregate cache statistics.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct CacheStats {
    /// Distinct postal codes currently cached.
    pub postal_codes: usize,
    /// Total ranking builds since process start (cache misses).
    pub builds: u64,
}

struct CacheState {
    generation: u64,
    by_postal_code: HashMap<String, Arc<[RankedEntry]>>,
}

/// For each postal code seen, memoizes the full catalog ranked by
/// nearest-site distance. Computed once per distinct code, reused
/// thereafter; entries are never evicted for the lifetime of a catalog
/// snapshot.
///
/// Concurrency: the build is a pure function of immutable inputs, so
/// concurrent first-time queries for the same code may race and both
/// compute; they converge to one stored value (overwrite-on-write).
/// Redundant work, never corrupted state.
pub struct RankingCache {
    distance: DistanceEngine,
    state: RwLock<CacheState>,
    builds: AtomicU64,
}

impl RankingCache {
    pub fn new(distance: DistanceEngine) -> Self {
        RankingCache {
            distance,
            state: RwLock::new(CacheState {
                generation: 0,
                by_postal_code: HashMap::new(),
            }),
            builds: AtomicU64::new(0),
        }
    }

    /// The full catalog ranked ascending by nearest-site distance from
    /// `postal_code`, built on first call and served from the cache
    /// afterwards.
    ///
    /// A snapshot built against an older catalog generation is dropped
    /// wholesale before the fresh ranking is stored.
    pub fn ranked_for(&self, catalog: &TrialCatalog, postal_code: &str) -> Arc<[RankedEntry]> {
        {
            let state = self.state.read();
            if state.generation == catalog.generation() {
                if let Some(hit) = state.by_postal_code.get(postal_code) {
                    return Arc::clone(hit);
                }
            }
        }

        // Miss: compute outside the lock.
        log::debug!("building ranking for postal code {postal_code}");
        let ranked = self.build_ranking(catalog, postal_code);
        self.builds.fetch_add(1, Ordering::Relaxed);

        let mut state = self.state.write();
        if state.generation != catalog.generation() {
            state.by_postal_code.clear();
            state.generation = catalog.generation();
        }
        state
            .by_postal_code
            .insert(postal_code.to_string(), Arc::clone(&ranked));
        ranked
    }

    /// Current cache statistics. The build counter also serves as
    /// recomputation instrumentation for tests.
    pub fn stats(&self) -> CacheStats {
        let state = self.state.read();
        CacheStats {
            postal_codes: state.by_postal_code.len(),
            builds: self.builds.load(Ordering::Relaxed),
        }
    }

    fn build_ranking(&self, catalog: &TrialCatalog, postal_code: &str) -> Arc<[RankedEntry]> {
        let mut entries: Vec<RankedEntry> = catalog
            .records()
            .iter()
            .map(|record| RankedEntry {
                trial_id: record.id.clone(),
                closest: self.closest_site(record, postal_code),
            })
            .collect();
        // Stable sort: distance ties keep catalog order.
        entries.sort_by(|a, b| {
            a.closest
                .distance_miles
                .total_cmp(&b.closest.distance_miles)
        });
        entries.into()
    }

    /// Nearest site of `record` relative to `postal_code`. The running
    /// minimum starts at the sentinel so a record with zero resolvable
    /// sites still yields a well-defined, maximal distance.
    fn closest_site(&self, record: &TrialRecord, postal_code: &str) -> ClosestSite {
        let mut closest = ClosestSite {
            distance_miles: UNRESOLVABLE_DISTANCE_MILES,
            city: String::new(),
            state: String::new(),
        };
        for site in &record.locations {
            let distance = self
                .distance
                .distance_between(postal_code, &site.postal_code);
            if distance < closest.distance_miles {
                closest = ClosestSite {
                    distance_miles: distance,
                    city: site.city.clone(),
                    state: site.state.clone(),
                };
            }
        }
        closest
    }
}
