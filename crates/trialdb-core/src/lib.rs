// crates/trialdb-core/src/lib.rs

//! # trialdb-core
//!
//! Location-ranked clinical trial search. Given a postal code and an
//! optional keyword set, the engine returns the trial catalog ordered by
//! distance to each trial's nearest site, with per-postal-code rankings
//! memoized so repeated lookups avoid recomputation.
//!
//! The building blocks, leaf first:
//! - [`GeoIndex`] — read-only postal-code → coordinate lookup
//! - [`DistanceEngine`] — great-circle distance in miles between two codes
//! - [`TrialCatalog`] — the immutable in-memory trial snapshot
//! - [`RankingCache`] — memoized distance-sorted view per postal code
//! - [`SearchEngine`] — the public query entry point

pub mod catalog;
pub mod distance;
pub mod error;
pub mod geo;
pub mod loader;
pub mod model;
pub mod profile;
pub mod ranking;
pub mod search;
pub mod text;

// Re-exports
pub use crate::catalog::TrialCatalog;
pub use crate::distance::{DistanceEngine, EARTH_RADIUS_MILES, UNRESOLVABLE_DISTANCE_MILES};
pub use crate::error::{Result, TrialDbError};
pub use crate::geo::{GeoIndex, PostalCoordinate};
pub use crate::model::{SiteLocation, TrialRecord};
pub use crate::profile::{ProfileStore, SearchProfile};
pub use crate::ranking::{CacheStats, ClosestSite, RankedEntry, RankingCache};
pub use crate::search::{SearchEngine, SearchResult};
