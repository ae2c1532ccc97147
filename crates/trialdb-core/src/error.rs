// crates/trialdb-core/src/error.rs

use thiserror::Error;

/// Errors surfaced by the trial search engine.
///
/// Distance and geocoding edge cases never appear here: an unresolvable
/// postal code is absorbed into the sentinel-distance policy (see
/// [`crate::distance::UNRESOLVABLE_DISTANCE_MILES`]) so the ranking
/// pipeline always produces a total ordering. Only catalog-load failures
/// and direct lookups by identifier propagate as errors.
#[derive(Debug, Error)]
pub enum TrialDbError {
    /// A postal code or trial identifier was not present in a lookup.
    #[error("not found: {0}")]
    NotFound(String),

    /// The upstream trial data could not be loaded. Fatal at startup:
    /// the engine must not serve queries from an empty catalog.
    #[error("catalog unavailable: {0}")]
    CatalogUnavailable(String),

    /// A dataset was structurally unusable.
    #[error("invalid data: {0}")]
    InvalidData(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Bincode(#[from] bincode::Error),
}

/// Crate-wide result alias.
pub type Result<T> = std::result::Result<T, TrialDbError>;
