// crates/trialdb-core/src/geo.rs

//! Read-only postal-code → coordinate lookup.
//!
//! The reference dataset is loaded once at process start and never
//! mutated; concurrent reads need no locking.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::error::{Result, TrialDbError};

/// An immutable latitude/longitude pair in degrees, associated 1:1 with
/// a postal code.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PostalCoordinate {
    pub latitude: f64,
    pub longitude: f64,
}

/// Raw coordinate entry as it comes from the reference JSON.
/// NOTE: This type mirrors the external dataset; we do *not* expose it
/// from the public API.
#[derive(Debug, Deserialize)]
pub(crate) struct PostalCoordinateRaw {
    #[serde(rename = "Lat")]
    pub lat: f64,
    #[serde(rename = "Long")]
    pub long: f64,
}

/// The postal-code reference table: a static mapping from postal code to
/// [`PostalCoordinate`].
///
/// Membership and coordinate lookup are O(1) average, since they are
/// invoked once per (query code, site code) pair during ranking.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GeoIndex {
    codes: HashMap<String, PostalCoordinate>,
}

impl GeoIndex {
    /// Build an index from pre-resolved entries. Embedders that carry
    /// their own reference dataset hand it to the engine through this.
    pub fn from_entries<I, S>(entries: I) -> Self
    where
        I: IntoIterator<Item = (S, PostalCoordinate)>,
        S: Into<String>,
    {
        GeoIndex {
            codes: entries.into_iter().map(|(k, v)| (k.into(), v)).collect(),
        }
    }

    pub(crate) fn from_raw(raw: HashMap<String, PostalCoordinateRaw>) -> Self {
        GeoIndex {
            codes: raw
                .into_iter()
                .map(|(code, c)| {
                    (
                        code,
                        PostalCoordinate {
                            latitude: c.lat,
                            longitude: c.long,
                        },
                    )
                })
                .collect(),
        }
    }

    /// Whether the given postal code is present in the reference table.
    pub fn contains(&self, postal_code: &str) -> bool {
        self.codes.contains_key(postal_code)
    }

    pub(crate) fn lookup(&self, postal_code: &str) -> Option<PostalCoordinate> {
        self.codes.get(postal_code).copied()
    }

    /// Coordinates for a postal code.
    ///
    /// Callers are expected to check [`GeoIndex::contains`] first; asking
    /// for an absent code is a programming error and fails with
    /// [`TrialDbError::NotFound`].
    pub fn coordinates_of(&self, postal_code: &str) -> Result<PostalCoordinate> {
        self.codes
            .get(postal_code)
            .copied()
            .ok_or_else(|| TrialDbError::NotFound(format!("postal code {postal_code}")))
    }

    /// Number of postal codes in the table.
    pub fn len(&self) -> usize {
        self.codes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.codes.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> GeoIndex {
        GeoIndex::from_entries([
            (
                "10001",
                PostalCoordinate {
                    latitude: 40.7506,
                    longitude: -73.9972,
                },
            ),
            (
                "90210",
                PostalCoordinate {
                    latitude: 34.1030,
                    longitude: -118.4105,
                },
            ),
        ])
    }

    #[test]
    fn membership() {
        let index = sample();
        assert!(index.contains("10001"));
        assert!(!index.contains("00000"));
        assert_eq!(index.len(), 2);
    }

    #[test]
    fn coordinates_for_known_code() {
        let index = sample();
        let c = index.coordinates_of("90210").unwrap();
        assert_eq!(c.latitude, 34.1030);
        assert_eq!(c.longitude, -118.4105);
    }

    #[test]
    fn missing_code_is_not_found() {
        let index = sample();
        let err = index.coordinates_of("99999").unwrap_err();
        assert!(matches!(err, TrialDbError::NotFound(_)));
    }
}
