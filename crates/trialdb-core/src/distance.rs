// crates/trialdb-core/src/distance.rs

//! Great-circle distance between postal codes.

use std::sync::Arc;

use crate::geo::GeoIndex;

/// Mean Earth radius in miles, used by the haversine formula.
pub const EARTH_RADIUS_MILES: f64 = 3958.8;

/// Sentinel distance standing in for "cannot be computed".
///
/// When either postal code of a pair is absent from the reference table,
/// the distance engine returns this value instead of failing. A trial
/// with an unresolvable site is thereby ranked last rather than
/// excluded, which keeps the ordering total without special-casing
/// missing data downstream. Deliberate policy, not an approximation.
pub const UNRESOLVABLE_DISTANCE_MILES: f64 = 100_000.0;

/// Distances are rounded to one decimal place of scientific precision
/// for display stability.
const DISTANCE_PRECISION: i32 = 1;

/// Computes haversine distances in miles between postal codes, resolving
/// coordinates through a shared [`GeoIndex`].
#[derive(Debug, Clone)]
pub struct DistanceEngine {
    geo: Arc<GeoIndex>,
}

impl DistanceEngine {
    pub fn new(geo: Arc<GeoIndex>) -> Self {
        DistanceEngine { geo }
    }

    pub fn geo(&self) -> &GeoIndex {
        &self.geo
    }

    /// Distance in miles between two postal codes.
    ///
    /// Returns [`UNRESOLVABLE_DISTANCE_MILES`] when either code is
    /// missing from the reference table; never an error.
    pub fn distance_between(&self, code_a: &str, code_b: &str) -> f64 {
        let (a, b) = match (self.geo.lookup(code_a), self.geo.lookup(code_b)) {
            (Some(a), Some(b)) => (a, b),
            _ => return UNRESOLVABLE_DISTANCE_MILES,
        };
        round_significant(
            haversine_miles(a.latitude, a.longitude, b.latitude, b.longitude),
            DISTANCE_PRECISION,
        )
    }
}

/// Haversine great-circle distance in miles between two lat/long points
/// given in degrees.
fn haversine_miles(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> f64 {
    let d_lat = (lat2 - lat1).to_radians();
    let d_lon = (lon2 - lon1).to_radians();
    let a = (d_lat / 2.0).sin().powi(2)
        + lat1.to_radians().cos() * lat2.to_radians().cos() * (d_lon / 2.0).sin().powi(2);
    2.0 * EARTH_RADIUS_MILES * a.sqrt().atan2((1.0 - a).sqrt())
}

/// Rounds to `decimal_places + 1` significant figures, i.e. the value a
/// scientific-notation rendering with `decimal_places` decimals would
/// show. Presentation only; not load-bearing for ordering correctness.
fn round_significant(value: f64, decimal_places: i32) -> f64 {
    if value == 0.0 {
        return 0.0;
    }
    let exponent = value.abs().log10().floor() as i32;
    let factor = 10f64.powi(decimal_places - exponent);
    (value * factor).round() / factor
}
