// crates/trialdb-core/src/loader/fetch.rs

//! Catalog fetch from the upstream trial API (feature `fetch`).

use crate::catalog::TrialCatalog;
use crate::error::{Result, TrialDbError};
use crate::model::{self, TrialRecordRaw};

/// Default upstream endpoint serving trial display data.
pub const CATALOG_API_URL: &str = "https://www.backend.rightct.us/api/TrialDisplayData";

// Upstream filter: recruiting trials in the tracked disease areas with
// at least one site location.
const RECRUITING_FILTER: &str = r#"{"where":{"and":[{"or":[{"TrialStatus":"Recruiting"}]},{"DiseaseAreas":{"inq":["Coronavirus","Coronavirus Infections","COVID-19"]}},{"_locations.0":{"exists":true}}]}}"#;

impl TrialCatalog {
    /// Fetch the catalog snapshot from the upstream API.
    ///
    /// Performed once at startup; a failure here leaves the engine
    /// without trial data and is therefore fatal
    /// ([`TrialDbError::CatalogUnavailable`]).
    pub fn fetch(base_url: &str) -> Result<Self> {
        let raw: Vec<TrialRecordRaw> = reqwest::blocking::Client::new()
            .get(base_url)
            .query(&[("filter", RECRUITING_FILTER)])
            .send()
            .and_then(|response| response.error_for_status())
            .and_then(|response| response.json())
            .map_err(|e| {
                TrialDbError::CatalogUnavailable(format!("fetch from {base_url} failed: {e}"))
            })?;
        Ok(TrialCatalog::from_records(model::build_records(raw)))
    }
}
