// crates/trialdb-core/src/model.rs

//! Trial domain model and the raw upstream shapes it is built from.

use serde::{Deserialize, Serialize};

/// One physical location at which a trial is conducted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SiteLocation {
    pub postal_code: String,
    pub city: String,
    pub state: String,
    pub country: Option<String>,
}

/// One clinical trial: a unique identifier, display metadata (opaque to
/// the ranking core), keyword tags, and an ordered list of site
/// locations.
///
/// Created once when the catalog is loaded and treated as immutable for
/// the remainder of the process. A record is not guaranteed to have any
/// site resolvable by the geo index; ranking degrades such records to
/// the sentinel distance instead of erroring.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrialRecord {
    pub id: String,
    pub study_id: String,
    pub short_name: String,
    pub long_name: Option<String>,
    pub description: String,
    pub trial_status: Option<String>,
    pub disease_areas: Vec<String>,
    pub details_url: Option<String>,
    /// Keyword tags; matched case-sensitively against query keywords.
    pub keywords: Vec<String>,
    pub locations: Vec<SiteLocation>,
}

impl TrialRecord {
    /// Whether any of this record's tags matches one of the given
    /// keywords (exact string match, logical OR).
    pub fn matches_any_keyword(&self, keywords: &[String]) -> bool {
        keywords.iter().any(|k| self.keywords.contains(k))
    }
}

/// Raw site entry as it comes from the upstream API.
#[derive(Debug, Deserialize)]
pub(crate) struct SiteLocationRaw {
    #[serde(rename = "ZIP", default)]
    pub zip: Option<String>,
    #[serde(rename = "City", default)]
    pub city: Option<String>,
    #[serde(rename = "State", default)]
    pub state: Option<String>,
    #[serde(rename = "Country", default)]
    pub country: Option<String>,
}

/// Raw trial structure as it comes from the upstream API.
/// NOTE: This type mirrors the external dataset and may be subject to
/// that dataset's license. We do *not* expose it from the public API.
#[derive(Debug, Deserialize)]
pub(crate) struct TrialRecordRaw {
    pub id: String,
    #[serde(rename = "StudyID")]
    pub study_id: String,
    #[serde(rename = "ShortName", default)]
    pub short_name: Option<String>,
    #[serde(rename = "LongName", default)]
    pub long_name: Option<String>,
    #[serde(rename = "Description", default)]
    pub description: Option<String>,
    #[serde(rename = "TrialStatus", default)]
    pub trial_status: Option<String>,
    #[serde(rename = "DiseaseAreas", default)]
    pub disease_areas: Vec<String>,
    #[serde(rename = "RctUrl", default)]
    pub rct_url: Option<String>,
    #[serde(rename = "KeyWords", default)]
    pub keywords: Vec<String>,
    #[serde(rename = "_locations", default)]
    pub locations: Vec<SiteLocationRaw>,
}

/// Convert raw upstream trials into the immutable domain model,
/// preserving upstream order.
pub(crate) fn build_records(raw: Vec<TrialRecordRaw>) -> Vec<TrialRecord> {
    raw.into_iter()
        .map(|t| TrialRecord {
            id: t.id,
            study_id: t.study_id,
            short_name: t.short_name.unwrap_or_default(),
            long_name: t.long_name,
            description: t.description.unwrap_or_default(),
            trial_status: t.trial_status,
            disease_areas: t.disease_areas,
            details_url: t.rct_url,
            keywords: t.keywords,
            locations: t
                .locations
                .into_iter()
                .map(|l| SiteLocation {
                    postal_code: l.zip.unwrap_or_default(),
                    city: l.city.unwrap_or_default(),
                    state: l.state.unwrap_or_default(),
                    country: l.country,
                })
                .collect(),
        })
        .collect()
}
