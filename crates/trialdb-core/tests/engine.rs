// crates/trialdb-core/tests/engine.rs

//! End-to-end scenarios for the search pipeline: geocoding, ranking,
//! caching, and keyword filtering working together.

use std::sync::Arc;

use trialdb_core::{
    GeoIndex, PostalCoordinate, SearchEngine, SiteLocation, TrialCatalog, TrialRecord,
    UNRESOLVABLE_DISTANCE_MILES,
};

fn geo() -> Arc<GeoIndex> {
    Arc::new(GeoIndex::from_entries([
        // Manhattan
        (
            "10001",
            PostalCoordinate {
                latitude: 40.7506,
                longitude: -73.9972,
            },
        ),
        // Koreatown, Los Angeles
        (
            "90005",
            PostalCoordinate {
                latitude: 34.0585,
                longitude: -118.3012,
            },
        ),
        // Beverly Hills
        (
            "90210",
            PostalCoordinate {
                latitude: 34.1030,
                longitude: -118.4105,
            },
        ),
    ]))
}

fn record(id: &str, keywords: &[&str], zips: &[&str]) -> TrialRecord {
    TrialRecord {
        id: id.to_string(),
        study_id: format!("NCT-{id}"),
        short_name: id.to_uppercase(),
        long_name: Some(format!("The {id} study")),
        description: "A study.".to_string(),
        trial_status: Some("Recruiting".to_string()),
        disease_areas: vec!["COVID-19".to_string()],
        details_url: None,
        keywords: keywords.iter().map(|k| k.to_string()).collect(),
        locations: zips
            .iter()
            .map(|z| SiteLocation {
                postal_code: z.to_string(),
                city: format!("City-{z}"),
                state: "CA".to_string(),
                country: Some("United States".to_string()),
            })
            .collect(),
    }
}

fn engine() -> SearchEngine {
    // t-west sits in Beverly Hills, t-east in Manhattan, t-nowhere has a
    // site with a postal code the index does not know.
    SearchEngine::new(
        geo(),
        TrialCatalog::from_records(vec![
            record("t-east", &["treatment"], &["10001"]),
            record("t-west", &["vaccine"], &["90210"]),
            record("t-nowhere", &["vaccine", "treatment"], &["00000"]),
        ]),
    )
}

#[test]
fn ranking_is_by_distance_to_nearest_site() {
    let engine = engine();

    let from_la = engine.search("90005", &[]);
    let ids: Vec<&str> = from_la.iter().map(|r| r.id.as_str()).collect();
    assert_eq!(ids, ["t-west", "t-east", "t-nowhere"]);

    let from_ny = engine.search("10001", &[]);
    let ids: Vec<&str> = from_ny.iter().map(|r| r.id.as_str()).collect();
    assert_eq!(ids, ["t-east", "t-west", "t-nowhere"]);
}

#[test]
fn distances_are_non_decreasing_and_sentinel_ranks_last() {
    let engine = engine();
    let results = engine.search("90005", &[]);

    for pair in results.windows(2) {
        assert!(pair[0].closest_site.distance_miles <= pair[1].closest_site.distance_miles);
    }

    let last = results.last().unwrap();
    assert_eq!(last.id, "t-nowhere");
    assert_eq!(last.closest_site.distance_miles, UNRESOLVABLE_DISTANCE_MILES);
    assert!(last.closest_site.city.is_empty());
}

#[test]
fn unknown_query_code_preserves_catalog_order() {
    let engine = engine();
    let results = engine.search("99999", &[]);

    // Every distance collapses to the sentinel; the stable sort leaves
    // the catalog order intact.
    let ids: Vec<&str> = results.iter().map(|r| r.id.as_str()).collect();
    assert_eq!(ids, ["t-east", "t-west", "t-nowhere"]);
    assert!(results
        .iter()
        .all(|r| r.closest_site.distance_miles == UNRESOLVABLE_DISTANCE_MILES));
}

#[test]
fn multi_site_trial_is_ranked_by_its_nearest_site() {
    let engine = SearchEngine::new(
        geo(),
        TrialCatalog::from_records(vec![
            record("spread", &[], &["10001", "90210"]),
            record("local", &[], &["90005"]),
        ]),
    );

    let results = engine.search("90210", &[]);
    assert_eq!(results[0].id, "spread");
    assert_eq!(results[0].closest_site.city, "City-90210");
}

#[test]
fn keyword_filter_is_case_sensitive_or_semantics() {
    let engine = engine();

    let vaccine = engine.search("90005", &["vaccine".to_string()]);
    let ids: Vec<&str> = vaccine.iter().map(|r| r.id.as_str()).collect();
    assert_eq!(ids, ["t-west", "t-nowhere"]);

    // OR across requested keywords.
    let either = engine.search(
        "90005",
        &["vaccine".to_string(), "treatment".to_string()],
    );
    assert_eq!(either.len(), 3);

    // Exact match only, no case folding.
    assert!(engine.search("90005", &["Vaccine".to_string()]).is_empty());
}

#[test]
fn repeated_queries_reuse_the_cached_ranking() {
    let engine = engine();
    engine.search("90005", &[]);
    engine.search("90005", &["vaccine".to_string()]);
    engine.search("90005", &[]);

    let stats = engine.cache_stats();
    assert_eq!(stats.postal_codes, 1);
    assert_eq!(stats.builds, 1);

    engine.search("10001", &[]);
    let stats = engine.cache_stats();
    assert_eq!(stats.postal_codes, 2);
    assert_eq!(stats.builds, 2);
}

#[test]
fn catalog_replacement_invalidates_cached_rankings() {
    let engine = engine();
    engine.search("90005", &[]);
    assert_eq!(engine.cache_stats().builds, 1);

    engine.replace_catalog(TrialCatalog::from_records(vec![record(
        "fresh",
        &[],
        &["10001"],
    )]));

    let results = engine.search("90005", &[]);
    let ids: Vec<&str> = results.iter().map(|r| r.id.as_str()).collect();
    assert_eq!(ids, ["fresh"]);
    assert_eq!(engine.cache_stats().builds, 2);
}
