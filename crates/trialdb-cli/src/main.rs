//! trialdb-cli — Command-line interface for trialdb-core
//!
//! This binary ranks clinical trials by distance from a postal code and
//! prints the results, using the same engine a messaging front-end
//! would embed. It supports printing dataset statistics, running a
//! ranked (optionally keyword-filtered) search, and dumping a single
//! trial record.
//!
//! Usage examples
//! --------------
//!
//! - Show dataset stats
//!   $ trialdb-cli -p zips.json -t trials.json stats
//!
//! - Five closest trials to a postal code
//!   $ trialdb-cli -p zips.json -t trials.json search 90210
//!
//! - Keyword-filtered search with a larger page
//!   $ trialdb-cli -p zips.json -t trials.json search 90210 -k vaccine plasma -l 10
//!
//! - Dump one trial
//!   $ trialdb-cli -p zips.json -t trials.json trial 5e71b4a2
//!
//! Data sources
//! ------------
//!
//! `--postal-data` points at a postal-code → coordinate JSON table
//! (gzipped input is accepted when built with the `compact` feature); a
//! binary cache is written next to it for fast subsequent runs.
//! `--trials` points at a trial catalog JSON export; when omitted and
//! the `fetch` feature is enabled, the catalog is pulled from the
//! upstream API instead.
mod args;

use crate::args::{CliArgs, Commands};
use anyhow::Context;
use clap::Parser;
use trialdb_core::{GeoIndex, SearchEngine, TrialCatalog};

fn load_catalog(trials: Option<&str>) -> anyhow::Result<TrialCatalog> {
    if let Some(path) = trials {
        return Ok(TrialCatalog::load_from_path(path)?);
    }
    #[cfg(feature = "fetch")]
    {
        return Ok(TrialCatalog::fetch(trialdb_core::loader::CATALOG_API_URL)?);
    }
    #[cfg(not(feature = "fetch"))]
    anyhow::bail!("no trial catalog: pass --trials <path> or build with the 'fetch' feature")
}

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let args = CliArgs::parse();

    let postal_data = args
        .postal_data
        .context("no postal dataset: pass --postal-data <path>")?;
    let geo = GeoIndex::load_shared(&postal_data)?;
    let postal_codes = geo.len();
    let catalog = load_catalog(args.trials.as_deref())?;
    log::info!(
        "loaded {postal_codes} postal codes from {postal_data}, {} trials from {}",
        catalog.len(),
        args.trials.as_deref().unwrap_or("upstream API")
    );

    let engine = SearchEngine::new(geo, catalog);

    match args.command {
        Commands::Stats => {
            let catalog = engine.catalog_snapshot();
            println!("Dataset statistics:");
            println!("  Postal codes: {postal_codes}");
            println!("  Trials: {}", catalog.len());
        }

        Commands::Search {
            postal_code,
            keywords,
            limit,
        } => {
            let results = engine.search(&postal_code, &keywords);
            if results.is_empty() {
                println!("No trials found for: {postal_code}");
            } else {
                for result in results.iter().take(limit) {
                    let site = &result.closest_site;
                    println!(
                        "{} ({}) — {:.1} mi, {}, {}",
                        result.short_name,
                        result.study_id,
                        site.distance_miles,
                        site.city,
                        site.state
                    );
                }
            }
        }

        Commands::Trial { id } => {
            let record = engine.trial_by_id(&id)?;
            println!("Trial: {}", record.short_name);
            println!("Study ID: {}", record.study_id);
            if let Some(long_name) = &record.long_name {
                println!("Full name: {long_name}");
            }
            if let Some(status) = &record.trial_status {
                println!("Status: {status}");
            }
            if !record.keywords.is_empty() {
                println!("Keywords: {}", record.keywords.join(", "));
            }
            if let Some(url) = &record.details_url {
                println!("Details: {url}");
            }
            println!("Sites: {}", record.locations.len());
            for site in &record.locations {
                println!("- {} ({}, {})", site.postal_code, site.city, site.state);
            }
        }
    }

    Ok(())
}
