//! trialdb-cli
//! ===========
//!
//! Command-line interface for the `trialdb-core` clinical trial search
//! engine.
//!
//! This crate primarily provides a binary (`trialdb-cli`). We include a
//! small library target so that docs.rs renders a documentation page
//! and shows this overview. See the README for full usage examples.
//!
//! Quick start
//! -----------
//!
//! ```text
//! trialdb-cli --help
//! trialdb-cli -p zips.json -t trials.json stats
//! trialdb-cli -p zips.json -t trials.json search 90210 -k vaccine
//! ```
//!
//! For programmatic access to the engine, use the [`trialdb-core`]
//! crate directly.
//!
//! [`trialdb-core`]: https://docs.rs/trialdb-core

// This library target intentionally exposes no API; the binary is the
// primary deliverable.
