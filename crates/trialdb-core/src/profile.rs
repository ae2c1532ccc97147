// crates/trialdb-core/src/profile.rs

//! Per-contact search history.
//!
//! Keeps track of which postal codes and keyword sets each contact has
//! searched with, so a front-end can re-run a contact's last search or
//! tailor its prompts. Persisted as a single JSON document.

use std::collections::HashMap;
use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::Result;

/// One contact's accumulated search history.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SearchProfile {
    #[serde(default)]
    postal_code_history: Vec<String>,
    #[serde(default)]
    current_postal_code: Option<String>,
    #[serde(default)]
    keyword_history: Vec<Vec<String>>,
    #[serde(default)]
    current_keywords: Vec<String>,
    #[serde(default)]
    searches: u64,
}

impl SearchProfile {
    /// Fold a new search into the history.
    ///
    /// The postal code is appended only when it differs from the
    /// current one; the keyword set only when it differs as a set from
    /// the current set. The search counter always advances.
    pub fn record_search(&mut self, postal_code: &str, keywords: &[String]) {
        if self.current_postal_code.as_deref() != Some(postal_code) {
            self.postal_code_history.push(postal_code.to_string());
            self.current_postal_code = Some(postal_code.to_string());
        }
        if !self.is_current_keyword_set(keywords) {
            self.keyword_history.push(keywords.to_vec());
            self.current_keywords = keywords.to_vec();
        }
        self.searches += 1;
    }

    // Order-insensitive comparison against the current set.
    fn is_current_keyword_set(&self, keywords: &[String]) -> bool {
        keywords.len() == self.current_keywords.len()
            && keywords.iter().all(|k| self.current_keywords.contains(k))
    }

    pub fn current_postal_code(&self) -> Option<&str> {
        self.current_postal_code.as_deref()
    }

    pub fn current_keywords(&self) -> &[String] {
        &self.current_keywords
    }

    /// Whether this contact has ever searched with keywords.
    pub fn has_used_keywords(&self) -> bool {
        !self.keyword_history.is_empty()
    }

    pub fn search_count(&self) -> u64 {
        self.searches
    }
}

/// All known contacts' profiles, keyed by contact id, with JSON
/// persistence to a fixed path.
#[derive(Debug)]
pub struct ProfileStore {
    profiles: HashMap<String, SearchProfile>,
    path: PathBuf,
}

impl ProfileStore {
    /// Open the store at `path`. A missing file is a fresh store, any
    /// other failure propagates.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let profiles = match File::open(&path) {
            Ok(file) => serde_json::from_reader(BufReader::new(file))?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => HashMap::new(),
            Err(e) => return Err(e.into()),
        };
        Ok(ProfileStore { profiles, path })
    }

    /// Whether this contact is seen for the first time. First contact
    /// gets an empty profile and the store is saved.
    pub fn register_contact(&mut self, contact: &str) -> bool {
        if self.profiles.contains_key(contact) {
            return false;
        }
        self.profiles.insert(contact.to_string(), SearchProfile::default());
        self.save();
        true
    }

    /// Record a search against the contact's profile and persist.
    pub fn record_search(&mut self, contact: &str, postal_code: &str, keywords: &[String]) {
        self.profiles
            .entry(contact.to_string())
            .or_default()
            .record_search(postal_code, keywords);
        self.save();
    }

    pub fn profile(&self, contact: &str) -> Option<&SearchProfile> {
        self.profiles.get(contact)
    }

    pub fn len(&self) -> usize {
        self.profiles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.profiles.is_empty()
    }

    // History is advisory data; losing a write must not take down the
    // engine, so failures are logged and the in-memory state stays
    // authoritative.
    fn save(&self) {
        if let Err(e) = self.write_to_disk() {
            log::warn!("could not save profiles to {}: {e}", self.path.display());
        }
    }

    fn write_to_disk(&self) -> Result<()> {
        let file = File::create(&self.path)?;
        serde_json::to_writer(BufWriter::new(file), &self.profiles)?;
        Ok(())
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kw(words: &[&str]) -> Vec<String> {
        words.iter().map(|w| w.to_string()).collect()
    }

    #[test]
    fn repeated_postal_code_is_recorded_once() {
        let mut profile = SearchProfile::default();
        profile.record_search("90210", &[]);
        profile.record_search("90210", &[]);
        profile.record_search("10001", &[]);
        assert_eq!(profile.postal_code_history, ["90210", "10001"]);
        assert_eq!(profile.current_postal_code(), Some("10001"));
        assert_eq!(profile.search_count(), 3);
    }

    #[test]
    fn keyword_sets_compare_order_insensitively() {
        let mut profile = SearchProfile::default();
        profile.record_search("90210", &kw(&["vaccine", "plasma"]));
        profile.record_search("90210", &kw(&["plasma", "vaccine"]));
        assert_eq!(profile.keyword_history.len(), 1);
        profile.record_search("90210", &kw(&["plasma"]));
        assert_eq!(profile.keyword_history.len(), 2);
        assert_eq!(profile.current_keywords(), kw(&["plasma"]));
    }

    #[test]
    fn keyword_usage_flag() {
        let mut profile = SearchProfile::default();
        profile.record_search("90210", &[]);
        // An empty set matches the empty default and leaves no history.
        assert!(!profile.has_used_keywords());
        profile.record_search("90210", &kw(&["vaccine"]));
        assert!(profile.has_used_keywords());
    }

    #[test]
    fn missing_file_opens_empty() {
        let dir = tempfile::tempdir().unwrap();
        let store = ProfileStore::open(dir.path().join("profiles.json")).unwrap();
        assert!(store.is_empty());
    }

    #[test]
    fn store_round_trips_through_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("profiles.json");

        let mut store = ProfileStore::open(&path).unwrap();
        assert!(store.register_contact("+15551234567"));
        assert!(!store.register_contact("+15551234567"));
        store.record_search("+15551234567", "10001", &kw(&["vaccine"]));

        let reloaded = ProfileStore::open(&path).unwrap();
        assert_eq!(reloaded.len(), 1);
        let profile = reloaded.profile("+15551234567").unwrap();
        assert_eq!(profile.current_postal_code(), Some("10001"));
        assert_eq!(profile.current_keywords(), kw(&["vaccine"]));
        assert_eq!(profile.search_count(), 1);
    }

    #[test]
    fn save_failure_keeps_memory_state() {
        let dir = tempfile::tempdir().unwrap();
        // Parent directory never exists, so every write fails.
        let path = dir.path().join("missing").join("profiles.json");
        let mut store = ProfileStore::open(path).unwrap();
        store.record_search("c1", "90210", &[]);
        assert_eq!(
            store.profile("c1").unwrap().current_postal_code(),
            Some("90210")
        );
    }
}
