// crates/trialdb-core/src/loader/mod.rs

//! # Dataset loaders
//!
//! Handles the physical layer (I/O, decompression, binary caching) for
//! the two external datasets the engine consumes: the postal-code
//! reference table and the trial catalog. Parsing of the payloads is
//! delegated to the raw serde types in [`crate::geo`] and
//! [`crate::model`].

use std::collections::HashMap;
use std::fs::{self, File};
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use bincode::Options;
use once_cell::sync::OnceCell;

use crate::catalog::TrialCatalog;
use crate::error::{Result, TrialDbError};
use crate::geo::{GeoIndex, PostalCoordinateRaw};
use crate::model::{self, TrialRecordRaw};

#[cfg(feature = "fetch")]
mod fetch;
#[cfg(feature = "fetch")]
pub use fetch::CATALOG_API_URL;

static GEO_INDEX_CACHE: OnceCell<Arc<GeoIndex>> = OnceCell::new();

// Deserialization cap for cached binaries, to stop malformed data bombs.
const BINARY_SIZE_LIMIT: u64 = 64 * 1024 * 1024;

#[cfg(not(feature = "compact"))]
const CACHE_SUFFIX: &str = "bin";
#[cfg(feature = "compact")]
const CACHE_SUFFIX: &str = "comp.bin";

/// Opens a dataset file, buffers it, and wraps it in a gzip decoder when
/// the filename says so. Returns a generic reader so callers don't care
/// about compression.
fn open_stream(path: &Path) -> Result<Box<dyn Read>> {
    let file = File::open(path).map_err(|e| {
        TrialDbError::NotFound(format!("dataset not found at {}: {}", path.display(), e))
    })?;

    let reader = BufReader::new(file);

    if path.extension().is_some_and(|ext| ext == "gz") {
        #[cfg(feature = "compact")]
        {
            use flate2::read::GzDecoder;
            return Ok(Box::new(GzDecoder::new(reader)));
        }
        #[cfg(not(feature = "compact"))]
        return Err(TrialDbError::InvalidData(format!(
            "{} is gzipped but the 'compact' feature is disabled",
            path.display()
        )));
    }

    Ok(Box::new(reader))
}

fn cache_path(source: &Path, suffix: &str) -> PathBuf {
    let filename = source
        .file_name()
        .map(|f| f.to_string_lossy().into_owned())
        .unwrap_or_default();
    source.with_file_name(format!("{filename}.{suffix}"))
}

fn is_cache_fresh(source: &Path, cache: &Path) -> bool {
    let cache_time = match fs::metadata(cache).and_then(|m| m.modified()) {
        Ok(t) => t,
        Err(_) => return false,
    };
    match fs::metadata(source).and_then(|m| m.modified()) {
        Ok(source_time) => source_time <= cache_time,
        Err(_) => false,
    }
}

impl GeoIndex {
    /// **Smart load:** checks the binary cache next to the source,
    /// otherwise parses the JSON and rewrites the cache.
    pub fn load_from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let cache = cache_path(path, CACHE_SUFFIX);

        if is_cache_fresh(path, &cache) {
            if let Ok(index) = Self::load_binary(&cache) {
                log::debug!("postal index served from cache {}", cache.display());
                return Ok(index);
            }
        }

        let index = Self::parse_source(path)?;
        // Cache write failures are not fatal; next run parses again.
        if let Err(e) = index.write_binary(&cache) {
            log::warn!("could not write postal index cache {}: {e}", cache.display());
        }
        Ok(index)
    }

    /// Process-wide shared load. The reference table is loaded at most
    /// once per process and shared read-only thereafter.
    pub fn load_shared(path: impl AsRef<Path>) -> Result<Arc<GeoIndex>> {
        GEO_INDEX_CACHE
            .get_or_try_init(|| Self::load_from_path(path).map(Arc::new))
            .map(Arc::clone)
    }

    fn parse_source(path: &Path) -> Result<Self> {
        let reader = open_stream(path)?;
        let raw: HashMap<String, PostalCoordinateRaw> = serde_json::from_reader(reader)?;
        let index = GeoIndex::from_raw(raw);
        log::info!(
            "postal index loaded: {} codes from {}",
            index.len(),
            path.display()
        );
        Ok(index)
    }

    // Mirrors `write_binary`: compression of the cache is decided by the
    // 'compact' feature, not by the filename.
    fn load_binary(path: &Path) -> Result<Self> {
        let reader = BufReader::new(File::open(path)?);

        let reader: Box<dyn Read> = {
            #[cfg(feature = "compact")]
            {
                use flate2::read::GzDecoder;
                Box::new(GzDecoder::new(reader))
            }
            #[cfg(not(feature = "compact"))]
            {
                Box::new(reader)
            }
        };

        let index = bincode::DefaultOptions::new()
            .with_limit(BINARY_SIZE_LIMIT)
            .allow_trailing_bytes()
            .deserialize_from(reader)?;
        Ok(index)
    }

    fn write_binary(&self, path: &Path) -> Result<()> {
        let file = File::create(path)?;
        let writer = BufWriter::new(file);

        let mut encoder: Box<dyn Write> = {
            #[cfg(feature = "compact")]
            {
                use flate2::{write::GzEncoder, Compression};
                Box::new(GzEncoder::new(writer, Compression::default()))
            }
            #[cfg(not(feature = "compact"))]
            {
                Box::new(writer)
            }
        };

        bincode::DefaultOptions::new()
            .with_limit(BINARY_SIZE_LIMIT)
            .serialize_into(&mut encoder, self)?;
        encoder.flush()?;
        Ok(())
    }
}

impl TrialCatalog {
    /// Load the catalog from an upstream JSON export.
    ///
    /// Any failure here is fatal for the engine: without trial data
    /// there is no meaningful degraded mode, so everything maps to
    /// [`TrialDbError::CatalogUnavailable`].
    pub fn load_from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let reader = open_stream(path).map_err(|e| {
            TrialDbError::CatalogUnavailable(format!("cannot open {}: {e}", path.display()))
        })?;
        let raw: Vec<TrialRecordRaw> = serde_json::from_reader(reader).map_err(|e| {
            TrialDbError::CatalogUnavailable(format!("cannot parse {}: {e}", path.display()))
        })?;
        Ok(TrialCatalog::from_records(model::build_records(raw)))
    }
}
