use std::collections::HashMap;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::utils::{log_cache, Logger};

/// Narrow lookup seam between the metrics core and sector storage.
///
/// The core only ever asks "which sector is this ticker in"; where the
/// answer comes from (the CSV cache, an in-memory stub in tests) is not its
/// concern.
pub trait SectorLookup {
    fn lookup(&self, ticker: &str) -> Option<String>;
}

impl SectorLookup for HashMap<String, String> {
    fn lookup(&self, ticker: &str) -> Option<String> {
        self.get(ticker).cloned()
    }
}

/// One record of the flat two-column cache file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SectorRecord {
    pub ticker: String,
    pub sector: String,
}

/// Ticker → sector mapping backed by a best-effort CSV cache file.
///
/// Read if present, regenerated by the external lookup otherwise; there is
/// no invalidation policy.
#[derive(Debug, Clone, Default)]
pub struct SectorCache {
    mapping: HashMap<String, String>,
}

impl SectorCache {
    pub fn new() -> Self {
        Self {
            mapping: HashMap::new(),
        }
    }

    pub fn from_mapping(mapping: HashMap<String, String>) -> Self {
        Self { mapping }
    }

    /// Load the mapping from the cache file.
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let logger = Logger::new("SECTOR_CACHE");
        let mut reader = csv::Reader::from_path(path)
            .map_err(|e| anyhow::anyhow!("failed to open {}: {}", path.display(), e))?;

        let mut mapping = HashMap::new();
        for record in reader.deserialize() {
            let record: SectorRecord = record?;
            mapping.insert(record.ticker, record.sector);
        }

        logger.info(&format!(
            "💾 Loaded cached sector mapping with {} tickers from {}",
            mapping.len(),
            path.display()
        ));
        Ok(Self::from_mapping(mapping))
    }

    /// Persist the mapping back in the same two-column shape.
    pub fn save(&self, path: &Path) -> anyhow::Result<()> {
        let mut writer = csv::Writer::from_path(path)
            .map_err(|e| anyhow::anyhow!("failed to create {}: {}", path.display(), e))?;
        let mut records: Vec<SectorRecord> = self
            .mapping
            .iter()
            .map(|(ticker, sector)| SectorRecord {
                ticker: ticker.clone(),
                sector: sector.clone(),
            })
            .collect();
        // Deterministic file contents across runs.
        records.sort_by(|a, b| a.ticker.cmp(&b.ticker));
        for record in records {
            writer.serialize(record)?;
        }
        writer.flush()?;

        log_cache(&format!(
            "Saved sector mapping ({} tickers) to {}",
            self.mapping.len(),
            path.display()
        ));
        Ok(())
    }

    pub fn insert(&mut self, ticker: String, sector: String) {
        self.mapping.insert(ticker, sector);
    }

    pub fn len(&self) -> usize {
        self.mapping.len()
    }

    pub fn is_empty(&self) -> bool {
        self.mapping.is_empty()
    }

    pub fn tickers(&self) -> impl Iterator<Item = &String> {
        self.mapping.keys()
    }
}

impl SectorLookup for SectorCache {
    fn lookup(&self, ticker: &str) -> Option<String> {
        self.mapping.get(ticker).cloned()
    }
}
