//! High-level report facade for CLI and library usage.

use std::path::{Path, PathBuf};

use crate::metrics::MetricsComputer;
use crate::models::ReportArtifacts;
use crate::services::{HttpSectorSource, PriceTableLoader, SectorCache, SectorFetchService};
use crate::utils::Logger;

/// Explicit configuration for one report run.
///
/// All paths are parameters rather than module constants, so the core stays
/// testable against in-memory tables and temp directories.
#[derive(Debug, Clone)]
pub struct ReportConfig {
    pub data_path: PathBuf,
    pub sector_cache_path: PathBuf,
    pub out_dir: PathBuf,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            data_path: PathBuf::from("sp500_2025_h1.csv"),
            sector_cache_path: PathBuf::from("sector_mapping.csv"),
            out_dir: PathBuf::from("."),
        }
    }
}

impl ReportConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_data_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.data_path = path.into();
        self
    }

    pub fn with_sector_cache_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.sector_cache_path = path.into();
        self
    }

    pub fn with_out_dir(mut self, path: impl Into<PathBuf>) -> Self {
        self.out_dir = path.into();
        self
    }
}

/// Wires the loader, the sector mapping, and the metrics computation into
/// one entry point the subcommands share.
pub struct Reporter {
    config: ReportConfig,
    loader: PriceTableLoader,
    computer: MetricsComputer,
    logger: Logger,
}

impl Reporter {
    pub fn new(config: ReportConfig) -> Self {
        Self {
            config,
            loader: PriceTableLoader::new(),
            computer: MetricsComputer::new(),
            logger: Logger::new("REPORTER"),
        }
    }

    pub fn config(&self) -> &ReportConfig {
        &self.config
    }

    pub fn out_dir(&self) -> &Path {
        &self.config.out_dir
    }

    /// Load the table, resolve the sector mapping, and compute everything.
    ///
    /// With `fetch_missing_sectors`, an absent cache file triggers the
    /// one-time external lookup and the result is written back; otherwise an
    /// absent cache simply classifies every row as Unknown.
    pub async fn artifacts(&self, fetch_missing_sectors: bool) -> anyhow::Result<ReportArtifacts> {
        let table = self.loader.load(&self.config.data_path)?;
        let sectors = self.resolve_sectors(&table, fetch_missing_sectors).await?;
        let artifacts = self.computer.compute(&table, &sectors)?;
        Ok(artifacts)
    }

    async fn resolve_sectors(
        &self,
        table: &crate::models::PriceTable,
        fetch_missing: bool,
    ) -> anyhow::Result<SectorCache> {
        if self.config.sector_cache_path.exists() {
            return SectorCache::load(&self.config.sector_cache_path);
        }

        if !fetch_missing {
            self.logger.info(
                "No cached sector mapping found; classifying all tickers as Unknown",
            );
            return Ok(SectorCache::new());
        }

        self.logger.info("No cached sector mapping found; fetching from provider");
        let tickers: Vec<String> = table.rows.iter().map(|row| row.ticker.clone()).collect();
        let source = HttpSectorSource::new()?;
        let cache = SectorFetchService::new()
            .build_mapping(&tickers, &source)
            .await;

        // Best-effort cache write; the computed mapping is still usable.
        if let Err(e) = cache.save(&self.config.sector_cache_path) {
            self.logger
                .warn(&format!("Failed to save sector mapping cache: {}", e));
        }
        Ok(cache)
    }
}
