use std::time::Duration;

use async_trait::async_trait;
use serde_json::Value;

use crate::models::UNKNOWN_SECTOR;
use crate::services::SectorCache;
use crate::utils::{log_fetch_sector, Logger};

const PROFILE_BASE_URL: &str = "https://query2.finance.yahoo.com/v10/finance/quoteSummary";
const FETCH_BATCH_SIZE: usize = 20;
/// Courtesy pause between lookup batches. Politeness toward the external
/// service, not a correctness mechanism.
const BATCH_PAUSE: Duration = Duration::from_secs(2);

/// Source of sector classifications, one ticker at a time.
///
/// The HTTP provider implements this; tests use an in-memory stub.
#[async_trait]
pub trait SectorSource: Send + Sync {
    /// Returns the sector for a symbol, `None` when the provider has no
    /// classification for it.
    async fn sector_for(&self, symbol: &str) -> anyhow::Result<Option<String>>;
}

/// Sector lookups against a quote-profile JSON endpoint.
pub struct HttpSectorSource {
    client: reqwest::Client,
    base_url: String,
}

impl HttpSectorSource {
    pub fn new() -> anyhow::Result<Self> {
        Self::with_base_url(PROFILE_BASE_URL.to_string())
    }

    pub fn with_base_url(base_url: String) -> anyhow::Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(30))
            .build()?;

        Ok(Self { client, base_url })
    }
}

#[async_trait]
impl SectorSource for HttpSectorSource {
    async fn sector_for(&self, symbol: &str) -> anyhow::Result<Option<String>> {
        let url = format!("{}/{}?modules=assetProfile", self.base_url, symbol);
        let response = self.client.get(&url).send().await?;

        if !response.status().is_success() {
            return Err(anyhow::anyhow!(
                "HTTP error {} for symbol {}",
                response.status(),
                symbol
            ));
        }

        let body: Value = response.json().await?;
        Ok(extract_sector(&body))
    }
}

/// Pull the sector string out of a quote-profile response body.
pub fn extract_sector(body: &Value) -> Option<String> {
    body.get("quoteSummary")?
        .get("result")?
        .get(0)?
        .get("assetProfile")?
        .get("sector")?
        .as_str()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

/// Normalize a table ticker to the provider's symbol form (`BRK.B` → `BRK-B`).
pub fn normalize_symbol(ticker: &str) -> String {
    ticker.replace('.', "-")
}

/// One-time batch population of the sector mapping.
///
/// Runs independent per-ticker lookups in small batches with a fixed pause
/// between batches. Per-ticker failures are downgraded to `"Unknown"` and
/// never abort the batch.
pub struct SectorFetchService {
    logger: Logger,
}

impl SectorFetchService {
    pub fn new() -> Self {
        Self {
            logger: Logger::new("SECTOR_FETCH"),
        }
    }

    pub async fn build_mapping(
        &self,
        tickers: &[String],
        source: &dyn SectorSource,
    ) -> SectorCache {
        let mut unique: Vec<String> = Vec::new();
        for ticker in tickers {
            let ticker = ticker.trim();
            if !ticker.is_empty() && !unique.iter().any(|t| t == ticker) {
                unique.push(ticker.to_string());
            }
        }

        log_fetch_sector(&format!(
            "🌐 Fetching sector classification for {} tickers",
            unique.len()
        ));

        let mut cache = SectorCache::new();
        let batch_count = unique.len().div_ceil(FETCH_BATCH_SIZE);

        for (batch_idx, batch) in unique.chunks(FETCH_BATCH_SIZE).enumerate() {
            let tasks = batch.iter().map(|ticker| {
                let logger = &self.logger;
                async move {
                    let sector = match source.sector_for(&normalize_symbol(ticker)).await {
                        Ok(Some(sector)) => sector,
                        Ok(None) => UNKNOWN_SECTOR.to_string(),
                        Err(e) => {
                            logger.warn(&format!(
                                "Sector lookup failed for {}: {} (using {})",
                                ticker, e, UNKNOWN_SECTOR
                            ));
                            UNKNOWN_SECTOR.to_string()
                        }
                    };
                    (ticker.clone(), sector)
                }
            });

            for (ticker, sector) in futures::future::join_all(tasks).await {
                cache.insert(ticker, sector);
            }

            self.logger.debug(&format!(
                "Sector batch {}/{} complete ({} tickers mapped)",
                batch_idx + 1,
                batch_count,
                cache.len()
            ));

            if batch_idx + 1 < batch_count {
                tokio::time::sleep(BATCH_PAUSE).await;
            }
        }

        log_fetch_sector(&format!(
            "✅ Sector classification complete: {} tickers mapped",
            cache.len()
        ));
        cache
    }
}

impl Default for SectorFetchService {
    fn default() -> Self {
        Self::new()
    }
}
