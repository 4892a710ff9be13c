use serde::{Deserialize, Serialize};

/// Classification used when a ticker has no sector mapping, or when the
/// mapping itself is unavailable.
pub const UNKNOWN_SECTOR: &str = "Unknown";

/// A price-table row augmented with the derived per-company metrics.
///
/// Each metric is a pure function of the row's closing values (plus, for
/// `sector`, the external ticker mapping). `None` marks a metric that is
/// undefined for the row: zero percent-change baseline, fewer than two
/// usable closes for volatility, or no usable closes at all.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DerivedRow {
    pub company_name: String,
    pub ticker: String,
    pub sector: String,
    pub avg_closing_price: Option<f64>,
    pub percent_change: Option<f64>,
    pub volatility: Option<f64>,
}

impl DerivedRow {
    /// Display label used by leaderboards and charts.
    pub fn label(&self) -> String {
        format!("{} ({})", self.company_name, self.ticker)
    }

    pub fn metric(&self, metric: LeaderboardMetric) -> Option<f64> {
        match metric {
            LeaderboardMetric::PercentChange => self.percent_change,
            LeaderboardMetric::AvgClosingPrice => self.avg_closing_price,
            LeaderboardMetric::Volatility => self.volatility,
        }
    }
}

/// Metric a leaderboard ranks by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LeaderboardMetric {
    #[serde(rename = "percent_change")]
    PercentChange,
    #[serde(rename = "avg_closing_price")]
    AvgClosingPrice,
    #[serde(rename = "volatility")]
    Volatility,
}

impl LeaderboardMetric {
    pub fn as_str(&self) -> &'static str {
        match self {
            LeaderboardMetric::PercentChange => "percent_change",
            LeaderboardMetric::AvgClosingPrice => "avg_closing_price",
            LeaderboardMetric::Volatility => "volatility",
        }
    }
}

/// Ranking direction. Different callers want best (descending) and worst
/// (ascending) views over the same metric.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SortOrder {
    #[serde(rename = "ascending")]
    Ascending,
    #[serde(rename = "descending")]
    Descending,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LeaderboardEntry {
    pub label: String,
    pub company_name: String,
    pub ticker: String,
    pub value: f64,
}

/// Ordered top-N rows by one metric.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Leaderboard {
    pub metric: LeaderboardMetric,
    pub order: SortOrder,
    pub entries: Vec<LeaderboardEntry>,
}

impl Leaderboard {
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Per-sector roll-up of the derived rows. Only sectors present in the
/// input appear; group means skip undefined per-row values.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SectorAggregate {
    pub sector: String,
    pub avg_percent_growth: Option<f64>,
    pub avg_volatility: Option<f64>,
    pub company_count: usize,
}

/// Everything the presentation layer consumes, produced in one pass.
#[derive(Debug, Clone)]
pub struct ReportArtifacts {
    pub derived_rows: Vec<DerivedRow>,
    pub sector_stats: Vec<SectorAggregate>,
    pub top_growth: Leaderboard,
    pub top_avg: Leaderboard,
    pub top_vol: Leaderboard,
    /// Closing column names in chronological order.
    pub closing_columns: Vec<String>,
    pub first_column: String,
    pub last_column: String,
    /// Human-readable covered date span, e.g. `02-01-2025 → 30-06-2025`.
    pub range_label: String,
}
