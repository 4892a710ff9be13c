//! # Priceboard - S&P 500 Closing-Price Analytics
//!
//! A batch analysis library and CLI for a static table of S&P 500 closing
//! prices featuring:
//! - Per-company metrics: average closing price, percent growth, volatility
//! - Sector roll-ups backed by a cached ticker→sector mapping
//! - Top-10 leaderboards over every metric
//! - Static SVG charts and one self-contained tabbed HTML dashboard
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use priceboard::prelude::*;
//! use std::path::Path;
//!
//! fn main() -> anyhow::Result<()> {
//!     let table = PriceTableLoader::new().load(Path::new("sp500_2025_h1.csv"))?;
//!     let artifacts = MetricsComputer::new().compute(&table, &SectorCache::new())?;
//!     println!("Covered range: {}", artifacts.range_label);
//!     Ok(())
//! }
//! ```

// Core modules - these contain the main functionality
pub mod models;
pub mod utils;
pub mod services;

// Analysis modules - the metrics computation core
pub mod metrics;

// Presentation - SVG charts and the tabbed HTML dashboard
pub mod report;

// Public API for easy library usage
pub mod api;

// Data models and types
pub mod data {
    //! Data models and types used throughout the library

    pub use crate::models::derived::*;
    pub use crate::models::price_table::*;
}

// Prelude for convenient imports
pub mod prelude {
    //! Prelude module for convenient imports
    //!
    //! Import this module to get the most commonly used types and functions:
    //! ```rust
    //! use priceboard::prelude::*;
    //! ```

    pub use crate::api::{ReportConfig, Reporter};
    pub use crate::metrics::{top_n, MetricsComputer};
    pub use crate::models::{
        DerivedRow, Leaderboard, LeaderboardMetric, PriceRow, PriceTable, ReportArtifacts,
        SchemaError, SectorAggregate, SortOrder,
    };
    pub use crate::report::{ChartRenderer, DashboardBuilder};
    pub use crate::services::{PriceTableLoader, SectorCache, SectorLookup};
}

// Re-export some commonly used utilities
pub use utils::{init_logger, Logger, Timer};
