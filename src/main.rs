use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use priceboard::api::{ReportConfig, Reporter};
use priceboard::models::{Leaderboard, LeaderboardMetric, ReportArtifacts, SortOrder};
use priceboard::report::{ChartRenderer, DashboardBuilder};
use priceboard::utils::init_logger;

#[derive(Parser)]
#[command(name = "priceboard")]
#[command(about = "S&P 500 closing-price metrics, sector performance, and dashboard generation")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Args, Clone)]
pub struct CommonOpts {
    /// Path to the wide price table CSV
    #[arg(long, default_value = "sp500_2025_h1.csv")]
    data: PathBuf,
    /// Path to the ticker-to-sector cache CSV
    #[arg(long, default_value = "sector_mapping.csv")]
    sector_cache: PathBuf,
    /// Directory for generated charts and the dashboard
    #[arg(long, default_value = ".")]
    out_dir: PathBuf,
}

impl CommonOpts {
    fn into_config(self) -> ReportConfig {
        ReportConfig::new()
            .with_data_path(self.data)
            .with_sector_cache_path(self.sector_cache)
            .with_out_dir(self.out_dir)
    }
}

#[derive(Subcommand)]
pub enum Commands {
    /// Rank companies by average closing price and render the chart
    AvgClosing {
        #[command(flatten)]
        opts: CommonOpts,
    },
    /// Rank stocks by percent growth over the covered range
    Growth {
        #[command(flatten)]
        opts: CommonOpts,
    },
    /// Rank the most volatile stocks
    Volatility {
        #[command(flatten)]
        opts: CommonOpts,
    },
    /// Sector-level performance and risk/return figures
    ///
    /// Fetches and caches the ticker-to-sector mapping when the cache file
    /// is absent.
    Sectors {
        #[command(flatten)]
        opts: CommonOpts,
    },
    /// Write the interactive dashboard bundling all five figures
    Dashboard {
        #[command(flatten)]
        opts: CommonOpts,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_logger()?;

    let cli = Cli::parse();

    match cli.command {
        Commands::AvgClosing { opts } => {
            let reporter = Reporter::new(opts.into_config());
            let artifacts = reporter.artifacts(false).await?;

            println!("Top 10 by average closing price:");
            print_leaderboard(&artifacts.top_avg);
            println!();
            println!("Bottom 10 by average closing price:");
            print_leaderboard(&bottom_board(&artifacts, LeaderboardMetric::AvgClosingPrice));

            ChartRenderer::new().render_top_avg(&artifacts, reporter.out_dir())?;
        }
        Commands::Growth { opts } => {
            let reporter = Reporter::new(opts.into_config());
            let artifacts = reporter.artifacts(false).await?;

            println!("Top 10 Stocks by % Growth ({}):", artifacts.range_label);
            print_leaderboard(&artifacts.top_growth);
            println!();
            println!("Bottom 10 Stocks by % Growth:");
            print_leaderboard(&bottom_board(&artifacts, LeaderboardMetric::PercentChange));

            ChartRenderer::new().render_top_growth(&artifacts, reporter.out_dir())?;
        }
        Commands::Volatility { opts } => {
            let reporter = Reporter::new(opts.into_config());
            let artifacts = reporter.artifacts(false).await?;

            println!("Most Volatile Stocks:");
            print_leaderboard(&artifacts.top_vol);

            ChartRenderer::new().render_top_volatility(&artifacts, reporter.out_dir())?;
        }
        Commands::Sectors { opts } => {
            let reporter = Reporter::new(opts.into_config());
            let artifacts = reporter.artifacts(true).await?;

            println!("Sector stats (avg % growth and avg volatility):");
            print_sector_stats(&artifacts);

            let renderer = ChartRenderer::new();
            renderer.render_sector_performance(&artifacts, reporter.out_dir())?;
            renderer.render_sector_risk(&artifacts, reporter.out_dir())?;
        }
        Commands::Dashboard { opts } => {
            let reporter = Reporter::new(opts.into_config());
            let artifacts = reporter.artifacts(false).await?;

            let path = DashboardBuilder::new().write(&artifacts, reporter.out_dir())?;
            println!("Wrote {}", path.display());
        }
    }

    Ok(())
}

fn bottom_board(artifacts: &ReportArtifacts, metric: LeaderboardMetric) -> Leaderboard {
    priceboard::metrics::top_n(&artifacts.derived_rows, metric, 10, SortOrder::Ascending)
}

fn print_leaderboard(board: &Leaderboard) {
    for (rank, entry) in board.entries.iter().enumerate() {
        println!("{:>3}. {:<40} {:>10.2}", rank + 1, entry.label, entry.value);
    }
}

fn print_sector_stats(artifacts: &ReportArtifacts) {
    println!(
        "{:<28} {:>12} {:>14} {:>10}",
        "sector", "avg_growth", "avg_volatility", "companies"
    );
    for stat in &artifacts.sector_stats {
        println!(
            "{:<28} {:>12} {:>14} {:>10}",
            stat.sector,
            fmt_opt(stat.avg_percent_growth),
            fmt_opt(stat.avg_volatility),
            stat.company_count
        );
    }
}

/// Undefined values render blank in the report tables.
fn fmt_opt(value: Option<f64>) -> String {
    match value {
        Some(v) => format!("{:.2}", v),
        None => String::new(),
    }
}
