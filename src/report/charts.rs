use std::fs;
use std::path::{Path, PathBuf};

use crate::models::{Leaderboard, ReportArtifacts, SectorAggregate};
use crate::report::svg;
use crate::utils::Logger;

/// Static chart writer: one SVG file per report figure.
pub struct ChartRenderer {
    logger: Logger,
}

impl ChartRenderer {
    pub fn new() -> Self {
        Self {
            logger: Logger::new("CHARTS"),
        }
    }

    pub fn render_top_avg(&self, artifacts: &ReportArtifacts, out_dir: &Path) -> anyhow::Result<PathBuf> {
        let figure = top_avg_figure(artifacts);
        self.write(out_dir, "avg_closing.svg", &figure)
    }

    pub fn render_top_growth(&self, artifacts: &ReportArtifacts, out_dir: &Path) -> anyhow::Result<PathBuf> {
        let figure = top_growth_figure(artifacts);
        self.write(out_dir, "percent_growth.svg", &figure)
    }

    pub fn render_top_volatility(&self, artifacts: &ReportArtifacts, out_dir: &Path) -> anyhow::Result<PathBuf> {
        let figure = top_volatility_figure(artifacts);
        self.write(out_dir, "volatility.svg", &figure)
    }

    pub fn render_sector_performance(&self, artifacts: &ReportArtifacts, out_dir: &Path) -> anyhow::Result<PathBuf> {
        let figure = sector_performance_figure(artifacts);
        self.write(out_dir, "sector_performance.svg", &figure)
    }

    pub fn render_sector_risk(&self, artifacts: &ReportArtifacts, out_dir: &Path) -> anyhow::Result<PathBuf> {
        let figure = sector_risk_figure(artifacts);
        self.write(out_dir, "sector_risk_return.svg", &figure)
    }

    fn write(&self, out_dir: &Path, file_name: &str, contents: &str) -> anyhow::Result<PathBuf> {
        fs::create_dir_all(out_dir)?;
        let path = out_dir.join(file_name);
        fs::write(&path, contents)?;
        self.logger.info(&format!("Wrote {}", path.display()));
        Ok(path)
    }
}

impl Default for ChartRenderer {
    fn default() -> Self {
        Self::new()
    }
}

fn leaderboard_data(board: &Leaderboard) -> Vec<(String, f64)> {
    board
        .entries
        .iter()
        .map(|e| (e.label.clone(), e.value))
        .collect()
}

/// Sectors with a defined growth value, in aggregate order; undefined
/// groups are rendered blank, i.e. left off the figure.
fn sector_growth_data(stats: &[SectorAggregate]) -> Vec<(String, f64)> {
    stats
        .iter()
        .filter_map(|s| s.avg_percent_growth.map(|g| (s.sector.clone(), g)))
        .collect()
}

pub fn top_avg_figure(artifacts: &ReportArtifacts) -> String {
    svg::hbar_chart(
        &format!(
            "Top 10 S&P 500 Companies by Average Closing Price ({})",
            artifacts.range_label
        ),
        "Average Closing Price (USD)",
        &leaderboard_data(&artifacts.top_avg),
    )
}

pub fn top_growth_figure(artifacts: &ReportArtifacts) -> String {
    svg::hbar_chart(
        &format!("Top 10 S&P 500 Stocks by % Growth ({})", artifacts.range_label),
        "Growth (%)",
        &leaderboard_data(&artifacts.top_growth),
    )
}

pub fn top_volatility_figure(artifacts: &ReportArtifacts) -> String {
    svg::hbar_chart(
        &format!("Most Volatile S&P 500 Stocks ({})", artifacts.range_label),
        "Volatility (Standard Deviation of Closing Price)",
        &leaderboard_data(&artifacts.top_vol),
    )
}

pub fn sector_performance_figure(artifacts: &ReportArtifacts) -> String {
    svg::hbar_chart(
        &format!("Average Sector Performance ({})", artifacts.range_label),
        "Average % Growth",
        &sector_growth_data(&artifacts.sector_stats),
    )
}

pub fn sector_risk_figure(artifacts: &ReportArtifacts) -> String {
    let points: Vec<(String, f64, f64)> = artifacts
        .sector_stats
        .iter()
        .filter_map(|s| match (s.avg_volatility, s.avg_percent_growth) {
            (Some(vol), Some(growth)) => Some((s.sector.clone(), vol, growth)),
            _ => None,
        })
        .collect();

    svg::scatter_chart(
        &format!("Sector Risk vs Return ({})", artifacts.range_label),
        "Average Volatility (Std. Dev. of Closing Price)",
        "Average % Growth",
        &points,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metrics::MetricsComputer;
    use crate::models::{PriceRow, PriceTable};
    use std::collections::HashMap;

    fn sample_artifacts() -> ReportArtifacts {
        let table = PriceTable::new(
            vec!["01-02-2025_closing".to_string(), "06-30-2025_closing".to_string()],
            vec![
                PriceRow::new("Apple Inc.".to_string(), "AAPL".to_string(), vec![100.0, 120.0]),
                PriceRow::new("Exxon Mobil".to_string(), "XOM".to_string(), vec![80.0, 72.0]),
            ],
        );
        let mapping: HashMap<String, String> = HashMap::from([
            ("AAPL".to_string(), "Technology".to_string()),
            ("XOM".to_string(), "Energy".to_string()),
        ]);
        MetricsComputer::new().compute(&table, &mapping).unwrap()
    }

    #[test]
    fn figures_carry_the_range_label() {
        let artifacts = sample_artifacts();
        let figure = top_growth_figure(&artifacts);
        assert!(figure.contains("02-01-2025 → 30-06-2025"));
    }

    #[test]
    fn renderer_writes_all_chart_files() {
        let artifacts = sample_artifacts();
        let dir = tempfile::tempdir().unwrap();
        let renderer = ChartRenderer::new();

        let paths = vec![
            renderer.render_top_avg(&artifacts, dir.path()).unwrap(),
            renderer.render_top_growth(&artifacts, dir.path()).unwrap(),
            renderer.render_top_volatility(&artifacts, dir.path()).unwrap(),
            renderer.render_sector_performance(&artifacts, dir.path()).unwrap(),
            renderer.render_sector_risk(&artifacts, dir.path()).unwrap(),
        ];
        for path in paths {
            let contents = std::fs::read_to_string(path).unwrap();
            assert!(contents.starts_with("<svg"));
        }
    }

    #[test]
    fn sector_scatter_has_one_point_per_sector() {
        let artifacts = sample_artifacts();
        let figure = sector_risk_figure(&artifacts);
        assert_eq!(figure.matches("<circle").count(), 2);
        assert!(figure.contains("Technology"));
        assert!(figure.contains("Energy"));
    }
}
