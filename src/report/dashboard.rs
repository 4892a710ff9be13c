use std::fs;
use std::path::{Path, PathBuf};

use crate::models::ReportArtifacts;
use crate::report::charts;
use crate::utils::Logger;

const DEFAULT_TEMPLATE: &str = include_str!("dashboard_template.html");
pub const DASHBOARD_FILE: &str = "dashboard.html";

/// Builds the self-contained tabbed dashboard document.
///
/// Five figures, one visible panel at a time; panel identity is the
/// zero-based index into the figure list.
pub struct DashboardBuilder {
    logger: Logger,
}

impl DashboardBuilder {
    pub fn new() -> Self {
        Self {
            logger: Logger::new("DASHBOARD"),
        }
    }

    /// Render the dashboard HTML as a string.
    pub fn render(&self, artifacts: &ReportArtifacts) -> String {
        let figures = vec![
            ("Sector Performance", charts::sector_performance_figure(artifacts)),
            ("Risk vs Return", charts::sector_risk_figure(artifacts)),
            ("Top 10 % Growth", charts::top_growth_figure(artifacts)),
            ("Top 10 Avg Price", charts::top_avg_figure(artifacts)),
            ("Top 10 Volatility", charts::top_volatility_figure(artifacts)),
        ];

        let buttons: String = figures
            .iter()
            .enumerate()
            .map(|(i, (title, _))| {
                format!(
                    "<button class=\"tabbtn\" onclick=\"showPanel({})\">{}</button>",
                    i, title
                )
            })
            .collect();

        let panels: String = figures
            .iter()
            .enumerate()
            .map(|(i, (_, figure))| {
                let style = if i == 0 { "" } else { "display:none;" };
                format!("<div id=\"panel{}\" style=\"{}\">{}</div>\n", i, style, figure)
            })
            .collect();

        DEFAULT_TEMPLATE
            .replace("{{range_label}}", &artifacts.range_label)
            .replace("{{buttons}}", &buttons)
            .replace("{{panels}}", &panels)
            .replace("{{panel_count}}", &figures.len().to_string())
    }

    /// Render and write `dashboard.html` into `out_dir`.
    pub fn write(&self, artifacts: &ReportArtifacts, out_dir: &Path) -> anyhow::Result<PathBuf> {
        let html = self.render(artifacts);
        fs::create_dir_all(out_dir)?;
        let path = out_dir.join(DASHBOARD_FILE);
        fs::write(&path, html)?;
        self.logger.info(&format!("✅ Wrote {}", path.display()));
        Ok(path)
    }
}

impl Default for DashboardBuilder {
    fn default() -> Self {
        Self::new()
    }
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
        MetricsComputer::new()
            .compute(&table, &HashMap::new())
            .unwrap()
    }

    #[test]
    fn renders_five_panels_with_only_the_first_visible() {
        let html = DashboardBuilder::new().render(&sample_artifacts());
        for i in 0..5 {
            assert!(html.contains(&format!("id=\"panel{}\"", i)));
            assert!(html.contains(&format!("showPanel({})", i)));
        }
        assert!(!html.contains("id=\"panel5\""));
        // Panel 0 is visible, the rest start hidden.
        assert!(html.contains("<div id=\"panel0\" style=\"\">"));
        assert_eq!(html.matches("display:none;").count(), 4);
    }

    #[test]
    fn carries_range_label_and_tab_script() {
        let artifacts = sample_artifacts();
        let html = DashboardBuilder::new().render(&artifacts);
        assert!(html.contains(&artifacts.range_label));
        assert!(html.contains("function showPanel(i)"));
        assert!(html.contains("const n = 5;"));
        assert!(!html.contains("{{"));
    }

    #[test]
    fn writes_dashboard_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = DashboardBuilder::new()
            .write(&sample_artifacts(), dir.path())
            .unwrap();
        assert!(path.ends_with(DASHBOARD_FILE));
        let contents = std::fs::read_to_string(path).unwrap();
        assert!(contents.contains("<!DOCTYPE html>"));
    }
}
