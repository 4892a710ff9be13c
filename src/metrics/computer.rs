//! Core metrics computation over the wide price table.
//!
//! One deterministic transform, re-run end to end on each invocation: select
//! the closing columns, resolve the chronological bounds, derive the per-row
//! metrics, roll rows up by sector, and rank the leaderboards. Everything
//! the presentation layer shows comes out of [`MetricsComputer::compute`].

use chrono::NaiveDate;

use crate::models::{
    DerivedRow, Leaderboard, LeaderboardEntry, LeaderboardMetric, PriceRow, PriceTable,
    ReportArtifacts, SchemaError, SectorAggregate, SortOrder, UNKNOWN_SECTOR,
};
use crate::services::SectorLookup;
use crate::utils::{date, Logger, Timer};

/// Default leaderboard depth.
pub const TOP_N: usize = 10;

/// Select every column whose name follows the closing-price convention.
pub fn identify_closing_columns(headers: &[String]) -> Result<Vec<String>, SchemaError> {
    let columns: Vec<String> = headers
        .iter()
        .filter(|h| h.ends_with(date::CLOSING_SUFFIX))
        .cloned()
        .collect();

    if columns.is_empty() {
        return Err(SchemaError::NoClosingColumns);
    }
    Ok(columns)
}

/// Indices of `columns` sorted ascending by parsed column date.
///
/// Ties (not expected, since each date token is unique) keep original
/// column order via the stable sort.
fn chronological_order(columns: &[String]) -> Result<Vec<usize>, SchemaError> {
    if columns.is_empty() {
        return Err(SchemaError::NoClosingColumns);
    }

    let mut dated: Vec<(usize, NaiveDate)> = Vec::with_capacity(columns.len());
    for (idx, column) in columns.iter().enumerate() {
        let parsed = date::parse_column_date(column).ok_or_else(|| SchemaError::UnparseableDate {
            column: column.clone(),
        })?;
        dated.push((idx, parsed));
    }

    dated.sort_by_key(|(_, parsed)| *parsed);
    Ok(dated.into_iter().map(|(idx, _)| idx).collect())
}

/// Resolve the chronologically earliest and latest closing columns.
pub fn resolve_chronological_bounds(columns: &[String]) -> Result<(String, String), SchemaError> {
    let order = chronological_order(columns)?;
    let first = columns[order[0]].clone();
    let last = columns[order[order.len() - 1]].clone();
    Ok((first, last))
}

/// Arithmetic mean over finite values; `None` when none are usable.
fn mean(values: &[f64]) -> Option<f64> {
    let finite: Vec<f64> = values.iter().copied().filter(|v| v.is_finite()).collect();
    if finite.is_empty() {
        return None;
    }
    Some(finite.iter().sum::<f64>() / finite.len() as f64)
}

/// Sample standard deviation (N−1 divisor) over finite values; `None` when
/// fewer than two are usable.
fn sample_std(values: &[f64]) -> Option<f64> {
    let finite: Vec<f64> = values.iter().copied().filter(|v| v.is_finite()).collect();
    let n = finite.len();
    if n < 2 {
        return None;
    }
    let m = finite.iter().sum::<f64>() / n as f64;
    let variance = finite.iter().map(|v| (v - m).powi(2)).sum::<f64>() / (n - 1) as f64;
    Some(variance.sqrt())
}

/// Relative movement between the earliest and latest sampled closes.
///
/// A zero (or unusable) baseline yields `None` rather than an error: this is
/// a batch report, and downstream aggregation must tolerate missing values.
fn percent_change(first: f64, last: f64) -> Option<f64> {
    if !first.is_finite() || !last.is_finite() || first == 0.0 {
        return None;
    }
    Some((last - first) / first * 100.0)
}

/// Derive the per-row metrics. `first_idx`/`last_idx` index into the row's
/// `closes`, aligned with the table's original column order.
pub fn compute_row_metrics(
    row: &PriceRow,
    first_idx: usize,
    last_idx: usize,
    sector: String,
) -> DerivedRow {
    // Short rows (ragged source records) read as NaN and mark the metric
    // undefined instead of panicking.
    let first = row.closes.get(first_idx).copied().unwrap_or(f64::NAN);
    let last = row.closes.get(last_idx).copied().unwrap_or(f64::NAN);

    DerivedRow {
        company_name: row.company_name.clone(),
        ticker: row.ticker.clone(),
        sector,
        avg_closing_price: mean(&row.closes),
        percent_change: percent_change(first, last),
        volatility: sample_std(&row.closes),
    }
}

/// Classify a ticker via the sector mapping; a miss never propagates.
pub fn classify_sector(ticker: &str, mapping: &dyn SectorLookup) -> String {
    mapping
        .lookup(ticker)
        .unwrap_or_else(|| UNKNOWN_SECTOR.to_string())
}

/// Group derived rows by sector and compute the per-group means.
///
/// Groups exist only for sectors present in the rows; group means skip rows
/// whose per-row metric is undefined. Output is sorted by average percent
/// growth, best first, groups without a defined growth last.
pub fn aggregate_by_sector(rows: &[DerivedRow]) -> Vec<SectorAggregate> {
    let mut order: Vec<&str> = Vec::new();
    for row in rows {
        if !order.contains(&row.sector.as_str()) {
            order.push(&row.sector);
        }
    }

    let mut stats: Vec<SectorAggregate> = order
        .into_iter()
        .map(|sector| {
            let members: Vec<&DerivedRow> = rows.iter().filter(|r| r.sector == sector).collect();
            let growths: Vec<f64> = members.iter().filter_map(|r| r.percent_change).collect();
            let vols: Vec<f64> = members.iter().filter_map(|r| r.volatility).collect();
            SectorAggregate {
                sector: sector.to_string(),
                avg_percent_growth: mean(&growths),
                avg_volatility: mean(&vols),
                company_count: members.len(),
            }
        })
        .collect();

    stats.sort_by(|a, b| match (b.avg_percent_growth, a.avg_percent_growth) {
        (Some(x), Some(y)) => x.partial_cmp(&y).unwrap_or(std::cmp::Ordering::Equal),
        (Some(_), None) => std::cmp::Ordering::Greater,
        (None, Some(_)) => std::cmp::Ordering::Less,
        (None, None) => std::cmp::Ordering::Equal,
    });
    stats
}

/// Rank rows by one metric. Rows with an undefined metric are excluded, so
/// the result holds `min(n, defined_rows)` entries; ties keep original row
/// order via the stable sort.
pub fn top_n(
    rows: &[DerivedRow],
    metric: LeaderboardMetric,
    n: usize,
    order: SortOrder,
) -> Leaderboard {
    let mut ranked: Vec<(&DerivedRow, f64)> = rows
        .iter()
        .filter_map(|row| row.metric(metric).map(|value| (row, value)))
        .collect();

    ranked.sort_by(|(_, a), (_, b)| {
        let ordering = a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal);
        match order {
            SortOrder::Ascending => ordering,
            SortOrder::Descending => ordering.reverse(),
        }
    });

    Leaderboard {
        metric,
        order,
        entries: ranked
            .into_iter()
            .take(n)
            .map(|(row, value)| LeaderboardEntry {
                label: row.label(),
                company_name: row.company_name.clone(),
                ticker: row.ticker.clone(),
                value,
            })
            .collect(),
    }
}

/// The metrics computation component.
///
/// Given a price table and a sector mapping, produces every derived table
/// the reports consume. No internal state survives between invocations.
pub struct MetricsComputer {
    logger: Logger,
}

impl MetricsComputer {
    pub fn new() -> Self {
        Self {
            logger: Logger::new("METRICS"),
        }
    }

    pub fn compute(
        &self,
        table: &PriceTable,
        sectors: &dyn SectorLookup,
    ) -> Result<ReportArtifacts, SchemaError> {
        let timer = Timer::start("metrics computation");

        // STEP 1: Validate the closing columns and resolve chronology. Any
        // schema problem aborts here, before a single metric is computed.
        if table.closing_columns.is_empty() {
            return Err(SchemaError::NoClosingColumns);
        }
        let order = chronological_order(&table.closing_columns)?;
        let first_idx = order[0];
        let last_idx = order[order.len() - 1];
        let first_column = table.closing_columns[first_idx].clone();
        let last_column = table.closing_columns[last_idx].clone();
        let range_label = date::range_label(&first_column, &last_column);

        // STEP 2: Per-row metrics and sector classification.
        let derived_rows: Vec<DerivedRow> = table
            .rows
            .iter()
            .map(|row| {
                let sector = classify_sector(&row.ticker, sectors);
                compute_row_metrics(row, first_idx, last_idx, sector)
            })
            .collect();

        // STEP 3: Sector roll-up.
        let sector_stats = aggregate_by_sector(&derived_rows);

        // STEP 4: Default leaderboards (best-first views).
        let top_growth = top_n(
            &derived_rows,
            LeaderboardMetric::PercentChange,
            TOP_N,
            SortOrder::Descending,
        );
        let top_avg = top_n(
            &derived_rows,
            LeaderboardMetric::AvgClosingPrice,
            TOP_N,
            SortOrder::Descending,
        );
        let top_vol = top_n(
            &derived_rows,
            LeaderboardMetric::Volatility,
            TOP_N,
            SortOrder::Descending,
        );

        let closing_columns: Vec<String> = order
            .iter()
            .map(|&idx| table.closing_columns[idx].clone())
            .collect();

        self.logger.info(&format!(
            "Computed metrics for {} rows across {} closing columns ({} sectors) in {:.1}ms",
            derived_rows.len(),
            closing_columns.len(),
            sector_stats.len(),
            timer.elapsed_ms()
        ));

        Ok(ReportArtifacts {
            derived_rows,
            sector_stats,
            top_growth,
            top_avg,
            top_vol,
            closing_columns,
            first_column,
            last_column,
            range_label,
        })
    }
}

impl Default for MetricsComputer {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn table(columns: &[&str], rows: Vec<(&str, &str, Vec<f64>)>) -> PriceTable {
        PriceTable::new(
            columns.iter().map(|c| c.to_string()).collect(),
            rows.into_iter()
                .map(|(name, ticker, closes)| {
                    PriceRow::new(name.to_string(), ticker.to_string(), closes)
                })
                .collect(),
        )
    }

    fn no_sectors() -> HashMap<String, String> {
        HashMap::new()
    }

    #[test]
    fn identifies_closing_columns_by_suffix() {
        let headers = vec![
            "company_name".to_string(),
            "ticker".to_string(),
            "01-02-2025_closing".to_string(),
            "01-03-2025_closing".to_string(),
        ];
        let columns = identify_closing_columns(&headers).unwrap();
        assert_eq!(columns, vec!["01-02-2025_closing", "01-03-2025_closing"]);
    }

    #[test]
    fn no_closing_columns_is_a_schema_error() {
        let headers = vec!["company_name".to_string(), "ticker".to_string()];
        assert!(matches!(
            identify_closing_columns(&headers),
            Err(SchemaError::NoClosingColumns)
        ));
    }

    #[test]
    fn bounds_follow_parsed_dates_not_lexical_order() {
        // Lexically "02-01-2025" < "11-15-2024", but Nov 2024 is earlier.
        let columns = vec![
            "02-01-2025_closing".to_string(),
            "11-15-2024_closing".to_string(),
            "06-30-2025_closing".to_string(),
        ];
        let (first, last) = resolve_chronological_bounds(&columns).unwrap();
        assert_eq!(first, "11-15-2024_closing");
        assert_eq!(last, "06-30-2025_closing");
    }

    #[test]
    fn unparseable_date_token_aborts_before_metrics() {
        let t = table(
            &["badcol_closing", "01-03-2025_closing"],
            vec![("A", "A", vec![100.0, 110.0])],
        );
        let result = MetricsComputer::new().compute(&t, &no_sectors());
        match result {
            Err(SchemaError::UnparseableDate { column }) => assert_eq!(column, "badcol_closing"),
            other => panic!("expected UnparseableDate, got {:?}", other.map(|_| ())),
        }
    }

    #[test]
    fn worked_example_from_two_rows() {
        let t = table(
            &["01-02-2025_closing", "01-03-2025_closing"],
            vec![
                ("A", "A", vec![100.0, 110.0]),
                ("B", "B", vec![50.0, 45.0]),
            ],
        );
        let artifacts = MetricsComputer::new().compute(&t, &no_sectors()).unwrap();

        let a = &artifacts.derived_rows[0];
        let b = &artifacts.derived_rows[1];
        assert!((a.percent_change.unwrap() - 10.0).abs() < 1e-9);
        assert!((b.percent_change.unwrap() + 10.0).abs() < 1e-9);
        assert!((a.avg_closing_price.unwrap() - 105.0).abs() < 1e-9);
        assert!((a.volatility.unwrap() - 2.0_f64.sqrt() * 5.0).abs() < 1e-9);
        assert_eq!(artifacts.range_label, "02-01-2025 → 03-01-2025");
    }

    #[test]
    fn mean_is_independent_of_column_order() {
        let forward = table(
            &["01-02-2025_closing", "01-03-2025_closing", "01-06-2025_closing"],
            vec![("A", "A", vec![10.0, 20.0, 60.0])],
        );
        let shuffled = table(
            &["01-06-2025_closing", "01-02-2025_closing", "01-03-2025_closing"],
            vec![("A", "A", vec![60.0, 10.0, 20.0])],
        );
        let computer = MetricsComputer::new();
        let f = computer.compute(&forward, &no_sectors()).unwrap();
        let s = computer.compute(&shuffled, &no_sectors()).unwrap();
        assert_eq!(
            f.derived_rows[0].avg_closing_price,
            s.derived_rows[0].avg_closing_price
        );
        assert_eq!(
            f.derived_rows[0].percent_change,
            s.derived_rows[0].percent_change
        );
    }

    #[test]
    fn volatility_is_non_negative_and_undefined_for_single_column() {
        let t = table(&["01-02-2025_closing"], vec![("A", "A", vec![100.0])]);
        let artifacts = MetricsComputer::new().compute(&t, &no_sectors()).unwrap();
        assert_eq!(artifacts.derived_rows[0].volatility, None);

        let t2 = table(
            &["01-02-2025_closing", "01-03-2025_closing"],
            vec![("A", "A", vec![100.0, 90.0])],
        );
        let artifacts2 = MetricsComputer::new().compute(&t2, &no_sectors()).unwrap();
        assert!(artifacts2.derived_rows[0].volatility.unwrap() >= 0.0);
    }

    #[test]
    fn percent_change_is_idempotent() {
        let row = PriceRow::new("A".to_string(), "A".to_string(), vec![100.0, 110.0]);
        let first = compute_row_metrics(&row, 0, 1, UNKNOWN_SECTOR.to_string());
        let second = compute_row_metrics(&row, 0, 1, UNKNOWN_SECTOR.to_string());
        assert_eq!(first.percent_change, second.percent_change);
    }

    #[test]
    fn zero_baseline_marks_percent_change_undefined() {
        let t = table(
            &["01-02-2025_closing", "01-03-2025_closing"],
            vec![("A", "A", vec![0.0, 10.0]), ("B", "B", vec![10.0, 20.0])],
        );
        let artifacts = MetricsComputer::new().compute(&t, &no_sectors()).unwrap();
        assert_eq!(artifacts.derived_rows[0].percent_change, None);
        // The undefined row is excluded from the group mean, not poisoning it.
        assert!((artifacts.sector_stats[0].avg_percent_growth.unwrap() - 100.0).abs() < 1e-9);
    }

    #[test]
    fn sector_groups_partition_the_rows() {
        let mut mapping = HashMap::new();
        mapping.insert("A".to_string(), "Tech".to_string());
        mapping.insert("B".to_string(), "Energy".to_string());
        // C is unmapped and falls back to Unknown.
        let t = table(
            &["01-02-2025_closing", "01-03-2025_closing"],
            vec![
                ("A", "A", vec![1.0, 2.0]),
                ("B", "B", vec![3.0, 4.0]),
                ("C", "C", vec![5.0, 6.0]),
            ],
        );
        let artifacts = MetricsComputer::new().compute(&t, &mapping).unwrap();

        let total: usize = artifacts.sector_stats.iter().map(|s| s.company_count).sum();
        assert_eq!(total, 3);
        for row in &artifacts.derived_rows {
            let groups = artifacts
                .sector_stats
                .iter()
                .filter(|s| s.sector == row.sector)
                .count();
            assert_eq!(groups, 1);
        }
    }

    #[test]
    fn missing_mapping_yields_single_unknown_aggregate() {
        let t = table(
            &["01-02-2025_closing", "01-03-2025_closing"],
            vec![("A", "A", vec![1.0, 2.0]), ("B", "B", vec![3.0, 4.0])],
        );
        let artifacts = MetricsComputer::new().compute(&t, &no_sectors()).unwrap();
        assert_eq!(artifacts.sector_stats.len(), 1);
        assert_eq!(artifacts.sector_stats[0].sector, UNKNOWN_SECTOR);
        assert_eq!(artifacts.sector_stats[0].company_count, 2);
    }

    #[test]
    fn top_n_is_capped_ordered_and_stable() {
        let rows: Vec<(String, Vec<f64>)> = (0..4)
            .map(|i| (format!("C{}", i), vec![100.0, 100.0 + (i % 2) as f64 * 10.0]))
            .collect();
        let t = table(
            &["01-02-2025_closing", "01-03-2025_closing"],
            rows.iter()
                .map(|(name, closes)| (name.as_str(), name.as_str(), closes.clone()))
                .collect(),
        );
        let artifacts = MetricsComputer::new().compute(&t, &no_sectors()).unwrap();

        let board = top_n(
            &artifacts.derived_rows,
            LeaderboardMetric::PercentChange,
            10,
            SortOrder::Descending,
        );
        assert_eq!(board.len(), 4);
        // C1 and C3 tie at +10%, C0 and C2 tie at 0%; stable order keeps
        // the earlier row first within each tie.
        let tickers: Vec<&str> = board.entries.iter().map(|e| e.ticker.as_str()).collect();
        assert_eq!(tickers, vec!["C1", "C3", "C0", "C2"]);

        let worst = top_n(
            &artifacts.derived_rows,
            LeaderboardMetric::PercentChange,
            2,
            SortOrder::Ascending,
        );
        assert_eq!(worst.len(), 2);
        assert_eq!(worst.entries[0].ticker, "C0");
    }

    #[test]
    fn leaderboard_labels_combine_name_and_ticker() {
        let t = table(
            &["01-02-2025_closing", "01-03-2025_closing"],
            vec![("Apple Inc.", "AAPL", vec![100.0, 110.0])],
        );
        let artifacts = MetricsComputer::new().compute(&t, &no_sectors()).unwrap();
        assert_eq!(artifacts.top_growth.entries[0].label, "Apple Inc. (AAPL)");
    }
}
