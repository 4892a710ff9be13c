use std::fs::File;
use std::io::Read;
use std::path::Path;

use crate::metrics::identify_closing_columns;
use crate::models::{PriceRow, PriceTable, SchemaError};
use crate::utils::{Logger, Timer};

const COMPANY_NAME_COLUMN: &str = "company_name";
const TICKER_COLUMN: &str = "ticker";

/// Price table loading service.
///
/// Reads the wide price CSV (`company_name`, `ticker`, one
/// `MM-DD-YYYY_closing` column per sampled trading date) fully into memory.
/// The file is opened once and never written back.
pub struct PriceTableLoader {
    logger: Logger,
}

impl PriceTableLoader {
    pub fn new() -> Self {
        Self {
            logger: Logger::new("CSV_SERVICE"),
        }
    }

    /// Load the price table from a file on disk.
    pub fn load(&self, path: &Path) -> anyhow::Result<PriceTable> {
        let timer = Timer::start(&format!("{} load", path.display()));
        let file = File::open(path)
            .map_err(|e| anyhow::anyhow!("failed to open {}: {}", path.display(), e))?;
        let table = self.load_from_reader(file)?;

        self.logger.info(&format!(
            "Loaded {}: {} rows, {} closing columns ({:.1}ms)",
            path.display(),
            table.row_count(),
            table.closing_columns.len(),
            timer.elapsed_ms()
        ));
        Ok(table)
    }

    /// Load the price table from any reader. Schema problems are fatal;
    /// unreadable price cells degrade to NaN and are skipped downstream.
    pub fn load_from_reader<R: Read>(&self, reader: R) -> anyhow::Result<PriceTable> {
        let mut csv_reader = csv::Reader::from_reader(reader);

        let headers: Vec<String> = csv_reader
            .headers()?
            .iter()
            .map(|h| h.trim().to_string())
            .collect();

        let name_idx = headers
            .iter()
            .position(|h| h.as_str() == COMPANY_NAME_COLUMN)
            .ok_or(SchemaError::MissingColumn(COMPANY_NAME_COLUMN))?;
        let ticker_idx = headers
            .iter()
            .position(|h| h.as_str() == TICKER_COLUMN)
            .ok_or(SchemaError::MissingColumn(TICKER_COLUMN))?;

        let closing_columns = identify_closing_columns(&headers)?;
        let closing_indices: Vec<usize> = closing_columns
            .iter()
            .map(|column| headers.iter().position(|h| h == column).unwrap_or(0))
            .collect();

        let mut rows = Vec::new();
        for record in csv_reader.records() {
            let record = record?;
            let closes: Vec<f64> = closing_indices
                .iter()
                .map(|&idx| parse_price_cell(record.get(idx)))
                .collect();
            rows.push(PriceRow::new(
                record.get(name_idx).unwrap_or("").trim().to_string(),
                record.get(ticker_idx).unwrap_or("").trim().to_string(),
                closes,
            ));
        }

        Ok(PriceTable::new(closing_columns, rows))
    }
}

impl Default for PriceTableLoader {
    fn default() -> Self {
        Self::new()
    }
}

fn parse_price_cell(cell: Option<&str>) -> f64 {
    cell.map(str::trim)
        .filter(|c| !c.is_empty())
        .and_then(|c| c.parse::<f64>().ok())
        .unwrap_or(f64::NAN)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = "\
company_name,ticker,01-02-2025_closing,01-03-2025_closing
Apple Inc.,AAPL,100.0,110.0
Microsoft Corp.,MSFT,50.0,45.0
";

    #[test]
    fn loads_wide_table() {
        let table = PriceTableLoader::new()
            .load_from_reader(SAMPLE.as_bytes())
            .unwrap();
        assert_eq!(table.row_count(), 2);
        assert_eq!(
            table.closing_columns,
            vec!["01-02-2025_closing", "01-03-2025_closing"]
        );
        assert_eq!(table.rows[0].ticker, "AAPL");
        assert_eq!(table.rows[1].closes, vec![50.0, 45.0]);
    }

    #[test]
    fn missing_ticker_column_is_fatal() {
        let data = "company_name,01-02-2025_closing\nApple,100.0\n";
        let err = PriceTableLoader::new()
            .load_from_reader(data.as_bytes())
            .unwrap_err();
        let schema = err.downcast::<SchemaError>().unwrap();
        assert!(matches!(schema, SchemaError::MissingColumn("ticker")));
    }

    #[test]
    fn table_without_closing_columns_is_fatal() {
        let data = "company_name,ticker\nApple,AAPL\n";
        let err = PriceTableLoader::new()
            .load_from_reader(data.as_bytes())
            .unwrap_err();
        let schema = err.downcast::<SchemaError>().unwrap();
        assert!(matches!(schema, SchemaError::NoClosingColumns));
    }

    #[test]
    fn unreadable_cells_degrade_to_nan() {
        let data = "\
company_name,ticker,01-02-2025_closing,01-03-2025_closing
Apple Inc.,AAPL,,n/a
";
        let table = PriceTableLoader::new()
            .load_from_reader(data.as_bytes())
            .unwrap();
        assert!(table.rows[0].closes.iter().all(|v| v.is_nan()));
    }
}
