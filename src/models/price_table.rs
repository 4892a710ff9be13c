use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Fatal input-schema problems. Any of these aborts the run before a single
/// metric is computed; the user has to fix the input file.
#[derive(Debug, Error)]
pub enum SchemaError {
    #[error("input table is missing required column `{0}`")]
    MissingColumn(&'static str),
    #[error("no closing-price columns found in input table")]
    NoClosingColumns,
    #[error("closing column `{column}` has an unparseable date token")]
    UnparseableDate { column: String },
}

/// One company row from the wide price table.
///
/// `closes` is aligned index-for-index with the owning table's
/// `closing_columns`. Cells that were empty or non-numeric in the source
/// file are carried as `f64::NAN` and skipped by the aggregate metrics.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceRow {
    pub company_name: String,
    pub ticker: String,
    pub closes: Vec<f64>,
}

impl PriceRow {
    pub fn new(company_name: String, ticker: String, closes: Vec<f64>) -> Self {
        Self {
            company_name,
            ticker,
            closes,
        }
    }

    /// Closing values that are actually usable for aggregation.
    pub fn finite_closes(&self) -> impl Iterator<Item = f64> + '_ {
        self.closes.iter().copied().filter(|v| v.is_finite())
    }
}

/// The input table: one row per company, one closing-price column per
/// sampled trading date, in original file order.
#[derive(Debug, Clone, Default)]
pub struct PriceTable {
    /// Closing column names (`MM-DD-YYYY_closing`), in original file order.
    pub closing_columns: Vec<String>,
    pub rows: Vec<PriceRow>,
}

impl PriceTable {
    pub fn new(closing_columns: Vec<String>, rows: Vec<PriceRow>) -> Self {
        Self {
            closing_columns,
            rows,
        }
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}
