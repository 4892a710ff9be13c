use chrono::NaiveDate;

/// Suffix that marks a closing-price column in the input table.
pub const CLOSING_SUFFIX: &str = "_closing";

/// Strip the closing suffix from a column name, if present.
pub fn date_token(column: &str) -> &str {
    column.strip_suffix(CLOSING_SUFFIX).unwrap_or(column)
}

/// Parse the `MM-DD-YYYY` date token out of a closing column name.
pub fn parse_column_date(column: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(date_token(column), "%m-%d-%Y").ok()
}

/// Render a column's date token day-first (`DD-MM-YYYY`) for display.
///
/// Falls back to the raw token when it does not parse, matching the
/// best-effort display behavior of the report headers.
pub fn display_date(column: &str) -> String {
    match parse_column_date(column) {
        Some(date) => date.format("%d-%m-%Y").to_string(),
        None => date_token(column).to_string(),
    }
}

/// Human-readable label for the covered date span.
pub fn range_label(first_column: &str, last_column: &str) -> String {
    format!("{} → {}", display_date(first_column), display_date(last_column))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_month_first_token() {
        let date = parse_column_date("01-02-2025_closing").unwrap();
        assert_eq!(date, NaiveDate::from_ymd_opt(2025, 1, 2).unwrap());
    }

    #[test]
    fn rejects_unparseable_token() {
        assert!(parse_column_date("badcol_closing").is_none());
        assert!(parse_column_date("13-45-2025_closing").is_none());
    }

    #[test]
    fn display_is_day_first() {
        assert_eq!(display_date("06-30-2025_closing"), "30-06-2025");
    }

    #[test]
    fn range_label_spans_first_to_last() {
        assert_eq!(
            range_label("01-02-2025_closing", "06-30-2025_closing"),
            "02-01-2025 → 30-06-2025"
        );
    }
}
