//! ETF holdings representation and normalization.
//!
//! Providers hand back loosely typed tables: a header plus string cells,
//! with percentages written like `"12.34%"`. [`normalize_holdings`] turns
//! one of those into typed [`HoldingRow`]s with fractional weights.

use crate::domain::error::OverlapError;

/// Number of columns a raw table must carry: symbol, name, percent, shares.
pub const HOLDINGS_COLUMNS: usize = 4;

/// Holdings table as delivered by a provider, before normalization.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawHoldingsTable {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl RawHoldingsTable {
    pub fn new(columns: Vec<String>, rows: Vec<Vec<String>>) -> Self {
        Self { columns, rows }
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// One security held by one ETF. `percent` is a fraction (0.05 == 5%).
#[derive(Debug, Clone, PartialEq)]
pub struct HoldingRow {
    pub symbol: String,
    pub name: String,
    pub percent: f64,
    pub shares: f64,
}

/// Normalize a raw provider table into holdings rows.
///
/// Columns are taken positionally as (symbol, name, percent, shares); the
/// provider's own header names are not trusted. Any table or row that is
/// not exactly four cells wide is rejected rather than misaligned.
pub fn normalize_holdings(raw: &RawHoldingsTable) -> Result<Vec<HoldingRow>, OverlapError> {
    if raw.columns.len() != HOLDINGS_COLUMNS {
        return Err(OverlapError::SchemaMismatch {
            reason: format!(
                "expected {} columns (symbol, name, percent, shares), found {}: [{}]",
                HOLDINGS_COLUMNS,
                raw.columns.len(),
                raw.columns.join(", ")
            ),
        });
    }

    raw.rows
        .iter()
        .enumerate()
        .map(|(i, row)| {
            if row.len() != HOLDINGS_COLUMNS {
                return Err(OverlapError::SchemaMismatch {
                    reason: format!(
                        "row {} has {} cells, expected {}",
                        i,
                        row.len(),
                        HOLDINGS_COLUMNS
                    ),
                });
            }
            Ok(HoldingRow {
                symbol: row[0].trim().to_string(),
                name: row[1].trim().to_string(),
                percent: parse_percent(&row[2]).ok_or_else(|| OverlapError::SchemaMismatch {
                    reason: format!("row {}: invalid percent value {:?}", i, row[2]),
                })?,
                shares: parse_shares(&row[3]).ok_or_else(|| OverlapError::SchemaMismatch {
                    reason: format!("row {}: invalid shares value {:?}", i, row[3]),
                })?,
            })
        })
        .collect()
}

/// `"12.34%"` -> 0.1234. A missing `%` suffix is tolerated.
pub fn parse_percent(value: &str) -> Option<f64> {
    let trimmed = value.trim();
    let number = trimmed.strip_suffix('%').unwrap_or(trimmed).trim_end();
    let parsed: f64 = number.parse().ok()?;
    parsed.is_finite().then_some(parsed / 100.0)
}

/// Share counts may carry thousands separators. Blank counts as zero.
pub fn parse_shares(value: &str) -> Option<f64> {
    let cleaned: String = value.trim().chars().filter(|c| *c != ',').collect();
    if cleaned.is_empty() {
        return Some(0.0);
    }
    let parsed: f64 = cleaned.parse().ok()?;
    parsed.is_finite().then_some(parsed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn raw(rows: &[[&str; 4]]) -> RawHoldingsTable {
        RawHoldingsTable::new(
            vec!["symbol".into(), "name".into(), "% of ETF".into(), "shares".into()],
            rows.iter()
                .map(|r| r.iter().map(|c| c.to_string()).collect())
                .collect(),
        )
    }

    #[test]
    fn percent_string_becomes_fraction() {
        let rows = normalize_holdings(&raw(&[["AAPL", "Apple Inc.", "7.50%", "1000"]])).unwrap();
        assert_eq!(rows.len(), 1);
        assert_relative_eq!(rows[0].percent, 0.075, epsilon = 1e-12);
        assert_relative_eq!(rows[0].shares, 1000.0);
        assert_eq!(rows[0].symbol, "AAPL");
        assert_eq!(rows[0].name, "Apple Inc.");
    }

    #[test]
    fn percent_without_suffix_is_still_divided() {
        assert_relative_eq!(parse_percent("12.34").unwrap(), 0.1234, epsilon = 1e-12);
        assert_relative_eq!(parse_percent(" 0.5 % ").unwrap(), 0.005, epsilon = 1e-12);
    }

    #[test]
    fn invalid_percent_is_schema_mismatch() {
        let err = normalize_holdings(&raw(&[["AAPL", "Apple", "n/a", "1"]])).unwrap_err();
        assert!(matches!(err, OverlapError::SchemaMismatch { reason } if reason.contains("percent")));
    }

    #[test]
    fn shares_with_separators() {
        assert_eq!(parse_shares("1,234,567"), Some(1_234_567.0));
        assert_eq!(parse_shares(""), Some(0.0));
        assert_eq!(parse_shares("12.5"), Some(12.5));
        assert_eq!(parse_shares("lots"), None);
    }

    #[test]
    fn wrong_column_count_is_rejected() {
        let table = RawHoldingsTable::new(
            vec!["symbol".into(), "name".into(), "percent".into()],
            vec![vec!["AAPL".into(), "Apple".into(), "1%".into()]],
        );
        let err = normalize_holdings(&table).unwrap_err();
        assert!(matches!(err, OverlapError::SchemaMismatch { .. }));
    }

    #[test]
    fn ragged_row_is_rejected() {
        let mut table = raw(&[["AAPL", "Apple", "1%", "10"]]);
        table.rows.push(vec!["MSFT".into(), "Microsoft".into()]);
        let err = normalize_holdings(&table).unwrap_err();
        assert!(matches!(err, OverlapError::SchemaMismatch { reason } if reason.contains("row 1")));
    }

    #[test]
    fn empty_table_normalizes_to_nothing() {
        let rows = normalize_holdings(&raw(&[])).unwrap();
        assert!(rows.is_empty());
    }

    #[test]
    fn row_order_is_preserved() {
        let rows = normalize_holdings(&raw(&[
            ["MSFT", "Microsoft", "6%", "5"],
            ["AAPL", "Apple", "7%", "9"],
        ]))
        .unwrap();
        let symbols: Vec<_> = rows.iter().map(|r| r.symbol.as_str()).collect();
        assert_eq!(symbols, vec!["MSFT", "AAPL"]);
    }
}
