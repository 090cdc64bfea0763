//! Outer join of two ETFs' holdings and share-count classification.

use crate::domain::holding::HoldingRow;
use std::collections::BTreeMap;
use std::fmt;

/// Which side(s) of the join a merged row came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Membership {
    OnlyA,
    OnlyB,
    Both,
}

impl fmt::Display for Membership {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Membership::OnlyA => write!(f, "only_a"),
            Membership::OnlyB => write!(f, "only_b"),
            Membership::Both => write!(f, "both"),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct MergedRow {
    pub symbol: String,
    pub name: String,
    pub percent_a: Option<f64>,
    pub shares_a: Option<f64>,
    pub percent_b: Option<f64>,
    pub shares_b: Option<f64>,
    pub membership: Membership,
}

/// Joined holdings of ETF A and ETF B.
#[derive(Debug, Clone, PartialEq)]
pub struct MergedTable {
    pub etf_a: String,
    pub etf_b: String,
    pub rows: Vec<MergedRow>,
}

impl MergedTable {
    /// Column name holding `etf`'s weights, e.g. `percent_SPY`.
    pub fn percent_column(etf: &str) -> String {
        format!("percent_{}", etf)
    }

    /// Column name holding `etf`'s share counts, e.g. `shares_SPY`.
    pub fn shares_column(etf: &str) -> String {
        format!("shares_{}", etf)
    }

    pub fn count(&self, membership: Membership) -> usize {
        self.rows.iter().filter(|r| r.membership == membership).count()
    }

    pub fn overlapping(&self) -> impl Iterator<Item = &MergedRow> {
        self.rows.iter().filter(|r| r.membership == Membership::Both)
    }
}

/// Tab-separated dump: a header with the per-ETF column names, then one line
/// per row with `-` for fields absent on that side.
impl fmt::Display for MergedTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "symbol\tname\t{}\t{}\t{}\t{}\tmembership",
            Self::percent_column(&self.etf_a),
            Self::shares_column(&self.etf_a),
            Self::percent_column(&self.etf_b),
            Self::shares_column(&self.etf_b),
        )?;
        let cell = |v: Option<f64>| v.map_or_else(|| "-".to_string(), |v| v.to_string());
        for row in &self.rows {
            writeln!(
                f,
                "{}\t{}\t{}\t{}\t{}\t{}\t{}",
                row.symbol,
                row.name,
                cell(row.percent_a),
                cell(row.shares_a),
                cell(row.percent_b),
                cell(row.shares_b),
                row.membership,
            )?;
        }
        Ok(())
    }
}

/// Full outer join on (symbol, name).
///
/// Rows are emitted in ascending (symbol, name) order. A key repeated on
/// both sides yields every pairing of its A rows with its B rows.
pub fn outer_join(etf_a: &str, a: &[HoldingRow], etf_b: &str, b: &[HoldingRow]) -> MergedTable {
    let mut keys: BTreeMap<(&str, &str), (Vec<&HoldingRow>, Vec<&HoldingRow>)> = BTreeMap::new();
    for row in a {
        keys.entry((row.symbol.as_str(), row.name.as_str())).or_default().0.push(row);
    }
    for row in b {
        keys.entry((row.symbol.as_str(), row.name.as_str())).or_default().1.push(row);
    }

    let mut rows = Vec::with_capacity(keys.len());
    for ((symbol, name), (left, right)) in keys {
        let make = |l: Option<&HoldingRow>, r: Option<&HoldingRow>, membership: Membership| MergedRow {
            symbol: symbol.to_string(),
            name: name.to_string(),
            percent_a: l.map(|h| h.percent),
            shares_a: l.map(|h| h.shares),
            percent_b: r.map(|h| h.percent),
            shares_b: r.map(|h| h.shares),
            membership,
        };

        match (left.is_empty(), right.is_empty()) {
            (false, true) => rows.extend(left.iter().map(|l| make(Some(*l), None, Membership::OnlyA))),
            (true, false) => rows.extend(right.iter().map(|r| make(None, Some(*r), Membership::OnlyB))),
            _ => {
                for l in &left {
                    for r in &right {
                        rows.push(make(Some(*l), Some(*r), Membership::Both));
                    }
                }
            }
        }
    }

    MergedTable {
        etf_a: etf_a.to_string(),
        etf_b: etf_b.to_string(),
        rows,
    }
}

/// Which ETF holds more shares in total.
#[derive(Debug, Clone, PartialEq)]
pub struct SizeClassification {
    pub greater: String,
    pub lesser: String,
    pub total_shares_a: f64,
    pub total_shares_b: f64,
}

/// Sum shares per side (absent counts as zero) and label the larger side
/// `greater`. Equal totals resolve to A lesser, B greater.
pub fn classify_size(merged: &MergedTable) -> SizeClassification {
    let total_shares_a: f64 = merged.rows.iter().filter_map(|r| r.shares_a).sum();
    let total_shares_b: f64 = merged.rows.iter().filter_map(|r| r.shares_b).sum();

    let (greater, lesser) = if total_shares_a > total_shares_b {
        (&merged.etf_a, &merged.etf_b)
    } else {
        (&merged.etf_b, &merged.etf_a)
    };

    SizeClassification {
        greater: greater.clone(),
        lesser: lesser.clone(),
        total_shares_a,
        total_shares_b,
    }
}
