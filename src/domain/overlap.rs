//! ETF overlap calculation.
//!
//! [`EtfOverlapCalculator::compare`] runs the whole pipeline (fetch, normalize,
//! join, classify) and returns an immutable [`OverlapReport`]. Everything that
//! reads merged state hangs off that report, so there is no way to query
//! before the merge has happened.

use crate::domain::equity::{EquityRecord, EquityReference};
use crate::domain::error::OverlapError;
use crate::domain::holding::{normalize_holdings, HoldingRow};
use crate::domain::merge::{
    classify_size, outer_join, Membership, MergedRow, MergedTable, SizeClassification,
};
use crate::ports::holdings_port::HoldingsPort;
use std::collections::HashMap;

pub const DEFAULT_TOP_N: usize = 10;

/// An overlapping holding seen from one ETF, enriched with reference metadata.
#[derive(Debug, Clone, PartialEq)]
pub struct OverlapRow {
    pub symbol: String,
    pub name: String,
    pub percent: f64,
    pub shares: f64,
    pub sector: Option<String>,
    pub industry: Option<String>,
    pub country: Option<String>,
}

/// Round to two decimals on the exact binary value, ties to even.
///
/// Scaling by 100 first would round twice: 0.615 is stored just below the
/// midpoint but `0.615 * 100.0` lands exactly on 61.5.
pub fn round2(value: f64) -> f64 {
    format!("{:.2}", value).parse().unwrap_or(value)
}

#[derive(Debug, Clone, PartialEq)]
pub struct OverlapReport {
    pub merged: MergedTable,
    pub size: SizeClassification,
}

impl OverlapReport {
    pub fn etf_a(&self) -> &str {
        &self.merged.etf_a
    }

    pub fn etf_b(&self) -> &str {
        &self.merged.etf_b
    }

    pub fn greater(&self) -> &str {
        &self.size.greater
    }

    pub fn lesser(&self) -> &str {
        &self.size.lesser
    }

    fn check_etf(&self, etf: &str) -> Result<Side, OverlapError> {
        if etf == self.merged.etf_a {
            Ok(Side::A)
        } else if etf == self.merged.etf_b {
            Ok(Side::B)
        } else {
            Err(OverlapError::InvalidArgument {
                etf: etf.to_string(),
                etf_a: self.merged.etf_a.clone(),
                etf_b: self.merged.etf_b.clone(),
            })
        }
    }

    /// Share of `etf`'s total weight spent on securities the other ETF also
    /// holds, as a fraction rounded to two decimals.
    pub fn overlap_percent(&self, etf: &str) -> Result<f64, OverlapError> {
        let side = self.check_etf(etf)?;
        let total: f64 = self
            .merged
            .overlapping()
            .filter_map(|r| side.percent(r))
            .sum();
        Ok(round2(total))
    }

    pub fn lesser_overlap(&self) -> Result<f64, OverlapError> {
        self.overlap_percent(self.lesser())
    }

    pub fn greater_overlap(&self) -> Result<f64, OverlapError> {
        self.overlap_percent(self.greater())
    }

    /// Overlapping holdings from `etf`'s point of view, heaviest first and
    /// not yet enriched. Equal weights keep their merged-table order.
    pub fn ranked_overlap(&self, etf: &str) -> Result<Vec<OverlapRow>, OverlapError> {
        let side = self.check_etf(etf)?;
        let mut rows: Vec<OverlapRow> = self
            .merged
            .overlapping()
            .map(|r| OverlapRow {
                symbol: r.symbol.clone(),
                name: r.name.clone(),
                percent: side.percent(r).unwrap_or(0.0),
                shares: side.shares(r).unwrap_or(0.0),
                sector: None,
                industry: None,
                country: None,
            })
            .collect();
        rows.sort_by(|a, b| b.percent.total_cmp(&a.percent));
        Ok(rows)
    }
}

#[derive(Debug, Clone, Copy)]
enum Side {
    A,
    B,
}

impl Side {
    fn percent(self, row: &MergedRow) -> Option<f64> {
        match self {
            Side::A => row.percent_a,
            Side::B => row.percent_b,
        }
    }

    fn shares(self, row: &MergedRow) -> Option<f64> {
        match self {
            Side::A => row.shares_a,
            Side::B => row.shares_b,
        }
    }
}

/// Left join on symbol. Rows without a reference match are kept with empty
/// metadata; a symbol listed more than once in the reference yields one row
/// per listing.
pub fn enrich(rows: Vec<OverlapRow>, equities: &[EquityRecord]) -> Vec<OverlapRow> {
    let mut by_symbol: HashMap<&str, Vec<&EquityRecord>> = HashMap::new();
    for record in equities {
        by_symbol.entry(record.symbol.as_str()).or_default().push(record);
    }

    let mut enriched = Vec::with_capacity(rows.len());
    for row in rows {
        match by_symbol.get(row.symbol.as_str()) {
            Some(matches) => {
                for record in matches {
                    enriched.push(OverlapRow {
                        sector: record.sector.clone(),
                        industry: record.industry.clone(),
                        country: record.country.clone(),
                        ..row.clone()
                    });
                }
            }
            None => {
                tracing::debug!(symbol = %row.symbol, "no equity reference entry");
                enriched.push(row);
            }
        }
    }
    enriched
}

pub struct EtfOverlapCalculator<'a> {
    holdings: &'a dyn HoldingsPort,
    equities: EquityReference<'a>,
}

impl<'a> EtfOverlapCalculator<'a> {
    pub fn new(holdings: &'a dyn HoldingsPort, equities: EquityReference<'a>) -> Self {
        Self { holdings, equities }
    }

    /// Fetch and normalize one ETF's holdings.
    pub fn load_holdings(&self, etf: &str) -> Result<Vec<HoldingRow>, OverlapError> {
        let raw = self.holdings.holdings(etf)?;
        let rows = normalize_holdings(&raw)?;
        tracing::info!(etf, holdings = rows.len(), "loaded holdings");
        Ok(rows)
    }

    /// Fetch both ETFs and outer-join their holdings on (symbol, name).
    ///
    /// An unknown identifier on either side surfaces as
    /// `OverlapError::EtfDataNotFound`; every other error passes through.
    pub fn load_and_merge(&self, etf_a: &str, etf_b: &str) -> Result<MergedTable, OverlapError> {
        if etf_a == etf_b {
            return Err(OverlapError::IdenticalEtfs {
                etf: etf_a.to_string(),
            });
        }

        let fetch = |etf: &str| match self.load_holdings(etf) {
            Err(OverlapError::HoldingsNotFound { etf }) => {
                tracing::warn!(%etf, "holdings not found");
                Err(OverlapError::EtfDataNotFound)
            }
            other => other,
        };
        let a = fetch(etf_a)?;
        let b = fetch(etf_b)?;

        let merged = outer_join(etf_a, &a, etf_b, &b);
        tracing::info!(
            rows = merged.rows.len(),
            both = merged.count(Membership::Both),
            "merged holdings"
        );
        tracing::debug!("merged table:\n{merged}");
        Ok(merged)
    }

    /// Run the full pipeline: load and merge, then classify by share count.
    pub fn compare(&self, etf_a: &str, etf_b: &str) -> Result<OverlapReport, OverlapError> {
        let merged = self.load_and_merge(etf_a, etf_b)?;
        let size = classify_size(&merged);
        tracing::info!(
            greater = %size.greater,
            lesser = %size.lesser,
            total_a = size.total_shares_a,
            total_b = size.total_shares_b,
            "classified ETF size"
        );
        Ok(OverlapReport { merged, size })
    }

    /// Overlapping holdings for `etf`, heaviest first, enriched with sector,
    /// industry and country. The reference table is fetched on every call.
    pub fn overlap_holdings(
        &self,
        report: &OverlapReport,
        etf: &str,
    ) -> Result<Vec<OverlapRow>, OverlapError> {
        let ranked = report.ranked_overlap(etf)?;
        let equities = self.equities.fetch_equity_table()?;
        Ok(enrich(ranked, &equities))
    }

    /// The first `n` rows of [`Self::overlap_holdings`].
    pub fn top_overlap_holdings(
        &self,
        report: &OverlapReport,
        etf: &str,
        n: usize,
    ) -> Result<Vec<OverlapRow>, OverlapError> {
        let mut rows = self.overlap_holdings(report, etf)?;
        rows.truncate(n);
        Ok(rows)
    }
}
