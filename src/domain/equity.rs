//! Equity reference data used to enrich overlapping holdings.

use crate::domain::error::OverlapError;
use crate::ports::equity_port::EquityPort;

/// Metadata the equity provider reports for one symbol.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EquityMetadata {
    pub sector: Option<String>,
    pub industry: Option<String>,
    pub country: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct EquityRecord {
    pub symbol: String,
    pub sector: Option<String>,
    pub industry: Option<String>,
    pub country: Option<String>,
}

/// Flattens the equity provider's symbol mapping into a table.
pub struct EquityReference<'a> {
    port: &'a dyn EquityPort,
}

impl<'a> EquityReference<'a> {
    pub fn new(port: &'a dyn EquityPort) -> Self {
        Self { port }
    }

    /// Fetch the full reference table. Entries with an empty symbol are
    /// dropped; provider errors are returned as-is.
    pub fn fetch_equity_table(&self) -> Result<Vec<EquityRecord>, OverlapError> {
        let equities = self.port.select_equities()?;
        let upstream = equities.len();

        let table: Vec<EquityRecord> = equities
            .into_iter()
            .filter(|(symbol, _)| !symbol.is_empty())
            .map(|(symbol, meta)| EquityRecord {
                symbol,
                sector: meta.sector,
                industry: meta.industry,
                country: meta.country,
            })
            .collect();

        if table.len() < upstream {
            tracing::debug!(
                dropped = upstream - table.len(),
                "dropped equity entries with empty symbol"
            );
        }
        Ok(table)
    }
}
