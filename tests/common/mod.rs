#![allow(dead_code)]

use etf_overlap::domain::equity::EquityMetadata;
use etf_overlap::domain::error::OverlapError;
use etf_overlap::domain::holding::RawHoldingsTable;
use etf_overlap::domain::overlap::OverlapRow;
use etf_overlap::ports::equity_port::EquityPort;
use etf_overlap::ports::holdings_port::HoldingsPort;
use etf_overlap::ports::report_port::ReportPort;
use std::cell::{Cell, RefCell};
use std::collections::HashMap;

pub struct MockHoldingsPort {
    pub tables: HashMap<String, RawHoldingsTable>,
    pub errors: HashMap<String, String>,
}

impl MockHoldingsPort {
    pub fn new() -> Self {
        Self {
            tables: HashMap::new(),
            errors: HashMap::new(),
        }
    }

    /// Holdings given as (symbol, name, percent fraction, shares).
    pub fn with_holdings(mut self, etf: &str, holdings: &[(&str, &str, f64, f64)]) -> Self {
        let rows = holdings
            .iter()
            .map(|(symbol, name, percent, shares)| {
                vec![
                    symbol.to_string(),
                    name.to_string(),
                    format!("{}%", percent * 100.0),
                    shares.to_string(),
                ]
            })
            .collect();
        self.tables.insert(etf.to_string(), holdings_table(rows));
        self
    }

    pub fn with_table(mut self, etf: &str, table: RawHoldingsTable) -> Self {
        self.tables.insert(etf.to_string(), table);
        self
    }

    pub fn with_error(mut self, etf: &str, reason: &str) -> Self {
        self.errors.insert(etf.to_string(), reason.to_string());
        self
    }
}

impl HoldingsPort for MockHoldingsPort {
    fn holdings(&self, etf: &str) -> Result<RawHoldingsTable, OverlapError> {
        if let Some(reason) = self.errors.get(etf) {
            return Err(OverlapError::DataSource {
                reason: reason.clone(),
            });
        }
        self.tables
            .get(etf)
            .cloned()
            .ok_or_else(|| OverlapError::HoldingsNotFound {
                etf: etf.to_string(),
            })
    }
}

pub struct MockEquityPort {
    pub equities: Vec<(String, EquityMetadata)>,
    pub calls: Cell<usize>,
}

impl MockEquityPort {
    pub fn new() -> Self {
        Self {
            equities: Vec::new(),
            calls: Cell::new(0),
        }
    }

    pub fn with_equity(mut self, symbol: &str, sector: &str, industry: &str, country: &str) -> Self {
        self.equities.push((
            symbol.to_string(),
            EquityMetadata {
                sector: Some(sector.to_string()),
                industry: Some(industry.to_string()),
                country: Some(country.to_string()),
            },
        ));
        self
    }
}

impl EquityPort for MockEquityPort {
    fn select_equities(&self) -> Result<Vec<(String, EquityMetadata)>, OverlapError> {
        self.calls.set(self.calls.get() + 1);
        Ok(self.equities.clone())
    }
}

/// Captures written reports instead of touching the filesystem.
pub struct RecordingReportPort {
    pub written: RefCell<Vec<(String, Vec<OverlapRow>, String)>>,
}

impl RecordingReportPort {
    pub fn new() -> Self {
        Self {
            written: RefCell::new(Vec::new()),
        }
    }
}

impl ReportPort for RecordingReportPort {
    fn write(
        &self,
        etf: &str,
        rows: &[OverlapRow],
        output_path: &str,
    ) -> Result<(), OverlapError> {
        self.written
            .borrow_mut()
            .push((etf.to_string(), rows.to_vec(), output_path.to_string()));
        Ok(())
    }
}

pub fn holdings_table(rows: Vec<Vec<String>>) -> RawHoldingsTable {
    RawHoldingsTable::new(
        vec![
            "symbol".to_string(),
            "name".to_string(),
            "percent".to_string(),
            "shares".to_string(),
        ],
        rows,
    )
}

/// ETF_X = [(AAA,1,0.6,100),(BBB,2,0.4,50)], ETF_Y = [(AAA,1,0.5,80),(CCC,3,0.5,80)].
pub fn xy_port() -> MockHoldingsPort {
    MockHoldingsPort::new()
        .with_holdings("ETF_X", &[("AAA", "1", 0.6, 100.0), ("BBB", "2", 0.4, 50.0)])
        .with_holdings("ETF_Y", &[("AAA", "1", 0.5, 80.0), ("CCC", "3", 0.5, 80.0)])
}

/// Five symbols per side, three of them shared.
pub fn five_three_port() -> MockHoldingsPort {
    MockHoldingsPort::new()
        .with_table(
            "AAA",
            holdings_table(vec![
                row("S1", "One", "25.00%", "1000"),
                row("S2", "Two", "20.00%", "800"),
                row("S3", "Three", "15.25%", "600"),
                row("S4", "Four", "30.00%", "1200"),
                row("S5", "Five", "9.50%", "400"),
            ]),
        )
        .with_table(
            "BBB",
            holdings_table(vec![
                row("S1", "One", "10.00%", "300"),
                row("S2", "Two", "5.25%", "150"),
                row("S3", "Three", "12.00%", "350"),
                row("S6", "Six", "40.00%", "1100"),
                row("S7", "Seven", "32.75%", "900"),
            ]),
        )
}

pub fn row(symbol: &str, name: &str, percent: &str, shares: &str) -> Vec<String> {
    vec![
        symbol.to_string(),
        name.to_string(),
        percent.to_string(),
        shares.to_string(),
    ]
}
