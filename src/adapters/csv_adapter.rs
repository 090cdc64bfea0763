//! CSV snapshot data adapter.
//!
//! Layout under the base directory:
//! - `holdings/<ETF>.csv`: header row, then symbol, name, percent, shares
//! - `equities.csv`: header naming at least symbol, sector, industry, country

use crate::domain::equity::EquityMetadata;
use crate::domain::error::OverlapError;
use crate::domain::holding::RawHoldingsTable;
use crate::ports::config_port::ConfigPort;
use crate::ports::equity_port::EquityPort;
use crate::ports::holdings_port::HoldingsPort;
use std::fs;
use std::io::ErrorKind;
use std::path::PathBuf;

pub const EQUITIES_FILE: &str = "equities.csv";
pub const HOLDINGS_DIR: &str = "holdings";

pub struct CsvAdapter {
    base_path: PathBuf,
}

impl CsvAdapter {
    pub fn new(base_path: PathBuf) -> Self {
        Self { base_path }
    }

    pub fn from_config(config: &dyn ConfigPort) -> Result<Self, OverlapError> {
        let path = config.require_string("data", "path")?;
        Ok(Self::new(PathBuf::from(path.trim())))
    }

    fn holdings_path(&self, etf: &str) -> PathBuf {
        self.base_path
            .join(HOLDINGS_DIR)
            .join(format!("{}.csv", etf.trim().to_uppercase()))
    }

    fn equities_path(&self) -> PathBuf {
        self.base_path.join(EQUITIES_FILE)
    }
}

fn column_index(headers: &csv::StringRecord, name: &str) -> Result<usize, OverlapError> {
    headers
        .iter()
        .position(|h| h.trim().eq_ignore_ascii_case(name))
        .ok_or_else(|| OverlapError::DataSource {
            reason: format!("{} is missing the {} column", EQUITIES_FILE, name),
        })
}

fn non_blank(record: &csv::StringRecord, idx: usize) -> Option<String> {
    record
        .get(idx)
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

impl HoldingsPort for CsvAdapter {
    fn holdings(&self, etf: &str) -> Result<RawHoldingsTable, OverlapError> {
        let path = self.holdings_path(etf);
        let content = match fs::read_to_string(&path) {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                return Err(OverlapError::HoldingsNotFound {
                    etf: etf.to_string(),
                });
            }
            Err(e) => {
                return Err(OverlapError::DataSource {
                    reason: format!("failed to read {}: {}", path.display(), e),
                });
            }
        };

        let mut rdr = csv::ReaderBuilder::new()
            .flexible(true)
            .from_reader(content.as_bytes());

        let columns: Vec<String> = rdr
            .headers()
            .map_err(|e| OverlapError::DataSource {
                reason: format!("CSV header error in {}: {}", path.display(), e),
            })?
            .iter()
            .map(str::to_string)
            .collect();

        let mut rows = Vec::new();
        for result in rdr.records() {
            let record = result.map_err(|e| OverlapError::DataSource {
                reason: format!("CSV parse error in {}: {}", path.display(), e),
            })?;
            rows.push(record.iter().map(str::to_string).collect());
        }

        Ok(RawHoldingsTable::new(columns, rows))
    }
}

impl EquityPort for CsvAdapter {
    fn select_equities(&self) -> Result<Vec<(String, EquityMetadata)>, OverlapError> {
        let path = self.equities_path();
        let content = fs::read_to_string(&path).map_err(|e| OverlapError::DataSource {
            reason: format!("failed to read {}: {}", path.display(), e),
        })?;

        let mut rdr = csv::Reader::from_reader(content.as_bytes());
        let headers = rdr
            .headers()
            .map_err(|e| OverlapError::DataSource {
                reason: format!("CSV header error in {}: {}", path.display(), e),
            })?
            .clone();

        let symbol_idx = column_index(&headers, "symbol")?;
        let sector_idx = column_index(&headers, "sector")?;
        let industry_idx = column_index(&headers, "industry")?;
        let country_idx = column_index(&headers, "country")?;

        let mut equities = Vec::new();
        for result in rdr.records() {
            let record = result.map_err(|e| OverlapError::DataSource {
                reason: format!("CSV parse error in {}: {}", path.display(), e),
            })?;

            let symbol = record.get(symbol_idx).unwrap_or_default().trim().to_string();
            equities.push((
                symbol,
                EquityMetadata {
                    sector: non_blank(&record, sector_idx),
                    industry: non_blank(&record, industry_idx),
                    country: non_blank(&record, country_idx),
                },
            ));
        }

        Ok(equities)
    }
}
