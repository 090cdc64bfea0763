//! CSV report writer for enriched overlap tables.

use crate::domain::error::OverlapError;
use crate::domain::overlap::OverlapRow;
use crate::ports::report_port::ReportPort;

pub const REPORT_HEADER: [&str; 8] = [
    "etf", "symbol", "name", "percent", "shares", "sector", "industry", "country",
];

#[derive(Debug, Default)]
pub struct CsvReportAdapter;

impl CsvReportAdapter {
    pub fn new() -> Self {
        Self
    }
}

impl ReportPort for CsvReportAdapter {
    fn write(
        &self,
        etf: &str,
        rows: &[OverlapRow],
        output_path: &str,
    ) -> Result<(), OverlapError> {
        let to_err = |e: csv::Error| OverlapError::DataSource {
            reason: format!("failed to write report {}: {}", output_path, e),
        };

        let mut wtr = csv::Writer::from_path(output_path).map_err(to_err)?;
        wtr.write_record(REPORT_HEADER).map_err(to_err)?;

        for row in rows {
            let percent = format!("{:.6}", row.percent);
            let shares = row.shares.to_string();
            wtr.write_record([
                etf,
                row.symbol.as_str(),
                row.name.as_str(),
                percent.as_str(),
                shares.as_str(),
                row.sector.as_deref().unwrap_or(""),
                row.industry.as_deref().unwrap_or(""),
                row.country.as_deref().unwrap_or(""),
            ])
            .map_err(to_err)?;
        }

        wtr.flush()?;
        Ok(())
    }
}
