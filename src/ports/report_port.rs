//! Report generation port trait.

use crate::domain::error::OverlapError;
use crate::domain::overlap::OverlapRow;

/// Port for writing overlap reports.
pub trait ReportPort {
    fn write(&self, etf: &str, rows: &[OverlapRow], output_path: &str)
        -> Result<(), OverlapError>;
}
