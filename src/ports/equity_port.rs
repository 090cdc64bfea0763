//! Equity reference data port trait.

use crate::domain::equity::EquityMetadata;
use crate::domain::error::OverlapError;

pub trait EquityPort {
    /// Symbol to metadata mapping, in the provider's iteration order.
    fn select_equities(&self) -> Result<Vec<(String, EquityMetadata)>, OverlapError>;
}
