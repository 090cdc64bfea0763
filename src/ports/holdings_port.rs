//! ETF holdings access port trait.

use crate::domain::error::OverlapError;
use crate::domain::holding::RawHoldingsTable;

pub trait HoldingsPort {
    /// Raw holdings of one ETF, with the row index already reset into the
    /// leading column. Unknown identifiers yield `OverlapError::HoldingsNotFound`.
    fn holdings(&self, etf: &str) -> Result<RawHoldingsTable, OverlapError>;
}
