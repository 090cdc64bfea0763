//! Port traits the domain depends on.

pub mod config_port;
pub mod equity_port;
pub mod holdings_port;
pub mod report_port;
