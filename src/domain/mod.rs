//! Core domain types and logic.

pub mod holding;
pub mod equity;
pub mod merge;
pub mod overlap;
pub mod config_validation;
pub mod error;
