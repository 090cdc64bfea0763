//! Domain error types.

/// Message shown when either ETF identifier is unknown to the holdings source.
pub const ETF_NOT_FOUND_MESSAGE: &str =
    "ETF data not found for at least one symbol. Maybe you misspelled a symbol?";

/// Top-level error type for etf-overlap.
#[derive(Debug, thiserror::Error)]
pub enum OverlapError {
    #[error("{}", ETF_NOT_FOUND_MESSAGE)]
    EtfDataNotFound,

    #[error("no holdings found for {etf}")]
    HoldingsNotFound { etf: String },

    #[error("invalid ETF {etf}: expected {etf_a} or {etf_b}")]
    InvalidArgument {
        etf: String,
        etf_a: String,
        etf_b: String,
    },

    #[error("cannot compare {etf} with itself")]
    IdenticalEtfs { etf: String },

    #[error("holdings schema mismatch: {reason}")]
    SchemaMismatch { reason: String },

    #[error("data source error: {reason}")]
    DataSource { reason: String },

    #[error("config parse error in {file}: {reason}")]
    ConfigParse { file: String, reason: String },

    #[error("missing config key [{section}] {key}")]
    ConfigMissing { section: String, key: String },

    #[error("invalid config value [{section}] {key}: {reason}")]
    ConfigInvalid {
        section: String,
        key: String,
        reason: String,
    },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl From<&OverlapError> for std::process::ExitCode {
    fn from(err: &OverlapError) -> Self {
        let code: u8 = match err {
            OverlapError::Io(_) => 1,
            OverlapError::ConfigParse { .. }
            | OverlapError::ConfigMissing { .. }
            | OverlapError::ConfigInvalid { .. } => 2,
            OverlapError::DataSource { .. } | OverlapError::SchemaMismatch { .. } => 3,
            OverlapError::EtfDataNotFound | OverlapError::HoldingsNotFound { .. } => 4,
            OverlapError::InvalidArgument { .. } | OverlapError::IdenticalEtfs { .. } => 5,
        };
        std::process::ExitCode::from(code)
    }
}
