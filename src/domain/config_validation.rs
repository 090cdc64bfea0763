//! Configuration validation.
//!
//! Validates all config fields before any data source is touched.

use crate::domain::error::OverlapError;
use crate::domain::overlap::DEFAULT_TOP_N;
use crate::ports::config_port::ConfigPort;
use std::path::Path;

pub fn validate_config(config: &dyn ConfigPort) -> Result<(), OverlapError> {
    validate_data_path(config)?;
    validate_top_n(config)?;
    validate_enrich(config)?;
    Ok(())
}

fn validate_data_path(config: &dyn ConfigPort) -> Result<(), OverlapError> {
    let path = config.require_string("data", "path")?;
    if !Path::new(path.trim()).is_dir() {
        return Err(OverlapError::ConfigInvalid {
            section: "data".to_string(),
            key: "path".to_string(),
            reason: format!("{} is not a directory", path.trim()),
        });
    }
    Ok(())
}

fn validate_top_n(config: &dyn ConfigPort) -> Result<(), OverlapError> {
    let value = config.get_int("report", "top_n", DEFAULT_TOP_N as i64);
    if value < 1 {
        return Err(OverlapError::ConfigInvalid {
            section: "report".to_string(),
            key: "top_n".to_string(),
            reason: "top_n must be at least 1".to_string(),
        });
    }
    Ok(())
}

fn validate_enrich(config: &dyn ConfigPort) -> Result<(), OverlapError> {
    match config.get_string("report", "enrich") {
        Some(value) if parse_flag(&value).is_none() => Err(OverlapError::ConfigInvalid {
            section: "report".to_string(),
            key: "enrich".to_string(),
            reason: format!("expected true/false, yes/no or 1/0, got '{value}'"),
        }),
        _ => Ok(()),
    }
}

/// Boolean config spelling: true/yes/1 or false/no/0, any case.
pub fn parse_flag(value: &str) -> Option<bool> {
    match value.trim().to_lowercase().as_str() {
        "true" | "yes" | "1" => Some(true),
        "false" | "no" | "0" => Some(false),
        _ => None,
    }
}

/// Whether overlap tables are enriched from the equity reference.
pub fn enrich(config: &dyn ConfigPort) -> bool {
    config.get_bool("report", "enrich", true)
}

/// Number of overlapping holdings to show per ETF.
pub fn top_n(config: &dyn ConfigPort) -> usize {
    config
        .get_int("report", "top_n", DEFAULT_TOP_N as i64)
        .max(1) as usize
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::file_config_adapter::FileConfigAdapter;
    use tempfile::TempDir;

    fn config_with(dir: &Path, extra: &str) -> FileConfigAdapter {
        let ini = format!("[data]\npath = {}\n{}", dir.display(), extra);
        FileConfigAdapter::from_string(&ini).unwrap()
    }

    #[test]
    fn valid_config_passes() {
        let dir = TempDir::new().unwrap();
        let config = config_with(dir.path(), "[report]\ntop_n = 5\n");
        assert!(validate_config(&config).is_ok());
        assert_eq!(top_n(&config), 5);
    }

    #[test]
    fn missing_data_path() {
        let config = FileConfigAdapter::from_string("[report]\ntop_n = 5\n").unwrap();
        let err = validate_config(&config).unwrap_err();
        assert!(matches!(err, OverlapError::ConfigMissing { key, .. } if key == "path"));
    }

    #[test]
    fn data_path_must_be_directory() {
        let config = FileConfigAdapter::from_string("[data]\npath = /nonexistent/etf-data\n")
            .unwrap();
        let err = validate_config(&config).unwrap_err();
        assert!(matches!(err, OverlapError::ConfigInvalid { key, .. } if key == "path"));
    }

    #[test]
    fn top_n_must_be_positive() {
        let dir = TempDir::new().unwrap();
        let config = config_with(dir.path(), "[report]\ntop_n = 0\n");
        let err = validate_config(&config).unwrap_err();
        assert!(matches!(err, OverlapError::ConfigInvalid { key, .. } if key == "top_n"));
    }

    #[test]
    fn enrich_must_be_boolean() {
        let dir = TempDir::new().unwrap();
        let config = config_with(dir.path(), "[report]\nenrich = sometimes\n");
        let err = validate_config(&config).unwrap_err();
        assert!(matches!(err, OverlapError::ConfigInvalid { key, .. } if key == "enrich"));
    }

    #[test]
    fn enrich_accepts_flag_spellings() {
        let dir = TempDir::new().unwrap();
        let config = config_with(dir.path(), "[report]\nenrich = No\n");
        assert!(validate_config(&config).is_ok());
        assert!(!enrich(&config));

        let config = config_with(dir.path(), "");
        assert!(validate_config(&config).is_ok());
        assert!(enrich(&config));
    }

    #[test]
    fn parse_flag_spellings() {
        assert_eq!(parse_flag(" TRUE "), Some(true));
        assert_eq!(parse_flag("1"), Some(true));
        assert_eq!(parse_flag("no"), Some(false));
        assert_eq!(parse_flag("off"), None);
    }

    #[test]
    fn top_n_defaults_to_ten() {
        let dir = TempDir::new().unwrap();
        let config = config_with(dir.path(), "");
        assert_eq!(top_n(&config), DEFAULT_TOP_N);
    }
}
