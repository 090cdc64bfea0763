//! INI file configuration adapter.
//!
//! Section and key names are case-insensitive (`configparser` lowercases
//! them). Parse failures carry the name of the source they came from.

use crate::domain::config_validation::parse_flag;
use crate::domain::error::OverlapError;
use crate::ports::config_port::ConfigPort;
use configparser::ini::Ini;
use std::path::Path;

const INLINE_SOURCE: &str = "<inline>";

pub struct FileConfigAdapter {
    ini: Ini,
}

impl FileConfigAdapter {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, OverlapError> {
        let path = path.as_ref();
        let mut ini = Ini::new();
        ini.load(path).map_err(|reason| OverlapError::ConfigParse {
            file: path.display().to_string(),
            reason,
        })?;
        tracing::debug!(file = %path.display(), sections = ini.sections().len(), "config loaded");
        Ok(Self { ini })
    }

    pub fn from_string(content: &str) -> Result<Self, OverlapError> {
        let mut ini = Ini::new();
        ini.read(content.to_string())
            .map_err(|reason| OverlapError::ConfigParse {
                file: INLINE_SOURCE.to_string(),
                reason,
            })?;
        Ok(Self { ini })
    }
}

impl ConfigPort for FileConfigAdapter {
    fn get_string(&self, section: &str, key: &str) -> Option<String> {
        self.ini.get(section, key)
    }

    fn get_int(&self, section: &str, key: &str, default: i64) -> i64 {
        self.ini
            .getint(section, key)
            .ok()
            .flatten()
            .unwrap_or(default)
    }

    fn get_bool(&self, section: &str, key: &str, default: bool) -> bool {
        self.get_string(section, key)
            .as_deref()
            .and_then(parse_flag)
            .unwrap_or(default)
    }
}
