//! Conversion settings.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::DaxError;

pub const DEFAULT_SITE: &str = "local";
pub const DEFAULT_WRAPPER: &str = "execute";
pub const DEFAULT_ROOT_MARKER: &str = "_mapper";
pub const DEFAULT_DOCUMENT_NAME: &str = "dax";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Site assigned to locations that do not name one.
    pub default_site: String,
    /// Executable every task runs through after wrapping.
    pub wrapper: String,
    /// Substring of the logical name that marks a file under the dataset root.
    pub root_marker: String,
    /// Document name used when the graph has none.
    pub document_name: String,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            default_site: DEFAULT_SITE.into(),
            wrapper: DEFAULT_WRAPPER.into(),
            root_marker: DEFAULT_ROOT_MARKER.into(),
            document_name: DEFAULT_DOCUMENT_NAME.into(),
        }
    }
}

impl Config {
    /// Load settings from a JSON file. Missing fields keep their defaults.
    pub fn from_file(path: &Path) -> Result<Self, DaxError> {
        let raw = std::fs::read_to_string(path)?;
        let config = serde_json::from_str(&raw)?;
        Ok(config)
    }
}
